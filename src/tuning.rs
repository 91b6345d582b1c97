//! Data-driven game balance
//!
//! Every number the match engine depends on lives here so a designer can
//! override it from a JSON file. Missing fields fall back to the defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::PersistError;
use crate::persistence;
use crate::sim::powerup::PowerUpKind;
use crate::sim::question::Difficulty;
use crate::sim::zone::Zone;

/// Damage dealt and base points awarded by a correct answer on a zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneStats {
    pub damage: u32,
    pub points: u64,
}

/// Per-zone reward table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoneTable {
    pub head: ZoneStats,
    pub body: ZoneStats,
    pub limb: ZoneStats,
}

impl Default for ZoneTable {
    fn default() -> Self {
        Self {
            head: ZoneStats {
                damage: 60,
                points: 150,
            },
            body: ZoneStats {
                damage: 40,
                points: 100,
            },
            limb: ZoneStats {
                damage: 20,
                points: 50,
            },
        }
    }
}

impl ZoneTable {
    pub fn get(&self, zone: Zone) -> ZoneStats {
        match zone {
            Zone::Head => self.head,
            Zone::Body => self.body,
            Zone::Limb => self.limb,
        }
    }
}

/// Question timer durations (seconds)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerTable {
    pub easy: f32,
    pub medium: f32,
    pub hard: f32,
    /// Used when the game mode disables timing
    pub untimed: f32,
}

impl Default for TimerTable {
    fn default() -> Self {
        Self {
            easy: 15.0,
            medium: 10.0,
            hard: 8.0,
            untimed: 999.0,
        }
    }
}

impl TimerTable {
    pub fn for_difficulty(&self, difficulty: Difficulty) -> f32 {
        match difficulty {
            Difficulty::Easy => self.easy,
            Difficulty::Medium => self.medium,
            Difficulty::Hard => self.hard,
        }
    }
}

/// Relative drop weights for each pickup kind
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DropWeights {
    pub heal: u32,
    pub shield: u32,
    pub double_score: u32,
    pub slow_time: u32,
    pub hint: u32,
}

impl Default for DropWeights {
    fn default() -> Self {
        Self {
            heal: 15,
            shield: 20,
            double_score: 20,
            slow_time: 20,
            hint: 25,
        }
    }
}

impl DropWeights {
    pub fn weight(&self, kind: PowerUpKind) -> u32 {
        match kind {
            PowerUpKind::Heal => self.heal,
            PowerUpKind::Shield => self.shield,
            PowerUpKind::DoubleScore => self.double_score,
            PowerUpKind::SlowTime => self.slow_time,
            PowerUpKind::Hint => self.hint,
        }
    }
}

/// Game balance parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Rewards ===
    pub zones: ZoneTable,
    /// Wrong answers allowed before the match ends (summed across players in versus)
    pub max_wrong_answers: u32,

    // === Enemies ===
    pub enemy_base_health: u32,
    /// Health offset per archetype; its length is the archetype count
    pub archetype_health_bonus: Vec<i32>,
    /// Extra health added for every full cycle through all archetypes
    pub cycle_health_bonus: u32,
    /// Environments rotated through at each round change
    pub maps: Vec<String>,
    pub kill_bonus: u64,
    /// Versus kill bonus grows by this much per kill
    pub versus_kill_bonus_step: u64,
    /// Delay before the next enemy becomes hittable
    pub respawn_delay_secs: f32,

    // === Timing ===
    pub timers: TimerTable,
    pub speed_bonus_secs: f32,
    /// Fraction of the timer within which the smaller speed bonus applies
    pub speed_bonus_fraction: f32,
    pub fast_multiplier: f64,
    pub quick_multiplier: f64,
    pub result_display_secs: f32,
    /// Countdown before a time-attack match starts
    pub intro_countdown_secs: f32,

    // === Combo ===
    pub combo_step: f64,
    pub combo_cap: f64,

    // === Power-ups ===
    pub drop_chance: f64,
    pub drop_weights: DropWeights,
    pub double_score_multiplier: f64,
    pub double_score_secs: f32,
    pub pickup_lifetime_secs: f32,
    pub pickup_collect_radius: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            zones: ZoneTable::default(),
            max_wrong_answers: 3,

            enemy_base_health: 300,
            archetype_health_bonus: vec![0, 50, -20, 30, -10, 80, 120, -30, 150, 80],
            cycle_health_bonus: 60,
            maps: vec!["lab".into(), "space".into(), "jungle".into()],
            kill_bonus: 200,
            versus_kill_bonus_step: 10,
            respawn_delay_secs: 1.5,

            timers: TimerTable::default(),
            speed_bonus_secs: 3.0,
            speed_bonus_fraction: 0.4,
            fast_multiplier: 2.0,
            quick_multiplier: 1.5,
            result_display_secs: 2.0,
            intro_countdown_secs: 3.0,

            combo_step: 0.2,
            combo_cap: 3.0,

            drop_chance: 0.35,
            drop_weights: DropWeights::default(),
            double_score_multiplier: 2.0,
            double_score_secs: 30.0,
            pickup_lifetime_secs: 6.0,
            pickup_collect_radius: 38.0,
        }
    }
}

impl Tuning {
    /// Number of enemy archetypes in one round
    pub fn archetype_count(&self) -> u32 {
        (self.archetype_health_bonus.len() as u32).max(1)
    }

    /// Number of environments in the rotation
    pub fn map_count(&self) -> usize {
        self.maps.len().max(1)
    }

    pub fn load(path: &Path) -> Result<Self, PersistError> {
        persistence::read_json(path)
    }

    /// Load tuning overrides, falling back to defaults when the file is absent or broken
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(tuning) => {
                log::info!("Loaded tuning from {}", path.display());
                tuning
            }
            Err(err) if err.is_missing() => {
                log::info!("Using default tuning");
                Self::default()
            }
            Err(err) => {
                log::warn!("Ignoring tuning file {}: {}", path.display(), err);
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), PersistError> {
        persistence::write_json(path, self)
    }
}
