//! Enemy waves, rounds and map rotation
//!
//! One enemy at a time. Killing it advances the wave; every full cycle through
//! the archetypes is a round, which rotates the map and makes enemies tougher.

use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Result of a wave advance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WaveAdvance {
    /// Kill bonus to award
    pub bonus: u64,
    pub round_changed: bool,
    pub round: u32,
    pub map_index: usize,
}

/// Shared enemy state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaveState {
    /// Monotonic wave counter (0-based)
    pub wave_index: u32,
    pub kills: u32,
    /// Current round (0-based)
    pub round: u32,
    pub map_index: usize,
    /// Archetype of the current enemy
    pub archetype: u32,
    pub max_health: u32,
    pub health: u32,
    /// Identifies the current enemy instance; bumps on every spawn
    pub enemy_serial: u32,
    /// Set once the current enemy died; cleared on the next spawn
    pub defeated: bool,
    /// Wave advanced, next enemy on its way
    pub respawning: bool,
    /// Seconds until the next enemy spawns
    pub respawn_timer: f32,
}

impl WaveState {
    pub fn new(tuning: &Tuning) -> Self {
        let mut wave = Self {
            wave_index: 0,
            kills: 0,
            round: 0,
            map_index: 0,
            archetype: 0,
            max_health: 0,
            health: 0,
            enemy_serial: 0,
            defeated: false,
            respawning: false,
            respawn_timer: 0.0,
        };
        wave.spawn(tuning);
        wave
    }

    /// Archetype for a wave index
    pub fn archetype_for(wave_index: u32, tuning: &Tuning) -> u32 {
        wave_index % tuning.archetype_count()
    }

    /// Max health for a wave index: base + archetype offset + per-cycle bonus
    pub fn max_health_for(wave_index: u32, tuning: &Tuning) -> u32 {
        let archetype = Self::archetype_for(wave_index, tuning) as usize;
        let offset = tuning
            .archetype_health_bonus
            .get(archetype)
            .copied()
            .unwrap_or(0);
        let base = (tuning.enemy_base_health as i64 + offset as i64).max(1) as u32;
        let cycles = wave_index / tuning.archetype_count();
        base + tuning.cycle_health_bonus * cycles
    }

    fn spawn(&mut self, tuning: &Tuning) {
        self.archetype = Self::archetype_for(self.wave_index, tuning);
        self.max_health = Self::max_health_for(self.wave_index, tuning);
        self.health = self.max_health;
        self.enemy_serial += 1;
        self.defeated = false;
        self.respawning = false;
        self.respawn_timer = 0.0;
        log::debug!(
            "Enemy #{} spawned: archetype {}, {} HP",
            self.wave_index + 1,
            self.archetype,
            self.max_health
        );
    }

    /// Whether the current enemy can be shot and damaged
    pub fn is_engaged(&self) -> bool {
        !self.defeated
    }

    /// Apply damage, flooring health at zero. Returns true exactly once per
    /// enemy: on the hit that kills it. Damage to a defeated enemy is ignored.
    pub fn apply_damage(&mut self, damage: u32) -> bool {
        if self.defeated {
            return false;
        }
        self.health = self.health.saturating_sub(damage);
        if self.health == 0 {
            self.defeated = true;
            return true;
        }
        false
    }

    /// Advance to the next wave after a kill. The next enemy spawns once the
    /// respawn delay has elapsed (see `update`).
    pub fn advance(&mut self, tuning: &Tuning, versus: bool) -> WaveAdvance {
        self.wave_index += 1;
        self.kills += 1;

        let bonus = if versus {
            tuning.kill_bonus + tuning.versus_kill_bonus_step * self.kills as u64
        } else {
            tuning.kill_bonus
        };

        let mut round_changed = false;
        if self.kills % tuning.archetype_count() == 0 {
            self.round = self.kills / tuning.archetype_count();
            self.map_index = self.round as usize % tuning.map_count();
            round_changed = true;
            log::info!(
                "Round {} begins on map {}",
                self.round + 1,
                self.map_name(tuning)
            );
        }

        log::info!("Wave {} cleared, {} kills", self.wave_index, self.kills);

        self.defeated = true;
        self.respawning = true;
        self.respawn_timer = tuning.respawn_delay_secs;
        if self.respawn_timer <= 0.0 {
            self.spawn(tuning);
        }

        WaveAdvance {
            bonus,
            round_changed,
            round: self.round,
            map_index: self.map_index,
        }
    }

    /// Count down the respawn delay. Returns true when a new enemy spawned.
    pub fn update(&mut self, dt: f32, tuning: &Tuning) -> bool {
        if !self.respawning {
            return false;
        }
        self.respawn_timer -= dt;
        if self.respawn_timer <= 0.0 {
            self.spawn(tuning);
            return true;
        }
        false
    }

    pub fn map_name<'a>(&self, tuning: &'a Tuning) -> &'a str {
        tuning
            .maps
            .get(self.map_index)
            .map(String::as_str)
            .unwrap_or("unknown")
    }

    /// Health as a 0-1 ratio for the HP bar
    pub fn health_ratio(&self) -> f32 {
        if self.max_health == 0 {
            0.0
        } else {
            self.health as f32 / self.max_health as f32
        }
    }
}
