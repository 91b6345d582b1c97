//! Power-up ledger
//!
//! Floating pickups dropped by the robot, plus the buffs they grant.
//! Shield, slow-time and hint are one-shot flags consumed with test-and-clear;
//! double score is a countdown. Granting a flag that is already set overwrites it.

use glam::Vec2;
use rand::Rng;
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;
use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerUpKind {
    /// Removes one wrong answer immediately
    Heal,
    /// Absorbs the next wrong answer
    Shield,
    /// Doubles points for a limited time
    DoubleScore,
    /// Freezes the next question's timer
    SlowTime,
    /// Greys out one wrong option on the next question
    Hint,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 5] = [
        PowerUpKind::Heal,
        PowerUpKind::Shield,
        PowerUpKind::DoubleScore,
        PowerUpKind::SlowTime,
        PowerUpKind::Hint,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            PowerUpKind::Heal => "HEAL",
            PowerUpKind::Shield => "SHIELD",
            PowerUpKind::DoubleScore => "x2 SCORE",
            PowerUpKind::SlowTime => "SLOW TIME",
            PowerUpKind::Hint => "HINT",
        }
    }
}

/// Pull-down applied to a freshly dropped pickup (px/s²)
const PICKUP_GRAVITY: f32 = 45.0;
/// Per-second velocity retention
const PICKUP_DAMPING: f32 = 0.3;

/// A floating pickup waiting to be clicked
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pickup {
    pub id: u32,
    pub kind: PowerUpKind,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Seconds until it disappears
    pub life: f32,
}

impl Pickup {
    pub fn update(&mut self, dt: f32) {
        self.life -= dt;
        self.vel.y += PICKUP_GRAVITY * dt;
        self.vel *= PICKUP_DAMPING.powf(dt);
        self.pos += self.vel * dt;
    }

    pub fn is_alive(&self) -> bool {
        self.life > 0.0
    }

    pub fn contains(&self, point: Vec2, radius: f32) -> bool {
        self.pos.distance(point) <= radius
    }
}

/// Active power-up effects and floating pickups
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PowerUpLedger {
    shield: bool,
    /// Seconds of double score left (0 = inactive)
    double_score_secs: f32,
    slow_time: bool,
    hint: bool,
    pickups: Vec<Pickup>,
    next_id: u32,
}

impl PowerUpLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Roll for a drop near `position`. Returns the spawned pickup, if any.
    pub fn maybe_drop<R: Rng + ?Sized>(
        &mut self,
        position: Vec2,
        tuning: &Tuning,
        rng: &mut R,
    ) -> Option<&Pickup> {
        if !rng.random_bool(tuning.drop_chance.clamp(0.0, 1.0)) {
            return None;
        }
        let kind = roll_kind(tuning, rng)?;
        let offset = Vec2::new(rng.random_range(-80.0..=80.0), rng.random_range(-60.0..=20.0));
        let vel = Vec2::new(rng.random_range(-36.0..=36.0), rng.random_range(-75.0..=-45.0));

        self.next_id += 1;
        self.pickups.push(Pickup {
            id: self.next_id,
            kind,
            pos: position + offset,
            vel,
            life: tuning.pickup_lifetime_secs,
        });
        self.pickups.last()
    }

    /// Advance timers: double-score countdown and pickup lifetimes
    pub fn update(&mut self, dt: f32) {
        if self.double_score_secs > 0.0 {
            self.double_score_secs = (self.double_score_secs - dt).max(0.0);
        }
        for pickup in &mut self.pickups {
            pickup.update(dt);
        }
        self.pickups.retain(Pickup::is_alive);
    }

    /// Remove and return the pickup under `point`, if any
    pub fn take_at(&mut self, point: Vec2, radius: f32) -> Option<PowerUpKind> {
        let index = self.pickups.iter().position(|p| p.contains(point, radius))?;
        Some(self.pickups.remove(index).kind)
    }

    /// Grant the effect of a pickup. Heal has no ledger state; the match
    /// applies it to the players' wrong counts.
    pub fn collect(&mut self, kind: PowerUpKind, tuning: &Tuning) {
        match kind {
            PowerUpKind::Heal => {}
            PowerUpKind::Shield => self.shield = true,
            PowerUpKind::DoubleScore => self.double_score_secs = tuning.double_score_secs,
            PowerUpKind::SlowTime => self.slow_time = true,
            PowerUpKind::Hint => self.hint = true,
        }
    }

    pub fn consume_shield(&mut self) -> bool {
        std::mem::take(&mut self.shield)
    }

    pub fn consume_slow_time(&mut self) -> bool {
        std::mem::take(&mut self.slow_time)
    }

    pub fn consume_hint(&mut self) -> bool {
        std::mem::take(&mut self.hint)
    }

    pub fn has_shield(&self) -> bool {
        self.shield
    }

    pub fn has_slow_time(&self) -> bool {
        self.slow_time
    }

    pub fn has_hint(&self) -> bool {
        self.hint
    }

    pub fn double_score_active(&self) -> bool {
        self.double_score_secs > 0.0
    }

    pub fn double_score_remaining(&self) -> f32 {
        self.double_score_secs
    }

    pub fn pickups(&self) -> &[Pickup] {
        &self.pickups
    }
}

/// Weighted pick of a pickup kind. `None` if every weight is zero.
pub fn roll_kind<R: Rng + ?Sized>(tuning: &Tuning, rng: &mut R) -> Option<PowerUpKind> {
    let weights = PowerUpKind::ALL.map(|k| tuning.drop_weights.weight(k));
    let dist = WeightedIndex::new(weights).ok()?;
    Some(PowerUpKind::ALL[dist.sample(rng)])
}
