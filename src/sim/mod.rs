//! Deterministic match simulation
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only (question draws, hints, drops)
//! - No rendering or platform dependencies; effects go through `GameHooks`

pub mod hooks;
pub mod pool;
pub mod powerup;
pub mod question;
pub mod scoring;
pub mod state;
pub mod tick;
pub mod validate;
pub mod wave;
pub mod zone;

pub use hooks::{AnswerOutcome, GameHooks, NoHooks, QuestionModifiers};
pub use pool::{PoolStats, QuestionPool, TierStats};
pub use powerup::{Pickup, PowerUpKind, PowerUpLedger};
pub use question::{AnswerKey, Candidate, Difficulty, Question, QuestionKind};
pub use scoring::{combo_multiplier, final_points, speed_multiplier};
pub use state::{
    AnswerRecord, MatchOutcome, MatchPhase, MatchState, MatchSummary, PendingQuestion,
    PlayerSlot, PlayerState, QuestionPhase, Winner,
};
pub use tick::{PlayerInput, TickInput, tick};
pub use wave::{WaveAdvance, WaveState};
pub use zone::{Rect, RobotHitbox, Zone, ZoneHitTest};
