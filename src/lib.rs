//! RoboLearn - quiz arcade shooter engine
//!
//! Core modules:
//! - `sim`: Deterministic match simulation (question pool, answer checking,
//!   scoring, waves, power-ups)
//! - `highscores`: Persistent ranking table
//! - `persistence`: JSON save/load
//! - `tuning`: Data-driven game balance
//! - `settings`: Match setup (mode, players, seed)

pub mod error;
pub mod highscores;
pub mod persistence;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use error::{LoadError, ParseModeError, PersistError};
pub use highscores::{HighScores, RankingEntry};
pub use settings::{GameMode, PlayerMode, Settings};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Players in a versus match
    pub const MAX_PLAYERS: usize = 2;
    /// Options per multiple-choice question / statements per fact analysis
    pub const CHOICE_COUNT: usize = 4;
    /// Answer text the UI submits when the timer runs out
    pub const TIMEOUT_SENTINEL: &str = "__TIMEOUT__";

    /// Default on-disk locations
    pub const RANKING_FILE: &str = "saves/ranking.json";
    pub const TUNING_FILE: &str = "tuning.json";
    pub const SETTINGS_FILE: &str = "settings.json";
}
