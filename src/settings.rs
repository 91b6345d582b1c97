//! Match settings and preferences
//!
//! Chosen on the start screen and persisted separately from the ranking.

use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ParseModeError, PersistError};
use crate::persistence;

/// Whether questions are answered against the clock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum GameMode {
    /// No countdown, no speed bonus
    #[default]
    Normal,
    /// Per-question countdown with speed bonus
    TimeAttack,
}

impl GameMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Normal => "Normal",
            GameMode::TimeAttack => "Time Attack",
        }
    }

    /// Whether question timers run out and speed bonuses apply
    pub fn timed(&self) -> bool {
        matches!(self, GameMode::TimeAttack)
    }
}

impl FromStr for GameMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "normal" => Ok(GameMode::Normal),
            "time_attack" | "time-attack" | "timeattack" | "countdown" => Ok(GameMode::TimeAttack),
            _ => Err(ParseModeError {
                kind: "game mode",
                value: s.to_string(),
            }),
        }
    }
}

/// Number of people sharing the robot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PlayerMode {
    #[default]
    Single,
    /// Two players, split screen, shared enemy and lives
    Versus,
}

impl PlayerMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlayerMode::Single => "Single",
            PlayerMode::Versus => "Versus",
        }
    }

    pub fn player_count(&self) -> usize {
        match self {
            PlayerMode::Single => 1,
            PlayerMode::Versus => 2,
        }
    }
}

impl FromStr for PlayerMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "single" | "1p" => Ok(PlayerMode::Single),
            "versus" | "multiplayer" | "2p" => Ok(PlayerMode::Versus),
            _ => Err(ParseModeError {
                kind: "player mode",
                value: s.to_string(),
            }),
        }
    }
}

/// Match settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub mode: GameMode,
    pub players: PlayerMode,
    /// Display names, indexed by player slot
    pub player_names: [String; 2],
    /// Seed for question draws and power-up drops
    pub seed: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mode: GameMode::Normal,
            players: PlayerMode::Single,
            player_names: ["Player 1".to_string(), "Player 2".to_string()],
            seed: 0x5EED,
        }
    }
}

impl Settings {
    pub fn single(name: impl Into<String>, mode: GameMode) -> Self {
        let mut settings = Self::default();
        settings.player_names[0] = name.into();
        settings.mode = mode;
        settings
    }

    pub fn versus(p1: impl Into<String>, p2: impl Into<String>, mode: GameMode) -> Self {
        Self {
            mode,
            players: PlayerMode::Versus,
            player_names: [p1.into(), p2.into()],
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn is_versus(&self) -> bool {
        self.players == PlayerMode::Versus
    }

    pub fn load(path: &Path) -> Result<Self, PersistError> {
        persistence::read_json(path)
    }

    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(err) => {
                if !err.is_missing() {
                    log::warn!("Ignoring settings file {}: {}", path.display(), err);
                }
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), PersistError> {
        persistence::write_json(path, self)?;
        log::info!("Settings saved");
        Ok(())
    }
}
