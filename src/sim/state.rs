//! Match state and core simulation types
//!
//! Everything the engine mutates lives here: per-player round state, the
//! shared enemy, the power-up ledger, the question pool and the seeded RNG.

use chrono::{DateTime, Utc};
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::pool::QuestionPool;
use super::powerup::PowerUpLedger;
use super::question::{Question, QuestionKind};
use super::wave::WaveState;
use super::zone::Zone;
use crate::settings::Settings;
use crate::tuning::Tuning;

/// Player position in the match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerSlot {
    One,
    Two,
}

impl PlayerSlot {
    pub const ALL: [PlayerSlot; 2] = [PlayerSlot::One, PlayerSlot::Two];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            PlayerSlot::One => 0,
            PlayerSlot::Two => 1,
        }
    }

    /// 1-based number for display
    pub fn number(self) -> u8 {
        self.index() as u8 + 1
    }
}

/// Where a served question is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum QuestionPhase {
    /// Waiting for the player's answer
    Awaiting,
    /// Answered; result shown until `display_secs` runs out
    Resolved { correct: bool, display_secs: f32 },
}

/// A question currently in front of a player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingQuestion {
    pub question: Question,
    pub zone: Zone,
    /// Initial timer value (seconds)
    pub timer_max: f32,
    /// Seconds left
    pub timer: f32,
    /// Slow-time: timer does not count down
    pub frozen: bool,
    /// Option excluded by a hint
    pub hint_key: Option<String>,
    pub phase: QuestionPhase,
}

impl PendingQuestion {
    /// Seconds spent on the question so far
    pub fn elapsed(&self) -> f32 {
        (self.timer_max - self.timer).max(0.0)
    }

    pub fn is_awaiting(&self) -> bool {
        self.phase == QuestionPhase::Awaiting
    }
}

/// One resolved question in a player's history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub question_id: String,
    pub prompt: String,
    pub kind: QuestionKind,
    pub zone: Zone,
    pub correct: bool,
    pub timed_out: bool,
    pub points: u64,
}

/// Per-player round state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerState {
    pub slot: PlayerSlot,
    pub name: String,
    pub score: u64,
    pub correct: u32,
    pub wrong: u32,
    /// Current streak of correct answers
    pub combo: u32,
    pub max_combo: u32,
    pub pending: Option<PendingQuestion>,
    pub history: Vec<AnswerRecord>,
}

impl PlayerState {
    pub fn new(slot: PlayerSlot, name: impl Into<String>) -> Self {
        Self {
            slot,
            name: name.into(),
            score: 0,
            correct: 0,
            wrong: 0,
            combo: 0,
            max_combo: 0,
            pending: None,
            history: Vec::new(),
        }
    }

    /// No question in front of the player (may shoot)
    pub fn is_idle(&self) -> bool {
        self.pending.is_none()
    }

    pub fn is_awaiting(&self) -> bool {
        self.pending.as_ref().is_some_and(PendingQuestion::is_awaiting)
    }

    /// Questions answered so far (timeouts included, cancels excluded)
    pub fn answered(&self) -> u32 {
        self.history.len() as u32
    }

    pub fn summary(&self, timestamp: DateTime<Utc>) -> MatchSummary {
        MatchSummary {
            name: self.name.clone(),
            score: self.score,
            correct: self.correct,
            wrong: self.wrong,
            answered: self.answered(),
            max_combo: self.max_combo,
            timestamp,
        }
    }
}

/// Current phase of the match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchPhase {
    /// Time-attack countdown before play starts
    Intro,
    Playing,
    Over,
}

/// Why the match ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchOutcome {
    /// Wrong-answer threshold reached
    Defeated,
    Quit,
}

/// Versus result, decided by score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Winner {
    Player(PlayerSlot),
    Draw,
}

/// Read-only end-of-match summary for one player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchSummary {
    pub name: String,
    pub score: u64,
    pub correct: u32,
    pub wrong: u32,
    pub answered: u32,
    pub max_combo: u32,
    pub timestamp: DateTime<Utc>,
}

/// Complete match state
#[derive(Debug, Clone)]
pub struct MatchState {
    pub settings: Settings,
    pub tuning: Tuning,
    pub phase: MatchPhase,
    /// Set once the match is over
    pub outcome: Option<MatchOutcome>,
    pub ended_at: Option<DateTime<Utc>>,
    /// Intro countdown left (seconds)
    pub intro_secs: f32,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// One entry per player, ordered by slot
    pub(crate) players: Vec<PlayerState>,
    /// Shared enemy; only the scoring engine and `tick` mutate it
    pub(crate) wave: WaveState,
    pub(crate) powerups: PowerUpLedger,
    pub(crate) pool: QuestionPool,
    pub(crate) rng: Pcg32,
}

impl MatchState {
    /// Start a match. Time attack opens with the intro countdown.
    pub fn new(settings: Settings, tuning: Tuning, pool: QuestionPool) -> Self {
        let players = PlayerSlot::ALL
            .iter()
            .take(settings.players.player_count())
            .map(|&slot| PlayerState::new(slot, settings.player_names[slot.index()].clone()))
            .collect();

        let intro_secs = if settings.mode.timed() {
            tuning.intro_countdown_secs.max(0.0)
        } else {
            0.0
        };
        let phase = if intro_secs > 0.0 {
            MatchPhase::Intro
        } else {
            MatchPhase::Playing
        };

        log::info!(
            "Match started: {} / {}, {} questions, seed {:#x}",
            settings.players.as_str(),
            settings.mode.as_str(),
            pool.len(),
            settings.seed
        );

        Self {
            rng: Pcg32::seed_from_u64(settings.seed),
            wave: WaveState::new(&tuning),
            powerups: PowerUpLedger::new(),
            phase,
            outcome: None,
            ended_at: None,
            intro_secs,
            time_ticks: 0,
            players,
            pool,
            settings,
            tuning,
        }
    }

    pub fn players(&self) -> &[PlayerState] {
        &self.players
    }

    pub fn wave(&self) -> &WaveState {
        &self.wave
    }

    pub fn powerups(&self) -> &PowerUpLedger {
        &self.powerups
    }

    pub fn pool(&self) -> &QuestionPool {
        &self.pool
    }

    pub fn player(&self, slot: PlayerSlot) -> Option<&PlayerState> {
        self.players.get(slot.index())
    }

    pub(crate) fn player_mut(&mut self, slot: PlayerSlot) -> Option<&mut PlayerState> {
        self.players.get_mut(slot.index())
    }

    pub fn is_versus(&self) -> bool {
        self.players.len() > 1
    }

    pub fn is_over(&self) -> bool {
        self.phase == MatchPhase::Over
    }

    /// Any player has a question waiting for an answer
    pub fn any_awaiting(&self) -> bool {
        self.players.iter().any(PlayerState::is_awaiting)
    }

    /// Wrong answers summed across players
    pub fn total_wrong(&self) -> u32 {
        self.players.iter().map(|p| p.wrong).sum()
    }

    /// One summary per player, stamped with the match end time (or now)
    pub fn summaries(&self) -> Vec<MatchSummary> {
        let timestamp = self.ended_at.unwrap_or_else(Utc::now);
        self.players.iter().map(|p| p.summary(timestamp)).collect()
    }

    /// Versus winner by score; `None` in single player
    pub fn winner(&self) -> Option<Winner> {
        let [p1, p2] = self.players.as_slice() else {
            return None;
        };
        Some(match p1.score.cmp(&p2.score) {
            std::cmp::Ordering::Greater => Winner::Player(PlayerSlot::One),
            std::cmp::Ordering::Less => Winner::Player(PlayerSlot::Two),
            std::cmp::Ordering::Equal => Winner::Draw,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::GameMode;

    #[test]
    fn test_single_player_setup() {
        let state = MatchState::new(
            Settings::single("Ana", GameMode::Normal),
            Tuning::default(),
            QuestionPool::new(),
        );
        assert_eq!(state.players.len(), 1);
        assert_eq!(state.players[0].name, "Ana");
        assert_eq!(state.phase, MatchPhase::Playing);
        assert!(state.player(PlayerSlot::Two).is_none());
        assert_eq!(state.winner(), None);
    }

    #[test]
    fn test_time_attack_starts_with_intro() {
        let state = MatchState::new(
            Settings::versus("A", "B", GameMode::TimeAttack),
            Tuning::default(),
            QuestionPool::new(),
        );
        assert_eq!(state.phase, MatchPhase::Intro);
        assert!((state.intro_secs - 3.0).abs() < 1e-6);
        assert_eq!(state.players.len(), 2);
        assert_eq!(state.players[1].slot, PlayerSlot::Two);
    }

    #[test]
    fn test_winner_by_score() {
        let mut state = MatchState::new(
            Settings::versus("A", "B", GameMode::Normal),
            Tuning::default(),
            QuestionPool::new(),
        );
        assert_eq!(state.winner(), Some(Winner::Draw));
        state.players[1].score = 10;
        assert_eq!(state.winner(), Some(Winner::Player(PlayerSlot::Two)));
        state.players[0].score = 11;
        assert_eq!(state.winner(), Some(Winner::Player(PlayerSlot::One)));
    }

    #[test]
    fn test_summary_counts_history() {
        let mut player = PlayerState::new(PlayerSlot::One, "Bo");
        player.history.push(AnswerRecord {
            question_id: "q".into(),
            prompt: "?".into(),
            kind: QuestionKind::ShortAnswer,
            zone: Zone::Limb,
            correct: false,
            timed_out: true,
            points: 0,
        });
        let summary = player.summary(Utc::now());
        assert_eq!(summary.answered, 1);
        assert_eq!(summary.name, "Bo");
    }
}
