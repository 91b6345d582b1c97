//! Presentation hooks
//!
//! The match engine calls these fire-and-forget at the points where the
//! renderer plays effects. Every method defaults to a no-op.

use glam::Vec2;

use super::powerup::PowerUpKind;
use super::question::Question;
use super::state::{MatchOutcome, MatchSummary, PlayerSlot};
use super::zone::Zone;

/// Modifiers in effect for a freshly shown question
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionModifiers {
    /// Timer counts down (time attack)
    pub timed: bool,
    pub timer_secs: f32,
    /// Timer frozen for this question
    pub slow_time: bool,
    /// Option greyed out by a hint
    pub hint_key: Option<String>,
}

/// How an answer resolved
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerOutcome {
    pub slot: PlayerSlot,
    pub zone: Zone,
    pub correct: bool,
    pub timed_out: bool,
    /// Wrong answer absorbed by a shield
    pub shielded: bool,
    pub points: u64,
    /// Combined speed × double-score × combo multiplier (1.0 when wrong)
    pub multiplier: f64,
    pub damage: u32,
    /// This answer killed the enemy
    pub enemy_defeated: bool,
    /// This answer ended the match
    pub match_over: bool,
}

pub trait GameHooks {
    fn on_hit(&mut self, _slot: PlayerSlot, _zone: Zone) {}

    fn on_death(&mut self) {}

    fn on_question_shown(
        &mut self,
        _slot: PlayerSlot,
        _question: &Question,
        _zone: Zone,
        _modifiers: &QuestionModifiers,
    ) {
    }

    fn on_answer_result(&mut self, _outcome: &AnswerOutcome) {}

    fn on_round_change(&mut self, _round: u32, _map_index: usize) {}

    fn on_pickup_spawned(&mut self, _kind: PowerUpKind, _pos: Vec2) {}

    fn on_pickup_collected(&mut self, _kind: PowerUpKind) {}

    fn on_match_over(&mut self, _outcome: MatchOutcome, _summaries: &[MatchSummary]) {}
}

/// Hooks that do nothing (headless runs, tests)
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHooks;

impl GameHooks for NoHooks {}
