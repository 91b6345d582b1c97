//! Frame driver
//!
//! Advances the match by one frame, applying input in a fixed order so that
//! replays with the same seed and inputs are identical.

use glam::Vec2;

use super::hooks::GameHooks;
use super::question::Candidate;
use super::state::{MatchPhase, MatchState, PlayerSlot};
use super::zone::ZoneHitTest;

/// One player's input for a frame
#[derive(Debug, Clone, Default)]
pub struct PlayerInput {
    /// Crosshair fired at this screen point
    pub shot: Option<Vec2>,
    /// Answer to the pending question
    pub answer: Option<Candidate>,
    /// Dismiss the pending question
    pub cancel: bool,
}

/// Input commands for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Indexed by `PlayerSlot::index()`
    pub players: [PlayerInput; 2],
    /// Mouse click, used to collect pickups
    pub click: Option<Vec2>,
    pub quit: bool,
}

impl TickInput {
    pub fn player_mut(&mut self, slot: PlayerSlot) -> &mut PlayerInput {
        &mut self.players[slot.index()]
    }
}

/// Advance the match by `dt` seconds.
///
/// Order: quit, intro countdown, power-up timers, enemy respawn, then for each
/// player cancel → answer → question timer → shot, then pickup clicks.
pub fn tick(
    state: &mut MatchState,
    input: &TickInput,
    dt: f32,
    hitbox: &dyn ZoneHitTest,
    hooks: &mut dyn GameHooks,
) {
    if state.is_over() {
        return;
    }
    state.time_ticks += 1;

    if input.quit {
        state.quit(hooks);
        return;
    }

    if state.phase == MatchPhase::Intro {
        state.intro_secs -= dt;
        if state.intro_secs > 0.0 {
            return;
        }
        state.intro_secs = 0.0;
        state.phase = MatchPhase::Playing;
        log::info!("Go!");
    }

    state.powerups.update(dt);
    if state.wave.update(dt, &state.tuning) {
        log::debug!("Enemy {} ready", state.wave.enemy_serial);
    }

    for slot in PlayerSlot::ALL.into_iter().take(state.players.len()) {
        let player_input = &input.players[slot.index()];

        if player_input.cancel {
            state.cancel_question(slot);
        }
        if let Some(answer) = &player_input.answer {
            state.submit_answer(slot, answer.clone(), hooks);
        }
        state.advance_question_timer(slot, dt, hooks);
        if let Some(point) = player_input.shot {
            if let Some(zone) = hitbox.zone_for_point(point) {
                state.hit_zone(slot, zone, point, hooks);
            }
        }

        if state.is_over() {
            return;
        }
    }

    if let Some(point) = input.click {
        state.click_pickup(point, hooks);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{GameMode, Settings};
    use crate::sim::hooks::NoHooks;
    use crate::sim::pool::QuestionPool;
    use crate::sim::question::{Difficulty, Question};
    use crate::sim::state::MatchOutcome;
    use crate::sim::zone::{RobotHitbox, Zone};
    use crate::tuning::Tuning;

    const DT: f32 = 1.0 / 60.0;

    fn questions() -> Vec<Question> {
        (0..6)
            .map(|i| Question::short_answer(format!("q{i}"), Difficulty::ALL[i % 3], "1+1?", "2"))
            .collect()
    }

    fn state(mode: GameMode) -> MatchState {
        let mut tuning = Tuning::default();
        tuning.drop_chance = 0.0;
        MatchState::new(
            Settings::single("P1", mode),
            tuning,
            QuestionPool::from_questions(questions()),
        )
    }

    fn shoot(zone: Zone, hitbox: &RobotHitbox) -> TickInput {
        let mut input = TickInput::default();
        input.players[0].shot = Some(hitbox.aim_point(zone));
        input
    }

    #[test]
    fn test_intro_blocks_input() {
        let hitbox = RobotHitbox::default();
        let mut state = state(GameMode::TimeAttack);
        tick(&mut state, &shoot(Zone::Head, &hitbox), DT, &hitbox, &mut NoHooks);
        assert_eq!(state.phase, MatchPhase::Intro);
        assert!(state.players[0].is_idle());

        for _ in 0..180 {
            tick(&mut state, &TickInput::default(), DT, &hitbox, &mut NoHooks);
        }
        assert_eq!(state.phase, MatchPhase::Playing);
        tick(&mut state, &shoot(Zone::Head, &hitbox), DT, &hitbox, &mut NoHooks);
        assert!(state.players[0].is_awaiting());
    }

    #[test]
    fn test_shot_then_answer() {
        let hitbox = RobotHitbox::default();
        let mut state = state(GameMode::Normal);
        tick(&mut state, &shoot(Zone::Limb, &hitbox), DT, &hitbox, &mut NoHooks);
        assert!(state.players[0].is_awaiting());

        let mut input = TickInput::default();
        input.player_mut(PlayerSlot::One).answer = Some(Candidate::Text("2".into()));
        tick(&mut state, &input, DT, &hitbox, &mut NoHooks);
        assert_eq!(state.players[0].correct, 1);
        assert_eq!(state.players[0].score, 50);
        assert_eq!(state.time_ticks, 2);
    }

    #[test]
    fn test_missed_shot_does_nothing() {
        let hitbox = RobotHitbox::default();
        let mut state = state(GameMode::Normal);
        let mut input = TickInput::default();
        input.players[0].shot = Some(Vec2::new(-500.0, -500.0));
        tick(&mut state, &input, DT, &hitbox, &mut NoHooks);
        assert!(state.players[0].is_idle());
    }

    #[test]
    fn test_quit_stops_the_match() {
        let hitbox = RobotHitbox::default();
        let mut state = state(GameMode::Normal);
        let input = TickInput {
            quit: true,
            ..Default::default()
        };
        tick(&mut state, &input, DT, &hitbox, &mut NoHooks);
        assert_eq!(state.outcome, Some(MatchOutcome::Quit));
        let ticks = state.time_ticks;
        tick(&mut state, &TickInput::default(), DT, &hitbox, &mut NoHooks);
        assert_eq!(state.time_ticks, ticks);
    }

    #[test]
    fn test_respawn_gap_ignores_hits() {
        let hitbox = RobotHitbox::default();
        let mut state = state(GameMode::Normal);
        state.tuning.result_display_secs = 0.5;
        state.wave.health = 1;
        tick(&mut state, &shoot(Zone::Head, &hitbox), DT, &hitbox, &mut NoHooks);
        let mut input = TickInput::default();
        input.players[0].answer = Some(Candidate::Text("2".into()));
        tick(&mut state, &input, DT, &hitbox, &mut NoHooks);
        assert_eq!(state.wave.kills, 1);
        assert!(!state.wave.is_engaged());

        // finish the result display, then shoot during the respawn gap
        for _ in 0..20 {
            tick(&mut state, &TickInput::default(), 0.05, &hitbox, &mut NoHooks);
        }
        assert!(state.players[0].is_idle());
        tick(&mut state, &shoot(Zone::Body, &hitbox), DT, &hitbox, &mut NoHooks);
        assert!(state.players[0].is_idle());

        for _ in 0..20 {
            tick(&mut state, &TickInput::default(), 0.05, &hitbox, &mut NoHooks);
        }
        assert!(state.wave.is_engaged());
        tick(&mut state, &shoot(Zone::Body, &hitbox), DT, &hitbox, &mut NoHooks);
        assert!(state.players[0].is_awaiting());
    }

    #[test]
    fn test_same_seed_same_run() {
        let hitbox = RobotHitbox::default();
        let run = || {
            let mut state = state(GameMode::Normal);
            let mut served = Vec::new();
            for _ in 0..5 {
                tick(&mut state, &shoot(Zone::Body, &hitbox), DT, &hitbox, &mut NoHooks);
                if let Some(p) = &state.players[0].pending {
                    served.push(p.question.id.clone());
                }
                state.cancel_question(PlayerSlot::One);
            }
            served
        };
        assert_eq!(run(), run());
    }
}
