//! Session scoring engine
//!
//! One cycle per player: zone hit → question served → answer (or timeout or
//! cancel) → consequence. Correct answers score and damage the shared enemy;
//! wrong answers cost lives unless a shield absorbs them.

use glam::Vec2;
use rand::seq::IndexedRandom;

use super::hooks::{AnswerOutcome, GameHooks, QuestionModifiers};
use super::powerup::PowerUpKind;
use super::question::{Candidate, Question, normalize_key};
use super::state::{
    AnswerRecord, MatchOutcome, MatchPhase, MatchState, PendingQuestion, PlayerSlot, QuestionPhase,
};
use super::validate;
use super::zone::Zone;
use crate::tuning::Tuning;

/// Absorbs float error before flooring (50 × 1.5 × 1.2 × 2.0 must be 180)
const POINTS_EPSILON: f64 = 1e-6;

/// Speed bonus from time spent on a question. Timeouts never earn a bonus.
pub fn speed_multiplier(elapsed: f32, timer_max: f32, timed_out: bool, tuning: &Tuning) -> f64 {
    if timed_out {
        1.0
    } else if elapsed <= tuning.speed_bonus_secs {
        tuning.fast_multiplier
    } else if elapsed <= timer_max * tuning.speed_bonus_fraction {
        tuning.quick_multiplier
    } else {
        1.0
    }
}

/// Combo multiplier: 1.0 at a streak of 1, +step per extra answer, capped
pub fn combo_multiplier(combo: u32, tuning: &Tuning) -> f64 {
    if combo <= 1 {
        return 1.0;
    }
    (1.0 + (combo - 1) as f64 * tuning.combo_step).min(tuning.combo_cap)
}

/// Floor of base points times the combined multiplier
pub fn final_points(base: u64, multiplier: f64) -> u64 {
    (base as f64 * multiplier + POINTS_EPSILON).floor().max(0.0) as u64
}

impl MatchState {
    /// A player's shot landed on `zone` at `point`. Serves a question and rolls
    /// for a power-up drop. Returns false when the hit is ignored: match not
    /// running, player busy, enemy between waves, or no questions loaded.
    pub fn hit_zone(
        &mut self,
        slot: PlayerSlot,
        zone: Zone,
        point: Vec2,
        hooks: &mut dyn GameHooks,
    ) -> bool {
        if self.phase != MatchPhase::Playing || !self.wave.is_engaged() {
            return false;
        }
        if !self.player(slot).is_some_and(|p| p.is_idle()) {
            return false;
        }

        hooks.on_hit(slot, zone);

        let Some(question) = self.pool.next_for_zone(zone, &mut self.rng) else {
            log::warn!("No questions loaded, hit on {} ignored", zone.as_str());
            return false;
        };

        let frozen = self.powerups.consume_slow_time();
        let hint_key = if self.powerups.consume_hint() {
            self.pick_hint(&question)
        } else {
            None
        };

        let timed = self.settings.mode.timed();
        let timer_max = if timed {
            self.tuning.timers.for_difficulty(question.difficulty)
        } else {
            self.tuning.timers.untimed
        };

        let modifiers = QuestionModifiers {
            timed,
            timer_secs: timer_max,
            slow_time: frozen,
            hint_key: hint_key.clone(),
        };
        log::debug!(
            "Player {} hit {}: question {} ({})",
            slot.number(),
            zone.as_str(),
            question.id,
            question.difficulty.as_str()
        );
        hooks.on_question_shown(slot, &question, zone, &modifiers);

        if let Some(pickup) = self.powerups.maybe_drop(point, &self.tuning, &mut self.rng) {
            let (kind, pos) = (pickup.kind, pickup.pos);
            log::debug!("Dropped {} at ({:.0}, {:.0})", kind.label(), pos.x, pos.y);
            hooks.on_pickup_spawned(kind, pos);
        }

        if let Some(player) = self.player_mut(slot) {
            player.pending = Some(PendingQuestion {
                question,
                zone,
                timer_max,
                timer: timer_max,
                frozen,
                hint_key,
                phase: QuestionPhase::Awaiting,
            });
        }
        true
    }

    /// One random incorrect option of a multiple-choice question
    fn pick_hint(&mut self, question: &Question) -> Option<String> {
        question
            .wrong_choice_keys()
            .choose(&mut self.rng)
            .map(|key| key.to_string())
    }

    /// Submit an answer to the player's awaiting question. Returns `None` when
    /// nothing is awaiting or the candidate is the option excluded by a hint.
    pub fn submit_answer(
        &mut self,
        slot: PlayerSlot,
        candidate: Candidate,
        hooks: &mut dyn GameHooks,
    ) -> Option<AnswerOutcome> {
        if self.phase != MatchPhase::Playing {
            return None;
        }
        let pending = self.player(slot)?.pending.as_ref()?;
        if !pending.is_awaiting() {
            return None;
        }

        if let (Some(hint), Candidate::Choice(given) | Candidate::Text(given)) =
            (&pending.hint_key, &candidate)
        {
            if normalize_key(given) == normalize_key(hint) {
                log::debug!("Player {} picked the hinted-out option", slot.number());
                return None;
            }
        }

        let correct = validate::check(&pending.question, &candidate);
        self.resolve(slot, correct, candidate.is_timeout(), hooks)
    }

    /// Apply the consequence of an answer and switch the question to its
    /// result display.
    fn resolve(
        &mut self,
        slot: PlayerSlot,
        correct: bool,
        timed_out: bool,
        hooks: &mut dyn GameHooks,
    ) -> Option<AnswerOutcome> {
        let versus = self.is_versus();
        let timed = self.settings.mode.timed();
        let double_active = self.powerups.double_score_active();

        let pending = self.player(slot)?.pending.as_ref()?;
        let zone = pending.zone;
        let speed = if timed {
            speed_multiplier(pending.elapsed(), pending.timer_max, timed_out, &self.tuning)
        } else {
            1.0
        };
        let mut record = AnswerRecord {
            question_id: pending.question.id.clone(),
            prompt: pending.question.prompt.clone(),
            kind: pending.question.kind,
            zone,
            correct,
            timed_out,
            points: 0,
        };

        let mut outcome = AnswerOutcome {
            slot,
            zone,
            correct,
            timed_out,
            shielded: false,
            points: 0,
            multiplier: 1.0,
            damage: 0,
            enemy_defeated: false,
            match_over: false,
        };

        if correct {
            let stats = self.tuning.zones.get(zone);
            let double = if double_active {
                self.tuning.double_score_multiplier
            } else {
                1.0
            };

            let combo_step = {
                let player = self.player_mut(slot)?;
                player.combo += 1;
                player.max_combo = player.max_combo.max(player.combo);
                player.correct += 1;
                player.combo
            };
            let multiplier = speed * double * combo_multiplier(combo_step, &self.tuning);
            let points = final_points(stats.points, multiplier);
            if let Some(player) = self.player_mut(slot) {
                player.score += points;
            }
            record.points = points;
            outcome.points = points;
            outcome.multiplier = multiplier;

            if self.wave.is_engaged() {
                outcome.damage = stats.damage;
                outcome.enemy_defeated = self.wave.apply_damage(stats.damage);
            }
            if outcome.enemy_defeated {
                hooks.on_death();
                let advance = self.wave.advance(&self.tuning, versus);
                self.award_kill_bonus(slot, advance.bonus);
                if advance.round_changed {
                    hooks.on_round_change(advance.round, advance.map_index);
                }
            }
        } else if self.powerups.consume_shield() {
            log::debug!("Shield absorbed player {}'s wrong answer", slot.number());
            outcome.shielded = true;
        } else {
            let player_wrong = {
                let player = self.player_mut(slot)?;
                player.combo = 0;
                player.wrong += 1;
                player.wrong
            };
            let wrong = if versus { self.total_wrong() } else { player_wrong };
            outcome.match_over = wrong >= self.tuning.max_wrong_answers;
        }

        let display_secs = self.tuning.result_display_secs;
        if let Some(player) = self.player_mut(slot) {
            player.history.push(record);
            if let Some(pending) = player.pending.as_mut() {
                pending.phase = QuestionPhase::Resolved {
                    correct,
                    display_secs,
                };
            }
        }

        hooks.on_answer_result(&outcome);
        if outcome.match_over {
            self.end_match(MatchOutcome::Defeated, hooks);
        }
        Some(outcome)
    }

    /// Single player: the whole bonus to the killer. Versus: half to each.
    fn award_kill_bonus(&mut self, slot: PlayerSlot, bonus: u64) {
        if self.is_versus() {
            let half = bonus / 2;
            for player in &mut self.players {
                player.score += half;
            }
        } else if let Some(player) = self.player_mut(slot) {
            player.score += bonus;
        }
    }

    /// Count down the player's question timer, or the result display once
    /// answered. Returns the outcome when the timer runs out.
    pub fn advance_question_timer(
        &mut self,
        slot: PlayerSlot,
        dt: f32,
        hooks: &mut dyn GameHooks,
    ) -> Option<AnswerOutcome> {
        if self.phase != MatchPhase::Playing {
            return None;
        }
        let player = self.players.get_mut(slot.index())?;
        let pending = player.pending.as_mut()?;
        match pending.phase {
            QuestionPhase::Awaiting => {
                if !pending.frozen {
                    pending.timer = (pending.timer - dt).max(0.0);
                }
                if pending.timer > 0.0 {
                    return None;
                }
            }
            QuestionPhase::Resolved {
                correct,
                display_secs,
            } => {
                let display_secs = display_secs - dt;
                if display_secs <= 0.0 {
                    player.pending = None;
                } else {
                    pending.phase = QuestionPhase::Resolved {
                        correct,
                        display_secs,
                    };
                }
                return None;
            }
        }

        log::debug!("Player {} ran out of time", slot.number());
        self.resolve(slot, false, true, hooks)
    }

    /// Dismiss an awaiting question without any consequence. The question
    /// stays consumed.
    pub fn cancel_question(&mut self, slot: PlayerSlot) -> bool {
        let Some(player) = self.player_mut(slot) else {
            return false;
        };
        if !player.is_awaiting() {
            return false;
        }
        player.pending = None;
        log::debug!("Player {} cancelled the question", slot.number());
        true
    }

    /// Click at `point`: collects the pickup under it unless someone is
    /// answering.
    pub fn click_pickup(&mut self, point: Vec2, hooks: &mut dyn GameHooks) -> Option<PowerUpKind> {
        if self.phase != MatchPhase::Playing || self.any_awaiting() {
            return None;
        }
        let kind = self
            .powerups
            .take_at(point, self.tuning.pickup_collect_radius)?;
        self.collect_power_up(kind, hooks);
        Some(kind)
    }

    /// Grant a power-up effect
    pub fn collect_power_up(&mut self, kind: PowerUpKind, hooks: &mut dyn GameHooks) {
        match kind {
            PowerUpKind::Heal => self.apply_heal(),
            other => self.powerups.collect(other, &self.tuning),
        }
        log::info!("Collected {}", kind.label());
        hooks.on_pickup_collected(kind);
    }

    /// Remove one wrong answer. Versus: from the player with more wrong
    /// answers, ties go to player two.
    fn apply_heal(&mut self) {
        let target = match self.players.as_slice() {
            [p1, p2] if p1.wrong + p2.wrong > 0 => {
                if p2.wrong >= p1.wrong {
                    PlayerSlot::Two
                } else {
                    PlayerSlot::One
                }
            }
            [_, _] => return,
            _ => PlayerSlot::One,
        };
        if let Some(player) = self.player_mut(target) {
            player.wrong = player.wrong.saturating_sub(1);
        }
    }

    /// Leave the match early
    pub fn quit(&mut self, hooks: &mut dyn GameHooks) {
        self.end_match(MatchOutcome::Quit, hooks);
    }

    /// Finish the match once; later calls are ignored
    pub fn end_match(&mut self, outcome: MatchOutcome, hooks: &mut dyn GameHooks) {
        if self.is_over() {
            return;
        }
        self.phase = MatchPhase::Over;
        self.outcome = Some(outcome);
        self.ended_at = Some(chrono::Utc::now());

        let summaries = self.summaries();
        for summary in &summaries {
            log::info!(
                "Match over ({:?}): {} scored {} ({} correct, {} wrong, best combo {})",
                outcome,
                summary.name,
                summary.score,
                summary.correct,
                summary.wrong,
                summary.max_combo
            );
        }
        hooks.on_match_over(outcome, &summaries);
    }
}
