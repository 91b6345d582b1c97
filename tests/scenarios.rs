use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use robolearn::sim::{
    AnswerOutcome, Candidate, Difficulty, GameHooks, MatchOutcome, MatchState, MatchSummary,
    PlayerSlot, PowerUpKind, Question, QuestionModifiers, QuestionPool, Zone,
};
use robolearn::{GameMode, Settings, Tuning};

/// Counts every hook call
#[derive(Default)]
struct Recorder {
    hits: u32,
    deaths: u32,
    shown: Vec<String>,
    results: Vec<AnswerOutcome>,
    match_over: Vec<MatchOutcome>,
}

impl GameHooks for Recorder {
    fn on_hit(&mut self, _slot: PlayerSlot, _zone: Zone) {
        self.hits += 1;
    }

    fn on_death(&mut self) {
        self.deaths += 1;
    }

    fn on_question_shown(
        &mut self,
        _slot: PlayerSlot,
        question: &Question,
        _zone: Zone,
        _modifiers: &QuestionModifiers,
    ) {
        self.shown.push(question.id.clone());
    }

    fn on_answer_result(&mut self, outcome: &AnswerOutcome) {
        self.results.push(outcome.clone());
    }

    fn on_match_over(&mut self, outcome: MatchOutcome, _summaries: &[MatchSummary]) {
        self.match_over.push(outcome);
    }
}

fn quiet_tuning() -> Tuning {
    let mut tuning = Tuning::default();
    tuning.drop_chance = 0.0;
    tuning.intro_countdown_secs = 0.0;
    tuning
}

fn mc_b(id: &str, difficulty: Difficulty) -> Question {
    Question::multiple_choice(
        id,
        difficulty,
        "Which is B?",
        [("A", "alpha"), ("B", "beta"), ("C", "gamma"), ("D", "delta")],
        "B",
    )
}

/// First enemy dies to a single head answer
fn fragile_enemy_tuning() -> Tuning {
    let mut tuning = quiet_tuning();
    tuning.enemy_base_health = 20;
    tuning
}

fn match_with(mode: GameMode, questions: Vec<Question>) -> MatchState {
    match_with_tuning(mode, quiet_tuning(), questions)
}

fn match_with_tuning(mode: GameMode, tuning: Tuning, questions: Vec<Question>) -> MatchState {
    MatchState::new(
        Settings::single("Tester", mode),
        tuning,
        QuestionPool::from_questions(questions),
    )
}

/// Answer the current question and let the result display finish
fn answer_and_clear(state: &mut MatchState, candidate: Candidate, hooks: &mut Recorder) -> AnswerOutcome {
    let outcome = state
        .submit_answer(PlayerSlot::One, candidate, hooks)
        .expect("question was awaiting");
    state.advance_question_timer(PlayerSlot::One, 5.0, hooks);
    outcome
}

#[test]
fn scenario_a_body_hit_correct_answer() {
    let mut hooks = Recorder::default();
    let mut state = match_with(GameMode::Normal, vec![mc_b("mc-1", Difficulty::Medium)]);

    assert!(state.hit_zone(PlayerSlot::One, Zone::Body, Vec2::ZERO, &mut hooks));
    assert_eq!(hooks.shown, vec!["mc-1"]);

    let outcome = state
        .submit_answer(PlayerSlot::One, Candidate::Choice("b".into()), &mut hooks)
        .unwrap();
    assert!(outcome.correct);
    assert_eq!(outcome.points, state.tuning.zones.body.points);
    assert_eq!(outcome.multiplier, 1.0);
    assert_eq!(state.players()[0].combo, 1);
    assert_eq!(state.players()[0].score, 100);
    assert_eq!(hooks.results, vec![outcome]);
}

#[test]
fn scenario_b_pool_exhaustion_resets() {
    let mut pool = QuestionPool::from_questions([
        Question::short_answer("e1", Difficulty::Easy, "1+1", "2"),
        Question::short_answer("e2", Difficulty::Easy, "2+2", "4"),
    ]);
    let mut rng = Pcg32::seed_from_u64(11);

    let first = pool.next_for_zone(Zone::Limb, &mut rng).unwrap().id;
    let second = pool.next_for_zone(Zone::Limb, &mut rng).unwrap().id;
    assert_ne!(first, second);

    let third = pool.next_for_zone(Zone::Limb, &mut rng).unwrap().id;
    assert!(third == first || third == second);
    assert_eq!(pool.reset_count(), 1);
}

#[test]
fn scenario_c_overkill_fires_death_once() {
    let mut hooks = Recorder::default();
    let mut state = match_with_tuning(
        GameMode::Normal,
        fragile_enemy_tuning(),
        vec![mc_b("h1", Difficulty::Hard)],
    );
    assert_eq!(state.wave().health, 20);
    let wave_before = state.wave().wave_index;

    state.hit_zone(PlayerSlot::One, Zone::Head, Vec2::ZERO, &mut hooks);
    let outcome = state
        .submit_answer(PlayerSlot::One, Candidate::Choice("B".into()), &mut hooks)
        .unwrap();

    assert!(outcome.enemy_defeated);
    assert_eq!(state.wave().health, 0);
    assert_eq!(hooks.deaths, 1);
    assert_eq!(state.wave().wave_index, wave_before + 1);
    // kill bonus on top of head points
    assert_eq!(state.players()[0].score, 150 + 200);
}

#[test]
fn scenario_c_versus_double_resolution_guarded() {
    let mut hooks = Recorder::default();
    let mut state = MatchState::new(
        Settings::versus("A", "B", GameMode::Normal),
        fragile_enemy_tuning(),
        QuestionPool::from_questions([mc_b("h1", Difficulty::Hard), mc_b("h2", Difficulty::Hard)]),
    );

    state.hit_zone(PlayerSlot::One, Zone::Head, Vec2::ZERO, &mut hooks);
    state.hit_zone(PlayerSlot::Two, Zone::Head, Vec2::ZERO, &mut hooks);
    let first = state
        .submit_answer(PlayerSlot::One, Candidate::Choice("B".into()), &mut hooks)
        .unwrap();
    let second = state
        .submit_answer(PlayerSlot::Two, Candidate::Choice("B".into()), &mut hooks)
        .unwrap();

    assert!(first.enemy_defeated);
    assert!(!second.enemy_defeated);
    assert_eq!(second.damage, 0);
    assert_eq!(hooks.deaths, 1);
    assert_eq!(state.wave().kills, 1);
    // both still score their answers; the versus bonus (210) is split
    assert_eq!(state.players()[0].score, 150 + 105);
    assert_eq!(state.players()[1].score, 150 + 105);
}

#[test]
fn scenario_d_third_wrong_answer_ends_match() {
    let mut hooks = Recorder::default();
    let questions = (0..3).map(|i| mc_b(&format!("q{i}"), Difficulty::Easy)).collect();
    let mut state = match_with(GameMode::Normal, questions);

    for round in 1..=3 {
        assert!(state.hit_zone(PlayerSlot::One, Zone::Limb, Vec2::ZERO, &mut hooks));
        let outcome = answer_and_clear(&mut state, Candidate::Choice("D".into()), &mut hooks);
        assert!(!outcome.correct);
        assert_eq!(outcome.match_over, round == 3);
    }

    assert_eq!(hooks.match_over, vec![MatchOutcome::Defeated]);
    assert!(state.is_over());
    assert_eq!(state.players()[0].wrong, 3);
    assert!(!state.hit_zone(PlayerSlot::One, Zone::Limb, Vec2::ZERO, &mut hooks));
}

#[test]
fn scenario_e_double_score_speed_and_combo_stack() {
    let mut hooks = Recorder::default();
    let mut state = match_with(
        GameMode::TimeAttack,
        vec![
            Question::short_answer("e1", Difficulty::Easy, "g?", "9.8"),
            Question::short_answer("e2", Difficulty::Easy, "g on Earth?", "9.8"),
        ],
    );
    // warm-up answer builds a combo of one
    state.hit_zone(PlayerSlot::One, Zone::Limb, Vec2::ZERO, &mut hooks);
    answer_and_clear(&mut state, Candidate::Text("9.8".into()), &mut hooks);
    assert_eq!(state.players()[0].combo, 1);

    state.collect_power_up(PowerUpKind::DoubleScore, &mut hooks);
    assert!((state.powerups().double_score_remaining() - 30.0).abs() < 1e-6);

    state.hit_zone(PlayerSlot::One, Zone::Limb, Vec2::ZERO, &mut hooks);
    // 4s of a 15s timer: past the 3s window, within 40%
    assert!(state
        .advance_question_timer(PlayerSlot::One, 4.0, &mut hooks)
        .is_none());
    let outcome = state
        .submit_answer(PlayerSlot::One, Candidate::Text("9,8".into()), &mut hooks)
        .unwrap();

    assert!(outcome.correct);
    assert_eq!(outcome.points, 180);
    assert_eq!(state.players()[0].combo, 2);
}

#[test]
fn fact_analysis_is_all_or_nothing() {
    let mut hooks = Recorder::default();
    let fa = Question::fact_analysis(
        "fa-1",
        Difficulty::Medium,
        "Water boils at 100C at sea level.",
        [
            ("A", "Boils at 100C", true),
            ("B", "Freezes at 10C", false),
            ("C", "Sea level matters", true),
            ("D", "Is a metal", false),
        ],
    );
    let mut state = match_with(GameMode::Normal, vec![fa]);
    state.hit_zone(PlayerSlot::One, Zone::Body, Vec2::ZERO, &mut hooks);

    let three_of_four =
        Candidate::facts([("A", true), ("B", false), ("C", true), ("D", true)]);
    let outcome = answer_and_clear(&mut state, three_of_four, &mut hooks);
    assert!(!outcome.correct);
    assert_eq!(state.players()[0].wrong, 1);
}

#[test]
fn shield_absorbs_exactly_one_wrong_answer() {
    let mut hooks = Recorder::default();
    let questions = (0..3).map(|i| mc_b(&format!("q{i}"), Difficulty::Easy)).collect();
    let mut state = match_with(GameMode::Normal, questions);
    state.collect_power_up(PowerUpKind::Shield, &mut hooks);

    state.hit_zone(PlayerSlot::One, Zone::Limb, Vec2::ZERO, &mut hooks);
    answer_and_clear(&mut state, Candidate::Choice("B".into()), &mut hooks);
    assert_eq!(state.players()[0].combo, 1);

    state.hit_zone(PlayerSlot::One, Zone::Limb, Vec2::ZERO, &mut hooks);
    let absorbed = answer_and_clear(&mut state, Candidate::Choice("A".into()), &mut hooks);
    assert!(absorbed.shielded);
    assert_eq!(state.players()[0].wrong, 0);
    assert_eq!(state.players()[0].combo, 1);

    state.hit_zone(PlayerSlot::One, Zone::Limb, Vec2::ZERO, &mut hooks);
    let normal = answer_and_clear(&mut state, Candidate::Choice("A".into()), &mut hooks);
    assert!(!normal.shielded);
    assert_eq!(state.players()[0].wrong, 1);
    assert_eq!(state.players()[0].combo, 0);
}

#[test]
fn summaries_report_history() {
    let mut hooks = Recorder::default();
    let questions = (0..2).map(|i| mc_b(&format!("q{i}"), Difficulty::Medium)).collect();
    let mut state = match_with(GameMode::Normal, questions);

    state.hit_zone(PlayerSlot::One, Zone::Body, Vec2::ZERO, &mut hooks);
    answer_and_clear(&mut state, Candidate::Choice("B".into()), &mut hooks);
    state.hit_zone(PlayerSlot::One, Zone::Body, Vec2::ZERO, &mut hooks);
    state.cancel_question(PlayerSlot::One);
    state.quit(&mut hooks);

    let summaries = state.summaries();
    assert_eq!(summaries.len(), 1);
    let summary = &summaries[0];
    assert_eq!(summary.name, "Tester");
    assert_eq!((summary.correct, summary.wrong, summary.answered), (1, 0, 1));
    assert_eq!(summary.max_combo, 1);
    assert_eq!(hooks.match_over, vec![MatchOutcome::Quit]);
    assert_eq!(hooks.hits, 2);
}
