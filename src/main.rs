//! RoboLearn headless entry point
//!
//! Loads question sources, plays an automated demo match through the same
//! fixed-timestep `tick` a renderer would drive, then records the result in
//! the ranking.
//!
//! Usage: `robolearn [--versus] [--time-attack] [--mode=M] [--players=P] [--seed=N] <questions.json>...`

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use glam::Vec2;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use robolearn::consts::*;
use robolearn::highscores::format_date;
use robolearn::sim::{
    AnswerKey, AnswerOutcome, Candidate, GameHooks, MatchOutcome, MatchState, MatchSummary,
    PendingQuestion, PlayerSlot, PowerUpKind, Question, QuestionModifiers, QuestionPool,
    RobotHitbox, TickInput, Winner, Zone, tick,
};
use robolearn::{GameMode, HighScores, PlayerMode, Settings, Tuning};

/// Simulated seconds before the demo gives up and quits
const DEMO_TIME_LIMIT_SECS: f32 = 300.0;
/// Share of questions the demo bot answers correctly
const DEMO_ACCURACY: f64 = 0.75;

/// Logs every presentation event
struct LogHooks;

impl GameHooks for LogHooks {
    fn on_question_shown(
        &mut self,
        slot: PlayerSlot,
        question: &Question,
        zone: Zone,
        modifiers: &QuestionModifiers,
    ) {
        log::info!(
            "P{} hit {} -> [{}] {}{}{}",
            slot.number(),
            zone.as_str(),
            question.difficulty.as_str(),
            question.prompt,
            if modifiers.slow_time { " (timer frozen)" } else { "" },
            modifiers
                .hint_key
                .as_deref()
                .map(|k| format!(" (hint: not {k})"))
                .unwrap_or_default()
        );
    }

    fn on_answer_result(&mut self, outcome: &AnswerOutcome) {
        let verdict = match (outcome.correct, outcome.shielded, outcome.timed_out) {
            (true, _, _) => "correct",
            (false, true, _) => "wrong, shield absorbed it",
            (false, false, true) => "time up",
            (false, false, false) => "wrong",
        };
        log::info!(
            "P{} {}: +{} pts (x{:.2}), {} dmg",
            outcome.slot.number(),
            verdict,
            outcome.points,
            outcome.multiplier,
            outcome.damage
        );
    }

    fn on_death(&mut self) {
        log::info!("Robot destroyed!");
    }

    fn on_round_change(&mut self, round: u32, map_index: usize) {
        log::info!("Round {} (map #{})", round + 1, map_index);
    }

    fn on_pickup_spawned(&mut self, kind: PowerUpKind, pos: Vec2) {
        log::info!("{} dropped at ({:.0}, {:.0})", kind.label(), pos.x, pos.y);
    }

    fn on_pickup_collected(&mut self, kind: PowerUpKind) {
        log::info!("Picked up {}", kind.label());
    }

    fn on_match_over(&mut self, outcome: MatchOutcome, summaries: &[MatchSummary]) {
        log::info!("Match over: {:?} ({} players)", outcome, summaries.len());
    }
}

/// Plays the match: shoots random zones, thinks a little, answers mostly right
struct DemoBot {
    rng: Pcg32,
    accuracy: f64,
    think_secs: [f32; MAX_PLAYERS],
    shot_cooldown: [f32; MAX_PLAYERS],
}

impl DemoBot {
    fn new(seed: u64, accuracy: f64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed ^ 0xB07),
            accuracy,
            think_secs: [0.0; MAX_PLAYERS],
            shot_cooldown: [0.0; MAX_PLAYERS],
        }
    }

    fn input(&mut self, state: &MatchState, hitbox: &RobotHitbox, dt: f32) -> TickInput {
        let mut input = TickInput::default();

        for player in state.players() {
            let i = player.slot.index();
            match &player.pending {
                None => {
                    self.shot_cooldown[i] -= dt;
                    if self.shot_cooldown[i] <= 0.0 && state.wave().is_engaged() {
                        let zone = Zone::ALL.choose(&mut self.rng).copied().unwrap_or(Zone::Body);
                        input.players[i].shot = Some(hitbox.aim_point(zone));
                        self.shot_cooldown[i] = self.rng.random_range(0.3..1.0);
                        self.think_secs[i] = self.rng.random_range(1.0..6.0);
                    }
                }
                Some(pending) if pending.is_awaiting() => {
                    self.think_secs[i] -= dt;
                    if self.think_secs[i] <= 0.0 {
                        input.players[i].answer = Some(self.answer(pending));
                    }
                }
                Some(_) => {}
            }
        }

        if !state.any_awaiting() {
            input.click = state.powerups().pickups().first().map(|p| p.pos);
        }
        input
    }

    fn answer(&mut self, pending: &PendingQuestion) -> Candidate {
        let question = &pending.question;
        if self.rng.random_bool(self.accuracy) {
            return Candidate::correct_for(question);
        }
        match &question.answer {
            AnswerKey::Choice(_) => {
                let keys: Vec<&str> = question
                    .wrong_choice_keys()
                    .into_iter()
                    .filter(|k| pending.hint_key.as_deref() != Some(*k))
                    .collect();
                keys.choose(&mut self.rng)
                    .map(|k| Candidate::Choice(k.to_string()))
                    .unwrap_or(Candidate::Timeout)
            }
            AnswerKey::Text(_) => Candidate::Text("?".to_string()),
            AnswerKey::Facts(facts) => {
                Candidate::Facts(facts.iter().map(|(k, v)| (k.clone(), !v)).collect())
            }
        }
    }
}

fn parse_args(settings: &mut Settings) -> Vec<PathBuf> {
    let mut sources = Vec::new();
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--versus" => {
                settings.players = PlayerMode::Versus;
            }
            "--time-attack" => settings.mode = GameMode::TimeAttack,
            _ => {
                if let Some(seed) = arg.strip_prefix("--seed=") {
                    match seed.parse() {
                        Ok(seed) => settings.seed = seed,
                        Err(_) => log::warn!("Ignoring bad seed {seed:?}"),
                    }
                } else if let Some(mode) = arg.strip_prefix("--mode=") {
                    match mode.parse::<GameMode>() {
                        Ok(mode) => settings.mode = mode,
                        Err(err) => log::warn!("Ignoring {err}"),
                    }
                } else if let Some(players) = arg.strip_prefix("--players=") {
                    match players.parse::<PlayerMode>() {
                        Ok(players) => settings.players = players,
                        Err(err) => log::warn!("Ignoring {err}"),
                    }
                } else {
                    sources.push(PathBuf::from(arg));
                }
            }
        }
    }
    sources
}

fn print_results(state: &MatchState, rankings: &[Option<usize>], previous_best: Option<u64>) {
    println!();
    println!(
        "=== {} ===",
        match state.outcome {
            Some(MatchOutcome::Defeated) => "DEFEATED",
            Some(MatchOutcome::Quit) | None => "TIME UP",
        }
    );
    let wave = state.wave();
    println!(
        "Waves cleared: {}, round {}, map {}, last enemy at {:.0}% health",
        wave.kills,
        wave.round + 1,
        wave.map_name(&state.tuning),
        wave.health_ratio() * 100.0
    );
    for (summary, rank) in state.summaries().iter().zip(rankings) {
        println!(
            "{:<12} {:>7} pts  {:>3} correct  {:>2} wrong  {:>3} answered  best combo {:>2}  {}{}",
            summary.name,
            summary.score,
            summary.correct,
            summary.wrong,
            summary.answered,
            summary.max_combo,
            format_date(&summary.timestamp),
            rank.map(|r| format!("  rank #{r}")).unwrap_or_default()
        );
    }
    match state.winner() {
        Some(Winner::Player(slot)) => println!("Winner: player {}", slot.number()),
        Some(Winner::Draw) => println!("Draw!"),
        None => {}
    }
    if let Some(best) = previous_best {
        println!("Previous best: {best} pts");
    }
    let stats = state.pool().stats();
    println!(
        "Questions used: {}/{} ({} resets)",
        stats.used,
        stats.total,
        state.pool().reset_count()
    );
}

fn main() -> ExitCode {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("RoboLearn (headless) starting...");

    let tuning = Tuning::load_or_default(Path::new(TUNING_FILE));
    let mut settings = Settings::load_or_default(Path::new(SETTINGS_FILE));
    let sources = parse_args(&mut settings);

    let mut pool = QuestionPool::new();
    if pool.load(&sources) == 0 {
        log::error!("No questions loaded; pass at least one question file");
        return ExitCode::FAILURE;
    }

    let hitbox = RobotHitbox::default();
    let mut bot = DemoBot::new(settings.seed, DEMO_ACCURACY);
    let mut hooks = LogHooks;
    let mut state = MatchState::new(settings, tuning, pool);

    let mut elapsed = 0.0;
    while !state.is_over() {
        if elapsed >= DEMO_TIME_LIMIT_SECS {
            log::info!("Demo time limit reached");
            state.quit(&mut hooks);
            break;
        }
        let input = bot.input(&state, &hitbox, SIM_DT);
        tick(&mut state, &input, SIM_DT, &hitbox, &mut hooks);
        elapsed += SIM_DT;
    }

    let ranking_path = Path::new(RANKING_FILE);
    let mut scores = HighScores::load_or_default(ranking_path);
    let previous_best = scores.top_score();
    let rankings: Vec<Option<usize>> = state
        .summaries()
        .iter()
        .map(|summary| scores.add_summary(summary))
        .collect();
    if let Err(err) = scores.save(ranking_path) {
        log::error!("Could not save ranking: {}", err);
    }

    print_results(&state, &rankings, previous_best);
    ExitCode::SUCCESS
}
