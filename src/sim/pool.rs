//! Question pool
//!
//! Two-level state: questions partitioned by difficulty tier, plus the set of
//! ids consumed since the last reset. A draw never returns a consumed id; when
//! every tier is exhausted the consumed set is cleared and drawing resumes.

use std::collections::HashSet;
use std::path::Path;

use rand::Rng;
use rand::seq::IndexedRandom;
use serde::Serialize;

use super::question::{Difficulty, Question, QuestionFile, QuestionRecord};
use super::zone::Zone;
use crate::error::LoadError;
use crate::persistence;

/// Pick a random question from `tier` whose id is not in `excluding`
pub fn draw<'a, R: Rng + ?Sized>(
    tier: &'a [Question],
    excluding: &HashSet<String>,
    rng: &mut R,
) -> Option<&'a Question> {
    let available: Vec<&Question> = tier
        .iter()
        .filter(|q| !excluding.contains(&q.id))
        .collect();
    available.choose(rng).copied()
}

/// Read one question source. Invalid records are skipped and logged;
/// an unreadable or unparsable source is an error.
pub fn load_source(path: &Path) -> Result<Vec<Question>, LoadError> {
    let file: QuestionFile = persistence::read_json(path).map_err(|source| LoadError::Source {
        path: path.display().to_string(),
        source,
    })?;

    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "questions".to_string());

    let mut questions = Vec::with_capacity(file.questions.len());
    for (index, value) in file.questions.into_iter().enumerate() {
        let fallback_id = format!("{stem}-{index}");
        let parsed = serde_json::from_value::<QuestionRecord>(value)
            .map_err(|err| LoadError::invalid(&fallback_id, err.to_string()))
            .and_then(|record| record.into_question(fallback_id.clone()));
        match parsed {
            Ok(question) => questions.push(question),
            Err(err) => log::warn!("Skipping record in {}: {}", path.display(), err),
        }
    }
    Ok(questions)
}

/// Remaining/total counts for one tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TierStats {
    pub total: usize,
    pub remaining: usize,
}

/// Pool usage snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PoolStats {
    pub total: usize,
    pub used: usize,
    pub remaining: usize,
    /// Indexed by `Difficulty::index()`
    pub by_difficulty: [TierStats; 3],
}

/// Session question pool
#[derive(Debug, Clone, Default)]
pub struct QuestionPool {
    /// Questions by difficulty, indexed by `Difficulty::index()`
    tiers: [Vec<Question>; 3],
    consumed: HashSet<String>,
    resets: u32,
}

impl QuestionPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_questions(questions: impl IntoIterator<Item = Question>) -> Self {
        let mut pool = Self::new();
        pool.rebuild(questions);
        pool
    }

    /// Load every source, skipping the ones that fail. Replaces the current
    /// contents and clears the consumed set. Returns the number of questions.
    pub fn load<P: AsRef<Path>>(&mut self, paths: &[P]) -> usize {
        let mut all = Vec::new();
        for path in paths {
            let path = path.as_ref();
            match load_source(path) {
                Ok(questions) => {
                    log::info!("Loaded {} questions from {}", questions.len(), path.display());
                    all.extend(questions);
                }
                Err(err) => log::warn!("Skipping question source: {}", err),
            }
        }
        self.rebuild(all);
        self.len()
    }

    fn rebuild(&mut self, questions: impl IntoIterator<Item = Question>) {
        self.tiers = Default::default();
        self.consumed.clear();

        let mut seen = HashSet::new();
        for question in questions {
            if !seen.insert(question.id.clone()) {
                log::warn!("Duplicate question id {}, keeping the first", question.id);
                continue;
            }
            self.tiers[question.difficulty.index()].push(question);
        }
    }

    /// Serve a fresh question for a zone: its own tier first, then the other
    /// tiers (hard, medium, easy), then reset and try again.
    /// Returns `None` only when nothing was ever loaded.
    pub fn next_for_zone<R: Rng + ?Sized>(&mut self, zone: Zone, rng: &mut R) -> Option<Question> {
        if self.is_empty() {
            return None;
        }

        let target = zone.difficulty();
        if let Some(question) = self.draw_with_fallback(target, rng) {
            return Some(question);
        }

        self.reset();
        self.draw_with_fallback(target, rng)
    }

    fn draw_with_fallback<R: Rng + ?Sized>(
        &mut self,
        target: Difficulty,
        rng: &mut R,
    ) -> Option<Question> {
        let order = std::iter::once(target).chain(
            Difficulty::FALLBACK_ORDER
                .into_iter()
                .filter(move |d| *d != target),
        );
        for difficulty in order {
            if let Some(question) = self.draw_from(difficulty, rng) {
                return Some(question);
            }
        }
        None
    }

    fn draw_from<R: Rng + ?Sized>(&mut self, difficulty: Difficulty, rng: &mut R) -> Option<Question> {
        let question = draw(&self.tiers[difficulty.index()], &self.consumed, rng)?.clone();
        self.consumed.insert(question.id.clone());
        Some(question)
    }

    /// Make every loaded question available again
    pub fn reset(&mut self) {
        self.consumed.clear();
        self.resets += 1;
        log::info!("Question pool exhausted, resetting ({} questions)", self.len());
    }

    pub fn is_consumed(&self, id: &str) -> bool {
        self.consumed.contains(id)
    }

    /// Number of resets since load
    pub fn reset_count(&self) -> u32 {
        self.resets
    }

    pub fn len(&self) -> usize {
        self.tiers.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn has_questions(&self) -> bool {
        !self.is_empty()
    }

    pub fn tier(&self, difficulty: Difficulty) -> &[Question] {
        &self.tiers[difficulty.index()]
    }

    pub fn stats(&self) -> PoolStats {
        let by_difficulty = Difficulty::ALL.map(|d| {
            let tier = self.tier(d);
            TierStats {
                total: tier.len(),
                remaining: tier.iter().filter(|q| !self.is_consumed(&q.id)).count(),
            }
        });
        let total = self.len();
        let remaining = by_difficulty.iter().map(|t| t.remaining).sum();
        PoolStats {
            total,
            used: total - remaining,
            remaining,
            by_difficulty,
        }
    }
}
