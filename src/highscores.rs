//! Ranking table
//!
//! Persisted as JSON, keeps the top 100 match results.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::PersistError;
use crate::persistence;
use crate::sim::MatchSummary;

/// Maximum number of ranking entries to keep
pub const MAX_HIGH_SCORES: usize = 100;

/// Display format for entry dates
const DATE_FORMAT: &str = "%d/%m/%Y %H:%M";

/// A single ranking entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingEntry {
    pub name: String,
    pub score: u64,
    pub correct: u32,
    pub wrong: u32,
    /// Questions answered
    pub total: u32,
    pub max_combo: u32,
    pub timestamp: DateTime<Utc>,
}

impl From<&MatchSummary> for RankingEntry {
    fn from(summary: &MatchSummary) -> Self {
        Self {
            name: summary.name.clone(),
            score: summary.score,
            correct: summary.correct,
            wrong: summary.wrong,
            total: summary.answered,
            max_combo: summary.max_combo,
            timestamp: summary.timestamp,
        }
    }
}

/// Ranking table, sorted descending by score
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    #[serde(rename = "rankings", default)]
    pub entries: Vec<RankingEntry>,
}

impl HighScores {
    /// Create empty ranking
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score would make the table
    pub fn qualifies(&self, score: u64) -> bool {
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        // Must beat the lowest entry; ties keep the older one
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Get the rank a score would achieve (1-indexed, None if doesn't qualify)
    pub fn potential_rank(&self, score: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Insert an entry after every entry with an equal or higher score.
    /// Returns the rank achieved (1-indexed) or None if it didn't qualify.
    pub fn add(&mut self, entry: RankingEntry) -> Option<usize> {
        if !self.qualifies(entry.score) {
            return None;
        }

        let pos = self.entries.iter().position(|e| entry.score > e.score);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };

        self.entries.truncate(MAX_HIGH_SCORES);

        Some(rank)
    }

    pub fn add_summary(&mut self, summary: &MatchSummary) -> Option<usize> {
        self.add(RankingEntry::from(summary))
    }

    /// Best `n` entries
    pub fn top(&self, n: usize) -> &[RankingEntry] {
        &self.entries[..n.min(self.entries.len())]
    }

    /// Best entry for a player name (case-insensitive)
    pub fn player_best(&self, name: &str) -> Option<&RankingEntry> {
        let name = name.trim().to_lowercase();
        self.entries
            .iter()
            .find(|e| e.name.trim().to_lowercase() == name)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    pub fn load(path: &Path) -> Result<Self, PersistError> {
        let mut scores: HighScores = persistence::read_json(path)?;
        // Files edited by hand may be unsorted; stable sort keeps tie order
        scores.entries.sort_by(|a, b| b.score.cmp(&a.score));
        scores.entries.truncate(MAX_HIGH_SCORES);
        Ok(scores)
    }

    /// Load the ranking, starting fresh if the file is missing or unreadable
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(scores) => {
                log::info!("Loaded {} ranking entries", scores.entries.len());
                scores
            }
            Err(err) if err.is_missing() => {
                log::info!("No ranking found, starting fresh");
                Self::new()
            }
            Err(err) => {
                log::warn!("Could not read ranking {}: {}", path.display(), err);
                Self::new()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), PersistError> {
        persistence::write_json(path, self)?;
        log::info!("Ranking saved ({} entries)", self.entries.len());
        Ok(())
    }
}

/// Format an entry timestamp for display
pub fn format_date(timestamp: &DateTime<Utc>) -> String {
    timestamp.format(DATE_FORMAT).to_string()
}
