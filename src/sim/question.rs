//! Question records and answer candidates
//!
//! A question is immutable once loaded. Its answer key is a tagged union
//! keyed by the question kind, so answer checking never inspects JSON shapes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::consts::{CHOICE_COUNT, TIMEOUT_SENTINEL};
use crate::error::LoadError;

/// Difficulty tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Order in which other tiers are tried when a tier runs dry
    pub const FALLBACK_ORDER: [Difficulty; 3] =
        [Difficulty::Hard, Difficulty::Medium, Difficulty::Easy];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    /// Parse a difficulty label; anything unrecognised is treated as medium
    pub fn parse_lenient(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "easy" => Difficulty::Easy,
            "hard" => Difficulty::Hard,
            _ => Difficulty::Medium,
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Difficulty::Easy => 0,
            Difficulty::Medium => 1,
            Difficulty::Hard => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    MultipleChoice,
    ShortAnswer,
    FactAnalysis,
}

impl QuestionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionKind::MultipleChoice => "multiple_choice",
            QuestionKind::ShortAnswer => "short_answer",
            QuestionKind::FactAnalysis => "fact_analysis",
        }
    }
}

/// What counts as a correct answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AnswerKey {
    /// Multiple choice: the single correct option key
    Choice(String),
    /// Short answer: canonical text (often a number)
    Text(String),
    /// Fact analysis: truth value of every statement
    Facts(BTreeMap<String, bool>),
}

/// A loaded question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub kind: QuestionKind,
    pub difficulty: Difficulty,
    pub prompt: String,
    /// Option key → option text (empty for short answer)
    pub choices: BTreeMap<String, String>,
    pub answer: AnswerKey,
    /// Supporting text, used by fact analysis
    pub passage: Option<String>,
}

/// Normalise an option key: trimmed, uppercase
pub fn normalize_key(key: &str) -> String {
    key.trim().to_uppercase()
}

fn keyed<'a, V: Clone + 'a>(pairs: impl IntoIterator<Item = (&'a str, V)>) -> BTreeMap<String, V> {
    pairs
        .into_iter()
        .map(|(k, v)| (normalize_key(k), v))
        .collect()
}

impl Question {
    pub fn multiple_choice(
        id: impl Into<String>,
        difficulty: Difficulty,
        prompt: impl Into<String>,
        choices: [(&str, &str); CHOICE_COUNT],
        answer: &str,
    ) -> Self {
        Self {
            id: id.into(),
            kind: QuestionKind::MultipleChoice,
            difficulty,
            prompt: prompt.into(),
            choices: keyed(choices.map(|(k, v)| (k, v.to_string()))),
            answer: AnswerKey::Choice(normalize_key(answer)),
            passage: None,
        }
    }

    pub fn short_answer(
        id: impl Into<String>,
        difficulty: Difficulty,
        prompt: impl Into<String>,
        answer: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            kind: QuestionKind::ShortAnswer,
            difficulty,
            prompt: prompt.into(),
            choices: BTreeMap::new(),
            answer: AnswerKey::Text(answer.into()),
            passage: None,
        }
    }

    pub fn fact_analysis(
        id: impl Into<String>,
        difficulty: Difficulty,
        passage: impl Into<String>,
        statements: [(&str, &str, bool); CHOICE_COUNT],
    ) -> Self {
        Self {
            id: id.into(),
            kind: QuestionKind::FactAnalysis,
            difficulty,
            prompt: String::new(),
            choices: keyed(statements.map(|(k, text, _)| (k, text.to_string()))),
            answer: AnswerKey::Facts(keyed(statements.map(|(k, _, truth)| (k, truth)))),
            passage: Some(passage.into()),
        }
    }

    /// Check the data-model invariants
    pub fn validate(&self) -> Result<(), LoadError> {
        if self.id.trim().is_empty() {
            return Err(LoadError::invalid("<unnamed>", "empty id"));
        }
        match (self.kind, &self.answer) {
            (QuestionKind::MultipleChoice, AnswerKey::Choice(key)) => {
                self.require_four_choices()?;
                if !self.choices.contains_key(key) {
                    return Err(LoadError::invalid(
                        &self.id,
                        format!("answer {key} is not one of the choices"),
                    ));
                }
            }
            (QuestionKind::ShortAnswer, AnswerKey::Text(text)) => {
                if text.trim().is_empty() {
                    return Err(LoadError::invalid(&self.id, "empty answer"));
                }
            }
            (QuestionKind::FactAnalysis, AnswerKey::Facts(facts)) => {
                self.require_four_choices()?;
                if !facts.keys().eq(self.choices.keys()) {
                    return Err(LoadError::invalid(
                        &self.id,
                        "answer keys do not match statement keys",
                    ));
                }
            }
            (kind, _) => {
                return Err(LoadError::invalid(
                    &self.id,
                    format!("answer shape does not fit {}", kind.as_str()),
                ));
            }
        }
        Ok(())
    }

    fn require_four_choices(&self) -> Result<(), LoadError> {
        if self.choices.len() != CHOICE_COUNT {
            return Err(LoadError::invalid(
                &self.id,
                format!("expected {CHOICE_COUNT} choices, found {}", self.choices.len()),
            ));
        }
        Ok(())
    }

    /// Option keys that are not the correct answer (multiple choice only)
    pub fn wrong_choice_keys(&self) -> Vec<&str> {
        match &self.answer {
            AnswerKey::Choice(correct) => self
                .choices
                .keys()
                .filter(|k| *k != correct)
                .map(String::as_str)
                .collect(),
            _ => Vec::new(),
        }
    }
}

/// A player's submitted answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Candidate {
    /// An option key (multiple choice)
    Choice(String),
    /// Typed text (short answer)
    Text(String),
    /// True/false per statement (fact analysis)
    Facts(BTreeMap<String, bool>),
    /// The question timer ran out
    Timeout,
}

impl Candidate {
    pub fn is_timeout(&self) -> bool {
        match self {
            Candidate::Timeout => true,
            Candidate::Choice(s) | Candidate::Text(s) => s == TIMEOUT_SENTINEL,
            Candidate::Facts(_) => false,
        }
    }

    /// The candidate that answers a question correctly
    pub fn correct_for(question: &Question) -> Self {
        match &question.answer {
            AnswerKey::Choice(key) => Candidate::Choice(key.clone()),
            AnswerKey::Text(text) => Candidate::Text(text.clone()),
            AnswerKey::Facts(facts) => Candidate::Facts(facts.clone()),
        }
    }

    pub fn facts<'a>(pairs: impl IntoIterator<Item = (&'a str, bool)>) -> Self {
        Candidate::Facts(keyed(pairs))
    }
}

// ---------------------------------------------------------------------------
// JSON source format
// ---------------------------------------------------------------------------

/// A question source document: `{ "questions": [ ... ] }`
#[derive(Debug, Default, Deserialize)]
pub struct QuestionFile {
    #[serde(default)]
    pub questions: Vec<serde_json::Value>,
}

/// One question record as stored on disk
#[derive(Debug, Deserialize)]
pub struct QuestionRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    #[serde(default)]
    pub difficulty: Option<String>,
    #[serde(rename = "question", default)]
    pub prompt: String,
    #[serde(default)]
    pub choices: BTreeMap<String, String>,
    pub answer: serde_json::Value,
    #[serde(default)]
    pub passage: Option<String>,
}

impl QuestionRecord {
    /// Convert a raw record into a validated question.
    /// `fallback_id` is used when the record carries no id.
    pub fn into_question(self, fallback_id: String) -> Result<Question, LoadError> {
        let id = self
            .id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or(fallback_id);

        let answer = match self.kind {
            QuestionKind::MultipleChoice => match &self.answer {
                serde_json::Value::String(key) => AnswerKey::Choice(normalize_key(key)),
                _ => return Err(LoadError::invalid(&id, "multiple choice answer must be a key")),
            },
            QuestionKind::ShortAnswer => match &self.answer {
                serde_json::Value::String(text) => AnswerKey::Text(text.trim().to_string()),
                serde_json::Value::Number(n) => AnswerKey::Text(n.to_string()),
                _ => return Err(LoadError::invalid(&id, "short answer must be text")),
            },
            QuestionKind::FactAnalysis => {
                let serde_json::Value::Object(map) = &self.answer else {
                    return Err(LoadError::invalid(&id, "fact analysis answer must be a map"));
                };
                let mut facts = BTreeMap::new();
                for (key, value) in map {
                    let Some(truth) = value.as_bool() else {
                        return Err(LoadError::invalid(&id, format!("statement {key} is not a boolean")));
                    };
                    facts.insert(normalize_key(key), truth);
                }
                AnswerKey::Facts(facts)
            }
        };

        let question = Question {
            id,
            kind: self.kind,
            difficulty: self
                .difficulty
                .as_deref()
                .map(Difficulty::parse_lenient)
                .unwrap_or(Difficulty::Medium),
            prompt: self.prompt,
            choices: self
                .choices
                .into_iter()
                .map(|(k, v)| (normalize_key(&k), v))
                .collect(),
            answer,
            passage: self.passage.filter(|p| !p.trim().is_empty()),
        };
        question.validate()?;
        Ok(question)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: serde_json::Value) -> Result<Question, LoadError> {
        let record: QuestionRecord = serde_json::from_value(value).unwrap();
        record.into_question("fallback-0".to_string())
    }

    #[test]
    fn test_multiple_choice_record() {
        let q = record(json!({
            "id": "q1",
            "type": "multiple_choice",
            "difficulty": "easy",
            "question": "Capital of Vietnam?",
            "choices": {"a": "Ha Noi", "B": "Hue", "C": "Da Nang", "D": "Can Tho"},
            "answer": "a",
            "passage": ""
        }))
        .unwrap();
        assert_eq!(q.kind, QuestionKind::MultipleChoice);
        assert_eq!(q.difficulty, Difficulty::Easy);
        assert_eq!(q.answer, AnswerKey::Choice("A".into()));
        assert!(q.choices.contains_key("A"));
        assert_eq!(q.passage, None);
        assert_eq!(q.wrong_choice_keys(), vec!["B", "C", "D"]);
    }

    #[test]
    fn test_missing_id_and_unknown_difficulty() {
        let q = record(json!({
            "type": "short_answer",
            "difficulty": "legendary",
            "question": "2 + 2?",
            "answer": 4
        }))
        .unwrap();
        assert_eq!(q.id, "fallback-0");
        assert_eq!(q.difficulty, Difficulty::Medium);
        assert_eq!(q.answer, AnswerKey::Text("4".into()));
    }

    #[test]
    fn test_fact_analysis_keys_must_cover_statements() {
        let err = record(json!({
            "id": "fa",
            "type": "fact_analysis",
            "passage": "Water boils at 100C at sea level.",
            "choices": {"A": "s1", "B": "s2", "C": "s3", "D": "s4"},
            "answer": {"A": true, "B": false, "C": true}
        }))
        .unwrap_err();
        assert!(matches!(err, LoadError::InvalidQuestion { .. }));
    }

    #[test]
    fn test_multiple_choice_needs_four_options() {
        let err = record(json!({
            "id": "mc3",
            "type": "multiple_choice",
            "choices": {"A": "x", "B": "y", "C": "z"},
            "answer": "A"
        }))
        .unwrap_err();
        assert!(err.to_string().contains("expected 4 choices"));
    }

    #[test]
    fn test_answer_outside_choices_rejected() {
        let err = record(json!({
            "id": "mc",
            "type": "multiple_choice",
            "choices": {"A": "x", "B": "y", "C": "z", "D": "w"},
            "answer": "E"
        }))
        .unwrap_err();
        assert!(err.to_string().contains("not one of the choices"));
    }

    #[test]
    fn test_builders_validate() {
        let mc = Question::multiple_choice(
            "m",
            Difficulty::Medium,
            "pick",
            [("A", "1"), ("B", "2"), ("C", "3"), ("D", "4")],
            "b",
        );
        assert!(mc.validate().is_ok());

        let fa = Question::fact_analysis(
            "f",
            Difficulty::Hard,
            "passage",
            [("A", "s", true), ("B", "s", false), ("C", "s", true), ("D", "s", false)],
        );
        assert!(fa.validate().is_ok());
        assert_eq!(
            Candidate::correct_for(&fa),
            Candidate::facts([("a", true), ("b", false), ("c", true), ("d", false)])
        );
    }

    #[test]
    fn test_timeout_sentinel() {
        assert!(Candidate::Timeout.is_timeout());
        assert!(Candidate::Text(TIMEOUT_SENTINEL.into()).is_timeout());
        assert!(!Candidate::Choice("A".into()).is_timeout());
    }
}
