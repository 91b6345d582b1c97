//! Answer checking
//!
//! `check` is total: any candidate shape is accepted and anything that does not
//! fit the question kind is simply incorrect.

use std::collections::BTreeMap;

use super::question::{AnswerKey, Candidate, Question, QuestionKind, normalize_key};

/// Tolerance used when the canonical number has no decimals
const INTEGER_TOLERANCE: f64 = 0.01;
/// Absorbs float representation error at the tolerance boundary
const TOLERANCE_EPSILON: f64 = 1e-9;

/// Decide whether `candidate` answers `question` correctly
pub fn check(question: &Question, candidate: &Candidate) -> bool {
    if candidate.is_timeout() {
        return false;
    }

    match (question.kind, &question.answer, candidate) {
        (QuestionKind::MultipleChoice, AnswerKey::Choice(key), Candidate::Choice(given))
        | (QuestionKind::MultipleChoice, AnswerKey::Choice(key), Candidate::Text(given)) => {
            normalize_key(given) == normalize_key(key)
        }
        (QuestionKind::ShortAnswer, AnswerKey::Text(canonical), Candidate::Text(given)) => {
            short_answer_matches(given, canonical)
        }
        (QuestionKind::FactAnalysis, AnswerKey::Facts(expected), Candidate::Facts(given)) => {
            facts_match(expected, given)
        }
        _ => false,
    }
}

/// Parse a free-text number: comma decimal separator, trailing units stripped
pub fn normalize_number(text: &str) -> Option<f64> {
    let text = text.trim().replace(',', ".");
    let numeric = strip_units(&text);
    if numeric.is_empty() {
        return None;
    }
    numeric.parse::<f64>().ok().filter(|n| n.is_finite())
}

fn strip_units(text: &str) -> &str {
    text.trim_end_matches(|c: char| c.is_alphabetic() || c == '%' || c == '°')
        .trim()
}

/// Allowed distance from the canonical number, from its significant decimals.
/// Trailing zeros do not count: "2.50" is as precise as "2.5".
pub fn tolerance_for(canonical: &str) -> f64 {
    let canonical = canonical.trim().replace(',', ".");
    match strip_units(&canonical).split_once('.') {
        Some((_, fraction)) => {
            let digits_end = fraction
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(fraction.len());
            let decimals = fraction[..digits_end].trim_end_matches('0').len() as i32;
            0.5 * 10f64.powi(-decimals) + TOLERANCE_EPSILON
        }
        None => INTEGER_TOLERANCE + TOLERANCE_EPSILON,
    }
}

fn short_answer_matches(given: &str, canonical: &str) -> bool {
    match (normalize_number(given), normalize_number(canonical)) {
        (Some(given_num), Some(canonical_num)) => {
            (given_num - canonical_num).abs() <= tolerance_for(canonical)
        }
        _ => given.trim().to_lowercase() == canonical.trim().to_lowercase(),
    }
}

fn facts_match(expected: &BTreeMap<String, bool>, given: &BTreeMap<String, bool>) -> bool {
    let given: BTreeMap<String, bool> = given
        .iter()
        .map(|(k, v)| (normalize_key(k), *v))
        .collect();
    expected
        .iter()
        .all(|(key, truth)| given.get(key) == Some(truth))
}
