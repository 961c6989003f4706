//! Follow-up question sets and the contract for reading them out of model text.
//!
//! The model is asked for a JSON list of strings, but replies drift: numbered
//! lists, bullet points, fenced blocks, a chatty preamble. Parsing therefore
//! runs in stages:
//!
//! 1. Strip a surrounding code fence.
//! 2. Take the string elements of a JSON array that stands on its own lines.
//!    Brackets inside a sentence or list item never count as the array.
//! 3. Otherwise read one question per line, dropping list markers and quotes.
//!    When any line ends in `?`, only those lines are kept.
//! 4. A blank reply means no questions. A non-blank reply that yields nothing
//!    is returned whole as a single question.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use super::json_block::{standalone_array, strip_code_fence};

// Matches "1.", "2)", "(3)", "-", "*", "•", "Q1:" list markers.
static LIST_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:[-*•+]\s+|\(?\d{1,3}[.):]\s*|[Qq]\d{1,3}[.):]\s*)").expect("list marker regex")
});

/// How a reply was turned into questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionSource {
    /// Reply was blank.
    Empty,
    /// Parsed from a JSON array.
    JsonArray,
    /// Parsed line by line.
    Lines,
    /// Nothing parsable; the raw reply is the single question.
    RawFallback,
}

/// Ordered follow-up questions. Every element is non-empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FollowUpQuestions(Vec<String>);

impl FollowUpQuestions {
    /// Parses a model reply, reporting which stage produced the result.
    pub fn parse_reply(reply: &str) -> (Self, QuestionSource) {
        let text = strip_code_fence(reply);
        if text.is_empty() {
            return (Self::default(), QuestionSource::Empty);
        }

        if let Some(questions) = from_json_array(text) {
            return (Self(questions), QuestionSource::JsonArray);
        }

        let lines = from_lines(text);
        if !lines.is_empty() {
            return (Self(lines), QuestionSource::Lines);
        }

        (Self(vec![reply.trim().to_string()]), QuestionSource::RawFallback)
    }

    /// Parses a model reply.
    pub fn from_reply(reply: &str) -> Self {
        Self::parse_reply(reply).0
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<String> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Renders the questions as a numbered list, one per line.
    pub fn to_numbered_list(&self) -> String {
        self.0
            .iter()
            .enumerate()
            .map(|(idx, q)| format!("{}. {}", idx + 1, q))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// `None` means "no usable JSON array"; `Some(vec![])` is an explicit `[]`.
fn from_json_array(text: &str) -> Option<Vec<String>> {
    let span = standalone_array(text)?;
    let values: Vec<serde_json::Value> = serde_json::from_str(span).ok()?;

    if values.is_empty() {
        return Some(Vec::new());
    }

    let questions: Vec<String> = values
        .iter()
        .filter_map(|v| match v {
            serde_json::Value::String(s) => Some(s.as_str()),
            serde_json::Value::Object(map) => map.get("question").and_then(|q| q.as_str()),
            _ => None,
        })
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();

    if questions.is_empty() {
        None
    } else {
        Some(questions)
    }
}

fn from_lines(text: &str) -> Vec<String> {
    let cleaned: Vec<String> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| !matches!(*line, "[" | "]" | "],"))
        .filter(|line| !line.starts_with("```"))
        .map(clean_line)
        .filter(|line| !line.is_empty())
        .collect();

    if cleaned.iter().any(|line| line.ends_with('?')) {
        cleaned.into_iter().filter(|line| line.ends_with('?')).collect()
    } else {
        cleaned
    }
}

fn clean_line(line: &str) -> String {
    let without_marker = LIST_MARKER.replace(line, "");
    without_marker
        .trim()
        .trim_end_matches(',')
        .trim_matches('"')
        .trim()
        .to_string()
}
