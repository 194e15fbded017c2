//! Trigger evaluation for expansion branches.
//!
//! Rule conditions arrive as free-text fragments ("YES", "OFTEN/ALWAYS",
//! ">7 hours"). They are classified once, at rule-ingestion time, into a
//! closed set of kinds; answer-time evaluation only matches on the tagged
//! variant and never re-parses text. Anything the classifier cannot place
//! becomes [`Condition::Unrecognized`] and evaluates to false.
//!
//! Classification is substring matching with first-match-wins ordering:
//! "ANY YES", then "YES", then "OFTEN"/"ALWAYS", then a ">" threshold.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A concrete answer value flowing through the evaluator.
///
/// Untagged so JSON artifacts carry numbers as numbers and everything else
/// as strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseValue {
    Integer(i64),
    Number(f64),
    Text(String),
}

impl ResponseValue {
    /// Numeric view of the response; text parses on a best-effort basis.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            ResponseValue::Integer(n) => Some(*n as f64),
            ResponseValue::Number(n) => Some(*n),
            ResponseValue::Text(t) => t.trim().parse().ok(),
        }
    }

    /// Text view of the response; numbers have none.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ResponseValue::Text(t) => Some(t),
            _ => None,
        }
    }
}

impl fmt::Display for ResponseValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseValue::Integer(n) => write!(f, "{n}"),
            ResponseValue::Number(n) => write!(f, "{n}"),
            ResponseValue::Text(t) => f.write_str(t),
        }
    }
}

impl From<&str> for ResponseValue {
    fn from(value: &str) -> Self {
        ResponseValue::Text(value.to_string())
    }
}

impl From<String> for ResponseValue {
    fn from(value: String) -> Self {
        ResponseValue::Text(value)
    }
}

impl From<f64> for ResponseValue {
    fn from(value: f64) -> Self {
        ResponseValue::Number(value)
    }
}

impl From<i64> for ResponseValue {
    fn from(value: i64) -> Self {
        ResponseValue::Integer(value)
    }
}

/// A classified trigger condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Condition {
    /// Response must equal a literal, e.g. "Yes".
    Equals { value: String },
    /// Response must be one of a set of literals, e.g. Often/Always.
    InSet { values: Vec<String> },
    /// Numeric response must exceed a threshold.
    GreaterThan { threshold: f64 },
    /// Classification failed; always evaluates false.
    Unrecognized,
}

impl Condition {
    /// Classify a free-text condition fragment.
    ///
    /// Matching is case-insensitive, first match wins. A ">" fragment whose
    /// threshold cannot be parsed also lands on `Unrecognized`.
    pub fn parse(text: &str) -> Self {
        let upper = text.to_uppercase();

        if upper.contains("ANY YES") || upper.contains("YES") {
            return Condition::Equals {
                value: "Yes".to_string(),
            };
        }

        if upper.contains("OFTEN") || upper.contains("ALWAYS") {
            return Condition::InSet {
                values: vec!["Often".to_string(), "Always".to_string()],
            };
        }

        if let Some(idx) = upper.find('>') {
            match parse_threshold(&upper[idx + 1..]) {
                Some(threshold) => return Condition::GreaterThan { threshold },
                None => return Condition::Unrecognized,
            }
        }

        Condition::Unrecognized
    }

    /// Decide whether a concrete answer activates the branch.
    pub fn evaluate(&self, response: &ResponseValue) -> bool {
        match self {
            Condition::Equals { value } => response.as_text() == Some(value.as_str()),
            Condition::InSet { values } => response
                .as_text()
                .map(|t| values.iter().any(|v| v == t))
                .unwrap_or(false),
            Condition::GreaterThan { threshold } => response
                .as_number()
                .map(|n| n > *threshold)
                .unwrap_or(false),
            Condition::Unrecognized => false,
        }
    }
}

/// Parse the numeric threshold following a ">".
///
/// The fragment may carry trailing units ("7 hours", "17 in"); the word
/// "in" is stripped and the first numeric token wins.
fn parse_threshold(fragment: &str) -> Option<f64> {
    fragment
        .split_whitespace()
        .filter(|tok| !tok.eq_ignore_ascii_case("in"))
        .find_map(|tok| {
            let trimmed =
                tok.trim_matches(|c: char| !(c.is_ascii_digit() || c == '.' || c == '-'));
            if trimmed.is_empty() {
                None
            } else {
                trimmed.parse().ok()
            }
        })
}

/// Parse-then-evaluate convenience for one-shot checks.
pub fn evaluate(condition: &str, response: &ResponseValue) -> bool {
    Condition::parse(condition).evaluate(response)
}
