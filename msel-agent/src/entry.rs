//! Canonical feed entries
//!
//! A feed resolves to an ordered sequence of [`Record`]s. A completed entry
//! knows the true outcome of its sequence item; a pending entry only carries
//! what each candidate expects to happen next.

use crate::candidate::Candidate;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Opaque key of one item in the guessing sequence
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SequenceId(String);

impl SequenceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Accepts a JSON string or number; anything else is not an id
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(Self(s.clone())),
            Value::Number(n) => Some(Self(n.to_string())),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SequenceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Sequence item whose true outcome is known
#[derive(Debug, Clone, PartialEq)]
pub struct CompletedEntry {
    pub sequence_id: SequenceId,
    /// `None` when the feed reported the item as resolved but carried no outcome
    pub actual_outcome: Option<String>,
    /// Only candidates that predicted this item
    pub predictions: BTreeMap<Candidate, String>,
}

impl CompletedEntry {
    pub fn prediction(&self, candidate: Candidate) -> Option<&str> {
        self.predictions.get(&candidate).map(String::as_str)
    }
}

/// Sequence item awaiting resolution
#[derive(Debug, Clone, PartialEq)]
pub struct PendingEntry {
    pub sequence_id: SequenceId,
    pub predictions: BTreeMap<Candidate, String>,
    /// Confidence in [0, 1]
    pub confidence: BTreeMap<Candidate, f64>,
}

impl PendingEntry {
    pub fn prediction(&self, candidate: Candidate) -> Option<&str> {
        self.predictions.get(&candidate).map(String::as_str)
    }

    /// Confidence for `candidate`, 0.0 when the feed had none
    pub fn confidence(&self, candidate: Candidate) -> f64 {
        self.confidence.get(&candidate).copied().unwrap_or(0.0)
    }
}

/// One normalized feed record
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    Completed(CompletedEntry),
    Pending(PendingEntry),
}

impl Record {
    pub fn sequence_id(&self) -> &SequenceId {
        match self {
            Record::Completed(entry) => &entry.sequence_id,
            Record::Pending(entry) => &entry.sequence_id,
        }
    }
}

/// Render a JSON scalar as a label
///
/// Strings are taken as-is; numbers and booleans use their JSON text.
pub fn label_from_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Labels compare case-insensitively
pub fn labels_match(predicted: &str, actual: &str) -> bool {
    predicted == actual || predicted.to_lowercase() == actual.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sequence_id_from_string_and_number() {
        assert_eq!(
            SequenceId::from_value(&json!("20240101-0042")).unwrap().as_str(),
            "20240101-0042"
        );
        assert_eq!(SequenceId::from_value(&json!(42)).unwrap().as_str(), "42");
        assert!(SequenceId::from_value(&json!(null)).is_none());
        assert!(SequenceId::from_value(&json!({"id": 1})).is_none());
    }

    #[test]
    fn test_label_from_value() {
        assert_eq!(label_from_value(&json!("Big")), Some("Big".to_string()));
        assert_eq!(label_from_value(&json!(7)), Some("7".to_string()));
        assert_eq!(label_from_value(&json!(true)), Some("true".to_string()));
        assert_eq!(label_from_value(&json!(null)), None);
        assert_eq!(label_from_value(&json!(["big"])), None);
    }

    #[test]
    fn test_labels_match_ignores_case() {
        assert!(labels_match("big", "BIG"));
        assert!(labels_match("Small", "small"));
        assert!(!labels_match("big", "small"));
    }

    #[test]
    fn test_pending_confidence_defaults_to_zero() {
        let mut confidence = BTreeMap::new();
        confidence.insert(Candidate::Model1, 0.62);
        let entry = PendingEntry {
            sequence_id: SequenceId::new("7"),
            predictions: BTreeMap::new(),
            confidence,
        };
        assert_eq!(entry.confidence(Candidate::Model1), 0.62);
        assert_eq!(entry.confidence(Candidate::Model2), 0.0);
        assert_eq!(entry.prediction(Candidate::Model1), None);
    }
}
