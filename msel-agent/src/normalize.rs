//! Feed document normalization
//!
//! Two document shapes are accepted:
//!
//! 1. The structured classifier report, an object with an `evaluation` section
//!    (last resolved issue, with every model's prediction and the true class)
//!    and a `next_issue_prediction` section (next issue, with every model's
//!    prediction and a percentage confidence such as `"73.5%"`).
//! 2. A JSON array of already-normalized records:
//!    `{"issue": .., "actual": .., "predictions": {"Model 1": ..}}` for resolved
//!    issues and `{"issue": .., "predictions": {..}, "confidence": {..}}` for
//!    the pending one.
//!
//! Normalization never fails. Anything that does not fit yields fewer records.

use crate::candidate::Candidate;
use crate::entry::{label_from_value, CompletedEntry, PendingEntry, Record, SequenceId};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

const EVALUATION_KEY: &str = "evaluation";
const NEXT_PREDICTION_KEY: &str = "next_issue_prediction";

/// One section of the structured report
#[derive(Debug, Deserialize)]
struct RawSection {
    issue_id: Value,
    #[serde(default)]
    models: Vec<Value>,
}

/// One model line inside a section
#[derive(Debug, Default, Deserialize)]
struct RawModel {
    #[serde(default)]
    name: Value,
    #[serde(default)]
    predicted_class: Value,
    #[serde(default)]
    actual_class: Value,
    #[serde(default)]
    confidence: Value,
}

impl RawModel {
    fn candidate(&self) -> Option<Candidate> {
        self.name.as_str().and_then(Candidate::from_source_name)
    }
}

/// Normalize a parsed feed document into ordered records
pub fn normalize(document: &Value) -> Vec<Record> {
    match document {
        Value::Object(obj)
            if obj.contains_key(EVALUATION_KEY) && obj.contains_key(NEXT_PREDICTION_KEY) =>
        {
            let mut records = Vec::with_capacity(2);
            if let Some(completed) = completed_from_section(&obj[EVALUATION_KEY]) {
                records.push(Record::Completed(completed));
            }
            if let Some(pending) = pending_from_section(&obj[NEXT_PREDICTION_KEY]) {
                records.push(Record::Pending(pending));
            }
            records
        }
        Value::Array(items) => items.iter().filter_map(parse_normalized_record).collect(),
        _ => Vec::new(),
    }
}

/// Percentage string to a fraction in [0, 1]
///
/// `"73.5%"` becomes 0.735. Anything unparsable becomes 0.0.
pub fn parse_confidence(raw: &str) -> f64 {
    raw.trim()
        .trim_matches('%')
        .trim()
        .parse::<f64>()
        .map(|percent| sanitize_fraction(percent / 100.0))
        .unwrap_or(0.0)
}

fn sanitize_fraction(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

fn parse_section(value: &Value) -> Option<(SequenceId, Vec<RawModel>)> {
    let section = RawSection::deserialize(value).ok()?;
    let sequence_id = SequenceId::from_value(&section.issue_id)?;
    // A model line of the wrong shape still occupies its position
    let models = section
        .models
        .iter()
        .map(|m| RawModel::deserialize(m).unwrap_or_default())
        .collect();
    Some((sequence_id, models))
}

fn completed_from_section(section: &Value) -> Option<CompletedEntry> {
    let (sequence_id, models) = parse_section(section)?;

    // Every model reports the same true class; the first one is authoritative
    let actual_outcome = models.first().and_then(|m| label_from_value(&m.actual_class));

    let predictions = models
        .iter()
        .filter_map(|m| Some((m.candidate()?, label_from_value(&m.predicted_class)?)))
        .collect();

    Some(CompletedEntry {
        sequence_id,
        actual_outcome,
        predictions,
    })
}

fn pending_from_section(section: &Value) -> Option<PendingEntry> {
    let (sequence_id, models) = parse_section(section)?;

    let mut predictions = BTreeMap::new();
    let mut confidence = BTreeMap::new();
    for model in &models {
        let Some(candidate) = model.candidate() else {
            continue;
        };
        if let Some(label) = label_from_value(&model.predicted_class) {
            predictions.insert(candidate, label);
        }
        let value = match &model.confidence {
            Value::String(s) => parse_confidence(s),
            Value::Number(n) => n.as_f64().map(|p| sanitize_fraction(p / 100.0)).unwrap_or(0.0),
            _ => 0.0,
        };
        confidence.insert(candidate, value);
    }

    Some(PendingEntry {
        sequence_id,
        predictions,
        confidence,
    })
}

/// Parse one element of an already-normalized record array
fn parse_normalized_record(value: &Value) -> Option<Record> {
    let obj = value.as_object()?;
    let sequence_id = SequenceId::from_value(obj.get("issue")?)?;
    let predictions = candidate_map(obj.get("predictions"), label_from_value);

    // Presence of the key decides the shape, even when its value is null
    if let Some(actual) = obj.get("actual") {
        return Some(Record::Completed(CompletedEntry {
            sequence_id,
            actual_outcome: label_from_value(actual),
            predictions,
        }));
    }

    // Normalized confidences are already fractions
    let confidence = candidate_map(obj.get("confidence"), |v| {
        Some(match v {
            Value::Number(n) => n.as_f64().map(sanitize_fraction).unwrap_or(0.0),
            Value::String(s) => parse_confidence(s),
            _ => 0.0,
        })
    });

    Some(Record::Pending(PendingEntry {
        sequence_id,
        predictions,
        confidence,
    }))
}

fn candidate_map<T>(
    value: Option<&Value>,
    convert: impl Fn(&Value) -> Option<T>,
) -> BTreeMap<Candidate, T> {
    let empty = Map::new();
    let obj = value.and_then(Value::as_object).unwrap_or(&empty);
    obj.iter()
        .filter_map(|(name, v)| Some((name.parse::<Candidate>().ok()?, convert(v)?)))
        .collect()
}
