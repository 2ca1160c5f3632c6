//! Prediction report rendering
//!
//! The layout is meant for people reading the published file; nothing parses
//! it back. Rendering is pure, so an unchanged feed and state render the same
//! bytes every cycle.

use crate::candidate::Roster;
use crate::entry::{CompletedEntry, PendingEntry};
use crate::selector::{CandidateResult, EvaluationReport, SelectorState};

/// Shown when the active model has no prediction for the pending issue
pub const UNKNOWN_PREDICTION: &str = "UNKNOWN";

/// One evaluation line
pub fn render_result(result: &CandidateResult) -> String {
    format!(
        "{} -> PRED: {} | ACTUAL: {} | RESULT: {} | ACCURACY: {:.2}%",
        result.candidate.name().to_uppercase(),
        result.predicted.to_uppercase(),
        result.actual.to_uppercase(),
        result.outcome.label(),
        result.accuracy * 100.0
    )
}

/// Full report for one cycle
///
/// `state` must already reflect this cycle's selection.
pub fn render(
    completed: &CompletedEntry,
    pending: &PendingEntry,
    report: &EvaluationReport,
    state: &SelectorState,
    roster: &Roster,
) -> String {
    let active = state.active_candidate;
    let prediction = pending
        .prediction(active)
        .map(str::to_uppercase)
        .unwrap_or_else(|| UNKNOWN_PREDICTION.to_string());
    let confidence = pending.confidence(active);
    let accuracy = roster.accuracy(active).unwrap_or(0.0) * 100.0;

    let evaluation = if report.is_empty() {
        "No evaluable predictions".to_string()
    } else {
        report
            .results
            .iter()
            .map(render_result)
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        "PREDICTION REPORT\n\
         ISSUE: {completed_id}\n\
         \n\
         LAST RESULT EVALUATION:\n\
         {evaluation}\n\
         \n\
         NEXT PREDICTION\n\
         ISSUE: {pending_id}\n\
         USING: {model}\n\
         PREDICTION: {prediction}\n\
         CONFIDENCE: {confidence:.2} | ACCURACY: {accuracy:.2}%\n\
         MODE: {mode}\n",
        completed_id = completed.sequence_id,
        pending_id = pending.sequence_id,
        model = active.name().to_uppercase(),
        mode = if state.auto_switching { "AUTO" } else { "MANUAL" },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidate::Candidate;
    use crate::entry::SequenceId;
    use crate::selector::score;
    use std::collections::BTreeMap;

    fn completed() -> CompletedEntry {
        let mut predictions = BTreeMap::new();
        predictions.insert(Candidate::Model1, "small".to_string());
        predictions.insert(Candidate::Model2, "big".to_string());
        CompletedEntry {
            sequence_id: SequenceId::new("20240101-0100"),
            actual_outcome: Some("small".to_string()),
            predictions,
        }
    }

    fn pending() -> PendingEntry {
        let mut predictions = BTreeMap::new();
        predictions.insert(Candidate::Model1, "big".to_string());
        let mut confidence = BTreeMap::new();
        confidence.insert(Candidate::Model1, 0.735);
        PendingEntry {
            sequence_id: SequenceId::new("20240101-0101"),
            predictions,
            confidence,
        }
    }

    #[test]
    fn test_render_full_report() {
        let roster = Roster::default();
        let report = score(&roster, &completed());
        let state = SelectorState::new(Candidate::Model1, true);

        let text = render(&completed(), &pending(), &report, &state, &roster);

        let expected = "PREDICTION REPORT\n\
                        ISSUE: 20240101-0100\n\
                        \n\
                        LAST RESULT EVALUATION:\n\
                        MODEL 1 -> PRED: SMALL | ACTUAL: SMALL | RESULT: WIN | ACCURACY: 49.28%\n\
                        MODEL 2 -> PRED: BIG | ACTUAL: SMALL | RESULT: LOSS | ACCURACY: 49.32%\n\
                        \n\
                        NEXT PREDICTION\n\
                        ISSUE: 20240101-0101\n\
                        USING: MODEL 1\n\
                        PREDICTION: BIG\n\
                        CONFIDENCE: 0.73 | ACCURACY: 49.28%\n\
                        MODE: AUTO\n";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_render_unknown_prediction_for_silent_model() {
        let roster = Roster::default();
        let state = SelectorState::new(Candidate::Model4, false);

        let text = render(
            &completed(),
            &pending(),
            &EvaluationReport::default(),
            &state,
            &roster,
        );

        assert!(text.contains("No evaluable predictions"));
        assert!(text.contains("USING: MODEL 4"));
        assert!(text.contains("PREDICTION: UNKNOWN"));
        assert!(text.contains("CONFIDENCE: 0.00 | ACCURACY: 49.74%"));
        assert!(text.contains("MODE: MANUAL"));
    }

    #[test]
    fn test_render_is_deterministic() {
        let roster = Roster::default();
        let report = score(&roster, &completed());
        let state = SelectorState::new(Candidate::Model2, true);

        let first = render(&completed(), &pending(), &report, &state, &roster);
        let second = render(&completed(), &pending(), &report, &state, &roster);
        assert_eq!(first, second);
    }
}
