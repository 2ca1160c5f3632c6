//! Model selection
//!
//! Scores every candidate against the most recent completed entry and applies
//! the auto-switch policy:
//!
//! - the active model lost: switch to the highest-accuracy model (other than
//!   the active one) that won this cycle
//! - nobody else won: fall back to the highest-accuracy model overall
//! - the active model won, or had nothing to score: keep it
//! - auto-switching disabled: the manual model is never replaced
//!
//! Missing data never fails; a candidate without a prediction (or an entry
//! without an outcome) is simply left out of the cycle.

use crate::candidate::{Candidate, Roster};
use crate::entry::{labels_match, CompletedEntry};
use msel_common::{AgentEvent, EventLog};
use tracing::debug;

/// Selection state carried from cycle to cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectorState {
    /// Model whose prediction is published
    pub active_candidate: Candidate,
    pub auto_switching: bool,
}

impl SelectorState {
    pub fn new(active_candidate: Candidate, auto_switching: bool) -> Self {
        Self {
            active_candidate,
            auto_switching,
        }
    }
}

/// Result of one prediction against the true outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Win,
    Loss,
}

impl Outcome {
    pub fn is_win(&self) -> bool {
        matches!(self, Outcome::Win)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Win => "WIN",
            Outcome::Loss => "LOSS",
        }
    }
}

/// One scored candidate
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateResult {
    pub candidate: Candidate,
    pub predicted: String,
    pub actual: String,
    pub outcome: Outcome,
    /// Static accuracy from the roster
    pub accuracy: f64,
}

/// Scored candidates for one completed entry, in roster order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EvaluationReport {
    pub results: Vec<CandidateResult>,
}

impl EvaluationReport {
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Outcome for `candidate`, `None` if it was not scored
    pub fn outcome_of(&self, candidate: Candidate) -> Option<Outcome> {
        self.results
            .iter()
            .find(|r| r.candidate == candidate)
            .map(|r| r.outcome)
    }
}

/// What the selector did with the active model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchDecision {
    /// Active model won or was not scored
    Kept,
    /// Active model lost; another winner took over
    Switched { from: Candidate, to: Candidate },
    /// Active model lost and nobody else won; best model overall selected
    FellBack { from: Candidate, to: Candidate },
    /// Auto-switching disabled
    Manual { model: Candidate },
}

impl SwitchDecision {
    fn event(&self) -> Option<AgentEvent> {
        match self {
            SwitchDecision::Kept => None,
            SwitchDecision::Switched { from, to } => Some(AgentEvent::AutoSwitched {
                from: from.to_string(),
                to: to.to_string(),
            }),
            SwitchDecision::FellBack { from, to } if from == to => {
                Some(AgentEvent::BestModelKept {
                    model: to.to_string(),
                })
            }
            SwitchDecision::FellBack { from, to } => Some(AgentEvent::FallbackSelected {
                from: from.to_string(),
                to: to.to_string(),
            }),
            SwitchDecision::Manual { model } => Some(AgentEvent::ManualMode {
                model: model.to_string(),
            }),
        }
    }
}

/// Score every roster candidate that predicted a resolved outcome
pub fn score(roster: &Roster, completed: &CompletedEntry) -> EvaluationReport {
    let Some(actual) = completed.actual_outcome.as_deref() else {
        return EvaluationReport::default();
    };

    let results = roster
        .candidates()
        .filter_map(|candidate| {
            let predicted = completed.prediction(candidate)?;
            let outcome = if labels_match(predicted, actual) {
                Outcome::Win
            } else {
                Outcome::Loss
            };
            Some(CandidateResult {
                candidate,
                predicted: predicted.to_string(),
                actual: actual.to_string(),
                outcome,
                accuracy: roster.accuracy(candidate).unwrap_or(0.0),
            })
        })
        .collect();

    EvaluationReport { results }
}

/// Apply the switch policy without touching any state
pub fn decide(state: &SelectorState, roster: &Roster, report: &EvaluationReport) -> SwitchDecision {
    let active = state.active_candidate;

    if !state.auto_switching {
        return SwitchDecision::Manual { model: active };
    }

    if report.outcome_of(active) != Some(Outcome::Loss) {
        return SwitchDecision::Kept;
    }

    let winner = roster
        .ranked()
        .into_iter()
        .find(|c| *c != active && report.outcome_of(*c).is_some_and(|o| o.is_win()));

    match winner {
        Some(to) => SwitchDecision::Switched { from: active, to },
        None => SwitchDecision::FellBack {
            from: active,
            to: roster.best(),
        },
    }
}

/// Score `completed`, update the active model and record the decision
pub fn evaluate(
    state: &mut SelectorState,
    roster: &Roster,
    completed: &CompletedEntry,
    log: &EventLog,
) -> (EvaluationReport, SwitchDecision) {
    let report = score(roster, completed);
    let decision = decide(state, roster, &report);

    match decision {
        SwitchDecision::Switched { to, .. } | SwitchDecision::FellBack { to, .. } => {
            state.active_candidate = to;
        }
        SwitchDecision::Kept | SwitchDecision::Manual { .. } => {}
    }

    match decision.event() {
        Some(event) => log.record(&event),
        None => debug!(
            "Keeping {} for issue {}",
            state.active_candidate, completed.sequence_id
        ),
    }

    (report, decision)
}
