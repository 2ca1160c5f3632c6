//! Agent lifecycle events
//!
//! Every line written to the observability stream originates from one of these
//! variants. Candidate names are carried as display strings so this crate stays
//! independent of the agent's candidate roster.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Events recorded by the agent over its lifetime
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AgentEvent {
    /// Agent process started (STARTUP entered)
    AgentStarted {
        /// Crate version of the running binary
        version: String,
    },

    /// Configuration document loaded successfully
    ConfigLoaded {
        auto_switching: bool,
        manual_model: String,
    },

    /// Configuration (or one of its options) unusable, defaults applied
    ConfigDefaulted {
        /// What went wrong while reading the document
        reason: String,
        auto_switching: bool,
        manual_model: String,
    },

    /// Active model lost and another model that won this cycle took over
    AutoSwitched { from: String, to: String },

    /// Active model lost and no other model won; highest-accuracy model selected
    FallbackSelected { from: String, to: String },

    /// Active model lost, no other model won, and it already has the highest accuracy
    BestModelKept { model: String },

    /// Auto-switching disabled; the fixed manual model stays active
    ManualMode { model: String },

    /// Report file overwritten with a new prediction
    PredictionPublished { path: String },

    /// Feed could not be read this cycle; treated as empty
    FeedUnavailable { error: String },

    /// One full cycle completed
    CycleProcessed {
        completed_issue: String,
        pending_issue: String,
    },

    /// One cycle failed; the loop continues with the next tick
    CycleFailed { error: String },

    /// Agent leaving RUNNING
    AgentStopped { reason: String },
}

impl AgentEvent {
    /// Get event type as string
    pub fn event_type(&self) -> &str {
        match self {
            AgentEvent::AgentStarted { .. } => "AgentStarted",
            AgentEvent::ConfigLoaded { .. } => "ConfigLoaded",
            AgentEvent::ConfigDefaulted { .. } => "ConfigDefaulted",
            AgentEvent::AutoSwitched { .. } => "AutoSwitched",
            AgentEvent::FallbackSelected { .. } => "FallbackSelected",
            AgentEvent::BestModelKept { .. } => "BestModelKept",
            AgentEvent::ManualMode { .. } => "ManualMode",
            AgentEvent::PredictionPublished { .. } => "PredictionPublished",
            AgentEvent::FeedUnavailable { .. } => "FeedUnavailable",
            AgentEvent::CycleProcessed { .. } => "CycleProcessed",
            AgentEvent::CycleFailed { .. } => "CycleFailed",
            AgentEvent::AgentStopped { .. } => "AgentStopped",
        }
    }

    /// True for events that indicate something went wrong
    pub fn is_warning(&self) -> bool {
        matches!(
            self,
            AgentEvent::ConfigDefaulted { .. }
                | AgentEvent::FeedUnavailable { .. }
                | AgentEvent::CycleFailed { .. }
        )
    }
}

impl fmt::Display for AgentEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgentEvent::AgentStarted { version } => {
                write!(f, "Prediction agent started (v{})", version)
            }
            AgentEvent::ConfigLoaded {
                auto_switching,
                manual_model,
            } => write!(
                f,
                "Config loaded | Auto: {} | Model: {}",
                auto_switching, manual_model
            ),
            AgentEvent::ConfigDefaulted {
                reason,
                auto_switching,
                manual_model,
            } => write!(
                f,
                "Config problem: {} | Using defaults | Auto: {} | Model: {}",
                reason, auto_switching, manual_model
            ),
            AgentEvent::AutoSwitched { from, to } => {
                write!(f, "Auto-switching model from {} to {}", from, to)
            }
            AgentEvent::FallbackSelected { from, to } => write!(
                f,
                "No other model won; falling back from {} to highest accuracy model {}",
                from, to
            ),
            AgentEvent::BestModelKept { model } => write!(
                f,
                "No other model won; keeping highest accuracy model {}",
                model
            ),
            AgentEvent::ManualMode { model } => {
                write!(f, "Manual mode active - using fixed model: {}", model)
            }
            AgentEvent::PredictionPublished { path } => {
                write!(f, "Updated prediction file: {}", path)
            }
            AgentEvent::FeedUnavailable { error } => write!(f, "Error loading data: {}", error),
            AgentEvent::CycleProcessed {
                completed_issue,
                pending_issue,
            } => write!(f, "Processed issue {} -> {}", completed_issue, pending_issue),
            AgentEvent::CycleFailed { error } => write!(f, "Cycle failed: {}", error),
            AgentEvent::AgentStopped { reason } => write!(f, "Prediction agent stopped: {}", reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_switch_message() {
        let event = AgentEvent::AutoSwitched {
            from: "Model 2".to_string(),
            to: "Model 1".to_string(),
        };
        assert_eq!(event.to_string(), "Auto-switching model from Model 2 to Model 1");
        assert_eq!(event.event_type(), "AutoSwitched");
        assert!(!event.is_warning());
    }

    #[test]
    fn test_best_model_kept_message() {
        let event = AgentEvent::BestModelKept {
            model: "Model 4".to_string(),
        };
        assert_eq!(
            event.to_string(),
            "No other model won; keeping highest accuracy model Model 4"
        );
        assert_eq!(event.event_type(), "BestModelKept");
    }

    #[test]
    fn test_processed_message() {
        let event = AgentEvent::CycleProcessed {
            completed_issue: "100".to_string(),
            pending_issue: "101".to_string(),
        };
        assert_eq!(event.to_string(), "Processed issue 100 -> 101");
    }

    #[test]
    fn test_failure_is_warning() {
        let event = AgentEvent::CycleFailed {
            error: "IO error: boom".to_string(),
        };
        assert!(event.is_warning());
        assert_eq!(event.to_string(), "Cycle failed: IO error: boom");
    }

    #[test]
    fn test_serializes_with_type_tag() {
        let event = AgentEvent::ManualMode {
            model: "Model 3".to_string(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "ManualMode");
        assert_eq!(json["model"], "Model 3");
    }
}
