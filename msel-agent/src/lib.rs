//! msel-agent library
//!
//! Polling agent that watches a feed of classifier predictions for a
//! sequential guessing game, scores which model called the last issue right,
//! picks the model to trust next, and publishes that model's prediction.

pub mod agent;
pub mod candidate;
pub mod config;
pub mod entry;
pub mod feed;
pub mod normalize;
pub mod report;
pub mod selector;

pub use agent::{Agent, CycleOutcome};
pub use candidate::{Candidate, Roster};
pub use config::AgentConfig;
pub use entry::{CompletedEntry, PendingEntry, Record, SequenceId};
pub use feed::{JsonFileFeed, RecordFeed};
pub use selector::{EvaluationReport, Outcome, SelectorState, SwitchDecision};
