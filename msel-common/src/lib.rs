//! # MSEL Common Library
//!
//! Shared code for the MSEL prediction agent:
//! - Error and result types
//! - Agent lifecycle events (AgentEvent enum)
//! - Append-only observability event log
//! - Atomic publishing of report files
//! - Timestamp utilities

pub mod error;
pub mod event_log;
pub mod events;
pub mod publish;
pub mod time;

pub use error::{Error, Result};
pub use event_log::EventLog;
pub use events::AgentEvent;
