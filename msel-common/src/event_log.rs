//! Append-only observability stream
//!
//! One timestamped line per [`AgentEvent`], in the order events were recorded.
//! The file is truncated once when the log is created at startup and only
//! appended to afterwards. Write failures never reach the caller: they are
//! reported through `tracing` and otherwise ignored.

use crate::events::AgentEvent;
use crate::time;
use crate::Result;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Timestamped line log of agent events
#[derive(Debug, Clone)]
pub struct EventLog {
    /// Backing file; `None` mirrors events to tracing only
    path: Option<PathBuf>,
}

impl EventLog {
    /// Create (or truncate) the log file at `path`
    ///
    /// Failing to create the file is a startup error; every later write is
    /// best-effort.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        File::create(&path)?;
        Ok(Self { path: Some(path) })
    }

    /// Log that only mirrors events to tracing
    pub fn disabled() -> Self {
        Self { path: None }
    }

    /// Path of the backing file, if any
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Record one event
    pub fn record(&self, event: &AgentEvent) {
        if event.is_warning() {
            warn!(event = event.event_type(), "{}", event);
        } else {
            info!(event = event.event_type(), "{}", event);
        }

        if let Some(path) = &self.path {
            let line = format!("[{}] {}\n", time::log_timestamp(time::now()), event);
            if let Err(e) = append_line(path, &line) {
                warn!("Event log write to {} failed: {}", path.display(), e);
            }
        }
    }
}

fn append_line(path: &Path, line: &str) -> std::io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(line.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn started() -> AgentEvent {
        AgentEvent::AgentStarted {
            version: "0.1.0".to_string(),
        }
    }

    #[test]
    fn test_create_truncates_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("agent.log");
        std::fs::write(&path, "stale line from a previous run\n").unwrap();

        EventLog::create(&path).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn test_record_appends_timestamped_lines() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("agent.log");
        let log = EventLog::create(&path).unwrap();

        log.record(&started());
        log.record(&AgentEvent::ManualMode {
            model: "Model 2".to_string(),
        });

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with('['));
        assert_eq!(&lines[0][20..22], "] ");
        assert!(lines[0].ends_with("Prediction agent started (v0.1.0)"));
        assert!(lines[1].ends_with("Manual mode active - using fixed model: Model 2"));
    }

    #[test]
    fn test_record_survives_missing_directory() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("agent.log");
        let log = EventLog::create(&path).unwrap();
        drop(dir);

        // Directory is gone; recording must not panic
        log.record(&started());
    }

    #[test]
    fn test_create_fails_for_unwritable_location() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("agent.log");
        assert!(EventLog::create(&path).is_err());
    }

    #[test]
    fn test_disabled_log_has_no_path() {
        let log = EventLog::disabled();
        assert!(log.path().is_none());
        log.record(&started());
    }
}
