//! Record feed access
//!
//! The feed itself lives outside the agent. The agent only needs an ordered
//! snapshot of records per cycle and the two "most recent" views over it.

use crate::entry::{CompletedEntry, PendingEntry, Record};
use crate::normalize::normalize;
use msel_common::Result;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Source of normalized records, oldest first
pub trait RecordFeed {
    fn fetch(&self) -> Result<Vec<Record>>;
}

/// Feed backed by a JSON document on disk, re-read on every fetch
#[derive(Debug, Clone)]
pub struct JsonFileFeed {
    path: PathBuf,
}

impl JsonFileFeed {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordFeed for JsonFileFeed {
    fn fetch(&self) -> Result<Vec<Record>> {
        let content = std::fs::read_to_string(&self.path)?;
        let document: serde_json::Value = serde_json::from_str(&content)?;
        let records = normalize(&document);
        debug!("Feed {} yielded {} records", self.path.display(), records.len());
        Ok(records)
    }
}

/// In-memory feed
impl RecordFeed for Vec<Record> {
    fn fetch(&self) -> Result<Vec<Record>> {
        Ok(self.clone())
    }
}

fn last_completed(records: &[Record]) -> Option<(usize, &CompletedEntry)> {
    records
        .iter()
        .enumerate()
        .rev()
        .find_map(|(index, record)| match record {
            Record::Completed(entry) => Some((index, entry)),
            Record::Pending(_) => None,
        })
}

fn last_pending(records: &[Record]) -> Option<(usize, &PendingEntry)> {
    records
        .iter()
        .enumerate()
        .rev()
        .find_map(|(index, record)| match record {
            Record::Pending(entry) => Some((index, entry)),
            Record::Completed(_) => None,
        })
}

/// Most recent completed entry
pub fn latest_completed(records: &[Record]) -> Option<&CompletedEntry> {
    last_completed(records).map(|(_, entry)| entry)
}

/// Most recent pending entry
pub fn latest_pending(records: &[Record]) -> Option<&PendingEntry> {
    last_pending(records).map(|(_, entry)| entry)
}

/// Most recent completed entry together with the pending entry that follows it
///
/// `None` unless both exist and the pending entry sits later in the feed than
/// the completed one. Only feed position is compared, never the ids.
pub fn latest_pair(records: &[Record]) -> Option<(&CompletedEntry, &PendingEntry)> {
    let (completed_at, completed) = last_completed(records)?;
    let (pending_at, pending) = last_pending(records)?;

    if pending_at < completed_at {
        debug!(
            "Latest pending issue {} precedes completed issue {}",
            pending.sequence_id, completed.sequence_id
        );
        return None;
    }

    Some((completed, pending))
}
