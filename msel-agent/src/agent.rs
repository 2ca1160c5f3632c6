//! Polling agent loop
//!
//! One cycle: read the feed, take the latest completed and pending entries,
//! run model selection, render the report, publish it. Cycles run strictly one
//! after another on a fixed interval. A failed cycle is recorded and the loop
//! carries on with the next tick; only a shutdown signal ends the loop.

use crate::config::AgentConfig;
use crate::entry::SequenceId;
use crate::feed::{latest_pair, RecordFeed};
use crate::report::render;
use crate::selector::{evaluate, SelectorState, SwitchDecision};
use crate::Roster;
use msel_common::publish::write_atomic;
use msel_common::{AgentEvent, EventLog, Result};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};

/// Default pause between cycles
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(2000);

/// What a single cycle did
#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    /// Feed lacked a completed or a pending entry; nothing published
    Skipped,
    /// Report rendered and written to the output file
    Published {
        completed: SequenceId,
        pending: SequenceId,
        decision: SwitchDecision,
    },
}

/// Owns the selection state and drives the cycle
pub struct Agent<F: RecordFeed> {
    feed: F,
    output: PathBuf,
    roster: Roster,
    state: SelectorState,
    log: EventLog,
    interval: Duration,
}

impl<F: RecordFeed> Agent<F> {
    pub fn new(feed: F, output: impl Into<PathBuf>, config: AgentConfig, log: EventLog) -> Self {
        Self {
            feed,
            output: output.into(),
            state: SelectorState::new(config.manual_model, config.auto_switching),
            roster: config.roster,
            log,
            interval: DEFAULT_INTERVAL,
        }
    }

    /// Pause between cycles (at least one millisecond)
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval.max(Duration::from_millis(1));
        self
    }

    pub fn state(&self) -> &SelectorState {
        &self.state
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Run one cycle, propagating evaluate/render/publish failures
    pub fn run_cycle(&mut self) -> Result<CycleOutcome> {
        let records = match self.feed.fetch() {
            Ok(records) => records,
            Err(e) => {
                self.log.record(&AgentEvent::FeedUnavailable {
                    error: e.to_string(),
                });
                Vec::new()
            }
        };

        let Some((completed, pending)) = latest_pair(&records) else {
            debug!("Feed has no completed entry followed by a pending one, skipping cycle");
            return Ok(CycleOutcome::Skipped);
        };

        let (report, decision) = evaluate(&mut self.state, &self.roster, completed, &self.log);
        let text = render(completed, pending, &report, &self.state, &self.roster);

        write_atomic(&self.output, &text)?;
        self.log.record(&AgentEvent::PredictionPublished {
            path: self.output.display().to_string(),
        });
        self.log.record(&AgentEvent::CycleProcessed {
            completed_issue: completed.sequence_id.to_string(),
            pending_issue: pending.sequence_id.to_string(),
        });

        Ok(CycleOutcome::Published {
            completed: completed.sequence_id.clone(),
            pending: pending.sequence_id.clone(),
            decision,
        })
    }

    /// Run one cycle; a failure is recorded instead of returned
    pub fn tick(&mut self) -> Option<CycleOutcome> {
        match self.run_cycle() {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                self.log.record(&AgentEvent::CycleFailed {
                    error: e.to_string(),
                });
                None
            }
        }
    }

    /// Cycle until `shutdown` resolves, then return the final selection state
    ///
    /// The first cycle runs immediately. Shutdown is only observed between
    /// cycles; a running cycle always completes.
    pub async fn run(mut self, shutdown: impl Future<Output = ()>) -> SelectorState {
        tokio::pin!(shutdown);

        info!(
            "Agent running (interval: {}ms, output: {})",
            self.interval.as_millis(),
            self.output.display()
        );

        let mut timer = interval(self.interval);
        timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    self.log.record(&AgentEvent::AgentStopped {
                        reason: "shutdown requested".to_string(),
                    });
                    break;
                }
                _ = timer.tick() => {
                    self.tick();
                }
            }
        }

        self.state
    }
}
