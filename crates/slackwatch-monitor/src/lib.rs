// SPDX-FileCopyrightText: 2026 Slackwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message monitoring loop for slackwatch.
//!
//! The [`MonitorLoop`] pulls envelopes from an [`EventSource`], runs each
//! through the [`IngestPipeline`], and keeps going when a single event fails.
//! It stops when the source is exhausted or the cancellation token fires.

pub mod handler;
pub mod pipeline;
pub mod shutdown;
pub mod source;

use std::sync::Arc;

use slackwatch_core::error::WatchError;
use slackwatch_core::types::IngestEnvelope;
use slackwatch_core::{EventSource, IssueStore};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

pub use pipeline::{IngestOutcome, IngestPipeline};
pub use source::JsonLinesSource;

/// Counters for one run of the loop.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonitorStats {
    pub received: u64,
    pub ignored: u64,
    pub logged_only: u64,
    pub duplicates: u64,
    pub stored: u64,
    pub grouped: u64,
    /// Envelopes the pipeline failed on plus deliveries the source failed.
    pub failed: u64,
}

impl MonitorStats {
    fn record(&mut self, outcome: &IngestOutcome) {
        match outcome {
            IngestOutcome::Ignored => self.ignored += 1,
            IngestOutcome::LoggedOnly => self.logged_only += 1,
            IngestOutcome::Duplicate => self.duplicates += 1,
            IngestOutcome::Stored { grouped, .. } => {
                self.stored += 1;
                if grouped.is_some() {
                    self.grouped += 1;
                }
            }
        }
    }
}

/// Coordinates message flow from an event source into the issue store.
pub struct MonitorLoop {
    source: Arc<dyn EventSource>,
    pipeline: IngestPipeline,
    stats: MonitorStats,
}

impl MonitorLoop {
    pub fn new(source: Arc<dyn EventSource>, store: Arc<dyn IssueStore>) -> Self {
        info!(
            source = source.name(),
            store = store.name(),
            "monitor loop initialized"
        );
        Self {
            source,
            pipeline: IngestPipeline::new(store),
            stats: MonitorStats::default(),
        }
    }

    /// Counters so far.
    pub fn stats(&self) -> &MonitorStats {
        &self.stats
    }

    /// Runs until the source ends or `cancel` fires, then returns the counters.
    pub async fn run(&mut self, cancel: CancellationToken) -> Result<MonitorStats, WatchError> {
        info!("monitor loop running");

        loop {
            tokio::select! {
                next = self.source.next_event() => {
                    match next {
                        Ok(Some(envelope)) => self.process(envelope).await,
                        Ok(None) => {
                            info!("event source exhausted");
                            break;
                        }
                        Err(e) => {
                            self.stats.failed += 1;
                            error!(error = %e, "event source receive error");
                        }
                    }
                }
                _ = cancel.cancelled() => {
                    info!("shutdown signal received, stopping monitor loop");
                    break;
                }
            }
        }

        if let Err(e) = self.source.shutdown().await {
            error!(error = %e, "event source shutdown failed");
        }

        let stats = self.stats.clone();
        info!(
            received = stats.received,
            stored = stats.stored,
            duplicates = stats.duplicates,
            failed = stats.failed,
            "monitor loop stopped"
        );
        Ok(stats)
    }

    async fn process(&mut self, envelope: IngestEnvelope) {
        self.stats.received += 1;
        match self.pipeline.handle(&envelope).await {
            Ok(outcome) => self.stats.record(&outcome),
            Err(e) => {
                self.stats.failed += 1;
                let payload = serde_json::to_string(&envelope)
                    .unwrap_or_else(|_| format!("{:?}", envelope.event));
                error!(error = %e, payload = %payload, "failed to handle message event");
            }
        }
    }
}
