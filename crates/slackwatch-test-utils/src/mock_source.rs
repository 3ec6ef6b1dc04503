// SPDX-FileCopyrightText: 2026 Slackwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock event source for deterministic testing.
//!
//! `MockSource` implements `EventSource` with injectable envelopes and
//! delivery failures. Once closed, it drains the queue and then reports the
//! end of the stream.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::{Mutex, Notify};

use slackwatch_core::types::{AdapterType, HealthStatus, IngestEnvelope};
use slackwatch_core::{EventSource, PluginAdapter, WatchError};

/// A mock event source for testing.
pub struct MockSource {
    inbound: Arc<Mutex<VecDeque<Result<IngestEnvelope, String>>>>,
    closed: AtomicBool,
    notify: Arc<Notify>,
}

impl MockSource {
    /// Create an open source with an empty queue.
    pub fn new() -> Self {
        Self {
            inbound: Arc::new(Mutex::new(VecDeque::new())),
            closed: AtomicBool::new(false),
            notify: Arc::new(Notify::new()),
        }
    }

    /// Create a closed source that yields `envelopes` and then ends.
    pub async fn with_events(envelopes: impl IntoIterator<Item = IngestEnvelope>) -> Self {
        let source = Self::new();
        for envelope in envelopes {
            source.inject(envelope).await;
        }
        source.close();
        source
    }

    /// Queue an envelope for the next `next_event()`.
    pub async fn inject(&self, envelope: IngestEnvelope) {
        self.inbound.lock().await.push_back(Ok(envelope));
        self.notify.notify_one();
    }

    /// Queue a delivery failure.
    pub async fn inject_error(&self, message: impl Into<String>) {
        self.inbound.lock().await.push_back(Err(message.into()));
        self.notify.notify_one();
    }

    /// End the stream once the queue is drained.
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
        self.notify.notify_one();
    }

    /// Envelopes and failures not yet delivered.
    pub async fn pending(&self) -> usize {
        self.inbound.lock().await.len()
    }
}

impl Default for MockSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockSource {
    fn name(&self) -> &str {
        "mock-source"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::EventSource
    }

    async fn health_check(&self) -> Result<HealthStatus, WatchError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), WatchError> {
        self.close();
        Ok(())
    }
}

#[async_trait]
impl EventSource for MockSource {
    async fn next_event(&self) -> Result<Option<IngestEnvelope>, WatchError> {
        loop {
            {
                let mut queue = self.inbound.lock().await;
                match queue.pop_front() {
                    Some(Ok(envelope)) => return Ok(Some(envelope)),
                    Some(Err(message)) => {
                        return Err(WatchError::Channel {
                            message,
                            source: None,
                        });
                    }
                    None if self.closed.load(Ordering::SeqCst) => return Ok(None),
                    None => {}
                }
            }
            self.notify.notified().await;
        }
    }
}
