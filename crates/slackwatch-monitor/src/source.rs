// SPDX-FileCopyrightText: 2026 Slackwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Event source reading one JSON envelope per line.
//!
//! The socket connection to the chat platform is handled outside this
//! workspace; whatever holds it writes envelopes as JSON lines, which
//! [`JsonLinesSource`] reads from any async reader (stdin for `serve`).

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use slackwatch_core::types::{AdapterType, HealthStatus, IngestEnvelope};
use slackwatch_core::{EventSource, PluginAdapter, WatchError};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Stdin};
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// JSON-lines event source.
///
/// Blank lines are skipped. A line that is not UTF-8 or does not decode is an
/// error for that line only. A read failure ends the stream after it is
/// reported.
pub struct JsonLinesSource<R> {
    reader: Mutex<R>,
    line_no: AtomicU64,
    failed: AtomicBool,
}

impl<R: AsyncBufRead + Unpin + Send> JsonLinesSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader: Mutex::new(reader),
            line_no: AtomicU64::new(0),
            failed: AtomicBool::new(false),
        }
    }

    /// Number of lines consumed so far, blank ones included.
    pub fn lines_read(&self) -> u64 {
        self.line_no.load(Ordering::SeqCst)
    }
}

impl JsonLinesSource<BufReader<Stdin>> {
    /// Reads envelopes from the process's standard input.
    pub fn stdin() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()))
    }
}

#[async_trait]
impl<R: AsyncBufRead + Unpin + Send + 'static> PluginAdapter for JsonLinesSource<R> {
    fn name(&self) -> &str {
        "jsonl"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::EventSource
    }

    async fn health_check(&self) -> Result<HealthStatus, WatchError> {
        if self.failed.load(Ordering::SeqCst) {
            return Ok(HealthStatus::Unhealthy("input stream failed".into()));
        }
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), WatchError> {
        debug!(lines = self.lines_read(), "jsonl source shut down");
        Ok(())
    }
}

#[async_trait]
impl<R: AsyncBufRead + Unpin + Send + 'static> EventSource for JsonLinesSource<R> {
    async fn next_event(&self) -> Result<Option<IngestEnvelope>, WatchError> {
        if self.failed.load(Ordering::SeqCst) {
            return Ok(None);
        }
        let mut reader = self.reader.lock().await;
        let mut buf = Vec::new();
        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf).await {
                Ok(0) => return Ok(None),
                Ok(_) => {}
                Err(e) => {
                    self.failed.store(true, Ordering::SeqCst);
                    warn!(error = %e, "input stream read failed");
                    return Err(WatchError::Channel {
                        message: format!("failed to read input: {e}"),
                        source: Some(Box::new(e)),
                    });
                }
            }
            let n = self.line_no.fetch_add(1, Ordering::SeqCst) + 1;
            let line = match std::str::from_utf8(&buf) {
                Ok(line) => line,
                Err(e) => {
                    return Err(WatchError::Channel {
                        message: format!("line {n}: not valid UTF-8: {e}"),
                        source: Some(Box::new(e)),
                    });
                }
            };
            if line.trim().is_empty() {
                continue;
            }
            return serde_json::from_str(line.trim_end())
                .map(Some)
                .map_err(|e| WatchError::Channel {
                    message: format!("line {n}: malformed envelope: {e}"),
                    source: Some(Box::new(e)),
                });
        }
    }
}
