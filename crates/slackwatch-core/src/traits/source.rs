// SPDX-FileCopyrightText: 2026 Slackwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Event source trait for inbound chat messages.

use async_trait::async_trait;

use crate::error::WatchError;
use crate::traits::adapter::PluginAdapter;
use crate::types::IngestEnvelope;

/// Delivers inbound message envelopes to the monitor loop.
///
/// The connection to the chat platform lives behind this trait; the monitor
/// only sees envelopes.
#[async_trait]
pub trait EventSource: PluginAdapter {
    /// Receives the next envelope.
    ///
    /// `Ok(None)` means the source is exhausted. An `Err` concerns one
    /// delivery only; the caller may keep receiving.
    async fn next_event(&self) -> Result<Option<IngestEnvelope>, WatchError>;
}
