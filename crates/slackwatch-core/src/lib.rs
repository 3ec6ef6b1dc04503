// SPDX-FileCopyrightText: 2026 Slackwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for slackwatch.
//!
//! Provides the adapter traits, the shared error type, and the record and
//! event types used by the store, the monitor, and the command line.

pub mod error;
pub mod redact;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::WatchError;
pub use types::{AdapterType, GroupId, HealthStatus, MessageId};

pub use traits::{EventSource, IssueStore, PluginAdapter};
