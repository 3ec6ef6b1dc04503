// SPDX-FileCopyrightText: 2026 Slackwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for slackwatch.

use thiserror::Error;

/// The primary error type used across all slackwatch traits and operations.
///
/// Variants separate failures a caller may reasonably retry later
/// ([`WatchError::Transient`]) from requests the datastore refused outright
/// ([`WatchError::Rejected`]) and from responses it could not make sense of
/// ([`WatchError::Storage`]). "Not found" on lookups is expressed as
/// `Ok(None)` by the strict store surface; [`WatchError::NotFound`] is for
/// operations that require the record to exist.
#[derive(Debug, Error)]
pub enum WatchError {
    /// Configuration errors (missing store URL or key, malformed values).
    #[error("configuration error: {0}")]
    Config(String),

    /// Network failures, timeouts, rate limiting, and 5xx responses.
    #[error("transient store failure: {message}")]
    Transient {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The datastore rejected the request (constraint violation, bad filter, auth).
    #[error("store rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// Unexpected or undecodable store responses.
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A record the operation depends on does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Event source errors (malformed payload, closed stream).
    #[error("channel error: {message}")]
    Channel {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl WatchError {
    /// Returns true when retrying the same request later could succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, WatchError::Transient { .. })
    }

    /// Returns true when the error reports a missing record.
    pub fn is_not_found(&self) -> bool {
        matches!(self, WatchError::NotFound { .. })
    }

    /// Builds a [`WatchError::Storage`] from a plain message.
    pub fn storage(message: impl Into<String>) -> Self {
        let message: String = message.into();
        WatchError::Storage {
            source: message.into(),
        }
    }
}
