// SPDX-FileCopyrightText: 2026 Slackwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for slackwatch integration tests.
//!
//! Provides in-memory adapters for fast, deterministic tests without a
//! hosted datastore or a chat workspace.
//!
//! # Components
//!
//! - [`MockStore`] - In-memory issue store with an outage switch
//! - [`MockSource`] - Event source with injectable envelopes

pub mod mock_source;
pub mod mock_store;

pub use mock_source::MockSource;
pub use mock_store::MockStore;
