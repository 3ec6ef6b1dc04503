// SPDX-FileCopyrightText: 2026 Slackwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persistence layer for slackwatch over a hosted PostgREST datastore.
//!
//! [`RemoteStorage`] implements the strict [`IssueStore`] trait: one table
//! call per operation, every failure returned as a `WatchError`.
//! [`LenientStore`] wraps any store with the forgiving error policy the
//! message handler historically relied on.
//!
//! [`IssueStore`]: slackwatch_core::IssueStore

pub mod adapter;
pub mod client;
pub mod lenient;
pub mod models;
pub mod queries;

pub use adapter::RemoteStorage;
pub use client::StoreClient;
pub use lenient::LenientStore;
