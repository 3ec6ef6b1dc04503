// SPDX-FileCopyrightText: 2026 Slackwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persistence trait for messages, issue groups, and their memberships.

use async_trait::async_trait;

use crate::error::WatchError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{
    Classification, GroupId, GroupedMessage, IssueGroup, Message, MessageId, NewMessage,
};

/// Strict access to the issue store.
///
/// Every operation maps to exactly one remote table call. Lookups report a
/// missing record as `Ok(None)` or an empty `Vec`; any failure to talk to the
/// store is an `Err`, so callers decide their own fallback.
#[async_trait]
pub trait IssueStore: PluginAdapter {
    /// Inserts one message row combining the message and its classification.
    async fn store_message(
        &self,
        message: &NewMessage,
        classification: &Classification,
    ) -> Result<MessageId, WatchError>;

    /// Returns whether a message with this `slack_message_id` is stored.
    async fn message_exists(&self, slack_message_id: &str) -> Result<bool, WatchError>;

    async fn get_message_by_id(&self, id: &MessageId) -> Result<Option<Message>, WatchError>;

    /// All messages of a thread, oldest first.
    async fn get_messages_by_thread(&self, thread_ts: &str) -> Result<Vec<Message>, WatchError>;

    /// Inserts an issue group with status `open`.
    async fn create_issue_group(
        &self,
        title: &str,
        summary: &str,
        category: &str,
    ) -> Result<GroupId, WatchError>;

    /// All issue groups, newest first.
    async fn get_all_issue_groups(&self) -> Result<Vec<IssueGroup>, WatchError>;

    async fn get_issue_group_by_id(&self, id: &GroupId) -> Result<Option<IssueGroup>, WatchError>;

    async fn add_message_to_group(
        &self,
        message_id: &MessageId,
        group_id: &GroupId,
        similarity_score: Option<f64>,
    ) -> Result<(), WatchError>;

    /// Member messages of a group, each with the score of its link row.
    async fn get_messages_in_group(
        &self,
        group_id: &GroupId,
    ) -> Result<Vec<GroupedMessage>, WatchError>;

    /// Sets `status` on a group without validating the value.
    ///
    /// Returns the updated row, or `None` when no group has this id.
    async fn update_issue_group_status(
        &self,
        group_id: &GroupId,
        status: &str,
    ) -> Result<Option<IssueGroup>, WatchError>;

    /// Issue groups with exactly this category, newest first.
    async fn get_issue_groups_by_category(
        &self,
        category: &str,
    ) -> Result<Vec<IssueGroup>, WatchError>;
}
