// SPDX-FileCopyrightText: 2026 Slackwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Forgiving facade over an [`IssueStore`].
//!
//! Writes that create records (`store_message`, `create_issue_group`) log and
//! return their error. Everything else logs the failure and answers with an
//! empty collection, `None`, or `false`. The two policies are inconsistent;
//! callers that need to tell "absent" from "store unreachable" should use the
//! [`IssueStore`] directly.

use std::sync::Arc;

use tracing::{error, warn};

use slackwatch_core::types::{
    Classification, GroupId, GroupedMessage, IssueGroup, Message, MessageId, NewMessage,
};
use slackwatch_core::{IssueStore, WatchError};

/// Lenient wrapper that swallows read and update failures.
#[derive(Clone)]
pub struct LenientStore {
    inner: Arc<dyn IssueStore>,
}

impl LenientStore {
    pub fn new(inner: Arc<dyn IssueStore>) -> Self {
        Self { inner }
    }

    /// The wrapped strict store.
    pub fn inner(&self) -> &Arc<dyn IssueStore> {
        &self.inner
    }

    /// Logs, then propagates.
    pub async fn store_message(
        &self,
        message: &NewMessage,
        classification: &Classification,
    ) -> Result<MessageId, WatchError> {
        self.inner
            .store_message(message, classification)
            .await
            .inspect_err(|e| {
                error!(
                    slack_message_id = %message.slack_message_id,
                    error = %e,
                    "failed to store message"
                );
            })
    }

    /// `false` on any error. An outage therefore reads as "not stored yet".
    pub async fn message_exists(&self, slack_message_id: &str) -> bool {
        self.inner
            .message_exists(slack_message_id)
            .await
            .unwrap_or_else(|e| {
                warn!(slack_message_id, error = %e, "existence check failed, assuming absent");
                false
            })
    }

    pub async fn get_message_by_id(&self, id: &MessageId) -> Option<Message> {
        swallow(self.inner.get_message_by_id(id).await, "get_message_by_id").flatten()
    }

    pub async fn get_messages_by_thread(&self, thread_ts: &str) -> Vec<Message> {
        swallow(
            self.inner.get_messages_by_thread(thread_ts).await,
            "get_messages_by_thread",
        )
        .unwrap_or_default()
    }

    /// Logs, then propagates.
    pub async fn create_issue_group(
        &self,
        title: &str,
        summary: &str,
        category: &str,
    ) -> Result<GroupId, WatchError> {
        self.inner
            .create_issue_group(title, summary, category)
            .await
            .inspect_err(|e| error!(title, category, error = %e, "failed to create issue group"))
    }

    pub async fn get_all_issue_groups(&self) -> Vec<IssueGroup> {
        swallow(self.inner.get_all_issue_groups().await, "get_all_issue_groups")
            .unwrap_or_default()
    }

    pub async fn get_issue_group_by_id(&self, id: &GroupId) -> Option<IssueGroup> {
        swallow(
            self.inner.get_issue_group_by_id(id).await,
            "get_issue_group_by_id",
        )
        .flatten()
    }

    pub async fn add_message_to_group(
        &self,
        message_id: &MessageId,
        group_id: &GroupId,
        similarity_score: Option<f64>,
    ) -> bool {
        swallow(
            self.inner
                .add_message_to_group(message_id, group_id, similarity_score)
                .await,
            "add_message_to_group",
        )
        .is_some()
    }

    pub async fn get_messages_in_group(&self, group_id: &GroupId) -> Vec<GroupedMessage> {
        swallow(
            self.inner.get_messages_in_group(group_id).await,
            "get_messages_in_group",
        )
        .unwrap_or_default()
    }

    /// `true` whenever the store accepted the call, even if no group matched.
    pub async fn update_issue_group_status(&self, group_id: &GroupId, status: &str) -> bool {
        swallow(
            self.inner.update_issue_group_status(group_id, status).await,
            "update_issue_group_status",
        )
        .is_some()
    }

    pub async fn get_issue_groups_by_category(&self, category: &str) -> Vec<IssueGroup> {
        swallow(
            self.inner.get_issue_groups_by_category(category).await,
            "get_issue_groups_by_category",
        )
        .unwrap_or_default()
    }
}

fn swallow<T>(result: Result<T, WatchError>, operation: &'static str) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            error!(operation, error = %e, "store call failed");
            None
        }
    }
}
