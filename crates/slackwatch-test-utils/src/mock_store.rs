// SPDX-FileCopyrightText: 2026 Slackwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory issue store for deterministic testing.
//!
//! `MockStore` implements `IssueStore` over plain vectors with the same
//! ordering rules as the remote store, plus an outage switch that makes every
//! call fail with a transient error.

use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use tokio::sync::Mutex;

use slackwatch_core::types::{
    AdapterType, Classification, GroupId, GroupedMessage, HealthStatus, IssueGroup, IssueStatus,
    Message, MessageGroupLink, MessageId, NewMessage,
};
use slackwatch_core::{IssueStore, PluginAdapter, WatchError};

#[derive(Default)]
struct Tables {
    messages: Vec<Message>,
    groups: Vec<IssueGroup>,
    links: Vec<MessageGroupLink>,
}

/// An in-memory issue store for testing.
///
/// Ids are random UUIDs. Each created group gets a `created_at` one second
/// after the previous one, so "newest first" ordering is deterministic.
pub struct MockStore {
    tables: Mutex<Tables>,
    down: AtomicBool,
    clock: AtomicI64,
    calls: Mutex<Vec<&'static str>>,
}

impl MockStore {
    /// Create an empty, reachable store.
    pub fn new() -> Self {
        Self {
            tables: Mutex::new(Tables::default()),
            down: AtomicBool::new(false),
            clock: AtomicI64::new(0),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Simulate an outage: while set, every operation fails as transient.
    pub fn set_outage(&self, down: bool) {
        self.down.store(down, Ordering::SeqCst);
    }

    /// Names of the operations called so far, in order.
    pub async fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().await.clone()
    }

    /// Number of stored messages.
    pub async fn message_count(&self) -> usize {
        self.tables.lock().await.messages.len()
    }

    /// All membership rows.
    pub async fn links(&self) -> Vec<MessageGroupLink> {
        self.tables.lock().await.links.clone()
    }

    async fn enter(&self, operation: &'static str) -> Result<(), WatchError> {
        self.calls.lock().await.push(operation);
        if self.down.load(Ordering::SeqCst) {
            return Err(WatchError::Transient {
                message: format!("mock store unavailable during {operation}"),
                source: None,
            });
        }
        Ok(())
    }

    fn tick(&self) -> DateTime<Utc> {
        let n = self.clock.fetch_add(1, Ordering::SeqCst);
        let epoch = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).single().unwrap_or_default();
        epoch + Duration::seconds(n)
    }
}

impl Default for MockStore {
    fn default() -> Self {
        Self::new()
    }
}

fn newest_first(mut groups: Vec<IssueGroup>) -> Vec<IssueGroup> {
    groups.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    groups
}

#[async_trait]
impl PluginAdapter for MockStore {
    fn name(&self) -> &str {
        "mock-store"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, WatchError> {
        if self.down.load(Ordering::SeqCst) {
            return Ok(HealthStatus::Unhealthy("mock outage".into()));
        }
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), WatchError> {
        Ok(())
    }
}

#[async_trait]
impl IssueStore for MockStore {
    async fn store_message(
        &self,
        message: &NewMessage,
        classification: &Classification,
    ) -> Result<MessageId, WatchError> {
        self.enter("store_message").await?;
        let id = MessageId(uuid::Uuid::new_v4().to_string());
        self.tables.lock().await.messages.push(Message {
            id: id.clone(),
            slack_message_id: message.slack_message_id.clone(),
            user_id: message.user_id.clone(),
            user_name: message.user_name.clone(),
            channel_id: message.channel_id.clone(),
            channel_name: message.channel_name.clone(),
            text: message.text.clone(),
            thread_ts: message.thread_ts.clone(),
            timestamp: message.timestamp,
            classification: classification.clone(),
        });
        Ok(id)
    }

    async fn message_exists(&self, slack_message_id: &str) -> Result<bool, WatchError> {
        self.enter("message_exists").await?;
        let tables = self.tables.lock().await;
        Ok(tables
            .messages
            .iter()
            .any(|m| m.slack_message_id == slack_message_id))
    }

    async fn get_message_by_id(&self, id: &MessageId) -> Result<Option<Message>, WatchError> {
        self.enter("get_message_by_id").await?;
        let tables = self.tables.lock().await;
        Ok(tables.messages.iter().find(|m| &m.id == id).cloned())
    }

    async fn get_messages_by_thread(&self, thread_ts: &str) -> Result<Vec<Message>, WatchError> {
        self.enter("get_messages_by_thread").await?;
        let tables = self.tables.lock().await;
        let mut rows: Vec<Message> = tables
            .messages
            .iter()
            .filter(|m| m.thread_ts.as_deref() == Some(thread_ts))
            .cloned()
            .collect();
        rows.sort_by_key(|m| m.timestamp);
        Ok(rows)
    }

    async fn create_issue_group(
        &self,
        title: &str,
        summary: &str,
        category: &str,
    ) -> Result<GroupId, WatchError> {
        self.enter("create_issue_group").await?;
        let id = GroupId(uuid::Uuid::new_v4().to_string());
        let created_at = self.tick();
        self.tables.lock().await.groups.push(IssueGroup {
            id: id.clone(),
            title: title.to_string(),
            summary: summary.to_string(),
            category: category.to_string(),
            status: IssueStatus::Open.to_string(),
            created_at,
            updated_at: None,
        });
        Ok(id)
    }

    async fn get_all_issue_groups(&self) -> Result<Vec<IssueGroup>, WatchError> {
        self.enter("get_all_issue_groups").await?;
        let tables = self.tables.lock().await;
        Ok(newest_first(tables.groups.clone()))
    }

    async fn get_issue_group_by_id(&self, id: &GroupId) -> Result<Option<IssueGroup>, WatchError> {
        self.enter("get_issue_group_by_id").await?;
        let tables = self.tables.lock().await;
        Ok(tables.groups.iter().find(|g| &g.id == id).cloned())
    }

    async fn add_message_to_group(
        &self,
        message_id: &MessageId,
        group_id: &GroupId,
        similarity_score: Option<f64>,
    ) -> Result<(), WatchError> {
        self.enter("add_message_to_group").await?;
        self.tables.lock().await.links.push(MessageGroupLink {
            message_id: message_id.clone(),
            group_id: group_id.clone(),
            similarity_score,
        });
        Ok(())
    }

    async fn get_messages_in_group(
        &self,
        group_id: &GroupId,
    ) -> Result<Vec<GroupedMessage>, WatchError> {
        self.enter("get_messages_in_group").await?;
        let tables = self.tables.lock().await;
        Ok(tables
            .links
            .iter()
            .filter(|link| &link.group_id == group_id)
            .filter_map(|link| {
                tables
                    .messages
                    .iter()
                    .find(|m| m.id == link.message_id)
                    .map(|message| GroupedMessage {
                        message: message.clone(),
                        similarity_score: link.similarity_score,
                    })
            })
            .collect())
    }

    async fn update_issue_group_status(
        &self,
        group_id: &GroupId,
        status: &str,
    ) -> Result<Option<IssueGroup>, WatchError> {
        self.enter("update_issue_group_status").await?;
        let updated_at = self.tick();
        let mut tables = self.tables.lock().await;
        Ok(tables
            .groups
            .iter_mut()
            .find(|g| &g.id == group_id)
            .map(|group| {
                group.status = status.to_string();
                group.updated_at = Some(updated_at);
                group.clone()
            }))
    }

    async fn get_issue_groups_by_category(
        &self,
        category: &str,
    ) -> Result<Vec<IssueGroup>, WatchError> {
        self.enter("get_issue_groups_by_category").await?;
        let tables = self.tables.lock().await;
        Ok(newest_first(
            tables
                .groups
                .iter()
                .filter(|g| g.category == category)
                .cloned()
                .collect(),
        ))
    }
}
