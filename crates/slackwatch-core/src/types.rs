// SPDX-FileCopyrightText: 2026 Slackwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Record and event types shared across the store, the monitor, and the CLI.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};

/// Store-assigned identifier of a message row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(pub String);

/// Store-assigned identifier of an issue group row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(pub String);

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the kind of adapter.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Storage,
    EventSource,
}

/// Lifecycle state of an issue group.
///
/// The store keeps `status` as free text; these are the two values the
/// dashboard understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum IssueStatus {
    Open,
    Closed,
}

impl IssueStatus {
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

/// Expected issue categories. Not enforced by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum IssueCategory {
    Support,
    Bug,
    Feature,
    Question,
}

impl IssueCategory {
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

/// Output of the (external) message classifier, stored alongside the message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub is_relevant: bool,
    pub category: String,
    /// Expected in 0..=1, not enforced.
    pub confidence: f64,
    pub summary: String,
}

/// A message as it arrives, before the store assigns it an id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewMessage {
    /// The chat platform's own `ts` for the message.
    pub slack_message_id: String,
    pub user_id: String,
    pub user_name: String,
    pub channel_id: String,
    pub channel_name: String,
    pub text: String,
    pub thread_ts: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// A stored message row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub slack_message_id: String,
    pub user_id: String,
    pub user_name: String,
    pub channel_id: String,
    pub channel_name: String,
    pub text: String,
    #[serde(default)]
    pub thread_ts: Option<String>,
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub classification: Classification,
}

/// A stored issue group row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueGroup {
    pub id: GroupId,
    pub title: String,
    pub summary: String,
    pub category: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl IssueGroup {
    /// Returns the parsed status, or `None` for values outside open/closed.
    pub fn issue_status(&self) -> Option<IssueStatus> {
        self.status.parse().ok()
    }
}

/// A stored message-to-group membership row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageGroupLink {
    pub message_id: MessageId,
    pub group_id: GroupId,
    #[serde(default)]
    pub similarity_score: Option<f64>,
}

/// A group member: the message joined with the score of its link row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupedMessage {
    #[serde(flatten)]
    pub message: Message,
    pub similarity_score: Option<f64>,
}

// --- Inbound event types ---

/// A message event as delivered by the chat platform.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MessageEvent {
    pub user: Option<String>,
    pub text: Option<String>,
    pub channel: Option<String>,
    pub ts: String,
    pub thread_ts: Option<String>,
    pub subtype: Option<String>,
    pub bot_id: Option<String>,
}

/// Assignment of an incoming message to an existing issue group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupAssignment {
    pub group_id: GroupId,
    #[serde(default)]
    pub similarity_score: Option<f64>,
}

/// An event together with everything the handler needs to persist it.
///
/// `classification` and `group` come from collaborators outside this
/// workspace; an envelope without a classification is logged but not stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestEnvelope {
    pub event: MessageEvent,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub channel_name: Option<String>,
    #[serde(default)]
    pub classification: Option<Classification>,
    #[serde(default)]
    pub group: Option<GroupAssignment>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_row_deserializes_with_flattened_classification() {
        let row = serde_json::json!({
            "id": "5f1c",
            "slack_message_id": "163000.0001",
            "user_id": "U1",
            "user_name": "ada",
            "channel_id": "C1",
            "channel_name": "support",
            "text": "login is broken",
            "thread_ts": null,
            "timestamp": "2021-08-27T06:13:20.000100+00:00",
            "is_relevant": true,
            "category": "bug",
            "confidence": 0.92,
            "summary": "Login failure",
            "created_at": "2021-08-27T06:13:21+00:00"
        });
        let msg: Message = serde_json::from_value(row).unwrap();
        assert_eq!(msg.id, MessageId("5f1c".into()));
        assert!(msg.thread_ts.is_none());
        assert_eq!(msg.classification.category, "bug");
        assert!((msg.classification.confidence - 0.92).abs() < f64::EPSILON);
    }

    #[test]
    fn issue_group_status_parses_known_values() {
        let group: IssueGroup = serde_json::from_value(serde_json::json!({
            "id": "g1",
            "title": "Login",
            "summary": "Users cannot log in",
            "category": "bug",
            "status": "closed",
            "created_at": "2026-01-01T00:00:00Z"
        }))
        .unwrap();
        assert_eq!(group.issue_status(), Some(IssueStatus::Closed));
        assert!(group.updated_at.is_none());

        let odd = IssueGroup {
            status: "archived".into(),
            ..group
        };
        assert_eq!(odd.issue_status(), None);
    }

    #[test]
    fn status_and_category_render_lowercase() {
        assert_eq!(IssueStatus::Open.as_str(), "open");
        assert_eq!(IssueCategory::Feature.to_string(), "feature");
        assert_eq!("question".parse::<IssueCategory>().unwrap(), IssueCategory::Question);
    }

    #[test]
    fn envelope_accepts_bare_event() {
        let env: IngestEnvelope = serde_json::from_str(
            r#"{"event": {"user": "U1", "text": "hi", "channel": "C1", "ts": "1.2"}}"#,
        )
        .unwrap();
        assert_eq!(env.event.user.as_deref(), Some("U1"));
        assert!(env.classification.is_none());
        assert!(env.group.is_none());
    }
}
