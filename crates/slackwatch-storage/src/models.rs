// SPDX-FileCopyrightText: 2026 Slackwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire shapes for rows sent to and read from the store.
//!
//! The record types themselves live in `slackwatch-core::types`; this module
//! only adds the insert bodies and partial rows the queries need.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use slackwatch_core::types::{Classification, GroupId, Message, MessageId, NewMessage};

pub use slackwatch_core::types::{GroupedMessage, IssueGroup, MessageGroupLink};

/// Table names.
pub const MESSAGES: &str = "messages";
pub const ISSUE_GROUPS: &str = "issue_groups";
pub const MESSAGE_GROUPS: &str = "message_groups";

/// Insert body for `messages`: the message and its classification in one row.
#[derive(Debug, Serialize)]
pub struct MessageInsert<'a> {
    pub slack_message_id: &'a str,
    pub user_id: &'a str,
    pub user_name: &'a str,
    pub channel_id: &'a str,
    pub channel_name: &'a str,
    pub text: &'a str,
    pub thread_ts: Option<&'a str>,
    pub timestamp: DateTime<Utc>,
    pub is_relevant: bool,
    pub category: &'a str,
    pub confidence: f64,
    pub summary: &'a str,
}

impl<'a> MessageInsert<'a> {
    pub fn new(message: &'a NewMessage, classification: &'a Classification) -> Self {
        Self {
            slack_message_id: &message.slack_message_id,
            user_id: &message.user_id,
            user_name: &message.user_name,
            channel_id: &message.channel_id,
            channel_name: &message.channel_name,
            text: &message.text,
            thread_ts: message.thread_ts.as_deref(),
            timestamp: message.timestamp,
            is_relevant: classification.is_relevant,
            category: &classification.category,
            confidence: classification.confidence,
            summary: &classification.summary,
        }
    }
}

/// Insert body for `issue_groups`.
#[derive(Debug, Serialize)]
pub struct IssueGroupInsert<'a> {
    pub title: &'a str,
    pub summary: &'a str,
    pub category: &'a str,
    pub status: &'a str,
}

/// Patch body for a status change.
#[derive(Debug, Serialize)]
pub struct StatusPatch<'a> {
    pub status: &'a str,
}

/// Insert body for `message_groups`. A missing score is sent as `null`.
#[derive(Debug, Serialize)]
pub struct LinkInsert<'a> {
    pub message_id: &'a MessageId,
    pub group_id: &'a GroupId,
    pub similarity_score: Option<f64>,
}

/// A row read with `select=id`.
#[derive(Debug, Deserialize)]
pub struct IdRow<T> {
    pub id: T,
}

/// A `message_groups` row with its message embedded via `messages(*)`.
#[derive(Debug, Deserialize)]
pub struct LinkWithMessage {
    #[serde(default)]
    pub similarity_score: Option<f64>,
    /// `null` when the referenced message is gone.
    pub messages: Option<Message>,
}

impl LinkWithMessage {
    pub fn into_grouped(self) -> Option<GroupedMessage> {
        let similarity_score = self.similarity_score;
        self.messages.map(|message| GroupedMessage {
            message,
            similarity_score,
        })
    }
}
