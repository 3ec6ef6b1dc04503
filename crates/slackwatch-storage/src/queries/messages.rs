// SPDX-FileCopyrightText: 2026 Slackwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message table operations.

use slackwatch_core::types::{Classification, Message, MessageId, NewMessage};
use slackwatch_core::WatchError;

use crate::client::StoreClient;
use crate::models::{IdRow, MessageInsert, MESSAGES};

/// Insert one message row and return the id the store assigned.
pub async fn store_message(
    client: &StoreClient,
    message: &NewMessage,
    classification: &Classification,
) -> Result<MessageId, WatchError> {
    let rows: Vec<IdRow<MessageId>> = client
        .table(MESSAGES)
        .insert(&MessageInsert::new(message, classification))
        .await?;
    rows.into_iter()
        .next()
        .map(|row| row.id)
        .ok_or_else(|| WatchError::storage("message insert returned no rows"))
}

/// Whether a message with this external id is stored.
pub async fn message_exists(client: &StoreClient, slack_message_id: &str) -> Result<bool, WatchError> {
    let rows: Vec<IdRow<MessageId>> = client
        .table(MESSAGES)
        .select("id")
        .eq("slack_message_id", slack_message_id)
        .fetch()
        .await?;
    Ok(!rows.is_empty())
}

pub async fn get_message_by_id(
    client: &StoreClient,
    id: &MessageId,
) -> Result<Option<Message>, WatchError> {
    let rows: Vec<Message> = client
        .table(MESSAGES)
        .select("*")
        .eq("id", &id.0)
        .fetch()
        .await?;
    Ok(rows.into_iter().next())
}

/// Messages of one thread in chronological order.
pub async fn get_messages_by_thread(
    client: &StoreClient,
    thread_ts: &str,
) -> Result<Vec<Message>, WatchError> {
    client
        .table(MESSAGES)
        .select("*")
        .eq("thread_ts", thread_ts)
        .order("timestamp", false)
        .fetch()
        .await
}
