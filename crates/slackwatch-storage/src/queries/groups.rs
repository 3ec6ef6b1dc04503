// SPDX-FileCopyrightText: 2026 Slackwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Issue group and membership operations.

use slackwatch_core::types::{GroupId, GroupedMessage, IssueGroup, IssueStatus, MessageId};
use slackwatch_core::WatchError;

use crate::client::StoreClient;
use crate::models::{
    IdRow, IssueGroupInsert, LinkInsert, LinkWithMessage, StatusPatch, ISSUE_GROUPS,
    MESSAGE_GROUPS,
};

/// Insert an issue group with status `open` and return its id.
pub async fn create_issue_group(
    client: &StoreClient,
    title: &str,
    summary: &str,
    category: &str,
) -> Result<GroupId, WatchError> {
    let row = IssueGroupInsert {
        title,
        summary,
        category,
        status: IssueStatus::Open.as_str(),
    };
    let rows: Vec<IdRow<GroupId>> = client.table(ISSUE_GROUPS).insert(&row).await?;
    rows.into_iter()
        .next()
        .map(|row| row.id)
        .ok_or_else(|| WatchError::storage("issue group insert returned no rows"))
}

/// Every issue group, newest first.
pub async fn get_all_issue_groups(client: &StoreClient) -> Result<Vec<IssueGroup>, WatchError> {
    client
        .table(ISSUE_GROUPS)
        .select("*")
        .order("created_at", true)
        .fetch()
        .await
}

pub async fn get_issue_group_by_id(
    client: &StoreClient,
    id: &GroupId,
) -> Result<Option<IssueGroup>, WatchError> {
    let rows: Vec<IssueGroup> = client
        .table(ISSUE_GROUPS)
        .select("*")
        .eq("id", &id.0)
        .fetch()
        .await?;
    Ok(rows.into_iter().next())
}

/// Issue groups of one category, newest first.
pub async fn get_issue_groups_by_category(
    client: &StoreClient,
    category: &str,
) -> Result<Vec<IssueGroup>, WatchError> {
    client
        .table(ISSUE_GROUPS)
        .select("*")
        .eq("category", category)
        .order("created_at", true)
        .fetch()
        .await
}

/// Set `status` on a group. `None` when no row matched the id.
pub async fn update_issue_group_status(
    client: &StoreClient,
    id: &GroupId,
    status: &str,
) -> Result<Option<IssueGroup>, WatchError> {
    let rows: Vec<IssueGroup> = client
        .table(ISSUE_GROUPS)
        .eq("id", &id.0)
        .update(&StatusPatch { status })
        .await?;
    Ok(rows.into_iter().next())
}

/// Record that a message belongs to a group.
pub async fn add_message_to_group(
    client: &StoreClient,
    message_id: &MessageId,
    group_id: &GroupId,
    similarity_score: Option<f64>,
) -> Result<(), WatchError> {
    let row = LinkInsert {
        message_id,
        group_id,
        similarity_score,
    };
    let _: Vec<serde_json::Value> = client.table(MESSAGE_GROUPS).insert(&row).await?;
    Ok(())
}

/// Member messages of a group joined with their link scores.
///
/// Links whose message no longer resolves are skipped.
pub async fn get_messages_in_group(
    client: &StoreClient,
    group_id: &GroupId,
) -> Result<Vec<GroupedMessage>, WatchError> {
    let rows: Vec<LinkWithMessage> = client
        .table(MESSAGE_GROUPS)
        .select("*,messages(*)")
        .eq("group_id", &group_id.0)
        .fetch()
        .await?;
    Ok(rows
        .into_iter()
        .filter_map(LinkWithMessage::into_grouped)
        .collect())
}
