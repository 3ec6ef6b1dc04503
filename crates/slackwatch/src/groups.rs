// SPDX-FileCopyrightText: 2026 Slackwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `slackwatch groups` subcommands.

use std::sync::Arc;

use clap::Subcommand;
use serde::Serialize;
use slackwatch_config::SlackwatchConfig;
use slackwatch_core::types::{GroupId, GroupedMessage, IssueCategory, IssueGroup, IssueStatus};
use slackwatch_core::{IssueStore, WatchError};
use slackwatch_storage::RemoteStorage;
use tracing::warn;

#[derive(Subcommand, Debug)]
pub enum GroupsCommand {
    /// List issue groups, newest first.
    List {
        /// Only groups with this category.
        #[arg(long)]
        category: Option<String>,
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Show one group and its member messages.
    Show {
        id: String,
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Create an open issue group.
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        summary: String,
        /// support, bug, feature, or question.
        #[arg(long)]
        category: String,
    },
    /// Mark a group closed.
    Close { id: String },
    /// Mark a group open again.
    Reopen { id: String },
}

#[derive(Debug, Serialize)]
struct GroupDetail<'a> {
    #[serde(flatten)]
    group: &'a IssueGroup,
    messages: &'a [GroupedMessage],
}

pub async fn run_groups(config: &SlackwatchConfig, action: GroupsCommand) -> Result<(), WatchError> {
    let storage: Arc<dyn IssueStore> = Arc::new(RemoteStorage::new(config.store.clone()));
    let out = execute(storage.as_ref(), action).await?;
    print!("{out}");
    Ok(())
}

/// Runs one subcommand against `store` and returns what it prints.
pub async fn execute(store: &dyn IssueStore, action: GroupsCommand) -> Result<String, WatchError> {
    match action {
        GroupsCommand::List { category, json } => {
            let groups = match category.as_deref() {
                Some(category) => store.get_issue_groups_by_category(category).await?,
                None => store.get_all_issue_groups().await?,
            };
            if json {
                to_json(&groups)
            } else {
                Ok(render_list(&groups))
            }
        }
        GroupsCommand::Show { id, json } => {
            let id = GroupId(id);
            let group = store
                .get_issue_group_by_id(&id)
                .await?
                .ok_or_else(|| not_found(&id))?;
            let messages = store.get_messages_in_group(&id).await?;
            if json {
                to_json(&GroupDetail {
                    group: &group,
                    messages: &messages,
                })
            } else {
                Ok(render_detail(&group, &messages))
            }
        }
        GroupsCommand::Create {
            title,
            summary,
            category,
        } => {
            if category.parse::<IssueCategory>().is_err() {
                warn!(category = %category, "category is not one of support/bug/feature/question");
            }
            let id = store.create_issue_group(&title, &summary, &category).await?;
            Ok(format!("{id}\n"))
        }
        GroupsCommand::Close { id } => set_status(store, GroupId(id), IssueStatus::Closed).await,
        GroupsCommand::Reopen { id } => set_status(store, GroupId(id), IssueStatus::Open).await,
    }
}

async fn set_status(
    store: &dyn IssueStore,
    id: GroupId,
    status: IssueStatus,
) -> Result<String, WatchError> {
    let group = store
        .update_issue_group_status(&id, status.as_str())
        .await?
        .ok_or_else(|| not_found(&id))?;
    Ok(format!("{} is now {}\n", group.id, group.status))
}

fn not_found(id: &GroupId) -> WatchError {
    WatchError::NotFound {
        entity: "issue group",
        id: id.to_string(),
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, WatchError> {
    serde_json::to_string_pretty(value)
        .map(|s| s + "\n")
        .map_err(|e| WatchError::Internal(format!("failed to encode output: {e}")))
}

fn render_list(groups: &[IssueGroup]) -> String {
    if groups.is_empty() {
        return "no issue groups\n".to_string();
    }
    groups
        .iter()
        .map(|g| {
            format!(
                "{:<8} {:<9} {}  {}  ({})\n",
                g.status,
                g.category,
                g.created_at.format("%Y-%m-%d %H:%M"),
                g.title,
                g.id
            )
        })
        .collect()
}

fn render_detail(group: &IssueGroup, messages: &[GroupedMessage]) -> String {
    let mut out = format!(
        "{} [{}] ({})\n  {}\n  id: {}  created: {}\n",
        group.title,
        group.status,
        group.category,
        group.summary,
        group.id,
        group.created_at.to_rfc3339()
    );
    out.push_str(&format!("  messages: {}\n", messages.len()));
    for m in messages {
        let score = m
            .similarity_score
            .map(|s| format!(" (score {s:.2})"))
            .unwrap_or_default();
        out.push_str(&format!(
            "    {} #{} @{}: {}{score}\n",
            m.message.timestamp.format("%Y-%m-%d %H:%M"),
            m.message.channel_name,
            m.message.user_name,
            m.message.text
        ));
    }
    out
}
