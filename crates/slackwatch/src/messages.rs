// SPDX-FileCopyrightText: 2026 Slackwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `slackwatch messages` subcommands.

use clap::Subcommand;
use slackwatch_config::SlackwatchConfig;
use slackwatch_core::types::{Message, MessageId};
use slackwatch_core::{IssueStore, WatchError};
use slackwatch_storage::RemoteStorage;

#[derive(Subcommand, Debug)]
pub enum MessagesCommand {
    /// Show one stored message as JSON.
    Show { id: String },
    /// List a thread's messages, oldest first.
    Thread { thread_ts: String },
    /// Check whether a message `ts` is stored. Exits 1 when it is not.
    Exists { ts: String },
}

pub async fn run_messages(
    config: &SlackwatchConfig,
    action: MessagesCommand,
) -> Result<(), WatchError> {
    let storage = RemoteStorage::new(config.store.clone());
    let exists_check = matches!(action, MessagesCommand::Exists { .. });
    let out = execute(&storage, action).await?;
    print!("{out}");
    if exists_check && out.trim() == "false" {
        std::process::exit(1);
    }
    Ok(())
}

/// Runs one subcommand against `store` and returns what it prints.
pub async fn execute(
    store: &dyn IssueStore,
    action: MessagesCommand,
) -> Result<String, WatchError> {
    match action {
        MessagesCommand::Show { id } => {
            let id = MessageId(id);
            let message = store
                .get_message_by_id(&id)
                .await?
                .ok_or_else(|| WatchError::NotFound {
                    entity: "message",
                    id: id.to_string(),
                })?;
            serde_json::to_string_pretty(&message)
                .map(|s| s + "\n")
                .map_err(|e| WatchError::Internal(format!("failed to encode output: {e}")))
        }
        MessagesCommand::Thread { thread_ts } => {
            let thread = store.get_messages_by_thread(&thread_ts).await?;
            Ok(render_thread(&thread))
        }
        MessagesCommand::Exists { ts } => {
            let exists = store.message_exists(&ts).await?;
            Ok(format!("{exists}\n"))
        }
    }
}

fn render_thread(thread: &[Message]) -> String {
    if thread.is_empty() {
        return "no messages in thread\n".to_string();
    }
    thread
        .iter()
        .map(|m| {
            let marker = if m.classification.is_relevant { "*" } else { " " };
            format!(
                "{marker} {} @{}: {}  [{} {:.2}]\n",
                m.timestamp.format("%Y-%m-%d %H:%M:%S"),
                m.user_name,
                m.text,
                m.classification.category,
                m.classification.confidence
            )
        })
        .collect()
}
