// SPDX-FileCopyrightText: 2026 Slackwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ingest pipeline: filter, log, deduplicate, store, and group one envelope.

use std::sync::Arc;

use slackwatch_core::types::{GroupId, IngestEnvelope, MessageId};
use slackwatch_core::{IssueStore, WatchError};
use tracing::{debug, info, warn};

use crate::handler::{log_message, should_handle, to_new_message};

/// What happened to one envelope.
#[derive(Debug, Clone, PartialEq)]
pub enum IngestOutcome {
    /// Subtype filtered out; not logged.
    Ignored,
    /// Logged, but no classification was attached so nothing was stored.
    LoggedOnly,
    /// A message with the same `ts` is already stored.
    Duplicate,
    /// Stored under `id`; `grouped` names the group it was linked to.
    Stored {
        id: MessageId,
        grouped: Option<GroupId>,
    },
}

/// Runs envelopes through the handler against the strict store.
///
/// The existence check fails closed: if the store cannot answer, the error
/// is returned and nothing is inserted.
#[derive(Clone)]
pub struct IngestPipeline {
    store: Arc<dyn IssueStore>,
}

impl IngestPipeline {
    pub fn new(store: Arc<dyn IssueStore>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, envelope: &IngestEnvelope) -> Result<IngestOutcome, WatchError> {
        let event = &envelope.event;
        if !should_handle(event) {
            debug!(ts = %event.ts, subtype = ?event.subtype, "ignoring message subtype");
            return Ok(IngestOutcome::Ignored);
        }

        log_message(event);

        let Some(classification) = envelope.classification.as_ref() else {
            return Ok(IngestOutcome::LoggedOnly);
        };

        let message = to_new_message(envelope)?;

        if self.store.message_exists(&message.slack_message_id).await? {
            debug!(ts = %message.slack_message_id, "message already stored");
            return Ok(IngestOutcome::Duplicate);
        }

        let id = self.store.store_message(&message, classification).await?;
        info!(
            id = %id,
            category = %classification.category,
            relevant = classification.is_relevant,
            "message stored"
        );

        let grouped = match envelope.group.as_ref() {
            Some(assignment) => {
                // The row is already stored; a failed link leaves it ungrouped.
                match self
                    .store
                    .add_message_to_group(&id, &assignment.group_id, assignment.similarity_score)
                    .await
                {
                    Ok(()) => Some(assignment.group_id.clone()),
                    Err(e) => {
                        warn!(
                            id = %id,
                            group_id = %assignment.group_id,
                            error = %e,
                            "failed to link message to group"
                        );
                        None
                    }
                }
            }
            None => None,
        };

        Ok(IngestOutcome::Stored { id, grouped })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slackwatch_core::types::{Classification, GroupAssignment, MessageEvent};
    use slackwatch_test_utils::MockStore;

    fn classified(ts: &str) -> IngestEnvelope {
        IngestEnvelope {
            event: MessageEvent {
                user: Some("U1".into()),
                text: Some("login loops back to the sign-in page".into()),
                channel: Some("C1".into()),
                ts: ts.into(),
                ..MessageEvent::default()
            },
            user_name: Some("ada".into()),
            channel_name: Some("support".into()),
            classification: Some(Classification {
                is_relevant: true,
                category: "bug".into(),
                confidence: 0.9,
                summary: "Login redirect loop".into(),
            }),
            group: None,
        }
    }

    #[tokio::test]
    async fn stores_once_then_reports_duplicate() {
        let store = Arc::new(MockStore::new());
        let pipeline = IngestPipeline::new(store.clone());

        let first = pipeline.handle(&classified("163000.0001")).await.unwrap();
        assert!(matches!(first, IngestOutcome::Stored { grouped: None, .. }));
        let second = pipeline.handle(&classified("163000.0001")).await.unwrap();
        assert_eq!(second, IngestOutcome::Duplicate);
        assert_eq!(store.message_count().await, 1);
    }

    #[tokio::test]
    async fn unclassified_is_logged_only() {
        let store = Arc::new(MockStore::new());
        let pipeline = IngestPipeline::new(store.clone());
        let bare = IngestEnvelope {
            classification: None,
            ..classified("1.1")
        };
        assert_eq!(pipeline.handle(&bare).await.unwrap(), IngestOutcome::LoggedOnly);
        assert!(store.calls().await.is_empty());
    }

    #[tokio::test]
    async fn edits_are_ignored() {
        let store = Arc::new(MockStore::new());
        let pipeline = IngestPipeline::new(store.clone());
        let mut edit = classified("1.2");
        edit.event.subtype = Some("message_changed".into());
        assert_eq!(pipeline.handle(&edit).await.unwrap(), IngestOutcome::Ignored);
        assert!(store.calls().await.is_empty());
    }

    #[tokio::test]
    async fn links_to_assigned_group() {
        let store = Arc::new(MockStore::new());
        let group = store
            .create_issue_group("Login", "Redirect loop", "bug")
            .await
            .unwrap();
        let pipeline = IngestPipeline::new(store.clone());

        let envelope = IngestEnvelope {
            group: Some(GroupAssignment {
                group_id: group.clone(),
                similarity_score: Some(0.87),
            }),
            ..classified("1.3")
        };
        let outcome = pipeline.handle(&envelope).await.unwrap();
        assert!(matches!(&outcome, IngestOutcome::Stored { grouped: Some(g), .. } if *g == group));

        let members = store.get_messages_in_group(&group).await.unwrap();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].similarity_score, Some(0.87));
    }

    #[tokio::test]
    async fn outage_fails_closed() {
        let store = Arc::new(MockStore::new());
        store.set_outage(true);
        let pipeline = IngestPipeline::new(store.clone());

        let err = pipeline.handle(&classified("1.4")).await.unwrap_err();
        assert!(err.is_transient());
        assert_eq!(store.calls().await, ["message_exists"]);

        store.set_outage(false);
        assert_eq!(store.message_count().await, 0);
    }

    #[tokio::test]
    async fn bad_ts_never_reaches_store() {
        let store = Arc::new(MockStore::new());
        let pipeline = IngestPipeline::new(store.clone());
        assert!(pipeline.handle(&classified("not-a-ts")).await.is_err());
        assert!(store.calls().await.is_empty());
    }
}
