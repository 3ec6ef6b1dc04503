// SPDX-FileCopyrightText: 2026 Slackwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Remote implementation of the IssueStore trait.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use slackwatch_config::model::StoreConfig;
use slackwatch_core::types::{
    Classification, GroupId, GroupedMessage, IssueGroup, Message, MessageId, NewMessage,
};
use slackwatch_core::{AdapterType, HealthStatus, IssueStore, PluginAdapter, WatchError};

use crate::client::StoreClient;
use crate::models::ISSUE_GROUPS;
use crate::queries;

/// Issue store backed by the hosted datastore's REST interface.
///
/// Holds the store configuration and a lazily built [`StoreClient`]. The
/// client is constructed on the first operation (or by [`initialize`]) and
/// every later call reuses that same instance. Share one `RemoteStorage`
/// through an `Arc` rather than constructing several.
///
/// [`initialize`]: RemoteStorage::initialize
pub struct RemoteStorage {
    config: StoreConfig,
    client: OnceCell<StoreClient>,
}

impl RemoteStorage {
    /// Create a new RemoteStorage with the given configuration.
    ///
    /// No client is built and no configuration is checked until first use.
    pub fn new(config: StoreConfig) -> Self {
        Self {
            config,
            client: OnceCell::new(),
        }
    }

    /// Returns the client handle, building it on first call.
    ///
    /// Fails with [`WatchError::Config`] when `store.url` or `store.key` is
    /// absent or malformed. A failed build is not cached; the next call tries
    /// again.
    pub async fn client(&self) -> Result<&StoreClient, WatchError> {
        self.client
            .get_or_try_init(|| async {
                let client = StoreClient::from_config(&self.config)?;
                debug!(rest_url = %client.rest_url(), "store client initialized");
                Ok::<_, WatchError>(client)
            })
            .await
    }

    /// Builds the client eagerly so configuration errors surface at startup.
    pub async fn initialize(&self) -> Result<(), WatchError> {
        self.client().await.map(|_| ())
    }

    /// Whether the client handle has been built.
    pub fn is_initialized(&self) -> bool {
        self.client.initialized()
    }
}

#[async_trait]
impl PluginAdapter for RemoteStorage {
    fn name(&self) -> &str {
        "supabase"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, WatchError> {
        let client = self.client().await?;
        let probe: Result<Vec<serde_json::Value>, WatchError> = client
            .table(ISSUE_GROUPS)
            .select("id")
            .limit(1)
            .fetch()
            .await;
        match probe {
            Ok(_) => Ok(HealthStatus::Healthy),
            Err(e) if e.is_transient() => Ok(HealthStatus::Unhealthy(e.to_string())),
            Err(WatchError::Rejected { status, message }) => Ok(HealthStatus::Degraded(format!(
                "store answered {status}: {message}"
            ))),
            Err(e) => Err(e),
        }
    }

    async fn shutdown(&self) -> Result<(), WatchError> {
        // Nothing to flush; requests are not buffered.
        debug!(initialized = self.is_initialized(), "store adapter shut down");
        Ok(())
    }
}

#[async_trait]
impl IssueStore for RemoteStorage {
    // --- Message operations ---

    async fn store_message(
        &self,
        message: &NewMessage,
        classification: &Classification,
    ) -> Result<MessageId, WatchError> {
        queries::messages::store_message(self.client().await?, message, classification).await
    }

    async fn message_exists(&self, slack_message_id: &str) -> Result<bool, WatchError> {
        queries::messages::message_exists(self.client().await?, slack_message_id).await
    }

    async fn get_message_by_id(&self, id: &MessageId) -> Result<Option<Message>, WatchError> {
        queries::messages::get_message_by_id(self.client().await?, id).await
    }

    async fn get_messages_by_thread(&self, thread_ts: &str) -> Result<Vec<Message>, WatchError> {
        queries::messages::get_messages_by_thread(self.client().await?, thread_ts).await
    }

    // --- Issue group operations ---

    async fn create_issue_group(
        &self,
        title: &str,
        summary: &str,
        category: &str,
    ) -> Result<GroupId, WatchError> {
        queries::groups::create_issue_group(self.client().await?, title, summary, category).await
    }

    async fn get_all_issue_groups(&self) -> Result<Vec<IssueGroup>, WatchError> {
        queries::groups::get_all_issue_groups(self.client().await?).await
    }

    async fn get_issue_group_by_id(&self, id: &GroupId) -> Result<Option<IssueGroup>, WatchError> {
        queries::groups::get_issue_group_by_id(self.client().await?, id).await
    }

    async fn update_issue_group_status(
        &self,
        group_id: &GroupId,
        status: &str,
    ) -> Result<Option<IssueGroup>, WatchError> {
        queries::groups::update_issue_group_status(self.client().await?, group_id, status).await
    }

    async fn get_issue_groups_by_category(
        &self,
        category: &str,
    ) -> Result<Vec<IssueGroup>, WatchError> {
        queries::groups::get_issue_groups_by_category(self.client().await?, category).await
    }

    // --- Membership operations ---

    async fn add_message_to_group(
        &self,
        message_id: &MessageId,
        group_id: &GroupId,
        similarity_score: Option<f64>,
    ) -> Result<(), WatchError> {
        queries::groups::add_message_to_group(
            self.client().await?,
            message_id,
            group_id,
            similarity_score,
        )
        .await
    }

    async fn get_messages_in_group(
        &self,
        group_id: &GroupId,
    ) -> Result<Vec<GroupedMessage>, WatchError> {
        queries::groups::get_messages_in_group(self.client().await?, group_id).await
    }
}
