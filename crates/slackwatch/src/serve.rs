// SPDX-FileCopyrightText: 2026 Slackwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `slackwatch serve` command implementation.
//!
//! Opens the remote store, checks it once, and runs the monitor loop over
//! JSON-lines envelopes on stdin until EOF or SIGINT/SIGTERM.

use std::sync::Arc;

use slackwatch_config::SlackwatchConfig;
use slackwatch_core::redact::token_preview;
use slackwatch_core::types::HealthStatus;
use slackwatch_core::{PluginAdapter, WatchError};
use slackwatch_monitor::shutdown::install_signal_handler;
use slackwatch_monitor::{JsonLinesSource, MonitorLoop};
use slackwatch_storage::RemoteStorage;
use tracing::{info, warn};

/// Runs the `slackwatch serve` command.
pub async fn run_serve(config: SlackwatchConfig) -> Result<(), WatchError> {
    info!(
        name = config.monitor.name.as_str(),
        version = env!("CARGO_PKG_VERSION"),
        "starting slackwatch"
    );
    log_credentials(&config);

    let storage = Arc::new(RemoteStorage::new(config.store.clone()));
    // Missing store.url / store.key is fatal here rather than on the first event.
    storage.initialize().await?;

    match storage.health_check().await {
        Ok(HealthStatus::Healthy) => info!("store reachable"),
        Ok(HealthStatus::Degraded(detail)) => warn!(detail = %detail, "store degraded"),
        Ok(HealthStatus::Unhealthy(detail)) => {
            warn!(detail = %detail, "store unreachable, events will fail until it recovers")
        }
        Err(e) => warn!(error = %e, "store health check failed"),
    }

    let cancel = install_signal_handler();
    let source = Arc::new(JsonLinesSource::stdin());
    let mut monitor = MonitorLoop::new(source, storage.clone());
    let stats = monitor.run(cancel).await?;

    storage.shutdown().await?;
    info!(
        stored = stats.stored,
        failed = stats.failed,
        "slackwatch stopped"
    );
    Ok(())
}

/// Logs which credentials are configured, never their full values.
fn log_credentials(config: &SlackwatchConfig) {
    let preview = |value: &Option<String>| {
        value
            .as_deref()
            .map(token_preview)
            .unwrap_or_else(|| "<unset>".to_string())
    };
    info!(
        bot_token = %preview(&config.slack.bot_token),
        app_token = %preview(&config.slack.app_token),
        store_url = config.store.url.as_deref().unwrap_or("<unset>"),
        "credentials loaded"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn serve_without_store_config_fails_fast() {
        let config = SlackwatchConfig::default();
        let err = run_serve(config).await.unwrap_err();
        assert!(matches!(err, WatchError::Config(_)));
    }
}
