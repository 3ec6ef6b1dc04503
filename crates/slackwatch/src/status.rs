// SPDX-FileCopyrightText: 2026 Slackwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `slackwatch status` command implementation.
//!
//! Runs the store adapter's health check and reports whether the datastore is
//! reachable with the configured credentials.

use std::io::IsTerminal;

use serde::Serialize;
use slackwatch_config::SlackwatchConfig;
use slackwatch_core::types::HealthStatus;
use slackwatch_core::{PluginAdapter, WatchError};
use slackwatch_storage::RemoteStorage;

/// Structured status output for `--json` mode.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub reachable: bool,
    pub status: String,
    pub detail: Option<String>,
    pub adapter: String,
    pub store_url: Option<String>,
}

impl StatusResponse {
    /// Only a healthy store passes; a degraded one is answering with errors.
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

/// Probes the store and summarizes the result. Never fails; problems are
/// part of the report.
pub async fn probe(storage: &RemoteStorage, store_url: Option<String>) -> StatusResponse {
    let (reachable, status, detail) = match storage.health_check().await {
        Ok(HealthStatus::Healthy) => (true, "healthy", None),
        Ok(HealthStatus::Degraded(detail)) => (true, "degraded", Some(detail)),
        Ok(HealthStatus::Unhealthy(detail)) => (false, "unreachable", Some(detail)),
        Err(WatchError::Config(detail)) => (false, "not configured", Some(detail)),
        Err(e) => (false, "error", Some(e.to_string())),
    };
    StatusResponse {
        reachable,
        status: status.to_string(),
        detail,
        adapter: storage.name().to_string(),
        store_url,
    }
}

/// Run the `slackwatch status` command.
///
/// If `--json` is passed, outputs structured JSON for scripting.
/// If `--plain` is passed or stdout is not a TTY, disables colors.
/// Exits 1 after printing when the store is not healthy.
pub async fn run_status(
    config: &SlackwatchConfig,
    json: bool,
    plain: bool,
) -> Result<(), WatchError> {
    let storage = RemoteStorage::new(config.store.clone());
    let report = probe(&storage, config.store.url.clone()).await;

    if json {
        let out = serde_json::to_string_pretty(&report)
            .map_err(|e| WatchError::Internal(format!("failed to encode status: {e}")))?;
        println!("{out}");
    } else {
        let use_color = !plain && std::io::stdout().is_terminal();
        print_status(&report, use_color);
    }
    if !report.is_healthy() {
        std::process::exit(1);
    }
    Ok(())
}

fn print_status(report: &StatusResponse, use_color: bool) {
    println!();
    println!("  slackwatch status");
    println!("  {}", "-".repeat(35));

    if use_color {
        use colored::Colorize;
        if report.reachable {
            println!("    Store:    {} {}", "✓".green(), report.status.green());
        } else {
            println!("    Store:    {} {}", "✗".red(), report.status.red());
        }
    } else {
        let tag = if report.reachable { "[OK]" } else { "[FAIL]" };
        println!("    Store:    {tag} {}", report.status);
    }

    println!(
        "    Endpoint: {}",
        report.store_url.as_deref().unwrap_or("<unset>")
    );
    if let Some(detail) = &report.detail {
        println!("    Detail:   {detail}");
    }
    println!();
}
