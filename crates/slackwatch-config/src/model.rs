// SPDX-FileCopyrightText: 2026 Slackwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for slackwatch.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level slackwatch configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SlackwatchConfig {
    /// Process identity and logging.
    #[serde(default)]
    pub monitor: MonitorConfig,

    /// Chat platform credentials.
    #[serde(default)]
    pub slack: SlackConfig,

    /// Remote datastore connection.
    #[serde(default)]
    pub store: StoreConfig,
}

/// Process identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MonitorConfig {
    /// Display name used in logs and status output.
    #[serde(default = "default_monitor_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            name: default_monitor_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_monitor_name() -> String {
    "slackwatch".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Chat platform credentials.
///
/// The socket connection itself is managed outside slackwatch; the tokens
/// are carried so the operator can confirm which workspace is configured.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SlackConfig {
    /// Bot token (`xoxb-...`).
    #[serde(default)]
    pub bot_token: Option<String>,

    /// App-level token for Socket Mode (`xapp-...`).
    #[serde(default)]
    pub app_token: Option<String>,
}

/// Remote datastore configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    /// Project endpoint, e.g. `https://abc.supabase.co`. Required to open the store.
    #[serde(default)]
    pub url: Option<String>,

    /// Access key sent as `apikey` and bearer token. Required to open the store.
    #[serde(default)]
    pub key: Option<String>,

    /// Transport timeout for every store request.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: None,
            key: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}
