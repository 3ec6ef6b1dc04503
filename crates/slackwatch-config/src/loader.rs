// SPDX-FileCopyrightText: 2026 Slackwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./slackwatch.toml` > `~/.config/slackwatch/slackwatch.toml`
//! > `/etc/slackwatch/slackwatch.toml`, with environment variable overrides via the
//! `SLACKWATCH_` prefix and the bare `SUPABASE_*` / `SLACK_*` variables.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::SlackwatchConfig;

/// Bare environment variables and the config keys they set.
const LEGACY_ENV_KEYS: &[(&str, &str)] = &[
    ("supabase_url", "store.url"),
    ("supabase_key", "store.key"),
    ("slack_bot_token", "slack.bot_token"),
    ("slack_app_token", "slack.app_token"),
];

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/slackwatch/slackwatch.toml` (system-wide)
/// 3. `~/.config/slackwatch/slackwatch.toml` (user XDG config)
/// 4. `./slackwatch.toml` (local directory)
/// 5. `SLACKWATCH_*` environment variables
/// 6. `SUPABASE_URL`, `SUPABASE_KEY`, `SLACK_BOT_TOKEN`, `SLACK_APP_TOKEN`
pub fn load_config() -> Result<SlackwatchConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<SlackwatchConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SlackwatchConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<SlackwatchConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SlackwatchConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .merge(legacy_env_provider())
        .extract()
}

/// Build the Figment used internally for config loading (exposed for diagnostic use).
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(SlackwatchConfig::default()))
        .merge(Toml::file("/etc/slackwatch/slackwatch.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("slackwatch/slackwatch.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("slackwatch.toml"))
        .merge(env_provider())
        .merge(legacy_env_provider())
}

/// `SLACKWATCH_*` variables, mapped section-by-section.
///
/// Uses `Env::map()` rather than `Env::split("_")` because key names contain
/// underscores: `SLACKWATCH_STORE_TIMEOUT_SECS` must map to
/// `store.timeout_secs`, not `store.timeout.secs`.
fn env_provider() -> Env {
    Env::prefixed("SLACKWATCH_").map(|key| {
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("monitor_", "monitor.", 1)
            .replacen("slack_", "slack.", 1)
            .replacen("store_", "store.", 1);
        mapped.into()
    })
}

/// The unprefixed variables the deployment `.env` files already use.
fn legacy_env_provider() -> Env {
    let names: Vec<&str> = LEGACY_ENV_KEYS.iter().map(|(env, _)| *env).collect();
    Env::raw().only(&names).map(|key| {
        LEGACY_ENV_KEYS
            .iter()
            .find(|(env, _)| key.as_str().eq_ignore_ascii_case(env))
            .map(|(_, target)| (*target).into())
            .unwrap_or_else(|| key.as_str().to_string().into())
    })
}
