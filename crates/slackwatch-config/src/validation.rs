// SPDX-FileCopyrightText: 2026 Slackwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as URL schemes, non-empty keys, and known log levels.

use crate::diagnostic::ConfigError;
use crate::model::SlackwatchConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
///
/// Store credentials are optional here: commands that never touch the store
/// must still start. Their absence is reported when the store is opened.
pub fn validate_config(config: &SlackwatchConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let level = config.monitor.log_level.trim().to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "monitor.log_level `{}` is not one of {}",
                config.monitor.log_level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    if let Some(url) = config.store.url.as_deref() {
        let url = url.trim();
        if url.is_empty() {
            errors.push(ConfigError::Validation {
                message: "store.url must not be empty when set".to_string(),
            });
        } else if !(url.starts_with("https://") || url.starts_with("http://")) {
            errors.push(ConfigError::Validation {
                message: format!("store.url `{url}` must start with http:// or https://"),
            });
        }
    }

    if let Some(key) = config.store.key.as_deref()
        && key.trim().is_empty()
    {
        errors.push(ConfigError::Validation {
            message: "store.key must not be empty when set".to_string(),
        });
    }

    if config.store.timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "store.timeout_secs must be at least 1".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn has_error(errors: &[ConfigError], needle: &str) -> bool {
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains(needle)))
    }

    #[test]
    fn default_config_validates() {
        let config = SlackwatchConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn unknown_log_level_fails_validation() {
        let mut config = SlackwatchConfig::default();
        config.monitor.log_level = "verbose".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "monitor.log_level"));
    }

    #[test]
    fn log_level_is_case_insensitive() {
        let mut config = SlackwatchConfig::default();
        config.monitor.log_level = "DEBUG".to_string();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn non_http_store_url_fails_validation() {
        let mut config = SlackwatchConfig::default();
        config.store.url = Some("postgres://db.example.com".to_string());
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "store.url"));
    }

    #[test]
    fn blank_store_key_fails_validation() {
        let mut config = SlackwatchConfig::default();
        config.store.key = Some("   ".to_string());
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "store.key"));
    }

    #[test]
    fn collects_every_error() {
        let mut config = SlackwatchConfig::default();
        config.monitor.log_level = "loud".to_string();
        config.store.url = Some("".to_string());
        config.store.timeout_secs = 0;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn valid_custom_config_passes() {
        let mut config = SlackwatchConfig::default();
        config.store.url = Some("https://abc.supabase.co".to_string());
        config.store.key = Some("anon-key".to_string());
        config.store.timeout_secs = 5;
        assert!(validate_config(&config).is_ok());
    }
}
