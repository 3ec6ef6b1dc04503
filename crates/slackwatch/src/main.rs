// SPDX-FileCopyrightText: 2026 Slackwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! slackwatch - chat message monitor backed by a hosted datastore.
//!
//! This is the binary entry point.

mod groups;
mod messages;
mod serve;
mod status;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use slackwatch_config::SlackwatchConfig;
use slackwatch_core::redact::redact;

/// slackwatch - record chat messages and issue groups in a hosted datastore.
#[derive(Parser, Debug)]
#[command(name = "slackwatch", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the XDG hierarchy.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Ingest JSON-lines message envelopes from stdin until EOF or a signal.
    Serve,
    /// Check whether the datastore is reachable.
    Status {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
        /// Disable colors.
        #[arg(long)]
        plain: bool,
    },
    /// Inspect and manage issue groups.
    Groups {
        #[command(subcommand)]
        action: groups::GroupsCommand,
    },
    /// Inspect stored messages.
    Messages {
        #[command(subcommand)]
        action: messages::MessagesCommand,
    },
}

#[tokio::main]
async fn main() {
    if let Some(warning) = dotenv_warning(dotenvy::dotenv()) {
        eprintln!("warning: {warning}");
    }

    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => slackwatch_config::load_and_validate_path(path),
        None => slackwatch_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            slackwatch_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.monitor.log_level);

    let result = match cli.command {
        Some(Commands::Serve) => serve::run_serve(config.clone()).await,
        Some(Commands::Status { json, plain }) => status::run_status(&config, json, plain).await,
        Some(Commands::Groups { action }) => groups::run_groups(&config, action).await,
        Some(Commands::Messages { action }) => messages::run_messages(&config, action).await,
        None => {
            println!("slackwatch: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {}", redact(&e.to_string(), &secrets(&config)));
        std::process::exit(1);
    }
}

/// Problem worth reporting from loading `.env`. A missing file is not one;
/// deployments usually set the variables directly.
fn dotenv_warning(result: Result<PathBuf, dotenvy::Error>) -> Option<String> {
    match result {
        Ok(_) => None,
        Err(e) if e.not_found() => None,
        Err(e) => Some(format!("failed to load .env: {e}")),
    }
}

/// Configured credentials, for scrubbing from error output.
fn secrets(config: &SlackwatchConfig) -> Vec<&str> {
    [
        config.store.key.as_deref(),
        config.slack.bot_token.as_deref(),
        config.slack.app_token.as_deref(),
    ]
    .into_iter()
    .flatten()
    .filter(|s| !s.is_empty())
    .collect()
}

/// Logs go to stderr so `--json` output and the stdin feed stay clean.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("slackwatch={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .init();
}
