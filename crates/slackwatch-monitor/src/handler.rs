// SPDX-FileCopyrightText: 2026 Slackwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Event filtering, logging, and conversion.
//!
//! Decides whether an incoming message event is worth handling, logs it, and
//! turns an envelope into the [`NewMessage`] row the store expects.

use chrono::{DateTime, TimeZone, Utc};
use slackwatch_core::WatchError;
use slackwatch_core::types::{IngestEnvelope, MessageEvent, NewMessage};
use tracing::info;

/// Placeholder for a missing user or channel.
pub const UNKNOWN: &str = "Unknown";

/// Subtypes that still carry a user-visible message.
const HANDLED_SUBTYPES: &[&str] = &["bot_message", "file_share", "thread_broadcast"];

/// Checks whether the event should be handled.
///
/// Plain messages (no subtype) pass. Edits, deletions, channel joins and
/// other housekeeping subtypes are ignored.
pub fn should_handle(event: &MessageEvent) -> bool {
    match event.subtype.as_deref() {
        None => true,
        Some(subtype) => HANDLED_SUBTYPES.contains(&subtype),
    }
}

/// Logs user, channel and text of an event at info level.
pub fn log_message(event: &MessageEvent) {
    let user = event.user.as_deref().unwrap_or(UNKNOWN);
    let channel = event.channel.as_deref().unwrap_or(UNKNOWN);
    let text = event.text.as_deref().unwrap_or("");
    info!(user, channel, text, ts = %event.ts, "message received");
}

/// Parses a platform `ts` ("1630000000.000100") into a UTC timestamp.
///
/// The fractional part is a decimal fraction of a second, at most nine digits.
pub fn parse_ts(ts: &str) -> Result<DateTime<Utc>, WatchError> {
    let invalid = || WatchError::Channel {
        message: format!("invalid message ts `{ts}`"),
        source: None,
    };
    let (secs, frac) = ts.split_once('.').unwrap_or((ts, ""));
    if secs.is_empty() || !secs.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    if frac.len() > 9 || !frac.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    let secs: i64 = secs.parse().map_err(|_| invalid())?;
    let nanos: u32 = if frac.is_empty() {
        0
    } else {
        format!("{frac:0<9}").parse().map_err(|_| invalid())?
    };
    Utc.timestamp_opt(secs, nanos).single().ok_or_else(invalid)
}

/// Converts an envelope into a message row.
///
/// Bot messages without a `user` fall back to `bot_id`. Display names
/// default to the ids. A missing channel or an unparseable `ts` is an error.
pub fn to_new_message(envelope: &IngestEnvelope) -> Result<NewMessage, WatchError> {
    let event = &envelope.event;
    let channel_id = event.channel.clone().ok_or_else(|| WatchError::Channel {
        message: format!("message {} has no channel", event.ts),
        source: None,
    })?;
    let user_id = event
        .user
        .clone()
        .or_else(|| event.bot_id.clone())
        .unwrap_or_else(|| UNKNOWN.to_string());

    Ok(NewMessage {
        slack_message_id: event.ts.clone(),
        user_name: envelope.user_name.clone().unwrap_or_else(|| user_id.clone()),
        channel_name: envelope
            .channel_name
            .clone()
            .unwrap_or_else(|| channel_id.clone()),
        user_id,
        channel_id,
        text: event.text.clone().unwrap_or_default(),
        thread_ts: event.thread_ts.clone(),
        timestamp: parse_ts(&event.ts)?,
    })
}
