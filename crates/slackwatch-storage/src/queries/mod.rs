// SPDX-FileCopyrightText: 2026 Slackwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! One function per table call, grouped by record kind.

pub mod groups;
pub mod messages;
