// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Commit authors and committers

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// An identity plus the moment it acted, as recorded in a commit header
///
/// `timestamp` is always UTC. The offset written next to the epoch in the
/// log is kept separately in `utc_offset` and never applied to `timestamp`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// Display name
    pub name: String,
    /// Email address (empty when the log carries none)
    pub email: String,
    /// When the actor acted
    pub timestamp: DateTime<Utc>,
    /// Offset east of UTC in seconds, as written in the log
    pub utc_offset: i32,
}

impl Actor {
    /// Parse the part of an `author` / `committer` line after the keyword
    ///
    /// Expected shape: `<name> <<email>> <epoch-seconds> <tz-offset>`.
    ///
    /// # Errors
    ///
    /// Returns `ParseError` if the epoch or offset is missing or malformed.
    pub fn parse(text: &str, line: usize) -> Result<Self, ParseError> {
        let expected = "actor `<name> <email> <epoch> <offset>`";
        let mut fields = text.rsplitn(3, ' ');
        let (Some(offset), Some(epoch), Some(identity)) =
            (fields.next(), fields.next(), fields.next())
        else {
            return Err(ParseError::unexpected(line, expected, text));
        };

        let seconds: i64 = epoch
            .parse()
            .map_err(|_| ParseError::unexpected(line, "epoch seconds", epoch))?;
        let timestamp = DateTime::from_timestamp(seconds, 0)
            .ok_or_else(|| ParseError::unexpected(line, "epoch in range", epoch))?;
        let utc_offset = parse_offset(offset)
            .ok_or_else(|| ParseError::unexpected(line, "timezone offset `+hhmm`", offset))?;

        let (name, email) = split_identity(identity);
        Ok(Self {
            name,
            email,
            timestamp,
            utc_offset,
        })
    }

    /// The timestamp in the actor's own timezone
    #[must_use]
    pub fn local_timestamp(&self) -> DateTime<FixedOffset> {
        // Offsets beyond a day cannot be represented; fall back to UTC.
        FixedOffset::east_opt(self.utc_offset).map_or_else(
            || self.timestamp.fixed_offset(),
            |offset| self.timestamp.with_timezone(&offset),
        )
    }
}

/// Split `Name <email>` into its parts; no brackets means no email
fn split_identity(identity: &str) -> (String, String) {
    match (identity.find('<'), identity.rfind('>')) {
        (Some(open), Some(close)) if open < close => (
            identity[..open].trim().to_string(),
            identity[open + 1..close].to_string(),
        ),
        _ => (identity.trim().to_string(), String::new()),
    }
}

/// Parse `+hhmm` / `-hhmm` into seconds east of UTC
fn parse_offset(offset: &str) -> Option<i32> {
    let (sign, digits) = match offset.as_bytes().first()? {
        b'+' => (1, &offset[1..]),
        b'-' => (-1, &offset[1..]),
        _ => return None,
    };
    if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let hours: i32 = digits[..2].parse().ok()?;
    let minutes: i32 = digits[2..].parse().ok()?;
    Some(sign * (hours * 3600 + minutes * 60))
}
