// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time formatting.

use chrono::{DateTime, Utc};

/// Compact relative age: "just now", "5m ago", "3h ago", "2d ago", "1w ago".
pub fn time_ago(date: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - date).num_seconds().max(0);

    match seconds {
        s if s < 60 => "just now".to_string(),
        s if s < 3_600 => format!("{}m ago", s / 60),
        s if s < 86_400 => format!("{}h ago", s / 3_600),
        s if s < 604_800 => format!("{}d ago", s / 86_400),
        s => format!("{}w ago", s / 604_800),
    }
}

/// [`time_ago`] for an RFC3339 string. Unparseable input is returned as is.
pub fn time_ago_rfc3339(raw: &str, now: DateTime<Utc>) -> String {
    DateTime::parse_from_rfc3339(raw)
        .map(|d| time_ago(d.with_timezone(&Utc), now))
        .unwrap_or_else(|_| raw.to_string())
}
