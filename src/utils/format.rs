// src/utils/format.rs
use chrono::{DateTime, SubsecRound, Utc};

use crate::models::StoredEntry;

// Current UTC time truncated to whole seconds
pub fn now_utc() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(0)
}

/// ISO-8601 at second precision with a literal `Z`, e.g. `2024-01-01T00:00:00Z`.
pub fn format_timestamp(time: DateTime<Utc>) -> String {
    time.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

pub fn current_timestamp() -> String {
    format_timestamp(now_utc())
}

// Label used when the caller did not supply one
pub fn default_label() -> String {
    label_for_timestamp(&current_timestamp())
}

pub fn label_for_timestamp(timestamp: &str) -> String {
    format!("entry-{}", timestamp)
}

// Multi-line block shown by `search`
pub fn render_entry(entry: &StoredEntry) -> String {
    let enabled = entry.options.enabled_names();
    let enabled = if enabled.is_empty() {
        "none".to_string()
    } else {
        enabled.join(", ")
    };

    format!(
        "label: {}\n  hash: {}\n  length: {}\n  options: {}\n  created_at: {}",
        entry.label, entry.hash, entry.length, enabled, entry.created_at
    )
}

/// Hide the password part of a connection string before it is shown or logged.
///
/// Covers both `user:pass@host` and a `password=` query parameter.
pub fn redact_dsn(dsn: &str) -> String {
    let (base, query) = match dsn.split_once('?') {
        Some((base, query)) => (base, Some(query)),
        None => (dsn, None),
    };

    let mut redacted = redact_userinfo(base);
    if let Some(query) = query {
        let params: Vec<String> = query
            .split('&')
            .map(|param| match param.split_once('=') {
                Some((key, _)) if key.eq_ignore_ascii_case("password") => format!("{}=***", key),
                _ => param.to_string(),
            })
            .collect();
        redacted.push('?');
        redacted.push_str(&params.join("&"));
    }
    redacted
}

fn redact_userinfo(dsn: &str) -> String {
    let Some(scheme_end) = dsn.find("://") else {
        return dsn.to_string();
    };
    let authority_start = scheme_end + 3;
    let authority_end = dsn[authority_start..]
        .find('/')
        .map_or(dsn.len(), |i| authority_start + i);
    let authority = &dsn[authority_start..authority_end];

    let Some(at) = authority.rfind('@') else {
        return dsn.to_string();
    };
    let userinfo = &authority[..at];
    let Some(colon) = userinfo.find(':') else {
        return dsn.to_string();
    };

    format!(
        "{}{}:***{}",
        &dsn[..authority_start],
        &userinfo[..colon],
        &dsn[authority_start + at..]
    )
}
