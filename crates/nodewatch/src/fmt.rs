//! Human-readable formatting for node telemetry.

use std::time::Duration;

use chrono::{DateTime, Utc};

const UNITS: [&str; 6] = ["B", "KB", "MB", "GB", "TB", "PB"];

/// Bytes as a binary-prefixed size, e.g. `1.50 GB`.
pub fn storage(bytes: f64) -> String {
    if !bytes.is_finite() || bytes <= 0.0 {
        return "0 B".into();
    }
    let mut value = bytes;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{value:.0} B")
    } else {
        format!("{value:.2} {}", UNITS[unit])
    }
}

/// Used over total storage, e.g. `1.00 TB / 4.00 TB (25%)`.
pub fn storage_usage(used: Option<f64>, total: Option<f64>) -> String {
    match (used, total) {
        (Some(used), Some(total)) if total > 0.0 => {
            format!(
                "{} / {} ({:.0}%)",
                storage(used),
                storage(total),
                used / total * 100.0
            )
        }
        (None, Some(total)) => storage(total),
        _ => "-".into(),
    }
}

pub fn uptime(percent: f64) -> String {
    format!("{percent:.2}%")
}

pub fn latency(ms: f64) -> String {
    format!("{ms:.0} ms")
}

/// Shorten a public key to `first8...last6`.
pub fn truncate_pubkey(pubkey: &str) -> String {
    const HEAD: usize = 8;
    const TAIL: usize = 6;

    let chars: Vec<char> = pubkey.chars().collect();
    if chars.len() <= HEAD + TAIL {
        return pubkey.to_owned();
    }
    let head: String = chars[..HEAD].iter().collect();
    let tail: String = chars[chars.len() - TAIL..].iter().collect();
    format!("{head}...{tail}")
}

/// `at` relative to `now`, e.g. `5 minutes ago`.
pub fn relative_time(at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - at).num_seconds().max(0);
    let (amount, unit) = match seconds {
        s if s >= 86_400 => (s / 86_400, "day"),
        s if s >= 3_600 => (s / 3_600, "hour"),
        s if s >= 60 => (s / 60, "minute"),
        s => (s, "second"),
    };
    let plural = if amount == 1 { "" } else { "s" };
    format!("{amount} {unit}{plural} ago")
}

/// A `last_seen` value for tables: relative, or `never`.
pub fn last_seen(at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    at.map_or_else(|| "never".into(), |at| relative_time(at, now))
}

/// Backend uptime in seconds, e.g. `3days 2h 5m`.
pub fn duration_secs(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return "-".into();
    }
    let whole = Duration::from_secs_f64(seconds);
    humantime::format_duration(Duration::from_secs(whole.as_secs())).to_string()
}

pub fn optional<T>(value: Option<T>, f: impl FnOnce(T) -> String) -> String {
    value.map_or_else(|| "-".into(), f)
}
