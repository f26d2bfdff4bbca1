use std::sync::LazyLock;

use chrono::{DateTime, NaiveDateTime, TimeDelta, Utc};
use regex::Regex;

use rdstail_types::TailError;

/// One `<decimal><unit>` term of a relative duration such as `1h30m`
static DURATION_TERM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+(?:\.\d*)?|\.\d+)(ns|us|µs|μs|ms|s|m|h)").expect("valid duration regex")
});

const NAIVE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A candidate interpretation of a `--since` value
type Candidate = fn(&str, DateTime<Utc>) -> Option<DateTime<Utc>>;

/// Tried in order, first success wins
const CANDIDATES: [(&str, Candidate); 3] = [
    ("duration", from_duration),
    ("timestamp", from_naive_timestamp),
    ("rfc3339", from_rfc3339),
];

/// Resolve a `--since` value into an absolute cutoff
///
/// Returns `Ok(None)` when no value (or an empty one) was given, meaning every
/// line passes.
pub fn resolve_cutoff(
    since: Option<&str>,
    now: DateTime<Utc>,
) -> Result<Option<DateTime<Utc>>, TailError> {
    let Some(since) = since.filter(|s| !s.is_empty()) else {
        return Ok(None);
    };

    for (kind, candidate) in CANDIDATES {
        if let Some(cutoff) = candidate(since, now) {
            tracing::debug!(since, kind, %cutoff, "resolved cutoff");
            return Ok(Some(cutoff));
        }
    }

    Err(TailError::InvalidSince(since.to_string()))
}

fn from_duration(s: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let duration = parse_duration(s)?;
    now.checked_sub_signed(duration)
}

fn from_naive_timestamp(s: &str, _now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(s, NAIVE_FORMAT)
        .ok()
        .map(|ts| ts.and_utc())
}

fn from_rfc3339(s: &str, _now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|ts| ts.with_timezone(&Utc))
}

/// Parse a duration like `300ms`, `-1.5h` or `2h45m`
pub fn parse_duration(s: &str) -> Option<TimeDelta> {
    let (negative, mut rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    if rest == "0" {
        return Some(TimeDelta::zero());
    }
    if rest.is_empty() {
        return None;
    }

    let mut total_nanos = 0f64;
    while !rest.is_empty() {
        let caps = DURATION_TERM.captures(rest)?;
        let value: f64 = caps[1].parse().ok()?;
        total_nanos += value * unit_nanos(&caps[2]);
        rest = &rest[caps[0].len()..];
    }

    if total_nanos >= i64::MAX as f64 {
        return None;
    }
    let nanos = total_nanos as i64;
    Some(TimeDelta::nanoseconds(if negative { -nanos } else { nanos }))
}

fn unit_nanos(unit: &str) -> f64 {
    match unit {
        "ns" => 1.0,
        "us" | "µs" | "μs" => 1e3,
        "ms" => 1e6,
        "s" => 1e9,
        "m" => 60.0 * 1e9,
        _ => 3600.0 * 1e9,
    }
}
