// SPDX-License-Identifier: MIT OR Apache-2.0

//! String parsing rules shared by the [`Value`](super::Value) coercions.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use std::time::Duration;

const NAIVE_DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Parses a boolean the way configuration files tend to spell them.
///
/// Recognizes (case-insensitive) `true`, `t`, `yes`, `y`, `on`, `1` and
/// `false`, `f`, `no`, `n`, `off`, `0`.
pub(crate) fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_lowercase().as_str() {
        "true" | "t" | "yes" | "y" | "on" | "1" => Some(true),
        "false" | "f" | "no" | "n" | "off" | "0" => Some(false),
        _ => None,
    }
}

/// Truncates a float into an `i64`, rejecting values outside its range.
pub(crate) fn float_to_i64(f: f64) -> Option<i64> {
    if f.is_finite() && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        Some(f.trunc() as i64)
    } else {
        None
    }
}

pub(crate) fn parse_i64(s: &str) -> Option<i64> {
    let s = s.trim();
    s.parse::<i64>()
        .ok()
        .or_else(|| s.parse::<f64>().ok().and_then(float_to_i64))
}

pub(crate) fn parse_f64(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok()
}

/// Parses a timestamp in RFC 3339 or one of the common naive layouts.
///
/// Naive timestamps and bare dates are interpreted as UTC.
pub(crate) fn parse_time(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// Converts unix seconds (possibly fractional) into a UTC timestamp.
pub(crate) fn time_from_unix(seconds: f64) -> Option<DateTime<Utc>> {
    let whole = float_to_i64(seconds.floor())?;
    let nanos = ((seconds - seconds.floor()) * 1e9).round() as u32;
    Utc.timestamp_opt(whole, nanos.min(999_999_999)).single()
}

/// Parses a duration string.
///
/// Bare digits are nanoseconds. Anything else must be a sequence of
/// `<decimal><unit>` terms such as `1h30m`, `1.5s` or `250ms`, with units
/// `ns`, `us` (or `µs`), `ms`, `s`, `m` and `h`. Negative durations are rejected.
pub(crate) fn parse_duration(input: &str) -> Option<Duration> {
    let s = input.trim();
    if s.is_empty() {
        return None;
    }
    if s.bytes().all(|b| b.is_ascii_digit()) {
        return s.parse::<u64>().ok().map(Duration::from_nanos);
    }

    let mut rest = s.strip_prefix('+').unwrap_or(s);
    let mut total_nanos = 0f64;
    while !rest.is_empty() {
        let number_len = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        if number_len == 0 {
            return None;
        }
        let number: f64 = rest[..number_len].parse().ok()?;
        rest = &rest[number_len..];

        let unit_len = rest
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(rest.len());
        let scale = match &rest[..unit_len] {
            "ns" => 1.0,
            "us" | "µs" | "μs" => 1e3,
            "ms" => 1e6,
            "s" => 1e9,
            "m" => 60e9,
            "h" => 3600e9,
            _ => return None,
        };
        rest = &rest[unit_len..];
        total_nanos += number * scale;
    }

    if !total_nanos.is_finite() || total_nanos >= u64::MAX as f64 {
        return None;
    }
    Some(Duration::from_nanos(total_nanos.round() as u64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_bool_variants() {
        for s in ["true", "True", "T", "yes", "Y", "on", "1"] {
            assert_eq!(parse_bool(s), Some(true), "failed for {}", s);
        }
        for s in ["false", "FALSE", "f", "no", "N", "off", "0"] {
            assert_eq!(parse_bool(s), Some(false), "failed for {}", s);
        }
        assert_eq!(parse_bool("maybe"), None);
    }

    #[test]
    fn test_parse_i64_accepts_floats() {
        assert_eq!(parse_i64(" 42 "), Some(42));
        assert_eq!(parse_i64("-7"), Some(-7));
        assert_eq!(parse_i64("3.9"), Some(3));
        assert_eq!(parse_i64("inf"), None);
        assert_eq!(parse_i64("abc"), None);
    }

    #[test]
    fn test_parse_duration_units() {
        assert_eq!(parse_duration("1500"), Some(Duration::from_nanos(1500)));
        assert_eq!(parse_duration("250ms"), Some(Duration::from_millis(250)));
        assert_eq!(parse_duration("1.5s"), Some(Duration::from_millis(1500)));
        assert_eq!(parse_duration("1h30m"), Some(Duration::from_secs(5400)));
        assert_eq!(parse_duration("2m3s"), Some(Duration::from_secs(123)));
        assert_eq!(parse_duration("10us"), Some(Duration::from_micros(10)));
        assert_eq!(parse_duration("10µs"), Some(Duration::from_micros(10)));
    }

    #[test]
    fn test_parse_duration_rejects_garbage() {
        assert_eq!(parse_duration(""), None);
        assert_eq!(parse_duration("-1s"), None);
        assert_eq!(parse_duration("5 parsecs"), None);
        assert_eq!(parse_duration("s"), None);
        assert_eq!(parse_duration("1.2.3s"), None);
        assert_eq!(parse_duration("3d"), None);
    }

    #[test]
    fn test_parse_time_layouts() {
        let t = parse_time("2024-03-01T10:20:30Z").unwrap();
        assert_eq!((t.year(), t.month(), t.day()), (2024, 3, 1));
        assert_eq!((t.hour(), t.minute(), t.second()), (10, 20, 30));

        let t = parse_time("2024-03-01T12:00:00+02:00").unwrap();
        assert_eq!(t.hour(), 10);

        let t = parse_time("2024-03-01 08:15:00").unwrap();
        assert_eq!(t.minute(), 15);

        let t = parse_time("2024-03-01").unwrap();
        assert_eq!((t.hour(), t.day()), (0, 1));

        assert!(parse_time("yesterday").is_none());
    }

    #[test]
    fn test_time_from_unix() {
        let t = time_from_unix(86_400.0).unwrap();
        assert_eq!((t.year(), t.month(), t.day()), (1970, 1, 2));
        assert!(time_from_unix(f64::NAN).is_none());
    }
}
