//! Date helpers for sample and aggregate queries.
//!
//! The API takes ISO 8601 dates (`2012-03-02`) or datetimes without seconds
//! (`2012-03-01T12:00`), interpreted as UTC.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeDelta, Utc};

const API_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Format a time the way the sample endpoints expect it.
pub fn format_api_time(dt: DateTime<Utc>) -> String {
    dt.format(API_TIME_FORMAT).to_string()
}

/// Parse `2012-03-02`, `2012-03-01T12:00`, `2012-03-01T12:00:30` or RFC 3339.
pub fn parse_api_time(s: &str) -> Result<DateTime<Utc>, String> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    for fmt in [API_TIME_FORMAT, "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| format!("Invalid date: {}", s))
}

/// Parse a range such as `30min`, `2hours` or `7days` into seconds.
pub fn parse_range(range_str: &str) -> Result<u64, String> {
    let s = range_str.trim().to_lowercase().replace(' ', "");
    let num_end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    let num: u64 = s[..num_end]
        .parse()
        .map_err(|_| format!("Invalid range: {}", range_str))?;
    let unit_secs: u64 = match &s[num_end..] {
        u if u.starts_with("min") => 60,
        u if u.starts_with('h') => 3600,
        u if u.starts_with('d') => 86_400,
        u if u.starts_with('w') => 7 * 86_400,
        _ => return Err(format!("Unknown time unit in range: {}", range_str)),
    };
    num.checked_mul(unit_secs)
        .ok_or_else(|| format!("Range too large: {}", range_str))
}

/// `(startDate, endDate)` covering `range` and ending at `end` (or now).
pub fn sample_window(range: &str, end: Option<&str>) -> Result<(String, String), String> {
    let end_time = match end {
        Some(t) => parse_api_time(t)?,
        None => Utc::now(),
    };
    let secs = parse_range(range)?;
    let start_time = i64::try_from(secs)
        .ok()
        .and_then(TimeDelta::try_seconds)
        .and_then(|delta| end_time.checked_sub_signed(delta))
        .ok_or_else(|| format!("Range too large: {}", range))?;
    Ok((format_api_time(start_time), format_api_time(end_time)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_range() {
        assert_eq!(parse_range("30min").unwrap(), 30 * 60);
        assert_eq!(parse_range("2 hours").unwrap(), 7200);
        assert_eq!(parse_range("1day").unwrap(), 86400);
        assert_eq!(parse_range("7days").unwrap(), 7 * 86400);
        assert_eq!(parse_range("1week").unwrap(), 7 * 86400);
        assert!(parse_range("days").is_err());
        assert!(parse_range("5parsecs").is_err());
    }

    #[test]
    fn test_parse_range_overflow() {
        let err = parse_range("999999999999999days").unwrap_err();
        assert!(err.contains("too large"), "{}", err);
        assert!(parse_range("99999999999999999999min").is_err());
    }

    #[test]
    fn test_parse_api_time_forms() {
        let a = parse_api_time("2012-03-01T12:00").unwrap();
        let b = parse_api_time("2012-03-01T12:00:00Z").unwrap();
        assert_eq!(a, b);
        let d = parse_api_time("2012-03-02").unwrap();
        assert_eq!(format_api_time(d), "2012-03-02T00:00");
        assert!(parse_api_time("yesterday").is_err());
    }

    #[test]
    fn test_sample_window() {
        let (start, end) = sample_window("1day", Some("2012-03-02T12:00")).unwrap();
        assert_eq!(start, "2012-03-01T12:00");
        assert_eq!(end, "2012-03-02T12:00");
    }

    #[test]
    fn test_sample_window_out_of_range() {
        let err = sample_window("100000000days", Some("2012-03-02")).unwrap_err();
        assert!(err.contains("too large"), "{}", err);
        assert!(sample_window("2000000000000000weeks", None).is_err());
    }
}
