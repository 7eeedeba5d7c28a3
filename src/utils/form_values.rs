use chrono::{NaiveDate, NaiveDateTime};

/// Formats accepted after the ISO forms `NaiveDateTime::from_str` handles.
/// `datetime-local` inputs omit seconds.
const TIMESTAMP_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"];

/// Parse a form timestamp such as `2024-01-01T08:00:00` or `2024-01-01T08:00`.
pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime, String> {
    let value = value.trim();
    if let Ok(ts) = value.parse::<NaiveDateTime>() {
        return Ok(ts);
    }
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .ok_or_else(|| format!("invalid timestamp {value:?}"))
}

pub fn parse_date(value: &str) -> Result<NaiveDate, String> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| format!("invalid date {value:?}"))
}

/// Empty and whitespace-only form values count as absent.
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
