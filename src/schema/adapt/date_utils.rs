//! Parsing of the date and timestamp text found in rowset data.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Formats accepted for a timestamp, tried in order
const DATE_TIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"];

/// Parse a calendar date with an optional time part
///
/// Answers emits date columns either as `2012-01-01` or, depending on the
/// column's data type, as `2012-01-01T00:00:00`. Any time part is dropped.
pub fn parse_local_date(s: &str) -> anyhow::Result<NaiveDate> {
    let date_part = match s.split_once('T') {
        Some((date, _time)) => date,
        None => s,
    };

    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .map_err(|e| anyhow::anyhow!("'{s}' is not a date of the form YYYY-MM-DD: {e}"))
}

/// Parse a timestamp of the form `YYYY-MM-DDTHH:MM:SS[.fff]`
pub fn parse_date_time(s: &str) -> anyhow::Result<NaiveDateTime> {
    for format in DATE_TIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(parsed);
        }
    }

    anyhow::bail!("'{s}' is not a timestamp of the form YYYY-MM-DDTHH:MM:SS")
}

/// Parse a timestamp and read it as UTC
pub fn parse_utc_date_time(s: &str) -> anyhow::Result<DateTime<Utc>> {
    Ok(parse_date_time(s)?.and_utc())
}

/// Render a date the way Answers expects it inside a report variable
#[must_use]
pub fn date_literal(date: NaiveDate) -> String {
    format!("date '{}'", date.format("%Y-%m-%d"))
}
