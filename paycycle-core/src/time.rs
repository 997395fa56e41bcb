//! Time utilities: "today" in the user's timezone and date parsing.

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

/// Parse an IANA timezone like "America/Chicago".
pub fn parse_tz(tz: &str) -> Result<Tz> {
    tz.parse()
        .map_err(|_| anyhow::anyhow!("invalid timezone: {tz}"))
}

/// Calendar date of `now` as seen in `tz`.
pub fn local_date(now: DateTime<Utc>, tz: &str) -> Result<NaiveDate> {
    let tz = parse_tz(tz)?;
    Ok(now.with_timezone(&tz).date_naive())
}

/// Today's date in `tz`.
pub fn today_in(tz: &str) -> Result<NaiveDate> {
    local_date(Utc::now(), tz)
}

/// Parse "2026-02-20", also accepting a trailing time ("2026-02-20 00:00:00").
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    let s = s.trim();
    let date_part = s.split([' ', 'T']).next().unwrap_or(s);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .map_err(|e| anyhow::anyhow!("invalid date '{s}': {e}"))
}
