use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::types::TimeError;

/// e.g. "Thursday, January 01, 1970, 12:00 AM"
const LOCAL_TIME_FORMAT: &str = "%A, %B %d, %Y, %I:%M %p";

/// Render a UTC epoch timestamp as wall-clock time in the named IANA zone.
pub fn format_local(epoch_seconds: i64, tz_name: &str) -> Result<String, TimeError> {
    let zone: Tz = tz_name
        .parse()
        .map_err(|_| TimeError::InvalidTimezone(tz_name.to_string()))?;
    let utc = DateTime::<Utc>::from_timestamp(epoch_seconds, 0)
        .ok_or(TimeError::InvalidTimestamp(epoch_seconds))?;

    Ok(utc.with_timezone(&zone).format(LOCAL_TIME_FORMAT).to_string())
}
