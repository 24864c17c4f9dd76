//! Helpers for working out dates in the server's local timezone.

use time::{Date, OffsetDateTime, UtcOffset};
use time_tz::{Offset, TimeZone};

use crate::Error;

/// Get the current UTC offset for a canonical timezone name, e.g. "Pacific/Auckland".
///
/// Returns `None` if `canonical_timezone` is not a known timezone.
pub fn get_local_offset(canonical_timezone: &str) -> Option<UtcOffset> {
    time_tz::timezones::get_by_name(canonical_timezone)
        .map(|tz| tz.get_offset_utc(&OffsetDateTime::now_utc()).to_utc())
}

/// Get today's date in the timezone `canonical_timezone`.
///
/// # Errors
///
/// Returns an [Error::InvalidTimezoneError] if `canonical_timezone` is not a known timezone.
pub(crate) fn local_today(canonical_timezone: &str) -> Result<Date, Error> {
    let offset = get_local_offset(canonical_timezone)
        .ok_or_else(|| Error::InvalidTimezoneError(canonical_timezone.to_owned()))?;

    Ok(OffsetDateTime::now_utc().to_offset(offset).date())
}
