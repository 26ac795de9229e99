//! Conversion of UTC timestamps to the configured local timezone.

use time::{OffsetDateTime, UtcOffset, format_description::BorrowedFormatItem, macros::format_description};
use time_tz::{Offset, TimeZone};

/// Dates with a time of day, e.g. "2025-03-01 14:05".
const DATE_TIME_FORMAT: &[BorrowedFormatItem] =
    format_description!("[year]-[month]-[day] [hour]:[minute]");

/// Dates without a time of day, e.g. "2025-03-01".
const DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

/// Get the current UTC offset of `canonical_timezone`, e.g. "Asia/Amman".
///
/// Returns `None` if the timezone name is not known.
pub fn get_local_offset(canonical_timezone: &str) -> Option<UtcOffset> {
    time_tz::timezones::get_by_name(canonical_timezone)
        .map(|tz| tz.get_offset_utc(&OffsetDateTime::now_utc()).to_utc())
}

/// Format `date_time` as a local date and time.
pub fn format_local_date_time(date_time: OffsetDateTime, offset: UtcOffset) -> String {
    format_with(date_time, offset, DATE_TIME_FORMAT)
}

/// Format `date_time` as a local date.
pub fn format_local_date(date_time: OffsetDateTime, offset: UtcOffset) -> String {
    format_with(date_time, offset, DATE_FORMAT)
}

fn format_with(
    date_time: OffsetDateTime,
    offset: UtcOffset,
    format: &[BorrowedFormatItem],
) -> String {
    date_time
        .to_offset(offset)
        .format(format)
        .unwrap_or_else(|error| {
            tracing::error!("Could not format date time {date_time}: {error}");
            date_time.to_string()
        })
}

#[cfg(test)]
mod timezone_tests {
    use time::{UtcOffset, macros::datetime};

    use super::{format_local_date, format_local_date_time, get_local_offset};

    #[test]
    fn known_timezone_has_offset() {
        assert_eq!(get_local_offset("Etc/UTC"), Some(UtcOffset::UTC));
        assert!(get_local_offset("Asia/Amman").is_some());
    }

    #[test]
    fn unknown_timezone_has_no_offset() {
        assert_eq!(get_local_offset("Atlantis/Capital"), None);
    }

    #[test]
    fn formats_in_local_time() {
        let date_time = datetime!(2025-03-01 22:30 UTC);
        let offset = UtcOffset::from_hms(3, 0, 0).unwrap();

        assert_eq!(format_local_date_time(date_time, offset), "2025-03-02 01:30");
        assert_eq!(format_local_date(date_time, offset), "2025-03-02");
    }
}
