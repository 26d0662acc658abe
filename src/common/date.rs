//! Calendar to serial-day conversion.
//!
//! SpreadsheetML stores dates as floating-point day counts. The 1900 date
//! system counts from December 30, 1899 and keeps the historical
//! February 29, 1900 that never existed: every date before March 1, 1900 is
//! therefore numbered one lower than a plain day count would give.
//!
//! The writer never performs this conversion itself; callers turn their
//! temporal values into [`CellValue::DateSerial`](crate::ooxml::xlsx::writer::CellValue)
//! with these helpers before handing rows over.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};

/// Seconds per day
const SECONDS_PER_DAY: f64 = 86_400.0;

/// First date that is numbered correctly in the 1900 system
const FIRST_CORRECT_DATE: (i32, u32, u32) = (1900, 3, 1);

#[inline]
fn epoch() -> NaiveDate {
    // December 30, 1899 is always a valid calendar date
    NaiveDate::from_ymd_opt(1899, 12, 30).unwrap_or(NaiveDate::MIN)
}

/// Convert a calendar date to its serial day number.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use sheetstream::common::date::date_to_serial;
///
/// let date = NaiveDate::from_ymd_opt(2022, 7, 12).unwrap();
/// assert_eq!(date_to_serial(date), 44754.0);
/// ```
pub fn date_to_serial(date: NaiveDate) -> f64 {
    let mut days = date.signed_duration_since(epoch()).num_days();
    let (y, m, d) = FIRST_CORRECT_DATE;
    let leap_bug_cutoff = NaiveDate::from_ymd_opt(y, m, d).unwrap_or(NaiveDate::MIN);
    if date < leap_bug_cutoff && days > 0 {
        days -= 1;
    }
    days as f64
}

/// Convert a time of day to the fractional part of a serial number.
pub fn time_to_serial(time: NaiveTime) -> f64 {
    let seconds = time.num_seconds_from_midnight() as f64 + time.nanosecond() as f64 / 1e9;
    seconds / SECONDS_PER_DAY
}

/// Convert a date and time to a serial number.
pub fn datetime_to_serial(dt: NaiveDateTime) -> f64 {
    date_to_serial(dt.date()) + time_to_serial(dt.time())
}
