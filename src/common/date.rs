//! Conversion of calendar values to spreadsheet day serials.
//!
//! The 1900 date system counts 1900-01-01 as day 1 and, for compatibility
//! with early spreadsheet software, treats 1900 as a leap year. Every date
//! from 1900-03-01 onwards is therefore one higher than a proleptic
//! Gregorian count would give. Years before 1900 cannot be represented.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Timelike};

/// Serial written for dates the 1900 date system cannot represent.
pub const INVALID_SERIAL_DATE: f64 = -1.0;

/// `num_days_from_ce` of 1899-12-31, the day before serial 1.
const SERIAL_EPOCH_DAYS_FROM_CE: i64 = 693_595;

/// First serial affected by the phantom 1900-02-29.
const PHANTOM_LEAP_DAY: i64 = 60;

const MILLIS_PER_DAY: i64 = 86_400_000;

/// Calendar values that can be stored as a day serial.
///
/// Time zone aware values are converted using their local civil time, so a
/// `DateTime<Utc>` and the same instant in `Local` may give different serials.
pub trait ExcelDate {
    /// Civil date and time this value represents.
    fn civil(&self) -> NaiveDateTime;
}

impl ExcelDate for NaiveDate {
    fn civil(&self) -> NaiveDateTime {
        self.and_time(NaiveTime::MIN)
    }
}

impl ExcelDate for NaiveDateTime {
    fn civil(&self) -> NaiveDateTime {
        *self
    }
}

impl<Tz: TimeZone> ExcelDate for DateTime<Tz> {
    fn civil(&self) -> NaiveDateTime {
        self.naive_local()
    }
}

impl<T: ExcelDate + ?Sized> ExcelDate for &T {
    fn civil(&self) -> NaiveDateTime {
        (**self).civil()
    }
}

/// Convert a date or date-time to its 1900-system day serial.
///
/// The time of day becomes the fractional part at millisecond resolution.
/// Returns [`INVALID_SERIAL_DATE`] for years before 1900.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use sheetwright::common::excel_serial_date;
///
/// let day = NaiveDate::from_ymd_opt(1900, 3, 1).unwrap();
/// assert_eq!(excel_serial_date(&day), 61.0);
/// ```
pub fn excel_serial_date<D: ExcelDate + ?Sized>(value: &D) -> f64 {
    let civil = value.civil();
    if civil.year() < 1900 {
        log::warn!("{} predates the 1900 date system, storing {}", civil, INVALID_SERIAL_DATE);
        return INVALID_SERIAL_DATE;
    }

    let mut days = i64::from(civil.date().num_days_from_ce()) - SERIAL_EPOCH_DAYS_FROM_CE;
    if days >= PHANTOM_LEAP_DAY {
        days += 1;
    }

    let time = civil.time();
    // Leap-second nanos (>= 1e9) are clamped into the last millisecond.
    let millis = i64::from(time.num_seconds_from_midnight()) * 1000
        + i64::from(time.nanosecond().min(999_999_999) / 1_000_000);

    // One division keeps the quotient correctly rounded.
    (days * MILLIS_PER_DAY + millis) as f64 / MILLIS_PER_DAY as f64
}
