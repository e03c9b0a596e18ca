//! Calendar derivation for the `Accident Date` column.
//!
//! Every raw cell maps to a [`CalendarFields`]: either a parsed date with its
//! year, month name and day name, or all four fields empty. Parsing never
//! fails loudly; anything unrecognised becomes a null date.

use chrono::{Datelike, NaiveDate, NaiveDateTime};

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

// Indexed by `Weekday::num_days_from_monday`.
const DAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

// Month-first is tried before day-first for ambiguous slash and dash dates.
const DATE_FORMATS: [&str; 8] = [
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%Y%m%d",
    "%m/%d/%Y",
    "%d/%m/%Y",
    "%m-%d-%Y",
    "%d-%m-%Y",
    "%d.%m.%Y",
];

// Spreadsheet day zero; serial 1 is 1899-12-31 once the 1900 leap bug is
// folded in, which matches every date after February 1900.
const SERIAL_EPOCH: (i32, u32, u32) = (1899, 12, 30);
const MAX_SERIAL: f64 = 2_958_465.0;

/// Calendar fields derived from one raw date cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CalendarFields {
    pub date: Option<NaiveDate>,
    pub year: Option<i32>,
    pub month: Option<&'static str>,
    pub day: Option<&'static str>,
}

impl CalendarFields {
    pub fn from_date(date: Option<NaiveDate>) -> Self {
        match date {
            Some(d) => Self {
                date: Some(d),
                year: Some(d.year()),
                month: Some(month_name(d)),
                day: Some(day_name(d)),
            },
            None => Self::default(),
        }
    }
}

/// Parse a raw cell and derive its calendar fields.
pub fn derive(raw: Option<&str>) -> CalendarFields {
    CalendarFields::from_date(parse_date(raw))
}

/// Full English month name, e.g. `"January"`.
pub fn month_name(date: NaiveDate) -> &'static str {
    MONTH_NAMES[date.month0() as usize]
}

/// Full English day name, Monday first, e.g. `"Monday"`.
pub fn day_name(date: NaiveDate) -> &'static str {
    DAY_NAMES[date.weekday().num_days_from_monday() as usize]
}

/// First day of the month containing `date`; the bucket key for monthly series.
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Parse a raw date cell, returning `None` for anything unrecognised.
pub fn parse_date(raw: Option<&str>) -> Option<NaiveDate> {
    let s = raw?.trim();
    if s.is_empty() {
        return None;
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    if let Some(d) = parse_date_only(s) {
        return Some(d);
    }

    // "05/01/2020 14:30" and similar: retry with the time part dropped.
    if let Some((head, _)) = s.split_once([' ', 'T']) {
        if let Some(d) = parse_date_only(head) {
            return Some(d);
        }
    }

    parse_serial(s)
}

fn parse_date_only(s: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

fn parse_serial(s: &str) -> Option<NaiveDate> {
    if !s.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return None;
    }
    let serial: f64 = s.parse().ok()?;
    if !(1.0..=MAX_SERIAL).contains(&serial) {
        return None;
    }
    let (y, m, d) = SERIAL_EPOCH;
    let epoch = NaiveDate::from_ymd_opt(y, m, d)?;
    epoch.checked_add_days(chrono::Days::new(serial.trunc() as u64))
}
