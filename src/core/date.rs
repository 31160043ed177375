//! Compact date codes for export timestamps.
//!
//! Telegram exports carry local date-times such as `2025-06-24T15:29:46`.
//! Output lines use a compact numeric code instead:
//!
//! | Function | Success | Blank input | Unparseable input |
//! |----------|---------|-------------|-------------------|
//! | [`to_date_code`] | `20250624` | `""` | input unchanged |
//! | [`to_date_time_code`] | `202506241529` | `""` | `""` |
//! | [`to_date`] | `Some(date)` | `None` | `None` |
//!
//! The two code functions differ on parse failure on purpose: the date code
//! surfaces a malformed date in the output line instead of hiding it.
//!
//! # Examples
//!
//! ```
//! use chatflat::core::date::{to_date_code, to_date_time_code};
//!
//! assert_eq!(to_date_code("2025-06-24T15:29:46"), "20250624");
//! assert_eq!(to_date_time_code("2025-06-24T15:29:46"), "202506241529");
//!
//! assert_eq!(to_date_code("yesterday"), "yesterday");
//! assert_eq!(to_date_time_code("yesterday"), "");
//! ```

use chrono::{NaiveDate, NaiveDateTime, Timelike};

/// Input grammar: `YYYY-MM-DDTHH:MM:SS`, no zone, no fraction.
const INPUT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

const DATE_CODE_FORMAT: &str = "%Y%m%d";
const DATE_TIME_CODE_FORMAT: &str = "%Y%m%d%H%M";

/// Parses `raw` against the exact export grammar.
///
/// chrono accepts single-digit fields and leap seconds, so the shape is
/// checked first.
pub fn parse_date_time(raw: &str) -> Option<NaiveDateTime> {
    if !has_export_shape(raw) {
        return None;
    }

    let parsed = NaiveDateTime::parse_from_str(raw, INPUT_FORMAT).ok()?;
    (parsed.nanosecond() == 0).then_some(parsed)
}

/// `DDDD-DD-DDTDD:DD:DD` where `D` is an ASCII digit.
fn has_export_shape(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    bytes.len() == 19
        && bytes.iter().enumerate().all(|(i, &b)| match i {
            4 | 7 => b == b'-',
            10 => b == b'T',
            13 | 16 => b == b':',
            _ => b.is_ascii_digit(),
        })
}

/// Returns the `YYYYMMDD` code for `raw`.
///
/// Blank input yields `""`; unparseable input is returned unchanged.
pub fn to_date_code(raw: &str) -> String {
    if raw.trim().is_empty() {
        return String::new();
    }

    match parse_date_time(raw) {
        Some(dt) => dt.format(DATE_CODE_FORMAT).to_string(),
        None => raw.to_string(),
    }
}

/// Returns the `YYYYMMDDHHmm` code for `raw`, or `""` if it does not parse.
pub fn to_date_time_code(raw: &str) -> String {
    parse_date_time(raw)
        .map(|dt| dt.format(DATE_TIME_CODE_FORMAT).to_string())
        .unwrap_or_default()
}

/// Returns the calendar date of `raw`, or `None` if it does not parse.
pub fn to_date(raw: &str) -> Option<NaiveDate> {
    parse_date_time(raw).map(|dt| dt.date())
}
