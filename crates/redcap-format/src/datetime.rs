//! Date and datetime parsing for validated text fields.
//!
//! Record exports write dates as `YYYY-MM-DD` regardless of the field's
//! entry format, so ISO input is always accepted. The field's declared
//! component order is tried next, with `-` or `/` separators.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use redcap_common::UNIX_EPOCH_DAYS_FROM_CE;
use redcap_model::DateOrder;

const ISO_DATE: &str = "%Y-%m-%d";

const TIME_FORMATS: [&str; 3] = ["%H:%M:%S%.f", "%H:%M:%S", "%H:%M"];

fn date_formats(order: DateOrder) -> &'static [&'static str] {
    match order {
        DateOrder::Ymd => &["%Y/%m/%d"],
        DateOrder::Mdy => &["%m-%d-%Y", "%m/%d/%Y"],
        DateOrder::Dmy => &["%d-%m-%Y", "%d/%m/%Y"],
    }
}

/// Parse a date value; invalid calendar dates yield `None`.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use redcap_format::datetime::parse_date_value;
/// use redcap_model::DateOrder;
///
/// assert_eq!(
///     parse_date_value("2020-02-29", DateOrder::Ymd),
///     NaiveDate::from_ymd_opt(2020, 2, 29)
/// );
/// assert_eq!(parse_date_value("2020-02-30", DateOrder::Ymd), None);
/// assert_eq!(
///     parse_date_value("31/01/2021", DateOrder::Dmy),
///     NaiveDate::from_ymd_opt(2021, 1, 31)
/// );
/// ```
pub fn parse_date_value(value: &str, order: DateOrder) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, ISO_DATE) {
        return Some(date);
    }
    date_formats(order)
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
}

/// Parse a datetime value with minute or second precision.
///
/// A bare date is read as midnight.
pub fn parse_datetime_value(value: &str, order: DateOrder) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    let Some(split) = trimmed.find([' ', 'T']) else {
        return parse_date_value(trimmed, order).map(|date| date.and_time(NaiveTime::MIN));
    };
    let date = parse_date_value(&trimmed[..split], order)?;
    let time_part = trimmed[split + 1..].trim();
    let time = TIME_FORMATS
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(time_part, format).ok())?;
    Some(date.and_time(time))
}

/// Days since 1970-01-01, the physical value of a polars `Date`.
pub(crate) fn epoch_days(date: NaiveDate) -> i32 {
    date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE
}

/// Milliseconds since the Unix epoch, the physical value of a polars `Datetime`.
pub(crate) fn epoch_millis(datetime: NaiveDateTime) -> i64 {
    datetime.and_utc().timestamp_millis()
}
