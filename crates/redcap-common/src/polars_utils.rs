//! Polars AnyValue utility functions.
//!
//! Formatting reads every cell back as text before casting, so a column that
//! was already typed by an earlier formatting pass is read the same way as a
//! raw export column.

use chrono::{DateTime, NaiveDate};
use polars::prelude::{AnyValue, Column, TimeUnit};

/// Days between 0001-01-01 (CE day 1) and 1970-01-01.
pub const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Converts a Polars `AnyValue` to its export text.
///
/// Returns an empty string for `Null`, formats numbers without trailing
/// zeros, and writes dates as `YYYY-MM-DD` and datetimes as
/// `YYYY-MM-DD HH:MM:SS`.
///
/// # Examples
///
/// ```
/// use polars::prelude::AnyValue;
/// use redcap_common::any_to_string;
///
/// assert_eq!(any_to_string(AnyValue::Null), "");
/// assert_eq!(any_to_string(AnyValue::Float64(1.0)), "1");
/// assert_eq!(any_to_string(AnyValue::String("Fever")), "Fever");
/// ```
pub fn any_to_string(value: AnyValue<'_>) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::Int8(v) => v.to_string(),
        AnyValue::Int16(v) => v.to_string(),
        AnyValue::Int32(v) => v.to_string(),
        AnyValue::Int64(v) => v.to_string(),
        AnyValue::UInt8(v) => v.to_string(),
        AnyValue::UInt16(v) => v.to_string(),
        AnyValue::UInt32(v) => v.to_string(),
        AnyValue::UInt64(v) => v.to_string(),
        AnyValue::Float32(v) => format_numeric(f64::from(v)),
        AnyValue::Float64(v) => format_numeric(v),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        AnyValue::Boolean(b) => if b { "1" } else { "0" }.to_string(),
        AnyValue::Date(days) => NaiveDate::from_num_days_from_ce_opt(days + UNIX_EPOCH_DAYS_FROM_CE)
            .map(|date| date.format("%Y-%m-%d").to_string())
            .unwrap_or_default(),
        AnyValue::Datetime(v, unit, _) => format_timestamp(v, unit),
        other => other.to_string(),
    }
}

fn format_timestamp(value: i64, unit: TimeUnit) -> String {
    let datetime = match unit {
        TimeUnit::Milliseconds => DateTime::from_timestamp_millis(value),
        TimeUnit::Microseconds => DateTime::from_timestamp_micros(value),
        TimeUnit::Nanoseconds => Some(DateTime::from_timestamp_nanos(value)),
    };
    datetime
        .map(|dt| dt.naive_utc().format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_default()
}

/// Read every cell of `column` as text; `Null` becomes `None`.
pub fn column_strings(column: &Column) -> Vec<Option<String>> {
    (0..column.len())
        .map(|idx| match column.get(idx).unwrap_or(AnyValue::Null) {
            AnyValue::Null => None,
            value => Some(any_to_string(value)),
        })
        .collect()
}

/// Formats a floating-point number as a string without trailing zeros.
///
/// # Examples
///
/// ```
/// use redcap_common::format_numeric;
///
/// assert_eq!(format_numeric(1.0), "1");
/// assert_eq!(format_numeric(1.50), "1.5");
/// assert_eq!(format_numeric(0.0), "0");
/// ```
pub fn format_numeric(v: f64) -> String {
    let s = format!("{v}");
    if !s.contains('.') {
        return s;
    }
    let trimmed = s.trim_end_matches('0').trim_end_matches('.');
    if trimmed.is_empty() || trimmed == "-" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Parses a string as `f64`, returning `None` for invalid or empty strings.
pub fn parse_f64(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::{DataType, IntoColumn, NamedFrom, Series};

    #[test]
    fn test_any_to_string_null() {
        assert_eq!(any_to_string(AnyValue::Null), "");
    }

    #[test]
    fn test_any_to_string_integers() {
        assert_eq!(any_to_string(AnyValue::Int32(42)), "42");
        assert_eq!(any_to_string(AnyValue::Int64(-100)), "-100");
    }

    #[test]
    fn test_any_to_string_floats() {
        assert_eq!(any_to_string(AnyValue::Float64(1.5)), "1.5");
        assert_eq!(any_to_string(AnyValue::Float64(1.0)), "1");
        assert_eq!(any_to_string(AnyValue::Float64(10.0)), "10");
    }

    #[test]
    fn test_any_to_string_dates() {
        assert_eq!(any_to_string(AnyValue::Date(0)), "1970-01-01");
        assert_eq!(any_to_string(AnyValue::Date(18_262)), "2020-01-01");
        assert_eq!(
            any_to_string(AnyValue::Datetime(90_061_000, TimeUnit::Milliseconds, None)),
            "1970-01-02 01:01:01"
        );
    }

    #[test]
    fn test_format_numeric() {
        assert_eq!(format_numeric(1.0), "1");
        assert_eq!(format_numeric(100.0), "100");
        assert_eq!(format_numeric(-2.50), "-2.5");
    }

    #[test]
    fn test_parse_f64() {
        assert_eq!(parse_f64(""), None);
        assert_eq!(parse_f64("  3.5  "), Some(3.5));
        assert_eq!(parse_f64("abc"), None);
        assert_eq!(parse_f64("NaN"), None);
    }

    #[test]
    fn test_column_strings() {
        let column = Series::new("x".into(), vec![Some(1.0), None, Some(2.5)]).into_column();
        assert_eq!(
            column_strings(&column),
            vec![Some("1".to_string()), None, Some("2.5".to_string())]
        );

        let dates = Series::new("d".into(), vec![Some(0i32), None])
            .cast(&DataType::Date)
            .unwrap()
            .into_column();
        assert_eq!(
            column_strings(&dates),
            vec![Some("1970-01-01".to_string()), None]
        );
    }
}
