//! Date parsing module
//!
//! Parses loosely delimited timestamps such as `2021-03-15T10:30:00.500` or
//! `2021/03/15 10:30:00:500`. Every maximal run of non-digit characters is a
//! separator; the digit runs, in order, are year, month, day, hour, minute,
//! second and millisecond. The result is always interpreted as UTC.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, SecondsFormat, TimeDelta, Utc};

use crate::error::{Error, Result};

/// Number of numeric fields a timestamp string must contain
pub const FIELD_COUNT: usize = 7;

/// The seven numeric fields of a timestamp string, month still 1-based
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimestampComponents {
    pub year: i64,
    pub month: i64,
    pub day: i64,
    pub hour: i64,
    pub minute: i64,
    pub second: i64,
    pub millisecond: i64,
}

/// Split a string into its digit runs, dropping every separator
///
/// Leading and trailing separators yield no empty tokens.
pub fn split_digit_runs(s: &str) -> Vec<&str> {
    s.split(|c: char| !c.is_ascii_digit())
        .filter(|token| !token.is_empty())
        .collect()
}

impl FromStr for TimestampComponents {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let tokens = split_digit_runs(s);
        if tokens.len() < FIELD_COUNT {
            return Err(Error::InvalidDateString(format!(
                "expected {} numeric fields, found {} in {:?}",
                FIELD_COUNT,
                tokens.len(),
                s
            )));
        }

        // Anything past the seventh field is ignored
        let mut values = [0i64; FIELD_COUNT];
        for (value, token) in values.iter_mut().zip(&tokens) {
            *value = token.parse().map_err(|_| {
                Error::InvalidDateString(format!("numeric field out of range: {}", token))
            })?;
        }

        let [year, month, day, hour, minute, second, millisecond] = values;
        Ok(TimestampComponents { year, month, day, hour, minute, second, millisecond })
    }
}

impl TimestampComponents {
    /// Month shifted to 0-based, as calendar arithmetic expects it
    pub fn month0(&self) -> i64 {
        self.month - 1
    }

    /// Build a UTC timestamp, rejecting any out-of-range field
    pub fn to_utc(&self) -> Result<DateTime<Utc>> {
        let year: i32 = field(self.year, "year")?;
        let month: u32 = field(self.month, "month")?;
        let day: u32 = field(self.day, "day")?;
        let hour: u32 = field(self.hour, "hour")?;
        let minute: u32 = field(self.minute, "minute")?;
        let second: u32 = field(self.second, "second")?;
        let millisecond: u32 = field(self.millisecond, "millisecond")?;

        let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
            Error::InvalidDateString(format!("no such date: {}-{}-{}", self.year, self.month, self.day))
        })?;

        // chrono accepts second 60 and millisecond >= 1000 for leap seconds; we don't
        if second > 59 || millisecond > 999 {
            return Err(self.out_of_range());
        }

        date.and_hms_milli_opt(hour, minute, second, millisecond)
            .map(|naive| naive.and_utc())
            .ok_or_else(|| self.out_of_range())
    }

    /// Build a UTC timestamp, letting every field overflow into the next unit
    ///
    /// Day 32 of January becomes February 1st, month 13 becomes January of the
    /// following year, minute 60 becomes the next hour, and so on.
    pub fn to_utc_lenient(&self) -> Result<DateTime<Utc>> {
        let month0 = self.month0();
        let year = self
            .year
            .checked_add(month0.div_euclid(12))
            .ok_or_else(|| self.out_of_range())?;
        let year: i32 = field(year, "year")?;
        let month = month0.rem_euclid(12) as u32 + 1;

        let start = NaiveDate::from_ymd_opt(year, month, 1)
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .ok_or_else(|| self.out_of_range())?;

        let offset = [
            TimeDelta::try_days(self.day - 1),
            TimeDelta::try_hours(self.hour),
            TimeDelta::try_minutes(self.minute),
            TimeDelta::try_seconds(self.second),
            TimeDelta::try_milliseconds(self.millisecond),
        ]
        .into_iter()
        .try_fold(TimeDelta::zero(), |total, part| total.checked_add(&part?))
        .ok_or_else(|| self.out_of_range())?;

        start
            .checked_add_signed(offset)
            .map(|naive| naive.and_utc())
            .ok_or_else(|| self.out_of_range())
    }

    fn out_of_range(&self) -> Error {
        Error::InvalidDateString(format!("timestamp out of range: {:?}", self))
    }
}

fn field<T: TryFrom<i64>>(value: i64, name: &str) -> Result<T> {
    T::try_from(value)
        .map_err(|_| Error::InvalidDateString(format!("{} out of range: {}", name, value)))
}

/// Parse a timestamp string into a UTC point in time
///
/// Fields must be within their calendar ranges; `2021-02-30...` is an error.
pub fn parse_iso_string(s: &str) -> Result<DateTime<Utc>> {
    s.parse::<TimestampComponents>()?.to_utc()
}

/// Parse a timestamp string, rolling out-of-range fields over
///
/// Every field overflows into the next larger unit the way JavaScript's
/// `Date.UTC` does it. Unlike `Date.UTC`, years 0 to 99 are taken literally
/// and are not shifted into the 1900s.
pub fn parse_iso_string_lenient(s: &str) -> Result<DateTime<Utc>> {
    s.parse::<TimestampComponents>()?.to_utc_lenient()
}

/// Format a timestamp as RFC 3339 with millisecond precision
/// Example: "2021-03-15T10:30:00.500Z"
pub fn to_rfc3339_millis(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use chrono::{Datelike, Timelike};
    use rstest::rstest;

    use super::*;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32, ms: u32) -> DateTime<Utc> {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_milli_opt(h, mi, s, ms)
            .unwrap()
            .and_utc()
    }

    #[test]
    fn test_parse_iso_string() {
        let ts = parse_iso_string("2021-03-15T10:30:00.500").unwrap();
        assert_eq!(ts.year(), 2021);
        assert_eq!(ts.month(), 3);
        assert_eq!(ts.day(), 15);
        assert_eq!(ts.hour(), 10);
        assert_eq!(ts.minute(), 30);
        assert_eq!(ts.second(), 0);
        assert_eq!(ts.timestamp_subsec_millis(), 500);
    }

    #[rstest]
    #[case::iso("2021-03-15T10:30:00.500")]
    #[case::slashes("2021/03/15 10:30:00:500")]
    #[case::mixed_runs("2021 -- 03 // 15 @ 10h30m00s500")]
    #[case::leading_separator("T2021-03-15T10:30:00.500")]
    #[case::trailing_zone("2021-03-15T10:30:00.500Z")]
    #[case::extra_fields("2021-03-15T10:30:00.500+01:00")]
    fn test_separator_agnostic(#[case] input: &str) {
        assert_eq!(parse_iso_string(input).unwrap(), utc(2021, 3, 15, 10, 30, 0, 500));
    }

    #[test]
    fn test_parse_is_idempotent() {
        let input = "1999-12-31T23:59:59.999";
        assert_eq!(parse_iso_string(input).unwrap(), parse_iso_string(input).unwrap());
    }

    #[test]
    fn test_components_keep_one_based_month() {
        let parts: TimestampComponents = "2021-03-15T10:30:00.500".parse().unwrap();
        assert_eq!(parts.month, 3);
        assert_eq!(parts.month0(), 2);
        assert_eq!(parts.millisecond, 500);
    }

    #[test]
    fn test_split_digit_runs() {
        assert_eq!(split_digit_runs("2021-03-15T10:30"), vec!["2021", "03", "15", "10", "30"]);
        assert_eq!(split_digit_runs("--12--"), vec!["12"]);
        assert!(split_digit_runs("no digits").is_empty());
    }

    #[rstest]
    #[case::empty("")]
    #[case::date_only("2021-03-15")]
    #[case::no_millis("2021-03-15T10:30:00")]
    #[case::words("yesterday at noon")]
    fn test_too_few_fields(#[case] input: &str) {
        let err = parse_iso_string(input).unwrap_err();
        assert!(matches!(err, Error::InvalidDateString(_)));
        assert!(err.to_string().contains("expected 7 numeric fields"));
    }

    #[test]
    fn test_field_overflowing_integer() {
        let err = parse_iso_string("99999999999999999999-01-01T00:00:00.000").unwrap_err();
        assert!(matches!(err, Error::InvalidDateString(_)));
    }

    #[rstest]
    #[case::month_13("2021-13-01T00:00:00.000")]
    #[case::month_0("2021-00-01T00:00:00.000")]
    #[case::day_32("2021-01-32T00:00:00.000")]
    #[case::feb_29_non_leap("2021-02-29T00:00:00.000")]
    #[case::hour_24("2021-01-01T24:00:00.000")]
    #[case::second_60("2021-01-01T00:00:60.000")]
    #[case::millis_1000("2021-01-01T00:00:00.1000")]
    fn test_strict_rejects_out_of_range(#[case] input: &str) {
        assert!(parse_iso_string(input).is_err());
    }

    #[test]
    fn test_strict_accepts_leap_day() {
        assert_eq!(
            parse_iso_string("2024-02-29T12:00:00.000").unwrap(),
            utc(2024, 2, 29, 12, 0, 0, 0)
        );
    }

    #[rstest]
    #[case::day_rolls_into_next_month("2021-01-32T00:00:00.000", utc(2021, 2, 1, 0, 0, 0, 0))]
    #[case::month_rolls_into_next_year("2021-13-01T00:00:00.000", utc(2022, 1, 1, 0, 0, 0, 0))]
    #[case::month_zero_is_previous_december("2021-00-15T00:00:00.000", utc(2020, 12, 15, 0, 0, 0, 0))]
    #[case::day_zero_is_previous_month_end("2021-03-00T00:00:00.000", utc(2021, 2, 28, 0, 0, 0, 0))]
    #[case::hour_24("2021-01-01T24:00:00.000", utc(2021, 1, 2, 0, 0, 0, 0))]
    #[case::minute_90("2021-01-01T10:90:00.000", utc(2021, 1, 1, 11, 30, 0, 0))]
    #[case::millis_1500("2021-01-01T00:00:00.1500", utc(2021, 1, 1, 0, 0, 1, 500))]
    fn test_lenient_rollover(#[case] input: &str, #[case] expected: DateTime<Utc>) {
        assert_eq!(parse_iso_string_lenient(input).unwrap(), expected);
    }

    #[test]
    fn test_lenient_matches_strict_in_range() {
        let input = "2021-03-15T10:30:00.500";
        assert_eq!(parse_iso_string_lenient(input).unwrap(), parse_iso_string(input).unwrap());
    }

    #[test]
    fn test_lenient_keeps_two_digit_years() {
        let ts = parse_iso_string_lenient("0099-01-01T00:00:00.000").unwrap();
        assert_eq!(ts.year(), 99);
    }

    #[test]
    fn test_lenient_still_needs_seven_fields() {
        assert!(parse_iso_string_lenient("2021-01-32").is_err());
    }

    #[test]
    fn test_to_rfc3339_millis() {
        let ts = utc(2021, 3, 15, 10, 30, 0, 500);
        assert_eq!(to_rfc3339_millis(&ts), "2021-03-15T10:30:00.500Z");
    }
}
