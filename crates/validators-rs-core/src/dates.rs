//! Locale-aware date parsing.
//!
//! Dates are tried against the international numeric format first
//! (`yyyy-mm-dd`, optionally followed by whitespace or `T` and `hh:mm[:ss]`)
//! and only then against the active locale's own format. Whichever pattern
//! matched decides where the year, month and day are read from.
//!
//! February has 29 days whenever `year % 4 == 0`. Century years such as
//! 1900 are therefore treated as leap years; existing consumers depend on
//! this, so it is kept. A day that only exists under this rule (1900-02-29)
//! rolls over to the next real day (1900-03-01).

use chrono::{Days, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::error::DateParseError;
use crate::l10n::{DateFormatGroups, LocaleParameters};

/// The international date pattern, `yyyy-mm-dd[( |T)hh:mm[:ss]]`.
///
/// Only the start is anchored: anything after the recognised prefix
/// (fractional seconds, a zone designator) is ignored.
pub const INTERNATIONAL_DATE_FORMAT: &str =
    r"^([0-9]{4})-([0-9]{1,2})-([0-9]{1,2})([\sT]+([0-9]{1,2}):([0-9]{1,2})(:([0-9]{1,2}))?)?";

const INTERNATIONAL_GROUPS: DateFormatGroups = DateFormatGroups {
    day: 3,
    month: 2,
    year: 1,
    hour: Some(5),
    minute: Some(6),
    second: Some(8),
};

const DAYS_IN_MONTH: [u32; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

static INTERNATIONAL_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(INTERNATIONAL_DATE_FORMAT).expect("valid regex"));

/// Returns `true` if February of `year` has 29 days (`year % 4 == 0`).
pub const fn is_leap_year(year: i64) -> bool {
    year % 4 == 0
}

/// Number of days in a month, `month0` being 0-based.
///
/// Returns `None` for a month outside `0..12`.
pub fn days_in_month(year: i64, month0: i64) -> Option<u32> {
    let index = usize::try_from(month0).ok()?;
    let days = *DAYS_IN_MONTH.get(index)?;
    Some(if index == 1 && is_leap_year(year) { 29 } else { days })
}

/// Parses date strings against the international format and one locale.
#[derive(Debug, Clone, Copy)]
pub struct DateParser<'a> {
    locale: &'a LocaleParameters,
}

impl<'a> DateParser<'a> {
    /// Creates a parser that falls back on `locale`'s date format.
    pub const fn new(locale: &'a LocaleParameters) -> Self {
        Self { locale }
    }

    /// Parses `input` into a local wall-clock instant.
    ///
    /// # Examples
    ///
    /// ```
    /// use validators_rs_core::dates::DateParser;
    /// use validators_rs_core::l10n::data;
    ///
    /// let fr = data::fr();
    /// let parser = DateParser::new(&fr);
    /// let a = parser.parse("2024-03-05").unwrap();
    /// let b = parser.parse("05/03/2024").unwrap();
    /// assert_eq!(a, b);
    /// assert!(parser.parse("2023-02-29").is_err());
    /// ```
    pub fn parse(&self, input: &str) -> Result<NaiveDateTime, DateParseError> {
        let (captures, groups) = if let Some(captures) = INTERNATIONAL_DATE.captures(input) {
            (captures, &INTERNATIONAL_GROUPS)
        } else if let Some(captures) = self.locale.date_format().captures(input) {
            (captures, self.locale.date_format_groups())
        } else {
            tracing::trace!(input, locale = self.locale.name(), "no date format matched");
            return Err(DateParseError::NoMatch);
        };

        let year = component(&captures, groups.year)?;
        let month0 = component(&captures, groups.month)? - 1;
        let day = component(&captures, groups.day)?;

        let (mut hour, mut minute, mut second) = (0, 0, 0);
        if let Some(h) = optional_component(&captures, groups.hour)? {
            hour = h;
            minute = optional_component(&captures, groups.minute)?.unwrap_or(0);
            second = optional_component(&captures, groups.second)?.unwrap_or(0);
        }

        let max_day = days_in_month(year, month0).ok_or(DateParseError::MonthOutOfRange)?;
        if day < 1 || day > i64::from(max_day) {
            return Err(DateParseError::DayOutOfRange);
        }
        if !(0..=23).contains(&hour) || !(0..=59).contains(&minute) || !(0..=59).contains(&second) {
            return Err(DateParseError::TimeOutOfRange);
        }

        build_instant(year, month0, day, hour, minute, second)
    }
}

fn component(captures: &Captures<'_>, index: usize) -> Result<i64, DateParseError> {
    optional_component(captures, Some(index))?.ok_or(DateParseError::InvalidNumber)
}

fn optional_component(
    captures: &Captures<'_>,
    index: Option<usize>,
) -> Result<Option<i64>, DateParseError> {
    match index.and_then(|i| captures.get(i)) {
        Some(m) => m
            .as_str()
            .parse::<i64>()
            .map(Some)
            .map_err(|_| DateParseError::InvalidNumber),
        None => Ok(None),
    }
}

fn build_instant(
    year: i64,
    month0: i64,
    day: i64,
    hour: i64,
    minute: i64,
    second: i64,
) -> Result<NaiveDateTime, DateParseError> {
    // All components were range-checked by the caller, so only the year can overflow.
    let year = i32::try_from(year).map_err(|_| DateParseError::YearOutOfRange)?;
    let month = u32::try_from(month0 + 1).map_err(|_| DateParseError::MonthOutOfRange)?;
    let day_offset = u64::try_from(day - 1).map_err(|_| DateParseError::DayOutOfRange)?;
    let to_u32 = |v: i64| u32::try_from(v).map_err(|_| DateParseError::TimeOutOfRange);

    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|first| first.checked_add_days(Days::new(day_offset)))
        .ok_or(DateParseError::YearOutOfRange)?
        .and_hms_opt(to_u32(hour)?, to_u32(minute)?, to_u32(second)?)
        .ok_or(DateParseError::TimeOutOfRange)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::l10n::data;
    use chrono::NaiveDate;

    fn instant(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    #[test]
    fn test_international_date_only() {
        let locale = data::en_us();
        let parsed = DateParser::new(&locale).parse("2024-01-10").unwrap();
        assert_eq!(parsed, instant(2024, 1, 10, 0, 0, 0));
    }

    #[test]
    fn test_international_with_time_and_t_separator() {
        let locale = data::en_us();
        let parser = DateParser::new(&locale);
        assert_eq!(
            parser.parse("2024-01-10 08:15").unwrap(),
            instant(2024, 1, 10, 8, 15, 0)
        );
        assert_eq!(
            parser.parse("2024-01-10T08:15:42").unwrap(),
            instant(2024, 1, 10, 8, 15, 42)
        );
    }

    #[test]
    fn test_international_ignores_trailing_text() {
        let locale = data::en_us();
        let parsed = DateParser::new(&locale)
            .parse("2024-01-10T08:15:42.123Z")
            .unwrap();
        assert_eq!(parsed, instant(2024, 1, 10, 8, 15, 42));
    }

    #[test]
    fn test_locale_round_trip() {
        let cases = [
            (2024, 2, 29, 0, 0, 0),
            (1999, 12, 31, 23, 59, 59),
            (2010, 7, 4, 12, 5, 0),
            (2001, 1, 1, 0, 0, 0),
        ];
        let en = data::en_us();
        let fr = data::fr();
        for (y, mo, d, h, mi, s) in cases {
            let expected = instant(y, mo, d, h, mi, s);
            let en_text = format!("{mo}/{d}/{y} {h}:{mi:02}:{s:02}");
            let fr_text = format!("{d:02}/{mo:02}/{y} {h:02}:{mi:02}:{s:02}");
            assert_eq!(DateParser::new(&en).parse(&en_text).unwrap(), expected, "{en_text}");
            assert_eq!(DateParser::new(&fr).parse(&fr_text).unwrap(), expected, "{fr_text}");
        }
    }

    #[test]
    fn test_locale_order_disambiguates() {
        let en = data::en_us();
        let fr = data::fr();
        assert_eq!(
            DateParser::new(&en).parse("03/04/2024").unwrap(),
            instant(2024, 3, 4, 0, 0, 0)
        );
        assert_eq!(
            DateParser::new(&fr).parse("03/04/2024").unwrap(),
            instant(2024, 4, 3, 0, 0, 0)
        );
        // Day 13 cannot be a month in en-US.
        assert_eq!(
            DateParser::new(&en).parse("13/04/2024"),
            Err(DateParseError::MonthOutOfRange)
        );
    }

    #[test]
    fn test_locale_without_seconds() {
        let fr = data::fr();
        assert_eq!(
            DateParser::new(&fr).parse("01/02/2020 7:30").unwrap(),
            instant(2020, 2, 1, 7, 30, 0)
        );
    }

    #[test]
    fn test_leap_years() {
        let locale = data::en_us();
        let parser = DateParser::new(&locale);
        assert!(parser.parse("2024-02-29").is_ok());
        assert_eq!(parser.parse("2023-02-29"), Err(DateParseError::DayOutOfRange));
        assert!(parser.parse("2000-02-29").is_ok());
        assert_eq!(parser.parse("2024-02-30"), Err(DateParseError::DayOutOfRange));
    }

    #[test]
    fn test_century_year_follows_simplified_rule() {
        let locale = data::en_us();
        let parser = DateParser::new(&locale);
        // 1900 % 4 == 0, so the 29th is accepted and rolls into March.
        assert_eq!(
            parser.parse("1900-02-29").unwrap(),
            instant(1900, 3, 1, 0, 0, 0)
        );
        assert!(is_leap_year(1900));
        assert!(is_leap_year(2100));
        assert!(!is_leap_year(2023));
    }

    #[test]
    fn test_range_failures() {
        let locale = data::en_us();
        let parser = DateParser::new(&locale);
        assert_eq!(parser.parse("2024-13-01"), Err(DateParseError::MonthOutOfRange));
        assert_eq!(parser.parse("2024-00-01"), Err(DateParseError::MonthOutOfRange));
        assert_eq!(parser.parse("2024-04-31"), Err(DateParseError::DayOutOfRange));
        assert_eq!(parser.parse("2024-04-00"), Err(DateParseError::DayOutOfRange));
        assert_eq!(parser.parse("2024-04-01 24:00"), Err(DateParseError::TimeOutOfRange));
        assert_eq!(parser.parse("2024-04-01 23:60"), Err(DateParseError::TimeOutOfRange));
        assert_eq!(
            parser.parse("2024-04-01 23:59:60"),
            Err(DateParseError::TimeOutOfRange)
        );
    }

    #[test]
    fn test_no_match() {
        let locale = data::fr();
        let parser = DateParser::new(&locale);
        assert_eq!(parser.parse(""), Err(DateParseError::NoMatch));
        assert_eq!(parser.parse("tomorrow"), Err(DateParseError::NoMatch));
        assert_eq!(parser.parse("24-01-10"), Err(DateParseError::NoMatch));
    }

    #[test]
    fn test_huge_year_is_out_of_range() {
        let locale = data::fr();
        assert_eq!(
            DateParser::new(&locale).parse("01/01/99999999"),
            Err(DateParseError::YearOutOfRange)
        );
    }

    #[test]
    fn test_custom_locale_without_time_groups() {
        let locale = LocaleParameters::new(
            "de",
            r"^([0-9]{1,2})\.([0-9]{1,2})\.([0-9]{4})$",
            DateFormatGroups {
                day: 1,
                month: 2,
                year: 3,
                hour: None,
                minute: None,
                second: None,
            },
            ',',
        )
        .unwrap();
        let parser = DateParser::new(&locale);
        assert_eq!(parser.parse("24.12.2023").unwrap(), instant(2023, 12, 24, 0, 0, 0));
        assert_eq!(parser.parse("24.12.2023 10:00"), Err(DateParseError::NoMatch));
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(2023, 1), Some(28));
        assert_eq!(days_in_month(2024, 1), Some(29));
        assert_eq!(days_in_month(2024, 11), Some(31));
        assert_eq!(days_in_month(2024, 12), None);
        assert_eq!(days_in_month(2024, -1), None);
    }
}
