//! Built-in locale data.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{DateFormatGroups, LocaleParameters, DEFAULT_LOCALE};

/// `dd/mm/yyyy` or `mm/dd/yyyy` with an optional `hh:mm[:ss]` time.
///
/// Groups: 1 and 2 are day/month in locale order, 3 is the year, 5/6/8 the
/// time components.
pub const SLASHED_DATE_FORMAT: &str =
    r"^([0-9]{1,2})/([0-9]{1,2})/([0-9]{4,})(\s+([0-9]{1,2}):([0-9]{1,2})(:([0-9]{1,2}))?)?";

static SLASHED_DATE: Lazy<Regex> = Lazy::new(|| Regex::new(SLASHED_DATE_FORMAT).expect("valid regex"));

fn slashed(name: &str, date_format_groups: DateFormatGroups, decimal_separator: char) -> LocaleParameters {
    LocaleParameters {
        name: name.to_string(),
        date_format: SLASHED_DATE.clone(),
        date_format_groups,
        decimal_separator,
    }
}

/// US English: month-first dates, `.` decimals.
pub fn en_us() -> LocaleParameters {
    slashed(DEFAULT_LOCALE, DateFormatGroups::MONTH_FIRST, '.')
}

/// English, same conventions as [`en_us`].
pub fn en() -> LocaleParameters {
    slashed("en", DateFormatGroups::MONTH_FIRST, '.')
}

/// French: day-first dates, `,` decimals.
pub fn fr() -> LocaleParameters {
    slashed("fr", DateFormatGroups::DAY_FIRST, ',')
}

/// Every locale a new [`LocaleTable`](super::LocaleTable) starts with.
pub fn builtin_locales() -> Vec<LocaleParameters> {
    vec![en_us(), en(), fr()]
}
