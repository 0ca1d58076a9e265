//! Localization parameters and the locale table.
//!
//! A locale tells the engine how dates are written locally (a pattern plus
//! the capture-group index of each date component) and which character
//! separates decimals. The table holds every registered locale and exactly
//! one active one.
//!
//! Each engine owns its own [`LocaleTable`]; two engines activating
//! different locales never see each other's choice.
//!
//! ```
//! use validators_rs_core::l10n::LocaleTable;
//!
//! let mut locales = LocaleTable::new();
//! assert_eq!(locales.current().unwrap().name(), "en-US");
//!
//! locales.activate("fr").unwrap();
//! assert_eq!(locales.current().unwrap().decimal_separator(), ',');
//!
//! assert!(locales.activate("xx").is_err());
//! assert_eq!(locales.current().unwrap().name(), "fr");
//! ```

pub mod data;

use std::collections::HashMap;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{ValidatorsError, ValidatorsResult};
use crate::settings::LocaleSettings;

/// The default locale, active in a freshly built table.
pub const DEFAULT_LOCALE: &str = "en-US";

/// Capture-group indices (1-based) of each date component in a date pattern.
///
/// Day, month and year groups must always participate in a match. The time
/// groups may be absent, or may refer to optional groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateFormatGroups {
    /// Group holding the day of month.
    pub day: usize,
    /// Group holding the month (1-based in the input).
    pub month: usize,
    /// Group holding the year.
    pub year: usize,
    /// Group holding the hour, if the format carries a time.
    #[serde(default)]
    pub hour: Option<usize>,
    /// Group holding the minutes.
    #[serde(default)]
    pub minute: Option<usize>,
    /// Group holding the seconds.
    #[serde(default)]
    pub second: Option<usize>,
}

impl DateFormatGroups {
    /// Groups for a day-first format (`dd/mm/yyyy hh:mm:ss`).
    pub const DAY_FIRST: Self = Self {
        day: 1,
        month: 2,
        year: 3,
        hour: Some(5),
        minute: Some(6),
        second: Some(8),
    };

    /// Groups for a month-first format (`mm/dd/yyyy hh:mm:ss`).
    pub const MONTH_FIRST: Self = Self {
        day: 2,
        month: 1,
        year: 3,
        hour: Some(5),
        minute: Some(6),
        second: Some(8),
    };

    fn indices(&self) -> impl Iterator<Item = (&'static str, usize)> {
        [
            ("day", Some(self.day)),
            ("month", Some(self.month)),
            ("year", Some(self.year)),
            ("hour", self.hour),
            ("minute", self.minute),
            ("second", self.second),
        ]
        .into_iter()
        .filter_map(|(name, index)| index.map(|i| (name, i)))
    }
}

/// The locale-sensitive parameters used when parsing dates and decimals.
#[derive(Debug, Clone)]
pub struct LocaleParameters {
    name: String,
    date_format: Regex,
    date_format_groups: DateFormatGroups,
    decimal_separator: char,
}

impl LocaleParameters {
    /// Builds locale parameters from a date pattern and its group mapping.
    ///
    /// The pattern uses `regex` crate syntax. Every group index must refer
    /// to a capture group that exists in the pattern.
    pub fn new(
        name: impl Into<String>,
        date_format: &str,
        date_format_groups: DateFormatGroups,
        decimal_separator: char,
    ) -> ValidatorsResult<Self> {
        let name = name.into();
        let regex = Regex::new(date_format).map_err(|e| ValidatorsError::InvalidLocale {
            name: name.clone(),
            reason: format!("date format does not compile: {e}"),
        })?;
        Self::from_regex(name, regex, date_format_groups, decimal_separator)
    }

    /// Builds locale parameters from an already compiled date pattern.
    pub fn from_regex(
        name: impl Into<String>,
        date_format: Regex,
        date_format_groups: DateFormatGroups,
        decimal_separator: char,
    ) -> ValidatorsResult<Self> {
        let name = name.into();
        // captures_len() counts the implicit whole-match group 0.
        let group_count = date_format.captures_len() - 1;
        for (component, index) in date_format_groups.indices() {
            if index == 0 || index > group_count {
                return Err(ValidatorsError::InvalidLocale {
                    name,
                    reason: format!(
                        "{component} group {index} does not exist (pattern has {group_count} groups)"
                    ),
                });
            }
        }
        Ok(Self {
            name,
            date_format,
            date_format_groups,
            decimal_separator,
        })
    }

    /// Builds locale parameters from a settings entry.
    pub fn from_settings(name: impl Into<String>, settings: &LocaleSettings) -> ValidatorsResult<Self> {
        Self::new(
            name,
            &settings.date_format,
            settings.date_format_groups,
            settings.decimal_separator,
        )
    }

    /// The locale name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The compiled local date pattern.
    pub const fn date_format(&self) -> &Regex {
        &self.date_format
    }

    /// Where each date component sits in [`date_format`](Self::date_format).
    pub const fn date_format_groups(&self) -> &DateFormatGroups {
        &self.date_format_groups
    }

    /// The local decimal separator.
    pub const fn decimal_separator(&self) -> char {
        self.decimal_separator
    }

    fn renamed(mut self, name: String) -> Self {
        self.name = name;
        self
    }
}

/// All registered locales, plus the name of the active one.
#[derive(Debug, Clone)]
pub struct LocaleTable {
    locales: HashMap<String, LocaleParameters>,
    active: Option<String>,
}

impl Default for LocaleTable {
    fn default() -> Self {
        Self::new()
    }
}

impl LocaleTable {
    /// Creates a table holding the built-in locales, with `en-US` active.
    pub fn new() -> Self {
        let mut table = Self::empty();
        for locale in data::builtin_locales() {
            table.locales.insert(locale.name.clone(), locale);
        }
        table.active = Some(DEFAULT_LOCALE.to_string());
        table
    }

    /// Creates a table with no locales and nothing active.
    pub fn empty() -> Self {
        Self {
            locales: HashMap::new(),
            active: None,
        }
    }

    /// Stores a locale under `name`, replacing any locale of the same name.
    ///
    /// The parameters take on `name` regardless of the name they were built with.
    pub fn register(&mut self, name: impl Into<String>, params: LocaleParameters) {
        let name = name.into();
        tracing::debug!(locale = %name, "registering locale");
        self.locales.insert(name.clone(), params.renamed(name));
    }

    /// Makes `name` the active locale.
    ///
    /// Unknown names are rejected and the active locale stays as it was.
    pub fn activate(&mut self, name: &str) -> ValidatorsResult<()> {
        if !self.locales.contains_key(name) {
            tracing::warn!(locale = %name, "attempt to activate unknown locale");
            return Err(ValidatorsError::LocaleNotFound(name.to_string()));
        }
        self.active = Some(name.to_string());
        Ok(())
    }

    /// Returns the active locale.
    pub fn current(&self) -> ValidatorsResult<&LocaleParameters> {
        let name = self.active.as_deref().ok_or(ValidatorsError::NoActiveLocale)?;
        self.get(name)
            .ok_or_else(|| ValidatorsError::LocaleNotFound(name.to_string()))
    }

    /// Returns the name of the active locale, if any.
    pub fn current_name(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Looks up a locale by name.
    pub fn get(&self, name: &str) -> Option<&LocaleParameters> {
        self.locales.get(name)
    }

    /// Returns `true` if a locale of that name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.locales.contains_key(name)
    }

    /// Returns the registered locale names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.locales.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_table_has_builtins() {
        let table = LocaleTable::new();
        assert_eq!(table.names(), vec!["en", "en-US", "fr"]);
        assert_eq!(table.current_name(), Some("en-US"));
    }

    #[test]
    fn test_activate_known_locale() {
        let mut table = LocaleTable::new();
        table.activate("fr").unwrap();
        let current = table.current().unwrap();
        assert_eq!(current.name(), "fr");
        assert_eq!(current.date_format_groups().day, 1);
        assert_eq!(current.decimal_separator(), ',');
    }

    #[test]
    fn test_activate_unknown_locale_keeps_previous() {
        let mut table = LocaleTable::new();
        table.activate("fr").unwrap();
        let err = table.activate("de").unwrap_err();
        assert!(matches!(err, ValidatorsError::LocaleNotFound(ref n) if n == "de"));
        assert_eq!(table.current().unwrap().name(), "fr");
    }

    #[test]
    fn test_empty_table_has_no_current() {
        let table = LocaleTable::empty();
        assert!(matches!(
            table.current(),
            Err(ValidatorsError::NoActiveLocale)
        ));
    }

    #[test]
    fn test_register_overwrites_and_renames() {
        let mut table = LocaleTable::new();
        let params = LocaleParameters::new(
            "whatever",
            r"^([0-9]{4})\.([0-9]{2})\.([0-9]{2})",
            DateFormatGroups {
                day: 3,
                month: 2,
                year: 1,
                hour: None,
                minute: None,
                second: None,
            },
            '.',
        )
        .unwrap();
        table.register("fr", params);
        table.activate("fr").unwrap();
        let current = table.current().unwrap();
        assert_eq!(current.name(), "fr");
        assert_eq!(current.decimal_separator(), '.');
        assert!(current.date_format_groups().hour.is_none());
    }

    #[test]
    fn test_group_index_out_of_range_rejected() {
        let err = LocaleParameters::new(
            "broken",
            r"^([0-9]{2})/([0-9]{2})/([0-9]{4})",
            DateFormatGroups::DAY_FIRST,
            ',',
        )
        .unwrap_err();
        assert!(matches!(err, ValidatorsError::InvalidLocale { .. }));
        assert!(err.to_string().contains("hour group 5"));
    }

    #[test]
    fn test_group_index_zero_rejected() {
        let groups = DateFormatGroups {
            day: 0,
            ..DateFormatGroups::MONTH_FIRST
        };
        let result = LocaleParameters::new("zero", r"^(a)(b)(c)", groups, '.');
        assert!(result.is_err());
    }

    #[test]
    fn test_bad_pattern_rejected() {
        let result = LocaleParameters::new("bad", r"^([0-9", DateFormatGroups::DAY_FIRST, '.');
        assert!(matches!(result, Err(ValidatorsError::InvalidLocale { .. })));
    }

    #[test]
    fn test_groups_deserialize_without_time() {
        let groups: DateFormatGroups =
            serde_json::from_str(r#"{"day": 1, "month": 2, "year": 3}"#).unwrap();
        assert_eq!(groups.hour, None);
        assert_eq!(groups.second, None);
    }
}
