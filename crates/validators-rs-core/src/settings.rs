//! Engine settings.
//!
//! [`Settings`] holds everything an engine needs at startup: which locale to
//! activate, which extra locales to register, whether asynchronous custom
//! validators get a deadline, and how logging is configured. Every field has
//! a default, so a settings file only needs the values it changes.

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::l10n::{data::SLASHED_DATE_FORMAT, DateFormatGroups, DEFAULT_LOCALE};

/// A locale definition as written in a settings file.
///
/// Omitted fields fall back to the `en-US` conventions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocaleSettings {
    /// The local date pattern (`regex` crate syntax).
    pub date_format: String,
    /// Capture-group index of each date component in `date_format`.
    pub date_format_groups: DateFormatGroups,
    /// The local decimal separator.
    pub decimal_separator: char,
}

impl Default for LocaleSettings {
    fn default() -> Self {
        Self {
            date_format: SLASHED_DATE_FORMAT.to_string(),
            date_format_groups: DateFormatGroups::MONTH_FIRST,
            decimal_separator: '.',
        }
    }
}

/// The complete set of engine settings.
///
/// # Examples
///
/// ```
/// use validators_rs_core::settings::Settings;
///
/// let settings = Settings::default();
/// assert_eq!(settings.locale, "en-US");
/// assert!(settings.async_timeout().is_none());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Whether debug mode is enabled (pretty logs instead of JSON).
    pub debug: bool,
    /// The log filter directive (e.g. "info", "validators_rs_forms=debug").
    pub log_level: String,
    /// The locale activated when an engine is built from these settings.
    pub locale: String,
    /// Deadline for each asynchronous custom validator, in milliseconds.
    ///
    /// `None` lets a stalled validator stall the run.
    pub async_timeout_ms: Option<u64>,
    /// Additional locales to register, keyed by name.
    pub locales: HashMap<String, LocaleSettings>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug: true,
            log_level: "info".to_string(),
            locale: DEFAULT_LOCALE.to_string(),
            async_timeout_ms: None,
            locales: HashMap::new(),
        }
    }
}

impl Settings {
    /// The asynchronous validator deadline as a [`Duration`]. Zero means no
    /// deadline, as it does for `VALIDATORS_ASYNC_TIMEOUT_MS`.
    pub fn async_timeout(&self) -> Option<Duration> {
        self.async_timeout_ms
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
    }
}
