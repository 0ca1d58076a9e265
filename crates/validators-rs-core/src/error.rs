//! Core error types for the validators-rs engine.
//!
//! Two tiers of failure exist. Validation failures (an empty required
//! field, a pattern mismatch, a failed comparison) are expected and are
//! folded into a run's outcome; they never surface as errors. Everything in
//! [`ValidatorsError`] belongs to the other tier: a malformed rule
//! declaration, a broken locale, or a custom validator that rejected. These
//! abort the run at the point they are discovered.

use thiserror::Error;

/// The primary error type for the validators-rs engine.
#[derive(Error, Debug)]
pub enum ValidatorsError {
    // ── Rule declarations ────────────────────────────────────────────

    /// A rule is missing a declarative attribute it needs.
    #[error("Missing attribute '{attribute}' on {kind} validator")]
    MissingAttribute {
        /// The rule kind, as declared.
        kind: String,
        /// The attribute that was expected (e.g. "message", "control").
        attribute: &'static str,
    },

    /// A rule names a kind the engine does not know.
    #[error("Unknown validator kind: {0}")]
    UnknownRuleKind(String),

    /// A comparison names an operator the engine does not know.
    #[error("Unknown validator operator: {0}")]
    UnknownOperator(String),

    /// Both a compare value and a compare control were declared.
    #[error("Validator on '{0}' declares both a compare value and a compare control")]
    ConflictingOperands(String),

    /// A regexp rule's pattern does not compile.
    #[error("Invalid pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// The offending pattern.
        pattern: String,
        /// The compiler's explanation.
        reason: String,
    },

    // ── Controls ─────────────────────────────────────────────────────

    /// The control a rule targets (or compares against) cannot be found.
    #[error("Unable to find the control: {0}")]
    ControlNotFound(String),

    /// The control exists but is not an element that carries a value.
    #[error("Control '{id}' is a <{tag}>; only input, select or textarea can be validated")]
    UnsupportedElement {
        /// The control id.
        id: String,
        /// The element tag name.
        tag: String,
    },

    // ── Custom validators ────────────────────────────────────────────

    /// A custom rule names a validator nobody registered.
    #[error("Unregistered custom validator: {0}")]
    UnregisteredValidator(String),

    /// A custom validator that only has an async form was used in a sync run.
    #[error("Custom validator '{0}' is asynchronous and cannot run in a synchronous validation")]
    AsyncValidatorInSyncRun(String),

    /// An asynchronous custom validator rejected.
    #[error("Custom validator '{name}' rejected: {reason}")]
    CustomRejected {
        /// The validator name.
        name: String,
        /// The reason given by the validator.
        reason: String,
    },

    /// An asynchronous custom validator did not settle in time.
    #[error("Custom validator '{name}' timed out after {millis} ms")]
    CustomTimeout {
        /// The validator name.
        name: String,
        /// The configured timeout.
        millis: u64,
    },

    // ── Localization ─────────────────────────────────────────────────

    /// A locale was activated or looked up that was never registered.
    #[error("Locale not found: {0}")]
    LocaleNotFound(String),

    /// The locale table has no active locale.
    #[error("No locale is active")]
    NoActiveLocale,

    /// A locale definition is inconsistent (bad pattern or group index).
    #[error("Invalid locale '{name}': {reason}")]
    InvalidLocale {
        /// The locale name.
        name: String,
        /// What is wrong with it.
        reason: String,
    },

    // ── Configuration ────────────────────────────────────────────────

    /// A settings file or value is missing or invalid.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// An I/O error occurred.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ValidatorsError {
    /// Returns `true` for errors caused by a malformed declaration, as opposed
    /// to a custom validator rejecting or timing out at runtime.
    pub const fn is_configuration_error(&self) -> bool {
        !matches!(
            self,
            Self::CustomRejected { .. } | Self::CustomTimeout { .. } | Self::IoError(_)
        )
    }
}

/// A convenience type alias for `Result<T, ValidatorsError>`.
pub type ValidatorsResult<T> = Result<T, ValidatorsError>;

/// Why a string could not be read as a date.
///
/// Date parse failures are ordinary results: the date rule and the
/// comparison evaluator treat them as an invalid value.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateParseError {
    /// Neither the international pattern nor the locale pattern matched.
    #[error("input matches neither the international nor the locale date format")]
    NoMatch,
    /// A captured component is not a number that fits.
    #[error("date component is not a valid number")]
    InvalidNumber,
    /// The month is outside 1..=12.
    #[error("month out of range")]
    MonthOutOfRange,
    /// The day does not exist in that month.
    #[error("day out of range for month")]
    DayOutOfRange,
    /// Hour, minute or second is out of range.
    #[error("time of day out of range")]
    TimeOutOfRange,
    /// The year cannot be represented.
    #[error("year out of range")]
    YearOutOfRange,
}
