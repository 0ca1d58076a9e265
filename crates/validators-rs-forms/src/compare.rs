//! Typed comparisons for int, float and date rules.
//!
//! Both operands are parsed to a [`ParsedValue`] of the rule's
//! [`ValueKind`] before the operator is applied. A value that does not
//! parse makes the comparison [`CompareOutcome::Invalid`], which a rule
//! treats as a failure. Only a malformed declaration (a `range` without an
//! upper bound) is an error.

use std::cmp::Ordering;

use chrono::NaiveDateTime;
use once_cell::sync::Lazy;
use regex::Regex;
use validators_rs_core::dates::DateParser;
use validators_rs_core::error::{ValidatorsError, ValidatorsResult};
use validators_rs_core::l10n::LocaleParameters;

use crate::rules::Operator;

static INT_FORMAT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^-?[0-9]+$").expect("valid regex"));

static FLOAT_FORMAT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^-?[0-9]+(\.[0-9]+)?$").expect("valid regex"));

/// The type a comparison rule works on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// Signed 64-bit integers.
    Int,
    /// Decimal numbers with either separator.
    Float,
    /// Dates in the international or active locale format.
    Date,
}

impl ValueKind {
    /// The rule kind name for this value kind.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::Float => "float",
            Self::Date => "date",
        }
    }
}

/// A control or compare value after parsing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParsedValue {
    /// An integer.
    Int(i64),
    /// A decimal number.
    Float(f64),
    /// A local wall-clock instant.
    Date(NaiveDateTime),
}

impl PartialOrd for ParsedValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => a.partial_cmp(b),
            (Self::Float(a), Self::Float(b)) => a.partial_cmp(b),
            (Self::Date(a), Self::Date(b)) => a.partial_cmp(b),
            _ => None,
        }
    }
}

/// Result of one comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOutcome {
    /// Every operand parsed and the operator holds.
    Passed,
    /// Every operand parsed but the operator does not hold.
    Failed,
    /// An operand did not parse as the expected type.
    Invalid,
}

impl CompareOutcome {
    /// `true` only for [`CompareOutcome::Passed`].
    pub const fn is_passed(self) -> bool {
        matches!(self, Self::Passed)
    }

    const fn from_bool(holds: bool) -> Self {
        if holds {
            Self::Passed
        } else {
            Self::Failed
        }
    }
}

/// Parses and compares values under one locale.
///
/// # Examples
///
/// ```
/// use validators_rs_core::l10n::data;
/// use validators_rs_forms::compare::{CompareOutcome, ComparisonEvaluator, ValueKind};
/// use validators_rs_forms::rules::Operator;
///
/// let locale = data::en_us();
/// let evaluator = ComparisonEvaluator::new(&locale);
///
/// let outcome = evaluator
///     .compare(ValueKind::Float, "3,5", Operator::Equal, "3.5", None)
///     .unwrap();
/// assert_eq!(outcome, CompareOutcome::Passed);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ComparisonEvaluator<'a> {
    locale: &'a LocaleParameters,
}

impl<'a> ComparisonEvaluator<'a> {
    /// Creates an evaluator for the given locale.
    pub const fn new(locale: &'a LocaleParameters) -> Self {
        Self { locale }
    }

    /// Parses `raw` as a value of `kind`, or `None` if it is not one.
    pub fn parse(&self, kind: ValueKind, raw: &str) -> Option<ParsedValue> {
        match kind {
            ValueKind::Int => {
                if !INT_FORMAT.is_match(raw) {
                    return None;
                }
                raw.parse().ok().map(ParsedValue::Int)
            }
            ValueKind::Float => {
                let separator = self.locale.decimal_separator();
                let normalized: String = raw
                    .chars()
                    .map(|c| if c == ',' || c == separator { '.' } else { c })
                    .collect();
                if !FLOAT_FORMAT.is_match(&normalized) {
                    return None;
                }
                normalized.parse().ok().map(ParsedValue::Float)
            }
            ValueKind::Date => DateParser::new(self.locale)
                .parse(raw)
                .ok()
                .map(ParsedValue::Date),
        }
    }

    /// Compares `control_value` against `compare_value` (and `max_value`
    /// for [`Operator::Range`]).
    ///
    /// # Errors
    ///
    /// Returns [`ValidatorsError::MissingAttribute`] for a range without
    /// `max_value`.
    pub fn compare(
        &self,
        kind: ValueKind,
        control_value: &str,
        operator: Operator,
        compare_value: &str,
        max_value: Option<&str>,
    ) -> ValidatorsResult<CompareOutcome> {
        let max_value = match (operator, max_value) {
            (Operator::Range, None) => {
                return Err(ValidatorsError::MissingAttribute {
                    kind: kind.as_str().to_string(),
                    attribute: "comparemaxvalue",
                });
            }
            (Operator::Range, Some(max)) => Some(max),
            _ => None,
        };

        let Some(control) = self.parse(kind, control_value) else {
            return Ok(CompareOutcome::Invalid);
        };
        let Some(compare) = self.parse(kind, compare_value) else {
            return Ok(CompareOutcome::Invalid);
        };
        let max = match max_value {
            Some(raw) => match self.parse(kind, raw) {
                Some(max) => Some(max),
                None => return Ok(CompareOutcome::Invalid),
            },
            None => None,
        };

        Ok(holds(operator, &control, &compare, max.as_ref())
            .map_or(CompareOutcome::Invalid, CompareOutcome::from_bool))
    }
}

/// Applies `operator`; `None` when the values are unordered (NaN never
/// parses, so only mismatched kinds get here).
fn holds(
    operator: Operator,
    control: &ParsedValue,
    compare: &ParsedValue,
    max: Option<&ParsedValue>,
) -> Option<bool> {
    let ordering = control.partial_cmp(compare)?;
    Some(match operator {
        Operator::Equal => ordering == Ordering::Equal,
        Operator::NotEqual => ordering != Ordering::Equal,
        Operator::GreaterThan => ordering == Ordering::Greater,
        Operator::LessThan => ordering == Ordering::Less,
        Operator::GreaterThanEqual => ordering != Ordering::Less,
        Operator::LessThanEqual => ordering != Ordering::Greater,
        Operator::Range => ordering != Ordering::Less && control.partial_cmp(max?)? != Ordering::Greater,
    })
}
