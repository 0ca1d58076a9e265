//! The rule model.
//!
//! A [`Rule`] is one declared validation requirement: its [`RuleKind`], the
//! control it targets, the message reported when it fails, and the optional
//! comparison, pattern or custom validator name its kind needs. Rules are
//! read-only snapshots; the engine never mutates them during a run.
//!
//! Rules are usually parsed from declarative attributes (see
//! [`Rule::from_attributes`]) but can also be built in code:
//!
//! ```
//! use validators_rs_forms::rules::{Operator, Rule};
//!
//! let rule = Rule::int("age", "Age must be between 18 and 120")
//!     .range("18", "120")
//!     .group("signup");
//!
//! assert_eq!(rule.comparison.as_ref().unwrap().operator, Operator::Range);
//! assert!(rule.is_applicable(Some("signup")));
//! assert!(!rule.is_applicable(Some("billing")));
//! ```

use std::fmt;
use std::str::FromStr;

use validators_rs_core::error::ValidatorsError;

use crate::compare::ValueKind;

/// The closed set of rule kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleKind {
    /// The control must not be empty.
    Required,
    /// The control must match a pattern.
    Regexp,
    /// The control must be an integer, optionally compared.
    Int,
    /// The control must be a decimal number, optionally compared.
    Float,
    /// The control must be a date, optionally compared.
    Date,
    /// The control must be an email address.
    Email,
    /// A registered custom validator decides.
    Custom,
}

impl RuleKind {
    /// Every kind, in declaration order of the enum.
    pub const ALL: [Self; 7] = [
        Self::Required,
        Self::Regexp,
        Self::Int,
        Self::Float,
        Self::Date,
        Self::Email,
        Self::Custom,
    ];

    /// The name used in declarative attributes.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::Regexp => "regexp",
            Self::Int => "int",
            Self::Float => "float",
            Self::Date => "date",
            Self::Email => "email",
            Self::Custom => "custom",
        }
    }

    /// The typed value this kind compares, if it is a comparison kind.
    pub const fn value_kind(self) -> Option<ValueKind> {
        match self {
            Self::Int => Some(ValueKind::Int),
            Self::Float => Some(ValueKind::Float),
            Self::Date => Some(ValueKind::Date),
            _ => None,
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RuleKind {
    type Err = ValidatorsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidatorsError::UnknownRuleKind(s.to_string()))
    }
}

/// Comparison operators for int, float and date rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// `control == compare`
    Equal,
    /// `control != compare`
    NotEqual,
    /// `control > compare`
    GreaterThan,
    /// `control < compare`
    LessThan,
    /// `control >= compare`
    GreaterThanEqual,
    /// `control <= compare`
    LessThanEqual,
    /// `compare <= control <= max`
    Range,
}

impl Operator {
    /// Every operator.
    pub const ALL: [Self; 7] = [
        Self::Equal,
        Self::NotEqual,
        Self::GreaterThan,
        Self::LessThan,
        Self::GreaterThanEqual,
        Self::LessThanEqual,
        Self::Range,
    ];

    /// The name used in declarative attributes.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Equal => "equal",
            Self::NotEqual => "notequal",
            Self::GreaterThan => "greaterthan",
            Self::LessThan => "lessthan",
            Self::GreaterThanEqual => "greaterthanequal",
            Self::LessThanEqual => "lessthanequal",
            Self::Range => "range",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operator {
    type Err = ValidatorsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|op| op.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidatorsError::UnknownOperator(s.to_string()))
    }
}

/// The right-hand side of a comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompareOperand {
    /// A literal written in the declaration.
    Value(String),
    /// The current value of another control.
    Control(String),
}

/// A comparison attached to an int, float or date rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comparison {
    /// The operator to apply.
    pub operator: Operator,
    /// What the control is compared against. `None` is a malformed
    /// declaration and is reported when the rule is checked.
    pub operand: Option<CompareOperand>,
    /// Upper bound for [`Operator::Range`].
    pub max_value: Option<String>,
}

/// One declared validation requirement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    /// What kind of check this is.
    pub kind: RuleKind,
    /// Id of the validated control. Optional for custom rules.
    pub control: Option<String>,
    /// Message reported when the rule fails. Custom validators supply their own.
    pub message: Option<String>,
    /// Disabled rules are never evaluated.
    pub enabled: bool,
    /// Comma-separated validation groups this rule belongs to.
    pub group: Option<String>,
    /// Comparison for int, float and date rules.
    pub comparison: Option<Comparison>,
    /// Pattern for regexp rules.
    pub pattern: Option<String>,
    /// Registered name of the validator for custom rules.
    pub function: Option<String>,
}

impl Rule {
    /// Creates an enabled rule of the given kind with nothing else declared.
    pub const fn new(kind: RuleKind) -> Self {
        Self {
            kind,
            control: None,
            message: None,
            enabled: true,
            group: None,
            comparison: None,
            pattern: None,
            function: None,
        }
    }

    fn targeting(kind: RuleKind, control: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(kind).control(control).message(message)
    }

    /// A `required` rule.
    pub fn required(control: impl Into<String>, message: impl Into<String>) -> Self {
        Self::targeting(RuleKind::Required, control, message)
    }

    /// A `regexp` rule.
    pub fn regexp(
        control: impl Into<String>,
        pattern: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::targeting(RuleKind::Regexp, control, message).pattern(pattern)
    }

    /// An `int` rule.
    pub fn int(control: impl Into<String>, message: impl Into<String>) -> Self {
        Self::targeting(RuleKind::Int, control, message)
    }

    /// A `float` rule.
    pub fn float(control: impl Into<String>, message: impl Into<String>) -> Self {
        Self::targeting(RuleKind::Float, control, message)
    }

    /// A `date` rule.
    pub fn date(control: impl Into<String>, message: impl Into<String>) -> Self {
        Self::targeting(RuleKind::Date, control, message)
    }

    /// An `email` rule.
    pub fn email(control: impl Into<String>, message: impl Into<String>) -> Self {
        Self::targeting(RuleKind::Email, control, message)
    }

    /// A `custom` rule delegating to the validator registered as `function`.
    pub fn custom(function: impl Into<String>) -> Self {
        Self::new(RuleKind::Custom).function(function)
    }

    // ── Builder methods ──────────────────────────────────────────────

    /// Sets the validated control.
    #[must_use]
    pub fn control(mut self, control: impl Into<String>) -> Self {
        self.control = Some(control.into());
        self
    }

    /// Sets the failure message.
    #[must_use]
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Enables or disables the rule.
    #[must_use]
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Sets the validation group(s), comma separated.
    #[must_use]
    pub fn group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// Sets the regexp pattern.
    #[must_use]
    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    /// Sets the custom validator name.
    #[must_use]
    pub fn function(mut self, function: impl Into<String>) -> Self {
        self.function = Some(function.into());
        self
    }

    /// Compares the control against a literal.
    #[must_use]
    pub fn compare_value(mut self, operator: Operator, value: impl Into<String>) -> Self {
        self.comparison = Some(Comparison {
            operator,
            operand: Some(CompareOperand::Value(value.into())),
            max_value: None,
        });
        self
    }

    /// Compares the control against another control's value.
    #[must_use]
    pub fn compare_control(mut self, operator: Operator, control: impl Into<String>) -> Self {
        self.comparison = Some(Comparison {
            operator,
            operand: Some(CompareOperand::Control(control.into())),
            max_value: None,
        });
        self
    }

    /// Requires `min <= control <= max`.
    #[must_use]
    pub fn range(self, min: impl Into<String>, max: impl Into<String>) -> Self {
        let mut rule = self.compare_value(Operator::Range, min);
        if let Some(comparison) = rule.comparison.as_mut() {
            comparison.max_value = Some(max.into());
        }
        rule
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// A short name for logs and errors: the control id, else the
    /// validator name, else the kind.
    pub fn label(&self) -> &str {
        self.control
            .as_deref()
            .or(self.function.as_deref())
            .unwrap_or_else(|| self.kind.as_str())
    }

    /// Whether this rule takes part in a run for the requested group(s).
    ///
    /// Disabled rules never apply. A missing or blank request applies every
    /// enabled rule. Otherwise the comma-separated requested groups must
    /// share at least one entry with the rule's own groups.
    pub fn is_applicable(&self, requested: Option<&str>) -> bool {
        if !self.enabled {
            return false;
        }
        let requested = requested.map_or("", str::trim);
        if requested.is_empty() {
            return true;
        }
        let Some(own) = self.group.as_deref() else {
            return false;
        };
        let own: Vec<&str> = split_groups(own).collect();
        split_groups(requested).any(|group| own.contains(&group))
    }
}

fn split_groups(groups: &str) -> impl Iterator<Item = &str> {
    groups.split(',').map(str::trim).filter(|group| !group.is_empty())
}
