//! Rule dispatch.
//!
//! [`RuleDispatcher`] maps each [`RuleKind`] to its check. Checking a rule
//! happens in two steps: [`RuleDispatcher::check_declaration`] verifies the
//! declaration is complete and resolves the target control, then the kind's
//! handler reads the value and decides. A validation run performs the first
//! step for every rule, applicable or not, so a malformed declaration is
//! reported whichever group is validated.

use once_cell::sync::Lazy;
use regex::Regex;
use validators_rs_core::error::{ValidatorsError, ValidatorsResult};
use validators_rs_core::l10n::LocaleParameters;

use crate::compare::{ComparisonEvaluator, ValueKind};
use crate::controls::{ControlHandle, FormSource};
use crate::custom::{CustomValidatorRegistry, CustomValidatorResult, RegisteredValidator};
use crate::rules::{CompareOperand, Comparison, Operator, Rule, RuleKind};

/// Word characters are ASCII only.
static EMAIL_FORMAT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[0-9A-Za-z_]+([.-]?[0-9A-Za-z_]+)*@[0-9A-Za-z_]+([.-]?[0-9A-Za-z_]+)*(\.[0-9A-Za-z_]{2,})+$",
    )
    .expect("valid regex")
});

/// The outcome of evaluating one rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleResult {
    /// Whether the rule passed.
    pub passed: bool,
    /// The failure message; always `None` when the rule passed.
    pub message: Option<String>,
    /// The validated control, if the rule targets one.
    pub control: Option<ControlHandle>,
}

impl RuleResult {
    fn from_check(rule: &Rule, passed: bool, control: Option<&ControlHandle>) -> Self {
        Self {
            passed,
            message: if passed { None } else { rule.message.clone() },
            control: control.cloned(),
        }
    }

    /// Builds the result of a custom validator.
    pub fn from_custom(result: CustomValidatorResult, control: Option<ControlHandle>) -> Self {
        Self {
            passed: result.is_valid,
            message: if result.is_valid { None } else { result.message },
            control,
        }
    }
}

fn missing(rule: &Rule, attribute: &'static str) -> ValidatorsError {
    ValidatorsError::MissingAttribute {
        kind: rule.kind.as_str().to_string(),
        attribute,
    }
}

/// Evaluates rules against a form source under one locale.
#[derive(Debug, Clone, Copy)]
pub struct RuleDispatcher<'a> {
    locale: &'a LocaleParameters,
    validators: &'a CustomValidatorRegistry,
}

impl<'a> RuleDispatcher<'a> {
    /// Creates a dispatcher.
    pub const fn new(locale: &'a LocaleParameters, validators: &'a CustomValidatorRegistry) -> Self {
        Self { locale, validators }
    }

    /// Checks that `rule` declares everything its kind needs and resolves
    /// its target control.
    ///
    /// Non-custom rules need a message and a resolvable control. Custom
    /// rules need a validator name; their control is optional but must
    /// resolve when given. A comparison needs an operand (and a maximum for
    /// `range`) and a compare control must resolve.
    ///
    /// # Errors
    ///
    /// Returns [`ValidatorsError::MissingAttribute`] or
    /// [`ValidatorsError::ControlNotFound`].
    pub fn check_declaration(
        &self,
        rule: &Rule,
        source: &dyn FormSource,
    ) -> ValidatorsResult<Option<ControlHandle>> {
        if rule.kind == RuleKind::Custom {
            if rule.function.is_none() {
                return Err(missing(rule, "function"));
            }
        } else {
            if rule.message.is_none() {
                return Err(missing(rule, "message"));
            }
            if rule.control.is_none() {
                return Err(missing(rule, "control"));
            }
        }

        let control = rule
            .control
            .as_deref()
            .map(|id| resolve(source, id))
            .transpose()?;

        if let Some(comparison) = &rule.comparison {
            if rule.kind.value_kind().is_some() {
                match &comparison.operand {
                    None => return Err(missing(rule, "comparevalue")),
                    Some(CompareOperand::Control(id)) => {
                        resolve(source, id)?;
                    }
                    Some(CompareOperand::Value(_)) => {}
                }
                if comparison.operator == Operator::Range && comparison.max_value.is_none() {
                    return Err(missing(rule, "comparemaxvalue"));
                }
            }
        }

        Ok(control)
    }

    /// Checks and evaluates one rule on its own.
    ///
    /// # Errors
    ///
    /// Returns any configuration error of the declaration or of the custom
    /// validator lookup.
    pub fn evaluate(&self, rule: &Rule, source: &dyn FormSource) -> ValidatorsResult<RuleResult> {
        let control = self.check_declaration(rule, source)?;
        self.evaluate_resolved(rule, control.as_ref(), source)
    }

    /// Evaluates a rule whose declaration was already checked.
    pub(crate) fn evaluate_resolved(
        &self,
        rule: &Rule,
        control: Option<&ControlHandle>,
        source: &dyn FormSource,
    ) -> ValidatorsResult<RuleResult> {
        let passed = match rule.kind {
            RuleKind::Required => !Self::read(rule, control, source)?.is_empty(),
            RuleKind::Regexp => Self::check_pattern(rule, control, source)?,
            RuleKind::Int | RuleKind::Float | RuleKind::Date => {
                self.check_typed(rule, control, source)?
            }
            RuleKind::Email => {
                let value = Self::read(rule, control, source)?;
                value.is_empty() || EMAIL_FORMAT.is_match(&value)
            }
            RuleKind::Custom => return self.run_custom(rule, control, source),
        };
        Ok(RuleResult::from_check(rule, passed, control))
    }

    /// Looks up the validator a custom rule names.
    ///
    /// # Errors
    ///
    /// Returns [`ValidatorsError::UnregisteredValidator`] for unknown names.
    pub fn custom_validator(&self, rule: &Rule) -> ValidatorsResult<(&'a str, &'a RegisteredValidator)> {
        let validators: &'a CustomValidatorRegistry = self.validators;
        let name = rule.function.as_deref().ok_or_else(|| missing(rule, "function"))?;
        validators
            .entry(name)
            .ok_or_else(|| ValidatorsError::UnregisteredValidator(name.to_string()))
    }

    fn read(
        rule: &Rule,
        control: Option<&ControlHandle>,
        source: &dyn FormSource,
    ) -> ValidatorsResult<String> {
        let control = control.ok_or_else(|| missing(rule, "control"))?;
        source.read_control_value(control)
    }

    fn check_pattern(
        rule: &Rule,
        control: Option<&ControlHandle>,
        source: &dyn FormSource,
    ) -> ValidatorsResult<bool> {
        let pattern = rule.pattern.as_deref().ok_or_else(|| missing(rule, "pattern"))?;
        let regex = Regex::new(pattern).map_err(|e| ValidatorsError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;
        let value = Self::read(rule, control, source)?;
        Ok(value.is_empty() || regex.is_match(&value))
    }

    fn check_typed(
        &self,
        rule: &Rule,
        control: Option<&ControlHandle>,
        source: &dyn FormSource,
    ) -> ValidatorsResult<bool> {
        let Some(kind) = rule.kind.value_kind() else {
            return Ok(false);
        };
        let value = Self::read(rule, control, source)?;
        if value.is_empty() {
            return Ok(true);
        }

        let evaluator = ComparisonEvaluator::new(self.locale);
        let Some(comparison) = &rule.comparison else {
            return Ok(evaluator.parse(kind, &value).is_some());
        };
        self.compare(rule, kind, &value, comparison, &evaluator, source)
    }

    fn compare(
        &self,
        rule: &Rule,
        kind: ValueKind,
        value: &str,
        comparison: &Comparison,
        evaluator: &ComparisonEvaluator<'_>,
        source: &dyn FormSource,
    ) -> ValidatorsResult<bool> {
        let compare_value = match &comparison.operand {
            Some(CompareOperand::Value(literal)) => literal.clone(),
            Some(CompareOperand::Control(id)) => source.read_control_value(&resolve(source, id)?)?,
            None => return Err(missing(rule, "comparevalue")),
        };
        let outcome = evaluator.compare(
            kind,
            value,
            comparison.operator,
            &compare_value,
            comparison.max_value.as_deref(),
        )?;
        tracing::trace!(rule = rule.label(), ?outcome, "comparison evaluated");
        Ok(outcome.is_passed())
    }

    fn run_custom(
        &self,
        rule: &Rule,
        control: Option<&ControlHandle>,
        source: &dyn FormSource,
    ) -> ValidatorsResult<RuleResult> {
        let (name, validator) = self.custom_validator(rule)?;
        let RegisteredValidator::Sync(validator) = validator else {
            return Err(ValidatorsError::AsyncValidatorInSyncRun(name.to_string()));
        };
        let value = control.map(|c| source.read_control_value(c)).transpose()?;
        let mut result = CustomValidatorResult::default();
        validator.validate(value.as_deref(), &mut result);
        Ok(RuleResult::from_custom(result, control.cloned()))
    }
}

pub(crate) fn resolve(source: &dyn FormSource, id: &str) -> ValidatorsResult<ControlHandle> {
    source.resolve_control(id).ok_or_else(|| {
        tracing::warn!(control = id, "validator references an unknown control");
        ValidatorsError::ControlNotFound(id.to_string())
    })
}
