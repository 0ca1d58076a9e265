//! Parsing rules from declarative attributes.
//!
//! A validator element declares its rule through `data-*` attributes:
//!
//! | attribute                 | meaning                                     |
//! |---------------------------|---------------------------------------------|
//! | `data-validate`           | the rule kind (required)                    |
//! | `data-control`            | id of the validated control                 |
//! | `data-message`            | failure message                             |
//! | `data-enabled`            | `"false"` disables the rule                 |
//! | `data-validationgroup`    | comma-separated validation groups           |
//! | `data-operator`           | comparison operator                         |
//! | `data-comparevalue`       | literal to compare against                  |
//! | `data-comparecontrol`     | control to compare against                  |
//! | `data-comparemaxvalue`    | upper bound for `range`                     |
//! | `data-pattern`            | pattern for `regexp`                        |
//! | `data-function`           | registered validator name for `custom`      |
//!
//! The `data-` prefix is optional and names are case-insensitive. Unknown
//! attributes are ignored.

use std::collections::HashMap;

use validators_rs_core::error::{ValidatorsError, ValidatorsResult};

use crate::rules::{CompareOperand, Comparison, Operator, Rule, RuleKind};

/// Prefix of declarative validator attributes.
pub const ATTRIBUTE_PREFIX: &str = "data-";

/// Lowercases names and strips the prefix. When both `data-x` and `x` are
/// given, the prefixed one wins regardless of map order.
fn normalize(attributes: &HashMap<String, String>) -> HashMap<String, &str> {
    let mut normalized: HashMap<String, (&str, bool)> = HashMap::with_capacity(attributes.len());
    for (key, value) in attributes {
        let key = key.trim().to_ascii_lowercase();
        let (name, prefixed) = key
            .strip_prefix(ATTRIBUTE_PREFIX)
            .map_or_else(|| (key.clone(), false), |name| (name.to_string(), true));
        let shadowed = !prefixed && matches!(normalized.get(&name), Some((_, true)));
        if !shadowed {
            normalized.insert(name, (value.as_str(), prefixed));
        }
    }
    normalized
        .into_iter()
        .map(|(name, (value, _))| (name, value))
        .collect()
}

impl Rule {
    /// Builds a rule from its declarative attributes.
    ///
    /// # Errors
    ///
    /// Returns [`ValidatorsError::MissingAttribute`] without a `validate`
    /// attribute, [`ValidatorsError::UnknownRuleKind`] and
    /// [`ValidatorsError::UnknownOperator`] for unrecognized names, and
    /// [`ValidatorsError::ConflictingOperands`] when both a compare value
    /// and a compare control are declared.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::collections::HashMap;
    /// use validators_rs_forms::rules::{Rule, RuleKind};
    ///
    /// let attributes: HashMap<String, String> = [
    ///     ("data-validate", "int"),
    ///     ("data-control", "quantity"),
    ///     ("data-message", "Quantity must be positive"),
    ///     ("data-operator", "greaterthan"),
    ///     ("data-comparevalue", "0"),
    /// ]
    /// .into_iter()
    /// .map(|(k, v)| (k.to_string(), v.to_string()))
    /// .collect();
    ///
    /// let rule = Rule::from_attributes(&attributes).unwrap();
    /// assert_eq!(rule.kind, RuleKind::Int);
    /// assert!(rule.comparison.is_some());
    /// ```
    pub fn from_attributes(attributes: &HashMap<String, String>) -> ValidatorsResult<Self> {
        let attrs = normalize(attributes);
        let owned = |name: &str| attrs.get(name).map(|value| (*value).to_string());

        let kind: RuleKind = attrs
            .get("validate")
            .ok_or_else(|| ValidatorsError::MissingAttribute {
                kind: "element".to_string(),
                attribute: "validate",
            })?
            .parse()?;

        let mut rule = Self::new(kind);
        rule.control = owned("control");
        rule.message = owned("message");
        rule.enabled = attrs.get("enabled").map_or(true, |value| value.trim() != "false");
        rule.group = owned("validationgroup");
        rule.pattern = owned("pattern");
        rule.function = owned("function");

        if let Some(operator) = attrs.get("operator") {
            let operator: Operator = operator.parse()?;
            let operand = match (owned("comparevalue"), owned("comparecontrol")) {
                (Some(_), Some(_)) => {
                    return Err(ValidatorsError::ConflictingOperands(rule.label().to_string()));
                }
                (Some(value), None) => Some(CompareOperand::Value(value)),
                (None, Some(control)) => Some(CompareOperand::Control(control)),
                (None, None) => None,
            };
            rule.comparison = Some(Comparison {
                operator,
                operand,
                max_value: owned("comparemaxvalue"),
            });
        }

        Ok(rule)
    }
}
