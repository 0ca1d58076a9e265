//! Custom validators and their registry.
//!
//! A `custom` rule names a validator that the host application registered
//! beforehand. Synchronous validators receive the control value and a
//! mutable [`CustomValidatorResult`] to fill in. Asynchronous validators
//! return their result, or reject with a reason, which aborts the run.
//!
//! ```
//! use validators_rs_forms::custom::{CustomValidatorRegistry, CustomValidatorResult};
//!
//! let mut registry = CustomValidatorRegistry::new();
//! registry.register_fn("even", |value: Option<&str>, result: &mut CustomValidatorResult| {
//!     let even = value.and_then(|v| v.parse::<i64>().ok()).is_some_and(|n| n % 2 == 0);
//!     if !even {
//!         result.invalidate("Value must be even");
//!     }
//! });
//! registry.register_async_fn("slow_ok", |_value: Option<String>| async {
//!     Ok(CustomValidatorResult::valid())
//! });
//!
//! assert!(registry.contains("even"));
//! assert_eq!(registry.names(), vec!["even", "slow_ok"]);
//! ```

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

/// What a custom validator decided.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomValidatorResult {
    /// Whether the value is valid. Starts as `true`.
    pub is_valid: bool,
    /// Message reported when invalid.
    pub message: Option<String>,
}

impl Default for CustomValidatorResult {
    fn default() -> Self {
        Self::valid()
    }
}

impl CustomValidatorResult {
    /// A passing result.
    pub const fn valid() -> Self {
        Self {
            is_valid: true,
            message: None,
        }
    }

    /// A failing result with a message.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            message: Some(message.into()),
        }
    }

    /// Marks the result as failing with a message.
    pub fn invalidate(&mut self, message: impl Into<String>) {
        self.is_valid = false;
        self.message = Some(message.into());
    }
}

/// A synchronous custom validator.
///
/// Implemented for every `Fn(Option<&str>, &mut CustomValidatorResult)`.
/// The control value is `None` when the rule targets no control.
pub trait CustomValidator: Send + Sync {
    /// Validates `control_value`, recording the decision in `result`.
    fn validate(&self, control_value: Option<&str>, result: &mut CustomValidatorResult);
}

impl<F> CustomValidator for F
where
    F: Fn(Option<&str>, &mut CustomValidatorResult) + Send + Sync,
{
    fn validate(&self, control_value: Option<&str>, result: &mut CustomValidatorResult) {
        self(control_value, result);
    }
}

/// An asynchronous custom validator.
///
/// Resolving with a result (valid or not) settles the rule. Returning
/// `Err(reason)` rejects, which fails the whole asynchronous run at once.
#[async_trait]
pub trait AsyncCustomValidator: Send + Sync {
    /// Validates `control_value`.
    async fn validate(&self, control_value: Option<String>) -> Result<CustomValidatorResult, String>;
}

/// Adapts an async closure to [`AsyncCustomValidator`].
pub struct AsyncFnValidator<F>(F);

impl<F> AsyncFnValidator<F> {
    /// Wraps `f`.
    pub const fn new(f: F) -> Self {
        Self(f)
    }
}

#[async_trait]
impl<F, Fut> AsyncCustomValidator for AsyncFnValidator<F>
where
    F: Fn(Option<String>) -> Fut + Send + Sync,
    Fut: Future<Output = Result<CustomValidatorResult, String>> + Send + 'static,
{
    async fn validate(&self, control_value: Option<String>) -> Result<CustomValidatorResult, String> {
        (self.0)(control_value).await
    }
}

/// A registered validator of either flavour.
#[derive(Clone)]
pub enum RegisteredValidator {
    /// Runs inline in both synchronous and asynchronous runs.
    Sync(Arc<dyn CustomValidator>),
    /// Only usable in asynchronous runs.
    Async(Arc<dyn AsyncCustomValidator>),
}

impl RegisteredValidator {
    /// `true` for asynchronous validators.
    pub const fn is_async(&self) -> bool {
        matches!(self, Self::Async(_))
    }
}

impl fmt::Debug for RegisteredValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(if self.is_async() { "Async(..)" } else { "Sync(..)" })
    }
}

/// Name → validator map consulted by `custom` rules.
///
/// Registering a name twice replaces the earlier validator.
#[derive(Debug, Clone, Default)]
pub struct CustomValidatorRegistry {
    validators: HashMap<String, RegisteredValidator>,
}

impl CustomValidatorRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a synchronous validator.
    pub fn register(&mut self, name: impl Into<String>, validator: impl CustomValidator + 'static) {
        self.insert(name.into(), RegisteredValidator::Sync(Arc::new(validator)));
    }

    /// Registers a synchronous closure.
    pub fn register_fn<F>(&mut self, name: impl Into<String>, f: F)
    where
        F: Fn(Option<&str>, &mut CustomValidatorResult) + Send + Sync + 'static,
    {
        self.register(name, f);
    }

    /// Registers an asynchronous validator.
    pub fn register_async(
        &mut self,
        name: impl Into<String>,
        validator: impl AsyncCustomValidator + 'static,
    ) {
        self.insert(name.into(), RegisteredValidator::Async(Arc::new(validator)));
    }

    /// Registers an async closure.
    pub fn register_async_fn<F, Fut>(&mut self, name: impl Into<String>, f: F)
    where
        F: Fn(Option<String>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<CustomValidatorResult, String>> + Send + 'static,
    {
        self.register_async(name, AsyncFnValidator::new(f));
    }

    fn insert(&mut self, name: String, validator: RegisteredValidator) {
        if self.validators.insert(name.clone(), validator).is_some() {
            tracing::debug!(validator = %name, "custom validator replaced");
        }
    }

    /// Removes a validator. Returns `true` if it was registered.
    pub fn unregister(&mut self, name: &str) -> bool {
        self.validators.remove(name).is_some()
    }

    /// Looks up a validator by name.
    pub fn get(&self, name: &str) -> Option<&RegisteredValidator> {
        self.validators.get(name)
    }

    pub(crate) fn entry(&self, name: &str) -> Option<(&str, &RegisteredValidator)> {
        self.validators
            .get_key_value(name)
            .map(|(name, validator)| (name.as_str(), validator))
    }

    /// Whether a validator is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.validators.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.validators.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of registered validators.
    pub fn len(&self) -> usize {
        self.validators.len()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_defaults_to_valid() {
        let result = CustomValidatorResult::default();
        assert!(result.is_valid);
        assert!(result.message.is_none());
    }

    #[test]
    fn test_invalidate() {
        let mut result = CustomValidatorResult::valid();
        result.invalidate("nope");
        assert_eq!(result, CustomValidatorResult::invalid("nope"));
    }

    #[test]
    fn test_sync_closure_validator() {
        let mut registry = CustomValidatorRegistry::new();
        registry.register_fn("not_admin", |value: Option<&str>, result: &mut CustomValidatorResult| {
            if value == Some("admin") {
                result.invalidate("Reserved name");
            }
        });

        let Some(RegisteredValidator::Sync(validator)) = registry.get("not_admin") else {
            panic!("expected a sync validator");
        };
        let mut result = CustomValidatorResult::default();
        validator.validate(Some("admin"), &mut result);
        assert!(!result.is_valid);

        let mut result = CustomValidatorResult::default();
        validator.validate(Some("ada"), &mut result);
        assert!(result.is_valid);
    }

    struct AlwaysRejects;

    #[async_trait]
    impl AsyncCustomValidator for AlwaysRejects {
        async fn validate(&self, _control_value: Option<String>) -> Result<CustomValidatorResult, String> {
            Err("service unavailable".into())
        }
    }

    #[tokio::test]
    async fn test_async_validators() {
        let mut registry = CustomValidatorRegistry::new();
        registry.register_async("down", AlwaysRejects);
        registry.register_async_fn("echo", |value: Option<String>| async move {
            Ok(match value {
                Some(v) if v.is_empty() => CustomValidatorResult::invalid("empty"),
                _ => CustomValidatorResult::valid(),
            })
        });

        let Some(RegisteredValidator::Async(down)) = registry.get("down") else {
            panic!("expected an async validator");
        };
        assert_eq!(down.validate(None).await.unwrap_err(), "service unavailable");

        let Some(RegisteredValidator::Async(echo)) = registry.get("echo") else {
            panic!("expected an async validator");
        };
        assert!(!echo.validate(Some(String::new())).await.unwrap().is_valid);
        assert!(echo.validate(Some("x".into())).await.unwrap().is_valid);
    }

    #[test]
    fn test_registry_bookkeeping() {
        let mut registry = CustomValidatorRegistry::new();
        assert!(registry.is_empty());

        registry.register_fn("b", |_: Option<&str>, _: &mut CustomValidatorResult| {});
        registry.register_async("a", AlwaysRejects);
        assert_eq!(registry.names(), vec!["a", "b"]);
        assert!(registry.get("a").unwrap().is_async());

        registry.register_fn("a", |_: Option<&str>, _: &mut CustomValidatorResult| {});
        assert_eq!(registry.len(), 2);
        assert!(!registry.get("a").unwrap().is_async());

        assert!(registry.unregister("a"));
        assert!(!registry.unregister("a"));
        assert!(!registry.contains("a"));
    }
}
