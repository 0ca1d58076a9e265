//! The validation engine.
//!
//! [`Validators`] owns everything a run needs: the locale table, the
//! custom validator registry and the lifecycle signals. Independent engines
//! never share state.
//!
//! A run first sends [`ValidationBegin`], then walks the discovered rules
//! in declaration order. Every rule's declaration is checked; rules outside
//! the requested group or disabled are then skipped. Each evaluated rule
//! sends [`ControlValidated`]. Once all rules settled, [`ValidationEnd`] is
//! sent with the outcome. A configuration error aborts the run before
//! [`ValidationEnd`].
//!
//! ```
//! use validators_rs_forms::controls::{Element, MemoryForm};
//! use validators_rs_forms::Validators;
//!
//! let form = MemoryForm::new()
//!     .with_control("name", Element::text(""))
//!     .with_validator([
//!         ("data-validate", "required"),
//!         ("data-control", "name"),
//!         ("data-message", "Name is required"),
//!     ]);
//!
//! let engine = Validators::new();
//! let outcome = engine.validate_outcome(&form, None).unwrap();
//! assert!(!outcome.status);
//! assert_eq!(outcome.messages, vec!["Name is required"]);
//! ```

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDateTime;
use futures::stream::{FuturesUnordered, StreamExt};
use tracing::Instrument;
use validators_rs_core::dates::DateParser;
use validators_rs_core::error::{ValidatorsError, ValidatorsResult};
use validators_rs_core::l10n::{LocaleParameters, LocaleTable};
use validators_rs_core::logging::run_span;
use validators_rs_core::settings::Settings;
use validators_rs_signals::{ControlValidated, ValidationBegin, ValidationEnd, ValidationSignals};

use crate::controls::FormSource;
use crate::custom::{AsyncCustomValidator, CustomValidatorRegistry, CustomValidatorResult, RegisteredValidator};
use crate::dispatch::{RuleDispatcher, RuleResult};
use crate::rules::{Rule, RuleKind};
use crate::run::{ValidationOutcome, ValidationRun};

/// A validation engine.
#[derive(Debug, Default)]
pub struct Validators {
    locales: LocaleTable,
    custom: CustomValidatorRegistry,
    signals: ValidationSignals,
    async_timeout: Option<Duration>,
}

impl Validators {
    /// Creates an engine with the built-in locales, `en-US` active, no
    /// custom validators and no timeout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an engine from settings: registers the configured locales,
    /// activates `settings.locale` and installs the async timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ValidatorsError::InvalidLocale`] for a broken locale
    /// definition and [`ValidatorsError::LocaleNotFound`] when the locale
    /// to activate is not registered.
    pub fn from_settings(settings: &Settings) -> ValidatorsResult<Self> {
        let mut engine = Self::new();
        let mut names: Vec<&String> = settings.locales.keys().collect();
        names.sort();
        for name in names {
            let params = LocaleParameters::from_settings(name.as_str(), &settings.locales[name])?;
            engine.register_locale(name.as_str(), params);
        }
        engine.set_locale(&settings.locale)?;
        engine.async_timeout = settings.async_timeout();
        Ok(engine)
    }

    // ── Locales ──────────────────────────────────────────────────────

    /// Activates a registered locale.
    ///
    /// # Errors
    ///
    /// Returns [`ValidatorsError::LocaleNotFound`] for an unknown name; the
    /// active locale is left unchanged.
    pub fn set_locale(&mut self, name: &str) -> ValidatorsResult<()> {
        self.locales.activate(name)
    }

    /// Registers (or replaces) a locale.
    pub fn register_locale(&mut self, name: impl Into<String>, params: LocaleParameters) {
        self.locales.register(name, params);
    }

    /// The engine's locale table.
    pub const fn locales(&self) -> &LocaleTable {
        &self.locales
    }

    /// Parses a date with the active locale, or `None` if it is not one.
    pub fn parse_date(&self, input: &str) -> Option<NaiveDateTime> {
        let locale = self.locales.current().ok()?;
        DateParser::new(locale).parse(input).ok()
    }

    // ── Custom validators and signals ────────────────────────────────

    /// The custom validator registry.
    pub const fn custom_validators(&self) -> &CustomValidatorRegistry {
        &self.custom
    }

    /// The custom validator registry, for registering validators.
    pub fn custom_validators_mut(&mut self) -> &mut CustomValidatorRegistry {
        &mut self.custom
    }

    /// The lifecycle signals.
    pub const fn signals(&self) -> &ValidationSignals {
        &self.signals
    }

    /// The deadline applied to each asynchronous custom validator.
    pub const fn async_timeout(&self) -> Option<Duration> {
        self.async_timeout
    }

    /// Sets or clears the asynchronous custom validator deadline.
    pub fn set_async_timeout(&mut self, timeout: Option<Duration>) {
        self.async_timeout = timeout;
    }

    // ── Runs ─────────────────────────────────────────────────────────

    /// Validates a form synchronously. Returns the overall status.
    ///
    /// # Errors
    ///
    /// Returns the first configuration error met; asynchronous custom
    /// validators fail with [`ValidatorsError::AsyncValidatorInSyncRun`].
    pub fn validate(&self, source: &dyn FormSource, group: Option<&str>) -> ValidatorsResult<bool> {
        self.validate_outcome(source, group).map(|outcome| outcome.status)
    }

    /// Validates a form synchronously and returns the full outcome.
    ///
    /// # Errors
    ///
    /// See [`Validators::validate`].
    pub fn validate_outcome(
        &self,
        source: &dyn FormSource,
        group: Option<&str>,
    ) -> ValidatorsResult<ValidationOutcome> {
        let span = run_span(group, false);
        let _guard = span.enter();

        let dispatcher = RuleDispatcher::new(self.locales.current()?, &self.custom);
        let mut run = self.begin(group);
        let rules = source.discover_rules()?;

        for (index, rule) in rules.iter().enumerate() {
            let control = dispatcher.check_declaration(rule, source)?;
            if !rule.is_applicable(group) {
                tracing::trace!(rule = rule.label(), "rule skipped");
                continue;
            }
            let result = dispatcher.evaluate_resolved(rule, control.as_ref(), source)?;
            self.settle(&mut run, index, rule, &result);
        }

        Ok(self.end(&mut run))
    }

    /// Validates a form, letting asynchronous custom validators complete
    /// in any order. Returns the overall status.
    ///
    /// # Errors
    ///
    /// Returns the first configuration error met, or the first rejection
    /// or timeout of an asynchronous custom validator. The remaining
    /// validators are dropped and no [`ValidationEnd`] is sent.
    pub async fn validate_async(
        &self,
        source: &dyn FormSource,
        group: Option<&str>,
    ) -> ValidatorsResult<bool> {
        self.validate_async_outcome(source, group)
            .await
            .map(|outcome| outcome.status)
    }

    /// Asynchronous variant of [`Validators::validate_outcome`].
    ///
    /// Synchronous rules are evaluated inline, in declaration order.
    /// Asynchronous custom validators are started in declaration order and
    /// polled together; the run completes once all of them settled.
    ///
    /// # Errors
    ///
    /// See [`Validators::validate_async`].
    pub async fn validate_async_outcome(
        &self,
        source: &dyn FormSource,
        group: Option<&str>,
    ) -> ValidatorsResult<ValidationOutcome> {
        let span = run_span(group, true);
        self.run_async(source, group).instrument(span).await
    }

    async fn run_async(
        &self,
        source: &dyn FormSource,
        group: Option<&str>,
    ) -> ValidatorsResult<ValidationOutcome> {
        let dispatcher = RuleDispatcher::new(self.locales.current()?, &self.custom);
        let mut run = self.begin(group);
        let rules = source.discover_rules()?;
        let mut pending = FuturesUnordered::new();

        for (index, rule) in rules.iter().enumerate() {
            let control = dispatcher.check_declaration(rule, source)?;
            if !rule.is_applicable(group) {
                tracing::trace!(rule = rule.label(), "rule skipped");
                continue;
            }
            if rule.kind == RuleKind::Custom {
                if let (name, RegisteredValidator::Async(validator)) = dispatcher.custom_validator(rule)? {
                    let value = control
                        .as_ref()
                        .map(|c| source.read_control_value(c))
                        .transpose()?;
                    let validator = Arc::clone(validator);
                    let timeout = self.async_timeout;
                    tracing::debug!(validator = name, "asynchronous validator started");
                    pending.push(async move {
                        let settled = settle_async(name, validator, value, timeout).await;
                        (index, control, settled)
                    });
                    continue;
                }
            }
            let result = dispatcher.evaluate_resolved(rule, control.as_ref(), source)?;
            self.settle(&mut run, index, rule, &result);
        }

        while let Some((index, control, settled)) = pending.next().await {
            let result = RuleResult::from_custom(settled?, control);
            self.settle(&mut run, index, &rules[index], &result);
        }

        Ok(self.end(&mut run))
    }

    fn begin(&self, group: Option<&str>) -> ValidationRun {
        let mut run = ValidationRun::new();
        run.begin();
        self.signals.begin.send(&ValidationBegin {
            group: group.map(str::to_string),
        });
        run
    }

    fn settle(&self, run: &mut ValidationRun, index: usize, rule: &Rule, result: &RuleResult) {
        tracing::debug!(
            kind = %rule.kind,
            rule = rule.label(),
            passed = result.passed,
            "rule evaluated"
        );
        run.record(index, result);
        self.signals.control_validated.send(&ControlValidated {
            control: result.control.as_ref().map(|c| c.id().to_string()),
            passed: result.passed,
        });
    }

    fn end(&self, run: &mut ValidationRun) -> ValidationOutcome {
        let outcome = run.finish();
        tracing::info!(
            status = outcome.status,
            evaluated = run.evaluated(),
            failures = outcome.messages.len(),
            "validation finished"
        );
        self.signals.end.send(&ValidationEnd {
            status: outcome.status,
            messages: outcome.messages.clone(),
        });
        outcome
    }
}

async fn settle_async(
    name: &str,
    validator: Arc<dyn AsyncCustomValidator>,
    value: Option<String>,
    timeout: Option<Duration>,
) -> ValidatorsResult<CustomValidatorResult> {
    let validation = validator.validate(value);
    let settled = match timeout {
        Some(limit) => tokio::time::timeout(limit, validation).await.map_err(|_| {
            tracing::warn!(validator = name, "asynchronous validator timed out");
            ValidatorsError::CustomTimeout {
                name: name.to_string(),
                millis: u64::try_from(limit.as_millis()).unwrap_or(u64::MAX),
            }
        })?,
        None => validation.await,
    };
    settled.map_err(|reason| {
        tracing::warn!(validator = name, %reason, "asynchronous validator rejected");
        ValidatorsError::CustomRejected {
            name: name.to_string(),
            reason,
        }
    })
}
