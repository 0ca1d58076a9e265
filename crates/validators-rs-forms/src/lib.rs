//! # validators-rs-forms
//!
//! The validation engine: the rule model, declarative attribute parsing,
//! typed comparisons, custom validators, rule dispatch, and synchronous and
//! asynchronous validation runs.
//!
//! ## Modules
//!
//! - [`rules`] - Rule kinds, operators and the [`Rule`] model
//! - [`attributes`] - Parsing rules from `data-*` attributes
//! - [`controls`] - The [`FormSource`] trait and the in-memory [`MemoryForm`]
//! - [`compare`] - Typed int/float/date comparisons
//! - [`custom`] - Custom validators and their registry
//! - [`dispatch`] - Per-kind rule evaluation
//! - [`run`] - Accumulating a run's outcome
//! - [`engine`] - The [`Validators`] engine and its entry points

pub mod attributes;
pub mod compare;
pub mod controls;
pub mod custom;
pub mod dispatch;
pub mod engine;
pub mod rules;
pub mod run;

pub use compare::{CompareOutcome, ComparisonEvaluator, ParsedValue, ValueKind};
pub use controls::{ControlHandle, Element, FormSource, MemoryForm};
pub use custom::{AsyncCustomValidator, CustomValidator, CustomValidatorRegistry, CustomValidatorResult};
pub use dispatch::{RuleDispatcher, RuleResult};
pub use engine::Validators;
pub use rules::{CompareOperand, Comparison, Operator, Rule, RuleKind};
pub use run::{RunState, ValidationOutcome, ValidationRun};
