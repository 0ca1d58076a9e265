//! # validators-rs
//!
//! Declarative form validation: rules declared next to form controls,
//! evaluated by an engine with locale-aware date parsing, typed int, float
//! and date comparisons, and synchronous or asynchronous custom validators.
//!
//! This is the meta-crate that re-exports the sub-crates. Depend on
//! `validators-rs` to get everything, or on individual crates for
//! finer-grained control.
//!
//! ```
//! # #[cfg(feature = "forms")]
//! # {
//! use validators_rs::prelude::*;
//!
//! let form = MemoryForm::new()
//!     .with_control("email", Element::text("ada@example"))
//!     .with_validator([
//!         ("data-validate", "email"),
//!         ("data-control", "email"),
//!         ("data-message", "Invalid email"),
//!     ]);
//!
//! let engine = Validators::new();
//! assert!(!engine.validate(&form, None).unwrap());
//! # }
//! ```

/// Errors, settings, locales and the date parser.
pub use validators_rs_core as core;

/// Rules, form sources, comparisons, custom validators and the engine.
#[cfg(feature = "forms")]
pub use validators_rs_forms as forms;

/// Lifecycle signals.
#[cfg(feature = "signals")]
pub use validators_rs_signals as signals;

/// The command line.
#[cfg(feature = "cli")]
pub use validators_rs_cli as cli;

// Third-party crates the public API is built on, so applications can match
// their versions without adding them separately.
pub use async_trait;
pub use chrono;
pub use serde;
pub use serde_json;
pub use tokio;
pub use tracing;
pub use tracing_subscriber;

/// The types most applications need.
pub mod prelude {
    pub use validators_rs_core::{
        DateParser, LocaleParameters, LocaleTable, Settings, ValidatorsError, ValidatorsResult,
    };

    #[cfg(feature = "forms")]
    pub use validators_rs_forms::{
        AsyncCustomValidator, CustomValidator, CustomValidatorResult, Element, FormSource,
        MemoryForm, Operator, Rule, RuleKind, ValidationOutcome, Validators,
    };

    #[cfg(feature = "signals")]
    pub use validators_rs_signals::{ControlValidated, ValidationBegin, ValidationEnd};
}
