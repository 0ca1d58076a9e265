//! # validators-rs-core
//!
//! Core types for the validators-rs engine: errors, settings, the locale
//! table, and the locale-aware date parser. This crate has no dependency on
//! the rest of the workspace.
//!
//! ## Modules
//!
//! - [`error`] - Error types and result aliases
//! - [`settings`] - Engine settings
//! - [`settings_loader`] - Loading settings from TOML/JSON files and the environment
//! - [`l10n`] - Locale parameters and the locale table
//! - [`dates`] - International/locale date parsing
//! - [`logging`] - Tracing-based logging integration

pub mod dates;
pub mod error;
pub mod l10n;
pub mod logging;
pub mod settings;
pub mod settings_loader;

// Re-export the most commonly used types at the crate root.
pub use dates::DateParser;
pub use error::{DateParseError, ValidatorsError, ValidatorsResult};
pub use l10n::{DateFormatGroups, LocaleParameters, LocaleTable};
pub use settings::{LocaleSettings, Settings};
