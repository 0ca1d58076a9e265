//! # validators-rs-cli
//!
//! The `validators-rs` command line: validate JSON form definitions and
//! try out the date parser from a shell.
//!
//! ## Quick Start
//!
//! ```rust
//! use validators_rs_cli::command::CommandRegistry;
//! use validators_rs_cli::commands::register_builtin_commands;
//!
//! let mut registry = CommandRegistry::new();
//! register_builtin_commands(&mut registry);
//!
//! let names = registry.list_commands();
//! assert!(names.contains(&"check"));
//! assert!(names.contains(&"parse-date"));
//! ```

// - result_large_err: ValidatorsError is the workspace-wide error type
// - unused_async: command handlers keep the same async signature
#![allow(clippy::result_large_err)]
#![allow(clippy::unused_async)]

pub mod command;
pub mod commands;

use std::path::Path;

use validators_rs_core::{settings_loader, Settings, ValidatorsResult};

pub use command::{CliCommand, CommandRegistry, CommandStatus};

/// Loads the CLI settings: the given file (TOML or JSON) over the
/// defaults, then `VALIDATORS_*` environment overrides.
pub fn load_settings(path: Option<&Path>) -> ValidatorsResult<Settings> {
    let Some(path) = path else {
        return Ok(settings_loader::from_env());
    };
    let mut settings = settings_loader::from_file(path)?;
    settings_loader::apply_env_overrides(&mut settings);
    Ok(settings)
}
