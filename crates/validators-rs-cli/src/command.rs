//! Command framework for the validators-rs CLI.
//!
//! Each subcommand implements [`CliCommand`]; a [`CommandRegistry`] builds
//! the `clap` application from the registered commands and dispatches the
//! parsed arguments to the right one.
//!
//! ## Defining a Command
//!
//! ```rust,no_run
//! use async_trait::async_trait;
//! use validators_rs_cli::command::{CliCommand, CommandStatus};
//! use validators_rs_core::{Settings, ValidatorsResult};
//!
//! struct LocalesCommand;
//!
//! #[async_trait]
//! impl CliCommand for LocalesCommand {
//!     fn name(&self) -> &'static str { "locales" }
//!     fn help(&self) -> &'static str { "List configured locales" }
//!
//!     async fn handle(
//!         &self,
//!         _matches: &clap::ArgMatches,
//!         settings: &Settings,
//!     ) -> ValidatorsResult<CommandStatus> {
//!         println!("{}", settings.locale);
//!         Ok(CommandStatus::Success)
//!     }
//! }
//! ```

use std::collections::HashMap;
use std::process::ExitCode;

use async_trait::async_trait;
use validators_rs_core::{Settings, ValidatorsError, ValidatorsResult};

/// Name of the global option pointing at a settings file.
pub const SETTINGS_ARG: &str = "settings";

/// How a command that ran without error ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStatus {
    /// The command did what was asked and found nothing wrong.
    Success,
    /// The command ran but its subject failed (invalid form, bad date).
    Failed,
}

impl CommandStatus {
    /// Process exit code: 0 on success, 1 on failure.
    pub fn exit_code(self) -> ExitCode {
        match self {
            Self::Success => ExitCode::SUCCESS,
            Self::Failed => ExitCode::from(1),
        }
    }
}

/// A subcommand of the `validators-rs` binary.
#[async_trait]
pub trait CliCommand: Send + Sync {
    /// The subcommand name.
    fn name(&self) -> &'static str;

    /// A one-line description shown in `--help`.
    fn help(&self) -> &'static str;

    /// Adds the command's arguments. The default adds none.
    fn add_arguments(&self, cmd: clap::Command) -> clap::Command {
        cmd
    }

    /// Runs the command.
    async fn handle(
        &self,
        matches: &clap::ArgMatches,
        settings: &Settings,
    ) -> ValidatorsResult<CommandStatus>;
}

/// The registered subcommands, by name.
pub struct CommandRegistry {
    commands: HashMap<&'static str, Box<dyn CliCommand>>,
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            commands: HashMap::new(),
        }
    }

    /// Registers a command, replacing any command of the same name.
    pub fn register(&mut self, command: Box<dyn CliCommand>) {
        self.commands.insert(command.name(), command);
    }

    /// Returns the command with the given name.
    pub fn get(&self, name: &str) -> Option<&dyn CliCommand> {
        self.commands.get(name).map(AsRef::as_ref)
    }

    /// Registered command names, sorted.
    pub fn list_commands(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.commands.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Number of registered commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Whether no command is registered.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Builds the `clap` application with one subcommand per registered
    /// command and a global `--settings FILE` option.
    pub fn build_cli(&self) -> clap::Command {
        let mut app = clap::Command::new("validators-rs")
            .about("Declarative form validation")
            .version(env!("CARGO_PKG_VERSION"))
            .subcommand_required(true)
            .arg_required_else_help(true)
            .arg(
                clap::Arg::new(SETTINGS_ARG)
                    .long(SETTINGS_ARG)
                    .short('s')
                    .global(true)
                    .value_name("FILE")
                    .help("Settings file (.toml or .json)"),
            );

        let mut entries: Vec<_> = self.commands.iter().collect();
        entries.sort_by_key(|(name, _)| **name);

        for (name, cmd) in entries {
            let subcmd = clap::Command::new(*name).about(cmd.help());
            app = app.subcommand(cmd.add_arguments(subcmd));
        }

        app
    }

    /// Dispatches parsed arguments to the selected command.
    pub async fn execute(
        &self,
        matches: &clap::ArgMatches,
        settings: &Settings,
    ) -> ValidatorsResult<CommandStatus> {
        let (name, sub_matches) = matches.subcommand().ok_or_else(|| {
            ValidatorsError::ConfigurationError("No subcommand specified".to_string())
        })?;

        let cmd = self.get(name).ok_or_else(|| {
            ValidatorsError::ConfigurationError(format!("Unknown command: {name}"))
        })?;

        tracing::debug!(command = name, "running command");
        cmd.handle(sub_matches, settings).await
    }
}
