//! The `check` command.
//!
//! Loads a form definition (the JSON form of a
//! [`MemoryForm`](validators_rs_forms::MemoryForm)), validates it and
//! prints the outcome. The process exits with 1 when the form is invalid.

use std::path::Path;

use async_trait::async_trait;
use validators_rs_core::{Settings, ValidatorsError, ValidatorsResult};
use validators_rs_forms::{MemoryForm, ValidationOutcome, Validators};

use crate::command::{CliCommand, CommandStatus};

/// Validates a form definition file.
pub struct CheckCommand;

/// Options of one `check` invocation.
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// Validation group(s) to restrict the run to.
    pub group: Option<String>,
    /// Locale to activate instead of the configured one.
    pub locale: Option<String>,
}

/// Validates the form stored at `path`.
pub fn check_form(
    path: &Path,
    options: &CheckOptions,
    settings: &Settings,
) -> ValidatorsResult<ValidationOutcome> {
    let form = MemoryForm::from_json(&std::fs::read_to_string(path)?)?;
    let mut engine = Validators::from_settings(settings)?;
    if let Some(locale) = options.locale.as_deref() {
        engine.set_locale(locale)?;
    }
    tracing::debug!(
        path = %path.display(),
        controls = form.controls.len(),
        validators = form.validators.len(),
        "form loaded"
    );
    engine.validate_outcome(&form, options.group.as_deref())
}

/// Renders an outcome as text or as JSON.
pub fn render_outcome(outcome: &ValidationOutcome, json: bool) -> String {
    if json {
        return serde_json::to_string_pretty(outcome).unwrap_or_else(|_| String::from("{}"));
    }
    if outcome.status {
        return "Form is valid".to_string();
    }
    let mut text = format!("Form is invalid ({} message(s))", outcome.messages.len());
    for message in &outcome.messages {
        text.push_str("\n  - ");
        text.push_str(message);
    }
    text
}

#[async_trait]
impl CliCommand for CheckCommand {
    fn name(&self) -> &'static str {
        "check"
    }

    fn help(&self) -> &'static str {
        "Validate a JSON form definition"
    }

    fn add_arguments(&self, cmd: clap::Command) -> clap::Command {
        cmd.arg(
            clap::Arg::new("form")
                .required(true)
                .value_name("FORM")
                .help("Path to the form definition (JSON)"),
        )
        .arg(
            clap::Arg::new("group")
                .long("group")
                .short('g')
                .help("Only validate rules of these comma-separated groups"),
        )
        .arg(
            clap::Arg::new("locale")
                .long("locale")
                .short('l')
                .help("Locale to validate with"),
        )
        .arg(
            clap::Arg::new("json")
                .long("json")
                .action(clap::ArgAction::SetTrue)
                .help("Print the outcome as JSON"),
        )
    }

    async fn handle(
        &self,
        matches: &clap::ArgMatches,
        settings: &Settings,
    ) -> ValidatorsResult<CommandStatus> {
        let path = matches
            .get_one::<String>("form")
            .map(Path::new)
            .ok_or_else(|| ValidatorsError::ConfigurationError("No form file given".to_string()))?;
        let options = CheckOptions {
            group: matches.get_one::<String>("group").cloned(),
            locale: matches.get_one::<String>("locale").cloned(),
        };

        let outcome = check_form(path, &options, settings)?;
        println!("{}", render_outcome(&outcome, matches.get_flag("json")));

        Ok(if outcome.status {
            CommandStatus::Success
        } else {
            CommandStatus::Failed
        })
    }
}
