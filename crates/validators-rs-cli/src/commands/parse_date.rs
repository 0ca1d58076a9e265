//! The `parse-date` command.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use validators_rs_core::{Settings, ValidatorsError, ValidatorsResult};
use validators_rs_forms::Validators;

use crate::command::{CliCommand, CommandStatus};

/// Output format of a parsed date.
pub const DATE_OUTPUT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parses a date with the configured (or given) locale and prints it in
/// the international format.
pub struct ParseDateCommand;

/// Parses `input` with the engine built from `settings`, optionally under
/// another locale. `Ok(None)` means the input is not a date.
pub fn parse_with_settings(
    input: &str,
    locale: Option<&str>,
    settings: &Settings,
) -> ValidatorsResult<Option<NaiveDateTime>> {
    let mut engine = Validators::from_settings(settings)?;
    if let Some(locale) = locale {
        engine.set_locale(locale)?;
    }
    Ok(engine.parse_date(input))
}

#[async_trait]
impl CliCommand for ParseDateCommand {
    fn name(&self) -> &'static str {
        "parse-date"
    }

    fn help(&self) -> &'static str {
        "Parse a date in the international or a locale format"
    }

    fn add_arguments(&self, cmd: clap::Command) -> clap::Command {
        cmd.arg(
            clap::Arg::new("input")
                .required(true)
                .value_name("DATE")
                .help("The date to parse"),
        )
        .arg(
            clap::Arg::new("locale")
                .long("locale")
                .short('l')
                .help("Locale to parse with"),
        )
    }

    async fn handle(
        &self,
        matches: &clap::ArgMatches,
        settings: &Settings,
    ) -> ValidatorsResult<CommandStatus> {
        let input = matches
            .get_one::<String>("input")
            .ok_or_else(|| ValidatorsError::ConfigurationError("No date given".to_string()))?;
        let locale = matches.get_one::<String>("locale").map(String::as_str);

        match parse_with_settings(input, locale, settings)? {
            Some(instant) => {
                println!("{}", instant.format(DATE_OUTPUT_FORMAT));
                Ok(CommandStatus::Success)
            }
            None => {
                eprintln!("Not a valid date: {input}");
                Ok(CommandStatus::Failed)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_default_locale() {
        let parsed = parse_with_settings("12/24/2024 18:30", None, &Settings::default())
            .unwrap()
            .unwrap();
        assert_eq!(parsed.format(DATE_OUTPUT_FORMAT).to_string(), "2024-12-24 18:30:00");
    }

    #[test]
    fn test_parse_other_locale() {
        let parsed = parse_with_settings("24/12/2024", Some("fr"), &Settings::default())
            .unwrap()
            .unwrap();
        assert_eq!(parsed.format(DATE_OUTPUT_FORMAT).to_string(), "2024-12-24 00:00:00");
    }

    #[test]
    fn test_parse_invalid_date() {
        assert_eq!(
            parse_with_settings("2023-02-29", None, &Settings::default()).unwrap(),
            None
        );
    }

    #[test]
    fn test_unknown_locale() {
        assert!(matches!(
            parse_with_settings("2024-01-01", Some("xx"), &Settings::default()),
            Err(ValidatorsError::LocaleNotFound(_))
        ));
    }
}
