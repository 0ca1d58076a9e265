use std::path::Path;
use std::process::ExitCode;

use validators_rs_cli::command::{CommandRegistry, SETTINGS_ARG};
use validators_rs_cli::commands::register_builtin_commands;
use validators_rs_cli::load_settings;
use validators_rs_core::logging::setup_logging;

#[tokio::main]
async fn main() -> ExitCode {
    let mut registry = CommandRegistry::new();
    register_builtin_commands(&mut registry);
    let matches = registry.build_cli().get_matches();

    let settings_path = matches.get_one::<String>(SETTINGS_ARG).map(Path::new);
    let settings = match load_settings(settings_path) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(2);
        }
    };
    setup_logging(&settings);

    match registry.execute(&matches, &settings).await {
        Ok(status) => status.exit_code(),
        Err(e) => {
            tracing::error!(error = %e, "command failed");
            eprintln!("error: {e}");
            ExitCode::from(2)
        }
    }
}
