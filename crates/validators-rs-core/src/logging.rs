//! Logging integration for validators-rs.
//!
//! Provides helpers for configuring [`tracing`]-based logging from
//! [`Settings`](crate::settings::Settings) and for creating per-run spans.

use crate::settings::Settings;

/// Sets up the global tracing subscriber based on the given settings.
///
/// The filter is read from `settings.log_level` (e.g. "debug", "info",
/// "validators_rs_forms=trace"). In debug mode a pretty, human-readable
/// format is used; otherwise a structured JSON format is used. Installing a
/// subscriber when one is already set is a no-op.
pub fn setup_logging(settings: &Settings) {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_new(&settings.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    if settings.debug {
        fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_target(true)
            .with_thread_ids(false)
            .with_file(true)
            .with_line_number(true)
            .pretty()
            .try_init()
            .ok();
    } else {
        fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_target(true)
            .json()
            .try_init()
            .ok();
    }
}

/// Creates a tracing span for one validation run.
///
/// # Examples
///
/// ```
/// use validators_rs_core::logging::run_span;
///
/// let span = run_span(Some("billing"), false);
/// let _guard = span.enter();
/// tracing::info!("validating");
/// ```
pub fn run_span(group: Option<&str>, asynchronous: bool) -> tracing::Span {
    tracing::info_span!(
        "validation_run",
        group = group.unwrap_or(""),
        asynchronous
    )
}
