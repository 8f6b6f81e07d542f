//! Structured telemetry initialisation for the daemon.

use std::io::{self, IsTerminal};

use once_cell::sync::OnceCell;
use tracing::{Subscriber, subscriber::SetGlobalDefaultError};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;

use kiln_config::{LogFormat, Settings};

static TELEMETRY_GUARD: OnceCell<()> = OnceCell::new();

/// Handle returned when telemetry has been initialised.
#[derive(Debug, Default, Clone, Copy)]
pub struct TelemetryHandle;

/// Errors encountered while configuring telemetry.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// Failed to parse the configured log filter expression.
    #[error("invalid log filter: {0}")]
    Filter(String),
    /// Failed to install the tracing subscriber.
    #[error("failed to install telemetry subscriber: {0}")]
    Subscriber(SetGlobalDefaultError),
}

/// Configures the global tracing subscriber when invoked for the first
/// time.
///
/// The filter expression comes from the `logging.filter` setting and is
/// widened by the debug flag and verbosity count. Repeated calls are
/// idempotent: the first invocation installs the global subscriber and
/// later ones return a fresh [`TelemetryHandle`] without touching global
/// state again.
///
/// # Errors
///
/// Returns [`TelemetryError`] when the filter expression does not parse or
/// the subscriber cannot be installed.
pub fn initialise(
    settings: &Settings,
    debug: bool,
    verbosity: u8,
) -> Result<TelemetryHandle, TelemetryError> {
    TELEMETRY_GUARD
        .get_or_try_init(|| install_subscriber(settings, debug, verbosity))
        .map(|()| TelemetryHandle)
}

fn effective_filter(settings: &Settings, debug: bool, verbosity: u8) -> String {
    if verbosity > 1 {
        String::from("debug")
    } else if debug || verbosity > 0 {
        String::from("kiln=debug,info")
    } else {
        settings.log_filter()
    }
}

fn install_subscriber(
    settings: &Settings,
    debug: bool,
    verbosity: u8,
) -> Result<(), TelemetryError> {
    let filter = EnvFilter::try_new(effective_filter(settings, debug, verbosity))
        .map_err(|error| TelemetryError::Filter(error.to_string()))?;

    let builder = |filter: EnvFilter| {
        fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_target(true)
            .with_level(true)
            .with_thread_ids(false)
            .with_thread_names(false)
            .with_writer(io::stderr)
            // Avoid stray colour codes in non-TTY sinks while keeping colour on
            // interactive terminals.
            .with_ansi(io::stderr().is_terminal())
            // Add a timestamp so operators can correlate host activity.
            .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
    };

    let subscriber: Box<dyn Subscriber + Send + Sync> = match settings.log_format() {
        LogFormat::Json => {
            let json_builder = builder(filter).json();
            let json = json_builder.flatten_event(true).finish();
            Box::new(json)
        }
        LogFormat::Compact => Box::new(builder(filter).compact().finish()),
    };

    tracing::subscriber::set_global_default(subscriber).map_err(TelemetryError::Subscriber)
}

#[cfg(test)]
mod tests {
    use camino::Utf8PathBuf;
    use tempfile::TempDir;

    use super::*;

    fn settings() -> Settings {
        let dir = TempDir::new().expect("create temp dir");
        let base = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 temp dir");
        Settings::open(Some(base), None).expect("open settings")
    }

    #[test]
    fn filter_widens_with_debug_and_verbosity() {
        let settings = settings();
        assert_eq!(effective_filter(&settings, false, 0), "kiln=info");
        assert_eq!(effective_filter(&settings, true, 0), "kiln=debug,info");
        assert_eq!(effective_filter(&settings, false, 2), "debug");
    }

    #[test]
    fn initialise_is_idempotent() {
        let settings = settings();
        let first = initialise(&settings, false, 0).expect("first install");
        let second = initialise(&settings, true, 3).expect("repeat install");
        drop(first);
        drop(second);
    }
}
