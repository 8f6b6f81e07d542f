//! Host bootstrap orchestration.

use thiserror::Error;
use tracing::info;

use kiln_config::{Settings, SettingsError, keys};
use kiln_plugins::{
    BootstrapHooks, DisabledSet, Plugin, PluginError, PluginLoader, PluginMetadata,
    SafeModeValidator,
};

use crate::cli::Cli;
use crate::telemetry::{self, TelemetryError, TelemetryHandle};

/// Errors surfaced during bootstrap.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// The settings store failed to open.
    #[error("failed to load settings: {source}")]
    Settings {
        /// Underlying settings failure.
        #[source]
        source: SettingsError,
    },
    /// Telemetry initialisation failed.
    #[error("failed to initialise telemetry: {source}")]
    Telemetry {
        /// Underlying telemetry error.
        #[source]
        source: TelemetryError,
    },
    /// Plugin registration or bootstrap failed.
    #[error("plugin bootstrap failed: {source}")]
    Plugin {
        /// Underlying plugin failure.
        #[source]
        source: PluginError,
    },
}

/// Result of a successful bootstrap invocation.
#[derive(Debug)]
pub struct Host {
    settings: Settings,
    loader: PluginLoader,
    safe_mode: bool,
    telemetry: TelemetryHandle,
}

impl Host {
    /// Accessor for the resolved settings store.
    #[must_use]
    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Accessor for the plugin loader and its records.
    #[must_use]
    pub const fn loader(&self) -> &PluginLoader {
        &self.loader
    }

    /// Returns `true` when this run started in safe mode.
    #[must_use]
    pub const fn safe_mode(&self) -> bool {
        self.safe_mode
    }

    /// Accessor for the telemetry handle, primarily useful for testing.
    #[must_use]
    pub const fn telemetry(&self) -> TelemetryHandle {
        self.telemetry
    }
}

/// Bootstraps the host with the supplied plugin instances.
///
/// The sequence is fixed: open settings, install telemetry, resolve the
/// safe-mode flag (command line OR the `server.start_once_in_safe_mode`
/// setting), seed the disabled list from settings, then run the plugin
/// bootstrap with the coordination hooks attached.
///
/// # Errors
///
/// Returns a [`BootstrapError`] naming the stage that failed; any failure
/// aborts startup entirely.
pub fn bootstrap_with(
    cli: &Cli,
    plugins: Vec<(PluginMetadata, Box<dyn Plugin>)>,
) -> Result<Host, BootstrapError> {
    let mut settings = Settings::open(cli.basedir.clone(), cli.config.clone())
        .map_err(|source| BootstrapError::Settings { source })?;

    let telemetry = telemetry::initialise(&settings, cli.debug, cli.verbose)
        .map_err(|source| BootstrapError::Telemetry { source })?;

    let settings_safe_mode = settings.get_bool(keys::SAFE_MODE_ONCE_PATH).unwrap_or(false);
    let safe_mode = cli.safe_mode || settings_safe_mode;
    if safe_mode {
        info!("starting in safe mode, only bundled plugins will enable");
    }

    let disabled: DisabledSet = settings
        .get_string_list(keys::DISABLED_PATH)
        .unwrap_or_default()
        .into_iter()
        .collect();

    let mut loader = PluginLoader::new(disabled);
    if safe_mode {
        loader.add_validator(Box::new(SafeModeValidator));
    }
    loader.add_observer(Box::new(BootstrapHooks::new()));

    for (metadata, instance) in plugins {
        loader
            .register(metadata, instance)
            .map_err(|source| BootstrapError::Plugin { source })?;
    }

    loader
        .load_all(&mut settings, true)
        .map_err(|source| BootstrapError::Plugin { source })?;

    let enabled = loader.records().filter(|record| record.is_enabled()).count();
    info!(
        plugins = loader.len(),
        enabled,
        disabled = loader.disabled().len(),
        safe_mode,
        "plugin bootstrap complete"
    );

    Ok(Host {
        settings,
        loader,
        safe_mode,
        telemetry,
    })
}

#[cfg(test)]
mod tests {
    use camino::Utf8PathBuf;
    use tempfile::TempDir;

    use super::*;

    struct PlainPlugin;

    impl Plugin for PlainPlugin {}

    fn cli_in(dir: &TempDir, config: Option<&str>, safe_mode: bool) -> Cli {
        let base = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 temp dir");
        if let Some(yaml) = config {
            std::fs::write(base.join("config.yaml"), yaml).expect("write config");
        }
        Cli {
            basedir: Some(base),
            safe_mode,
            ..Cli::default()
        }
    }

    #[test]
    fn bootstrap_with_no_plugins_succeeds() {
        let dir = TempDir::new().expect("create temp dir");
        let host = bootstrap_with(&cli_in(&dir, None, false), Vec::new()).expect("bootstrap");
        assert!(!host.safe_mode());
        assert!(host.loader().is_empty());
    }

    #[test]
    fn settings_flag_requests_safe_mode() {
        let dir = TempDir::new().expect("create temp dir");
        let cli = cli_in(
            &dir,
            Some("server:\n  start_once_in_safe_mode: true\n"),
            false,
        );
        let plugins: Vec<(PluginMetadata, Box<dyn Plugin>)> = vec![
            (
                PluginMetadata::new("core_ui", "1.0").bundled(),
                Box::new(PlainPlugin),
            ),
            (PluginMetadata::new("themer", "1.0"), Box::new(PlainPlugin)),
        ];
        let host = bootstrap_with(&cli, plugins).expect("bootstrap");
        assert!(host.safe_mode());
        assert!(host.loader().record("core_ui").expect("record").is_enabled());
        assert!(!host.loader().record("themer").expect("record").is_enabled());
    }

    #[test]
    fn disabled_list_seeds_from_settings() {
        let dir = TempDir::new().expect("create temp dir");
        let cli = cli_in(&dir, Some("plugins:\n  _disabled:\n    - themer\n"), false);
        let plugins: Vec<(PluginMetadata, Box<dyn Plugin>)> =
            vec![(PluginMetadata::new("themer", "1.0"), Box::new(PlainPlugin))];
        let host = bootstrap_with(&cli, plugins).expect("bootstrap");
        assert!(host.loader().disabled().contains("themer"));
        assert!(!host.loader().record("themer").expect("record").is_enabled());
    }

    #[test]
    fn malformed_settings_abort_startup() {
        let dir = TempDir::new().expect("create temp dir");
        let cli = cli_in(&dir, Some("a:\n- b\n c: d\n"), false);
        let error = bootstrap_with(&cli, Vec::new()).expect_err("bootstrap must fail");
        assert!(matches!(error, BootstrapError::Settings { .. }));
    }
}
