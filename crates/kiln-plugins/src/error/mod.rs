//! Domain errors raised by plugin bootstrap operations.
//!
//! All errors use `thiserror`-derived enums with structured context.
//! Overlay failures wrap the underlying [`SettingsError`] so the bootstrap
//! sequence can report which plugin broke startup.

use kiln_config::SettingsError;
use thiserror::Error;

/// Errors arising from plugin registration and bootstrap.
#[derive(Debug, Error)]
pub enum PluginError {
    /// A plugin with the same identifier is already registered.
    #[error("plugin '{name}' is already registered")]
    Duplicate {
        /// Identifier that collided.
        name: String,
    },

    /// A plugin declared a settings overlay that could not be normalised.
    ///
    /// This is fatal for startup: a broken overlay definition aborts the
    /// whole bootstrap rather than being downgraded.
    #[error("settings overlay from plugin '{name}' is invalid: {source}")]
    Overlay {
        /// Identifier of the declaring plugin.
        name: String,
        /// Underlying settings failure.
        #[source]
        source: SettingsError,
    },

    /// A plugin identifier failed validation at registration time.
    #[error("invalid plugin identifier: {message}")]
    InvalidIdentifier {
        /// Description of the validation failure.
        message: String,
    },
}
