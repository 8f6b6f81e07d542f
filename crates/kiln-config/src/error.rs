//! Domain errors raised by the settings store.
//!
//! All errors use `thiserror`-derived enums with structured context so the
//! bootstrap sequence can report precisely what went wrong. YAML parse
//! failures carry the source location when the parser provides one.

use camino::Utf8PathBuf;

use thiserror::Error;

/// Errors arising from settings operations.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The settings file could not be read or a folder could not be created.
    #[error("I/O error for '{path}': {source}")]
    Io {
        /// Path that was being accessed.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The settings file is not valid YAML.
    #[error("configuration file '{path}' is not valid YAML: {message}")]
    InvalidYaml {
        /// Path to the offending document.
        path: Utf8PathBuf,
        /// Parser diagnostic.
        message: String,
        /// One-based line of the parse error, when known.
        line: Option<usize>,
        /// One-based column of the parse error, when known.
        column: Option<usize>,
    },

    /// The settings document root is not a mapping.
    #[error("configuration file '{path}' must contain a mapping at the root")]
    NotAMapping {
        /// Path to the offending document.
        path: Utf8PathBuf,
    },

    /// An overlay definition could not be normalised.
    #[error("invalid settings overlay: {message}")]
    InvalidOverlay {
        /// Description of the normalisation failure.
        message: String,
    },

    /// The base directory is not representable as UTF-8.
    #[error("base directory '{path}' is not valid UTF-8")]
    NonUtf8BaseDir {
        /// Lossy rendering of the path.
        path: String,
    },
}

impl SettingsError {
    /// Builds an [`SettingsError::InvalidYaml`] from a parser error.
    #[must_use]
    pub fn invalid_yaml(path: Utf8PathBuf, source: &serde_yaml::Error) -> Self {
        let location = source.location();
        Self::InvalidYaml {
            path,
            message: source.to_string(),
            line: location.as_ref().map(serde_yaml::Location::line),
            column: location.as_ref().map(serde_yaml::Location::column),
        }
    }
}
