//! The layered settings store.
//!
//! [`Settings`] owns the precedence stack described in the crate docs and
//! exposes typed key-path reads, runtime writes, and the overlay operations
//! used by the plugin bootstrap subsystem: [`Settings::load_overlay`]
//! normalises a raw overlay definition and [`Settings::add_overlay`]
//! appends it as a precedence layer.

use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use serde_yaml::Value;
use tracing::debug;

use crate::error::SettingsError;
use crate::folders::FolderKind;
use crate::keys;
use crate::logging::LogFormat;
use crate::overlay::OverlayMap;

/// File name of the host configuration document inside the base directory.
pub const CONFIG_FILE: &str = "config.yaml";

/// Directory under the user's home holding host state by default.
pub const DEFAULT_BASEDIR_NAME: &str = ".kiln";

/// Default log filter expression used when settings do not override it.
pub const DEFAULT_LOG_FILTER: &str = "kiln=info";

/// Built-in lowest-precedence settings layer.
const DEFAULT_SETTINGS: &str = r"
server:
  host: 0.0.0.0
  port: 5000
  start_once_in_safe_mode: false
logging:
  filter: kiln=info
  format: compact
plugins:
  _disabled: []
";

/// Layered key/value configuration store.
///
/// # Example
///
/// ```rust,ignore
/// use kiln_config::Settings;
///
/// let settings = Settings::open(None, None)?;
/// let port = settings.get(&["server", "port"]);
/// ```
#[derive(Debug, Clone)]
pub struct Settings {
    basedir: Utf8PathBuf,
    config_path: Utf8PathBuf,
    defaults: OverlayMap,
    config: OverlayMap,
    overlays: Vec<OverlayMap>,
    runtime: OverlayMap,
}

impl Settings {
    /// Opens the settings store.
    ///
    /// The base directory defaults to `~/.kiln` when not given; the
    /// configuration file defaults to `config.yaml` inside the base
    /// directory. A missing configuration file is not an error and yields
    /// an empty file layer.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Io`] when the configuration file exists but
    /// cannot be read, [`SettingsError::InvalidYaml`] when it is malformed,
    /// and [`SettingsError::NotAMapping`] when its root is not a mapping.
    pub fn open(
        basedir: Option<Utf8PathBuf>,
        configfile: Option<Utf8PathBuf>,
    ) -> Result<Self, SettingsError> {
        let base = match basedir {
            Some(dir) => dir,
            None => default_basedir()?,
        };
        let config_path = configfile.unwrap_or_else(|| base.join(CONFIG_FILE));

        let defaults = parse_document(DEFAULT_SETTINGS, Utf8Path::new("<built-in>"))?;
        let config = if config_path.is_file() {
            let raw = fs::read_to_string(&config_path).map_err(|source| SettingsError::Io {
                path: config_path.clone(),
                source,
            })?;
            parse_document(&raw, &config_path)?
        } else {
            debug!(path = %config_path, "no configuration file, using defaults");
            OverlayMap::new()
        };

        Ok(Self {
            basedir: base,
            config_path,
            defaults,
            config,
            overlays: Vec::new(),
            runtime: OverlayMap::new(),
        })
    }

    /// Returns the resolved base directory.
    #[must_use]
    pub fn basedir(&self) -> &Utf8Path {
        self.basedir.as_path()
    }

    /// Returns the path of the configuration file, whether or not it
    /// exists.
    #[must_use]
    pub fn config_path(&self) -> &Utf8Path {
        self.config_path.as_path()
    }

    /// Looks up a key path, walking the layers from highest precedence to
    /// lowest.
    #[must_use]
    pub fn get(&self, path: &[&str]) -> Option<&Value> {
        if let Some(value) = self.runtime.get_path(path) {
            return Some(value);
        }
        for overlay in self.overlays.iter().rev() {
            if let Some(value) = overlay.get_path(path) {
                return Some(value);
            }
        }
        self.config
            .get_path(path)
            .or_else(|| self.defaults.get_path(path))
    }

    /// Reads a boolean at a key path.
    #[must_use]
    pub fn get_bool(&self, path: &[&str]) -> Option<bool> {
        self.get(path).and_then(Value::as_bool)
    }

    /// Reads a string at a key path.
    #[must_use]
    pub fn get_str(&self, path: &[&str]) -> Option<&str> {
        self.get(path).and_then(Value::as_str)
    }

    /// Reads a sequence of strings at a key path.
    ///
    /// Non-string sequence elements are skipped.
    #[must_use]
    pub fn get_string_list(&self, path: &[&str]) -> Option<Vec<String>> {
        let sequence = self.get(path)?.as_sequence()?;
        Some(
            sequence
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_owned)
                .collect(),
        )
    }

    /// Writes a value into the runtime layer, shadowing every other layer.
    pub fn set(&mut self, path: &[&str], value: Value) {
        self.runtime.set_path(path, value);
    }

    /// Normalises a raw overlay definition into an [`OverlayMap`].
    ///
    /// The overlay is not added to the layering; callers decide if and when
    /// to call [`Settings::add_overlay`].
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidOverlay`] when the definition root
    /// is not a mapping.
    pub fn load_overlay(&self, raw: &Value) -> Result<OverlayMap, SettingsError> {
        OverlayMap::from_value(raw.clone())
    }

    /// Appends an overlay as a new precedence layer above all previously
    /// added overlays.
    pub fn add_overlay(&mut self, overlay: OverlayMap) {
        self.overlays.push(overlay);
    }

    /// Number of overlay layers currently applied.
    #[must_use]
    pub fn overlay_count(&self) -> usize {
        self.overlays.len()
    }

    /// Produces a single tree with all layers merged, lowest precedence
    /// first.
    #[must_use]
    pub fn effective(&self) -> OverlayMap {
        let mut merged = self.defaults.clone();
        merged.merge_from(&self.config);
        for overlay in &self.overlays {
            merged.merge_from(overlay);
        }
        merged.merge_from(&self.runtime);
        merged
    }

    /// Resolves a well-known folder path.
    ///
    /// An explicit `folders.<name>` setting wins; otherwise the folder
    /// lives directly under the base directory.
    #[must_use]
    pub fn base_folder(&self, kind: FolderKind) -> Utf8PathBuf {
        self.get_str(&["folders", kind.key()])
            .map_or_else(|| self.basedir.join(kind.key()), Utf8PathBuf::from)
    }

    /// Resolves a well-known folder path and creates the directory.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Io`] when the directory cannot be created.
    pub fn ensure_base_folder(&self, kind: FolderKind) -> Result<Utf8PathBuf, SettingsError> {
        let folder = self.base_folder(kind);
        fs::create_dir_all(&folder).map_err(|source| SettingsError::Io {
            path: folder.clone(),
            source,
        })?;
        Ok(folder)
    }

    /// Returns the configured log filter expression.
    #[must_use]
    pub fn log_filter(&self) -> String {
        self.get_str(keys::LOG_FILTER_PATH)
            .unwrap_or(DEFAULT_LOG_FILTER)
            .to_owned()
    }

    /// Returns the configured log format, falling back to the default on
    /// unknown values.
    #[must_use]
    pub fn log_format(&self) -> LogFormat {
        self.get_str(keys::LOG_FORMAT_PATH)
            .and_then(|raw| raw.parse().ok())
            .unwrap_or_default()
    }
}

fn parse_document(raw: &str, path: &Utf8Path) -> Result<OverlayMap, SettingsError> {
    let value: Value = serde_yaml::from_str(raw)
        .map_err(|source| SettingsError::invalid_yaml(path.to_owned(), &source))?;
    match value {
        Value::Mapping(mapping) => Ok(OverlayMap::from(mapping)),
        Value::Null => Ok(OverlayMap::new()),
        _ => Err(SettingsError::NotAMapping {
            path: path.to_owned(),
        }),
    }
}

fn default_basedir() -> Result<Utf8PathBuf, SettingsError> {
    let home = dirs::home_dir().unwrap_or_else(std::env::temp_dir);
    let candidate = home.join(DEFAULT_BASEDIR_NAME);
    Utf8PathBuf::from_path_buf(candidate).map_err(|path| SettingsError::NonUtf8BaseDir {
        path: path.display().to_string(),
    })
}
