//! Plugin identity and bootstrap bookkeeping records.
//!
//! A [`PluginRecord`] is owned by the loader and mutated by validators and
//! hooks as a plugin moves through the bootstrap sequence. The immutable
//! identity half is grouped in [`PluginMetadata`].

use crate::error::PluginError;

/// Identity of a plugin as registered with the loader.
///
/// # Example
///
/// ```rust,ignore
/// use kiln_plugins::PluginMetadata;
///
/// let meta = PluginMetadata::new("virtual_bed", "1.2.0").bundled();
/// assert!(meta.is_bundled());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginMetadata {
    identifier: String,
    version: String,
    bundled: bool,
}

impl PluginMetadata {
    /// Creates metadata for a user-installed plugin.
    #[must_use]
    pub fn new(identifier: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            version: version.into(),
            bundled: false,
        }
    }

    /// Marks the plugin as shipped with the host itself.
    #[must_use]
    pub const fn bundled(mut self) -> Self {
        self.bundled = true;
        self
    }

    /// Returns the unique plugin identifier.
    #[must_use]
    pub const fn identifier(&self) -> &str {
        self.identifier.as_str()
    }

    /// Returns the plugin version.
    #[must_use]
    pub const fn version(&self) -> &str {
        self.version.as_str()
    }

    /// Returns `true` when the plugin ships with the host.
    #[must_use]
    pub const fn is_bundled(&self) -> bool {
        self.bundled
    }

    /// Validates the metadata, returning an error if it is malformed.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::InvalidIdentifier`] when the identifier is
    /// empty or contains whitespace.
    pub fn validate(&self) -> Result<(), PluginError> {
        if self.identifier.trim().is_empty() {
            return Err(PluginError::InvalidIdentifier {
                message: String::from("plugin identifier must not be empty"),
            });
        }
        if self.identifier.chars().any(char::is_whitespace) {
            return Err(PluginError::InvalidIdentifier {
                message: format!(
                    "plugin identifier '{}' must not contain whitespace",
                    self.identifier
                ),
            });
        }
        Ok(())
    }
}

/// Mutable bootstrap state of a registered plugin.
///
/// The safe-mode flags are written by the
/// [`SafeModeValidator`](crate::safe_mode::SafeModeValidator) and read by
/// status surfaces after bootstrap; `needs_restart` is raised once a
/// settings overlay is found, because enabling or disabling such a plugin
/// later requires a restart to re-resolve coordination state cleanly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginRecord {
    metadata: PluginMetadata,
    safe_mode_victim: bool,
    safe_mode_enabled: bool,
    needs_restart: bool,
    enabled: bool,
}

impl PluginRecord {
    /// Creates a record with all bootstrap flags cleared.
    #[must_use]
    pub const fn new(metadata: PluginMetadata) -> Self {
        Self {
            metadata,
            safe_mode_victim: false,
            safe_mode_enabled: false,
            needs_restart: false,
            enabled: false,
        }
    }

    /// Returns the unique plugin identifier.
    #[must_use]
    pub const fn identifier(&self) -> &str {
        self.metadata.identifier()
    }

    /// Returns the plugin version.
    #[must_use]
    pub const fn version(&self) -> &str {
        self.metadata.version()
    }

    /// Returns `true` when the plugin ships with the host.
    #[must_use]
    pub const fn is_bundled(&self) -> bool {
        self.metadata.is_bundled()
    }

    /// Returns `true` when safe mode prevented this plugin from loading
    /// normally.
    #[must_use]
    pub const fn safe_mode_victim(&self) -> bool {
        self.safe_mode_victim
    }

    /// Sets the safe-mode victim flag.
    pub const fn set_safe_mode_victim(&mut self, value: bool) {
        self.safe_mode_victim = value;
    }

    /// Returns `true` when safe mode vetoed this plugin's enable this run.
    #[must_use]
    pub const fn safe_mode_enabled(&self) -> bool {
        self.safe_mode_enabled
    }

    /// Sets the safe-mode enable-veto flag.
    pub const fn set_safe_mode_enabled(&mut self, value: bool) {
        self.safe_mode_enabled = value;
    }

    /// Returns `true` when toggling this plugin requires a host restart.
    #[must_use]
    pub const fn needs_restart(&self) -> bool {
        self.needs_restart
    }

    /// Sets the restart-required flag.
    pub const fn set_needs_restart(&mut self, value: bool) {
        self.needs_restart = value;
    }

    /// Returns `true` once the plugin has been enabled this run.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Marks the plugin as enabled.
    pub const fn set_enabled(&mut self, value: bool) {
        self.enabled = value;
    }
}

#[cfg(test)]
mod tests;
