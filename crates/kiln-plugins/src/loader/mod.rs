//! The plugin loader driving the bootstrap sequence.
//!
//! Discovery and instantiation happen elsewhere; callers register already
//! constructed plugin instances and then run [`PluginLoader::load_all`],
//! which fires the fixed synchronous sequence: per plugin the `after_load`
//! validators and `plugin_loaded` hook, then `plugins_loaded` once, then
//! per surviving plugin the `before_enable` validators and the
//! `plugin_enabled` hook. Validators and observers are attached before the
//! run and fire in registration order.

use kiln_config::Settings;
use tracing::debug;

use crate::disabled::DisabledSet;
use crate::error::PluginError;
use crate::hooks::BootstrapObserver;
use crate::plugin::Plugin;
use crate::record::{PluginMetadata, PluginRecord};
use crate::safe_mode::{EnableValidator, ValidationPhase};

struct RegisteredPlugin {
    record: PluginRecord,
    instance: Box<dyn Plugin>,
    loaded: bool,
}

/// Owns registered plugins, the shared disabled list, and the bootstrap
/// listeners, and drives the load/enable sequence.
///
/// # Example
///
/// ```rust,ignore
/// use kiln_plugins::{BootstrapHooks, PluginLoader, PluginMetadata};
///
/// let mut loader = PluginLoader::new(DisabledSet::new());
/// loader.add_observer(Box::new(BootstrapHooks::new()));
/// loader.register(PluginMetadata::new("themer", "1.0"), Box::new(my_plugin))?;
/// loader.load_all(&mut settings, true)?;
/// ```
#[derive(Default)]
pub struct PluginLoader {
    plugins: Vec<RegisteredPlugin>,
    disabled: DisabledSet,
    validators: Vec<Box<dyn EnableValidator>>,
    observers: Vec<Box<dyn BootstrapObserver>>,
}

impl PluginLoader {
    /// Creates a loader with a pre-seeded disabled list (typically read
    /// from the `plugins._disabled` setting).
    #[must_use]
    pub fn new(disabled: DisabledSet) -> Self {
        Self {
            plugins: Vec::new(),
            disabled,
            validators: Vec::new(),
            observers: Vec::new(),
        }
    }

    /// Attaches an enable validator; validators fire in attachment order.
    pub fn add_validator(&mut self, validator: Box<dyn EnableValidator>) {
        self.validators.push(validator);
    }

    /// Attaches a bootstrap listener; listeners fire in attachment order.
    pub fn add_observer(&mut self, observer: Box<dyn BootstrapObserver>) {
        self.observers.push(observer);
    }

    /// Registers a constructed plugin instance under its metadata.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::InvalidIdentifier`] when the metadata fails
    /// validation and [`PluginError::Duplicate`] when the identifier is
    /// already registered.
    pub fn register(
        &mut self,
        metadata: PluginMetadata,
        instance: Box<dyn Plugin>,
    ) -> Result<(), PluginError> {
        metadata.validate()?;
        if self
            .plugins
            .iter()
            .any(|entry| entry.record.identifier() == metadata.identifier())
        {
            return Err(PluginError::Duplicate {
                name: metadata.identifier().to_owned(),
            });
        }
        self.plugins.push(RegisteredPlugin {
            record: PluginRecord::new(metadata),
            instance,
            loaded: false,
        });
        Ok(())
    }

    /// Runs the full bootstrap sequence over all registered plugins.
    ///
    /// `startup` gates disable-directive resolution; the initial bootstrap
    /// passes `true`, re-entrant reloads pass `false`.
    ///
    /// # Errors
    ///
    /// Propagates the first [`PluginError`] raised by a `plugin_loaded`
    /// listener; a broken plugin contribution aborts the whole run.
    pub fn load_all(&mut self, settings: &mut Settings, startup: bool) -> Result<(), PluginError> {
        // Load phase: after_load validators, then the plugin_loaded hook.
        for entry in &mut self.plugins {
            let permitted = self
                .validators
                .iter()
                .all(|validator| validator.validate(ValidationPhase::AfterLoad, &mut entry.record));
            if !permitted {
                debug!(
                    plugin = entry.record.identifier(),
                    "plugin rejected at after_load"
                );
                continue;
            }
            entry.loaded = true;
            for observer in &mut self.observers {
                observer.on_plugin_loaded(settings, &mut entry.record, entry.instance.as_ref())?;
            }
        }

        // Resolution: fires exactly once per run, after every load.
        for observer in &mut self.observers {
            observer.on_plugins_loaded(startup, &mut self.disabled);
        }

        // Enable phase: skip disabled plugins, consult before_enable
        // validators, then fire plugin_enabled for the survivors.
        for entry in &mut self.plugins {
            if !entry.loaded || entry.record.is_enabled() {
                continue;
            }
            if self.disabled.contains(entry.record.identifier()) {
                debug!(
                    plugin = entry.record.identifier(),
                    "plugin disabled, not enabling"
                );
                continue;
            }
            let permitted = self.validators.iter().all(|validator| {
                validator.validate(ValidationPhase::BeforeEnable, &mut entry.record)
            });
            if !permitted {
                debug!(
                    plugin = entry.record.identifier(),
                    "plugin vetoed at before_enable"
                );
                continue;
            }
            entry.record.set_enabled(true);
            for observer in &mut self.observers {
                observer.on_plugin_enabled(settings, &entry.record);
            }
        }

        Ok(())
    }

    /// Looks up a plugin record by identifier.
    #[must_use]
    pub fn record(&self, identifier: &str) -> Option<&PluginRecord> {
        self.plugins
            .iter()
            .map(|entry| &entry.record)
            .find(|record| record.identifier() == identifier)
    }

    /// Iterates all plugin records in registration order.
    pub fn records(&self) -> impl Iterator<Item = &PluginRecord> {
        self.plugins.iter().map(|entry| &entry.record)
    }

    /// Returns the shared disabled-plugin list.
    #[must_use]
    pub const fn disabled(&self) -> &DisabledSet {
        &self.disabled
    }

    /// Number of registered plugins.
    #[must_use]
    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    /// Returns `true` when no plugins are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}

impl std::fmt::Debug for PluginLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginLoader")
            .field("plugins", &self.plugins.len())
            .field("disabled", &self.disabled)
            .field("validators", &self.validators.len())
            .field("observers", &self.observers.len())
            .finish()
    }
}
