//! The plugin contract and the settings-overlay capability.
//!
//! Plugins implement [`Plugin`]; those that contribute a settings overlay
//! additionally implement [`SettingsOverlayProvider`] and surface it via
//! [`Plugin::overlay_provider`]. Capability detection is a plain interface
//! check: most plugins have no overlay and the default implementation
//! returns `None`, which the hooks treat as the normal case.

use serde_yaml::Value;

/// A settings overlay contributed by a plugin, with an optional resolution
/// order key.
///
/// The definition is a raw YAML tree; the settings store normalises it at
/// load time. Directives without an explicit order resolve after all
/// ordered directives, in lexicographic source order.
///
/// # Example
///
/// ```rust,ignore
/// use kiln_plugins::OverlayDeclaration;
///
/// let raw: serde_yaml::Value =
///     serde_yaml::from_str("feature:\n  x: 1\n").expect("valid yaml");
/// let declaration = OverlayDeclaration::new(raw).with_order(10);
/// assert_eq!(declaration.order(), Some(10));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayDeclaration {
    definition: Value,
    order: Option<i64>,
}

impl OverlayDeclaration {
    /// Creates a declaration without an explicit order key.
    #[must_use]
    pub const fn new(definition: Value) -> Self {
        Self {
            definition,
            order: None,
        }
    }

    /// Attaches an explicit resolution order key.
    #[must_use]
    pub const fn with_order(mut self, order: i64) -> Self {
        self.order = Some(order);
        self
    }

    /// Returns the raw overlay definition.
    #[must_use]
    pub const fn definition(&self) -> &Value {
        &self.definition
    }

    /// Returns the order key, if one was declared.
    #[must_use]
    pub const fn order(&self) -> Option<i64> {
        self.order
    }
}

/// Capability of a plugin that contributes a settings overlay at load
/// time.
pub trait SettingsOverlayProvider {
    /// Returns the overlay this plugin wants layered into global settings.
    fn settings_overlay(&self) -> OverlayDeclaration;
}

/// Contract implemented by every loadable plugin.
///
/// The bootstrap subsystem only needs the optional overlay capability;
/// everything else a plugin does happens behind interfaces outside this
/// crate's scope.
pub trait Plugin {
    /// Returns the settings-overlay capability, when the plugin has one.
    ///
    /// The default implementation declares no overlay.
    fn overlay_provider(&self) -> Option<&dyn SettingsOverlayProvider> {
        None
    }
}
