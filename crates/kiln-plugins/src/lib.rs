//! Plugin bootstrap coordination for the Kiln host.
//!
//! The crate implements the coordination logic that runs between plugin
//! discovery and the host starting to serve: it gates which plugins may
//! enable when the host runs in safe mode, collects the settings overlays
//! plugins declare at load time, resolves the cross-plugin disable
//! directives those overlays may carry, and applies each plugin's overlay
//! into the live settings exactly once, at the moment the plugin enables.
//!
//! # Architecture
//!
//! The external loading mechanics (folder scanning, instantiation) are the
//! concern of whoever drives the [`PluginLoader`]; this crate owns the
//! callback bodies. The loader fires a fixed synchronous sequence on the
//! bootstrap thread: per plugin the `after_load` validators and the
//! `plugin_loaded` hook, then `plugins_loaded` once, then per enabling
//! plugin the `before_enable` validators and the `plugin_enabled` hook.
//! All coordination state lives in [`BootstrapHooks`], which is threaded
//! through the sequence and discarded when bootstrap completes.
//!
//! Disable directives are resolved deterministically: directives carrying
//! an explicit order key run first (in key order), the rest follow in
//! lexicographic source order, so the outcome never depends on discovery
//! order.

pub mod disabled;
pub mod error;
pub mod hooks;
pub mod loader;
pub mod plugin;
pub mod record;
pub mod safe_mode;

#[cfg(test)]
mod tests;

pub use self::disabled::DisabledSet;
pub use self::error::PluginError;
pub use self::hooks::{BootstrapHooks, BootstrapObserver};
pub use self::loader::PluginLoader;
pub use self::plugin::{OverlayDeclaration, Plugin, SettingsOverlayProvider};
pub use self::record::{PluginMetadata, PluginRecord};
pub use self::safe_mode::{EnableValidator, SafeModeValidator, ValidationPhase};
