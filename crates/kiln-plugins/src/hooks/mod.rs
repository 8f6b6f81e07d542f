//! Bootstrap hook bodies: overlay registry, disable resolver, and overlay
//! applicator.
//!
//! [`BootstrapHooks`] holds all coordination state collected while plugins
//! load and implements the three hook points the loader fires:
//!
//! - `plugin_loaded` records a declared settings overlay, stripping any
//!   cross-plugin disable directive out of it first;
//! - `plugins_loaded` resolves the collected disable directives into the
//!   shared [`DisabledSet`], once, during startup;
//! - `plugin_enabled` layers the stored overlay into live settings, at
//!   most once per plugin.
//!
//! Resolution is deterministic: directives sort by explicit order key
//! first (absent keys resolve last), then lexicographically by source
//! identifier, so two plugins fighting over a third always produce the
//! same winner regardless of discovery order.

use std::collections::HashMap;

use kiln_config::{OverlayMap, Settings, keys};
use serde_yaml::Value;
use tracing::{debug, info};

use crate::disabled::DisabledSet;
use crate::error::PluginError;
use crate::plugin::Plugin;
use crate::record::PluginRecord;

/// Identifier suffix treated as "already inert": a source whose name ends
/// with this never gets its directives applied.
const DISABLED_SUFFIX: &str = "disabled";

/// Listener interface for the loader's bootstrap hook points.
///
/// Implementations are registered with the
/// [`PluginLoader`](crate::loader::PluginLoader) at construction time and
/// fired synchronously on the bootstrap thread. Every method has a no-op
/// default so listeners only implement the hooks they care about.
pub trait BootstrapObserver {
    /// Fired immediately after a plugin instance is constructed.
    ///
    /// # Errors
    ///
    /// Returns a [`PluginError`] when the plugin's contribution is invalid;
    /// this aborts startup.
    fn on_plugin_loaded(
        &mut self,
        settings: &Settings,
        record: &mut PluginRecord,
        plugin: &dyn Plugin,
    ) -> Result<(), PluginError> {
        let _ = (settings, record, plugin);
        Ok(())
    }

    /// Fired once, after all plugins have been loaded.
    fn on_plugins_loaded(&mut self, startup: bool, disabled: &mut DisabledSet) {
        let _ = (startup, disabled);
    }

    /// Fired each time a plugin successfully transitions to enabled.
    fn on_plugin_enabled(&mut self, settings: &mut Settings, record: &PluginRecord) {
        let _ = (settings, record);
    }
}

/// A cross-plugin disable request extracted from a settings overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
struct DisableDirective {
    targets: Vec<String>,
    order: Option<i64>,
}

/// Pass-local bookkeeping for a single resolution run.
///
/// Tracks which sources have had their directives applied and which
/// targets were decided during this pass. A later, lower-priority source
/// requesting an already-decided target is logged as superseded instead
/// of silently ignored, and a source whose directives have already been
/// applied is immune to being disabled by a later directive. Discarded
/// with the pass.
#[derive(Debug, Default)]
struct ResolutionPass {
    sources: Vec<String>,
    decided_targets: Vec<String>,
}

impl ResolutionPass {
    fn source_done(&self, source: &str) -> bool {
        self.sources.iter().any(|entry| entry == source)
    }

    fn finish_source(&mut self, source: &str) {
        self.sources.push(source.to_owned());
    }

    fn target_decided(&self, target: &str) -> bool {
        self.decided_targets.iter().any(|entry| entry == target)
    }

    fn decide_target(&mut self, target: &str) {
        self.decided_targets.push(target.to_owned());
    }
}

/// Coordination state for the plugin bootstrap sequence.
///
/// Owns the overlay registry (stripped overlay per declaring plugin) and
/// the side index of disable directives. Created by the process-wide
/// initialisation routine, threaded through the hook calls, and dropped
/// once bootstrap completes.
#[derive(Debug, Default)]
pub struct BootstrapHooks {
    overlays: HashMap<String, OverlayMap>,
    directives: HashMap<String, DisableDirective>,
}

impl BootstrapHooks {
    /// Creates empty bootstrap state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` when a stored (not yet applied) overlay exists for
    /// the identifier.
    #[must_use]
    pub fn has_overlay(&self, identifier: &str) -> bool {
        self.overlays.contains_key(identifier)
    }

    /// Number of stored overlays awaiting application.
    #[must_use]
    pub fn overlay_count(&self) -> usize {
        self.overlays.len()
    }

    /// Returns the disable targets a source plugin requested, if any.
    #[must_use]
    pub fn directive_targets(&self, source: &str) -> Option<&[String]> {
        self.directives
            .get(source)
            .map(|directive| directive.targets.as_slice())
    }
}

impl BootstrapObserver for BootstrapHooks {
    /// Records the plugin's settings overlay, if it declares one.
    ///
    /// The disable-directive key path is extracted and removed before the
    /// overlay is stored: the mapping applied at enable time must not
    /// itself carry the directive. Absence of the capability is the common
    /// case and a silent no-op.
    fn on_plugin_loaded(
        &mut self,
        settings: &Settings,
        record: &mut PluginRecord,
        plugin: &dyn Plugin,
    ) -> Result<(), PluginError> {
        let Some(provider) = plugin.overlay_provider() else {
            return Ok(());
        };
        let declaration = provider.settings_overlay();

        // Toggling an overlay-bearing plugin later needs a restart to
        // re-resolve coordination state.
        record.set_needs_restart(true);

        let mut overlay =
            settings
                .load_overlay(declaration.definition())
                .map_err(|source| PluginError::Overlay {
                    name: record.identifier().to_owned(),
                    source,
                })?;

        if let Some(raw_targets) = overlay.remove_path(keys::DISABLED_PATH) {
            let targets = string_list(&raw_targets);
            self.directives.insert(
                record.identifier().to_owned(),
                DisableDirective {
                    targets,
                    order: declaration.order(),
                },
            );
        }

        debug!(plugin = record.identifier(), "found settings overlay");
        self.overlays
            .insert(record.identifier().to_owned(), overlay);
        Ok(())
    }

    /// Resolves all collected disable directives into the shared set.
    ///
    /// Skipped entirely outside startup; re-entrant reloads never re-run
    /// resolution.
    fn on_plugins_loaded(&mut self, startup: bool, disabled: &mut DisabledSet) {
        if !startup {
            debug!("skipping disable-directive resolution outside startup");
            return;
        }

        let mut entries: Vec<(&str, &DisableDirective)> = self
            .directives
            .iter()
            .map(|(source, directive)| (source.as_str(), directive))
            .collect();
        // Explicit orders first, then natural order value, then source
        // identifier: a total order independent of discovery order.
        entries.sort_by_key(|&(source, directive)| {
            (
                directive.order.is_none(),
                directive.order.unwrap_or(0),
                source,
            )
        });

        let mut pass = ResolutionPass::default();
        for (source, directive) in entries {
            if pass.source_done(source) {
                continue;
            }
            if disabled.contains(source) || source.ends_with(DISABLED_SUFFIX) {
                debug!(source, "skipping disable directives from inert plugin");
                continue;
            }
            for target in &directive.targets {
                // A source that already had its directives applied cannot
                // itself be disabled by a later, lower-priority directive.
                if pass.source_done(target) || pass.target_decided(target) {
                    info!(
                        source,
                        plugin = target.as_str(),
                        "disable request superseded by an earlier directive"
                    );
                    continue;
                }
                if disabled.contains(target) {
                    continue;
                }
                if disabled.insert(target.clone()) {
                    pass.decide_target(target);
                    info!(
                        plugin = target.as_str(),
                        source, "disabling plugin as requested by settings overlay"
                    );
                }
            }
            pass.finish_source(source);
        }
    }

    /// Applies the plugin's stored overlay into live settings.
    ///
    /// The overlay is taken out of the registry, so it applies at most
    /// once per process lifetime, and only through this plugin's own
    /// enable event.
    fn on_plugin_enabled(&mut self, settings: &mut Settings, record: &PluginRecord) {
        if let Some(overlay) = self.overlays.remove(record.identifier()) {
            settings.add_overlay(overlay);
            info!(plugin = record.identifier(), "added settings overlay");
        }
    }
}

fn string_list(value: &Value) -> Vec<String> {
    value
        .as_sequence()
        .map(|sequence| {
            sequence
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_owned)
                .collect()
        })
        .unwrap_or_default()
}
