//! Crate-level integration tests for the full bootstrap sequence.

use camino::Utf8PathBuf;
use serde_yaml::Value;
use tempfile::TempDir;

use crate::disabled::DisabledSet;
use crate::hooks::BootstrapHooks;
use crate::loader::PluginLoader;
use crate::plugin::{OverlayDeclaration, Plugin, SettingsOverlayProvider};
use crate::record::PluginMetadata;
use crate::safe_mode::SafeModeValidator;
use kiln_config::Settings;

struct PlainPlugin;

impl Plugin for PlainPlugin {}

struct OverlayPlugin {
    declaration: OverlayDeclaration,
}

impl SettingsOverlayProvider for OverlayPlugin {
    fn settings_overlay(&self) -> OverlayDeclaration {
        self.declaration.clone()
    }
}

impl Plugin for OverlayPlugin {
    fn overlay_provider(&self) -> Option<&dyn SettingsOverlayProvider> {
        Some(self)
    }
}

fn overlay_plugin(yaml: &str, order: Option<i64>) -> Box<OverlayPlugin> {
    let raw: Value = serde_yaml::from_str(yaml).expect("valid yaml");
    let declaration = order.map_or_else(
        || OverlayDeclaration::new(raw.clone()),
        |key| OverlayDeclaration::new(raw.clone()).with_order(key),
    );
    Box::new(OverlayPlugin { declaration })
}

fn fresh_settings() -> Settings {
    let dir = TempDir::new().expect("create temp dir");
    let base = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 temp dir");
    Settings::open(Some(base), None).expect("open settings")
}

#[test]
fn end_to_end_bootstrap_with_conflicting_directives() {
    let mut settings = fresh_settings();
    let mut loader = PluginLoader::new(DisabledSet::new());
    loader.add_observer(Box::new(BootstrapHooks::new()));

    // Two plugins both want "flaky" gone; the ordered one must win the
    // resolution while the outcome stays identical either way.
    loader
        .register(
            PluginMetadata::new("stabiliser", "1.0"),
            overlay_plugin(
                "plugins:\n  _disabled:\n    - flaky\nstability:\n  strict: true\n",
                Some(1),
            ),
        )
        .expect("register stabiliser");
    loader
        .register(
            PluginMetadata::new("watchdog", "2.1"),
            overlay_plugin("plugins:\n  _disabled:\n    - flaky\n", None),
        )
        .expect("register watchdog");
    loader
        .register(PluginMetadata::new("flaky", "0.1"), Box::new(PlainPlugin))
        .expect("register flaky");

    loader.load_all(&mut settings, true).expect("bootstrap");

    assert_eq!(loader.disabled().as_slice(), &[String::from("flaky")]);
    assert!(!loader.record("flaky").expect("record").is_enabled());
    assert!(loader.record("stabiliser").expect("record").is_enabled());
    assert!(loader.record("watchdog").expect("record").is_enabled());
    assert_eq!(
        settings
            .get(&["stability", "strict"])
            .and_then(Value::as_bool),
        Some(true),
        "enabled plugins' overlays must be live"
    );
}

#[test]
fn non_startup_reload_does_not_resolve_directives() {
    let mut settings = fresh_settings();
    let mut loader = PluginLoader::new(DisabledSet::new());
    loader.add_observer(Box::new(BootstrapHooks::new()));
    loader
        .register(
            PluginMetadata::new("gatekeeper", "1.0"),
            overlay_plugin("plugins:\n  _disabled:\n    - legacy_panel\n", None),
        )
        .expect("register gatekeeper");
    loader
        .register(
            PluginMetadata::new("legacy_panel", "0.9"),
            Box::new(PlainPlugin),
        )
        .expect("register legacy_panel");

    loader.load_all(&mut settings, false).expect("reload");

    assert!(loader.disabled().is_empty());
    assert!(loader.record("legacy_panel").expect("record").is_enabled());
}

#[test]
fn safe_mode_end_to_end() {
    let mut settings = fresh_settings();
    let mut loader = PluginLoader::new(DisabledSet::new());
    loader.add_observer(Box::new(BootstrapHooks::new()));
    loader.add_validator(Box::new(SafeModeValidator));

    loader
        .register(
            PluginMetadata::new("core_ui", "1.0").bundled(),
            overlay_plugin("ui:\n  theme: plain\n", None),
        )
        .expect("register core_ui");
    loader
        .register(
            PluginMetadata::new("themer", "3.0"),
            overlay_plugin("ui:\n  theme: fancy\n", None),
        )
        .expect("register themer");

    loader.load_all(&mut settings, true).expect("bootstrap");

    // Bundled plugins still run in safe mode, user plugins do not, and
    // only the bundled overlay reaches live settings.
    assert_eq!(settings.get_str(&["ui", "theme"]), Some("plain"));
    let themer = loader.record("themer").expect("record");
    assert!(themer.safe_mode_victim());
    assert!(themer.safe_mode_enabled());
    assert!(!themer.is_enabled());
}
