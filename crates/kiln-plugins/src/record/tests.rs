//! Unit tests for plugin records.

use rstest::rstest;

use super::*;
use crate::error::PluginError;

#[test]
fn metadata_defaults_to_user_installed() {
    let meta = PluginMetadata::new("themer", "0.3.1");
    assert_eq!(meta.identifier(), "themer");
    assert_eq!(meta.version(), "0.3.1");
    assert!(!meta.is_bundled());
}

#[test]
fn bundled_marks_host_shipped() {
    let meta = PluginMetadata::new("core_ui", "1.0.0").bundled();
    assert!(meta.is_bundled());
}

#[rstest]
#[case::empty("")]
#[case::blank("   ")]
#[case::whitespace("my plugin")]
fn validate_rejects_bad_identifiers(#[case] identifier: &str) {
    let meta = PluginMetadata::new(identifier, "1.0");
    let error = meta.validate().expect_err("identifier should be rejected");
    assert!(matches!(error, PluginError::InvalidIdentifier { .. }));
}

#[test]
fn record_starts_with_flags_cleared() {
    let record = PluginRecord::new(PluginMetadata::new("themer", "0.3.1"));
    assert!(!record.safe_mode_victim());
    assert!(!record.safe_mode_enabled());
    assert!(!record.needs_restart());
    assert!(!record.is_enabled());
}

#[test]
fn flags_are_freely_settable() {
    let mut record = PluginRecord::new(PluginMetadata::new("themer", "0.3.1"));
    record.set_safe_mode_victim(true);
    record.set_safe_mode_enabled(true);
    record.set_needs_restart(true);
    record.set_enabled(true);
    assert!(record.safe_mode_victim());
    assert!(record.safe_mode_enabled());
    assert!(record.needs_restart());
    assert!(record.is_enabled());
}
