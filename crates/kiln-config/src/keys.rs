//! Reserved key paths shared between the settings store and the plugin
//! bootstrap subsystem.
//!
//! These are the only pieces of settings structure the plugin coordination
//! logic depends on, so they live here rather than being re-declared by
//! every consumer.

/// Top-level key grouping plugin-system settings.
pub const PLUGINS: &str = "plugins";

/// Sub-key of [`PLUGINS`] holding the sequence of disabled plugin
/// identifiers.
pub const DISABLED: &str = "_disabled";

/// Path to the disabled-plugin identifier list.
pub const DISABLED_PATH: &[&str] = &[PLUGINS, DISABLED];

/// Path to the flag requesting that the next start happens in safe mode.
pub const SAFE_MODE_ONCE_PATH: &[&str] = &["server", "start_once_in_safe_mode"];

/// Path to the logging filter expression.
pub const LOG_FILTER_PATH: &[&str] = &["logging", "filter"];

/// Path to the logging output format.
pub const LOG_FORMAT_PATH: &[&str] = &["logging", "format"];
