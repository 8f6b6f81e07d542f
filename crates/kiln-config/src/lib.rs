//! Layered settings store for the Kiln host.
//!
//! Configuration is resolved through a stack of precedence layers. From
//! lowest to highest: built-in defaults, the on-disk `config.yaml`, plugin
//! settings overlays in the order they were added, and runtime mutations.
//! Lookups walk the stack from the top and the first layer that knows a key
//! path wins, which gives overlay layering its "later layers take
//! precedence" semantics without eagerly merging anything.
//!
//! The store is YAML-backed. A malformed configuration file or overlay
//! definition is a fatal startup condition and surfaces as a
//! [`SettingsError`] for the bootstrap sequence to propagate.

pub mod error;
pub mod folders;
pub mod keys;
pub mod logging;
pub mod overlay;
pub mod settings;

pub use self::error::SettingsError;
pub use self::folders::FolderKind;
pub use self::logging::{LogFormat, LogFormatParseError};
pub use self::overlay::OverlayMap;
pub use self::settings::Settings;
