//! Well-known folders resolved relative to the host base directory.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Folders the host and its plugins rely on.
///
/// Each folder can be relocated through a `folders.<name>` setting;
/// otherwise it lives directly under the base directory using the
/// snake_case name as the directory name.
#[derive(
    Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Hash, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum FolderKind {
    /// User-installed plugin packages.
    Plugins,
    /// Rotating host log files.
    Logs,
    /// Application data written by plugins and the host.
    Data,
}

impl FolderKind {
    /// Returns the settings sub-key (and default directory name) for this
    /// folder.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Plugins => "plugins",
            Self::Logs => "logs",
            Self::Data => "data",
        }
    }
}
