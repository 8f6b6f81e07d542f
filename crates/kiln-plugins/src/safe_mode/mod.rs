//! Safe-mode gating of plugin enablement.
//!
//! When the host starts in safe mode, a [`SafeModeValidator`] is
//! registered with the loader. It never raises an error: a veto is
//! communicated purely through the boolean return value and the flags it
//! writes on the [`PluginRecord`], which status surfaces read after
//! bootstrap. When safe mode is inactive no validator is registered at all
//! and every plugin may enable.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::record::PluginRecord;

/// Checkpoints at which the loader consults enable validators.
#[derive(
    Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Hash, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ValidationPhase {
    /// A plugin instance has just been constructed.
    AfterLoad,
    /// A plugin is about to transition to enabled.
    BeforeEnable,
}

/// Phase-gated predicate consulted by the loader for every plugin.
///
/// Returning `false` at [`ValidationPhase::BeforeEnable`] vetoes the
/// enable for this run; returning `false` at
/// [`ValidationPhase::AfterLoad`] skips the plugin entirely. Validators
/// may mutate record flags as a side channel for later observability.
pub trait EnableValidator {
    /// Judges the plugin at the given phase; `true` permits.
    fn validate(&self, phase: ValidationPhase, record: &mut PluginRecord) -> bool;
}

/// Validator blocking non-bundled plugins while the host runs degraded.
///
/// # Example
///
/// ```rust,ignore
/// use kiln_plugins::{EnableValidator, SafeModeValidator, ValidationPhase};
///
/// let validator = SafeModeValidator;
/// // Bundled plugins pass both phases; user-installed plugins are marked
/// // as victims at after_load and vetoed at before_enable.
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct SafeModeValidator;

impl EnableValidator for SafeModeValidator {
    fn validate(&self, phase: ValidationPhase, record: &mut PluginRecord) -> bool {
        match phase {
            ValidationPhase::AfterLoad => {
                record.set_safe_mode_victim(!record.is_bundled());
                record.set_safe_mode_enabled(false);
                true
            }
            ValidationPhase::BeforeEnable => {
                if record.is_bundled() {
                    true
                } else {
                    record.set_safe_mode_enabled(true);
                    false
                }
            }
        }
    }
}
