//! Overlay mapping trees and their merge semantics.
//!
//! An [`OverlayMap`] is a string-keyed configuration tree, the normalised
//! form of a plugin settings overlay and the unit of layering inside
//! [`Settings`](crate::settings::Settings). Key-path helpers walk nested
//! mappings; the merge operation combines trees recursively with the
//! incoming tree winning on conflicts.

use serde_yaml::{Mapping, Value};

use crate::error::SettingsError;

/// A normalised, string-keyed configuration tree.
///
/// # Example
///
/// ```rust,ignore
/// use kiln_config::OverlayMap;
///
/// let raw: serde_yaml::Value =
///     serde_yaml::from_str("feature:\n  x: 1\n").expect("valid yaml");
/// let overlay = OverlayMap::from_value(raw).expect("mapping root");
/// assert_eq!(
///     overlay.get_path(&["feature", "x"]).and_then(|v| v.as_i64()),
///     Some(1),
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverlayMap(Mapping);

impl OverlayMap {
    /// Creates an empty overlay.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalises a raw YAML value into an overlay tree.
    ///
    /// A null document normalises to an empty overlay; anything other than
    /// a mapping is rejected.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidOverlay`] if the root of the value
    /// is neither a mapping nor null.
    pub fn from_value(value: Value) -> Result<Self, SettingsError> {
        match value {
            Value::Mapping(mapping) => Ok(Self(mapping)),
            Value::Null => Ok(Self::new()),
            other => Err(SettingsError::InvalidOverlay {
                message: format!(
                    "overlay root must be a mapping, got {}",
                    value_kind(&other)
                ),
            }),
        }
    }

    /// Returns `true` when the overlay holds no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Walks a key path through nested mappings.
    #[must_use]
    pub fn get_path(&self, path: &[&str]) -> Option<&Value> {
        let (first, rest) = path.split_first()?;
        let mut current = self.0.get(*first)?;
        for segment in rest {
            current = current.as_mapping()?.get(*segment)?;
        }
        Some(current)
    }

    /// Inserts a value at a key path, creating intermediate mappings.
    ///
    /// An intermediate node that is not a mapping is replaced by one; the
    /// write always succeeds.
    pub fn set_path(&mut self, path: &[&str], value: Value) {
        let Some((last, parents)) = path.split_last() else {
            return;
        };
        let mut current = &mut self.0;
        for segment in parents {
            let key = Value::String((*segment).to_owned());
            let entry = current
                .entry(key)
                .or_insert_with(|| Value::Mapping(Mapping::new()));
            if !entry.is_mapping() {
                *entry = Value::Mapping(Mapping::new());
            }
            match entry.as_mapping_mut() {
                Some(mapping) => current = mapping,
                None => return,
            }
        }
        current.insert(Value::String((*last).to_owned()), value);
    }

    /// Removes and returns the value at a key path.
    ///
    /// Parent mappings are left in place even when the removal empties
    /// them.
    pub fn remove_path(&mut self, path: &[&str]) -> Option<Value> {
        let (last, parents) = path.split_last()?;
        let mut current = &mut self.0;
        for segment in parents {
            current = current.get_mut(*segment)?.as_mapping_mut()?;
        }
        current.remove(*last)
    }

    /// Merges another overlay into this one.
    ///
    /// Mappings merge recursively; any other conflicting value is replaced
    /// by the incoming one.
    pub fn merge_from(&mut self, other: &Self) {
        merge_mapping(&mut self.0, &other.0);
    }

    /// Returns the underlying mapping.
    #[must_use]
    pub const fn as_mapping(&self) -> &Mapping {
        &self.0
    }

    /// Consumes the overlay, returning the underlying mapping.
    #[must_use]
    pub fn into_mapping(self) -> Mapping {
        self.0
    }
}

impl From<Mapping> for OverlayMap {
    fn from(mapping: Mapping) -> Self {
        Self(mapping)
    }
}

fn merge_mapping(target: &mut Mapping, incoming: &Mapping) {
    for (key, value) in incoming {
        match target.get_mut(key) {
            Some(existing) => merge_value(existing, value),
            None => {
                target.insert(key.clone(), value.clone());
            }
        }
    }
}

fn merge_value(target: &mut Value, incoming: &Value) {
    if let (Value::Mapping(target_map), Value::Mapping(incoming_map)) = (&mut *target, incoming) {
        merge_mapping(target_map, incoming_map);
    } else {
        *target = incoming.clone();
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

#[cfg(test)]
mod tests;
