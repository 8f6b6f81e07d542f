//! The order-preserving set of disabled plugin identifiers.

/// Disabled plugin identifiers, in the order they were decided.
///
/// The collection has set semantics (an identifier appears at most once)
/// while preserving insertion order, so the outcome of disable-directive
/// resolution is observable as a stable sequence. Bootstrap code only ever
/// appends; nothing removes entries during a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisabledSet {
    entries: Vec<String>,
}

impl DisabledSet {
    /// Creates an empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Returns `true` when the identifier is present.
    #[must_use]
    pub fn contains(&self, identifier: &str) -> bool {
        self.entries.iter().any(|entry| entry == identifier)
    }

    /// Appends an identifier, returning `false` if it was already present.
    pub fn insert(&mut self, identifier: impl Into<String>) -> bool {
        let entry = identifier.into();
        if self.contains(&entry) {
            return false;
        }
        self.entries.push(entry);
        true
    }

    /// Iterates the identifiers in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    /// Returns the identifiers as a slice, in insertion order.
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.entries
    }

    /// Number of disabled identifiers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when nothing is disabled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<String> for DisabledSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        let mut set = Self::new();
        for identifier in iter {
            let _inserted = set.insert(identifier);
        }
        set
    }
}
