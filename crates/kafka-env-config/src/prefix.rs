// crates/kafka-env-config/src/prefix.rs
// ============================================================================
// Module: Namespace Prefix
// Description: Idempotent prefixing of topic and consumer group names.
// Purpose: Qualify names on shared clusters without double-prefixing.
// Dependencies: none
// ============================================================================

//! ## Overview
//! Shared clusters require topic and consumer group names to start with an
//! operator-assigned prefix. [`NamespacePrefix::apply`] adds it only when it
//! is not already there, so applying it twice is the same as applying once.

// ============================================================================
// SECTION: Namespace Prefix
// ============================================================================

/// Prefix prepended to topic and consumer group names.
///
/// # Invariants
/// - `apply(apply(name)) == apply(name)`.
/// - An empty prefix leaves every name unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct NamespacePrefix(String);

impl NamespacePrefix {
    /// Creates a prefix from its raw value.
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self(prefix.into())
    }

    /// Returns the raw prefix value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true when no prefix is configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns `name` qualified with the prefix.
    #[must_use]
    pub fn apply(&self, name: &str) -> String {
        if name.starts_with(self.0.as_str()) {
            return name.to_string();
        }
        let mut qualified = String::with_capacity(self.0.len() + name.len());
        qualified.push_str(&self.0);
        qualified.push_str(name);
        qualified
    }
}

impl From<String> for NamespacePrefix {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for NamespacePrefix {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
