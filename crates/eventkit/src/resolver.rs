//! Conversion between dotted event names and PascalCase event identifiers.
//!
//! `on.test.args` resolves to `OnTestArgs`; `OnTestArgs` reverse-resolves to
//! `on.test.args`. Both directions accept any input and never fail.

/// Default separator between event name segments.
pub const DEFAULT_DELIMITER: &str = ".";

/// Resolve an event name into its identifier.
///
/// Each segment's first character is upper-cased; the rest of the segment is
/// kept as written. Empty segments contribute nothing.
#[must_use]
pub fn resolve(name: &str, delimiter: &str) -> String {
    let mut identifier = String::with_capacity(name.len());
    for segment in name.split(delimiter) {
        let mut chars = segment.chars();
        if let Some(first) = chars.next() {
            identifier.extend(first.to_uppercase());
            identifier.push_str(chars.as_str());
        }
    }
    identifier
}

/// Reverse-resolve an identifier into a dotted event name.
///
/// Every upper-case character starts a new segment unless nothing has been
/// written yet. All characters are lower-cased.
#[must_use]
pub fn reverse_resolve(identifier: &str, delimiter: &str) -> String {
    let mut name = String::with_capacity(identifier.len().saturating_mul(2));
    for c in identifier.chars() {
        if c.is_uppercase() && !name.is_empty() {
            name.push_str(delimiter);
        }
        name.extend(c.to_lowercase());
    }
    name
}

/// Name resolver bound to a delimiter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameResolver {
    delimiter: String,
}

impl Default for NameResolver {
    fn default() -> Self {
        Self::new(DEFAULT_DELIMITER)
    }
}

impl NameResolver {
    /// Create a resolver splitting on `delimiter`.
    #[must_use]
    pub fn new(delimiter: impl Into<String>) -> Self {
        Self {
            delimiter: delimiter.into(),
        }
    }

    /// The configured delimiter.
    #[must_use]
    pub fn delimiter(&self) -> &str {
        &self.delimiter
    }

    /// See [`resolve`].
    #[must_use]
    pub fn resolve(&self, name: &str) -> String {
        resolve(name, &self.delimiter)
    }

    /// See [`reverse_resolve`].
    #[must_use]
    pub fn reverse_resolve(&self, identifier: &str) -> String {
        reverse_resolve(identifier, &self.delimiter)
    }
}
