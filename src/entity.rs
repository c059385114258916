//! Structural model of documentable Python entities.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of documentable entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Module,
    Class,
    Function,
    Method,
}

impl EntityKind {
    /// Convert to a string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Module => "module",
            EntityKind::Class => "class",
            EntityKind::Function => "function",
            EntityKind::Method => "method",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single documentable entity extracted from a Python file.
///
/// Entities form an implicit tree via qualified-name prefixes but are
/// processed as a flat sequence in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentableEntity {
    /// The kind of entity.
    pub kind: EntityKind,
    /// Dotted path from the file root (e.g., "Config.load").
    /// For the module entity this is the file stem.
    pub qualified_name: String,
    /// Line of the definition header (1-indexed).
    pub start_line: usize,
    /// The docstring literal immediately following the definition header,
    /// with quote delimiters stripped. `None` means no such literal exists,
    /// which is distinct from a present-but-empty docstring.
    pub docstring: Option<String>,
}

impl DocumentableEntity {
    /// The unqualified name (last dotted segment).
    pub fn name(&self) -> &str {
        self.qualified_name
            .rsplit('.')
            .next()
            .unwrap_or(&self.qualified_name)
    }

    /// Whether the name is a dunder (leading and trailing double underscore).
    ///
    /// Dunder names are never treated as private, regardless of how many
    /// leading underscores they carry.
    pub fn is_dunder(&self) -> bool {
        let name = self.name();
        name.len() > 4 && name.starts_with("__") && name.ends_with("__")
    }

    /// Whether the name marks the entity as private: exactly one leading
    /// underscore and not a dunder.
    pub fn is_private(&self) -> bool {
        let name = self.name();
        name.starts_with('_') && !name.starts_with("__") && !self.is_dunder()
    }

    /// Human-readable description, e.g. `method 'Config.load'`.
    pub fn describe(&self) -> String {
        format!("{} '{}'", self.kind, self.qualified_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity(kind: EntityKind, qualified_name: &str) -> DocumentableEntity {
        DocumentableEntity {
            kind,
            qualified_name: qualified_name.to_string(),
            start_line: 1,
            docstring: None,
        }
    }

    #[test]
    fn test_name_is_last_segment() {
        let e = entity(EntityKind::Method, "Outer.Inner.run");
        assert_eq!(e.name(), "run");

        let e = entity(EntityKind::Function, "main");
        assert_eq!(e.name(), "main");
    }

    #[test]
    fn test_private_classification() {
        assert!(entity(EntityKind::Function, "_helper").is_private());
        assert!(entity(EntityKind::Method, "Config._reload").is_private());
        assert!(!entity(EntityKind::Function, "helper").is_private());
        // Double leading underscore is name mangling, not the single
        // underscore privacy convention.
        assert!(!entity(EntityKind::Method, "Config.__mangled").is_private());
    }

    #[test]
    fn test_dunder_classification() {
        assert!(entity(EntityKind::Method, "Config.__init__").is_dunder());
        assert!(entity(EntityKind::Method, "Config.__repr__").is_dunder());
        assert!(!entity(EntityKind::Method, "Config.__mangled").is_dunder());
        assert!(!entity(EntityKind::Function, "_helper").is_dunder());
        assert!(!entity(EntityKind::Method, "Config.__").is_dunder());
    }

    #[test]
    fn test_dunder_is_never_private() {
        let e = entity(EntityKind::Method, "Config.__init__");
        assert!(!e.is_private());
    }
}
