//! # Hierarchical Names
//!
//! Helpers over dot-separated entry names (`a.b.c` is a child of `b.c`,
//! which is a child of `c`). The root namespace is the empty string and
//! contains every entry.

use crate::entities::EntryId;
use sha3::{Digest, Keccak256};

/// The root namespace.
pub const ROOT_NAMESPACE: &str = "";

/// Compute the identifier of an entry from its full name.
pub fn entry_id(name: &str) -> EntryId {
    let mut hasher = Keccak256::new();
    hasher.update(name.as_bytes());
    EntryId(hasher.finalize().into())
}

/// Immediate parent of `name`, or `None` for a top-level label.
pub fn parent(name: &str) -> Option<&str> {
    name.split_once('.').map(|(_, rest)| rest)
}

/// All proper ancestors of `name`, nearest first.
///
/// `ancestors("a.b.c")` yields `["b.c", "c"]`.
pub fn ancestors(name: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut current = name;
    while let Some(p) = parent(current) {
        out.push(p);
        current = p;
    }
    out
}

/// Whether `entry` falls inside `namespace`.
///
/// The root namespace contains every entry; otherwise the entry must be the
/// namespace itself or one of its descendants.
pub fn is_within_namespace(namespace: &str, entry: &str) -> bool {
    if namespace == ROOT_NAMESPACE {
        return true;
    }
    if entry == namespace {
        return true;
    }
    entry
        .strip_suffix(namespace)
        .is_some_and(|prefix| prefix.ends_with('.') && prefix.len() > 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_id_is_keccak_of_name() {
        assert_eq!(
            hex::encode(entry_id("").0),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
        let id = entry_id("testDomain");
        assert_eq!(id, entry_id("testDomain"));
        assert_ne!(id, entry_id("testdomain"));
    }

    #[test]
    fn test_parent_and_ancestors() {
        assert_eq!(parent("a.b.c"), Some("b.c"));
        assert_eq!(parent("c"), None);
        assert_eq!(ancestors("a.b.c"), vec!["b.c", "c"]);
        assert!(ancestors("top").is_empty());
    }

    #[test]
    fn test_namespace_scoping() {
        assert!(is_within_namespace("", "anything.at.all"));
        assert!(is_within_namespace("example.com", "example.com"));
        assert!(is_within_namespace("example.com", "app.example.com"));
        assert!(!is_within_namespace("example.com", "badexample.com"));
        assert!(!is_within_namespace("example.com", "com"));
        assert!(!is_within_namespace("example.com", ".example.com"));
    }
}
