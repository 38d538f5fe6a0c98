//! Dotted-path resolution over document values
//!
//! A path always starts at the root segment `value`, mirroring the filter
//! grammar. Resolution never fails: an absent segment, or a segment applied
//! to a non-object, resolves to `Resolved::Missing`. Missing is never
//! conflated with an explicit JSON null.

use serde_json::Value;

/// A parsed dotted field path: `value.address.city` holds `["address", "city"]`.
///
/// The `value` root is implicit and not stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath {
    segments: Vec<String>,
}

impl FieldPath {
    /// Builds a path from its segments (root excluded).
    pub fn new(segments: Vec<String>) -> Self {
        Self { segments }
    }

    /// A path addressing the document root itself.
    pub fn root() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    /// The segments below the root.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Resolves this path against a document.
    ///
    /// Walking through anything other than an object, or through an absent
    /// key, yields `Missing`.
    pub fn resolve<'a>(&self, document: &'a Value) -> Resolved<'a> {
        let mut current = document;
        for segment in &self.segments {
            match current {
                Value::Object(map) => match map.get(segment) {
                    Some(next) => current = next,
                    None => return Resolved::Missing,
                },
                _ => return Resolved::Missing,
            }
        }
        Resolved::Found(current)
    }
}

impl std::fmt::Display for FieldPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "value")?;
        for segment in &self.segments {
            write!(f, ".{}", segment)?;
        }
        Ok(())
    }
}

/// Result of resolving a path against a document.
///
/// `Missing` means the path does not exist in the document. It is distinct
/// from `Found(&Value::Null)`: a document can carry an explicit null.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolved<'a> {
    /// The path exists; the referenced value (possibly `Null`).
    Found(&'a Value),
    /// The path does not exist in this document.
    Missing,
}

impl<'a> Resolved<'a> {
    /// Returns true if the path resolved to a value.
    pub fn is_found(&self) -> bool {
        matches!(self, Resolved::Found(_))
    }

    /// Returns true if the path is absent.
    pub fn is_missing(&self) -> bool {
        matches!(self, Resolved::Missing)
    }

    /// The resolved value, if any.
    pub fn value(&self) -> Option<&'a Value> {
        match self {
            Resolved::Found(v) => Some(v),
            Resolved::Missing => None,
        }
    }
}
