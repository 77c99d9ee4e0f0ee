//! Document identity for the relationship graph.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Stable, opaque key naming one document (typically a vault-relative path).
///
/// Implements `Ord` so node tables iterate deterministically.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    /// Create a new DocumentId.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the identity as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File stem: the last path segment without its extension.
    ///
    /// `notes/family/Ada.md` -> `Ada`
    pub fn stem(&self) -> &str {
        let name = self.0.rsplit('/').next().unwrap_or(&self.0);
        match name.rfind('.') {
            Some(dot) if dot > 0 => &name[..dot],
            _ => name,
        }
    }

    /// Consume and return the inner string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DocumentId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for DocumentId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Borrow<str> for DocumentId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for DocumentId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for DocumentId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for DocumentId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stem() {
        assert_eq!(DocumentId::from("notes/family/Ada.md").stem(), "Ada");
        assert_eq!(DocumentId::from("Ada.md").stem(), "Ada");
        assert_eq!(DocumentId::from("Ada").stem(), "Ada");
        assert_eq!(DocumentId::from("dir/.hidden").stem(), ".hidden");
        assert_eq!(DocumentId::from("a/b.c/d.e.md").stem(), "d.e");
    }

    #[test]
    fn test_ordering_is_lexicographic() {
        let mut ids = vec![DocumentId::from("c"), DocumentId::from("a"), DocumentId::from("b")];
        ids.sort();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_serde_transparent() {
        let id = DocumentId::from("people/Grace.md");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"people/Grace.md\"");
        let back: DocumentId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
