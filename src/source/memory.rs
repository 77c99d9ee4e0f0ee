//! In-memory document source for testing and embedding.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex_lite::Regex;

use super::DocumentSource;
use crate::types::DocumentId;
use crate::DEFAULT_PARENT_FIELD;

/// `[[Target]]`, `[[Target|alias]]`, `[[Target#heading]]`
fn wiki_link() -> &'static Regex {
    static WIKI_LINK: OnceLock<Regex> = OnceLock::new();
    WIKI_LINK.get_or_init(|| {
        Regex::new(r"^\[\[([^\]|#]*)(?:#[^\]|]*)?(?:\|[^\]]*)?\]\]$").expect("static pattern")
    })
}

/// `[label](target.md)`
fn markdown_link() -> &'static Regex {
    static MARKDOWN_LINK: OnceLock<Regex> = OnceLock::new();
    MARKDOWN_LINK.get_or_init(|| Regex::new(r"^\[[^\]]*\]\(([^)]+)\)$").expect("static pattern"))
}

/// Strip link syntax and quoting from a raw field value.
///
/// Returns `None` for values that are empty after normalization.
pub fn normalize_reference(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_matches(|c| c == '"' || c == '\'').trim();
    let target = if let Some(caps) = wiki_link().captures(trimmed) {
        caps.get(1).map(|m| m.as_str()).unwrap_or("")
    } else if let Some(caps) = markdown_link().captures(trimmed) {
        caps.get(1).map(|m| m.as_str()).unwrap_or("")
    } else {
        trimmed
    };
    let target = target.trim();
    if target.is_empty() {
        None
    } else {
        Some(target.to_string())
    }
}

/// In-memory document source.
///
/// Documents map field names to raw values. Uses BTreeMap for deterministic
/// enumeration order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDocumentSource {
    documents: BTreeMap<DocumentId, BTreeMap<String, Vec<String>>>,
}

impl InMemoryDocumentSource {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a document with no fields. Existing documents are left as they are.
    pub fn add_document(&mut self, id: impl Into<DocumentId>) {
        self.documents.entry(id.into()).or_default();
    }

    /// Set the raw values of `field` on `id`, creating the document if needed.
    pub fn set_field(&mut self, id: impl Into<DocumentId>, field: &str, values: Vec<String>) {
        self.documents
            .entry(id.into())
            .or_default()
            .insert(field.to_string(), values);
    }

    /// Set the default parent field of `id`.
    pub fn set_parents(&mut self, id: impl Into<DocumentId>, parents: &[&str]) {
        let values = parents.iter().map(|p| p.to_string()).collect();
        self.set_field(id, DEFAULT_PARENT_FIELD, values);
    }

    /// Builder form of [`set_parents`](Self::set_parents).
    pub fn with_document(mut self, id: impl Into<DocumentId>, parents: &[&str]) -> Self {
        self.set_parents(id, parents);
        self
    }

    /// Move a document's fields to a new identity.
    ///
    /// Raw references held by other documents are not rewritten.
    pub fn rename_document(&mut self, old: &DocumentId, new: impl Into<DocumentId>) -> bool {
        match self.documents.remove(old) {
            Some(fields) => {
                self.documents.insert(new.into(), fields);
                true
            }
            None => false,
        }
    }

    /// Delete a document.
    pub fn remove_document(&mut self, id: &DocumentId) -> bool {
        self.documents.remove(id).is_some()
    }

    /// Whether a document exists.
    pub fn contains(&self, id: &DocumentId) -> bool {
        self.documents.contains_key(id)
    }

    /// Number of documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Whether the source has no documents.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl DocumentSource for InMemoryDocumentSource {
    fn list_documents(&self) -> Vec<DocumentId> {
        self.documents.keys().cloned().collect()
    }

    fn parent_field_values(&self, doc: &DocumentId, field: &str) -> Vec<String> {
        self.documents
            .get(doc)
            .and_then(|fields| fields.get(field))
            .cloned()
            .unwrap_or_default()
    }

    fn resolve_reference(&self, raw: &str, _context: &DocumentId) -> Option<DocumentId> {
        let target = normalize_reference(raw)?;

        let exact = DocumentId::from(target.as_str());
        if self.documents.contains_key(&exact) {
            return Some(exact);
        }
        let with_extension = DocumentId::from(format!("{}.md", target));
        if self.documents.contains_key(&with_extension) {
            return Some(with_extension);
        }

        // Bare names resolve by file stem, but only when unambiguous
        let mut by_stem = self.documents.keys().filter(|id| id.stem() == target);
        let first = by_stem.next()?;
        if by_stem.next().is_some() {
            return None;
        }
        Some(first.clone())
    }
}
