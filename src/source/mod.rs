//! Document store collaborator.
//!
//! The graph never reads files or parses link syntax itself. A host hands it
//! a [`DocumentSource`] that enumerates documents, exposes raw parent-field
//! values and resolves each raw reference to a concrete identity.

pub mod memory;

use crate::types::DocumentId;

/// Trait for document store backends.
///
/// Implementations must return documents and field values in a stable order;
/// that order becomes the stored edge order and therefore the query order.
pub trait DocumentSource {
    /// Enumerate every document.
    fn list_documents(&self) -> Vec<DocumentId>;

    /// Raw values of `field` on `doc`. Zero, one or many references.
    fn parent_field_values(&self, doc: &DocumentId, field: &str) -> Vec<String>;

    /// Resolve a raw reference found on `context` to a document identity.
    ///
    /// `None` means unresolved; the reference then produces no edge.
    fn resolve_reference(&self, raw: &str, context: &DocumentId) -> Option<DocumentId>;

    /// Resolved parents of `doc` under `field`, deduplicated in first-seen order.
    fn resolved_parents(&self, doc: &DocumentId, field: &str) -> Vec<DocumentId> {
        let mut parents: Vec<DocumentId> = Vec::new();
        for raw in self.parent_field_values(doc, field) {
            if let Some(parent) = self.resolve_reference(&raw, doc) {
                if !parents.contains(&parent) {
                    parents.push(parent);
                }
            }
        }
        parents
    }
}

impl<S: DocumentSource + ?Sized> DocumentSource for &S {
    fn list_documents(&self) -> Vec<DocumentId> {
        (**self).list_documents()
    }

    fn parent_field_values(&self, doc: &DocumentId, field: &str) -> Vec<String> {
        (**self).parent_field_values(doc, field)
    }

    fn resolve_reference(&self, raw: &str, context: &DocumentId) -> Option<DocumentId> {
        (**self).resolve_reference(raw, context)
    }
}

pub use memory::InMemoryDocumentSource;
