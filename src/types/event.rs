//! Change notifications from the document store.

use serde::{Deserialize, Serialize};

use super::document::DocumentId;

/// A change reported by the host's document store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum DocumentEvent {
    /// Document created or its content changed.
    Changed {
        /// The document.
        id: DocumentId,
    },
    /// Document moved to a new identity.
    Renamed {
        /// New identity.
        id: DocumentId,
        /// Identity before the rename.
        old_id: DocumentId,
    },
    /// Document deleted.
    Deleted {
        /// The deleted document.
        id: DocumentId,
    },
}

impl DocumentEvent {
    /// Document created or changed.
    pub fn changed(id: impl Into<DocumentId>) -> Self {
        Self::Changed { id: id.into() }
    }

    /// Document renamed from `old_id` to `id`.
    pub fn renamed(id: impl Into<DocumentId>, old_id: impl Into<DocumentId>) -> Self {
        Self::Renamed {
            id: id.into(),
            old_id: old_id.into(),
        }
    }

    /// Document deleted.
    pub fn deleted(id: impl Into<DocumentId>) -> Self {
        Self::Deleted { id: id.into() }
    }

    /// The identity the event refers to after it is applied.
    pub fn document(&self) -> &DocumentId {
        match self {
            Self::Changed { id } | Self::Renamed { id, .. } | Self::Deleted { id } => id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_json() {
        let event = DocumentEvent::renamed("new.md", "old.md");
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"event": "renamed", "id": "new.md", "old_id": "old.md"})
        );
        assert_eq!(event.document(), &DocumentId::from("new.md"));
    }
}
