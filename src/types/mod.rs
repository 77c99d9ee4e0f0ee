//! Core types for the relationship graph.

pub mod document;
pub mod node;
pub mod generation;
pub mod cycle;
pub mod relation;
pub mod event;

pub use document::DocumentId;
pub use node::{IdSet, RelationNode};
pub use generation::Generations;
pub use cycle::CycleInfo;
pub use relation::{Direction, RelationKind, RelationQuery, RelationResult};
pub use event::DocumentEvent;
