//! Entity-Component storage
//!
//! Append-only entity and component stores. Entities own their transform and
//! the list of components registered on them; each component kind lives in
//! its own dense array inside [`ComponentStore`].

pub mod entity;
pub mod component;
pub mod storage;
pub mod components;
pub mod world;

#[cfg(test)]
mod tests;

pub use entity::{Entity, EntityReference, EntityStore};
pub use component::{Component, ComponentBase, ComponentReference};
pub use storage::{ComponentKind, ComponentStore, StoredComponent};
pub use world::World;

use thiserror::Error;

/// Result type for entity/component operations
pub type EcsResult<T> = Result<T, EcsError>;

/// Precondition errors raised by the stores.
///
/// These indicate a bug in scene construction code; callers propagate them
/// to the top of the frame loop rather than recovering.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EcsError {
    /// No entity with this index was ever created
    #[error("Entity {index} does not exist (store holds {len} entities)")]
    EntityOutOfRange {
        /// Requested entity index
        index: usize,
        /// Number of entities in the store
        len: usize,
    },

    /// No component with this index exists in the kind's array
    #[error("{kind:?} component {index} does not exist")]
    ComponentOutOfRange {
        /// Kind of the requested component
        kind: ComponentKind,
        /// Requested index
        index: usize,
    },

    /// A reference was resolved as a different kind than it points to
    #[error("Reference to a {actual:?} component resolved as {requested:?}")]
    KindMismatch {
        /// Kind the caller asked for
        requested: ComponentKind,
        /// Kind recorded in the reference
        actual: ComponentKind,
    },
}
