//! Component base data and references

use super::{ComponentKind, EntityReference};

/// Fields shared by every component
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ComponentBase {
    /// Owning entity, set once at registration
    pub(super) parent: EntityReference,
    /// Inactive components are kept in storage but skipped by the renderer
    pub active: bool,
}

impl ComponentBase {
    /// Owning entity
    pub const fn parent(&self) -> EntityReference {
        self.parent
    }
}

/// Typed, non-owning handle to a component: its index in the kind's array
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ComponentReference {
    index: usize,
    kind: ComponentKind,
}

impl ComponentReference {
    pub(crate) const fn new(index: usize, kind: ComponentKind) -> Self {
        Self { index, kind }
    }

    /// Index in the dense array of [`Self::kind`]
    pub const fn index(self) -> usize {
        self.index
    }

    /// Kind of the referenced component
    pub const fn kind(self) -> ComponentKind {
        self.kind
    }
}

/// Access to the embedded [`ComponentBase`]
pub trait Component: Sized + 'static {
    /// Shared base fields
    fn base(&self) -> &ComponentBase;

    /// Mutable shared base fields
    fn base_mut(&mut self) -> &mut ComponentBase;

    /// Owning entity
    fn parent(&self) -> EntityReference {
        self.base().parent
    }

    /// Whether the renderer should consider this component
    fn is_active(&self) -> bool {
        self.base().active
    }
}
