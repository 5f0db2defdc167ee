//! World: the entity store and component store side by side

use super::{ComponentReference, ComponentStore, EcsResult, Entity, EntityReference, EntityStore, StoredComponent};

/// Owner of all scene data for the process lifetime
#[derive(Debug, Default)]
pub struct World {
    /// All entities, in creation order
    pub entities: EntityStore,
    /// All components, one array per kind
    pub components: ComponentStore,
}

impl World {
    /// Create an empty world
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new entity with the identity transform
    pub fn create_entity(&mut self) -> EntityReference {
        self.entities.create_entity()
    }

    /// Register a component on an existing entity
    pub fn register_component<C: StoredComponent>(
        &mut self,
        entity: EntityReference,
        component: C,
    ) -> EcsResult<ComponentReference> {
        self.components.register(&mut self.entities, entity, component)
    }

    /// Look up an entity
    pub fn entity(&self, entity: EntityReference) -> EcsResult<&Entity> {
        self.entities.get(entity)
    }

    /// Look up an entity for transform updates
    pub fn entity_mut(&mut self, entity: EntityReference) -> EcsResult<&mut Entity> {
        self.entities.get_mut(entity)
    }
}
