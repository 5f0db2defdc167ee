//! Entity store
//!
//! Entities are created once and never destroyed, so an [`EntityReference`]
//! stays valid for the lifetime of its store.

use std::ops::{Index, IndexMut};

use super::{ComponentReference, EcsError, EcsResult};
use crate::foundation::math::{compose_model_matrix, Mat4, Quat, Vec3};

/// Stable index of an entity in its [`EntityStore`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityReference(usize);

impl EntityReference {
    /// Position of the entity in creation order
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Spatial node owning a transform and the references to its components
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    /// Position in world space
    pub position: Vec3,
    /// Orientation
    pub rotation: Quat,
    /// Non-uniform scale
    pub scale: Vec3,
    components: Vec<ComponentReference>,
}

impl Default for Entity {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Quat::identity(),
            scale: Vec3::new(1.0, 1.0, 1.0),
            components: Vec::new(),
        }
    }
}

impl Entity {
    /// Components registered on this entity, in registration order
    pub fn components(&self) -> &[ComponentReference] {
        &self.components
    }

    /// Affine model matrix `T * R * S` of this entity
    pub fn model_matrix(&self) -> Mat4 {
        compose_model_matrix(&self.position, &self.rotation, &self.scale)
    }

    pub(super) fn attach(&mut self, reference: ComponentReference) {
        self.components.push(reference);
    }
}

/// Append-only owner of every entity
#[derive(Debug, Default)]
pub struct EntityStore {
    entities: Vec<Entity>,
}

impl EntityStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entity with the identity transform and no components
    pub fn create_entity(&mut self) -> EntityReference {
        self.entities.push(Entity::default());
        EntityReference(self.entities.len() - 1)
    }

    /// Look up an entity
    pub fn get(&self, reference: EntityReference) -> EcsResult<&Entity> {
        let len = self.entities.len();
        self.entities
            .get(reference.0)
            .ok_or(EcsError::EntityOutOfRange { index: reference.0, len })
    }

    /// Look up an entity for mutation of its transform
    pub fn get_mut(&mut self, reference: EntityReference) -> EcsResult<&mut Entity> {
        let len = self.entities.len();
        self.entities
            .get_mut(reference.0)
            .ok_or(EcsError::EntityOutOfRange { index: reference.0, len })
    }

    /// Whether the reference names an existing entity
    pub fn contains(&self, reference: EntityReference) -> bool {
        reference.0 < self.entities.len()
    }

    /// Entities in creation order
    pub fn iter(&self) -> impl Iterator<Item = (EntityReference, &Entity)> {
        self.entities.iter().enumerate().map(|(i, e)| (EntityReference(i), e))
    }

    /// Mutable entities in creation order
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (EntityReference, &mut Entity)> {
        self.entities.iter_mut().enumerate().map(|(i, e)| (EntityReference(i), e))
    }

    /// Number of entities
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether no entity has been created yet
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

/// Panics on an index that was not produced by this store.
impl Index<EntityReference> for EntityStore {
    type Output = Entity;

    fn index(&self, reference: EntityReference) -> &Entity {
        &self.entities[reference.0]
    }
}

impl IndexMut<EntityReference> for EntityStore {
    fn index_mut(&mut self, reference: EntityReference) -> &mut Entity {
        &mut self.entities[reference.0]
    }
}
