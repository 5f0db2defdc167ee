//! Component storage
//!
//! One dense, append-only array per component kind. The set of kinds is
//! closed: it is declared once in the `component_store!` invocation at the
//! bottom of this file, which generates [`ComponentKind`], the arrays inside
//! [`ComponentStore`] and the [`StoredComponent`] binding of each type.

use super::{Component, ComponentReference, EcsError, EcsResult, EntityReference, EntityStore};
use super::components::{MeshComponent, PointLightComponent};

/// A component type with an array in [`ComponentStore`]
pub trait StoredComponent: Component {
    /// Tag recorded in references to this type
    const KIND: ComponentKind;

    /// The dense array holding every component of this type
    fn column(store: &ComponentStore) -> &Vec<Self>;

    /// Mutable access to the dense array
    fn column_mut(store: &mut ComponentStore) -> &mut Vec<Self>;
}

macro_rules! component_store {
    ($( $(#[$doc:meta])* $kind:ident => $component:ty, $field:ident; )+) => {
        /// Closed set of component kinds known at build time
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum ComponentKind {
            $( $(#[$doc])* $kind, )+
        }

        /// Owner of every component, one array per kind
        #[derive(Debug, Default)]
        pub struct ComponentStore {
            $( $field: Vec<$component>, )+
        }

        impl ComponentStore {
            /// Number of registered components of `kind`
            pub fn len_of(&self, kind: ComponentKind) -> usize {
                match kind {
                    $( ComponentKind::$kind => self.$field.len(), )+
                }
            }

            /// Total number of registered components
            pub fn len(&self) -> usize {
                0 $( + self.$field.len() )+
            }
        }

        $(
            impl StoredComponent for $component {
                const KIND: ComponentKind = ComponentKind::$kind;

                fn column(store: &ComponentStore) -> &Vec<Self> {
                    &store.$field
                }

                fn column_mut(store: &mut ComponentStore) -> &mut Vec<Self> {
                    &mut store.$field
                }
            }
        )+
    };
}

impl ComponentStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `component` on `entity`.
    ///
    /// Sets the component's parent, appends it to its kind's array and records
    /// the returned reference on the entity. Nothing is mutated when the entity
    /// does not exist.
    pub fn register<C: StoredComponent>(
        &mut self,
        entities: &mut EntityStore,
        entity: EntityReference,
        mut component: C,
    ) -> EcsResult<ComponentReference> {
        let owner = entities.get_mut(entity)?;

        let base = component.base_mut();
        base.parent = entity;
        base.active = true;

        let column = C::column_mut(self);
        let reference = ComponentReference::new(column.len(), C::KIND);
        column.push(component);
        owner.attach(reference);

        log::trace!("Registered {:?} component {} on entity {}", C::KIND, reference.index(), entity.index());
        Ok(reference)
    }

    /// Every component of type `C`, in registration order
    pub fn all<C: StoredComponent>(&self) -> &[C] {
        C::column(self)
    }

    /// Every component of type `C` for in-place field mutation
    pub fn all_mut<C: StoredComponent>(&mut self) -> &mut [C] {
        C::column_mut(self)
    }

    /// Resolve a reference to the component it names
    pub fn resolve<C: StoredComponent>(&self, reference: ComponentReference) -> EcsResult<&C> {
        if reference.kind() != C::KIND {
            return Err(EcsError::KindMismatch { requested: C::KIND, actual: reference.kind() });
        }
        C::column(self).get(reference.index()).ok_or(EcsError::ComponentOutOfRange {
            kind: reference.kind(),
            index: reference.index(),
        })
    }

    /// Whether no component of any kind has been registered
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// Adding a component kind means adding a line here.
component_store! {
    /// Renderable triangle mesh
    Mesh => MeshComponent, meshes;
    /// Point light source
    PointLight => PointLightComponent, point_lights;
}
