//! Point light component
//!
//! The light's position is its parent entity's position; it is read at draw
//! time instead of being stored here.

use crate::ecs::{Component, ComponentBase};

/// Omnidirectional light attached to an entity
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointLightComponent {
    /// Shared base fields
    pub base: ComponentBase,
    /// Radiant intensity, passed to the shaders unscaled
    pub intensity: f32,
}

impl PointLightComponent {
    /// Create a point light of the given intensity
    pub fn new(intensity: f32) -> Self {
        Self { base: ComponentBase::default(), intensity }
    }
}

impl Component for PointLightComponent {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }
}
