//! Scene animation

use crate::ecs::{EcsResult, EntityReference, World};
use crate::foundation::math::yaw_rotation;

/// Rotates an entity about +Y at a constant rate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spin {
    /// Entity being rotated
    pub entity: EntityReference,
    /// Radians per second
    pub speed: f32,
    angle: f32,
}

impl Spin {
    /// Start at zero rotation
    pub fn new(entity: EntityReference, speed: f32) -> Self {
        Self { entity, speed, angle: 0.0 }
    }

    /// Current angle in radians
    pub fn angle(&self) -> f32 {
        self.angle
    }

    /// Advance by `delta_time` seconds and write the rotation to the entity
    pub fn update(&mut self, world: &mut World, delta_time: f32) -> EcsResult<()> {
        self.angle = (self.angle + self.speed * delta_time) % std::f32::consts::TAU;
        world.entity_mut(self.entity)?.rotation = yaw_rotation(self.angle);
        Ok(())
    }
}
