//! Point light gathering

use crate::ecs::components::PointLightComponent;
use crate::ecs::{Component, EcsResult, EntityStore};
use crate::render::constants::{LightSlots, MAX_POINT_LIGHTS};

/// Point lights packed for the fragment shaders
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLightSet {
    /// Packed slots, unused ones zeroed
    pub slots: LightSlots,
    /// Number of slots in use
    pub count: usize,
    /// Active lights beyond capacity that were left out
    pub dropped: usize,
}

/// Pack active point lights in registration order.
///
/// Position comes from the parent entity and intensity goes in w. The first
/// [`MAX_POINT_LIGHTS`] active lights win.
pub fn gather_point_lights(entities: &EntityStore, lights: &[PointLightComponent]) -> EcsResult<PointLightSet> {
    let mut set = PointLightSet { slots: [[0.0; 4]; MAX_POINT_LIGHTS], count: 0, dropped: 0 };

    for light in lights.iter().filter(|light| light.is_active()) {
        if set.count == MAX_POINT_LIGHTS {
            set.dropped += 1;
            continue;
        }
        let position = entities.get(light.parent())?.position;
        set.slots[set.count] = [position.x, position.y, position.z, light.intensity];
        set.count += 1;
    }

    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::World;
    use crate::foundation::math::Vec3;

    fn spawn_light(world: &mut World, x: f32, intensity: f32) {
        let entity = world.create_entity();
        world.entity_mut(entity).unwrap().position = Vec3::new(x, 0.0, 1.0);
        world.register_component(entity, PointLightComponent::new(intensity)).unwrap();
    }

    #[test]
    fn test_first_four_lights_win() {
        let mut world = World::new();
        for i in 0..6 {
            spawn_light(&mut world, i as f32, 10.0 * (i + 1) as f32);
        }

        let set = gather_point_lights(&world.entities, world.components.all()).unwrap();

        assert_eq!(set.count, 4);
        assert_eq!(set.dropped, 2);
        assert_eq!(set.slots[0], [0.0, 0.0, 1.0, 10.0]);
        assert_eq!(set.slots[3], [3.0, 0.0, 1.0, 40.0]);
    }

    #[test]
    fn test_unused_slots_are_zero() {
        let mut world = World::new();
        spawn_light(&mut world, 1.0, 100.0);

        let set = gather_point_lights(&world.entities, world.components.all()).unwrap();

        assert_eq!(set.count, 1);
        assert_eq!(set.slots[0], [1.0, 0.0, 1.0, 100.0]);
        assert!(set.slots[1..].iter().all(|slot| *slot == [0.0; 4]));
    }

    #[test]
    fn test_inactive_lights_do_not_take_slots() {
        let mut world = World::new();
        spawn_light(&mut world, 0.0, 1.0);
        spawn_light(&mut world, 1.0, 2.0);
        world.components.all_mut::<PointLightComponent>()[0].base.active = false;

        let set = gather_point_lights(&world.entities, world.components.all()).unwrap();

        assert_eq!(set.count, 1);
        assert_eq!(set.slots[0][3], 2.0);
    }
}
