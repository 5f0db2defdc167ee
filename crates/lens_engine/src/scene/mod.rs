//! Scene description and population
//!
//! A [`SceneDescription`] lists model files and point lights. The builder
//! feeds them into a [`World`] through the loader and the public store
//! calls only; the resulting [`Scene`] keeps the handles and per-entity
//! animation state the frame loop updates before dispatch.

pub mod animation;

pub use animation::Spin;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::assets::{AssetResult, MaterialModel, MeshLoader};
use crate::config::Config;
use crate::ecs::components::PointLightComponent;
use crate::ecs::{EcsResult, EntityReference, World};
use crate::foundation::logging::info;
use crate::foundation::math::Vec3;

fn unit_scale() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}

/// A model file placed in the scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDesc {
    /// Path to the `.obj` file, relative to the scene file
    pub path: String,
    /// World position
    #[serde(default)]
    pub position: [f32; 3],
    /// Per-axis scale
    #[serde(default = "unit_scale")]
    pub scale: [f32; 3],
    /// Rotation speed about +Y in radians per second
    #[serde(default)]
    pub spin_speed: f32,
}

/// A point light placed in the scene
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LightDesc {
    /// World position
    pub position: [f32; 3],
    /// Radiant intensity
    pub intensity: f32,
}

/// Scene file contents
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneDescription {
    /// Models to load
    pub models: Vec<ModelDesc>,
    /// Point lights to create
    pub point_lights: Vec<LightDesc>,
    /// Shading model for imported materials
    pub material_model: MaterialModel,
}

impl SceneDescription {
    /// The headset demo: one spinning model and a light beside it
    pub fn demo() -> Self {
        Self {
            models: vec![ModelDesc {
                path: "assets/objects/hololens.obj".to_string(),
                position: [0.0, 0.0, 0.0],
                scale: unit_scale(),
                spin_speed: -0.3,
            }],
            point_lights: vec![LightDesc { position: [1.0, 0.0, 1.0], intensity: 100.0 }],
            material_model: MaterialModel::Pbr,
        }
    }
}

impl Config for SceneDescription {}

/// Handles of a populated scene
#[derive(Debug, Clone, Default)]
pub struct Scene {
    /// One entity per loaded model
    pub models: Vec<EntityReference>,
    /// One entity per point light
    pub lights: Vec<EntityReference>,
    /// Spinning entities
    pub spins: Vec<Spin>,
}

impl Scene {
    /// Advance animations by `delta_time` seconds
    pub fn update(&mut self, world: &mut World, delta_time: f32) -> EcsResult<()> {
        for spin in &mut self.spins {
            spin.update(world, delta_time)?;
        }
        Ok(())
    }
}

/// Populates a [`World`] from a [`SceneDescription`]
pub struct SceneBuilder;

impl SceneBuilder {
    /// Load every model and create every light; model paths resolve against `base_dir`
    pub fn populate(description: &SceneDescription, world: &mut World, base_dir: impl AsRef<Path>) -> AssetResult<Scene> {
        let base_dir = base_dir.as_ref();
        let mut scene = Scene::default();

        for model in &description.models {
            let entity = MeshLoader::load(base_dir.join(&model.path), world, description.material_model)?;
            let placed = world.entity_mut(entity)?;
            placed.position = Vec3::from(model.position);
            placed.scale = Vec3::from(model.scale);

            if model.spin_speed != 0.0 {
                scene.spins.push(Spin::new(entity, model.spin_speed));
            }
            scene.models.push(entity);
        }

        for light in &description.point_lights {
            scene.lights.push(Self::add_point_light(world, Vec3::from(light.position), light.intensity)?);
        }

        info!("Scene populated: {} models, {} point lights", scene.models.len(), scene.lights.len());
        Ok(scene)
    }

    /// Create an entity at `position` carrying one point light
    pub fn add_point_light(world: &mut World, position: Vec3, intensity: f32) -> EcsResult<EntityReference> {
        let entity = world.create_entity();
        world.entity_mut(entity)?.position = position;
        world.register_component(entity, PointLightComponent::new(intensity))?;
        Ok(entity)
    }
}
