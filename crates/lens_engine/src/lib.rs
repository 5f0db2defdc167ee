//! # Lens Engine
//!
//! A small entity-component scene graph and material dispatch front-end for a
//! stereo augmented-reality renderer.
//!
//! ## Features
//!
//! - **Append-only ECS**: entities and a closed set of component kinds stored in
//!   dense arrays, referenced through stable integer handles
//! - **Tagged materials**: PBR and Phong payloads sharing one storage slot
//! - **Stereo dispatch**: one instanced draw per mesh covering both eyes
//! - **Wavefront import**: OBJ/MTL scene-loader front-end
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use lens_engine::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ApplicationConfig::default();
//!     let mut engine = Engine::new(RecordingDevice::new(), &config)?;
//!
//!     let entity = engine.world.create_entity();
//!     engine.world.register_component(entity, PointLightComponent::new(100.0))?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod core;
pub mod foundation;
pub mod config;
pub mod ecs;
pub mod assets;
pub mod render;
pub mod scene;

mod engine;

pub use engine::{Engine, EngineError};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        Engine, EngineError,
        foundation::{
            math::{Color, Mat4, Quat, Vec2, Vec3},
            time::FrameClock,
        },
        ecs::{
            ComponentKind, ComponentReference, EntityReference, World,
            components::{MeshComponent, PointLightComponent},
        },
        assets::{AssetError, MaterialModel, MeshLoader},
        render::{
            FrameTargets, MaterialHandle, MaterialKind, PbrMaterialData, PhongMaterialData,
            RecordingDevice, RenderDevice, RenderSystem, ViewProjection,
        },
        scene::{SceneBuilder, SceneDescription},
        core::config::{ApplicationConfig, LoggingConfig, RendererConfig, ShaderConfig},
        config::Config,
    };
}
