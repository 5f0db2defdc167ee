//! Core engine implementation

use thiserror::Error;

use crate::assets::AssetError;
use crate::config::ConfigError;
use crate::core::config::ApplicationConfig;
use crate::ecs::{EcsError, World};
use crate::foundation::logging::info;
use crate::foundation::time::FrameClock;
use crate::render::{FrameStats, FrameTargets, RenderDevice, RenderError, RenderSystem, ViewProjection};

/// Main engine struct
///
/// Owns the scene and the render front-end. The host drives it one frame at
/// a time: scene update first, then dispatch, on the calling thread.
pub struct Engine<D: RenderDevice> {
    /// Entities and components
    pub world: World,

    /// Render front-end owning the device
    pub renderer: RenderSystem<D>,

    /// Frame timing
    pub clock: FrameClock,
}

impl<D: RenderDevice> Engine<D> {
    /// Create a new engine instance
    pub fn new(device: D, config: &ApplicationConfig) -> Result<Self, EngineError> {
        info!("Initializing engine...");
        config.validate()?;

        let renderer = RenderSystem::new(device, &config.renderer)?;

        Ok(Self { world: World::new(), renderer, clock: FrameClock::new() })
    }

    /// Run one frame: `update` with the frame's delta time, then dispatch.
    ///
    /// Any error ends the frame without drawing the remaining meshes. The
    /// clock only advances once the frame has been dispatched.
    pub fn frame<F>(
        &mut self,
        targets: &FrameTargets,
        views: &[ViewProjection],
        delta_time: f32,
        update: F,
    ) -> Result<FrameStats, EngineError>
    where
        F: FnOnce(&mut World, f32) -> Result<(), EcsError>,
    {
        update(&mut self.world, delta_time)?;
        let stats = self.renderer.render_frame(targets, views, &self.world)?;
        self.clock.advance(delta_time);
        Ok(stats)
    }
}

/// Engine errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// Configuration could not be loaded or is invalid
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Scene assets failed to load
    #[error("Asset error: {0}")]
    Asset(#[from] AssetError),

    /// Scene update touched a missing entity or component
    #[error("Scene error: {0}")]
    Scene(#[from] EcsError),

    /// Dispatch or device failure
    #[error("Render error: {0}")]
    Render(#[from] RenderError),
}
