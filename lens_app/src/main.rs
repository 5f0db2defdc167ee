//! Headless driver
//!
//! Runs the engine against the recording device with a synthetic stereo
//! view pair, the way a headset session would drive it, and logs per-frame
//! statistics.
//!
//! Usage: `lens_headless [config.toml|config.ron] [frames]`

use std::f32::consts::FRAC_PI_4;
use std::path::Path;
use std::process::ExitCode;

use lens_engine::config::ConfigError;
use lens_engine::ecs::EcsError;
use lens_engine::foundation::logging;
use lens_engine::prelude::*;
use lens_engine::render::{Fov, NearFar, Pose, SurfaceId};
use lens_engine::scene::{Scene, Spin};
use thiserror::Error;

const DEFAULT_FRAMES: u64 = 120;
const FRAME_TIME: f32 = 1.0 / 60.0;
const INTERPUPILLARY_DISTANCE: f32 = 0.064;

#[derive(Error, Debug)]
enum AppError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Asset(#[from] AssetError),

    #[error(transparent)]
    Scene(#[from] EcsError),

    #[error("Invalid frame count '{0}'")]
    FrameCount(String),
}

fn main() -> ExitCode {
    let mut args = std::env::args().skip(1);
    let config_path = args.next();
    let frames = args.next();

    let config = match config_path.as_deref().map(ApplicationConfig::load_from_file).transpose() {
        Ok(config) => config.unwrap_or_default(),
        Err(e) => {
            logging::init(&LoggingConfig::default());
            log::error!("Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };
    logging::init(&config.logging);

    match run(&config, frames.as_deref()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(config: &ApplicationConfig, frames: Option<&str>) -> Result<(), AppError> {
    let frames = match frames {
        Some(value) => value.parse().map_err(|_| AppError::FrameCount(value.to_string()))?,
        None => DEFAULT_FRAMES,
    };

    let mut engine = Engine::new(RecordingDevice::new(), config)?;
    let mut scene = match &config.scene_path {
        Some(path) => {
            let description = SceneDescription::load_from_file(path)?;
            let base_dir = Path::new(path).parent().unwrap_or_else(|| Path::new("."));
            SceneBuilder::populate(&description, &mut engine.world, base_dir)?
        }
        None => builtin_scene(&mut engine.world)?,
    };

    let targets = FrameTargets { color: SurfaceId(0), depth: SurfaceId(1) };
    let views = stereo_views();
    log::info!("Running {} headless frames", frames);

    for frame in 0..frames {
        let stats = engine.frame(&targets, &views, FRAME_TIME, |world, dt| scene.update(world, dt))?;
        log::debug!(
            "Frame {}: {} draws, {} material binds, {} new buffers, {} lights",
            frame,
            stats.draws,
            stats.material_binds,
            stats.buffers_created,
            stats.point_lights
        );
        engine.renderer.device_mut().clear_commands();
    }

    log::info!(
        "Finished {} frames in {:.2}s of scene time, {} meshes resident",
        engine.clock.frame_count(),
        engine.clock.total_time(),
        engine.renderer.mesh_buffers().len()
    );
    Ok(())
}

/// One spinning triangle two meters ahead and one point light
fn builtin_scene(world: &mut World) -> Result<Scene, EcsError> {
    let material = PbrMaterialData { albedo: Color::new(0.9, 0.3, 0.2), roughness: 0.4, ..Default::default() };
    let triangle = MeshComponent::new(
        vec![Vec3::new(-0.5, -0.5, 0.0), Vec3::new(0.0, 0.5, 0.0), Vec3::new(0.5, -0.5, 0.0)],
        vec![Vec3::z(); 3],
        vec![Vec2::new(0.0, 1.0), Vec2::new(0.5, 0.0), Vec2::new(1.0, 1.0)],
        vec![0, 1, 2],
        material.into(),
    );

    let entity = world.create_entity();
    world.entity_mut(entity)?.position = Vec3::new(0.0, 0.0, -2.0);
    world.register_component(entity, triangle)?;
    let light = SceneBuilder::add_point_light(world, Vec3::new(1.0, 0.0, 1.0), 100.0)?;

    Ok(Scene { models: vec![entity], lights: vec![light], spins: vec![Spin::new(entity, -0.3)] })
}

/// Eyes offset along x with symmetric 45 degree half-angles and reversed depth
fn stereo_views() -> [ViewProjection; 2] {
    let half_ipd = INTERPUPILLARY_DISTANCE / 2.0;
    [-half_ipd, half_ipd].map(|x| ViewProjection {
        pose: Pose { position: Vec3::new(x, 0.0, 0.0), ..Pose::default() },
        fov: Fov::symmetric(FRAC_PI_4, FRAC_PI_4),
        near_far: NearFar { near: 20.0, far: 0.1 },
    })
}
