//! Render dispatch
//!
//! Turns the contents of a [`World`](crate::ecs::World) into device calls each
//! frame. The device itself sits behind the [`RenderDevice`] trait; this
//! module owns everything on the engine side of it:
//!
//! - Material handles and their GPU constant layouts
//! - The interleaved vertex format and its input layout
//! - Point light gathering
//! - Stereo view/projection math
//! - The per-mesh draw sequence and material binding state machine

pub mod material;
pub mod vertex;
pub mod constants;
pub mod lighting;
pub mod stereo;
pub mod device;
pub mod recording;
pub mod dispatch;

#[cfg(test)]
mod dispatch_tests;

pub use material::{MaterialError, MaterialHandle, MaterialKind, MaterialPayload, PbrMaterialData, PhongMaterialData};
pub use vertex::{build_vertex_data, Vertex, VertexAttribute, VertexFormat, VERTEX_LAYOUT, VERTEX_STRIDE};
pub use constants::{PbrConstants, PhongConstants, TransformConstants, MAX_POINT_LIGHTS};
pub use lighting::{gather_point_lights, PointLightSet};
pub use stereo::{Fov, NearFar, Pose, ViewProjection, STEREO_INSTANCE_COUNT, STEREO_VIEW_COUNT};
pub use device::{BufferId, FrameTargets, ProgramId, RasterState, RenderDevice, ShaderStage, SurfaceId};
pub use recording::{DeviceCommand, RecordingDevice};
pub use dispatch::{FrameStats, MaterialBinding, MeshBufferCache, MeshBuffers, RenderSystem};

use crate::ecs::components::MeshValidationError;
use crate::ecs::EcsError;
use thiserror::Error;

/// Render system errors
#[derive(Error, Debug)]
pub enum RenderError {
    /// A component or entity reference did not resolve
    #[error("Scene data error: {0}")]
    Ecs(#[from] EcsError),

    /// A material payload was read under the wrong kind
    #[error("Material error: {0}")]
    Material(#[from] MaterialError),

    /// The shaders are compiled for a fixed number of view instances
    #[error("Shaders support {expected} view instances, got {actual}")]
    ViewCount {
        /// Views the shaders are compiled for
        expected: usize,
        /// Views supplied for this frame
        actual: usize,
    },

    /// An entity's model matrix cannot be inverted for its normal matrix
    #[error("Model matrix of entity {entity} is not invertible")]
    SingularTransform {
        /// Index of the offending entity
        entity: usize,
    },

    /// A mesh's attributes or indices do not describe a drawable triangle list
    #[error("Mesh {index} cannot be drawn: {source}")]
    InvalidMesh {
        /// Position of the mesh in the component array
        index: usize,
        /// Violated invariant
        #[source]
        source: MeshValidationError,
    },

    /// Renderer configuration rejected at startup
    #[error("Renderer initialization failed: {0}")]
    InitializationFailed(String),

    /// Resource creation or upload failed on the device
    #[error("Resource creation failed: {0}")]
    ResourceCreationFailed(String),

    /// A bind or draw call failed on the device
    #[error("Rendering failed: {0}")]
    RenderingFailed(String),
}

/// Result type for render operations
pub type RenderResult<T> = Result<T, RenderError>;
