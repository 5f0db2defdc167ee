//! GPU constant buffer layouts
//!
//! Every record here is uploaded verbatim, so each is `repr(C)`, padding is
//! spelled out as fields, and the total size is a multiple of 16 bytes.

use bytemuck::{Pod, Zeroable};

use crate::foundation::math::{to_column_array, Vec3};
use crate::render::material::{PbrMaterialData, PhongMaterialData};
use crate::render::stereo::{ViewProjection, STEREO_VIEW_COUNT};

/// Point lights the fragment shaders accept per frame
pub const MAX_POINT_LIGHTS: usize = 4;

/// Packed point lights: xyz position, w intensity
pub type LightSlots = [[f32; 4]; MAX_POINT_LIGHTS];

/// Column-major 4x4 matrix as laid out in constant memory
pub type GpuMatrix = [[f32; 4]; 4];

macro_rules! assert_constant_layout {
    ($($ty:ty),* $(,)?) => {
        $(const _: () = assert!(std::mem::size_of::<$ty>() % 16 == 0);)*
    };
}

assert_constant_layout!(TransformConstants, PbrConstants, PhongConstants);

/// Vertex stage constants: model, per-eye view/projection, and normal matrix
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct TransformConstants {
    /// Model matrix
    pub model: GpuMatrix,
    /// View matrix per eye
    pub view: [GpuMatrix; STEREO_VIEW_COUNT],
    /// Projection matrix per eye
    pub projection: [GpuMatrix; STEREO_VIEW_COUNT],
    /// Inverse-transpose of the model matrix
    pub normal: GpuMatrix,
}

impl TransformConstants {
    /// Constants with both eyes filled in and identity model/normal matrices
    pub fn for_views(views: &[ViewProjection; STEREO_VIEW_COUNT]) -> Self {
        let identity = to_column_array(&crate::foundation::math::Mat4::identity());
        Self {
            model: identity,
            view: [to_column_array(&views[0].view_matrix()), to_column_array(&views[1].view_matrix())],
            projection: [
                to_column_array(&views[0].projection_matrix()),
                to_column_array(&views[1].projection_matrix()),
            ],
            normal: identity,
        }
    }
}

/// Pixel stage constants for PBR materials
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
#[allow(missing_docs)]
pub struct PbrConstants {
    pub albedo: [f32; 3],
    pub alpha: f32,
    pub roughness: f32,
    pub ior: f32,
    pub ambient_occlusion: f32,
    pub metalness: f32,
    pub point_lights: LightSlots,
    pub camera_position: [f32; 3],
    /// Nonzero when a normal map is bound
    pub normal_map_enabled: f32,
}

impl PbrConstants {
    /// Fill from a material payload and the frame's camera and lights
    pub fn new(material: &PbrMaterialData, camera_position: &Vec3, point_lights: &LightSlots) -> Self {
        Self {
            albedo: material.albedo.to_array(),
            alpha: material.alpha,
            roughness: material.roughness,
            ior: material.ior,
            ambient_occlusion: material.ambient_occlusion,
            metalness: material.metalness,
            point_lights: *point_lights,
            camera_position: [camera_position.x, camera_position.y, camera_position.z],
            normal_map_enabled: 0.0,
        }
    }
}

/// Pixel stage constants for Phong materials
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
#[allow(missing_docs)]
pub struct PhongConstants {
    pub ambient: [f32; 3],
    pub alpha: f32,
    pub diffuse: [f32; 3],
    pub shininess: f32,
    pub specular: [f32; 3],
    pub _padding0: f32,
    pub camera_position: [f32; 3],
    pub _padding1: f32,
    pub point_lights: LightSlots,
}

impl PhongConstants {
    /// Fill from a material payload and the frame's camera and lights
    pub fn new(material: &PhongMaterialData, camera_position: &Vec3, point_lights: &LightSlots) -> Self {
        Self {
            ambient: material.ambient.to_array(),
            alpha: material.alpha,
            diffuse: material.diffuse.to_array(),
            shininess: material.shininess,
            specular: material.specular.to_array(),
            _padding0: 0.0,
            camera_position: [camera_position.x, camera_position.y, camera_position.z],
            _padding1: 0.0,
            point_lights: *point_lights,
        }
    }
}
