//! Mesh component
//!
//! Geometry is kept as separate attribute sequences, the shape mesh files
//! deliver it in. Interleaving into GPU vertices happens in
//! [`crate::render::vertex::build_vertex_data`].

use thiserror::Error;

use crate::ecs::{Component, ComponentBase};
use crate::foundation::math::{Vec2, Vec3};
use crate::render::MaterialHandle;

/// Indexed triangle mesh with its material
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshComponent {
    /// Shared base fields
    pub base: ComponentBase,
    /// Vertex positions in model space
    pub vertices: Vec<Vec3>,
    /// Per-vertex normals, same length as `vertices`
    pub normals: Vec<Vec3>,
    /// Texture coordinates; may be shorter than `vertices`, missing ones read as (0, 0)
    pub uvs: Vec<Vec2>,
    /// Triangle list indices into the vertex attributes
    pub indices: Vec<u32>,
    /// Draw as wireframe instead of solid
    pub wireframe: bool,
    /// Recorded but not yet honoured by the rasterizer
    pub double_sided: bool,
    /// Shading model and constants
    pub material: MaterialHandle,
}

/// Reasons a mesh is rejected before registration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MeshValidationError {
    /// Normals and positions differ in count
    #[error("{normals} normals for {vertices} vertices")]
    NormalCountMismatch {
        /// Number of positions
        vertices: usize,
        /// Number of normals
        normals: usize,
    },

    /// More UVs than vertices
    #[error("{uvs} texture coordinates for {vertices} vertices")]
    UvOverflow {
        /// Number of positions
        vertices: usize,
        /// Number of texture coordinates
        uvs: usize,
    },

    /// Index list does not describe whole triangles
    #[error("{index_count} indices do not form whole triangles")]
    IncompleteTriangle {
        /// Length of the index list
        index_count: usize,
    },

    /// An index points past the vertex attributes
    #[error("index {index} out of range for {vertex_count} vertices")]
    IndexOutOfRange {
        /// Offending index value
        index: u32,
        /// Number of vertices
        vertex_count: usize,
    },
}

impl MeshComponent {
    /// Create a solid, single-sided mesh
    pub fn new(
        vertices: Vec<Vec3>,
        normals: Vec<Vec3>,
        uvs: Vec<Vec2>,
        indices: Vec<u32>,
        material: MaterialHandle,
    ) -> Self {
        Self {
            base: ComponentBase::default(),
            vertices,
            normals,
            uvs,
            indices,
            wireframe: false,
            double_sided: false,
            material,
        }
    }

    /// Set the wireframe flag
    pub fn with_wireframe(mut self, wireframe: bool) -> Self {
        self.wireframe = wireframe;
        self
    }

    /// Number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Check the attribute and index invariants
    pub fn validate(&self) -> Result<(), MeshValidationError> {
        let vertex_count = self.vertices.len();

        if self.normals.len() != vertex_count {
            return Err(MeshValidationError::NormalCountMismatch {
                vertices: vertex_count,
                normals: self.normals.len(),
            });
        }
        if self.uvs.len() > vertex_count {
            return Err(MeshValidationError::UvOverflow { vertices: vertex_count, uvs: self.uvs.len() });
        }
        if self.indices.len() % 3 != 0 {
            return Err(MeshValidationError::IncompleteTriangle { index_count: self.indices.len() });
        }
        if let Some(&index) = self.indices.iter().find(|&&i| i as usize >= vertex_count) {
            return Err(MeshValidationError::IndexOutOfRange { index, vertex_count });
        }
        Ok(())
    }
}

impl Component for MeshComponent {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }
}
