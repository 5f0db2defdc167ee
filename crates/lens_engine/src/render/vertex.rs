//! Interleaved vertex format
//!
//! Meshes store positions, normals and texture coordinates as separate
//! sequences. The GPU gets them interleaved into [`Vertex`] records described
//! by [`VERTEX_LAYOUT`].

use bytemuck::{Pod, Zeroable};

use crate::ecs::components::MeshComponent;

/// GPU vertex: position, normal and texture coordinate
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
pub struct Vertex {
    /// Model-space position
    pub position: [f32; 3],
    /// Model-space normal
    pub normal: [f32; 3],
    /// Texture coordinate
    pub tex_coord: [f32; 2],
}

/// Distance in bytes between consecutive vertices
pub const VERTEX_STRIDE: u32 = 32;

const _: () = assert!(std::mem::size_of::<Vertex>() == VERTEX_STRIDE as usize);
const _: () = assert!(std::mem::offset_of!(Vertex, position) == 0);
const _: () = assert!(std::mem::offset_of!(Vertex, normal) == 12);
const _: () = assert!(std::mem::offset_of!(Vertex, tex_coord) == 24);

/// Component format of a vertex attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertexFormat {
    /// Two 32-bit floats
    Float32x2,
    /// Three 32-bit floats
    Float32x3,
}

/// One entry of the vertex input layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttribute {
    /// Shader semantic the attribute binds to
    pub semantic: &'static str,
    /// Component format
    pub format: VertexFormat,
    /// Byte offset inside [`Vertex`]
    pub offset: u32,
}

/// Input layout matching [`Vertex`], single buffer slot, per-vertex rate
pub const VERTEX_LAYOUT: [VertexAttribute; 3] = [
    VertexAttribute { semantic: "POSITION", format: VertexFormat::Float32x3, offset: 0 },
    VertexAttribute { semantic: "NORMAL", format: VertexFormat::Float32x3, offset: 12 },
    VertexAttribute { semantic: "TEXCOORD", format: VertexFormat::Float32x2, offset: 24 },
];

/// Interleave a mesh's attributes into GPU vertices.
///
/// One vertex per position, in order. Normal `i` pairs with position `i`;
/// texture coordinates past the end of the mesh's UV list read as (0, 0).
pub fn build_vertex_data(mesh: &MeshComponent) -> Vec<Vertex> {
    mesh.vertices
        .iter()
        .zip(&mesh.normals)
        .enumerate()
        .map(|(i, (position, normal))| Vertex {
            position: [position.x, position.y, position.z],
            normal: [normal.x, normal.y, normal.z],
            tex_coord: mesh.uvs.get(i).map_or([0.0, 0.0], |uv| [uv.x, uv.y]),
        })
        .collect()
}
