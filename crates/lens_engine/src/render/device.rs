//! Device abstraction
//!
//! The engine never talks to a graphics API directly. Whatever owns the
//! swapchain and the shader compiler implements [`RenderDevice`]; the render
//! system drives it through the narrow set of calls below.

use bitflags::bitflags;

use crate::core::config::ShaderConfig;
use crate::render::vertex::{Vertex, VertexAttribute};
use crate::render::RenderResult;

/// Handle to a device buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferId(pub u32);

/// Handle to a linked vertex/pixel shader program with its input layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProgramId(pub u32);

/// Handle to a host-owned render target or depth surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceId(pub u32);

/// Color and depth targets for one frame, owned by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameTargets {
    /// Stereo color array
    pub color: SurfaceId,
    /// Stereo depth array
    pub depth: SurfaceId,
}

/// Pipeline stage a constant buffer is bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    /// Vertex shader
    Vertex,
    /// Pixel shader
    Pixel,
}

bitflags! {
    /// Rasterizer state for a draw
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct RasterState: u32 {
        /// Draw triangle edges only
        const WIREFRAME = 1 << 0;
        /// Discard back-facing triangles
        const CULL_BACK = 1 << 1;
    }
}

impl RasterState {
    /// Filled triangles with back-face culling
    pub const SOLID: Self = Self::CULL_BACK;

    /// Wireframe meshes are drawn without culling
    pub const fn for_wireframe(wireframe: bool) -> Self {
        if wireframe { Self::WIREFRAME } else { Self::SOLID }
    }
}

/// Graphics device driven by the render system.
///
/// Resource creation happens lazily from inside a frame, so every call may
/// fail and report it through [`RenderResult`].
pub trait RenderDevice {
    /// Compile and link a shader program for the given vertex layout
    fn create_program(&mut self, shaders: &ShaderConfig, layout: &[VertexAttribute]) -> RenderResult<ProgramId>;

    /// Create an immutable vertex buffer
    fn create_vertex_buffer(&mut self, vertices: &[Vertex]) -> RenderResult<BufferId>;

    /// Create an immutable 32-bit index buffer
    fn create_index_buffer(&mut self, indices: &[u32]) -> RenderResult<BufferId>;

    /// Create a constant buffer of `size` bytes
    fn create_constant_buffer(&mut self, size: usize) -> RenderResult<BufferId>;

    /// Overwrite a constant buffer's contents
    fn update_constant_buffer(&mut self, buffer: BufferId, data: &[u8]) -> RenderResult<()>;

    /// Bind and clear the frame targets; depth clears to 0 when reversed
    fn begin_frame(&mut self, targets: &FrameTargets, clear_color: [f32; 4], reversed_z: bool) -> RenderResult<()>;

    /// Make a program current
    fn bind_program(&mut self, program: ProgramId) -> RenderResult<()>;

    /// Bind a constant buffer to a stage slot
    fn bind_constant_buffer(&mut self, stage: ShaderStage, slot: u32, buffer: BufferId) -> RenderResult<()>;

    /// Bind a vertex buffer to input slot 0
    fn bind_vertex_buffer(&mut self, buffer: BufferId, stride: u32) -> RenderResult<()>;

    /// Bind an index buffer
    fn bind_index_buffer(&mut self, buffer: BufferId) -> RenderResult<()>;

    /// Set the rasterizer state
    fn set_raster_state(&mut self, state: RasterState) -> RenderResult<()>;

    /// Draw an indexed triangle list `instance_count` times
    fn draw_indexed_instanced(&mut self, index_count: u32, instance_count: u32) -> RenderResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wireframe_disables_culling() {
        assert_eq!(RasterState::for_wireframe(true), RasterState::WIREFRAME);
        assert!(!RasterState::for_wireframe(true).contains(RasterState::CULL_BACK));
        assert!(RasterState::for_wireframe(false).contains(RasterState::CULL_BACK));
    }
}
