//! Recording device
//!
//! A [`RenderDevice`] that performs no GPU work and keeps a log of every call
//! instead. Used by the headless driver and by tests that check the exact
//! dispatch sequence.

use std::collections::HashMap;

use crate::core::config::ShaderConfig;
use crate::render::device::{BufferId, FrameTargets, ProgramId, RasterState, RenderDevice, ShaderStage, SurfaceId};
use crate::render::vertex::{Vertex, VertexAttribute};
use crate::render::{RenderError, RenderResult};

/// One recorded device call
#[derive(Debug, Clone, PartialEq)]
#[allow(missing_docs)]
pub enum DeviceCommand {
    CreateProgram { program: ProgramId, vertex_shader: String, pixel_shader: String, attributes: usize },
    CreateVertexBuffer { buffer: BufferId, vertex_count: usize },
    CreateIndexBuffer { buffer: BufferId, index_count: usize },
    CreateConstantBuffer { buffer: BufferId, size: usize },
    UpdateConstantBuffer { buffer: BufferId, size: usize },
    BeginFrame { color: SurfaceId, depth: SurfaceId, clear_color: [f32; 4], depth_clear: f32 },
    BindProgram(ProgramId),
    BindConstantBuffer { stage: ShaderStage, slot: u32, buffer: BufferId },
    BindVertexBuffer { buffer: BufferId, stride: u32 },
    BindIndexBuffer(BufferId),
    SetRasterState(RasterState),
    DrawIndexedInstanced { index_count: u32, instance_count: u32 },
}

/// Device that records calls instead of executing them
#[derive(Debug, Default)]
pub struct RecordingDevice {
    commands: Vec<DeviceCommand>,
    next_id: u32,
    vertex_buffers: HashMap<BufferId, Vec<Vertex>>,
    index_buffers: HashMap<BufferId, Vec<u32>>,
    constant_buffers: HashMap<BufferId, Vec<u8>>,
    fail_draws: bool,
}

impl RecordingDevice {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call recorded so far, oldest first
    pub fn commands(&self) -> &[DeviceCommand] {
        &self.commands
    }

    /// Drop the recorded calls, keeping created resources
    pub fn clear_commands(&mut self) {
        self.commands.clear();
    }

    /// Contents a vertex buffer was created with
    pub fn vertex_data(&self, buffer: BufferId) -> Option<&[Vertex]> {
        self.vertex_buffers.get(&buffer).map(Vec::as_slice)
    }

    /// Contents an index buffer was created with
    pub fn index_data(&self, buffer: BufferId) -> Option<&[u32]> {
        self.index_buffers.get(&buffer).map(Vec::as_slice)
    }

    /// Last bytes uploaded to a constant buffer
    pub fn constant_data(&self, buffer: BufferId) -> Option<&[u8]> {
        self.constant_buffers.get(&buffer).map(Vec::as_slice)
    }

    /// Make every subsequent draw call fail
    pub fn set_fail_draws(&mut self, fail: bool) {
        self.fail_draws = fail;
    }

    /// Number of draw calls recorded
    pub fn draw_count(&self) -> usize {
        self.commands.iter().filter(|c| matches!(c, DeviceCommand::DrawIndexedInstanced { .. })).count()
    }

    fn allocate_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

impl RenderDevice for RecordingDevice {
    fn create_program(&mut self, shaders: &ShaderConfig, layout: &[VertexAttribute]) -> RenderResult<ProgramId> {
        if layout.is_empty() {
            return Err(RenderError::ResourceCreationFailed("Empty vertex input layout".to_string()));
        }
        let program = ProgramId(self.allocate_id());
        self.commands.push(DeviceCommand::CreateProgram {
            program,
            vertex_shader: shaders.vertex_shader_path.clone(),
            pixel_shader: shaders.pixel_shader_path.clone(),
            attributes: layout.len(),
        });
        Ok(program)
    }

    fn create_vertex_buffer(&mut self, vertices: &[Vertex]) -> RenderResult<BufferId> {
        let buffer = BufferId(self.allocate_id());
        self.vertex_buffers.insert(buffer, vertices.to_vec());
        self.commands.push(DeviceCommand::CreateVertexBuffer { buffer, vertex_count: vertices.len() });
        Ok(buffer)
    }

    fn create_index_buffer(&mut self, indices: &[u32]) -> RenderResult<BufferId> {
        let buffer = BufferId(self.allocate_id());
        self.index_buffers.insert(buffer, indices.to_vec());
        self.commands.push(DeviceCommand::CreateIndexBuffer { buffer, index_count: indices.len() });
        Ok(buffer)
    }

    fn create_constant_buffer(&mut self, size: usize) -> RenderResult<BufferId> {
        if size % 16 != 0 {
            return Err(RenderError::ResourceCreationFailed(format!(
                "Constant buffer size {size} is not a multiple of 16"
            )));
        }
        let buffer = BufferId(self.allocate_id());
        self.constant_buffers.insert(buffer, vec![0; size]);
        self.commands.push(DeviceCommand::CreateConstantBuffer { buffer, size });
        Ok(buffer)
    }

    fn update_constant_buffer(&mut self, buffer: BufferId, data: &[u8]) -> RenderResult<()> {
        let contents = self
            .constant_buffers
            .get_mut(&buffer)
            .ok_or_else(|| RenderError::RenderingFailed(format!("Unknown constant buffer {buffer:?}")))?;
        if contents.len() != data.len() {
            return Err(RenderError::RenderingFailed(format!(
                "Constant buffer {buffer:?} holds {} bytes, got {}",
                contents.len(),
                data.len()
            )));
        }
        contents.copy_from_slice(data);
        self.commands.push(DeviceCommand::UpdateConstantBuffer { buffer, size: data.len() });
        Ok(())
    }

    fn begin_frame(&mut self, targets: &FrameTargets, clear_color: [f32; 4], reversed_z: bool) -> RenderResult<()> {
        self.commands.push(DeviceCommand::BeginFrame {
            color: targets.color,
            depth: targets.depth,
            clear_color,
            depth_clear: if reversed_z { 0.0 } else { 1.0 },
        });
        Ok(())
    }

    fn bind_program(&mut self, program: ProgramId) -> RenderResult<()> {
        self.commands.push(DeviceCommand::BindProgram(program));
        Ok(())
    }

    fn bind_constant_buffer(&mut self, stage: ShaderStage, slot: u32, buffer: BufferId) -> RenderResult<()> {
        self.commands.push(DeviceCommand::BindConstantBuffer { stage, slot, buffer });
        Ok(())
    }

    fn bind_vertex_buffer(&mut self, buffer: BufferId, stride: u32) -> RenderResult<()> {
        self.commands.push(DeviceCommand::BindVertexBuffer { buffer, stride });
        Ok(())
    }

    fn bind_index_buffer(&mut self, buffer: BufferId) -> RenderResult<()> {
        self.commands.push(DeviceCommand::BindIndexBuffer(buffer));
        Ok(())
    }

    fn set_raster_state(&mut self, state: RasterState) -> RenderResult<()> {
        self.commands.push(DeviceCommand::SetRasterState(state));
        Ok(())
    }

    fn draw_indexed_instanced(&mut self, index_count: u32, instance_count: u32) -> RenderResult<()> {
        if self.fail_draws {
            return Err(RenderError::RenderingFailed("Device lost".to_string()));
        }
        self.commands.push(DeviceCommand::DrawIndexedInstanced { index_count, instance_count });
        Ok(())
    }
}
