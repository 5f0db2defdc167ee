//! Per-frame draw dispatch
//!
//! [`RenderSystem::render_frame`] walks the mesh array once and issues one
//! instanced draw per active mesh, covering both eyes. Program changes are
//! tracked by [`MaterialBinding`] so consecutive meshes of the same shading
//! model share one bind.

use crate::core::config::{RendererConfig, ShaderConfig};
use crate::ecs::components::{MeshComponent, PointLightComponent};
use crate::ecs::{Component, World};
use crate::foundation::logging::{debug, info, trace, warn};
use crate::foundation::math::{normal_matrix, to_column_array, Vec3};
use crate::render::constants::{LightSlots, PbrConstants, PhongConstants, TransformConstants};
use crate::render::device::{BufferId, FrameTargets, ProgramId, RasterState, RenderDevice, ShaderStage};
use crate::render::lighting::gather_point_lights;
use crate::render::material::{MaterialHandle, MaterialKind};
use crate::render::stereo::{ViewProjection, STEREO_INSTANCE_COUNT, STEREO_VIEW_COUNT};
use crate::render::vertex::{build_vertex_data, VERTEX_LAYOUT, VERTEX_STRIDE};
use crate::render::{RenderError, RenderResult};

/// Constant buffer slot for transforms (vertex stage) and materials (pixel stage)
const CONSTANT_SLOT: u32 = 0;

/// Which shading model's program is currently bound
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MaterialBinding {
    /// Start of frame
    #[default]
    NoMaterialBound,
    /// PBR program and constants bound
    PbrBound,
    /// Phong program and constants bound
    PhongBound,
}

impl MaterialBinding {
    /// State reached by drawing a material of `kind`
    pub const fn for_kind(kind: MaterialKind) -> Self {
        match kind {
            MaterialKind::Pbr => Self::PbrBound,
            MaterialKind::Phong => Self::PhongBound,
        }
    }

    /// Whether drawing `kind` from this state needs a program bind
    pub fn needs_bind(self, kind: MaterialKind) -> bool {
        self != Self::for_kind(kind)
    }
}

/// Device buffers built for one mesh
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeshBuffers {
    /// Interleaved vertices
    pub vertex: BufferId,
    /// Triangle list indices
    pub index: BufferId,
    /// Number of indices to draw
    pub index_count: u32,
}

/// Lazily built device buffers, keyed by position in the mesh array.
///
/// Mesh geometry is treated as immutable once drawn. Code that edits a
/// mesh's attributes afterwards calls [`MeshBufferCache::invalidate`] so the
/// next frame rebuilds it.
#[derive(Debug, Default)]
pub struct MeshBufferCache {
    entries: Vec<Option<MeshBuffers>>,
}

impl MeshBufferCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffers for mesh `index`, if built
    pub fn get(&self, index: usize) -> Option<MeshBuffers> {
        self.entries.get(index).copied().flatten()
    }

    /// Forget the buffers of mesh `index`
    pub fn invalidate(&mut self, index: usize) {
        if let Some(entry) = self.entries.get_mut(index) {
            *entry = None;
        }
    }

    /// Number of meshes with buffers
    pub fn len(&self) -> usize {
        self.entries.iter().flatten().count()
    }

    /// Whether no mesh has buffers yet
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Buffers for mesh `index`, creating them on first use.
    ///
    /// The mesh is validated before anything is uploaded. The flag is true
    /// when buffers were created by this call.
    fn get_or_create<D: RenderDevice>(
        &mut self,
        device: &mut D,
        index: usize,
        mesh: &MeshComponent,
    ) -> RenderResult<(MeshBuffers, bool)> {
        if let Some(buffers) = self.get(index) {
            return Ok((buffers, false));
        }

        mesh.validate().map_err(|source| RenderError::InvalidMesh { index, source })?;

        let index_count = u32::try_from(mesh.indices.len()).map_err(|_| {
            RenderError::ResourceCreationFailed(format!("Mesh {index} has too many indices for 32-bit draws"))
        })?;
        let vertices = build_vertex_data(mesh);
        let buffers = MeshBuffers {
            vertex: device.create_vertex_buffer(&vertices)?,
            index: device.create_index_buffer(&mesh.indices)?,
            index_count,
        };
        debug!("Created buffers for mesh {}: {} vertices, {} indices", index, vertices.len(), index_count);

        if self.entries.len() <= index {
            self.entries.resize(index + 1, None);
        }
        self.entries[index] = Some(buffers);
        Ok((buffers, true))
    }
}

/// Work done by one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Instanced draw calls issued
    pub draws: usize,
    /// Program switches between shading models
    pub material_binds: usize,
    /// Meshes whose buffers were built this frame
    pub buffers_created: usize,
    /// Point lights packed into the pixel constants
    pub point_lights: usize,
}

#[derive(Debug, Clone, Copy)]
struct MaterialPipeline {
    program: ProgramId,
    constants: BufferId,
}

impl MaterialPipeline {
    fn create<D: RenderDevice>(device: &mut D, shaders: &ShaderConfig, constants_size: usize) -> RenderResult<Self> {
        Ok(Self {
            program: device.create_program(shaders, &VERTEX_LAYOUT)?,
            constants: device.create_constant_buffer(constants_size)?,
        })
    }

    fn bind<D: RenderDevice>(&self, device: &mut D) -> RenderResult<()> {
        device.bind_program(self.program)?;
        device.bind_constant_buffer(ShaderStage::Pixel, CONSTANT_SLOT, self.constants)
    }
}

/// Engine-side render front-end over a [`RenderDevice`]
pub struct RenderSystem<D: RenderDevice> {
    device: D,
    clear_color: [f32; 4],
    pbr: MaterialPipeline,
    phong: MaterialPipeline,
    transform_constants: BufferId,
    mesh_buffers: MeshBufferCache,
    dropped_lights: usize,
}

impl<D: RenderDevice> RenderSystem<D> {
    /// Create both shader programs and the constant buffers
    pub fn new(mut device: D, config: &RendererConfig) -> RenderResult<Self> {
        config.validate().map_err(RenderError::InitializationFailed)?;

        let pbr = MaterialPipeline::create(&mut device, &config.pbr_shaders, std::mem::size_of::<PbrConstants>())?;
        let phong =
            MaterialPipeline::create(&mut device, &config.phong_shaders, std::mem::size_of::<PhongConstants>())?;
        let transform_constants = device.create_constant_buffer(std::mem::size_of::<TransformConstants>())?;

        info!(
            "Render system ready: PBR '{}', Phong '{}'",
            config.pbr_shaders.pixel_shader_path, config.phong_shaders.pixel_shader_path
        );

        Ok(Self {
            device,
            clear_color: config.clear_color,
            pbr,
            phong,
            transform_constants,
            mesh_buffers: MeshBufferCache::new(),
            dropped_lights: 0,
        })
    }

    /// The underlying device
    pub fn device(&self) -> &D {
        &self.device
    }

    /// The underlying device, mutably
    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    /// Consume the system and return the device
    pub fn into_device(self) -> D {
        self.device
    }

    /// Buffers built so far
    pub fn mesh_buffers(&self) -> &MeshBufferCache {
        &self.mesh_buffers
    }

    /// Rebuild mesh `index` on its next draw
    pub fn invalidate_mesh(&mut self, index: usize) {
        self.mesh_buffers.invalidate(index);
    }

    /// Draw every active mesh in `world` into `targets` for both views
    pub fn render_frame(
        &mut self,
        targets: &FrameTargets,
        views: &[ViewProjection],
        world: &World,
    ) -> RenderResult<FrameStats> {
        let views: &[ViewProjection; STEREO_VIEW_COUNT] = views
            .try_into()
            .map_err(|_| RenderError::ViewCount { expected: STEREO_VIEW_COUNT, actual: views.len() })?;

        self.device.begin_frame(targets, self.clear_color, views[0].is_reversed_z())?;
        self.device.bind_constant_buffer(ShaderStage::Vertex, CONSTANT_SLOT, self.transform_constants)?;

        let lights = gather_point_lights(&world.entities, world.components.all::<PointLightComponent>())?;
        if lights.dropped != self.dropped_lights {
            if lights.dropped > 0 {
                warn!("{} point lights exceed the shader limit and are ignored", lights.dropped);
            }
            self.dropped_lights = lights.dropped;
        }

        let camera_position = views[0].pose.position;
        let mut transforms = TransformConstants::for_views(views);
        let mut binding = MaterialBinding::default();
        let mut stats = FrameStats { point_lights: lights.count, ..FrameStats::default() };

        for (index, mesh) in world.components.all::<MeshComponent>().iter().enumerate() {
            if !mesh.is_active() {
                continue;
            }

            let (buffers, created) = self.mesh_buffers.get_or_create(&mut self.device, index, mesh)?;
            if created {
                stats.buffers_created += 1;
            }

            let parent = mesh.parent();
            let model = world.entity(parent)?.model_matrix();
            let normal = normal_matrix(&model).map_err(|_| RenderError::SingularTransform { entity: parent.index() })?;
            transforms.model = to_column_array(&model);
            transforms.normal = to_column_array(&normal);
            self.device.update_constant_buffer(self.transform_constants, bytemuck::bytes_of(&transforms))?;

            binding = self.bind_material(binding, &mesh.material, &camera_position, &lights.slots, &mut stats)?;

            self.device.set_raster_state(RasterState::for_wireframe(mesh.wireframe))?;
            self.device.bind_vertex_buffer(buffers.vertex, VERTEX_STRIDE)?;
            self.device.bind_index_buffer(buffers.index)?;
            self.device.draw_indexed_instanced(buffers.index_count, STEREO_INSTANCE_COUNT)?;
            stats.draws += 1;
            trace!("Drew mesh {} ({} indices, {:?})", index, buffers.index_count, binding);
        }

        Ok(stats)
    }

    fn bind_material(
        &mut self,
        binding: MaterialBinding,
        material: &MaterialHandle,
        camera_position: &Vec3,
        lights: &LightSlots,
        stats: &mut FrameStats,
    ) -> RenderResult<MaterialBinding> {
        let kind = material.kind();
        let pipeline = match kind {
            MaterialKind::Pbr => self.pbr,
            MaterialKind::Phong => self.phong,
        };
        if binding.needs_bind(kind) {
            pipeline.bind(&mut self.device)?;
            stats.material_binds += 1;
        }

        match material {
            MaterialHandle::Pbr(data) => {
                let constants = PbrConstants::new(data, camera_position, lights);
                self.device.update_constant_buffer(pipeline.constants, bytemuck::bytes_of(&constants))?;
            }
            MaterialHandle::Phong(data) => {
                let constants = PhongConstants::new(data, camera_position, lights);
                self.device.update_constant_buffer(pipeline.constants, bytemuck::bytes_of(&constants))?;
            }
        }

        Ok(MaterialBinding::for_kind(kind))
    }
}
