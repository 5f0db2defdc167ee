//! Dispatch sequence tests against the recording device

use approx::assert_relative_eq;
use std::f32::consts::FRAC_PI_4;

use crate::core::config::RendererConfig;
use crate::ecs::components::{MeshComponent, MeshValidationError, PointLightComponent};
use crate::ecs::{EntityReference, World};
use crate::foundation::math::{compose_model_matrix, normal_matrix, yaw_rotation, Color, Mat4, Vec2, Vec3, Vec4};
use crate::render::{
    DeviceCommand, Fov, FrameTargets, MaterialHandle, NearFar, PbrConstants, PbrMaterialData, PhongMaterialData,
    Pose, RecordingDevice, RenderError, RenderSystem, ShaderStage, SurfaceId, TransformConstants, ViewProjection,
};

const TARGETS: FrameTargets = FrameTargets { color: SurfaceId(100), depth: SurfaceId(101) };

fn stereo_views() -> Vec<ViewProjection> {
    [-0.032, 0.032]
        .into_iter()
        .map(|x| ViewProjection {
            pose: Pose { position: Vec3::new(x, 0.0, 0.0), ..Pose::default() },
            fov: Fov::symmetric(FRAC_PI_4, FRAC_PI_4),
            near_far: NearFar { near: 20.0, far: 0.1 },
        })
        .collect()
}

fn triangle(material: MaterialHandle, uvs: Vec<Vec2>) -> MeshComponent {
    MeshComponent::new(
        vec![Vec3::new(0.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 0.0)],
        vec![Vec3::z(); 3],
        uvs,
        vec![0, 1, 2],
        material,
    )
}

fn red_pbr() -> MaterialHandle {
    MaterialHandle::from(PbrMaterialData {
        albedo: Color::new(1.0, 0.0, 0.0),
        alpha: 1.0,
        roughness: 0.5,
        ior: 1.5,
        ambient_occlusion: 1.0,
        metalness: 0.0,
    })
}

fn spawn_mesh(world: &mut World, material: MaterialHandle) -> EntityReference {
    let entity = world.create_entity();
    world.register_component(entity, triangle(material, Vec::new())).unwrap();
    entity
}

fn renderer() -> RenderSystem<RecordingDevice> {
    let mut renderer = RenderSystem::new(RecordingDevice::new(), &RendererConfig::default()).unwrap();
    renderer.device_mut().clear_commands();
    renderer
}

fn program_of(device: &RecordingDevice, pixel_shader: &str) -> DeviceCommand {
    let program = device
        .commands()
        .iter()
        .find_map(|command| match command {
            DeviceCommand::CreateProgram { program, pixel_shader: path, .. } if path == pixel_shader => Some(*program),
            _ => None,
        })
        .unwrap();
    DeviceCommand::BindProgram(program)
}

fn binds(renderer: &RenderSystem<RecordingDevice>) -> Vec<DeviceCommand> {
    renderer
        .device()
        .commands()
        .iter()
        .filter(|command| matches!(command, DeviceCommand::BindProgram(_)))
        .cloned()
        .collect()
}

fn pixel_pbr_constants(renderer: &RenderSystem<RecordingDevice>) -> PbrConstants {
    let pixel_buffer = renderer
        .device()
        .commands()
        .iter()
        .find_map(|command| match command {
            DeviceCommand::BindConstantBuffer { stage: ShaderStage::Pixel, buffer, .. } => Some(*buffer),
            _ => None,
        })
        .unwrap();
    bytemuck::pod_read_unaligned(renderer.device().constant_data(pixel_buffer).unwrap())
}

#[test]
fn test_pbr_triangle_with_short_uvs() {
    let mut world = World::new();
    let entity = world.create_entity();
    world
        .register_component(entity, triangle(red_pbr(), vec![Vec2::new(0.1, 0.2), Vec2::new(0.3, 0.4)]))
        .unwrap();

    let device = RecordingDevice::new();
    let mut renderer = RenderSystem::new(device, &RendererConfig::default()).unwrap();
    let bind_pbr = program_of(renderer.device(), "PBRPixelShader.cso");
    renderer.device_mut().clear_commands();

    let stats = renderer.render_frame(&TARGETS, &stereo_views(), &world).unwrap();
    assert_eq!(stats.draws, 1);
    assert_eq!(stats.material_binds, 1);
    assert_eq!(stats.buffers_created, 1);

    let buffers = renderer.mesh_buffers().get(0).unwrap();
    let vertices = renderer.device().vertex_data(buffers.vertex).unwrap();
    assert_eq!(vertices[0].tex_coord, [0.1, 0.2]);
    assert_eq!(vertices[1].tex_coord, [0.3, 0.4]);
    assert_eq!(vertices[2].tex_coord, [0.0, 0.0]);

    assert_eq!(binds(&renderer), vec![bind_pbr]);
    let commands = renderer.device().commands();
    assert!(matches!(commands.last(), Some(DeviceCommand::DrawIndexedInstanced { index_count: 3, instance_count: 2 })));
}

#[test]
fn test_pbr_constants_reach_pixel_stage() {
    let mut world = World::new();
    spawn_mesh(&mut world, red_pbr());
    let light = world.create_entity();
    world.entity_mut(light).unwrap().position = Vec3::new(1.0, 0.0, 1.0);
    world.register_component(light, PointLightComponent::new(100.0)).unwrap();

    let mut renderer = renderer();
    renderer.render_frame(&TARGETS, &stereo_views(), &world).unwrap();

    let constants = pixel_pbr_constants(&renderer);

    assert_eq!(constants.albedo, [1.0, 0.0, 0.0]);
    assert_eq!(constants.roughness, 0.5);
    assert_eq!(constants.point_lights[0], [1.0, 0.0, 1.0, 100.0]);
    assert_eq!(constants.point_lights[1], [0.0; 4]);
    assert_eq!(constants.camera_position, [-0.032, 0.0, 0.0]);
}

#[test]
fn test_material_switches_follow_array_order() {
    let phong = MaterialHandle::from(PhongMaterialData::default());
    let mut world = World::new();
    spawn_mesh(&mut world, red_pbr());
    spawn_mesh(&mut world, red_pbr());
    spawn_mesh(&mut world, phong);
    spawn_mesh(&mut world, red_pbr());

    let device = RecordingDevice::new();
    let mut renderer = RenderSystem::new(device, &RendererConfig::default()).unwrap();
    let bind_pbr = program_of(renderer.device(), "PBRPixelShader.cso");
    let bind_phong = program_of(renderer.device(), "PhongPixelShader.cso");
    renderer.device_mut().clear_commands();

    let stats = renderer.render_frame(&TARGETS, &stereo_views(), &world).unwrap();

    assert_eq!(stats.draws, 4);
    assert_eq!(stats.material_binds, 3);
    assert_eq!(binds(&renderer), vec![bind_pbr.clone(), bind_phong, bind_pbr]);
}

#[test]
fn test_binding_state_resets_each_frame() {
    let mut world = World::new();
    spawn_mesh(&mut world, red_pbr());
    let mut renderer = renderer();

    renderer.render_frame(&TARGETS, &stereo_views(), &world).unwrap();
    let second = renderer.render_frame(&TARGETS, &stereo_views(), &world).unwrap();

    assert_eq!(second.material_binds, 1);
    assert_eq!(binds(&renderer).len(), 2);
}

#[test]
fn test_buffers_built_once_per_mesh() {
    let mut world = World::new();
    spawn_mesh(&mut world, red_pbr());
    spawn_mesh(&mut world, red_pbr());
    let mut renderer = renderer();

    let first = renderer.render_frame(&TARGETS, &stereo_views(), &world).unwrap();
    let second = renderer.render_frame(&TARGETS, &stereo_views(), &world).unwrap();
    assert_eq!(first.buffers_created, 2);
    assert_eq!(second.buffers_created, 0);

    renderer.invalidate_mesh(1);
    let third = renderer.render_frame(&TARGETS, &stereo_views(), &world).unwrap();
    assert_eq!(third.buffers_created, 1);
    assert_eq!(renderer.mesh_buffers().len(), 2);
}

#[test]
fn test_inactive_mesh_is_skipped() {
    let mut world = World::new();
    spawn_mesh(&mut world, red_pbr());
    spawn_mesh(&mut world, red_pbr());
    world.components.all_mut::<MeshComponent>()[0].base.active = false;
    let mut renderer = renderer();

    let stats = renderer.render_frame(&TARGETS, &stereo_views(), &world).unwrap();

    assert_eq!(stats.draws, 1);
    assert!(renderer.mesh_buffers().get(0).is_none());
    assert!(renderer.mesh_buffers().get(1).is_some());
}

#[test]
fn test_wrong_view_count_is_rejected() {
    let mut world = World::new();
    spawn_mesh(&mut world, red_pbr());
    let mut renderer = renderer();
    let mono = &stereo_views()[..1];

    let result = renderer.render_frame(&TARGETS, mono, &world);

    assert!(matches!(result, Err(RenderError::ViewCount { expected: 2, actual: 1 })));
    assert_eq!(renderer.device().draw_count(), 0);
}

#[test]
fn test_reversed_z_clears_depth_to_zero() {
    let world = World::new();
    let mut renderer = renderer();
    renderer.render_frame(&TARGETS, &stereo_views(), &world).unwrap();

    assert!(matches!(
        renderer.device().commands().first(),
        Some(DeviceCommand::BeginFrame { depth_clear, .. }) if *depth_clear == 0.0
    ));
}

#[test]
fn test_transform_upload_precedes_material_bind() {
    let mut world = World::new();
    spawn_mesh(&mut world, red_pbr());
    let mut renderer = renderer();
    renderer.render_frame(&TARGETS, &stereo_views(), &world).unwrap();

    let commands = renderer.device().commands();
    let create = commands.iter().position(|c| matches!(c, DeviceCommand::CreateVertexBuffer { .. })).unwrap();
    let upload = commands.iter().position(|c| matches!(c, DeviceCommand::UpdateConstantBuffer { .. })).unwrap();
    let bind = commands.iter().position(|c| matches!(c, DeviceCommand::BindProgram(_))).unwrap();
    let draw = commands.iter().position(|c| matches!(c, DeviceCommand::DrawIndexedInstanced { .. })).unwrap();

    assert!(create < upload && upload < bind && bind < draw);
}

#[test]
fn test_non_uniform_scale_normal_matrix_uploaded() {
    let mut world = World::new();
    let entity = spawn_mesh(&mut world, red_pbr());
    {
        let entity = world.entity_mut(entity).unwrap();
        entity.position = Vec3::new(0.0, 0.0, -2.0);
        entity.rotation = yaw_rotation(0.4);
        entity.scale = Vec3::new(2.0, 1.0, 1.0);
    }
    let mut renderer = renderer();
    renderer.render_frame(&TARGETS, &stereo_views(), &world).unwrap();

    let vertex_buffer = renderer
        .device()
        .commands()
        .iter()
        .find_map(|command| match command {
            DeviceCommand::BindConstantBuffer { stage: ShaderStage::Vertex, buffer, .. } => Some(*buffer),
            _ => None,
        })
        .unwrap();
    let constants: TransformConstants =
        bytemuck::pod_read_unaligned(renderer.device().constant_data(vertex_buffer).unwrap());

    let model = compose_model_matrix(&Vec3::new(0.0, 0.0, -2.0), &yaw_rotation(0.4), &Vec3::new(2.0, 1.0, 1.0));
    let expected = model.try_inverse().unwrap().transpose();
    let uploaded = Mat4::from_fn(|row, col| constants.normal[col][row]);
    assert_relative_eq!(uploaded, expected, epsilon = 1e-5);

    // A plane with normal (1,1,0) keeps its normal perpendicular to transformed tangents
    let normal = Vec4::new(1.0, 1.0, 0.0, 0.0);
    let tangents = [Vec4::new(1.0, -1.0, 0.0, 0.0), Vec4::new(0.0, 0.0, 1.0, 0.0)];
    let transformed_normal = normal_matrix(&model).unwrap() * normal;
    for tangent in tangents {
        assert_relative_eq!(transformed_normal.dot(&(model * tangent)), 0.0, epsilon = 1e-5);
    }
}

#[test]
fn test_zero_scale_is_reported() {
    let mut world = World::new();
    let entity = spawn_mesh(&mut world, red_pbr());
    world.entity_mut(entity).unwrap().scale = Vec3::new(0.0, 1.0, 1.0);
    let mut renderer = renderer();

    let result = renderer.render_frame(&TARGETS, &stereo_views(), &world);

    assert!(matches!(result, Err(RenderError::SingularTransform { entity: 0 })));
}

#[test]
fn test_device_failure_propagates() {
    let mut world = World::new();
    spawn_mesh(&mut world, red_pbr());
    let mut renderer = renderer();
    renderer.device_mut().set_fail_draws(true);

    let result = renderer.render_frame(&TARGETS, &stereo_views(), &world);

    assert!(matches!(result, Err(RenderError::RenderingFailed(_))));
}

#[test]
fn test_quad_draws_all_six_indices() {
    let mut world = World::new();
    let entity = world.create_entity();
    let quad = MeshComponent::new(
        vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ],
        vec![Vec3::z(); 4],
        Vec::new(),
        vec![0, 1, 2, 0, 2, 3],
        red_pbr(),
    );
    world.register_component(entity, quad).unwrap();
    let mut renderer = renderer();

    renderer.render_frame(&TARGETS, &stereo_views(), &world).unwrap();

    assert_eq!(renderer.mesh_buffers().get(0).unwrap().index_count, 6);
    let commands = renderer.device().commands();
    assert!(matches!(commands.last(), Some(DeviceCommand::DrawIndexedInstanced { index_count: 6, instance_count: 2 })));
}

#[test]
fn test_invalid_mesh_is_rejected_before_upload() {
    let mut world = World::new();
    let entity = world.create_entity();
    let broken = MeshComponent::new(
        vec![Vec3::new(0.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 0.0)],
        vec![Vec3::z(); 2],
        Vec::new(),
        vec![0, 1, 5],
        red_pbr(),
    );
    world.register_component(entity, broken).unwrap();
    let mut renderer = renderer();

    let result = renderer.render_frame(&TARGETS, &stereo_views(), &world);

    assert!(matches!(
        result,
        Err(RenderError::InvalidMesh {
            index: 0,
            source: MeshValidationError::NormalCountMismatch { vertices: 3, normals: 2 }
        })
    ));
    assert_eq!(renderer.device().draw_count(), 0);
    assert!(renderer.mesh_buffers().is_empty());
    assert!(!renderer
        .device()
        .commands()
        .iter()
        .any(|command| matches!(command, DeviceCommand::CreateVertexBuffer { .. } | DeviceCommand::CreateIndexBuffer { .. })));
}

#[test]
fn test_moved_light_is_gathered_each_frame() {
    let mut world = World::new();
    spawn_mesh(&mut world, red_pbr());
    let light = world.create_entity();
    world.entity_mut(light).unwrap().position = Vec3::new(1.0, 0.0, 1.0);
    world.register_component(light, PointLightComponent::new(1.0)).unwrap();
    let mut renderer = renderer();

    renderer.render_frame(&TARGETS, &stereo_views(), &world).unwrap();
    assert_eq!(pixel_pbr_constants(&renderer).point_lights[0], [1.0, 0.0, 1.0, 1.0]);

    world.entity_mut(light).unwrap().position = Vec3::new(3.0, 4.0, 5.0);
    renderer.device_mut().clear_commands();
    renderer.render_frame(&TARGETS, &stereo_views(), &world).unwrap();

    assert_eq!(pixel_pbr_constants(&renderer).point_lights[0], [3.0, 4.0, 5.0, 1.0]);
}
