//! Integration tests for recording and playback
//!
//! These tests record pipelines through the public API and replay them
//! against a headless repository. No GPU required.
//!
//! Run with: cargo test --test pipeline_integration_tests


use tape_engine::glam::{Mat4, Vec2, Vec3, Vec4};
use tape_engine::tape::device::{
    BlendFactor, ClearFlags, ColorFormat, IndexType, PrimitiveMode,
};
use tape_engine::tape::log::LogSeverity;
use tape_engine::tape::pipeline::{MatrixSource, Pipeline};
use tape_engine::tape::resource::{Handle, ResourceManager, ShaderDesc, TextureDesc};
use test_utils::Headless;

/// Quad with 4 positions, 4 UVs and 6 indices, finalized
fn create_quad(resources: &mut ResourceManager) -> Handle {
    let mesh = resources.create_mesh("quad");
    resources.add_mesh_positions(mesh, &[
        Vec3::new(-1.0, -1.0, 0.0),
        Vec3::new(1.0, -1.0, 0.0),
        Vec3::new(1.0, 1.0, 0.0),
        Vec3::new(-1.0, 1.0, 0.0),
    ]);
    resources.add_mesh_uvs(mesh, &[Vec2::ZERO, Vec2::X, Vec2::ONE, Vec2::Y]);
    resources.add_mesh_indices(mesh, &[0, 1, 2, 2, 3, 0]);
    assert!(resources.finalize_mesh(mesh));
    mesh
}

// ============================================================================
// INTEGRATION TESTS
// ============================================================================

#[test]
fn test_integration_binding_elision() {
    let mut h = Headless::new();
    let texture = h.resources.create_texture(TextureDesc::empty("albedo", 8, 8, ColorFormat::Rgba8));

    let mut pipeline = Pipeline::new("elision");
    pipeline.bind_texture(texture, 0).bind_texture(texture, 0);
    let handle = h.player.add_pipeline(&pipeline);
    h.player.use_pipeline(handle);
    h.clear_commands();

    let stats = h.player.render(&mut h.resources);

    assert_eq!(h.commands_named("bind_texture").len(), 1);
    assert_eq!(stats.elided, 1);
}

#[test]
fn test_integration_instruction_order_is_preserved() {
    let mut h = Headless::new();
    let shader = h.resources.create_shader(ShaderDesc::graphics("flat", "vs", "fs"));
    let texture = h.resources.create_texture(TextureDesc::empty("albedo", 8, 8, ColorFormat::Rgba8));

    let mut pipeline = Pipeline::new("order");
    pipeline
        .set_blend(true)
        .bind_texture(texture, 3)
        .set_blend_mode(BlendFactor::SrcAlpha, BlendFactor::OneMinusSrcAlpha)
        .bind_shader(shader)
        .clear_current_framebuffer(ClearFlags::COLOR);
    let handle = h.player.add_pipeline(&pipeline);
    h.player.use_pipeline(handle);
    h.clear_commands();

    h.player.render(&mut h.resources);

    // shader program is native object 1, texture is 2
    assert_eq!(
        h.commands(),
        vec![
            "set_blend(true)",
            "bind_texture(2, 3)",
            "set_blend_func(SrcAlpha, OneMinusSrcAlpha)",
            "use_program(1)",
            "clear(color=true, depth=false, stencil=false)",
        ]
    );
}

#[test]
fn test_integration_mvp_composition() {
    let mut h = Headless::new();

    let mut pipeline = Pipeline::new("mvp");
    pipeline
        .set_model_matrix(Mat4::from_scale(Vec3::splat(2.0)))
        .set_view_matrix(Mat4::IDENTITY)
        .set_perspective_projection_matrix(Mat4::IDENTITY)
        .calculate_mvp();
    let handle = h.player.add_pipeline(&pipeline);
    h.player.use_pipeline(handle);
    h.player.render(&mut h.resources);

    let transforms = h.player.transforms().unwrap();
    assert_eq!(transforms.mvp * Vec4::new(1.0, 0.0, 0.0, 1.0), Vec4::new(2.0, 0.0, 0.0, 1.0));
    assert_eq!(transforms.mvp, transforms.projection * transforms.view * transforms.model);
}

#[test]
fn test_integration_indexed_draw_round_trip() {
    let mut h = Headless::new();
    let shader = h.resources.create_shader(ShaderDesc::graphics("flat", "vs", "fs"));
    let mesh = create_quad(&mut h.resources);

    let mut pipeline = Pipeline::new("quad");
    pipeline
        .bind_shader(shader)
        .bind_mesh(mesh)
        .draw_indexed(PrimitiveMode::Triangles, 6, IndexType::U32);
    let handle = h.player.add_pipeline(&pipeline);
    h.player.use_pipeline(handle);
    h.clear_commands();

    let stats = h.player.render(&mut h.resources);

    assert_eq!(h.commands_named("draw_elements"), vec!["draw_elements(Triangles, 6, U32)"]);
    assert_eq!(stats.draw_calls, 1);
    assert!(h.commands_named("create_buffer").is_empty());

    // the mesh is locked once finalized
    h.clear_log();
    assert!(!h.resources.add_mesh_positions(mesh, &[Vec3::ZERO]));
    assert_eq!(h.resources.mesh(mesh).unwrap().vertex_count(), 4);
    assert_eq!(h.logged_at_least(LogSeverity::Warn).len(), 1);
}

#[test]
fn test_integration_deleted_shader_mid_session() {
    let mut h = Headless::new();
    let shader = h.resources.create_shader(ShaderDesc::graphics("flat", "vs", "fs"));
    let mesh = create_quad(&mut h.resources);

    let mut pipeline = Pipeline::new("quad");
    pipeline
        .bind_shader(shader)
        .bind_mesh(mesh)
        .set_uniform_vec4(shader, "u_tint", Vec4::ONE)
        .set_mvp_uniform(shader, "u_mvp")
        .send_uniforms(shader)
        .draw_indexed(PrimitiveMode::Triangles, 6, IndexType::U32);
    let handle = h.player.add_pipeline(&pipeline);
    h.player.use_pipeline(handle);

    assert!(h.resources.delete_shader(shader));
    h.clear_commands();
    h.clear_log();

    let stats = h.player.render(&mut h.resources);

    assert_eq!(h.commands(), vec!["bind_vertex_array(5)"]);
    assert_eq!(stats.draw_calls, 0);
    assert_eq!(stats.skipped, 5);
    assert!(h.logged_at_least(LogSeverity::Warn).is_empty());
}

#[test]
fn test_integration_switching_pipelines() {
    let mut h = Headless::new();

    let mut day = Pipeline::new("day");
    day.set_clear_color(Vec4::ONE);
    let mut night = Pipeline::new("night");
    night.set_clear_color(Vec4::ZERO);

    let day = h.player.add_pipeline(&day);
    let night = h.player.add_pipeline(&night);

    h.player.use_pipeline(day);
    h.player.render(&mut h.resources);
    h.player.use_pipeline(night);
    h.player.render(&mut h.resources);

    assert_eq!(
        h.commands(),
        vec!["set_clear_color(1, 1, 1, 1)", "set_clear_color(0, 0, 0, 0)"]
    );
}

#[test]
fn test_integration_pipeline_recorded_before_resources_exist() {
    let mut h = Headless::new();

    // handles are issued from zero in each category
    let future_shader = Handle::from_raw(0);
    let mut pipeline = Pipeline::new("early");
    pipeline
        .bind_shader(future_shader)
        .set_ortho_projection_matrix(MatrixSource::orthographic(0.0, 800.0, 0.0, 600.0, -1.0, 1.0));
    let handle = h.player.add_pipeline(&pipeline);
    h.player.use_pipeline(handle);

    let before = h.player.render(&mut h.resources);
    let shader = h.resources.create_shader(ShaderDesc::graphics("late", "vs", "fs"));
    let after = h.player.render(&mut h.resources);

    assert_eq!(shader, future_shader);
    assert_eq!(before.skipped, 1);
    assert_eq!(after.skipped, 0);
    assert_eq!(h.commands_named("use_program").len(), 1);
}
