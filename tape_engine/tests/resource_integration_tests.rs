//! Integration tests for the resource repository
//!
//! These tests exercise ResourceManager through the public API with a
//! headless device. No GPU required.
//!
//! Run with: cargo test --test resource_integration_tests


use tape_engine::glam::{Vec2, Vec3, Vec4};
use tape_engine::tape::device::{
    AttachmentKind, AttachmentStorage, ColorFormat, FilterMode, ImageAccess, ShaderStage,
};
use tape_engine::tape::log::LogSeverity;
use tape_engine::tape::resource::{
    AtlasDesc, AttachmentDesc, FramebufferDesc, Handle, ShaderDesc, TextureDesc,
};
use test_utils::Headless;

/// Observable size of the repository
fn snapshot(h: &Headless) -> [usize; 6] {
    [
        h.resources.shader_count(),
        h.resources.texture_count(),
        h.resources.mesh_count(),
        h.resources.framebuffer_count(),
        h.resources.atlas_count(),
        h.resources.shader_pipeline_count(),
    ]
}

// ============================================================================
// INTEGRATION TESTS
// ============================================================================

#[test]
fn test_integration_handles_are_unique_and_increasing() {
    let mut h = Headless::new();

    let meshes: Vec<Handle> = (0..16).map(|i| h.resources.create_mesh(&format!("m{}", i))).collect();

    for (i, handle) in meshes.iter().enumerate() {
        assert_eq!(handle.raw(), i as u64);
    }
    assert!(meshes.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_integration_deleted_handles_are_not_reissued() {
    let mut h = Headless::new();
    let first = h.resources.create_texture(TextureDesc::empty("a", 4, 4, ColorFormat::Rgba8));
    h.resources.delete_texture(first);

    let second = h.resources.create_texture(TextureDesc::empty("b", 4, 4, ColorFormat::Rgba8));

    assert_ne!(first, second);
    assert!(!h.resources.texture_exists(first));
}

#[test]
fn test_integration_missing_handle_is_a_no_op() {
    let mut h = Headless::new();
    let shader = h.resources.create_shader(ShaderDesc::graphics("s", "vs", "fs"));
    h.resources.create_mesh("m");
    h.clear_commands();
    h.clear_log();

    let before = snapshot(&h);
    let ghost = Handle::from_raw(1000);

    h.resources.use_shader(ghost);
    h.resources.set_uniform(ghost, "u_time", 0.5f32);
    h.resources.send_uniforms(ghost);
    h.resources.bind_texture(ghost, 0);
    h.resources.bind_image(ghost, 0, ImageAccess::ReadWrite, ColorFormat::Rgba32F);
    h.resources.set_texture_filter(ghost, FilterMode::Linear, FilterMode::Linear);
    h.resources.add_mesh_positions(ghost, &[Vec3::ZERO]);
    h.resources.add_mesh_uvs(ghost, &[Vec2::ZERO]);
    h.resources.add_mesh_colors(ghost, &[Vec4::ONE]);
    h.resources.add_mesh_indices(ghost, &[0]);
    h.resources.finalize_mesh(ghost);
    h.resources.bind_mesh(ghost);
    h.resources.bind_framebuffer(ghost);
    h.resources.add_framebuffer_attachment(
        ghost,
        AttachmentDesc::new(AttachmentKind::Depth, AttachmentStorage::Renderbuffer, ColorFormat::Depth24),
    );
    h.resources.bind_framebuffer_attachment(ghost, 0, AttachmentKind::Color(0), AttachmentStorage::Texture);
    h.resources.add_atlas_tile(ghost, "tile", 8, 8);
    h.resources.attach_shader_pipeline_stage(ghost, ShaderStage::Fragment, shader);
    h.resources.bind_shader_pipeline(ghost);

    assert_eq!(snapshot(&h), before);
    assert!(h.commands().is_empty());
    assert!(h.logged_at_least(LogSeverity::Warn).is_empty());
}

#[test]
fn test_integration_delete_twice_is_idempotent() {
    let mut h = Headless::new();
    let framebuffer = h.resources.create_framebuffer(FramebufferDesc::color_depth("fb", 32, 32));
    let kept = h.resources.create_framebuffer(FramebufferDesc::color_depth("kept", 32, 32));

    assert!(h.resources.delete_framebuffer(framebuffer));
    let after_once = (snapshot(&h), h.commands());

    assert!(!h.resources.delete_framebuffer(framebuffer));

    assert_eq!((snapshot(&h), h.commands()), after_once);
    assert!(h.resources.framebuffer_exists(kept));
}

#[test]
fn test_integration_failed_shader_keeps_its_handle() {
    let mut h = Headless::new();
    h.device.lock().unwrap().fail_next_program = true;

    let shader = h.resources.create_shader(ShaderDesc::graphics("broken", "vs", "fs"));

    assert!(h.resources.shader_exists(shader));
    assert!(!h.resources.shader_is_functional(shader));
    assert_eq!(h.logged_at_least(LogSeverity::Error).len(), 1);
}

#[test]
fn test_integration_incomplete_framebuffer_keeps_its_handle() {
    let mut h = Headless::new();
    h.device.lock().unwrap().incomplete_framebuffers = true;

    let framebuffer = h.resources.create_framebuffer(FramebufferDesc::color_depth("fb", 32, 32));

    assert!(h.resources.framebuffer_exists(framebuffer));
    assert!(!h.resources.framebuffer(framebuffer).unwrap().is_complete());
    assert_eq!(h.logged_at_least(LogSeverity::Error).len(), 1);
}

#[test]
fn test_integration_atlas_tiles_map_into_texture() {
    let mut h = Headless::new();
    let texture = h.resources.create_texture(TextureDesc::empty("glyphs", 64, 64, ColorFormat::R8));
    let atlas = h.resources.create_atlas(AtlasDesc {
        name: "glyphs".to_string(),
        width: 64,
        height: 64,
        padding: 0,
        texture,
    });

    let a = h.resources.add_atlas_tile(atlas, "a", 32, 32).unwrap();
    let b = h.resources.add_atlas_tile(atlas, "b", 32, 32).unwrap();
    h.clear_log();
    let zero = h.resources.add_atlas_tile(atlas, "zero", 0, 8);

    assert!(zero.is_none());
    assert_eq!(h.logged_at_least(LogSeverity::Warn).len(), 1);
    assert_eq!(h.resources.atlas_tile(atlas, b).unwrap().x, 32);
    let region = h.resources.atlas_region(atlas, a).unwrap();
    assert_eq!((region.u, region.v, region.width, region.height), (0.0, 0.0, 0.5, 0.5));
}

#[test]
fn test_integration_shutdown_releases_native_objects() {
    let mut h = Headless::new();
    h.resources.create_shader(ShaderDesc::graphics("s", "vs", "fs"));
    h.resources.create_texture(TextureDesc::empty("t", 4, 4, ColorFormat::Rgba8));
    h.resources.create_framebuffer(FramebufferDesc::color_depth("fb", 16, 16));
    let mesh = h.resources.create_mesh("m");
    h.resources.add_mesh_positions(mesh, &[Vec3::ZERO, Vec3::X, Vec3::Y]);
    h.resources.finalize_mesh(mesh);

    h.resources.shutdown();

    assert_eq!(h.resources.resource_count(), 0);
    assert_eq!(h.device.lock().unwrap().live_object_count(), 0);
}
