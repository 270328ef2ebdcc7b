/// Tests for playback state

use super::*;
use glam::{Vec3, Vec4};

// ============================================================================
// Transforms
// ============================================================================

#[test]
fn test_transforms_default_to_identity() {
    let t = Transforms::default();
    assert_eq!(t.model, Mat4::IDENTITY);
    assert_eq!(t.mvp, Mat4::IDENTITY);
}

#[test]
fn test_mvp_scale_only() {
    let mut t = Transforms {
        model: Mat4::from_scale(Vec3::splat(2.0)),
        ..Transforms::default()
    };
    t.calculate_mvp();

    assert_eq!(t.mvp * Vec4::new(1.0, 0.0, 0.0, 1.0), Vec4::new(2.0, 0.0, 0.0, 1.0));
    assert_eq!(t.mvp, t.model);
}

#[test]
fn test_mvp_multiplication_order() {
    let mut t = Transforms {
        model: Mat4::from_translation(Vec3::X),
        view: Mat4::from_scale(Vec3::splat(3.0)),
        projection: Mat4::from_translation(Vec3::Y),
        mvp: Mat4::ZERO,
    };
    t.calculate_mvp();

    assert_eq!(t.mvp, t.projection * t.view * t.model);
    // translate by x, scale by 3, translate by y
    assert_eq!(t.mvp.transform_point3(Vec3::ZERO), Vec3::new(3.0, 1.0, 0.0));
}

// ============================================================================
// BoundResources
// ============================================================================

#[test]
fn test_texture_slot_elision() {
    let mut bound = BoundResources::new(4, 2);
    let a = Handle::from_raw(0);
    let b = Handle::from_raw(1);

    assert_eq!(bound.set_texture(0, a), Some(true));
    assert_eq!(bound.set_texture(0, a), Some(false));
    assert_eq!(bound.set_texture(1, a), Some(true));
    assert_eq!(bound.set_texture(0, b), Some(true));
    assert_eq!(bound.texture(0), Some(b));
    assert_eq!(bound.last_texture(), Some(b));
}

#[test]
fn test_out_of_range_units() {
    let mut bound = BoundResources::new(2, 1);
    let binding = ImageBinding {
        texture: Handle::from_raw(0),
        access: ImageAccess::ReadOnly,
        format: ColorFormat::R8,
    };

    assert_eq!(bound.set_texture(2, Handle::from_raw(0)), None);
    assert_eq!(bound.set_image(1, binding), None);
    assert_eq!(bound.texture(2), None);
}

#[test]
fn test_image_elision_needs_same_access_and_format() {
    let mut bound = BoundResources::new(1, 1);
    let read = ImageBinding {
        texture: Handle::from_raw(0),
        access: ImageAccess::ReadOnly,
        format: ColorFormat::Rgba8,
    };
    let write = ImageBinding { access: ImageAccess::WriteOnly, ..read };

    assert_eq!(bound.set_image(0, read), Some(true));
    assert_eq!(bound.set_image(0, read), Some(false));
    assert_eq!(bound.set_image(0, write), Some(true));
}

#[test]
fn test_forget_texture_forces_rebind() {
    let mut bound = BoundResources::new(2, 1);
    let a = Handle::from_raw(5);
    bound.set_texture(1, a);

    bound.forget_texture(1);
    bound.forget_texture(9);

    assert_eq!(bound.texture(1), None);
    assert_eq!(bound.set_texture(1, a), Some(true));
}

#[test]
fn test_shader_and_shader_pipeline_displace_each_other() {
    let mut bound = BoundResources::new(1, 1);
    let shader = Handle::from_raw(0);
    let pipeline = Handle::from_raw(0);

    assert!(bound.set_shader(shader));
    assert!(bound.set_shader_pipeline(pipeline));
    assert_eq!(bound.shader(), None);
    assert!(bound.set_shader(shader));
    assert_eq!(bound.shader_pipeline(), None);
}

#[test]
fn test_target_distinguishes_backbuffer() {
    let mut bound = BoundResources::new(1, 1);

    assert!(bound.set_target(RenderTarget::Backbuffer));
    assert!(!bound.set_target(RenderTarget::Backbuffer));
    assert!(bound.set_target(RenderTarget::Framebuffer(Handle::from_raw(0))));
    assert!(!bound.set_target(RenderTarget::Framebuffer(Handle::from_raw(0))));
}

#[test]
fn test_reset_forgets_everything() {
    let mut bound = BoundResources::new(2, 2);
    bound.set_texture(0, Handle::from_raw(1));
    bound.set_mesh(Handle::from_raw(2));
    bound.set_shader(Handle::from_raw(3));
    bound.set_target(RenderTarget::Backbuffer);

    bound.reset();

    assert_eq!(bound, BoundResources::new(2, 2));
    assert_eq!(bound.texture_unit_count(), 2);
}

// ============================================================================
// RenderStats
// ============================================================================

#[test]
fn test_render_stats_total() {
    let stats = RenderStats {
        executed: 5,
        elided: 2,
        skipped: 1,
        draw_calls: 1,
        dispatches: 0,
    };
    assert_eq!(stats.total(), 8);
    assert_eq!(RenderStats::default().total(), 0);
}
