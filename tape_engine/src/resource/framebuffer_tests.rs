/// Tests for Framebuffer

use super::*;
use crate::graphics_device::mock_graphics_device::MockGraphicsDevice;

fn offscreen(device: &mut MockGraphicsDevice) -> Framebuffer {
    let mut framebuffer = Framebuffer::new(FramebufferDesc::color_depth("offscreen", 256, 128));
    framebuffer.build(device).unwrap();
    framebuffer
}

// ============================================================================
// Creation
// ============================================================================

#[test]
fn test_build_creates_attachments_in_order() {
    let mut device = MockGraphicsDevice::new();
    let framebuffer = offscreen(&mut device);

    assert!(framebuffer.is_complete());
    assert_eq!(framebuffer.attachment_count(), 2);
    assert_eq!(
        device.commands,
        vec![
            "create_framebuffer(1)",
            "create_texture(2, 256x128, Rgba8, 0)",
            "attach_texture(1, Color(0), 2)",
            "create_renderbuffer(3, 256x128, Depth24)",
            "attach_renderbuffer(1, Depth, 3)",
            "framebuffer_complete(1)",
        ]
    );
}

#[test]
fn test_build_rejects_zero_size() {
    let mut device = MockGraphicsDevice::new();
    let mut framebuffer = Framebuffer::new(FramebufferDesc::color_depth("flat", 0, 64));

    assert!(framebuffer.build(&mut device).is_err());
    assert!(!framebuffer.is_complete());
    assert!(framebuffer.native().is_none());
    assert!(device.commands.is_empty());
}

#[test]
fn test_build_without_attachments_is_incomplete() {
    let mut device = MockGraphicsDevice::new();
    let desc = FramebufferDesc {
        name: "bare".to_string(),
        width: 16,
        height: 16,
        attachments: Vec::new(),
    };
    let mut framebuffer = Framebuffer::new(desc);

    let err = framebuffer.build(&mut device).unwrap_err();
    assert!(err.to_string().contains("no attachments"));
    assert!(!framebuffer.is_complete());
    // The object exists and can still be completed later
    assert!(framebuffer.native().is_some());
}

#[test]
fn test_device_incomplete_framebuffer() {
    let mut device = MockGraphicsDevice::new();
    device.incomplete_framebuffers = true;
    let mut framebuffer = Framebuffer::new(FramebufferDesc::color_depth("broken", 8, 8));

    let err = framebuffer.build(&mut device).unwrap_err();
    assert!(err.to_string().contains("incomplete"));
    assert!(!framebuffer.is_complete());
    assert_eq!(framebuffer.attachment_count(), 2);
}

#[test]
fn test_mismatched_attachment_format_is_rejected() {
    let mut device = MockGraphicsDevice::new();
    let mut framebuffer = offscreen(&mut device);

    let desc = AttachmentDesc::new(AttachmentKind::Stencil, AttachmentStorage::Texture, ColorFormat::Rgba8);
    assert!(framebuffer.add_attachment(&mut device, desc).is_err());
    assert_eq!(framebuffer.attachment_count(), 2);
}

#[test]
fn test_duplicate_attachment_is_rejected() {
    let mut device = MockGraphicsDevice::new();
    let mut framebuffer = offscreen(&mut device);
    let live = device.live_object_count();

    let desc = AttachmentDesc::new(AttachmentKind::Color(0), AttachmentStorage::Texture, ColorFormat::R8);
    assert!(framebuffer.add_attachment(&mut device, desc).is_err());
    assert_eq!(device.live_object_count(), live);
}

#[test]
fn test_add_attachment() {
    let mut device = MockGraphicsDevice::new();
    let mut framebuffer = offscreen(&mut device);

    let desc = AttachmentDesc::new(AttachmentKind::Color(1), AttachmentStorage::Texture, ColorFormat::Rgba16F);
    framebuffer.add_attachment(&mut device, desc).unwrap();
    assert_eq!(framebuffer.attachment_count(), 3);
    assert!(framebuffer
        .attachment_native(AttachmentKind::Color(1), AttachmentStorage::Texture)
        .is_some());
}

// ============================================================================
// Binding
// ============================================================================

#[test]
fn test_bind_and_bind_attachment() {
    let mut device = MockGraphicsDevice::new();
    let framebuffer = offscreen(&mut device);
    device.clear_commands();

    framebuffer.bind(&mut device).unwrap();
    framebuffer
        .bind_attachment(&mut device, 2, AttachmentKind::Color(0), AttachmentStorage::Texture)
        .unwrap();

    assert_eq!(device.commands, vec!["bind_framebuffer(1)", "bind_texture(2, 2)"]);
}

#[test]
fn test_renderbuffer_attachment_cannot_be_sampled() {
    let mut device = MockGraphicsDevice::new();
    let framebuffer = offscreen(&mut device);
    device.clear_commands();

    let result = framebuffer.bind_attachment(&mut device, 0, AttachmentKind::Depth, AttachmentStorage::Renderbuffer);
    assert!(result.is_err());
    assert!(device.commands.is_empty());
}

#[test]
fn test_bind_missing_attachment() {
    let mut device = MockGraphicsDevice::new();
    let framebuffer = offscreen(&mut device);

    let result = framebuffer.bind_attachment(&mut device, 0, AttachmentKind::Color(5), AttachmentStorage::Texture);
    assert!(result.is_err());
}

// ============================================================================
// Resize / destroy
// ============================================================================

#[test]
fn test_resize_recreates_attachments() {
    let mut device = MockGraphicsDevice::new();
    let mut framebuffer = offscreen(&mut device);
    let old_color = framebuffer
        .attachment_native(AttachmentKind::Color(0), AttachmentStorage::Texture)
        .unwrap();

    framebuffer.resize(&mut device, 512, 512).unwrap();

    assert_eq!((framebuffer.width(), framebuffer.height()), (512, 512));
    assert!(!device.is_alive(old_color));
    assert_eq!(framebuffer.attachment_count(), 2);
    assert!(device.commands.iter().any(|c| c.ends_with("512x512, Rgba8, 0)")));
    assert!(device.commands.iter().any(|c| c.ends_with("512x512, Depth24)")));
    assert!(framebuffer.is_complete());
}

#[test]
fn test_resize_rejects_zero() {
    let mut device = MockGraphicsDevice::new();
    let mut framebuffer = offscreen(&mut device);

    assert!(framebuffer.resize(&mut device, 0, 0).is_err());
    assert_eq!((framebuffer.width(), framebuffer.height()), (256, 128));
}

#[test]
fn test_resize_failure_leaves_framebuffer_incomplete() {
    let mut device = MockGraphicsDevice::new();
    let mut framebuffer = offscreen(&mut device);

    device.fail_next_texture = true;
    assert!(framebuffer.resize(&mut device, 512, 512).is_err());

    // the color texture failed, the depth renderbuffer was still recreated
    assert!(!framebuffer.is_complete());
    assert_eq!(framebuffer.attachment_count(), 1);
    assert!(framebuffer
        .attachment_native(AttachmentKind::Depth, AttachmentStorage::Renderbuffer)
        .is_some());
    assert_eq!(device.count("framebuffer_complete"), 1);

    framebuffer.resize(&mut device, 512, 512).unwrap();

    assert!(framebuffer.is_complete());
    assert_eq!(framebuffer.attachment_count(), 2);
    assert_eq!(device.live_object_count(), 3);
}

#[test]
fn test_destroy_releases_everything() {
    let mut device = MockGraphicsDevice::new();
    let mut framebuffer = offscreen(&mut device);
    assert_eq!(device.live_object_count(), 3);

    framebuffer.destroy(&mut device);
    assert_eq!(device.live_object_count(), 0);
    assert!(framebuffer.bind(&mut device).is_err());
}
