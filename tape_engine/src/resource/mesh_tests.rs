/// Tests for Mesh

use super::*;
use crate::graphics_device::mock_graphics_device::MockGraphicsDevice;

fn quad_positions() -> Vec<Vec3> {
    vec![
        Vec3::new(-0.5, -0.5, 0.0),
        Vec3::new(0.5, -0.5, 0.0),
        Vec3::new(0.5, 0.5, 0.0),
        Vec3::new(-0.5, 0.5, 0.0),
    ]
}

fn quad_uvs() -> Vec<Vec2> {
    vec![
        Vec2::new(0.0, 0.0),
        Vec2::new(1.0, 0.0),
        Vec2::new(1.0, 1.0),
        Vec2::new(0.0, 1.0),
    ]
}

fn quad(device: &mut MockGraphicsDevice) -> Mesh {
    let mut mesh = Mesh::new("quad");
    mesh.add_positions(&quad_positions()).unwrap();
    mesh.add_uvs(&quad_uvs()).unwrap();
    mesh.add_indices(&[0, 1, 2, 2, 3, 0]).unwrap();
    mesh.finalize(device).unwrap();
    mesh
}

// ============================================================================
// Editing
// ============================================================================

#[test]
fn test_new_mesh_is_empty_and_editable() {
    let mesh = Mesh::new("empty");
    assert_eq!(mesh.vertex_count(), 0);
    assert_eq!(mesh.index_count(), 0);
    assert!(!mesh.is_finalized());
    assert!(!mesh.is_functional());
}

#[test]
fn test_add_appends() {
    let mut mesh = Mesh::new("m");
    mesh.add_positions(&quad_positions()[..2]).unwrap();
    mesh.add_positions(&quad_positions()[2..]).unwrap();
    assert_eq!(mesh.positions(), quad_positions().as_slice());
}

// ============================================================================
// Finalize
// ============================================================================

#[test]
fn test_finalize_uploads_streams_and_indices() {
    let mut device = MockGraphicsDevice::new();
    let mesh = quad(&mut device);

    assert!(mesh.is_finalized());
    assert!(mesh.is_indexed());
    assert_eq!(mesh.vertex_count(), 4);
    assert_eq!(mesh.index_count(), 6);

    // positions (4 * 12 bytes), uvs (4 * 8 bytes), indices (6 * 4 bytes)
    assert_eq!(
        device.commands_named("create_buffer"),
        vec![
            "create_buffer(1, Vertex, 48)",
            "create_buffer(2, Vertex, 32)",
            "create_buffer(3, Index, 24)",
        ]
    );
    assert_eq!(device.commands_named("create_vertex_array"), vec!["create_vertex_array(4, 2 streams, indexed=true)"]);
    assert_eq!(mesh.vertex_array(), Some(4));
}

#[test]
fn test_add_after_finalize_is_rejected() {
    let mut device = MockGraphicsDevice::new();
    let mut mesh = quad(&mut device);

    let result = mesh.add_positions(&[Vec3::ONE]);
    assert!(matches!(result, Err(Error::InvalidResource(_))));
    assert_eq!(mesh.vertex_count(), 4);

    assert!(mesh.add_uvs(&[Vec2::ONE]).is_err());
    assert!(mesh.add_normals(&[Vec3::Z]).is_err());
    assert!(mesh.add_colors(&[Vec4::ONE]).is_err());
    assert!(mesh.add_indices(&[0]).is_err());
    assert_eq!(mesh.index_count(), 6);
}

#[test]
fn test_finalize_twice_is_rejected() {
    let mut device = MockGraphicsDevice::new();
    let mut mesh = quad(&mut device);
    let created = device.count("create_buffer");

    assert!(mesh.finalize(&mut device).is_err());
    assert_eq!(device.count("create_buffer"), created);
}

#[test]
fn test_finalize_rejects_empty_mesh() {
    let mut device = MockGraphicsDevice::new();
    let mut mesh = Mesh::new("empty");
    assert!(mesh.finalize(&mut device).is_err());
    assert!(!mesh.is_finalized());
}

#[test]
fn test_finalize_rejects_mismatched_streams() {
    let mut device = MockGraphicsDevice::new();
    let mut mesh = Mesh::new("bad");
    mesh.add_positions(&quad_positions()).unwrap();
    mesh.add_uvs(&quad_uvs()[..3]).unwrap();

    let err = mesh.finalize(&mut device).unwrap_err();
    assert!(err.to_string().contains("3 uvs for 4 positions"));
    assert!(!mesh.is_finalized());

    // Still editable: fix and retry
    mesh.add_uvs(&quad_uvs()[3..]).unwrap();
    assert!(mesh.finalize(&mut device).is_ok());
}

#[test]
fn test_finalize_rejects_out_of_range_index() {
    let mut device = MockGraphicsDevice::new();
    let mut mesh = Mesh::new("bad");
    mesh.add_positions(&quad_positions()).unwrap();
    mesh.add_indices(&[0, 1, 4]).unwrap();

    assert!(mesh.finalize(&mut device).is_err());
    assert_eq!(device.live_object_count(), 0);
}

// ============================================================================
// Bind / destroy
// ============================================================================

#[test]
fn test_bind_requires_finalize() {
    let mut device = MockGraphicsDevice::new();
    let mesh = Mesh::new("pending");
    assert!(mesh.bind(&mut device).is_err());

    let mesh = quad(&mut device);
    device.clear_commands();
    mesh.bind(&mut device).unwrap();
    assert_eq!(device.commands, vec!["bind_vertex_array(4)".to_string()]);
}

#[test]
fn test_destroy_releases_all_objects() {
    let mut device = MockGraphicsDevice::new();
    let mut mesh = quad(&mut device);
    assert_eq!(device.live_object_count(), 4);

    mesh.destroy(&mut device);
    assert_eq!(device.live_object_count(), 0);
    assert!(!mesh.is_functional());
}
