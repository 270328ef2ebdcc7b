//! Resource-level mesh.
//!
//! A `Mesh` accumulates vertex attributes and indices on the CPU, then
//! `finalize` uploads them once and locks the mesh.
//!
//! # Vertex streams
//!
//! ```text
//! location 0  positions  vec3  (required)
//! location 1  uvs        vec2  (optional)
//! location 2  normals    vec3  (optional)
//! location 3  colors     vec4  (optional)
//! index buffer           u32   (optional)
//! ```
//!
//! Every optional stream that is present must have one entry per position.

use glam::{Vec2, Vec3, Vec4};
use crate::error::{Error, Result};
use crate::graphics_device::{BufferKind, GraphicsDevice, NativeHandle, VertexStream};

/// GPU objects created by `finalize`
#[derive(Debug, Clone)]
struct MeshBuffers {
    vertex_array: NativeHandle,
    vertex_buffers: Vec<NativeHandle>,
    index_buffer: Option<NativeHandle>,
}

/// An editable-then-frozen triangle mesh
#[derive(Debug)]
pub struct Mesh {
    name: String,
    positions: Vec<Vec3>,
    uvs: Vec<Vec2>,
    normals: Vec<Vec3>,
    colors: Vec<Vec4>,
    indices: Vec<u32>,
    finalized: bool,
    buffers: Option<MeshBuffers>,
}

impl Mesh {
    /// Create an empty, editable mesh
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            positions: Vec::new(),
            uvs: Vec::new(),
            normals: Vec::new(),
            colors: Vec::new(),
            indices: Vec::new(),
            finalized: false,
            buffers: None,
        }
    }

    // ===== ACCESSORS =====

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of vertices (positions)
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn is_indexed(&self) -> bool {
        !self.indices.is_empty()
    }

    /// Whether the mesh has been uploaded and locked
    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// Whether the GPU buffers exist
    pub fn is_functional(&self) -> bool {
        self.buffers.is_some()
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn uvs(&self) -> &[Vec2] {
        &self.uvs
    }

    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    pub fn colors(&self) -> &[Vec4] {
        &self.colors
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Native vertex array, once finalized
    pub fn vertex_array(&self) -> Option<NativeHandle> {
        self.buffers.as_ref().map(|b| b.vertex_array)
    }

    // ===== EDITING =====

    pub fn add_positions(&mut self, positions: &[Vec3]) -> Result<()> {
        self.require_editable("positions")?;
        self.positions.extend_from_slice(positions);
        Ok(())
    }

    pub fn add_uvs(&mut self, uvs: &[Vec2]) -> Result<()> {
        self.require_editable("uvs")?;
        self.uvs.extend_from_slice(uvs);
        Ok(())
    }

    pub fn add_normals(&mut self, normals: &[Vec3]) -> Result<()> {
        self.require_editable("normals")?;
        self.normals.extend_from_slice(normals);
        Ok(())
    }

    pub fn add_colors(&mut self, colors: &[Vec4]) -> Result<()> {
        self.require_editable("colors")?;
        self.colors.extend_from_slice(colors);
        Ok(())
    }

    pub fn add_indices(&mut self, indices: &[u32]) -> Result<()> {
        self.require_editable("indices")?;
        self.indices.extend_from_slice(indices);
        Ok(())
    }

    // ===== GPU =====

    /// Validate, upload and lock the mesh
    ///
    /// On validation failure the mesh stays editable. On device failure any
    /// buffers already created are released and the mesh stays editable.
    pub fn finalize(&mut self, device: &mut dyn GraphicsDevice) -> Result<()> {
        if self.finalized {
            return Err(Error::InvalidResource(format!("mesh '{}' is already finalized", self.name)));
        }
        self.validate()?;

        let mut created = Vec::new();
        match self.upload(device, &mut created) {
            Ok(buffers) => {
                self.buffers = Some(buffers);
                self.finalized = true;
                Ok(())
            }
            Err(err) => {
                for buffer in created {
                    device.delete_buffer(buffer);
                }
                Err(err)
            }
        }
    }

    /// Bind the vertex array for subsequent draws
    pub fn bind(&self, device: &mut dyn GraphicsDevice) -> Result<()> {
        match &self.buffers {
            Some(buffers) => {
                device.bind_vertex_array(buffers.vertex_array);
                Ok(())
            }
            None => Err(Error::InvalidResource(format!(
                "mesh '{}' is not finalized",
                self.name
            ))),
        }
    }

    /// Release GPU objects
    pub(crate) fn destroy(&mut self, device: &mut dyn GraphicsDevice) {
        if let Some(buffers) = self.buffers.take() {
            device.delete_vertex_array(buffers.vertex_array);
            for buffer in buffers.vertex_buffers {
                device.delete_buffer(buffer);
            }
            if let Some(index_buffer) = buffers.index_buffer {
                device.delete_buffer(index_buffer);
            }
        }
    }

    fn require_editable(&self, what: &str) -> Result<()> {
        if self.finalized {
            return Err(Error::InvalidResource(format!(
                "cannot add {} to mesh '{}': mesh is finalized",
                what, self.name
            )));
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        let count = self.positions.len();
        if count == 0 {
            return Err(Error::InvalidResource(format!("mesh '{}' has no positions", self.name)));
        }
        for (stream, len) in [
            ("uvs", self.uvs.len()),
            ("normals", self.normals.len()),
            ("colors", self.colors.len()),
        ] {
            if len != 0 && len != count {
                return Err(Error::InvalidResource(format!(
                    "mesh '{}' has {} {} for {} positions",
                    self.name, len, stream, count
                )));
            }
        }
        if let Some(&bad) = self.indices.iter().find(|&&i| i as usize >= count) {
            return Err(Error::InvalidResource(format!(
                "mesh '{}' index {} out of range ({} vertices)",
                self.name, bad, count
            )));
        }
        Ok(())
    }

    fn upload(&self, device: &mut dyn GraphicsDevice, created: &mut Vec<NativeHandle>) -> Result<MeshBuffers> {
        let mut streams = Vec::new();

        Self::upload_stream(device, created, &mut streams, bytemuck::cast_slice(&self.positions), 0, 3)?;
        if !self.uvs.is_empty() {
            Self::upload_stream(device, created, &mut streams, bytemuck::cast_slice(&self.uvs), 1, 2)?;
        }
        if !self.normals.is_empty() {
            Self::upload_stream(device, created, &mut streams, bytemuck::cast_slice(&self.normals), 2, 3)?;
        }
        if !self.colors.is_empty() {
            Self::upload_stream(device, created, &mut streams, bytemuck::cast_slice(&self.colors), 3, 4)?;
        }
        let vertex_buffers = created.clone();

        let index_buffer = if self.indices.is_empty() {
            None
        } else {
            let buffer = device.create_buffer(BufferKind::Index, bytemuck::cast_slice(&self.indices))?;
            created.push(buffer);
            Some(buffer)
        };

        let vertex_array = device.create_vertex_array(&streams, index_buffer)?;

        Ok(MeshBuffers {
            vertex_array,
            vertex_buffers,
            index_buffer,
        })
    }

    fn upload_stream(
        device: &mut dyn GraphicsDevice,
        created: &mut Vec<NativeHandle>,
        streams: &mut Vec<VertexStream>,
        bytes: &[u8],
        location: u32,
        components: u32,
    ) -> Result<()> {
        let buffer = device.create_buffer(BufferKind::Vertex, bytes)?;
        created.push(buffer);
        streams.push(VertexStream { buffer, location, components });
        Ok(())
    }
}

#[cfg(test)]
#[path = "mesh_tests.rs"]
mod tests;
