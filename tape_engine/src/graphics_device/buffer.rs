/// Buffer and vertex-input types

use crate::graphics_device::NativeHandle;

/// Kind of GPU buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferKind {
    /// Per-vertex attribute data
    Vertex,
    /// Element indices
    Index,
}

/// Index buffer element type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexType {
    /// 8-bit indices (max 255 vertices)
    U8,
    /// 16-bit indices (max 65535 vertices)
    U16,
    /// 32-bit indices
    U32,
}

impl IndexType {
    /// Size in bytes of one index element
    pub fn size_bytes(&self) -> u32 {
        match self {
            IndexType::U8 => 1,
            IndexType::U16 => 2,
            IndexType::U32 => 4,
        }
    }
}

/// One attribute stream of a vertex array
///
/// Each stream reads tightly packed `f32` components from its own buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexStream {
    /// Vertex buffer holding the stream
    pub buffer: NativeHandle,
    /// Attribute location in the shader
    pub location: u32,
    /// Number of `f32` components per vertex (1..=4)
    pub components: u32,
}
