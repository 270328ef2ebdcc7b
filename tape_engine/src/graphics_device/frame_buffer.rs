/// Framebuffer attachment types

/// Attachment point of a framebuffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttachmentKind {
    /// Color attachment with its index (0 = first draw buffer)
    Color(u8),
    /// Depth-only attachment
    Depth,
    /// Stencil-only attachment
    Stencil,
    /// Combined depth/stencil attachment
    DepthStencil,
}

impl AttachmentKind {
    /// Whether this attachment takes a depth or stencil format
    pub fn is_depth_or_stencil(&self) -> bool {
        !matches!(self, AttachmentKind::Color(_))
    }
}

/// Backing storage of an attachment
///
/// Only texture-backed attachments can be sampled afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttachmentStorage {
    /// Sampleable texture
    Texture,
    /// Render-only renderbuffer
    Renderbuffer,
}
