/// Texture and image types

/// Pixel format of textures, images and renderbuffers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorFormat {
    R8,
    Rg8,
    Rgb8,
    Rgba8,
    R32F,
    Rg32F,
    Rgba16F,
    Rgba32F,
    R32UI,
    Depth24,
    Depth32F,
    Stencil8,
    Depth24Stencil8,
}

impl ColorFormat {
    /// Size in bytes of one pixel
    pub fn bytes_per_pixel(&self) -> u32 {
        match self {
            ColorFormat::R8 | ColorFormat::Stencil8 => 1,
            ColorFormat::Rg8 => 2,
            ColorFormat::Rgb8 | ColorFormat::Depth24 => 3,
            ColorFormat::Rgba8
            | ColorFormat::R32F
            | ColorFormat::R32UI
            | ColorFormat::Depth32F
            | ColorFormat::Depth24Stencil8 => 4,
            ColorFormat::Rg32F | ColorFormat::Rgba16F => 8,
            ColorFormat::Rgba32F => 16,
        }
    }

    /// Whether the format holds depth and/or stencil values
    pub fn is_depth_or_stencil(&self) -> bool {
        matches!(
            self,
            ColorFormat::Depth24
                | ColorFormat::Depth32F
                | ColorFormat::Stencil8
                | ColorFormat::Depth24Stencil8
        )
    }
}

/// Texture sampling filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterMode {
    Nearest,
    Linear,
    NearestMipmapNearest,
    LinearMipmapLinear,
}

/// Access mode of an image binding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageAccess {
    ReadOnly,
    WriteOnly,
    ReadWrite,
}
