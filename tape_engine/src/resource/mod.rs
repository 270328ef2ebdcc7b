//! Resource management module
//!
//! GPU resources owned by the `ResourceManager` and addressed by `Handle`.

mod handle;
mod resource_manager;
pub mod shader;
pub mod texture;
pub mod mesh;
pub mod framebuffer;
pub mod atlas;
pub mod shader_pipeline;

pub use handle::Handle;
pub use resource_manager::ResourceManager;
pub use shader::{Shader, ShaderDesc};
pub use texture::{Texture, TextureDesc};
pub use mesh::Mesh;
pub use framebuffer::{AttachmentDesc, Framebuffer, FramebufferDesc};
pub use atlas::{Atlas, AtlasDesc, AtlasRegion, AtlasTile};
pub use shader_pipeline::ShaderPipeline;
