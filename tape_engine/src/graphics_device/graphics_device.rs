/// GraphicsDevice trait - the hardware graphics API seen by the engine
///
/// Shaped after an OpenGL-class immediate API: objects are named by small
/// integers, state is global, and draws use whatever is currently bound.
/// Only object creation can fail; everything else is fire-and-forget.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use crate::error::Result;
use crate::graphics_device::{
    AttachmentKind, BlendFactor, BufferKind, ClearFlags, ColorFormat, FilterMode,
    ImageAccess, IndexType, PrimitiveMode, ShaderSource, ShaderStage, UniformValue,
    VertexStream,
};

/// Native object name issued by the device (0 is never issued)
pub type NativeHandle = u32;

/// Hardware graphics API
///
/// Implemented by real backends and by `MockGraphicsDevice`. The resource
/// manager is the only caller of the create/delete methods.
pub trait GraphicsDevice: Send {
    // ===== TEXTURES =====

    /// Create a 2D texture, optionally filled with `data`
    fn create_texture(
        &mut self,
        width: u32,
        height: u32,
        format: ColorFormat,
        data: Option<&[u8]>,
    ) -> Result<NativeHandle>;

    /// Replace the storage and contents of a texture
    fn upload_texture(
        &mut self,
        texture: NativeHandle,
        width: u32,
        height: u32,
        format: ColorFormat,
        data: Option<&[u8]>,
    ) -> Result<()>;

    /// Release a texture
    fn delete_texture(&mut self, texture: NativeHandle);

    /// Bind a texture for sampling on a texture unit
    fn bind_texture(&mut self, texture: NativeHandle, unit: u32);

    /// Bind a texture level as a load/store image
    fn bind_image(&mut self, texture: NativeHandle, unit: u32, access: ImageAccess, format: ColorFormat);

    /// Set the sampling filters of a texture
    fn set_texture_filter(&mut self, texture: NativeHandle, min: FilterMode, mag: FilterMode);

    // ===== BUFFERS =====

    /// Create a buffer holding `data`
    fn create_buffer(&mut self, kind: BufferKind, data: &[u8]) -> Result<NativeHandle>;

    /// Release a buffer
    fn delete_buffer(&mut self, buffer: NativeHandle);

    /// Create a vertex array object over attribute streams and an optional index buffer
    fn create_vertex_array(
        &mut self,
        streams: &[VertexStream],
        index_buffer: Option<NativeHandle>,
    ) -> Result<NativeHandle>;

    /// Release a vertex array object
    fn delete_vertex_array(&mut self, vertex_array: NativeHandle);

    /// Bind a vertex array object for subsequent draws
    fn bind_vertex_array(&mut self, vertex_array: NativeHandle);

    // ===== FRAMEBUFFERS =====

    /// Create an empty framebuffer object
    fn create_framebuffer(&mut self) -> Result<NativeHandle>;

    /// Create a renderbuffer
    fn create_renderbuffer(&mut self, width: u32, height: u32, format: ColorFormat) -> Result<NativeHandle>;

    /// Release a renderbuffer
    fn delete_renderbuffer(&mut self, renderbuffer: NativeHandle);

    /// Attach a texture to a framebuffer attachment point
    fn attach_texture(&mut self, framebuffer: NativeHandle, kind: AttachmentKind, texture: NativeHandle);

    /// Attach a renderbuffer to a framebuffer attachment point
    fn attach_renderbuffer(&mut self, framebuffer: NativeHandle, kind: AttachmentKind, renderbuffer: NativeHandle);

    /// Whether the framebuffer is complete and renderable
    fn framebuffer_complete(&mut self, framebuffer: NativeHandle) -> bool;

    /// Release a framebuffer object
    fn delete_framebuffer(&mut self, framebuffer: NativeHandle);

    /// Bind a framebuffer as render target (`None` = default backbuffer)
    fn bind_framebuffer(&mut self, framebuffer: Option<NativeHandle>);

    // ===== SHADERS =====

    /// Compile and link a program from its stage sources
    ///
    /// `separable` programs can be mixed inside a program pipeline.
    fn create_program(&mut self, sources: &[ShaderSource], separable: bool) -> Result<NativeHandle>;

    /// Release a program
    fn delete_program(&mut self, program: NativeHandle);

    /// Make a program current
    fn use_program(&mut self, program: NativeHandle);

    /// Look up the location of a named uniform (`None` if inactive)
    fn uniform_location(&mut self, program: NativeHandle, name: &str) -> Option<i32>;

    /// Set a uniform of a program by location
    fn set_uniform(&mut self, program: NativeHandle, location: i32, value: &UniformValue);

    /// Create an empty program pipeline
    fn create_program_pipeline(&mut self) -> Result<NativeHandle>;

    /// Use the given stage of a separable program in a program pipeline
    fn use_program_stage(&mut self, pipeline: NativeHandle, stage: ShaderStage, program: NativeHandle);

    /// Bind a program pipeline
    fn bind_program_pipeline(&mut self, pipeline: NativeHandle);

    /// Release a program pipeline
    fn delete_program_pipeline(&mut self, pipeline: NativeHandle);

    // ===== DRAWING =====

    /// Draw non-indexed primitives from the bound vertex array
    fn draw_arrays(&mut self, mode: PrimitiveMode, vertex_count: u32);

    /// Draw indexed primitives from the bound vertex array
    fn draw_elements(&mut self, mode: PrimitiveMode, index_count: u32, index_type: IndexType);

    /// Dispatch the current compute program
    fn dispatch_compute(&mut self, groups_x: u32, groups_y: u32, groups_z: u32);

    // ===== FIXED-FUNCTION STATE =====

    fn set_clear_color(&mut self, color: [f32; 4]);
    fn set_clear_depth(&mut self, depth: f32);
    fn set_clear_stencil(&mut self, stencil: i32);
    fn clear(&mut self, flags: ClearFlags);
    fn set_blend(&mut self, enabled: bool);
    fn set_blend_func(&mut self, src: BlendFactor, dst: BlendFactor);
    fn set_depth_test(&mut self, enabled: bool);
    fn set_scissor_test(&mut self, enabled: bool);
    fn set_cull_backfaces(&mut self, enabled: bool);
}

/// Lock a shared device, recovering from a poisoned mutex
pub fn lock_device(device: &Arc<Mutex<dyn GraphicsDevice>>) -> MutexGuard<'_, dyn GraphicsDevice + 'static> {
    device.lock().unwrap_or_else(PoisonError::into_inner)
}
