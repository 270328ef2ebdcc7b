//! Recording API: one method per operation.
//!
//! Every method appends exactly one instruction and returns the pipeline so
//! calls chain. Handles are not checked here; a missing resource is only
//! noticed (and skipped) at playback.
//!
//! ```ignore
//! let mut pipeline = Pipeline::new("main");
//! pipeline
//!     .bind_shader(shader)
//!     .bind_mesh(quad)
//!     .set_model_matrix(Mat4::IDENTITY)
//!     .calculate_mvp()
//!     .set_mvp_uniform(shader, "u_mvp")
//!     .send_uniforms(shader)
//!     .draw_indexed(PrimitiveMode::Triangles, 6, IndexType::U32);
//! ```

use glam::{
    IVec2, IVec3, IVec4, Mat3, Mat4, UVec2, UVec3, UVec4, Vec2, Vec3, Vec4,
};
use crate::graphics_device::{
    AttachmentKind, AttachmentStorage, BlendFactor, ClearFlags, ColorFormat,
    FilterMode, ImageAccess, IndexType, PrimitiveMode, UniformValue,
};
use crate::pipeline::{Instruction, MatrixSource, Pipeline};
use crate::resource::Handle;

impl Pipeline {
    // ===== TRANSFORMS =====

    pub fn set_model_matrix(&mut self, source: impl Into<MatrixSource>) -> &mut Self {
        self.push(Instruction::SetModelMatrix(source.into()))
    }

    pub fn set_view_matrix(&mut self, source: impl Into<MatrixSource>) -> &mut Self {
        self.push(Instruction::SetViewMatrix(source.into()))
    }

    /// Usually `MatrixSource::perspective(..)`
    pub fn set_perspective_projection_matrix(&mut self, source: impl Into<MatrixSource>) -> &mut Self {
        self.push(Instruction::SetPerspectiveProjectionMatrix(source.into()))
    }

    /// Usually `MatrixSource::orthographic(..)`
    pub fn set_ortho_projection_matrix(&mut self, source: impl Into<MatrixSource>) -> &mut Self {
        self.push(Instruction::SetOrthoProjectionMatrix(source.into()))
    }

    pub fn calculate_mvp(&mut self) -> &mut Self {
        self.push(Instruction::CalculateMvp)
    }

    // ===== CLEAR STATE =====

    pub fn set_clear_color(&mut self, color: Vec4) -> &mut Self {
        self.push(Instruction::SetClearColor(color))
    }

    pub fn set_clear_depth(&mut self, depth: f32) -> &mut Self {
        self.push(Instruction::SetClearDepth(depth))
    }

    pub fn set_clear_stencil(&mut self, stencil: i32) -> &mut Self {
        self.push(Instruction::SetClearStencil(stencil))
    }

    pub fn clear_current_framebuffer(&mut self, flags: ClearFlags) -> &mut Self {
        self.push(Instruction::ClearCurrentFramebuffer(flags))
    }

    // ===== BINDING =====

    pub fn bind_texture(&mut self, texture: Handle, unit: u32) -> &mut Self {
        self.push(Instruction::BindTexture { texture, unit })
    }

    pub fn bind_image(&mut self, texture: Handle, unit: u32, access: ImageAccess, format: ColorFormat) -> &mut Self {
        self.push(Instruction::BindImage { texture, unit, access, format })
    }

    pub fn bind_shader(&mut self, shader: Handle) -> &mut Self {
        self.push(Instruction::BindShader(shader))
    }

    pub fn bind_mesh(&mut self, mesh: Handle) -> &mut Self {
        self.push(Instruction::BindMesh(mesh))
    }

    pub fn bind_backbuffer(&mut self) -> &mut Self {
        self.push(Instruction::BindBackbuffer)
    }

    pub fn bind_framebuffer(&mut self, framebuffer: Handle) -> &mut Self {
        self.push(Instruction::BindFramebuffer(framebuffer))
    }

    pub fn bind_framebuffer_attachment(
        &mut self,
        framebuffer: Handle,
        unit: u32,
        kind: AttachmentKind,
        storage: AttachmentStorage,
    ) -> &mut Self {
        self.push(Instruction::BindFramebufferAttachment { framebuffer, unit, kind, storage })
    }

    pub fn bind_shader_pipeline(&mut self, shader_pipeline: Handle) -> &mut Self {
        self.push(Instruction::BindShaderPipeline(shader_pipeline))
    }

    // ===== UNIFORMS =====

    /// Any uniform value
    pub fn set_uniform(&mut self, shader: Handle, name: &str, value: impl Into<UniformValue>) -> &mut Self {
        self.push(Instruction::SetUniform {
            shader,
            name: name.to_string(),
            value: value.into(),
        })
    }

    pub fn set_uniform_f32(&mut self, shader: Handle, name: &str, value: f32) -> &mut Self {
        self.set_uniform(shader, name, value)
    }

    pub fn set_uniform_i8(&mut self, shader: Handle, name: &str, value: i8) -> &mut Self {
        self.set_uniform(shader, name, value)
    }

    pub fn set_uniform_i16(&mut self, shader: Handle, name: &str, value: i16) -> &mut Self {
        self.set_uniform(shader, name, value)
    }

    pub fn set_uniform_i32(&mut self, shader: Handle, name: &str, value: i32) -> &mut Self {
        self.set_uniform(shader, name, value)
    }

    pub fn set_uniform_u8(&mut self, shader: Handle, name: &str, value: u8) -> &mut Self {
        self.set_uniform(shader, name, value)
    }

    pub fn set_uniform_u16(&mut self, shader: Handle, name: &str, value: u16) -> &mut Self {
        self.set_uniform(shader, name, value)
    }

    pub fn set_uniform_u32(&mut self, shader: Handle, name: &str, value: u32) -> &mut Self {
        self.set_uniform(shader, name, value)
    }

    pub fn set_uniform_vec2(&mut self, shader: Handle, name: &str, value: Vec2) -> &mut Self {
        self.set_uniform(shader, name, value)
    }

    pub fn set_uniform_vec3(&mut self, shader: Handle, name: &str, value: Vec3) -> &mut Self {
        self.set_uniform(shader, name, value)
    }

    pub fn set_uniform_vec4(&mut self, shader: Handle, name: &str, value: Vec4) -> &mut Self {
        self.set_uniform(shader, name, value)
    }

    pub fn set_uniform_ivec2(&mut self, shader: Handle, name: &str, value: IVec2) -> &mut Self {
        self.set_uniform(shader, name, value)
    }

    pub fn set_uniform_ivec3(&mut self, shader: Handle, name: &str, value: IVec3) -> &mut Self {
        self.set_uniform(shader, name, value)
    }

    pub fn set_uniform_ivec4(&mut self, shader: Handle, name: &str, value: IVec4) -> &mut Self {
        self.set_uniform(shader, name, value)
    }

    pub fn set_uniform_uvec2(&mut self, shader: Handle, name: &str, value: UVec2) -> &mut Self {
        self.set_uniform(shader, name, value)
    }

    pub fn set_uniform_uvec3(&mut self, shader: Handle, name: &str, value: UVec3) -> &mut Self {
        self.set_uniform(shader, name, value)
    }

    pub fn set_uniform_uvec4(&mut self, shader: Handle, name: &str, value: UVec4) -> &mut Self {
        self.set_uniform(shader, name, value)
    }

    pub fn set_uniform_mat3(&mut self, shader: Handle, name: &str, value: Mat3) -> &mut Self {
        self.set_uniform(shader, name, value)
    }

    pub fn set_uniform_mat4(&mut self, shader: Handle, name: &str, value: Mat4) -> &mut Self {
        self.set_uniform(shader, name, value)
    }

    /// Uniform set to the player's `mvp` when the instruction plays
    pub fn set_mvp_uniform(&mut self, shader: Handle, name: &str) -> &mut Self {
        self.push(Instruction::SetMvpUniform {
            shader,
            name: name.to_string(),
        })
    }

    pub fn send_uniforms(&mut self, shader: Handle) -> &mut Self {
        self.push(Instruction::SendUniforms(shader))
    }

    // ===== DRAWING =====

    pub fn draw(&mut self, mode: PrimitiveMode, vertex_count: u32) -> &mut Self {
        self.push(Instruction::Draw { mode, vertex_count })
    }

    pub fn draw_indexed(&mut self, mode: PrimitiveMode, index_count: u32, index_type: IndexType) -> &mut Self {
        self.push(Instruction::DrawIndexed { mode, index_count, index_type })
    }

    pub fn dispatch_compute(&mut self) -> &mut Self {
        self.push(Instruction::DispatchCompute)
    }

    // ===== FIXED-FUNCTION STATE =====

    pub fn set_filter_mode(&mut self, min: FilterMode, mag: FilterMode) -> &mut Self {
        self.push(Instruction::SetFilterMode { min, mag })
    }

    pub fn set_blend(&mut self, enabled: bool) -> &mut Self {
        self.push(Instruction::SetBlend(enabled))
    }

    pub fn set_blend_mode(&mut self, src: BlendFactor, dst: BlendFactor) -> &mut Self {
        self.push(Instruction::SetBlendMode { src, dst })
    }

    pub fn set_depth_test(&mut self, enabled: bool) -> &mut Self {
        self.push(Instruction::SetDepthTest(enabled))
    }

    pub fn set_scissor_test(&mut self, enabled: bool) -> &mut Self {
        self.push(Instruction::SetScissorTest(enabled))
    }

    pub fn set_cull_backfaces(&mut self, enabled: bool) -> &mut Self {
        self.push(Instruction::SetCullBackfaces(enabled))
    }
}

#[cfg(test)]
#[path = "recorder_tests.rs"]
mod tests;
