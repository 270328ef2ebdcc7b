//! Recorded operations.
//!
//! An `Instruction` is one step of a pipeline tape. Each variant carries
//! exactly the operands its operation needs; `Opcode` is the matching
//! fieldless tag used for diagnostics and statistics.

use std::fmt;
use std::sync::Arc;
use glam::{Mat4, Quat, Vec3, Vec4};
use crate::graphics_device::{
    AttachmentKind, AttachmentStorage, BlendFactor, ClearFlags, ColorFormat,
    FilterMode, ImageAccess, IndexType, PrimitiveMode, UniformValue,
};
use crate::resource::Handle;

/// Matrix computed when the instruction plays, not when it is recorded
#[derive(Clone)]
pub enum MatrixSource {
    /// A constant matrix
    Fixed(Mat4),
    /// Scale, then rotate, then translate
    Model {
        translation: Vec3,
        rotation: Quat,
        scale: Vec3,
    },
    /// Right-handed view matrix looking from `eye` at `target`
    LookAt { eye: Vec3, target: Vec3, up: Vec3 },
    /// Right-handed orthographic projection, depth mapped to [-1, 1]
    Orthographic {
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
        near: f32,
        far: f32,
    },
    /// Right-handed perspective projection, depth mapped to [-1, 1]
    ///
    /// With `aspect: None` the player's context width / height is used.
    Perspective {
        fov_y: f32,
        aspect: Option<f32>,
        near: f32,
        far: f32,
    },
    /// Caller-supplied computation; whatever it captures is owned by the
    /// closure
    Callback(Arc<dyn Fn() -> Mat4 + Send + Sync>),
}

impl MatrixSource {
    /// Wrap a closure
    pub fn callback<F>(f: F) -> Self
    where
        F: Fn() -> Mat4 + Send + Sync + 'static,
    {
        MatrixSource::Callback(Arc::new(f))
    }

    /// Perspective projection; `aspect: None` follows the context size
    pub fn perspective(fov_y: f32, aspect: Option<f32>, near: f32, far: f32) -> Self {
        MatrixSource::Perspective { fov_y, aspect, near, far }
    }

    pub fn orthographic(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Self {
        MatrixSource::Orthographic { left, right, bottom, top, near, far }
    }

    /// Compute the matrix
    pub fn resolve(&self, context_aspect: f32) -> Mat4 {
        match self {
            MatrixSource::Fixed(matrix) => *matrix,
            MatrixSource::Model { translation, rotation, scale } => {
                Mat4::from_scale_rotation_translation(*scale, *rotation, *translation)
            }
            MatrixSource::LookAt { eye, target, up } => Mat4::look_at_rh(*eye, *target, *up),
            MatrixSource::Orthographic { left, right, bottom, top, near, far } => {
                Mat4::orthographic_rh_gl(*left, *right, *bottom, *top, *near, *far)
            }
            MatrixSource::Perspective { fov_y, aspect, near, far } => {
                Mat4::perspective_rh_gl(*fov_y, aspect.unwrap_or(context_aspect), *near, *far)
            }
            MatrixSource::Callback(f) => f(),
        }
    }
}

impl From<Mat4> for MatrixSource {
    fn from(matrix: Mat4) -> Self {
        MatrixSource::Fixed(matrix)
    }
}

impl fmt::Debug for MatrixSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatrixSource::Fixed(m) => f.debug_tuple("Fixed").field(m).finish(),
            MatrixSource::Model { translation, rotation, scale } => f
                .debug_struct("Model")
                .field("translation", translation)
                .field("rotation", rotation)
                .field("scale", scale)
                .finish(),
            MatrixSource::LookAt { eye, target, up } => f
                .debug_struct("LookAt")
                .field("eye", eye)
                .field("target", target)
                .field("up", up)
                .finish(),
            MatrixSource::Orthographic { left, right, bottom, top, near, far } => f
                .debug_struct("Orthographic")
                .field("left", left)
                .field("right", right)
                .field("bottom", bottom)
                .field("top", top)
                .field("near", near)
                .field("far", far)
                .finish(),
            MatrixSource::Perspective { fov_y, aspect, near, far } => f
                .debug_struct("Perspective")
                .field("fov_y", fov_y)
                .field("aspect", aspect)
                .field("near", near)
                .field("far", far)
                .finish(),
            MatrixSource::Callback(_) => f.write_str("Callback(..)"),
        }
    }
}

/// Operation tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    // Transforms
    SetModelMatrix,
    SetViewMatrix,
    SetPerspectiveProjectionMatrix,
    SetOrthoProjectionMatrix,
    CalculateMvp,
    // Clear state
    SetClearColor,
    SetClearDepth,
    SetClearStencil,
    ClearCurrentFramebuffer,
    // Binding
    BindTexture,
    BindImage,
    BindShader,
    BindMesh,
    BindBackbuffer,
    BindFramebuffer,
    BindFramebufferAttachment,
    BindShaderPipeline,
    // Uniforms
    SetUniform,
    SetMvpUniform,
    SendUniforms,
    // Drawing
    Draw,
    DrawIndexed,
    DispatchCompute,
    // Fixed-function state
    SetFilterMode,
    SetBlend,
    SetBlendMode,
    SetDepthTest,
    SetScissorTest,
    SetCullBackfaces,
    /// Outside the catalogue (corrupt or foreign tape)
    Invalid,
}

/// One step of a pipeline tape
#[derive(Debug, Clone)]
pub enum Instruction {
    SetModelMatrix(MatrixSource),
    SetViewMatrix(MatrixSource),
    SetPerspectiveProjectionMatrix(MatrixSource),
    SetOrthoProjectionMatrix(MatrixSource),
    /// `mvp = projection * view * model`
    CalculateMvp,

    SetClearColor(Vec4),
    SetClearDepth(f32),
    SetClearStencil(i32),
    ClearCurrentFramebuffer(ClearFlags),

    BindTexture { texture: Handle, unit: u32 },
    BindImage {
        texture: Handle,
        unit: u32,
        access: ImageAccess,
        format: ColorFormat,
    },
    BindShader(Handle),
    BindMesh(Handle),
    BindBackbuffer,
    BindFramebuffer(Handle),
    BindFramebufferAttachment {
        framebuffer: Handle,
        unit: u32,
        kind: AttachmentKind,
        storage: AttachmentStorage,
    },
    BindShaderPipeline(Handle),

    SetUniform {
        shader: Handle,
        name: String,
        value: UniformValue,
    },
    /// Uniform receiving the player's `mvp` at play time
    SetMvpUniform { shader: Handle, name: String },
    SendUniforms(Handle),

    Draw { mode: PrimitiveMode, vertex_count: u32 },
    DrawIndexed {
        mode: PrimitiveMode,
        index_count: u32,
        index_type: IndexType,
    },
    /// Covers the context with work groups of the pipeline's size
    DispatchCompute,

    /// Filters of the most recently bound texture
    SetFilterMode { min: FilterMode, mag: FilterMode },
    SetBlend(bool),
    SetBlendMode { src: BlendFactor, dst: BlendFactor },
    SetDepthTest(bool),
    SetScissorTest(bool),
    SetCullBackfaces(bool),

    /// Raw opcode value that matches no operation
    Invalid(u32),
}

impl Instruction {
    pub fn opcode(&self) -> Opcode {
        match self {
            Instruction::SetModelMatrix(_) => Opcode::SetModelMatrix,
            Instruction::SetViewMatrix(_) => Opcode::SetViewMatrix,
            Instruction::SetPerspectiveProjectionMatrix(_) => Opcode::SetPerspectiveProjectionMatrix,
            Instruction::SetOrthoProjectionMatrix(_) => Opcode::SetOrthoProjectionMatrix,
            Instruction::CalculateMvp => Opcode::CalculateMvp,
            Instruction::SetClearColor(_) => Opcode::SetClearColor,
            Instruction::SetClearDepth(_) => Opcode::SetClearDepth,
            Instruction::SetClearStencil(_) => Opcode::SetClearStencil,
            Instruction::ClearCurrentFramebuffer(_) => Opcode::ClearCurrentFramebuffer,
            Instruction::BindTexture { .. } => Opcode::BindTexture,
            Instruction::BindImage { .. } => Opcode::BindImage,
            Instruction::BindShader(_) => Opcode::BindShader,
            Instruction::BindMesh(_) => Opcode::BindMesh,
            Instruction::BindBackbuffer => Opcode::BindBackbuffer,
            Instruction::BindFramebuffer(_) => Opcode::BindFramebuffer,
            Instruction::BindFramebufferAttachment { .. } => Opcode::BindFramebufferAttachment,
            Instruction::BindShaderPipeline(_) => Opcode::BindShaderPipeline,
            Instruction::SetUniform { .. } => Opcode::SetUniform,
            Instruction::SetMvpUniform { .. } => Opcode::SetMvpUniform,
            Instruction::SendUniforms(_) => Opcode::SendUniforms,
            Instruction::Draw { .. } => Opcode::Draw,
            Instruction::DrawIndexed { .. } => Opcode::DrawIndexed,
            Instruction::DispatchCompute => Opcode::DispatchCompute,
            Instruction::SetFilterMode { .. } => Opcode::SetFilterMode,
            Instruction::SetBlend(_) => Opcode::SetBlend,
            Instruction::SetBlendMode { .. } => Opcode::SetBlendMode,
            Instruction::SetDepthTest(_) => Opcode::SetDepthTest,
            Instruction::SetScissorTest(_) => Opcode::SetScissorTest,
            Instruction::SetCullBackfaces(_) => Opcode::SetCullBackfaces,
            Instruction::Invalid(_) => Opcode::Invalid,
        }
    }

    /// Resource handle operand, if the operation takes one
    pub fn resource(&self) -> Option<Handle> {
        match self {
            Instruction::BindTexture { texture, .. } | Instruction::BindImage { texture, .. } => Some(*texture),
            Instruction::BindShader(handle)
            | Instruction::BindMesh(handle)
            | Instruction::BindFramebuffer(handle)
            | Instruction::BindShaderPipeline(handle)
            | Instruction::SendUniforms(handle) => Some(*handle),
            Instruction::BindFramebufferAttachment { framebuffer, .. } => Some(*framebuffer),
            Instruction::SetUniform { shader, .. } | Instruction::SetMvpUniform { shader, .. } => Some(*shader),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "instruction_tests.rs"]
mod tests;
