//! Program pipeline assembled from separable shaders.
//!
//! Each stage slot refers to a separable `Shader` by handle; binding the
//! pipeline makes all attached stages current at once.

use rustc_hash::FxHashMap;
use crate::error::{Error, Result};
use crate::graphics_device::{GraphicsDevice, NativeHandle, ShaderStage};
use crate::resource::{Handle, Shader};

#[derive(Debug)]
pub struct ShaderPipeline {
    name: String,
    native: Option<NativeHandle>,
    stages: FxHashMap<ShaderStage, Handle>,
}

impl ShaderPipeline {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            native: None,
            stages: FxHashMap::default(),
        }
    }

    /// Create the native program pipeline object
    pub fn build(&mut self, device: &mut dyn GraphicsDevice) -> Result<()> {
        if self.native.is_some() {
            return Err(Error::InvalidResource(format!("shader pipeline '{}' is already built", self.name)));
        }
        self.native = Some(device.create_program_pipeline()?);
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn native(&self) -> Option<NativeHandle> {
        self.native
    }

    pub fn is_functional(&self) -> bool {
        self.native.is_some()
    }

    /// Shader attached to `stage`, if any
    pub fn stage(&self, stage: ShaderStage) -> Option<Handle> {
        self.stages.get(&stage).copied()
    }

    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    /// Use `shader`'s program for `stage`
    ///
    /// The shader must be separable, linked and contain `stage`. A previous
    /// shader on the same stage is replaced.
    pub fn attach(
        &mut self,
        device: &mut dyn GraphicsDevice,
        stage: ShaderStage,
        handle: Handle,
        shader: &Shader,
    ) -> Result<()> {
        let native = self.require_native()?;
        let program = shader.program().ok_or_else(|| {
            Error::InvalidResource(format!("shader '{}' has no linked program", shader.name()))
        })?;
        if !shader.is_separable() {
            return Err(Error::InvalidResource(format!(
                "shader '{}' is not separable and cannot join pipeline '{}'",
                shader.name(),
                self.name
            )));
        }
        if !shader.has_stage(stage) {
            return Err(Error::InvalidResource(format!(
                "shader '{}' has no {:?} stage",
                shader.name(),
                stage
            )));
        }

        device.use_program_stage(native, stage, program);
        self.stages.insert(stage, handle);
        Ok(())
    }

    /// Make the pipeline current
    pub fn bind(&self, device: &mut dyn GraphicsDevice) -> Result<()> {
        device.bind_program_pipeline(self.require_native()?);
        Ok(())
    }

    pub(crate) fn destroy(&mut self, device: &mut dyn GraphicsDevice) {
        if let Some(native) = self.native.take() {
            device.delete_program_pipeline(native);
        }
        self.stages.clear();
    }

    fn require_native(&self) -> Result<NativeHandle> {
        self.native.ok_or_else(|| {
            Error::InvalidResource(format!("shader pipeline '{}' has no native object", self.name))
        })
    }
}

#[cfg(test)]
#[path = "shader_pipeline_tests.rs"]
mod tests;
