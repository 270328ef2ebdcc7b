//! Resource-level shader program.
//!
//! A `Shader` owns one linked program plus a uniform cache. Uniform
//! assignments are staged as pending values and only reach the driver when
//! `send_uniforms` flushes them, in the order the names were first used.

use rustc_hash::FxHashMap;
use crate::error::{Error, Result};
use crate::graphics_device::{GraphicsDevice, NativeHandle, ShaderSource, ShaderStage, UniformValue};

/// Descriptor for creating a shader
#[derive(Debug, Clone)]
pub struct ShaderDesc {
    /// Debug name
    pub name: String,
    /// One source per stage
    pub sources: Vec<ShaderSource>,
    /// Link as a separable program (usable in a `ShaderPipeline`)
    pub separable: bool,
}

impl ShaderDesc {
    /// Vertex + fragment program
    pub fn graphics(name: &str, vertex: &str, fragment: &str) -> Self {
        Self {
            name: name.to_string(),
            sources: vec![
                ShaderSource::new(ShaderStage::Vertex, vertex),
                ShaderSource::new(ShaderStage::Fragment, fragment),
            ],
            separable: false,
        }
    }

    /// Compute-only program
    pub fn compute(name: &str, compute: &str) -> Self {
        Self {
            name: name.to_string(),
            sources: vec![ShaderSource::new(ShaderStage::Compute, compute)],
            separable: false,
        }
    }
}

/// Cached uniform: location looked up once, value staged until flushed
#[derive(Debug, Clone)]
struct UniformSlot {
    name: String,
    location: Option<i32>,
    pending: Option<UniformValue>,
}

/// A linked shader program
///
/// A shader whose compilation failed stays registered but has no program:
/// `is_functional()` is false and every operation on it is a no-op.
#[derive(Debug)]
pub struct Shader {
    name: String,
    program: Option<NativeHandle>,
    stages: Vec<ShaderStage>,
    separable: bool,
    sources: Vec<ShaderSource>,
    uniforms: Vec<UniformSlot>,
    uniform_index: FxHashMap<String, usize>,
}

impl Shader {
    /// Create an unbuilt shader from its descriptor
    pub fn new(desc: ShaderDesc) -> Self {
        Self {
            name: desc.name,
            program: None,
            stages: desc.sources.iter().map(|s| s.stage).collect(),
            separable: desc.separable,
            sources: desc.sources,
            uniforms: Vec::new(),
            uniform_index: FxHashMap::default(),
        }
    }

    /// Compile and link the program on the device
    ///
    /// On failure the shader keeps no program and stays non-functional.
    pub fn build(&mut self, device: &mut dyn GraphicsDevice) -> Result<()> {
        if self.program.is_some() {
            return Err(Error::InvalidResource(format!("shader '{}' is already built", self.name)));
        }
        let program = device.create_program(&self.sources, self.separable)?;
        self.program = Some(program);
        Ok(())
    }

    // ===== ACCESSORS =====

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Native program, `None` if compilation failed
    pub fn program(&self) -> Option<NativeHandle> {
        self.program
    }

    /// Whether the program compiled and linked
    pub fn is_functional(&self) -> bool {
        self.program.is_some()
    }

    pub fn stages(&self) -> &[ShaderStage] {
        &self.stages
    }

    pub fn has_stage(&self, stage: ShaderStage) -> bool {
        self.stages.contains(&stage)
    }

    pub fn is_separable(&self) -> bool {
        self.separable
    }

    /// Number of uniform names seen so far
    pub fn uniform_count(&self) -> usize {
        self.uniforms.len()
    }

    /// Number of staged values waiting for `send_uniforms`
    pub fn pending_uniform_count(&self) -> usize {
        self.uniforms.iter().filter(|u| u.pending.is_some()).count()
    }

    /// Cached location of a uniform (`None` if never set or inactive)
    pub fn uniform_location(&self, name: &str) -> Option<i32> {
        self.uniform_index
            .get(name)
            .and_then(|&i| self.uniforms[i].location)
    }

    /// Staged value of a uniform
    pub fn pending_uniform(&self, name: &str) -> Option<&UniformValue> {
        self.uniform_index
            .get(name)
            .and_then(|&i| self.uniforms[i].pending.as_ref())
    }

    // ===== OPERATIONS =====

    /// Make the program current
    pub fn use_program(&self, device: &mut dyn GraphicsDevice) -> Result<()> {
        let program = self.require_program()?;
        device.use_program(program);
        Ok(())
    }

    /// Stage a uniform value
    ///
    /// The location is looked up on first use of `name` and cached, even
    /// when the driver reports the uniform as inactive.
    pub fn set_uniform(&mut self, device: &mut dyn GraphicsDevice, name: &str, value: UniformValue) -> Result<()> {
        let program = self.require_program()?;
        let index = match self.uniform_index.get(name) {
            Some(&index) => index,
            None => {
                let location = device.uniform_location(program, name);
                self.uniforms.push(UniformSlot {
                    name: name.to_string(),
                    location,
                    pending: None,
                });
                let index = self.uniforms.len() - 1;
                self.uniform_index.insert(name.to_string(), index);
                index
            }
        };
        self.uniforms[index].pending = Some(value);
        Ok(())
    }

    /// Send every staged value to the driver
    ///
    /// Returns the number of values sent. Values for inactive uniforms are
    /// dropped.
    pub fn send_uniforms(&mut self, device: &mut dyn GraphicsDevice) -> Result<usize> {
        let program = self.require_program()?;
        let mut sent = 0;
        for slot in &mut self.uniforms {
            if let Some(value) = slot.pending.take() {
                if let Some(location) = slot.location {
                    device.set_uniform(program, location, &value);
                    sent += 1;
                }
            }
        }
        Ok(sent)
    }

    /// Names of the cached uniforms in first-use order
    pub fn uniform_names(&self) -> impl Iterator<Item = &str> {
        self.uniforms.iter().map(|u| u.name.as_str())
    }

    /// Release the program
    pub(crate) fn destroy(&mut self, device: &mut dyn GraphicsDevice) {
        if let Some(program) = self.program.take() {
            device.delete_program(program);
        }
        self.uniforms.clear();
        self.uniform_index.clear();
    }

    fn require_program(&self) -> Result<NativeHandle> {
        self.program.ok_or_else(|| {
            Error::InvalidResource(format!("shader '{}' has no linked program", self.name))
        })
    }
}

#[cfg(test)]
#[path = "shader_tests.rs"]
mod tests;
