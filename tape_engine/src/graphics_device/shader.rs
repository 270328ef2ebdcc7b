/// Shader stage types

/// Programmable pipeline stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
    Geometry,
    Compute,
}

/// Source text of one shader stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSource {
    /// Stage the source compiles to
    pub stage: ShaderStage,
    /// Source code
    pub source: String,
}

impl ShaderSource {
    pub fn new(stage: ShaderStage, source: impl Into<String>) -> Self {
        Self { stage, source: source.into() }
    }
}
