//! Recorded pipeline.
//!
//! A `Pipeline` is a named instruction tape. It is built once through the
//! recording methods (see `recorder.rs`), registered with a
//! `PipelinePlayer`, and replayed start to finish on every `render()`.
//! Recording never touches the device or the repository.

use crate::pipeline::Instruction;

#[derive(Debug, Clone)]
pub struct Pipeline {
    name: String,
    instructions: Vec<Instruction>,
    work_group_size: Option<(u32, u32)>,
}

impl Pipeline {
    /// Create an empty pipeline
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            instructions: Vec::new(),
            work_group_size: None,
        }
    }

    /// Create a pipeline from an already built tape
    pub fn from_instructions(name: &str, instructions: Vec<Instruction>) -> Self {
        Self {
            name: name.to_string(),
            instructions,
            work_group_size: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The tape, in playback order
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Compute work-group size, `None` to use the player's default
    pub fn work_group_size(&self) -> Option<(u32, u32)> {
        self.work_group_size
    }

    /// Set the work-group size used to size `dispatch_compute`
    pub fn set_work_group_size(&mut self, x: u32, y: u32) -> &mut Self {
        self.work_group_size = Some((x, y));
        self
    }

    /// Append one instruction
    pub fn push(&mut self, instruction: Instruction) -> &mut Self {
        self.instructions.push(instruction);
        self
    }

    /// Drop every recorded instruction
    pub fn clear(&mut self) {
        self.instructions.clear();
    }
}
