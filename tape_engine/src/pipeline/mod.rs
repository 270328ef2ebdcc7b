//! Pipeline module
//!
//! Recording of instruction tapes and their playback against the
//! resource repository.

mod instruction;
mod pipeline;
mod recorder;
mod state;
mod player;

pub use instruction::{Instruction, MatrixSource, Opcode};
pub use pipeline::Pipeline;
pub use state::{BoundResources, ImageBinding, RenderStats, RenderTarget, Transforms};
pub use player::PipelinePlayer;
