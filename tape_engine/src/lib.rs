/*!
# Tape Engine

Record GPU command sequences once, replay them every frame.

Rendering work is written down ahead of time as a *pipeline*: a flat tape of
instructions (bind this shader, set that uniform, draw this mesh). A player
replays the selected tape on every `render()` call against a resource
repository, skipping binds that would not change anything.

## Architecture

- **GraphicsDevice**: trait over the native graphics API (GL-style calls)
- **ResourceManager**: handle-keyed repository of shaders, textures, meshes,
  framebuffers, atlases and shader pipelines
- **Pipeline**: named instruction tape, built with chaining recorder methods
- **PipelinePlayer**: replays the active pipeline with binding elision

Nothing on the playback path fails loudly: an unknown handle or an unusable
resource turns the instruction into a logged no-op.

```ignore
let mut resources = ResourceManager::new(device, LogChannel::console());
let shader = resources.create_shader(ShaderDesc::graphics("flat", VS, FS));
let quad = resources.create_mesh("quad");
// ... add positions and indices, then finalize

let mut pipeline = Pipeline::new("main");
pipeline
    .bind_shader(shader)
    .bind_mesh(quad)
    .calculate_mvp()
    .set_mvp_uniform(shader, "u_mvp")
    .send_uniforms(shader)
    .draw_indexed(PrimitiveMode::Triangles, 6, IndexType::U32);

let mut player = PipelinePlayer::new(Config::default(), LogChannel::console())?;
let main = player.add_pipeline(&pipeline);
player.use_pipeline(main);
player.render(&mut resources);
```
*/

// Internal modules
mod error;
mod config;
mod utils;
pub mod log;
pub mod graphics_device;
pub mod resource;
pub mod pipeline;

pub use error::{Error, Result};
pub use config::Config;

// Main tape namespace module
pub mod tape {
    // Error types
    pub use crate::error::{Error, Result};

    // Player configuration
    pub use crate::config::Config;

    // Repository and player
    pub use crate::resource::ResourceManager;
    pub use crate::pipeline::PipelinePlayer;

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{
            CallbackLogger, DefaultLogger, LogChannel, LogEntry, LogSeverity, Logger,
        };
    }

    // Device sub-module with the native API surface
    pub mod device {
        pub use crate::graphics_device::*;
    }

    // Resource sub-module
    pub mod resource {
        pub use crate::resource::*;
    }

    // Recording and playback sub-module
    pub mod pipeline {
        pub use crate::pipeline::*;
    }
}

// Re-export math library at crate root
pub use glam;
