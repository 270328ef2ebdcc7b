/// Graphics device module - the upstream hardware API and its types

// Module declarations
pub mod graphics_device;
pub mod buffer;
pub mod texture;
pub mod shader;
pub mod state;
pub mod uniform;
pub mod frame_buffer;

// Recording device for tests and headless hosts (no GPU required)
pub mod mock_graphics_device;

// Re-export everything from graphics_device.rs
pub use graphics_device::*;

// Re-export from other modules
pub use buffer::*;
pub use texture::*;
pub use shader::*;
pub use state::*;
pub use uniform::*;
pub use frame_buffer::*;
