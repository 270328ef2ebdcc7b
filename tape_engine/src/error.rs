//! Error types for the tape engine
//!
//! Errors only cross the upstream boundary (graphics device calls) and
//! configuration. The repository and the player turn every one of them into
//! a log entry and a no-op.

use std::fmt;

/// Result type for tape engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Tape engine errors
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Backend-specific error reported by the graphics device
    BackendError(String),

    /// Out of GPU memory
    OutOfMemory,

    /// Invalid resource (texture, buffer, shader, etc.)
    InvalidResource(String),

    /// Initialization failed (player, repository, device)
    InitializationFailed(String),

    /// Shader stage compilation or program link failed
    ShaderCompilationFailed(String),

    /// Rejected configuration value
    InvalidConfig(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::OutOfMemory => write!(f, "Out of GPU memory"),
            Error::InvalidResource(msg) => write!(f, "Invalid resource: {}", msg),
            Error::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
            Error::ShaderCompilationFailed(msg) => write!(f, "Shader compilation failed: {}", msg),
            Error::InvalidConfig(msg) => write!(f, "Invalid configuration: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
