//! Opaque resource handles.

use std::fmt;

/// Opaque identifier of one resource inside one category of the
/// `ResourceManager` (shader, texture, mesh, framebuffer, atlas,
/// shader pipeline) or of a pipeline registered with a `PipelinePlayer`.
///
/// Handles are issued from zero upward and never reused. `Handle::INVALID`
/// (`u64::MAX`) means "no resource".
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Handle(u64);

impl Handle {
    /// The "no resource" sentinel
    pub const INVALID: Handle = Handle(u64::MAX);

    /// Wrap a raw integer
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw integer
    pub const fn raw(&self) -> u64 {
        self.0
    }

    /// Whether this is not the sentinel
    ///
    /// A valid handle may still be stale (deleted).
    pub const fn is_valid(&self) -> bool {
        self.0 != u64::MAX
    }
}

impl Default for Handle {
    fn default() -> Self {
        Handle::INVALID
    }
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "Handle({})", self.0)
        } else {
            f.write_str("Handle(INVALID)")
        }
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "#{}", self.0)
        } else {
            f.write_str("#invalid")
        }
    }
}

#[cfg(test)]
#[path = "handle_tests.rs"]
mod tests;
