/// Player configuration

use crate::error::{Error, Result};

/// Configuration of a `PipelinePlayer`
///
/// The context size is the drawable size of the host window; it feeds
/// compute dispatch sizing and perspective matrices without an explicit
/// aspect ratio.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Application name (diagnostics only)
    pub app_name: String,
    /// Drawable width in pixels
    pub context_width: u32,
    /// Drawable height in pixels
    pub context_height: u32,
    /// Number of texture units tracked by the binding cache
    pub max_texture_units: u32,
    /// Number of image units tracked by the binding cache
    pub max_image_units: u32,
    /// Compute work-group size given to newly created pipelines (x, y)
    pub default_work_group_size: (u32, u32),
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_name: "Tape Application".to_string(),
            context_width: 800,
            context_height: 600,
            max_texture_units: 32,
            max_image_units: 8,
            default_work_group_size: (16, 16),
        }
    }
}

impl Config {
    /// Check every field, returning the first problem found
    pub fn validate(&self) -> Result<()> {
        if self.context_width == 0 || self.context_height == 0 {
            return Err(Error::InvalidConfig(format!(
                "context size must be non-zero, got {}x{}",
                self.context_width, self.context_height
            )));
        }
        if self.max_texture_units == 0 {
            return Err(Error::InvalidConfig("max_texture_units must be non-zero".to_string()));
        }
        if self.max_image_units == 0 {
            return Err(Error::InvalidConfig("max_image_units must be non-zero".to_string()));
        }
        let (x, y) = self.default_work_group_size;
        if x == 0 || y == 0 {
            return Err(Error::InvalidConfig(format!(
                "work-group size must be non-zero, got {}x{}",
                x, y
            )));
        }
        Ok(())
    }

    /// Width / height of the drawable
    pub fn aspect_ratio(&self) -> f32 {
        self.context_width as f32 / self.context_height.max(1) as f32
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
