//! Resource-level texture.
//!
//! Wraps one native 2D texture with the metadata the engine needs to
//! re-upload, resize and re-filter it.

use crate::error::{Error, Result};
use crate::graphics_device::{ColorFormat, FilterMode, GraphicsDevice, ImageAccess, NativeHandle};

/// Descriptor for creating a texture
#[derive(Debug, Clone)]
pub struct TextureDesc {
    /// Debug name
    pub name: String,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Pixel format
    pub format: ColorFormat,
    /// Initial pixels (tightly packed rows), or uninitialized storage
    pub data: Option<Vec<u8>>,
    /// Minification filter
    pub min_filter: FilterMode,
    /// Magnification filter
    pub mag_filter: FilterMode,
}

impl TextureDesc {
    /// Uninitialized texture with linear filtering
    pub fn empty(name: &str, width: u32, height: u32, format: ColorFormat) -> Self {
        Self {
            name: name.to_string(),
            width,
            height,
            format,
            data: None,
            min_filter: FilterMode::Linear,
            mag_filter: FilterMode::Linear,
        }
    }

    /// Texture filled with `data`
    pub fn with_data(name: &str, width: u32, height: u32, format: ColorFormat, data: Vec<u8>) -> Self {
        Self {
            data: Some(data),
            ..Self::empty(name, width, height, format)
        }
    }
}

/// A 2D texture
#[derive(Debug)]
pub struct Texture {
    name: String,
    native: Option<NativeHandle>,
    width: u32,
    height: u32,
    format: ColorFormat,
    min_filter: FilterMode,
    mag_filter: FilterMode,
    initial_data: Option<Vec<u8>>,
}

impl Texture {
    /// Create an unbuilt texture from its descriptor
    pub fn new(desc: TextureDesc) -> Self {
        Self {
            name: desc.name,
            native: None,
            width: desc.width,
            height: desc.height,
            format: desc.format,
            min_filter: desc.min_filter,
            mag_filter: desc.mag_filter,
            initial_data: desc.data,
        }
    }

    /// Allocate the native texture and upload the initial pixels
    pub fn build(&mut self, device: &mut dyn GraphicsDevice) -> Result<()> {
        if self.native.is_some() {
            return Err(Error::InvalidResource(format!("texture '{}' is already built", self.name)));
        }
        let data = self.initial_data.take();
        if let Some(data) = &data {
            self.check_data_len(self.width, self.height, data)?;
        }
        self.check_size(self.width, self.height)?;

        let native = device.create_texture(self.width, self.height, self.format, data.as_deref())?;
        device.set_texture_filter(native, self.min_filter, self.mag_filter);
        self.native = Some(native);
        Ok(())
    }

    // ===== ACCESSORS =====

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Native texture, `None` if creation failed
    pub fn native(&self) -> Option<NativeHandle> {
        self.native
    }

    pub fn is_functional(&self) -> bool {
        self.native.is_some()
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn format(&self) -> ColorFormat {
        self.format
    }

    /// (min, mag) filters
    pub fn filter(&self) -> (FilterMode, FilterMode) {
        (self.min_filter, self.mag_filter)
    }

    // ===== OPERATIONS =====

    /// Bind for sampling on `unit`
    pub fn bind(&self, device: &mut dyn GraphicsDevice, unit: u32) -> Result<()> {
        device.bind_texture(self.require_native()?, unit);
        Ok(())
    }

    /// Bind as a load/store image on `unit`
    pub fn bind_image(
        &self,
        device: &mut dyn GraphicsDevice,
        unit: u32,
        access: ImageAccess,
        format: ColorFormat,
    ) -> Result<()> {
        device.bind_image(self.require_native()?, unit, access, format);
        Ok(())
    }

    /// Replace the whole contents (same size and format)
    pub fn upload(&mut self, device: &mut dyn GraphicsDevice, data: &[u8]) -> Result<()> {
        let native = self.require_native()?;
        self.check_data_len(self.width, self.height, data)?;
        device.upload_texture(native, self.width, self.height, self.format, Some(data))
    }

    /// Reallocate storage at a new size; previous contents are lost
    pub fn resize(&mut self, device: &mut dyn GraphicsDevice, width: u32, height: u32) -> Result<()> {
        let native = self.require_native()?;
        self.check_size(width, height)?;
        device.upload_texture(native, width, height, self.format, None)?;
        self.width = width;
        self.height = height;
        Ok(())
    }

    /// Change the sampling filters
    pub fn set_filter(&mut self, device: &mut dyn GraphicsDevice, min: FilterMode, mag: FilterMode) -> Result<()> {
        let native = self.require_native()?;
        device.set_texture_filter(native, min, mag);
        self.min_filter = min;
        self.mag_filter = mag;
        Ok(())
    }

    /// Release the native texture
    pub(crate) fn destroy(&mut self, device: &mut dyn GraphicsDevice) {
        if let Some(native) = self.native.take() {
            device.delete_texture(native);
        }
    }

    fn require_native(&self) -> Result<NativeHandle> {
        self.native.ok_or_else(|| {
            Error::InvalidResource(format!("texture '{}' has no native storage", self.name))
        })
    }

    fn check_size(&self, width: u32, height: u32) -> Result<()> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidResource(format!(
                "texture '{}' cannot be {}x{}",
                self.name, width, height
            )));
        }
        Ok(())
    }

    fn check_data_len(&self, width: u32, height: u32, data: &[u8]) -> Result<()> {
        let expected = width as usize * height as usize * self.format.bytes_per_pixel() as usize;
        if data.len() != expected {
            return Err(Error::InvalidResource(format!(
                "texture '{}' expects {} bytes, got {}",
                self.name,
                expected,
                data.len()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "texture_tests.rs"]
mod tests;
