//! Resource-level framebuffer.
//!
//! A `Framebuffer` owns its native framebuffer object and one native
//! texture or renderbuffer per attachment. Texture attachments can be bound
//! back as sampler inputs with `bind_attachment`.

use crate::error::{Error, Result};
use crate::graphics_device::{
    AttachmentKind, AttachmentStorage, ColorFormat, GraphicsDevice, NativeHandle,
};

/// Description of one attachment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttachmentDesc {
    /// Attachment point
    pub kind: AttachmentKind,
    /// Texture (sampleable) or renderbuffer
    pub storage: AttachmentStorage,
    /// Pixel format
    pub format: ColorFormat,
}

impl AttachmentDesc {
    pub fn new(kind: AttachmentKind, storage: AttachmentStorage, format: ColorFormat) -> Self {
        Self { kind, storage, format }
    }
}

/// Descriptor for creating a framebuffer
#[derive(Debug, Clone)]
pub struct FramebufferDesc {
    /// Debug name
    pub name: String,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Attachments, created in order
    pub attachments: Vec<AttachmentDesc>,
}

impl FramebufferDesc {
    /// RGBA8 color texture + depth renderbuffer, the common offscreen target
    pub fn color_depth(name: &str, width: u32, height: u32) -> Self {
        Self {
            name: name.to_string(),
            width,
            height,
            attachments: vec![
                AttachmentDesc::new(AttachmentKind::Color(0), AttachmentStorage::Texture, ColorFormat::Rgba8),
                AttachmentDesc::new(AttachmentKind::Depth, AttachmentStorage::Renderbuffer, ColorFormat::Depth24),
            ],
        }
    }
}

#[derive(Debug, Clone)]
struct Attachment {
    desc: AttachmentDesc,
    native: NativeHandle,
}

/// Offscreen render target
#[derive(Debug)]
pub struct Framebuffer {
    name: String,
    width: u32,
    height: u32,
    native: Option<NativeHandle>,
    pending: Vec<AttachmentDesc>,
    attachments: Vec<Attachment>,
    complete: bool,
}

impl Framebuffer {
    /// Create an unbuilt framebuffer from its descriptor
    pub fn new(desc: FramebufferDesc) -> Self {
        Self {
            name: desc.name,
            width: desc.width,
            height: desc.height,
            native: None,
            pending: desc.attachments,
            attachments: Vec::new(),
            complete: false,
        }
    }

    /// Create the framebuffer object and its attachments
    ///
    /// A degenerate configuration (zero size, no attachments, incomplete
    /// framebuffer) returns an error but leaves whatever was created in
    /// place; the framebuffer then reports `is_complete() == false`.
    pub fn build(&mut self, device: &mut dyn GraphicsDevice) -> Result<()> {
        if self.native.is_some() {
            return Err(Error::InvalidResource(format!("framebuffer '{}' is already built", self.name)));
        }
        self.check_size(self.width, self.height)?;
        self.native = Some(device.create_framebuffer()?);

        for desc in std::mem::take(&mut self.pending) {
            self.attach(device, desc)?;
        }
        self.check_complete(device)
    }

    // ===== ACCESSORS =====

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn native(&self) -> Option<NativeHandle> {
        self.native
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Whether the device reported the framebuffer renderable
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn attachment_count(&self) -> usize {
        self.attachments.len()
    }

    /// Native texture or renderbuffer behind an attachment
    pub fn attachment_native(&self, kind: AttachmentKind, storage: AttachmentStorage) -> Option<NativeHandle> {
        self.find(kind, storage).map(|a| a.native)
    }

    // ===== OPERATIONS =====

    /// Add an attachment after creation
    pub fn add_attachment(&mut self, device: &mut dyn GraphicsDevice, desc: AttachmentDesc) -> Result<()> {
        self.require_native()?;
        self.attach(device, desc)?;
        self.check_complete(device)
    }

    /// Bind as render target
    pub fn bind(&self, device: &mut dyn GraphicsDevice) -> Result<()> {
        device.bind_framebuffer(Some(self.require_native()?));
        Ok(())
    }

    /// Bind a texture attachment for sampling on `unit`
    pub fn bind_attachment(
        &self,
        device: &mut dyn GraphicsDevice,
        unit: u32,
        kind: AttachmentKind,
        storage: AttachmentStorage,
    ) -> Result<()> {
        if storage == AttachmentStorage::Renderbuffer {
            return Err(Error::InvalidResource(format!(
                "framebuffer '{}': renderbuffer attachment {:?} cannot be sampled",
                self.name, kind
            )));
        }
        let attachment = self.find(kind, storage).ok_or_else(|| {
            Error::InvalidResource(format!(
                "framebuffer '{}' has no {:?} {:?} attachment",
                self.name, storage, kind
            ))
        })?;
        device.bind_texture(attachment.native, unit);
        Ok(())
    }

    /// Recreate every attachment at a new size
    ///
    /// Every attachment is retried even after a failure. Attachments the
    /// device could not recreate stay pending and are retried by the next
    /// resize; until then the framebuffer is incomplete.
    pub fn resize(&mut self, device: &mut dyn GraphicsDevice, width: u32, height: u32) -> Result<()> {
        self.require_native()?;
        self.check_size(width, height)?;

        let mut descs: Vec<AttachmentDesc> = self.attachments.iter().map(|a| a.desc).collect();
        descs.append(&mut self.pending);
        self.release_attachments(device);
        self.complete = false;
        self.width = width;
        self.height = height;

        let mut first_error = None;
        for desc in descs {
            if let Err(err) = self.attach(device, desc) {
                self.pending.push(desc);
                first_error.get_or_insert(err);
            }
        }
        match first_error {
            Some(err) => Err(err),
            None => self.check_complete(device),
        }
    }

    /// Release the framebuffer and its attachments
    pub(crate) fn destroy(&mut self, device: &mut dyn GraphicsDevice) {
        self.release_attachments(device);
        if let Some(native) = self.native.take() {
            device.delete_framebuffer(native);
        }
        self.complete = false;
    }

    fn attach(&mut self, device: &mut dyn GraphicsDevice, desc: AttachmentDesc) -> Result<()> {
        let framebuffer = self.require_native()?;
        if self.attachments.iter().any(|a| a.desc.kind == desc.kind) {
            return Err(Error::InvalidResource(format!(
                "framebuffer '{}' already has a {:?} attachment",
                self.name, desc.kind
            )));
        }
        if desc.kind.is_depth_or_stencil() != desc.format.is_depth_or_stencil() {
            return Err(Error::InvalidResource(format!(
                "framebuffer '{}': format {:?} does not fit attachment {:?}",
                self.name, desc.format, desc.kind
            )));
        }

        let native = match desc.storage {
            AttachmentStorage::Texture => {
                let texture = device.create_texture(self.width, self.height, desc.format, None)?;
                device.attach_texture(framebuffer, desc.kind, texture);
                texture
            }
            AttachmentStorage::Renderbuffer => {
                let renderbuffer = device.create_renderbuffer(self.width, self.height, desc.format)?;
                device.attach_renderbuffer(framebuffer, desc.kind, renderbuffer);
                renderbuffer
            }
        };
        self.attachments.push(Attachment { desc, native });
        Ok(())
    }

    fn release_attachments(&mut self, device: &mut dyn GraphicsDevice) {
        for attachment in self.attachments.drain(..) {
            match attachment.desc.storage {
                AttachmentStorage::Texture => device.delete_texture(attachment.native),
                AttachmentStorage::Renderbuffer => device.delete_renderbuffer(attachment.native),
            }
        }
    }

    fn check_complete(&mut self, device: &mut dyn GraphicsDevice) -> Result<()> {
        let native = self.require_native()?;
        self.complete = !self.attachments.is_empty() && device.framebuffer_complete(native);
        if self.complete {
            Ok(())
        } else if self.attachments.is_empty() {
            Err(Error::InvalidResource(format!("framebuffer '{}' has no attachments", self.name)))
        } else {
            Err(Error::InvalidResource(format!("framebuffer '{}' is incomplete", self.name)))
        }
    }

    fn find(&self, kind: AttachmentKind, storage: AttachmentStorage) -> Option<&Attachment> {
        self.attachments
            .iter()
            .find(|a| a.desc.kind == kind && a.desc.storage == storage)
    }

    fn require_native(&self) -> Result<NativeHandle> {
        self.native.ok_or_else(|| {
            Error::InvalidResource(format!("framebuffer '{}' has no native object", self.name))
        })
    }

    fn check_size(&self, width: u32, height: u32) -> Result<()> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidResource(format!(
                "framebuffer '{}' cannot be {}x{}",
                self.name, width, height
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "framebuffer_tests.rs"]
mod tests;
