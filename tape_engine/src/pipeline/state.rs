//! Playback state of a registered pipeline.

use glam::Mat4;
use crate::graphics_device::{ColorFormat, ImageAccess};
use crate::resource::Handle;

/// Transform matrices read and written during playback
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transforms {
    pub model: Mat4,
    pub view: Mat4,
    pub projection: Mat4,
    pub mvp: Mat4,
}

impl Transforms {
    /// `mvp = projection * view * model`
    pub fn calculate_mvp(&mut self) {
        self.mvp = self.projection * self.view * self.model;
    }
}

impl Default for Transforms {
    fn default() -> Self {
        Self {
            model: Mat4::IDENTITY,
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
            mvp: Mat4::IDENTITY,
        }
    }
}

/// Current render target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderTarget {
    Backbuffer,
    Framebuffer(Handle),
}

/// Image unit binding, elided only when every operand matches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageBinding {
    pub texture: Handle,
    pub access: ImageAccess,
    pub format: ColorFormat,
}

/// What playback last bound in each slot
///
/// `None` means "unknown": the next bind to that slot is always issued.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundResources {
    texture_units: Vec<Option<Handle>>,
    image_units: Vec<Option<ImageBinding>>,
    shader: Option<Handle>,
    mesh: Option<Handle>,
    target: Option<RenderTarget>,
    shader_pipeline: Option<Handle>,
    last_texture: Option<Handle>,
}

impl BoundResources {
    pub fn new(texture_units: u32, image_units: u32) -> Self {
        Self {
            texture_units: vec![None; texture_units as usize],
            image_units: vec![None; image_units as usize],
            shader: None,
            mesh: None,
            target: None,
            shader_pipeline: None,
            last_texture: None,
        }
    }

    /// Forget every binding
    pub fn reset(&mut self) {
        self.texture_units.iter_mut().for_each(|slot| *slot = None);
        self.image_units.iter_mut().for_each(|slot| *slot = None);
        self.shader = None;
        self.mesh = None;
        self.target = None;
        self.shader_pipeline = None;
        self.last_texture = None;
    }

    pub fn texture_unit_count(&self) -> usize {
        self.texture_units.len()
    }

    pub fn image_unit_count(&self) -> usize {
        self.image_units.len()
    }

    pub fn texture(&self, unit: u32) -> Option<Handle> {
        self.texture_units.get(unit as usize).copied().flatten()
    }

    pub fn image(&self, unit: u32) -> Option<ImageBinding> {
        self.image_units.get(unit as usize).copied().flatten()
    }

    pub fn shader(&self) -> Option<Handle> {
        self.shader
    }

    pub fn mesh(&self) -> Option<Handle> {
        self.mesh
    }

    pub fn target(&self) -> Option<RenderTarget> {
        self.target
    }

    pub fn shader_pipeline(&self) -> Option<Handle> {
        self.shader_pipeline
    }

    /// Most recently requested texture, the target of filter changes
    pub fn last_texture(&self) -> Option<Handle> {
        self.last_texture
    }

    // The `set_*` methods record a binding and return `false` when it was
    // already in place.

    /// `None` if `unit` is out of range
    pub(crate) fn set_texture(&mut self, unit: u32, texture: Handle) -> Option<bool> {
        let slot = self.texture_units.get_mut(unit as usize)?;
        self.last_texture = Some(texture);
        Some(replace(slot, texture))
    }

    /// Mark a texture unit as holding something the cache does not track
    pub(crate) fn forget_texture(&mut self, unit: u32) {
        if let Some(slot) = self.texture_units.get_mut(unit as usize) {
            *slot = None;
        }
    }

    /// `None` if `unit` is out of range
    pub(crate) fn set_image(&mut self, unit: u32, binding: ImageBinding) -> Option<bool> {
        let slot = self.image_units.get_mut(unit as usize)?;
        Some(replace(slot, binding))
    }

    pub(crate) fn set_shader(&mut self, shader: Handle) -> bool {
        // A program replaces any program pipeline and vice versa
        self.shader_pipeline = None;
        replace(&mut self.shader, shader)
    }

    pub(crate) fn set_mesh(&mut self, mesh: Handle) -> bool {
        replace(&mut self.mesh, mesh)
    }

    pub(crate) fn set_target(&mut self, target: RenderTarget) -> bool {
        replace(&mut self.target, target)
    }

    pub(crate) fn set_shader_pipeline(&mut self, shader_pipeline: Handle) -> bool {
        self.shader = None;
        replace(&mut self.shader_pipeline, shader_pipeline)
    }
}

fn replace<T: PartialEq>(slot: &mut Option<T>, value: T) -> bool {
    if slot.as_ref() == Some(&value) {
        false
    } else {
        *slot = Some(value);
        true
    }
}

/// Counters of one `render()` call
///
/// Every instruction lands in exactly one of `executed`, `elided` and
/// `skipped`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Instructions that reached the repository or the device
    pub executed: usize,
    /// Binds dropped because the slot already held the resource
    pub elided: usize,
    /// Instructions dropped for a missing or unusable resource, or an
    /// invalid opcode
    pub skipped: usize,
    /// Draw calls issued (subset of `executed`)
    pub draw_calls: usize,
    /// Compute dispatches issued (subset of `executed`)
    pub dispatches: usize,
}

impl RenderStats {
    /// Total instructions played
    pub fn total(&self) -> usize {
        self.executed + self.elided + self.skipped
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
