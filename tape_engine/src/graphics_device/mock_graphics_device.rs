/// Mock graphics device (no GPU required)
///
/// Records every call as a line of text in `commands`, e.g.
/// `"bind_texture(3, 0)"` or `"draw_elements(Triangles, 6, U32)"`, so tests
/// and headless hosts can check exactly what playback sent to the driver.

use rustc_hash::{FxHashMap, FxHashSet};
use crate::error::{Error, Result};
use crate::graphics_device::{
    AttachmentKind, BlendFactor, BufferKind, ClearFlags, ColorFormat, FilterMode,
    GraphicsDevice, ImageAccess, IndexType, NativeHandle, PrimitiveMode, ShaderSource,
    ShaderStage, UniformValue, VertexStream,
};

/// Recording graphics device
#[derive(Debug, Default)]
pub struct MockGraphicsDevice {
    /// Every call, in issue order
    pub commands: Vec<String>,
    /// Fail the next `create_program` with a compilation error
    pub fail_next_program: bool,
    /// Fail the next `create_texture` with an allocation error
    pub fail_next_texture: bool,
    /// Report every framebuffer as incomplete
    pub incomplete_framebuffers: bool,
    next_handle: NativeHandle,
    live_objects: FxHashSet<NativeHandle>,
    uniform_locations: FxHashMap<(NativeHandle, String), i32>,
    programs: FxHashSet<NativeHandle>,
}

impl MockGraphicsDevice {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of recorded calls to `name` (the text before the parenthesis)
    pub fn count(&self, name: &str) -> usize {
        self.commands_named(name).len()
    }

    /// Recorded calls to `name`, in issue order
    pub fn commands_named(&self, name: &str) -> Vec<&str> {
        self.commands
            .iter()
            .filter(|cmd| cmd.split('(').next() == Some(name))
            .map(|cmd| cmd.as_str())
            .collect()
    }

    /// Forget recorded calls (objects stay alive)
    pub fn clear_commands(&mut self) {
        self.commands.clear();
    }

    /// Number of created and not yet deleted native objects
    pub fn live_object_count(&self) -> usize {
        self.live_objects.len()
    }

    /// Whether a native object is alive
    pub fn is_alive(&self, handle: NativeHandle) -> bool {
        self.live_objects.contains(&handle)
    }

    fn allocate(&mut self) -> NativeHandle {
        self.next_handle += 1;
        self.live_objects.insert(self.next_handle);
        self.next_handle
    }

    fn release(&mut self, handle: NativeHandle) {
        self.live_objects.remove(&handle);
    }

    fn record(&mut self, command: String) {
        self.commands.push(command);
    }
}

impl GraphicsDevice for MockGraphicsDevice {
    fn create_texture(
        &mut self,
        width: u32,
        height: u32,
        format: ColorFormat,
        data: Option<&[u8]>,
    ) -> Result<NativeHandle> {
        if self.fail_next_texture {
            self.fail_next_texture = false;
            self.record("create_texture(failed)".to_string());
            return Err(Error::OutOfMemory);
        }
        let handle = self.allocate();
        let bytes = data.map(|d| d.len()).unwrap_or(0);
        self.record(format!("create_texture({}, {}x{}, {:?}, {})", handle, width, height, format, bytes));
        Ok(handle)
    }

    fn upload_texture(
        &mut self,
        texture: NativeHandle,
        width: u32,
        height: u32,
        format: ColorFormat,
        data: Option<&[u8]>,
    ) -> Result<()> {
        if !self.live_objects.contains(&texture) {
            return Err(Error::InvalidResource(format!("texture {} does not exist", texture)));
        }
        let bytes = data.map(|d| d.len()).unwrap_or(0);
        self.record(format!("upload_texture({}, {}x{}, {:?}, {})", texture, width, height, format, bytes));
        Ok(())
    }

    fn delete_texture(&mut self, texture: NativeHandle) {
        self.release(texture);
        self.record(format!("delete_texture({})", texture));
    }

    fn bind_texture(&mut self, texture: NativeHandle, unit: u32) {
        self.record(format!("bind_texture({}, {})", texture, unit));
    }

    fn bind_image(&mut self, texture: NativeHandle, unit: u32, access: ImageAccess, format: ColorFormat) {
        self.record(format!("bind_image({}, {}, {:?}, {:?})", texture, unit, access, format));
    }

    fn set_texture_filter(&mut self, texture: NativeHandle, min: FilterMode, mag: FilterMode) {
        self.record(format!("set_texture_filter({}, {:?}, {:?})", texture, min, mag));
    }

    fn create_buffer(&mut self, kind: BufferKind, data: &[u8]) -> Result<NativeHandle> {
        let handle = self.allocate();
        self.record(format!("create_buffer({}, {:?}, {})", handle, kind, data.len()));
        Ok(handle)
    }

    fn delete_buffer(&mut self, buffer: NativeHandle) {
        self.release(buffer);
        self.record(format!("delete_buffer({})", buffer));
    }

    fn create_vertex_array(
        &mut self,
        streams: &[VertexStream],
        index_buffer: Option<NativeHandle>,
    ) -> Result<NativeHandle> {
        let handle = self.allocate();
        self.record(format!(
            "create_vertex_array({}, {} streams, indexed={})",
            handle,
            streams.len(),
            index_buffer.is_some()
        ));
        Ok(handle)
    }

    fn delete_vertex_array(&mut self, vertex_array: NativeHandle) {
        self.release(vertex_array);
        self.record(format!("delete_vertex_array({})", vertex_array));
    }

    fn bind_vertex_array(&mut self, vertex_array: NativeHandle) {
        self.record(format!("bind_vertex_array({})", vertex_array));
    }

    fn create_framebuffer(&mut self) -> Result<NativeHandle> {
        let handle = self.allocate();
        self.record(format!("create_framebuffer({})", handle));
        Ok(handle)
    }

    fn create_renderbuffer(&mut self, width: u32, height: u32, format: ColorFormat) -> Result<NativeHandle> {
        let handle = self.allocate();
        self.record(format!("create_renderbuffer({}, {}x{}, {:?})", handle, width, height, format));
        Ok(handle)
    }

    fn delete_renderbuffer(&mut self, renderbuffer: NativeHandle) {
        self.release(renderbuffer);
        self.record(format!("delete_renderbuffer({})", renderbuffer));
    }

    fn attach_texture(&mut self, framebuffer: NativeHandle, kind: AttachmentKind, texture: NativeHandle) {
        self.record(format!("attach_texture({}, {:?}, {})", framebuffer, kind, texture));
    }

    fn attach_renderbuffer(&mut self, framebuffer: NativeHandle, kind: AttachmentKind, renderbuffer: NativeHandle) {
        self.record(format!("attach_renderbuffer({}, {:?}, {})", framebuffer, kind, renderbuffer));
    }

    fn framebuffer_complete(&mut self, framebuffer: NativeHandle) -> bool {
        self.record(format!("framebuffer_complete({})", framebuffer));
        !self.incomplete_framebuffers && self.live_objects.contains(&framebuffer)
    }

    fn delete_framebuffer(&mut self, framebuffer: NativeHandle) {
        self.release(framebuffer);
        self.record(format!("delete_framebuffer({})", framebuffer));
    }

    fn bind_framebuffer(&mut self, framebuffer: Option<NativeHandle>) {
        match framebuffer {
            Some(fb) => self.record(format!("bind_framebuffer({})", fb)),
            None => self.record("bind_framebuffer(backbuffer)".to_string()),
        }
    }

    fn create_program(&mut self, sources: &[ShaderSource], separable: bool) -> Result<NativeHandle> {
        if self.fail_next_program {
            self.fail_next_program = false;
            self.record("create_program(failed)".to_string());
            return Err(Error::ShaderCompilationFailed("mock compile error".to_string()));
        }
        if sources.is_empty() {
            self.record("create_program(failed)".to_string());
            return Err(Error::ShaderCompilationFailed("program has no stages".to_string()));
        }
        let handle = self.allocate();
        self.programs.insert(handle);
        let stages: Vec<String> = sources.iter().map(|s| format!("{:?}", s.stage)).collect();
        self.record(format!("create_program({}, [{}], separable={})", handle, stages.join(", "), separable));
        Ok(handle)
    }

    fn delete_program(&mut self, program: NativeHandle) {
        self.release(program);
        self.programs.remove(&program);
        self.uniform_locations.retain(|(p, _), _| *p != program);
        self.record(format!("delete_program({})", program));
    }

    fn use_program(&mut self, program: NativeHandle) {
        self.record(format!("use_program({})", program));
    }

    fn uniform_location(&mut self, program: NativeHandle, name: &str) -> Option<i32> {
        self.record(format!("uniform_location({}, {})", program, name));
        if !self.programs.contains(&program) {
            return None;
        }
        let next = self
            .uniform_locations
            .keys()
            .filter(|(p, _)| *p == program)
            .count() as i32;
        Some(
            *self
                .uniform_locations
                .entry((program, name.to_string()))
                .or_insert(next),
        )
    }

    fn set_uniform(&mut self, program: NativeHandle, location: i32, value: &UniformValue) {
        self.record(format!("set_uniform({}, {}, {})", program, location, value.type_name()));
    }

    fn create_program_pipeline(&mut self) -> Result<NativeHandle> {
        let handle = self.allocate();
        self.record(format!("create_program_pipeline({})", handle));
        Ok(handle)
    }

    fn use_program_stage(&mut self, pipeline: NativeHandle, stage: ShaderStage, program: NativeHandle) {
        self.record(format!("use_program_stage({}, {:?}, {})", pipeline, stage, program));
    }

    fn bind_program_pipeline(&mut self, pipeline: NativeHandle) {
        self.record(format!("bind_program_pipeline({})", pipeline));
    }

    fn delete_program_pipeline(&mut self, pipeline: NativeHandle) {
        self.release(pipeline);
        self.record(format!("delete_program_pipeline({})", pipeline));
    }

    fn draw_arrays(&mut self, mode: PrimitiveMode, vertex_count: u32) {
        self.record(format!("draw_arrays({:?}, {})", mode, vertex_count));
    }

    fn draw_elements(&mut self, mode: PrimitiveMode, index_count: u32, index_type: IndexType) {
        self.record(format!("draw_elements({:?}, {}, {:?})", mode, index_count, index_type));
    }

    fn dispatch_compute(&mut self, groups_x: u32, groups_y: u32, groups_z: u32) {
        self.record(format!("dispatch_compute({}, {}, {})", groups_x, groups_y, groups_z));
    }

    fn set_clear_color(&mut self, color: [f32; 4]) {
        self.record(format!("set_clear_color({}, {}, {}, {})", color[0], color[1], color[2], color[3]));
    }

    fn set_clear_depth(&mut self, depth: f32) {
        self.record(format!("set_clear_depth({})", depth));
    }

    fn set_clear_stencil(&mut self, stencil: i32) {
        self.record(format!("set_clear_stencil({})", stencil));
    }

    fn clear(&mut self, flags: ClearFlags) {
        self.record(format!(
            "clear(color={}, depth={}, stencil={})",
            flags.contains(ClearFlags::COLOR),
            flags.contains(ClearFlags::DEPTH),
            flags.contains(ClearFlags::STENCIL)
        ));
    }

    fn set_blend(&mut self, enabled: bool) {
        self.record(format!("set_blend({})", enabled));
    }

    fn set_blend_func(&mut self, src: BlendFactor, dst: BlendFactor) {
        self.record(format!("set_blend_func({:?}, {:?})", src, dst));
    }

    fn set_depth_test(&mut self, enabled: bool) {
        self.record(format!("set_depth_test({})", enabled));
    }

    fn set_scissor_test(&mut self, enabled: bool) {
        self.record(format!("set_scissor_test({})", enabled));
    }

    fn set_cull_backfaces(&mut self, enabled: bool) {
        self.record(format!("set_cull_backfaces({})", enabled));
    }
}

#[cfg(test)]
#[path = "mock_graphics_device_tests.rs"]
mod tests;
