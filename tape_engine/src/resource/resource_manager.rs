/// Central resource repository.
///
/// Owns every GPU resource behind a `Handle`, one map per category
/// (shader, texture, mesh, framebuffer, atlas, shader pipeline). Pipelines
/// and callers only ever hold handles.
///
/// Nothing here fails loudly:
/// - an unknown or deleted handle makes the operation a no-op (DEBUG log)
/// - a construction failure still registers the resource, non-functional
///   (ERROR log)
/// - a contract violation such as editing a finalized mesh is a no-op
///   (WARN log)
///
/// Forwarding operations return `true` when the operation was applied.

use std::sync::{Arc, Mutex};
use glam::{Vec2, Vec3, Vec4};
use rustc_hash::FxHashMap;
use crate::error::Result;
use crate::graphics_device::{
    lock_device, AttachmentKind, AttachmentStorage, ColorFormat, FilterMode,
    GraphicsDevice, ImageAccess, ShaderStage, UniformValue,
};
use crate::log::LogChannel;
use crate::resource::{
    Atlas, AtlasDesc, AtlasRegion, AtlasTile, AttachmentDesc, Framebuffer,
    FramebufferDesc, Handle, Mesh, Shader, ShaderDesc, ShaderPipeline, Texture,
    TextureDesc,
};
use crate::utils::HandleAllocator;
use crate::{engine_debug, engine_error, engine_info, engine_warn};

const SOURCE: &str = "tape::ResourceManager";

/// Handle-keyed storage for one resource category
#[derive(Debug)]
struct Category<T> {
    allocator: HandleAllocator,
    items: FxHashMap<Handle, T>,
}

impl<T> Category<T> {
    fn new() -> Self {
        Self {
            allocator: HandleAllocator::new(),
            items: FxHashMap::default(),
        }
    }

    fn insert(&mut self, item: T) -> Handle {
        let handle = self.allocator.alloc();
        self.items.insert(handle, item);
        handle
    }

    fn remove(&mut self, handle: Handle) -> Option<T> {
        let item = self.items.remove(&handle)?;
        self.allocator.release(handle);
        Some(item)
    }

    fn drain(&mut self) -> Vec<T> {
        let mut items: Vec<(Handle, T)> = self.items.drain().collect();
        items.sort_by_key(|(handle, _)| *handle);
        items
            .into_iter()
            .map(|(handle, item)| {
                self.allocator.release(handle);
                item
            })
            .collect()
    }
}

/// The resource repository
pub struct ResourceManager {
    device: Arc<Mutex<dyn GraphicsDevice>>,
    log: LogChannel,
    shaders: Category<Shader>,
    textures: Category<Texture>,
    meshes: Category<Mesh>,
    framebuffers: Category<Framebuffer>,
    atlases: Category<Atlas>,
    shader_pipelines: Category<ShaderPipeline>,
}

impl ResourceManager {
    /// Create an empty repository issuing native calls to `device`
    pub fn new(device: Arc<Mutex<dyn GraphicsDevice>>, log: LogChannel) -> Self {
        Self {
            device,
            log,
            shaders: Category::new(),
            textures: Category::new(),
            meshes: Category::new(),
            framebuffers: Category::new(),
            atlases: Category::new(),
            shader_pipelines: Category::new(),
        }
    }

    /// The device every native call goes to
    pub fn device(&self) -> &Arc<Mutex<dyn GraphicsDevice>> {
        &self.device
    }

    /// The diagnostics channel
    pub fn log(&self) -> &LogChannel {
        &self.log
    }

    /// Total number of live resources across all categories
    pub fn resource_count(&self) -> usize {
        self.shader_count()
            + self.texture_count()
            + self.mesh_count()
            + self.framebuffer_count()
            + self.atlas_count()
            + self.shader_pipeline_count()
    }

    // ===== SHADERS =====

    /// Compile a shader program
    ///
    /// A compilation failure is logged; the handle stays valid and refers to
    /// a non-functional shader.
    pub fn create_shader(&mut self, desc: ShaderDesc) -> Handle {
        let mut shader = Shader::new(desc);
        if let Err(err) = shader.build(&mut *lock_device(&self.device)) {
            engine_error!(self.log, SOURCE, "shader '{}' failed to build: {}", shader.name(), err);
        }
        let name = shader.name().to_string();
        let handle = self.shaders.insert(shader);
        engine_debug!(self.log, SOURCE, "created shader '{}' as {}", name, handle);
        handle
    }

    pub fn shader_exists(&self, handle: Handle) -> bool {
        self.shaders.items.contains_key(&handle)
    }

    pub fn shader(&self, handle: Handle) -> Option<&Shader> {
        self.shaders.items.get(&handle)
    }

    pub fn shader_count(&self) -> usize {
        self.shaders.items.len()
    }

    /// Whether the shader exists and linked successfully
    pub fn shader_is_functional(&self, handle: Handle) -> bool {
        self.shader(handle).map(|s| s.is_functional()).unwrap_or(false)
    }

    /// Delete a shader, returning whether it existed
    pub fn delete_shader(&mut self, handle: Handle) -> bool {
        match self.shaders.remove(handle) {
            Some(mut shader) => {
                shader.destroy(&mut *lock_device(&self.device));
                true
            }
            None => false,
        }
    }

    pub fn delete_all_shaders(&mut self) {
        let mut device = lock_device(&self.device);
        for mut shader in self.shaders.drain() {
            shader.destroy(&mut *device);
        }
    }

    /// Make a shader's program current
    pub fn use_shader(&mut self, handle: Handle) -> bool {
        let result = match self.shaders.items.get(&handle) {
            Some(shader) => shader.use_program(&mut *lock_device(&self.device)),
            None => return self.missing("use_shader", "shader", handle),
        };
        self.report("use_shader", result)
    }

    /// Stage a uniform value on a shader
    pub fn set_uniform(&mut self, handle: Handle, name: &str, value: impl Into<UniformValue>) -> bool {
        let value = value.into();
        let result = match self.shaders.items.get_mut(&handle) {
            Some(shader) => shader.set_uniform(&mut *lock_device(&self.device), name, value),
            None => return self.missing("set_uniform", "shader", handle),
        };
        self.report("set_uniform", result)
    }

    /// Flush a shader's staged uniforms, returning how many were sent
    pub fn send_uniforms(&mut self, handle: Handle) -> usize {
        let result = match self.shaders.items.get_mut(&handle) {
            Some(shader) => shader.send_uniforms(&mut *lock_device(&self.device)),
            None => {
                self.missing("send_uniforms", "shader", handle);
                return 0;
            }
        };
        match result {
            Ok(sent) => sent,
            Err(err) => {
                engine_warn!(self.log, SOURCE, "send_uniforms: {}", err);
                0
            }
        }
    }

    // ===== TEXTURES =====

    /// Allocate a texture
    ///
    /// A failure is logged; the handle refers to a non-functional texture.
    pub fn create_texture(&mut self, desc: TextureDesc) -> Handle {
        let mut texture = Texture::new(desc);
        if let Err(err) = texture.build(&mut *lock_device(&self.device)) {
            engine_error!(self.log, SOURCE, "texture '{}' failed to build: {}", texture.name(), err);
        }
        self.textures.insert(texture)
    }

    pub fn texture_exists(&self, handle: Handle) -> bool {
        self.textures.items.contains_key(&handle)
    }

    pub fn texture(&self, handle: Handle) -> Option<&Texture> {
        self.textures.items.get(&handle)
    }

    pub fn texture_count(&self) -> usize {
        self.textures.items.len()
    }

    pub fn delete_texture(&mut self, handle: Handle) -> bool {
        match self.textures.remove(handle) {
            Some(mut texture) => {
                texture.destroy(&mut *lock_device(&self.device));
                true
            }
            None => false,
        }
    }

    pub fn delete_all_textures(&mut self) {
        let mut device = lock_device(&self.device);
        for mut texture in self.textures.drain() {
            texture.destroy(&mut *device);
        }
    }

    /// Bind a texture for sampling on `unit`
    pub fn bind_texture(&mut self, handle: Handle, unit: u32) -> bool {
        let result = match self.textures.items.get(&handle) {
            Some(texture) => texture.bind(&mut *lock_device(&self.device), unit),
            None => return self.missing("bind_texture", "texture", handle),
        };
        self.report("bind_texture", result)
    }

    /// Bind a texture as a load/store image on `unit`
    pub fn bind_image(&mut self, handle: Handle, unit: u32, access: ImageAccess, format: ColorFormat) -> bool {
        let result = match self.textures.items.get(&handle) {
            Some(texture) => texture.bind_image(&mut *lock_device(&self.device), unit, access, format),
            None => return self.missing("bind_image", "texture", handle),
        };
        self.report("bind_image", result)
    }

    /// Replace a texture's pixels
    pub fn upload_texture(&mut self, handle: Handle, data: &[u8]) -> bool {
        let result = match self.textures.items.get_mut(&handle) {
            Some(texture) => texture.upload(&mut *lock_device(&self.device), data),
            None => return self.missing("upload_texture", "texture", handle),
        };
        self.report("upload_texture", result)
    }

    /// Reallocate a texture at a new size
    pub fn resize_texture(&mut self, handle: Handle, width: u32, height: u32) -> bool {
        let result = match self.textures.items.get_mut(&handle) {
            Some(texture) => texture.resize(&mut *lock_device(&self.device), width, height),
            None => return self.missing("resize_texture", "texture", handle),
        };
        self.report("resize_texture", result)
    }

    /// Change a texture's sampling filters
    pub fn set_texture_filter(&mut self, handle: Handle, min: FilterMode, mag: FilterMode) -> bool {
        let result = match self.textures.items.get_mut(&handle) {
            Some(texture) => texture.set_filter(&mut *lock_device(&self.device), min, mag),
            None => return self.missing("set_texture_filter", "texture", handle),
        };
        self.report("set_texture_filter", result)
    }

    // ===== MESHES =====

    /// Register an empty, editable mesh
    pub fn create_mesh(&mut self, name: &str) -> Handle {
        self.meshes.insert(Mesh::new(name))
    }

    pub fn mesh_exists(&self, handle: Handle) -> bool {
        self.meshes.items.contains_key(&handle)
    }

    pub fn mesh(&self, handle: Handle) -> Option<&Mesh> {
        self.meshes.items.get(&handle)
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.items.len()
    }

    /// Whether the mesh exists and has been uploaded
    pub fn mesh_is_functional(&self, handle: Handle) -> bool {
        self.mesh(handle).map(|m| m.is_functional()).unwrap_or(false)
    }

    pub fn delete_mesh(&mut self, handle: Handle) -> bool {
        match self.meshes.remove(handle) {
            Some(mut mesh) => {
                mesh.destroy(&mut *lock_device(&self.device));
                true
            }
            None => false,
        }
    }

    pub fn delete_all_meshes(&mut self) {
        let mut device = lock_device(&self.device);
        for mut mesh in self.meshes.drain() {
            mesh.destroy(&mut *device);
        }
    }

    pub fn add_mesh_positions(&mut self, handle: Handle, positions: &[Vec3]) -> bool {
        let result = match self.meshes.items.get_mut(&handle) {
            Some(mesh) => mesh.add_positions(positions),
            None => return self.missing("add_mesh_positions", "mesh", handle),
        };
        self.report("add_mesh_positions", result)
    }

    pub fn add_mesh_uvs(&mut self, handle: Handle, uvs: &[Vec2]) -> bool {
        let result = match self.meshes.items.get_mut(&handle) {
            Some(mesh) => mesh.add_uvs(uvs),
            None => return self.missing("add_mesh_uvs", "mesh", handle),
        };
        self.report("add_mesh_uvs", result)
    }

    pub fn add_mesh_normals(&mut self, handle: Handle, normals: &[Vec3]) -> bool {
        let result = match self.meshes.items.get_mut(&handle) {
            Some(mesh) => mesh.add_normals(normals),
            None => return self.missing("add_mesh_normals", "mesh", handle),
        };
        self.report("add_mesh_normals", result)
    }

    pub fn add_mesh_colors(&mut self, handle: Handle, colors: &[Vec4]) -> bool {
        let result = match self.meshes.items.get_mut(&handle) {
            Some(mesh) => mesh.add_colors(colors),
            None => return self.missing("add_mesh_colors", "mesh", handle),
        };
        self.report("add_mesh_colors", result)
    }

    pub fn add_mesh_indices(&mut self, handle: Handle, indices: &[u32]) -> bool {
        let result = match self.meshes.items.get_mut(&handle) {
            Some(mesh) => mesh.add_indices(indices),
            None => return self.missing("add_mesh_indices", "mesh", handle),
        };
        self.report("add_mesh_indices", result)
    }

    /// Upload and lock a mesh
    pub fn finalize_mesh(&mut self, handle: Handle) -> bool {
        let result = match self.meshes.items.get_mut(&handle) {
            Some(mesh) => mesh.finalize(&mut *lock_device(&self.device)),
            None => return self.missing("finalize_mesh", "mesh", handle),
        };
        self.report("finalize_mesh", result)
    }

    /// Bind a mesh's vertex array
    pub fn bind_mesh(&mut self, handle: Handle) -> bool {
        let result = match self.meshes.items.get(&handle) {
            Some(mesh) => mesh.bind(&mut *lock_device(&self.device)),
            None => return self.missing("bind_mesh", "mesh", handle),
        };
        self.report("bind_mesh", result)
    }

    // ===== FRAMEBUFFERS =====

    /// Create an offscreen framebuffer
    ///
    /// A degenerate configuration is logged; the handle refers to an
    /// incomplete framebuffer.
    pub fn create_framebuffer(&mut self, desc: FramebufferDesc) -> Handle {
        let mut framebuffer = Framebuffer::new(desc);
        if let Err(err) = framebuffer.build(&mut *lock_device(&self.device)) {
            engine_error!(self.log, SOURCE, "framebuffer '{}' failed to build: {}", framebuffer.name(), err);
        }
        self.framebuffers.insert(framebuffer)
    }

    pub fn framebuffer_exists(&self, handle: Handle) -> bool {
        self.framebuffers.items.contains_key(&handle)
    }

    pub fn framebuffer(&self, handle: Handle) -> Option<&Framebuffer> {
        self.framebuffers.items.get(&handle)
    }

    pub fn framebuffer_count(&self) -> usize {
        self.framebuffers.items.len()
    }

    pub fn delete_framebuffer(&mut self, handle: Handle) -> bool {
        match self.framebuffers.remove(handle) {
            Some(mut framebuffer) => {
                framebuffer.destroy(&mut *lock_device(&self.device));
                true
            }
            None => false,
        }
    }

    pub fn delete_all_framebuffers(&mut self) {
        let mut device = lock_device(&self.device);
        for mut framebuffer in self.framebuffers.drain() {
            framebuffer.destroy(&mut *device);
        }
    }

    /// Bind a framebuffer as render target
    pub fn bind_framebuffer(&mut self, handle: Handle) -> bool {
        let result = match self.framebuffers.items.get(&handle) {
            Some(framebuffer) => framebuffer.bind(&mut *lock_device(&self.device)),
            None => return self.missing("bind_framebuffer", "framebuffer", handle),
        };
        self.report("bind_framebuffer", result)
    }

    /// Render to the window again
    pub fn bind_backbuffer(&mut self) {
        lock_device(&self.device).bind_framebuffer(None);
    }

    pub fn add_framebuffer_attachment(&mut self, handle: Handle, desc: AttachmentDesc) -> bool {
        let result = match self.framebuffers.items.get_mut(&handle) {
            Some(framebuffer) => framebuffer.add_attachment(&mut *lock_device(&self.device), desc),
            None => return self.missing("add_framebuffer_attachment", "framebuffer", handle),
        };
        self.report("add_framebuffer_attachment", result)
    }

    /// Bind a framebuffer's texture attachment for sampling on `unit`
    pub fn bind_framebuffer_attachment(
        &mut self,
        handle: Handle,
        unit: u32,
        kind: AttachmentKind,
        storage: AttachmentStorage,
    ) -> bool {
        let result = match self.framebuffers.items.get(&handle) {
            Some(framebuffer) => framebuffer.bind_attachment(&mut *lock_device(&self.device), unit, kind, storage),
            None => return self.missing("bind_framebuffer_attachment", "framebuffer", handle),
        };
        self.report("bind_framebuffer_attachment", result)
    }

    /// Recreate a framebuffer's attachments at a new size
    pub fn resize_framebuffer(&mut self, handle: Handle, width: u32, height: u32) -> bool {
        let result = match self.framebuffers.items.get_mut(&handle) {
            Some(framebuffer) => framebuffer.resize(&mut *lock_device(&self.device), width, height),
            None => return self.missing("resize_framebuffer", "framebuffer", handle),
        };
        self.report("resize_framebuffer", result)
    }

    // ===== ATLASES =====

    pub fn create_atlas(&mut self, desc: AtlasDesc) -> Handle {
        if desc.width == 0 || desc.height == 0 {
            engine_error!(self.log, SOURCE, "atlas '{}' is {}x{} and can hold no tile", desc.name, desc.width, desc.height);
        }
        self.atlases.insert(Atlas::new(desc))
    }

    pub fn atlas_exists(&self, handle: Handle) -> bool {
        self.atlases.items.contains_key(&handle)
    }

    pub fn atlas(&self, handle: Handle) -> Option<&Atlas> {
        self.atlases.items.get(&handle)
    }

    pub fn atlas_count(&self) -> usize {
        self.atlases.items.len()
    }

    pub fn delete_atlas(&mut self, handle: Handle) -> bool {
        self.atlases.remove(handle).is_some()
    }

    pub fn delete_all_atlases(&mut self) {
        self.atlases.drain();
    }

    /// Pack a tile, returning its id within the atlas
    pub fn add_atlas_tile(&mut self, handle: Handle, name: &str, width: u32, height: u32) -> Option<usize> {
        let result = match self.atlases.items.get_mut(&handle) {
            Some(atlas) => atlas.add_tile(name, width, height),
            None => {
                self.missing("add_atlas_tile", "atlas", handle);
                return None;
            }
        };
        match result {
            Ok(id) => Some(id),
            Err(err) => {
                engine_warn!(self.log, SOURCE, "add_atlas_tile: {}", err);
                None
            }
        }
    }

    pub fn atlas_tile(&self, handle: Handle, id: usize) -> Option<AtlasTile> {
        self.atlas(handle)?.tile(id)
    }

    pub fn atlas_region(&self, handle: Handle, id: usize) -> Option<AtlasRegion> {
        self.atlas(handle)?.tile_region(id)
    }

    // ===== SHADER PIPELINES =====

    pub fn create_shader_pipeline(&mut self, name: &str) -> Handle {
        let mut pipeline = ShaderPipeline::new(name);
        if let Err(err) = pipeline.build(&mut *lock_device(&self.device)) {
            engine_error!(self.log, SOURCE, "shader pipeline '{}' failed to build: {}", name, err);
        }
        self.shader_pipelines.insert(pipeline)
    }

    pub fn shader_pipeline_exists(&self, handle: Handle) -> bool {
        self.shader_pipelines.items.contains_key(&handle)
    }

    pub fn shader_pipeline(&self, handle: Handle) -> Option<&ShaderPipeline> {
        self.shader_pipelines.items.get(&handle)
    }

    pub fn shader_pipeline_count(&self) -> usize {
        self.shader_pipelines.items.len()
    }

    pub fn delete_shader_pipeline(&mut self, handle: Handle) -> bool {
        match self.shader_pipelines.remove(handle) {
            Some(mut pipeline) => {
                pipeline.destroy(&mut *lock_device(&self.device));
                true
            }
            None => false,
        }
    }

    pub fn delete_all_shader_pipelines(&mut self) {
        let mut device = lock_device(&self.device);
        for mut pipeline in self.shader_pipelines.drain() {
            pipeline.destroy(&mut *device);
        }
    }

    /// Use a separable shader for one stage of a shader pipeline
    pub fn attach_shader_pipeline_stage(&mut self, handle: Handle, stage: ShaderStage, shader: Handle) -> bool {
        let Some(shader_ref) = self.shaders.items.get(&shader) else {
            return self.missing("attach_shader_pipeline_stage", "shader", shader);
        };
        let result = match self.shader_pipelines.items.get_mut(&handle) {
            Some(pipeline) => pipeline.attach(&mut *lock_device(&self.device), stage, shader, shader_ref),
            None => return self.missing("attach_shader_pipeline_stage", "shader pipeline", handle),
        };
        self.report("attach_shader_pipeline_stage", result)
    }

    pub fn bind_shader_pipeline(&mut self, handle: Handle) -> bool {
        let result = match self.shader_pipelines.items.get(&handle) {
            Some(pipeline) => pipeline.bind(&mut *lock_device(&self.device)),
            None => return self.missing("bind_shader_pipeline", "shader pipeline", handle),
        };
        self.report("bind_shader_pipeline", result)
    }

    // ===== LIFECYCLE =====

    /// Destroy every resource of every category
    pub fn delete_all(&mut self) {
        self.delete_all_shader_pipelines();
        self.delete_all_shaders();
        self.delete_all_framebuffers();
        self.delete_all_textures();
        self.delete_all_meshes();
        self.delete_all_atlases();
    }

    /// Release everything before the device goes away
    pub fn shutdown(&mut self) {
        let count = self.resource_count();
        self.delete_all();
        engine_info!(self.log, SOURCE, "shutdown released {} resources", count);
    }

    fn missing(&self, operation: &str, category: &str, handle: Handle) -> bool {
        engine_debug!(self.log, SOURCE, "{}: no {} {}, skipped", operation, category, handle);
        false
    }

    fn report(&self, operation: &str, result: Result<()>) -> bool {
        match result {
            Ok(()) => true,
            Err(err) => {
                engine_warn!(self.log, SOURCE, "{}: {}", operation, err);
                false
            }
        }
    }
}

impl Drop for ResourceManager {
    fn drop(&mut self) {
        self.delete_all();
    }
}

#[cfg(test)]
#[path = "resource_manager_tests.rs"]
mod tests;
