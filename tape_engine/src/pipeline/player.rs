/// Pipeline player.
///
/// Owns the registered pipelines and replays the active one against a
/// `ResourceManager` on every `render()`. Each registered pipeline keeps its
/// own transform matrices and binding cache; both start from scratch at the
/// beginning of every `render()`, so a pipeline never depends on what another
/// one left behind.
///
/// Playback never fails: a missing or unusable resource skips the one
/// instruction that needed it (DEBUG log), an unknown opcode is logged and
/// skipped, and the tape always runs to its end.

use rustc_hash::FxHashMap;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::graphics_device::{lock_device, ShaderStage};
use crate::log::LogChannel;
use crate::pipeline::{
    BoundResources, ImageBinding, Instruction, Pipeline, RenderStats, RenderTarget,
    Transforms,
};
use crate::resource::{Handle, ResourceManager};
use crate::utils::HandleAllocator;
use crate::{engine_bail, engine_debug, engine_info, engine_trace, engine_warn};

const SOURCE: &str = "tape::PipelinePlayer";

/// A registered pipeline and its playback state
#[derive(Debug)]
struct PipelineState {
    pipeline: Pipeline,
    work_group_size: (u32, u32),
    bound: BoundResources,
    transforms: Transforms,
}

/// What one instruction amounted to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Executed,
    Elided,
    Skipped,
    Drawn,
    Dispatched,
}

pub struct PipelinePlayer {
    config: Config,
    log: LogChannel,
    pipelines: FxHashMap<Handle, PipelineState>,
    allocator: HandleAllocator,
    active: Option<Handle>,
}

impl PipelinePlayer {
    /// Create a player with no pipelines
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if `config` does not validate.
    pub fn new(config: Config, log: LogChannel) -> Result<Self> {
        match config.validate() {
            Ok(()) => {}
            Err(Error::InvalidConfig(reason)) => engine_bail!(
                log,
                SOURCE,
                InvalidConfig,
                "cannot create player for '{}': {}",
                config.app_name,
                reason
            ),
            Err(err) => return Err(err),
        }

        engine_info!(
            log,
            SOURCE,
            "player for '{}' ready, context {}x{}",
            config.app_name,
            config.context_width,
            config.context_height
        );

        Ok(Self {
            config,
            log,
            pipelines: FxHashMap::default(),
            allocator: HandleAllocator::new(),
            active: None,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Follow a window resize
    ///
    /// A zero dimension is rejected with a warning and the previous size
    /// stays in effect.
    pub fn set_context_size(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            engine_warn!(self.log, SOURCE, "ignoring context size {}x{}", width, height);
            return;
        }
        self.config.context_width = width;
        self.config.context_height = height;
    }

    // ===== PIPELINES =====

    /// Register a copy of `pipeline`
    ///
    /// The copy starts with an empty binding cache. A pipeline without a
    /// work-group size (or with a zero dimension) gets the configured
    /// default.
    pub fn add_pipeline(&mut self, pipeline: &Pipeline) -> Handle {
        let work_group_size = match pipeline.work_group_size() {
            Some((x, y)) if x > 0 && y > 0 => (x, y),
            Some((x, y)) => {
                engine_warn!(
                    self.log,
                    SOURCE,
                    "pipeline '{}' has work-group size {}x{}, using {}x{}",
                    pipeline.name(),
                    x,
                    y,
                    self.config.default_work_group_size.0,
                    self.config.default_work_group_size.1
                );
                self.config.default_work_group_size
            }
            None => self.config.default_work_group_size,
        };

        let state = PipelineState {
            pipeline: pipeline.clone(),
            work_group_size,
            bound: BoundResources::new(self.config.max_texture_units, self.config.max_image_units),
            transforms: Transforms::default(),
        };

        let handle = self.allocator.alloc();
        self.pipelines.insert(handle, state);
        engine_debug!(
            self.log,
            SOURCE,
            "pipeline '{}' registered as {} ({} instructions)",
            pipeline.name(),
            handle,
            pipeline.len()
        );
        handle
    }

    /// Select the pipeline `render()` plays
    ///
    /// Returns `false` (and keeps the current selection) for an unknown
    /// handle.
    pub fn use_pipeline(&mut self, handle: Handle) -> bool {
        if !self.pipelines.contains_key(&handle) {
            engine_warn!(self.log, SOURCE, "use_pipeline: no pipeline {}", handle);
            return false;
        }
        self.active = Some(handle);
        true
    }

    /// Unregister a pipeline, returning its tape
    ///
    /// Removing the active pipeline leaves no pipeline selected.
    pub fn remove_pipeline(&mut self, handle: Handle) -> Option<Pipeline> {
        let state = self.pipelines.remove(&handle)?;
        self.allocator.release(handle);
        if self.active == Some(handle) {
            self.active = None;
        }
        Some(state.pipeline)
    }

    pub fn pipeline(&self, handle: Handle) -> Option<&Pipeline> {
        self.pipelines.get(&handle).map(|state| &state.pipeline)
    }

    pub fn pipeline_count(&self) -> usize {
        self.pipelines.len()
    }

    pub fn active_pipeline(&self) -> Option<Handle> {
        self.active
    }

    /// Transform matrices of the active pipeline as its last playback left
    /// them
    pub fn transforms(&self) -> Option<&Transforms> {
        self.active_state().map(|state| &state.transforms)
    }

    /// Binding cache of the active pipeline as its last playback left it
    pub fn bound_resources(&self) -> Option<&BoundResources> {
        self.active_state().map(|state| &state.bound)
    }

    fn active_state(&self) -> Option<&PipelineState> {
        self.active.and_then(|handle| self.pipelines.get(&handle))
    }

    // ===== PLAYBACK =====

    /// Play the active pipeline once, start to finish
    pub fn render(&mut self, resources: &mut ResourceManager) -> RenderStats {
        let mut stats = RenderStats::default();

        let Some(handle) = self.active else {
            engine_debug!(self.log, SOURCE, "render: no active pipeline");
            return stats;
        };
        let Some(state) = self.pipelines.get_mut(&handle) else {
            return stats;
        };

        state.bound.reset();
        state.transforms = Transforms::default();

        let mut playback = Playback {
            config: &self.config,
            log: &self.log,
            resources,
            bound: &mut state.bound,
            transforms: &mut state.transforms,
            work_group_size: state.work_group_size,
        };

        for instruction in state.pipeline.instructions() {
            engine_trace!(self.log, SOURCE, "{:?}", instruction.opcode());
            match playback.step(instruction) {
                Outcome::Executed => stats.executed += 1,
                Outcome::Elided => stats.elided += 1,
                Outcome::Skipped => stats.skipped += 1,
                Outcome::Drawn => {
                    stats.executed += 1;
                    stats.draw_calls += 1;
                }
                Outcome::Dispatched => {
                    stats.executed += 1;
                    stats.dispatches += 1;
                }
            }
        }

        stats
    }
}

/// Borrowed state of one `render()` call
struct Playback<'a> {
    config: &'a Config,
    log: &'a LogChannel,
    resources: &'a mut ResourceManager,
    bound: &'a mut BoundResources,
    transforms: &'a mut Transforms,
    work_group_size: (u32, u32),
}

impl Playback<'_> {
    fn step(&mut self, instruction: &Instruction) -> Outcome {
        let aspect = self.config.aspect_ratio();

        match instruction {
            // ----- transforms -----
            Instruction::SetModelMatrix(source) => {
                self.transforms.model = source.resolve(aspect);
                Outcome::Executed
            }
            Instruction::SetViewMatrix(source) => {
                self.transforms.view = source.resolve(aspect);
                Outcome::Executed
            }
            Instruction::SetPerspectiveProjectionMatrix(source)
            | Instruction::SetOrthoProjectionMatrix(source) => {
                self.transforms.projection = source.resolve(aspect);
                Outcome::Executed
            }
            Instruction::CalculateMvp => {
                self.transforms.calculate_mvp();
                Outcome::Executed
            }

            // ----- clear state -----
            Instruction::SetClearColor(color) => {
                lock_device(self.resources.device()).set_clear_color(color.to_array());
                Outcome::Executed
            }
            Instruction::SetClearDepth(depth) => {
                lock_device(self.resources.device()).set_clear_depth(*depth);
                Outcome::Executed
            }
            Instruction::SetClearStencil(stencil) => {
                lock_device(self.resources.device()).set_clear_stencil(*stencil);
                Outcome::Executed
            }
            Instruction::ClearCurrentFramebuffer(flags) => {
                lock_device(self.resources.device()).clear(*flags);
                Outcome::Executed
            }

            // ----- binding -----
            // The cache records every request, even one whose forwarding
            // fails, so a later draw sees what the tape asked for.
            Instruction::BindTexture { texture, unit } => match self.bound.set_texture(*unit, *texture) {
                None => self.out_of_range("texture", *unit, self.bound.texture_unit_count()),
                Some(false) => Outcome::Elided,
                Some(true) => forwarded(self.resources.bind_texture(*texture, *unit)),
            },
            Instruction::BindImage { texture, unit, access, format } => {
                let binding = ImageBinding {
                    texture: *texture,
                    access: *access,
                    format: *format,
                };
                match self.bound.set_image(*unit, binding) {
                    None => self.out_of_range("image", *unit, self.bound.image_unit_count()),
                    Some(false) => Outcome::Elided,
                    Some(true) => {
                        let applied = self.resources.bind_image(*texture, *unit, *access, *format);
                        forwarded(applied)
                    }
                }
            }
            Instruction::BindShader(shader) => {
                if !self.bound.set_shader(*shader) {
                    return Outcome::Elided;
                }
                forwarded(self.resources.use_shader(*shader))
            }
            Instruction::BindMesh(mesh) => {
                if !self.bound.set_mesh(*mesh) {
                    return Outcome::Elided;
                }
                forwarded(self.resources.bind_mesh(*mesh))
            }
            Instruction::BindBackbuffer => {
                if !self.bound.set_target(RenderTarget::Backbuffer) {
                    return Outcome::Elided;
                }
                self.resources.bind_backbuffer();
                Outcome::Executed
            }
            Instruction::BindFramebuffer(framebuffer) => {
                if !self.bound.set_target(RenderTarget::Framebuffer(*framebuffer)) {
                    return Outcome::Elided;
                }
                forwarded(self.resources.bind_framebuffer(*framebuffer))
            }
            Instruction::BindFramebufferAttachment { framebuffer, unit, kind, storage } => {
                if *unit as usize >= self.bound.texture_unit_count() {
                    return self.out_of_range("texture", *unit, self.bound.texture_unit_count());
                }
                // The unit now holds a texture the cache cannot name
                self.bound.forget_texture(*unit);
                let applied = self
                    .resources
                    .bind_framebuffer_attachment(*framebuffer, *unit, *kind, *storage);
                forwarded(applied)
            }
            Instruction::BindShaderPipeline(shader_pipeline) => {
                if !self.bound.set_shader_pipeline(*shader_pipeline) {
                    return Outcome::Elided;
                }
                forwarded(self.resources.bind_shader_pipeline(*shader_pipeline))
            }

            // ----- uniforms -----
            Instruction::SetUniform { shader, name, value } => {
                forwarded(self.resources.set_uniform(*shader, name, value.clone()))
            }
            Instruction::SetMvpUniform { shader, name } => {
                let mvp = self.transforms.mvp;
                forwarded(self.resources.set_uniform(*shader, name, mvp))
            }
            Instruction::SendUniforms(shader) => {
                if !self.resources.shader_is_functional(*shader) {
                    return self.skip("send_uniforms", "shader is missing or not linked");
                }
                self.resources.send_uniforms(*shader);
                Outcome::Executed
            }

            // ----- drawing -----
            Instruction::Draw { mode, vertex_count } => {
                if let Err(reason) = self.check_draw(false) {
                    return self.skip("draw", reason);
                }
                lock_device(self.resources.device()).draw_arrays(*mode, *vertex_count);
                Outcome::Drawn
            }
            Instruction::DrawIndexed { mode, index_count, index_type } => {
                if let Err(reason) = self.check_draw(true) {
                    return self.skip("draw_indexed", reason);
                }
                lock_device(self.resources.device()).draw_elements(*mode, *index_count, *index_type);
                Outcome::Drawn
            }
            Instruction::DispatchCompute => {
                if !self.program_has_stage(ShaderStage::Compute) {
                    return self.skip("dispatch_compute", "no usable compute program bound");
                }
                let (x, y) = self.dispatch_size();
                lock_device(self.resources.device()).dispatch_compute(x, y, 1);
                Outcome::Dispatched
            }

            // ----- fixed-function state -----
            Instruction::SetFilterMode { min, mag } => match self.bound.last_texture() {
                Some(texture) => forwarded(self.resources.set_texture_filter(texture, *min, *mag)),
                None => self.skip("set_filter_mode", "no texture bound yet"),
            },
            Instruction::SetBlend(enabled) => {
                lock_device(self.resources.device()).set_blend(*enabled);
                Outcome::Executed
            }
            Instruction::SetBlendMode { src, dst } => {
                lock_device(self.resources.device()).set_blend_func(*src, *dst);
                Outcome::Executed
            }
            Instruction::SetDepthTest(enabled) => {
                lock_device(self.resources.device()).set_depth_test(*enabled);
                Outcome::Executed
            }
            Instruction::SetScissorTest(enabled) => {
                lock_device(self.resources.device()).set_scissor_test(*enabled);
                Outcome::Executed
            }
            Instruction::SetCullBackfaces(enabled) => {
                lock_device(self.resources.device()).set_cull_backfaces(*enabled);
                Outcome::Executed
            }

            Instruction::Invalid(code) => {
                engine_warn!(self.log, SOURCE, "invalid opcode {}, ignored", code);
                Outcome::Skipped
            }
        }
    }

    /// Group counts covering the context, depth 1
    fn dispatch_size(&self) -> (u32, u32) {
        let (x, y) = self.work_group_size;
        (
            self.config.context_width.div_ceil(x),
            self.config.context_height.div_ceil(y),
        )
    }

    /// A draw needs a linked graphics program and a finalized mesh
    fn check_draw(&self, indexed: bool) -> std::result::Result<(), &'static str> {
        if !self.program_has_stage(ShaderStage::Vertex) {
            return Err("no usable graphics program bound");
        }
        let mesh = self.bound.mesh().and_then(|handle| self.resources.mesh(handle));
        match mesh {
            Some(mesh) if mesh.is_functional() => {
                if indexed && !mesh.is_indexed() {
                    Err("bound mesh has no indices")
                } else {
                    Ok(())
                }
            }
            _ => Err("no usable mesh bound"),
        }
    }

    /// Whether the bound program (or program pipeline) is usable and runs
    /// `stage`
    fn program_has_stage(&self, stage: ShaderStage) -> bool {
        if let Some(handle) = self.bound.shader() {
            return self
                .resources
                .shader(handle)
                .is_some_and(|shader| shader.is_functional() && shader.has_stage(stage));
        }
        if let Some(handle) = self.bound.shader_pipeline() {
            return self
                .resources
                .shader_pipeline(handle)
                .is_some_and(|pipeline| pipeline.is_functional() && pipeline.stage(stage).is_some());
        }
        false
    }

    fn skip(&self, operation: &str, reason: &str) -> Outcome {
        engine_debug!(self.log, SOURCE, "{} skipped: {}", operation, reason);
        Outcome::Skipped
    }

    fn out_of_range(&self, kind: &str, unit: u32, count: usize) -> Outcome {
        engine_warn!(self.log, SOURCE, "{} unit {} out of range (0..{}), skipped", kind, unit, count);
        Outcome::Skipped
    }
}

/// Outcome of an instruction forwarded to the repository
fn forwarded(applied: bool) -> Outcome {
    if applied {
        Outcome::Executed
    } else {
        Outcome::Skipped
    }
}

#[cfg(test)]
#[path = "player_tests.rs"]
mod tests;
