//! GPU-backed assembly engine.
//!
//! [`AssemblyEngine`] wraps a headless [`AssemblyScene`] with the GPU
//! resources needed to draw it. The scene owns every piece of animated
//! state; the engine only uploads it and submits one render pass per frame.

/// The engine's interactive vocabulary.
pub mod command;

pub use command::AssemblyCommand;

use crate::assembly::{AssemblyScene, StageChange, StageTable, TickOutcome};
use crate::camera::core::{CameraBinding, CameraUniform};
use crate::error::VizError;
use crate::gpu::lighting::Lighting;
use crate::gpu::render_context::RenderContext;
use crate::gpu::shader_composer::ShaderComposer;
use crate::gpu::texture::DepthTarget;
use crate::input::{InputEvent, InputProcessor};
use crate::options::Options;
use crate::parts::{catalog, PartSet};
use crate::renderer::PartRenderer;
use crate::util::frame_timing::FrameTiming;

/// Everything acquired from the device. Dropped exactly once, on teardown.
struct GpuResources {
    context: RenderContext,
    camera: CameraBinding,
    camera_uniform: CameraUniform,
    lighting: Lighting,
    depth: DepthTarget,
    parts: PartRenderer,
}

impl GpuResources {
    fn new(
        context: RenderContext,
        scene: &AssemblyScene,
        options: &Options,
    ) -> Result<Self, VizError> {
        let mut composer = ShaderComposer::new()?;
        let camera = CameraBinding::new(&context.device);
        let lighting = Lighting::new(&context.device, &options.lighting);
        let (width, height) = context.size();
        let depth = DepthTarget::new(&context.device, width, height);
        let parts = PartRenderer::new(
            &context,
            &mut composer,
            &[&camera.layout, &lighting.layout],
            scene.parts(),
        )?;
        Ok(Self {
            context,
            camera,
            camera_uniform: CameraUniform::new(),
            lighting,
            depth,
            parts,
        })
    }

    fn resize(&mut self, width: u32, height: u32) {
        if self.context.resize(width, height) {
            let (width, height) = self.context.size();
            self.depth = DepthTarget::new(&self.context.device, width, height);
        }
    }

    fn draw(
        &mut self,
        scene: &AssemblyScene,
        background: [f32; 3],
    ) -> Result<(), wgpu::SurfaceError> {
        let camera = scene.camera().camera(self.context.aspect());
        self.camera_uniform.update_view_proj(&camera);
        self.camera.write(&self.context.queue, &self.camera_uniform);
        self.parts.update(
            &self.context,
            scene.parts(),
            scene.world_transforms().map(|(_, transform)| transform),
        );

        let frame = self.context.get_next_frame()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self.context.create_encoder();
        {
            let [r, g, b] = background.map(f64::from);
            let mut rp = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("assembly render pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color { r, g, b, a: 1.0 }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(
                    wgpu::RenderPassDepthStencilAttachment {
                        view: &self.depth.view,
                        depth_ops: Some(wgpu::Operations {
                            load: wgpu::LoadOp::Clear(1.0),
                            store: wgpu::StoreOp::Store,
                        }),
                        stencil_ops: None,
                    },
                ),
                ..Default::default()
            });
            rp.set_bind_group(0, &self.camera.bind_group, &[]);
            rp.set_bind_group(1, &self.lighting.bind_group, &[]);
            self.parts.draw(&mut rp);
        }
        self.context.submit(encoder);
        frame.present();
        Ok(())
    }
}

/// Interactive staged assembly: scene, input and GPU resources.
pub struct AssemblyEngine {
    scene: AssemblyScene,
    /// `None` once torn down.
    gpu: Option<GpuResources>,
    options: Options,
    input: InputProcessor,
    /// Frame pacing and FPS tracking.
    pub frame_timing: FrameTiming,
}

impl AssemblyEngine {
    /// Engine for the reference V8 drawn into `window`.
    ///
    /// # Errors
    ///
    /// Returns [`VizError::Gpu`] if the surface, adapter, device or part
    /// shader cannot be set up.
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        size: (u32, u32),
        initial_stage: usize,
        options: Options,
    ) -> Result<Self, VizError> {
        Self::with_parts(
            window,
            size,
            PartSet::reference_engine(),
            catalog::reference_stages(),
            initial_stage,
            options,
        )
        .await
    }

    /// Engine for an arbitrary part set and stage table.
    ///
    /// # Errors
    ///
    /// Returns [`VizError::Gpu`] if GPU initialization fails.
    pub async fn with_parts(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        size: (u32, u32),
        parts: PartSet,
        stages: StageTable,
        initial_stage: usize,
        options: Options,
    ) -> Result<Self, VizError> {
        let context = RenderContext::new(window, size).await?;
        let scene = AssemblyScene::new(parts, stages, initial_stage, &options);
        Self::from_context(context, scene, options)
    }

    /// Engine from a pre-built [`RenderContext`] and scene.
    ///
    /// # Errors
    ///
    /// Returns [`VizError::Gpu`] if the part shader fails to compose.
    pub fn from_context(
        context: RenderContext,
        scene: AssemblyScene,
        options: Options,
    ) -> Result<Self, VizError> {
        let gpu = GpuResources::new(context, &scene, &options)?;
        log::info!("assembly engine ready");
        Ok(Self {
            scene,
            gpu: Some(gpu),
            input: InputProcessor::with_key_bindings(options.keybindings.clone()),
            frame_timing: FrameTiming::new(options.display.target_fps),
            options,
        })
    }

    /// Advance the scene by `dt` seconds (clamped).
    pub fn update(&mut self, dt: f32) -> TickOutcome {
        let outcome = self.scene.tick(dt);
        if let Some(change) = outcome.stage_change {
            log::trace!(
                "frame {}: stage {} -> {}",
                self.scene.frame_count(),
                change.previous,
                change.current
            );
        }
        outcome
    }

    /// Upload the current scene and draw one frame. No-op after teardown or
    /// when the frame cap has not elapsed.
    ///
    /// # Errors
    ///
    /// Returns [`wgpu::SurfaceError`] if the swapchain frame cannot be
    /// acquired.
    pub fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let Some(gpu) = &mut self.gpu else {
            return Ok(());
        };
        if !self.frame_timing.should_render() {
            return Ok(());
        }
        gpu.draw(&self.scene, self.options.display.background)?;
        let _ = self.frame_timing.end_frame();
        Ok(())
    }

    /// Resize the surface and depth target. Zero sizes are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if let Some(gpu) = &mut self.gpu {
            gpu.resize(width, height);
        }
    }

    /// Re-apply the current surface configuration after a lost surface.
    pub fn reconfigure(&self) {
        if let Some(gpu) = &self.gpu {
            gpu.context.reconfigure();
        }
    }

    /// Feed a raw input event. Returns whether it produced a command.
    pub fn handle_input(&mut self, event: InputEvent) -> bool {
        match self.input.handle_event(event) {
            Some(command) => {
                self.execute(command);
                true
            }
            None => false,
        }
    }

    /// Feed a key press (winit `KeyCode` debug string). Returns whether the
    /// key is bound.
    pub fn handle_key_press(&mut self, key: &str) -> bool {
        match self.input.handle_key_press(key) {
            Some(command) => {
                self.execute(command);
                true
            }
            None => false,
        }
    }

    /// Execute a command against the scene.
    pub fn execute(&mut self, command: AssemblyCommand) {
        if !self.scene.is_mounted() {
            return;
        }
        log::trace!("execute {command:?}");
        command.apply(&mut self.scene);
    }

    /// Queue a stage change for the next update.
    pub fn request_stage(&mut self, stage: i64) {
        self.scene.request_stage(stage);
    }

    /// Apply a stage change immediately.
    pub fn set_stage(&mut self, stage: i64) -> Option<StageChange> {
        self.scene.set_stage(stage)
    }

    /// Store advisory inter-stage progress.
    pub fn set_progress(&mut self, progress: Option<f32>) {
        self.scene.set_progress(progress);
    }

    /// Current options.
    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Replace options and push them into the scene, lighting, frame pacing
    /// and key bindings.
    pub fn set_options(&mut self, options: Options) {
        self.scene.apply_options(&options);
        if let Some(gpu) = &mut self.gpu {
            gpu.lighting.update(&gpu.context.queue, &options.lighting);
        }
        if options.display.target_fps != self.options.display.target_fps {
            self.frame_timing = FrameTiming::new(options.display.target_fps);
        }
        self.input.set_key_bindings(options.keybindings.clone());
        self.options = options;
    }

    /// The headless scene.
    #[must_use]
    pub fn scene(&self) -> &AssemblyScene {
        &self.scene
    }

    /// Stop the scene and release GPU resources. Returns `false` if already
    /// torn down.
    pub fn teardown(&mut self) -> bool {
        let _ = self.scene.teardown();
        match self.gpu.take() {
            Some(gpu) => {
                drop(gpu);
                log::info!("assembly engine released GPU resources");
                true
            }
            None => false,
        }
    }
}
