//! Standalone assembly window backed by winit.
//!
//! ```no_run
//! # use motorviz::Viewer;
//! Viewer::builder()
//!     .with_stage(0)
//!     .build()
//!     .run()
//!     .unwrap();
//! ```

use std::{sync::Arc, time::Instant};

use winit::{
    application::ApplicationHandler,
    event::{ElementState, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::PhysicalKey,
    window::{Window, WindowId},
};

use crate::{
    engine::AssemblyEngine,
    error::VizError,
    input::{InputEvent, MouseButton},
    options::Options,
};

// ── Builder ──────────────────────────────────────────────────────────────

/// Fluent builder for [`Viewer`].
pub struct ViewerBuilder {
    stage: usize,
    options: Option<Options>,
    title: String,
}

impl ViewerBuilder {
    /// Create a builder with sensible defaults (title "motorviz", exploded
    /// stage, default options).
    fn new() -> Self {
        Self {
            stage: 0,
            options: None,
            title: "motorviz".into(),
        }
    }

    /// Set the stage shown on first mount (clamped).
    #[must_use]
    pub fn with_stage(mut self, stage: usize) -> Self {
        self.stage = stage;
        self
    }

    /// Override the default options.
    #[must_use]
    pub fn with_options(mut self, options: Options) -> Self {
        self.options = Some(options);
        self
    }

    /// Set the window title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Consume the builder and produce a [`Viewer`].
    #[must_use]
    pub fn build(self) -> Viewer {
        Viewer {
            stage: self.stage,
            options: self.options.unwrap_or_default(),
            title: self.title,
        }
    }
}

// ── Viewer ───────────────────────────────────────────────────────────────

/// A standalone window that displays the staged assembly.
///
/// Construct via [`Viewer::builder`], then call [`run`](Self::run) to
/// enter the event loop.
pub struct Viewer {
    stage: usize,
    options: Options,
    title: String,
}

impl Viewer {
    /// Start a new builder.
    #[must_use]
    pub fn builder() -> ViewerBuilder {
        ViewerBuilder::new()
    }

    /// Open the window and run the event loop. Blocks until the window is
    /// closed.
    ///
    /// # Errors
    ///
    /// [`VizError::Viewer`] if the event loop cannot be created or exits
    /// abnormally. GPU failures are logged, not returned.
    pub fn run(self) -> Result<(), VizError> {
        let event_loop =
            EventLoop::new().map_err(|e| VizError::Viewer(e.to_string()))?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = ViewerApp {
            window: None,
            engine: None,
            last_frame_time: Instant::now(),
            stage: self.stage,
            options: self.options,
            title: self.title,
        };

        event_loop
            .run_app(&mut app)
            .map_err(|e| VizError::Viewer(e.to_string()))
    }
}

// ── Winit app ────────────────────────────────────────────────────────────

/// Internal winit application handler.
struct ViewerApp {
    window: Option<Arc<Window>>,
    /// `None` until initialized, and forever if initialization failed.
    engine: Option<AssemblyEngine>,
    last_frame_time: Instant,
    stage: usize,
    options: Options,
    title: String,
}

/// Surface size for a window, never zero.
fn viewport_size(inner: winit::dpi::PhysicalSize<u32>) -> (u32, u32) {
    (inner.width.max(1), inner.height.max(1))
}

impl ViewerApp {
    fn window_attributes(
        &self,
        event_loop: &ActiveEventLoop,
    ) -> winit::window::WindowAttributes {
        let monitor = event_loop
            .primary_monitor()
            .or_else(|| event_loop.available_monitors().next());
        let attrs = Window::default_attributes().with_title(&self.title);
        match &monitor {
            Some(mon) => {
                let mon_size = mon.size();
                let scale = mon.scale_factor();
                let logical_w = (f64::from(mon_size.width) / scale * 0.75) as u32;
                let logical_h = (f64::from(mon_size.height) / scale * 0.75) as u32;
                attrs.with_inner_size(winit::dpi::LogicalSize::new(
                    logical_w, logical_h,
                ))
            }
            None => attrs,
        }
    }

    fn redraw(&mut self) {
        let now = Instant::now();
        let dt = now.duration_since(self.last_frame_time).as_secs_f32();
        self.last_frame_time = now;

        if let Some(engine) = &mut self.engine {
            let _ = engine.update(dt);
            match engine.render() {
                Ok(()) => {}
                Err(wgpu::SurfaceError::Outdated | wgpu::SurfaceError::Lost) => {
                    engine.reconfigure();
                    if let Some(w) = &self.window {
                        let (vp_w, vp_h) = viewport_size(w.inner_size());
                        engine.resize(vp_w, vp_h);
                    }
                }
                Err(e) => {
                    log::error!("render error: {e:?}");
                }
            }
            if let Some(w) = &self.window {
                w.request_redraw();
            }
        }
    }
}

impl ApplicationHandler for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = self.window_attributes(event_loop);
        let window = match event_loop.create_window(attrs) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                log::error!("Failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        let (vp_w, vp_h) = viewport_size(window.inner_size());
        match pollster::block_on(AssemblyEngine::new(
            window.clone(),
            (vp_w, vp_h),
            self.stage,
            self.options.clone(),
        )) {
            Ok(engine) => {
                self.engine = Some(engine);
                window.request_redraw();
            }
            Err(e) => {
                // Keep the window open with nothing drawn.
                log::error!("Failed to initialize engine: {e}");
            }
        }
        self.last_frame_time = Instant::now();
        self.window = Some(window);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _id: WindowId,
        event: WindowEvent,
    ) {
        if matches!(event, WindowEvent::CloseRequested) {
            if let Some(engine) = &mut self.engine {
                let _ = engine.teardown();
            }
            event_loop.exit();
            return;
        }

        // Guard: both window and engine must be initialised.
        if self.window.is_none() || self.engine.is_none() {
            return;
        }

        match event {
            WindowEvent::Resized(event_size) => {
                let (vp_w, vp_h) = viewport_size(event_size);
                if let Some(engine) = &mut self.engine {
                    engine.resize(vp_w, vp_h);
                }
            }

            WindowEvent::RedrawRequested => self.redraw(),

            WindowEvent::MouseInput { button, state, .. } => {
                let pressed = state == ElementState::Pressed;
                if let Some(engine) = &mut self.engine {
                    let _ = engine.handle_input(InputEvent::MouseButton {
                        button: MouseButton::from(button),
                        pressed,
                    });
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                if let Some(engine) = &mut self.engine {
                    let _ = engine.handle_input(InputEvent::CursorMoved {
                        x: position.x as f32,
                        y: position.y as f32,
                    });
                }
            }

            WindowEvent::MouseWheel { delta, .. } => {
                let scroll_delta = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 * 0.01,
                };
                if let Some(engine) = &mut self.engine {
                    let _ = engine.handle_input(InputEvent::Scroll {
                        delta: scroll_delta,
                    });
                }
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if event.state != ElementState::Pressed || event.repeat {
                    return;
                }
                let PhysicalKey::Code(code) = event.physical_key else {
                    return;
                };
                let key_str = format!("{code:?}");
                if let Some(engine) = &mut self.engine {
                    if !engine.handle_key_press(&key_str) {
                        log::trace!("unbound key {key_str}");
                    }
                }
            }

            _ => (),
        }
    }
}
