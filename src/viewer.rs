//! Viewer builder and window host.
//!
//! Wires the pieces together: a winit window, the wgpu point renderer, the
//! parameter panel, and the regenerate-on-change control flow. Generation is
//! synchronous on the event-loop thread; a parameter-finalized event from
//! the panel discards the old cloud and installs a fresh one.

use std::sync::Arc;
use std::time::Instant;

use rand::rngs::SmallRng;
use rand::SeedableRng;
use winit::{
    application::ApplicationHandler,
    event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::error::ViewerError;
use crate::galaxy::{self, GalaxyParams};
#[cfg(feature = "egui")]
use crate::panel::Panel;
use crate::renderer::{GpuRenderer, Overlay, PointCloudRenderer};

/// Radians per second of idle orbit.
const AUTO_ROTATE_SPEED: f32 = 0.2;

/// An interactive galaxy viewer.
///
/// Use method chaining to configure, then call [`Viewer::run`] to open the
/// window. This blocks until the window is closed.
///
/// ```ignore
/// use galaxygen::{GalaxyParams, Viewer};
///
/// Viewer::new()
///     .with_params(GalaxyParams { branches: 4, ..Default::default() })
///     .run()?;
/// ```
pub struct Viewer {
    params: GalaxyParams,
    seed: Option<u64>,
    auto_rotate: bool,
    title: String,
}

impl Viewer {
    /// Create a viewer with the default parameter preset.
    pub fn new() -> Self {
        Self {
            params: GalaxyParams::default(),
            seed: None,
            auto_rotate: true,
            title: "galaxygen".to_string(),
        }
    }

    /// Set the initial galaxy parameters.
    pub fn with_params(mut self, params: GalaxyParams) -> Self {
        self.params = params;
        self
    }

    /// Seed the random source, making every regeneration reproducible.
    /// Without a seed, each run scatters differently.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Enable or disable the idle camera orbit (on by default).
    pub fn with_auto_rotate(mut self, auto_rotate: bool) -> Self {
        self.auto_rotate = auto_rotate;
        self
    }

    /// Set the window title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Open the window and run until it is closed.
    pub fn run(self) -> Result<(), ViewerError> {
        // Reject bad parameters before a window ever opens.
        self.params.validate()?;

        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = App::new(self);
        event_loop.run_app(&mut app)?;

        match app.error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl Default for Viewer {
    fn default() -> Self {
        Self::new()
    }
}

/// Run a generation and hand the result to the renderer. The old cloud's
/// buffers are released inside `install`; a rejected parameter set keeps the
/// previous cloud on screen.
fn regenerate(params: &GalaxyParams, rng: &mut SmallRng, gpu: &mut GpuRenderer) {
    let started = Instant::now();
    match galaxy::generate(params, rng) {
        Ok(cloud) => {
            gpu.install(&cloud, params.size);
            log::debug!(
                "regenerated {} points in {:.1?}",
                cloud.point_count(),
                started.elapsed()
            );
        }
        Err(err) => log::warn!("parameters rejected: {}", err),
    }
}

struct App {
    params: GalaxyParams,
    rng: SmallRng,
    auto_rotate: bool,
    title: String,
    window: Option<Arc<Window>>,
    gpu: Option<GpuRenderer>,
    #[cfg(feature = "egui")]
    panel: Option<Panel>,
    mouse_pressed: bool,
    last_mouse_pos: Option<(f64, f64)>,
    last_frame: Instant,
    error: Option<ViewerError>,
}

impl App {
    fn new(viewer: Viewer) -> Self {
        let rng = match viewer.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };

        Self {
            params: viewer.params,
            rng,
            auto_rotate: viewer.auto_rotate,
            title: viewer.title,
            window: None,
            gpu: None,
            #[cfg(feature = "egui")]
            panel: None,
            mouse_pressed: false,
            last_mouse_pos: None,
            last_frame: Instant::now(),
            error: None,
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let now = Instant::now();
        let delta = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;

        let (Some(window), Some(gpu)) = (self.window.as_ref(), self.gpu.as_mut()) else {
            return;
        };

        if self.auto_rotate && !self.mouse_pressed {
            gpu.camera.yaw += AUTO_ROTATE_SPEED * delta;
        }

        #[cfg(feature = "egui")]
        if let Some(panel) = self.panel.as_mut() {
            if panel.run(window, &mut self.params) {
                regenerate(&self.params, &mut self.rng, gpu);
            }
        }

        #[cfg(feature = "egui")]
        let overlay = self.panel.as_mut().map(|p| p as &mut dyn Overlay);
        #[cfg(not(feature = "egui"))]
        let overlay: Option<&mut dyn Overlay> = None;

        match gpu.render(overlay) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                let size = window.inner_size();
                gpu.resize(size.width, size.height);
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("out of GPU memory, exiting");
                event_loop.exit();
            }
            Err(err) => log::warn!("render error: {:?}", err),
        }

        window.request_redraw();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window_attrs = Window::default_attributes()
            .with_title(self.title.clone())
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 720));

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(err) => {
                self.error = Some(err.into());
                event_loop.exit();
                return;
            }
        };
        self.window = Some(window.clone());

        let mut gpu = match pollster::block_on(GpuRenderer::new(window.clone())) {
            Ok(gpu) => gpu,
            Err(err) => {
                self.error = Some(err.into());
                event_loop.exit();
                return;
            }
        };

        #[cfg(feature = "egui")]
        {
            self.panel = Some(Panel::new(gpu.device(), gpu.surface_format(), &window));
        }

        regenerate(&self.params, &mut self.rng, &mut gpu);
        self.gpu = Some(gpu);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        #[cfg(feature = "egui")]
        let ui_consumed = match (self.window.as_ref(), self.panel.as_mut()) {
            (Some(window), Some(panel)) => panel.on_window_event(window, &event),
            _ => false,
        };
        #[cfg(not(feature = "egui"))]
        let ui_consumed = false;

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(physical_size.width, physical_size.height);
                }
            }
            // Releases pass through even over the panel so a drag can't get
            // stuck on.
            WindowEvent::MouseInput { state, button, .. }
                if !ui_consumed || state == ElementState::Released =>
            {
                if button == MouseButton::Left {
                    self.mouse_pressed = state == ElementState::Pressed;
                    if !self.mouse_pressed {
                        self.last_mouse_pos = None;
                    }
                }
            }
            WindowEvent::CursorMoved { position, .. } if !ui_consumed => {
                if self.mouse_pressed {
                    if let Some((last_x, last_y)) = self.last_mouse_pos {
                        let dx = (position.x - last_x) as f32;
                        let dy = (position.y - last_y) as f32;
                        if let Some(gpu) = &mut self.gpu {
                            gpu.camera.rotate(dx, dy);
                        }
                    }
                    self.last_mouse_pos = Some((position.x, position.y));
                }
            }
            WindowEvent::MouseWheel { delta, .. } if !ui_consumed => {
                let scroll = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 * 0.1,
                };
                if let Some(gpu) = &mut self.gpu {
                    gpu.camera.zoom(scroll);
                }
            }
            WindowEvent::RedrawRequested => {
                self.redraw(event_loop);
            }
            _ => {}
        }
    }
}
