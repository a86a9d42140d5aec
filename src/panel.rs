//! Parameter tweak panel, built on egui.
//!
//! The panel owns the egui context, winit state, and wgpu renderer, and
//! implements [`Overlay`] so the scene renderer can paint it without naming
//! egui. Edits regenerate the galaxy only once editing finishes (pointer
//! released, text edit committed), never mid-drag.

use std::sync::Arc;

use glam::Vec3;
use winit::window::Window;

use crate::galaxy::GalaxyParams;
use crate::renderer::Overlay;

/// Tessellated output of one UI frame, held until painted.
struct PanelFrame {
    paint_jobs: Vec<egui::ClippedPrimitive>,
    textures_delta: egui::TexturesDelta,
    pixels_per_point: f32,
}

/// Egui-backed galaxy parameter panel.
pub struct Panel {
    ctx: egui::Context,
    state: egui_winit::State,
    renderer: egui_wgpu::Renderer,
    frame: Option<PanelFrame>,
    dirty: bool,
}

impl Panel {
    pub fn new(
        device: &wgpu::Device,
        output_format: wgpu::TextureFormat,
        window: &Arc<Window>,
    ) -> Self {
        let ctx = egui::Context::default();

        // Dark theme without shadows reads better over the starfield.
        let mut style = egui::Style::default();
        style.visuals = egui::Visuals::dark();
        style.visuals.window_shadow = egui::Shadow::NONE;
        style.visuals.popup_shadow = egui::Shadow::NONE;
        ctx.set_style(style);

        let state = egui_winit::State::new(
            ctx.clone(),
            egui::ViewportId::ROOT,
            window.as_ref(),
            Some(window.scale_factor() as f32),
            None,
            None,
        );

        let renderer = egui_wgpu::Renderer::new(
            device,
            output_format,
            None,  // depth format
            1,     // msaa samples
            false, // dithering
        );

        Self {
            ctx,
            state,
            renderer,
            frame: None,
            dirty: false,
        }
    }

    /// Process a winit event.
    ///
    /// Returns true if egui consumed the event (don't pass to camera
    /// controls).
    pub fn on_window_event(&mut self, window: &Window, event: &winit::event::WindowEvent) -> bool {
        let response = self.state.on_window_event(window, event);
        response.consumed
    }

    /// Draw the panel for this frame.
    ///
    /// Returns true once an edit has been finalized: changes accumulate into
    /// a dirty flag and commit when the pointer lets go, so a slider drag
    /// causes one regeneration, not one per frame.
    pub fn run(&mut self, window: &Window, params: &mut GalaxyParams) -> bool {
        let raw_input = self.state.take_egui_input(window);
        self.ctx.begin_pass(raw_input);

        self.dirty |= draw_controls(&self.ctx, params);

        let full_output = self.ctx.end_pass();
        self.state
            .handle_platform_output(window, full_output.platform_output);

        let paint_jobs = self
            .ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);
        self.frame = Some(PanelFrame {
            paint_jobs,
            textures_delta: full_output.textures_delta,
            pixels_per_point: full_output.pixels_per_point,
        });

        if self.dirty && !self.ctx.is_using_pointer() {
            self.dirty = false;
            return true;
        }
        false
    }

    fn screen_descriptor(&self, size: [u32; 2]) -> Option<egui_wgpu::ScreenDescriptor> {
        let frame = self.frame.as_ref()?;
        Some(egui_wgpu::ScreenDescriptor {
            size_in_pixels: size,
            pixels_per_point: frame.pixels_per_point,
        })
    }
}

impl Overlay for Panel {
    fn prepare(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        size: [u32; 2],
    ) {
        let Some(screen) = self.screen_descriptor(size) else {
            return;
        };
        let Some(frame) = &self.frame else { return };

        for (id, image_delta) in &frame.textures_delta.set {
            self.renderer.update_texture(device, queue, *id, image_delta);
        }
        self.renderer
            .update_buffers(device, queue, encoder, &frame.paint_jobs, &screen);
    }

    fn paint(&mut self, pass: &mut wgpu::RenderPass<'static>, size: [u32; 2]) {
        let Some(screen) = self.screen_descriptor(size) else {
            return;
        };
        let Some(frame) = &self.frame else { return };

        self.renderer.render(pass, &frame.paint_jobs, &screen);
    }

    fn cleanup(&mut self) {
        if let Some(frame) = self.frame.take() {
            for id in &frame.textures_delta.free {
                self.renderer.free_texture(id);
            }
        }
    }
}

/// The galaxy controls window. Returns true if any widget changed this frame.
fn draw_controls(ctx: &egui::Context, params: &mut GalaxyParams) -> bool {
    let mut changed = false;

    egui::Window::new("Galaxy")
        .default_pos([10.0, 10.0])
        .resizable(false)
        .show(ctx, |ui| {
            ui.heading("Shape");
            ui.separator();

            changed |= slider_row(ui, "Count", egui::Slider::new(&mut params.count, 100..=50_000).step_by(100.0));
            changed |= slider_row(ui, "Size", egui::Slider::new(&mut params.size, 0.001..=0.1).step_by(0.001));
            changed |= slider_row(ui, "Radius", egui::Slider::new(&mut params.radius, 0.01..=20.0).step_by(0.01));
            changed |= slider_row(ui, "Branches", egui::Slider::new(&mut params.branches, 3..=10));
            changed |= slider_row(ui, "Spin", egui::Slider::new(&mut params.spin, -5.0..=5.0).step_by(0.001));
            changed |= slider_row(ui, "Randomness", egui::Slider::new(&mut params.randomness, 0.0..=2.0).step_by(0.001));
            changed |= slider_row(ui, "Falloff", egui::Slider::new(&mut params.randomness_power, 1.0..=10.0).step_by(0.001));

            ui.separator();
            ui.heading("Color");

            changed |= color_row(ui, "Inside", &mut params.inside_color);
            changed |= color_row(ui, "Outside", &mut params.outside_color);

            ui.separator();
            ui.label("Drag to orbit, scroll to zoom");
        });

    changed
}

fn slider_row(ui: &mut egui::Ui, label: &str, slider: egui::Slider<'_>) -> bool {
    let mut changed = false;
    ui.horizontal(|ui| {
        ui.label(format!("{label}:"));
        // Defaults may start outside the panel's range (the classic preset
        // does); only clamp once the user actually edits.
        changed = ui
            .add(slider.clamping(egui::SliderClamping::Edits))
            .changed();
    });
    changed
}

fn color_row(ui: &mut egui::Ui, label: &str, color: &mut Vec3) -> bool {
    let mut rgb = color.to_array();
    let mut changed = false;
    ui.horizontal(|ui| {
        ui.label(format!("{label}:"));
        changed = ui.color_edit_button_rgb(&mut rgb).changed();
    });
    if changed {
        *color = Vec3::from_array(rgb);
    }
    changed
}
