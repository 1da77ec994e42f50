//! Interactive sail cloth viewer built with eframe/egui.
//!
//! This module defines [`Viewer`], which owns a [`ClothBody`], drives it
//! with a fixed timestep, and draws its constraints color-coded by stretch.

use std::f32::consts::PI;

use eframe::App;
use glam::{Vec2, Vec3};
use rand::{Rng, rng};
use sail_core::{ClothBody, ClothError, ClothOptions, Mesh};
use tracing::{info, warn};

/// Fixed simulation step handed to [`ClothBody::update`].
const FIXED_DT: f32 = 1.0 / 60.0;

/// Vertices within this distance of the anchor line are pinned.
const ANCHOR_TOLERANCE: f32 = 1e-4;

/// Rest-length change per click of the shorten/lengthen buttons.
const REST_LENGTH_STEP: f32 = 0.05;

/// Scale from stretch amount to color shift.
const STRETCH_COLOR_GAIN: f32 = 20.0;

/// Drives one [`ClothBody`] and draws it.
///
/// Each egui frame the panels are rebuilt; while `running`, the cloth takes
/// at most one [`Viewer::step_once`] per `step_interval` of egui time.
///
/// ### Fields
/// - `mesh` - Rest geometry, kept so the cloth can be rebuilt on reset.
/// - `body` - The simulated cloth.
/// - `options` - Options used for the next rebuild.
/// - `anchor_x` - Vertices with rest `x` at or below this are anchored.
///
/// - `wind` - Base wind vector.
/// - `gust` - Maximum random gust added per component each step.
///
/// - `yaw` - Rotation of the orthographic camera around the y axis (radians).
/// - `zoom`, `pan` - World-to-screen scale and screen-space offset.
pub struct Viewer {
    mesh: Mesh,
    body: ClothBody,
    options: ClothOptions,
    anchor_x: f32,

    wind: Vec3,
    gust: f32,
    rng: rand::rngs::ThreadRng,

    running: bool,
    yaw: f32,
    zoom: f32,
    pan: egui::Vec2,

    step_interval: f64,
    last_step_time: f64,
    last_step_dt: f64,
    frames: u64,
}

impl Viewer {
    /// Creates a viewer for `mesh`.
    ///
    /// `anchor_x` defaults to the smallest x coordinate of the mesh, so the
    /// luff of the sail is pinned to the mast.
    pub fn new(mesh: Mesh, anchor_x: Option<f32>) -> Result<Self, ClothError> {
        let anchor_x = anchor_x
            .or_else(|| mesh.bounds().map(|(min, _)| min.x))
            .unwrap_or(0.0);
        let options = ClothOptions::default();
        let body = build_body(&mesh, &options, anchor_x)?;

        Ok(Self {
            mesh,
            body,
            options,
            anchor_x,
            wind: Vec3::new(0.0, 0.0, 4.0),
            gust: 0.0,
            rng: rng(),
            running: false,
            yaw: 0.6,
            zoom: 40.0,
            pan: egui::vec2(0.0, 0.0),
            step_interval: f64::from(FIXED_DT),
            last_step_time: 0.0,
            last_step_dt: 0.0,
            frames: 0,
        })
    }

    /// Rebuilds the cloth from the rest mesh with the current options.
    ///
    /// Keeps camera and wind settings; stops auto-running.
    fn reset(&mut self) {
        match build_body(&self.mesh, &self.options, self.anchor_x) {
            Ok(body) => {
                self.body = body;
                self.frames = 0;
                self.running = false;
            }
            Err(err) => warn!(%err, "reset failed, keeping current cloth"),
        }
    }

    /// Advances the cloth by one fixed step under the current wind plus a
    /// random gust.
    fn step_once(&mut self) {
        let wind = self.wind + self.sample_gust();
        self.body.update(FIXED_DT, wind);
        self.frames += 1;
    }

    fn sample_gust(&mut self) -> Vec3 {
        if self.gust <= 0.0 {
            return Vec3::ZERO;
        }
        let g = self.gust;
        Vec3::new(
            self.rng.random_range(-g..=g),
            self.rng.random_range(-g..=g) * 0.25,
            self.rng.random_range(-g..=g),
        )
    }

    /// Shortens or lengthens the rest length of the last constraint.
    fn nudge_last_rest_length(&mut self, delta: f32) {
        let Some(last) = self.body.constraints().len().checked_sub(1) else {
            return;
        };
        match self.body.adjust_rest_length(last, delta) {
            Ok(len) => info!(constraint = last, rest_length = len, "rest length adjusted"),
            Err(err) => warn!(%err, "rest length adjustment failed"),
        }
    }

    /// Orthographic projection of a world point after orbiting by `yaw`.
    fn project(&self, p: Vec3) -> Vec2 {
        let (sin, cos) = self.yaw.sin_cos();
        Vec2::new(p.x * cos + p.z * sin, p.y)
    }

    /// Converts a projected position to screen-space.
    ///
    /// The projected plane is scaled by `zoom`, offset by `pan`, and
    /// centered inside `rect`. The y-axis is flipped so positive y goes up.
    fn world_to_screen(&self, p: Vec2, rect: egui::Rect) -> egui::Pos2 {
        let center = rect.center();
        egui::pos2(
            center.x + p.x * self.zoom + self.pan.x,
            center.y - p.y * self.zoom + self.pan.y,
        )
    }

    /// Inverse of [`Viewer::world_to_screen`].
    fn screen_to_world(&self, p: egui::Pos2, rect: egui::Rect) -> Vec2 {
        let center = rect.center();
        let x = (p.x - center.x - self.pan.x) / self.zoom;
        let y = (center.y - p.y + self.pan.y) / self.zoom;
        Vec2::new(x, y)
    }

    /// Centers the camera on the cloth's current bounds.
    fn frame_cloth(&mut self) {
        let mut projected = self.body.positions().map(|p| self.project(p));
        let Some(first) = projected.next() else {
            return;
        };
        let (lo, hi) = projected.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p)));
        let mid = (lo + hi) * 0.5;
        self.pan = egui::vec2(-mid.x * self.zoom, mid.y * self.zoom);
    }

    /// A label followed by a bounded drag field on one row.
    fn labeled_drag_f32(
        ui: &mut egui::Ui,
        label: &str,
        value: &mut f32,
        range: std::ops::RangeInclusive<f32>,
        speed: f64,
    ) {
        ui.horizontal(|ui| {
            ui.label(label);
            ui.add(egui::DragValue::new(value).range(range).speed(speed));
        });
    }

    /// Builds the top panel UI (run controls, stepping, zoom, camera).
    fn ui_top_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui
                    .button(if self.running { "⏸ Pause" } else { "▶ Run" })
                    .clicked()
                {
                    self.running = !self.running;
                }

                ui.add(
                    egui::DragValue::new(&mut self.step_interval)
                        .prefix("step every = ")
                        .range(0.005..=1.0)
                        .speed(0.001),
                );

                if ui.button("Step").clicked() {
                    let now = ctx.input(|i| i.time);
                    if self.last_step_time > 0.0 {
                        self.last_step_dt = now - self.last_step_time;
                    }
                    self.step_once();
                    self.last_step_time = now;
                }

                if ui.button("Reset").clicked() {
                    self.reset();
                }

                if ui.button("Frame").clicked() {
                    self.frame_cloth();
                }

                ui.separator();
                ui.add(egui::Slider::new(&mut self.zoom, 1.0..=200.0).text("Zoom"));
                ui.add(egui::Slider::new(&mut self.yaw, -PI..=PI).text("Yaw"));
            });
        });
    }

    /// Builds the bottom status bar.
    fn ui_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(format!("dt = {FIXED_DT:.4} s"));
                ui.label(format!("dt last = {:.3} s", self.last_step_dt));
                ui.separator();
                ui.label(format!("frames = {}", self.frames));
                let max_stretch = self.body.max_abs_stretch();
                ui.label(format!("max |stretch| = {max_stretch:.4}"));
                ui.label(format!(
                    "particles = {} ({} anchored)",
                    self.body.particles().len(),
                    self.body.anchored_count()
                ));
                ui.label(format!("constraints = {}", self.body.constraints().len()));
            });
        });
    }

    /// Builds the right-hand panel for wind and constraint parameters.
    fn ui_config_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::right("config_panel")
            .resizable(true)
            .default_width(220.0)
            .show(ctx, |ui| {
                ui.heading("Wind");
                Self::labeled_drag_f32(ui, "wind.x:", &mut self.wind.x, -50.0..=50.0, 0.1);
                Self::labeled_drag_f32(ui, "wind.y:", &mut self.wind.y, -50.0..=50.0, 0.1);
                Self::labeled_drag_f32(ui, "wind.z:", &mut self.wind.z, -50.0..=50.0, 0.1);
                Self::labeled_drag_f32(ui, "gust:", &mut self.gust, 0.0..=50.0, 0.1);

                ui.separator();
                ui.heading("Constraints (on reset)");
                ui.label("Structural");
                Self::labeled_drag_f32(
                    ui,
                    "stretch:",
                    &mut self.options.structural.stretch_factor,
                    0.0..=1.0,
                    0.01,
                );
                Self::labeled_drag_f32(
                    ui,
                    "shrink:",
                    &mut self.options.structural.shrink_factor,
                    0.0..=1.0,
                    0.01,
                );
                ui.label("Shear");
                Self::labeled_drag_f32(
                    ui,
                    "stretch:",
                    &mut self.options.shear.stretch_factor,
                    0.0..=1.0,
                    0.01,
                );
                Self::labeled_drag_f32(
                    ui,
                    "shrink:",
                    &mut self.options.shear.shrink_factor,
                    0.0..=1.0,
                    0.01,
                );
                Self::labeled_drag_f32(
                    ui,
                    "anchor x ≤",
                    &mut self.anchor_x,
                    -1000.0..=1000.0,
                    0.05,
                );

                ui.separator();
                ui.label("Last constraint rest length");
                ui.horizontal(|ui| {
                    if ui.button("− shorten").clicked() {
                        self.nudge_last_rest_length(-REST_LENGTH_STEP);
                    }
                    if ui.button("+ lengthen").clicked() {
                        self.nudge_last_rest_length(REST_LENGTH_STEP);
                    }
                });

                ui.separator();
                if ui.button("Reset options to default").clicked() {
                    self.options = ClothOptions::default();
                }
            });
    }

    /// Builds the central panel where the cloth is drawn.
    fn ui_central_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let response =
                ui.allocate_response(ui.available_size(), egui::Sense::click_and_drag());
            let rect = response.rect;
            let painter = ui.painter_at(rect);

            if response.dragged() {
                self.pan += response.drag_delta();
            }

            // Keep the point under the cursor fixed while zooming.
            let scroll = ui.ctx().input(|i| i.raw_scroll_delta.y);
            if scroll != 0.0 {
                let pointer_screen = response.hover_pos().unwrap_or(rect.center());
                let world_before = self.screen_to_world(pointer_screen, rect);

                let factor = (1.0 + scroll * 0.001).clamp(0.5, 2.0);
                self.zoom = (self.zoom * factor).clamp(1.0, 200.0);

                let screen_after = self.world_to_screen(world_before, rect);
                self.pan += pointer_screen - screen_after;
            }

            // Constraints, colored by stretch.
            for (a, b, stretch) in self.body.segments() {
                let a = self.world_to_screen(self.project(a), rect);
                let b = self.world_to_screen(self.project(b), rect);
                painter.line_segment([a, b], egui::Stroke::new(1.0, stretch_color(stretch)));
            }

            // Particles, anchored ones highlighted.
            for p in self.body.particles() {
                let pos = self.world_to_screen(self.project(p.pos), rect);
                let (r, color) = if p.anchored {
                    (3.5, egui::Color32::YELLOW)
                } else {
                    (2.0, egui::Color32::from_rgb(255, 0, 255))
                };
                painter.circle_filled(pos, r, color);
            }

            // Fixed-step driver: at most one step per `step_interval`.
            if self.running {
                let now = ctx.input(|i| i.time);
                let elapsed = now - self.last_step_time;
                if elapsed >= self.step_interval {
                    if self.last_step_time > 0.0 {
                        self.last_step_dt = elapsed;
                    }
                    self.step_once();
                    self.last_step_time = now;
                }

                ctx.request_repaint();
            }
        });
    }
}

impl App for Viewer {
    /// Rebuilds every panel; the central one also advances the cloth.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ui_top_panel(ctx);
        self.ui_status_bar(ctx);
        self.ui_config_panel(ctx);
        self.ui_central_panel(ctx);
    }
}

fn build_body(mesh: &Mesh, options: &ClothOptions, anchor_x: f32) -> Result<ClothBody, ClothError> {
    ClothBody::from_mesh(mesh, options, |x, _y| x <= anchor_x + ANCHOR_TOLERANCE)
}

/// Line color for a constraint with the given stretch amount.
///
/// White at rest, shading toward red when stretched and toward yellow when
/// compressed.
pub fn stretch_color(stretch: f32) -> egui::Color32 {
    let shift = stretch.abs() * STRETCH_COLOR_GAIN;
    let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    let (r, g, b) = if stretch > 0.0 {
        (1.0 + shift, 1.0 - shift, 1.0 - shift)
    } else if stretch < 0.0 {
        (1.0 + shift, 1.0 + shift, 1.0 - shift)
    } else {
        (1.0, 1.0, 1.0)
    };
    egui::Color32::from_rgb(channel(r), channel(g), channel(b))
}
