//! Interactive viewer for the partysim scenes
//!
//! Draws the running scene with a slowly adjustable yaw, exposes the tunable
//! parameters of the active scene as sliders, and rebuilds the scene whenever
//! the scene file on disk changes.

use eframe::egui;
use glam::{Vec2, Vec3};
use notify::{Event, RecommendedWatcher, Watcher};
use partysim_core::{
    build_simulation_context, get_particle_states, step_simulation, Force, Polygon2D, Scene, SceneConfig, SceneKind,
    SimulationContext,
};
use std::path::PathBuf;
use std::sync::mpsc;

/// Frame length used by the step button
const STEP_DT: f32 = 1.0 / 30.0;
/// Half-extent of the world region fitted into the canvas
const WORLD_HALF_EXTENT: f32 = 2.0;
const CIRCLE_SEGMENTS: usize = 48;

/// Open the viewer window and block until it is closed
pub fn run_viewer(kind: SceneKind, config_path: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let options = eframe::NativeOptions::default();
    eframe::run_native(
        "partysim",
        options,
        Box::new(move |cc| Ok(Box::new(VelApp::new(kind, config_path, cc)))),
    )
    .map_err(|e| format!("viewer failed: {}", e))?;
    Ok(())
}

/// Visual evaluation loop: step, draw, tweak, reload
pub struct VelApp {
    kind: SceneKind,
    config_path: Option<PathBuf>,
    config: SceneConfig,
    sim: Option<SimulationContext>,
    last_load_error: Option<String>,
    playing: bool,
    speed_multiplier: f32,
    yaw: f32,
    show_octree: bool,
    #[allow(dead_code)] // dropping the watcher stops the notifications
    file_watcher: Option<RecommendedWatcher>,
    file_receiver: mpsc::Receiver<notify::Result<Event>>,
}

impl VelApp {
    pub fn new(kind: SceneKind, config_path: Option<PathBuf>, _cc: &eframe::CreationContext<'_>) -> Self {
        let (tx, rx) = mpsc::channel();
        let watcher = config_path.as_ref().and_then(|path| {
            let mut watcher = notify::recommended_watcher(move |res| {
                // the receiver is gone once the window closes
                let _ = tx.send(res);
            })
            .map_err(|e| log::warn!("config hot reload unavailable: {}", e))
            .ok()?;
            if let Err(e) = watcher.watch(path, notify::RecursiveMode::NonRecursive) {
                log::warn!("cannot watch {}: {}", path.display(), e);
            }
            Some(watcher)
        });

        let mut app = Self {
            kind,
            config_path,
            config: SceneConfig::default(),
            sim: None,
            last_load_error: None,
            playing: false,
            speed_multiplier: 1.0,
            yaw: 0.0,
            show_octree: true,
            file_watcher: watcher,
            file_receiver: rx,
        };
        app.reload();
        app
    }

    /// Re-read the scene file (if any) and rebuild the simulation from it
    fn reload(&mut self) {
        if let Some(path) = &self.config_path {
            match SceneConfig::load(path) {
                Ok(config) => self.config = config,
                Err(e) => {
                    // keep the running scene, only report the broken file
                    log::warn!("{}", e);
                    self.last_load_error = Some(e.to_string());
                    return;
                }
            }
        }
        match build_simulation_context(self.kind, &self.config) {
            Ok(sim) => {
                self.sim = Some(sim);
                self.last_load_error = None;
            }
            Err(e) => {
                self.last_load_error = Some(e.to_string());
                self.sim = None;
                self.playing = false;
            }
        }
    }

    fn check_file_changes(&mut self) {
        let mut changed = false;
        while let Ok(event) = self.file_receiver.try_recv() {
            match event {
                Ok(Event {
                    kind: notify::EventKind::Modify(_) | notify::EventKind::Create(_),
                    paths,
                    ..
                }) => {
                    if let Some(path) = &self.config_path {
                        changed |= paths.iter().any(|p| p.ends_with(path) || path.ends_with(p));
                    }
                }
                Ok(_) => {}
                Err(e) => log::warn!("file watcher error: {}", e),
            }
        }
        if changed {
            log::info!("scene file changed, reloading");
            self.reload();
        }
    }

    fn project(&self, p: Vec3) -> Vec2 {
        let (sin, cos) = self.yaw.sin_cos();
        Vec2::new(p.x * cos + p.z * sin, p.y)
    }

    fn controls(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if ui.button(if self.playing { "⏸ Pause" } else { "▶ Play" }).clicked() {
                self.playing = !self.playing;
            }
            if ui.button("⏮ Reset").clicked() {
                if let Some(sim) = &mut self.sim {
                    sim.scene.reset();
                }
                self.playing = false;
            }
            if ui.button("⏭ Step").clicked() {
                if let Some(sim) = &mut self.sim {
                    step_simulation(sim, STEP_DT);
                }
            }
            if ui.button("⟳ Reload").clicked() {
                self.reload();
            }

            ui.separator();
            ui.label("Speed:");
            ui.add(egui::Slider::new(&mut self.speed_multiplier, 0.1..=4.0));
            ui.label("Yaw:");
            ui.add(egui::Slider::new(&mut self.yaw, -std::f32::consts::PI..=std::f32::consts::PI));

            ui.separator();
            if let Some(sim) = &self.sim {
                ui.label(format!("Step: {}  t = {:.2}s", sim.current_step, sim.time));
                if !sim.scene.is_finite() {
                    ui.colored_label(egui::Color32::RED, "diverged");
                }
            }
        });
    }

    fn tunables(&mut self, ui: &mut egui::Ui) {
        let Some(sim) = &mut self.sim else {
            return;
        };
        match &mut sim.scene {
            Scene::Flag(scene) => {
                let springs = &mut scene.flag.springs;
                for (name, spring) in [
                    ("Structural", &mut springs.structural),
                    ("Shear", &mut springs.shear),
                    ("Bend", &mut springs.bend),
                ] {
                    ui.label(name);
                    ui.add(egui::Slider::new(&mut spring.stiffness, 0.0..=5.0).text("K"));
                    ui.add(egui::Slider::new(&mut spring.damping, 0.0..=0.5).text("V"));
                }
                ui.separator();
                ui.add(egui::Slider::new(&mut scene.wind, 0.0..=0.5).text("wind"));
                ui.add(egui::Slider::new(&mut scene.collision_multiplier, 0.0..=0.1).text("collision"));
                if let Some(sphere) = scene.spheres.first_mut() {
                    ui.label("Sphere");
                    ui.add(egui::Slider::new(&mut sphere.radius, 0.0..=2.0).text("radius"));
                    ui.add(egui::Slider::new(&mut sphere.center.x, -2.0..=2.0).text("x"));
                    ui.add(egui::Slider::new(&mut sphere.center.y, -2.0..=2.0).text("y"));
                    ui.add(egui::Slider::new(&mut sphere.center.z, -2.0..=2.0).text("z"));
                }
            }
            Scene::Fall(scene) => {
                if ui
                    .add(egui::Slider::new(&mut scene.count, 1..=256).text("count"))
                    .changed()
                {
                    scene.reset();
                }
                for force in scene.forces.forces_mut() {
                    if let Force::Constant(f) = force {
                        ui.add(egui::Slider::new(&mut f.y, -0.1..=0.1).text("force y"));
                    }
                }
            }
            Scene::Swarm(scene) => {
                if ui
                    .add(egui::Slider::new(&mut scene.count, 1..=1024).text("count"))
                    .changed()
                {
                    scene.reset();
                }
                ui.add(egui::Slider::new(&mut scene.move_scale, 0.0..=0.2).text("move scale"));
                ui.label(format!("indexed: {}", scene.tracked_count()));
                ui.label(format!("octree nodes: {}", scene.octree.node_count()));
                ui.checkbox(&mut self.show_octree, "show octree");
            }
        }
    }

    fn draw(&self, ui: &egui::Ui) {
        let Some(sim) = &self.sim else {
            return;
        };
        let rect = ui.max_rect();
        let painter = ui.painter();
        let center = rect.center();
        let scale = rect.width().min(rect.height()) / (2.0 * WORLD_HALF_EXTENT) * 0.9;
        let to_screen = |p: Vec2| center + egui::vec2(p.x * scale, -p.y * scale);
        let draw_polygon = |polygon: &Polygon2D| {
            let c = polygon.color();
            let color = egui::Color32::from_rgb(channel(c.x), channel(c.y), channel(c.z));
            let points = polygon.points().iter().map(|p| to_screen(*p)).collect();
            painter.add(egui::Shape::closed_line(points, egui::Stroke::new(1.0, color)));
        };

        match &sim.scene {
            Scene::Flag(scene) => {
                for sphere in &scene.spheres {
                    let outline = Polygon2D::build_circle(
                        Vec3::new(0.9, 0.4, 0.2),
                        self.project(sphere.center),
                        sphere.radius,
                        CIRCLE_SEGMENTS,
                        true,
                    );
                    draw_polygon(&outline);
                }
            }
            Scene::Swarm(scene) if self.show_octree => {
                for leaf in scene.octree.occupied_leaves() {
                    let half = Vec2::new(leaf.dimension.x, leaf.dimension.y) * 0.5;
                    let corner = self.project(leaf.center) - half;
                    let outline = Polygon2D::build_box(
                        Vec3::new(0.3, 0.8, 0.3),
                        corner,
                        leaf.dimension.x,
                        leaf.dimension.y,
                        false,
                    );
                    draw_polygon(&outline);
                }
            }
            _ => {}
        }

        for particle in get_particle_states(sim) {
            let screen_pos = to_screen(self.project(particle.position));
            let c = particle.color;
            let color = egui::Color32::from_rgb(channel(c.x), channel(c.y), channel(c.z));
            let radius = match sim.scene.kind() {
                SceneKind::Flag => 2.0,
                SceneKind::Fall | SceneKind::Swarm => 4.0,
            };
            painter.circle_filled(screen_pos, radius, color);
        }
    }
}

fn channel(value: f32) -> u8 {
    (value.abs().clamp(0.0, 1.0) * 255.0) as u8
}

impl eframe::App for VelApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_file_changes();

        egui::TopBottomPanel::top("controls").show(ctx, |ui| self.controls(ui));
        egui::SidePanel::right("tunables").show(ctx, |ui| self.tunables(ui));

        if let Some(error) = &self.last_load_error {
            egui::TopBottomPanel::bottom("errors").show(ctx, |ui| {
                ui.label(egui::RichText::new(format!("Error: {}", error)).color(egui::Color32::RED));
            });
        }

        egui::CentralPanel::default().show(ctx, |ui| self.draw(ui));

        if self.playing {
            // the first frame reports dt = 0 and is skipped by the simulation
            let dt = ctx.input(|i| i.stable_dt) * self.speed_multiplier;
            if let Some(sim) = &mut self.sim {
                step_simulation(sim, dt);
            }
            ctx.request_repaint();
        }
    }
}
