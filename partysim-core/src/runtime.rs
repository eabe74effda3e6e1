use crate::config::{FallConfig, FlagConfig, SceneConfig, SwarmConfig};
use crate::error::SimError;
use crate::flag::{Flag, Sphere};
use crate::forces::{Force, ForceSet};
use crate::integrator::leapfrog_step;
use crate::octree::Octree;
use crate::particles::{ParticleManager2D, ParticleManager3D};
use crate::vector::{spherical_rand, SimVector};
use glam::{Vec2, Vec3};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fmt;
use std::str::FromStr;

/// Which of the stock scenes to run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneKind {
    /// Cloth pinned on one edge, blown by wind onto a sphere
    Flag,
    /// Circle of 2D particles falling under a constant force
    Fall,
    /// 3D random walk tracked by an octree
    Swarm,
}

impl FromStr for SceneKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "flag" => Ok(SceneKind::Flag),
            "fall" => Ok(SceneKind::Fall),
            "swarm" => Ok(SceneKind::Swarm),
            other => Err(format!("unknown scene '{}' (expected flag, fall or swarm)", other)),
        }
    }
}

impl fmt::Display for SceneKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SceneKind::Flag => "flag",
            SceneKind::Fall => "fall",
            SceneKind::Swarm => "swarm",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone)]
pub struct FlagScene {
    pub flag: Flag,
    pub gravity: Vec3,
    pub wind: f32,
    pub spheres: Vec<Sphere>,
    pub collision_multiplier: f32,
}

#[derive(Debug, Clone)]
pub struct FallScene {
    pub particles: ParticleManager2D,
    pub forces: ForceSet<Vec2>,
    pub count: u32,
    pub radius: f32,
}

#[derive(Debug, Clone)]
pub struct SwarmScene {
    pub particles: ParticleManager3D,
    /// Particle indices keyed by their current position
    pub octree: Octree<usize>,
    /// Whether particle `i` is currently stored in the octree
    tracked: Vec<bool>,
    pub count: u32,
    pub radius: f32,
    pub move_scale: f32,
}

#[derive(Debug, Clone)]
pub enum Scene {
    Flag(FlagScene),
    Fall(FallScene),
    Swarm(SwarmScene),
}

/// A running scene plus its clock and random source
#[derive(Debug, Clone)]
pub struct SimulationContext {
    pub scene: Scene,
    pub time: f32,
    pub current_step: usize,
    rng: StdRng,
}

/// Renderer-facing snapshot of one particle
#[derive(Debug, Clone, Copy)]
pub struct ParticleState {
    pub position: Vec3,
    pub mass: f32,
    pub color: Vec3,
}

/// Outcome of a headless run
#[derive(Debug, Clone)]
pub struct SimulationSummary {
    pub scene: SceneKind,
    pub steps: usize,
    pub time: f32,
    pub particle_count: usize,
    pub centroid: Vec3,
    pub max_speed: f32,
    pub finite: bool,
}

impl FlagScene {
    pub fn new(config: &FlagConfig) -> Self {
        let mut flag = Flag::new(config.layout());
        flag.springs = config.springs;
        Self {
            flag,
            gravity: config.gravity,
            wind: config.wind,
            spheres: config.spheres.clone(),
            collision_multiplier: config.collision_multiplier,
        }
    }

    fn step(&mut self, dt: f32, rng: &mut StdRng) {
        self.flag.apply_external_force(self.gravity);
        self.flag.apply_external_force(spherical_rand(rng, self.wind));
        self.flag.apply_internal_forces(dt);
        self.flag.apply_sphere_collision(&self.spheres, self.collision_multiplier);
        self.flag.update(dt);
    }
}

impl FallScene {
    pub fn new(config: &FallConfig) -> Self {
        let mut particles = ParticleManager2D::new();
        particles.add_random_particles(config.radius, config.count);
        Self {
            particles,
            forces: ForceSet::new().with(Force::Constant(config.force)),
            count: config.count,
            radius: config.radius,
        }
    }

    /// Repopulate the circle, e.g. after `count` was changed
    pub fn reset(&mut self) {
        self.particles.clear();
        self.particles.add_random_particles(self.radius, self.count);
    }

    fn step(&mut self, dt: f32) {
        self.forces.apply(&mut self.particles);
        leapfrog_step(&mut self.particles, dt);
    }
}

impl SwarmScene {
    pub fn new(config: &SwarmConfig) -> Self {
        let mut scene = Self {
            particles: ParticleManager3D::new(),
            octree: Octree::new(
                config.octree_depth,
                Vec3::ZERO,
                Vec3::splat(config.octree_dimension),
            ),
            tracked: Vec::new(),
            count: config.count,
            radius: config.radius,
            move_scale: config.move_scale,
        };
        scene.populate();
        scene
    }

    /// Rebuild the particles and the octree from scratch
    pub fn reset(&mut self) {
        let root = self.octree.root();
        self.octree = Octree::new(
            self.octree.depth(root),
            self.octree.center(root),
            self.octree.dimension(root),
        );
        self.particles.clear();
        self.tracked.clear();
        self.populate();
    }

    pub fn tracked_count(&self) -> usize {
        self.tracked.iter().filter(|t| **t).count()
    }

    fn populate(&mut self) {
        self.particles
            .add_particle(Vec3::ZERO, Vec3::ZERO, Vec3::ZERO, Vec3::ONE, 1.0);
        self.particles.add_random_particles(self.radius, self.count);
        for (i, position) in self.particles.positions().iter().enumerate() {
            let tracked = match self.octree.add(i, *position) {
                Ok(()) => true,
                Err(e) => {
                    log::warn!("particle {} not indexed: {}", i, e);
                    false
                }
            };
            self.tracked.push(tracked);
        }
    }

    fn step(&mut self, dt: f32, rng: &mut StdRng) {
        let before = self.particles.positions().to_vec();
        self.particles.jitter(dt * self.move_scale, rng);

        for (i, old) in before.iter().enumerate() {
            if !self.tracked[i] {
                continue;
            }
            let new = self.particles.get_position(i);
            let moved = self
                .octree
                .remove(&i, *old)
                .and_then(|_| self.octree.add(i, new));
            if let Err(e) = moved {
                log::warn!("particle {} left the octree: {}", i, e);
                self.tracked[i] = false;
            }
        }
    }
}

impl Scene {
    pub fn kind(&self) -> SceneKind {
        match self {
            Scene::Flag(_) => SceneKind::Flag,
            Scene::Fall(_) => SceneKind::Fall,
            Scene::Swarm(_) => SceneKind::Swarm,
        }
    }

    pub fn particle_count(&self) -> usize {
        match self {
            Scene::Flag(s) => s.flag.particles().size(),
            Scene::Fall(s) => s.particles.size(),
            Scene::Swarm(s) => s.particles.size(),
        }
    }

    pub fn is_finite(&self) -> bool {
        match self {
            Scene::Flag(s) => s.flag.particles().is_finite(),
            Scene::Fall(s) => s.particles.is_finite(),
            Scene::Swarm(s) => s.particles.is_finite(),
        }
    }

    /// Restart the scene; tunable parameters are kept
    pub fn reset(&mut self) {
        match self {
            Scene::Flag(s) => s.flag.reset(),
            Scene::Fall(s) => s.reset(),
            Scene::Swarm(s) => s.reset(),
        }
    }
}

/// Build a ready-to-step context for one of the stock scenes
pub fn build_simulation_context(kind: SceneKind, config: &SceneConfig) -> Result<SimulationContext, SimError> {
    config.validate()?;
    let scene = match kind {
        SceneKind::Flag => Scene::Flag(FlagScene::new(&config.flag)),
        SceneKind::Fall => Scene::Fall(FallScene::new(&config.fall)),
        SceneKind::Swarm => Scene::Swarm(SwarmScene::new(&config.swarm)),
    };
    log::info!(
        "built {} scene with {} particles (seed {})",
        kind,
        scene.particle_count(),
        config.seed
    );
    Ok(SimulationContext {
        scene,
        time: 0.0,
        current_step: 0,
        rng: StdRng::seed_from_u64(config.seed),
    })
}

/// Advance the scene by one frame of length dt
///
/// Frames with `dt <= 0` (the very first frame of a render loop) are skipped.
pub fn step_simulation(ctx: &mut SimulationContext, dt: f32) {
    if dt <= 0.0 {
        return;
    }
    match &mut ctx.scene {
        Scene::Flag(s) => s.step(dt, &mut ctx.rng),
        Scene::Fall(s) => s.step(dt),
        Scene::Swarm(s) => s.step(dt, &mut ctx.rng),
    }
    ctx.time += dt;
    ctx.current_step += 1;
}

/// Snapshot particle positions, masses and colors for drawing
pub fn get_particle_states(ctx: &SimulationContext) -> Vec<ParticleState> {
    fn collect<V: SimVector>(positions: &[V], masses: &[f32], colors: &[Vec3]) -> Vec<ParticleState> {
        positions
            .iter()
            .zip(masses)
            .zip(colors)
            .map(|((p, m), c)| ParticleState {
                position: p.to_vec3(),
                mass: *m,
                color: *c,
            })
            .collect()
    }

    match &ctx.scene {
        Scene::Flag(s) => {
            let pm = s.flag.particles();
            collect(pm.positions(), pm.masses(), pm.colors())
        }
        Scene::Fall(s) => collect(s.particles.positions(), s.particles.masses(), s.particles.colors()),
        Scene::Swarm(s) => collect(s.particles.positions(), s.particles.masses(), s.particles.colors()),
    }
}

/// Run a scene headless for `steps` frames of length dt
pub fn run_scene(kind: SceneKind, config: &SceneConfig, steps: usize, dt: f32) -> Result<SimulationSummary, SimError> {
    let mut ctx = build_simulation_context(kind, config)?;
    for _ in 0..steps {
        step_simulation(&mut ctx, dt);
    }
    if !ctx.scene.is_finite() {
        log::warn!("{} scene diverged after {} steps", kind, ctx.current_step);
    }
    Ok(summarize(&ctx))
}

pub fn summarize(ctx: &SimulationContext) -> SimulationSummary {
    let states = get_particle_states(ctx);
    let centroid = if states.is_empty() {
        Vec3::ZERO
    } else {
        states.iter().map(|s| s.position).sum::<Vec3>() / states.len() as f32
    };
    let max_speed = match &ctx.scene {
        Scene::Flag(s) => max_length(s.flag.particles().velocities()),
        Scene::Fall(s) => max_length(s.particles.velocities()),
        Scene::Swarm(s) => max_length(s.particles.velocities()),
    };
    SimulationSummary {
        scene: ctx.scene.kind(),
        steps: ctx.current_step,
        time: ctx.time,
        particle_count: states.len(),
        centroid,
        max_speed,
        finite: ctx.scene.is_finite(),
    }
}

fn max_length<V: SimVector>(vectors: &[V]) -> f32 {
    vectors.iter().map(|v| v.length()).fold(0.0, f32::max)
}
