//! Force laws and force sources
//!
//! The free functions compute a single force vector; [`Force`] wraps them into
//! sources that accumulate into a [`ParticleManager`]. Nothing here integrates:
//! forces only live in the accumulator until the next integrator step.

use crate::particles::ParticleManager;
use crate::vector::SimVector;

/// Guard for coincident spring endpoints
pub const HOOK_EPSILON: f32 = 1e-4;

/// Hooke spring force felt at `p1` from a spring to `p2`
///
/// `k` is the stiffness and `l` the rest length. The force pulls `p1` toward
/// `p2` when the spring is stretched and pushes it away when compressed.
pub fn hook_force<V: SimVector>(k: f32, l: f32, p1: V, p2: V) -> V {
    (p2 - p1) * (k * (1.0 - l / p1.distance(p2).max(HOOK_EPSILON)))
}

/// Kinetic brake between two velocities for a step of `dt`
///
/// Scales with `1 / dt`, so `dt == 0` yields non-finite values.
pub fn brake_force<V: SimVector>(v: f32, dt: f32, v1: V, v2: V) -> V {
    (v2 - v1) / dt * v
}

/// Outward push for a particle at `distance_to_center` from a sphere center
///
/// The caller decides whether the particle overlaps the sphere. A particle
/// sitting exactly on the center gets no push.
pub fn sphere_collision_force<V: SimVector>(distance_to_center: f32, sphere_center: V, particle_position: V) -> V {
    (particle_position - sphere_center).normalize_or_zero() * (1.0 / (1.0 + distance_to_center))
}

/// A source of force applied to a whole particle set
#[derive(Debug, Clone)]
pub enum Force<V: SimVector> {
    /// Same vector added to every particle
    Constant(V),
    /// Hooke spring between particles `a` and `b`
    Spring {
        a: usize,
        b: usize,
        stiffness: f32,
        rest_length: f32,
    },
    /// Velocity brake between particles `a` and `b`
    Brake {
        a: usize,
        b: usize,
        damping: f32,
        dt: f32,
    },
    /// Pushes overlapping particles out of a sphere
    SphereRepulsion {
        center: V,
        radius: f32,
        multiplier: f32,
    },
}

impl<V: SimVector> Force<V> {
    pub fn apply(&self, pm: &mut ParticleManager<V>) {
        match self {
            Force::Constant(f) => pm.add_force_to_all(*f),
            Force::Spring {
                a,
                b,
                stiffness,
                rest_length,
            } => {
                let f = hook_force(*stiffness, *rest_length, pm.get_position(*a), pm.get_position(*b));
                pm.add_force(f, *a);
                pm.add_force(-f, *b);
            }
            Force::Brake { a, b, damping, dt } => {
                let f = brake_force(*damping, *dt, pm.get_velocity(*a), pm.get_velocity(*b));
                pm.add_force(f, *a);
                pm.add_force(-f, *b);
            }
            Force::SphereRepulsion {
                center,
                radius,
                multiplier,
            } => {
                for i in 0..pm.size() {
                    let p = pm.get_position(i);
                    let d = p.distance(*center);
                    if d < *radius {
                        pm.add_force(sphere_collision_force(d, *center, p) * *multiplier, i);
                    }
                }
            }
        }
    }
}

/// Ordered collection of force sources
#[derive(Debug, Clone)]
pub struct ForceSet<V: SimVector> {
    forces: Vec<Force<V>>,
}

impl<V: SimVector> ForceSet<V> {
    pub fn new() -> Self {
        Self { forces: Vec::new() }
    }

    pub fn with(mut self, force: Force<V>) -> Self {
        self.forces.push(force);
        self
    }

    pub fn push(&mut self, force: Force<V>) {
        self.forces.push(force);
    }

    pub fn forces(&self) -> &[Force<V>] {
        &self.forces
    }

    pub fn forces_mut(&mut self) -> &mut [Force<V>] {
        &mut self.forces
    }

    /// Apply every force in insertion order
    pub fn apply(&self, pm: &mut ParticleManager<V>) {
        for force in &self.forces {
            force.apply(pm);
        }
    }
}

impl<V: SimVector> Default for ForceSet<V> {
    fn default() -> Self {
        Self::new()
    }
}
