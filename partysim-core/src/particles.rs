//! Structure-of-arrays particle store
//!
//! Each particle of index `i` is described by `positions[i]`, `velocities[i]`,
//! `forces[i]`, `masses[i]` and `colors[i]`. The five sequences always have the
//! same length and indices stay valid until [`ParticleManager::clear`].

use crate::vector::SimVector;
use glam::{Vec2, Vec3};
use rand::Rng;
use std::f32::consts::TAU;

#[derive(Debug, Clone, Default)]
pub struct ParticleManager<V: SimVector> {
    positions: Vec<V>,
    velocities: Vec<V>,
    forces: Vec<V>,
    colors: Vec<Vec3>,
    masses: Vec<f32>,
}

pub type ParticleManager2D = ParticleManager<Vec2>;
pub type ParticleManager3D = ParticleManager<Vec3>;

impl<V: SimVector> ParticleManager<V> {
    pub fn new() -> Self {
        Self {
            positions: Vec::new(),
            velocities: Vec::new(),
            forces: Vec::new(),
            colors: Vec::new(),
            masses: Vec::new(),
        }
    }

    /// Append a particle and return its index
    pub fn add_particle(&mut self, position: V, velocity: V, force: V, color: Vec3, mass: f32) -> usize {
        self.positions.push(position);
        self.velocities.push(velocity);
        self.forces.push(force);
        self.colors.push(color);
        self.masses.push(mass);
        self.masses.len() - 1
    }

    /// Append `count` unit-mass particles at rest, evenly spaced on a circle
    ///
    /// The color of each particle is `(cos θ, sin θ, cos θ · sin θ)` for its angle θ.
    pub fn add_random_particles(&mut self, radius: f32, count: u32) {
        if count == 0 {
            return;
        }
        let delta = TAU / count as f32;
        for i in 0..count {
            let angle = i as f32 * delta;
            let (s, c) = angle.sin_cos();
            self.add_particle(
                V::on_circle(radius, angle),
                V::ZERO,
                V::ZERO,
                Vec3::new(c, s, c * s),
                1.0,
            );
        }
    }

    pub fn clear(&mut self) {
        self.positions.clear();
        self.velocities.clear();
        self.forces.clear();
        self.colors.clear();
        self.masses.clear();
    }

    pub fn size(&self) -> usize {
        self.masses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.masses.is_empty()
    }

    /// # Panics
    /// If `i` is not a valid particle index.
    pub fn get_position(&self, i: usize) -> V {
        self.positions[self.checked(i)]
    }

    pub fn get_velocity(&self, i: usize) -> V {
        self.velocities[self.checked(i)]
    }

    pub fn get_force(&self, i: usize) -> V {
        self.forces[self.checked(i)]
    }

    pub fn get_mass(&self, i: usize) -> f32 {
        self.masses[self.checked(i)]
    }

    pub fn get_color(&self, i: usize) -> Vec3 {
        self.colors[self.checked(i)]
    }

    pub fn set_position(&mut self, p: V, i: usize) {
        let i = self.checked(i);
        self.positions[i] = p;
    }

    pub fn set_velocity(&mut self, v: V, i: usize) {
        let i = self.checked(i);
        self.velocities[i] = v;
    }

    /// Accumulate `f` into the force slot of particle `i`
    pub fn add_force(&mut self, f: V, i: usize) {
        let i = self.checked(i);
        self.forces[i] += f;
    }

    pub fn add_force_to_all(&mut self, f: V) {
        for force in self.forces.iter_mut() {
            *force += f;
        }
    }

    pub fn reset_force(&mut self, i: usize) {
        let i = self.checked(i);
        self.forces[i] = V::ZERO;
    }

    pub fn reset_forces(&mut self) {
        for force in self.forces.iter_mut() {
            *force = V::ZERO;
        }
    }

    /// Move every particle by a random offset of length at most `max_dist`
    pub fn jitter<R: Rng + ?Sized>(&mut self, max_dist: f32, rng: &mut R) {
        for p in self.positions.iter_mut() {
            *p += V::random_offset(rng, max_dist);
        }
    }

    /// False once any position or velocity has become NaN or infinite
    pub fn is_finite(&self) -> bool {
        self.positions.iter().all(|p| p.is_finite()) && self.velocities.iter().all(|v| v.is_finite())
    }

    pub fn positions(&self) -> &[V] {
        &self.positions
    }

    pub fn velocities(&self) -> &[V] {
        &self.velocities
    }

    pub fn masses(&self) -> &[f32] {
        &self.masses
    }

    pub fn colors(&self) -> &[Vec3] {
        &self.colors
    }

    /// Mutable view used by the integrator: positions, velocities, forces, masses
    pub(crate) fn state_mut(&mut self) -> (&mut [V], &mut [V], &mut [V], &[f32]) {
        (
            self.positions.as_mut_slice(),
            self.velocities.as_mut_slice(),
            self.forces.as_mut_slice(),
            self.masses.as_slice(),
        )
    }

    fn checked(&self, i: usize) -> usize {
        assert!(
            i < self.masses.len(),
            "particle index {} out of range (size = {})",
            i,
            self.masses.len()
        );
        i
    }
}
