//! Mass-spring cloth ("flag")
//!
//! A `grid_width × grid_height` grid of particles, particle `(i, j)` stored at
//! index `i + j * grid_width`. Three spring families connect each particle to
//! its neighbours:
//!
//! - structural: the 4 axis-aligned neighbours one cell away
//! - shear: the 4 diagonal neighbours
//! - bend: the 4 axis-aligned neighbours two cells away
//!
//! Column 0 is pinned: it never receives internal, external or collision
//! forces, so it stays where it was built.

use crate::forces::{brake_force, hook_force, sphere_collision_force};
use crate::integrator::leapfrog_step;
use crate::particles::ParticleManager3D;
use crate::vector::SimVector;
use glam::{Vec2, Vec3};
use serde::Deserialize;

const STRUCTURAL_NEIGHBORS: [(i64, i64); 4] = [(1, 0), (-1, 0), (0, -1), (0, 1)];
const SHEAR_NEIGHBORS: [(i64, i64); 4] = [(-1, -1), (1, -1), (1, 1), (-1, 1)];
const BEND_NEIGHBORS: [(i64, i64); 4] = [(-2, 0), (2, 0), (0, -2), (0, 2)];

/// Construction parameters of a flag
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlagLayout {
    /// Mass of a particle on the pinned column
    pub particle_mass: f32,
    pub width: f32,
    pub height: f32,
    pub grid_width: usize,
    pub grid_height: usize,
}

/// Stiffness and damping of one spring family
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Spring {
    pub stiffness: f32,
    pub damping: f32,
}

/// Live-tunable coefficients of the three spring families
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct SpringCoefficients {
    pub structural: Spring,
    pub shear: Spring,
    pub bend: Spring,
}

impl Default for SpringCoefficients {
    fn default() -> Self {
        Self {
            structural: Spring {
                stiffness: 1.0,
                damping: 0.08,
            },
            shear: Spring {
                stiffness: 1.3,
                damping: 0.02,
            },
            bend: Spring {
                stiffness: 0.8,
                damping: 0.06,
            },
        }
    }
}

/// Collision sphere
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
}

#[derive(Debug, Clone)]
pub struct Flag {
    layout: FlagLayout,
    particles: ParticleManager3D,
    /// Rest lengths of horizontal (x) and vertical (y) structural springs
    pub structural_rest: Vec2,
    pub shear_rest: f32,
    pub bend_rest: Vec2,
    pub springs: SpringCoefficients,
}

impl Flag {
    /// Build a `width × height` flag centered on the origin
    ///
    /// Particle masses start at `particle_mass` on the pinned column and shrink
    /// slightly toward the free edge. The grid size does not change them.
    ///
    /// # Panics
    /// If the grid is smaller than 2 × 2.
    pub fn new(layout: FlagLayout) -> Self {
        let FlagLayout {
            particle_mass,
            width,
            height,
            grid_width,
            grid_height,
        } = layout;
        assert!(
            grid_width >= 2 && grid_height >= 2,
            "flag grid must be at least 2x2, got {}x{}",
            grid_width,
            grid_height
        );

        let count = grid_width * grid_height;
        let origin = Vec3::new(-0.5 * width, -0.5 * height, 0.0);
        let scale = Vec3::new(
            width / (grid_width - 1) as f32,
            height / (grid_height - 1) as f32,
            1.0,
        );

        let mut particles = ParticleManager3D::new();
        for j in 0..grid_height {
            for i in 0..grid_width {
                let position = origin + Vec3::new(i as f32, j as f32, 0.0) * scale;
                // slightly lighter toward the free edge
                let mass = particle_mass * (1.0 - i as f32 / (2 * count) as f32);
                particles.add_particle(position, Vec3::ZERO, Vec3::ZERO, Vec3::ONE, mass);
            }
        }

        let structural_rest = Vec2::new(scale.x, scale.y);
        Self {
            layout,
            particles,
            structural_rest,
            shear_rest: structural_rest.length(),
            bend_rest: 2.0 * structural_rest,
            springs: SpringCoefficients::default(),
        }
    }

    /// Rebuild the grid from its layout, keeping the current spring coefficients
    pub fn reset(&mut self) {
        let springs = self.springs;
        *self = Flag::new(self.layout);
        self.springs = springs;
        log::info!(
            "flag reset ({}x{} grid)",
            self.layout.grid_width,
            self.layout.grid_height
        );
    }

    pub fn layout(&self) -> FlagLayout {
        self.layout
    }

    pub fn grid_width(&self) -> usize {
        self.layout.grid_width
    }

    pub fn grid_height(&self) -> usize {
        self.layout.grid_height
    }

    pub fn index(&self, i: usize, j: usize) -> usize {
        i + j * self.layout.grid_width
    }

    pub fn is_pinned(&self, k: usize) -> bool {
        k % self.layout.grid_width == 0
    }

    pub fn particles(&self) -> &ParticleManager3D {
        &self.particles
    }

    pub fn particles_mut(&mut self) -> &mut ParticleManager3D {
        &mut self.particles
    }

    pub fn positions(&self) -> &[Vec3] {
        self.particles.positions()
    }

    /// Accumulate spring and brake forces of all three families on every free particle
    pub fn apply_internal_forces(&mut self, dt: f32) {
        if dt <= 0.0 {
            return;
        }
        let SpringCoefficients {
            structural,
            shear,
            bend,
        } = self.springs;
        let shear_rest = Vec2::splat(self.shear_rest);

        for j in 0..self.layout.grid_height {
            for i in 1..self.layout.grid_width {
                let k = self.index(i, j);
                let mut f = Vec3::ZERO;
                f += self.family_force(i, j, &STRUCTURAL_NEIGHBORS, structural, self.structural_rest, dt);
                f += self.family_force(i, j, &SHEAR_NEIGHBORS, shear, shear_rest, dt);
                f += self.family_force(i, j, &BEND_NEIGHBORS, bend, self.bend_rest, dt);
                self.particles.add_force(f, k);
            }
        }
    }

    /// Force on cell `(i, j)` from one neighbour family; out-of-grid neighbours are skipped
    fn family_force(
        &self,
        i: usize,
        j: usize,
        offsets: &[(i64, i64)],
        spring: Spring,
        rest: Vec2,
        dt: f32,
    ) -> Vec3 {
        let k = self.index(i, j);
        let position = self.particles.get_position(k);
        let velocity = self.particles.get_velocity(k);

        let mut f = Vec3::ZERO;
        for &(di, dj) in offsets {
            let ni = i as i64 + di;
            let nj = j as i64 + dj;
            if ni < 0 || nj < 0 || ni >= self.layout.grid_width as i64 || nj >= self.layout.grid_height as i64 {
                continue;
            }
            let n = self.index(ni as usize, nj as usize);
            let rest_length = if dj == 0 { rest.x } else { rest.y };
            f += hook_force(spring.stiffness, rest_length, position, self.particles.get_position(n));
            f += brake_force(spring.damping, dt, velocity, self.particles.get_velocity(n));
        }
        f
    }

    /// Add `force` to every particle outside the pinned column
    pub fn apply_external_force(&mut self, force: Vec3) {
        for k in 0..self.particles.size() {
            if self.is_pinned(k) {
                continue;
            }
            self.particles.add_force(force, k);
        }
    }

    /// Push free particles out of every sphere they overlap
    pub fn apply_sphere_collision(&mut self, spheres: &[Sphere], multiplier: f32) {
        for k in 0..self.particles.size() {
            if self.is_pinned(k) {
                continue;
            }
            let position = self.particles.get_position(k);
            for sphere in spheres {
                let d = position.distance(sphere.center);
                if d < sphere.radius {
                    let f = sphere_collision_force(d, sphere.center, position) * multiplier;
                    self.particles.add_force(f, k);
                }
            }
        }
    }

    /// Integrate all particles and clear their forces
    pub fn update(&mut self, dt: f32) {
        leapfrog_step(&mut self.particles, dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_layout() -> FlagLayout {
        FlagLayout {
            particle_mass: 2.0,
            width: 2.0,
            height: 1.0,
            grid_width: 3,
            grid_height: 2,
        }
    }

    #[test]
    fn grid_is_centered_on_origin() {
        let flag = Flag::new(small_layout());
        assert_eq!(flag.positions()[0], Vec3::new(-1.0, -0.5, 0.0));
        assert_eq!(flag.positions()[flag.index(2, 1)], Vec3::new(1.0, 0.5, 0.0));
    }

    #[test]
    fn masses_shrink_toward_free_edge() {
        let flag = Flag::new(small_layout());
        let pm = flag.particles();
        assert_eq!(pm.get_mass(0), 2.0);
        assert!(pm.get_mass(2) < pm.get_mass(1));
        assert!(pm.masses().iter().all(|m| *m > 0.0));
    }

    #[test]
    #[should_panic(expected = "at least 2x2")]
    fn degenerate_grid_panics() {
        Flag::new(FlagLayout {
            grid_height: 1,
            ..small_layout()
        });
    }
}
