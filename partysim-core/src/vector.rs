//! Vector abstraction shared by the 2D and 3D particle code
//!
//! The particle store, the forces and the integrator only need a handful of
//! operations, so they are written against [`SimVector`] and instantiated with
//! `glam::Vec2` or `glam::Vec3`.

use glam::{Vec2, Vec3};
use rand::Rng;
use std::f32::consts::TAU;
use std::fmt::Debug;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

/// Float vector usable as particle position, velocity and force
pub trait SimVector:
    Copy
    + Debug
    + PartialEq
    + Add<Output = Self>
    + AddAssign
    + Sub<Output = Self>
    + SubAssign
    + Mul<f32, Output = Self>
    + Div<f32, Output = Self>
    + Neg<Output = Self>
    + 'static
{
    const ZERO: Self;

    fn length(self) -> f32;

    fn normalize(self) -> Self;

    /// Unit vector, or zero when the input has no usable direction
    fn normalize_or_zero(self) -> Self;

    fn is_finite(self) -> bool;

    /// Point at `angle` radians on a circle of `radius` centered at the origin
    fn on_circle(radius: f32, angle: f32) -> Self;

    /// Random displacement of magnitude at most `radius`
    fn random_offset<R: Rng + ?Sized>(rng: &mut R, radius: f32) -> Self;

    /// Lift to 3D for renderers (2D vectors land on the z = 0 plane)
    fn to_vec3(self) -> Vec3;

    fn distance(self, other: Self) -> f32 {
        (self - other).length()
    }
}

impl SimVector for Vec2 {
    const ZERO: Self = Vec2::ZERO;

    fn length(self) -> f32 {
        Vec2::length(self)
    }

    fn normalize(self) -> Self {
        Vec2::normalize(self)
    }

    fn normalize_or_zero(self) -> Self {
        Vec2::normalize_or_zero(self)
    }

    fn is_finite(self) -> bool {
        Vec2::is_finite(self)
    }

    fn on_circle(radius: f32, angle: f32) -> Self {
        Vec2::new(radius * angle.cos(), radius * angle.sin())
    }

    fn random_offset<R: Rng + ?Sized>(rng: &mut R, radius: f32) -> Self {
        disk_rand(rng, radius)
    }

    fn to_vec3(self) -> Vec3 {
        self.extend(0.0)
    }
}

impl SimVector for Vec3 {
    const ZERO: Self = Vec3::ZERO;

    fn length(self) -> f32 {
        Vec3::length(self)
    }

    fn normalize(self) -> Self {
        Vec3::normalize(self)
    }

    fn normalize_or_zero(self) -> Self {
        Vec3::normalize_or_zero(self)
    }

    fn is_finite(self) -> bool {
        Vec3::is_finite(self)
    }

    // circles in 3D scenes lie on the horizontal XZ plane
    fn on_circle(radius: f32, angle: f32) -> Self {
        Vec3::new(radius * angle.cos(), 0.0, radius * angle.sin())
    }

    fn random_offset<R: Rng + ?Sized>(rng: &mut R, radius: f32) -> Self {
        spherical_rand(rng, radius)
    }

    fn to_vec3(self) -> Vec3 {
        self
    }
}

/// Uniformly distributed point on the surface of a sphere of `radius`
pub fn spherical_rand<R: Rng + ?Sized>(rng: &mut R, radius: f32) -> Vec3 {
    if radius <= 0.0 {
        return Vec3::ZERO;
    }
    let z: f32 = rng.gen_range(-1.0..=1.0);
    let theta: f32 = rng.gen_range(0.0..TAU);
    let ring = (1.0 - z * z).max(0.0).sqrt();
    Vec3::new(ring * theta.cos(), ring * theta.sin(), z) * radius
}

/// Uniformly distributed point inside a disk of `radius`
pub fn disk_rand<R: Rng + ?Sized>(rng: &mut R, radius: f32) -> Vec2 {
    if radius <= 0.0 {
        return Vec2::ZERO;
    }
    let r = radius * rng.gen::<f32>().sqrt();
    let theta: f32 = rng.gen_range(0.0..TAU);
    Vec2::new(r * theta.cos(), r * theta.sin())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn spherical_rand_lands_on_the_surface() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let p = spherical_rand(&mut rng, 0.04);
            assert!((p.length() - 0.04).abs() < 1e-5);
        }
    }

    #[test]
    fn disk_rand_stays_inside_the_disk() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            assert!(disk_rand(&mut rng, 2.0).length() <= 2.0 + 1e-5);
        }
    }

    #[test]
    fn circle_planes() {
        let p2 = <Vec2 as SimVector>::on_circle(2.0, 0.0);
        let p3 = <Vec3 as SimVector>::on_circle(2.0, std::f32::consts::FRAC_PI_2);
        assert_eq!(p2, Vec2::new(2.0, 0.0));
        assert!(p3.x.abs() < 1e-6 && p3.y == 0.0 && (p3.z - 2.0).abs() < 1e-6);
    }
}
