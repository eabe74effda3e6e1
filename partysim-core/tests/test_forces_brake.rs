//! Tests for the brake, constant and sphere repulsion forces

use glam::{Vec2, Vec3};
use partysim_core::forces::{brake_force, sphere_collision_force, Force, ForceSet};
use partysim_core::tests::test_helpers::{approx_eq_vec2, approx_eq_vec3, particles_at};

#[test]
fn test_brake_force_follows_relative_velocity() {
    // V * (v2 - v1) / dt = 0.5 * (1, 0) / 0.1
    let f = brake_force(0.5, 0.1, Vec2::ZERO, Vec2::new(1.0, 0.0));
    assert!(approx_eq_vec2(f, Vec2::new(5.0, 0.0), 1e-4));
}

#[test]
fn test_brake_force_scales_inversely_with_dt() {
    let v1 = Vec3::new(0.0, 1.0, 0.0);
    let v2 = Vec3::new(0.5, 0.0, 0.0);
    let coarse = brake_force(0.1, 0.02, v1, v2);
    let fine = brake_force(0.1, 0.01, v1, v2);
    assert!(approx_eq_vec3(fine, coarse * 2.0, 1e-4));
}

#[test]
fn test_brake_force_zero_dt_is_not_finite() {
    let f = brake_force(0.1, 0.0, Vec2::ZERO, Vec2::new(1.0, 0.0));
    assert!(!f.is_finite());
}

#[test]
fn test_brake_source_applies_equal_and_opposite() {
    let mut pm = particles_at(&[Vec2::ZERO, Vec2::new(1.0, 0.0)]);
    pm.set_velocity(Vec2::new(0.0, 2.0), 1);
    Force::Brake {
        a: 0,
        b: 1,
        damping: 0.1,
        dt: 0.5,
    }
    .apply(&mut pm);

    assert!(approx_eq_vec2(pm.get_force(0), Vec2::new(0.0, 0.4), 1e-5));
    assert!(approx_eq_vec2(pm.get_force(1), Vec2::new(0.0, -0.4), 1e-5));
}

#[test]
fn test_sphere_collision_force_points_outward() {
    let center = Vec3::ZERO;
    let p = Vec3::new(0.3, 0.0, 0.0);
    let f = sphere_collision_force(0.3, center, p);
    assert!(approx_eq_vec3(f, Vec3::new(1.0 / 1.3, 0.0, 0.0), 1e-5));
}

#[test]
fn test_sphere_collision_force_at_center_is_zero() {
    let f = sphere_collision_force(0.0, Vec3::ONE, Vec3::ONE);
    assert_eq!(f, Vec3::ZERO);
}

#[test]
fn test_sphere_repulsion_only_touches_overlapping_particles() {
    let mut pm = particles_at(&[Vec3::new(0.2, 0.0, 0.0), Vec3::new(2.0, 0.0, 0.0)]);
    Force::SphereRepulsion {
        center: Vec3::ZERO,
        radius: 0.5,
        multiplier: 2.0,
    }
    .apply(&mut pm);

    assert!(approx_eq_vec3(pm.get_force(0), Vec3::new(2.0 / 1.2, 0.0, 0.0), 1e-5));
    assert_eq!(pm.get_force(1), Vec3::ZERO);
}

#[test]
fn test_force_set_accumulates_in_order() {
    let mut pm = particles_at(&[Vec2::ZERO, Vec2::new(1.0, 1.0)]);
    let forces = ForceSet::new()
        .with(Force::Constant(Vec2::new(0.0, -0.01)))
        .with(Force::Constant(Vec2::new(0.5, 0.0)));
    forces.apply(&mut pm);
    forces.apply(&mut pm);

    for i in 0..pm.size() {
        assert!(approx_eq_vec2(pm.get_force(i), Vec2::new(1.0, -0.02), 1e-6));
    }
    assert_eq!(forces.forces().len(), 2);
}
