//! Tests for the semi-implicit Euler step

use glam::Vec2;
use partysim_core::forces::Force;
use partysim_core::integrator::leapfrog_step;
use partysim_core::particles::ParticleManager2D;
use partysim_core::tests::test_helpers::{approx_eq_vec2, particles_at, total_momentum};

#[test]
fn test_free_particle_keeps_velocity() {
    let mut pm = particles_at(&[Vec2::ZERO]);
    pm.set_velocity(Vec2::new(1.0, 0.0), 0);

    for _ in 0..100 {
        leapfrog_step(&mut pm, 0.1);
    }

    assert_eq!(pm.get_velocity(0), Vec2::new(1.0, 0.0));
    assert!(approx_eq_vec2(pm.get_position(0), Vec2::new(10.0, 0.0), 1e-3));
}

#[test]
fn test_velocity_is_updated_before_position() {
    let mut pm = ParticleManager2D::new();
    pm.add_particle(Vec2::ZERO, Vec2::ZERO, Vec2::new(4.0, 0.0), glam::Vec3::ONE, 2.0);

    leapfrog_step(&mut pm, 0.5);

    // v = 4 / 2 * 0.5 = 1, then x = 1 * 0.5 (explicit Euler would leave x at 0)
    assert!(approx_eq_vec2(pm.get_velocity(0), Vec2::new(1.0, 0.0), 1e-6));
    assert!(approx_eq_vec2(pm.get_position(0), Vec2::new(0.5, 0.0), 1e-6));
    assert_eq!(pm.get_force(0), Vec2::ZERO, "Forces should be cleared after the step");
}

#[test]
fn test_non_positive_dt_only_discards_forces() {
    for dt in [0.0, -0.1] {
        let mut pm = particles_at(&[Vec2::new(1.0, 1.0)]);
        pm.set_velocity(Vec2::new(0.0, 2.0), 0);
        pm.add_force(Vec2::new(5.0, 5.0), 0);

        leapfrog_step(&mut pm, dt);

        assert_eq!(pm.get_position(0), Vec2::new(1.0, 1.0));
        assert_eq!(pm.get_velocity(0), Vec2::new(0.0, 2.0));
        assert_eq!(pm.get_force(0), Vec2::ZERO);
    }
}

#[test]
fn test_stretched_spring_pulls_pair_together() {
    let mut pm = particles_at(&[Vec2::new(-1.0, 0.0), Vec2::new(1.0, 0.0)]);
    let spring = Force::Spring {
        a: 0,
        b: 1,
        stiffness: 1.0,
        rest_length: 1.0,
    };

    spring.apply(&mut pm);
    leapfrog_step(&mut pm, 0.01);

    // f = (2, 0) * (1 - 1/2) = (1, 0) on the left particle
    assert!(approx_eq_vec2(pm.get_velocity(0), Vec2::new(0.01, 0.0), 1e-6));
    assert!(approx_eq_vec2(pm.get_velocity(1), Vec2::new(-0.01, 0.0), 1e-6));
    assert!(approx_eq_vec2(pm.get_position(0), Vec2::new(-0.9999, 0.0), 1e-6));
    assert!(approx_eq_vec2(pm.get_position(1), Vec2::new(0.9999, 0.0), 1e-6));
    assert!(total_momentum(&pm).length() < 1e-6);
}

#[test]
fn test_spring_pair_conserves_momentum_over_time() {
    let mut pm = particles_at(&[Vec2::new(-1.0, 0.2), Vec2::new(1.0, -0.3)]);
    let spring = Force::Spring {
        a: 0,
        b: 1,
        stiffness: 2.0,
        rest_length: 1.0,
    };

    for _ in 0..500 {
        spring.apply(&mut pm);
        leapfrog_step(&mut pm, 0.01);
    }

    assert!(pm.is_finite());
    assert!(total_momentum(&pm).length() < 1e-4);
}

#[test]
fn test_zero_mass_diverges_without_panicking() {
    let mut pm = ParticleManager2D::new();
    pm.add_particle(Vec2::ZERO, Vec2::ZERO, Vec2::new(1.0, 0.0), glam::Vec3::ONE, 0.0);

    leapfrog_step(&mut pm, 0.1);

    assert!(!pm.is_finite());
}
