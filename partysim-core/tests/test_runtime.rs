//! End-to-end tests of the stock scenes

use glam::Vec3;
use partysim_core::config::SceneConfig;
use partysim_core::error::{ConfigError, SimError};
use partysim_core::runtime::{
    build_simulation_context, get_particle_states, run_scene, step_simulation, Scene, SceneKind,
};
use std::path::Path;

const DT: f32 = 1.0 / 30.0;

#[test]
fn test_scene_kind_parsing() {
    assert_eq!("flag".parse::<SceneKind>(), Ok(SceneKind::Flag));
    assert_eq!("fall".parse::<SceneKind>(), Ok(SceneKind::Fall));
    assert_eq!("swarm".parse::<SceneKind>(), Ok(SceneKind::Swarm));
    assert!("cloth".parse::<SceneKind>().is_err());
    assert_eq!(SceneKind::Swarm.to_string(), "swarm");
}

#[test]
fn test_flag_run_is_deterministic() {
    let config = SceneConfig::default();
    let a = run_scene(SceneKind::Flag, &config, 50, DT).unwrap();
    let b = run_scene(SceneKind::Flag, &config, 50, DT).unwrap();

    assert!(a.finite);
    assert_eq!(a.steps, 50);
    assert_eq!(a.particle_count, 32 * 16);
    assert_eq!(a.centroid, b.centroid);
    assert_eq!(a.max_speed, b.max_speed);
    assert!(a.max_speed > 0.0);
}

#[test]
fn test_different_seeds_blow_differently() {
    let config = SceneConfig::default();
    let other = SceneConfig {
        seed: 7,
        ..SceneConfig::default()
    };
    let a = run_scene(SceneKind::Flag, &config, 20, DT).unwrap();
    let b = run_scene(SceneKind::Flag, &other, 20, DT).unwrap();
    assert_ne!(a.centroid, b.centroid);
}

#[test]
fn test_non_positive_dt_frames_are_skipped() {
    let mut ctx = build_simulation_context(SceneKind::Flag, &SceneConfig::default()).unwrap();
    let before: Vec<Vec3> = get_particle_states(&ctx).iter().map(|s| s.position).collect();

    step_simulation(&mut ctx, 0.0);
    step_simulation(&mut ctx, -1.0);

    assert_eq!(ctx.current_step, 0);
    assert_eq!(ctx.time, 0.0);
    let after: Vec<Vec3> = get_particle_states(&ctx).iter().map(|s| s.position).collect();
    assert_eq!(before, after);
}

#[test]
fn test_fall_scene_moves_down() {
    let summary = run_scene(SceneKind::Fall, &SceneConfig::default(), 10, 1.0).unwrap();

    // unit masses under (0, -0.01): y = -0.01 * (1 + 2 + ... + 10)
    assert_eq!(summary.particle_count, 5);
    assert!((summary.centroid.y + 0.55).abs() < 1e-3);
    assert!(summary.centroid.x.abs() < 1e-4);
    assert_eq!(summary.centroid.z, 0.0);
}

#[test]
fn test_swarm_keeps_octree_in_sync() {
    let mut ctx = build_simulation_context(SceneKind::Swarm, &SceneConfig::default()).unwrap();
    assert_eq!(ctx.scene.particle_count(), 129);

    for _ in 0..20 {
        step_simulation(&mut ctx, 1.0);
    }

    let Scene::Swarm(swarm) = &ctx.scene else {
        panic!("expected a swarm scene");
    };
    assert_eq!(swarm.tracked_count(), 129);
    let indexed: usize = swarm.octree.occupied_leaves().iter().map(|l| l.values.len()).sum();
    assert_eq!(indexed, 129);
    for (i, p) in swarm.particles.positions().iter().enumerate() {
        assert!(swarm.octree.get(*p).unwrap().contains(&i));
    }
}

#[test]
fn test_reset_restores_initial_state() {
    let mut ctx = build_simulation_context(SceneKind::Fall, &SceneConfig::default()).unwrap();
    let initial: Vec<Vec3> = get_particle_states(&ctx).iter().map(|s| s.position).collect();
    for _ in 0..5 {
        step_simulation(&mut ctx, DT);
    }

    ctx.scene.reset();

    let reset: Vec<Vec3> = get_particle_states(&ctx).iter().map(|s| s.position).collect();
    assert_eq!(initial, reset);
}

#[test]
fn test_particle_states_match_scene() {
    let ctx = build_simulation_context(SceneKind::Flag, &SceneConfig::default()).unwrap();
    let states = get_particle_states(&ctx);
    assert_eq!(states.len(), ctx.scene.particle_count());
    assert!(states.iter().all(|s| s.mass > 0.0 && s.color == Vec3::ONE));
}

#[test]
fn test_invalid_config_is_rejected() {
    let mut config = SceneConfig::default();
    config.flag.grid_width = 1;
    let err = build_simulation_context(SceneKind::Flag, &config).unwrap_err();
    assert!(matches!(err, SimError::Config(ConfigError::Invalid(_))));
}

#[test]
fn test_missing_config_file() {
    let err = SceneConfig::load(Path::new("/nonexistent/partysim.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
}
