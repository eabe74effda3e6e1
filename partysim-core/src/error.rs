//! Error types of the simulation core
//!
//! Numerical blow-ups are not errors: a diverging simulation keeps running
//! with non-finite state, see `ParticleManager::is_finite`.

use glam::Vec3;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OctreeError {
    #[error("position {position} is outside octree node (center = {center}, dimension = {dimension})")]
    OutOfBounds {
        position: Vec3,
        center: Vec3,
        dimension: Vec3,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid scene file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid scene config: {0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
pub enum SimError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Octree(#[from] OctreeError),
}
