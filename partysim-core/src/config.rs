//! Scene configuration loaded from TOML
//!
//! Every section is optional; missing values fall back to the defaults below,
//! so an empty file describes the stock scenes.
//!
//! ```toml
//! seed = 42
//!
//! [flag]
//! particle_mass = 1.0
//! width = 2.0
//! height = 1.5
//! grid_width = 32
//! grid_height = 16
//! gravity = [0.0, -0.08, 0.0]
//! wind = 0.04
//! collision_multiplier = 0.01
//!
//! [flag.springs.structural]
//! stiffness = 1.0
//! damping = 0.08
//!
//! [[flag.spheres]]
//! center = [0.0, 0.0, 0.0]
//! radius = 0.5
//!
//! [fall]
//! count = 5
//! radius = 0.5
//! force = [0.0, -0.01]
//!
//! [swarm]
//! count = 128
//! radius = 0.5
//! move_scale = 0.01
//! octree_depth = 4
//! octree_dimension = 4.0
//! ```

use crate::error::ConfigError;
use crate::flag::{FlagLayout, Sphere, SpringCoefficients};
use glam::{Vec2, Vec3};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub seed: u64,
    pub flag: FlagConfig,
    pub fall: FallConfig,
    pub swarm: SwarmConfig,
}

/// Cloth scene: grid layout, spring coefficients and the forces driving it
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FlagConfig {
    pub particle_mass: f32,
    pub width: f32,
    pub height: f32,
    pub grid_width: usize,
    pub grid_height: usize,
    pub gravity: Vec3,
    /// Magnitude of the random wind gust applied every tick
    pub wind: f32,
    pub collision_multiplier: f32,
    pub springs: SpringCoefficients,
    pub spheres: Vec<Sphere>,
}

/// Circle of particles falling under a constant force
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FallConfig {
    pub count: u32,
    pub radius: f32,
    pub force: Vec2,
}

/// 3D random walk indexed by an octree
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SwarmConfig {
    pub count: u32,
    pub radius: f32,
    pub move_scale: f32,
    pub octree_depth: u32,
    pub octree_dimension: f32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            flag: FlagConfig::default(),
            fall: FallConfig::default(),
            swarm: SwarmConfig::default(),
        }
    }
}

impl Default for FlagConfig {
    fn default() -> Self {
        Self {
            particle_mass: 1.0,
            width: 2.0,
            height: 1.5,
            grid_width: 32,
            grid_height: 16,
            gravity: Vec3::new(0.0, -0.08, 0.0),
            wind: 0.04,
            collision_multiplier: 0.01,
            springs: SpringCoefficients::default(),
            spheres: vec![Sphere {
                center: Vec3::ZERO,
                radius: 0.5,
            }],
        }
    }
}

impl Default for FallConfig {
    fn default() -> Self {
        Self {
            count: 5,
            radius: 0.5,
            force: Vec2::new(0.0, -0.01),
        }
    }
}

impl Default for SwarmConfig {
    fn default() -> Self {
        Self {
            count: 128,
            radius: 0.5,
            move_scale: 0.01,
            octree_depth: 4,
            octree_dimension: 4.0,
        }
    }
}

impl FlagConfig {
    pub fn layout(&self) -> FlagLayout {
        FlagLayout {
            particle_mass: self.particle_mass,
            width: self.width,
            height: self.height,
            grid_width: self.grid_width,
            grid_height: self.grid_height,
        }
    }
}

impl SceneConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: SceneConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Reject layouts the engine cannot build
    ///
    /// Tuning values such as stiffness or damping are accepted as-is.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.flag.grid_width < 2 || self.flag.grid_height < 2 {
            return Err(ConfigError::Invalid(format!(
                "flag grid must be at least 2x2, got {}x{}",
                self.flag.grid_width, self.flag.grid_height
            )));
        }
        if self.flag.particle_mass <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "flag particle mass must be positive, got {}",
                self.flag.particle_mass
            )));
        }
        if self.swarm.octree_dimension <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "octree dimension must be positive, got {}",
                self.swarm.octree_dimension
            )));
        }
        Ok(())
    }
}
