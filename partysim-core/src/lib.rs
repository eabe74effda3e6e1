pub mod config;
pub mod error;
pub mod flag;
pub mod forces;
pub mod integrator;
pub mod octree;
pub mod particles;
pub mod polygon;
pub mod runtime;
pub mod vector;

pub use config::{FallConfig, FlagConfig, SceneConfig, SwarmConfig};
pub use error::{ConfigError, OctreeError, SimError};
pub use flag::{Flag, FlagLayout, Sphere, Spring, SpringCoefficients};
pub use forces::{brake_force, hook_force, sphere_collision_force, Force, ForceSet};
pub use integrator::leapfrog_step;
pub use octree::{LeafView, NodeId, Octree};
pub use particles::{ParticleManager, ParticleManager2D, ParticleManager3D};
pub use polygon::Polygon2D;
pub use runtime::{
    build_simulation_context, get_particle_states, run_scene, step_simulation, ParticleState,
    Scene, SceneKind, SimulationContext, SimulationSummary,
};
pub use vector::SimVector;
