use crate::particles::ParticleManager;
use crate::vector::SimVector;

/// Step the particle set forward by dt using semi-implicit Euler integration
///
/// Velocities are updated from the accumulated forces first, positions from the
/// new velocities second, and the force accumulators are cleared last. With
/// `dt <= 0` nothing moves, but the accumulated forces are still discarded.
pub fn leapfrog_step<V: SimVector>(pm: &mut ParticleManager<V>, dt: f32) {
    if dt <= 0.0 {
        pm.reset_forces();
        return;
    }

    let (positions, velocities, forces, masses) = pm.state_mut();
    for i in 0..masses.len() {
        // v += dt * f / m, then x += dt * v
        velocities[i] += forces[i] / masses[i] * dt;
        positions[i] += velocities[i] * dt;
        forces[i] = V::ZERO;
    }
}
