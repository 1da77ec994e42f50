//! Per-frame simulation phases for a cloth body.
//!
//! [`crate::cloth::ClothBody::update`] runs them in this order:
//! 1. [`relaxation_phase`] — settle the constraints left over from the
//!    previous frame.
//! 2. [`wind_phase`] — refresh triangle normals and accumulate wind force.
//! 3. [`integration_phase`] — add gravity and advance every particle.
//! 4. [`relaxation_phase`] again — resolve what integration violated.
//!
//! Each phase only touches the slices it is given, so they can also be run
//! one by one from tests.

use crate::{constraint::DistanceConstraint, particle::Particle, triangle::WindTriangle};
use glam::Vec3;

/// Relaxes every constraint, in order, `iterations` times.
///
/// Corrections are applied in place, so later constraints in a pass see the
/// positions already moved by earlier ones.
pub fn relaxation_phase(
    constraints: &mut [DistanceConstraint],
    particles: &mut [Particle],
    iterations: usize,
) {
    for _ in 0..iterations {
        for c in constraints.iter_mut() {
            c.relax(particles);
        }
    }
}

/// Updates each triangle's normal, then applies `wind` through it.
pub fn wind_phase(triangles: &mut [WindTriangle], particles: &mut [Particle], wind: Vec3) {
    for tri in triangles.iter_mut() {
        tri.update_normal(particles);
        tri.apply_wind(wind, particles);
    }
}

/// Applies `gravity` as an acceleration and integrates every particle.
pub fn integration_phase(particles: &mut [Particle], gravity: Vec3, damping: f32, dt: f32) {
    for p in particles.iter_mut() {
        p.apply_acceleration(gravity, dt);
        p.integrate_damped(dt, damping);
    }
}
