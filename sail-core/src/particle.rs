use crate::config::{DEFAULT_PARTICLE_MASS, VELOCITY_DAMPING};
use glam::Vec3;

/// A point mass in the cloth, advanced with a Verlet scheme.
///
/// Velocity is never stored: it is the difference between `pos` and
/// `prev_pos`. Forces are summed into `force` during a frame and consumed
/// (then cleared) by [`Particle::integrate`].
///
/// An anchored particle never changes `pos` or `prev_pos`.
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub pos: Vec3,
    pub prev_pos: Vec3,
    pub force: Vec3,
    pub mass: f32,
    pub anchored: bool,
}

impl Particle {
    pub fn new(pos: Vec3, anchored: bool) -> Self {
        Self::with_mass(pos, DEFAULT_PARTICLE_MASS, anchored)
    }

    pub fn with_mass(pos: Vec3, mass: f32, anchored: bool) -> Self {
        Self {
            pos,
            prev_pos: pos,
            force: Vec3::ZERO,
            mass,
            anchored,
        }
    }

    /// Displacement over the last integration step.
    #[inline]
    pub fn velocity(&self) -> Vec3 {
        self.pos - self.prev_pos
    }

    /// Advances the particle by one step using the default damping.
    pub fn integrate(&mut self, dt: f32) {
        self.integrate_damped(dt, VELOCITY_DAMPING);
    }

    /// Advances the particle by one step.
    ///
    /// `next = pos + velocity * damping + force * dt`; the previous position
    /// becomes the pre-step position and the force accumulator is cleared.
    /// Anchored particles keep their positions and only drop the force.
    ///
    /// ### Parameters
    /// - `dt` - Step length in seconds.
    /// - `damping` - Fraction of the implicit velocity carried over.
    pub fn integrate_damped(&mut self, dt: f32, damping: f32) {
        if self.anchored {
            self.force = Vec3::ZERO;
            return;
        }
        let next = self.pos + self.velocity() * damping + self.force * dt;
        self.prev_pos = self.pos;
        self.pos = next;
        self.force = Vec3::ZERO;
    }

    /// Adds `f * mass` to the force accumulator.
    ///
    /// The contribution is scaled by the mass, not divided by it.
    #[inline]
    pub fn apply_force(&mut self, f: Vec3) {
        self.force += f * self.mass;
    }

    /// Adds `a * dt` to the force accumulator, independent of mass.
    #[inline]
    pub fn apply_acceleration(&mut self, a: Vec3, dt: f32) {
        self.force += a * dt;
    }

    /// Moves a free particle by `offset`. Used by constraint relaxation.
    #[inline]
    pub fn displace(&mut self, offset: Vec3) {
        if self.anchored {
            return;
        }
        self.pos += offset;
    }
}
