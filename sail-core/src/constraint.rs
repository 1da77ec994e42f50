use crate::{
    config::{ConstraintOptions, LENGTH_EPSILON},
    particle::Particle,
    types::ParticleId,
};

/// Which family of edges a constraint was derived from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConstraintKind {
    /// An edge of an input face.
    Structural,
    /// A diagonal of an input quad.
    Shear,
}

/// A distance constraint pulling two particles toward a rest length.
///
/// The particles are referenced by index into the owning body's particle
/// list. `current_length` is refreshed on every [`DistanceConstraint::relax`]
/// call and feeds [`DistanceConstraint::stretch_amount`].
#[derive(Clone, Debug, PartialEq)]
pub struct DistanceConstraint {
    pub a: ParticleId,
    pub b: ParticleId,
    pub kind: ConstraintKind,
    rest_length: f32,
    current_length: f32,
    pub stretch_factor: f32,
    pub shrink_factor: f32,
}

impl DistanceConstraint {
    /// Creates a constraint between `a` and `b`.
    ///
    /// When `opts.rest_length` is `None` the rest length is the distance
    /// between the two particles right now.
    ///
    /// ### Panics
    /// Panics if `a` or `b` is out of bounds for `particles`.
    pub fn new(
        a: ParticleId,
        b: ParticleId,
        kind: ConstraintKind,
        opts: &ConstraintOptions,
        particles: &[Particle],
    ) -> Self {
        let current_length = particles[a].pos.distance(particles[b].pos);
        Self {
            a,
            b,
            kind,
            rest_length: opts.rest_length.unwrap_or(current_length),
            current_length,
            stretch_factor: opts.stretch_factor,
            shrink_factor: opts.shrink_factor,
        }
    }

    #[inline]
    pub fn rest_length(&self) -> f32 {
        self.rest_length
    }

    /// Replaces the rest length. Only reachable through
    /// [`crate::cloth::ClothBody::set_rest_length`].
    pub(crate) fn set_rest_length(&mut self, rest_length: f32) {
        self.rest_length = rest_length;
    }

    /// Length measured by the most recent relaxation pass.
    #[inline]
    pub fn current_length(&self) -> f32 {
        self.current_length
    }

    /// `current_length - rest_length`: positive when stretched, negative when
    /// compressed, zero at rest.
    #[inline]
    pub fn stretch_amount(&self) -> f32 {
        self.current_length - self.rest_length
    }

    #[inline]
    pub fn endpoints(&self) -> [ParticleId; 2] {
        [self.a, self.b]
    }

    /// Runs a single correction pass on this constraint.
    ///
    /// Both endpoints are pushed toward the rest length by
    /// `delta * (1 - rest / current) * factor`, where `factor` is the stretch
    /// or shrink factor depending on the sign of the violation. The factor is
    /// doubled when either endpoint is anchored so the free endpoint absorbs
    /// the whole correction. Lengths below [`LENGTH_EPSILON`] are skipped.
    pub fn relax(&mut self, particles: &mut [Particle]) {
        let delta = particles[self.b].pos - particles[self.a].pos;
        self.current_length = delta.length();
        if self.current_length < LENGTH_EPSILON {
            tracing::trace!(a = self.a, b = self.b, "skipping zero-length constraint");
            return;
        }

        let correction_factor = 1.0 - self.rest_length / self.current_length;
        let correction = delta * correction_factor;

        let mut factor = if correction_factor > 0.0 {
            self.stretch_factor
        } else {
            self.shrink_factor
        };
        if particles[self.a].anchored || particles[self.b].anchored {
            factor *= 2.0;
        }

        particles[self.a].displace(correction * factor);
        particles[self.b].displace(correction * -factor);
    }
}
