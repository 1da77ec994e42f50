//! Named simulation constants and construction options.

use glam::Vec3;

/// Downward acceleration applied to every particle each frame.
pub const GRAVITY: Vec3 = Vec3::new(0.0, -9.81, 0.0);

/// Fraction of the implicit velocity kept by each integration step.
pub const VELOCITY_DAMPING: f32 = 0.99;

/// Relaxation passes run before and after integration in every frame.
pub const CONSTRAINT_ITERATIONS: usize = 32;

/// Mass given to every particle at construction.
pub const DEFAULT_PARTICLE_MASS: f32 = 0.1;

/// Lengths below this are treated as zero (degenerate constraint or wind).
pub const LENGTH_EPSILON: f32 = 1e-6;

/// Global constants used by a [`crate::cloth::ClothBody`].
///
/// Each body keeps its own copy so tests and callers can override any of
/// them without touching the process-wide defaults.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimConstants {
    pub gravity: Vec3,
    pub damping: f32,
    pub iterations: usize,
    pub particle_mass: f32,
}

impl Default for SimConstants {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            damping: VELOCITY_DAMPING,
            iterations: CONSTRAINT_ITERATIONS,
            particle_mass: DEFAULT_PARTICLE_MASS,
        }
    }
}

/// Correction strengths for one family of distance constraints.
///
/// `stretch_factor` is used while the constraint is longer than its rest
/// length, `shrink_factor` while it is shorter. Values are expected to lie
/// roughly in `[0, 1]`. A factor of `0.5` removes the whole violation in one
/// pass; anything above `0.5` overshoots past the rest length.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConstraintOptions {
    pub stretch_factor: f32,
    pub shrink_factor: f32,
    /// Fixed rest length. `None` uses the distance between the two
    /// particles at construction time.
    pub rest_length: Option<f32>,
}

impl ConstraintOptions {
    pub fn new(stretch_factor: f32, shrink_factor: f32) -> Self {
        Self {
            stretch_factor,
            shrink_factor,
            rest_length: None,
        }
    }

    pub fn with_rest_length(mut self, rest_length: f32) -> Self {
        self.rest_length = Some(rest_length);
        self
    }
}

/// Options for building a [`crate::cloth::ClothBody`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClothOptions {
    /// Options for constraints along face edges.
    pub structural: ConstraintOptions,
    /// Options for constraints along quad diagonals.
    pub shear: ConstraintOptions,
    pub constants: SimConstants,
}

impl Default for ClothOptions {
    fn default() -> Self {
        Self {
            structural: ConstraintOptions::new(0.5, 0.5),
            shear: ConstraintOptions::new(0.25, 0.25),
            constants: SimConstants::default(),
        }
    }
}
