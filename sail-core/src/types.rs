/// Identifier for a particle in a [`crate::cloth::ClothBody`].
///
/// This is an index into the body's particle list and matches the order of
/// the input vertex buffer. It is only meaningful within the lifetime of the
/// body that produced it.
pub type ParticleId = usize;

/// Identifier for a distance constraint in a [`crate::cloth::ClothBody`].
pub type ConstraintId = usize;
