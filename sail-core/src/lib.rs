//! Mass-spring cloth simulation for sail fabric.
//!
//! Main components:
//! - [`particle`] — Verlet point masses.
//! - [`constraint`] — distance constraints between particle pairs.
//! - [`triangle`] — triangular faces coupling wind into particles.
//! - [`cloth`] — the cloth body and its per-frame update.
//! - [`phases`] — the individual steps of a frame.
//! - [`mesh`] — mesh input (OBJ-style text, procedural grids).
//! - [`config`] — named constants and construction options.
//! - [`error`] — construction and input errors.
//! - [`types`] — shared index aliases.

pub mod cloth;
pub mod config;
pub mod constraint;
pub mod error;
pub mod mesh;
pub mod particle;
pub mod phases;
pub mod triangle;
pub mod types;

pub use cloth::ClothBody;
pub use config::{ClothOptions, ConstraintOptions, SimConstants};
pub use error::ClothError;
pub use mesh::Mesh;
