//! The cloth body: construction from a mesh and the per-frame update.

use crate::{
    config::{ClothOptions, SimConstants},
    constraint::{ConstraintKind, DistanceConstraint},
    error::ClothError,
    mesh::Mesh,
    particle::Particle,
    phases,
    triangle::WindTriangle,
    types::{ConstraintId, ParticleId},
};
use glam::Vec3;
use tracing::{debug, warn};

/// One simulated sheet of cloth.
///
/// Owns every particle, constraint and wind triangle of the sheet.
/// Constraints and triangles refer to particles by [`ParticleId`], which is
/// the index of the vertex in the input buffer.
#[derive(Clone, Debug)]
pub struct ClothBody {
    particles: Vec<Particle>,
    constraints: Vec<DistanceConstraint>,
    triangles: Vec<WindTriangle>,
    constants: SimConstants,
}

impl ClothBody {
    /// Builds a cloth from a flat vertex buffer and a face list.
    ///
    /// - One particle per `(x, y, z)` triple; `is_anchored(x, y)` is called
    ///   once per vertex on its rest coordinates.
    /// - Triangles get one wind triangle, quads get two, split along the
    ///   first-to-third vertex diagonal.
    /// - Every face edge (wrapping around) becomes a structural constraint.
    ///   All structural constraints come first in [`ClothBody::constraints`].
    /// - Each quad additionally gets two shear constraints along its
    ///   diagonals.
    ///
    /// Edges shared by neighbouring faces produce one constraint per face.
    ///
    /// ### Errors
    /// - [`ClothError::MalformedVertexBuffer`] if `vertices.len()` is not a
    ///   multiple of 3.
    /// - [`ClothError::InvalidFaceArity`] for faces that are not triangles
    ///   or quads.
    /// - [`ClothError::InvalidFaceIndex`] for indices past the last vertex.
    #[tracing::instrument(
        skip_all,
        fields(vertex_count = vertices.len() / 3, face_count = faces.len())
    )]
    pub fn new<F: AsRef<[usize]>>(
        vertices: &[f32],
        faces: &[F],
        opts: &ClothOptions,
        is_anchored: impl Fn(f32, f32) -> bool,
    ) -> Result<Self, ClothError> {
        if let Err(err) = validate(vertices, faces) {
            warn!(%err, "rejecting cloth mesh");
            return Err(err);
        }

        let mass = opts.constants.particle_mass;
        let particles: Vec<Particle> = vertices
            .chunks_exact(3)
            .map(|v| {
                let pos = Vec3::new(v[0], v[1], v[2]);
                Particle::with_mass(pos, mass, is_anchored(v[0], v[1]))
            })
            .collect();

        let mut triangles = Vec::with_capacity(faces.len() * 2);
        for face in faces {
            match *face.as_ref() {
                [a, b, c] => triangles.push(WindTriangle::new([a, b, c], &particles)),
                [a, b, c, d] => {
                    triangles.push(WindTriangle::new([a, b, c], &particles));
                    triangles.push(WindTriangle::new([a, c, d], &particles));
                }
                _ => unreachable!("face arity checked by validate"),
            }
        }

        let mut constraints = Vec::with_capacity(faces.len() * 6);
        for face in faces {
            let face = face.as_ref();
            for (i, &a) in face.iter().enumerate() {
                let b = face[(i + 1) % face.len()];
                constraints.push(DistanceConstraint::new(
                    a,
                    b,
                    ConstraintKind::Structural,
                    &opts.structural,
                    &particles,
                ));
            }
        }
        for face in faces {
            if let [a, b, c, d] = *face.as_ref() {
                for (p, q) in [(a, c), (b, d)] {
                    constraints.push(DistanceConstraint::new(
                        p,
                        q,
                        ConstraintKind::Shear,
                        &opts.shear,
                        &particles,
                    ));
                }
            }
        }

        let body = Self {
            particles,
            constraints,
            triangles,
            constants: opts.constants,
        };
        debug!(
            particles = body.particles.len(),
            constraints = body.constraints.len(),
            triangles = body.triangles.len(),
            anchored = body.anchored_count(),
            "cloth built"
        );
        Ok(body)
    }

    /// Builds a cloth from a parsed [`Mesh`]. See [`ClothBody::new`].
    pub fn from_mesh(
        mesh: &Mesh,
        opts: &ClothOptions,
        is_anchored: impl Fn(f32, f32) -> bool,
    ) -> Result<Self, ClothError> {
        Self::new(&mesh.vertices, &mesh.faces, opts, is_anchored)
    }

    /// Advances the cloth by one frame of length `dt` under `wind`.
    ///
    /// Relaxes the constraints, applies wind through the triangles, applies
    /// gravity and integrates the particles, then relaxes again. Each
    /// relaxation runs `constants.iterations` full passes.
    pub fn update(&mut self, dt: f32, wind: Vec3) {
        let SimConstants {
            gravity,
            damping,
            iterations,
            ..
        } = self.constants;

        phases::relaxation_phase(&mut self.constraints, &mut self.particles, iterations);
        phases::wind_phase(&mut self.triangles, &mut self.particles, wind);
        phases::integration_phase(&mut self.particles, gravity, damping, dt);
        phases::relaxation_phase(&mut self.constraints, &mut self.particles, iterations);

        tracing::trace!(dt, max_stretch = self.max_abs_stretch(), "cloth frame");
    }

    /// [`ClothBody::update`] without wind.
    pub fn step(&mut self, dt: f32) {
        self.update(dt, Vec3::ZERO);
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn particle(&self, id: ParticleId) -> Option<&Particle> {
        self.particles.get(id)
    }

    /// Current particle positions, in input vertex order.
    pub fn positions(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.particles.iter().map(|p| p.pos)
    }

    pub fn constraints(&self) -> &[DistanceConstraint] {
        &self.constraints
    }

    pub fn triangles(&self) -> &[WindTriangle] {
        &self.triangles
    }

    pub fn constants(&self) -> &SimConstants {
        &self.constants
    }

    pub fn anchored_count(&self) -> usize {
        self.particles.iter().filter(|p| p.anchored).count()
    }

    /// Current positions of both ends of `c`.
    pub fn constraint_endpoints(&self, c: &DistanceConstraint) -> (Vec3, Vec3) {
        (self.particles[c.a].pos, self.particles[c.b].pos)
    }

    /// Every constraint as `(start, end, stretch_amount)`, in constraint
    /// order. This is what a renderer needs to draw and color the mesh.
    pub fn segments(&self) -> impl Iterator<Item = (Vec3, Vec3, f32)> + '_ {
        self.constraints.iter().map(|c| {
            let (a, b) = self.constraint_endpoints(c);
            (a, b, c.stretch_amount())
        })
    }

    /// Largest `|stretch_amount|` over all constraints, `0.0` if there are
    /// none.
    pub fn max_abs_stretch(&self) -> f32 {
        self.constraints
            .iter()
            .map(|c| c.stretch_amount().abs())
            .fold(0.0, f32::max)
    }

    /// Overrides the rest length of one constraint.
    ///
    /// ### Errors
    /// [`ClothError::InvalidConstraintIndex`] if `id` does not exist.
    pub fn set_rest_length(
        &mut self,
        id: ConstraintId,
        rest_length: f32,
    ) -> Result<(), ClothError> {
        let count = self.constraints.len();
        let c = self
            .constraints
            .get_mut(id)
            .ok_or(ClothError::InvalidConstraintIndex { index: id, count })?;
        c.set_rest_length(rest_length);
        debug!(constraint = id, rest_length, "rest length changed");
        Ok(())
    }

    /// Adds `delta` to a constraint's rest length, clamped at zero, and
    /// returns the new value.
    pub fn adjust_rest_length(&mut self, id: ConstraintId, delta: f32) -> Result<f32, ClothError> {
        let count = self.constraints.len();
        let current = self
            .constraints
            .get(id)
            .ok_or(ClothError::InvalidConstraintIndex { index: id, count })?
            .rest_length();
        let next = (current + delta).max(0.0);
        self.set_rest_length(id, next)?;
        Ok(next)
    }
}

/// Checks the whole input before anything is built.
fn validate<F: AsRef<[usize]>>(vertices: &[f32], faces: &[F]) -> Result<(), ClothError> {
    if !vertices.len().is_multiple_of(3) {
        return Err(ClothError::MalformedVertexBuffer {
            len: vertices.len(),
        });
    }
    let vertex_count = vertices.len() / 3;
    for (face_id, face) in faces.iter().enumerate() {
        let face = face.as_ref();
        if !(3..=4).contains(&face.len()) {
            return Err(ClothError::InvalidFaceArity {
                face: face_id,
                arity: face.len(),
            });
        }
        if let Some(&index) = face.iter().find(|&&i| i >= vertex_count) {
            return Err(ClothError::InvalidFaceIndex {
                face: face_id,
                index,
                vertex_count,
            });
        }
    }
    Ok(())
}
