use crate::{config::LENGTH_EPSILON, particle::Particle, types::ParticleId};
use glam::Vec3;

/// A triangular face that couples wind into its three particles.
///
/// The winding order of `verts` is fixed at construction and determines the
/// direction of `normal`. Only the magnitude of the wind/normal alignment is
/// used, so flipping the winding does not change the applied force.
#[derive(Clone, Debug, PartialEq)]
pub struct WindTriangle {
    pub verts: [ParticleId; 3],
    normal: Vec3,
}

impl WindTriangle {
    pub fn new(verts: [ParticleId; 3], particles: &[Particle]) -> Self {
        let mut tri = Self {
            verts,
            normal: Vec3::ZERO,
        };
        tri.update_normal(particles);
        tri
    }

    /// Unit normal as of the last [`WindTriangle::update_normal`] call, or
    /// zero for a degenerate triangle.
    #[inline]
    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    /// Recomputes the normal from current particle positions.
    pub fn update_normal(&mut self, particles: &[Particle]) {
        let [a, b, c] = self.verts;
        let p1 = particles[a].pos;
        let e1 = particles[b].pos - p1;
        let e2 = particles[c].pos - p1;
        self.normal = e1.cross(e2).normalize_or_zero();
    }

    /// Total force this triangle takes from `wind`.
    ///
    /// `wind * |dot(normalize(wind), normal)|`. A wind vector shorter than
    /// [`LENGTH_EPSILON`] contributes nothing.
    pub fn wind_contribution(&self, wind: Vec3) -> Vec3 {
        let strength = wind.length();
        if strength < LENGTH_EPSILON {
            return Vec3::ZERO;
        }
        let alignment = (wind / strength).dot(self.normal).abs();
        wind * alignment
    }

    /// Splits the wind contribution evenly over the three particles.
    pub fn apply_wind(&self, wind: Vec3, particles: &mut [Particle]) {
        let third = self.wind_contribution(wind) / 3.0;
        for &id in &self.verts {
            particles[id].apply_force(third);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Unit right triangle in the x/y plane, normal +z.
    fn xy_triangle() -> (WindTriangle, Vec<Particle>) {
        let particles = vec![
            Particle::with_mass(Vec3::ZERO, 1.0, false),
            Particle::with_mass(Vec3::X, 1.0, false),
            Particle::with_mass(Vec3::Y, 1.0, false),
        ];
        (WindTriangle::new([0, 1, 2], &particles), particles)
    }

    #[test]
    fn normal_follows_winding_order() {
        let (tri, particles) = xy_triangle();
        assert_eq!(tri.normal(), Vec3::Z);

        let flipped = WindTriangle::new([0, 2, 1], &particles);
        assert_eq!(flipped.normal(), -Vec3::Z);
    }

    #[test]
    fn perpendicular_wind_contributes_nothing() {
        let (tri, mut particles) = xy_triangle();
        let wind = Vec3::new(3.0, -2.0, 0.0);

        assert_eq!(tri.wind_contribution(wind), Vec3::ZERO);
        tri.apply_wind(wind, &mut particles);
        assert!(particles.iter().all(|p| p.force == Vec3::ZERO));
    }

    #[test]
    fn parallel_wind_contributes_its_full_magnitude() {
        let (tri, _) = xy_triangle();
        for wind in [Vec3::new(0.0, 0.0, 6.0), Vec3::new(0.0, 0.0, -6.0)] {
            let contribution = tri.wind_contribution(wind);
            assert!((contribution.length() - 6.0).abs() < 1e-6);
            assert_eq!(contribution, wind);
        }
    }

    #[test]
    fn wind_is_split_in_thirds_and_scaled_by_mass() {
        let (tri, mut particles) = xy_triangle();
        particles[2].mass = 0.5;

        tri.apply_wind(Vec3::new(0.0, 0.0, 3.0), &mut particles);

        assert_eq!(particles[0].force, Vec3::new(0.0, 0.0, 1.0));
        assert_eq!(particles[1].force, Vec3::new(0.0, 0.0, 1.0));
        assert_eq!(particles[2].force, Vec3::new(0.0, 0.0, 0.5));
    }

    #[test]
    fn zero_wind_and_degenerate_triangles_are_inert() {
        let (tri, _) = xy_triangle();
        assert_eq!(tri.wind_contribution(Vec3::ZERO), Vec3::ZERO);

        let collinear = vec![
            Particle::new(Vec3::ZERO, false),
            Particle::new(Vec3::X, false),
            Particle::new(Vec3::X * 2.0, false),
        ];
        let flat = WindTriangle::new([0, 1, 2], &collinear);
        assert_eq!(flat.normal(), Vec3::ZERO);
        assert_eq!(flat.wind_contribution(Vec3::ONE), Vec3::ZERO);
    }

    #[test]
    fn update_normal_tracks_moved_particles() {
        let (mut tri, mut particles) = xy_triangle();
        // Rotate the triangle into the x/z plane.
        particles[2].pos = Vec3::Z;
        tri.update_normal(&particles);
        assert_eq!(tri.normal(), -Vec3::Y);
    }
}
