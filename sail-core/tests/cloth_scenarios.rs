use glam::Vec3;
use rand::{Rng, SeedableRng, rngs::StdRng};
use sail_core::{
    ClothBody, ClothOptions, ConstraintOptions, Mesh,
    config::{GRAVITY, VELOCITY_DAMPING},
    constraint::{ConstraintKind, DistanceConstraint},
    particle::Particle,
};

const DT: f32 = 1.0 / 60.0;

fn random_point(rng: &mut StdRng) -> Vec3 {
    Vec3::new(
        rng.random_range(-3.0..3.0),
        rng.random_range(-3.0..3.0),
        rng.random_range(-3.0..3.0),
    )
}

/// A single quad lying flat in the x/z plane, hinged along x = 0.
fn hinged_flap() -> ClothBody {
    let vertices = [
        0.0, 0.0, 0.0, //
        1.0, 0.0, 0.0, //
        1.0, 0.0, 1.0, //
        0.0, 0.0, 1.0,
    ];
    ClothBody::new(
        &vertices,
        &[[0, 1, 2, 3]],
        &ClothOptions::default(),
        |x, _y| x <= 0.0,
    )
    .unwrap()
}

#[test]
fn hinged_flap_falls_while_edges_hold_their_length() {
    let mut body = hinged_flap();
    let start: Vec<Vec3> = body.positions().collect();
    assert_eq!(body.anchored_count(), 2);

    for _ in 0..100 {
        body.step(DT);
    }

    let end: Vec<Vec3> = body.positions().collect();
    for free in [1, 2] {
        assert!(
            end[free].y < start[free].y,
            "particle {free} did not fall: {:?}",
            end[free]
        );
    }
    for (free, anchor) in [(1, 0), (2, 3)] {
        let len = end[free].distance(end[anchor]);
        assert!(
            (len - 1.0).abs() < 0.05,
            "edge {anchor}-{free} drifted to {len}"
        );
    }
    assert!(end.iter().all(|p| p.is_finite()));
}

#[test]
fn anchored_particles_never_move_under_gusty_wind() {
    let mesh = Mesh::grid(6, 5, 0.4);
    let opts = ClothOptions::default();
    let mut body = ClothBody::from_mesh(&mesh, &opts, |x, _y| x == 0.0).unwrap();
    assert_eq!(body.anchored_count(), 5);

    let bits = |body: &ClothBody| -> Vec<([u32; 3], [u32; 3])> {
        body.particles()
            .iter()
            .filter(|p| p.anchored)
            .map(|p| {
                (
                    p.pos.to_array().map(f32::to_bits),
                    p.prev_pos.to_array().map(f32::to_bits),
                )
            })
            .collect()
    };
    let initial = bits(&body);

    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..150 {
        let wind = Vec3::new(
            rng.random_range(-20.0..20.0),
            rng.random_range(-5.0..5.0),
            rng.random_range(-20.0..20.0),
        );
        body.update(DT, wind);
        assert_eq!(bits(&body), initial);
    }
}

#[test]
fn lone_particle_follows_damped_verlet_free_fall() {
    let no_faces: &[[usize; 3]] = &[];
    let opts = ClothOptions::default();
    let mut body = ClothBody::new(&[0.0, 0.0, 0.0], no_faces, &opts, |_, _| false).unwrap();

    let steps = 120;
    for _ in 0..steps {
        body.step(DT);
    }

    // Per-step displacement v_k = a (1 - d^k) / (1 - d) with a = g dt^2,
    // summed over k = 1..=n.
    let a = f64::from(GRAVITY.y) * f64::from(DT) * f64::from(DT);
    let d = f64::from(VELOCITY_DAMPING);
    let n = f64::from(steps);
    let expected = a / (1.0 - d) * (n - d * (1.0 - d.powf(n)) / (1.0 - d));

    let y = f64::from(body.particles()[0].pos.y);
    assert!(
        (y - expected).abs() < 1e-3 * expected.abs(),
        "expected {expected}, got {y}"
    );
    assert_eq!(body.particles()[0].pos.x, 0.0);
    assert_eq!(body.particles()[0].pos.z, 0.0);
}

#[test]
fn relaxation_converges_from_random_configurations() {
    let mut rng = StdRng::seed_from_u64(42);

    for _ in 0..50 {
        let mut particles = vec![
            Particle::new(random_point(&mut rng), false),
            Particle::new(random_point(&mut rng), false),
        ];
        let rest = rng.random_range(0.2..2.0);
        let stretch = rng.random_range(0.05..0.95);
        let shrink = rng.random_range(0.05..0.95);
        let opts = ConstraintOptions {
            stretch_factor: stretch,
            shrink_factor: shrink,
            rest_length: Some(rest),
        };
        let mut c = DistanceConstraint::new(0, 1, ConstraintKind::Structural, &opts, &particles);

        let mut last = f32::MAX;
        for _ in 0..400 {
            c.relax(&mut particles);
            let error = (particles[0].pos.distance(particles[1].pos) - rest).abs();
            assert!(error <= last + 1e-5);
            last = error;
        }
        assert!(last < 1e-3, "residual {last} for rest {rest}");
    }
}

#[test]
fn parsed_sail_flies_in_the_wind() {
    let text = "\
v 0 0 0
v 0 3 0
v 2 0 0
v 1.5 1.5 0
v 1 3 0
f 1 3 4
f 1 4 5 2
";
    let mesh = Mesh::parse_obj(text).unwrap();
    let opts = ClothOptions::default();
    let mut body = ClothBody::from_mesh(&mesh, &opts, |x, _y| x == 0.0).unwrap();

    assert_eq!(body.particles().len(), 5);
    assert_eq!(body.triangles().len(), 3);
    // 3 + 4 structural edges, 2 shear diagonals.
    assert_eq!(body.constraints().len(), 9);

    for _ in 0..60 {
        body.update(DT, Vec3::new(0.0, 0.0, 8.0));
    }

    let positions: Vec<Vec3> = body.positions().collect();
    assert_eq!(positions[0], mesh.vertex(0));
    assert_eq!(positions[1], mesh.vertex(1));
    assert!(positions.iter().all(|p| p.is_finite()));
    let leech = positions[2];
    assert!(leech.z > 0.0, "leech did not fill: {leech:?}");
}

#[test]
fn coincident_vertices_stay_finite() {
    let vertices = [
        0.0, 0.0, 0.0, //
        0.0, 0.0, 0.0, //
        1.0, 0.0, 0.0,
    ];
    let opts = ClothOptions {
        structural: ConstraintOptions::new(0.5, 0.5).with_rest_length(0.0),
        ..ClothOptions::default()
    };
    let mut body = ClothBody::new(&vertices, &[[0, 1, 2]], &opts, |_, _| false).unwrap();

    for _ in 0..10 {
        body.update(DT, Vec3::X);
    }

    assert!(body.positions().all(|p| p.is_finite()));
    let mut stretches = body.constraints().iter().map(|c| c.stretch_amount());
    assert!(stretches.all(f32::is_finite));
}
