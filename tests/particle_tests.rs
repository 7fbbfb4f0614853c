use glam::Vec3;
use hero_core::{ParticleField, ParticleMotion, ParticleSpec, RecycleBounds};
use rand::rngs::StdRng;
use rand::SeedableRng;

const DT: f32 = 1.0 / 60.0;

fn recycle_bounds(spec: &ParticleSpec) -> RecycleBounds {
    match spec.motion {
        ParticleMotion::Drift { recycle: Some(rb) } => rb,
        other => panic!("expected a recycling drift field, got {other:?}"),
    }
}

#[test]
fn snowfall_never_leaves_points_below_the_floor() {
    let spec = ParticleSpec::snowfall(300);
    let rb = recycle_bounds(&spec);
    let mut rng = StdRng::seed_from_u64(7);
    let mut field = ParticleField::generate(&spec, &mut rng);

    let mut t = 0.0;
    let mut total_recycled = 0;
    for _ in 0..2_000 {
        t += DT;
        let recycled = field.step(DT, t, &mut rng);
        assert!(recycled <= field.len());
        total_recycled += recycled;
        for p in &field.positions {
            assert!(p.y >= rb.floor, "point at y={} below floor {}", p.y, rb.floor);
        }
    }
    assert_eq!(field.len(), 300);
    assert!(total_recycled > 0, "33s of snowfall should recycle something");
}

#[test]
fn points_crossing_the_floor_respawn_at_or_above_the_ceiling() {
    let spec = ParticleSpec::snowfall(500);
    let rb = recycle_bounds(&spec);
    let mut rng = StdRng::seed_from_u64(23);
    let mut field = ParticleField::generate(&spec, &mut rng);
    let dt = 1.0 / 30.0;

    let mut t = 0.0;
    let mut crossings = 0;
    for _ in 0..5_000 {
        t += dt;
        let predicted: Vec<f32> = field
            .positions
            .iter()
            .zip(&field.velocities)
            .map(|(p, v)| p.y + v.y * dt)
            .collect();
        field.step(dt, t, &mut rng);
        for (y, p) in predicted.iter().zip(&field.positions) {
            if *y < rb.floor {
                crossings += 1;
                assert!(p.y >= rb.ceiling, "respawned at y={} below ceiling {}", p.y, rb.ceiling);
                assert!(p.y > rb.floor);
            }
        }
    }
    assert!(crossings > 0);
}

#[test]
fn recycling_keeps_velocity_and_caps_height() {
    let spec = ParticleSpec::snowfall(200);
    let rb = recycle_bounds(&spec);
    let mut rng = StdRng::seed_from_u64(11);
    let mut field = ParticleField::generate(&spec, &mut rng);
    let velocities = field.velocities.clone();

    // One long step drops many points through the floor at once.
    field.step(8.0, 8.0, &mut rng);
    assert_eq!(field.velocities, velocities);
    let top = rb.ceiling + rb.spawn_span;
    for p in &field.positions {
        assert!(p.y >= rb.floor);
        assert!(p.y <= top.max(60.0) + 1e-3);
    }
}

#[test]
fn bob_points_stay_within_amplitude_of_their_anchor() {
    let spec = ParticleSpec {
        motion: ParticleMotion::Bob {
            amplitude: 0.5,
            frequency: 2.0,
        },
        ..ParticleSpec::stars(150, 10.0)
    };
    let mut rng = StdRng::seed_from_u64(3);
    let mut field = ParticleField::generate(&spec, &mut rng);
    let anchors = field.positions.clone();

    let mut t = 0.0;
    for _ in 0..600 {
        t += DT;
        field.step(DT, t, &mut rng);
        for (p, a) in field.positions.iter().zip(&anchors) {
            assert_eq!(p.x, a.x);
            assert_eq!(p.z, a.z);
            assert!((p.y - a.y).abs() <= 0.5 + 1e-4);
        }
    }
}

#[test]
fn still_starfield_only_spins() {
    let spec = ParticleSpec::stars(500, 100.0);
    let mut rng = StdRng::seed_from_u64(5);
    let mut field = ParticleField::generate(&spec, &mut rng);
    let start = field.positions.clone();

    for i in 1..=10_000 {
        field.step(DT, i as f32 * DT, &mut rng);
    }
    assert_eq!(field.positions, start);
    let r = field.rotation();
    assert!(r.y >= 0.0 && r.y < std::f32::consts::TAU);
    for p in &field.positions {
        assert!(p.abs().max_element() <= 100.0);
    }
}

#[test]
fn validate_rejects_bad_specs() {
    let empty = ParticleSpec::stars(0, 10.0);
    assert!(empty.validate().is_err());

    let mut inverted = ParticleSpec::snowfall(10);
    inverted.motion = ParticleMotion::Drift {
        recycle: Some(RecycleBounds {
            floor: 5.0,
            ceiling: 1.0,
            spawn_span: 1.0,
            half_width: 1.0,
        }),
    };
    assert!(inverted.validate().is_err());

    assert!(ParticleSpec::snowfall(10).validate().is_ok());
}

#[test]
fn field_model_matrix_places_center() {
    let spec = ParticleSpec {
        center: Vec3::new(0.0, 3.0, -5.0),
        ..ParticleSpec::stars(4, 1.0)
    };
    let mut rng = StdRng::seed_from_u64(1);
    let field = ParticleField::generate(&spec, &mut rng);
    let origin = field.model_matrix().transform_point3(Vec3::ZERO);
    assert!(origin.abs_diff_eq(Vec3::new(0.0, 3.0, -5.0), 1e-5));
}
