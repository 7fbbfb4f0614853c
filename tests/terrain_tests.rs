use glam::{Vec2, Vec3};
use hero_core::{
    cone, IdleMotion, MaterialParams, Parallax, ShapeParams, TerrainGroup, TerrainObject, Transform,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn busy_idle() -> IdleMotion {
    IdleMotion {
        sway: 0.05,
        sway_freq: 0.3,
        bob: 0.2,
        bob_freq: 0.5,
        spin: 0.1,
        tilt: 0.02,
        tilt_freq: 0.7,
        pulse: 0.03,
        pulse_freq: 1.1,
        phase_step: 0.9,
    }
}

fn object(base: Transform, layer: u32, index: usize) -> TerrainObject {
    let mut rng = StdRng::seed_from_u64(index as u64);
    let mesh = cone(&ShapeParams::default(), &mut rng);
    TerrainObject::new(mesh, None, MaterialParams::default(), base, layer, index)
}

#[test]
fn base_transform_survives_many_ticks() {
    let base = Transform::from_position(Vec3::new(-20.0, -5.0, -30.0)).with_rotation(Vec3::new(0.0, 0.4, 0.0));
    let mut obj = object(base, 1, 2);
    let parallax = Parallax {
        lift_per_layer: 0.5,
        zoom: 0.1,
    };
    let idle = busy_idle();
    for i in 0..20_000 {
        let t = i as f32 / 60.0;
        obj.animate(&idle, &parallax, t, (i % 300) as f32 / 300.0);
    }
    assert_eq!(*obj.base(), base);

    // Recovering the base from the rendered transform is exact up to float error.
    let recovered = obj.world_transform().without(obj.offset());
    assert!(recovered.abs_diff_eq(&base, 1e-4));
}

#[test]
fn still_object_renders_at_its_base() {
    let base = Transform::from_position(Vec3::new(3.0, 0.0, -10.0)).with_scale(2.0);
    let mut obj = object(base, 0, 0);
    obj.animate(&IdleMotion::STILL, &Parallax::default(), 123.0, 0.0);
    assert!(obj.world_transform().abs_diff_eq(&base, 1e-6));
}

#[test]
fn long_run_offsets_stay_bounded() {
    let base = Transform::from_position(Vec3::new(0.0, -2.0, -15.0));
    let layer = 2;
    let parallax = Parallax {
        lift_per_layer: 0.5,
        zoom: 0.1,
    };
    let idle = busy_idle();
    let (max_t, max_r, max_s) = idle.bounds();
    let mut obj = object(base, layer, 4);

    // Sample well past an hour of wall time with a full scroll.
    let mut t = 0.0f32;
    while t < 10_000.0 {
        obj.animate(&idle, &parallax, t, 1.0);
        let world = obj.world_transform();
        let lift = parallax.lift_per_layer * (layer + 1) as f32;
        assert!((world.position.y - base.position.y).abs() <= max_t + lift + 1e-3);
        assert_eq!(world.position.x, base.position.x);
        assert!(world.rotation.abs().max_element() <= max_r + 1e-3);
        let s = world.scale.x;
        assert!(s <= (1.0 + max_s) * (1.0 + parallax.zoom) + 1e-4);
        assert!(s >= (1.0 - max_s) - 1e-4);
        t += 0.731;
    }
}

#[test]
fn scroll_progress_beyond_one_is_clamped() {
    let base = Transform::IDENTITY;
    let parallax = Parallax {
        lift_per_layer: 1.0,
        zoom: 0.2,
    };
    let mut a = object(base, 0, 0);
    let mut b = object(base, 0, 0);
    a.animate(&IdleMotion::STILL, &parallax, 0.0, 1.0);
    b.animate(&IdleMotion::STILL, &parallax, 0.0, 40.0);
    assert_eq!(a.world_transform(), b.world_transform());
    assert!((a.world_transform().position.y - 1.0).abs() < 1e-6);
}

#[test]
fn group_offset_includes_pointer_rotation() {
    let base = Transform::from_position(Vec3::new(0.0, -2.0, -15.0));
    let mut group = TerrainGroup::new(base, IdleMotion::STILL, vec![object(Transform::IDENTITY, 0, 0)]);
    group.animate(&IdleMotion::STILL, &Parallax::default(), 1.0, 0.0);
    group.set_pointer_rotation(Vec2::new(0.2, -1.0));

    let world = group.world_transform();
    assert_eq!(*group.base(), base);
    assert!((world.rotation.x - 0.2).abs() < 1e-6);
    assert!((world.rotation.y + 1.0).abs() < 1e-6);
    assert_eq!(group.model_matrices().len(), 1);
}
