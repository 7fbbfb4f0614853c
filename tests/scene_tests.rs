use hero_core::{
    AnalyticsSink, HeroConfig, HeroError, Light, Marks, PeakShape, Rgb, Scene, TextureStyle, MAX_LIGHTS,
    TEXTURE_MARK_COUNT_MAX, TEXTURE_SIZE,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

#[derive(Default)]
struct RecordingSink(Vec<(String, Option<serde_json::Value>)>);

impl AnalyticsSink for RecordingSink {
    fn track(&mut self, name: &str, properties: Option<serde_json::Value>, _timestamp: &str) {
        self.0.push((name.to_owned(), properties));
    }
}

#[test]
fn every_preset_builds() {
    for name in HeroConfig::PRESETS {
        let config = HeroConfig::preset(name).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let scene = Scene::build(&config, &mut rng).unwrap();
        assert_eq!(scene.terrain().objects.len(), config.peaks.len());
        assert_eq!(scene.particles().len(), config.particles.len());
        for (obj, peak) in scene.terrain().objects.iter().zip(&config.peaks) {
            assert!(obj.mesh.triangle_count() > 0);
            assert_eq!(obj.texture.is_some(), peak.texture.is_some());
            assert_eq!(*obj.base(), peak.transform);
        }
    }
}

#[test]
fn unknown_preset_is_an_error() {
    assert!(matches!(
        HeroConfig::preset("volcano"),
        Err(HeroError::InvalidConfig(_))
    ));
}

#[test]
fn textures_use_configured_size() {
    let config = HeroConfig::parallax_range();
    let mut rng = StdRng::seed_from_u64(2);
    let scene = Scene::build(&config, &mut rng).unwrap();
    let tex = scene.terrain().objects[0].texture.as_ref().unwrap();
    assert_eq!((tex.width, tex.height), (TEXTURE_SIZE, TEXTURE_SIZE));
    assert_eq!(tex.pixels.len(), (TEXTURE_SIZE * TEXTURE_SIZE * 4) as usize);
}

#[test]
fn same_seed_same_scene() {
    let config = HeroConfig::ancient_pyramid();
    let a = Scene::build(&config, &mut StdRng::seed_from_u64(77)).unwrap();
    let b = Scene::build(&config, &mut StdRng::seed_from_u64(77)).unwrap();
    assert_eq!(a.terrain().objects[0].mesh, b.terrain().objects[0].mesh);
    assert_eq!(a.particles()[0].positions, b.particles()[0].positions);
}

#[test]
fn json_config_overrides_preset_fields() {
    let json = r#"{ "texture_size": 64, "seed": 5, "bloom": { "threshold": 0.5, "intensity": 1.0 } }"#;
    let config = HeroConfig::from_json(json).unwrap();
    assert_eq!(config.texture_size, 64);
    assert_eq!(config.seed, Some(5));
    assert!(matches!(config.peaks[0].shape, PeakShape::LowPoly { .. }));
    assert!(HeroConfig::from_json("{ not json").is_err());
}

#[test]
fn extreme_texture_marks_are_rejected_before_build() {
    let json = r##"{
        "peaks": [{
            "shape": { "kind": "cone" },
            "texture": {
                "marks": [{
                    "kind": "snow", "count": 10, "color": "#ffffff",
                    "min_radius": -3e38, "max_radius": 3e38,
                    "min_alpha": 0.2, "max_alpha": 0.5, "band": 0.5
                }]
            }
        }]
    }"##;
    let err = HeroConfig::from_json(json)
        .and_then(|config| Scene::build(&config, &mut StdRng::seed_from_u64(1)).map(|_| ()))
        .unwrap_err();
    assert!(matches!(err, HeroError::InvalidConfig(_)), "{err}");
}

#[test]
fn texture_mark_bounds_are_validated() {
    let with_marks = |marks: Marks| {
        let mut config = HeroConfig::ancient_pyramid();
        config.peaks[0].texture = Some(TextureStyle {
            marks: vec![marks],
            ..TextureStyle::sandstone()
        });
        config.validate()
    };
    let snow = |count, min_alpha, max_alpha| Marks::Snow {
        count,
        color: Rgb::WHITE,
        min_radius: 1.0,
        max_radius: 5.0,
        min_alpha,
        max_alpha,
        band: 0.5,
    };
    assert!(with_marks(snow(200, 0.3, 0.7)).is_ok());
    assert!(with_marks(snow(200, 0.3, 1.5)).is_err());
    assert!(with_marks(snow(200, f32::NAN, 0.7)).is_err());
    assert!(with_marks(snow(TEXTURE_MARK_COUNT_MAX + 1, 0.3, 0.7)).is_err());
    assert!(with_marks(Marks::Glyphs {
        count: 5,
        color: Rgb::WHITE,
        line_width: 2.0,
        min_radius: -1.0,
        max_radius: 4.0,
    })
    .is_err());
    assert!(with_marks(Marks::Highlights {
        count: 5,
        color: Rgb::WHITE,
        line_width: 1.0,
        min_length: 5.0,
        max_length: f32::INFINITY,
    })
    .is_err());
}

#[test]
fn too_many_lights_are_rejected() {
    let mut config = HeroConfig::low_poly_peak();
    config.lights = vec![Light::ambient(0xffffff, 0.1); MAX_LIGHTS + 1];
    assert!(matches!(config.validate(), Err(HeroError::InvalidConfig(_))));
    config.lights.truncate(MAX_LIGHTS);
    assert!(config.validate().is_ok());
}

#[test]
fn orbiting_light_moves_around_its_base() {
    let config = HeroConfig::ancient_pyramid();
    let mut rng = StdRng::seed_from_u64(3);
    let mut scene = Scene::build(&config, &mut rng).unwrap();
    let input = hero_core::InputState::new(800.0, 600.0);
    let orbit_index = config
        .lights
        .iter()
        .position(|l| matches!(l, Light::Directional { orbit: Some(_), .. }))
        .expect("pyramid has an orbiting light");

    let position = |scene: &Scene| match scene.lights()[orbit_index] {
        Light::Directional { position, .. } => position,
        _ => unreachable!(),
    };
    let start = position(&scene);
    for _ in 0..120 {
        scene.advance(1.0 / 60.0, &input, &mut rng);
    }
    let later = position(&scene);
    assert_ne!(start, later);
    assert_eq!(start.y, later.y);
    let r0 = (start.x * start.x + start.z * start.z).sqrt();
    let r1 = (later.x * later.x + later.z * later.z).sqrt();
    assert!((r0 - r1).abs() < 1e-3);
}

#[test]
fn mount_is_reported_to_the_sink() {
    let mut rng = StdRng::seed_from_u64(4);
    let mut scene = Scene::build(&HeroConfig::low_poly_peak(), &mut rng).unwrap();
    scene.resize(640, 480);
    let mut sink = RecordingSink::default();
    scene.report_mount(&mut sink, "low_poly_peak", "2026-10-19T10:00:00Z");

    assert_eq!(sink.0.len(), 1);
    let (name, props) = &sink.0[0];
    assert_eq!(name, "hero_scene_mounted");
    let props = props.as_ref().unwrap();
    assert_eq!(props["scene"], "low_poly_peak");
    assert_eq!(props["width"], 640);
}
