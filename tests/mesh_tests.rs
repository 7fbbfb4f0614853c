use hero_core::{cone, low_poly_peak, paint_surface, PeakColors, ShapeParams, ShapeStyle, TextureStyle};
use rand::rngs::StdRng;
use rand::SeedableRng;

#[test]
fn cone_is_centred_on_its_height() {
    let params = ShapeParams {
        base_radius: 3.0,
        height: 4.0,
        segments: 4,
        ..Default::default()
    };
    let mesh = cone(&params, &mut StdRng::seed_from_u64(1));
    let (lo, hi) = mesh.bounds();
    assert!((lo.y + 2.0).abs() < 1e-5);
    assert!((hi.y - 2.0).abs() < 1e-5);
    assert!(hi.x <= 3.0 + 1e-5 && lo.x >= -3.0 - 1e-5);
    // 4 sides + 4 cap triangles
    assert_eq!(mesh.triangle_count(), 8);
}

#[test]
fn detail_jitter_stays_within_budget() {
    let params = ShapeParams {
        base_radius: 3.0,
        height: 4.0,
        segments: 4,
        detail: Some(0.02),
        ..Default::default()
    };
    let max = 0.02 * 4.0;
    for seed in 0..20 {
        let mesh = cone(&params, &mut StdRng::seed_from_u64(seed));
        let (lo, hi) = mesh.bounds();
        assert!(hi.y <= 2.0 + max + 1e-5);
        assert!(lo.y >= -2.0 - max - 1e-5);
        for n in &mesh.normals {
            assert!((n.length() - 1.0).abs() < 1e-4);
        }
    }
}

#[test]
fn rounded_style_shares_vertices() {
    let params = ShapeParams {
        style: ShapeStyle::Rounded,
        ..Default::default()
    };
    let mesh = cone(&params, &mut StdRng::seed_from_u64(3));
    assert!(mesh.vertex_count() < mesh.indices.len());
    assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.vertex_count()));
}

#[test]
fn low_poly_peak_is_colored_by_height() {
    let colors = PeakColors::default();
    let params = ShapeParams::default();
    let mesh = low_poly_peak(&params, &colors, &mut StdRng::seed_from_u64(4));
    let (lo, hi) = mesh.bounds();
    assert!(lo.y.abs() < 1e-5);
    assert!((hi.y - params.height).abs() < 1e-5);

    for (p, c) in mesh.positions.iter().zip(&mesh.colors) {
        if (p.y - params.height).abs() < 1e-5 {
            assert_eq!(*c, colors.peak.to_array());
        }
        if p.y.abs() < 1e-5 {
            assert_eq!(*c, colors.base.to_array());
        }
    }
    // base cap, two lower bands and the upper band per segment
    assert_eq!(mesh.triangle_count(), 4 * params.segments as usize);
}

#[test]
fn surface_textures_are_deterministic_per_seed() {
    let a = paint_surface(&TextureStyle::snowcap(), 64, &mut StdRng::seed_from_u64(9));
    let b = paint_surface(&TextureStyle::snowcap(), 64, &mut StdRng::seed_from_u64(9));
    let c = paint_surface(&TextureStyle::sandstone(), 64, &mut StdRng::seed_from_u64(9));
    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(a.bytes_per_row(), 64 * 4);
}
