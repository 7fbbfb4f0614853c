//! Procedural terrain geometry.
//!
//! Builders produce CPU-side [`MeshData`] with normals already computed. The
//! renderer uploads it once at mount and releases the buffers at teardown.

use crate::color::Rgb;
use crate::constants::{PEAK_MID_HEIGHT_FRACTION, PEAK_MID_RADIUS_FRACTION};
use glam::{Vec2, Vec3};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeStyle {
    /// Faceted: every triangle owns its vertices, normals are per face.
    #[default]
    Angular,
    /// Shared vertices, normals averaged across adjacent faces.
    Rounded,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapeParams {
    pub base_radius: f32,
    pub height: f32,
    pub segments: u32,
    pub style: ShapeStyle,
    /// Max per-axis vertex displacement as a fraction of `height`.
    pub detail: Option<f32>,
}

impl Default for ShapeParams {
    fn default() -> Self {
        Self {
            base_radius: 10.0,
            height: 20.0,
            segments: 8,
            style: ShapeStyle::Angular,
            detail: None,
        }
    }
}

/// Per-height vertex colors for the custom low-poly peak.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PeakColors {
    pub base: Rgb,
    pub mid: Rgb,
    pub peak: Rgb,
}

impl Default for PeakColors {
    fn default() -> Self {
        Self {
            base: Rgb::new(0.2, 0.3, 0.6),
            mid: Rgb::new(0.3, 0.45, 0.75),
            peak: Rgb::new(0.4, 0.6, 0.9),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    /// Image-space UVs: v = 0 is the top row of the painted texture.
    pub uvs: Vec<Vec2>,
    pub colors: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    fn push_vertex(&mut self, position: Vec3, uv: Vec2, color: Rgb) -> u32 {
        let i = self.positions.len() as u32;
        self.positions.push(position);
        self.normals.push(Vec3::ZERO);
        self.uvs.push(uv);
        self.colors.push(color.to_array());
        i
    }

    /// Push a triangle whose face normal points along `outward`.
    fn push_triangle_facing(&mut self, a: u32, b: u32, c: u32, outward: Vec3) {
        let pa = self.positions[a as usize];
        let pb = self.positions[b as usize];
        let pc = self.positions[c as usize];
        let n = (pb - pa).cross(pc - pa);
        if n.dot(outward) >= 0.0 {
            self.indices.extend_from_slice(&[a, b, c]);
        } else {
            self.indices.extend_from_slice(&[a, c, b]);
        }
    }

    /// Area-weighted vertex normals from the current triangles.
    pub fn compute_normals(&mut self) {
        let mut acc = vec![Vec3::ZERO; self.positions.len()];
        for tri in self.indices.chunks_exact(3) {
            let (a, b, c) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
            let face = (self.positions[b] - self.positions[a])
                .cross(self.positions[c] - self.positions[a]);
            acc[a] += face;
            acc[b] += face;
            acc[c] += face;
        }
        self.normals = acc
            .into_iter()
            .map(|n| n.try_normalize().unwrap_or(Vec3::Y))
            .collect();
    }

    /// Un-index so every triangle owns its three vertices (flat shading).
    pub fn flattened(&self) -> MeshData {
        let mut out = MeshData::default();
        for &i in &self.indices {
            let i = i as usize;
            out.positions.push(self.positions[i]);
            out.normals.push(Vec3::ZERO);
            out.uvs.push(self.uvs[i]);
            out.colors.push(self.colors[i]);
            out.indices.push(out.indices.len() as u32);
        }
        out
    }

    pub fn bounds(&self) -> (Vec3, Vec3) {
        self.positions.iter().fold(
            (Vec3::splat(f32::MAX), Vec3::splat(f32::MIN)),
            |(lo, hi), p| (lo.min(*p), hi.max(*p)),
        )
    }

    fn finish(mut self, style: ShapeStyle) -> MeshData {
        if style == ShapeStyle::Angular {
            self = self.flattened();
        }
        self.compute_normals();
        self
    }
}

fn ring_point(radius: f32, y: f32, i: u32, segments: u32) -> Vec3 {
    let theta = i as f32 / segments as f32 * TAU;
    Vec3::new(radius * theta.sin(), y, radius * theta.cos())
}

fn jitter(rng: &mut impl Rng, max: f32) -> Vec3 {
    if max <= 0.0 {
        return Vec3::ZERO;
    }
    Vec3::new(
        rng.gen_range(-max..=max),
        rng.gen_range(-max..=max),
        rng.gen_range(-max..=max),
    )
}

fn outward_of(points: [Vec3; 3]) -> Vec3 {
    let c = (points[0] + points[1] + points[2]) / 3.0;
    Vec3::new(c.x, 0.0, c.z)
}

/// Cone/pyramid centred on the origin, base at `-height/2`, apex at `+height/2`.
///
/// With `segments = 4` this is the pyramid, with 8 the classic low-poly
/// mountain. The side seam has a duplicate vertex so UVs wrap cleanly; the
/// base cap owns its own ring so its normal does not bleed into the sides.
pub fn cone(params: &ShapeParams, rng: &mut impl Rng) -> MeshData {
    let segments = params.segments.max(3);
    let half = params.height * 0.5;
    let max_jitter = params.detail.unwrap_or(0.0).max(0.0) * params.height;

    // Unique ring points first so seam duplicates share the same displacement.
    let ring: Vec<Vec3> = (0..segments)
        .map(|i| ring_point(params.base_radius, -half, i, segments) + jitter(rng, max_jitter))
        .collect();
    let apex = Vec3::new(0.0, half, 0.0) + jitter(rng, max_jitter);

    let mut mesh = MeshData::default();
    let white = Rgb::WHITE;
    let ring_start = mesh.positions.len() as u32;
    for i in 0..=segments {
        let p = ring[(i % segments) as usize];
        mesh.push_vertex(p, Vec2::new(i as f32 / segments as f32, 1.0), white);
    }
    for i in 0..segments {
        let u = (i as f32 + 0.5) / segments as f32;
        let tip = mesh.push_vertex(apex, Vec2::new(u, 0.0), white);
        let a = ring_start + i;
        let b = ring_start + i + 1;
        let out = outward_of([apex, ring[(i % segments) as usize], ring[((i + 1) % segments) as usize]]);
        mesh.push_triangle_facing(tip, a, b, out);
    }

    let center = mesh.push_vertex(Vec3::new(0.0, -half, 0.0), Vec2::new(0.5, 0.5), white);
    let cap_start = mesh.positions.len() as u32;
    for (i, p) in ring.iter().enumerate() {
        let theta = i as f32 / segments as f32 * TAU;
        let uv = Vec2::new(0.5 + 0.5 * theta.sin(), 0.5 + 0.5 * theta.cos());
        mesh.push_vertex(*p, uv, white);
    }
    for i in 0..segments {
        let a = cap_start + i;
        let b = cap_start + (i + 1) % segments;
        mesh.push_triangle_facing(center, a, b, Vec3::NEG_Y);
    }

    mesh.finish(params.style)
}

/// Custom low-poly peak: a base ring, a narrower mid ring and a single peak,
/// colored by height. Base sits at `y = 0`.
pub fn low_poly_peak(params: &ShapeParams, colors: &PeakColors, rng: &mut impl Rng) -> MeshData {
    let segments = params.segments.max(3);
    let max_jitter = params.detail.unwrap_or(0.0).max(0.0) * params.height;
    let mid_y = params.height * PEAK_MID_HEIGHT_FRACTION;
    let mid_r = params.base_radius * PEAK_MID_RADIUS_FRACTION;

    let base_ring: Vec<Vec3> = (0..segments)
        .map(|i| ring_point(params.base_radius, 0.0, i, segments) + jitter(rng, max_jitter))
        .collect();
    let mid_ring: Vec<Vec3> = (0..segments)
        .map(|i| ring_point(mid_r, mid_y, i, segments) + jitter(rng, max_jitter))
        .collect();
    let peak_pos = Vec3::new(0.0, params.height, 0.0) + jitter(rng, max_jitter);

    let mut mesh = MeshData::default();
    let uv_of = |p: Vec3| {
        Vec2::new(
            0.5 + 0.5 * p.x / params.base_radius.max(1e-3),
            1.0 - (p.y / params.height.max(1e-3)).clamp(0.0, 1.0),
        )
    };
    let center = mesh.push_vertex(Vec3::ZERO, Vec2::new(0.5, 1.0), colors.base);
    let base_start = mesh.positions.len() as u32;
    for p in &base_ring {
        mesh.push_vertex(*p, uv_of(*p), colors.base);
    }
    let peak = mesh.push_vertex(peak_pos, uv_of(peak_pos), colors.peak);
    let mid_start = mesh.positions.len() as u32;
    for p in &mid_ring {
        mesh.push_vertex(*p, uv_of(*p), colors.mid);
    }

    for i in 0..segments {
        let next = (i + 1) % segments;
        let (b0, b1) = (base_start + i, base_start + next);
        let (m0, m1) = (mid_start + i, mid_start + next);

        mesh.push_triangle_facing(center, b0, b1, Vec3::NEG_Y);

        let lower = outward_of([base_ring[i as usize], base_ring[next as usize], mid_ring[i as usize]]);
        mesh.push_triangle_facing(b0, b1, m0, lower);
        mesh.push_triangle_facing(b1, m1, m0, lower);

        let upper = outward_of([mid_ring[i as usize], mid_ring[next as usize], peak_pos]);
        mesh.push_triangle_facing(m0, m1, peak, upper);
    }

    mesh.finish(params.style)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn cone_side_normals_point_outward() {
        let mut rng = StdRng::seed_from_u64(1);
        let mesh = cone(&ShapeParams::default(), &mut rng);
        for (p, n) in mesh.positions.iter().zip(&mesh.normals) {
            if p.y > -9.99 {
                let radial = Vec3::new(p.x, 0.0, p.z);
                assert!(n.dot(radial) >= -1e-4, "inward normal at {p:?}");
            }
        }
    }

    #[test]
    fn angular_style_does_not_share_vertices() {
        let mut rng = StdRng::seed_from_u64(2);
        let mesh = cone(&ShapeParams::default(), &mut rng);
        assert_eq!(mesh.vertex_count(), mesh.indices.len());
    }
}
