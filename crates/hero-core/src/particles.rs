//! Fixed-capacity decorative point clouds: stars, snow, sparkles.
//!
//! A field is generated once. Afterwards only [`ParticleField::step`] touches
//! it, and only by rewriting existing slots.

use crate::color::Rgb;
use glam::{EulerRot, Mat4, Quat, Vec3};
use rand::Rng;
use serde::{Deserialize, Serialize};
use smallvec::{smallvec, SmallVec};
use std::f32::consts::TAU;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Distribution {
    /// Uniform inside an axis-aligned box centered on the origin.
    Box { half_extents: Vec3 },
    /// Uniform direction, radius uniform in `[inner_radius, outer_radius)`.
    Shell { inner_radius: f32, outer_radius: f32 },
    /// Uniform in a square column between two heights.
    Column { half_width: f32, min_y: f32, max_y: f32 },
}

/// Per-axis velocity bounds, in world units per second.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct VelocityRange {
    pub min: Vec3,
    pub max: Vec3,
}

impl VelocityRange {
    pub const ZERO: VelocityRange = VelocityRange {
        min: Vec3::ZERO,
        max: Vec3::ZERO,
    };

    fn zero() -> Self {
        Self::ZERO
    }

    fn sample(&self, rng: &mut impl Rng) -> Vec3 {
        Vec3::new(
            lerp_rand(rng, self.min.x, self.max.x),
            lerp_rand(rng, self.min.y, self.max.y),
            lerp_rand(rng, self.min.z, self.max.z),
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecycleBounds {
    /// Points whose `y` drops below this are respawned.
    pub floor: f32,
    /// Respawned points land in `[ceiling, ceiling + spawn_span)`.
    pub ceiling: f32,
    pub spawn_span: f32,
    /// Respawned `x` and `z` are uniform in `[-half_width, half_width)`.
    pub half_width: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParticleMotion {
    Drift { recycle: Option<RecycleBounds> },
    /// Vertical sine around the generated anchor, phase-shifted per point.
    Bob { amplitude: f32, frequency: f32 },
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PaletteEntry {
    pub color: Rgb,
    pub weight: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeightedPalette {
    pub entries: SmallVec<[PaletteEntry; 4]>,
}

impl WeightedPalette {
    pub fn single(color: Rgb) -> Self {
        Self {
            entries: smallvec![PaletteEntry { color, weight: 1.0 }],
        }
    }

    /// 60% white, 25% `a`, 15% `b`.
    pub fn white_with_tints(a: Rgb, b: Rgb) -> Self {
        Self {
            entries: smallvec![
                PaletteEntry { color: Rgb::WHITE, weight: 0.60 },
                PaletteEntry { color: a, weight: 0.25 },
                PaletteEntry { color: b, weight: 0.15 },
            ],
        }
    }

    pub fn total_weight(&self) -> f32 {
        self.entries.iter().map(|e| e.weight.max(0.0)).sum()
    }

    pub fn sample(&self, rng: &mut impl Rng) -> Rgb {
        let total = self.total_weight();
        if total <= 0.0 {
            return Rgb::WHITE;
        }
        let mut pick = rng.gen::<f32>() * total;
        for e in &self.entries {
            let w = e.weight.max(0.0);
            if pick < w {
                return e.color;
            }
            pick -= w;
        }
        self.entries.last().map(|e| e.color).unwrap_or(Rgb::WHITE)
    }
}

impl Default for WeightedPalette {
    fn default() -> Self {
        Self::white_with_tints(Rgb::from_hex(0xaaccff), Rgb::from_hex(0xffe6aa))
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParticleSpec {
    pub capacity: usize,
    #[serde(default)]
    pub center: Vec3,
    pub distribution: Distribution,
    #[serde(default = "VelocityRange::zero")]
    pub velocity: VelocityRange,
    pub motion: ParticleMotion,
    #[serde(default)]
    pub palette: WeightedPalette,
    /// Point sprite size in world units.
    pub size: f32,
    pub opacity: f32,
    /// Whole-field rotation rate in radians per second.
    #[serde(default)]
    pub spin: Vec3,
    #[serde(default)]
    pub additive: bool,
}

impl ParticleSpec {
    pub fn stars(capacity: usize, half_extent: f32) -> Self {
        Self {
            capacity,
            center: Vec3::ZERO,
            distribution: Distribution::Box {
                half_extents: Vec3::splat(half_extent),
            },
            velocity: VelocityRange::ZERO,
            motion: ParticleMotion::Drift { recycle: None },
            palette: WeightedPalette::default(),
            size: 0.5,
            opacity: 0.8,
            spin: Vec3::new(0.0, 0.006, 0.0),
            additive: true,
        }
    }

    /// Snow falling through a 100-unit column, respawned above the range.
    pub fn snowfall(capacity: usize) -> Self {
        Self {
            capacity,
            center: Vec3::ZERO,
            distribution: Distribution::Column {
                half_width: 50.0,
                min_y: 10.0,
                max_y: 60.0,
            },
            velocity: VelocityRange {
                min: Vec3::new(-3.0, -12.0, -3.0),
                max: Vec3::new(3.0, -3.0, 3.0),
            },
            motion: ParticleMotion::Drift {
                recycle: Some(RecycleBounds {
                    floor: -10.0,
                    ceiling: 30.0,
                    spawn_span: 20.0,
                    half_width: 50.0,
                }),
            },
            palette: WeightedPalette::white_with_tints(
                Rgb::from_hex(0xe6f0ff),
                Rgb::from_hex(0xcfe3ff),
            ),
            size: 0.5,
            opacity: 0.8,
            spin: Vec3::ZERO,
            additive: false,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.capacity == 0 || self.capacity > crate::constants::PARTICLE_CAPACITY_MAX {
            return Err(format!(
                "particle capacity {} outside 1..={}",
                self.capacity,
                crate::constants::PARTICLE_CAPACITY_MAX
            ));
        }
        if let Distribution::Shell {
            inner_radius,
            outer_radius,
        } = self.distribution
        {
            if inner_radius < 0.0 || outer_radius < inner_radius {
                return Err("shell radii must satisfy 0 <= inner <= outer".into());
            }
        }
        if let ParticleMotion::Drift { recycle: Some(rb) } = self.motion {
            if rb.ceiling <= rb.floor {
                return Err(format!(
                    "recycle ceiling {} must be above floor {}",
                    rb.ceiling, rb.floor
                ));
            }
            if rb.spawn_span < 0.0 {
                return Err("recycle spawn_span must be non-negative".into());
            }
        }
        Ok(())
    }
}

fn lerp_rand(rng: &mut impl Rng, lo: f32, hi: f32) -> f32 {
    lo + (hi - lo) * rng.gen::<f32>()
}

fn sample_position(dist: &Distribution, rng: &mut impl Rng) -> Vec3 {
    match *dist {
        Distribution::Box { half_extents } => Vec3::new(
            lerp_rand(rng, -half_extents.x, half_extents.x),
            lerp_rand(rng, -half_extents.y, half_extents.y),
            lerp_rand(rng, -half_extents.z, half_extents.z),
        ),
        Distribution::Shell {
            inner_radius,
            outer_radius,
        } => {
            let theta = rng.gen::<f32>() * TAU;
            let cos_phi = lerp_rand(rng, -1.0, 1.0);
            let sin_phi = (1.0 - cos_phi * cos_phi).max(0.0).sqrt();
            let r = lerp_rand(rng, inner_radius, outer_radius);
            Vec3::new(r * sin_phi * theta.cos(), r * cos_phi, r * sin_phi * theta.sin())
        }
        Distribution::Column {
            half_width,
            min_y,
            max_y,
        } => Vec3::new(
            lerp_rand(rng, -half_width, half_width),
            lerp_rand(rng, min_y, max_y),
            lerp_rand(rng, -half_width, half_width),
        ),
    }
}

#[derive(Clone, Debug)]
pub struct ParticleField {
    spec: ParticleSpec,
    pub positions: Vec<Vec3>,
    pub velocities: Vec<Vec3>,
    pub colors: Vec<Rgb>,
    anchors: Vec<Vec3>,
    rotation: Vec3,
}

impl ParticleField {
    pub fn generate(spec: &ParticleSpec, rng: &mut impl Rng) -> Self {
        let n = spec.capacity;
        let mut positions = Vec::with_capacity(n);
        let mut velocities = Vec::with_capacity(n);
        let mut colors = Vec::with_capacity(n);
        for _ in 0..n {
            positions.push(sample_position(&spec.distribution, rng));
            velocities.push(spec.velocity.sample(rng));
            colors.push(spec.palette.sample(rng));
        }
        let anchors = match spec.motion {
            ParticleMotion::Bob { .. } => positions.clone(),
            ParticleMotion::Drift { .. } => Vec::new(),
        };
        Self {
            spec: spec.clone(),
            positions,
            velocities,
            colors,
            anchors,
            rotation: Vec3::ZERO,
        }
    }

    pub fn spec(&self) -> &ParticleSpec {
        &self.spec
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn rotation(&self) -> Vec3 {
        self.rotation
    }

    /// Advance by `dt` seconds; `t` is total elapsed time. Returns how many
    /// points were recycled this step.
    pub fn step(&mut self, dt: f32, t: f32, rng: &mut impl Rng) -> usize {
        let mut recycled = 0;
        match self.spec.motion {
            ParticleMotion::Drift { recycle } => {
                for (p, v) in self.positions.iter_mut().zip(&self.velocities) {
                    *p += *v * dt;
                    if let Some(rb) = recycle {
                        if p.y < rb.floor {
                            p.x = lerp_rand(rng, -rb.half_width, rb.half_width);
                            p.y = rb.ceiling + rng.gen::<f32>() * rb.spawn_span;
                            p.z = lerp_rand(rng, -rb.half_width, rb.half_width);
                            recycled += 1;
                        }
                    }
                }
            }
            ParticleMotion::Bob {
                amplitude,
                frequency,
            } => {
                for (i, (p, a)) in self.positions.iter_mut().zip(&self.anchors).enumerate() {
                    let phase = i as f32 * 0.37;
                    *p = *a + Vec3::Y * amplitude * (t * frequency + phase).sin();
                }
            }
        }
        self.rotation = wrap_angles(self.spec.spin * t);
        recycled
    }

    pub fn model_matrix(&self) -> Mat4 {
        let q = Quat::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, self.rotation.z);
        Mat4::from_rotation_translation(q, self.spec.center)
    }
}

pub(crate) fn wrap_angles(v: Vec3) -> Vec3 {
    Vec3::new(v.x.rem_euclid(TAU), v.y.rem_euclid(TAU), v.z.rem_euclid(TAU))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn palette_respects_weights() {
        let palette = WeightedPalette::white_with_tints(Rgb::BLACK, Rgb::new(1.0, 0.0, 0.0));
        let mut rng = StdRng::seed_from_u64(9);
        let whites = (0..10_000)
            .filter(|_| palette.sample(&mut rng) == Rgb::WHITE)
            .count();
        assert!((5_600..6_400).contains(&whites), "whites = {whites}");
    }

    #[test]
    fn shell_points_stay_in_radius_band() {
        let spec = ParticleSpec {
            distribution: Distribution::Shell {
                inner_radius: 8.0,
                outer_radius: 12.0,
            },
            ..ParticleSpec::stars(500, 1.0)
        };
        let field = ParticleField::generate(&spec, &mut StdRng::seed_from_u64(1));
        for p in &field.positions {
            let r = p.length();
            assert!((7.999..12.001).contains(&r), "r = {r}");
        }
    }
}
