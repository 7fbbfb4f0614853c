//! Scene configuration and the built-in presets.
//!
//! Every visual variant of the hero section is one [`HeroConfig`]. Presets
//! are plain constructors; a JSON document can override any of them at mount.

use crate::camera::{CameraRigConfig, PointerRotationConfig};
use crate::color::Rgb;
use crate::constants::{MAX_LIGHTS, TEXTURE_SIZE, TEXTURE_SIZE_MAX};
use crate::error::{HeroError, Result};
use crate::mesh::{PeakColors, ShapeParams, ShapeStyle};
use crate::particles::{
    Distribution, PaletteEntry, ParticleMotion, ParticleSpec, VelocityRange, WeightedPalette,
};
use crate::terrain::{IdleMotion, MaterialParams, Parallax};
use crate::texture::TextureStyle;
use crate::transform::Transform;
use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use smallvec::smallvec;
use std::f32::consts::PI;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PeakShape {
    Cone,
    LowPoly {
        #[serde(default)]
        colors: PeakColors,
    },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PeakConfig {
    pub shape: PeakShape,
    #[serde(default)]
    pub params: ShapeParams,
    #[serde(default)]
    pub transform: Transform,
    /// Depth layer, 0 = front. Drives per-layer parallax.
    #[serde(default)]
    pub layer: u32,
    #[serde(default)]
    pub texture: Option<TextureStyle>,
    #[serde(default)]
    pub material: MaterialParams,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupConfig {
    pub transform: Transform,
    pub idle: IdleMotion,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LightOrbit {
    pub radius: f32,
    /// Radians per second around the y axis.
    pub speed: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Light {
    Ambient {
        color: Rgb,
        intensity: f32,
    },
    /// Parallel light arriving from `position` toward the origin.
    Directional {
        color: Rgb,
        intensity: f32,
        position: Vec3,
        #[serde(default)]
        orbit: Option<LightOrbit>,
    },
    Point {
        color: Rgb,
        intensity: f32,
        position: Vec3,
        range: f32,
    },
}

impl Light {
    pub fn ambient(hex: u32, intensity: f32) -> Self {
        Light::Ambient {
            color: Rgb::from_hex(hex),
            intensity,
        }
    }

    pub fn directional(hex: u32, intensity: f32, position: Vec3) -> Self {
        Light::Directional {
            color: Rgb::from_hex(hex),
            intensity,
            position,
            orbit: None,
        }
    }
}

/// Atmospheric backdrop drawn behind everything as a vertical gradient.
/// `opacity = 0` leaves the canvas transparent so the page shows through.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Background {
    pub top: Rgb,
    pub bottom: Rgb,
    pub opacity: f32,
}

impl Default for Background {
    fn default() -> Self {
        Self {
            top: Rgb::from_hex(0x0b1026),
            bottom: Rgb::from_hex(0x1c2a4a),
            opacity: 1.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BloomSettings {
    pub threshold: f32,
    pub intensity: f32,
}

impl Default for BloomSettings {
    fn default() -> Self {
        Self {
            threshold: 0.7,
            intensity: 0.5,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeroConfig {
    pub peaks: Vec<PeakConfig>,
    pub group: GroupConfig,
    /// Idle motion applied to each peak, phase-shifted by its index.
    pub idle: IdleMotion,
    pub parallax: Parallax,
    pub pointer_rotation: PointerRotationConfig,
    pub particles: Vec<ParticleSpec>,
    pub lights: Vec<Light>,
    pub camera: CameraRigConfig,
    pub background: Background,
    pub bloom: Option<BloomSettings>,
    pub texture_size: u32,
    /// Fixed RNG seed; entropy when absent.
    pub seed: Option<u64>,
}

impl Default for HeroConfig {
    fn default() -> Self {
        Self::low_poly_peak()
    }
}

impl HeroConfig {
    pub const PRESETS: [&'static str; 3] = ["low_poly_peak", "parallax_range", "ancient_pyramid"];

    pub fn preset(name: &str) -> Result<Self> {
        match name {
            "low_poly_peak" => Ok(Self::low_poly_peak()),
            "parallax_range" => Ok(Self::parallax_range()),
            "ancient_pyramid" => Ok(Self::ancient_pyramid()),
            other => Err(HeroError::InvalidConfig(format!(
                "unknown preset `{other}` (expected one of {:?})",
                Self::PRESETS
            ))),
        }
    }

    /// Parse a full config document and validate it.
    pub fn from_json(json: &str) -> Result<Self> {
        let cfg: HeroConfig = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Single faceted peak over a starfield, free pointer look.
    pub fn low_poly_peak() -> Self {
        Self {
            peaks: vec![PeakConfig {
                shape: PeakShape::LowPoly {
                    colors: PeakColors::default(),
                },
                params: ShapeParams {
                    base_radius: 8.0,
                    height: 12.0,
                    segments: 8,
                    style: ShapeStyle::Angular,
                    detail: None,
                },
                transform: Transform::IDENTITY.with_rotation(Vec3::new(0.0, PI * 0.25, 0.0)),
                layer: 0,
                texture: None,
                material: MaterialParams {
                    vertex_colors: true,
                    ..MaterialParams::default()
                },
            }],
            group: GroupConfig {
                transform: Transform::from_position(Vec3::new(0.0, -2.0, -15.0)),
                idle: IdleMotion::STILL,
            },
            idle: IdleMotion::STILL,
            parallax: Parallax::default(),
            pointer_rotation: PointerRotationConfig::default(),
            particles: vec![ParticleSpec {
                spin: Vec3::new(0.006, 0.012, 0.0),
                ..ParticleSpec::stars(1500, 100.0)
            }],
            lights: vec![
                Light::ambient(0x404040, 0.4),
                Light::directional(0xffffff, 1.2, Vec3::new(0.0, 20.0, 5.0)),
                Light::directional(0x6699ff, 0.6, Vec3::new(-15.0, 10.0, -5.0)),
            ],
            camera: CameraRigConfig::default(),
            background: Background::default(),
            bloom: None,
            texture_size: TEXTURE_SIZE,
            seed: None,
        }
    }

    /// Three layers of snow-capped cones, falling snow, scroll parallax.
    pub fn parallax_range() -> Self {
        // (radius, height, position, yaw as a fraction of PI, layer)
        let layout: [(f32, f32, Vec3, f32, u32); 6] = [
            (15.0, 20.0, Vec3::new(-25.0, -5.0, -40.0), 0.1, 2),
            (12.0, 18.0, Vec3::new(20.0, -6.0, -35.0), -0.2, 2),
            (20.0, 25.0, Vec3::new(-15.0, -3.0, -25.0), 0.15, 1),
            (18.0, 28.0, Vec3::new(25.0, -4.0, -30.0), -0.1, 1),
            (25.0, 35.0, Vec3::new(-10.0, 0.0, -15.0), 0.05, 0),
            (30.0, 40.0, Vec3::new(15.0, -2.0, -20.0), -0.08, 0),
        ];
        let peaks = layout
            .iter()
            .map(|&(radius, height, position, yaw, layer)| PeakConfig {
                shape: PeakShape::Cone,
                params: ShapeParams {
                    base_radius: radius,
                    height,
                    segments: 8,
                    style: ShapeStyle::Angular,
                    detail: None,
                },
                transform: Transform::from_position(position).with_rotation(Vec3::new(0.0, PI * yaw, 0.0)),
                layer,
                texture: Some(TextureStyle::snowcap()),
                material: MaterialParams {
                    opacity: 0.9,
                    ..MaterialParams::default()
                },
            })
            .collect();

        Self {
            peaks,
            group: GroupConfig::default(),
            idle: IdleMotion {
                sway: 0.01,
                sway_freq: 1.0,
                phase_step: 1.0,
                ..IdleMotion::STILL
            },
            parallax: Parallax {
                lift_per_layer: 0.5,
                zoom: 0.1,
            },
            pointer_rotation: PointerRotationConfig::NONE,
            particles: vec![ParticleSpec::snowfall(300)],
            lights: vec![
                Light::ambient(0x404080, 0.4),
                Light::directional(0xffffff, 1.2, Vec3::new(10.0, 20.0, 5.0)),
                Light::directional(0x87ceeb, 0.6, Vec3::new(-15.0, 10.0, 10.0)),
                Light::directional(0xffa500, 0.4, Vec3::new(15.0, 8.0, 5.0)),
            ],
            camera: CameraRigConfig {
                eye: Vec3::new(0.0, 5.0, 10.0),
                look_at: Vec3::new(0.0, 0.0, -20.0),
                pointer_sway: Vec2::new(0.5, 0.25),
                scroll_shift: Vec3::new(0.0, 1.0, 2.0),
                scroll_look_shift: Vec3::new(0.0, -1.0, 0.0),
                smoothing: Vec3::splat(0.05),
                look_smoothing: 0.05,
                ..CameraRigConfig::default()
            },
            background: Background {
                top: Rgb::from_hex(0x1e3a5f),
                bottom: Rgb::from_hex(0x87a8c8),
                opacity: 1.0,
            },
            bloom: None,
            texture_size: TEXTURE_SIZE,
            seed: None,
        }
    }

    /// Carved sandstone pyramid in a golden particle shell with bloom.
    pub fn ancient_pyramid() -> Self {
        let gold = Rgb::from_hex(0xffd700);
        let golden_palette = WeightedPalette {
            entries: smallvec![
                PaletteEntry { color: gold, weight: 0.60 },
                PaletteEntry { color: Rgb::from_hex(0xffa500), weight: 0.25 },
                PaletteEntry { color: Rgb::from_hex(0xff6b35), weight: 0.15 },
            ],
        };
        Self {
            peaks: vec![PeakConfig {
                shape: PeakShape::Cone,
                params: ShapeParams {
                    base_radius: 3.0,
                    height: 4.0,
                    segments: 4,
                    style: ShapeStyle::Angular,
                    detail: Some(0.02),
                },
                transform: Transform::IDENTITY,
                layer: 0,
                texture: Some(TextureStyle::sandstone()),
                material: MaterialParams {
                    emissive: Rgb::from_hex(0x2a1f0f),
                    emissive_intensity: 0.1,
                    shininess: 10.0,
                    ..MaterialParams::default()
                },
            }],
            group: GroupConfig {
                transform: Transform::IDENTITY,
                idle: IdleMotion {
                    bob: 0.3,
                    bob_freq: 0.5,
                    spin: 0.2,
                    tilt: 0.1,
                    tilt_freq: 0.3,
                    pulse: 0.05,
                    pulse_freq: 2.0,
                    ..IdleMotion::STILL
                },
            },
            idle: IdleMotion::STILL,
            parallax: Parallax::default(),
            pointer_rotation: PointerRotationConfig::NONE,
            particles: vec![
                ParticleSpec {
                    capacity: 300,
                    center: Vec3::ZERO,
                    distribution: Distribution::Shell {
                        inner_radius: 8.0,
                        outer_radius: 12.0,
                    },
                    velocity: VelocityRange::ZERO,
                    motion: ParticleMotion::Bob {
                        amplitude: 0.06,
                        frequency: 1.0,
                    },
                    palette: golden_palette,
                    size: 0.05,
                    opacity: 0.8,
                    spin: Vec3::new(0.0, 0.1, 0.0),
                    additive: true,
                },
                ParticleSpec {
                    capacity: 50,
                    center: Vec3::ZERO,
                    distribution: Distribution::Box {
                        half_extents: Vec3::splat(10.0),
                    },
                    velocity: VelocityRange::ZERO,
                    motion: ParticleMotion::Bob {
                        amplitude: 0.3,
                        frequency: 0.3 * PI,
                    },
                    palette: WeightedPalette::single(gold),
                    size: 0.15,
                    opacity: 1.0,
                    spin: Vec3::ZERO,
                    additive: true,
                },
                ParticleSpec {
                    distribution: Distribution::Shell {
                        inner_radius: 50.0,
                        outer_radius: 100.0,
                    },
                    spin: Vec3::new(0.0, 0.01, 0.0),
                    ..ParticleSpec::stars(2000, 0.0)
                },
            ],
            lights: vec![
                Light::ambient(0x4a3b2a, 0.3),
                Light::Directional {
                    color: gold,
                    intensity: 1.0,
                    position: Vec3::new(5.0, 10.0, 5.0),
                    orbit: Some(LightOrbit {
                        radius: 5.0,
                        speed: 0.5,
                    }),
                },
                Light::Point {
                    color: Rgb::from_hex(0xff6b35),
                    intensity: 0.5,
                    position: Vec3::new(-5.0, 5.0, -5.0),
                    range: 25.0,
                },
                Light::Point {
                    color: gold,
                    intensity: 0.8,
                    position: Vec3::new(0.0, 15.0, 0.0),
                    range: 30.0,
                },
            ],
            camera: CameraRigConfig {
                eye: Vec3::new(0.0, 5.0, 8.0),
                look_at: Vec3::ZERO,
                pointer_sway: Vec2::new(2.0, 2.0),
                smoothing: Vec3::splat(0.02),
                look_smoothing: 0.02,
                ..CameraRigConfig::default()
            },
            background: Background {
                top: Rgb::from_hex(0x0d0a06),
                bottom: Rgb::from_hex(0x2b1f12),
                opacity: 1.0,
            },
            bloom: Some(BloomSettings::default()),
            texture_size: TEXTURE_SIZE,
            seed: None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        let bad = |msg: String| -> Result<()> { Err(HeroError::InvalidConfig(msg)) };
        if self.texture_size == 0 || self.texture_size > TEXTURE_SIZE_MAX {
            return bad(format!(
                "texture_size {} outside 1..={TEXTURE_SIZE_MAX}",
                self.texture_size
            ));
        }
        for (i, peak) in self.peaks.iter().enumerate() {
            let p = &peak.params;
            if !(p.base_radius > 0.0 && p.height > 0.0) {
                return bad(format!("peak {i}: radius and height must be positive"));
            }
            if p.segments < 3 {
                return bad(format!("peak {i}: at least 3 segments required"));
            }
            if let Some(d) = p.detail {
                if !(0.0..=0.5).contains(&d) {
                    return bad(format!("peak {i}: detail {d} outside 0..=0.5"));
                }
            }
            if !(0.0..=1.0).contains(&peak.material.opacity) {
                return bad(format!("peak {i}: opacity outside 0..=1"));
            }
            if let Some(style) = &peak.texture {
                style
                    .validate()
                    .or_else(|e| bad(format!("peak {i} texture: {e}")))?;
            }
        }
        for (i, spec) in self.particles.iter().enumerate() {
            spec.validate()
                .or_else(|e| bad(format!("particle field {i}: {e}")))?;
        }
        if self.lights.len() > MAX_LIGHTS {
            return bad(format!(
                "{} lights configured, at most {MAX_LIGHTS} supported",
                self.lights.len()
            ));
        }
        let cam = &self.camera;
        if !(cam.fov_y_deg > 0.0 && cam.fov_y_deg < 180.0) {
            return bad(format!("camera fov {} outside (0, 180)", cam.fov_y_deg));
        }
        let ks = [
            cam.smoothing.x,
            cam.smoothing.y,
            cam.smoothing.z,
            cam.look_smoothing,
            self.pointer_rotation.k_yaw,
            self.pointer_rotation.k_pitch,
        ];
        if ks.iter().any(|k| !(0.0..1.0).contains(k)) {
            return bad("smoothing factors must lie in [0, 1)".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_validate() {
        for name in HeroConfig::PRESETS {
            HeroConfig::preset(name).unwrap().validate().unwrap();
        }
        assert!(HeroConfig::preset("volcano").is_err());
    }

    #[test]
    fn json_overrides_fall_back_to_defaults() {
        let cfg = HeroConfig::from_json(r##"{"texture_size": 256, "background": {"top": "#000000"}}"##)
            .unwrap();
        assert_eq!(cfg.texture_size, 256);
        assert_eq!(cfg.background.top, Rgb::BLACK);
        assert_eq!(cfg.peaks.len(), 1);
    }
}
