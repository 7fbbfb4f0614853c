//! Scene assembly and the ordered per-tick update.

use crate::analytics::AnalyticsSink;
use crate::camera::{Camera, CameraRig, PointerRotation};
use crate::config::{Background, BloomSettings, HeroConfig, Light, PeakShape};
use crate::constants::MAX_FRAME_DT_SEC;
use crate::error::Result;
use crate::input::InputState;
use crate::mesh::{cone, low_poly_peak};
use crate::particles::ParticleField;
use crate::terrain::{TerrainGroup, TerrainObject};
use crate::texture::paint_surface;
use glam::Vec3;
use rand::Rng;

/// Root aggregate for one mounted hero instance.
///
/// Built once from a [`HeroConfig`]; afterwards only [`Scene::advance`]
/// mutates it.
#[derive(Clone, Debug)]
pub struct Scene {
    config: HeroConfig,
    camera: CameraRig,
    terrain: TerrainGroup,
    particles: Vec<ParticleField>,
    pointer: PointerRotation,
    elapsed: f32,
    frames: u64,
    surface: (u32, u32),
}

impl Scene {
    pub fn build(config: &HeroConfig, rng: &mut impl Rng) -> Result<Self> {
        config.validate()?;

        let objects = config
            .peaks
            .iter()
            .enumerate()
            .map(|(i, peak)| {
                let mesh = match &peak.shape {
                    PeakShape::Cone => cone(&peak.params, rng),
                    PeakShape::LowPoly { colors } => low_poly_peak(&peak.params, colors, rng),
                };
                let texture = peak
                    .texture
                    .as_ref()
                    .map(|style| paint_surface(style, config.texture_size, rng));
                TerrainObject::new(mesh, texture, peak.material, peak.transform, peak.layer, i)
            })
            .collect();
        let terrain = TerrainGroup::new(config.group.transform, config.group.idle, objects);

        let particles: Vec<ParticleField> = config
            .particles
            .iter()
            .map(|spec| ParticleField::generate(spec, rng))
            .collect();

        log::info!(
            "[scene] built: {} peaks, {} particle fields ({} points), {} lights",
            config.peaks.len(),
            particles.len(),
            particles.iter().map(ParticleField::len).sum::<usize>(),
            config.lights.len()
        );

        Ok(Self {
            camera: CameraRig::new(config.camera, 1, 1),
            config: config.clone(),
            terrain,
            particles,
            pointer: PointerRotation::default(),
            elapsed: 0.0,
            frames: 0,
            surface: (1, 1),
        })
    }

    /// One tick: particles, then terrain, then camera and pointer rotation.
    pub fn advance(&mut self, dt: f32, input: &InputState, rng: &mut impl Rng) {
        let dt = if dt.is_finite() {
            dt.clamp(0.0, MAX_FRAME_DT_SEC)
        } else {
            0.0
        };
        self.elapsed += dt;
        let t = self.elapsed;
        let progress = input.scroll_progress();

        for field in &mut self.particles {
            field.step(dt, t, rng);
        }

        self.terrain
            .animate(&self.config.idle, &self.config.parallax, t, progress);

        self.camera.step(input.pointer, progress, dt);
        let rotation = self
            .pointer
            .step(&self.config.pointer_rotation, input.pointer, dt);
        self.terrain.set_pointer_rotation(rotation);

        self.frames += 1;
    }

    /// Track the output surface size. Zero-sized surfaces are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.surface = (width, height);
        self.camera.resize(width, height);
    }

    /// Report that this scene went live on the page.
    pub fn report_mount(&self, sink: &mut dyn AnalyticsSink, label: &str, timestamp: &str) {
        let (width, height) = self.surface;
        let props = serde_json::json!({
            "scene": label,
            "peaks": self.config.peaks.len(),
            "particles": self.particles.iter().map(ParticleField::len).sum::<usize>(),
            "width": width,
            "height": height,
        });
        sink.track("hero_scene_mounted", Some(props), timestamp);
    }

    pub fn config(&self) -> &HeroConfig {
        &self.config
    }

    pub fn camera(&self) -> Camera {
        self.camera.camera()
    }

    pub fn camera_rig(&self) -> &CameraRig {
        &self.camera
    }

    pub fn terrain(&self) -> &TerrainGroup {
        &self.terrain
    }

    pub fn particles(&self) -> &[ParticleField] {
        &self.particles
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    pub fn surface_size(&self) -> (u32, u32) {
        self.surface
    }

    pub fn background(&self) -> &Background {
        &self.config.background
    }

    pub fn bloom(&self) -> Option<&BloomSettings> {
        self.config.bloom.as_ref()
    }

    /// Lights at the current time; orbiting lights resolved to a position.
    pub fn lights(&self) -> Vec<Light> {
        let t = self.elapsed;
        self.config
            .lights
            .iter()
            .map(|light| match *light {
                Light::Directional {
                    color,
                    intensity,
                    position,
                    orbit: Some(orbit),
                } => {
                    let angle = orbit.speed * t;
                    Light::Directional {
                        color,
                        intensity,
                        position: Vec3::new(
                            angle.sin() * orbit.radius,
                            position.y,
                            angle.cos() * orbit.radius,
                        ),
                        orbit: None,
                    }
                }
                other => other,
            })
            .collect()
    }
}
