//! Terrain objects and the group that carries them.
//!
//! Each object records its base transform once, in [`TerrainObject::new`].
//! Animation never reads the previous frame's transform: idle motion and
//! scroll parallax are recomputed as a [`TransformOffset`] every tick and
//! composed onto the base.

use crate::color::Rgb;
use crate::mesh::MeshData;
use crate::texture::TextureImage;
use crate::transform::{Transform, TransformOffset};
use glam::{Mat4, Vec2, Vec3};
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

/// Continuous idle animation. Amplitudes are radians (rotations), world units
/// (bob) or a scale fraction (pulse); frequencies are radians per second.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdleMotion {
    pub sway: f32,
    pub sway_freq: f32,
    pub bob: f32,
    pub bob_freq: f32,
    /// Constant yaw rate in radians per second, wrapped to one turn.
    pub spin: f32,
    pub tilt: f32,
    pub tilt_freq: f32,
    pub pulse: f32,
    pub pulse_freq: f32,
    /// Phase added per object index so peers move out of sync.
    pub phase_step: f32,
}

impl IdleMotion {
    pub const STILL: IdleMotion = IdleMotion {
        sway: 0.0,
        sway_freq: 0.0,
        bob: 0.0,
        bob_freq: 0.0,
        spin: 0.0,
        tilt: 0.0,
        tilt_freq: 0.0,
        pulse: 0.0,
        pulse_freq: 0.0,
        phase_step: 0.0,
    };

    /// Largest |offset| this motion can produce, as (translation, rotation,
    /// scale deviation). Spin is bounded by a full turn.
    pub fn bounds(&self) -> (f32, f32, f32) {
        let spin = if self.spin != 0.0 { TAU } else { 0.0 };
        (
            self.bob.abs(),
            self.sway.abs() + self.tilt.abs() + spin,
            self.pulse.abs(),
        )
    }
}

pub fn idle_offset(motion: &IdleMotion, t: f32, index: usize) -> TransformOffset {
    let phase = index as f32 * motion.phase_step;
    let wave = |amp: f32, freq: f32| {
        if amp == 0.0 {
            0.0
        } else {
            amp * (freq * t + phase).sin()
        }
    };
    let spin = if motion.spin == 0.0 {
        0.0
    } else {
        (motion.spin * t).rem_euclid(TAU)
    };
    TransformOffset {
        translation: Vec3::new(0.0, wave(motion.bob, motion.bob_freq), 0.0),
        rotation: Vec3::new(
            wave(motion.tilt, motion.tilt_freq),
            wave(motion.sway, motion.sway_freq) + spin,
            0.0,
        ),
        scale: Vec3::splat(1.0 + wave(motion.pulse, motion.pulse_freq)),
    }
}

/// Scroll-driven depth effect: each layer rises by `lift_per_layer * (layer + 1)`
/// at full progress and every object grows by `zoom`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Parallax {
    pub lift_per_layer: f32,
    pub zoom: f32,
}

pub fn scroll_offset(parallax: &Parallax, progress: f32, layer: u32) -> TransformOffset {
    let p = progress.clamp(0.0, 1.0);
    TransformOffset {
        translation: Vec3::new(0.0, p * parallax.lift_per_layer * (layer + 1) as f32, 0.0),
        rotation: Vec3::ZERO,
        scale: Vec3::splat(1.0 + p * parallax.zoom),
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialParams {
    pub tint: Rgb,
    pub opacity: f32,
    pub emissive: Rgb,
    pub emissive_intensity: f32,
    pub vertex_colors: bool,
    pub shininess: f32,
}

impl Default for MaterialParams {
    fn default() -> Self {
        Self {
            tint: Rgb::WHITE,
            opacity: 1.0,
            emissive: Rgb::BLACK,
            emissive_intensity: 0.0,
            vertex_colors: false,
            shininess: 30.0,
        }
    }
}

#[derive(Clone, Debug)]
pub struct TerrainObject {
    base: Transform,
    offset: TransformOffset,
    pub mesh: MeshData,
    pub texture: Option<TextureImage>,
    pub material: MaterialParams,
    pub layer: u32,
    pub index: usize,
}

impl TerrainObject {
    pub fn new(
        mesh: MeshData,
        texture: Option<TextureImage>,
        material: MaterialParams,
        base: Transform,
        layer: u32,
        index: usize,
    ) -> Self {
        Self {
            base,
            offset: TransformOffset::IDENTITY,
            mesh,
            texture,
            material,
            layer,
            index,
        }
    }

    pub fn base(&self) -> &Transform {
        &self.base
    }

    pub fn offset(&self) -> &TransformOffset {
        &self.offset
    }

    /// Recompute this tick's offset from elapsed time and scroll progress.
    pub fn animate(&mut self, idle: &IdleMotion, parallax: &Parallax, t: f32, progress: f32) {
        self.offset = idle_offset(idle, t, self.index).then(&scroll_offset(parallax, progress, self.layer));
    }

    pub fn world_transform(&self) -> Transform {
        self.base.compose(&self.offset)
    }
}

/// Shared parent for all terrain objects. Carries its own idle motion and the
/// smoothed pointer rotation (x = pitch, y = yaw).
#[derive(Clone, Debug)]
pub struct TerrainGroup {
    base: Transform,
    idle: IdleMotion,
    offset: TransformOffset,
    pointer_rotation: Vec2,
    pub objects: Vec<TerrainObject>,
}

impl TerrainGroup {
    pub fn new(base: Transform, idle: IdleMotion, objects: Vec<TerrainObject>) -> Self {
        Self {
            base,
            idle,
            offset: TransformOffset::IDENTITY,
            pointer_rotation: Vec2::ZERO,
            objects,
        }
    }

    pub fn base(&self) -> &Transform {
        &self.base
    }

    pub fn offset(&self) -> TransformOffset {
        let pointer = TransformOffset {
            rotation: Vec3::new(self.pointer_rotation.x, self.pointer_rotation.y, 0.0),
            ..TransformOffset::IDENTITY
        };
        self.offset.then(&pointer)
    }

    pub fn pointer_rotation(&self) -> Vec2 {
        self.pointer_rotation
    }

    pub fn set_pointer_rotation(&mut self, rotation: Vec2) {
        self.pointer_rotation = rotation;
    }

    pub fn animate(&mut self, object_idle: &IdleMotion, parallax: &Parallax, t: f32, progress: f32) {
        self.offset = idle_offset(&self.idle, t, 0);
        for obj in &mut self.objects {
            obj.animate(object_idle, parallax, t, progress);
        }
    }

    pub fn world_transform(&self) -> Transform {
        self.base.compose(&self.offset())
    }

    /// Model matrix of every object, parent transform applied.
    pub fn model_matrices(&self) -> Vec<Mat4> {
        let parent = self.world_transform().matrix();
        self.objects
            .iter()
            .map(|o| parent * o.world_transform().matrix())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn peers_are_phase_shifted() {
        let idle = IdleMotion {
            sway: 0.1,
            sway_freq: 1.0,
            phase_step: 1.0,
            ..IdleMotion::STILL
        };
        let a = idle_offset(&idle, 0.5, 0);
        let b = idle_offset(&idle, 0.5, 1);
        assert!((a.rotation.y - b.rotation.y).abs() > 1e-3);
    }

    #[test]
    fn parallax_is_bounded_by_progress() {
        let p = Parallax {
            lift_per_layer: 0.5,
            zoom: 0.1,
        };
        let full = scroll_offset(&p, 5.0, 2);
        assert!((full.translation.y - 1.5).abs() < 1e-6);
        assert!((full.scale.x - 1.1).abs() < 1e-6);
    }
}
