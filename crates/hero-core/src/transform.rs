//! Base transforms and the animation offsets composed on top of them.
//!
//! A [`Transform`] recorded at construction is never written again. Every
//! frame recomputes a [`TransformOffset`] from elapsed time, object index and
//! scroll progress, and the rendered transform is `base.compose(offset)`.

use glam::{EulerRot, Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Transform {
    pub position: Vec3,
    /// Euler angles in radians, applied in XYZ order.
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        position: Vec3::ZERO,
        rotation: Vec3::ZERO,
        scale: Vec3::ONE,
    };

    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::IDENTITY
        }
    }

    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = Vec3::splat(scale);
        self
    }

    pub fn matrix(&self) -> Mat4 {
        let q = Quat::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, self.rotation.z);
        Mat4::from_scale_rotation_translation(self.scale, q, self.position)
    }

    /// Apply an animation offset on top of this (base) transform.
    pub fn compose(&self, offset: &TransformOffset) -> Transform {
        Transform {
            position: self.position + offset.translation,
            rotation: self.rotation + offset.rotation,
            scale: self.scale * offset.scale,
        }
    }

    /// Undo [`Transform::compose`]: recover the base from a rendered transform.
    pub fn without(&self, offset: &TransformOffset) -> Transform {
        Transform {
            position: self.position - offset.translation,
            rotation: self.rotation - offset.rotation,
            scale: self.scale / offset.scale,
        }
    }

    pub fn abs_diff_eq(&self, other: &Transform, eps: f32) -> bool {
        self.position.abs_diff_eq(other.position, eps)
            && self.rotation.abs_diff_eq(other.rotation, eps)
            && self.scale.abs_diff_eq(other.scale, eps)
    }
}

/// Per-frame delta: additive translation and rotation, multiplicative scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransformOffset {
    pub translation: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for TransformOffset {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl TransformOffset {
    pub const IDENTITY: TransformOffset = TransformOffset {
        translation: Vec3::ZERO,
        rotation: Vec3::ZERO,
        scale: Vec3::ONE,
    };

    /// Stack two offsets; both are relative to the same base.
    pub fn then(&self, other: &TransformOffset) -> TransformOffset {
        TransformOffset {
            translation: self.translation + other.translation,
            rotation: self.rotation + other.rotation,
            scale: self.scale * other.scale,
        }
    }
}
