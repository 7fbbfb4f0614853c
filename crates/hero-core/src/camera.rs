//! Camera description and the smoothed rig that moves it.

use crate::constants::{CAMERA_FAR, CAMERA_NEAR, DEFAULT_FOV_Y_DEG, REFERENCE_FPS};
use glam::{Mat4, Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Simple right-handed camera description with perspective projection.
#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub aspect: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    /// Compute the clip-space projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }
    /// Compute the view matrix that transforms world to view space.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

/// Fraction of the remaining distance to cover this tick.
///
/// `k` is the per-frame factor at 60 Hz; longer or shorter frames scale it so
/// the motion depends on elapsed time rather than tick count.
pub fn smoothing_alpha(k: f32, dt: f32) -> f32 {
    if dt <= 0.0 {
        return 0.0;
    }
    let k = k.clamp(0.0, 1.0);
    1.0 - (1.0 - k).powf(dt * REFERENCE_FPS)
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraPose {
    pub eye: Vec3,
    pub look_at: Vec3,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraRigConfig {
    pub eye: Vec3,
    pub look_at: Vec3,
    pub fov_y_deg: f32,
    /// Eye displacement per unit of normalized pointer (x, y).
    pub pointer_sway: Vec2,
    /// Eye and look-at displacement at full scroll progress.
    pub scroll_shift: Vec3,
    pub scroll_look_shift: Vec3,
    /// Per-axis smoothing factor for the eye.
    pub smoothing: Vec3,
    pub look_smoothing: f32,
}

impl Default for CameraRigConfig {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 2.0, 8.0),
            look_at: Vec3::new(0.0, 0.0, -10.0),
            fov_y_deg: DEFAULT_FOV_Y_DEG,
            pointer_sway: Vec2::new(1.0, 0.5),
            scroll_shift: Vec3::ZERO,
            scroll_look_shift: Vec3::ZERO,
            smoothing: Vec3::new(0.05, 0.03, 0.05),
            look_smoothing: 0.05,
        }
    }
}

#[derive(Clone, Debug)]
pub struct CameraRig {
    config: CameraRigConfig,
    current: CameraPose,
    aspect: f32,
}

impl CameraRig {
    pub fn new(config: CameraRigConfig, width: u32, height: u32) -> Self {
        let mut rig = Self {
            current: CameraPose {
                eye: config.eye,
                look_at: config.look_at,
            },
            config,
            aspect: 1.0,
        };
        rig.resize(width, height);
        rig
    }

    pub fn config(&self) -> &CameraRigConfig {
        &self.config
    }

    pub fn pose(&self) -> CameraPose {
        self.current
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    /// Update the aspect ratio only; the pose is left alone.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.aspect = width as f32 / height as f32;
    }

    /// Where the camera wants to be for the given pointer and scroll progress.
    pub fn target_pose(&self, pointer: Vec2, progress: f32) -> CameraPose {
        let p = progress.clamp(0.0, 1.0);
        let sway = Vec3::new(
            pointer.x * self.config.pointer_sway.x,
            pointer.y * self.config.pointer_sway.y,
            0.0,
        );
        CameraPose {
            eye: self.config.eye + sway + self.config.scroll_shift * p,
            look_at: self.config.look_at + self.config.scroll_look_shift * p,
        }
    }

    pub fn step(&mut self, pointer: Vec2, progress: f32, dt: f32) {
        let target = self.target_pose(pointer, progress);
        let k = self.config.smoothing;
        let a = Vec3::new(
            smoothing_alpha(k.x, dt),
            smoothing_alpha(k.y, dt),
            smoothing_alpha(k.z, dt),
        );
        self.current.eye += (target.eye - self.current.eye) * a;
        let la = smoothing_alpha(self.config.look_smoothing, dt);
        self.current.look_at += (target.look_at - self.current.look_at) * la;
    }

    pub fn camera(&self) -> Camera {
        Camera {
            eye: self.current.eye,
            target: self.current.look_at,
            up: Vec3::Y,
            aspect: self.aspect,
            fovy_radians: self.config.fov_y_deg.to_radians(),
            znear: CAMERA_NEAR,
            zfar: CAMERA_FAR,
        }
    }
}

/// Pointer-driven rotation of the terrain group. Yaw follows pointer x, pitch
/// follows pointer y; each is a fraction of its range.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointerRotationConfig {
    pub yaw_range: f32,
    pub pitch_range: f32,
    pub k_yaw: f32,
    pub k_pitch: f32,
}

impl Default for PointerRotationConfig {
    fn default() -> Self {
        Self {
            yaw_range: std::f32::consts::TAU,
            pitch_range: std::f32::consts::FRAC_PI_2,
            k_yaw: 0.05,
            k_pitch: 0.03,
        }
    }
}

impl PointerRotationConfig {
    pub const NONE: PointerRotationConfig = PointerRotationConfig {
        yaw_range: 0.0,
        pitch_range: 0.0,
        k_yaw: 0.0,
        k_pitch: 0.0,
    };

    /// (pitch, yaw) the group should settle at for this pointer.
    pub fn target(&self, pointer: Vec2) -> Vec2 {
        Vec2::new(pointer.y * self.pitch_range, pointer.x * self.yaw_range)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerRotation {
    pub current: Vec2,
}

impl PointerRotation {
    pub fn step(&mut self, config: &PointerRotationConfig, pointer: Vec2, dt: f32) -> Vec2 {
        let target = config.target(pointer);
        let a = Vec2::new(
            smoothing_alpha(config.k_pitch, dt),
            smoothing_alpha(config.k_yaw, dt),
        );
        self.current += (target - self.current) * a;
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alpha_matches_k_at_reference_rate() {
        let a = smoothing_alpha(0.05, 1.0 / 60.0);
        assert!((a - 0.05).abs() < 1e-5);
        assert_eq!(smoothing_alpha(0.05, 0.0), 0.0);
    }

    #[test]
    fn two_half_frames_equal_one_full_frame() {
        let k = 0.08;
        let one = smoothing_alpha(k, 1.0 / 60.0);
        let half = smoothing_alpha(k, 1.0 / 120.0);
        let two = 1.0 - (1.0 - half) * (1.0 - half);
        assert!((one - two).abs() < 1e-5);
    }
}
