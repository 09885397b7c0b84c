//! Camera, lighting, and capability state shared with the web frontend.
//!
//! These types intentionally avoid referencing platform-specific APIs and are
//! suitable for use on both native and web targets. During an AR session the
//! platform supplies per-view matrices; the `Camera` here describes the
//! inline (non-immersive) preview.

use crate::constants::{
    CAMERA_FOV_DEGREES, CAMERA_ZFAR, CAMERA_ZNEAR, HEMI_GROUND_COLOR, HEMI_INTENSITY,
    HEMI_SKY_COLOR,
};
use glam::{Mat4, Vec3};

/// Simple right-handed camera description with perspective projection.
#[derive(Clone, Debug)]
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
    /// Viewer camera with the fixed 70-degree field of view and the near/far
    /// planes the scene is tuned for.
    pub fn for_viewer(aspect: f32) -> Self {
        Self {
            eye: Vec3::ZERO,
            target: Vec3::NEG_Z,
            up: Vec3::Y,
            aspect,
            fovy_radians: CAMERA_FOV_DEGREES.to_radians(),
            znear: CAMERA_ZNEAR,
            zfar: CAMERA_ZFAR,
        }
    }

    /// Compute the clip-space projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }

    /// Compute the view matrix that transforms world to view space.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }
}

/// Sky/ground hemisphere light used to shade placed objects.
#[derive(Clone, Debug)]
pub struct HemisphereLight {
    pub sky_color: [f32; 3],
    pub ground_color: [f32; 3],
    pub intensity: f32,
}

impl Default for HemisphereLight {
    fn default() -> Self {
        Self {
            sky_color: HEMI_SKY_COLOR,
            ground_color: HEMI_GROUND_COLOR,
            intensity: HEMI_INTENSITY,
        }
    }
}

/// Result of the one-shot immersive-AR capability query.
///
/// Reported upward as a value, never an error: `Unknown` and `Unsupported`
/// both surface the advisory notice.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ArSupport {
    #[default]
    Unknown,
    Supported,
    Unsupported,
}

impl ArSupport {
    pub fn from_query(ok: bool) -> Self {
        if ok {
            ArSupport::Supported
        } else {
            ArSupport::Unsupported
        }
    }

    pub fn is_supported(&self) -> bool {
        matches!(self, ArSupport::Supported)
    }
}
