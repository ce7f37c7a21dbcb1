//! Camera and viewport math shared by picking and rendering.

use crate::constants::{CAMERA_FOV_DEG, CAMERA_Z, CAMERA_ZFAR, CAMERA_ZNEAR, MAX_PIXEL_RATIO};
use crate::picking::Ray;
use glam::{Mat4, Vec2, Vec3, Vec4};

/// Output size in CSS (logical) pixels plus the clamped device pixel ratio.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub pixel_ratio: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1.0,
            height: 1.0,
            pixel_ratio: 1.0,
        }
    }
}

impl Viewport {
    /// Build from a window resize signal (`innerWidth`, `innerHeight`, `devicePixelRatio`).
    pub fn from_window(inner_width: f64, inner_height: f64, device_pixel_ratio: f64) -> Self {
        Self {
            width: inner_width.max(0.0) as f32,
            height: inner_height.max(0.0) as f32,
            pixel_ratio: clamp_pixel_ratio(device_pixel_ratio),
        }
    }

    /// Width over height, with the height clamped to at least one unit.
    #[inline]
    pub fn aspect(&self) -> f32 {
        self.width / self.height.max(1.0)
    }

    /// Backing-store size in physical pixels. Either side may be zero.
    pub fn physical_size(&self) -> (u32, u32) {
        let w = (self.width as f64 * self.pixel_ratio).round() as u32;
        let h = (self.height as f64 * self.pixel_ratio).round() as u32;
        (w, h)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Clamp a device pixel ratio to `(0, MAX_PIXEL_RATIO]`, falling back to 1.
#[inline]
pub fn clamp_pixel_ratio(device_pixel_ratio: f64) -> f64 {
    if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
        device_pixel_ratio.min(MAX_PIXEL_RATIO)
    } else {
        1.0
    }
}

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

impl Default for Camera {
    fn default() -> Self {
        Self::looking_at_origin(CAMERA_FOV_DEG, CAMERA_Z, 1.0)
    }
}

impl Camera {
    /// Camera on +Z at `eye_z`, looking at the origin with Y up.
    pub fn looking_at_origin(fov_deg: f32, eye_z: f32, aspect: f32) -> Self {
        Self {
            eye: Vec3::new(0.0, 0.0, eye_z),
            target: Vec3::ZERO,
            up: Vec3::Y,
            aspect,
            fovy_radians: fov_deg.to_radians(),
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

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Recompute the aspect ratio for a new viewport.
    pub fn set_viewport(&mut self, viewport: &Viewport) {
        self.aspect = viewport.aspect();
    }

    /// Compute a world-space ray through a viewport point given in CSS pixels.
    ///
    /// The point is normalized to \[-1, 1\] on both axes with Y inverted, then
    /// unprojected onto the far plane. Returns `None` for an empty viewport.
    pub fn screen_ray(&self, sx: f32, sy: f32, viewport: &Viewport) -> Option<Ray> {
        if viewport.is_empty() {
            return None;
        }
        let ndc_x = (2.0 * sx / viewport.width) - 1.0;
        let ndc_y = 1.0 - (2.0 * sy / viewport.height);
        let inv = self.view_projection().inverse();
        let p_far = inv * Vec4::new(ndc_x, ndc_y, 1.0, 1.0);
        if p_far.w.abs() <= f32::EPSILON {
            return None;
        }
        let p1: Vec3 = p_far.truncate() / p_far.w;
        let dir = (p1 - self.eye).try_normalize()?;
        Some(Ray::new(self.eye, dir))
    }

    /// Project a world point into viewport CSS pixels; `None` when behind the eye.
    pub fn project(&self, world: Vec3, viewport: &Viewport) -> Option<Vec2> {
        let clip = self.view_projection() * world.extend(1.0);
        if clip.w <= f32::EPSILON {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        Some(Vec2::new(
            (ndc.x + 1.0) * 0.5 * viewport.width,
            (1.0 - ndc.y) * 0.5 * viewport.height,
        ))
    }
}
