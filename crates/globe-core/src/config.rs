//! Per-mount parameters, defaulting to the values in `constants.rs`.

use crate::constants::*;
use crate::scene::{LightKind, LightState};
use glam::Vec3;

/// Which interaction behaviors a mounted globe exposes.
///
/// The presets correspond to the plain spinning globe, a globe that can be
/// dragged, and a globe whose markers can also be picked.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Capabilities {
    pub auto_rotate: bool,
    pub drag_rotate: bool,
    pub pick: bool,
}

impl Capabilities {
    pub const PLAIN_ROTATION: Self = Self {
        auto_rotate: true,
        drag_rotate: false,
        pick: false,
    };
    pub const DRAG_ROTATION: Self = Self {
        auto_rotate: true,
        drag_rotate: true,
        pick: false,
    };
    pub const PICK_AND_DRAG: Self = Self {
        auto_rotate: true,
        drag_rotate: true,
        pick: true,
    };
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::PICK_AND_DRAG
    }
}

/// Physically-based surface constants for the globe.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StandardMaterial {
    pub color: [f32; 3],
    pub metalness: f32,
    pub roughness: f32,
}

impl Default for StandardMaterial {
    fn default() -> Self {
        Self {
            color: GLOBE_COLOR,
            metalness: GLOBE_METALNESS,
            roughness: GLOBE_ROUGHNESS,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct GlobeConfig {
    pub sphere_radius: f32,
    pub sphere_segments: u32,
    pub camera_fov_deg: f32,
    pub camera_z: f32,
    pub drag_sensitivity: f32,
    pub damping_tau_sec: f32,
    pub spin_speed: f32,
    pub max_frame_dt_sec: f32,
    pub marker_scale: f32,
    pub marker_pick_radius: f32,
    pub marker_look_at: Vec3,
    pub material: StandardMaterial,
    pub lights: Vec<LightState>,
    pub capabilities: Capabilities,
}

impl Default for GlobeConfig {
    fn default() -> Self {
        Self {
            sphere_radius: SPHERE_RADIUS,
            sphere_segments: SPHERE_SEGMENTS,
            camera_fov_deg: CAMERA_FOV_DEG,
            camera_z: CAMERA_Z,
            drag_sensitivity: DRAG_SENSITIVITY,
            damping_tau_sec: ROTATION_DAMPING_TAU_SEC,
            spin_speed: IDLE_SPIN_SPEED,
            max_frame_dt_sec: MAX_FRAME_DT_SEC,
            marker_scale: MARKER_SCALE,
            marker_pick_radius: MARKER_PICK_RADIUS,
            marker_look_at: MARKER_LOOK_AT,
            material: StandardMaterial::default(),
            lights: default_lights(),
            capabilities: Capabilities::default(),
        }
    }
}

impl GlobeConfig {
    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }
}

/// One white point light up and to the right of the camera plus a dim blue ambient fill.
pub fn default_lights() -> Vec<LightState> {
    vec![
        LightState {
            name: "point".into(),
            kind: LightKind::Point,
            color: POINT_LIGHT_COLOR,
            intensity: POINT_LIGHT_INTENSITY,
            position: POINT_LIGHT_POSITION,
        },
        LightState {
            name: "ambient".into(),
            kind: LightKind::Ambient,
            color: AMBIENT_LIGHT_COLOR,
            intensity: AMBIENT_LIGHT_INTENSITY,
            position: Vec3::ZERO,
        },
    ]
}
