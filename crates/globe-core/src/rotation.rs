//! Drag-to-rotate state machine with damping and idle auto-rotation.
//!
//! Rotation is kept as `(x, y)` Euler angles in radians: `x` tilts the globe
//! around the screen's horizontal axis, `y` spins it around world up.

use crate::config::GlobeConfig;
use glam::{Quat, Vec2};

/// One drag gesture, alive between press and release.
///
/// Moves are always applied relative to the values captured here, never to
/// the previous move, so rounding cannot accumulate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerSession {
    pub baseline_x: f32,
    pub baseline_y: f32,
    pub press_x: f32,
    pub press_y: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DragState {
    Idle,
    Dragging(PointerSession),
}

#[derive(Clone, Debug)]
pub struct RotationController {
    state: DragState,
    baseline: Vec2,
    target: Vec2,
    displayed: Vec2,
    pub sensitivity: f32,
    pub damping_tau_sec: f32,
    pub spin_speed: f32,
}

impl RotationController {
    pub fn new(sensitivity: f32, damping_tau_sec: f32, spin_speed: f32) -> Self {
        Self {
            state: DragState::Idle,
            baseline: Vec2::ZERO,
            target: Vec2::ZERO,
            displayed: Vec2::ZERO,
            sensitivity,
            damping_tau_sec,
            spin_speed,
        }
    }

    pub fn from_config(config: &GlobeConfig) -> Self {
        Self::new(
            config.drag_sensitivity,
            config.damping_tau_sec,
            config.spin_speed,
        )
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    pub fn session(&self) -> Option<&PointerSession> {
        match &self.state {
            DragState::Dragging(s) => Some(s),
            DragState::Idle => None,
        }
    }

    /// Rotation the globe is heading toward (exact, undamped).
    pub fn target(&self) -> Vec2 {
        self.target
    }

    /// Rotation currently on screen.
    pub fn displayed(&self) -> Vec2 {
        self.displayed
    }

    pub fn baseline(&self) -> Vec2 {
        self.baseline
    }

    /// Jump to `rotation` without easing; any active drag is re-anchored to it.
    pub fn set_rotation(&mut self, rotation: Vec2) {
        self.baseline = rotation;
        self.target = rotation;
        self.displayed = rotation;
        if let DragState::Dragging(s) = &mut self.state {
            s.baseline_x = rotation.x;
            s.baseline_y = rotation.y;
        }
    }

    /// Begin a drag at `(x, y)`, snapshotting the current rotation as baseline.
    pub fn press(&mut self, x: f32, y: f32) {
        self.baseline = self.target;
        self.state = DragState::Dragging(PointerSession {
            baseline_x: self.baseline.x,
            baseline_y: self.baseline.y,
            press_x: x,
            press_y: y,
        });
    }

    /// Update the rotation for a pointer at `(x, y)`. Returns `false` when idle.
    pub fn drag_to(&mut self, x: f32, y: f32) -> bool {
        let DragState::Dragging(s) = self.state else {
            return false;
        };
        let delta_x = (x - s.press_x) * self.sensitivity;
        let delta_y = (y - s.press_y) * self.sensitivity;
        self.target = Vec2::new(s.baseline_x + delta_y, s.baseline_y + delta_x);
        true
    }

    /// End the drag; the next one continues from the rotation reached here.
    pub fn release(&mut self) {
        if self.is_dragging() {
            self.baseline = self.target;
            self.state = DragState::Idle;
        }
    }

    /// Advance by `dt_sec` of wall-clock time: idle spin (when allowed and not
    /// dragging) followed by easing of the displayed rotation.
    pub fn advance(&mut self, dt_sec: f32, auto_rotate: bool) {
        let dt = dt_sec.max(0.0);
        if auto_rotate && !self.is_dragging() {
            self.baseline.y += self.spin_speed * dt;
            self.target = self.baseline;
        }
        if self.damping_tau_sec <= 0.0 {
            self.displayed = self.target;
        } else {
            let alpha = 1.0 - (-dt / self.damping_tau_sec).exp();
            self.displayed += (self.target - self.displayed) * alpha;
        }
    }

    /// Displayed rotation as a quaternion (tilt applied after spin).
    pub fn quat(&self) -> Quat {
        rotation_quat(self.displayed)
    }
}

#[inline]
pub fn rotation_quat(rotation: Vec2) -> Quat {
    Quat::from_rotation_x(rotation.x) * Quat::from_rotation_y(rotation.y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_tau_snaps() {
        let mut r = RotationController::new(0.01, 0.0, 0.0);
        r.press(0.0, 0.0);
        r.drag_to(10.0, 0.0);
        r.advance(0.016, false);
        assert_eq!(r.displayed(), r.target());
    }

    #[test]
    fn damping_converges_without_overshoot() {
        let mut r = RotationController::new(0.01, 0.1, 0.0);
        r.set_rotation(Vec2::ZERO);
        r.press(0.0, 0.0);
        r.drag_to(100.0, 0.0);
        let mut prev = 0.0;
        for _ in 0..120 {
            r.advance(1.0 / 60.0, false);
            let y = r.displayed().y;
            assert!(y >= prev && y <= 1.0 + 1e-6);
            prev = y;
        }
        assert!((prev - 1.0).abs() < 1e-3);
    }
}
