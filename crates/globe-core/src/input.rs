//! Host-agnostic input events, in CSS/logical pixels relative to the canvas.

use crate::camera::Viewport;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerKind {
    Down,
    Up,
    Move,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub x: f32,
    pub y: f32,
}

impl PointerEvent {
    pub fn down(x: f32, y: f32) -> Self {
        Self {
            kind: PointerKind::Down,
            x,
            y,
        }
    }

    pub fn up(x: f32, y: f32) -> Self {
        Self {
            kind: PointerKind::Up,
            x,
            y,
        }
    }

    pub fn moved(x: f32, y: f32) -> Self {
        Self {
            kind: PointerKind::Move,
            x,
            y,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResizeEvent {
    pub inner_width: f64,
    pub inner_height: f64,
    pub device_pixel_ratio: f64,
}

impl ResizeEvent {
    pub fn viewport(&self) -> Viewport {
        Viewport::from_window(self.inner_width, self.inner_height, self.device_pixel_ratio)
    }
}
