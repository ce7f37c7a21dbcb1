//! Screen-space picking: pointer coordinate to world ray to nearest hit.
//!
//! Every call is a pure function of camera, viewport and candidates; there is
//! no raycaster object carrying configuration between calls.

use crate::camera::{Camera, Viewport};
use crate::scene::NodeId;
use glam::Vec3;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit direction.
    pub dir: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, dir: Vec3) -> Self {
        Self { origin, dir }
    }

    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.dir * t
    }
}

/// Bounding sphere of one pickable scene node, in world space.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PickCandidate {
    pub node: NodeId,
    pub center: Vec3,
    pub radius: f32,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PickHit {
    pub node: NodeId,
    /// Ray parameter of the entry point.
    pub t: f32,
    pub point: Vec3,
}

/// Smallest non-negative ray parameter at which `ray_dir` (unit) meets the sphere.
///
/// A ray starting inside the sphere reports its exit point.
#[inline]
pub fn ray_sphere(ray_origin: Vec3, ray_dir: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    let oc = ray_origin - center;
    let b = oc.dot(ray_dir);
    let c = oc.dot(oc) - radius * radius;
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let s = disc.sqrt();
    let t_near = -b - s;
    if t_near >= 0.0 {
        return Some(t_near);
    }
    let t_far = -b + s;
    (t_far >= 0.0).then_some(t_far)
}

/// Nearest intersection among `candidates`, tested in scene order.
///
/// Equal distances keep the earlier candidate.
pub fn pick_nearest(ray: &Ray, candidates: &[PickCandidate]) -> Option<PickHit> {
    let mut best: Option<PickHit> = None;
    for c in candidates {
        let Some(t) = ray_sphere(ray.origin, ray.dir, c.center, c.radius) else {
            continue;
        };
        match best {
            Some(b) if t >= b.t => {}
            _ => {
                best = Some(PickHit {
                    node: c.node,
                    t,
                    point: ray.at(t),
                })
            }
        }
    }
    best
}

/// Resolve a pointer position (CSS pixels) to the nearest candidate hit.
pub fn pick(
    screen_x: f32,
    screen_y: f32,
    viewport: &Viewport,
    camera: &Camera,
    candidates: &[PickCandidate],
) -> Option<PickHit> {
    if candidates.is_empty() {
        return None;
    }
    let ray = camera.screen_ray(screen_x, screen_y, viewport)?;
    pick_nearest(&ray, candidates)
}
