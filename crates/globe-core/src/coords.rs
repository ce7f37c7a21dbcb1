//! Spherical to Cartesian marker placement.

use glam::Vec3;

/// Place a point on a sphere of `radius` at the given latitude/longitude (degrees).
///
/// Y is up; longitude 0 lies on +X and increases toward +Z. A zero radius
/// collapses every input to the origin.
#[inline]
pub fn place(latitude_deg: f32, longitude_deg: f32, radius: f32) -> Vec3 {
    let lat = latitude_deg.to_radians();
    let lng = longitude_deg.to_radians();
    let (sin_lat, cos_lat) = lat.sin_cos();
    let (sin_lng, cos_lng) = lng.sin_cos();
    Vec3::new(
        radius * cos_lat * cos_lng,
        radius * sin_lat,
        radius * cos_lat * sin_lng,
    )
}

/// Inverse of [`place`]: returns `(latitude_deg, longitude_deg, radius)`.
///
/// The origin maps to `(0, 0, 0)`.
pub fn latitude_longitude(p: Vec3) -> (f32, f32, f32) {
    let radius = p.length();
    if radius <= f32::EPSILON {
        return (0.0, 0.0, 0.0);
    }
    let lat = (p.y / radius).clamp(-1.0, 1.0).asin();
    let lng = p.z.atan2(p.x);
    (lat.to_degrees(), lng.to_degrees(), radius)
}
