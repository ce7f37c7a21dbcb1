// Host-side tests for marker placement on the sphere.

mod common;

use common::*;
use globe_core::{latitude_longitude, place};
use glam::Vec3;

#[test]
fn placed_points_lie_on_the_sphere() {
    for &r in &[0.5f32, 1.0, 1.05, 3.0] {
        for lat in (-90..=90).step_by(15) {
            for lng in (-180..=180).step_by(20) {
                let p = place(lat as f32, lng as f32, r);
                assert!(
                    (p.length_squared() - r * r).abs() < 1e-4,
                    "lat={} lng={} r={} -> {:?}",
                    lat,
                    lng,
                    r,
                    p
                );
            }
        }
    }
}

#[test]
fn cardinal_points() {
    let r = 2.0;
    assert!((place(0.0, 0.0, r) - Vec3::new(r, 0.0, 0.0)).length() < EPS);
    assert!((place(90.0, 0.0, r) - Vec3::new(0.0, r, 0.0)).length() < EPS);
    assert!((place(-90.0, 0.0, r) - Vec3::new(0.0, -r, 0.0)).length() < EPS);
    assert!((place(0.0, 90.0, r) - Vec3::new(0.0, 0.0, r)).length() < EPS);
}

#[test]
fn zero_radius_collapses_to_origin() {
    assert_eq!(place(45.0, 20.0, 0.0), Vec3::ZERO);
    assert_eq!(place(-30.0, 135.0, 0.0), Vec3::ZERO);
}

#[test]
fn inverse_recovers_marker_coordinates() {
    for &(lat, lng) in &[(45.0f32, 20.0f32), (-45.0, 90.0), (30.0, -20.0), (-30.0, 135.0)] {
        let (la, ln, r) = latitude_longitude(place(lat, lng, 1.05));
        assert!(approx(la, lat) && approx(ln, lng) && approx(r, 1.05));
    }
}
