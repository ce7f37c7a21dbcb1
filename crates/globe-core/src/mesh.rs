//! Procedural meshes: the globe's UV sphere and the default marker pin.

use glam::Vec3;
use std::f32::consts::{PI, TAU};

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
    pub tangent: [f32; 4],
}

#[derive(Clone, Debug, Default)]
pub struct MeshData {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Largest vertex distance from the local origin.
    pub fn bounding_radius(&self) -> f32 {
        self.vertices
            .iter()
            .map(|v| Vec3::from(v.position).length())
            .fold(0.0, f32::max)
    }
}

/// UV sphere with `(width + 1) * (height + 1)` vertices and CCW outward faces.
///
/// The seam duplicates the first column so texture coordinates wrap cleanly;
/// the pole rows emit a single triangle per segment.
pub fn uv_sphere(radius: f32, width_segments: u32, height_segments: u32) -> MeshData {
    let width = width_segments.max(3);
    let height = height_segments.max(2);
    let mut vertices = Vec::with_capacity(((width + 1) * (height + 1)) as usize);
    for iy in 0..=height {
        let v = iy as f32 / height as f32;
        let theta = v * PI;
        let (sin_t, cos_t) = theta.sin_cos();
        for ix in 0..=width {
            let u = ix as f32 / width as f32;
            let phi = u * TAU;
            let (sin_p, cos_p) = phi.sin_cos();
            let normal = Vec3::new(-cos_p * sin_t, cos_t, sin_p * sin_t);
            let tangent = Vec3::new(sin_p, 0.0, cos_p);
            vertices.push(MeshVertex {
                position: (normal * radius).to_array(),
                normal: normal.to_array(),
                uv: [u, 1.0 - v],
                tangent: [tangent.x, tangent.y, tangent.z, 1.0],
            });
        }
    }

    let row = width + 1;
    let mut indices = Vec::with_capacity((width * height * 6) as usize);
    for iy in 0..height {
        for ix in 0..width {
            let a = iy * row + ix + 1;
            let b = iy * row + ix;
            let c = (iy + 1) * row + ix;
            let d = (iy + 1) * row + ix + 1;
            if iy != 0 {
                indices.extend_from_slice(&[a, b, d]);
            }
            if iy != height - 1 {
                indices.extend_from_slice(&[b, c, d]);
            }
        }
    }
    MeshData { vertices, indices }
}

/// Elongated octahedron pointing along +Z with flat-shaded faces.
///
/// Unit length along Z, half-width 0.35; scaled per instance by the scene.
pub fn marker_pin() -> MeshData {
    let tip = Vec3::new(0.0, 0.0, 1.0);
    let tail = Vec3::new(0.0, 0.0, -0.4);
    let ring = [
        Vec3::new(0.35, 0.0, 0.0),
        Vec3::new(0.0, 0.35, 0.0),
        Vec3::new(-0.35, 0.0, 0.0),
        Vec3::new(0.0, -0.35, 0.0),
    ];
    let mut mesh = MeshData::default();
    for i in 0..ring.len() {
        let r0 = ring[i];
        let r1 = ring[(i + 1) % ring.len()];
        push_flat_triangle(&mut mesh, r0, r1, tip);
        push_flat_triangle(&mut mesh, r1, r0, tail);
    }
    mesh
}

fn push_flat_triangle(mesh: &mut MeshData, a: Vec3, b: Vec3, c: Vec3) {
    let normal = (b - a).cross(c - a).normalize_or_zero();
    let tangent = (b - a).normalize_or_zero();
    let base = mesh.vertices.len() as u32;
    for (p, uv) in [(a, [0.0, 0.0]), (b, [1.0, 0.0]), (c, [0.5, 1.0])] {
        mesh.vertices.push(MeshVertex {
            position: p.to_array(),
            normal: normal.to_array(),
            uv,
            tangent: [tangent.x, tangent.y, tangent.z, 1.0],
        });
    }
    mesh.indices.extend_from_slice(&[base, base + 1, base + 2]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sphere_counts_match_segments() {
        let m = uv_sphere(1.0, 64, 64);
        assert_eq!(m.vertices.len(), 65 * 65);
        // Pole rows contribute one triangle per segment, the rest two.
        assert_eq!(m.triangle_count(), 64 * 62 * 2 + 64 * 2);
        assert!((m.bounding_radius() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn sphere_faces_point_outward() {
        let m = uv_sphere(2.0, 16, 8);
        for tri in m.indices.chunks_exact(3) {
            let [a, b, c] =
                [tri[0], tri[1], tri[2]].map(|i| Vec3::from(m.vertices[i as usize].position));
            let n = (b - a).cross(c - a);
            let centroid = (a + b + c) / 3.0;
            assert!(n.dot(centroid) > 0.0);
        }
    }

    #[test]
    fn pin_is_closed_and_flat_shaded() {
        let m = marker_pin();
        assert_eq!(m.triangle_count(), 8);
        assert_eq!(m.vertices.len(), 24);
        for tri in m.indices.chunks_exact(3) {
            let n = Vec3::from(m.vertices[tri[0] as usize].normal);
            let centroid: Vec3 = tri
                .iter()
                .map(|&i| Vec3::from(m.vertices[i as usize].position))
                .sum::<Vec3>()
                / 3.0;
            assert!(n.dot(centroid) > 0.0);
        }
    }
}
