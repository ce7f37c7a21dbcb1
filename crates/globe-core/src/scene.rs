//! Scene construction: globe root, lights, and camera-facing marker children.
//!
//! The scene owns [`SceneState`], the single source of truth for the globe
//! transform, lights and marker positions. Node transforms are derived from it
//! on demand, so edits made through the tuning bridge are visible on the next
//! frame without rebuilding anything.

use crate::camera::Camera;
use crate::config::{GlobeConfig, StandardMaterial};
use crate::constants::{DEFAULT_MARKERS, MARKER_RADIUS, MARKER_TINT};
use crate::coords;
use crate::error::AssetError;
use crate::mesh::{self, MeshData};
use crate::picking::PickCandidate;
use crate::render_loop::{FrameSnapshot, MarkerInstance};
use glam::{Mat4, Quat, Vec3};
use smallvec::SmallVec;

/// Handle of a node in the scene graph. The globe is always node 0.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    pub const GLOBE: NodeId = NodeId(0);
}

/// Marker description before placement.
#[derive(Clone, Debug, PartialEq)]
pub struct MarkerSpec {
    pub label: String,
    pub latitude: f32,
    pub longitude: f32,
    pub radius: f32,
}

impl MarkerSpec {
    pub fn new(label: impl Into<String>, latitude: f32, longitude: f32) -> Self {
        Self {
            label: label.into(),
            latitude,
            longitude,
            radius: MARKER_RADIUS,
        }
    }

    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }
}

pub fn default_markers() -> Vec<MarkerSpec> {
    DEFAULT_MARKERS
        .iter()
        .map(|&(lat, lng, label)| MarkerSpec::new(label, lat, lng))
        .collect()
}

/// A placed marker. `position` is globe-local and is the only field edited after creation.
#[derive(Clone, Debug, PartialEq)]
pub struct Marker {
    pub label: String,
    pub latitude: f32,
    pub longitude: f32,
    pub radius: f32,
    pub position: Vec3,
}

impl Marker {
    pub fn from_spec(spec: MarkerSpec) -> Self {
        let position = coords::place(spec.latitude, spec.longitude, spec.radius);
        Self {
            label: spec.label,
            latitude: spec.latitude,
            longitude: spec.longitude,
            radius: spec.radius,
            position,
        }
    }

    /// Local orientation turning the marker's +Z axis toward `anchor`.
    pub fn look_rotation(&self, anchor: Vec3) -> Quat {
        match (anchor - self.position).try_normalize() {
            Some(dir) => Quat::from_rotation_arc(Vec3::Z, dir),
            None => Quat::IDENTITY,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LightKind {
    Point,
    Ambient,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LightState {
    pub name: String,
    pub kind: LightKind,
    pub color: [f32; 3],
    pub intensity: f32,
    /// Ignored for ambient lights.
    pub position: Vec3,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SceneState {
    pub sphere_transform: Quat,
    pub lights: Vec<LightState>,
    pub markers: Vec<Marker>,
}

/// RGBA8 pixels of the globe's surface (base color / normal) texture.
#[derive(Clone, Debug, PartialEq)]
pub struct SurfaceTexture {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl SurfaceTexture {
    pub fn new(width: u32, height: u32, rgba: Vec<u8>) -> Result<Self, AssetError> {
        let expected = width as usize * height as usize * 4;
        if width == 0 || height == 0 || rgba.len() != expected {
            return Err(AssetError::TextureSize {
                width,
                height,
                expected,
                actual: rgba.len(),
            });
        }
        Ok(Self {
            width,
            height,
            rgba,
        })
    }
}

/// Mesh placed at every marker.
#[derive(Clone, Debug)]
pub struct DecorativeModel {
    pub mesh: MeshData,
    pub tint: [f32; 3],
}

impl DecorativeModel {
    pub fn marker_pin() -> Self {
        Self {
            mesh: mesh::marker_pin(),
            tint: MARKER_TINT,
        }
    }
}

/// Already-loaded assets handed over by the host. Either may have failed.
#[derive(Debug)]
pub struct SceneAssets {
    pub surface_texture: Result<SurfaceTexture, AssetError>,
    pub model: Result<DecorativeModel, AssetError>,
}

impl Default for SceneAssets {
    fn default() -> Self {
        Self {
            surface_texture: Err(AssetError::Unavailable("no surface texture supplied".into())),
            model: Ok(DecorativeModel::marker_pin()),
        }
    }
}

/// How a node is shaded. Assigned once per node when the scene is built.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MaterialBinding {
    Standard {
        material: StandardMaterial,
        normal_map: bool,
    },
    Tinted {
        tint: [f32; 3],
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
    Globe,
    Marker(usize),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneNode {
    pub id: NodeId,
    pub kind: NodeKind,
    pub material: MaterialBinding,
}

/// Meshes and textures the renderer uploads once per mount.
pub struct SceneGpuAssets<'a> {
    pub globe_mesh: &'a MeshData,
    pub surface_texture: Option<&'a SurfaceTexture>,
    pub marker_mesh: Option<&'a MeshData>,
}

pub struct Scene {
    pub state: SceneState,
    nodes: Vec<SceneNode>,
    globe_mesh: MeshData,
    surface_texture: Option<SurfaceTexture>,
    model: Option<DecorativeModel>,
    clear_color: [f32; 4],
    marker_scale: f32,
    marker_pick_radius: f32,
    marker_look_at: Vec3,
    sphere_radius: f32,
}

pub struct SceneBuilder {
    config: GlobeConfig,
    markers: Vec<MarkerSpec>,
    assets: SceneAssets,
}

impl SceneBuilder {
    pub fn new(assets: SceneAssets) -> Self {
        Self {
            config: GlobeConfig::default(),
            markers: Vec::new(),
            assets,
        }
    }

    pub fn config(mut self, config: &GlobeConfig) -> Self {
        self.config = config.clone();
        self
    }

    pub fn markers(mut self, markers: Vec<MarkerSpec>) -> Self {
        self.markers = markers;
        self
    }

    /// Assemble the scene. Asset failures are logged and degrade the scene
    /// (untextured globe, no marker meshes) instead of aborting.
    pub fn build(self) -> Scene {
        let SceneBuilder {
            config,
            markers,
            assets,
        } = self;

        let surface_texture = match assets.surface_texture {
            Ok(t) => Some(t),
            Err(e) => {
                log::warn!("[scene] surface texture unavailable, rendering untextured: {}", e);
                None
            }
        };
        let model = match assets.model {
            Ok(m) => Some(m),
            Err(e) => {
                log::warn!("[scene] marker model unavailable, rendering bare globe: {}", e);
                None
            }
        };

        let markers: Vec<Marker> = markers.into_iter().map(Marker::from_spec).collect();

        let mut nodes = vec![SceneNode {
            id: NodeId::GLOBE,
            kind: NodeKind::Globe,
            material: MaterialBinding::Standard {
                material: config.material,
                normal_map: surface_texture.is_some(),
            },
        }];
        if let Some(m) = &model {
            for i in 0..markers.len() {
                nodes.push(SceneNode {
                    id: NodeId(nodes.len() as u32),
                    kind: NodeKind::Marker(i),
                    material: MaterialBinding::Tinted { tint: m.tint },
                });
            }
        }

        log::info!(
            "[scene] built globe: markers={} marker_nodes={} textured={}",
            markers.len(),
            nodes.len() - 1,
            surface_texture.is_some()
        );

        Scene {
            state: SceneState {
                sphere_transform: Quat::IDENTITY,
                lights: config.lights.clone(),
                markers,
            },
            nodes,
            globe_mesh: mesh::uv_sphere(
                config.sphere_radius,
                config.sphere_segments,
                config.sphere_segments,
            ),
            surface_texture,
            model,
            // Fully transparent so the page background shows through.
            clear_color: [0.0, 0.0, 0.0, 0.0],
            marker_scale: config.marker_scale,
            marker_pick_radius: config.marker_pick_radius,
            marker_look_at: config.marker_look_at,
            sphere_radius: config.sphere_radius,
        }
    }
}

impl Scene {
    pub fn nodes(&self) -> &[SceneNode] {
        &self.nodes
    }

    pub fn clear_color(&self) -> [f32; 4] {
        self.clear_color
    }

    pub fn globe_rotation(&self) -> Quat {
        self.state.sphere_transform
    }

    pub fn set_globe_rotation(&mut self, rotation: Quat) {
        self.state.sphere_transform = rotation;
    }

    pub fn gpu_assets(&self) -> SceneGpuAssets<'_> {
        SceneGpuAssets {
            globe_mesh: &self.globe_mesh,
            surface_texture: self.surface_texture.as_ref(),
            marker_mesh: self.model.as_ref().map(|m| &m.mesh),
        }
    }

    /// Marker attached to `node`, if that node is a marker.
    pub fn marker_for_node(&self, node: NodeId) -> Option<&Marker> {
        match self.nodes.get(node.0 as usize)?.kind {
            NodeKind::Marker(i) => self.state.markers.get(i),
            NodeKind::Globe => None,
        }
    }

    pub fn marker_index(&self, label: &str) -> Option<usize> {
        self.state.markers.iter().position(|m| m.label == label)
    }

    /// World-space marker center under the current globe rotation.
    pub fn marker_world_position(&self, index: usize) -> Option<Vec3> {
        let m = self.state.markers.get(index)?;
        Some(self.state.sphere_transform * m.position)
    }

    /// Bounding spheres in scene order: the globe first, then every marker node.
    pub fn pick_candidates(&self) -> SmallVec<[PickCandidate; 8]> {
        let rot = self.state.sphere_transform;
        self.nodes
            .iter()
            .filter_map(|n| match n.kind {
                NodeKind::Globe => Some(PickCandidate {
                    node: n.id,
                    center: Vec3::ZERO,
                    radius: self.sphere_radius,
                }),
                NodeKind::Marker(i) => self.state.markers.get(i).map(|m| PickCandidate {
                    node: n.id,
                    center: rot * m.position,
                    radius: self.marker_pick_radius,
                }),
            })
            .collect()
    }

    /// Draw description for one frame.
    pub fn frame_snapshot(&self, camera: &Camera, selected: Option<&str>) -> FrameSnapshot<'_> {
        let rot = self.state.sphere_transform;
        let mut snapshot = FrameSnapshot {
            view_proj: camera.view_projection(),
            eye: camera.eye,
            globe_model: Mat4::from_quat(rot),
            globe_material: StandardMaterial::default(),
            normal_map: false,
            lights: &self.state.lights,
            markers: SmallVec::new(),
        };
        for node in &self.nodes {
            match (node.kind, node.material) {
                (NodeKind::Globe, MaterialBinding::Standard { material, normal_map }) => {
                    snapshot.globe_material = material;
                    snapshot.normal_map = normal_map;
                }
                (NodeKind::Marker(i), MaterialBinding::Tinted { tint }) => {
                    let Some(m) = self.state.markers.get(i) else {
                        continue;
                    };
                    let local = m.look_rotation(self.marker_look_at);
                    snapshot.markers.push(MarkerInstance {
                        model: Mat4::from_scale_rotation_translation(
                            Vec3::splat(self.marker_scale),
                            rot * local,
                            rot * m.position,
                        ),
                        tint,
                        highlighted: selected == Some(m.label.as_str()),
                    });
                }
                _ => {}
            }
        }
        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marker_faces_anchor() {
        let m = Marker::from_spec(MarkerSpec::new("a", 10.0, 40.0));
        let anchor = Vec3::new(0.0, 5.0, 0.0);
        let forward = m.look_rotation(anchor) * Vec3::Z;
        let want = (anchor - m.position).normalize();
        assert!((forward - want).length() < 1e-5);
    }

    #[test]
    fn marker_at_anchor_keeps_identity() {
        let mut m = Marker::from_spec(MarkerSpec::new("a", 0.0, 0.0));
        m.position = Vec3::new(0.0, 5.0, 0.0);
        assert_eq!(m.look_rotation(Vec3::new(0.0, 5.0, 0.0)), Quat::IDENTITY);
    }

    #[test]
    fn texture_size_is_validated() {
        assert!(SurfaceTexture::new(2, 2, vec![0; 16]).is_ok());
        assert!(matches!(
            SurfaceTexture::new(2, 2, vec![0; 15]),
            Err(AssetError::TextureSize { expected: 16, .. })
        ));
        assert!(SurfaceTexture::new(0, 0, Vec::new()).is_err());
    }
}
