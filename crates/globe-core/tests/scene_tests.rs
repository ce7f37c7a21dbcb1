// Host-side tests for scene assembly and degraded asset handling.

mod common;

use common::*;
use globe_core::*;

fn textured_assets() -> SceneAssets {
    SceneAssets {
        surface_texture: SurfaceTexture::new(2, 1, vec![255; 8]),
        model: Ok(DecorativeModel::marker_pin()),
    }
}

#[test]
fn markers_sit_just_above_the_surface() {
    let scene = build_scene(&GlobeConfig::default());
    assert_eq!(scene.state.markers.len(), 4);
    for (m, (lat, lng, label)) in scene.state.markers.iter().zip(constants::DEFAULT_MARKERS) {
        assert_eq!(m.label, label);
        assert!((m.position - place(lat, lng, 1.05)).length() < EPS);
    }
}

#[test]
fn globe_is_first_node_and_markers_follow_in_order() {
    let scene = build_scene(&GlobeConfig::default());
    let candidates = scene.pick_candidates();
    assert_eq!(candidates.len(), 5);
    assert_eq!(candidates[0].node, NodeId::GLOBE);
    assert!(approx(candidates[0].radius, 1.0));
    let labels: Vec<&str> = candidates[1..]
        .iter()
        .map(|c| scene.marker_for_node(c.node).unwrap().label.as_str())
        .collect();
    assert_eq!(labels, ["Contacts", "Experience", "Skills", "About"]);
    assert!(scene.marker_for_node(NodeId::GLOBE).is_none());
}

#[test]
fn missing_model_leaves_a_bare_globe() {
    let assets = SceneAssets {
        surface_texture: SurfaceTexture::new(1, 1, vec![0; 4]),
        model: Err(AssetError::Unavailable("pin.glb".into())),
    };
    let scene = SceneBuilder::new(assets)
        .markers(default_markers())
        .build();
    assert_eq!(scene.nodes().len(), 1);
    assert_eq!(scene.pick_candidates().len(), 1);
    assert!(scene.gpu_assets().marker_mesh.is_none());
    let frame = scene.frame_snapshot(&Camera::default(), None);
    assert!(frame.markers.is_empty());
    // Marker state still exists for tuning.
    assert_eq!(scene.state.markers.len(), 4);
}

#[test]
fn missing_texture_renders_untextured() {
    let scene = build_scene(&GlobeConfig::default());
    assert!(scene.gpu_assets().surface_texture.is_none());
    let frame = scene.frame_snapshot(&Camera::default(), None);
    assert!(!frame.normal_map);
    assert_eq!(frame.markers.len(), 4);
}

#[test]
fn texture_enables_normal_mapping() {
    let scene = SceneBuilder::new(textured_assets())
        .markers(default_markers())
        .build();
    assert!(scene.gpu_assets().surface_texture.is_some());
    assert!(scene.frame_snapshot(&Camera::default(), None).normal_map);
}

#[test]
fn clear_color_is_fully_transparent() {
    let scene = build_scene(&GlobeConfig::default());
    assert_eq!(scene.clear_color()[3], 0.0);
}

#[test]
fn globe_material_comes_from_config() {
    let scene = build_scene(&GlobeConfig::default());
    let frame = scene.frame_snapshot(&Camera::default(), None);
    assert_eq!(frame.globe_material.metalness, 1.0);
    assert_eq!(frame.globe_material.roughness, 0.5);
    assert_eq!(frame.lights.len(), 2);
}

#[test]
fn markers_follow_globe_rotation() {
    let mut scene = build_scene(&GlobeConfig::default());
    let before = scene.marker_world_position(0).unwrap();
    let spin = glam::Quat::from_rotation_y(1.0);
    scene.set_globe_rotation(spin);
    let after = scene.marker_world_position(0).unwrap();
    assert!((after - spin * before).length() < EPS);
    assert!(approx(after.length(), 1.05));

    let frame = scene.frame_snapshot(&Camera::default(), None);
    let translation = frame.markers[0].model.w_axis.truncate();
    assert!((translation - after).length() < EPS);
}

#[test]
fn selected_marker_is_highlighted() {
    let scene = build_scene(&GlobeConfig::default());
    let frame = scene.frame_snapshot(&Camera::default(), Some("Experience"));
    let flags: Vec<bool> = frame.markers.iter().map(|m| m.highlighted).collect();
    assert_eq!(flags, [false, true, false, false]);
}

#[test]
fn sphere_mesh_matches_configured_radius() {
    let mut config = GlobeConfig::default();
    config.sphere_segments = 16;
    let scene = build_scene(&config);
    let mesh = scene.gpu_assets().globe_mesh;
    assert!(approx(mesh.bounding_radius(), 1.0));
    assert!(mesh.triangle_count() > 0);
}
