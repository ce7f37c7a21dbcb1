// Shared fakes for host-side tests: a recording render surface and scheduler.

#![allow(dead_code)]

use globe_core::*;
use std::cell::RefCell;
use std::rc::Rc;

pub const EPS: f32 = 1e-4;

#[inline]
pub fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() <= EPS
}

#[derive(Default, Debug)]
pub struct SurfaceLog {
    pub prepared: usize,
    pub textured: bool,
    pub clear_color: Option<[f32; 4]>,
    pub resizes: Vec<(u32, u32)>,
    pub renders: usize,
    pub last_markers: usize,
    pub last_highlighted: Vec<bool>,
    pub disposed: usize,
}

#[derive(Clone, Default)]
pub struct FakeSurface {
    pub log: Rc<RefCell<SurfaceLog>>,
}

impl RenderSurface for FakeSurface {
    fn prepare(&mut self, assets: &SceneGpuAssets<'_>) -> Result<(), GlobeError> {
        let mut log = self.log.borrow_mut();
        log.prepared += 1;
        log.textured = assets.surface_texture.is_some();
        Ok(())
    }

    fn set_clear_color(&mut self, rgba: [f32; 4]) {
        self.log.borrow_mut().clear_color = Some(rgba);
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.log.borrow_mut().resizes.push((width, height));
    }

    fn render(&mut self, frame: &FrameSnapshot<'_>) -> Result<(), GlobeError> {
        let mut log = self.log.borrow_mut();
        log.renders += 1;
        log.last_markers = frame.markers.len();
        log.last_highlighted = frame.markers.iter().map(|m| m.highlighted).collect();
        Ok(())
    }

    fn dispose(&mut self) {
        self.log.borrow_mut().disposed += 1;
    }
}

#[derive(Default, Debug)]
pub struct SchedulerLog {
    pub next_id: i32,
    pub requested: Vec<i32>,
    pub cancelled: Vec<i32>,
}

#[derive(Clone, Default)]
pub struct FakeScheduler {
    pub log: Rc<RefCell<SchedulerLog>>,
}

impl FrameScheduler for FakeScheduler {
    fn request_frame(&self) -> Result<FrameRequestId, GlobeError> {
        let mut log = self.log.borrow_mut();
        log.next_id += 1;
        let id = log.next_id;
        log.requested.push(id);
        Ok(FrameRequestId(id))
    }

    fn cancel_frame(&self, id: FrameRequestId) {
        self.log.borrow_mut().cancelled.push(id.0);
    }
}

pub fn viewport() -> Viewport {
    Viewport::from_window(800.0, 600.0, 1.0)
}

pub fn build_scene(config: &GlobeConfig) -> Scene {
    SceneBuilder::new(SceneAssets::default())
        .config(config)
        .markers(default_markers())
        .build()
}

/// Globe with the default markers, no auto-rotation and undamped rotation.
pub fn still_globe(capabilities: Capabilities) -> (Globe, FakeSurface) {
    let mut config = GlobeConfig::default().with_capabilities(capabilities);
    config.capabilities.auto_rotate = false;
    config.damping_tau_sec = 0.0;
    let surface = FakeSurface::default();
    let scene = build_scene(&config);
    let globe = Globe::mount(config, scene, Box::new(surface.clone()), viewport())
        .expect("mount with fake surface");
    (globe, surface)
}

/// Turn the globe so the named marker faces the camera, then return its screen position.
pub fn face_marker(globe: &mut Globe, label: &str, now: instant::Instant) -> glam::Vec2 {
    let i = globe.scene().marker_index(label).expect("marker exists");
    let p = globe.scene().state.markers[i].position;
    globe
        .rotation_mut()
        .set_rotation(glam::Vec2::new(0.0, (-p.x).atan2(p.z)));
    globe.step(now).expect("step");
    let world = globe.scene().marker_world_position(i).expect("marker exists");
    globe
        .camera()
        .project(world, &globe.viewport())
        .expect("marker in front of the camera")
}
