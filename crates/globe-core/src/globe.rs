//! One mounted globe: owns the scene, camera, rotation, selection, tuning and
//! render surface, and routes host events into them.

use crate::camera::{Camera, Viewport};
use crate::config::{Capabilities, GlobeConfig};
use crate::error::{GlobeError, TuningError};
use crate::input::{PointerEvent, PointerKind};
use crate::lifecycle::Subscriptions;
use crate::picking;
use crate::render_loop::{AnimationLoop, FrameClock, FrameScheduler, RenderSurface};
use crate::rotation::RotationController;
use crate::scene::{NodeId, Scene};
use crate::selection::{SelectionSink, SelectionState};
use crate::tuning::TuningBridge;
use instant::Instant;

pub struct Globe {
    config: GlobeConfig,
    scene: Scene,
    camera: Camera,
    viewport: Viewport,
    rotation: RotationController,
    clock: FrameClock,
    selection: SelectionState,
    sink: Option<Box<dyn SelectionSink>>,
    tuning: TuningBridge,
    subscriptions: Subscriptions,
    animation: AnimationLoop,
    scheduler: Option<Box<dyn FrameScheduler>>,
    surface: Box<dyn RenderSurface>,
    torn_down: bool,
}

impl Globe {
    /// Attach `scene` to `surface`: upload its assets, apply the transparent
    /// clear color and size the surface for `viewport`.
    pub fn mount(
        config: GlobeConfig,
        scene: Scene,
        mut surface: Box<dyn RenderSurface>,
        viewport: Viewport,
    ) -> Result<Self, GlobeError> {
        surface.set_clear_color(scene.clear_color());
        surface.prepare(&scene.gpu_assets())?;

        let camera = Camera::looking_at_origin(config.camera_fov_deg, config.camera_z, 1.0);
        let tuning = TuningBridge::new(&scene.state);
        let mut globe = Self {
            rotation: RotationController::from_config(&config),
            clock: FrameClock::new(config.max_frame_dt_sec),
            config,
            scene,
            camera,
            viewport,
            selection: SelectionState::default(),
            sink: None,
            tuning,
            subscriptions: Subscriptions::new(),
            animation: AnimationLoop::new(),
            scheduler: None,
            surface,
            torn_down: false,
        };
        globe.resize(viewport);
        log::info!(
            "[globe] mounted: markers={} capabilities={:?}",
            globe.scene.state.markers.len(),
            globe.config.capabilities
        );
        Ok(globe)
    }

    pub fn set_selection_sink(&mut self, sink: Box<dyn SelectionSink>) {
        self.sink = Some(sink);
    }

    /// Host registrations released on teardown.
    pub fn subscriptions_mut(&mut self) -> &mut Subscriptions {
        &mut self.subscriptions
    }

    pub fn handle_pointer(&mut self, event: PointerEvent) {
        match event.kind {
            PointerKind::Down => {
                self.pointer_down(event.x, event.y);
            }
            PointerKind::Move => {
                self.pointer_move(event.x, event.y);
            }
            PointerKind::Up => self.pointer_up(),
        }
    }

    /// Press at `(x, y)` in CSS pixels. Picking and drag start are independent:
    /// a press on a marker selects it and also begins a drag.
    ///
    /// Returns the label selected by this press, if any.
    pub fn pointer_down(&mut self, x: f32, y: f32) -> Option<String> {
        if self.torn_down {
            return None;
        }
        let picked = if self.config.capabilities.pick {
            self.resolve_click(x, y)
        } else {
            None
        };
        if self.config.capabilities.drag_rotate {
            self.rotation.press(x, y);
            log::debug!("[drag] press at ({:.1}, {:.1})", x, y);
        }
        picked
    }

    fn resolve_click(&mut self, x: f32, y: f32) -> Option<String> {
        let candidates = self.scene.pick_candidates();
        let hit = picking::pick(x, y, &self.viewport, &self.camera, &candidates)?;
        if hit.node == NodeId::GLOBE {
            log::debug!("[pick] globe surface at t={:.3}", hit.t);
            return None;
        }
        let label = self.scene.marker_for_node(hit.node)?.label.clone();
        self.selection.select(&label);
        log::info!("[pick] selected {}", label);
        if let Some(sink) = self.sink.as_mut() {
            sink.on_select(&label);
        }
        Some(label)
    }

    /// Returns whether the rotation target changed.
    pub fn pointer_move(&mut self, x: f32, y: f32) -> bool {
        if self.torn_down || !self.config.capabilities.drag_rotate {
            return false;
        }
        self.rotation.drag_to(x, y)
    }

    pub fn pointer_up(&mut self) {
        if self.torn_down {
            return;
        }
        if self.rotation.is_dragging() {
            self.rotation.release();
            let r = self.rotation.target();
            log::debug!("[drag] release at rotation ({:.3}, {:.3})", r.x, r.y);
        }
    }

    /// Apply a new viewport immediately: camera aspect and surface backing size.
    ///
    /// Returns `false` when nothing was applied; the host must then leave its
    /// own backing store alone so both sizes stay in step.
    pub fn resize(&mut self, viewport: Viewport) -> bool {
        if self.torn_down {
            return false;
        }
        self.viewport = viewport;
        self.camera.set_viewport(&viewport);
        let (w, h) = viewport.physical_size();
        self.surface.resize(w, h);
        log::debug!(
            "[resize] {}x{} css, dpr {:.2}, backing {}x{}",
            viewport.width,
            viewport.height,
            viewport.pixel_ratio,
            w,
            h
        );
        true
    }

    /// Advance rotation by the wall-clock time since the previous step and
    /// render one frame.
    pub fn step(&mut self, now: Instant) -> Result<(), GlobeError> {
        if self.torn_down {
            return Ok(());
        }
        let dt = self.clock.tick(now);
        self.rotation.advance(dt, self.config.capabilities.auto_rotate);
        self.scene.set_globe_rotation(self.rotation.quat());
        if self.viewport.is_empty() {
            return Ok(());
        }
        let frame = self.scene.frame_snapshot(&self.camera, self.selection.selected());
        self.surface.render(&frame)
    }

    /// Start the self-rescheduling frame task on `scheduler`.
    pub fn start_loop(&mut self, scheduler: Box<dyn FrameScheduler>) -> Result<(), GlobeError> {
        if self.torn_down {
            return Ok(());
        }
        self.animation.start(scheduler.as_ref())?;
        self.scheduler = Some(scheduler);
        Ok(())
    }

    /// Host refresh callback. Renders one step and reschedules unless cancelled.
    /// Render failures are logged and do not stop the loop.
    pub fn on_frame(&mut self, now: Instant) -> Result<bool, GlobeError> {
        if !self.animation.begin_step() {
            return Ok(false);
        }
        if let Err(e) = self.step(now) {
            log::error!("[frame] render failed: {}", e);
        }
        match self.scheduler.as_deref() {
            Some(scheduler) => self.animation.finish_step(scheduler),
            None => Ok(false),
        }
    }

    pub fn animation(&self) -> &AnimationLoop {
        &self.animation
    }

    pub fn selected(&self) -> Option<&str> {
        self.selection.selected()
    }

    pub fn tuning(&self) -> &TuningBridge {
        &self.tuning
    }

    pub fn read_tuning(&self, key: &str) -> Result<f32, TuningError> {
        self.tuning.read(key, &self.scene.state, &self.rotation)
    }

    /// Route a panel edit into the scene; visible on the next frame.
    pub fn apply_tuning(&mut self, key: &str, value: f32) -> Result<f32, TuningError> {
        self.tuning.apply(key, value, &mut self.scene.state, &mut self.rotation)
    }

    /// Release everything this mount holds. Safe to call repeatedly.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        if let Some(scheduler) = self.scheduler.as_deref() {
            self.animation.cancel(scheduler);
        }
        let listeners = self.subscriptions.detach_all();
        self.tuning.detach();
        self.selection.clear();
        self.sink = None;
        self.surface.dispose();
        log::info!("[teardown] released {} subscriptions", listeners);
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    pub fn config(&self) -> &GlobeConfig {
        &self.config
    }

    pub fn capabilities(&self) -> Capabilities {
        self.config.capabilities
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn rotation(&self) -> &RotationController {
        &self.rotation
    }

    pub fn rotation_mut(&mut self) -> &mut RotationController {
        &mut self.rotation
    }
}

impl Drop for Globe {
    fn drop(&mut self) {
        self.teardown();
    }
}
