//! Frame pacing: wall-clock frame deltas, a cancellable per-refresh task, and
//! the render surface contract.

use crate::config::StandardMaterial;
use crate::error::GlobeError;
use crate::scene::{LightState, SceneGpuAssets};
use glam::{Mat4, Vec3};
use instant::Instant;
use smallvec::SmallVec;

/// Host request id for a pending refresh callback (e.g. a `requestAnimationFrame` id).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameRequestId(pub i32);

/// Host refresh signal.
pub trait FrameScheduler {
    /// Ask the host to run the frame step once more on the next refresh.
    fn request_frame(&self) -> Result<FrameRequestId, GlobeError>;
    /// Withdraw a request that has not fired yet.
    fn cancel_frame(&self, id: FrameRequestId);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
    Idle,
    Scheduled(FrameRequestId),
    Running,
    Cancelled,
}

/// Self-rescheduling frame task with an explicit cancel handle.
///
/// The host callback calls [`begin_step`](Self::begin_step), renders, then
/// [`finish_step`](Self::finish_step). Once cancelled the task never requests
/// another frame, including when the cancel arrives mid-step.
#[derive(Debug)]
pub struct AnimationLoop {
    state: LoopState,
    frames: u64,
}

impl Default for AnimationLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl AnimationLoop {
    pub fn new() -> Self {
        Self {
            state: LoopState::Idle,
            frames: 0,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn is_cancelled(&self) -> bool {
        self.state == LoopState::Cancelled
    }

    pub fn pending(&self) -> Option<FrameRequestId> {
        match self.state {
            LoopState::Scheduled(id) => Some(id),
            _ => None,
        }
    }

    /// Request the first frame. Does nothing unless the loop is idle.
    pub fn start<S: FrameScheduler + ?Sized>(&mut self, scheduler: &S) -> Result<(), GlobeError> {
        if self.state != LoopState::Idle {
            return Ok(());
        }
        self.state = LoopState::Scheduled(scheduler.request_frame()?);
        Ok(())
    }

    /// Called when the host fires the callback. Returns `false` if the step must not run.
    pub fn begin_step(&mut self) -> bool {
        match self.state {
            LoopState::Scheduled(_) => {
                self.state = LoopState::Running;
                true
            }
            LoopState::Idle | LoopState::Running | LoopState::Cancelled => false,
        }
    }

    /// Reschedule after a step. Returns whether another frame was requested.
    pub fn finish_step<S: FrameScheduler + ?Sized>(
        &mut self,
        scheduler: &S,
    ) -> Result<bool, GlobeError> {
        if self.state != LoopState::Running {
            return Ok(false);
        }
        self.frames += 1;
        match scheduler.request_frame() {
            Ok(id) => {
                self.state = LoopState::Scheduled(id);
                Ok(true)
            }
            Err(e) => {
                self.state = LoopState::Idle;
                Err(e)
            }
        }
    }

    /// Run one step through `step` when the host fires the callback.
    pub fn run_step<S, F>(&mut self, scheduler: &S, step: F) -> Result<bool, GlobeError>
    where
        S: FrameScheduler + ?Sized,
        F: FnOnce(),
    {
        if !self.begin_step() {
            return Ok(false);
        }
        step();
        self.finish_step(scheduler)
    }

    /// Break the chain. Idempotent.
    pub fn cancel<S: FrameScheduler + ?Sized>(&mut self, scheduler: &S) {
        if let LoopState::Scheduled(id) = self.state {
            scheduler.cancel_frame(id);
        }
        self.state = LoopState::Cancelled;
    }
}

/// Wall-clock delta between frame steps.
#[derive(Clone, Debug)]
pub struct FrameClock {
    last: Option<Instant>,
    max_dt_sec: f32,
}

impl FrameClock {
    pub fn new(max_dt_sec: f32) -> Self {
        Self {
            last: None,
            max_dt_sec,
        }
    }

    /// Seconds since the previous tick, clamped to `[0, max_dt_sec]`; zero on the first tick.
    pub fn tick(&mut self, now: Instant) -> f32 {
        let dt = match self.last {
            Some(prev) if now > prev => (now - prev).as_secs_f32(),
            _ => 0.0,
        };
        self.last = Some(now);
        dt.min(self.max_dt_sec)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MarkerInstance {
    pub model: Mat4,
    pub tint: [f32; 3],
    pub highlighted: bool,
}

/// Everything a renderer needs to draw one frame.
#[derive(Clone, Debug)]
pub struct FrameSnapshot<'a> {
    pub view_proj: Mat4,
    pub eye: Vec3,
    pub globe_model: Mat4,
    pub globe_material: StandardMaterial,
    pub normal_map: bool,
    pub lights: &'a [LightState],
    pub markers: SmallVec<[MarkerInstance; 8]>,
}

/// Output surface the globe renders into.
pub trait RenderSurface {
    /// Upload static meshes and textures. Called once per mount.
    fn prepare(&mut self, assets: &SceneGpuAssets<'_>) -> Result<(), GlobeError>;
    fn set_clear_color(&mut self, rgba: [f32; 4]);
    /// Resize the backing store in physical pixels; zero sizes must be tolerated.
    fn resize(&mut self, width: u32, height: u32);
    fn render(&mut self, frame: &FrameSnapshot<'_>) -> Result<(), GlobeError>;
    /// Release native resources. Must be safe to call more than once.
    fn dispose(&mut self);
}
