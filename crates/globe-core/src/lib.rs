pub mod camera;
pub mod config;
pub mod constants;
pub mod coords;
pub mod error;
pub mod globe;
pub mod input;
pub mod lifecycle;
pub mod mesh;
pub mod picking;
pub mod render_loop;
pub mod rotation;
pub mod scene;
pub mod selection;
pub mod tuning;
pub static GLOBE_WGSL: &str = include_str!("../shaders/globe.wgsl");

pub use camera::{clamp_pixel_ratio, Camera, Viewport};
pub use config::{Capabilities, GlobeConfig, StandardMaterial};
pub use coords::{latitude_longitude, place};
pub use error::{AssetError, GlobeError, TuningError};
pub use globe::Globe;
pub use input::{PointerEvent, PointerKind, ResizeEvent};
pub use lifecycle::{Subscription, Subscriptions};
pub use mesh::{MeshData, MeshVertex};
pub use picking::{pick, pick_nearest, ray_sphere, PickCandidate, PickHit, Ray};
pub use render_loop::{
    AnimationLoop, FrameClock, FrameRequestId, FrameScheduler, FrameSnapshot, LoopState,
    MarkerInstance, RenderSurface,
};
pub use rotation::{DragState, PointerSession, RotationController};
pub use scene::{
    default_markers, DecorativeModel, LightKind, LightState, Marker, MarkerSpec, NodeId, Scene,
    SceneAssets, SceneBuilder, SceneGpuAssets, SceneState, SurfaceTexture,
};
pub use selection::{SelectionSink, SelectionState};
pub use tuning::{Axis, TuningBridge, TuningParam, TuningTarget};
