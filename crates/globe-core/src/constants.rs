use glam::Vec3;

// Shared globe tuning constants used by the web and native frontends.

// Globe geometry
pub const SPHERE_RADIUS: f32 = 1.0;
pub const SPHERE_SEGMENTS: u32 = 64; // width and height segments of the UV sphere

// Camera
pub const CAMERA_FOV_DEG: f32 = 75.0;
pub const CAMERA_Z: f32 = 2.0; // eye distance along +Z, looking at the origin
pub const CAMERA_ZNEAR: f32 = 0.1;
pub const CAMERA_ZFAR: f32 = 100.0;

// Markers
pub const MARKER_RADIUS: f32 = 1.05; // placement radius, slightly above the surface
pub const MARKER_SCALE: f32 = 0.08; // uniform visual size of each marker model
pub const MARKER_PICK_RADIUS: f32 = 0.09; // bounding-sphere radius used for picking
pub const MARKER_LOOK_AT: Vec3 = Vec3::new(0.0, 5.0, 0.0); // every marker faces this anchor
pub const MARKER_TINT: [f32; 3] = [0.95, 0.55, 0.25];

// Interaction
pub const DRAG_SENSITIVITY: f32 = 0.005; // radians per CSS pixel
pub const ROTATION_DAMPING_TAU_SEC: f32 = 0.08; // 0 snaps to the target rotation
pub const IDLE_SPIN_SPEED: f32 = 0.5; // radians per second around Y

// Frame pacing
pub const MAX_FRAME_DT_SEC: f32 = 0.25; // clamp after a hidden tab resumes
pub const MAX_PIXEL_RATIO: f64 = 2.0;

// Material
pub const GLOBE_COLOR: [f32; 3] = [1.0, 1.0, 1.0];
pub const GLOBE_METALNESS: f32 = 1.0;
pub const GLOBE_ROUGHNESS: f32 = 0.5;

// Lights
pub const POINT_LIGHT_POSITION: Vec3 = Vec3::new(2.0, 3.0, 4.0);
pub const POINT_LIGHT_COLOR: [f32; 3] = [1.0, 1.0, 1.0];
pub const POINT_LIGHT_INTENSITY: f32 = 1.0;
pub const AMBIENT_LIGHT_COLOR: [f32; 3] = [0.0, 15.0 / 255.0, 240.0 / 255.0]; // 0x000ff0
pub const AMBIENT_LIGHT_INTENSITY: f32 = 0.5;

// Tuning panel ranges (min, max, step)
pub const LIGHT_POSITION_RANGE: (f32, f32, f32) = (-3.0, 3.0, 0.01);
pub const LIGHT_INTENSITY_RANGE: (f32, f32, f32) = (0.0, 10.0, 0.01);
pub const MARKER_POSITION_RANGE: (f32, f32, f32) = (-3.0, 5.0, 0.1);
pub const SPIN_SPEED_RANGE: (f32, f32, f32) = (0.0, 5.0, 0.01);

// Default marker set: (latitude, longitude, label)
pub const DEFAULT_MARKERS: [(f32, f32, &str); 4] = [
    (45.0, 20.0, "Contacts"),
    (-45.0, 90.0, "Experience"),
    (30.0, -20.0, "Skills"),
    (-30.0, 135.0, "About"),
];
