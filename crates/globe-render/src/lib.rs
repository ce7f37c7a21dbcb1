mod gpu;
pub mod helpers;
pub mod uniforms;

pub use gpu::{GpuRenderer, GpuState};
