//! CPU-side layouts of the shader's uniform and instance data.

use globe_core::{FrameSnapshot, LightKind, MarkerInstance};

/// Point lights beyond this count are ignored by the shader.
pub const MAX_POINT_LIGHTS: usize = 4;

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Globals {
    pub view_proj: [[f32; 4]; 4],
    pub globe_model: [[f32; 4]; 4],
    pub eye: [f32; 4],
    pub base_color: [f32; 4],
    pub material: [f32; 4], // metalness, roughness, normal map, light count
    pub ambient: [f32; 4],
    pub light_pos: [[f32; 4]; MAX_POINT_LIGHTS],
    pub light_color: [[f32; 4]; MAX_POINT_LIGHTS],
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MarkerRaw {
    pub model: [[f32; 4]; 4],
    pub tint: [f32; 4],
}

impl MarkerRaw {
    pub const ATTRIBS: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
        4 => Float32x4,
        5 => Float32x4,
        6 => Float32x4,
        7 => Float32x4,
        8 => Float32x4
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<MarkerRaw>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBS,
        }
    }
}

impl From<&MarkerInstance> for MarkerRaw {
    fn from(m: &MarkerInstance) -> Self {
        let highlight = if m.highlighted { 1.0 } else { 0.0 };
        Self {
            model: m.model.to_cols_array_2d(),
            tint: [m.tint[0], m.tint[1], m.tint[2], highlight],
        }
    }
}

pub fn pack_globals(frame: &FrameSnapshot<'_>) -> Globals {
    let mut ambient = [0.0f32; 3];
    let mut light_pos = [[0.0f32; 4]; MAX_POINT_LIGHTS];
    let mut light_color = [[0.0f32; 4]; MAX_POINT_LIGHTS];
    let mut count = 0usize;
    for light in frame.lights {
        match light.kind {
            LightKind::Ambient => {
                for (a, c) in ambient.iter_mut().zip(light.color) {
                    *a += c * light.intensity;
                }
            }
            LightKind::Point if count < MAX_POINT_LIGHTS => {
                light_pos[count] = light.position.extend(1.0).to_array();
                light_color[count] = [
                    light.color[0] * light.intensity,
                    light.color[1] * light.intensity,
                    light.color[2] * light.intensity,
                    1.0,
                ];
                count += 1;
            }
            LightKind::Point => {}
        }
    }
    let m = frame.globe_material;
    Globals {
        view_proj: frame.view_proj.to_cols_array_2d(),
        globe_model: frame.globe_model.to_cols_array_2d(),
        eye: frame.eye.extend(1.0).to_array(),
        base_color: [m.color[0], m.color[1], m.color[2], 1.0],
        material: [
            m.metalness,
            m.roughness.clamp(0.04, 1.0),
            if frame.normal_map { 1.0 } else { 0.0 },
            count as f32,
        ],
        ambient: [ambient[0], ambient[1], ambient[2], 1.0],
        light_pos,
        light_color,
    }
}
