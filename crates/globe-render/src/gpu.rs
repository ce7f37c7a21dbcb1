use crate::helpers::{self, GpuMesh};
use crate::uniforms::{pack_globals, Globals, MarkerRaw};
use globe_core::{FrameSnapshot, GlobeError, RenderSurface, SceneGpuAssets};

// Flat tangent-space normal used when no surface texture is available.
const FLAT_NORMAL_RGBA: [u8; 4] = [128, 128, 255, 255];
const INITIAL_INSTANCE_CAPACITY: usize = 8;

pub struct GpuState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    depth_view: wgpu::TextureView,

    globals_buffer: wgpu::Buffer,
    globals_bind_group: wgpu::BindGroup,
    texture_bgl: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    globe_texture_bg: wgpu::BindGroup,

    globe_pipeline: wgpu::RenderPipeline,
    marker_pipeline: wgpu::RenderPipeline,

    globe_mesh: Option<GpuMesh>,
    marker_mesh: Option<GpuMesh>,
    instance_buffer: wgpu::Buffer,
    instance_capacity: usize,

    width: u32,
    height: u32,
    clear_color: wgpu::Color,
}

impl GpuState {
    pub async fn new(
        target: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
    ) -> anyhow::Result<Self> {
        let width = width.max(1);
        let height = height.max(1);

        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(target)?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No WebGPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::downlevel_webgl2_defaults()
                        .using_resolution(adapter.limits()),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await
            .map_err(|e| anyhow::anyhow!(format!("request_device error: {:?}", e)))?;

        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| {
                matches!(
                    f,
                    wgpu::TextureFormat::Bgra8UnormSrgb | wgpu::TextureFormat::Rgba8UnormSrgb
                )
            })
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("surface reports no texture formats"))?;
        // The page must show through the cleared background.
        let alpha_mode = if caps
            .alpha_modes
            .contains(&wgpu::CompositeAlphaMode::PreMultiplied)
        {
            wgpu::CompositeAlphaMode::PreMultiplied
        } else {
            caps.alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto)
        };
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        log::info!(
            "[gpu] surface {}x{} format={:?} alpha={:?}",
            width,
            height,
            format,
            alpha_mode
        );

        let (_, depth_view) = helpers::create_depth_texture(&device, width, height);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("globe_shader"),
            source: wgpu::ShaderSource::Wgsl(globe_core::GLOBE_WGSL.into()),
        });

        let globals_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("globals_bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });
        let texture_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("normal_map_bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        multisampled: false,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let globals_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("globals"),
            size: std::mem::size_of::<Globals>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let globals_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("globals_bg"),
            layout: &globals_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: globals_buffer.as_entire_binding(),
            }],
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("normal_map_sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });
        let (_, flat_view) =
            helpers::upload_rgba_texture(&device, &queue, "flat_normal", 1, 1, &FLAT_NORMAL_RGBA);
        let globe_texture_bg = texture_bind_group(&device, &texture_bgl, &flat_view, &sampler);

        let globe_pl = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("globe_pl"),
            bind_group_layouts: &[&globals_bgl, &texture_bgl],
            push_constant_ranges: &[],
        });
        let marker_pl = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("marker_pl"),
            bind_group_layouts: &[&globals_bgl],
            push_constant_ranges: &[],
        });
        let globe_pipeline = helpers::make_mesh_pipeline(
            &device,
            "globe_pipeline",
            &globe_pl,
            &shader,
            "vs_globe",
            "fs_globe",
            &[helpers::mesh_vertex_layout()],
            format,
        );
        let marker_pipeline = helpers::make_mesh_pipeline(
            &device,
            "marker_pipeline",
            &marker_pl,
            &shader,
            "vs_marker",
            "fs_marker",
            &[helpers::mesh_vertex_layout(), MarkerRaw::layout()],
            format,
        );

        let instance_buffer = create_instance_buffer(&device, INITIAL_INSTANCE_CAPACITY);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            depth_view,
            globals_buffer,
            globals_bind_group,
            texture_bgl,
            sampler,
            globe_texture_bg,
            globe_pipeline,
            marker_pipeline,
            globe_mesh: None,
            marker_mesh: None,
            instance_buffer,
            instance_capacity: INITIAL_INSTANCE_CAPACITY,
            width,
            height,
            clear_color: wgpu::Color::TRANSPARENT,
        })
    }

    fn upload_assets(&mut self, assets: &SceneGpuAssets<'_>) {
        self.globe_mesh = Some(GpuMesh::upload(&self.device, "globe", assets.globe_mesh));
        self.marker_mesh = assets
            .marker_mesh
            .map(|m| GpuMesh::upload(&self.device, "marker", m));
        if let Some(tex) = assets.surface_texture {
            let (_, view) = helpers::upload_rgba_texture(
                &self.device,
                &self.queue,
                "globe_normal_map",
                tex.width,
                tex.height,
                &tex.rgba,
            );
            self.globe_texture_bg =
                texture_bind_group(&self.device, &self.texture_bgl, &view, &self.sampler);
        }
        log::info!(
            "[gpu] uploaded globe mesh, marker mesh={}, texture={}",
            self.marker_mesh.is_some(),
            assets.surface_texture.is_some()
        );
    }

    pub fn resize_if_needed(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if width != self.width || height != self.height {
            self.width = width;
            self.height = height;
            self.reconfigure();
        }
    }

    fn reconfigure(&mut self) {
        self.config.width = self.width;
        self.config.height = self.height;
        self.surface.configure(&self.device, &self.config);
        let (_, depth_view) = helpers::create_depth_texture(&self.device, self.width, self.height);
        self.depth_view = depth_view;
    }

    fn write_instances(&mut self, frame: &FrameSnapshot<'_>) {
        if frame.markers.is_empty() {
            return;
        }
        if frame.markers.len() > self.instance_capacity {
            self.instance_capacity = frame.markers.len().next_power_of_two();
            self.instance_buffer = create_instance_buffer(&self.device, self.instance_capacity);
        }
        let raw: Vec<MarkerRaw> = frame.markers.iter().map(MarkerRaw::from).collect();
        self.queue
            .write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&raw));
    }

    pub fn render(&mut self, frame: &FrameSnapshot<'_>) -> Result<(), wgpu::SurfaceError> {
        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.queue.write_buffer(
            &self.globals_buffer,
            0,
            bytemuck::bytes_of(&pack_globals(frame)),
        );
        self.write_instances(frame);

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("globe_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Discard,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            rpass.set_bind_group(0, &self.globals_bind_group, &[]);

            if let Some(mesh) = &self.globe_mesh {
                rpass.set_pipeline(&self.globe_pipeline);
                rpass.set_bind_group(1, &self.globe_texture_bg, &[]);
                rpass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                rpass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                rpass.draw_indexed(0..mesh.index_count, 0, 0..1);
            }
            if let (Some(mesh), false) = (&self.marker_mesh, frame.markers.is_empty()) {
                rpass.set_pipeline(&self.marker_pipeline);
                rpass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                rpass.set_vertex_buffer(1, self.instance_buffer.slice(..));
                rpass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                rpass.draw_indexed(0..mesh.index_count, 0, 0..frame.markers.len() as u32);
            }
        }
        self.queue.submit(Some(encoder.finish()));
        output.present();
        Ok(())
    }
}

fn texture_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    view: &wgpu::TextureView,
    sampler: &wgpu::Sampler,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("normal_map_bg"),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
    })
}

fn create_instance_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("marker_instances"),
        size: (capacity * std::mem::size_of::<MarkerRaw>()) as u64,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

/// [`RenderSurface`] backed by wgpu. Dropping the inner state on
/// [`dispose`](RenderSurface::dispose) releases every GPU resource.
pub struct GpuRenderer {
    state: Option<GpuState>,
}

impl GpuRenderer {
    pub async fn new(
        target: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
    ) -> anyhow::Result<Self> {
        Ok(Self {
            state: Some(GpuState::new(target, width, height).await?),
        })
    }

    pub fn is_disposed(&self) -> bool {
        self.state.is_none()
    }
}

impl RenderSurface for GpuRenderer {
    fn prepare(&mut self, assets: &SceneGpuAssets<'_>) -> Result<(), GlobeError> {
        let state = self
            .state
            .as_mut()
            .ok_or_else(|| GlobeError::Render("renderer already disposed".into()))?;
        state.upload_assets(assets);
        Ok(())
    }

    fn set_clear_color(&mut self, rgba: [f32; 4]) {
        if let Some(state) = self.state.as_mut() {
            state.clear_color = wgpu::Color {
                r: rgba[0] as f64,
                g: rgba[1] as f64,
                b: rgba[2] as f64,
                a: rgba[3] as f64,
            };
        }
    }

    fn resize(&mut self, width: u32, height: u32) {
        if let Some(state) = self.state.as_mut() {
            state.resize_if_needed(width, height);
        }
    }

    fn render(&mut self, frame: &FrameSnapshot<'_>) -> Result<(), GlobeError> {
        let Some(state) = self.state.as_mut() else {
            return Ok(());
        };
        match state.render(frame) {
            Ok(()) => Ok(()),
            Err(e @ (wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated)) => {
                state.reconfigure();
                Err(GlobeError::Render(format!("{e}; surface reconfigured")))
            }
            Err(e) => Err(GlobeError::Render(e.to_string())),
        }
    }

    fn dispose(&mut self) {
        if let Some(state) = self.state.take() {
            state.device.destroy();
            log::info!("[gpu] renderer disposed");
        }
    }
}
