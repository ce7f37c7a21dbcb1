use clap::Parser;
use glam::Vec2;
use globe_core::{
    default_markers, DecorativeModel, FrameRequestId, FrameScheduler, Globe, GlobeConfig,
    GlobeError, SceneAssets, SceneBuilder, Viewport,
};
use globe_render::GpuRenderer;
use instant::Instant;
use std::cell::Cell;
use std::sync::Arc;
use winit::dpi::LogicalSize;
use winit::keyboard::{Key, NamedKey};
use winit::{event::*, event_loop::EventLoop, window::Window, window::WindowBuilder};

mod cli;

const TITLE: &str = "Marker Globe (native)";
const SPIN_SPEED_KEY: &str = "spin_speed";
const SPIN_SPEED_NUDGE: f32 = 0.1;

/// Redraw requests stand in for the display refresh signal.
struct RedrawScheduler {
    window: Arc<Window>,
    next_id: Cell<i32>,
}

impl FrameScheduler for RedrawScheduler {
    fn request_frame(&self) -> Result<FrameRequestId, GlobeError> {
        self.window.request_redraw();
        let id = self.next_id.get().wrapping_add(1);
        self.next_id.set(id);
        Ok(FrameRequestId(id))
    }

    // winit cannot withdraw a redraw request; a cancelled loop ignores it instead.
    fn cancel_frame(&self, _id: FrameRequestId) {}
}

/// The swapchain must match the window, so the pixel ratio here is not clamped.
fn window_viewport(window: &Window) -> Viewport {
    let scale = window.scale_factor();
    let size = window.inner_size();
    Viewport {
        width: (size.width as f64 / scale) as f32,
        height: (size.height as f64 / scale) as f32,
        pixel_ratio: scale,
    }
}

fn nudge_spin_speed(globe: &mut Globe, delta: f32) {
    let result = globe
        .read_tuning(SPIN_SPEED_KEY)
        .and_then(|v| globe.apply_tuning(SPIN_SPEED_KEY, v + delta));
    match result {
        Ok(v) => log::info!("[tuning] spin speed {:.2}", v),
        Err(e) => log::warn!("[tuning] {}", e),
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info,wgpu_core=warn,wgpu_hal=warn"),
    )
    .init();

    let args = cli::Args::parse();
    let mut config = GlobeConfig::default();
    args.apply(&mut config);

    let event_loop = EventLoop::new()?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(TITLE)
            .with_inner_size(LogicalSize::new(args.width, args.height))
            .build(&event_loop)?,
    );

    let viewport = window_viewport(&window);
    let (w, h) = viewport.physical_size();
    let renderer = pollster::block_on(GpuRenderer::new(window.clone(), w, h))?;

    let scene = SceneBuilder::new(SceneAssets {
        surface_texture: args.surface_texture(),
        model: Ok(DecorativeModel::marker_pin()),
    })
    .config(&config)
    .markers(default_markers())
    .build();
    let mut globe = Globe::mount(config, scene, Box::new(renderer), viewport)?;
    {
        let window = window.clone();
        globe.set_selection_sink(Box::new(move |label: &str| {
            window.set_title(&format!("{} - {}", TITLE, label));
        }));
    }
    globe.start_loop(Box::new(RedrawScheduler {
        window: window.clone(),
        next_id: Cell::new(0),
    }))?;

    let mut cursor = Vec2::ZERO;
    event_loop.run(move |event, elwt| {
        let Event::WindowEvent { event, .. } = event else {
            return;
        };
        match event {
            WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. } => {
                globe.resize(window_viewport(&window));
            }
            WindowEvent::CloseRequested => {
                globe.teardown();
                elwt.exit();
            }
            WindowEvent::CursorMoved { position, .. } => {
                let p = position.to_logical::<f32>(window.scale_factor());
                cursor = Vec2::new(p.x, p.y);
                globe.pointer_move(cursor.x, cursor.y);
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => match state {
                ElementState::Pressed => {
                    globe.pointer_down(cursor.x, cursor.y);
                }
                ElementState::Released => globe.pointer_up(),
            },
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key,
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => match logical_key.as_ref() {
                Key::Character("+") | Key::Character("=") => {
                    nudge_spin_speed(&mut globe, SPIN_SPEED_NUDGE)
                }
                Key::Character("-") => nudge_spin_speed(&mut globe, -SPIN_SPEED_NUDGE),
                Key::Named(NamedKey::Escape) => {
                    globe.teardown();
                    elwt.exit();
                }
                _ => {}
            },
            WindowEvent::RedrawRequested => {
                if let Err(e) = globe.on_frame(Instant::now()) {
                    log::error!("[frame] could not reschedule: {}", e);
                }
            }
            _ => {}
        }
    })?;
    Ok(())
}
