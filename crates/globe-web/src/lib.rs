#![cfg(target_arch = "wasm32")]
use globe_core::{default_markers, DecorativeModel, Globe, GlobeConfig, SceneAssets, SceneBuilder};
use globe_render::GpuRenderer;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;

mod assets;
mod dom;
mod events;
mod frame;
mod overlay;
mod tuning_panel;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("globe-web ready");
    Ok(())
}

/// A mounted globe. Call [`unmount`](GlobeHandle::unmount) before discarding it.
#[wasm_bindgen]
pub struct GlobeHandle {
    globe: Rc<RefCell<Globe>>,
    on_select: events::SelectCallback,
}

#[wasm_bindgen]
impl GlobeHandle {
    /// Label of the selected marker, if any.
    pub fn selected(&self) -> Option<String> {
        self.globe
            .try_borrow()
            .ok()
            .and_then(|g| g.selected().map(str::to_owned))
    }

    /// Register a JS function called with the label on every selection.
    #[wasm_bindgen(js_name = onSelect)]
    pub fn on_select(&self, callback: Option<js_sys::Function>) {
        *self.on_select.borrow_mut() = callback;
    }

    /// Stop the render loop, remove every listener and release the GPU surface.
    /// Calling it again does nothing.
    pub fn unmount(&self) {
        match self.globe.try_borrow_mut() {
            Ok(mut g) => g.teardown(),
            Err(_) => log::warn!("[teardown] globe busy; unmount ignored"),
        }
        self.on_select.borrow_mut().take();
    }
}

#[wasm_bindgen]
pub async fn mount_globe(canvas_id: String) -> Result<GlobeHandle, JsValue> {
    mount(&canvas_id).await.map_err(|e| {
        log::error!("mount error: {:?}", e);
        JsValue::from_str(&format!("{:#}", e))
    })
}

async fn mount(canvas_id: &str) -> anyhow::Result<GlobeHandle> {
    let (window, document) =
        dom::window_document().ok_or_else(|| anyhow::anyhow!("no window/document"))?;
    let canvas = dom::canvas_by_id(&document, canvas_id)?;

    let viewport = dom::window_viewport(&window);
    dom::sync_canvas_backing_size(&canvas, &viewport);
    let (w, h) = viewport.physical_size();
    let renderer = GpuRenderer::new(wgpu::SurfaceTarget::Canvas(canvas.clone()), w, h).await?;

    let config = GlobeConfig::default();
    let scene = SceneBuilder::new(SceneAssets {
        surface_texture: assets::load_surface_texture(&document),
        model: Ok(DecorativeModel::marker_pin()),
    })
    .config(&config)
    .markers(default_markers())
    .build();
    let globe = Rc::new(RefCell::new(Globe::mount(
        config,
        scene,
        Box::new(renderer),
        viewport,
    )?));

    let on_select: events::SelectCallback = Rc::new(RefCell::new(None));
    // Listener closures hold the globe; only teardown breaks that cycle.
    if let Err(e) = wire(&globe, &window, &document, &canvas, &on_select) {
        globe.borrow_mut().teardown();
        return Err(e);
    }

    log::info!("[globe] mounted on #{}", canvas_id);
    Ok(GlobeHandle { globe, on_select })
}

fn wire(
    globe: &Rc<RefCell<Globe>>,
    window: &web_sys::Window,
    document: &web_sys::Document,
    canvas: &web_sys::HtmlCanvasElement,
    on_select: &events::SelectCallback,
) -> anyhow::Result<()> {
    events::attach(globe, window, document, canvas, on_select)?;
    tuning_panel::build(globe, document)?;
    {
        let document = document.clone();
        globe
            .borrow_mut()
            .subscriptions_mut()
            .push_fn(move || overlay::hide_details(&document));
    }
    frame::start_loop(globe)
}
