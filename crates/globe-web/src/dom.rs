use glam::Vec2;
use globe_core::{ResizeEvent, Viewport};
use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;

#[inline]
pub fn js_err(e: JsValue) -> anyhow::Error {
    anyhow::anyhow!(format!("{:?}", e))
}

#[inline]
pub fn window_document() -> Option<(web::Window, web::Document)> {
    let window = web::window()?;
    let document = window.document()?;
    Some((window, document))
}

pub fn canvas_by_id(document: &web::Document, id: &str) -> anyhow::Result<web::HtmlCanvasElement> {
    let el = document
        .get_element_by_id(id)
        .ok_or_else(|| anyhow::anyhow!("missing #{}", id))?;
    el.dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!(format!("#{} is not a canvas: {:?}", id, e)))
}

/// Current window size and pixel density as a viewport. The canvas is expected to fill the window.
pub fn window_viewport(window: &web::Window) -> Viewport {
    let size = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    ResizeEvent {
        inner_width: size(window.inner_width()),
        inner_height: size(window.inner_height()),
        device_pixel_ratio: window.device_pixel_ratio(),
    }
    .viewport()
}

/// Match the canvas backing store to the viewport's physical size.
pub fn sync_canvas_backing_size(canvas: &web::HtmlCanvasElement, viewport: &Viewport) {
    let (w, h) = viewport.physical_size();
    canvas.set_width(w);
    canvas.set_height(h);
}

/// Pointer position in CSS pixels relative to the canvas' top-left corner.
#[inline]
pub fn pointer_css(ev: &web::MouseEvent, canvas: &web::HtmlCanvasElement) -> Vec2 {
    let rect = canvas.get_bounding_client_rect();
    Vec2::new(
        ev.client_x() as f32 - rect.left() as f32,
        ev.client_y() as f32 - rect.top() as f32,
    )
}
