use wasm_bindgen::JsValue;
use web_sys as web;

pub const DETAILS_ID: &str = "marker-details";
pub const SELECT_EVENT: &str = "globe-select";

#[inline]
pub fn show_details(document: &web::Document, label: &str) {
    if let Some(el) = document.get_element_by_id(DETAILS_ID) {
        el.set_text_content(Some(label));
        let _ = el.set_attribute("data-visible", "1");
        let _ = el.set_attribute("style", "");
    }
}

#[inline]
pub fn hide_details(document: &web::Document) {
    if let Some(el) = document.get_element_by_id(DETAILS_ID) {
        el.set_text_content(None);
        let _ = el.set_attribute("data-visible", "0");
        let _ = el.set_attribute("style", "display:none");
    }
}

/// Fire `globe-select` on the canvas with `{ label }` as detail.
pub fn dispatch_select(canvas: &web::HtmlCanvasElement, label: &str) -> Result<bool, JsValue> {
    let detail = js_sys::Object::new();
    js_sys::Reflect::set(&detail, &"label".into(), &label.into())?;
    let init = web::CustomEventInit::new();
    init.set_bubbles(true);
    init.set_detail(&detail);
    let event = web::CustomEvent::new_with_event_init_dict(SELECT_EVENT, &init)?;
    canvas.dispatch_event(&event)
}

/// Deliver a selection to the page: details panel, DOM event and optional JS callback.
pub fn publish_selection(
    document: &web::Document,
    canvas: &web::HtmlCanvasElement,
    label: &str,
    callback: &Option<js_sys::Function>,
) {
    show_details(document, label);
    if let Err(e) = dispatch_select(canvas, label) {
        log::warn!("[pick] {} dispatch failed: {:?}", SELECT_EVENT, e);
    }
    if let Some(cb) = callback {
        if let Err(e) = cb.call1(&JsValue::NULL, &label.into()) {
            log::warn!("[pick] select callback threw: {:?}", e);
        }
    }
}
