use globe_core::{AssetError, SurfaceTexture};
use wasm_bindgen::JsCast;
use web_sys as web;

pub const TEXTURE_IMG_ID: &str = "globe-texture";

/// Read the pixels of the page's already-loaded `<img id="globe-texture">`
/// through a scratch 2D canvas.
pub fn load_surface_texture(document: &web::Document) -> Result<SurfaceTexture, AssetError> {
    let img = document
        .get_element_by_id(TEXTURE_IMG_ID)
        .and_then(|el| el.dyn_into::<web::HtmlImageElement>().ok())
        .ok_or_else(|| AssetError::Unavailable(format!("no <img id=\"{}\">", TEXTURE_IMG_ID)))?;
    let (w, h) = (img.natural_width(), img.natural_height());
    if !img.complete() || w == 0 || h == 0 {
        return Err(AssetError::Unavailable(format!(
            "#{} has not finished loading",
            TEXTURE_IMG_ID
        )));
    }

    let decode = |e: wasm_bindgen::JsValue| AssetError::Decode(format!("{:?}", e));
    let scratch = document
        .create_element("canvas")
        .map_err(decode)?
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|_| AssetError::Decode("scratch element is not a canvas".into()))?;
    scratch.set_width(w);
    scratch.set_height(h);
    let ctx = scratch
        .get_context("2d")
        .map_err(decode)?
        .and_then(|c| c.dyn_into::<web::CanvasRenderingContext2d>().ok())
        .ok_or_else(|| AssetError::Decode("2d context unavailable".into()))?;
    ctx.draw_image_with_html_image_element(&img, 0.0, 0.0)
        .map_err(decode)?;
    let data = ctx
        .get_image_data(0.0, 0.0, w as f64, h as f64)
        .map_err(decode)?;
    let texture = SurfaceTexture::new(w, h, data.data().0)?;
    log::info!("[assets] surface texture {}x{}", w, h);
    Ok(texture)
}
