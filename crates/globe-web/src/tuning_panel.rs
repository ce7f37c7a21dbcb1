use crate::dom;
use crate::events::DomListener;
use globe_core::{Globe, Subscriptions, TuningParam};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys as web;

pub const PANEL_ID: &str = "tuning-panel";

/// Build one range slider per tuning parameter inside `#tuning-panel`.
/// Returns the number of sliders; zero when the page has no panel.
pub fn build(globe: &Rc<RefCell<Globe>>, document: &web::Document) -> anyhow::Result<usize> {
    let Some(panel) = document.get_element_by_id(PANEL_ID) else {
        log::info!("[tuning] no #{} on the page, panel skipped", PANEL_ID);
        return Ok(0);
    };
    let params: Vec<TuningParam> = globe.borrow().tuning().params().to_vec();

    // Staged: on an early return the rows are cleared and the listeners removed.
    let mut staged = Subscriptions::new();
    let panel_clear = panel.clone();
    staged.push_fn(move || panel_clear.set_inner_html(""));
    for p in &params {
        let row = document.create_element("label").map_err(dom::js_err)?;
        row.set_class_name("tuning-row");
        row.set_text_content(Some(&p.label));

        let input = document
            .create_element("input")
            .map_err(dom::js_err)?
            .dyn_into::<web::HtmlInputElement>()
            .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;
        input.set_type("range");
        input.set_min(&p.min.to_string());
        input.set_max(&p.max.to_string());
        input.set_step(&p.step.to_string());
        let _ = input.set_attribute("data-key", &p.key);
        let current = globe.borrow().read_tuning(&p.key)?;
        input.set_value(&current.to_string());

        row.append_child(&input).map_err(dom::js_err)?;
        panel.append_child(&row).map_err(dom::js_err)?;

        let globe = globe.clone();
        let key = p.key.clone();
        let input_ev = input.clone();
        staged.push(Box::new(DomListener::new(&input, "input", move |_ev| {
            let value = input_ev.value_as_number() as f32;
            let Ok(mut g) = globe.try_borrow_mut() else {
                return;
            };
            match g.apply_tuning(&key, value) {
                Ok(stored) if stored != value => input_ev.set_value(&stored.to_string()),
                Ok(_) => {}
                Err(e) => log::warn!("[tuning] {}", e),
            }
        })?));
    }

    let n = params.len();
    globe.borrow_mut().subscriptions_mut().append(&mut staged);
    log::info!("[tuning] panel built with {} sliders", n);
    Ok(n)
}
