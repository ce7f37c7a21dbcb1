use crate::dom;
use crate::overlay;
use globe_core::{Globe, Subscription, Subscriptions};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// A DOM event listener that can be removed again.
pub struct DomListener {
    target: web::EventTarget,
    event: &'static str,
    closure: Option<Closure<dyn FnMut(web::Event)>>,
}

impl DomListener {
    pub fn new(
        target: &web::EventTarget,
        event: &'static str,
        handler: impl FnMut(web::Event) + 'static,
    ) -> anyhow::Result<Self> {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(web::Event)>);
        target
            .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
            .map_err(dom::js_err)?;
        Ok(Self {
            target: target.clone(),
            event,
            closure: Some(closure),
        })
    }
}

impl Subscription for DomListener {
    fn detach(&mut self) {
        if let Some(closure) = self.closure.take() {
            let _ = self
                .target
                .remove_event_listener_with_callback(self.event, closure.as_ref().unchecked_ref());
        }
    }
}

// A listener dropped before it reaches the globe's registry must not stay on the page.
impl Drop for DomListener {
    fn drop(&mut self) {
        self.detach();
    }
}

pub type SelectCallback = Rc<RefCell<Option<js_sys::Function>>>;

/// Register pointer and resize listeners and hand them to the globe for teardown.
///
/// Press goes to the canvas; move and release are watched on the window so a
/// drag keeps working when the pointer leaves the canvas.
pub fn attach(
    globe: &Rc<RefCell<Globe>>,
    window: &web::Window,
    document: &web::Document,
    canvas: &web::HtmlCanvasElement,
    on_select: &SelectCallback,
) -> anyhow::Result<()> {
    // Staged so a failed registration detaches the ones already added.
    let mut listeners = Subscriptions::new();

    {
        let globe = globe.clone();
        let canvas_ev = canvas.clone();
        let document = document.clone();
        let on_select = on_select.clone();
        listeners.push(Box::new(DomListener::new(canvas, "pointerdown", move |ev| {
            let Some(me) = ev.dyn_ref::<web::MouseEvent>() else {
                return;
            };
            let p = dom::pointer_css(me, &canvas_ev);
            let picked = match globe.try_borrow_mut() {
                Ok(mut g) => g.pointer_down(p.x, p.y),
                Err(_) => return,
            };
            // Published after the borrow ends so page listeners may query the handle.
            if let Some(label) = picked {
                overlay::publish_selection(&document, &canvas_ev, &label, &on_select.borrow());
            }
        })?));
    }
    {
        let globe = globe.clone();
        let canvas_ev = canvas.clone();
        listeners.push(Box::new(DomListener::new(window, "pointermove", move |ev| {
            let Some(me) = ev.dyn_ref::<web::MouseEvent>() else {
                return;
            };
            let p = dom::pointer_css(me, &canvas_ev);
            if let Ok(mut g) = globe.try_borrow_mut() {
                g.pointer_move(p.x, p.y);
            }
        })?));
    }
    {
        let globe = globe.clone();
        listeners.push(Box::new(DomListener::new(window, "pointerup", move |_ev| {
            if let Ok(mut g) = globe.try_borrow_mut() {
                g.pointer_up();
            }
        })?));
    }
    {
        let globe = globe.clone();
        let window_ev = window.clone();
        let canvas_ev = canvas.clone();
        listeners.push(Box::new(DomListener::new(window, "resize", move |_ev| {
            let Ok(mut g) = globe.try_borrow_mut() else {
                log::warn!("[resize] globe busy, resize skipped");
                return;
            };
            let viewport = dom::window_viewport(&window_ev);
            if g.resize(viewport) {
                dom::sync_canvas_backing_size(&canvas_ev, &viewport);
            }
        })?));
    }

    let n = listeners.len();
    globe.borrow_mut().subscriptions_mut().append(&mut listeners);
    log::info!("[events] attached {} listeners", n);
    Ok(())
}
