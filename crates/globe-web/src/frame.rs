use globe_core::{FrameRequestId, FrameScheduler, Globe, GlobeError};
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

type FrameSlot = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// `requestAnimationFrame` driving the globe's frame task.
pub struct RafScheduler {
    slot: FrameSlot,
}

impl FrameScheduler for RafScheduler {
    fn request_frame(&self) -> Result<FrameRequestId, GlobeError> {
        let window = web::window().ok_or_else(|| GlobeError::Schedule("no window".into()))?;
        let slot = self.slot.borrow();
        let tick = slot
            .as_ref()
            .ok_or_else(|| GlobeError::Schedule("frame callback released".into()))?;
        window
            .request_animation_frame(tick.as_ref().unchecked_ref())
            .map(FrameRequestId)
            .map_err(|e| GlobeError::Schedule(format!("{:?}", e)))
    }

    fn cancel_frame(&self, id: FrameRequestId) {
        if let Some(w) = web::window() {
            let _ = w.cancel_animation_frame(id.0);
        }
    }
}

/// Start the render loop. The callback is released on teardown, which also
/// breaks the closure's reference back to the globe.
pub fn start_loop(globe: &Rc<RefCell<Globe>>) -> anyhow::Result<()> {
    let slot: FrameSlot = Rc::new(RefCell::new(None));
    let globe_tick = globe.clone();
    *slot.borrow_mut() = Some(Closure::wrap(Box::new(move |_ts: f64| {
        let Ok(mut g) = globe_tick.try_borrow_mut() else {
            log::warn!("[frame] globe busy, frame skipped");
            return;
        };
        if let Err(e) = g.on_frame(Instant::now()) {
            log::error!("[frame] could not reschedule: {}", e);
        }
    }) as Box<dyn FnMut(f64)>));

    let mut g = globe.borrow_mut();
    let slot_release = slot.clone();
    g.subscriptions_mut().push_fn(move || {
        slot_release.borrow_mut().take();
    });
    g.start_loop(Box::new(RafScheduler { slot }))?;
    log::info!("[frame] loop started");
    Ok(())
}
