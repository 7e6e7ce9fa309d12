use crate::core::AuroraEngine;
use crate::render::WebBackend;
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub type SharedEngine = Rc<RefCell<AuroraEngine<WebBackend>>>;

/// Slot holding the animation-frame callback. Created empty so the backend can
/// be built before the engine that the callback captures.
pub type FrameTick = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

pub fn new_tick() -> FrameTick {
    Rc::new(RefCell::new(None))
}

/// Fills `tick` with a callback that forwards a monotonic timestamp to the
/// engine. The engine itself asks for the next frame.
pub fn install_tick(tick: &FrameTick, engine: SharedEngine) {
    let origin = Instant::now();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        let now_ms = origin.elapsed().as_secs_f64() * 1000.0;
        engine.borrow_mut().on_frame(now_ms);
    }) as Box<dyn FnMut()>));
}

/// Requests one animation frame. `None` until a callback is installed.
pub fn request(window: &web::Window, tick: &FrameTick) -> Option<i32> {
    let slot = tick.borrow();
    let callback = slot.as_ref()?;
    window
        .request_animation_frame(callback.as_ref().unchecked_ref())
        .ok()
}
