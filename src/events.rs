use crate::dom;
use crate::frame::SharedEngine;
use web_sys as web;

/// Pause on hide/blur/pagehide, resume on show/focus/pageshow, resize on resize.
pub fn wire_lifecycle(window: &web::Window, document: &web::Document, engine: &SharedEngine) {
    {
        let engine = engine.clone();
        let doc = document.clone();
        dom::add_event_listener(document, "visibilitychange", move |_| {
            let mut e = engine.borrow_mut();
            if dom::page_visible(&doc) {
                e.resume();
            } else {
                e.pause();
            }
        });
    }

    for event in ["pagehide", "blur"] {
        let engine = engine.clone();
        dom::add_event_listener(window, event, move |_| engine.borrow_mut().pause());
    }
    for event in ["pageshow", "focus"] {
        let engine = engine.clone();
        dom::add_event_listener(window, event, move |_| engine.borrow_mut().resume());
    }

    let engine = engine.clone();
    dom::add_event_listener(window, "resize", move |_| engine.borrow_mut().on_resize());
}

/// WebGL context loss and restoration on the drawing surface.
pub fn wire_context_events(canvas: &web::HtmlCanvasElement, engine: &SharedEngine) {
    {
        let engine = engine.clone();
        dom::add_event_listener(canvas, "webglcontextlost", move |ev: web::Event| {
            // without this the browser never restores the context
            ev.prevent_default();
            engine.borrow_mut().on_context_lost();
        });
    }
    let engine = engine.clone();
    dom::add_event_listener(canvas, "webglcontextrestored", move |_| {
        engine.borrow_mut().on_context_restored()
    });
}
