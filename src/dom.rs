use crate::constants::REDUCED_MOTION_QUERY;
use crate::core::{DeviceSignals, Rect, Viewport};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;

/// Registers `handler` for the whole page lifetime.
pub fn add_event_listener(
    target: &web::EventTarget,
    event: &str,
    mut handler: impl FnMut(web::Event) + 'static,
) {
    let closure =
        Closure::wrap(Box::new(move |ev: web::Event| handler(ev)) as Box<dyn FnMut(web::Event)>);
    _ = target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
    closure.forget();
}

pub fn viewport(window: &web::Window) -> Viewport {
    let width = window
        .inner_width()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0);
    let height = window
        .inner_height()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0);
    Viewport::new(width, height)
}

#[inline]
pub fn element_rect(element: &web::Element) -> Rect {
    let r = element.get_bounding_client_rect();
    Rect::new(r.left(), r.top(), r.width(), r.height())
}

pub fn query_elements(document: &web::Document, selector: &str) -> Vec<web::Element> {
    let list = match document.query_selector_all(selector) {
        Ok(list) => list,
        Err(e) => {
            log::warn!("[aurora] bad selector {:?}: {:?}", selector, e);
            return Vec::new();
        }
    };
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<web::Element>().ok())
        .collect()
}

pub fn device_signals(window: &web::Window) -> DeviceSignals {
    let navigator = window.navigator();
    // `deviceMemory` is Chromium-only and not in web-sys
    let device_memory_gib = js_sys::Reflect::get(&navigator, &JsValue::from_str("deviceMemory"))
        .ok()
        .and_then(|v| v.as_f64());
    DeviceSignals {
        user_agent: navigator.user_agent().unwrap_or_default(),
        max_touch_points: navigator.max_touch_points(),
        device_memory_gib,
        viewport_width: viewport(window).width,
    }
}

pub fn prefers_reduced_motion(window: &web::Window) -> bool {
    window
        .match_media(REDUCED_MOTION_QUERY)
        .ok()
        .flatten()
        .map(|mql| mql.matches())
        .unwrap_or(false)
}

#[inline]
pub fn page_visible(document: &web::Document) -> bool {
    document.visibility_state() == web::VisibilityState::Visible
}

pub fn set_styles(element: &web::HtmlElement, props: &[(&str, &str)]) {
    let style = element.style();
    for (name, value) in props {
        _ = style.set_property(name, value);
    }
}
