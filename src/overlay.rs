use crate::constants::{CONTAINER_SELECTOR, FALLBACK_BLUR, FALLBACK_GRADIENT, GLASS_LAYER_ID};
use crate::dom;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Adds the frosted layer that sits above the canvas, once per page.
pub fn ensure_glass_layer(document: &web::Document) {
    if document.get_element_by_id(GLASS_LAYER_ID).is_some() {
        return;
    }
    let (Ok(glass), Some(body)) = (document.create_element("div"), document.body()) else {
        return;
    };
    glass.set_id(GLASS_LAYER_ID);
    _ = glass.set_attribute("aria-hidden", "true");
    _ = body.append_child(&glass);
}

/// Fixed full-viewport layering shared by the live and static canvas.
pub fn pin_canvas(canvas: &web::HtmlCanvasElement, opacity: f32) {
    let opacity = opacity.to_string();
    dom::set_styles(
        canvas,
        &[
            ("position", "fixed"),
            ("top", "0"),
            ("left", "0"),
            ("width", "100%"),
            ("height", "100%"),
            ("z-index", "-2"),
            ("pointer-events", "none"),
            ("opacity", opacity.as_str()),
        ],
    );
}

/// Paints a blurred gradient with CSS instead of animating.
pub fn show_static_fallback(canvas: &web::HtmlCanvasElement, opacity: f32) {
    pin_canvas(canvas, opacity);
    dom::set_styles(
        canvas,
        &[
            ("inset", "0"),
            ("background", FALLBACK_GRADIENT),
            ("filter", FALLBACK_BLUR),
        ],
    );
}

#[inline]
pub fn set_opacity(element: &web::HtmlElement, opacity: f32) {
    let opacity = opacity.to_string();
    dom::set_styles(element, &[("opacity", opacity.as_str())]);
}

pub fn set_container_opacity(document: &web::Document, opacity: f32) {
    let container = document
        .query_selector(CONTAINER_SELECTOR)
        .ok()
        .flatten()
        .and_then(|el| el.dyn_into::<web::HtmlElement>().ok());
    if let Some(el) = container {
        set_opacity(&el, opacity);
    }
}
