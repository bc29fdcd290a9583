use police_map_shared::layout::MOBILE_BREAKPOINT_PX;
use tracing::warn;
use wasm_bindgen::JsCast;
use web_sys::HtmlElement;

pub fn viewport_width() -> f64 {
    web_sys::window()
        .and_then(|w| w.inner_width().ok())
        .and_then(|w| w.as_f64())
        .unwrap_or(MOBILE_BREAKPOINT_PX)
}

pub fn html_element(id: &str) -> Option<HtmlElement> {
    web_sys::window()?
        .document()?
        .get_element_by_id(id)?
        .dyn_into::<HtmlElement>()
        .ok()
}

pub fn alert(message: &str) {
    let Some(window) = web_sys::window() else {
        return;
    };
    if window.alert_with_message(message).is_err() {
        warn!(text = message, "could not show alert");
    }
}
