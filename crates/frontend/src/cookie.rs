//! `document.cookie` access for the saved type filter.

use police_map_shared::preference::{cookie_value, format_cookie};
use tracing::{error, warn};
use wasm_bindgen::JsCast;
use web_sys::HtmlDocument;

fn html_document() -> Option<HtmlDocument> {
    web_sys::window()?
        .document()?
        .dyn_into::<HtmlDocument>()
        .ok()
}

pub fn read(name: &str) -> Option<String> {
    let cookies = html_document()?.cookie().ok()?;
    cookie_value(&cookies, name)
}

pub fn write(name: &str, value: &str) {
    let Some(document) = html_document() else {
        warn!(name, "no HTML document, cookie not written");
        return;
    };
    if let Err(e) = document.set_cookie(&format_cookie(name, value)) {
        error!(name, error = ?e, "failed to write cookie");
    }
}
