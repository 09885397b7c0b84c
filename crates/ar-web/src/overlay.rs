//! Passive DOM notices: the AR-unsupported advisory and the find-a-surface
//! hint shown while a session is live.

use web_sys as web;

const UNSUPPORTED_ID: &str = "ar-unsupported";
const HINT_ID: &str = "surface-hint";

#[inline]
fn set_visible(document: &web::Document, element_id: &str, visible: bool) {
    if let Some(el) = document.get_element_by_id(element_id) {
        let style = if visible { "" } else { "display:none" };
        let _ = el.set_attribute("style", style);
    }
}

#[inline]
pub fn show_unsupported(document: &web::Document) {
    set_visible(document, UNSUPPORTED_ID, true);
}

#[inline]
pub fn show_hint(document: &web::Document) {
    set_visible(document, HINT_ID, true);
}

#[inline]
pub fn hide_hint(document: &web::Document) {
    set_visible(document, HINT_ID, false);
}
