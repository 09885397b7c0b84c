//! Wires the DOM controls (color picker, size slider, shape select) into the
//! shared view configuration, pushing live updates into the active placed
//! object.

use crate::dom;
use ar_core::config::{parse_hex_color, Shape, ViewConfig};
use ar_core::constants::{SIZE_MAX, SIZE_MIN};
use ar_core::PlacementSession;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub const COLOR_INPUT_ID: &str = "color-input";
pub const SIZE_INPUT_ID: &str = "size-input";
pub const SHAPE_SELECT_ID: &str = "shape-select";
pub const START_BUTTON_ID: &str = "start-button";

pub struct ControlWiring {
    pub document: web::Document,
    pub config: Rc<RefCell<ViewConfig>>,
    pub placement: Rc<RefCell<PlacementSession>>,
}

pub fn wire_controls(w: ControlWiring) {
    // Color picker: recolor the active object's whole subtree live.
    if let Some(input) = dom::input_element(&w.document, COLOR_INPUT_ID) {
        let config = w.config.clone();
        let placement = w.placement.clone();
        let input_read = input.clone();
        let closure = Closure::wrap(Box::new(move || {
            let value = input_read.value();
            match parse_hex_color(&value) {
                Ok(color) => {
                    let mut cfg = config.borrow_mut();
                    cfg.color = color;
                    placement.borrow_mut().apply_config(&cfg);
                }
                Err(e) => log::warn!("ignoring color input: {e}"),
            }
        }) as Box<dyn FnMut()>);
        let _ = input.add_event_listener_with_callback("input", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    // Size slider: reset the active object's uniform scale live.
    if let Some(input) = dom::input_element(&w.document, SIZE_INPUT_ID) {
        let config = w.config.clone();
        let placement = w.placement.clone();
        let input_read = input.clone();
        let closure = Closure::wrap(Box::new(move || {
            match input_read.value().parse::<f32>() {
                Ok(size) if size.is_finite() && size > 0.0 => {
                    let mut cfg = config.borrow_mut();
                    cfg.size = size.clamp(SIZE_MIN, SIZE_MAX);
                    placement.borrow_mut().apply_config(&cfg);
                }
                _ => log::warn!("ignoring size input: {:?}", input_read.value()),
            }
        }) as Box<dyn FnMut()>);
        let _ = input.add_event_listener_with_callback("input", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    // Shape select: affects future placements only, never the active object.
    if let Some(select) = dom::select_element(&w.document, SHAPE_SELECT_ID) {
        let config = w.config.clone();
        let select_read = select.clone();
        let closure = Closure::wrap(Box::new(move || {
            match select_read.value().parse::<Shape>() {
                Ok(shape) => config.borrow_mut().shape = shape,
                Err(e) => log::warn!("ignoring shape input: {e}"),
            }
        }) as Box<dyn FnMut()>);
        let _ = select.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}
