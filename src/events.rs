//! DOM listeners that feed [`InputState`]. Handlers only write input; the
//! frame loop is the sole writer of the scene.

use crate::dom::{self, ListenerSet};
use crate::input;
use crate::overlay;
use hero_core::InputState;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub fn wire_scene_input(
    listeners: &mut ListenerSet,
    window: &web::Window,
    canvas: &web::HtmlCanvasElement,
    input: &Rc<RefCell<InputState>>,
) {
    wire_pointermove(listeners, window, input);
    wire_touchmove(listeners, window, input);
    wire_scroll(listeners, window, input);
    wire_resize(listeners, window, canvas, input);
}

fn wire_pointermove(listeners: &mut ListenerSet, window: &web::Window, input: &Rc<RefCell<InputState>>) {
    let input = input.clone();
    listeners.add(window, "pointermove", true, move |ev| {
        if let Some(ev) = ev.dyn_ref::<web::PointerEvent>() {
            input
                .borrow_mut()
                .set_pointer_px(ev.client_x() as f32, ev.client_y() as f32);
        }
    });
}

fn wire_touchmove(listeners: &mut ListenerSet, window: &web::Window, input: &Rc<RefCell<InputState>>) {
    let input = input.clone();
    listeners.add(window, "touchmove", true, move |ev| {
        let Some(ev) = ev.dyn_ref::<web::TouchEvent>() else {
            return;
        };
        if let Some(touch) = ev.touches().get(0) {
            input
                .borrow_mut()
                .set_pointer_px(touch.client_x() as f32, touch.client_y() as f32);
        }
    });
}

fn wire_scroll(listeners: &mut ListenerSet, window: &web::Window, input: &Rc<RefCell<InputState>>) {
    let input = input.clone();
    let win = window.clone();
    listeners.add(window, "scroll", true, move |_| {
        input.borrow_mut().set_scroll(dom::scroll_y(&win));
    });
}

fn wire_resize(
    listeners: &mut ListenerSet,
    window: &web::Window,
    canvas: &web::HtmlCanvasElement,
    input: &Rc<RefCell<InputState>>,
) {
    let input = input.clone();
    let win = window.clone();
    let canvas = canvas.clone();
    listeners.add(window, "resize", false, move |_| {
        let (w, h) = dom::viewport_size(&win);
        input.borrow_mut().resize(w, h);
        dom::sync_canvas_backing_size(&canvas);
    });
}

/// Page-lifetime shortcut for the analytics dashboard.
pub fn wire_dashboard_toggle(document: &web::Document) {
    let doc = document.clone();
    let closure = Closure::wrap(Box::new(move |ev: web::KeyboardEvent| {
        if input::is_dashboard_shortcut(&ev.key(), ev.ctrl_key(), ev.shift_key()) {
            ev.prevent_default();
            overlay::toggle_dashboard(&doc);
        }
    }) as Box<dyn FnMut(web::KeyboardEvent)>);
    _ = document.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
    closure.forget();
}
