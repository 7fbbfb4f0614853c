use crate::constants::{CANVAS_CLASS, CANVAS_STYLE};
use crate::input;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

/// Viewport size in CSS pixels; pointer and scroll are normalized against it.
pub fn viewport_size(window: &web::Window) -> (f32, f32) {
    let dim = |v: Result<wasm_bindgen::JsValue, wasm_bindgen::JsValue>| {
        v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0) as f32
    };
    (dim(window.inner_width()), dim(window.inner_height()))
}

pub fn scroll_y(window: &web::Window) -> f32 {
    window.scroll_y().unwrap_or(0.0) as f32
}

/// Create the scene canvas as the mount element's first child.
pub fn attach_canvas(
    document: &web::Document,
    mount: &web::Element,
) -> anyhow::Result<web::HtmlCanvasElement> {
    let canvas: web::HtmlCanvasElement = document
        .create_element("canvas")
        .map_err(|e| anyhow::anyhow!("create canvas: {:?}", e))?
        .dyn_into()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;
    canvas.set_class_name(CANVAS_CLASS);
    _ = canvas.set_attribute("style", CANVAS_STYLE);
    _ = canvas.set_attribute("aria-hidden", "true");
    mount
        .prepend_with_node_1(&canvas)
        .map_err(|e| anyhow::anyhow!("attach canvas: {:?}", e))?;
    Ok(canvas)
}

pub fn detach_canvas(canvas: &web::HtmlCanvasElement) {
    canvas.remove();
}

/// Match the canvas backing store to its CSS size times devicePixelRatio.
pub fn sync_canvas_backing_size(canvas: &web::HtmlCanvasElement) -> (u32, u32) {
    let dpr = web::window().map_or(1.0, |w| w.device_pixel_ratio());
    let rect = canvas.get_bounding_client_rect();
    let (w, h) = input::backing_size(rect.width(), rect.height(), dpr);
    if canvas.width() != w {
        canvas.set_width(w);
    }
    if canvas.height() != h {
        canvas.set_height(h);
    }
    (w, h)
}

type Listener = Closure<dyn FnMut(web::Event)>;

/// Event listeners owned by one mounted instance, removed together on unmount.
#[derive(Default)]
pub struct ListenerSet {
    entries: Vec<(web::EventTarget, &'static str, Listener)>,
}

impl ListenerSet {
    pub fn add(
        &mut self,
        target: &web::EventTarget,
        event: &'static str,
        passive: bool,
        handler: impl FnMut(web::Event) + 'static,
    ) {
        let closure: Listener = Closure::wrap(Box::new(handler) as Box<dyn FnMut(web::Event)>);
        let opts = web::AddEventListenerOptions::new();
        opts.set_passive(passive);
        let added = target.add_event_listener_with_callback_and_add_event_listener_options(
            event,
            closure.as_ref().unchecked_ref(),
            &opts,
        );
        if let Err(e) = added {
            log::warn!("[dom] could not listen for {event}: {:?}", e);
            return;
        }
        self.entries.push((target.clone(), event, closure));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Remove every listener. Calling again is a no-op.
    pub fn clear(&mut self) {
        for (target, event, closure) in self.entries.drain(..) {
            _ = target.remove_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
        }
    }
}

impl Drop for ListenerSet {
    fn drop(&mut self) {
        self.clear();
    }
}
