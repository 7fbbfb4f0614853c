#![cfg(target_arch = "wasm32")]
//! Web front-end: mounts the hero scene into the page and exposes the
//! contact-form and analytics helpers to the site's JavaScript.

use hero_core::{ContactForm, EmailSettings, FrameGate, HeroConfig, InputState, Scene};
use hero_render::GpuState;
use instant::Instant;
use rand::{rngs::StdRng, SeedableRng};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod analytics;
mod constants;
mod contact;
mod dashboard;
mod dom;
mod events;
mod frame;
mod input;
mod overlay;

use frame::{FrameLoop, HeroInstance};

thread_local! {
    // Keeps the auto-mounted scene alive for the page's lifetime.
    static AUTO_MOUNTED: RefCell<Option<HeroHandle>> = const { RefCell::new(None) };
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("hero-web starting");

    analytics::record_visit();
    wire_load_listener();
    if let Some(document) = dom::window_document() {
        events::wire_dashboard_toggle(&document);
    }

    spawn_local(async move {
        let present = dom::window_document()
            .and_then(|d| d.get_element_by_id(constants::AUTO_MOUNT_ID))
            .is_some();
        if !present {
            return;
        }
        match mount(constants::AUTO_MOUNT_ID, None, None).await {
            Ok(handle) => AUTO_MOUNTED.with(|slot| *slot.borrow_mut() = handle),
            Err(e) => log::error!("[mount] init error: {:?}", e),
        }
    });
    Ok(())
}

fn wire_load_listener() {
    let Some(window) = web::window() else {
        return;
    };
    // loadEventEnd is only set after the load handlers return.
    let closure = Closure::once_into_js(move || {
        let deferred = Closure::once_into_js(move || analytics::record_performance());
        if let Some(w) = web::window() {
            _ = w.set_timeout_with_callback_and_timeout_and_arguments_0(deferred.unchecked_ref(), 0);
        }
    });
    _ = window.add_event_listener_with_callback("load", closure.unchecked_ref());
}

/// Everything one mount owns. Dropped by [`HeroHandle::unmount`].
struct Mounted {
    gate: FrameGate,
    frame_loop: FrameLoop,
    listeners: dom::ListenerSet,
    instance: Rc<RefCell<HeroInstance>>,
    canvas: web::HtmlCanvasElement,
}

impl Mounted {
    fn teardown(mut self) {
        self.gate.stop();
        self.frame_loop.cancel();
        self.listeners.clear();
        match self.instance.try_borrow_mut() {
            Ok(mut inst) => inst.dispose(),
            Err(_) => log::warn!("[mount] instance busy during unmount; GPU released on drop"),
        }
        dom::detach_canvas(&self.canvas);
        log::info!("[mount] unmounted");
    }
}

#[wasm_bindgen]
pub struct HeroHandle {
    mounted: Rc<RefCell<Option<Mounted>>>,
    gate: FrameGate,
}

#[wasm_bindgen]
impl HeroHandle {
    /// Stop the loop, remove listeners, release GPU resources and detach the
    /// canvas. A second call does nothing.
    pub fn unmount(&self) {
        let taken = self.mounted.borrow_mut().take();
        if let Some(mounted) = taken {
            mounted.teardown();
        }
    }

    pub fn is_running(&self) -> bool {
        self.gate.is_running()
    }
}

/// Mount a scene into the element with `mount_id`. Resolves to `undefined`
/// when the element does not exist.
#[wasm_bindgen]
pub async fn mount_hero(
    mount_id: String,
    preset: Option<String>,
    config_json: Option<String>,
) -> Result<Option<HeroHandle>, JsValue> {
    mount(&mount_id, preset.as_deref(), config_json.as_deref())
        .await
        .map_err(|e| JsValue::from_str(&format!("{e:#}")))
}

fn resolve_config(preset: Option<&str>, config_json: Option<&str>) -> anyhow::Result<(HeroConfig, String)> {
    Ok(match (config_json, preset) {
        (Some(json), _) => (HeroConfig::from_json(json)?, "custom".to_string()),
        (None, Some(name)) => (HeroConfig::preset(name)?, name.to_string()),
        (None, None) => (HeroConfig::default(), HeroConfig::PRESETS[0].to_string()),
    })
}

async fn mount(
    mount_id: &str,
    preset: Option<&str>,
    config_json: Option<&str>,
) -> anyhow::Result<Option<HeroHandle>> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;
    let Some(mount_el) = document.get_element_by_id(mount_id) else {
        log::warn!("[mount] #{mount_id} not found; scene not started");
        return Ok(None);
    };

    let (config, label) = resolve_config(preset, config_json)?;
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let canvas = dom::attach_canvas(&document, &mount_el)?;
    let (width, height) = dom::sync_canvas_backing_size(&canvas);
    let mut scene = match Scene::build(&config, &mut rng) {
        Ok(scene) => scene,
        Err(e) => {
            dom::detach_canvas(&canvas);
            return Err(e.into());
        }
    };
    scene.resize(width, height);

    let (vw, vh) = dom::viewport_size(&window);
    let mut input = InputState::new(vw, vh);
    input.set_scroll(dom::scroll_y(&window));
    let input = Rc::new(RefCell::new(input));

    // Without WebGPU the page keeps working; the canvas just stays empty.
    let gpu = match GpuState::new(
        wgpu::SurfaceTarget::Canvas(canvas.clone()),
        width,
        height,
        &scene,
    )
    .await
    {
        Ok(g) => Some(g),
        Err(e) => {
            log::error!("[gpu] WebGPU init error: {:?}", e);
            None
        }
    };

    if let Some(mut stats) = analytics::open() {
        scene.report_mount(&mut stats, &label, &analytics::now_iso());
    }

    let mut listeners = dom::ListenerSet::default();
    events::wire_scene_input(&mut listeners, &window, &canvas, &input);

    let instance = Rc::new(RefCell::new(HeroInstance {
        scene,
        input,
        gpu,
        canvas: canvas.clone(),
        rng,
        last_instant: Instant::now(),
    }));
    let gate = FrameGate::new();
    let frame_loop = FrameLoop::start(instance.clone(), gate.clone());
    log::info!(
        "[mount] #{mount_id} running `{label}` at {width}x{height} ({} listeners)",
        listeners.len()
    );

    Ok(Some(HeroHandle {
        mounted: Rc::new(RefCell::new(Some(Mounted {
            gate: gate.clone(),
            frame_loop,
            listeners,
            instance,
            canvas,
        }))),
        gate,
    }))
}

fn to_js<T: serde::Serialize>(value: &T) -> Result<JsValue, JsValue> {
    let json = serde_json::to_string(value).map_err(|e| JsValue::from_str(&e.to_string()))?;
    js_sys::JSON::parse(&json)
}

/// Returns `{ isValid, error? }`.
#[wasm_bindgen]
pub fn validate_contact_form(
    name: String,
    email: String,
    message: String,
    honeypot: Option<String>,
) -> Result<JsValue, JsValue> {
    let form = ContactForm {
        name,
        email,
        message,
        honeypot,
    };
    to_js(&hero_core::validate_contact_form(&form))
}

#[wasm_bindgen]
pub fn sanitize_input(input: &str) -> String {
    hero_core::sanitize_input(input)
}

/// Validate and send the contact form, reporting the outcome as a toast.
#[wasm_bindgen]
pub async fn send_contact_email(name: String, email: String, message: String) -> Result<(), JsValue> {
    let form = ContactForm {
        name,
        email,
        message,
        honeypot: None,
    };
    let settings = EmailSettings::default();
    let sent = hero_core::send_contact_email(&contact::FetchTransport, &settings, &form).await;
    let document = dom::window_document();
    match sent {
        Ok(()) => {
            if let Some(mut stats) = analytics::open() {
                hero_core::AnalyticsSink::track(&mut stats, "contact_form_submitted", None, &analytics::now_iso());
            }
            if let Some(doc) = document.as_ref() {
                overlay::show_toast(doc, "Message sent. Thank you!", overlay::ToastKind::Success);
            }
            Ok(())
        }
        Err(e) => {
            let msg = e.to_string();
            if let Some(doc) = document.as_ref() {
                overlay::show_toast(doc, &msg, overlay::ToastKind::Error);
            }
            Err(JsValue::from_str(&msg))
        }
    }
}

#[wasm_bindgen]
pub fn track_event(name: &str, properties_json: Option<String>) -> Result<(), JsValue> {
    let properties = properties_json
        .map(|raw| serde_json::from_str::<serde_json::Value>(&raw))
        .transpose()
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    let mut stats = analytics::open().ok_or_else(|| JsValue::from_str("storage unavailable"))?;
    stats
        .track_event(name, properties, &analytics::now_iso())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// All stored analytics as a JSON string.
#[wasm_bindgen]
pub fn get_analytics_data() -> Result<String, JsValue> {
    let stats = analytics::open().ok_or_else(|| JsValue::from_str("storage unavailable"))?;
    serde_json::to_string(&stats.analytics_data()).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Unique sessions for `date` (a `Date.toDateString()` key), today when omitted.
#[wasm_bindgen]
pub fn get_daily_visitor_count(date: Option<String>) -> u32 {
    let key = date.unwrap_or_else(|| analytics::date_key(0));
    analytics::open().map_or(0, |stats| stats.daily_visitor_count(&key) as u32)
}
