use crate::analytics;
use crate::constants::{DASHBOARD_ID, TOAST_CLASS, TOAST_DURATION_MS};
use crate::dashboard;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

const PANEL_STYLE: &str = "position:fixed;right:16px;bottom:16px;max-height:70vh;overflow-y:auto;max-width:360px;z-index:1000;color:#cfe7ff;font:13px system-ui;background:rgba(10,14,24,0.9);padding:12px 16px;border-radius:8px;border:1px solid rgba(80,110,150,0.35);";

#[derive(Clone, Copy, Debug)]
pub enum ToastKind {
    Success,
    Error,
}

/// Show the dashboard if hidden, remove it if shown.
pub fn toggle_dashboard(document: &web::Document) {
    if let Some(el) = document.get_element_by_id(DASHBOARD_ID) {
        el.remove();
        return;
    }
    let Some(stats) = analytics::open() else {
        log::warn!("[analytics] storage unavailable");
        return;
    };
    let summary = stats.summary(&analytics::date_key(0), &analytics::week_keys());
    let data = stats.analytics_data();
    let (Ok(panel), Some(body)) = (document.create_element("div"), document.body()) else {
        return;
    };
    panel.set_id(DASHBOARD_ID);
    _ = panel.set_attribute("style", PANEL_STYLE);
    panel.set_inner_html(&dashboard::dashboard_html(&summary, &data));
    _ = body.append_child(&panel);
}

/// Transient notification, removed after a few seconds.
pub fn show_toast(document: &web::Document, message: &str, kind: ToastKind) {
    let (Ok(toast), Some(body)) = (document.create_element("div"), document.body()) else {
        return;
    };
    let border = match kind {
        ToastKind::Success => "#3fb950",
        ToastKind::Error => "#f85149",
    };
    toast.set_class_name(TOAST_CLASS);
    _ = toast.set_attribute(
        "style",
        &format!("{PANEL_STYLE}top:16px;bottom:auto;border-color:{border};"),
    );
    toast.set_text_content(Some(message));
    _ = body.append_child(&toast);

    let Some(window) = web::window() else {
        return;
    };
    let remove = Closure::once_into_js(move || toast.remove());
    _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
        remove.unchecked_ref(),
        TOAST_DURATION_MS,
    );
}
