//! `fetch`-based e-mail transport for the contact form.

use hero_core::{EmailRequest, EmailTransport, HeroError};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys as web;

pub struct FetchTransport;

fn transport_err(context: &str, e: impl std::fmt::Debug) -> HeroError {
    log::error!("[contact] {context}: {:?}", e);
    HeroError::Transport(hero_core::SEND_FAILED.into())
}

impl EmailTransport for FetchTransport {
    async fn send(&self, endpoint: &str, request: &EmailRequest) -> hero_core::Result<()> {
        let window = web::window().ok_or_else(|| transport_err("window", "missing"))?;
        let body = serde_json::to_string(request)?;

        let headers = web::Headers::new().map_err(|e| transport_err("headers", e))?;
        headers
            .set("Content-Type", "application/json")
            .map_err(|e| transport_err("headers", e))?;
        let init = web::RequestInit::new();
        init.set_method("POST");
        init.set_mode(web::RequestMode::Cors);
        init.set_headers(&headers);
        init.set_body(&wasm_bindgen::JsValue::from_str(&body));
        let req = web::Request::new_with_str_and_init(endpoint, &init)
            .map_err(|e| transport_err("request", e))?;

        let resp = JsFuture::from(window.fetch_with_request(&req))
            .await
            .map_err(|e| transport_err("fetch", e))?;
        let resp: web::Response = resp.dyn_into().map_err(|e| transport_err("response", e))?;
        if !resp.ok() {
            return Err(transport_err("status", resp.status()));
        }
        Ok(())
    }
}
