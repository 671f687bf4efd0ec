//! Host Environment
//!
//! The hosting page injects `__firebase_config`, `__app_id` and
//! `__initial_auth_token` as globals. They are read exactly once here.

use wasm_bindgen::JsValue;

use taskboard_core::{AppConfig, ConfigError};

fn global_string(name: &str) -> Option<String> {
    let global = js_sys::global();
    js_sys::Reflect::get(&global, &JsValue::from_str(name))
        .ok()
        .and_then(|value| value.as_string())
}

/// Build the startup configuration from the host globals
pub fn load_config() -> Result<AppConfig, ConfigError> {
    let backend = global_string("__firebase_config");
    let app_id = global_string("__app_id");
    let token = global_string("__initial_auth_token");
    AppConfig::from_host(backend.as_deref(), app_id.as_deref(), token.as_deref())
}
