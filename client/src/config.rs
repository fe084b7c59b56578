use common::AppConfig;
use wasm_bindgen::prelude::*;

/// Global the host page may define to override defaults.
const CONFIG_GLOBAL: &str = "SNAPFOLIO_CONFIG";

pub fn load() -> Result<Option<AppConfig>, JsValue> {
    let window = web_sys::window().ok_or("No window")?;
    let value = js_sys::Reflect::get(&window, &CONFIG_GLOBAL.into())?;
    if value.is_undefined() || value.is_null() {
        return Ok(None);
    }
    let config: AppConfig = serde_wasm_bindgen::from_value(value)?;
    Ok(Some(config))
}

pub fn load_or_default() -> AppConfig {
    match load() {
        Ok(Some(config)) => config,
        Ok(None) => AppConfig::default(),
        Err(e) => {
            log::warn!("Failed to read {}: {:?}. Using defaults.", CONFIG_GLOBAL, e);
            AppConfig::default()
        }
    }
}
