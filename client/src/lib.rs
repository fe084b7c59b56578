use wasm_bindgen::prelude::*;

pub mod camera;
pub mod config;
pub mod gallery;

#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    // The configured level is applied in start()
    wasm_logger::init(wasm_logger::Config::new(log::Level::Trace));
    log::set_max_level(log::LevelFilter::Info);

    log::info!("WASM client initialized");
}

#[wasm_bindgen]
pub fn start() -> Result<(), JsValue> {
    let config = config::load_or_default();
    log::set_max_level(config.level_filter());
    log::info!("Starting gallery (storage key '{}')", config.storage_key);

    let app = gallery::AppState::new(config)?;
    gallery::register_event_listeners(&app)?;
    app.borrow().render();

    log::info!(
        "Gallery ready with {} image(s)",
        app.borrow().shell.gallery().len()
    );
    Ok(())
}
