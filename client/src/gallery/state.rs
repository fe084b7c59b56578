use std::cell::RefCell;
use std::rc::Rc;

use common::{AppConfig, AppShell, Effect, GalleryStore, Intent, MediaSession};
use wasm_bindgen::prelude::*;

use crate::camera::{GlooTimer, WebCamera, WebMediaSession, WebVideoSurface};
use crate::gallery::files::WebFile;
use crate::gallery::storage::BrowserStore;
use crate::gallery::ui::UiController;

pub type SharedApp = Rc<RefCell<AppState>>;

pub struct AppState {
    pub shell: AppShell<BrowserStore>,
    pub session: WebMediaSession,
    pub config: AppConfig,
    pub ui: UiController,
}

impl AppState {
    pub fn new(config: AppConfig) -> Result<SharedApp, JsValue> {
        let ui = UiController::new()?;

        let gallery = GalleryStore::load(BrowserStore::open(), &config.storage_key);
        let shell = AppShell::new(gallery, &config);

        let surface = WebVideoSurface::new(ui.camera_video.clone(), ui.capture_canvas.clone());
        let session = MediaSession::new(WebCamera, surface, GlooTimer, config.camera.clone());

        Ok(Rc::new(RefCell::new(Self {
            shell,
            session,
            config,
            ui,
        })))
    }

    pub fn render(&self) {
        if let Err(e) = self.ui.render(&self.shell, &self.session.state()) {
            log::error!("Render failed: {:?}", e);
        }
    }
}

/// Feed an intent to the shell, carry out the resulting effects and re-render.
///
/// The state borrow is released before effects run, so effects may dispatch
/// again.
pub fn dispatch(app: &SharedApp, intent: Intent) {
    let effects = app.borrow_mut().shell.dispatch(intent);
    for effect in effects {
        perform(app, effect);
    }
    app.borrow().render();
}

fn perform(app: &SharedApp, effect: Effect) {
    match effect {
        Effect::StartCamera(facing) => {
            let session = app.borrow().session.clone();
            let app = app.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let result = session.open(facing).await;
                dispatch(&app, Intent::CameraResult(result));
            });
        }
        Effect::SwitchFacing => {
            let session = app.borrow().session.clone();
            let app = app.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let result = session.switch_facing().await;
                dispatch(&app, Intent::CameraResult(result));
            });
        }
        Effect::RetryCamera => {
            let session = app.borrow().session.clone();
            let app = app.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let result = session.retry().await;
                dispatch(&app, Intent::CameraResult(result));
            });
        }
        Effect::StopCamera => {
            app.borrow().session.close();
        }
        Effect::OpenFilePicker => {
            app.borrow().ui.file_input.click();
        }
        Effect::Notify(toast) => {
            let app = app.borrow();
            if let Err(e) = app.ui.show_toast(&toast, app.config.toast_duration_ms) {
                log::warn!("Failed to show toast '{}': {:?}", toast.title, e);
            }
        }
    }
}

/// Grab the current preview frame. Does nothing before the first frame.
pub fn capture_photo(app: &SharedApp) {
    let image = {
        let app = app.borrow();
        common::capture(app.session.surface(), &app.config.capture)
    };
    if let Some(image) = image {
        dispatch(app, Intent::Captured(image));
    }
}

/// Import picked files. Each image lands in the gallery as soon as it is read.
pub fn upload_files(app: &SharedApp, files: Vec<WebFile>) {
    if files.is_empty() {
        return;
    }
    log::info!("Importing {} selected file(s)", files.len());

    let app = app.clone();
    wasm_bindgen_futures::spawn_local(async move {
        let report = common::ingest(files, |image| {
            dispatch(&app, Intent::ImageUploaded(image));
        })
        .await;
        dispatch(&app, Intent::UploadFinished(report));
    });
}

/// Release the camera and flush the gallery when the page is hidden for good.
pub fn shutdown(app: &SharedApp) {
    let effects = app.borrow_mut().shell.shutdown();
    for effect in effects {
        perform(app, effect);
    }
}
