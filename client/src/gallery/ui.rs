use std::cell::Cell;

use common::{AppShell, ImageId, Intent, SessionState, Toast, UiMode};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Document, Element, HtmlButtonElement, HtmlCanvasElement, HtmlElement, HtmlImageElement,
    HtmlInputElement, HtmlTextAreaElement, HtmlVideoElement,
};

use crate::gallery::files::take_selected_files;
use crate::gallery::state::{self, dispatch, SharedApp};
use crate::gallery::storage::BrowserStore;

pub struct UiController {
    document: Document,

    gallery_grid: HtmlElement,
    gallery_empty: HtmlElement,
    viewer_modal: HtmlElement,
    viewer_image: HtmlImageElement,

    fab_menu: HtmlElement,
    pub file_input: HtmlInputElement,

    camera_view: HtmlElement,
    pub camera_video: HtmlVideoElement,
    pub capture_canvas: HtmlCanvasElement,
    camera_loading: HtmlElement,
    camera_error: HtmlElement,
    camera_error_title: HtmlElement,
    camera_error_text: HtmlElement,
    camera_thumb: HtmlButtonElement,
    camera_thumb_img: HtmlImageElement,
    camera_shutter: HtmlButtonElement,

    note_modal: HtmlElement,
    note_text: HtmlTextAreaElement,
    note_submit: HtmlButtonElement,

    recent_modal: HtmlElement,
    recent_image: HtmlImageElement,
    recent_empty: HtmlElement,
    recent_prev: HtmlButtonElement,
    recent_next: HtmlButtonElement,
    recent_counter: HtmlElement,

    toasts: HtmlElement,

    rendered_revision: Cell<Option<u64>>,
}

impl UiController {
    pub fn new() -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or("No window")?;
        let document = window.document().ok_or("No document")?;

        Ok(Self {
            gallery_grid: get_element_by_id(&document, "gallery-grid")?,
            gallery_empty: get_element_by_id(&document, "gallery-empty")?,
            viewer_modal: get_element_by_id(&document, "viewer-modal")?,
            viewer_image: get_element_by_id(&document, "viewer-image")?,
            fab_menu: get_element_by_id(&document, "fab-menu")?,
            file_input: get_element_by_id(&document, "file-input")?,
            camera_view: get_element_by_id(&document, "camera-view")?,
            camera_video: get_element_by_id(&document, "camera-video")?,
            capture_canvas: get_element_by_id(&document, "capture-canvas")?,
            camera_loading: get_element_by_id(&document, "camera-loading")?,
            camera_error: get_element_by_id(&document, "camera-error")?,
            camera_error_title: get_element_by_id(&document, "camera-error-title")?,
            camera_error_text: get_element_by_id(&document, "camera-error-text")?,
            camera_thumb: get_element_by_id(&document, "camera-thumb")?,
            camera_thumb_img: get_element_by_id(&document, "camera-thumb-img")?,
            camera_shutter: get_element_by_id(&document, "camera-shutter")?,
            note_modal: get_element_by_id(&document, "note-modal")?,
            note_text: get_element_by_id(&document, "note-text")?,
            note_submit: get_element_by_id(&document, "note-submit")?,
            recent_modal: get_element_by_id(&document, "recent-modal")?,
            recent_image: get_element_by_id(&document, "recent-image")?,
            recent_empty: get_element_by_id(&document, "recent-empty")?,
            recent_prev: get_element_by_id(&document, "recent-prev")?,
            recent_next: get_element_by_id(&document, "recent-next")?,
            recent_counter: get_element_by_id(&document, "recent-counter")?,
            toasts: get_element_by_id(&document, "toasts")?,
            document,
            rendered_revision: Cell::new(None),
        })
    }

    pub fn show_toast(&self, toast: &Toast, duration_ms: u32) -> Result<(), JsValue> {
        crate::gallery::toast::show_toast(&self.document, &self.toasts, toast, duration_ms)
    }

    pub fn render(
        &self,
        shell: &AppShell<BrowserStore>,
        camera: &SessionState,
    ) -> Result<(), JsValue> {
        self.fab_menu
            .class_list()
            .toggle_with_force("expanded", shell.menu_expanded())?;

        self.render_gallery(shell)?;
        self.render_camera(shell, camera)?;
        self.render_note(shell)?;
        self.render_recent(shell)?;
        Ok(())
    }

    fn render_gallery(&self, shell: &AppShell<BrowserStore>) -> Result<(), JsValue> {
        let gallery = shell.gallery();
        set_visible(&self.gallery_empty, gallery.is_empty())?;

        // Rebuilding every data URI image is costly, only do it on change
        if self.rendered_revision.get() != Some(gallery.revision()) {
            self.gallery_grid.set_inner_html("");
            for (index, item) in gallery.images().iter().enumerate() {
                let cell = self.document.create_element("div")?;
                cell.set_class_name("gallery-item");
                cell.set_attribute("data-id", &item.id.to_string())?;

                let img: HtmlImageElement = self.document.create_element("img")?.dyn_into()?;
                img.set_src(item.image.as_str());
                img.set_alt(&format!("Captured image {}", index + 1));
                cell.append_child(&img)?;

                self.gallery_grid.append_child(&cell)?;
            }
            self.rendered_revision.set(Some(gallery.revision()));
        }

        match shell.selected() {
            Some(item) if shell.mode() == UiMode::Gallery => {
                self.viewer_image.set_src(item.image.as_str());
                set_visible(&self.viewer_modal, true)?;
            }
            _ => {
                self.viewer_image.remove_attribute("src")?;
                set_visible(&self.viewer_modal, false)?;
            }
        }
        Ok(())
    }

    fn render_camera(
        &self,
        shell: &AppShell<BrowserStore>,
        camera: &SessionState,
    ) -> Result<(), JsValue> {
        if shell.mode() != UiMode::CameraOpen {
            set_visible(&self.camera_view, false)?;
            return Ok(());
        }
        set_visible(&self.camera_view, true)?;

        let (loading, error) = match camera {
            SessionState::Uninitialized | SessionState::Requesting { .. } => (true, None),
            SessionState::Live { .. } => (false, None),
            SessionState::PermissionDenied { .. } => (
                false,
                Some((
                    "Camera Access Required",
                    "This app needs access to your camera to take photos. Please allow camera permissions and try again.",
                )),
            ),
            SessionState::DeviceError { error, .. } => (false, Some(error.user_message())),
        };

        set_visible(&self.camera_loading, loading)?;
        match error {
            Some((title, text)) => {
                self.camera_error_title.set_text_content(Some(title));
                self.camera_error_text.set_text_content(Some(text));
                set_visible(&self.camera_error, true)?;
            }
            None => set_visible(&self.camera_error, false)?,
        }
        self.camera_shutter
            .set_disabled(!matches!(camera, SessionState::Live { .. }));

        match shell.gallery().first() {
            Some(item) => {
                self.camera_thumb_img.set_src(item.image.as_str());
                set_visible(&self.camera_thumb_img, true)?;
                self.camera_thumb.set_disabled(false);
            }
            None => {
                set_visible(&self.camera_thumb_img, false)?;
                self.camera_thumb.set_disabled(true);
            }
        }
        Ok(())
    }

    fn render_note(&self, shell: &AppShell<BrowserStore>) -> Result<(), JsValue> {
        let open = shell.mode() == UiMode::TextNoteOpen;
        set_visible(&self.note_modal, open)?;
        if open {
            let note = shell.note();
            // Only write back on divergence so the caret is not reset while typing
            if self.note_text.value() != note.text() {
                self.note_text.set_value(note.text());
            }
            self.note_submit.set_disabled(!note.can_submit());
        }
        Ok(())
    }

    fn render_recent(&self, shell: &AppShell<BrowserStore>) -> Result<(), JsValue> {
        let recent = match shell.recent() {
            Some(recent) if shell.mode() == UiMode::RecentPicsOpen => recent,
            _ => {
                set_visible(&self.recent_modal, false)?;
                self.recent_image.remove_attribute("src")?;
                return Ok(());
            }
        };
        set_visible(&self.recent_modal, true)?;

        set_visible(&self.recent_empty, recent.is_empty())?;
        match recent.current() {
            Some(item) => {
                self.recent_image.set_src(item.image.as_str());
                self.recent_image
                    .set_alt(&format!("Captured image {}", recent.position() + 1));
                set_visible(&self.recent_image, true)?;
            }
            None => set_visible(&self.recent_image, false)?,
        }

        let nav = recent.shows_navigation();
        set_visible(&self.recent_prev, nav)?;
        set_visible(&self.recent_next, nav)?;
        self.recent_prev.set_disabled(!recent.can_prev());
        self.recent_next.set_disabled(!recent.can_next());

        match recent.counter_label() {
            Some(label) => {
                self.recent_counter.set_text_content(Some(&label));
                set_visible(&self.recent_counter, true)?;
            }
            None => set_visible(&self.recent_counter, false)?,
        }
        Ok(())
    }
}

pub fn register_event_listeners(app: &SharedApp) -> Result<(), JsValue> {
    let document = app.borrow().ui.document.clone();

    bind_intent(&document, app, "fab-toggle", Intent::ToggleMenu)?;
    bind_intent(&document, app, "fab-camera", Intent::OpenCamera)?;
    bind_intent(&document, app, "fab-upload", Intent::OpenUpload)?;
    bind_intent(&document, app, "fab-note", Intent::OpenNote)?;

    bind_intent(&document, app, "camera-close", Intent::CloseCamera)?;
    bind_intent(&document, app, "camera-back", Intent::CloseCamera)?;
    bind_intent(&document, app, "camera-retry", Intent::RetryCamera)?;
    bind_intent(&document, app, "camera-flip", Intent::FlipCamera)?;
    bind_intent(&document, app, "camera-thumb", Intent::OpenRecent)?;
    bind_intent(&document, app, "camera-upload", Intent::OpenUpload)?;

    bind_intent(&document, app, "note-close", Intent::CloseNote)?;
    bind_intent(&document, app, "note-cancel", Intent::CloseNote)?;
    bind_intent(&document, app, "note-submit", Intent::SubmitNote)?;

    bind_intent(&document, app, "recent-close", Intent::CloseRecent)?;
    bind_intent(&document, app, "recent-prev", Intent::RecentPrev)?;
    bind_intent(&document, app, "recent-next", Intent::RecentNext)?;

    bind_intent(&document, app, "viewer-close", Intent::CloseViewer)?;
    bind_intent(&document, app, "viewer-delete", Intent::DeleteSelected)?;

    // Shutter
    {
        let shutter: HtmlElement = get_element_by_id(&document, "camera-shutter")?;
        let app = app.clone();
        let closure = Closure::wrap(Box::new(move || {
            state::capture_photo(&app);
        }) as Box<dyn Fn()>);
        shutter.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // Grid items are rebuilt on every change, so clicks are delegated
    {
        let grid: HtmlElement = get_element_by_id(&document, "gallery-grid")?;
        let app = app.clone();
        let closure = Closure::wrap(Box::new(move |event: web_sys::Event| {
            let id = event
                .target()
                .and_then(|t| t.dyn_into::<Element>().ok())
                .and_then(|el| el.closest(".gallery-item").ok().flatten())
                .and_then(|item| item.get_attribute("data-id"))
                .and_then(|raw| raw.parse::<ImageId>().ok());
            if let Some(id) = id {
                dispatch(&app, Intent::SelectImage(id));
            }
        }) as Box<dyn FnMut(_)>);
        grid.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // Note text
    {
        let textarea: HtmlTextAreaElement = get_element_by_id(&document, "note-text")?;
        let app = app.clone();
        let closure = Closure::wrap(Box::new(move |event: web_sys::Event| {
            if let Some(target) = event.target() {
                if let Ok(input) = target.dyn_into::<HtmlTextAreaElement>() {
                    dispatch(&app, Intent::EditNote(input.value()));
                }
            }
        }) as Box<dyn FnMut(_)>);
        textarea.add_event_listener_with_callback("input", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // File picker selection
    {
        let input: HtmlInputElement = get_element_by_id(&document, "file-input")?;
        let app = app.clone();
        let closure = Closure::wrap(Box::new(move |event: web_sys::Event| {
            if let Some(target) = event.target() {
                if let Ok(input) = target.dyn_into::<HtmlInputElement>() {
                    state::upload_files(&app, take_selected_files(&input));
                }
            }
        }) as Box<dyn FnMut(_)>);
        input.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // Page teardown
    {
        let window = web_sys::window().ok_or("No window")?;
        let app = app.clone();
        let closure = Closure::wrap(Box::new(move || {
            state::shutdown(&app);
        }) as Box<dyn Fn()>);
        window.add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    log::info!("UI event listeners registered");
    Ok(())
}

/// Dispatch `intent` whenever the element with `id` is clicked.
fn bind_intent(
    document: &Document,
    app: &SharedApp,
    id: &str,
    intent: Intent,
) -> Result<(), JsValue> {
    let element: HtmlElement = get_element_by_id(document, id)?;
    let app = app.clone();
    let closure = Closure::wrap(Box::new(move || {
        dispatch(&app, intent.clone());
    }) as Box<dyn Fn()>);
    element.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

fn set_visible(element: &HtmlElement, visible: bool) -> Result<(), JsValue> {
    if visible {
        element.style().remove_property("display")?;
    } else {
        element.style().set_property("display", "none")?;
    }
    Ok(())
}

fn get_element_by_id<T: wasm_bindgen::JsCast>(
    document: &Document,
    id: &str,
) -> Result<T, JsValue> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| format!("Element #{} not found", id).into())
        .and_then(|el| el.dyn_into::<T>().map_err(|_| format!("Element #{} has wrong type", id).into()))
}
