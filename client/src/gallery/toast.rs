use common::Toast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, HtmlElement};

/// Append a toast to `container` and remove it after `duration_ms`.
pub fn show_toast(
    document: &Document,
    container: &HtmlElement,
    toast: &Toast,
    duration_ms: u32,
) -> Result<(), JsValue> {
    let element = document.create_element("div")?;
    element.set_class_name(&format!("toast {}", toast.severity.as_str()));

    let title = document.create_element("div")?;
    title.set_class_name("toast-title");
    title.set_text_content(Some(&toast.title));
    element.append_child(&title)?;

    let description = document.create_element("div")?;
    description.set_class_name("toast-description");
    description.set_text_content(Some(&toast.description));
    element.append_child(&description)?;

    container.append_child(&element)?;

    gloo_timers::callback::Timeout::new(duration_ms, move || element.remove()).forget();
    Ok(())
}
