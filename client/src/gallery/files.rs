use common::{PickedFile, UploadError};
use wasm_bindgen_futures::JsFuture;
use web_sys::HtmlInputElement;

pub struct WebFile(web_sys::File);

impl PickedFile for WebFile {
    fn name(&self) -> String {
        self.0.name()
    }

    fn mime_type(&self) -> String {
        self.0.type_()
    }

    async fn read_bytes(&self) -> Result<Vec<u8>, UploadError> {
        let buffer = JsFuture::from(self.0.array_buffer())
            .await
            .map_err(|e| UploadError::Read(format!("{:?}", e)))?;
        Ok(js_sys::Uint8Array::new(&buffer).to_vec())
    }
}

/// Take the current selection out of a file input and reset it so the same
/// files can be picked again.
pub fn take_selected_files(input: &HtmlInputElement) -> Vec<WebFile> {
    let files = match input.files() {
        Some(list) => (0..list.length())
            .filter_map(|i| list.get(i))
            .map(WebFile)
            .collect(),
        None => Vec::new(),
    };
    input.set_value("");
    files
}
