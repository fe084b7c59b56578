use common::{CameraDevice, CameraError, StreamHandle, StreamRequest};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{MediaStream, MediaStreamConstraints, MediaStreamTrack};

pub async fn get_camera_stream(request: &StreamRequest) -> Result<MediaStream, JsValue> {
    let window = web_sys::window().ok_or("No window")?;
    let navigator = window.navigator();

    // Insecure contexts have no mediaDevices at all
    let devices_js = js_sys::Reflect::get(&navigator, &"mediaDevices".into())?;
    if devices_js.is_undefined() || devices_js.is_null() {
        return Err(js_sys::TypeError::new("navigator.mediaDevices is unavailable").into());
    }
    let media_devices = navigator.media_devices()?;

    let constraints = MediaStreamConstraints::new();
    constraints.set_audio(&JsValue::FALSE);
    constraints.set_video(&create_camera_constraints(request)?);

    let promise = media_devices.get_user_media_with_constraints(&constraints)?;
    let stream_js = JsFuture::from(promise).await?;
    Ok(MediaStream::from(stream_js))
}

fn create_camera_constraints(request: &StreamRequest) -> Result<JsValue, JsValue> {
    let obj = js_sys::Object::new();

    js_sys::Reflect::set(&obj, &"facingMode".into(), &request.facing.as_str().into())?;

    // width: { ideal: 1920 }
    let width_obj = js_sys::Object::new();
    js_sys::Reflect::set(&width_obj, &"ideal".into(), &request.ideal_width.into())?;
    js_sys::Reflect::set(&obj, &"width".into(), &width_obj)?;

    // height: { ideal: 1080 }
    let height_obj = js_sys::Object::new();
    js_sys::Reflect::set(&height_obj, &"ideal".into(), &request.ideal_height.into())?;
    js_sys::Reflect::set(&obj, &"height".into(), &height_obj)?;

    // aspectRatio: { ideal: 16/9 }
    let aspect_obj = js_sys::Object::new();
    js_sys::Reflect::set(&aspect_obj, &"ideal".into(), &request.aspect_ratio.into())?;
    js_sys::Reflect::set(&obj, &"aspectRatio".into(), &aspect_obj)?;

    Ok(obj.into())
}

/// Map a rejected `getUserMedia` promise to a camera error class.
pub fn classify_error(error: &JsValue) -> CameraError {
    let name = js_sys::Reflect::get(error, &"name".into())
        .ok()
        .and_then(|v| v.as_string())
        .unwrap_or_default();
    let message = js_sys::Reflect::get(error, &"message".into())
        .ok()
        .and_then(|v| v.as_string())
        .unwrap_or_default();

    if name.is_empty() {
        CameraError::Other(format!("{:?}", error))
    } else {
        CameraError::from_dom_name(&name, &message)
    }
}

pub fn stop_stream(stream: &MediaStream) {
    let tracks = stream.get_tracks();
    for i in 0..tracks.length() {
        let track = MediaStreamTrack::from(tracks.get(i));
        track.stop();
    }
}

#[derive(Clone)]
pub struct WebStream(MediaStream);

impl WebStream {
    pub fn media_stream(&self) -> &MediaStream {
        &self.0
    }
}

impl StreamHandle for WebStream {
    fn stop_tracks(&self) {
        stop_stream(&self.0);
    }
}

/// `navigator.mediaDevices.getUserMedia` as a camera device.
pub struct WebCamera;

impl CameraDevice for WebCamera {
    type Stream = WebStream;

    async fn acquire(&self, request: &StreamRequest) -> Result<WebStream, CameraError> {
        match get_camera_stream(request).await {
            Ok(stream) => Ok(WebStream(stream)),
            Err(e) => {
                log::error!("getUserMedia failed: {:?}", e);
                Err(classify_error(&e))
            }
        }
    }
}
