use std::cell::RefCell;
use std::rc::Rc;

use common::{CameraError, CaptureError, EncodedImage, FrameSize, FrameSource, Timer, VideoSurface};
use futures::channel::oneshot;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlMediaElement, HtmlVideoElement};

use crate::camera::media_streams::WebStream;

/// The `<video>` preview plus the hidden `<canvas>` used for stills.
pub struct WebVideoSurface {
    video: HtmlVideoElement,
    canvas: HtmlCanvasElement,
}

impl WebVideoSurface {
    pub fn new(video: HtmlVideoElement, canvas: HtmlCanvasElement) -> Self {
        video.set_muted(true);
        let _ = video.set_attribute("playsinline", "");
        let _ = video.set_attribute("autoplay", "");
        Self { video, canvas }
    }

    fn has_frame(&self) -> bool {
        self.video.ready_state() >= HtmlMediaElement::HAVE_CURRENT_DATA
            && self.video.video_width() > 0
    }
}

/// Event listener that unregisters itself when dropped.
struct Listener {
    target: HtmlVideoElement,
    event: &'static str,
    closure: Closure<dyn FnMut(web_sys::Event)>,
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.closure.as_ref().unchecked_ref());
    }
}

fn playback_error(error: JsValue) -> CameraError {
    let message = js_sys::Reflect::get(&error, &"message".into())
        .ok()
        .and_then(|v| v.as_string())
        .unwrap_or_else(|| format!("{:?}", error));
    CameraError::VideoPlaybackFailed(message)
}

impl VideoSurface<WebStream> for WebVideoSurface {
    async fn attach(&self, stream: &WebStream) -> Result<(), CameraError> {
        self.video.set_src_object(Some(stream.media_stream()));
        let promise = self.video.play().map_err(playback_error)?;
        JsFuture::from(promise).await.map_err(playback_error)?;
        Ok(())
    }

    async fn ready(&self) {
        if self.has_frame() {
            return;
        }

        let (tx, rx) = oneshot::channel::<()>();
        let tx = Rc::new(RefCell::new(Some(tx)));
        let closure = Closure::wrap(Box::new(move |_event: web_sys::Event| {
            if let Some(tx) = tx.borrow_mut().take() {
                let _ = tx.send(());
            }
        }) as Box<dyn FnMut(_)>);

        if let Err(e) = self
            .video
            .add_event_listener_with_callback("loadeddata", closure.as_ref().unchecked_ref())
        {
            log::warn!("Could not watch video readiness: {:?}", e);
            return;
        }
        let _listener = Listener {
            target: self.video.clone(),
            event: "loadeddata",
            closure,
        };

        // Data may have arrived between the check and the registration
        if self.has_frame() {
            return;
        }
        let _ = rx.await;
    }

    fn detach(&self) {
        self.video.set_src_object(None);
    }
}

impl FrameSource for WebVideoSurface {
    fn frame_size(&self) -> FrameSize {
        FrameSize {
            width: self.video.video_width(),
            height: self.video.video_height(),
        }
    }

    fn encode_frame(
        &self,
        size: FrameSize,
        mime_type: &str,
        quality: f64,
    ) -> Result<EncodedImage, CaptureError> {
        self.canvas.set_width(size.width);
        self.canvas.set_height(size.height);

        let ctx = self
            .canvas
            .get_context("2d")
            .map_err(|e| CaptureError::Encode(format!("{:?}", e)))?
            .ok_or(CaptureError::NoContext)?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| CaptureError::NoContext)?;

        ctx.draw_image_with_html_video_element_and_dw_and_dh(
            &self.video,
            0.0,
            0.0,
            size.width as f64,
            size.height as f64,
        )
        .map_err(|e| CaptureError::Encode(format!("{:?}", e)))?;

        let url = self
            .canvas
            .to_data_url_with_type_and_encoder_options(mime_type, &JsValue::from_f64(quality))
            .map_err(|e| CaptureError::Encode(format!("{:?}", e)))?;
        Ok(EncodedImage::from_data_url(url))
    }
}

/// Timer backed by `setTimeout`.
pub struct GlooTimer;

impl Timer for GlooTimer {
    async fn sleep(&self, ms: u32) {
        gloo_timers::future::TimeoutFuture::new(ms).await;
    }
}
