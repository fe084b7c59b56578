use crate::config::CaptureConfig;
use crate::error::CaptureError;
use crate::image::EncodedImage;

/// Intrinsic pixel dimensions of the decoded video frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameSize {
    pub width: u32,
    pub height: u32,
}

impl FrameSize {
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// A live surface that can rasterize its current frame.
pub trait FrameSource {
    fn frame_size(&self) -> FrameSize;

    /// Draw the current frame at exactly `size` and encode it.
    fn encode_frame(
        &self,
        size: FrameSize,
        mime_type: &str,
        quality: f64,
    ) -> Result<EncodedImage, CaptureError>;
}

/// Grab a still from `source` at its native resolution.
///
/// Returns `None` without touching the source when no frame has been decoded
/// yet, or when encoding fails.
pub fn capture<F: FrameSource>(source: &F, settings: &CaptureConfig) -> Option<EncodedImage> {
    let size = source.frame_size();
    if size.is_empty() {
        log::debug!("Capture skipped: no decoded frame yet");
        return None;
    }

    match source.encode_frame(size, &settings.mime_type, settings.quality) {
        Ok(image) => {
            log::info!("Captured {}x{} frame", size.width, size.height);
            Some(image)
        }
        Err(e) => {
            log::warn!("Capture failed: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct FakeSource {
        size: FrameSize,
        calls: RefCell<Vec<(FrameSize, String, f64)>>,
    }

    impl FakeSource {
        fn new(width: u32, height: u32) -> Self {
            Self {
                size: FrameSize { width, height },
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl FrameSource for FakeSource {
        fn frame_size(&self) -> FrameSize {
            self.size
        }

        fn encode_frame(
            &self,
            size: FrameSize,
            mime_type: &str,
            quality: f64,
        ) -> Result<EncodedImage, CaptureError> {
            self.calls.borrow_mut().push((size, mime_type.to_string(), quality));
            Ok(EncodedImage::from_data_url(format!("data:{};base64,AAAA", mime_type)))
        }
    }

    #[test]
    fn test_capture_before_first_frame_returns_none() {
        let source = FakeSource::new(0, 0);
        assert!(capture(&source, &CaptureConfig::default()).is_none());
        assert!(source.calls.borrow().is_empty());

        let source = FakeSource::new(640, 0);
        assert!(capture(&source, &CaptureConfig::default()).is_none());
        assert!(source.calls.borrow().is_empty());
    }

    #[test]
    fn test_capture_uses_native_size_and_quality() {
        let source = FakeSource::new(1920, 1080);
        let image = capture(&source, &CaptureConfig::default()).unwrap();

        assert_eq!(image.mime_type(), Some("image/jpeg"));
        let calls = source.calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, FrameSize { width: 1920, height: 1080 });
        assert!((calls[0].2 - 0.9).abs() < f64::EPSILON);
    }

    struct BrokenSource;

    impl FrameSource for BrokenSource {
        fn frame_size(&self) -> FrameSize {
            FrameSize { width: 10, height: 10 }
        }

        fn encode_frame(&self, _: FrameSize, _: &str, _: f64) -> Result<EncodedImage, CaptureError> {
            Err(CaptureError::NoContext)
        }
    }

    #[test]
    fn test_encode_failure_yields_none() {
        assert!(capture(&BrokenSource, &CaptureConfig::default()).is_none());
    }
}
