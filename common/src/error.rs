use thiserror::Error;

/// Failure classes for acquiring or starting a camera stream.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CameraError {
    #[error("Camera permission denied")]
    PermissionDenied,

    #[error("No camera device found")]
    DeviceNotFound,

    #[error("Camera is in use by another application")]
    DeviceBusy,

    #[error("Requested camera constraints cannot be satisfied")]
    ConstraintsUnsatisfiable,

    #[error("Camera capture is not supported on this platform")]
    PlatformUnsupported,

    #[error("Video playback failed: {0}")]
    VideoPlaybackFailed(String),

    /// The request finished after the session was closed or restarted.
    #[error("Camera request superseded")]
    Superseded,

    #[error("Camera error: {0}")]
    Other(String),
}

impl CameraError {
    /// Classify a browser `DOMException` name (or a `TypeError` thrown when
    /// `mediaDevices` is missing).
    pub fn from_dom_name(name: &str, message: &str) -> Self {
        match name {
            "NotAllowedError" | "PermissionDeniedError" | "SecurityError" => {
                CameraError::PermissionDenied
            }
            "NotFoundError" | "DevicesNotFoundError" => CameraError::DeviceNotFound,
            "NotReadableError" | "TrackStartError" => CameraError::DeviceBusy,
            "OverconstrainedError" | "ConstraintNotSatisfiedError" => {
                CameraError::ConstraintsUnsatisfiable
            }
            "NotSupportedError" | "TypeError" => CameraError::PlatformUnsupported,
            _ if message.is_empty() => CameraError::Other(name.to_string()),
            _ => CameraError::Other(format!("{}: {}", name, message)),
        }
    }

    /// Title and description shown to the user.
    pub fn user_message(&self) -> (&'static str, &'static str) {
        match self {
            CameraError::PermissionDenied => (
                "Camera access denied",
                "Please allow camera access to use this feature",
            ),
            CameraError::DeviceNotFound => (
                "No camera found",
                "Connect a camera or use image upload instead",
            ),
            CameraError::DeviceBusy => (
                "Camera in use",
                "Another application is using the camera. Close it and try again",
            ),
            CameraError::ConstraintsUnsatisfiable => (
                "Camera not compatible",
                "The camera does not support the requested settings",
            ),
            CameraError::PlatformUnsupported => (
                "Camera not supported",
                "This browser cannot access a camera. Try image upload instead",
            ),
            CameraError::VideoPlaybackFailed(_) => (
                "Camera preview failed",
                "The camera started but the preview could not be shown",
            ),
            CameraError::Superseded | CameraError::Other(_) => (
                "Camera error",
                "Something went wrong while starting the camera",
            ),
        }
    }

    /// Stale results are swallowed; everything else reaches the user.
    pub fn is_user_visible(&self) -> bool {
        !matches!(self, CameraError::Superseded)
    }
}

/// Per-file upload failure. One failing file never aborts the batch.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UploadError {
    #[error("Failed to read file: {0}")]
    Read(String),

    #[error("File is empty")]
    Empty,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("Storage is unavailable")]
    Unavailable,

    #[error("Storage write failed: {0}")]
    Write(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CaptureError {
    #[error("Rendering context unavailable")]
    NoContext,

    #[error("Frame encoding failed: {0}")]
    Encode(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dom_error_classification() {
        assert_eq!(
            CameraError::from_dom_name("NotAllowedError", "denied"),
            CameraError::PermissionDenied
        );
        assert_eq!(
            CameraError::from_dom_name("NotFoundError", ""),
            CameraError::DeviceNotFound
        );
        assert_eq!(
            CameraError::from_dom_name("NotReadableError", "busy"),
            CameraError::DeviceBusy
        );
        assert_eq!(
            CameraError::from_dom_name("OverconstrainedError", ""),
            CameraError::ConstraintsUnsatisfiable
        );
        assert_eq!(
            CameraError::from_dom_name("TypeError", "mediaDevices is undefined"),
            CameraError::PlatformUnsupported
        );
        assert_eq!(
            CameraError::from_dom_name("AbortError", "aborted"),
            CameraError::Other("AbortError: aborted".to_string())
        );
    }

    #[test]
    fn test_unrecognized_error_uses_generic_message() {
        let err = CameraError::from_dom_name("WeirdError", "");
        assert_eq!(err.user_message().0, "Camera error");
        assert!(err.is_user_visible());
        assert!(!CameraError::Superseded.is_user_visible());
    }
}
