use serde::{Deserialize, Serialize};

use crate::error::CameraError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Destructive,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Destructive => "destructive",
        }
    }
}

/// Transient user-facing message. Not persisted, no retry affordance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toast {
    pub title: String,
    pub description: String,
    pub severity: Severity,
}

impl Toast {
    fn info(title: &str, description: impl Into<String>) -> Self {
        Self {
            title: title.to_string(),
            description: description.into(),
            severity: Severity::Info,
        }
    }

    fn destructive(title: &str, description: impl Into<String>) -> Self {
        Self {
            title: title.to_string(),
            description: description.into(),
            severity: Severity::Destructive,
        }
    }

    pub fn camera_failed(error: &CameraError) -> Self {
        let (title, description) = error.user_message();
        Self::destructive(title, description)
    }

    pub fn photo_captured() -> Self {
        Self::info("Photo captured!", "Your photo has been saved to the gallery")
    }

    pub fn images_uploaded(count: usize) -> Self {
        Self::info(
            "Images uploaded successfully",
            format!("{} image(s) added to your gallery", count),
        )
    }

    pub fn nothing_uploaded(rejected: usize) -> Self {
        Self::destructive(
            "No images added",
            format!("{} file(s) could not be added to your gallery", rejected),
        )
    }

    pub fn image_deleted() -> Self {
        Self::info("Image deleted", "The image has been removed from your gallery")
    }

    pub fn note_saved() -> Self {
        Self::info("Note saved", "Your text note has been saved successfully")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_toast_is_destructive() {
        let toast = Toast::camera_failed(&CameraError::PermissionDenied);
        assert_eq!(toast.title, "Camera access denied");
        assert_eq!(toast.severity, Severity::Destructive);
    }

    #[test]
    fn test_upload_toast_counts() {
        let toast = Toast::images_uploaded(3);
        assert_eq!(toast.description, "3 image(s) added to your gallery");
        assert_eq!(toast.severity, Severity::Info);
    }
}
