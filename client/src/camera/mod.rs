//! Browser camera plumbing: stream acquisition and the preview surface

pub mod media_streams;
pub mod surface;

pub use media_streams::{WebCamera, WebStream};
pub use surface::{GlooTimer, WebVideoSurface};

pub type WebMediaSession = common::MediaSession<WebCamera, WebVideoSurface, GlooTimer>;
