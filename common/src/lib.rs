//! Platform-independent core of the photo capture gallery.
//!
//! The browser client implements the small traits defined here
//! ([`CameraDevice`], [`VideoSurface`], [`Timer`], [`FrameSource`],
//! [`PickedFile`], [`KeyValueStore`]) and drives an [`AppShell`].

pub mod camera;
pub mod capture;
pub mod config;
pub mod error;
pub mod gallery;
pub mod image;
pub mod note;
pub mod notify;
pub mod preview;
pub mod shell;
pub mod storage;
pub mod upload;

pub use camera::*;
pub use capture::*;
pub use config::*;
pub use error::*;
pub use gallery::*;
pub use image::*;
pub use note::*;
pub use notify::*;
pub use preview::*;
pub use shell::*;
pub use storage::*;
pub use upload::*;
