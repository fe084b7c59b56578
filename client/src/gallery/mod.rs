//! Gallery application: browser bindings, DOM rendering and event wiring

pub mod files;
pub mod state;
pub mod storage;
pub mod toast;
pub mod ui;

// Re-export main entry points
pub use state::{AppState, SharedApp};
pub use ui::register_event_listeners;
