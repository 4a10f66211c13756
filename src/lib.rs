// Export modules for use in tests
pub mod app;
pub mod billing;
pub mod event_source;
pub mod fullscreen;
pub mod notification;
pub mod panic_handler;
pub mod render;
pub mod settings;
pub mod theme;
pub mod viewer;
pub mod widget;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

// Re-export main app components
pub use app::{App, Focus, run_app_with_event_source};
