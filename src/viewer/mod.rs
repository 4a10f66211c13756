//! Paged document viewer: state machine, page-jump form and render layers

mod component;
mod layers;
mod page_jump;
mod rotation;
mod state;
mod zoom;

pub use component::{DocumentViewer, LOAD_ERROR_DESCRIPTION, LOAD_ERROR_TITLE, LoadStatus};
pub use layers::{LayerStack, LayerView};
pub use page_jump::{PageJumpError, PageJumpForm};
pub use rotation::Rotation;
pub use state::{Command, Effect, ViewerState};
pub use zoom::ZoomLevel;
