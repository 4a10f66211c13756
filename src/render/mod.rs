//! Document rendering infrastructure
//!
//! The viewer talks to rendering through [`RenderBackend`]: open a source,
//! ask for pages by [`RenderKey`], and drain [`RenderEvent`]s once per tick.
//! With the `pdf` feature the backend is [`RenderService`], a MuPDF worker
//! pool fed over flume channels.

mod cache;
mod raster;
mod request;
mod source;

#[cfg(feature = "pdf")]
mod service;
#[cfg(feature = "pdf")]
mod worker;

use std::sync::OnceLock;

use log::{info, warn};

pub use cache::PageCache;
pub use raster::{rotate_rgb, solid_rgb};
pub use request::{
    LoadError, RenderEvent, RenderFault, RenderKey, RenderRequest, RenderResponse, RenderedPage,
};
#[cfg(feature = "pdf")]
pub use service::RenderService;
pub use source::DocumentSource;

/// Longest side, in pixels, of any rasterised page
pub const MAX_DIMENSION: f32 = 4096.0;

pub const DEFAULT_WORKERS: usize = 2;
pub const DEFAULT_CACHE_SIZE: usize = 16;

/// Collaborator that opens documents and rasterises pages
pub trait RenderBackend {
    /// Start opening `source`; the outcome arrives later as
    /// [`RenderEvent::Loaded`] or [`RenderEvent::LoadFailed`].
    fn open(&mut self, source: &DocumentSource);

    /// Ask for a page; completion arrives later as [`RenderEvent::Rendered`]
    /// or [`RenderEvent::RenderFailed`] carrying the same key.
    fn request(&mut self, key: RenderKey);

    /// Drain everything that finished since the last call
    fn poll(&mut self) -> Vec<RenderEvent>;
}

/// Process-wide render worker configuration
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderConfig {
    pub workers: usize,
    pub cache_size: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            cache_size: DEFAULT_CACHE_SIZE,
        }
    }
}

static RENDER_CONFIG: OnceLock<RenderConfig> = OnceLock::new();

/// Set the render configuration once at startup.
///
/// Returns `false` if a configuration was already in place, in which case
/// the existing one is kept.
pub fn init_render_config(config: RenderConfig) -> bool {
    match RENDER_CONFIG.set(config) {
        Ok(()) => {
            info!(
                "Render config: {} workers, cache of {} pages",
                config.workers, config.cache_size
            );
            true
        }
        Err(_) => {
            warn!("Render config already initialised, ignoring {config:?}");
            false
        }
    }
}

/// The render configuration; defaults apply if it was never initialised
pub fn render_config() -> RenderConfig {
    *RENDER_CONFIG.get_or_init(RenderConfig::default)
}
