//! Render request and response types

use std::sync::Arc;

use crate::viewer::{Rotation, ZoomLevel};

/// Everything that determines how a page is rasterised
///
/// Two renders with equal keys produce the same image, which makes the key
/// usable both as the cache key and as the identity of a render layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RenderKey {
    /// Page number (1-indexed)
    pub page: u32,
    pub zoom: ZoomLevel,
    pub rotation: Rotation,
    /// Container width in pixels before zoom is applied
    pub width_px: u32,
}

impl RenderKey {
    /// Output width in pixels after zoom
    #[must_use]
    pub fn target_width(&self) -> u32 {
        self.zoom.scaled_width(self.width_px)
    }
}

/// Rasterised page, RGB with 3 bytes per pixel
#[derive(Clone)]
pub struct RenderedPage {
    pub key: RenderKey,
    pub width_px: u32,
    pub height_px: u32,
    pub pixels: Vec<u8>,
}

impl RenderedPage {
    /// RGB triple at `(x, y)`, or `None` outside the image
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<(u8, u8, u8)> {
        if x >= self.width_px || y >= self.height_px {
            return None;
        }
        let idx = ((y as usize) * (self.width_px as usize) + x as usize) * 3;
        let px = self.pixels.get(idx..idx + 3)?;
        Some((px[0], px[1], px[2]))
    }
}

impl std::fmt::Debug for RenderedPage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderedPage")
            .field("key", &self.key)
            .field("width_px", &self.width_px)
            .field("height_px", &self.height_px)
            .field("pixels_len", &self.pixels.len())
            .finish()
    }
}

/// Request sent to render workers
#[derive(Debug)]
pub enum RenderRequest {
    Page { key: RenderKey },
    Shutdown,
}

/// Errors while opening a document
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot fetch {url}: {detail}")]
    Fetch { url: String, detail: String },

    #[cfg(feature = "pdf")]
    #[error("PDF engine: {0}")]
    Pdf(#[from] mupdf::error::Error),

    #[error("document has no pages")]
    Empty,
}

/// Errors from render workers
#[derive(Debug, thiserror::Error)]
pub enum RenderFault {
    #[cfg(feature = "pdf")]
    #[error("PDF engine: {0}")]
    Pdf(#[from] mupdf::error::Error),

    #[error("{detail}")]
    Generic { detail: String },
}

impl RenderFault {
    pub fn generic(msg: impl Into<String>) -> Self {
        Self::Generic { detail: msg.into() }
    }
}

/// Response from the loader and render workers
#[derive(Debug)]
pub enum RenderResponse {
    Loaded { page_count: u32 },
    LoadFailed { error: LoadError },
    Page { key: RenderKey, data: Arc<RenderedPage> },
    Error { key: RenderKey, error: RenderFault },
}

/// What a render backend reports back to the viewer
#[derive(Debug, Clone)]
pub enum RenderEvent {
    Loaded { page_count: u32 },
    LoadFailed { reason: String },
    Rendered(Arc<RenderedPage>),
    RenderFailed { key: RenderKey, reason: String },
}

impl From<RenderResponse> for RenderEvent {
    fn from(response: RenderResponse) -> Self {
        match response {
            RenderResponse::Loaded { page_count } => Self::Loaded { page_count },
            RenderResponse::LoadFailed { error } => Self::LoadFailed {
                reason: error.to_string(),
            },
            RenderResponse::Page { data, .. } => Self::Rendered(data),
            RenderResponse::Error { key, error } => Self::RenderFailed {
                key,
                reason: error.to_string(),
            },
        }
    }
}
