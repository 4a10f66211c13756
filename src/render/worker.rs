//! PDF render worker - runs in separate thread(s)

use std::sync::{Arc, Mutex};

use flume::{Receiver, Sender};
use log::{debug, warn};
use mupdf::{Colorspace, Document, Matrix, Pixmap};

use super::MAX_DIMENSION;
use super::cache::PageCache;
use super::raster::rotate_rgb;
use super::request::{RenderFault, RenderKey, RenderRequest, RenderResponse, RenderedPage};

/// Rasterisation parameters for one page
struct RasterSpec {
    transform: Matrix,
    mag: f32,
}

impl RasterSpec {
    /// Fit the (possibly rotated) page to the key's target width, capped at
    /// [`MAX_DIMENSION`] on the longer side.
    fn compute(page_bounds: (f32, f32), key: &RenderKey) -> Self {
        let (page_width, page_height) = page_bounds;
        let visible_width = if key.rotation.swaps_axes() {
            page_height
        } else {
            page_width
        };

        let mut mag = key.target_width() as f32 / visible_width.max(1.0);

        let max_dim = page_width.max(page_height) * mag;
        if max_dim > MAX_DIMENSION {
            mag *= MAX_DIMENSION / max_dim;
        }

        Self {
            transform: Matrix::new_scale(mag, mag),
            mag,
        }
    }
}

/// Main worker function - runs in a dedicated thread
///
/// Each worker opens its own copy of the document since MuPDF handles are
/// not shareable across threads.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Values moved into thread, need ownership"
)]
pub fn render_worker(
    doc_bytes: Arc<Vec<u8>>,
    magic: String,
    requests: Receiver<RenderRequest>,
    responses: Sender<RenderResponse>,
    cache: Arc<Mutex<PageCache>>,
) {
    let doc = match Document::from_bytes(&doc_bytes, &magic) {
        Ok(d) => d,
        Err(e) => {
            warn!("Render worker could not open document: {e}");
            return;
        }
    };

    for request in requests {
        match request {
            RenderRequest::Page { key } => handle_page_request(&doc, key, &cache, &responses),
            RenderRequest::Shutdown => break,
        }
    }
    debug!("Render worker exiting");
}

fn handle_page_request(
    doc: &Document,
    key: RenderKey,
    cache: &Arc<Mutex<PageCache>>,
    responses: &Sender<RenderResponse>,
) {
    let cached = cache
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
        .get(&key);
    if let Some(data) = cached {
        let _ = responses.send(RenderResponse::Page { key, data });
        return;
    }

    match render_page(doc, key) {
        Ok(page) => {
            let (data, cached) = {
                let mut cache = cache.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
                let data = cache.insert(page);
                (data, cache.len())
            };
            debug!("Rendered page {} at {} ({cached} cached)", key.page, key.zoom);
            let _ = responses.send(RenderResponse::Page { key, data });
        }
        Err(error) => {
            let _ = responses.send(RenderResponse::Error { key, error });
        }
    }
}

/// Render a single page
pub fn render_page(doc: &Document, key: RenderKey) -> Result<RenderedPage, RenderFault> {
    let index = key
        .page
        .checked_sub(1)
        .ok_or_else(|| RenderFault::generic("page numbers start at 1"))?;
    let page = doc.load_page(index as i32)?;

    let bounds = page.bounds()?;
    let page_bounds = (bounds.x1 - bounds.x0, bounds.y1 - bounds.y0);
    let spec = RasterSpec::compute(page_bounds, &key);

    let rgb = Colorspace::device_rgb();
    let pixmap = page.to_pixmap(&spec.transform, &rgb, false, true)?;
    let pixels = pixmap_to_rgb(&pixmap)?;

    let (pixels, width_px, height_px) =
        rotate_rgb(&pixels, pixmap.width(), pixmap.height(), key.rotation);

    debug!(
        "Rendered page {} at {} (mag {:.3}, {}x{})",
        key.page, key.zoom, spec.mag, width_px, height_px
    );

    Ok(RenderedPage {
        key,
        width_px,
        height_px,
        pixels,
    })
}

fn pixmap_to_rgb(pixmap: &Pixmap) -> Result<Vec<u8>, RenderFault> {
    let n = pixmap.n() as usize;
    if n < 3 {
        return Err(RenderFault::generic(format!(
            "Unsupported pixmap format: {n} channels"
        )));
    }

    let width = pixmap.width() as usize;
    let height = pixmap.height() as usize;
    let stride = pixmap.stride() as usize;
    let samples = pixmap.samples();
    let row_bytes = width * n;
    let expected_min = stride.saturating_mul(height);
    if samples.len() < expected_min || row_bytes > stride {
        return Err(RenderFault::generic("Pixmap buffer size mismatch"));
    }

    let mut out = Vec::with_capacity(width * height * 3);
    for y in 0..height {
        let row_start = y * stride;
        let row = &samples[row_start..row_start + row_bytes];
        if n == 3 {
            out.extend_from_slice(row);
        } else {
            for px in row.chunks_exact(n) {
                out.extend_from_slice(&px[..3]);
            }
        }
    }

    Ok(out)
}
