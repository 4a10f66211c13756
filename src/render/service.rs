//! Render service - opens the document and manages the worker pool

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use flume::{Receiver, Sender};
use log::{error, info, warn};
use mupdf::Document;

use super::cache::PageCache;
use super::request::{LoadError, RenderEvent, RenderKey, RenderRequest, RenderResponse};
use super::source::DocumentSource;
use super::worker::render_worker;
use super::{RenderBackend, RenderConfig, render_config};

/// MuPDF-backed [`RenderBackend`]
///
/// `open` reads and validates the document on a loader thread, which then
/// spawns the workers. Page requests made before the workers exist wait in
/// the request queue.
pub struct RenderService {
    request_tx: Sender<RenderRequest>,
    request_rx: Receiver<RenderRequest>,
    response_tx: Sender<RenderResponse>,
    response_rx: Receiver<RenderResponse>,
    cache: Arc<Mutex<PageCache>>,
    config: RenderConfig,
    in_flight: HashSet<RenderKey>,
    ready: Vec<RenderEvent>,
    workers: usize,
}

impl RenderService {
    /// Create a render service using the process-wide render configuration
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(render_config())
    }

    #[must_use]
    pub fn with_config(config: RenderConfig) -> Self {
        // flume gives us MPMC: every worker pulls from the same request queue
        let (request_tx, request_rx) = flume::unbounded();
        let (response_tx, response_rx) = flume::unbounded();

        Self {
            request_tx,
            request_rx,
            response_tx,
            response_rx,
            cache: Arc::new(Mutex::new(PageCache::new(config.cache_size))),
            config,
            in_flight: HashSet::new(),
            ready: Vec::new(),
            workers: 0,
        }
    }
}

impl Default for RenderService {
    fn default() -> Self {
        Self::new()
    }
}

fn open_document(source: &DocumentSource) -> Result<(Arc<Vec<u8>>, u32), LoadError> {
    let bytes = source.read_bytes()?;
    let doc = Document::from_bytes(&bytes, &source.magic())?;
    let page_count = doc.page_count()?;
    if page_count <= 0 {
        return Err(LoadError::Empty);
    }
    Ok((Arc::new(bytes), page_count as u32))
}

impl RenderBackend for RenderService {
    fn open(&mut self, source: &DocumentSource) {
        let source = source.clone();
        let request_rx = self.request_rx.clone();
        let response_tx = self.response_tx.clone();
        let cache = self.cache.clone();
        let workers = self.config.workers.max(1);
        self.workers = workers;

        std::thread::spawn(move || match open_document(&source) {
            Ok((bytes, page_count)) => {
                info!("Opened {source} ({page_count} pages)");
                let _ = response_tx.send(RenderResponse::Loaded { page_count });

                let magic = source.magic();
                for _ in 0..workers {
                    let bytes = bytes.clone();
                    let magic = magic.clone();
                    let rx = request_rx.clone();
                    let tx = response_tx.clone();
                    let cache = cache.clone();
                    std::thread::spawn(move || render_worker(bytes, magic, rx, tx, cache));
                }
            }
            Err(error) => {
                error!("Failed to open {source}: {error}");
                let _ = response_tx.send(RenderResponse::LoadFailed { error });
            }
        });
    }

    fn request(&mut self, key: RenderKey) {
        let cached = self
            .cache
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .get(&key);
        if let Some(data) = cached {
            self.ready.push(RenderEvent::Rendered(data));
            return;
        }

        if !self.in_flight.insert(key) {
            return;
        }
        if self.request_tx.send(RenderRequest::Page { key }).is_err() {
            warn!("Render queue closed, dropping request for page {}", key.page);
            self.in_flight.remove(&key);
        }
    }

    fn poll(&mut self) -> Vec<RenderEvent> {
        let mut events = std::mem::take(&mut self.ready);
        for response in self.response_rx.try_iter() {
            match &response {
                RenderResponse::Page { key, .. } | RenderResponse::Error { key, .. } => {
                    self.in_flight.remove(key);
                }
                RenderResponse::Loaded { .. } | RenderResponse::LoadFailed { .. } => {}
            }
            events.push(response.into());
        }
        events
    }
}

impl Drop for RenderService {
    fn drop(&mut self) {
        for _ in 0..self.workers {
            let _ = self.request_tx.send(RenderRequest::Shutdown);
        }
    }
}
