//! The document viewer component
//!
//! Owns one document's view state, its page-jump form and the images of the
//! live render layers, and drives a [`RenderBackend`].

use std::collections::HashMap;
use std::sync::Arc;

use log::{debug, info, warn};

use crate::notification::NotificationManager;
use crate::render::{DocumentSource, RenderBackend, RenderEvent, RenderKey, RenderedPage};

use super::page_jump::PageJumpForm;
use super::state::{Command, Effect, ViewerState};
use super::ZoomLevel;

pub const LOAD_ERROR_TITLE: &str = "Error";
pub const LOAD_ERROR_DESCRIPTION: &str = "Please try again later";

/// Load progress of the document
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadStatus {
    Loading,
    Loaded,
    Failed,
}

pub struct DocumentViewer<B: RenderBackend> {
    source: DocumentSource,
    backend: B,
    state: ViewerState,
    form: PageJumpForm,
    images: HashMap<RenderKey, Arc<RenderedPage>>,
    status: LoadStatus,
    pending_notifications: usize,
}

impl<B: RenderBackend> DocumentViewer<B> {
    /// Create a viewer and start loading `source`
    pub fn new(source: DocumentSource, backend: B) -> Self {
        Self::with_zoom(source, backend, ZoomLevel::default())
    }

    pub fn with_zoom(source: DocumentSource, mut backend: B, zoom: ZoomLevel) -> Self {
        info!("Opening {source}");
        backend.open(&source);
        Self {
            source,
            backend,
            state: ViewerState::new(zoom),
            form: PageJumpForm::new(),
            images: HashMap::new(),
            status: LoadStatus::Loading,
            pending_notifications: 0,
        }
    }

    #[must_use]
    pub fn source(&self) -> &DocumentSource {
        &self.source
    }

    #[must_use]
    pub fn state(&self) -> &ViewerState {
        &self.state
    }

    #[must_use]
    pub fn form(&self) -> &PageJumpForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut PageJumpForm {
        &mut self.form
    }

    #[must_use]
    pub fn status(&self) -> LoadStatus {
        self.status
    }

    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn prev_page(&mut self) {
        self.apply(Command::PrevPage);
    }

    pub fn next_page(&mut self) {
        self.apply(Command::NextPage);
    }

    pub fn set_zoom(&mut self, zoom: ZoomLevel) {
        self.apply(Command::SetZoom(zoom));
    }

    pub fn rotate(&mut self) {
        self.apply(Command::Rotate);
    }

    pub fn set_viewport_width(&mut self, width_px: u32) {
        self.apply(Command::SetViewportWidth(width_px));
    }

    /// Submit the page-jump form; returns the page jumped to
    pub fn submit_page_jump(&mut self) -> Option<u32> {
        let page = self.form.submit(self.state.total_pages)?;
        debug!("Page jump to {page}");
        self.apply(Command::GoToPage(page));
        Some(page)
    }

    /// Focus the page-jump input
    pub fn focus_page_input(&mut self) {
        self.form.focus();
    }

    /// Leave the page-jump input without submitting
    pub fn blur_page_input(&mut self) {
        self.form.blur(self.state.current_page);
    }

    /// Page area height in pixel rows, used to keep the scroll offset in range
    pub fn set_viewport_rows(&mut self, rows: u32) {
        self.state.set_viewport_rows(rows);
    }

    /// Scroll the shown page by `delta` pixel rows
    pub fn scroll_by(&mut self, delta: i32, visible_rows: u32) -> bool {
        let content_rows = self.visible_page().map_or(0, |page| page.height_px);
        self.state.scroll_by(delta, content_rows, visible_rows)
    }

    /// Scroll the shown page sideways by `delta` pixel columns
    pub fn scroll_x_by(&mut self, delta: i32, visible_cols: u32) -> bool {
        let content_cols = self.visible_page().map_or(0, |page| page.width_px);
        self.state.scroll_x_by(delta, content_cols, visible_cols)
    }

    /// Image of the layer currently on screen
    #[must_use]
    pub fn visible_page(&self) -> Option<&RenderedPage> {
        let key = self.state.layers().shown?;
        self.images.get(&key).map(Arc::as_ref)
    }

    /// Drain backend events; returns true if anything visible changed
    pub fn poll(&mut self, notifications: &mut NotificationManager) -> bool {
        let events = self.backend.poll();
        let changed = !events.is_empty();

        for event in events {
            match event {
                RenderEvent::Loaded { page_count } => {
                    info!("{} loaded with {page_count} pages", self.source);
                    self.status = LoadStatus::Loaded;
                    self.apply(Command::DocumentLoaded { page_count });
                }
                RenderEvent::LoadFailed { reason } => {
                    warn!("{} failed to load: {reason}", self.source);
                    self.status = LoadStatus::Failed;
                    self.apply(Command::LoadFailed);
                }
                RenderEvent::Rendered(page) => {
                    let key = page.key;
                    self.images.insert(key, page);
                    self.apply(Command::PageRendered(key));
                }
                RenderEvent::RenderFailed { key, reason } => {
                    warn!("Render of page {} failed: {reason}", key.page);
                    self.apply(Command::RenderFailed(key));
                }
            }
        }

        for _ in 0..std::mem::take(&mut self.pending_notifications) {
            notifications.error(LOAD_ERROR_TITLE, LOAD_ERROR_DESCRIPTION);
        }
        changed
    }

    fn apply(&mut self, cmd: Command) {
        let effects = self.state.apply(cmd);
        self.execute_effects(effects);
    }

    fn execute_effects(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::RequestRender(key) => self.backend.request(key),
                Effect::SyncPageInput(page) => {
                    if !self.form.is_focused() {
                        self.form.sync(page);
                    }
                }
                Effect::NotifyLoadError => self.pending_notifications += 1,
                Effect::LayerSettled(key) => {
                    self.images.retain(|k, _| *k == key);
                    if let Some(page) = self.images.get(&key) {
                        self.state.settle_scroll(page.width_px, page.height_px);
                    }
                }
                Effect::DiscardRender(key) => {
                    if self.state.layers().shown != Some(key) {
                        self.images.remove(&key);
                    }
                }
            }
        }
    }
}
