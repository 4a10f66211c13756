//! Viewer state management
//!
//! All paging, zoom and rotation changes go through [`ViewerState::apply`],
//! which returns the effects the caller has to carry out.

use crate::render::RenderKey;

use super::layers::{LayerStack, LayerView};
use super::{Rotation, ZoomLevel};

/// Current view state for one document
#[derive(Clone, Debug)]
pub struct ViewerState {
    /// Page count, unknown until the document loads
    pub total_pages: Option<u32>,

    /// Current page (1-indexed)
    pub current_page: u32,

    /// Selected zoom level
    pub zoom: ZoomLevel,

    pub rotation: Rotation,

    /// Page area width in pixels; 0 until the first layout
    pub viewport_width_px: u32,

    /// Page area height in pixel rows
    pub viewport_rows: u32,

    /// Vertical offset into the rendered page, in pixel rows
    pub scroll_offset: u32,

    /// Horizontal offset into the rendered page, in pixel columns
    pub scroll_x: u32,

    layers: LayerStack,

    /// Pixel size of the image the scroll offsets refer to
    shown_size: Option<(u32, u32)>,
}

impl Default for ViewerState {
    fn default() -> Self {
        Self::new(ZoomLevel::default())
    }
}

impl ViewerState {
    #[must_use]
    pub fn new(zoom: ZoomLevel) -> Self {
        Self {
            total_pages: None,
            current_page: 1,
            zoom,
            rotation: Rotation::NONE,
            viewport_width_px: 0,
            viewport_rows: 0,
            scroll_offset: 0,
            scroll_x: 0,
            layers: LayerStack::new(),
            shown_size: None,
        }
    }

    /// Apply a command and return resulting effects
    #[must_use]
    pub fn apply(&mut self, cmd: Command) -> Vec<Effect> {
        match cmd {
            Command::DocumentLoaded { page_count } => {
                self.total_pages = Some(page_count.max(1));
                self.current_page = 1;
                self.reset_scroll();
                let mut effects = vec![Effect::SyncPageInput(1)];
                effects.extend(self.refresh());
                effects
            }

            Command::LoadFailed => vec![Effect::NotifyLoadError],

            Command::PrevPage => {
                if !self.can_go_prev() {
                    return vec![];
                }
                self.change_page(self.current_page - 1)
            }

            Command::NextPage => {
                if !self.can_go_next() {
                    return vec![];
                }
                self.change_page(self.current_page + 1)
            }

            Command::GoToPage(page) => match self.total_pages {
                Some(total) if (1..=total).contains(&page) => {
                    if page == self.current_page {
                        vec![Effect::SyncPageInput(page)]
                    } else {
                        self.change_page(page)
                    }
                }
                _ => vec![],
            },

            Command::SetZoom(zoom) => {
                if self.zoom == zoom {
                    return vec![];
                }
                self.zoom = zoom;
                self.refresh()
            }

            Command::Rotate => {
                self.rotation = self.rotation.clockwise();
                self.reset_scroll();
                self.refresh()
            }

            Command::SetViewportWidth(width) => {
                if self.viewport_width_px == width {
                    return vec![];
                }
                self.viewport_width_px = width;
                self.refresh()
            }

            Command::PageRendered(key) => {
                if self.layers.complete(key) {
                    vec![Effect::LayerSettled(key)]
                } else {
                    vec![Effect::DiscardRender(key)]
                }
            }

            Command::RenderFailed(key) => {
                if self.layers.abandon(key) {
                    vec![Effect::DiscardRender(key)]
                } else {
                    vec![]
                }
            }
        }
    }

    fn change_page(&mut self, page: u32) -> Vec<Effect> {
        self.current_page = page;
        self.reset_scroll();
        let mut effects = vec![Effect::SyncPageInput(page)];
        effects.extend(self.refresh());
        effects
    }

    /// Point the layer stack at the current key, requesting a render if needed
    fn refresh(&mut self) -> Vec<Effect> {
        match self.current_key() {
            Some(key) if self.layers.request(key) => vec![Effect::RequestRender(key)],
            _ => vec![],
        }
    }

    /// Render key for the current page, once the document and layout are known
    #[must_use]
    pub fn current_key(&self) -> Option<RenderKey> {
        self.total_pages?;
        if self.viewport_width_px == 0 {
            return None;
        }
        Some(RenderKey {
            page: self.current_page,
            zoom: self.zoom,
            rotation: self.rotation,
            width_px: self.viewport_width_px,
        })
    }

    #[must_use]
    pub fn can_go_prev(&self) -> bool {
        self.total_pages.is_some() && self.current_page > 1
    }

    #[must_use]
    pub fn can_go_next(&self) -> bool {
        self.total_pages
            .is_some_and(|total| self.current_page < total)
    }

    /// Zoom level of the image currently on screen
    #[must_use]
    pub fn settled_scale(&self) -> Option<ZoomLevel> {
        self.layers.committed().map(|key| key.zoom)
    }

    /// True while the shown image is at a different zoom than selected
    #[must_use]
    pub fn is_rescaling(&self) -> bool {
        self.settled_scale() != Some(self.zoom)
    }

    #[must_use]
    pub fn layers(&self) -> LayerView {
        self.layers.view()
    }

    /// Move the scroll offset by `delta` rows, keeping `visible_rows` of a
    /// `content_rows`-tall image on screen
    pub fn scroll_by(&mut self, delta: i32, content_rows: u32, visible_rows: u32) -> bool {
        let next = step(self.scroll_offset, delta, content_rows, visible_rows);
        let changed = next != self.scroll_offset;
        self.scroll_offset = next;
        changed
    }

    /// Horizontal counterpart of [`Self::scroll_by`]
    pub fn scroll_x_by(&mut self, delta: i32, content_cols: u32, visible_cols: u32) -> bool {
        let next = step(self.scroll_x, delta, content_cols, visible_cols);
        let changed = next != self.scroll_x;
        self.scroll_x = next;
        changed
    }

    pub fn set_viewport_rows(&mut self, rows: u32) {
        self.viewport_rows = rows;
        self.clamp_scroll();
    }

    /// Carry the scroll position over to a newly shown `width` x `height` image.
    ///
    /// The offsets keep their relative position on the page and are then
    /// clamped, so a smaller image is never scrolled past its end.
    pub fn settle_scroll(&mut self, width: u32, height: u32) {
        if let Some((old_width, old_height)) = self.shown_size.replace((width, height)) {
            self.scroll_offset = rescale(self.scroll_offset, old_height, height);
            self.scroll_x = rescale(self.scroll_x, old_width, width);
        }
        self.clamp_scroll();
    }

    fn clamp_scroll(&mut self) {
        let Some((width, height)) = self.shown_size else {
            return;
        };
        self.scroll_offset = self
            .scroll_offset
            .min(height.saturating_sub(self.viewport_rows.max(1)));
        self.scroll_x = self
            .scroll_x
            .min(width.saturating_sub(self.viewport_width_px.max(1)));
    }

    fn reset_scroll(&mut self) {
        self.scroll_offset = 0;
        self.scroll_x = 0;
    }
}

fn step(offset: u32, delta: i32, content: u32, visible: u32) -> u32 {
    let max = content.saturating_sub(visible);
    (i64::from(offset) + i64::from(delta)).clamp(0, i64::from(max)) as u32
}

fn rescale(offset: u32, from: u32, to: u32) -> u32 {
    if from == 0 {
        return 0;
    }
    u32::try_from(u64::from(offset) * u64::from(to) / u64::from(from)).unwrap_or(u32::MAX)
}

/// Commands that modify viewer state
#[derive(Clone, Debug)]
pub enum Command {
    DocumentLoaded { page_count: u32 },
    LoadFailed,
    PrevPage,
    NextPage,
    GoToPage(u32),
    SetZoom(ZoomLevel),
    Rotate,
    SetViewportWidth(u32),
    PageRendered(RenderKey),
    RenderFailed(RenderKey),
}

/// Effects produced by state changes
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    /// Ask the backend for this render
    RequestRender(RenderKey),
    /// Put this page number into the jump input
    SyncPageInput(u32),
    /// Tell the user the document failed to load
    NotifyLoadError,
    /// The render for this key is now the shown layer
    LayerSettled(RenderKey),
    /// Drop this render's image, nothing shows it
    DiscardRender(RenderKey),
}
