//! Full-screen presentation of a document
//!
//! Gets only the [`DocumentSource`]; it opens the document again through its
//! own backend and keeps its own page position.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use log::debug;
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
};

use crate::notification::NotificationManager;
use crate::render::{DocumentSource, RenderBackend};
use crate::theme::current_theme;
use crate::viewer::{DocumentViewer, ZoomLevel};
use crate::widget::page_view::{self, PageView};
use crate::widget::toolbar::Toolbar;

const SCROLL_STEP: i32 = 2;
const PAN_STEP: i32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FullScreenAction {
    Close,
}

pub struct FullScreenViewer<B: RenderBackend> {
    viewer: DocumentViewer<B>,
    page_area: Rect,
}

impl<B: RenderBackend> FullScreenViewer<B> {
    pub fn new(source: DocumentSource, backend: B) -> Self {
        debug!("Entering full screen for {source}");
        Self {
            viewer: DocumentViewer::with_zoom(source, backend, ZoomLevel::Actual),
            page_area: Rect::default(),
        }
    }

    pub fn viewer(&self) -> &DocumentViewer<B> {
        &self.viewer
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<FullScreenAction> {
        match key.code {
            KeyCode::Esc | KeyCode::Char('f') => return Some(FullScreenAction::Close),
            KeyCode::Left if key.modifiers.contains(KeyModifiers::SHIFT) => {
                self.viewer
                    .scroll_x_by(-PAN_STEP, page_view::viewport_width_px(self.page_area));
            }
            KeyCode::Right if key.modifiers.contains(KeyModifiers::SHIFT) => {
                self.viewer
                    .scroll_x_by(PAN_STEP, page_view::viewport_width_px(self.page_area));
            }
            KeyCode::Char('H') => {
                self.viewer
                    .scroll_x_by(-PAN_STEP, page_view::viewport_width_px(self.page_area));
            }
            KeyCode::Char('L') => {
                self.viewer
                    .scroll_x_by(PAN_STEP, page_view::viewport_width_px(self.page_area));
            }
            KeyCode::Left | KeyCode::Char('h') => self.viewer.prev_page(),
            KeyCode::Right | KeyCode::Char('l') => self.viewer.next_page(),
            KeyCode::Char('j') | KeyCode::Down => {
                self.viewer
                    .scroll_by(SCROLL_STEP, page_view::viewport_rows(self.page_area));
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.viewer
                    .scroll_by(-SCROLL_STEP, page_view::viewport_rows(self.page_area));
            }
            _ => {}
        }
        None
    }

    pub fn poll(&mut self, notifications: &mut NotificationManager) -> bool {
        self.viewer.poll(notifications)
    }

    pub fn draw(&mut self, f: &mut Frame, area: Rect) {
        let [page_area, status_area] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(area);

        if page_area != self.page_area {
            self.page_area = page_area;
            self.viewer
                .set_viewport_width(page_view::viewport_width_px(page_area));
            self.viewer
                .set_viewport_rows(page_view::viewport_rows(page_area));
        }

        let palette = current_theme();
        let state = self.viewer.state();
        f.render_widget(
            PageView::new(self.viewer.visible_page(), self.viewer.status(), palette)
                .scroll(state.scroll_x, state.scroll_offset),
            page_area,
        );

        let status = Line::from(vec![
            Span::styled(
                format!(
                    " {} {} ",
                    state.current_page,
                    Toolbar::total_label(state.total_pages)
                ),
                Style::default().fg(palette.base_06).bg(palette.base_01),
            ),
            Span::styled("  ←/→ page  j/k H/L scroll  Esc exit", palette.muted()),
        ]);
        f.render_widget(status, status_area);
    }
}
