//! Application shell: key routing, per-tick polling and frame layout

use std::time::Duration;

use anyhow::Result;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use log::{debug, info};
use ratatui::{
    Frame, Terminal,
    layout::{Constraint, Layout, Rect},
};

use crate::billing::{Navigator, SessionClient, UpgradeAction};
use crate::event_source::EventSource;
use crate::fullscreen::{FullScreenAction, FullScreenViewer};
use crate::notification::NotificationManager;
use crate::render::RenderBackend;
use crate::theme::current_theme;
use crate::viewer::DocumentViewer;
use crate::widget::page_view::{self, PageView};
use crate::widget::{Toast, Toolbar, ToolbarView, ZoomMenu, ZoomMenuAction};

/// Pixel rows moved per j/k press
const SCROLL_STEP: i32 = 2;
const PAN_STEP: i32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Page,
    PageInput,
    ZoomMenu,
}

pub type BackendFactory<B> = Box<dyn FnMut() -> B>;

pub struct App<B: RenderBackend, C: SessionClient, N: Navigator> {
    pub viewer: DocumentViewer<B>,
    pub upgrade: UpgradeAction<C, N>,
    pub notifications: NotificationManager,
    pub fullscreen: Option<FullScreenViewer<B>>,
    focus: Focus,
    zoom_menu: Option<ZoomMenu>,
    backend_factory: BackendFactory<B>,
    page_area: Rect,
    should_quit: bool,
}

impl<B: RenderBackend, C: SessionClient, N: Navigator> App<B, C, N> {
    /// `backend_factory` builds the extra backend a full-screen view opens
    /// the document with
    pub fn new(
        viewer: DocumentViewer<B>,
        upgrade: UpgradeAction<C, N>,
        notifications: NotificationManager,
        backend_factory: BackendFactory<B>,
    ) -> Self {
        Self {
            viewer,
            upgrade,
            notifications,
            fullscreen: None,
            focus: Focus::Page,
            zoom_menu: None,
            backend_factory,
            page_area: Rect::default(),
            should_quit: false,
        }
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen.is_some()
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        if let Some(fullscreen) = self.fullscreen.as_mut() {
            if fullscreen.handle_key(key) == Some(FullScreenAction::Close) {
                debug!("Leaving full screen");
                self.fullscreen = None;
            }
            return;
        }

        match self.focus {
            Focus::PageInput => self.handle_page_input_key(key),
            Focus::ZoomMenu => self.handle_zoom_menu_key(key),
            Focus::Page => self.handle_page_key(key),
        }
    }

    fn handle_page_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
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
            KeyCode::Char('g') => {
                self.viewer.focus_page_input();
                self.focus = Focus::PageInput;
            }
            KeyCode::Char('z') => {
                self.zoom_menu = Some(ZoomMenu::new(self.viewer.state().zoom));
                self.focus = Focus::ZoomMenu;
            }
            KeyCode::Char('r') => self.viewer.rotate(),
            KeyCode::Char('f') => self.open_fullscreen(),
            KeyCode::Char('u') => {
                if !self.upgrade.activate() {
                    debug!("Upgrade already in progress");
                }
            }
            KeyCode::Char('j') | KeyCode::Down => {
                self.viewer
                    .scroll_by(SCROLL_STEP, page_view::viewport_rows(self.page_area));
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.viewer
                    .scroll_by(-SCROLL_STEP, page_view::viewport_rows(self.page_area));
            }
            KeyCode::Esc => {
                self.notifications.dismiss_current();
            }
            _ => {}
        }
    }

    fn handle_page_input_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char(c) => self.viewer.form_mut().push_char(c),
            KeyCode::Backspace => self.viewer.form_mut().backspace(),
            KeyCode::Enter => {
                if self.viewer.submit_page_jump().is_some() {
                    self.focus = Focus::Page;
                }
            }
            KeyCode::Esc => {
                self.viewer.blur_page_input();
                self.focus = Focus::Page;
            }
            _ => {}
        }
    }

    fn handle_zoom_menu_key(&mut self, key: KeyEvent) {
        let Some(menu) = self.zoom_menu.as_mut() else {
            self.focus = Focus::Page;
            return;
        };
        match menu.handle_key(key) {
            Some(ZoomMenuAction::Select(zoom)) => {
                info!("Zoom set to {zoom}");
                self.viewer.set_zoom(zoom);
                self.close_zoom_menu();
            }
            Some(ZoomMenuAction::Close) => self.close_zoom_menu(),
            None => {}
        }
    }

    fn close_zoom_menu(&mut self) {
        self.zoom_menu = None;
        self.focus = Focus::Page;
    }

    fn open_fullscreen(&mut self) {
        let backend = (self.backend_factory)();
        self.fullscreen = Some(FullScreenViewer::new(self.viewer.source().clone(), backend));
    }

    /// Expire toasts and drain the background collaborators
    pub fn tick(&mut self) -> bool {
        let mut changed = self.notifications.update();
        changed |= self.viewer.poll(&mut self.notifications);
        if let Some(fullscreen) = self.fullscreen.as_mut() {
            changed |= fullscreen.poll(&mut self.notifications);
        }
        changed |= self.upgrade.poll(&mut self.notifications).is_some();
        changed
    }

    pub fn draw(&mut self, f: &mut Frame) {
        let area = f.area();
        let [body_area, toast_area] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(area);

        if let Some(fullscreen) = self.fullscreen.as_mut() {
            fullscreen.draw(f, body_area);
        } else {
            self.draw_viewer(f, body_area);
        }

        if let Some(notification) = self.notifications.current() {
            f.render_widget(Toast::new(notification, current_theme()), toast_area);
        }
    }

    fn draw_viewer(&mut self, f: &mut Frame, area: Rect) {
        let [toolbar_area, page_area] =
            Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).areas(area);

        if page_area.width != self.page_area.width {
            self.viewer
                .set_viewport_width(page_view::viewport_width_px(page_area));
        }
        self.page_area = page_area;
        self.viewer
            .set_viewport_rows(page_view::viewport_rows(page_area));

        let palette = current_theme();
        let state = self.viewer.state();
        let form = self.viewer.form();
        let toolbar = Toolbar::new(
            ToolbarView {
                can_prev: state.can_go_prev(),
                can_next: state.can_go_next(),
                input: form.input(),
                input_focused: form.is_focused(),
                error: form.error(),
                total_pages: state.total_pages,
                zoom: state.zoom,
                zoom_menu_open: self.zoom_menu.is_some(),
                rotation: state.rotation,
                upgrade_pending: self.upgrade.is_pending(),
            },
            palette,
        );
        let zoom_anchor = toolbar.zoom_anchor(toolbar_area);
        f.render_widget(toolbar, toolbar_area);

        f.render_widget(
            PageView::new(self.viewer.visible_page(), self.viewer.status(), palette)
                .scroll(state.scroll_x, state.scroll_offset),
            page_area,
        );

        if let Some(menu) = self.zoom_menu.as_mut() {
            menu.render(f, zoom_anchor);
        }
    }
}

/// Main loop: poll collaborators, redraw, handle at most one key per pass
pub fn run_app_with_event_source<B, R, C, N>(
    terminal: &mut Terminal<B>,
    app: &mut App<R, C, N>,
    event_source: &mut dyn EventSource,
) -> Result<()>
where
    B: ratatui::backend::Backend,
    B::Error: Send + Sync + 'static,
    R: RenderBackend,
    C: SessionClient,
    N: Navigator,
{
    let tick_rate = Duration::from_millis(50);
    loop {
        app.tick();
        terminal.draw(|f| app.draw(f))?;

        if app.should_quit() {
            info!("Quitting");
            return Ok(());
        }

        if event_source.poll(tick_rate)? {
            if let Event::Key(key) = event_source.read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }
    }
}
