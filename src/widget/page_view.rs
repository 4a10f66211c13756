//! Page area: draws a rendered page as half-block cells
//!
//! Each terminal cell shows two pixel rows, the upper one as the `▀`
//! foreground and the lower one as the background. One column is one pixel.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::Line,
    widgets::Widget,
};

use crate::render::RenderedPage;
use crate::theme::Base16Palette;
use crate::viewer::LoadStatus;

const UPPER_HALF: &str = "▀";

pub const LOADING_TEXT: &str = "Loading…";
pub const FAILED_TEXT: &str = "Failed to load document";
pub const RENDERING_TEXT: &str = "Rendering…";

/// Pixel width of the page area
pub fn viewport_width_px(area: Rect) -> u32 {
    u32::from(area.width)
}

/// Pixel rows visible in the page area
pub fn viewport_rows(area: Rect) -> u32 {
    u32::from(area.height) * 2
}

pub struct PageView<'a> {
    page: Option<&'a RenderedPage>,
    status: LoadStatus,
    scroll_x: u32,
    scroll_y: u32,
    palette: &'a Base16Palette,
}

impl<'a> PageView<'a> {
    pub fn new(page: Option<&'a RenderedPage>, status: LoadStatus, palette: &'a Base16Palette) -> Self {
        Self {
            page,
            status,
            scroll_x: 0,
            scroll_y: 0,
            palette,
        }
    }

    /// Start drawing at pixel column `x` and pixel row `y` of the page
    #[must_use]
    pub fn scroll(mut self, x: u32, y: u32) -> Self {
        self.scroll_x = x;
        self.scroll_y = y;
        self
    }

    fn placeholder(&self) -> Option<(&'static str, Style)> {
        match (self.status, self.page) {
            (LoadStatus::Loading, _) => Some((LOADING_TEXT, Style::default().fg(self.palette.base_04))),
            (LoadStatus::Failed, _) => Some((FAILED_TEXT, Style::default().fg(self.palette.base_08))),
            (LoadStatus::Loaded, None) => {
                Some((RENDERING_TEXT, Style::default().fg(self.palette.base_04)))
            }
            (LoadStatus::Loaded, Some(_)) => None,
        }
    }
}

impl Widget for PageView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let background = self.palette.base_00;
        buf.set_style(area, Style::default().bg(background));
        if area.is_empty() {
            return;
        }

        if let Some((text, style)) = self.placeholder() {
            let row = Rect::new(area.x, area.y + area.height / 2, area.width, 1);
            Line::styled(text, style).centered().render(row, buf);
            return;
        }
        let Some(page) = self.page else {
            return;
        };

        // Narrow pages are centred; wide ones start at the horizontal offset
        let left_pad = area.width.saturating_sub(clamp_u16(page.width_px)) / 2;
        let first_col = if left_pad == 0 { self.scroll_x } else { 0 };

        for row in 0..area.height {
            let top_y = self.scroll_y + u32::from(row) * 2;
            if top_y >= page.height_px {
                break;
            }
            for col in 0..area.width.saturating_sub(left_pad) {
                let px = first_col + u32::from(col);
                let Some(top) = page.pixel(px, top_y) else {
                    break;
                };
                let bottom = page
                    .pixel(px, top_y + 1)
                    .map_or(background, |(r, g, b)| Color::Rgb(r, g, b));

                buf[(area.x + left_pad + col, area.y + row)]
                    .set_symbol(UPPER_HALF)
                    .set_fg(Color::Rgb(top.0, top.1, top.2))
                    .set_bg(bottom);
            }
        }
    }
}

fn clamp_u16(value: u32) -> u16 {
    u16::try_from(value).unwrap_or(u16::MAX)
}
