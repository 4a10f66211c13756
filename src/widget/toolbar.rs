use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

use crate::theme::Base16Palette;
use crate::viewer::{PageJumpError, Rotation, ZoomLevel};

pub const UPGRADE_LABEL: &str = "Upgrade now →";

/// Everything the toolbar shows, copied out of the viewer for one frame
#[derive(Clone, Debug)]
pub struct ToolbarView<'a> {
    pub can_prev: bool,
    pub can_next: bool,
    pub input: &'a str,
    pub input_focused: bool,
    pub error: Option<&'a PageJumpError>,
    pub total_pages: Option<u32>,
    pub zoom: ZoomLevel,
    pub zoom_menu_open: bool,
    pub rotation: Rotation,
    pub upgrade_pending: bool,
}

pub struct Toolbar<'a> {
    view: ToolbarView<'a>,
    palette: &'a Base16Palette,
}

impl<'a> Toolbar<'a> {
    pub fn new(view: ToolbarView<'a>, palette: &'a Base16Palette) -> Self {
        Self { view, palette }
    }

    /// "/ N" once the page count is known, "/ x" before
    pub fn total_label(total_pages: Option<u32>) -> String {
        match total_pages {
            Some(total) => format!("/ {total}"),
            None => "/ x".to_string(),
        }
    }

    pub fn line(&self) -> Line<'static> {
        let p = self.palette;
        let v = &self.view;
        let gap = || Span::styled(" ", Style::default().bg(p.base_00));

        let mut spans = vec![
            Span::styled(" ◀ ", p.button(v.can_prev)),
            gap(),
            Span::styled(
                format!(" {:>3} ", v.input),
                p.input(v.input_focused, v.error.is_some()),
            ),
            Span::styled(
                format!(" {} ", Self::total_label(v.total_pages)),
                Style::default().fg(p.base_05),
            ),
            Span::styled(" ▶ ", p.button(v.can_next)),
            gap(),
        ];

        let zoom_style = if v.zoom_menu_open {
            p.accent()
        } else {
            p.button(true)
        };
        spans.push(Span::styled(format!(" {} ▾ ", v.zoom.label()), zoom_style));
        spans.push(gap());
        spans.push(Span::styled(
            format!(" ↻ {}° ", v.rotation.degrees()),
            p.button(true),
        ));
        spans.push(gap());
        spans.push(Span::styled(" ⤢ ", p.button(true)));
        spans.push(gap());

        let upgrade = if v.upgrade_pending {
            Style::default()
                .fg(p.base_00)
                .bg(p.base_0a)
                .add_modifier(Modifier::BOLD)
        } else {
            p.accent()
        };
        spans.push(Span::styled(format!(" {UPGRADE_LABEL} "), upgrade));

        if let Some(err) = v.error {
            spans.push(gap());
            spans.push(Span::styled(
                err.to_string(),
                Style::default().fg(p.base_08).add_modifier(Modifier::ITALIC),
            ));
        }

        Line::from(spans)
    }

    /// Cells covered by the zoom button, for anchoring the zoom menu
    pub fn zoom_anchor(&self, area: Rect) -> Rect {
        let line = self.line();
        let before: usize = line.spans[..ZOOM_SPAN].iter().map(Span::width).sum();
        let width = line.spans[ZOOM_SPAN].width();
        let x = area.x.saturating_add(u16::try_from(before).unwrap_or(u16::MAX));
        Rect::new(
            x.min(area.right()),
            area.y,
            u16::try_from(width).unwrap_or(0),
            area.height.min(1),
        )
    }
}

const ZOOM_SPAN: usize = 6;

impl Widget for Toolbar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, Style::default().bg(self.palette.base_00));
        self.line().render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::current_theme;

    fn view<'a>() -> ToolbarView<'a> {
        ToolbarView {
            can_prev: false,
            can_next: true,
            input: "1",
            input_focused: false,
            error: None,
            total_pages: Some(10),
            zoom: ZoomLevel::Actual,
            zoom_menu_open: false,
            rotation: Rotation::NONE,
            upgrade_pending: false,
        }
    }

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn shows_page_count_or_placeholder() {
        assert_eq!(Toolbar::total_label(Some(12)), "/ 12");
        assert_eq!(Toolbar::total_label(None), "/ x");
    }

    #[test]
    fn renders_controls_in_order() {
        let toolbar = Toolbar::new(view(), current_theme());
        let rendered = text(&toolbar.line());
        let prev = rendered.find('◀').unwrap();
        let total = rendered.find("/ 10").unwrap();
        let zoom = rendered.find("100%").unwrap();
        let upgrade = rendered.find(UPGRADE_LABEL).unwrap();
        assert!(prev < total && total < zoom && zoom < upgrade);
    }

    #[test]
    fn disabled_prev_is_dimmed() {
        let palette = current_theme();
        let toolbar = Toolbar::new(view(), palette);
        let line = toolbar.line();
        assert_eq!(line.spans[0].style, palette.button(false));
        assert_eq!(line.spans[4].style, palette.button(true));
    }

    #[test]
    fn zoom_anchor_covers_zoom_label() {
        let toolbar = Toolbar::new(view(), current_theme());
        let area = Rect::new(0, 0, 100, 1);
        let anchor = toolbar.zoom_anchor(area);
        let mut buf = Buffer::empty(area);
        toolbar.render(area, &mut buf);
        let label: String = (anchor.x..anchor.right())
            .map(|x| buf[(x, 0)].symbol().to_string())
            .collect();
        assert_eq!(label, " 100% ▾ ");
    }

    #[test]
    fn field_error_is_shown_inline() {
        let err = PageJumpError::OutOfRange { page: 15, total: 10 };
        let mut v = view();
        v.input = "15";
        v.error = Some(&err);
        let rendered = text(&Toolbar::new(v, current_theme()).line());
        assert!(rendered.ends_with(&err.to_string()));
    }
}
