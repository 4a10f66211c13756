use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

use crate::notification::{Notification, NotificationLevel};
use crate::theme::Base16Palette;

/// One-line toast for the newest notification
pub struct Toast<'a> {
    notification: &'a Notification,
    palette: &'a Base16Palette,
}

impl<'a> Toast<'a> {
    pub fn new(notification: &'a Notification, palette: &'a Base16Palette) -> Self {
        Self {
            notification,
            palette,
        }
    }

    pub fn styled_line(&self) -> Line<'static> {
        let p = self.palette;
        let title_style = match self.notification.level {
            NotificationLevel::Info => Style::default().fg(p.base_06).bg(p.base_02),
            NotificationLevel::Warning => Style::default().fg(p.base_00).bg(p.base_0a),
            NotificationLevel::Error => Style::default().fg(p.base_07).bg(p.base_08),
        }
        .add_modifier(Modifier::BOLD);

        Line::from(vec![
            Span::styled(format!(" {} ", self.notification.title), title_style),
            Span::styled(
                format!(" {} ", self.notification.description),
                Style::default().fg(p.base_05).bg(p.base_01),
            ),
        ])
        .centered()
    }
}

impl Widget for Toast<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.styled_line().render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::current_theme;
    use std::time::Duration;

    #[test]
    fn error_toast_shows_title_and_description() {
        let n = Notification::new(
            "Error",
            "Please try again later",
            NotificationLevel::Error,
            Duration::from_secs(5),
        );
        let palette = current_theme();
        let line = Toast::new(&n, palette).styled_line();
        let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(text, " Error  Please try again later ");
        assert_eq!(line.spans[0].style.bg, Some(palette.base_08));
    }
}
