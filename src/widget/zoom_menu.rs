use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState},
};

use crate::theme::current_theme;
use crate::viewer::ZoomLevel;

pub enum ZoomMenuAction {
    Close,
    Select(ZoomLevel),
}

/// Drop-down listing the zoom levels
pub struct ZoomMenu {
    state: ListState,
    current: ZoomLevel,
}

impl Default for ZoomMenu {
    fn default() -> Self {
        Self::new(ZoomLevel::default())
    }
}

impl ZoomMenu {
    /// Open with the current zoom highlighted
    pub fn new(current: ZoomLevel) -> Self {
        let mut state = ListState::default();
        state.select(Some(current.index()));
        Self { state, current }
    }

    pub fn highlighted(&self) -> ZoomLevel {
        self.state
            .selected()
            .and_then(|i| ZoomLevel::ALL.get(i).copied())
            .unwrap_or(self.current)
    }

    fn next(&mut self) {
        let i = match self.state.selected() {
            Some(i) if i + 1 < ZoomLevel::ALL.len() => i + 1,
            _ => 0,
        };
        self.state.select(Some(i));
    }

    fn previous(&mut self) {
        let i = match self.state.selected() {
            Some(0) | None => ZoomLevel::ALL.len() - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<ZoomMenuAction> {
        match key.code {
            KeyCode::Down | KeyCode::Char('j') => {
                self.next();
                None
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.previous();
                None
            }
            KeyCode::Enter => Some(ZoomMenuAction::Select(self.highlighted())),
            KeyCode::Esc | KeyCode::Char('z') => Some(ZoomMenuAction::Close),
            _ => None,
        }
    }

    /// Draw below `anchor`, the zoom button's cell range in the toolbar
    pub fn render(&mut self, f: &mut Frame, anchor: Rect) {
        let screen = f.area();
        let width = 12.min(screen.width);
        let height = (ZoomLevel::ALL.len() as u16 + 2).min(screen.height.saturating_sub(anchor.bottom()));
        let x = anchor.x.min(screen.width.saturating_sub(width));
        let popup_area = Rect::new(x, anchor.bottom(), width, height);

        f.render_widget(Clear, popup_area);

        let palette = current_theme();
        let items: Vec<ListItem> = ZoomLevel::ALL
            .iter()
            .map(|level| {
                let marker = if *level == self.current { " ✓" } else { "" };
                ListItem::new(Line::from(vec![
                    Span::styled(level.label(), Style::default().fg(palette.base_06)),
                    Span::styled(marker, Style::default().fg(palette.base_0b)),
                ]))
            })
            .collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .title(" Zoom ")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(palette.base_0c))
                    .style(Style::default().bg(palette.base_00)),
            )
            .highlight_style(
                Style::default()
                    .bg(palette.base_02)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("» ");

        f.render_stateful_widget(list, popup_area, &mut self.state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn press(menu: &mut ZoomMenu, code: KeyCode) -> Option<ZoomMenuAction> {
        menu.handle_key(KeyEvent::new(code, KeyModifiers::empty()))
    }

    #[test]
    fn opens_on_current_level() {
        let menu = ZoomMenu::new(ZoomLevel::Double);
        assert_eq!(menu.highlighted(), ZoomLevel::Double);
    }

    #[test]
    fn arrows_wrap_around() {
        let mut menu = ZoomMenu::new(ZoomLevel::DoubleAndHalf);
        press(&mut menu, KeyCode::Down);
        assert_eq!(menu.highlighted(), ZoomLevel::Actual);
        press(&mut menu, KeyCode::Up);
        assert_eq!(menu.highlighted(), ZoomLevel::DoubleAndHalf);
    }

    #[test]
    fn enter_selects_highlighted() {
        let mut menu = ZoomMenu::new(ZoomLevel::Actual);
        press(&mut menu, KeyCode::Down);
        match press(&mut menu, KeyCode::Enter) {
            Some(ZoomMenuAction::Select(level)) => assert_eq!(level, ZoomLevel::OneAndHalf),
            _ => panic!("expected a selection"),
        }
        assert!(matches!(press(&mut menu, KeyCode::Esc), Some(ZoomMenuAction::Close)));
    }
}
