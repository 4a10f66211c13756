//! Terminal input for the main loop
//!
//! The loop only sees an [`EventSource`], so app tests can drive it with a
//! fixed key script instead of a real terminal.

use std::collections::VecDeque;
use std::time::Duration;

use anyhow::Result;
pub use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};

pub trait EventSource {
    /// Wait up to `timeout` for input; true if [`EventSource::read`] won't block
    fn poll(&mut self, timeout: Duration) -> Result<bool>;

    fn read(&mut self) -> Result<Event>;
}

/// Keyboard input from the controlling terminal
pub struct KeyboardEventSource;

impl EventSource for KeyboardEventSource {
    fn poll(&mut self, timeout: Duration) -> Result<bool> {
        Ok(crossterm::event::poll(timeout)?)
    }

    fn read(&mut self) -> Result<Event> {
        Ok(crossterm::event::read()?)
    }
}

/// Replays a fixed list of key presses.
///
/// After the last one it answers Ctrl+C forever, so a script that forgets to
/// quit (or ends inside the page-number field, where `q` is just text)
/// still ends the run.
pub struct ScriptedEventSource {
    pending: VecDeque<Event>,
}

impl ScriptedEventSource {
    pub fn new(events: impl IntoIterator<Item = Event>) -> Self {
        Self {
            pending: events.into_iter().collect(),
        }
    }

    pub fn press(code: KeyCode, modifiers: KeyModifiers) -> Event {
        Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::empty(),
        })
    }

    pub fn char_key(c: char) -> Event {
        Self::press(KeyCode::Char(c), KeyModifiers::empty())
    }

    pub fn ctrl_char_key(c: char) -> Event {
        Self::press(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    pub fn remaining(&self) -> usize {
        self.pending.len()
    }

    pub fn is_exhausted(&self) -> bool {
        self.pending.is_empty()
    }
}

impl EventSource for ScriptedEventSource {
    fn poll(&mut self, _timeout: Duration) -> Result<bool> {
        Ok(true)
    }

    fn read(&mut self) -> Result<Event> {
        Ok(self
            .pending
            .pop_front()
            .unwrap_or_else(|| Self::ctrl_char_key('c')))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code_of(event: Event) -> (KeyCode, KeyModifiers) {
        match event {
            Event::Key(key) => (key.code, key.modifiers),
            other => panic!("expected a key press, got {other:?}"),
        }
    }

    #[test]
    fn replays_page_jump_in_order() {
        let mut source = ScriptedEventSource::new(
            "g12"
                .chars()
                .map(ScriptedEventSource::char_key)
                .chain([ScriptedEventSource::press(KeyCode::Enter, KeyModifiers::empty())]),
        );
        assert_eq!(source.remaining(), 4);
        assert!(source.poll(Duration::ZERO).unwrap());

        let typed: Vec<KeyCode> = (0..4).map(|_| code_of(source.read().unwrap()).0).collect();
        assert_eq!(
            typed,
            vec![
                KeyCode::Char('g'),
                KeyCode::Char('1'),
                KeyCode::Char('2'),
                KeyCode::Enter
            ]
        );
        assert!(source.is_exhausted());
    }

    #[test]
    fn exhausted_script_keeps_asking_to_quit() {
        let mut source = ScriptedEventSource::new([ScriptedEventSource::char_key('l')]);
        assert_eq!(code_of(source.read().unwrap()).0, KeyCode::Char('l'));

        for _ in 0..3 {
            let (code, modifiers) = code_of(source.read().unwrap());
            assert_eq!(code, KeyCode::Char('c'));
            assert!(modifiers.contains(KeyModifiers::CONTROL));
        }
    }

    #[test]
    fn shifted_arrow_keeps_modifier() {
        let mut source = ScriptedEventSource::new([ScriptedEventSource::press(
            KeyCode::Right,
            KeyModifiers::SHIFT,
        )]);
        assert_eq!(
            code_of(source.read().unwrap()),
            (KeyCode::Right, KeyModifiers::SHIFT)
        );
    }
}
