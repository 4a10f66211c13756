pub mod test_helpers {
    use std::sync::{Arc, Mutex};

    use crate::billing::{BillingError, CheckoutSession, Navigator, SessionClient};
    use crate::event_source::{Event, KeyCode, KeyModifiers, ScriptedEventSource};
    use crate::render::{
        DocumentSource, RenderBackend, RenderEvent, RenderKey, RenderedPage, solid_rgb,
    };
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    /// What opening a document does in a [`ScriptedBackend`]
    #[derive(Clone, Debug)]
    pub enum LoadScript {
        Pages(u32),
        Fail(String),
        /// Never answers
        Hang,
    }

    /// Render backend that answers from a script instead of a PDF engine
    ///
    /// Renders complete on the next `poll` unless the backend is in manual
    /// mode, where they wait for [`ScriptedBackend::complete`].
    pub struct ScriptedBackend {
        load: LoadScript,
        manual: bool,
        opened: Vec<DocumentSource>,
        requests: Vec<RenderKey>,
        held: Vec<RenderKey>,
        queue: Vec<RenderEvent>,
    }

    impl ScriptedBackend {
        pub fn new(load: LoadScript) -> Self {
            Self {
                load,
                manual: false,
                opened: Vec::new(),
                requests: Vec::new(),
                held: Vec::new(),
                queue: Vec::new(),
            }
        }

        pub fn loading(pages: u32) -> Self {
            Self::new(LoadScript::Pages(pages))
        }

        pub fn failing() -> Self {
            Self::new(LoadScript::Fail("scripted failure".to_string()))
        }

        /// Hold renders until completed by hand
        pub fn manual(mut self) -> Self {
            self.manual = true;
            self
        }

        pub fn opened(&self) -> &[DocumentSource] {
            &self.opened
        }

        pub fn requests(&self) -> &[RenderKey] {
            &self.requests
        }

        /// Renders waiting for `complete`, oldest first
        pub fn held(&self) -> &[RenderKey] {
            &self.held
        }

        /// Finish a held render; it is delivered on the next `poll`
        pub fn complete(&mut self, key: RenderKey) -> bool {
            let Some(idx) = self.held.iter().position(|k| *k == key) else {
                return false;
            };
            self.held.remove(idx);
            self.queue.push(RenderEvent::Rendered(Arc::new(scripted_page(key))));
            true
        }

        pub fn fail_render(&mut self, key: RenderKey) -> bool {
            let Some(idx) = self.held.iter().position(|k| *k == key) else {
                return false;
            };
            self.held.remove(idx);
            self.queue.push(RenderEvent::RenderFailed {
                key,
                reason: "scripted render failure".to_string(),
            });
            true
        }
    }

    impl RenderBackend for ScriptedBackend {
        fn open(&mut self, source: &DocumentSource) {
            self.opened.push(source.clone());
            match &self.load {
                LoadScript::Pages(page_count) => self.queue.push(RenderEvent::Loaded {
                    page_count: *page_count,
                }),
                LoadScript::Fail(reason) => self.queue.push(RenderEvent::LoadFailed {
                    reason: reason.clone(),
                }),
                LoadScript::Hang => {}
            }
        }

        fn request(&mut self, key: RenderKey) {
            self.requests.push(key);
            if self.manual {
                self.held.push(key);
            } else {
                self.queue.push(RenderEvent::Rendered(Arc::new(scripted_page(key))));
            }
        }

        fn poll(&mut self) -> Vec<RenderEvent> {
            std::mem::take(&mut self.queue)
        }
    }

    /// Colour a scripted render is filled with; differs per page, zoom and rotation
    pub fn page_color(key: RenderKey) -> (u8, u8, u8) {
        (
            (key.page % 256) as u8,
            (key.zoom.index() as u8) * 60,
            key.rotation.quarter_turns() * 60,
        )
    }

    /// Portrait page image for `key`, sideways when rotated a quarter turn
    pub fn scripted_page(key: RenderKey) -> RenderedPage {
        let width_px = key.target_width();
        let height_px = if key.rotation.swaps_axes() {
            (width_px * 3 / 4).max(1)
        } else {
            width_px + width_px / 3
        };
        RenderedPage {
            key,
            width_px,
            height_px,
            pixels: solid_rgb(width_px, height_px, page_color(key)),
        }
    }

    /// Session client with a canned answer
    pub struct StaticSessionClient(pub Result<Option<String>, String>);

    impl StaticSessionClient {
        pub fn url(url: &str) -> Self {
            Self(Ok(Some(url.to_string())))
        }

        pub fn no_url() -> Self {
            Self(Ok(None))
        }

        pub fn failing(detail: &str) -> Self {
            Self(Err(detail.to_string()))
        }
    }

    impl SessionClient for StaticSessionClient {
        fn create_session(&self) -> Result<CheckoutSession, BillingError> {
            match &self.0 {
                Ok(url) => Ok(CheckoutSession { url: url.clone() }),
                Err(detail) => Err(BillingError::Network(detail.clone())),
            }
        }
    }

    /// Navigator that remembers where it was sent
    #[derive(Default)]
    pub struct RecordingNavigator {
        visited: Mutex<Vec<String>>,
    }

    impl RecordingNavigator {
        pub fn visited(&self) -> Vec<String> {
            self.visited.lock().map(|v| v.clone()).unwrap_or_default()
        }
    }

    impl Navigator for RecordingNavigator {
        fn navigate(&self, url: &str) -> Result<(), BillingError> {
            if let Ok(mut visited) = self.visited.lock() {
                visited.push(url.to_string());
            }
            Ok(())
        }
    }

    /// Builder for creating test scenarios with simulated user input
    #[derive(Default)]
    pub struct TestScenarioBuilder {
        events: Vec<Event>,
    }

    impl TestScenarioBuilder {
        pub fn new() -> Self {
            Self::default()
        }

        /// Add a character key press
        pub fn press_char(mut self, c: char) -> Self {
            self.events.push(ScriptedEventSource::char_key(c));
            self
        }

        /// Add a Ctrl+character key press
        pub fn press_ctrl_char(mut self, c: char) -> Self {
            self.events.push(ScriptedEventSource::ctrl_char_key(c));
            self
        }

        pub fn press_key(self, code: KeyCode) -> Self {
            self.press_key_with(code, KeyModifiers::empty())
        }

        pub fn press_key_with(mut self, code: KeyCode, modifiers: KeyModifiers) -> Self {
            self.events.push(ScriptedEventSource::press(code, modifiers));
            self
        }

        pub fn press_enter(self) -> Self {
            self.press_key(KeyCode::Enter)
        }

        pub fn press_esc(self) -> Self {
            self.press_key(KeyCode::Esc)
        }

        /// Type each character of `text`
        pub fn type_text(mut self, text: &str) -> Self {
            for c in text.chars() {
                self = self.press_char(c);
            }
            self
        }

        /// Press 'l' n times
        pub fn next_page(mut self, times: usize) -> Self {
            for _ in 0..times {
                self = self.press_char('l');
            }
            self
        }

        /// Press 'h' n times
        pub fn prev_page(mut self, times: usize) -> Self {
            for _ in 0..times {
                self = self.press_char('h');
            }
            self
        }

        /// Focus the page input, type `page` and submit
        pub fn jump_to(self, page: &str) -> Self {
            self.press_char('g').type_text(page).press_enter()
        }

        /// Quit the application (press 'q')
        pub fn quit(self) -> Self {
            self.press_char('q')
        }

        pub fn len(&self) -> usize {
            self.events.len()
        }

        pub fn is_empty(&self) -> bool {
            self.events.is_empty()
        }

        /// Build the simulated event source
        pub fn build(self) -> ScriptedEventSource {
            ScriptedEventSource::new(self.events)
        }
    }

    /// Create a test terminal for snapshot testing
    pub fn create_test_terminal(width: u16, height: u16) -> Terminal<TestBackend> {
        let backend = TestBackend::new(width, height);
        Terminal::new(backend).unwrap()
    }

    /// Capture the current terminal buffer as a string
    pub fn capture_terminal_state(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let mut lines = Vec::new();

        for y in 0..buffer.area.height {
            let mut line = String::new();
            for x in 0..buffer.area.width {
                line.push_str(buffer[(x, y)].symbol());
            }
            // Trim trailing whitespace from each line
            lines.push(line.trim_end().to_string());
        }

        // Remove trailing empty lines
        while lines.last().map(|l| l.is_empty()).unwrap_or(false) {
            lines.pop();
        }

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::test_helpers::*;
    use crate::render::{DocumentSource, RenderBackend, RenderEvent, RenderKey};
    use crate::viewer::{Rotation, ZoomLevel};

    fn key(page: u32) -> RenderKey {
        RenderKey {
            page,
            zoom: ZoomLevel::Actual,
            rotation: Rotation::NONE,
            width_px: 40,
        }
    }

    #[test]
    fn test_scenario_builder() {
        let scenario = TestScenarioBuilder::new()
            .next_page(2)
            .jump_to("12")
            .press_esc()
            .quit();
        // l l g 1 2 Enter Esc q
        assert_eq!(scenario.len(), 8);
    }

    #[test]
    fn scripted_backend_loads_and_renders() {
        let mut backend = ScriptedBackend::loading(3);
        backend.open(&DocumentSource::parse("doc.pdf"));
        backend.request(key(1));

        let events = backend.poll();
        assert!(matches!(events[0], RenderEvent::Loaded { page_count: 3 }));
        match &events[1] {
            RenderEvent::Rendered(page) => {
                assert_eq!(page.key, key(1));
                assert_eq!(page.width_px, 40);
                assert_eq!(page.pixel(0, 0), Some(page_color(key(1))));
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(backend.poll().is_empty());
    }

    #[test]
    fn manual_backend_holds_renders() {
        let mut backend = ScriptedBackend::loading(3).manual();
        backend.request(key(2));
        assert!(backend.poll().is_empty());
        assert_eq!(backend.held(), &[key(2)]);

        assert!(backend.complete(key(2)));
        assert!(!backend.complete(key(2)));
        assert_eq!(backend.poll().len(), 1);
    }
}
