//! Two-slot render layer tracking
//!
//! The committed slot holds the last render that finished and is what the
//! page area shows. A new request goes into the pending slot; the committed
//! image stays on screen until the pending render reports completion, so a
//! zoom change never flashes an empty page.

use crate::render::RenderKey;

/// What the page area should draw right now
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LayerView {
    /// Layer to draw, if any render has finished yet
    pub shown: Option<RenderKey>,
    /// Layer still rendering behind the shown one
    pub rendering: Option<RenderKey>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LayerStack {
    committed: Option<RenderKey>,
    pending: Option<RenderKey>,
}

impl LayerStack {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Key the stack is converging on
    #[must_use]
    pub fn target(&self) -> Option<RenderKey> {
        self.pending.or(self.committed)
    }

    #[must_use]
    pub fn committed(&self) -> Option<RenderKey> {
        self.committed
    }

    #[must_use]
    pub fn pending(&self) -> Option<RenderKey> {
        self.pending
    }

    /// Start converging on `key`.
    ///
    /// Returns `true` if a render has to be requested, `false` when `key` is
    /// already the target.
    pub fn request(&mut self, key: RenderKey) -> bool {
        if self.target() == Some(key) {
            return false;
        }
        if self.committed == Some(key) {
            // Back to what is on screen, nothing left to wait for
            self.pending = None;
            return false;
        }
        self.pending = Some(key);
        true
    }

    /// Record that the render for `key` finished.
    ///
    /// Returns `true` if `key` was the pending layer and is now committed.
    /// Completions for superseded keys are ignored.
    pub fn complete(&mut self, key: RenderKey) -> bool {
        if self.pending != Some(key) {
            return false;
        }
        self.committed = self.pending.take();
        true
    }

    /// Forget the pending layer after its render failed
    pub fn abandon(&mut self, key: RenderKey) -> bool {
        if self.pending != Some(key) {
            return false;
        }
        self.pending = None;
        true
    }

    #[must_use]
    pub fn view(&self) -> LayerView {
        LayerView {
            shown: self.committed,
            rendering: self.pending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewer::{Rotation, ZoomLevel};

    fn key(zoom: ZoomLevel) -> RenderKey {
        RenderKey {
            page: 1,
            zoom,
            rotation: Rotation::NONE,
            width_px: 80,
        }
    }

    #[test]
    fn first_render_has_nothing_to_show_until_complete() {
        let mut stack = LayerStack::new();
        assert!(stack.request(key(ZoomLevel::Actual)));
        assert_eq!(stack.view().shown, None);

        assert!(stack.complete(key(ZoomLevel::Actual)));
        assert_eq!(stack.view().shown, Some(key(ZoomLevel::Actual)));
        assert_eq!(stack.view().rendering, None);
    }

    #[test]
    fn previous_layer_stays_visible_while_rescaling() {
        let mut stack = LayerStack::new();
        stack.request(key(ZoomLevel::Actual));
        stack.complete(key(ZoomLevel::Actual));

        assert!(stack.request(key(ZoomLevel::Double)));
        let view = stack.view();
        assert_eq!(view.shown, Some(key(ZoomLevel::Actual)));
        assert_eq!(view.rendering, Some(key(ZoomLevel::Double)));

        assert!(stack.complete(key(ZoomLevel::Double)));
        assert_eq!(stack.view().shown, Some(key(ZoomLevel::Double)));
        assert_eq!(stack.view().rendering, None);
    }

    #[test]
    fn superseded_completion_is_ignored() {
        let mut stack = LayerStack::new();
        stack.request(key(ZoomLevel::Actual));
        stack.complete(key(ZoomLevel::Actual));
        stack.request(key(ZoomLevel::OneAndHalf));
        stack.request(key(ZoomLevel::Double));

        assert!(!stack.complete(key(ZoomLevel::OneAndHalf)));
        assert_eq!(stack.view().shown, Some(key(ZoomLevel::Actual)));
        assert!(stack.complete(key(ZoomLevel::Double)));
    }

    #[test]
    fn returning_to_committed_key_cancels_pending() {
        let mut stack = LayerStack::new();
        stack.request(key(ZoomLevel::Actual));
        stack.complete(key(ZoomLevel::Actual));
        stack.request(key(ZoomLevel::Double));

        assert!(!stack.request(key(ZoomLevel::Actual)));
        assert_eq!(stack.pending(), None);
        assert!(!stack.complete(key(ZoomLevel::Double)));
    }

    #[test]
    fn repeated_request_is_not_resent() {
        let mut stack = LayerStack::new();
        assert!(stack.request(key(ZoomLevel::Actual)));
        assert!(!stack.request(key(ZoomLevel::Actual)));
    }
}
