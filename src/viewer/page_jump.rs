//! Page-jump input field with inline validation

/// Longest input the field accepts
const MAX_INPUT_LEN: usize = 9;

/// Why the page-jump input was rejected
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PageJumpError {
    #[error("Enter a page number")]
    Empty,

    #[error("'{0}' is not a page number")]
    NotANumber(String),

    #[error("Page {page} is out of range (1-{total})")]
    OutOfRange { page: u64, total: u32 },

    #[error("Document is still loading")]
    NotLoaded,
}

/// Text input for jumping straight to a page
#[derive(Clone, Debug)]
pub struct PageJumpForm {
    input: String,
    error: Option<PageJumpError>,
    focused: bool,
}

impl Default for PageJumpForm {
    fn default() -> Self {
        Self {
            input: "1".to_string(),
            error: None,
            focused: false,
        }
    }
}

impl PageJumpForm {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    #[must_use]
    pub fn error(&self) -> Option<&PageJumpError> {
        self.error.as_ref()
    }

    #[must_use]
    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Focus the field with its text selected for replacement
    pub fn focus(&mut self) {
        self.focused = true;
        self.input.clear();
        self.error = None;
    }

    /// Leave the field; an abandoned edit falls back to `current_page`
    pub fn blur(&mut self, current_page: u32) {
        self.focused = false;
        self.sync(current_page);
    }

    /// Replace the field contents
    pub fn set_input(&mut self, input: impl Into<String>) {
        self.input = input.into();
        self.error = None;
    }

    pub fn push_char(&mut self, c: char) {
        if c.is_control() || self.input.chars().count() >= MAX_INPUT_LEN {
            return;
        }
        self.input.push(c);
        self.error = None;
    }

    pub fn backspace(&mut self) {
        self.input.pop();
        self.error = None;
    }

    /// Show `page` as the canonical value, clearing any error
    pub fn sync(&mut self, page: u32) {
        self.input = page.to_string();
        self.error = None;
    }

    /// Check the input against the page count without changing the form
    pub fn validate(&self, total_pages: Option<u32>) -> Result<u32, PageJumpError> {
        let trimmed = self.input.trim();
        if trimmed.is_empty() {
            return Err(PageJumpError::Empty);
        }
        let total = total_pages.ok_or(PageJumpError::NotLoaded)?;
        let page: u64 = trimmed
            .parse()
            .map_err(|_| PageJumpError::NotANumber(trimmed.to_string()))?;

        if page == 0 || page > u64::from(total) {
            return Err(PageJumpError::OutOfRange { page, total });
        }
        Ok(page as u32)
    }

    /// Validate and, on success, normalise the input and leave the field.
    ///
    /// On failure the error is kept for inline display and the field stays
    /// focused.
    pub fn submit(&mut self, total_pages: Option<u32>) -> Option<u32> {
        match self.validate(total_pages) {
            Ok(page) => {
                self.sync(page);
                self.focused = false;
                Some(page)
            }
            Err(err) => {
                self.error = Some(err);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_input(input: &str) -> PageJumpForm {
        let mut form = PageJumpForm::new();
        form.set_input(input);
        form
    }

    #[test]
    fn accepts_exactly_the_page_range() {
        for n in 1..=5 {
            assert_eq!(with_input(&n.to_string()).validate(Some(5)), Ok(n));
        }
        assert_eq!(
            with_input("0").validate(Some(5)),
            Err(PageJumpError::OutOfRange { page: 0, total: 5 })
        );
        assert_eq!(
            with_input("6").validate(Some(5)),
            Err(PageJumpError::OutOfRange { page: 6, total: 5 })
        );
    }

    #[test]
    fn rejects_non_numeric_input() {
        for input in ["abc", "2.5", "-1", "1e2"] {
            assert!(
                matches!(with_input(input).validate(Some(5)), Err(PageJumpError::NotANumber(_))),
                "{input} should be rejected"
            );
        }
        assert_eq!(with_input("  ").validate(Some(5)), Err(PageJumpError::Empty));
    }

    #[test]
    fn huge_numbers_are_out_of_range_not_overflow() {
        assert!(matches!(
            with_input("99999999999").validate(Some(5)),
            Err(PageJumpError::NotANumber(_)) | Err(PageJumpError::OutOfRange { .. })
        ));
    }

    #[test]
    fn unloaded_document_blocks_submission() {
        let mut form = with_input("1");
        assert_eq!(form.submit(None), None);
        assert_eq!(form.error(), Some(&PageJumpError::NotLoaded));
    }

    #[test]
    fn submit_normalises_input() {
        let mut form = PageJumpForm::new();
        form.focus();
        for c in " 007".chars() {
            form.push_char(c);
        }
        assert_eq!(form.submit(Some(10)), Some(7));
        assert_eq!(form.input(), "7");
        assert!(!form.is_focused());
        assert!(form.error().is_none());
    }

    #[test]
    fn failed_submit_keeps_error_until_edit() {
        let mut form = with_input("15");
        assert_eq!(form.submit(Some(10)), None);
        assert!(form.error().is_some());

        form.backspace();
        assert!(form.error().is_none());
        assert_eq!(form.input(), "1");
    }

    #[test]
    fn blur_restores_current_page() {
        let mut form = PageJumpForm::new();
        form.focus();
        form.push_char('4');
        form.blur(2);
        assert_eq!(form.input(), "2");
    }

    #[test]
    fn input_length_is_capped() {
        let mut form = PageJumpForm::new();
        form.focus();
        for _ in 0..20 {
            form.push_char('9');
        }
        assert_eq!(form.input().len(), MAX_INPUT_LEN);
    }
}
