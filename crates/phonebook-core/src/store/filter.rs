// ── Filter slice ──

use super::Store;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub text: String,
}

impl Store {
    pub fn filter_text(&self) -> String {
        self.filter.borrow().text.clone()
    }

    /// Set the filter. Surrounding whitespace is dropped.
    pub(crate) fn set_filter(&self, text: &str) {
        let text = text.trim();
        self.filter.send_if_modified(|state| {
            if state.text == text {
                return false;
            }
            text.clone_into(&mut state.text);
            true
        });
    }

    pub(crate) fn clear_filter(&self) {
        self.set_filter("");
    }
}
