use std::sync::atomic::{AtomicU64, Ordering};

use crate::chat::view::{SharedChatView, lock};
use crate::types::PlaceholderToken;

/// Shows and removes "waiting for an answer" placeholders.
pub struct LoadingIndicator {
    view: SharedChatView,
    next_token: AtomicU64,
}

impl LoadingIndicator {
    pub fn new(view: SharedChatView) -> Self {
        Self {
            view,
            next_token: AtomicU64::new(1),
        }
    }

    /// Insert a placeholder and return the token that removes it.
    pub fn show(&self) -> PlaceholderToken {
        let token = PlaceholderToken(self.next_token.fetch_add(1, Ordering::Relaxed));
        let mut view = lock(&self.view);
        view.show_placeholder(token);
        view.scroll_to_latest();
        token
    }

    /// Remove the placeholder for `token`. Unknown tokens are ignored.
    pub fn hide(&self, token: PlaceholderToken) -> bool {
        lock(&self.view).remove_placeholder(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::view::MemoryView;

    #[test]
    fn tokens_increase() {
        let indicator = LoadingIndicator::new(MemoryView::shared());
        let first = indicator.show();
        let second = indicator.show();
        assert!(second > first);
    }

    #[test]
    fn hide_is_idempotent() {
        let memory = MemoryView::shared();
        let indicator = LoadingIndicator::new(memory.clone());

        let token = indicator.show();
        assert_eq!(memory.lock().unwrap().placeholder_count(), 1);
        assert!(indicator.hide(token));
        assert!(!indicator.hide(token));
        assert!(!indicator.hide(PlaceholderToken(999)));
        assert_eq!(memory.lock().unwrap().placeholder_count(), 0);
    }
}
