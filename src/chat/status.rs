use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::chat::view::{SharedSelectorView, lock};

/// How long an info message stays up.
pub const DEFAULT_STATUS_CLEAR: Duration = Duration::from_secs(4);

/// Severity of a status message.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Error,
}

/// A line shown under the model selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    /// Identifies this message so a stale timer cannot clear its successor.
    pub id: u64,
    pub text: String,
    pub kind: StatusKind,
}

impl StatusMessage {
    pub fn is_error(&self) -> bool {
        self.kind == StatusKind::Error
    }
}

/// Publishes status messages to a selector view.
///
/// Info messages clear themselves after a delay; error messages stay until
/// the next message replaces them.
#[derive(Clone)]
pub struct StatusBar {
    view: SharedSelectorView,
    current: Arc<Mutex<Option<StatusMessage>>>,
    next_id: Arc<AtomicU64>,
    clear_after: Duration,
}

impl StatusBar {
    pub fn new(view: SharedSelectorView, clear_after: Duration) -> Self {
        Self {
            view,
            current: Arc::new(Mutex::new(None)),
            next_id: Arc::new(AtomicU64::new(1)),
            clear_after,
        }
    }

    /// Show an info message and schedule its removal.
    ///
    /// Must be called from within a tokio runtime.
    pub fn info(&self, text: impl Into<String>) -> u64 {
        let id = self.publish(text.into(), StatusKind::Info);
        let bar = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(bar.clear_after).await;
            bar.clear_if_current(id);
        });
        id
    }

    /// Show an error message.
    pub fn error(&self, text: impl Into<String>) -> u64 {
        self.publish(text.into(), StatusKind::Error)
    }

    /// The message currently displayed.
    pub fn current(&self) -> Option<StatusMessage> {
        lock(&self.current).clone()
    }

    /// Remove the message with `id` if it is still the one displayed.
    pub fn clear_if_current(&self, id: u64) -> bool {
        let mut current = lock(&self.current);
        if current.as_ref().map(|status| status.id) != Some(id) {
            return false;
        }
        *current = None;
        lock(&self.view).clear_status();
        true
    }

    /// Remove the displayed message if it is an error. Info messages are left to their timer.
    pub fn clear_errors(&self) -> bool {
        let mut current = lock(&self.current);
        if !current.as_ref().is_some_and(StatusMessage::is_error) {
            return false;
        }
        *current = None;
        lock(&self.view).clear_status();
        true
    }

    fn publish(&self, text: String, kind: StatusKind) -> u64 {
        let status = StatusMessage {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            text,
            kind,
        };
        let id = status.id;
        let mut current = lock(&self.current);
        lock(&self.view).show_status(&status);
        *current = Some(status);
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::view::MemoryView;

    #[tokio::test(start_paused = true)]
    async fn info_clears_itself() {
        let memory = MemoryView::shared();
        let bar = StatusBar::new(memory.clone(), DEFAULT_STATUS_CLEAR);

        bar.info("Model switched to m1");
        assert_eq!(
            memory.lock().unwrap().status().map(|s| s.text.clone()),
            Some("Model switched to m1".to_string())
        );

        tokio::time::sleep(Duration::from_secs(3)).await;
        assert!(memory.lock().unwrap().status().is_some());

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(memory.lock().unwrap().status().is_none());
        assert!(bar.current().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn errors_persist() {
        let memory = MemoryView::shared();
        let bar = StatusBar::new(memory.clone(), DEFAULT_STATUS_CLEAR);

        bar.error("Failed to load models");
        tokio::time::sleep(Duration::from_secs(60)).await;
        let status = bar.current().unwrap();
        assert!(status.is_error());
        assert_eq!(memory.lock().unwrap().status(), Some(&status));
    }

    #[tokio::test(start_paused = true)]
    async fn stale_timer_leaves_newer_message() {
        let memory = MemoryView::shared();
        let bar = StatusBar::new(memory.clone(), DEFAULT_STATUS_CLEAR);

        let first = bar.info("first");
        tokio::time::sleep(Duration::from_secs(2)).await;
        let second = bar.error("second");
        assert_ne!(first, second);

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(bar.current().map(|s| s.text), Some("second".to_string()));
        assert!(!bar.clear_if_current(first));
    }

    #[tokio::test(start_paused = true)]
    async fn clear_errors_leaves_info() {
        let memory = MemoryView::shared();
        let bar = StatusBar::new(memory.clone(), DEFAULT_STATUS_CLEAR);

        assert!(!bar.clear_errors());
        bar.error("Failed to load models");
        assert!(bar.clear_errors());
        assert!(bar.current().is_none());
        assert!(memory.lock().unwrap().status().is_none());

        bar.info("Model switched to m1");
        assert!(!bar.clear_errors());
        assert_eq!(
            bar.current().map(|s| s.text),
            Some("Model switched to m1".to_string())
        );
    }
}
