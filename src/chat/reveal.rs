//! Typewriter-style disclosure of a finished answer.
//!
//! The whole answer is known before the reveal starts; the revealer only
//! controls how fast it appears. A [`ChunkedRevealer`] appends an empty
//! message and then grows its text a few characters at a time on a spawned
//! task. An [`InstantRevealer`] shows everything at once.

use std::time::Duration;

use tokio::task::JoinHandle;

use crate::chat::view::MessageLog;
use crate::observability::REVEAL_CHUNKS;
use crate::types::{MessageId, Sender};

/// Default number of characters disclosed per step.
pub const DEFAULT_CHUNK_SIZE: usize = 8;
/// Default pause between steps.
pub const DEFAULT_CHUNK_INTERVAL: Duration = Duration::from_millis(10);

/// Pace of a chunked reveal.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RevealConfig {
    pub chunk_size: usize,
    pub interval: Duration,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            interval: DEFAULT_CHUNK_INTERVAL,
        }
    }
}

/// Byte offsets at which each reveal step ends.
///
/// Offsets fall on `char` boundaries, increase strictly and end at
/// `text.len()`. An empty text yields a single step of length zero.
pub fn reveal_offsets(text: &str, chunk_size: usize) -> Vec<usize> {
    let chunk_size = chunk_size.max(1);
    let mut offsets: Vec<usize> = text
        .char_indices()
        .map(|(offset, _)| offset)
        .skip(chunk_size)
        .step_by(chunk_size)
        .collect();
    offsets.push(text.len());
    offsets
}

/// Tracks a reveal that may still be running.
#[derive(Debug)]
pub struct RevealHandle {
    message: MessageId,
    task: Option<JoinHandle<()>>,
}

impl RevealHandle {
    fn completed(message: MessageId) -> Self {
        Self {
            message,
            task: None,
        }
    }

    /// The message being revealed.
    pub fn message_id(&self) -> MessageId {
        self.message
    }

    pub fn is_finished(&self) -> bool {
        self.task.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Wait until the full text is displayed.
    pub async fn finished(self) {
        if let Some(task) = self.task
            && let Err(err) = task.await
        {
            tracing::warn!(error = %err, "reveal task ended abnormally");
        }
    }
}

/// Puts a complete answer on screen.
pub trait Reveal: Send + Sync {
    /// Append a message from `sender` and disclose `text` into it.
    ///
    /// Returns immediately; dropping the handle does not stop the reveal.
    fn reveal(&self, text: String, sender: Sender) -> RevealHandle;
}

/// Discloses text a chunk at a time.
pub struct ChunkedRevealer {
    log: MessageLog,
    config: RevealConfig,
}

impl ChunkedRevealer {
    pub fn new(log: MessageLog, config: RevealConfig) -> Self {
        Self { log, config }
    }
}

impl Reveal for ChunkedRevealer {
    fn reveal(&self, text: String, sender: Sender) -> RevealHandle {
        let message = self.log.add_message(String::new(), sender);
        let log = self.log.clone();
        let interval = self.config.interval;
        let offsets = reveal_offsets(&text, self.config.chunk_size);
        let task = tokio::spawn(async move {
            let mut offsets = offsets.into_iter().peekable();
            while let Some(end) = offsets.next() {
                log.update(message, &text[..end]);
                REVEAL_CHUNKS.click();
                if offsets.peek().is_some() {
                    tokio::time::sleep(interval).await;
                }
            }
        });
        RevealHandle {
            message,
            task: Some(task),
        }
    }
}

/// Shows the whole text in one step.
pub struct InstantRevealer {
    log: MessageLog,
}

impl InstantRevealer {
    pub fn new(log: MessageLog) -> Self {
        Self { log }
    }
}

impl Reveal for InstantRevealer {
    fn reveal(&self, text: String, sender: Sender) -> RevealHandle {
        RevealHandle::completed(self.log.add_message(text, sender))
    }
}
