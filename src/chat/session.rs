use std::sync::Arc;

use crate::backend::Backend;
use crate::chat::config::ChatConfig;
use crate::chat::loading::LoadingIndicator;
use crate::chat::reveal::{ChunkedRevealer, InstantRevealer, Reveal, RevealHandle};
use crate::chat::view::{MessageLog, SharedChatView, lock};
use crate::error::Error;
use crate::observability::{CHAT_FAILURES, CHAT_IGNORED, CHAT_SUBMISSIONS};
use crate::types::{ChatRequest, MessageId, Sender};

/// Bot reply when the server answers but reports a failure.
pub const SERVER_FAILURE_REPLY: &str = "⚠️ Something went wrong. Please try again.";
/// Bot reply when the server could not be reached or answered nonsense.
pub const TRANSPORT_FAILURE_REPLY: &str = "❌ Server error. Please try again.";

/// Why a submission produced an error reply instead of an answer.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FailureKind {
    /// The server responded with `success: false`.
    ServerReported,
    /// The request failed in transit or the response was unusable.
    Transport,
}

impl FailureKind {
    /// The fixed bot message shown for this kind of failure.
    pub fn reply(self) -> &'static str {
        match self {
            FailureKind::ServerReported => SERVER_FAILURE_REPLY,
            FailureKind::Transport => TRANSPORT_FAILURE_REPLY,
        }
    }
}

impl From<&Error> for FailureKind {
    fn from(err: &Error) -> Self {
        if err.is_server_reported() {
            FailureKind::ServerReported
        } else {
            FailureKind::Transport
        }
    }
}

/// Outcome of [`ChatSession::submit`].
#[derive(Debug)]
pub enum Submission {
    /// The query was blank; nothing happened.
    Ignored,
    /// The server answered; the answer is being revealed.
    Answered(RevealHandle),
    /// The request failed and an error reply was shown.
    Failed(FailureKind),
}

/// Counters kept over the lifetime of a session.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub submitted: u64,
    pub answered: u64,
    pub failed: u64,
}

/// Disables the input controls for as long as it lives.
///
/// Dropping the lock re-enables the controls and focuses the input, so every
/// path out of a submission gives the user their prompt back.
pub struct InputLock {
    view: SharedChatView,
}

impl InputLock {
    pub fn acquire(view: &SharedChatView) -> Self {
        {
            let mut guard = lock(view);
            guard.clear_input();
            guard.set_input_enabled(false);
        }
        Self {
            view: Arc::clone(view),
        }
    }
}

impl Drop for InputLock {
    fn drop(&mut self) {
        let mut view = lock(&self.view);
        view.set_input_enabled(true);
        view.focus_input();
    }
}

/// Drives one question/answer exchange at a time.
pub struct ChatSession {
    backend: Arc<dyn Backend>,
    log: MessageLog,
    loading: LoadingIndicator,
    revealer: Box<dyn Reveal>,
    temperature: f32,
    greeting: String,
    stats: SessionStats,
}

impl ChatSession {
    /// Creates a session that renders into `view`, revealing answers as `config` asks.
    pub fn new(backend: Arc<dyn Backend>, view: SharedChatView, config: &ChatConfig) -> Self {
        let log = MessageLog::new(Arc::clone(&view));
        let revealer: Box<dyn Reveal> = if config.typewriter {
            Box::new(ChunkedRevealer::new(log.clone(), config.reveal))
        } else {
            Box::new(InstantRevealer::new(log.clone()))
        };
        Self::with_revealer(backend, view, revealer, config)
    }

    /// Creates a session with a caller-supplied revealer.
    pub fn with_revealer(
        backend: Arc<dyn Backend>,
        view: SharedChatView,
        revealer: Box<dyn Reveal>,
        config: &ChatConfig,
    ) -> Self {
        Self {
            backend,
            log: MessageLog::new(Arc::clone(&view)),
            loading: LoadingIndicator::new(view),
            revealer,
            temperature: config.temperature,
            greeting: config.greeting.clone(),
            stats: SessionStats::default(),
        }
    }

    /// Show the welcome message.
    pub fn greet(&self) -> MessageId {
        self.log.add_message(self.greeting.clone(), Sender::Bot)
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    /// Send `query` to the backend and render the outcome.
    ///
    /// Blank queries are ignored. Otherwise the user's message and a loading
    /// placeholder appear, and once the request settles the placeholder is
    /// replaced by the answer or by a fixed error reply. The input controls
    /// are disabled until then.
    pub async fn submit(&mut self, query: &str) -> Submission {
        let query = query.trim();
        if query.is_empty() {
            CHAT_IGNORED.click();
            return Submission::Ignored;
        }
        CHAT_SUBMISSIONS.click();
        self.stats.submitted += 1;

        let _input = InputLock::acquire(self.log.view());
        self.log.add_message(query, Sender::User);
        let token = self.loading.show();

        tracing::debug!(query_len = query.len(), "submitting chat query");
        let outcome = self
            .backend
            .chat(&ChatRequest::new(query, self.temperature))
            .await;
        self.loading.hide(token);

        match outcome {
            Ok(reply) => {
                self.stats.answered += 1;
                Submission::Answered(self.revealer.reveal(reply.into_text(), Sender::Bot))
            }
            Err(err) => {
                CHAT_FAILURES.click();
                self.stats.failed += 1;
                let kind = FailureKind::from(&err);
                tracing::warn!(error = %err, ?kind, "chat request failed");
                self.log.add_message(kind.reply(), Sender::Bot);
                Submission::Failed(kind)
            }
        }
    }
}
