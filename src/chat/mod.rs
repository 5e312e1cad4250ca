//! The chat client's interactive components.
//!
//! Two independent subsystems share a display surface:
//!
//! - [`ChatSession`] sends questions to the backend, shows a loading
//!   placeholder while waiting and hands the answer to a [`Reveal`]
//!   implementation that types it out.
//! - [`ModelSelector`] loads the model catalog, reconciles the server's
//!   selection with it and switches models on request.
//!
//! # Architecture
//!
//! - [`view`]: the [`ChatView`] and [`SelectorView`] traits, the message
//!   log and an in-memory view
//! - [`render`]: the terminal view used by the `medichat` binary
//! - [`reveal`] and [`loading`]: answer disclosure and the loading placeholder
//! - [`session`]: the question/answer lifecycle
//! - [`selection`], [`selector`] and [`status`]: model selection state, the
//!   component that talks to the backend about it, and its status line
//! - [`config`] and [`commands`]: CLI arguments and slash commands

pub mod commands;
pub mod config;
pub mod loading;
pub mod render;
pub mod reveal;
pub mod selection;
pub mod selector;
pub mod session;
pub mod status;
pub mod view;

#[cfg(test)]
pub(crate) mod test_support;

pub use commands::{ChatCommand, ModelChoice, help_text, parse_command};
pub use config::{ChatArgs, ChatConfig, DEFAULT_GREETING, DEFAULT_TEMPERATURE};
pub use loading::LoadingIndicator;
pub use render::PlainTextRenderer;
pub use reveal::{ChunkedRevealer, InstantRevealer, Reveal, RevealConfig, RevealHandle};
pub use selection::{
    CatalogStatus, ModelSelectionState, PanelEvent, PanelState, SelectorEntry, SelectorSnapshot,
    is_match, reconcile_selection,
};
pub use selector::ModelSelector;
pub use session::{
    ChatSession, FailureKind, InputLock, SERVER_FAILURE_REPLY, SessionStats, Submission,
    TRANSPORT_FAILURE_REPLY,
};
pub use status::{StatusBar, StatusKind, StatusMessage};
pub use view::{
    ChatView, Entry, MemoryView, MessageLog, SelectorView, SharedChatView, SharedSelectorView,
};
