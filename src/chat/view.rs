//! The display surface shared by the chat components.
//!
//! A view owns the message log, the input controls and the model selector
//! panel. Components never keep their own copy of what is on screen; they
//! push changes into a view through [`ChatView`] and [`SelectorView`].
//!
//! Views are shared behind `Arc<Mutex<_>>` because the reveal loop and the
//! status timer run as separate tasks. Locks are only held for the duration
//! of a single synchronous view call.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::chat::selection::SelectorSnapshot;
use crate::chat::status::StatusMessage;
use crate::types::{Message, MessageId, PlaceholderToken, Sender};

/// The message log and input controls.
pub trait ChatView: Send {
    /// Append a message element to the end of the log.
    fn append_message(&mut self, message: &Message) -> MessageId;

    /// Replace the displayed text of a previously appended message element.
    fn set_message_text(&mut self, id: MessageId, text: &str);

    /// Insert a loading placeholder tagged with `token`.
    fn show_placeholder(&mut self, token: PlaceholderToken);

    /// Remove the placeholder tagged with `token`, returning whether one was present.
    fn remove_placeholder(&mut self, token: PlaceholderToken) -> bool;

    /// Keep the newest entry in view.
    fn scroll_to_latest(&mut self) {}

    /// Empty the input field.
    fn clear_input(&mut self) {}

    /// Enable or disable the input field and send control.
    fn set_input_enabled(&mut self, enabled: bool) {
        _ = enabled;
    }

    /// Return keyboard focus to the input field.
    fn focus_input(&mut self) {}
}

/// The model selector panel and its status line.
pub trait SelectorView: Send {
    /// Redraw the toggle label and the model list.
    fn render_selector(&mut self, snapshot: &SelectorSnapshot);

    /// Display a status message, replacing any previous one.
    fn show_status(&mut self, status: &StatusMessage);

    /// Remove the status message.
    fn clear_status(&mut self);
}

/// A chat view shared between the session, the loading indicator and the revealer.
pub type SharedChatView = Arc<Mutex<dyn ChatView>>;

/// A selector view shared between the model selector and its status timer.
pub type SharedSelectorView = Arc<Mutex<dyn SelectorView>>;

/// Lock a view, recovering the guard if a previous holder panicked.
pub(crate) fn lock<T: ?Sized>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

///////////////////////////////////////// MessageLog /////////////////////////////////////////

/// Appends messages to a view and keeps the newest one visible.
#[derive(Clone)]
pub struct MessageLog {
    view: SharedChatView,
}

impl MessageLog {
    /// Creates a log that renders into `view`.
    pub fn new(view: SharedChatView) -> Self {
        Self { view }
    }

    /// The underlying view.
    pub fn view(&self) -> &SharedChatView {
        &self.view
    }

    /// Append a message and scroll to it.
    pub fn add_message(&self, text: impl Into<String>, sender: Sender) -> MessageId {
        let message = Message::new(text, sender);
        let mut view = lock(&self.view);
        let id = view.append_message(&message);
        view.scroll_to_latest();
        id
    }

    /// Change the displayed text of a message and scroll to the newest entry.
    pub fn update(&self, id: MessageId, text: &str) {
        let mut view = lock(&self.view);
        view.set_message_text(id, text);
        view.scroll_to_latest();
    }
}

///////////////////////////////////////// MemoryView /////////////////////////////////////////

/// One element of the in-memory log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    /// A message element and the text it currently displays.
    Message {
        /// The element's handle.
        id: MessageId,
        /// The message, with `text` holding what is displayed.
        message: Message,
    },
    /// A loading placeholder.
    Placeholder(PlaceholderToken),
}

/// A headless view that records everything rendered into it.
///
/// Useful for embedding the client without a terminal and for asserting on
/// what a user would have seen.
#[derive(Debug)]
pub struct MemoryView {
    next_id: u64,
    entries: Vec<Entry>,
    updates: HashMap<MessageId, Vec<usize>>,
    input_enabled: bool,
    input_focused: bool,
    input_clears: usize,
    scroll_pins: usize,
    selector: Option<SelectorSnapshot>,
    status: Option<StatusMessage>,
}

impl MemoryView {
    /// Creates an empty view with enabled input.
    pub fn new() -> Self {
        Self {
            next_id: 1,
            entries: Vec::new(),
            updates: HashMap::new(),
            input_enabled: true,
            input_focused: false,
            input_clears: 0,
            scroll_pins: 0,
            selector: None,
            status: None,
        }
    }

    /// Creates an empty view wrapped for sharing.
    pub fn shared() -> Arc<Mutex<Self>> {
        Arc::new(Mutex::new(Self::new()))
    }

    /// All log entries in display order.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// The messages in display order.
    pub fn messages(&self) -> Vec<&Message> {
        self.entries
            .iter()
            .filter_map(|entry| match entry {
                Entry::Message { message, .. } => Some(message),
                Entry::Placeholder(_) => None,
            })
            .collect()
    }

    /// The messages from one sender in display order.
    pub fn messages_from(&self, sender: Sender) -> Vec<&Message> {
        self.messages()
            .into_iter()
            .filter(|message| message.sender == sender)
            .collect()
    }

    /// The message element with the given handle.
    pub fn message(&self, id: MessageId) -> Option<&Message> {
        self.entries.iter().find_map(|entry| match entry {
            Entry::Message { id: found, message } if *found == id => Some(message),
            _ => None,
        })
    }

    /// Displayed lengths, in characters, after each text update of a message.
    pub fn updates(&self, id: MessageId) -> &[usize] {
        self.updates.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of loading placeholders currently shown.
    pub fn placeholder_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| matches!(entry, Entry::Placeholder(_)))
            .count()
    }

    /// Whether the input controls accept text.
    pub fn input_enabled(&self) -> bool {
        self.input_enabled
    }

    /// Whether the input field holds keyboard focus.
    pub fn input_focused(&self) -> bool {
        self.input_focused
    }

    /// How many times the input field was cleared.
    pub fn input_clears(&self) -> usize {
        self.input_clears
    }

    /// How many times the log was scrolled to its newest entry.
    pub fn scroll_pins(&self) -> usize {
        self.scroll_pins
    }

    /// The most recently rendered selector state.
    pub fn selector(&self) -> Option<&SelectorSnapshot> {
        self.selector.as_ref()
    }

    /// The status message currently displayed.
    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }
}

impl Default for MemoryView {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatView for MemoryView {
    fn append_message(&mut self, message: &Message) -> MessageId {
        let id = MessageId(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry::Message {
            id,
            message: message.clone(),
        });
        id
    }

    fn set_message_text(&mut self, id: MessageId, text: &str) {
        for entry in self.entries.iter_mut() {
            if let Entry::Message { id: found, message } = entry
                && *found == id
            {
                message.text = text.to_string();
                self.updates
                    .entry(id)
                    .or_default()
                    .push(text.chars().count());
                return;
            }
        }
    }

    fn show_placeholder(&mut self, token: PlaceholderToken) {
        self.entries.push(Entry::Placeholder(token));
    }

    fn remove_placeholder(&mut self, token: PlaceholderToken) -> bool {
        let before = self.entries.len();
        self.entries
            .retain(|entry| !matches!(entry, Entry::Placeholder(found) if *found == token));
        self.entries.len() != before
    }

    fn scroll_to_latest(&mut self) {
        self.scroll_pins += 1;
    }

    fn clear_input(&mut self) {
        self.input_clears += 1;
    }

    fn set_input_enabled(&mut self, enabled: bool) {
        self.input_enabled = enabled;
        if !enabled {
            self.input_focused = false;
        }
    }

    fn focus_input(&mut self) {
        self.input_focused = true;
    }
}

impl SelectorView for MemoryView {
    fn render_selector(&mut self, snapshot: &SelectorSnapshot) {
        self.selector = Some(snapshot.clone());
    }

    fn show_status(&mut self, status: &StatusMessage) {
        self.status = Some(status.clone());
    }

    fn clear_status(&mut self) {
        self.status = None;
    }
}
