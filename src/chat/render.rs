//! Terminal rendering for the chat client.
//!
//! [`PlainTextRenderer`] implements both view traits on top of a byte
//! stream, stdout by default. A terminal cannot rewrite earlier lines, so a
//! message being revealed is printed incrementally: each text update emits
//! only the characters not yet shown.

use std::fmt;
use std::io::{self, Stdout, Write};

use crate::chat::selection::{CatalogStatus, SelectorSnapshot};
use crate::chat::status::{StatusKind, StatusMessage};
use crate::chat::view::{ChatView, SelectorView};
use crate::types::{Message, MessageId, PlaceholderToken, Sender};

/// ANSI escape code for dim text (used for the loading placeholder).
const ANSI_DIM: &str = "\x1b[2m";

/// ANSI escape code to reset all styling.
const ANSI_RESET: &str = "\x1b[0m";

/// ANSI escape code for cyan text (used for the assistant label).
const ANSI_CYAN: &str = "\x1b[36m";

/// ANSI escape code for green text (used for info status).
const ANSI_GREEN: &str = "\x1b[32m";

/// ANSI escape code for red text (used for error status).
const ANSI_RED: &str = "\x1b[31m";

/// ANSI escape code for bold text (used for the selected model).
const ANSI_BOLD: &str = "\x1b[1m";

/// Return to column zero and erase the line.
const ANSI_CLEAR_LINE: &str = "\r\x1b[2K";

const LOADING_TEXT: &str = "...";

/// Plain text renderer with optional ANSI styling.
///
/// User messages are not echoed; the prompt line already shows them.
pub struct PlainTextRenderer<W = Stdout> {
    out: W,
    use_color: bool,
    next_id: u64,
    /// The bot message currently being written and the text of it already on screen.
    open: Option<(MessageId, String)>,
    placeholders: Vec<PlaceholderToken>,
    last_label: Option<String>,
}

impl PlainTextRenderer<Stdout> {
    /// Creates a new PlainTextRenderer with ANSI colors enabled.
    pub fn new() -> Self {
        Self::with_color(true)
    }

    /// Creates a new PlainTextRenderer with specified color setting.
    pub fn with_color(use_color: bool) -> Self {
        Self::with_writer(io::stdout(), use_color)
    }
}

impl Default for PlainTextRenderer<Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write + Send> PlainTextRenderer<W> {
    /// Creates a renderer that writes to `out`.
    pub fn with_writer(out: W, use_color: bool) -> Self {
        Self {
            out,
            use_color,
            next_id: 1,
            open: None,
            placeholders: Vec::new(),
            last_label: None,
        }
    }

    /// Consumes the renderer, returning its writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, args: fmt::Arguments<'_>) {
        let _ = self.out.write_fmt(args);
    }

    fn flush(&mut self) {
        let _ = self.out.flush();
    }

    fn style(&self, code: &'static str) -> &'static str {
        if self.use_color { code } else { "" }
    }

    /// Terminate the message being revealed so the next output starts on a fresh line.
    fn close_open_message(&mut self) {
        if self.open.take().is_some() {
            self.emit(format_args!("\n"));
        }
    }

    /// Called once a reply is fully displayed so the prompt starts on its own line.
    pub fn finish_response(&mut self) {
        self.close_open_message();
        self.flush();
    }

    fn bot_label(&mut self) {
        let (cyan, reset) = (self.style(ANSI_CYAN), self.style(ANSI_RESET));
        self.emit(format_args!("{cyan}assistant>{reset} "));
    }
}

impl<W: Write + Send> ChatView for PlainTextRenderer<W> {
    fn append_message(&mut self, message: &Message) -> MessageId {
        let id = MessageId(self.next_id);
        self.next_id += 1;
        self.close_open_message();
        if message.sender == Sender::Bot {
            self.bot_label();
            self.emit(format_args!("{}", message.text));
            self.open = Some((id, message.text.clone()));
        }
        self.flush();
        id
    }

    fn set_message_text(&mut self, id: MessageId, text: &str) {
        let Some((open, shown)) = self.open.take() else {
            return;
        };
        if open != id {
            self.open = Some((open, shown));
            return;
        }
        match text.strip_prefix(shown.as_str()) {
            Some(delta) => self.emit(format_args!("{delta}")),
            None => {
                self.emit(format_args!("\n"));
                self.bot_label();
                self.emit(format_args!("{text}"));
            }
        }
        self.open = Some((id, text.to_string()));
        self.flush();
    }

    fn show_placeholder(&mut self, token: PlaceholderToken) {
        self.close_open_message();
        self.placeholders.push(token);
        let (dim, reset) = (self.style(ANSI_DIM), self.style(ANSI_RESET));
        self.emit(format_args!("{dim}{LOADING_TEXT}{reset}"));
        self.flush();
    }

    fn remove_placeholder(&mut self, token: PlaceholderToken) -> bool {
        let Some(index) = self.placeholders.iter().position(|t| *t == token) else {
            return false;
        };
        self.placeholders.remove(index);
        if self.use_color {
            self.emit(format_args!("{ANSI_CLEAR_LINE}"));
        } else {
            self.emit(format_args!("\n"));
        }
        self.flush();
        true
    }

    fn scroll_to_latest(&mut self) {
        self.flush();
    }
}

impl<W: Write + Send> SelectorView for PlainTextRenderer<W> {
    fn render_selector(&mut self, snapshot: &SelectorSnapshot) {
        self.close_open_message();
        if snapshot.panel.is_open() {
            let (bold, reset) = (self.style(ANSI_BOLD), self.style(ANSI_RESET));
            self.emit(format_args!("Models ({}):\n", snapshot.label));
            if snapshot.catalog == CatalogStatus::Loaded && snapshot.entries.is_empty() {
                self.emit(format_args!("  (none)\n"));
            }
            if !snapshot.filter.is_empty() {
                self.emit(format_args!("  filter: {}\n", snapshot.filter));
            }
            for (position, entry) in snapshot.visible().enumerate() {
                if entry.selected {
                    self.emit(format_args!("  * {}. {bold}{}{reset}\n", position + 1, entry.name));
                } else {
                    self.emit(format_args!("    {}. {}\n", position + 1, entry.name));
                }
            }
        } else if self.last_label.as_deref() != Some(snapshot.label.as_str()) {
            self.emit(format_args!("[model: {}]\n", snapshot.label));
        }
        self.last_label = Some(snapshot.label.clone());
        self.flush();
    }

    fn show_status(&mut self, status: &StatusMessage) {
        self.close_open_message();
        let (color, tag) = match status.kind {
            StatusKind::Info => (self.style(ANSI_GREEN), "info"),
            StatusKind::Error => (self.style(ANSI_RED), "error"),
        };
        let reset = self.style(ANSI_RESET);
        self.emit(format_args!("{color}[{tag}]{reset} {}\n", status.text));
        self.flush();
    }

    fn clear_status(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::selection::{PanelState, SelectorEntry};

    fn output(renderer: PlainTextRenderer<Vec<u8>>) -> String {
        String::from_utf8(renderer.into_inner()).unwrap()
    }

    #[test]
    fn renderer_default_has_color() {
        let renderer = PlainTextRenderer::new();
        assert!(renderer.use_color);
    }

    #[test]
    fn renderer_without_color() {
        let renderer = PlainTextRenderer::with_color(false);
        assert!(!renderer.use_color);
    }

    #[test]
    fn reveal_prints_only_new_text() {
        let mut renderer = PlainTextRenderer::with_writer(Vec::new(), false);
        let id = renderer.append_message(&Message::bot(""));
        renderer.set_message_text(id, "A fever");
        renderer.set_message_text(id, "A fever is...");
        renderer.finish_response();
        assert_eq!(output(renderer), "assistant> A fever is...\n");
    }

    #[test]
    fn user_messages_are_not_echoed() {
        let mut renderer = PlainTextRenderer::with_writer(Vec::new(), false);
        renderer.append_message(&Message::user("What is a fever?"));
        assert_eq!(output(renderer), "");
    }

    #[test]
    fn placeholder_lifecycle() {
        let mut renderer = PlainTextRenderer::with_writer(Vec::new(), false);
        renderer.show_placeholder(PlaceholderToken(1));
        assert!(renderer.remove_placeholder(PlaceholderToken(1)));
        assert!(!renderer.remove_placeholder(PlaceholderToken(1)));
        assert_eq!(output(renderer), "...\n");
    }

    #[test]
    fn open_panel_lists_visible_models() {
        let mut renderer = PlainTextRenderer::with_writer(Vec::new(), false);
        renderer.render_selector(&SelectorSnapshot {
            label: "m2".to_string(),
            panel: PanelState::Open,
            catalog: CatalogStatus::Loaded,
            filter: String::new(),
            entries: vec![
                SelectorEntry {
                    name: "m1".to_string(),
                    selected: false,
                    visible: true,
                },
                SelectorEntry {
                    name: "m2".to_string(),
                    selected: true,
                    visible: true,
                },
            ],
        });
        assert_eq!(output(renderer), "Models (m2):\n    1. m1\n  * 2. m2\n");
    }

    #[test]
    fn status_lines() {
        let mut renderer = PlainTextRenderer::with_writer(Vec::new(), false);
        renderer.show_status(&StatusMessage {
            id: 1,
            text: "Model switched to m1".to_string(),
            kind: StatusKind::Info,
        });
        renderer.show_status(&StatusMessage {
            id: 2,
            text: "Failed to load models".to_string(),
            kind: StatusKind::Error,
        });
        assert_eq!(
            output(renderer),
            "[info] Model switched to m1\n[error] Failed to load models\n"
        );
    }
}
