//! Configuration types for the chat client.
//!
//! This module provides CLI argument parsing via `arrrg` and the resolved
//! configuration consumed by [`ChatSession`](super::ChatSession) and
//! [`ModelSelector`](super::ModelSelector).

use std::time::Duration;

use arrrg_derive::CommandLine;

use crate::chat::reveal::{DEFAULT_CHUNK_INTERVAL, DEFAULT_CHUNK_SIZE, RevealConfig};
use crate::chat::status::DEFAULT_STATUS_CLEAR;
use crate::client::DEFAULT_TIMEOUT;

/// Sampling temperature sent with every chat request.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// First message shown by the assistant.
pub const DEFAULT_GREETING: &str = "Hello! I'm your medical assistant 🤖. How can I help you today?";

/// Command-line arguments for the medichat tool.
#[derive(CommandLine, Debug, Default, PartialEq, Eq)]
pub struct ChatArgs {
    /// Backend base URL.
    #[arrrg(optional, "Backend URL (default: $MEDICHAT_URL or http://127.0.0.1:5000/)", "URL")]
    pub url: Option<String>,

    /// Per-request timeout in seconds.
    #[arrrg(optional, "Request timeout in seconds (default: 60)", "SECONDS")]
    pub timeout_secs: Option<u64>,

    /// Characters disclosed per reveal step.
    #[arrrg(optional, "Characters revealed per step (default: 8)", "CHARS")]
    pub chunk_size: Option<u32>,

    /// Pause between reveal steps in milliseconds.
    #[arrrg(optional, "Milliseconds between reveal steps (default: 10)", "MILLIS")]
    pub chunk_interval_ms: Option<u64>,

    /// Print answers in one piece.
    #[arrrg(flag, "Show answers at once instead of typing them out")]
    pub no_typewriter: bool,

    /// Disable ANSI colors and styles.
    #[arrrg(flag, "Disable ANSI colors/styles")]
    pub no_color: bool,
}

/// Configuration for a chat client.
///
/// Holds the resolved values after command-line arguments have been merged
/// with defaults.
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// Backend base URL; `None` defers to `MEDICHAT_URL` and then the built-in default.
    pub base_url: Option<String>,

    /// Per-request timeout.
    pub timeout: Duration,

    /// Sampling temperature sent with chat requests.
    pub temperature: f32,

    /// Pace of the typewriter reveal.
    pub reveal: RevealConfig,

    /// Whether answers are revealed progressively.
    pub typewriter: bool,

    /// How long info status messages stay visible.
    pub status_clear_after: Duration,

    /// Whether to use ANSI colors and styles in output.
    pub use_color: bool,

    /// Welcome message shown when the session starts.
    pub greeting: String,
}

impl ChatConfig {
    /// Creates a new ChatConfig with default values.
    pub fn new() -> Self {
        Self {
            base_url: None,
            timeout: DEFAULT_TIMEOUT,
            temperature: DEFAULT_TEMPERATURE,
            reveal: RevealConfig::default(),
            typewriter: true,
            status_clear_after: DEFAULT_STATUS_CLEAR,
            use_color: true,
            greeting: DEFAULT_GREETING.to_string(),
        }
    }

    /// Sets the backend base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_reveal(mut self, reveal: RevealConfig) -> Self {
        self.reveal = reveal;
        self
    }

    /// Turns the progressive reveal on or off.
    pub fn with_typewriter(mut self, enabled: bool) -> Self {
        self.typewriter = enabled;
        self
    }

    pub fn with_status_clear_after(mut self, after: Duration) -> Self {
        self.status_clear_after = after;
        self
    }

    /// Disables ANSI color output.
    pub fn without_color(mut self) -> Self {
        self.use_color = false;
        self
    }

    pub fn with_greeting(mut self, greeting: impl Into<String>) -> Self {
        self.greeting = greeting.into();
        self
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl From<ChatArgs> for ChatConfig {
    fn from(args: ChatArgs) -> Self {
        let reveal = RevealConfig {
            chunk_size: args
                .chunk_size
                .map(|n| n.max(1) as usize)
                .unwrap_or(DEFAULT_CHUNK_SIZE),
            interval: args
                .chunk_interval_ms
                .map(Duration::from_millis)
                .unwrap_or(DEFAULT_CHUNK_INTERVAL),
        };
        ChatConfig {
            base_url: args.url,
            timeout: args
                .timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_TIMEOUT),
            reveal,
            typewriter: !args.no_typewriter,
            use_color: !args.no_color,
            ..ChatConfig::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = ChatConfig::new();
        assert!(config.base_url.is_none());
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert_eq!(config.temperature, 0.7);
        assert_eq!(config.reveal.chunk_size, 8);
        assert_eq!(config.reveal.interval, Duration::from_millis(10));
        assert!(config.typewriter);
        assert_eq!(config.status_clear_after, Duration::from_secs(4));
        assert!(config.use_color);
        assert_eq!(config.greeting, DEFAULT_GREETING);
    }

    #[test]
    fn config_from_args_defaults() {
        let config = ChatConfig::from(ChatArgs::default());
        assert!(config.base_url.is_none());
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert_eq!(config.reveal, RevealConfig::default());
        assert!(config.typewriter);
        assert!(config.use_color);
    }

    #[test]
    fn config_from_args_custom() {
        let args = ChatArgs {
            url: Some("http://clinic.local:8080".to_string()),
            timeout_secs: Some(5),
            chunk_size: Some(0),
            chunk_interval_ms: Some(25),
            no_typewriter: true,
            no_color: true,
        };
        let config = ChatConfig::from(args);
        assert_eq!(config.base_url.as_deref(), Some("http://clinic.local:8080"));
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.reveal.chunk_size, 1);
        assert_eq!(config.reveal.interval, Duration::from_millis(25));
        assert!(!config.typewriter);
        assert!(!config.use_color);
        assert_eq!(config.temperature, DEFAULT_TEMPERATURE);
    }

    #[test]
    fn config_builder_pattern() {
        let config = ChatConfig::new()
            .with_base_url("http://localhost:5000")
            .with_timeout(Duration::from_secs(10))
            .with_reveal(RevealConfig {
                chunk_size: 4,
                interval: Duration::from_millis(20),
            })
            .with_typewriter(false)
            .with_status_clear_after(Duration::from_secs(1))
            .without_color()
            .with_greeting("Welcome");

        assert_eq!(config.base_url.as_deref(), Some("http://localhost:5000"));
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.reveal.chunk_size, 4);
        assert!(!config.typewriter);
        assert_eq!(config.status_clear_after, Duration::from_secs(1));
        assert!(!config.use_color);
        assert_eq!(config.greeting, "Welcome");
    }
}
