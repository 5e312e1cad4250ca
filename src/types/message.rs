use serde::{Deserialize, Serialize};
use std::fmt;
use time::OffsetDateTime;

use crate::types::Sender;

/// A single entry in the chat log.
///
/// Messages are created when the user sends a query or a reply arrives and
/// are never edited afterwards; the typewriter reveal only changes how much
/// of the text is displayed, not the message itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// The full text of the message.
    pub text: String,

    /// Who wrote the message.
    pub sender: Sender,

    /// When the message was created.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Message {
    /// Create a message stamped with the current time.
    pub fn new(text: impl Into<String>, sender: Sender) -> Self {
        Self {
            text: text.into(),
            sender,
            created_at: OffsetDateTime::now_utc(),
        }
    }

    /// Create a user message.
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(text, Sender::User)
    }

    /// Create a bot message.
    pub fn bot(text: impl Into<String>) -> Self {
        Self::new(text, Sender::Bot)
    }
}

/// Handle to a message element appended to a view.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageId(pub u64);

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "message-{}", self.0)
    }
}

/// Token correlating a loading placeholder with its later removal.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlaceholderToken(pub u64);

impl fmt::Display for PlaceholderToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "loading-{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn message_serialization() {
        let message = Message {
            text: "What is a fever?".to_string(),
            sender: Sender::User,
            created_at: datetime!(2025-02-19 0:00:00 UTC),
        };

        let json = serde_json::to_value(&message).unwrap();
        let expected = serde_json::json!({
            "text": "What is a fever?",
            "sender": "user",
            "created_at": "2025-02-19T00:00:00Z"
        });
        assert_eq!(json, expected);
    }

    #[test]
    fn element_ids() {
        assert_eq!(MessageId(3).to_string(), "message-3");
        assert_eq!(PlaceholderToken(17).to_string(), "loading-17");
    }
}
