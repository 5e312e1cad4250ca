use serde::{Deserialize, Serialize};
use std::fmt;

/// Who authored a message in the chat log.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    /// The person typing into the client.
    User,

    /// The backend's answer.
    Bot,
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sender::User => write!(f, "user"),
            Sender::Bot => write!(f, "bot"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_wire_name() {
        for sender in [Sender::User, Sender::Bot] {
            let wire = serde_json::to_value(sender).unwrap();
            assert_eq!(wire.as_str(), Some(sender.to_string().as_str()));
        }
    }
}
