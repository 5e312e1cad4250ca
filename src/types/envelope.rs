/// The `success` / `error` wrapper shared by every backend response.
///
/// The backend always answers with a JSON object carrying a boolean
/// `success` flag; failures may carry a human-readable `error`.
pub trait Envelope {
    /// Whether the server reports the request as successful.
    fn success(&self) -> bool;

    /// The server-supplied error text, if any.
    fn error(&self) -> Option<&str>;
}

/// Minimal envelope used to inspect bodies that accompany non-2xx responses.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
pub struct ErrorEnvelope {
    /// Whether the server reports the request as successful.
    pub success: bool,

    /// The server-supplied error text, if any.
    #[serde(default)]
    pub error: Option<String>,
}

impl Envelope for ErrorEnvelope {
    fn success(&self) -> bool {
        self.success
    }

    fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}
