// Public modules
pub mod chat;
pub mod envelope;
pub mod message;
pub mod models;
pub mod sender;

// Re-exports
pub use chat::{ChatReply, ChatRequest, ChatResponse};
pub use envelope::{Envelope, ErrorEnvelope};
pub use message::{Message, MessageId, PlaceholderToken};
pub use models::{ModelCatalog, ModelState, ModelsResponse, SelectModelRequest, SelectModelResponse};
pub use sender::Sender;
