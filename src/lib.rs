// Public modules
pub mod backend;
pub mod chat;
pub mod client;
pub mod error;
pub mod observability;
pub mod types;

// Re-exports
pub use backend::Backend;
pub use client::ChatClient;
pub use error::{Error, Result};
pub use observability::register_biometrics;
pub use types::*;
