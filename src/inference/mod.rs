pub mod provider;
pub mod providers;
pub mod types;

pub use provider::{CompletionClient, CompletionError, response_text};
pub use providers::OpenAiProvider;
pub use types::{ChatMessage, ChatRequest, ChatResponse, Role};
