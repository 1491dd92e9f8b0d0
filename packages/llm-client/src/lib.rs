//! Pure chat-completion REST clients for Anthropic and Mistral
//!
//! Minimal clients with no domain-specific logic: one request in, one
//! completion out. Retries, prompting and response interpretation belong
//! to the caller.
//!
//! # Example
//!
//! ```rust,ignore
//! use llm_client::{AnthropicClient, CompletionRequest, Message};
//!
//! let client = AnthropicClient::new(api_key);
//!
//! let completion = client
//!     .complete(
//!         &CompletionRequest::new("claude-sonnet-4-5-20250929")
//!             .message(Message::user("Hello!"))
//!             .max_tokens(1000)
//!             .temperature(0.1),
//!     )
//!     .await?;
//!
//! println!("{}", completion.content);
//! ```

pub mod anthropic;
pub mod error;
pub mod mistral;
pub mod types;

pub use anthropic::AnthropicClient;
pub use error::{LlmError, Result};
pub use mistral::MistralClient;
pub use types::{Completion, CompletionRequest, Message, Usage};
