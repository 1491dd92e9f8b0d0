//! Request and response types shared by the provider clients.
//!
//! Anthropic's Messages API and Mistral's chat completions API accept the
//! same request shape for plain single-turn prompts, so one request type
//! serves both. The responses differ and are decoded separately.

use serde::{Deserialize, Serialize};

// =============================================================================
// Request
// =============================================================================

/// Completion request.
#[derive(Debug, Clone, Serialize)]
pub struct CompletionRequest {
    /// Model to use (e.g., "claude-sonnet-4-5-20250929", "mistral-large-latest")
    pub model: String,

    /// Conversation messages
    pub messages: Vec<Message>,

    /// Maximum tokens in the completion
    pub max_tokens: u32,

    /// Sampling temperature
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

impl CompletionRequest {
    /// Create a new request with the given model and a 1000 token budget.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            messages: Vec::new(),
            max_tokens: 1000,
            temperature: None,
        }
    }

    /// Add a message to the conversation.
    pub fn message(mut self, message: Message) -> Self {
        self.messages.push(message);
        self
    }

    /// Set temperature.
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set max tokens.
    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

/// Chat message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Role: "user" or "assistant"
    pub role: String,

    /// Message content
    pub content: String,
}

impl Message {
    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

// =============================================================================
// Response
// =============================================================================

/// Completion returned by either provider.
#[derive(Debug, Clone)]
pub struct Completion {
    /// Response text
    pub content: String,

    /// Token usage statistics
    pub usage: Option<Usage>,
}

/// Token usage, normalized across providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// Anthropic Messages API response.
#[derive(Debug, Deserialize)]
pub(crate) struct AnthropicResponseRaw {
    #[serde(default)]
    pub content: Vec<AnthropicContentBlock>,
    pub usage: Option<AnthropicUsage>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AnthropicContentBlock {
    #[serde(rename = "type")]
    pub block_type: String,
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AnthropicUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl AnthropicResponseRaw {
    /// Concatenated text of all text blocks, `None` when there is none.
    pub fn text(&self) -> Option<String> {
        let text: String = self
            .content
            .iter()
            .filter(|block| block.block_type == "text")
            .filter_map(|block| block.text.as_deref())
            .collect();
        (!text.is_empty()).then_some(text)
    }
}

/// Mistral chat completions response.
#[derive(Debug, Deserialize)]
pub(crate) struct MistralResponseRaw {
    #[serde(default)]
    pub choices: Vec<MistralChoice>,
    pub usage: Option<MistralUsage>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MistralChoice {
    pub message: MistralMessage,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MistralMessage {
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MistralUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

impl MistralResponseRaw {
    /// Text of the first choice, `None` when missing or empty.
    pub fn text(&self) -> Option<String> {
        self.choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .filter(|text| !text.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builder() {
        let req = CompletionRequest::new("mistral-large-latest")
            .message(Message::user("Hello"))
            .temperature(0.1)
            .max_tokens(4096);

        assert_eq!(req.model, "mistral-large-latest");
        assert_eq!(req.messages.len(), 1);
        assert_eq!(req.temperature, Some(0.1));
        assert_eq!(req.max_tokens, 4096);
    }

    #[test]
    fn test_request_serializes_without_temperature() {
        let req = CompletionRequest::new("m").message(Message::user("hi"));
        let json = serde_json::to_value(&req).unwrap();

        assert_eq!(json["max_tokens"], 1000);
        assert_eq!(json["messages"][0]["role"], "user");
        assert!(json.get("temperature").is_none());
    }

    #[test]
    fn test_anthropic_text_joins_text_blocks() {
        let raw: AnthropicResponseRaw = serde_json::from_str(
            r#"{"content":[{"type":"text","text":"{\"a\":"},{"type":"tool_use"},{"type":"text","text":"1}"}],
                "usage":{"input_tokens":10,"output_tokens":4}}"#,
        )
        .unwrap();

        assert_eq!(raw.text().as_deref(), Some("{\"a\":1}"));
        assert_eq!(raw.usage.unwrap().output_tokens, 4);
    }

    #[test]
    fn test_anthropic_empty_content() {
        let raw: AnthropicResponseRaw = serde_json::from_str(r#"{"content":[]}"#).unwrap();
        assert!(raw.text().is_none());
    }

    #[test]
    fn test_mistral_text() {
        let raw: MistralResponseRaw = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"ok"}}],
                "usage":{"prompt_tokens":3,"completion_tokens":1,"total_tokens":4}}"#,
        )
        .unwrap();
        assert_eq!(raw.text().as_deref(), Some("ok"));

        let empty: MistralResponseRaw =
            serde_json::from_str(r#"{"choices":[{"message":{"content":""}}]}"#).unwrap();
        assert!(empty.text().is_none());
    }
}
