//! Chat model trait and the request/response types it exchanges.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Role of a message author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    Human,
    Assistant,
}

/// A single chat message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    /// Create a message with an explicit role.
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Create a system (instruction) message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageRole::System, content)
    }

    /// Create a user message.
    pub fn human(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Human, content)
    }

    /// Create an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }
}

/// Generation parameters.
///
/// Unset fields are omitted from the wire request so the provider default
/// applies.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatConfig {
    /// Sampling temperature. `0.0` makes extraction deterministic.
    pub temperature: Option<f32>,

    /// Upper bound on generated tokens.
    pub max_tokens: Option<usize>,

    /// Number of completions to generate.
    pub choices: Option<u32>,

    /// Sequences that halt generation.
    pub stop_sequences: Vec<String>,
}

/// A request to a chat model.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    /// The conversation messages to send to the model.
    pub messages: Vec<Message>,

    /// Generation parameters.
    pub config: ChatConfig,
}

impl ChatRequest {
    /// Create a new chat request with default configuration.
    pub fn new(messages: Vec<Message>) -> Self {
        Self {
            messages,
            config: ChatConfig::default(),
        }
    }

    /// Set the temperature for generation.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.config.temperature = Some(temperature);
        self
    }

    /// Set the maximum number of tokens to generate.
    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.config.max_tokens = Some(max_tokens);
        self
    }

    /// Set the number of completions to request.
    pub fn with_choices(mut self, choices: u32) -> Self {
        self.config.choices = Some(choices);
        self
    }

    /// Add stop sequences that halt generation.
    pub fn with_stop_sequences(mut self, sequences: Vec<String>) -> Self {
        self.config.stop_sequences = sequences;
        self
    }
}

/// Token accounting reported by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageMetadata {
    pub input_tokens: usize,
    pub output_tokens: usize,
}

impl UsageMetadata {
    pub fn new(input_tokens: usize, output_tokens: usize) -> Self {
        Self {
            input_tokens,
            output_tokens,
        }
    }

    pub fn total_tokens(&self) -> usize {
        self.input_tokens + self.output_tokens
    }
}

/// A complete model response.
#[derive(Debug, Clone)]
pub struct ChatResponse {
    /// The assistant's reply (first choice).
    pub message: Message,

    /// Token usage, when reported.
    pub usage: Option<UsageMetadata>,

    /// Provider-specific metadata such as `model` and `finish_reason`.
    pub metadata: HashMap<String, serde_json::Value>,
}

/// Provider-agnostic chat-completion interface.
///
/// Implementations must be `Send + Sync`; the agent holds one instance behind
/// an `Arc` and shares it across concurrent requests.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Generate a complete chat response from messages.
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse>;

    /// Name of the model or deployment this client targets.
    fn model_name(&self) -> &str;
}
