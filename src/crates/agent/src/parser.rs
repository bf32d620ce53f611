//! Natural-language command parsing.
//!
//! [`LlmCommandParser`] asks a chat model to restate the operator's request
//! as JSON, then [`extract_json`] and [`ActionDescriptor::from_value`] turn
//! the reply into a typed action.

use crate::descriptor::ActionDescriptor;
use crate::error::ParseFailure;
use async_trait::async_trait;
use llm::{ChatModel, ChatRequest, Message};
use serde_json::Value;
use tracing::{debug, warn};

/// Instruction sent ahead of every command.
pub const SYSTEM_PROMPT: &str = "\
You are an AI assistant specialized in parsing natural language commands related to Microsoft Entra ID (formerly Azure AD) operations.
Your task is to extract structured information from the user's command.

For app registration commands, extract the following information:
- action: The specific action (e.g., create_app_registration, update_app_registration, delete_app_registration)
- appName: The name of the app registration
- permissions: List of required API permissions (e.g., [\"Sites.Read.All\", \"User.Read\"])
- description: Purpose of the app registration

Return the extracted information as valid JSON with these fields only when relevant.
If you cannot confidently extract a piece of information, leave that field empty.";

pub const PARSE_TEMPERATURE: f32 = 0.0;
pub const PARSE_MAX_TOKENS: usize = 800;

/// Turns command text into a validated action.
#[async_trait]
pub trait CommandParser: Send + Sync {
    async fn parse(&self, command: &str) -> Result<ActionDescriptor, ParseFailure>;
}

/// Pull a JSON value out of a model reply.
///
/// Takes the span from the first `{` to the last `}` so prose and code
/// fences around the object are ignored. Without such a span the whole
/// trimmed reply is parsed.
pub fn extract_json(reply: &str) -> Result<Value, ParseFailure> {
    let reply = reply.trim();
    let candidate = match (reply.find('{'), reply.rfind('}')) {
        (Some(start), Some(end)) if end > start => &reply[start..=end],
        _ => reply,
    };

    serde_json::from_str(candidate).map_err(|_| ParseFailure::UndecodableReply {
        reply: reply.to_string(),
    })
}

/// [`CommandParser`] backed by a chat model.
pub struct LlmCommandParser<M> {
    model: M,
}

impl<M: ChatModel> LlmCommandParser<M> {
    pub fn new(model: M) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    fn request(command: &str) -> ChatRequest {
        ChatRequest::new(vec![Message::system(SYSTEM_PROMPT), Message::human(command)])
            .with_temperature(PARSE_TEMPERATURE)
            .with_max_tokens(PARSE_MAX_TOKENS)
            .with_choices(1)
    }
}

#[async_trait]
impl<M: ChatModel> CommandParser for LlmCommandParser<M> {
    async fn parse(&self, command: &str) -> Result<ActionDescriptor, ParseFailure> {
        let response = self.model.chat(Self::request(command)).await.map_err(|e| {
            warn!(model = self.model.model_name(), error = %e, "Command parsing request failed");
            ParseFailure::from(e)
        })?;

        let reply = response.message.content;
        debug!(reply = %reply, "Model reply");

        let value = extract_json(&reply)?;
        ActionDescriptor::from_value(&value)
    }
}
