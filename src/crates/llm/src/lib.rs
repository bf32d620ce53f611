//! Chat-completion client for entra-agent.
//!
//! The agent uses a language model purely as a text-to-JSON extractor, so the
//! surface here is small: a [`ChatModel`] trait, the request/response types it
//! exchanges, and one remote implementation that speaks both the public OpenAI
//! API and Azure OpenAI deployments.
//!
//! # Example Usage
//!
//! ## Azure OpenAI deployment
//!
//! ```rust,ignore
//! use llm::remote::OpenAiClient;
//! use llm::config::RemoteLlmConfig;
//! use llm::{ChatModel, ChatRequest, Message};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = RemoteLlmConfig::azure(
//!         std::env::var("AZURE_OPENAI_API_KEY")?,
//!         "https://contoso.openai.azure.com",
//!         "gpt-4o",
//!         "2023-05-15",
//!     );
//!     let client = OpenAiClient::new(config)?;
//!
//!     let request = ChatRequest::new(vec![
//!         Message::system("Extract the action as JSON."),
//!         Message::human("Create an app registration named Payroll"),
//!     ])
//!     .with_temperature(0.0)
//!     .with_max_tokens(800);
//!
//!     let response = client.chat(request).await?;
//!     println!("{}", response.message.content);
//!     Ok(())
//! }
//! ```
//!
//! ## Public OpenAI API
//!
//! ```rust,ignore
//! let config = RemoteLlmConfig::from_env("OPENAI_API_KEY", "https://api.openai.com/v1", "gpt-4")?;
//! let client = OpenAiClient::new(config)?;
//! ```

pub mod chat;
pub mod config;
pub mod error;

#[cfg(feature = "remote")]
pub mod remote;

// Re-export commonly used types
pub use chat::{ChatConfig, ChatModel, ChatRequest, ChatResponse, Message, MessageRole, UsageMetadata};
pub use config::{ApiDialect, RemoteLlmConfig};
pub use error::{LlmError, Result};
