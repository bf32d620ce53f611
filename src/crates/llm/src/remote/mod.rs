//! Remote completion providers.
//!
//! - **OpenAI** - public OpenAI API and Azure OpenAI deployments, selected by
//!   [`ApiDialect`](crate::config::ApiDialect)

pub mod openai;

pub use openai::OpenAiClient;
