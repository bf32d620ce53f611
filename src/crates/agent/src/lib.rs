//! Entra agent - natural-language app registration for Microsoft Entra ID.
//!
//! An operator types something like *"Create an app registration called
//! Payroll Sync with Sites.Read.All"*. The agent has a language model restate
//! it as a typed [`ActionDescriptor`], then drives Microsoft Graph through a
//! fixed plan and reports the result as an [`OutcomeEnvelope`].
//!
//! # Modules
//!
//! - [`parser`] - model-backed command parsing and JSON extraction
//! - [`descriptor`] - the validated action types
//! - [`orchestrator`] - dispatch and the create plan
//! - [`envelope`] - the uniform response
//! - [`api`] - axum router for the HTTP surface
//! - [`cli`] - terminal rendering
//! - [`config`] / [`init`] - configuration and wiring
//!
//! # Example
//!
//! ```rust,ignore
//! use entra_agent::{build_agent, AgentConfig};
//!
//! let config = AgentConfig::load(None)?;
//! let agent = build_agent(&config)?;
//! let outcome = agent
//!     .process_command("Create an app registration named Payroll Sync")
//!     .await;
//! println!("{}", outcome.message);
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod descriptor;
pub mod envelope;
pub mod error;
pub mod init;
pub mod orchestrator;
pub mod parser;

pub use api::{create_router, serve, with_server_layers, AppState};
pub use config::{AgentConfig, AgentSettings};
pub use descriptor::{ActionDescriptor, AppRegistrationSpec};
pub use envelope::{AppRegistrationData, OutcomeEnvelope};
pub use error::{AgentError, ParseFailure, Result};
pub use init::{build_agent, EntraAgent};
pub use orchestrator::{CommandProcessor, Orchestrator};
pub use parser::{extract_json, CommandParser, LlmCommandParser};
