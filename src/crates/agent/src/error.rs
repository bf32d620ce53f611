//! Error types for the agent.
//!
//! Everything below the orchestration boundary returns [`AgentError`]; the
//! orchestrator folds it into an unsuccessful envelope so callers never see
//! a raw error.

use graph::GraphError;
use llm::LlmError;
use thiserror::Error;
use utils::UtilsError;

/// Result type alias for agent operations.
pub type Result<T> = std::result::Result<T, AgentError>;

/// Why a command could not be turned into an action.
#[derive(Debug, Error)]
pub enum ParseFailure {
    /// The language model call itself failed.
    #[error("language model request failed: {0}")]
    Model(#[from] LlmError),

    /// No JSON value could be decoded from the reply.
    #[error("Failed to decode JSON from response: {reply}")]
    UndecodableReply { reply: String },

    /// The reply decoded, but not to an object.
    #[error("parsed reply is not a JSON object")]
    NotAnObject,

    /// The object carries no usable `action`.
    #[error("parsed reply has no action")]
    MissingAction,

    /// A field the action needs is absent or empty.
    #[error("parsed reply is missing required field '{0}'")]
    MissingField(&'static str),

    /// A field is present with the wrong shape.
    #[error("field '{field}' is invalid: {reason}")]
    InvalidField { field: &'static str, reason: String },
}

/// Main error type for agent operations.
#[derive(Debug, Error)]
pub enum AgentError {
    /// Configuration could not be loaded or is incomplete.
    #[error(transparent)]
    Config(#[from] UtilsError),

    /// The command could not be parsed.
    #[error("Failed to parse command: {0}")]
    Parse(#[from] ParseFailure),

    /// A directory call failed.
    #[error(transparent)]
    Graph(#[from] GraphError),

    /// Building the language model client failed.
    #[error(transparent)]
    Llm(#[from] LlmError),

    /// The action has no execution plan, either because it is not built yet
    /// or because it is not recognised. Carries the user-facing message.
    #[error("{0}")]
    UnsupportedAction(String),

    /// Listener or transport failure in the web server.
    #[error("Server error: {0}")]
    Server(String),
}
