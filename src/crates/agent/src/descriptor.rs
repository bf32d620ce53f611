//! Typed actions decoded from the model's reply.
//!
//! The model answers with a loose JSON object
//! (`{action, appName?, permissions?, description?}`). [`ActionDescriptor::from_value`]
//! is the only way in, so every descriptor the orchestrator sees has already
//! been validated.

use crate::error::ParseFailure;
use serde::Serialize;
use serde_json::{Map, Value};

pub const CREATE_APP_REGISTRATION: &str = "create_app_registration";
pub const UPDATE_APP_REGISTRATION: &str = "update_app_registration";
pub const DELETE_APP_REGISTRATION: &str = "delete_app_registration";

/// Arguments shared by the app-registration actions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppRegistrationSpec {
    pub app_name: String,
    pub permissions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A validated action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionDescriptor {
    /// `appName` is guaranteed non-empty.
    CreateAppRegistration(AppRegistrationSpec),
    UpdateAppRegistration(AppRegistrationSpec),
    DeleteAppRegistration(AppRegistrationSpec),
    /// Any other action string, kept so it can be reported by name.
    Unknown(String),
}

impl ActionDescriptor {
    /// Validate a decoded reply.
    pub fn from_value(value: &Value) -> Result<Self, ParseFailure> {
        let object = value.as_object().ok_or(ParseFailure::NotAnObject)?;

        let action = match object.get("action") {
            Some(Value::String(action)) if !action.trim().is_empty() => action.trim(),
            Some(Value::String(_)) | Some(Value::Null) | None => {
                return Err(ParseFailure::MissingAction)
            }
            Some(other) => {
                return Err(ParseFailure::InvalidField {
                    field: "action",
                    reason: format!("expected a string, got {}", other),
                })
            }
        };

        let spec = AppRegistrationSpec {
            app_name: optional_string(object, "appName")?.unwrap_or_default(),
            permissions: permissions(object)?,
            description: optional_string(object, "description")?,
        };

        Ok(match action {
            CREATE_APP_REGISTRATION => {
                if spec.app_name.is_empty() {
                    return Err(ParseFailure::MissingField("appName"));
                }
                ActionDescriptor::CreateAppRegistration(spec)
            }
            UPDATE_APP_REGISTRATION => ActionDescriptor::UpdateAppRegistration(spec),
            DELETE_APP_REGISTRATION => ActionDescriptor::DeleteAppRegistration(spec),
            other => ActionDescriptor::Unknown(other.to_string()),
        })
    }

    /// The wire name of the action.
    pub fn action_name(&self) -> &str {
        match self {
            ActionDescriptor::CreateAppRegistration(_) => CREATE_APP_REGISTRATION,
            ActionDescriptor::UpdateAppRegistration(_) => UPDATE_APP_REGISTRATION,
            ActionDescriptor::DeleteAppRegistration(_) => DELETE_APP_REGISTRATION,
            ActionDescriptor::Unknown(action) => action,
        }
    }
}

/// A trimmed string field; null and empty strings read as absent.
fn optional_string(
    object: &Map<String, Value>,
    field: &'static str,
) -> Result<Option<String>, ParseFailure> {
    match object.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => {
            let s = s.trim();
            Ok((!s.is_empty()).then(|| s.to_string()))
        }
        Some(other) => Err(ParseFailure::InvalidField {
            field,
            reason: format!("expected a string, got {}", other),
        }),
    }
}

fn permissions(object: &Map<String, Value>) -> Result<Vec<String>, ParseFailure> {
    let invalid = |reason: String| ParseFailure::InvalidField {
        field: "permissions",
        reason,
    };

    match object.get("permissions") {
        None | Some(Value::Null) => Ok(Vec::new()),
        // The model is told to leave fields it cannot fill empty.
        Some(Value::String(s)) if s.trim().is_empty() => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) if s.trim().is_empty() => None,
                Value::String(s) => Some(Ok(s.trim().to_string())),
                other => Some(Err(invalid(format!("non-string entry {}", other)))),
            })
            .collect(),
        Some(other) => Err(invalid(format!("expected a list, got {}", other))),
    }
}
