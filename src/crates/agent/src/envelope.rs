//! The uniform result returned for every command.

use serde::{Deserialize, Serialize};

pub const PARSE_FAILURE_MESSAGE: &str = "Failed to parse command. Please try rephrasing.";
pub const UPDATE_NOT_IMPLEMENTED: &str = "Update app registration not implemented yet";
pub const DELETE_NOT_IMPLEMENTED: &str = "Delete app registration not implemented yet";

pub const NEXT_STEP_STORE_SECRET: &str =
    "Store the client secret securely (it won't be shown again).";
pub const NEXT_STEP_ADMIN_CONSENT: &str =
    "Admin consent may be required for application permissions.";

/// Identifiers and the one-time secret of a new app registration.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppRegistrationData {
    pub application_id: String,
    pub object_id: String,
    pub service_principal_id: String,
    pub client_secret: String,
}

impl std::fmt::Debug for AppRegistrationData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppRegistrationData")
            .field("application_id", &self.application_id)
            .field("object_id", &self.object_id)
            .field("service_principal_id", &self.service_principal_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/// Outcome of one command: `{success, message, data?, nextSteps?}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutcomeEnvelope {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<AppRegistrationData>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub next_steps: Vec<String>,
}

impl OutcomeEnvelope {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: None,
            next_steps: Vec::new(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            ..Self::success(message)
        }
    }

    pub fn with_data(mut self, data: AppRegistrationData) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_next_steps<I, S>(mut self, steps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.next_steps = steps.into_iter().map(Into::into).collect();
        self
    }
}
