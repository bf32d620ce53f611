//! Command dispatch and the app-registration plan.
//!
//! ```text
//! command text -> CommandParser -> ActionDescriptor -> plan -> OutcomeEnvelope
//! ```
//!
//! The create plan runs strictly in order and stops at the first failure:
//!
//! 1. create the application
//! 2. add a client secret valid for one year
//! 3. merge requested permissions (skipped when none were asked for)
//! 4. create the service principal
//!
//! Nothing is rolled back. When a later step fails, the identifiers created so
//! far are logged at `warn` so an operator can clean up.

use crate::descriptor::{ActionDescriptor, AppRegistrationSpec};
use crate::envelope::{
    AppRegistrationData, OutcomeEnvelope, DELETE_NOT_IMPLEMENTED, NEXT_STEP_ADMIN_CONSENT,
    NEXT_STEP_STORE_SECRET, PARSE_FAILURE_MESSAGE, UPDATE_NOT_IMPLEMENTED,
};
use crate::error::{AgentError, Result};
use crate::parser::CommandParser;
use async_trait::async_trait;
use futures::FutureExt;
use graph::{ApplicationRecord, DirectoryOperations, DEFAULT_SECRET_DISPLAY_NAME, SECRET_VALIDITY_DAYS};
use std::any::Any;
use std::panic::AssertUnwindSafe;
use tracing::{error, info, warn, Instrument};
use uuid::Uuid;

/// Anything that can answer a command with an envelope.
///
/// The HTTP surface holds one of these behind an `Arc`.
#[async_trait]
pub trait CommandProcessor: Send + Sync {
    async fn process_command(&self, command: &str) -> OutcomeEnvelope;
}

/// Parses commands and drives directory operations.
pub struct Orchestrator<D, P> {
    directory: D,
    parser: P,
}

impl<D, P> Orchestrator<D, P>
where
    D: DirectoryOperations,
    P: CommandParser,
{
    pub fn new(directory: D, parser: P) -> Self {
        Self { directory, parser }
    }

    pub fn directory(&self) -> &D {
        &self.directory
    }

    pub fn parser(&self) -> &P {
        &self.parser
    }

    /// Parse and execute one command. Never fails; every error, including a
    /// panic inside the pipeline, becomes an unsuccessful envelope.
    pub async fn process_command(&self, command: &str) -> OutcomeEnvelope {
        let span = tracing::info_span!("command", id = %Uuid::new_v4());

        async {
            info!(command, "Processing command");
            match AssertUnwindSafe(self.dispatch(command)).catch_unwind().await {
                Ok(Ok(envelope)) => envelope,
                Ok(Err(err)) => rejected(err),
                Err(panic) => {
                    let reason = panic_message(panic.as_ref());
                    error!(reason = %reason, "Command pipeline panicked");
                    OutcomeEnvelope::failure(format!("Error processing command: {}", reason))
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn dispatch(&self, command: &str) -> Result<OutcomeEnvelope> {
        let descriptor = self.parser.parse(command).await?;
        info!(action = descriptor.action_name(), "Parsed command");

        match descriptor {
            ActionDescriptor::CreateAppRegistration(AppRegistrationSpec {
                app_name,
                permissions,
                description,
            }) => Ok(self
                .create_app_registration(&app_name, &permissions, description.as_deref())
                .await),
            ActionDescriptor::UpdateAppRegistration(_) => Err(AgentError::UnsupportedAction(
                UPDATE_NOT_IMPLEMENTED.to_string(),
            )),
            ActionDescriptor::DeleteAppRegistration(_) => Err(AgentError::UnsupportedAction(
                DELETE_NOT_IMPLEMENTED.to_string(),
            )),
            ActionDescriptor::Unknown(action) => Err(AgentError::UnsupportedAction(format!(
                "Unknown action: {}",
                action
            ))),
        }
    }

    /// Run the create plan for one application.
    pub async fn create_app_registration(
        &self,
        app_name: &str,
        permissions: &[String],
        description: Option<&str>,
    ) -> OutcomeEnvelope {
        info!(app_name, permissions = permissions.len(), "Creating app registration");

        let app = match self.directory.create_application(app_name, description).await {
            Ok(app) => app,
            Err(err) => return creation_failed(err.into(), None),
        };

        match self.complete_registration(&app, permissions).await {
            Ok(data) => OutcomeEnvelope::success(format!(
                "App registration '{}' created successfully.",
                app_name
            ))
            .with_data(data)
            .with_next_steps([NEXT_STEP_STORE_SECRET, NEXT_STEP_ADMIN_CONSENT]),
            Err(err) => creation_failed(err, Some(&app)),
        }
    }

    async fn complete_registration(
        &self,
        app: &ApplicationRecord,
        permissions: &[String],
    ) -> Result<AppRegistrationData> {
        let secret = self
            .directory
            .create_client_secret(
                &app.object_id,
                DEFAULT_SECRET_DISPLAY_NAME,
                chrono::Duration::days(SECRET_VALIDITY_DAYS),
            )
            .await?;

        if !permissions.is_empty() {
            let report = self
                .directory
                .add_required_permissions(&app.object_id, permissions)
                .await?;
            if !report.skipped.is_empty() {
                warn!(skipped = ?report.skipped, "Some permissions were not recognised");
            }
        }

        let sp = self
            .directory
            .create_service_principal(&app.application_id)
            .await?;

        Ok(AppRegistrationData {
            application_id: app.application_id.clone(),
            object_id: app.object_id.clone(),
            service_principal_id: sp.service_principal_id,
            client_secret: secret.secret_value,
        })
    }
}

#[async_trait]
impl<D, P> CommandProcessor for Orchestrator<D, P>
where
    D: DirectoryOperations,
    P: CommandParser,
{
    async fn process_command(&self, command: &str) -> OutcomeEnvelope {
        Orchestrator::process_command(self, command).await
    }
}

fn creation_failed(err: AgentError, created: Option<&ApplicationRecord>) -> OutcomeEnvelope {
    error!(error = %err, "Error creating app registration");
    if let Some(app) = created {
        warn!(
            object_id = %app.object_id,
            app_id = %app.application_id,
            "Application left in place after a failed step; remove it manually if unwanted"
        );
    }
    OutcomeEnvelope::failure(format!("Error creating app registration: {}", err))
}

/// Envelope for a command the pipeline refused or could not finish.
fn rejected(err: AgentError) -> OutcomeEnvelope {
    match err {
        AgentError::Parse(reason) => {
            warn!(error = %reason, "Command could not be parsed");
            OutcomeEnvelope::failure(PARSE_FAILURE_MESSAGE)
        }
        AgentError::UnsupportedAction(message) => {
            warn!(%message, "Action not supported");
            OutcomeEnvelope::failure(message)
        }
        other => {
            error!(error = %other, "Error processing command");
            OutcomeEnvelope::failure(format!("Error processing command: {}", other))
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "command pipeline panicked".to_string()
    }
}
