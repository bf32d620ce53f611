//! Test doubles for the orchestrator's collaborators.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::Duration;
use entra_agent::{ActionDescriptor, AppRegistrationSpec, CommandParser, ParseFailure};
use graph::{
    ApplicationRecord, ClientSecretRecord, DirectoryOperations, GraphError, PermissionGrantReport,
    ServicePrincipalRecord,
};
use std::sync::Mutex;

pub const STUB_SECRET: &str = "Xy9~stub-secret-value-0000";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    CreateApplication,
    CreateSecret,
    AddPermissions,
    CreateServicePrincipal,
    GrantConsent,
}

/// Directory stand-in that records every call and can fail one step.
#[derive(Default)]
pub struct StubDirectory {
    pub calls: Mutex<Vec<Step>>,
    pub fail_at: Option<Step>,
    pub last_permissions: Mutex<Vec<String>>,
    pub last_description: Mutex<Option<String>>,
    pub last_secret_validity: Mutex<Option<Duration>>,
}

impl StubDirectory {
    pub fn failing_at(step: Step) -> Self {
        Self {
            fail_at: Some(step),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<Step> {
        self.calls.lock().unwrap().clone()
    }

    fn enter(&self, step: Step) -> graph::Result<()> {
        self.calls.lock().unwrap().push(step);
        if self.fail_at == Some(step) {
            return Err(GraphError::Api {
                status: 403,
                body: format!("{:?} denied", step),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl DirectoryOperations for StubDirectory {
    async fn create_application(
        &self,
        _display_name: &str,
        description: Option<&str>,
    ) -> graph::Result<ApplicationRecord> {
        self.enter(Step::CreateApplication)?;
        *self.last_description.lock().unwrap() = description.map(str::to_string);
        Ok(ApplicationRecord {
            object_id: "obj-1".to_string(),
            application_id: "app-1".to_string(),
        })
    }

    async fn create_client_secret(
        &self,
        object_id: &str,
        _display_name: &str,
        valid_for: Duration,
    ) -> graph::Result<ClientSecretRecord> {
        self.enter(Step::CreateSecret)?;
        assert_eq!(object_id, "obj-1");
        *self.last_secret_validity.lock().unwrap() = Some(valid_for);
        Ok(ClientSecretRecord {
            secret_id: Some("key-1".to_string()),
            secret_value: STUB_SECRET.to_string(),
            end_date_time: None,
        })
    }

    async fn add_required_permissions(
        &self,
        object_id: &str,
        permissions: &[String],
    ) -> graph::Result<PermissionGrantReport> {
        self.enter(Step::AddPermissions)?;
        assert_eq!(object_id, "obj-1");
        *self.last_permissions.lock().unwrap() = permissions.to_vec();
        Ok(PermissionGrantReport::default())
    }

    async fn create_service_principal(
        &self,
        app_id: &str,
    ) -> graph::Result<ServicePrincipalRecord> {
        self.enter(Step::CreateServicePrincipal)?;
        assert_eq!(app_id, "app-1");
        Ok(ServicePrincipalRecord {
            service_principal_id: "sp-1".to_string(),
        })
    }

    async fn grant_admin_consent(
        &self,
        _service_principal_id: &str,
        _permission_ids: &[String],
    ) -> graph::Result<()> {
        self.enter(Step::GrantConsent)
    }
}

pub enum ParserBehaviour {
    Returns(ActionDescriptor),
    Fails,
    Panics,
}

/// Parser stand-in with a fixed answer.
pub struct StubParser {
    behaviour: ParserBehaviour,
    pub seen: Mutex<Vec<String>>,
}

impl StubParser {
    pub fn returning(descriptor: ActionDescriptor) -> Self {
        Self {
            behaviour: ParserBehaviour::Returns(descriptor),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            behaviour: ParserBehaviour::Fails,
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn panicking() -> Self {
        Self {
            behaviour: ParserBehaviour::Panics,
            seen: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl CommandParser for StubParser {
    async fn parse(&self, command: &str) -> Result<ActionDescriptor, ParseFailure> {
        self.seen.lock().unwrap().push(command.to_string());
        match &self.behaviour {
            ParserBehaviour::Returns(descriptor) => Ok(descriptor.clone()),
            ParserBehaviour::Fails => Err(ParseFailure::MissingAction),
            ParserBehaviour::Panics => panic!("parser exploded"),
        }
    }
}

pub fn create(app_name: &str, permissions: &[&str], description: Option<&str>) -> ActionDescriptor {
    ActionDescriptor::CreateAppRegistration(AppRegistrationSpec {
        app_name: app_name.to_string(),
        permissions: permissions.iter().map(|p| p.to_string()).collect(),
        description: description.map(str::to_string),
    })
}
