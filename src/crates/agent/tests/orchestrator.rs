//! Orchestrator behaviour against stub collaborators.

mod common;

use chrono::Duration;
use common::{create, Step, StubDirectory, StubParser, STUB_SECRET};
use entra_agent::envelope::{NEXT_STEP_ADMIN_CONSENT, NEXT_STEP_STORE_SECRET};
use entra_agent::{ActionDescriptor, AppRegistrationSpec, CommandProcessor, Orchestrator};
use std::sync::Arc;

#[tokio::test]
async fn test_create_succeeds_with_all_fields() {
    let orchestrator = Orchestrator::new(
        StubDirectory::default(),
        StubParser::returning(create("Foo", &["Sites.Read.All"], Some("desc"))),
    );

    let outcome = orchestrator
        .process_command("Create an app called Foo with Sites.Read.All")
        .await;

    assert!(outcome.success);
    assert_eq!(outcome.message, "App registration 'Foo' created successfully.");
    let data = outcome.data.expect("data present");
    assert_eq!(data.application_id, "app-1");
    assert_eq!(data.object_id, "obj-1");
    assert_eq!(data.service_principal_id, "sp-1");
    assert_eq!(data.client_secret, STUB_SECRET);
    assert_eq!(
        outcome.next_steps,
        vec![NEXT_STEP_STORE_SECRET, NEXT_STEP_ADMIN_CONSENT]
    );

    let directory = orchestrator.directory();
    assert_eq!(
        directory.calls(),
        vec![
            Step::CreateApplication,
            Step::CreateSecret,
            Step::AddPermissions,
            Step::CreateServicePrincipal,
        ]
    );
    assert_eq!(
        *directory.last_permissions.lock().unwrap(),
        vec!["Sites.Read.All".to_string()]
    );
    assert_eq!(
        directory.last_description.lock().unwrap().as_deref(),
        Some("desc")
    );
    assert_eq!(
        *directory.last_secret_validity.lock().unwrap(),
        Some(Duration::days(365))
    );
}

#[tokio::test]
async fn test_no_permissions_skips_permission_step() {
    let orchestrator = Orchestrator::new(
        StubDirectory::default(),
        StubParser::returning(create("Foo", &[], None)),
    );

    let outcome = orchestrator.process_command("Create Foo").await;

    assert!(outcome.success);
    assert_eq!(
        orchestrator.directory().calls(),
        vec![
            Step::CreateApplication,
            Step::CreateSecret,
            Step::CreateServicePrincipal,
        ]
    );
}

#[tokio::test]
async fn test_secret_failure_stops_before_service_principal() {
    let orchestrator = Orchestrator::new(
        StubDirectory::failing_at(Step::CreateSecret),
        StubParser::returning(create("Foo", &["User.Read"], None)),
    );

    let outcome = orchestrator.process_command("Create Foo").await;

    assert!(!outcome.success);
    assert!(outcome
        .message
        .starts_with("Error creating app registration: Graph API error 403"));
    assert!(outcome.data.is_none());
    assert_eq!(
        orchestrator.directory().calls(),
        vec![Step::CreateApplication, Step::CreateSecret]
    );
}

#[tokio::test]
async fn test_application_failure_stops_immediately() {
    let orchestrator = Orchestrator::new(
        StubDirectory::failing_at(Step::CreateApplication),
        StubParser::returning(create("Foo", &[], None)),
    );

    let outcome = orchestrator.create_app_registration("Foo", &[], None).await;

    assert!(!outcome.success);
    assert!(outcome.message.starts_with("Error creating app registration: "));
    assert_eq!(orchestrator.directory().calls(), vec![Step::CreateApplication]);
}

#[tokio::test]
async fn test_permission_failure_aborts_plan() {
    let orchestrator = Orchestrator::new(
        StubDirectory::failing_at(Step::AddPermissions),
        StubParser::returning(create("Foo", &["User.Read"], None)),
    );

    let outcome = orchestrator.process_command("Create Foo").await;

    assert!(!outcome.success);
    assert!(!orchestrator
        .directory()
        .calls()
        .contains(&Step::CreateServicePrincipal));
}

#[tokio::test]
async fn test_update_and_delete_are_not_implemented() {
    for (descriptor, message) in [
        (
            ActionDescriptor::UpdateAppRegistration(AppRegistrationSpec::default()),
            "Update app registration not implemented yet",
        ),
        (
            ActionDescriptor::DeleteAppRegistration(AppRegistrationSpec::default()),
            "Delete app registration not implemented yet",
        ),
    ] {
        let orchestrator =
            Orchestrator::new(StubDirectory::default(), StubParser::returning(descriptor));

        let outcome = orchestrator.process_command("do it").await;

        assert!(!outcome.success);
        assert_eq!(outcome.message, message);
        assert!(orchestrator.directory().calls().is_empty());
    }
}

#[tokio::test]
async fn test_unknown_action_reported_by_name() {
    let orchestrator = Orchestrator::new(
        StubDirectory::default(),
        StubParser::returning(ActionDescriptor::Unknown("rotate_secret".to_string())),
    );

    let outcome = orchestrator.process_command("rotate it").await;

    assert!(!outcome.success);
    assert_eq!(outcome.message, "Unknown action: rotate_secret");
    assert!(orchestrator.directory().calls().is_empty());
}

#[tokio::test]
async fn test_parse_failure_message() {
    let orchestrator = Orchestrator::new(StubDirectory::default(), StubParser::failing());

    let outcome = orchestrator.process_command("gibberish").await;

    assert!(!outcome.success);
    assert_eq!(outcome.message, "Failed to parse command. Please try rephrasing.");
    assert!(orchestrator.directory().calls().is_empty());
}

#[tokio::test]
async fn test_panic_becomes_failure_envelope() {
    let orchestrator = Orchestrator::new(StubDirectory::default(), StubParser::panicking());

    let outcome = orchestrator.process_command("anything").await;

    assert!(!outcome.success);
    assert_eq!(outcome.message, "Error processing command: parser exploded");
}

#[tokio::test]
async fn test_command_text_reaches_parser_unchanged() {
    let orchestrator = Orchestrator::new(
        StubDirectory::default(),
        StubParser::returning(create("Foo", &[], None)),
    );

    orchestrator
        .process_command("Create an app registration named Foo")
        .await;

    assert_eq!(
        *orchestrator.parser().seen.lock().unwrap(),
        vec!["Create an app registration named Foo".to_string()]
    );
}

#[tokio::test]
async fn test_shared_processor_handles_concurrent_commands() {
    let processor: Arc<dyn CommandProcessor> = Arc::new(Orchestrator::new(
        StubDirectory::default(),
        StubParser::returning(create("Foo", &[], None)),
    ));

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let processor = processor.clone();
            tokio::spawn(async move { processor.process_command(&format!("create {}", i)).await })
        })
        .collect();

    for handle in handles {
        assert!(handle.await.unwrap().success);
    }
}
