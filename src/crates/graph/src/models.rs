//! Graph resource shapes used by the agent.
//!
//! Only the identifiers the agent needs are modelled; the remote provider
//! owns everything else.

use serde::{Deserialize, Serialize};

/// Base URL of the Graph v1.0 endpoint.
pub const GRAPH_BASE_URL: &str = "https://graph.microsoft.com/v1.0";

/// Scope requested for app-only Graph tokens.
pub const GRAPH_SCOPE: &str = "https://graph.microsoft.com/.default";

/// Well-known application id of the Microsoft Graph resource API.
pub const MICROSOFT_GRAPH_APP_ID: &str = "00000003-0000-0000-c000-000000000000";

/// Well-known application id of SharePoint Online.
pub const SHAREPOINT_APP_ID: &str = "00000003-0000-0ff1-ce00-000000000000";

/// Well-known application id of Exchange Online.
pub const EXCHANGE_APP_ID: &str = "00000002-0000-0ff1-ce00-000000000000";

/// Redirect URI registered on every new application.
pub const DEFAULT_REDIRECT_URI: &str = "https://localhost:44321";

/// Display name given to generated client secrets.
pub const DEFAULT_SECRET_DISPLAY_NAME: &str = "Default Secret";

/// Lifetime of generated client secrets, in days.
pub const SECRET_VALIDITY_DAYS: i64 = 365;

/// Identity of a created application registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationRecord {
    /// Directory object id, used in `/applications/{id}` paths.
    #[serde(rename = "id")]
    pub object_id: String,

    /// Client id (`appId`).
    #[serde(rename = "appId")]
    pub application_id: String,
}

/// A freshly created client secret.
///
/// `secret_value` is only ever returned by Graph at creation time. `Debug`
/// never prints it. The identifier is read from `keyId`, falling back to
/// `id`; a payload carrying both is accepted.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "PasswordCredential")]
pub struct ClientSecretRecord {
    pub secret_id: Option<String>,
    pub secret_value: String,
    pub end_date_time: Option<String>,
}

/// `passwordCredential` as returned by `addPassword`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PasswordCredential {
    #[serde(default)]
    key_id: Option<String>,
    #[serde(default)]
    id: Option<String>,
    secret_text: String,
    #[serde(default)]
    end_date_time: Option<String>,
}

impl From<PasswordCredential> for ClientSecretRecord {
    fn from(wire: PasswordCredential) -> Self {
        Self {
            secret_id: wire.key_id.or(wire.id),
            secret_value: wire.secret_text,
            end_date_time: wire.end_date_time,
        }
    }
}

impl std::fmt::Debug for ClientSecretRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientSecretRecord")
            .field("secret_id", &self.secret_id)
            .field("secret_value", &"<redacted>")
            .field("end_date_time", &self.end_date_time)
            .finish()
    }
}

/// A service principal created for an application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServicePrincipalRecord {
    #[serde(rename = "id")]
    pub service_principal_id: String,
}

/// Application permission (`Role`) or delegated permission (`Scope`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PermissionKind {
    Role,
    Scope,
}

/// One permission entry inside a `requiredResourceAccess` item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceAccess {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: PermissionKind,
}

/// Permissions an application declares on one resource API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequiredResourceAccess {
    pub resource_app_id: String,
    #[serde(default)]
    pub resource_access: Vec<ResourceAccess>,
}

impl RequiredResourceAccess {
    pub fn new(resource_app_id: impl Into<String>) -> Self {
        Self {
            resource_app_id: resource_app_id.into(),
            resource_access: Vec::new(),
        }
    }

    /// Whether an entry with this permission id is already declared.
    pub fn contains(&self, permission_id: &str) -> bool {
        self.resource_access.iter().any(|ra| ra.id == permission_id)
    }
}

/// The `requiredResourceAccess` projection of an application.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ApplicationAccess {
    #[serde(default)]
    pub required_resource_access: Vec<RequiredResourceAccess>,
}

/// A named permission published by a resource API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionDefinition {
    pub id: String,
    #[serde(default)]
    pub value: Option<String>,
}

/// Application roles and delegated scopes a resource API publishes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionCatalog {
    #[serde(default)]
    pub app_roles: Vec<PermissionDefinition>,
    #[serde(default)]
    pub oauth2_permission_scopes: Vec<PermissionDefinition>,
}

impl PermissionCatalog {
    /// Id of the permission named `name` in the catalog matching `kind`.
    pub fn find(&self, name: &str, kind: PermissionKind) -> Option<&str> {
        let definitions = match kind {
            PermissionKind::Role => &self.app_roles,
            PermissionKind::Scope => &self.oauth2_permission_scopes,
        };
        definitions
            .iter()
            .find(|d| d.value.as_deref() == Some(name))
            .map(|d| d.id.as_str())
    }
}

/// A permission that was resolved against the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedPermission {
    pub name: String,
    pub id: String,
    pub kind: PermissionKind,
}

/// Outcome of merging requested permissions into an application.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PermissionGrantReport {
    /// Newly added entries.
    pub added: Vec<ResolvedPermission>,
    /// Resolved but already declared.
    pub already_present: Vec<String>,
    /// Not found in the catalog.
    pub skipped: Vec<String>,
}

impl PermissionGrantReport {
    /// Whether the merge changed the declared permissions.
    pub fn changed(&self) -> bool {
        !self.added.is_empty()
    }
}

/// `GET` collection envelope.
#[derive(Debug, Deserialize)]
pub(crate) struct Collection<T> {
    #[serde(default = "Vec::new")]
    pub value: Vec<T>,
}
