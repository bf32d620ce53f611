//! Microsoft Graph client for application registrations.
//!
//! # Example
//!
//! ```rust,ignore
//! use graph::{ClientSecretCredential, GraphClient, TokenCache, GRAPH_SCOPE};
//!
//! let http = HttpClient::new(ClientConfig::default())?;
//! let credential = ClientSecretCredential::new(http.clone(), tenant, client_id, secret);
//! let tokens = TokenCache::new(Arc::new(credential), GRAPH_SCOPE);
//! let client = GraphClient::new(http, tokens);
//!
//! let app = client.create_application("Payroll Sync", None).await?;
//! ```

use crate::credential::TokenCache;
use crate::error::{GraphError, Result};
use crate::models::{
    ApplicationAccess, ApplicationRecord, ClientSecretRecord, Collection, PermissionCatalog,
    PermissionGrantReport, ServicePrincipalRecord, DEFAULT_REDIRECT_URI, GRAPH_BASE_URL,
    MICROSOFT_GRAPH_APP_ID,
};
use crate::permissions::merge_permissions;
use async_trait::async_trait;
use chrono::{Duration, SecondsFormat, Utc};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::{debug, info, warn};
use utils::{AuthHelper, HttpClient};

/// The directory operations the orchestrator drives.
///
/// [`GraphClient`] is the production implementation.
#[async_trait]
pub trait DirectoryOperations: Send + Sync {
    /// Register a single-tenant application.
    async fn create_application(
        &self,
        display_name: &str,
        description: Option<&str>,
    ) -> Result<ApplicationRecord>;

    /// Add a password credential valid for `valid_for`.
    async fn create_client_secret(
        &self,
        object_id: &str,
        display_name: &str,
        valid_for: Duration,
    ) -> Result<ClientSecretRecord>;

    /// Merge Microsoft Graph permissions into the application's declarations.
    async fn add_required_permissions(
        &self,
        object_id: &str,
        permissions: &[String],
    ) -> Result<PermissionGrantReport>;

    /// Create the service principal for an application id.
    async fn create_service_principal(&self, app_id: &str) -> Result<ServicePrincipalRecord>;

    /// Record tenant-wide consent for each permission id, stopping at the
    /// first failure.
    async fn grant_admin_consent(
        &self,
        service_principal_id: &str,
        permission_ids: &[String],
    ) -> Result<()>;
}

/// Authenticated Microsoft Graph client.
pub struct GraphClient {
    http: HttpClient,
    tokens: TokenCache,
    base_url: String,
}

impl GraphClient {
    pub fn new(http: HttpClient, tokens: TokenCache) -> Self {
        Self {
            http,
            tokens,
            base_url: GRAPH_BASE_URL.to_string(),
        }
    }

    /// Override the Graph base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send one authenticated call and decode the JSON reply.
    ///
    /// `204 No Content` yields an empty object.
    async fn call(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        query: &[(&str, &str)],
    ) -> Result<Value> {
        let token = self.tokens.token().await?;
        let url = format!("{}{}", self.base_url, path);

        let mut req = self
            .http
            .request(method.clone(), &url)
            .header("Authorization", AuthHelper::bearer_token(&token))
            .header("Content-Type", "application/json");
        if !query.is_empty() {
            req = req.query(query);
        }
        if let Some(body) = body {
            req = req.json(body);
        }

        debug!(method = %method, path, "Graph request");
        let response = self.http.send(req).await?;
        let status = response.status();

        if status == StatusCode::NO_CONTENT {
            return Ok(json!({}));
        }

        let text = response.text().await?;
        if !status.is_success() {
            warn!(method = %method, path, status = status.as_u16(), "Graph request failed");
            return Err(GraphError::Api {
                status: status.as_u16(),
                body: text,
            });
        }

        if text.trim().is_empty() {
            return Ok(json!({}));
        }
        Ok(serde_json::from_str(&text)?)
    }

    async fn call_as<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        query: &[(&str, &str)],
    ) -> Result<T> {
        let value = self.call(method, path, body, query).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Roles and scopes published by the Microsoft Graph service principal.
    pub async fn graph_permission_catalog(&self) -> Result<PermissionCatalog> {
        let filter = format!("appId eq '{}'", MICROSOFT_GRAPH_APP_ID);
        let collection: Collection<PermissionCatalog> = self
            .call_as(
                Method::GET,
                "/servicePrincipals",
                None,
                &[
                    ("$filter", filter.as_str()),
                    ("$select", "appRoles,oauth2PermissionScopes"),
                ],
            )
            .await?;

        collection.value.into_iter().next().ok_or_else(|| {
            GraphError::InvalidResponse(
                "Microsoft Graph service principal not found in tenant".to_string(),
            )
        })
    }
}

impl std::fmt::Debug for GraphClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphClient")
            .field("base_url", &self.base_url)
            .field("tokens", &self.tokens)
            .finish()
    }
}

#[async_trait]
impl DirectoryOperations for GraphClient {
    async fn create_application(
        &self,
        display_name: &str,
        description: Option<&str>,
    ) -> Result<ApplicationRecord> {
        let mut body = json!({
            "displayName": display_name,
            "signInAudience": "AzureADMyOrg",
            "web": {
                "redirectUris": [DEFAULT_REDIRECT_URI],
                "implicitGrantSettings": {
                    "enableIdTokenIssuance": true
                }
            }
        });
        if let Some(notes) = description.filter(|d| !d.is_empty()) {
            body["notes"] = Value::String(notes.to_string());
        }

        let app: ApplicationRecord = self
            .call_as(Method::POST, "/applications", Some(&body), &[])
            .await?;
        info!(
            object_id = %app.object_id,
            app_id = %app.application_id,
            "Application registered"
        );
        Ok(app)
    }

    async fn create_client_secret(
        &self,
        object_id: &str,
        display_name: &str,
        valid_for: Duration,
    ) -> Result<ClientSecretRecord> {
        let end = (Utc::now() + valid_for).to_rfc3339_opts(SecondsFormat::Secs, true);
        let body = json!({
            "passwordCredential": {
                "displayName": display_name,
                "endDateTime": end,
            }
        });

        let secret: ClientSecretRecord = self
            .call_as(
                Method::POST,
                &format!("/applications/{}/addPassword", object_id),
                Some(&body),
                &[],
            )
            .await?;
        info!(object_id, secret_id = ?secret.secret_id, "Client secret created");
        Ok(secret)
    }

    async fn add_required_permissions(
        &self,
        object_id: &str,
        permissions: &[String],
    ) -> Result<PermissionGrantReport> {
        if permissions.is_empty() {
            return Ok(PermissionGrantReport::default());
        }

        let path = format!("/applications/{}", object_id);
        let current: ApplicationAccess = self
            .call_as(
                Method::GET,
                &path,
                None,
                &[("$select", "requiredResourceAccess")],
            )
            .await?;
        let catalog = self.graph_permission_catalog().await?;

        let mut declared = current.required_resource_access;
        let report = merge_permissions(&mut declared, MICROSOFT_GRAPH_APP_ID, &catalog, permissions);
        for name in &report.skipped {
            warn!(permission = %name, "Permission not found in Microsoft Graph catalog, skipping");
        }

        let body = json!({ "requiredResourceAccess": declared });
        self.call(Method::PATCH, &path, Some(&body), &[]).await?;

        info!(
            object_id,
            added = report.added.len(),
            already_present = report.already_present.len(),
            skipped = report.skipped.len(),
            "Required permissions updated"
        );
        Ok(report)
    }

    async fn create_service_principal(&self, app_id: &str) -> Result<ServicePrincipalRecord> {
        let body = json!({ "appId": app_id });
        let sp: ServicePrincipalRecord = self
            .call_as(Method::POST, "/servicePrincipals", Some(&body), &[])
            .await?;
        info!(app_id, service_principal_id = %sp.service_principal_id, "Service principal created");
        Ok(sp)
    }

    async fn grant_admin_consent(
        &self,
        service_principal_id: &str,
        permission_ids: &[String],
    ) -> Result<()> {
        for permission_id in permission_ids {
            let body = json!({
                "clientId": service_principal_id,
                "consentType": "AllPrincipals",
                "resourceId": permission_id,
                "scope": permission_id,
            });
            if let Err(err) = self
                .call(Method::POST, "/oauth2PermissionGrants", Some(&body), &[])
                .await
            {
                warn!(service_principal_id, %permission_id, error = %err, "Admin consent grant failed");
                return Err(err);
            }
        }
        info!(
            service_principal_id,
            grants = permission_ids.len(),
            "Admin consent granted"
        );
        Ok(())
    }
}
