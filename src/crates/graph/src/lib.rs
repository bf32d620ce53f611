//! Microsoft Graph client for Entra ID application management.
//!
//! The crate owns everything between "I need an app registration" and the
//! HTTP calls that make it happen:
//!
//! - [`credential`] - client-credentials token acquisition and the cached
//!   bearer token ([`TokenCache`])
//! - [`client`] - [`GraphClient`] and the [`DirectoryOperations`] trait the
//!   agent programs against
//! - [`permissions`] - pure classification and merge of requested
//!   permissions into `requiredResourceAccess`
//! - [`models`] - the resource shapes and well-known ids
//!
//! # Example
//!
//! ```rust,ignore
//! use graph::{ClientSecretCredential, DirectoryOperations, GraphClient, TokenCache, GRAPH_SCOPE};
//! use std::sync::Arc;
//! use utils::{ClientConfig, HttpClient};
//!
//! let http = HttpClient::new(ClientConfig::default())?;
//! let credential = ClientSecretCredential::new(http.clone(), tenant_id, client_id, client_secret);
//! let client = GraphClient::new(http, TokenCache::new(Arc::new(credential), GRAPH_SCOPE));
//!
//! let app = client.create_application("Payroll Sync", Some("nightly export")).await?;
//! client
//!     .add_required_permissions(&app.object_id, &["User.Read.All".to_string()])
//!     .await?;
//! ```

pub mod client;
pub mod credential;
pub mod error;
pub mod models;
pub mod permissions;

pub use client::{DirectoryOperations, GraphClient};
pub use credential::{
    parse_token_response, AccessToken, ClientSecretCredential, TokenCache, TokenProvider,
    DEFAULT_AUTHORITY_HOST, DEFAULT_REFRESH_MARGIN_SECS,
};
pub use error::{GraphError, Result};
pub use models::{
    ApplicationRecord, ClientSecretRecord, PermissionCatalog, PermissionDefinition,
    PermissionGrantReport, PermissionKind, RequiredResourceAccess, ResolvedPermission,
    ResourceAccess, ServicePrincipalRecord, DEFAULT_REDIRECT_URI, DEFAULT_SECRET_DISPLAY_NAME,
    EXCHANGE_APP_ID, GRAPH_BASE_URL, GRAPH_SCOPE, MICROSOFT_GRAPH_APP_ID, SECRET_VALIDITY_DAYS,
    SHAREPOINT_APP_ID,
};
pub use permissions::{classify_permission, merge_permissions};
