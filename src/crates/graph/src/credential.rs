//! App-only credentials and the access-token cache.
//!
//! [`TokenCache`] hands out the cached bearer token until it is within
//! [`DEFAULT_REFRESH_MARGIN_SECS`] of expiry, then asks its
//! [`TokenProvider`] for a new one.

use crate::error::{GraphError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use reqwest::Method;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};
use utils::HttpClient;

/// Default Microsoft identity platform authority.
pub const DEFAULT_AUTHORITY_HOST: &str = "https://login.microsoftonline.com";

/// Tokens are refreshed this long before they expire.
pub const DEFAULT_REFRESH_MARGIN_SECS: i64 = 300;

/// A bearer token and its absolute expiry.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken {
    pub token: String,
    pub expires_on: DateTime<Utc>,
}

impl AccessToken {
    pub fn new(token: impl Into<String>, expires_on: DateTime<Utc>) -> Self {
        Self {
            token: token.into(),
            expires_on,
        }
    }

    /// Whether the token is still usable at `now` with `margin` to spare.
    pub fn is_fresh_at(&self, now: DateTime<Utc>, margin: Duration) -> bool {
        now + margin < self.expires_on
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("token", &"<redacted>")
            .field("expires_on", &self.expires_on)
            .finish()
    }
}

/// Source of access tokens for a scope.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn fetch_token(&self, scope: &str) -> Result<AccessToken>;
}

/// OAuth2 client-credentials grant against the Microsoft identity platform.
#[derive(Clone)]
pub struct ClientSecretCredential {
    tenant_id: String,
    client_id: String,
    client_secret: String,
    authority_host: String,
    http: HttpClient,
}

impl ClientSecretCredential {
    pub fn new(
        http: HttpClient,
        tenant_id: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            authority_host: DEFAULT_AUTHORITY_HOST.to_string(),
            http,
        }
    }

    /// Point the credential at a different authority (sovereign clouds, tests).
    pub fn with_authority_host(mut self, authority_host: impl Into<String>) -> Self {
        self.authority_host = authority_host.into().trim_end_matches('/').to_string();
        self
    }

    /// Token endpoint URL for the configured tenant.
    pub fn token_url(&self) -> String {
        format!(
            "{}/{}/oauth2/v2.0/token",
            self.authority_host, self.tenant_id
        )
    }
}

impl std::fmt::Debug for ClientSecretCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientSecretCredential")
            .field("tenant_id", &self.tenant_id)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("authority_host", &self.authority_host)
            .finish()
    }
}

#[async_trait]
impl TokenProvider for ClientSecretCredential {
    async fn fetch_token(&self, scope: &str) -> Result<AccessToken> {
        let form = [
            ("grant_type", "client_credentials"),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("scope", scope),
        ];

        let response = self
            .http
            .send(self.http.request(Method::POST, &self.token_url()).form(&form))
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(GraphError::Auth(format!(
                "token endpoint returned {}: {}",
                status.as_u16(),
                body
            )));
        }

        let payload: Value = serde_json::from_str(&body)
            .map_err(|e| GraphError::Auth(format!("malformed token response: {}", e)))?;
        parse_token_response(&payload, Utc::now())
    }
}

/// Build an [`AccessToken`] from a token-endpoint payload received at `now`.
///
/// `expires_in` is accepted as a number or a numeric string.
pub fn parse_token_response(payload: &Value, now: DateTime<Utc>) -> Result<AccessToken> {
    let token = payload
        .get("access_token")
        .and_then(Value::as_str)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| GraphError::Auth("token response has no access_token".to_string()))?;

    let expires_in = match payload.get("expires_in") {
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
    .ok_or_else(|| GraphError::Auth("token response has no usable expires_in".to_string()))?;

    Ok(AccessToken::new(token, now + Duration::seconds(expires_in)))
}

/// Caches one access token for a scope and refreshes it near expiry.
///
/// Concurrent callers that miss the cache may each fetch a token; the last
/// writer wins and every fetched token is valid.
pub struct TokenCache {
    provider: Arc<dyn TokenProvider>,
    scope: String,
    refresh_margin: Duration,
    cached: RwLock<Option<AccessToken>>,
}

impl TokenCache {
    pub fn new(provider: Arc<dyn TokenProvider>, scope: impl Into<String>) -> Self {
        Self {
            provider,
            scope: scope.into(),
            refresh_margin: Duration::seconds(DEFAULT_REFRESH_MARGIN_SECS),
            cached: RwLock::new(None),
        }
    }

    pub fn with_refresh_margin(mut self, margin: Duration) -> Self {
        self.refresh_margin = margin;
        self
    }

    /// Current bearer token, fetching a new one when needed.
    pub async fn token(&self) -> Result<String> {
        self.token_at(Utc::now()).await
    }

    /// Same as [`token`](Self::token) with an explicit clock reading.
    pub async fn token_at(&self, now: DateTime<Utc>) -> Result<String> {
        {
            let guard = self.cached.read();
            if let Some(cached) = guard.as_ref() {
                if cached.is_fresh_at(now, self.refresh_margin) {
                    return Ok(cached.token.clone());
                }
            }
        }

        debug!(scope = %self.scope, "Acquiring access token");
        let fresh = self.provider.fetch_token(&self.scope).await?;
        info!(expires_on = %fresh.expires_on, "Access token refreshed");

        let token = fresh.token.clone();
        *self.cached.write() = Some(fresh);
        Ok(token)
    }

    /// Drop the cached token so the next call fetches a new one.
    pub fn invalidate(&self) {
        *self.cached.write() = None;
    }

    /// Expiry of the cached token, if any.
    pub fn expires_on(&self) -> Option<DateTime<Utc>> {
        self.cached.read().as_ref().map(|t| t.expires_on)
    }
}

impl std::fmt::Debug for TokenCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCache")
            .field("scope", &self.scope)
            .field("refresh_margin", &self.refresh_margin)
            .field("expires_on", &self.expires_on())
            .finish()
    }
}
