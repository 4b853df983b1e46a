//! Authenticating client
//!
//! `InfisicalClient::initialize` walks the configured regions once, in
//! order, and returns a client bound to the first region that issues a
//! token. A failed initialization leaves nothing behind to retry: callers
//! build a new client from scratch.

use crate::credentials::Credentials;
use crate::error::ClientError;
use crate::transport::{ReqwestTransport, Transport};
use browser_core::{Region, Secret};
use serde::Deserialize;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Short-lived bearer token from universal auth
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken {
    token: String,
    pub token_type: String,
    pub expires_in_seconds: u64,
    pub max_ttl_seconds: u64,
}

impl AccessToken {
    pub fn secret(&self) -> &str {
        &self.token
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("token", &"<redacted>")
            .field("token_type", &self.token_type)
            .field("expires_in_seconds", &self.expires_in_seconds)
            .field("max_ttl_seconds", &self.max_ttl_seconds)
            .finish()
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UniversalAuthResponse {
    access_token: String,
    expires_in: u64,
    #[serde(rename = "accessTokenMaxTTL")]
    access_token_max_ttl: u64,
    token_type: String,
}

impl From<UniversalAuthResponse> for AccessToken {
    fn from(r: UniversalAuthResponse) -> Self {
        Self {
            token: r.access_token,
            token_type: r.token_type,
            expires_in_seconds: r.expires_in,
            max_ttl_seconds: r.access_token_max_ttl,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSecret {
    secret_key: String,
    secret_value: String,
    secret_path: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListSecretsResponse {
    secrets: Vec<RawSecret>,
    // Pagination markers. The endpoint is expected to return everything in
    // one response; if any of these say otherwise the call fails.
    #[serde(default)]
    next_cursor: Option<String>,
    #[serde(default)]
    has_more: Option<bool>,
    #[serde(default)]
    total_count: Option<usize>,
}

impl ListSecretsResponse {
    fn ensure_complete(&self) -> Result<(), ClientError> {
        let has_next_page = self.has_more == Some(true)
            || self.next_cursor.as_deref().is_some_and(|c| !c.is_empty());
        if has_next_page {
            return Err(ClientError::SchemaValidation(
                "secret listing is paginated; refusing to show a partial tree".to_string(),
            ));
        }

        if let Some(total) = self.total_count {
            if total > self.secrets.len() {
                return Err(ClientError::SchemaValidation(format!(
                    "secret listing returned {} of {} secrets",
                    self.secrets.len(),
                    total
                )));
            }
        }

        Ok(())
    }
}

/// A client holding a token for one region, project and environment
pub struct InfisicalClient {
    transport: Arc<dyn Transport>,
    region: Region,
    project_id: String,
    environment: String,
    token: AccessToken,
}

impl InfisicalClient {
    /// Authenticate over HTTPS using the default transport
    pub async fn connect(credentials: &Credentials, regions: &[Region]) -> Result<Self, ClientError> {
        Self::initialize(credentials, regions, Arc::new(ReqwestTransport::new())).await
    }

    /// Try each region in order, one attempt each, stopping at the first
    /// that issues a token. If every region fails the error names the last
    /// one tried.
    pub async fn initialize(
        credentials: &Credentials,
        regions: &[Region],
        transport: Arc<dyn Transport>,
    ) -> Result<Self, ClientError> {
        credentials.validate()?;

        let mut last_failure: Option<(&Region, ClientError)> = None;

        for region in regions {
            let attempt = Self::authenticate(
                transport.as_ref(),
                &credentials.client_id,
                &credentials.client_secret,
                region,
            )
            .await;

            match attempt {
                Ok(token) => {
                    info!(region = %region.name, "Authenticated");
                    return Ok(Self {
                        transport,
                        region: region.clone(),
                        project_id: credentials.project_id.clone(),
                        environment: credentials.environment.clone(),
                        token,
                    });
                }
                Err(e) => {
                    warn!(region = %region.name, error = %e, "Authentication failed");
                    last_failure = Some((region, e));
                }
            }
        }

        match last_failure {
            Some((_, err @ ClientError::Authentication { .. })) => Err(err),
            Some((region, err)) => Err(ClientError::Authentication {
                region: region.name.clone(),
                status_text: err.to_string(),
            }),
            None => Err(ClientError::NoRegions),
        }
    }

    /// Exchange a client id and secret for an access token at one region
    pub async fn authenticate(
        transport: &dyn Transport,
        client_id: &str,
        client_secret: &str,
        region: &Region,
    ) -> Result<AccessToken, ClientError> {
        let url = region.auth_url();
        debug!(region = %region.name, url = %url, "Authenticating");

        let response = transport
            .post_form(&url, &[("clientId", client_id), ("clientSecret", client_secret)])
            .await
            .map_err(|e| ClientError::Authentication {
                region: region.name.clone(),
                status_text: e.to_string(),
            })?;

        debug!(region = %region.name, status = response.status, "Auth response");

        if !response.is_success() {
            return Err(ClientError::Authentication {
                region: region.name.clone(),
                status_text: response.status_text,
            });
        }

        let parsed: UniversalAuthResponse = serde_json::from_str(&response.body)
            .map_err(|e| ClientError::SchemaValidation(format!("auth response: {}", e)))?;

        Ok(parsed.into())
    }

    /// Fetch every secret in the bound project environment, all folders
    /// included, in one request
    pub async fn list_all_secrets(&self) -> Result<Vec<Secret>, ClientError> {
        let url = self.region.secrets_url();
        let query = [
            ("workspaceId", self.project_id.as_str()),
            ("environment", self.environment.as_str()),
            ("recursive", "true"),
        ];

        let response = self
            .transport
            .get_authorized(&url, &query, self.token.secret())
            .await
            .map_err(|e| ClientError::Fetch {
                status_text: e.to_string(),
            })?;

        if !response.is_success() {
            return Err(ClientError::Fetch {
                status_text: response.status_text,
            });
        }

        let parsed: ListSecretsResponse = serde_json::from_str(&response.body)
            .map_err(|e| ClientError::SchemaValidation(format!("secret listing: {}", e)))?;
        parsed.ensure_complete()?;

        info!(
            region = %self.region.name,
            count = parsed.secrets.len(),
            "Fetched secrets"
        );

        Ok(parsed
            .secrets
            .into_iter()
            .map(|s| Secret::new(s.secret_key, s.secret_value, s.secret_path))
            .collect())
    }

    /// Region the token was issued by; secrets are fetched from it too
    pub fn region(&self) -> &Region {
        &self.region
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    pub fn token(&self) -> &AccessToken {
        &self.token
    }
}
