//! Login, explicit refresh and logout.
//!
//! Token endpoints are called without the request pipeline: they must not
//! carry a bearer token and a 401 from them must never trigger a refresh.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use super::{CredentialStore, Navigator, ENTRY_PATH};
use crate::api::transport::join_url;
use crate::api::{ApiError, Envelope, RefreshedTokens, TokenRefresher};

const TOKEN_PATH: &str = "auth/token/";
const TOKEN_REFRESH_PATH: &str = "auth/token/refresh/";

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct RefreshRequest<'a> {
    refresh: &'a str,
}

/// Token issue response, with the identity fields the server adds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginData {
    pub access: String,
    pub refresh: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    access: String,
    #[serde(default)]
    refresh: Option<String>,
}

/// Unauthenticated client for the token endpoints.
#[derive(Clone)]
pub struct TokenEndpoint {
    client: Client,
    base_url: Url,
}

impl TokenEndpoint {
    pub fn new(client: Client, base_url: Url) -> Self {
        Self { client, base_url }
    }

    async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = join_url(&self.base_url, path)?;
        let response = self.client.post(url).json(body).send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            debug!(path, status = status.as_u16(), "Token endpoint rejected request");
            // Keep the server's error body so it can reach the caller.
            return Err(match serde_json::from_str::<Value>(&text) {
                Ok(errors) => ApiError::Rejected {
                    message: format!("Status {}", status),
                    errors: Some(errors),
                },
                Err(_) => ApiError::from_status(status, &text),
            });
        }

        serde_json::from_str(&text).map_err(|e| {
            ApiError::InvalidResponse(format!("Failed to parse response from {}: {}", path, e))
        })
    }

    pub async fn obtain(&self, email: &str, password: &str) -> Result<LoginData, ApiError> {
        self.post(TOKEN_PATH, &LoginRequest { email, password })
            .await
    }
}

#[async_trait]
impl TokenRefresher for TokenEndpoint {
    async fn refresh(&self, refresh_token: &str) -> Result<RefreshedTokens, ApiError> {
        let response: RefreshResponse = self
            .post(
                TOKEN_REFRESH_PATH,
                &RefreshRequest {
                    refresh: refresh_token,
                },
            )
            .await?;
        Ok(RefreshedTokens {
            access: response.access,
            refresh: response.refresh,
        })
    }
}

/// Session entry points for the front end.
pub struct AuthService {
    endpoint: TokenEndpoint,
    store: Arc<CredentialStore>,
    navigator: Arc<dyn Navigator>,
}

impl AuthService {
    pub fn new(
        endpoint: TokenEndpoint,
        store: Arc<CredentialStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            endpoint,
            store,
            navigator,
        }
    }

    /// Exchange email and password for a session.
    ///
    /// Identity is cached only when the server returns both name and role.
    pub async fn login(&self, email: &str, password: &str) -> Envelope<LoginData> {
        match self.endpoint.obtain(email, password).await {
            Ok(data) => {
                self.store.set_tokens(&data.access, &data.refresh);
                if let (Some(name), Some(role)) = (&data.name, &data.role) {
                    self.store.set_user_info(name, role);
                }
                info!(role = data.role.as_deref().unwrap_or("-"), "Logged in");
                Envelope::ok(data)
            }
            Err(e) => {
                warn!(error = %e, "Login failed");
                Envelope::from_error(&e)
            }
        }
    }

    /// Renew the access token now. Any failure ends the session.
    pub async fn refresh_token(&self) -> Envelope<TokenPair> {
        let result = match self.store.refresh_token() {
            None => Err(ApiError::MissingRefreshToken),
            Some(current) => self
                .endpoint
                .refresh(&current)
                .await
                .map(|tokens| TokenPair {
                    access: tokens.access,
                    refresh: tokens.refresh.unwrap_or(current),
                }),
        };

        match result {
            Ok(pair) => {
                self.store.set_tokens(&pair.access, &pair.refresh);
                debug!("Access token refreshed on request");
                Envelope::ok(pair)
            }
            Err(e) => {
                warn!(error = %e, "Explicit token refresh failed");
                self.store.clear();
                Envelope::from_error(&e)
            }
        }
    }

    pub fn logout(&self) {
        self.store.clear();
        info!("Logged out");
        self.navigator.navigate(ENTRY_PATH);
    }

    pub fn is_authenticated(&self) -> bool {
        self.store.access_token().is_some()
    }

    pub fn user_name(&self) -> Option<String> {
        self.store.user_name()
    }

    pub fn user_role(&self) -> Option<String> {
        self.store.user_role()
    }

    pub fn store(&self) -> &Arc<CredentialStore> {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::LogNavigator;

    #[test]
    fn test_login_data_optional_identity() {
        let data: LoginData =
            serde_json::from_str(r#"{"access": "A1", "refresh": "R1"}"#).unwrap();
        assert_eq!(data.name, None);
        assert_eq!(data.role, None);

        let data: LoginData = serde_json::from_str(
            r#"{"access": "A1", "refresh": "R1", "name": "Ada", "role": "admin", "email": "ada@example.com"}"#,
        )
        .unwrap();
        assert_eq!(data.name.as_deref(), Some("Ada"));
        assert_eq!(data.email.as_deref(), Some("ada@example.com"));
    }

    #[tokio::test]
    async fn test_refresh_without_token_fails_and_clears() {
        let store = Arc::new(CredentialStore::in_memory());
        store.set_user_info("Ada", "admin");
        let endpoint = TokenEndpoint::new(
            Client::new(),
            Url::parse("http://127.0.0.1:9/api/v1/").unwrap(),
        );
        let service = AuthService::new(endpoint, store.clone(), Arc::new(LogNavigator));

        let env = service.refresh_token().await;
        assert!(!env.success);
        assert_eq!(env.failure_text(), "No refresh token available");
        assert_eq!(store.user_name(), None);
        assert!(!service.is_authenticated());
    }
}
