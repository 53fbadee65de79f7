//! OAuth2 client-credentials token acquisition against a Keycloak-style issuer

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use log::{debug, error, info};
use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde_json::Value;

use super::credentials::{self, OAuthCredentials};
use crate::api::DEFAULT_TIMEOUT;
use crate::config::Environment;
use crate::error::{ClientError, Result};

/// Path appended to the issuer URL
pub const TOKEN_ENDPOINT_PATH: &str = "/protocol/openid-connect/token";

/// Scopes requested with every grant
pub const TOKEN_SCOPE: &str = "profile email";

pub const DEFAULT_TOKEN_TYPE: &str = "Bearer";

/// Token issued to one client instance. Never refreshed.
#[derive(Clone)]
pub struct AccessToken {
    pub value: String,
    pub token_type: String,
    /// Advisory lifetime in seconds, as reported by the issuer
    pub expires_in: Option<u64>,
    pub obtained_at: DateTime<Utc>,
}

impl AccessToken {
    /// Leading characters of the token for operator display
    pub fn preview(&self, len: usize) -> String {
        self.value.chars().take(len).collect()
    }

    /// When the issuer says the token lapses. Nothing in this crate enforces it.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        let secs = i64::try_from(self.expires_in?).ok()?;
        self.obtained_at
            .checked_add_signed(chrono::Duration::try_seconds(secs)?)
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("value", &"<redacted>")
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .field("obtained_at", &self.obtained_at)
            .finish()
    }
}

/// Token endpoint for an issuer
pub fn token_url(issuer: &str) -> String {
    format!("{}{}", issuer.strip_suffix('/').unwrap_or(issuer), TOKEN_ENDPOINT_PATH)
}

/// Performs client-credentials grants over a blocking HTTP client
pub struct TokenClient {
    http: Client,
}

impl TokenClient {
    pub fn new(timeout: Duration) -> Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self { http })
    }

    /// Token for `environment`, or `None` when it is configured without auth
    pub fn acquire(&self, environment: &Environment) -> Result<Option<AccessToken>> {
        if !environment.requires_auth {
            info!("{} does not require authentication, skipping token request", environment.name);
            return Ok(None);
        }

        let credentials = credentials::load(environment)?;
        self.request_token(&credentials).map(Some)
    }

    /// One client-credentials grant. No retry.
    pub fn request_token(&self, credentials: &OAuthCredentials) -> Result<AccessToken> {
        let url = token_url(&credentials.issuer);

        info!("Fetching access token from {}", credentials.issuer);
        debug!("Token URL: {}, Client ID: {}", url, credentials.client_id);

        let response = self
            .http
            .post(&url)
            .form(&[
                ("client_id", credentials.client_id.as_str()),
                ("client_secret", credentials.client_secret.as_str()),
                ("grant_type", "client_credentials"),
                ("scope", TOKEN_SCOPE),
            ])
            .send()?;

        let status = response.status();
        debug!("Token request status: {}", status);

        let body = response.text()?;

        if status != StatusCode::OK {
            error!("Failed to obtain access token: {}", status);
            debug!("Token endpoint response: {}", body);
            return Err(ClientError::AuthenticationFailed {
                status: status.as_u16(),
                body,
            });
        }

        let token = parse_token_response(&body)?;

        info!(
            "Access token obtained (type: {}, expires in: {})",
            token.token_type,
            token
                .expires_in
                .map(|secs| format!("{}s", secs))
                .unwrap_or_else(|| "unknown".to_string())
        );

        Ok(token)
    }
}

/// Acquire a token for `environment` with the default timeout
pub fn acquire(environment: &Environment) -> Result<Option<AccessToken>> {
    TokenClient::new(DEFAULT_TIMEOUT)?.acquire(environment)
}

fn parse_token_response(body: &str) -> Result<AccessToken> {
    let malformed = |message: String| ClientError::MalformedTokenResponse {
        message,
        body: body.to_string(),
    };

    let data: Value = serde_json::from_str(body)
        .map_err(|e| malformed(format!("response is not valid JSON: {}", e)))?;

    let value = data
        .get("access_token")
        .and_then(Value::as_str)
        .ok_or_else(|| malformed("no access token in response".to_string()))?;

    let token_type = data
        .get("token_type")
        .and_then(Value::as_str)
        .unwrap_or(DEFAULT_TOKEN_TYPE);

    Ok(AccessToken {
        value: value.to_string(),
        token_type: token_type.to_string(),
        expires_in: data.get("expires_in").and_then(Value::as_u64),
        obtained_at: Utc::now(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_token_url_appends_endpoint() {
        assert_eq!(
            token_url("https://auth.example.com/realms/rmi"),
            "https://auth.example.com/realms/rmi/protocol/openid-connect/token"
        );
        assert_eq!(
            token_url("https://auth.example.com/realms/rmi/"),
            "https://auth.example.com/realms/rmi/protocol/openid-connect/token"
        );
    }

    #[test]
    fn test_parse_defaults_token_type() {
        let token = parse_token_response(r#"{"access_token":"abc123","expires_in":300}"#).unwrap();

        assert_eq!(token.value, "abc123");
        assert_eq!(token.token_type, "Bearer");
        assert_eq!(token.expires_in, Some(300));
    }

    #[test]
    fn test_parse_keeps_reported_token_type() {
        let token = parse_token_response(r#"{"access_token":"abc","token_type":"DPoP"}"#).unwrap();

        assert_eq!(token.token_type, "DPoP");
        assert_eq!(token.expires_in, None);
        assert!(token.expires_at().is_none());
    }

    #[test]
    fn test_parse_rejects_missing_access_token() {
        let err = parse_token_response(r#"{"token_type":"Bearer","expires_in":300}"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedTokenResponse);
    }

    #[test]
    fn test_parse_rejects_non_json_body() {
        let err = parse_token_response("<html>gateway</html>").unwrap_err();

        match err {
            ClientError::MalformedTokenResponse { body, .. } => {
                assert_eq!(body, "<html>gateway</html>");
            }
            other => panic!("expected MalformedTokenResponse, got {:?}", other),
        }
    }

    #[test]
    fn test_expiry_is_advisory_offset() {
        let token = parse_token_response(r#"{"access_token":"abc","expires_in":60}"#).unwrap();

        let expires_at = token.expires_at().unwrap();
        assert_eq!((expires_at - token.obtained_at).num_seconds(), 60);
    }

    #[test]
    fn test_debug_and_preview() {
        let token = parse_token_response(r#"{"access_token":"abcdefghijkl"}"#).unwrap();

        assert_eq!(token.preview(4), "abcd");
        assert_eq!(token.preview(100), "abcdefghijkl");
        assert!(!format!("{:?}", token).contains("abcdefghijkl"));
    }

    #[test]
    fn test_unauthenticated_environment_yields_no_token() {
        let env = Environment::new(
            crate::config::EnvironmentName::Local,
            "/nonexistent/creds.yaml",
            "http://localhost:8080",
            false,
        );

        let client = TokenClient::new(Duration::from_secs(1)).unwrap();
        assert!(client.acquire(&env).unwrap().is_none());
    }

    #[test]
    fn test_acquire_skips_credentials_when_auth_not_required() {
        let env = Environment::new(
            crate::config::EnvironmentName::Prod,
            "/nonexistent/idcarioca_prod.yaml",
            "https://services.pref.rio/rmi",
            false,
        );

        assert!(acquire(&env).unwrap().is_none());
    }
}
