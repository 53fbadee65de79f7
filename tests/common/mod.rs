//! Shared fixtures for integration tests
//!
//! The client is blocking, so every test drives it from `spawn_blocking` while the
//! wiremock server runs on the async runtime. Clients must also be dropped there.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use rmi_client::{ClientOptions, Environment, EnvironmentName};
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const REALM_PATH: &str = "/realms/rmi";
pub const TOKEN_PATH: &str = "/realms/rmi/protocol/openid-connect/token";

/// Temporary home directory holding a credentials file
pub struct CredentialsFixture {
    pub dir: TempDir,
    pub path: PathBuf,
}

impl CredentialsFixture {
    pub fn yaml_for(issuer: &str) -> Self {
        Self::with_content(&format!(
            "oauth2:\n  issuer: {}\n  client_id: rmi-cli\n  client_secret: s3cret\n",
            issuer
        ))
    }

    pub fn with_content(content: &str) -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("idcarioca_staging.yaml");
        fs::write(&path, content).expect("write credentials");
        Self { dir, path }
    }

    pub fn missing() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("idcarioca_staging.yaml");
        Self { dir, path }
    }
}

pub fn issuer(server: &MockServer) -> String {
    format!("{}{}", server.uri(), REALM_PATH)
}

pub fn environment(credentials: &Path, base_url: &str, requires_auth: bool) -> Environment {
    Environment::new(EnvironmentName::Staging, credentials, base_url, requires_auth)
}

pub fn options() -> ClientOptions {
    ClientOptions::default().with_timeout(Duration::from_secs(5))
}

/// Token endpoint answering with `abc123`
pub async fn mount_token_endpoint(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "abc123",
            "token_type": "Bearer",
            "expires_in": 300
        })))
        .mount(server)
        .await;
}

pub async fn run_blocking<F, T>(f: F) -> T
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f).await.expect("blocking task panicked")
}
