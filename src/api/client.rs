use std::time::Duration;

use log::{info, warn};
use reqwest::Method;
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use serde_json::Value;

use super::constants::{self, DEFAULT_TIMEOUT, headers};
use crate::auth::{AccessToken, TokenClient};
use crate::config::{Environment, EnvironmentRegistry};
use crate::error::{ClientError, Result};

/// Transport settings shared by the token request and every API call
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            user_agent: constants::user_agent(),
        }
    }
}

impl ClientOptions {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Payload for POST and PUT. When both are set the JSON payload is sent.
#[derive(Debug, Clone, Default)]
pub struct RequestBody {
    pub form: Option<Vec<(String, String)>>,
    pub json: Option<Value>,
}

impl RequestBody {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn json(value: Value) -> Self {
        Self::empty().with_json(value)
    }

    pub fn form<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self::empty().with_form(pairs)
    }

    pub fn with_json(mut self, value: Value) -> Self {
        self.json = Some(value);
        self
    }

    pub fn with_form<K, V>(mut self, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.form = Some(pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.form.is_none() && self.json.is_none()
    }
}

/// HTTP client bound to one environment and, when required, one access token.
///
/// Construction resolves the environment and acquires the token; both are fixed
/// for the lifetime of the instance. Requests return the raw response whatever
/// its status. Build a new client when the token stops being accepted.
pub struct ApiClient {
    environment: Environment,
    token: Option<AccessToken>,
    default_headers: HeaderMap,
    http: Client,
}

impl ApiClient {
    /// Client for `name` using the built-in registry and default options
    pub fn new(name: &str) -> Result<Self> {
        let environment = EnvironmentRegistry::resolve_builtin(name)?;
        Self::from_environment(environment, ClientOptions::default())
    }

    pub fn with_registry(
        registry: &EnvironmentRegistry,
        name: &str,
        options: ClientOptions,
    ) -> Result<Self> {
        let environment = registry.resolve(name)?.clone();
        Self::from_environment(environment, options)
    }

    pub fn from_environment(environment: Environment, options: ClientOptions) -> Result<Self> {
        info!(
            "Creating API client for {} ({})",
            environment.name, environment.base_url
        );

        let token = TokenClient::new(options.timeout)?.acquire(&environment)?;
        let default_headers = default_headers(token.as_ref())?;

        let http = Client::builder()
            .timeout(options.timeout)
            .user_agent(options.user_agent.as_str())
            .build()?;

        Ok(Self {
            environment,
            token,
            default_headers,
            http,
        })
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    pub fn base_url(&self) -> &str {
        &self.environment.base_url
    }

    pub fn access_token(&self) -> Option<&AccessToken> {
        self.token.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn default_headers(&self) -> &HeaderMap {
        &self.default_headers
    }

    /// Base URL and path joined verbatim
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.environment.base_url, path)
    }

    pub fn get(
        &self,
        path: &str,
        query: &[(&str, &str)],
        extra_headers: &[(&str, &str)],
    ) -> Result<Response> {
        self.send(Method::GET, path, query, None, extra_headers)
    }

    pub fn post(
        &self,
        path: &str,
        body: &RequestBody,
        extra_headers: &[(&str, &str)],
    ) -> Result<Response> {
        self.send(Method::POST, path, &[], Some(body), extra_headers)
    }

    pub fn put(
        &self,
        path: &str,
        body: &RequestBody,
        extra_headers: &[(&str, &str)],
    ) -> Result<Response> {
        self.send(Method::PUT, path, &[], Some(body), extra_headers)
    }

    pub fn delete(&self, path: &str, extra_headers: &[(&str, &str)]) -> Result<Response> {
        self.send(Method::DELETE, path, &[], None, extra_headers)
    }

    fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&RequestBody>,
        extra_headers: &[(&str, &str)],
    ) -> Result<Response> {
        let url = self.url_for(path);
        let extra = header_map(extra_headers)?;

        info!("{} {}", method, url);
        if !query.is_empty() {
            info!("   Query params: {:?}", query);
        }

        let mut request_headers = self.default_headers.clone();
        let mut request = self.http.request(method, &url);

        if !query.is_empty() {
            request = request.query(query);
        }

        if let Some(body) = body {
            request = attach_body(request, body);
        }

        // Applied last so the defaults win over whatever the body setters add,
        // and the caller wins over the defaults
        for (name, value) in extra.iter() {
            request_headers.insert(name.clone(), value.clone());
        }
        request = request.headers(request_headers);

        let response = request.send()?;
        let status = response.status();

        if status.is_client_error() || status.is_server_error() {
            warn!("   Status: {}", status);
        } else {
            info!("   Status: {}", status);
        }

        Ok(response)
    }
}

/// JSON takes precedence over form data when both are set
fn attach_body(request: RequestBuilder, body: &RequestBody) -> RequestBuilder {
    match (&body.json, &body.form) {
        (Some(json), _) => {
            info!(
                "   JSON data: {}",
                serde_json::to_string_pretty(json).unwrap_or_else(|_| json.to_string())
            );
            request.json(json)
        }
        (None, Some(form)) => {
            info!("   Form data: {:?}", form);
            request.form(form)
        }
        (None, None) => request,
    }
}

fn default_headers(token: Option<&AccessToken>) -> Result<HeaderMap> {
    let mut map = HeaderMap::new();
    map.insert(
        CONTENT_TYPE,
        HeaderValue::from_static(headers::CONTENT_TYPE_JSON),
    );

    if let Some(token) = token {
        let mut value = HeaderValue::from_str(&format!("{} {}", headers::BEARER, token.value))
            .map_err(|e| ClientError::InvalidHeader {
                name: AUTHORIZATION.to_string(),
                message: e.to_string(),
            })?;
        value.set_sensitive(true);
        map.insert(AUTHORIZATION, value);
    }

    Ok(map)
}

/// Per-call headers; a later pair replaces an earlier one with the same name
fn header_map(pairs: &[(&str, &str)]) -> Result<HeaderMap> {
    let mut map = HeaderMap::with_capacity(pairs.len());

    for (name, value) in pairs {
        let header_name =
            HeaderName::from_bytes(name.as_bytes()).map_err(|e| ClientError::InvalidHeader {
                name: name.to_string(),
                message: e.to_string(),
            })?;
        let header_value = HeaderValue::from_str(value).map_err(|e| ClientError::InvalidHeader {
            name: name.to_string(),
            message: e.to_string(),
        })?;
        map.insert(header_name, header_value);
    }

    Ok(map)
}
