use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};
use serde_json::{Map, Value};

use crate::config::Environment;
use crate::error::{ClientError, Result};

/// Key of the optional section wrapping the client-credentials fields
pub const OAUTH_SECTION: &str = "oauth2";

/// Fields every credentials document must provide, in reporting order
pub const REQUIRED_FIELDS: [&str; 3] = ["issuer", "client_id", "client_secret"];

/// Client-credentials grant inputs read from a local file
#[derive(Clone, PartialEq, Eq)]
pub struct OAuthCredentials {
    pub issuer: String,
    pub client_id: String,
    pub client_secret: String,
}

impl fmt::Debug for OAuthCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuthCredentials")
            .field("issuer", &self.issuer)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/// One structured-text format in the fallback chain
pub struct CredentialsFormat {
    pub name: &'static str,
    parse: fn(&str) -> std::result::Result<Value, String>,
}

impl CredentialsFormat {
    /// Parse `content`, treating anything other than a mapping as a failure
    fn parse_document(&self, content: &str) -> std::result::Result<Map<String, Value>, String> {
        match (self.parse)(content)? {
            Value::Object(map) => Ok(map),
            other => Err(format!("expected a mapping, found {}", value_type(&other))),
        }
    }
}

/// Formats tried in order. Both share the same file names, so the loader probes.
/// Most JSON is also valid YAML, so the JSON step only sees documents YAML rejects,
/// such as strings written with UTF-16 surrogate pair escapes.
pub const FORMATS: &[CredentialsFormat] = &[
    CredentialsFormat {
        name: "YAML",
        parse: parse_yaml,
    },
    CredentialsFormat {
        name: "JSON",
        parse: parse_json,
    },
];

fn parse_yaml(content: &str) -> std::result::Result<Value, String> {
    serde_yaml::from_str(content).map_err(|e| e.to_string())
}

fn parse_json(content: &str) -> std::result::Result<Value, String> {
    serde_json::from_str(content).map_err(|e| e.to_string())
}

/// Load credentials for `environment` from its configured file
pub fn load(environment: &Environment) -> Result<OAuthCredentials> {
    let credentials = load_from_path(&environment.credentials_path)?;
    debug!("Configuration loaded successfully for {} environment", environment.name);
    Ok(credentials)
}

/// Load credentials from an explicit path. Re-reads the file on every call.
pub fn load_from_path(path: &Path) -> Result<OAuthCredentials> {
    if !path.exists() {
        return Err(ClientError::CredentialsFileNotFound {
            path: path.to_path_buf(),
        });
    }

    info!("Loading configuration from: {}", path.display());

    let content = fs::read_to_string(path).map_err(|source| ClientError::CredentialsRead {
        path: path.to_path_buf(),
        source,
    })?;

    let document = parse_with(FORMATS, &content).map_err(|message| {
        ClientError::CredentialsParseError {
            path: path.to_path_buf(),
            message,
        }
    })?;

    extract(path, &document)
}

/// Walk the chain and return the first document that parses.
/// On exhaustion the error lists every format's failure.
fn parse_with(
    formats: &[CredentialsFormat],
    content: &str,
) -> std::result::Result<Map<String, Value>, String> {
    let mut failures = Vec::with_capacity(formats.len());

    for format in formats {
        match format.parse_document(content) {
            Ok(document) => {
                debug!("Parsed credentials as {}", format.name);
                return Ok(document);
            }
            Err(e) => {
                debug!("Credentials are not valid {}: {}", format.name, e);
                failures.push(format!("{}: {}", format.name, e));
            }
        }
    }

    if failures.is_empty() {
        return Err("no formats to try".to_string());
    }
    Err(failures.join("; "))
}

fn extract(path: &Path, document: &Map<String, Value>) -> Result<OAuthCredentials> {
    let section = match document.get(OAUTH_SECTION) {
        Some(Value::Object(section)) => Some(section),
        Some(_) => None,
        None => Some(document),
    };

    let field = |key: &str| section.and_then(|s| s.get(key)).and_then(scalar_to_string);

    let (issuer, client_id, client_secret) =
        (field("issuer"), field("client_id"), field("client_secret"));

    let missing: Vec<&'static str> = REQUIRED_FIELDS
        .iter()
        .zip([&issuer, &client_id, &client_secret])
        .filter(|(_, value)| value.is_none())
        .map(|(name, _)| *name)
        .collect();

    match (issuer, client_id, client_secret) {
        (Some(issuer), Some(client_id), Some(client_secret)) => Ok(OAuthCredentials {
            issuer,
            client_id,
            client_secret,
        }),
        _ => Err(ClientError::MissingCredentialFields {
            path: PathBuf::from(path),
            fields: missing,
        }),
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn value_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
}
