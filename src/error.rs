//! Error types for environment resolution, credential loading and token acquisition

use std::path::PathBuf;

use thiserror::Error;

/// Every failure the client can surface.
///
/// Nothing here is recovered locally: construction of an [`crate::api::ApiClient`]
/// aborts on the first error, and request operations only fail on transport faults.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Invalid environment: {name}. Use 'local', 'staging', or 'prod'")]
    InvalidEnvironment { name: String },

    #[error("Unable to determine the user's home directory")]
    HomeDirectoryUnavailable,

    #[error("Configuration file not found: {}", path.display())]
    CredentialsFileNotFound { path: PathBuf },

    #[error("Failed to read configuration file {}: {source}", path.display())]
    CredentialsRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse configuration file {}: {message}", path.display())]
    CredentialsParseError { path: PathBuf, message: String },

    #[error("Missing required OAuth2 fields in {}: {}", path.display(), fields.join(", "))]
    MissingCredentialFields {
        path: PathBuf,
        fields: Vec<&'static str>,
    },

    #[error("Authentication failed with status: {status}")]
    AuthenticationFailed { status: u16, body: String },

    #[error("Invalid token response: {message}")]
    MalformedTokenResponse { message: String, body: String },

    #[error("Invalid header '{name}': {message}")]
    InvalidHeader { name: String, message: String },

    #[error("Request error: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Payload-free discriminant of [`ClientError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidEnvironment,
    HomeDirectoryUnavailable,
    CredentialsFileNotFound,
    CredentialsRead,
    CredentialsParseError,
    MissingCredentialFields,
    AuthenticationFailed,
    MalformedTokenResponse,
    InvalidHeader,
    Transport,
}

impl ClientError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidEnvironment { .. } => ErrorKind::InvalidEnvironment,
            Self::HomeDirectoryUnavailable => ErrorKind::HomeDirectoryUnavailable,
            Self::CredentialsFileNotFound { .. } => ErrorKind::CredentialsFileNotFound,
            Self::CredentialsRead { .. } => ErrorKind::CredentialsRead,
            Self::CredentialsParseError { .. } => ErrorKind::CredentialsParseError,
            Self::MissingCredentialFields { .. } => ErrorKind::MissingCredentialFields,
            Self::AuthenticationFailed { .. } => ErrorKind::AuthenticationFailed,
            Self::MalformedTokenResponse { .. } => ErrorKind::MalformedTokenResponse,
            Self::InvalidHeader { .. } => ErrorKind::InvalidHeader,
            Self::Transport(_) => ErrorKind::Transport,
        }
    }

    /// True when the local credentials file is absent, unreadable, malformed,
    /// or rejected by the issuer. Callers typically prompt for new credentials.
    pub fn is_credentials_problem(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::CredentialsFileNotFound
                | ErrorKind::CredentialsRead
                | ErrorKind::CredentialsParseError
                | ErrorKind::MissingCredentialFields
                | ErrorKind::AuthenticationFailed
        )
    }

    /// True for connection, DNS and timeout faults.
    pub fn is_unreachable(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// HTTP status carried by an authentication rejection.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::AuthenticationFailed { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
