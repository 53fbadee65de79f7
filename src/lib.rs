pub mod api;
pub mod auth;
pub mod config;
pub mod error;

pub use api::{ApiClient, ClientOptions, RequestBody};
pub use auth::{AccessToken, OAuthCredentials};
pub use config::{Environment, EnvironmentName, EnvironmentRegistry};
pub use error::{ClientError, ErrorKind, Result};
