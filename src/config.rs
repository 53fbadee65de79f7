//! Static deployment configuration for the RMI API
//!
//! The registry is built once at startup and handed to the client explicitly,
//! so tests can substitute their own table without touching process state.

pub mod environments;

pub use environments::{Environment, EnvironmentName, EnvironmentRegistry};

/// Credentials file shared by the local and staging environments
pub const STAGING_CREDENTIALS_FILE: &str = "idcarioca_staging.yaml";

/// Credentials file for production
pub const PROD_CREDENTIALS_FILE: &str = "idcarioca_prod.yaml";

/// API base URLs per environment
pub mod urls {
    pub const LOCAL: &str = "http://localhost:8080";
    pub const STAGING: &str = "https://services.staging.app.dados.rio/rmi";
    pub const PROD: &str = "https://services.pref.rio/rmi";
}

/// Environment used when the caller does not pick one
pub const DEFAULT_ENVIRONMENT: EnvironmentName = EnvironmentName::Staging;
