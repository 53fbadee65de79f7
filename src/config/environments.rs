//! Environment registry: name -> credentials location, base URL, auth requirement

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use log::debug;

use super::{PROD_CREDENTIALS_FILE, STAGING_CREDENTIALS_FILE, urls};
use crate::error::{ClientError, Result};

/// The deployments the client knows how to reach
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnvironmentName {
    Local,
    Staging,
    Prod,
}

impl EnvironmentName {
    pub const ALL: [EnvironmentName; 3] = [Self::Local, Self::Staging, Self::Prod];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Staging => "staging",
            Self::Prod => "prod",
        }
    }
}

impl fmt::Display for EnvironmentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EnvironmentName {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "staging" => Ok(Self::Staging),
            "prod" => Ok(Self::Prod),
            _ => Err(ClientError::InvalidEnvironment { name: s.to_string() }),
        }
    }
}

/// Immutable description of one deployment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment {
    pub name: EnvironmentName,
    pub credentials_path: PathBuf,
    pub base_url: String,
    pub requires_auth: bool,
}

impl Environment {
    pub fn new(
        name: EnvironmentName,
        credentials_path: impl Into<PathBuf>,
        base_url: impl Into<String>,
        requires_auth: bool,
    ) -> Self {
        Self {
            name,
            credentials_path: credentials_path.into(),
            base_url: base_url.into(),
            requires_auth,
        }
    }
}

/// Lookup table from environment name to descriptor
#[derive(Debug, Clone)]
pub struct EnvironmentRegistry {
    environments: HashMap<EnvironmentName, Environment>,
}

impl EnvironmentRegistry {
    /// Resolve `name` against the built-in table. The name is checked before the
    /// home directory is looked up.
    pub fn resolve_builtin(name: &str) -> Result<Environment> {
        Self::resolve_builtin_in(name, dirs::home_dir())
    }

    fn resolve_builtin_in(name: &str, home: Option<PathBuf>) -> Result<Environment> {
        name.parse::<EnvironmentName>()?;
        let home = home.ok_or(ClientError::HomeDirectoryUnavailable)?;
        Self::with_home(home).resolve(name).cloned()
    }

    /// Built-in table with credentials files under `home`
    pub fn with_home(home: impl AsRef<Path>) -> Self {
        let home = home.as_ref();
        debug!("Building environment registry rooted at {:?}", home);

        // local talks to a developer instance but authenticates against staging
        Self::from_environments([
            Environment::new(
                EnvironmentName::Local,
                home.join(STAGING_CREDENTIALS_FILE),
                urls::LOCAL,
                true,
            ),
            Environment::new(
                EnvironmentName::Staging,
                home.join(STAGING_CREDENTIALS_FILE),
                urls::STAGING,
                true,
            ),
            Environment::new(
                EnvironmentName::Prod,
                home.join(PROD_CREDENTIALS_FILE),
                urls::PROD,
                true,
            ),
        ])
    }

    /// Table from explicit descriptors; a later entry replaces an earlier one with the same name
    pub fn from_environments(environments: impl IntoIterator<Item = Environment>) -> Self {
        Self {
            environments: environments
                .into_iter()
                .map(|env| (env.name, env))
                .collect(),
        }
    }

    /// Case-insensitive lookup
    pub fn resolve(&self, name: &str) -> Result<&Environment> {
        let parsed: EnvironmentName = name.parse()?;
        self.environments
            .get(&parsed)
            .ok_or_else(|| ClientError::InvalidEnvironment { name: name.to_string() })
    }

    pub fn base_url(&self, name: &str) -> Result<&str> {
        self.resolve(name).map(|env| env.base_url.as_str())
    }

    /// Descriptors in local, staging, prod order
    pub fn environments(&self) -> impl Iterator<Item = &Environment> {
        EnvironmentName::ALL
            .into_iter()
            .filter_map(move |name| self.environments.get(&name))
    }
}
