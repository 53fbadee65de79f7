//! API constants for the RMI citizen services API

use std::time::Duration;

/// Timeout applied to every network call, token requests included
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// User agent sent with API requests
pub fn user_agent() -> String {
    format!("rmi-client/{}", env!("CARGO_PKG_VERSION"))
}

/// Standard headers for RMI requests
pub mod headers {
    /// Content type for JSON requests
    pub const CONTENT_TYPE_JSON: &str = "application/json";

    /// Authorization scheme prefix
    pub const BEARER: &str = "Bearer";
}

/// Well-known API paths
pub mod paths {
    pub const HEALTH: &str = "/v1/health";
}
