//! Authenticated HTTP client for the RMI citizen services API
//!
//! Resolves an environment, acquires an OAuth2 client-credentials token when the
//! environment requires one, and dispatches GET/POST/PUT/DELETE calls against the
//! environment's base URL with the bearer token attached.

pub mod client;
pub mod constants;

pub use client::{ApiClient, ClientOptions, RequestBody};
pub use constants::DEFAULT_TIMEOUT;
pub use reqwest::blocking::Response;
