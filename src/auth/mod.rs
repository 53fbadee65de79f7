pub mod credentials;
pub mod token;

pub use credentials::OAuthCredentials;
pub use token::{AccessToken, TokenClient};
