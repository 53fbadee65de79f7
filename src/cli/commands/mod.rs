pub mod request;
pub mod status;
pub mod token;

pub use request::RequestArgs;
