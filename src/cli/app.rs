use super::commands::RequestArgs;
use clap::{Parser, Subcommand};
use rmi_client::config::DEFAULT_ENVIRONMENT;

#[derive(Parser)]
#[command(name = "rmi-client")]
#[command(about = "Authenticated client for the RMI citizen services API")]
pub struct Cli {
    /// Target environment: local, staging or prod (case-insensitive)
    #[arg(default_value = DEFAULT_ENVIRONMENT.as_str())]
    pub environment: String,

    /// Timeout in seconds for the token request and every API call
    #[arg(long, global = true, default_value_t = 30)]
    pub timeout: u64,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the environment summary, acquire a token and probe the health endpoint
    Status,
    /// Print the raw access token for the environment
    Token,
    /// Send a single request through the authenticated client
    Request(RequestArgs),
}
