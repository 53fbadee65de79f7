pub mod app;
pub mod commands;

use std::time::Duration;

use anyhow::Result;
use rmi_client::{ClientOptions, EnvironmentRegistry};

pub use app::{Cli, Commands};

/// Resolve the environment and dispatch the selected command
pub fn run(cli: Cli) -> Result<()> {
    // Rejects unknown names before any network activity
    let environment = EnvironmentRegistry::resolve_builtin(&cli.environment)?;
    let options = ClientOptions::default().with_timeout(Duration::from_secs(cli.timeout));

    match cli.command.unwrap_or(Commands::Status) {
        Commands::Status => commands::status::status_command(environment, options),
        Commands::Token => commands::token::token_command(environment, options),
        Commands::Request(args) => commands::request::handle_request_command(environment, options, args),
    }
}
