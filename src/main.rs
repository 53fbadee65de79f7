use anyhow::Result;
use clap::Parser;
use log::info;

mod cli;

use cli::Cli;

fn main() -> Result<()> {
    // Pick up RUST_LOG and friends from a local .env if present
    dotenvy::dotenv().ok();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    info!("Starting rmi-client");
    cli::run(cli)
}
