use anyhow::Result;
use log::info;

use rmi_client::auth::TokenClient;
use rmi_client::{ClientOptions, Environment};

/// Print only the access token so it can be piped into other tools
pub fn token_command(environment: Environment, options: ClientOptions) -> Result<()> {
    info!("Executing token command for {}", environment.name);

    let token = TokenClient::new(options.timeout)?
        .acquire(&environment)?
        .ok_or_else(|| {
            anyhow::anyhow!(
                "The {} environment does not require authentication, no token to print",
                environment.name
            )
        })?;

    println!("{}", token.value);
    Ok(())
}
