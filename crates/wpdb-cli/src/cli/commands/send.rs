//! Send command: one command line over `POST /input`.

use anyhow::{Context, Result};
use wpdb_core::config::Config;
use wpdb_core::dispatch::OutboundCommand;
use wpdb_core::transport::http::SessionClient;

pub async fn run(config: &Config, raw: &str) -> Result<()> {
    let client = SessionClient::new(config.base_url()?, config.request_timeout())?;
    let command = OutboundCommand::new(raw);

    client
        .post_command(command.line())
        .await
        .with_context(|| format!("send '{}' to {}", command.text(), client.base_url()))?;
    println!("Sent: {}", command.text());
    Ok(())
}
