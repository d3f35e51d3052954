use anyhow::Result;
use contabills_auth::{config::Config, server, telemetry};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    telemetry::init(&config.telemetry);

    info!("Starting Contabills Auth");
    info!("HTTP server listening on {}", config.http_addr());

    server::run(config).await
}
