use anyhow::Result;
use clap::Parser;
use energy_s::api_server::ApiServer;
use energy_s::util::{self, cmd::Args, config::GatewayConfig};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    util::init_logging(&args.log_level);

    let mut config = GatewayConfig::load(args.config.as_deref())?;
    args.apply(&mut config);

    // Every artifact is loaded before the port is bound.
    let server_state = Arc::new(ApiServer::new(&config)?);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    server_state.run_api_server(&addr).await?;

    info!("Dropping model registry...");
    Ok(())
}
