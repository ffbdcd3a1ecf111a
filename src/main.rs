use anyhow::Context;
use clap::Parser;
use initiatives::{AppState, HttpServer, ServerConfig};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "initiatives-server", version, about = "Initiatives dashboard API server")]
struct Args {
    /// YAML configuration file
    #[arg(long, env = "INITIATIVES_CONFIG")]
    config: Option<PathBuf>,

    /// Override the listen port
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = ServerConfig::load(args.config.as_deref()).context("loading configuration")?;
    if let Some(port) = args.port {
        config.port = port;
    }

    tracing_subscriber::fmt()
        .with_max_level(config.level()?)
        .init();

    info!("Initiatives server v{}", initiatives::version());
    info!("Data directory: {:?}", config.data_dir);

    let state = AppState::from_config(&config).context("opening storage")?;
    HttpServer::new(config, state)
        .start()
        .await
        .context("serving HTTP")?;

    Ok(())
}
