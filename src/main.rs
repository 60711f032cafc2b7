use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use wavecast::{WaveCastConfig, WavePredictor, predictor, telemetry, web};

/// Wave and weather forecast API for coastal locations
#[derive(Debug, Parser)]
#[command(name = "wavecast", version, about)]
struct Cli {
    /// Configuration file (TOML)
    #[arg(short, long, env = "WAVECAST_CONFIG")]
    config: Option<PathBuf>,

    /// Port to listen on, overrides the configuration
    #[arg(short, long)]
    port: Option<u16>,

    /// Serve random forecasts without trying to load the model
    #[arg(long)]
    random: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = WaveCastConfig::load_from_path(cli.config)?;
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    telemetry::init(&config.logging)?;
    tracing::info!("Starting WaveCast {}", wavecast::VERSION);

    predictor::init(WavePredictor::from_config(&config, cli.random).await)?;
    let status = predictor::global().status();
    tracing::info!(
        model_loaded = status.model_loaded,
        "Serving forecasts from {}",
        status.description
    );

    web::run(&config, predictor::global()).await
}
