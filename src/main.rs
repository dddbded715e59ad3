use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use skycast::config::LoggingConfig;
use skycast::{OpenMeteoClient, SkyCastConfig, web};
use tracing_subscriber::EnvFilter;

/// SkyCast - compare historical temperature trends between two cities
#[derive(Parser)]
#[command(name = "skycast", version, about, long_about = None)]
struct Cli {
    /// Path to a TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Address to bind, overrides server.host
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on, overrides server.port
    #[arg(long, short = 'p')]
    port: Option<u16>,

    /// Log at debug level
    #[arg(long, short = 'v')]
    verbose: bool,
}

fn init_tracing(logging: &LoggingConfig, verbose: bool) {
    let level = if verbose { "debug" } else { logging.level.as_str() };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("skycast={level},tower_http=info")));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if logging.format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config =
        SkyCastConfig::load_from_path(cli.config)?.with_server_overrides(cli.host, cli.port)?;

    init_tracing(&config.logging, cli.verbose);
    tracing::debug!("Loaded configuration: {:?}", config);

    let source = Arc::new(OpenMeteoClient::new(&config.weather)?);
    web::run(&config.server, source).await
}
