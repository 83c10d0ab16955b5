//! Projector Server
//!
//! REST API server for stochastic price projection.

use clap::Parser;
use projector_server::config::{build_config, parse_parallel_flag, CliArgs as ConfigCliArgs};
use projector_server::server::Server;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Projector Server - REST API for Monte Carlo price projection
#[derive(Parser, Debug)]
#[command(name = "projector_server")]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file path (TOML format)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Host address to bind to
    #[arg(long, env = "PROJECTOR_SERVER_HOST")]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "PROJECTOR_SERVER_PORT")]
    port: Option<u16>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "PROJECTOR_LOG_LEVEL")]
    log_level: Option<String>,

    /// Run simulations on the thread pool (true, false, 1, 0, yes, no, on, off)
    #[arg(long, env = "PROJECTOR_PARALLEL", value_parser = parse_parallel_flag)]
    parallel: Option<bool>,

    /// Quantile convention (nearest_rank, linear)
    #[arg(long, env = "PROJECTOR_QUANTILE_METHOD")]
    quantile_method: Option<String>,
}

impl From<Args> for ConfigCliArgs {
    fn from(args: Args) -> Self {
        ConfigCliArgs {
            config_file: args.config,
            host: args.host,
            port: args.port,
            log_level: args.log_level,
            parallel: args.parallel,
            quantile_method: args.quantile_method,
        }
    }
}

fn init_tracing(log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let cli_args: ConfigCliArgs = args.into();
    let config = build_config(&cli_args)?;

    init_tracing(config.log_level.as_filter_str());

    tracing::info!("Projector Server v{}", projector_server::VERSION);
    tracing::info!(
        host = %config.host,
        port = %config.port,
        log_level = %config.log_level,
        environment = %config.environment,
        parallel = %config.parallel,
        quantile_method = %config.quantile_method,
        cors_any_origin = %config.allows_any_origin(),
        "Server configuration loaded"
    );

    let server = Server::new(config);
    tracing::info!(address = %server.socket_addr(), "Starting server");

    server.run().await?;

    Ok(())
}
