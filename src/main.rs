//! CORS-enabling API proxy.
//!
//! ```text
//!   Browser ──▶ api-cors-proxy ──▶ upstream origin
//!               │
//!               ├─ OPTIONS      → 204 + CORS headers
//!               ├─ not /api/... → 404 JSON
//!               └─ /api/<rest>  → <upstream><rest>?<query>
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tokio::net::TcpListener;

use api_cors_proxy::config::{load_config, ProxySettings};
use api_cors_proxy::lifecycle::{wait_for_shutdown, Shutdown};
use api_cors_proxy::observability::init_logging;
use api_cors_proxy::HttpServer;

#[derive(Parser)]
#[command(name = "api-cors-proxy")]
#[command(about = "Reverse proxy that adds CORS headers to a single upstream API", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener bind address.
    #[arg(short, long)]
    bind: Option<String>,

    /// Validate the configuration and exit.
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }

    let settings = match ProxySettings::from_config(&config) {
        Ok(settings) => settings,
        Err(errors) => {
            for e in errors {
                eprintln!("Invalid configuration: {}", e);
            }
            return ExitCode::FAILURE;
        }
    };

    if cli.check {
        println!(
            "Configuration OK: {} -> {}{}",
            config.listener.bind_address, settings.upstream_base_url, settings.api_prefix
        );
        return ExitCode::SUCCESS;
    }

    init_logging(&config.observability);

    match run(&config.listener.bind_address, settings).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Proxy terminated");
            ExitCode::FAILURE
        }
    }
}

async fn run(bind_address: &str, settings: ProxySettings) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(
        upstream = %settings.upstream_base_url,
        api_prefix = %settings.api_prefix,
        token_configured = settings.authorization.is_some(),
        "Configuration loaded"
    );

    let listener = TcpListener::bind(bind_address).await?;
    let server = HttpServer::new(settings)?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(shutdown.trigger_after(wait_for_shutdown()));

    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
