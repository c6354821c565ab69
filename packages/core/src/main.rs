use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use dotenvy::dotenv;
use tokio::net::TcpListener;
use tokio::signal;

use app_errors::api::{self, AppState};
use app_errors::catalog::{self, ErrorCode};
use app_errors::cli::Cli;
use app_errors::config::Config;
use app_errors::logging::init_logging;
use app_errors::metrics::ErrorMetrics;
use app_errors::{resolve_status, ErrorLogger, ServiceError};

#[tokio::main]
async fn main() {
    dotenv().ok();
    let cli = Cli::parse();

    let config = Config::from_env().and_then(|config| config.apply_cli(&cli));
    init_logging(config.as_ref().map(|c| c.environment).unwrap_or_default());

    let config = config.unwrap_or_else(|err| {
        tracing::error!("{}", err);
        std::process::exit(1);
    });

    if let Err(err) = catalog::verify() {
        tracing::error!("{}", err);
        std::process::exit(1);
    }

    if cli.list_codes {
        print_catalog();
        return;
    }

    if let Err(err) = serve(config).await {
        tracing::error!("{}", err);
        std::process::exit(1);
    }
}

fn print_catalog() {
    for key in ErrorCode::ALL {
        let entry = key.entry();
        println!(
            "{:>5}  {:<24} {}  {}",
            entry.code,
            entry.name,
            resolve_status(entry.code, None).as_u16(),
            entry.user_message
        );
    }
}

async fn serve(config: Config) -> Result<(), ServiceError> {
    if config.environment.is_production() && config.tracker_url.is_none() {
        tracing::warn!("ERROR_TRACKER_URL is not set; unhandled errors will only be logged locally");
    }

    let logger = ErrorLogger::from_config(&config)?;
    let metrics =
        Arc::new(ErrorMetrics::new().map_err(|err| ServiceError::Config(err.to_string()))?);
    let app = api::router(AppState::new(logger, metrics)?);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|err| ServiceError::Network(format!("bind {}: {}", addr, err)))?;

    tracing::info!("Listening on {} ({})", addr, config.environment);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|err| ServiceError::Network(err.to_string()))?;

    tracing::info!("Server stopped cleanly");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", err);
    }
    tracing::info!("Shutdown signal received");
}
