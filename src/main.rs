//! vatgate HTTP server.
//!
//! Configuration:
//!   first CLI argument or VATGATE_CONFIG: path to the JSON config file
//!   (optional, defaults apply)
//!   VATGATE_BIND_HOST: listen host (default: 0.0.0.0)
//!   RUST_LOG: log filter (default: info,vatgate=debug)

use std::process::ExitCode;

use vatgate::config::Configuration;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,vatgate=debug".into()),
        )
        .init();

    let config_path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("VATGATE_CONFIG").ok());
    let config = match config_path {
        Some(path) => {
            tracing::info!("loading configuration from {path}");
            Configuration::load(&path)
        }
        None => {
            tracing::info!("no configuration file given, using defaults");
            Ok(Configuration::default())
        }
    };
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    let host = std::env::var("VATGATE_BIND_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    match vatgate::server::serve(config, &host).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "server stopped");
            ExitCode::FAILURE
        }
    }
}
