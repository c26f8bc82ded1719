//! HTTP surface: axum router, middleware and the serve loop.
//!
//! | Method | Path | Handler |
//! |--------|------|---------|
//! | GET, POST | `/` | VAT validation |
//! | GET | `/health` | liveness + supported jurisdictions |
//! | POST | `/health` | 405 JSON |
//! | GET, HEAD, POST | anything else | 404 JSON |
//! | any other method | any path | 405 JSON |

mod handlers;
mod middleware;

use axum::Router;
use axum::error_handling::HandleErrorLayer;
use axum::http::{HeaderValue, header};
use axum::routing::get;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower::timeout::TimeoutLayer;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::config::ServerOptions;
use crate::dispatch::Dispatcher;

pub use handlers::{BODY_NOT_OBJECT_MESSAGE, raw_request};

/// Shared handler state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
}

/// Build the full router around `dispatcher`.
pub fn router(dispatcher: Arc<Dispatcher>, options: &ServerOptions) -> Router {
    let state = AppState { dispatcher };

    Router::new()
        .route(
            "/",
            get(handlers::validate_vat)
                .post(handlers::validate_vat)
                .fallback(handlers::method_not_allowed),
        )
        .route(
            "/health",
            get(handlers::health).fallback(handlers::method_not_allowed),
        )
        .fallback(handlers::not_found)
        .with_state(state)
        .layer(CatchPanicLayer::custom(middleware::panic_response))
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(middleware::timeout_response))
                .layer(TimeoutLayer::new(options.request_timeout())),
        )
        .layer(axum::middleware::from_fn(middleware::allowed_methods))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(axum::middleware::from_fn(middleware::response_time))
        .layer(TraceLayer::new_for_http())
}

/// Bind `host:port` and serve until Ctrl-C.
///
/// # Errors
///
/// Fails if the dispatcher cannot be built or the socket cannot be bound.
#[cfg(all(feature = "eu", feature = "ch"))]
pub async fn serve(
    config: crate::config::Configuration,
    host: &str,
) -> Result<(), crate::core::VatGateError> {
    let dispatcher = Arc::new(crate::config::build_dispatcher(&config)?);
    if config.server_options.request_timeout <= config.server_options.backend_timeout {
        tracing::warn!(
            request_timeout_ms = config.server_options.request_timeout,
            backend_timeout_ms = config.server_options.backend_timeout,
            "request timeout does not exceed backend timeout; slow backends will be cut off"
        );
    }
    tracing::info!(
        jurisdictions = dispatcher.registry().len(),
        eu = %config.api_url.eu,
        ch = %config.api_url.ch,
        "dispatcher ready"
    );

    let app = router(dispatcher, &config.server_options);
    let addr = format!("{host}:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("vatgate listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

#[cfg(all(feature = "eu", feature = "ch"))]
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "cannot listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
