//! HTTP server implementation

use axum::{
    http::{header, HeaderValue, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    set_header::SetResponseHeaderLayer,
    timeout::{RequestBodyTimeoutLayer, TimeoutLayer},
};
use tracing::{info, warn};

use super::handlers::{
    create_message, delete_message, get_message, list_messages, not_found, root, AppState,
};
use super::error::ApiError;
use super::trace::record_outcome;
use crate::store::MessageStore;

/// Settings the HTTP boundary needs, fixed once the server runs
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind
    pub addr: SocketAddr,
    /// Maximum text length in characters
    pub char_limit: usize,
    /// Limit for reading a request body
    pub read_timeout: Duration,
    /// Limit for handling a whole request
    pub write_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            addr: SocketAddr::from(([0, 0, 0, 0], 8090)),
            char_limit: 280,
            read_timeout: Duration::from_secs(3),
            write_timeout: Duration::from_secs(5),
        }
    }
}

/// Build the application router
///
/// Layers run outermost first: tracing span, nosniff header, timeout
/// shaping, then the two timeouts, so a 408 is traced and shaped like any
/// other error.
pub fn router(config: &ServerConfig, store: Arc<MessageStore>) -> Router {
    let state = AppState::new(store, config.char_limit);

    Router::new()
        .route("/", get(root))
        .route("/v1/messages", get(list_messages).post(create_message))
        .route("/v1/messages/:id", get(get_message).delete(delete_message))
        .fallback(not_found)
        .layer(RequestBodyTimeoutLayer::new(config.read_timeout))
        .layer(TimeoutLayer::new(config.write_timeout))
        .layer(middleware::map_response(shape_timeout))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(middleware::from_fn(record_outcome))
        .with_state(state)
}

/// Give the bare 408 from `TimeoutLayer` the usual error body
async fn shape_timeout(response: Response) -> Response {
    if response.status() == StatusCode::REQUEST_TIMEOUT {
        warn!("Request timed out");
        ApiError::RequestTimeout.into_response()
    } else {
        response
    }
}

/// Run the web server until a shutdown signal arrives
pub async fn run_web_server(config: ServerConfig, store: Arc<MessageStore>) -> anyhow::Result<()> {
    let app = router(&config, store);

    // Start the server
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    info!("Messaging service listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Resolve on Ctrl-C, or SIGTERM on unix
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
