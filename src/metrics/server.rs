//! HTTP server for the Prometheus scrape endpoint.

use super::collector::Publisher;
use super::registry::{MetricsRegistry, ScrapeError};
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::fmt::Write as _;
use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;
use tower_http::trace::TraceLayer;

/// Errors that can occur during metrics server operations.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind to address: {0}")]
    Bind(#[from] std::io::Error),

    #[error("server error: {0}")]
    Server(String),
}

/// Configuration for the metrics server.
#[derive(Debug, Clone)]
pub struct MetricsServerConfig {
    /// Address to bind the server to.
    pub bind_addr: SocketAddr,
}

impl Default for MetricsServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: ([0, 0, 0, 0], 9999).into(),
        }
    }
}

impl MetricsServerConfig {
    /// Creates a config with a custom port.
    pub fn with_port(port: u16) -> Self {
        Self {
            bind_addr: ([0, 0, 0, 0], port).into(),
        }
    }
}

/// Shared state for the metrics server. Read-only after construction.
pub struct MetricsState {
    registry: MetricsRegistry,
    publisher: Publisher,
}

impl MetricsState {
    /// Runs one scrape on the calling thread.
    pub fn scrape(&self) -> Result<String, ScrapeError> {
        self.registry.scrape(&self.publisher)
    }
}

/// HTTP server for exposing Prometheus metrics.
pub struct MetricsServer {
    config: MetricsServerConfig,
    state: Arc<MetricsState>,
}

impl MetricsServer {
    /// Creates a new metrics server.
    pub fn new(config: MetricsServerConfig, registry: MetricsRegistry, publisher: Publisher) -> Self {
        Self {
            config,
            state: Arc::new(MetricsState {
                registry,
                publisher,
            }),
        }
    }

    /// Returns a reference to the shared state.
    pub fn state(&self) -> Arc<MetricsState> {
        Arc::clone(&self.state)
    }

    /// Builds the router serving `/metrics` and `/health`.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/metrics", get(metrics_handler))
            .route("/health", get(health_handler))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state())
    }

    /// Starts the HTTP server.
    ///
    /// This method runs the server until Ctrl-C is received.
    pub async fn run(self) -> Result<(), ServerError> {
        let app = self.router();
        let listener = tokio::net::TcpListener::bind(self.config.bind_addr).await?;

        tracing::info!(
            addr = %self.config.bind_addr,
            "Metrics server listening"
        );

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| ServerError::Server(e.to_string()))?;

        tracing::info!("Metrics server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

/// Handler for the /metrics endpoint.
///
/// The snapshot is read on the blocking pool; each request does its own
/// read and parse.
async fn metrics_handler(State(state): State<Arc<MetricsState>>) -> Response {
    let result = tokio::task::spawn_blocking(move || state.scrape()).await;

    match result {
        Ok(Ok(output)) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, prometheus::TEXT_FORMAT)],
            output,
        )
            .into_response(),
        Ok(Err(e)) => error_response(&e),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            format!("scrape task failed: {}", e),
        )
            .into_response(),
    }
}

fn error_response(err: &ScrapeError) -> Response {
    let body = match err {
        ScrapeError::Unavailable { metrics, error } => {
            let mut body = String::new();
            for name in metrics {
                let _ = writeln!(body, "error collecting metric {}: {}", name, error);
            }
            body
        }
        ScrapeError::Metrics(e) => format!("Failed to encode metrics: {}", e),
    };

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        body,
    )
        .into_response()
}

/// Handler for the /health endpoint.
async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::{scan, ClientStat, SnapshotError};

    fn state(text: &'static str) -> Arc<MetricsState> {
        let publisher = Publisher::new(move || -> Result<Vec<ClientStat>, SnapshotError> {
            Ok(scan(text.as_bytes())?)
        })
        .unwrap();
        let server = MetricsServer::new(
            MetricsServerConfig::default(),
            MetricsRegistry::new("iwstat").unwrap(),
            publisher,
        );
        server.state()
    }

    async fn body_of(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn test_config_default() {
        let config = MetricsServerConfig::default();
        assert_eq!(config.bind_addr.port(), 9999);
    }

    #[test]
    fn test_config_with_port() {
        let config = MetricsServerConfig::with_port(8080);
        assert_eq!(config.bind_addr.port(), 8080);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_metrics_handler_ok() {
        let response = metrics_handler(State(state(
            "header\nwlan0 aa:bb -42 30 5 1 2 3 4 5 6 7 8 9 10 11 12 13 14 15 16\n",
        )))
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_of(response).await;
        assert!(body.contains(r#"iwstat_snr_of_connected_client{interfaceName="wlan0",clientID="aa:bb"} 30"#));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_metrics_handler_unavailable() {
        let response = metrics_handler(State(state(
            "header\nwlan0 aa:bb -42 30 5 1 2 3 4 5 6 7 8 9 10 11 12 13 14 15 oops\n",
        )))
        .await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_of(response).await;
        assert_eq!(body.lines().count(), crate::snapshot::Field::COUNT);
        assert!(body
            .lines()
            .all(|l| l.starts_with("error collecting metric iwstat_")));
    }
}
