//! HTTP front end for polyrun
//!
//! Exposes the execution pipeline as `POST /execute` plus a `GET /health`
//! probe. Request bodies that are almost JSON are accepted on a best-effort
//! basis; see [`request::parse_request`].

pub mod error;
pub mod request;

pub use error::{ApiError, ServerError};
pub use request::{RequestError, parse_request};

use std::future::Future;
use std::net::SocketAddr;

use axum::body::Bytes;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::HeaderValue;
use axum::response::Json;
use axum::routing::{get, post};
use axum::Router;
use polyrun::{ExecutionResult, Pipeline};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

/// Configuration for the HTTP server
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on
    pub bind_addr: SocketAddr,
    /// Allowed CORS origins; `None` allows any origin
    pub cors_origins: Option<Vec<String>>,
    /// Maximum request body size in bytes
    pub max_body_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8000)),
            cors_origins: None,
            max_body_size: 1024 * 1024,
        }
    }
}

impl ServerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bind_addr(mut self, addr: SocketAddr) -> Self {
        self.bind_addr = addr;
        self
    }

    pub fn with_cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = Some(origins);
        self
    }

    pub fn with_max_body_size(mut self, size: usize) -> Self {
        self.max_body_size = size;
        self
    }

    fn cors_layer(&self) -> Result<CorsLayer, ServerError> {
        let Some(ref origins) = self.cors_origins else {
            return Ok(CorsLayer::permissive());
        };
        let origins = origins
            .iter()
            .map(|origin| {
                origin
                    .parse::<HeaderValue>()
                    .map_err(|_| ServerError::InvalidOrigin(origin.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any))
    }
}

/// The polyrun HTTP server
#[derive(Debug, Clone)]
pub struct PolyrunServer {
    pipeline: Pipeline,
    config: ServerConfig,
}

impl PolyrunServer {
    pub fn new(pipeline: Pipeline) -> Self {
        Self::with_config(pipeline, ServerConfig::default())
    }

    pub fn with_config(pipeline: Pipeline, config: ServerConfig) -> Self {
        Self { pipeline, config }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Build the router with all routes and middleware
    pub fn build_router(&self) -> Result<Router, ServerError> {
        let router = Router::new()
            .route("/execute", post(execute_handler))
            .route("/health", get(health_handler))
            .with_state(self.pipeline.clone())
            .layer(DefaultBodyLimit::max(self.config.max_body_size))
            .layer(TraceLayer::new_for_http())
            .layer(self.config.cors_layer()?);
        Ok(router)
    }

    /// Serve until the process is interrupted
    pub async fn serve(self) -> Result<(), ServerError> {
        self.serve_with_shutdown(shutdown_signal()).await
    }

    /// Serve until `shutdown` resolves, then drain in-flight requests
    pub async fn serve_with_shutdown<F>(self, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let router = self.build_router()?;
        let addr = self.config.bind_addr;
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::Bind { addr, source })?;

        info!(%addr, "polyrun server listening");
        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(ServerError::Serve)?;
        info!("polyrun server shut down");
        Ok(())
    }
}

async fn execute_handler(
    State(pipeline): State<Pipeline>,
    body: Bytes,
) -> Result<Json<ExecutionResult>, ApiError> {
    let body = std::str::from_utf8(&body).map_err(|_| RequestError::InvalidFormat)?;
    let request = parse_request(body)?;
    debug!(language_target = ?request.target, "received execution request");

    // Detached so a client disconnect does not abandon a running program
    // before its workspace is released.
    let result = tokio::spawn(async move { pipeline.execute(&request).await })
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))??;
    Ok(Json(result))
}

async fn health_handler() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Resolves on Ctrl+C or SIGTERM
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received Ctrl+C, shutting down"),
        _ = terminate => info!("received SIGTERM, shutting down"),
    }
}
