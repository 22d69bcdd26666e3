//! HTTP server implementation using Axum
//!
//! Wraps an application [`Router`] with request tracing, a per-request
//! timeout and request metrics, and runs it under the [`Server`] lifecycle.

use async_trait::async_trait;
use axum::{
    extract::{Request, State},
    middleware::{self, Next},
    response::Response,
    Router,
};
use observability::ServerMetrics;
use parking_lot::RwLock;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{error, info};

use crate::config::ServerConfig;
use crate::error::{Result, ServerError};
use crate::traits::Server;

/// HTTP server implementation using Axum
///
/// # Example
///
/// ```ignore
/// use server::{health_routes, HealthState, HttpServer, ServerConfig, ServerExt};
///
/// let router = inventory_routes(service)
///     .merge(health_routes(Arc::new(HealthState::new("market", "1.0.0"))));
/// HttpServer::new(ServerConfig::new("127.0.0.1", 8080), router)
///     .run_with_ctrl_c()
///     .await?;
/// ```
#[derive(Clone)]
pub struct HttpServer {
    config: ServerConfig,
    router: Router,
    running: Arc<AtomicBool>,
    bound_addr: Arc<RwLock<Option<SocketAddr>>>,
}

impl HttpServer {
    /// Create a new HTTP server around an application router
    pub fn new(config: ServerConfig, router: Router) -> Self {
        let metrics = Arc::new(ServerMetrics::new("http"));
        let router = router
            .layer(middleware::from_fn_with_state(metrics, track_requests))
            .layer(TimeoutLayer::new(config.request_timeout))
            .layer(TraceLayer::new_for_http());

        Self {
            config,
            router,
            running: Arc::new(AtomicBool::new(false)),
            bound_addr: Arc::new(RwLock::new(None)),
        }
    }

    /// Get the server configuration
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Get the layered router (for in-process testing)
    pub fn router(&self) -> &Router {
        &self.router
    }
}

async fn track_requests(
    State(metrics): State<Arc<ServerMetrics>>,
    request: Request,
    next: Next,
) -> Response {
    let mut guard = metrics.start_request(request.method().as_str());
    let response = next.run(request).await;
    guard.set_status(response.status().as_u16());
    response
}

#[async_trait]
impl Server for HttpServer {
    fn name(&self) -> &str {
        "http"
    }

    fn address(&self) -> Option<SocketAddr> {
        *self.bound_addr.read()
    }

    fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    async fn run(&self, shutdown_token: CancellationToken) -> Result<()> {
        let addr = self.config.http_addr()?;

        info!(%addr, "Starting HTTP server");

        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| ServerError::bind(addr.to_string(), e))?;

        let local_addr = listener
            .local_addr()
            .map_err(|e| ServerError::bind(addr.to_string(), e))?;
        *self.bound_addr.write() = Some(local_addr);

        info!(%local_addr, "HTTP server listening");

        self.running.store(true, Ordering::SeqCst);

        let result = axum::serve(listener, self.router.clone())
            .with_graceful_shutdown(async move {
                shutdown_token.cancelled().await;
                info!("HTTP server received shutdown signal");
            })
            .await;

        self.running.store(false, Ordering::SeqCst);
        *self.bound_addr.write() = None;

        match result {
            Ok(()) => {
                info!("HTTP server shutdown complete");
                Ok(())
            }
            Err(e) => {
                error!(%e, "HTTP server error");
                Err(ServerError::Serve(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health::{health_routes, HealthState};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use std::time::Duration;
    use tower::ServiceExt;

    fn test_server(port: u16) -> HttpServer {
        let router = health_routes(Arc::new(HealthState::new("market", "1.0.0")));
        HttpServer::new(ServerConfig::new("127.0.0.1", port), router)
    }

    #[tokio::test]
    async fn test_http_server_shutdown() {
        let server = test_server(0);
        let token = CancellationToken::new();
        let handle = tokio::spawn({
            let server = server.clone();
            let token = token.clone();
            async move { server.run(token).await }
        });

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(server.is_running());
        assert!(server.address().is_some());

        token.cancel();

        let result = tokio::time::timeout(Duration::from_secs(5), handle).await;
        assert!(matches!(result, Ok(Ok(Ok(())))), "Server should shutdown within timeout");
        assert!(!server.is_running());
        assert!(server.address().is_none());
    }

    #[tokio::test]
    async fn test_layered_router_serves_health() {
        let server = test_server(8080);

        let response = server
            .router()
            .clone()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let server = test_server(8080);

        let response = server
            .router()
            .clone()
            .oneshot(Request::get("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_http_server_name() {
        assert_eq!(test_server(8080).name(), "http");
    }
}
