//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with the receive handler on every path
//! - Wire up middleware (request ID, tracing, tenant authorization)
//! - Bind server to listener
//! - Drain in-flight forwards on shutdown

use std::sync::Arc;

use axum::{body::Body, http::Request, middleware, routing::any, Router};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::authorize::{authorize_middleware, StaticTokenAuthorizer, TenantAuthorizer};
use crate::config::ForwarderConfig;
use crate::http::receive::{receive, Forwarder};
use crate::http::request::{request_id, MakeRequestUuid, X_REQUEST_ID};
use crate::lifecycle::ShutdownSignal;

/// HTTP server for the forwarder.
pub struct HttpServer {
    router: Router,
    config: ForwarderConfig,
}

impl HttpServer {
    /// Create a server that resolves tenants from the configured token table.
    pub fn new(config: ForwarderConfig) -> Self {
        let authorizer = StaticTokenAuthorizer::from_config(&config.tenants);
        if authorizer.is_empty() {
            tracing::warn!("No tenant tokens configured; every request will be rejected");
        } else {
            tracing::info!(tenants = authorizer.len(), "Tenant tokens loaded");
        }
        Self::with_authorizer(config, Arc::new(authorizer))
    }

    /// Create a server with a custom tenant authorizer.
    pub fn with_authorizer(config: ForwarderConfig, authorizer: Arc<dyn TenantAuthorizer>) -> Self {
        let forwarder = Arc::new(Forwarder::with_timeout(
            config.forward.url.clone(),
            config.forward.timeout(),
        ));
        let router = Self::build_router(forwarder, authorizer);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(forwarder: Arc<Forwarder>, authorizer: Arc<dyn TenantAuthorizer>) -> Router {
        receive_router(forwarder)
            .layer(middleware::from_fn_with_state(authorizer, authorize_middleware))
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuid))
                    .layer(TraceLayer::new_for_http().make_span_with(
                        |request: &Request<Body>| {
                            tracing::info_span!(
                                "request",
                                method = %request.method(),
                                path = %request.uri().path(),
                                request_id = %request_id(request),
                            )
                        },
                    ))
                    .layer(PropagateRequestIdLayer::new(X_REQUEST_ID)),
            )
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(self, listener: TcpListener, shutdown: ShutdownSignal) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            forward_url = %self.config.forward.url,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown.recv())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// The bare receive route, with no authorization in front of it.
///
/// Callers that bring their own authentication must insert a
/// [`TenantId`](crate::authorize::TenantId) into the request extensions
/// before the handler runs; requests without one are answered with 500.
pub fn receive_router(forwarder: Arc<Forwarder>) -> Router {
    Router::new()
        .route("/", any(receive))
        .route("/{*path}", any(receive))
        .with_state(forwarder)
}
