//! Tenant-tagging forward handler.
//!
//! # Responsibilities
//! - Accept authenticated write requests (POST only)
//! - Attach the tenant resolved by the authorization layer as `THANOS-TENANT`
//! - Stream the request body to the single forward target
//! - Translate upstream failures into client-visible status codes
//!
//! # Design Decisions
//! - One attempt per request: no retries, no buffering
//! - The upstream response body is never relayed back to the caller
//! - Success is an explicit `200 OK` with an empty body, whatever 2xx the
//!   upstream returned

use std::error::Error as StdError;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::{Request, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
};

use crate::authorize::TenantId;
use crate::observability::metrics;

/// Header carrying the tenant on the outbound request.
pub const TENANT_HEADER: &str = "THANOS-TENANT";

/// Upper bound for a single forward, connect through response headers.
pub const DEFAULT_FORWARD_TIMEOUT: Duration = Duration::from_secs(5);

/// Fixed message returned when the upstream answers outside 2xx.
pub const UPSTREAM_REJECTED_MESSAGE: &str = "upstream response status is not 200 OK";

/// Ways a single forward can fail.
#[derive(Debug, thiserror::Error)]
pub enum ForwardError {
    /// The outbound request could not be built (bad target, bad header value).
    #[error("{}", error_chain(.0))]
    Construction(reqwest::Error),

    /// Transport failure, timeout or cancellation while sending.
    #[error("{}", error_chain(.0))]
    Unreachable(reqwest::Error),

    /// The upstream answered with a non-2xx status.
    #[error("upstream response status is not 200 OK")]
    Rejected { status: StatusCode },
}

impl ForwardError {
    /// Status code reported to the original caller.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ForwardError::Construction(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ForwardError::Unreachable(_) | ForwardError::Rejected { .. } => StatusCode::BAD_GATEWAY,
        }
    }

    /// Metrics label for this failure.
    pub fn outcome(&self) -> &'static str {
        match self {
            ForwardError::Construction(_) => "construction_failed",
            ForwardError::Unreachable(_) => "upstream_unreachable",
            ForwardError::Rejected { .. } => "upstream_rejected",
        }
    }
}

impl IntoResponse for ForwardError {
    fn into_response(self) -> Response {
        (self.status_code(), self.to_string()).into_response()
    }
}

/// Relays write requests to one fixed upstream.
///
/// Cheap to share: the target is immutable and `reqwest::Client` pools
/// connections internally, so one instance serves every request for the
/// lifetime of the process.
#[derive(Debug, Clone)]
pub struct Forwarder {
    target: Arc<str>,
    client: reqwest::Client,
    timeout: Duration,
}

impl Forwarder {
    /// Create a forwarder with the default 5 second timeout.
    pub fn new(target: impl Into<String>) -> Self {
        Self::with_timeout(target, DEFAULT_FORWARD_TIMEOUT)
    }

    /// Create a forwarder with a custom per-request timeout.
    ///
    /// The target is not validated here; a malformed URL is reported as a
    /// [`ForwardError::Construction`] on first use.
    pub fn with_timeout(target: impl Into<String>, timeout: Duration) -> Self {
        Self {
            target: Arc::from(target.into()),
            client: reqwest::Client::new(),
            timeout,
        }
    }

    /// The upstream URL every request is relayed to.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// The per-request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Forward `body` for `tenant` and return the upstream's 2xx status.
    ///
    /// The body is streamed through as it arrives. Dropping the returned
    /// future aborts the outbound call.
    #[tracing::instrument(
        name = "forward",
        skip_all,
        fields(component = "receive", tenant = %tenant)
    )]
    pub async fn forward(&self, tenant: &TenantId, body: Body) -> Result<StatusCode, ForwardError> {
        let request = self
            .client
            .post(&*self.target)
            .timeout(self.timeout)
            .header(TENANT_HEADER, tenant.as_str())
            .body(reqwest::Body::wrap_stream(body.into_data_stream()))
            .build()
            .map_err(|e| {
                tracing::error!(error = %error_chain(&e), "failed to create forward request");
                ForwardError::Construction(e)
            })?;

        let response = self.client.execute(request).await.map_err(|e| {
            tracing::error!(
                error = %error_chain(&e),
                timeout = e.is_timeout(),
                "failed to forward request"
            );
            ForwardError::Unreachable(e)
        })?;

        let status = response.status();
        if !is_success(status) {
            tracing::error!(status = %status, "{}", UPSTREAM_REJECTED_MESSAGE);
            return Err(ForwardError::Rejected { status });
        }

        tracing::debug!(status = %status, "request forwarded");
        Ok(status)
    }
}

/// Any 2xx counts as accepted, not only 200.
fn is_success(status: StatusCode) -> bool {
    status.as_u16() / 100 == 2
}

/// Render an error with its sources, e.g. `error sending request: connection refused`.
fn error_chain(err: &(dyn StdError + 'static)) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !out.contains(&text) {
            out.push_str(": ");
            out.push_str(&text);
        }
        source = cause.source();
    }
    out
}

/// Axum handler: method gate, tenant lookup, forward, status translation.
pub async fn receive(State(forwarder): State<Arc<Forwarder>>, request: Request) -> Response {
    let start = Instant::now();

    if request.method() != Method::POST {
        metrics::record_forward("method_not_allowed", start);
        return StatusCode::METHOD_NOT_ALLOWED.into_response();
    }

    let (parts, body) = request.into_parts();
    let tenant = match TenantId::from_extensions(&parts.extensions) {
        Ok(tenant) => tenant,
        Err(missing) => {
            metrics::record_forward("missing_tenant", start);
            return missing.into_response();
        }
    };

    match forwarder.forward(&tenant, body).await {
        Ok(_) => {
            metrics::record_forward("forwarded", start);
            StatusCode::OK.into_response()
        }
        Err(e) => {
            metrics::record_forward(e.outcome(), start);
            e.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tenant() -> TenantId {
        TenantId::new("team-a").unwrap()
    }

    #[test]
    fn test_success_predicate_accepts_any_2xx() {
        for code in [200, 201, 202, 204, 299] {
            assert!(is_success(StatusCode::from_u16(code).unwrap()), "{code}");
        }
        for code in [100, 199, 300, 304, 404, 500, 503] {
            assert!(!is_success(StatusCode::from_u16(code).unwrap()), "{code}");
        }
    }

    #[test]
    fn test_rejected_maps_to_bad_gateway_with_fixed_message() {
        let err = ForwardError::Rejected { status: StatusCode::NOT_FOUND };
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(err.to_string(), UPSTREAM_REJECTED_MESSAGE);
        assert_eq!(err.outcome(), "upstream_rejected");
    }

    #[test]
    fn test_defaults() {
        let forwarder = Forwarder::new("http://127.0.0.1:19291/api/v1/receive");
        assert_eq!(forwarder.timeout(), Duration::from_secs(5));
        assert_eq!(forwarder.target(), "http://127.0.0.1:19291/api/v1/receive");
    }

    #[tokio::test]
    async fn test_malformed_target_is_a_construction_error() {
        let forwarder = Forwarder::new("not a url");
        let err = forwarder
            .forward(&tenant(), Body::from("payload"))
            .await
            .unwrap_err();

        assert!(matches!(err, ForwardError::Construction(_)));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.to_string().is_empty());
    }

    #[tokio::test]
    async fn test_non_post_is_rejected_before_tenant_lookup() {
        let forwarder = Arc::new(Forwarder::new("not a url"));
        let request = axum::http::Request::builder()
            .method(Method::GET)
            .uri("/receive")
            .body(Body::empty())
            .unwrap();

        let response = receive(State(forwarder), request).await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_missing_tenant_fails_fast() {
        let forwarder = Arc::new(Forwarder::new("http://127.0.0.1:1/"));
        let request = axum::http::Request::builder()
            .method(Method::POST)
            .uri("/receive")
            .body(Body::from("payload"))
            .unwrap();

        let response = receive(State(forwarder), request).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_construction_error_response_is_plain_text_500() {
        let forwarder = Arc::new(Forwarder::new("::bogus::"));
        let mut request = axum::http::Request::builder()
            .method(Method::POST)
            .uri("/receive")
            .body(Body::from("payload"))
            .unwrap();
        request.extensions_mut().insert(tenant());

        let response = receive(State(forwarder), request).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let content_type = response.headers().get(axum::http::header::CONTENT_TYPE).unwrap();
        assert!(content_type.to_str().unwrap().starts_with("text/plain"));
    }
}
