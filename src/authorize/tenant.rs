//! Resolved tenant identity.

use std::fmt;
use std::sync::Arc;

use axum::http::{Extensions, StatusCode};
use axum::response::{IntoResponse, Response};

/// Identifies the logical owner of a request. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TenantId(Arc<str>);

impl TenantId {
    /// Returns `None` for an empty or whitespace-only name.
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return None;
        }
        Some(Self(Arc::from(name)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Read the tenant the authorization layer attached to the request.
    pub fn from_extensions(extensions: &Extensions) -> Result<Self, MissingTenant> {
        extensions.get::<TenantId>().cloned().ok_or(MissingTenant)
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// No tenant was attached before the forward handler ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("request reached the receive handler without a resolved tenant")]
pub struct MissingTenant;

impl IntoResponse for MissingTenant {
    fn into_response(self) -> Response {
        tracing::error!(component = "receive", "{}", self);
        (StatusCode::INTERNAL_SERVER_ERROR, "missing tenant identity").into_response()
    }
}
