//! Token-based tenant resolution.

use std::collections::HashMap;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::authorize::TenantId;
use crate::config::TenantTokenConfig;

/// Authorization failures, all reported to the caller as 401.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthorizeError {
    #[error("missing bearer token")]
    MissingToken,

    #[error("malformed authorization header")]
    MalformedHeader,

    #[error("unknown token")]
    UnknownToken,
}

impl IntoResponse for AuthorizeError {
    fn into_response(self) -> Response {
        (StatusCode::UNAUTHORIZED, self.to_string()).into_response()
    }
}

/// Resolves a bearer token to the tenant that owns it.
pub trait TenantAuthorizer: Send + Sync + 'static {
    fn authorize(&self, token: &str) -> Result<TenantId, AuthorizeError>;
}

/// Fixed token table loaded from configuration.
#[derive(Debug, Default, Clone)]
pub struct StaticTokenAuthorizer {
    tokens: HashMap<String, TenantId>,
}

impl StaticTokenAuthorizer {
    /// Entries with a blank tenant are skipped; validation reports them first.
    pub fn from_config(tenants: &[TenantTokenConfig]) -> Self {
        let tokens = tenants
            .iter()
            .filter_map(|t| TenantId::new(t.tenant.clone()).map(|id| (t.token.clone(), id)))
            .collect();
        Self { tokens }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl TenantAuthorizer for StaticTokenAuthorizer {
    fn authorize(&self, token: &str) -> Result<TenantId, AuthorizeError> {
        if token.is_empty() {
            return Err(AuthorizeError::MissingToken);
        }
        self.tokens
            .get(token)
            .cloned()
            .ok_or(AuthorizeError::UnknownToken)
    }
}
