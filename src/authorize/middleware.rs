//! Authorization middleware.
//! Resolves the caller's tenant and attaches it to the request.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::authorize::{AuthorizeError, TenantAuthorizer, TenantId};

pub async fn authorize_middleware(
    State(authorizer): State<Arc<dyn TenantAuthorizer>>,
    mut request: Request,
    next: Next,
) -> Response {
    let tenant = match resolve_tenant(authorizer.as_ref(), request.headers()) {
        Ok(tenant) => tenant,
        Err(e) => {
            tracing::warn!(error = %e, path = %request.uri().path(), "Rejected unauthorized request");
            return e.into_response();
        }
    };

    request.extensions_mut().insert(tenant);
    next.run(request).await
}

fn resolve_tenant(
    authorizer: &dyn TenantAuthorizer,
    headers: &HeaderMap,
) -> Result<TenantId, AuthorizeError> {
    let token = bearer_token(headers)?;
    authorizer.authorize(token)
}

fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthorizeError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthorizeError::MissingToken)?
        .to_str()
        .map_err(|_| AuthorizeError::MalformedHeader)?;

    let (scheme, token) = value
        .split_once(' ')
        .ok_or(AuthorizeError::MalformedHeader)?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthorizeError::MalformedHeader);
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(AuthorizeError::MissingToken);
    }
    Ok(token)
}
