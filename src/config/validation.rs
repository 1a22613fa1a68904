//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check the forward target is an absolute http(s) URL
//! - Validate value ranges and socket addresses
//! - Detect blank or duplicate tenant tokens
//! - Reject tenant names that cannot travel in a header value
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Pure function: &ForwarderConfig → Result<(), Vec<ValidationError>>

use std::collections::HashSet;
use std::net::SocketAddr;

use axum::http::HeaderValue;

use crate::config::schema::ForwarderConfig;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("forward.url is required")]
    MissingForwardUrl,

    #[error("forward.url {url:?} is invalid: {reason}")]
    InvalidForwardUrl { url: String, reason: String },

    #[error("forward.url scheme {scheme:?} is not http or https")]
    UnsupportedScheme { scheme: String },

    #[error("forward.timeout_secs must be greater than zero")]
    ZeroTimeout,

    #[error("{field} {value:?} is not a socket address")]
    InvalidAddress { field: &'static str, value: String },

    #[error("tenants[{index}] has an empty token")]
    EmptyToken { index: usize },

    #[error("tenants[{index}] has an empty tenant name")]
    EmptyTenant { index: usize },

    #[error("tenants[{index}] tenant name is not a valid header value")]
    InvalidTenant { index: usize },

    #[error("tenants[{index}] reuses a token already assigned to another tenant")]
    DuplicateToken { index: usize },
}

pub fn validate_config(config: &ForwarderConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let forward = &config.forward;
    if forward.url.trim().is_empty() {
        errors.push(ValidationError::MissingForwardUrl);
    } else {
        match url::Url::parse(&forward.url) {
            Ok(parsed) if !matches!(parsed.scheme(), "http" | "https") => {
                errors.push(ValidationError::UnsupportedScheme {
                    scheme: parsed.scheme().to_string(),
                });
            }
            Ok(_) => {}
            Err(e) => errors.push(ValidationError::InvalidForwardUrl {
                url: forward.url.clone(),
                reason: e.to_string(),
            }),
        }
    }

    if forward.timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    check_address(&mut errors, "listener.bind_address", &config.listener.bind_address);
    if config.observability.metrics_enabled {
        check_address(
            &mut errors,
            "observability.metrics_address",
            &config.observability.metrics_address,
        );
    }

    let mut seen = HashSet::new();
    for (index, entry) in config.tenants.iter().enumerate() {
        if entry.token.is_empty() {
            errors.push(ValidationError::EmptyToken { index });
        } else if !seen.insert(entry.token.as_str()) {
            errors.push(ValidationError::DuplicateToken { index });
        }
        if entry.tenant.trim().is_empty() {
            errors.push(ValidationError::EmptyTenant { index });
        } else if HeaderValue::from_str(&entry.tenant).is_err() {
            errors.push(ValidationError::InvalidTenant { index });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_address(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field,
            value: value.to_string(),
        });
    }
}
