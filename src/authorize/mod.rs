//! Tenant authorization subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound request
//!     → middleware.rs (read bearer token from Authorization header)
//!     → token.rs (TenantAuthorizer resolves token → TenantId)
//!     → TenantId inserted into request extensions
//!     → http::receive reads it back and tags the forward
//! ```
//!
//! # Design Decisions
//! - The forward handler never authenticates; it only consumes a resolved tenant
//! - Authorizers are pluggable behind a trait object
//! - A missing tenant at the handler is a wiring defect and fails fast with 500

pub mod middleware;
pub mod tenant;
pub mod token;

pub use middleware::authorize_middleware;
pub use tenant::{MissingTenant, TenantId};
pub use token::{AuthorizeError, StaticTokenAuthorizer, TenantAuthorizer};
