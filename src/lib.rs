//! Tenant-tagging remote-write forwarder.
//!
//! Accepts authenticated write requests, tags them with the caller's tenant
//! (`THANOS-TENANT`) and streams them to a single upstream receive endpoint.

pub mod authorize;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use authorize::{TenantAuthorizer, TenantId};
pub use config::ForwarderConfig;
pub use http::{Forwarder, HttpServer};
pub use lifecycle::Shutdown;
