//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (assign/propagate x-request-id)
//!     → authorize (resolve tenant from bearer token)
//!     → receive.rs (method gate, forward, status translation)
//!     → Send to client
//! ```

pub mod receive;
pub mod request;
pub mod server;

pub use receive::{ForwardError, Forwarder, TENANT_HEADER, UPSTREAM_REJECTED_MESSAGE};
pub use request::{MakeRequestUuid, X_REQUEST_ID};
pub use server::{receive_router, HttpServer};
