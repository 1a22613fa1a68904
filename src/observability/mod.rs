//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Forward handler and middleware produce:
//!     → logging.rs (structured tracing events)
//!     → metrics.rs (outcome counters, latency histogram)
//!
//! Consumers:
//!     → stdout (fmt layer)
//!     → Prometheus scrape endpoint (optional)
//! ```
//!
//! # Design Decisions
//! - Every failed forward is logged with its error or upstream status
//! - Request ID (`x-request-id`) is attached to the HTTP span
//! - Metrics are cheap no-ops until a recorder is installed

pub mod logging;
pub mod metrics;
