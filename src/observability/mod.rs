//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events via `tracing`)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout (human-readable or JSON lines)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through every request span
//! - Metrics are cheap (atomic increments behind the `metrics` facade)
//! - Submitted codes never appear in logs or labels

pub mod logging;
pub mod metrics;
