//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → Validate → Init logging/metrics → Compile table → Bind
//!
//! Shutdown (shutdown.rs):
//!     Ctrl+C or Shutdown::trigger → Stop accepting → Drain connections → Exit
//! ```
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Listeners start last (traffic only when ready)

pub mod shutdown;

pub use shutdown::Shutdown;
