//! Redirect subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (path, query)
//!     → table.rs (ordered scan)
//!     → pattern.rs (match source, capture parameters)
//!     → pattern.rs (render destination)
//!     → Return: Redirect { location, status } or None
//!
//! Table Compilation (at startup and on reload):
//!     RedirectRule[]
//!     → Parse sources and destinations
//!     → Check destination parameters exist in source
//!     → Freeze as immutable RedirectTable
//! ```
//!
//! # Design Decisions
//! - Tables compiled once, immutable at runtime; reload swaps the whole table
//! - No regex in hot path (segment matching only)
//! - Deterministic: first match in list order wins

pub mod defaults;
pub mod pattern;
pub mod table;

pub use pattern::{Captures, Destination, PathPattern, PatternError};
pub use table::{Redirect, RedirectTable, RuleError};
