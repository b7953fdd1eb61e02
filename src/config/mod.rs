//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks, rule compilation)
//!     → GatewayConfig (validated, immutable)
//!     → compiled into the shared gateway state
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs loads new config
//!     → validation.rs validates
//!     → atomic swap of the compiled redirect table
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require full reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::GatewayConfig;
pub use schema::ListenerConfig;
pub use schema::RedirectRule;
pub use schema::{AdminConfig, CodeInputConfig, ObservabilityConfig, TimeoutConfig};
