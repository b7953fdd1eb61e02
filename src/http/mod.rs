//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID, request span)
//!     → /healthz, code form routes, admin routes
//!     → fallback: redirect table lookup → 307/308 or 404
//! ```

pub mod code_form;
pub mod request;
pub mod server;

pub use code_form::CodeForm;
pub use request::{MakeRequestUuidV4, RequestIdExt, X_REQUEST_ID};
pub use server::{AppState, HttpServer};
pub use crate::state::GatewayState;
