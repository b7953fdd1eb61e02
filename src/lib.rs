//! Documentation site gateway: ordered redirect rules and the one-time-code form.

pub mod admin;
pub mod code_input;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod redirect;
pub mod state;

pub use config::schema::GatewayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use redirect::{Redirect, RedirectTable};
