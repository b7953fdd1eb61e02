//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, timeout, request ID)
//! - Bind server to listener
//! - Answer unrouted paths from the redirect table
//! - Apply configuration reloads atomically
//! - Observability (metrics, correlation IDs)

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderValue, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use arc_swap::ArcSwap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::admin::setup_admin_router;
use crate::config::GatewayConfig;
use crate::http::code_form;
use crate::http::request::{make_request_span, MakeRequestUuidV4};
use crate::lifecycle::shutdown::wait_for_shutdown;
use crate::observability::metrics;
use crate::redirect::{Redirect, RuleError};
use crate::state::GatewayState;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub inner: Arc<ArcSwap<GatewayState>>,
}

impl AppState {
    pub fn new(state: GatewayState) -> Self {
        Self {
            inner: Arc::new(ArcSwap::from_pointee(state)),
        }
    }

    /// Replace the live state with one built from `config`. The current state
    /// stays in place when the new rules do not compile.
    pub fn reload(&self, config: GatewayConfig) -> Result<(), RuleError> {
        self.apply(GatewayState::from_config(config)?);
        Ok(())
    }

    /// Swap in a compiled state. The form keeps the path the router was built
    /// with, since routes cannot move without a restart.
    pub fn apply(&self, next: GatewayState) {
        let current_path = self.inner.load().form_path().to_string();
        let next = if next.form_path() != current_path {
            tracing::warn!(
                current = %current_path,
                requested = %next.form_path(),
                "code_input.form_path changes take effect on restart"
            );
            next.with_form_path(&current_path)
        } else {
            next
        };
        tracing::info!(rules = next.table.len(), slots = next.form.slots(), "Configuration applied");
        self.inner.store(Arc::new(next));
    }
}

/// HTTP server for the gateway.
pub struct HttpServer {
    router: Router,
    state: AppState,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: GatewayConfig) -> Result<Self, RuleError> {
        let gateway = GatewayState::from_config(config.clone())?;
        tracing::info!(
            rules = gateway.table.len(),
            code_slots = gateway.form.slots(),
            "Redirect table compiled"
        );

        let state = AppState::new(gateway);
        let router = Self::build_router(&config, state.clone());
        Ok(Self { router, state })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        let form_path = config.code_input.form_path.as_str();
        let mut router = Router::new()
            .route("/healthz", get(healthz))
            .route(form_path, get(code_form::show_form).post(code_form::submit_code))
            .fallback(redirect_handler)
            .with_state(state.clone());

        if config.admin.enabled {
            router = router.merge(setup_admin_router(state));
        }

        router
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(TraceLayer::new_for_http().make_span_with(make_request_span::<Body>))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV4))
    }

    /// Shared state, for applying reloads from outside the server.
    pub fn state(&self) -> AppState {
        self.state.clone()
    }

    /// Run the server until a shutdown signal arrives, applying configuration
    /// updates as they come in.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<GatewayState>,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let reload_state = self.state.clone();
        let reloader = tokio::spawn(async move {
            while let Some(next) = config_updates.recv().await {
                reload_state.apply(next);
            }
        });

        let result = axum::serve(listener, self.router)
            .with_graceful_shutdown(wait_for_shutdown(shutdown))
            .await;

        reloader.abort();
        tracing::info!("HTTP server stopped");
        result
    }
}

async fn healthz() -> &'static str {
    "ok"
}

/// Fallback handler: redirect when a rule matches, 404 otherwise.
async fn redirect_handler(State(state): State<AppState>, uri: Uri) -> Response {
    let start = Instant::now();
    let inner = state.inner.load();

    match inner.table.resolve(uri.path(), uri.query()) {
        Some(redirect) => {
            tracing::debug!(
                rule = redirect.rule,
                path = %uri.path(),
                status = redirect.status.as_u16(),
                location = %redirect.location,
                "Redirecting"
            );
            metrics::record_request("redirect", redirect.status.as_u16(), start);
            redirect_response(&redirect)
        }
        None => {
            tracing::debug!(path = %uri.path(), "No redirect matched");
            metrics::record_request("not_found", StatusCode::NOT_FOUND.as_u16(), start);
            (StatusCode::NOT_FOUND, "Not Found").into_response()
        }
    }
}

fn redirect_response(redirect: &Redirect) -> Response {
    match HeaderValue::from_str(&redirect.location) {
        Ok(location) => (redirect.status, [(header::LOCATION, location)]).into_response(),
        Err(e) => {
            tracing::error!(rule = redirect.rule, error = %e, "Rendered location is not a valid header value");
            (StatusCode::INTERNAL_SERVER_ERROR, "Invalid redirect target").into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;
    use crate::config::RedirectRule;
    use tower::ServiceExt;

    fn app(config: &GatewayConfig) -> (Router, AppState) {
        let state = AppState::new(GatewayState::from_config(config.clone()).unwrap());
        (HttpServer::build_router(config, state.clone()), state)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_fallback_redirects() {
        let (router, _) = app(&GatewayConfig::default());
        let res = router.oneshot(get("/guides/cheatsheet/a/b")).await.unwrap();
        assert_eq!(res.status(), StatusCode::PERMANENT_REDIRECT);
        assert_eq!(res.headers()[header::LOCATION], "/resources/cheatsheets/a/b");
        assert!(res.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn test_fallback_not_found() {
        let (router, _) = app(&GatewayConfig::default());
        let res = router.oneshot(get("/nothing/here")).await.unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_healthz_not_redirected() {
        let mut config = GatewayConfig::default();
        config.redirects = vec![RedirectRule::new("/:all*", "/elsewhere", false)];
        let (router, _) = app(&config);
        let res = router.oneshot(get("/healthz")).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_reload_swaps_table() {
        let (router, state) = app(&GatewayConfig::default());

        let mut config = GatewayConfig::default();
        config.redirects = vec![RedirectRule::new("/x", "/y", true)];
        config.code_input.slots = 8;
        state.reload(config).unwrap();

        let res = router.clone().oneshot(get("/x")).await.unwrap();
        assert_eq!(res.status(), StatusCode::PERMANENT_REDIRECT);
        assert_eq!(state.inner.load().form.slots(), 8);

        let mut broken = GatewayConfig::default();
        broken.redirects = vec![RedirectRule::new("x", "/y", true)];
        assert!(state.reload(broken).is_err());
        let res = router.oneshot(get("/x")).await.unwrap();
        assert_eq!(res.status(), StatusCode::PERMANENT_REDIRECT);
    }

    #[tokio::test]
    async fn test_reload_keeps_routed_form_path() {
        let (router, state) = app(&GatewayConfig::default());

        let mut config = GatewayConfig::default();
        config.code_input.form_path = "/login/code".into();
        state.reload(config).unwrap();
        assert_eq!(state.inner.load().form_path(), "/auth/code");

        let res = router.clone().oneshot(get("/auth/code")).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let body = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let page = String::from_utf8(body.to_vec()).unwrap();
        assert!(page.contains(r#"action="/auth/code""#));
        assert!(!page.contains("/login/code"));

        let post = Request::builder()
            .method("POST")
            .uri("/auth/code")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("code=123456"))
            .unwrap();
        let res = router.oneshot(post).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }
}
