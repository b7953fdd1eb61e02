use axum::{
    body::Body,
    extract::State,
    http::{header::AUTHORIZATION, Request, StatusCode},
    middleware::Next,
    response::Response,
};
use crate::http::server::AppState;

/// Bearer-token check against `admin.api_key` of the live configuration.
pub async fn admin_auth_middleware(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let authorized = {
        let inner = state.inner.load();
        request
            .headers()
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .is_some_and(|token| token == inner.config.admin.api_key)
    };

    if authorized {
        Ok(next.run(request).await)
    } else {
        tracing::warn!(path = %request.uri().path(), "Unauthorized admin request");
        Err(StatusCode::UNAUTHORIZED)
    }
}
