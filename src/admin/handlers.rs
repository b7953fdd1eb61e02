use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use crate::config::RedirectRule;
use crate::http::server::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct SystemStatus {
    pub version: String,
    pub status: String,
    pub rules: usize,
    pub code_slots: usize,
}

#[derive(Debug, Deserialize)]
pub struct ResolveParams {
    pub path: String,
    #[serde(default)]
    pub query: Option<String>,
}

/// What the table does for a path. `rule` is `None` for pass-through.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResolveOutcome {
    pub path: String,
    pub rule: Option<usize>,
    pub location: Option<String>,
    pub status: Option<u16>,
}

pub async fn get_status(State(state): State<AppState>) -> Json<SystemStatus> {
    let inner = state.inner.load();
    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION").to_string(),
        status: "operational".to_string(),
        rules: inner.table.len(),
        code_slots: inner.form.slots(),
    })
}

pub async fn get_rules(State(state): State<AppState>) -> Json<Vec<RedirectRule>> {
    let inner = state.inner.load();
    Json(inner.table.rules().cloned().collect())
}

pub async fn get_resolve(
    State(state): State<AppState>,
    Query(params): Query<ResolveParams>,
) -> Json<ResolveOutcome> {
    let inner = state.inner.load();
    let redirect = inner.table.resolve(&params.path, params.query.as_deref());
    Json(ResolveOutcome {
        path: params.path,
        rule: redirect.as_ref().map(|r| r.rule),
        location: redirect.as_ref().map(|r| r.location.clone()),
        status: redirect.as_ref().map(|r| r.status.as_u16()),
    })
}
