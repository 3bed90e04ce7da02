//! Sync API module
//!
//! Exposes the per-resource version counters so clients can cheaply
//! decide whether their cached catalog is stale.

use std::collections::BTreeMap;

use axum::{Json, Router, extract::State, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/sync/versions", get(versions))
}

/// GET /api/sync/versions - current version per resource
pub async fn versions(State(state): State<ServerState>) -> Json<BTreeMap<String, u64>> {
    Json(state.resource_versions.snapshot())
}
