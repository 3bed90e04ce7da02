//! Checkout API module
//!
//! Single route: POST /api/checkout. The heavy lifting lives in
//! [`crate::checkout`], which the integration tests drive directly.

use axum::{Json, Router, extract::State, routing::post};
use shared::error::AppResult;

use crate::checkout::{CheckoutRequest, CheckoutResponse, perform_checkout};
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/checkout", post(checkout))
}

/// POST /api/checkout - turn the cart session into an order
pub async fn checkout(
    State(state): State<ServerState>,
    Json(payload): Json<CheckoutRequest>,
) -> AppResult<Json<CheckoutResponse>> {
    let response = perform_checkout(&state, payload).await?;
    Ok(Json(response))
}
