//! Order API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{Order, OrderStatus, OrderStatusUpdate};

use crate::core::ServerState;
use crate::db::repository::OrderRepository;

const RESOURCE: &str = "order";

/// GET /api/orders - all orders, newest first
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Order>>> {
    let repo = OrderRepository::new(state.get_db());
    let orders = repo.find_all().await?;
    Ok(Json(orders))
}

/// GET /api/orders/:id - single order
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    let repo = OrderRepository::new(state.get_db());
    let order = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| {
            AppError::with_message(ErrorCode::OrderNotFound, format!("Order {} not found", id))
        })?;
    Ok(Json(order))
}

/// PATCH /api/orders/:id/status - move an order to a new status
pub async fn update_status(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<OrderStatusUpdate>,
) -> AppResult<Json<Order>> {
    let status: OrderStatus = payload
        .status
        .parse()
        .map_err(|_| {
            AppError::with_message(
                ErrorCode::OrderInvalidStatus,
                format!("Invalid order status: {}", payload.status),
            )
        })?;

    let repo = OrderRepository::new(state.get_db());
    let order = repo.update_status(&id, status).await?;
    state.bump_version(RESOURCE);
    Ok(Json(order))
}

/// PATCH /api/orders/:id/notified - record that the notification went out
pub async fn mark_notified(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    let repo = OrderRepository::new(state.get_db());
    let order = repo.mark_notified(&id).await?;
    state.bump_version(RESOURCE);
    Ok(Json(order))
}
