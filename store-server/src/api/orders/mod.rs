//! Order API module (admin back-office)
//!
//! # Routes
//!
//! | Path | Method | Description |
//! |------|--------|-------------|
//! | /api/orders | GET | all orders, newest first |
//! | /api/orders/{id} | GET | single order |
//! | /api/orders/{id}/status | PATCH | move to a new status |
//! | /api/orders/{id}/notified | PATCH | mark the notification as sent |

mod handler;

use axum::{
    Router,
    routing::{get, patch},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/status", patch(handler::update_status))
        .route("/{id}/notified", patch(handler::mark_notified))
}
