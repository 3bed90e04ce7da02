//! Coupon API module (admin back-office)
//!
//! # Routes
//!
//! | Path | Method | Description |
//! |------|--------|-------------|
//! | /api/coupons | GET | list all coupons |
//! | /api/coupons | POST | create a coupon |
//! | /api/coupons/by-code/{code} | GET | lookup by code |
//! | /api/coupons/{id} | GET/PUT/DELETE | single coupon |

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/coupons", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/by-code/{code}", get(handler::get_by_code))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
}
