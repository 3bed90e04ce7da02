//! Product API module
//!
//! # Routes
//!
//! | Path | Method | Description |
//! |------|--------|-------------|
//! | /api/products | GET | active products (storefront, filterable) |
//! | /api/products | POST | create product (admin) |
//! | /api/products/all | GET | every product incl. hidden (admin) |
//! | /api/products/categories | GET | distinct active categories |
//! | /api/products/{id} | GET/PUT/DELETE | single product |
//! | /api/products/{id}/stock | PATCH | set stock level (admin) |
//! | /api/products/{id}/active | PATCH | show/hide on storefront (admin) |

mod handler;

use axum::{
    Router,
    routing::{get, patch},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/products", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/all", get(handler::list_all))
        .route("/categories", get(handler::categories))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .route("/{id}/stock", patch(handler::update_stock))
        .route("/{id}/active", patch(handler::set_active))
}
