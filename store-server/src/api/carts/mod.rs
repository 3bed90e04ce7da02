//! Cart API module
//!
//! # Routes
//!
//! | Path | Method | Description |
//! |------|--------|-------------|
//! | /api/carts | POST | create a cart session |
//! | /api/carts/{session} | GET | priced cart summary |
//! | /api/carts/{session}/summary | GET | alias for the summary |
//! | /api/carts/{session} | DELETE | empty the cart |
//! | /api/carts/{session}/items | POST | add an item |
//! | /api/carts/{session}/items/{index} | PATCH | change quantity by delta |
//! | /api/carts/{session}/items/{index} | DELETE | remove a line |
//! | /api/carts/{session}/coupon | PUT | apply a coupon code |
//! | /api/carts/{session}/coupon | DELETE | remove the coupon |

mod handler;

use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::core::ServerState;

pub use handler::CartSummary;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/carts", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", post(handler::create))
        .route("/{session}", get(handler::summary).delete(handler::clear))
        .route("/{session}/summary", get(handler::summary))
        .route("/{session}/items", post(handler::add_item))
        .route(
            "/{session}/items/{index}",
            delete(handler::remove_item).patch(handler::update_quantity),
        )
        .route(
            "/{session}/coupon",
            put(handler::apply_coupon).delete(handler::remove_coupon),
        )
}
