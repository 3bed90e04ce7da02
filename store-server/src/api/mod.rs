//! HTTP API
//!
//! One module per resource; each exposes a `router()` merged by
//! [`crate::routes::build_router`]. Handlers return
//! `AppResult<Json<T>>` so errors render through the unified error
//! envelope.

pub mod carts;
pub mod checkout;
pub mod coupons;
pub mod health;
pub mod orders;
pub mod products;
pub mod sync;
