//! Shared types for the storefront server
//!
//! Pure domain library: entity models, the cart and its mutation
//! rules, the pricing engine, and the unified error system. No I/O
//! lives here — persistence and HTTP belong to `store-server`.

pub mod cart;
pub mod error;
pub mod models;
pub mod pricing;

// Re-exports
pub use cart::{Cart, CartError, LineItem};
pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use pricing::{CouponOutcome, CouponRejection, PricingResult, Quote};
