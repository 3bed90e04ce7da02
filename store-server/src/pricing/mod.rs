//! Pricing Module
//!
//! Server-side coupon resolution on top of the pure pricing functions
//! in `shared::pricing`.

pub mod engine;

pub use engine::{CartQuote, CouponEngine, CouponStatus};
