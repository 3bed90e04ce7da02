//! Entity Models

// Serde helpers
pub mod serde_helpers;

// Catalog
pub mod product;

// Pricing
pub mod coupon;

// Orders
pub mod order;

// Re-exports
pub use coupon::{canonical_code, Coupon, CouponCreate, CouponKind, CouponUpdate};
pub use order::{Customer, Order, OrderLine, OrderStatus, OrderStatusUpdate};
pub use product::{Product, ProductCreate, ProductFilter, ProductUpdate};
