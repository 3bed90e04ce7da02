//! Money arithmetic
//!
//! Uses rust_decimal for precise calculations, stores as f64.
//! All monetary results are rounded to 2 decimal places, half-up.

use crate::cart::LineItem;
use crate::models::{Coupon, CouponKind};
use rust_decimal::prelude::*;

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Convert f64 to Decimal for calculation
#[inline]
pub(crate) fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
pub(crate) fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// Line total: unit price x quantity
pub fn line_total(unit_price: f64, quantity: i32) -> f64 {
    to_f64(to_decimal(unit_price) * Decimal::from(quantity))
}

/// Sum of line totals. Defined as 0 for the empty cart and invariant
/// under reordering of the lines.
pub fn compute_subtotal(items: &[LineItem]) -> f64 {
    let sum = items
        .iter()
        .map(|i| to_decimal(i.unit_price) * Decimal::from(i.quantity))
        .sum::<Decimal>();
    to_f64(sum)
}

/// Discount amount for a coupon that already passed validation
///
/// Percentage: `subtotal * value / 100`; fixed: `value`. The result is
/// clamped to the subtotal so the total never goes negative, whatever
/// the configured value.
pub fn compute_discount(subtotal: f64, coupon: &Coupon) -> f64 {
    let subtotal = to_decimal(subtotal);
    let raw = match coupon.kind {
        CouponKind::Percentage => subtotal * to_decimal(coupon.value) / Decimal::ONE_HUNDRED,
        CouponKind::Fixed => to_decimal(coupon.value),
    };
    to_f64(raw.min(subtotal).max(Decimal::ZERO))
}
