//! Pricing Engine
//!
//! Pure computation of subtotal, validated discount, and total from a
//! cart snapshot and an optional coupon lookup result. The engine has
//! no I/O: coupon lookup, persistence of the applied code, and
//! clearing a rejected code are the caller's responsibility. Coupons
//! are re-validated on every recomputation rather than trusting any
//! cached state.

mod calculator;

pub use calculator::{compute_discount, compute_subtotal, line_total};

use crate::cart::Cart;
use crate::error::ErrorCode;
use crate::models::Coupon;
use calculator::{to_decimal, to_f64};
use serde::{Deserialize, Serialize};

/// Why a coupon could not be applied
///
/// The numeric pricing result is identical for every cause (no
/// discount); the distinction exists only for the user-facing message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CouponRejection {
    /// No coupon record exists for the code
    NotFound,
    /// The record exists but is disabled
    Inactive,
    /// The record expired before `now`
    Expired,
    /// The cart subtotal is below the coupon's minimum order amount
    BelowMinimum { minimum: f64 },
}

impl CouponRejection {
    /// Message shown to the shopper
    pub fn user_message(&self) -> String {
        match self {
            Self::NotFound => "Coupon code not found".to_string(),
            Self::Inactive => "This coupon is no longer active".to_string(),
            Self::Expired => "This coupon has expired".to_string(),
            Self::BelowMinimum { minimum } => {
                format!("Order must be at least {:.2} to use this coupon", minimum)
            }
        }
    }

    /// Matching error code for API responses
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::NotFound => ErrorCode::CouponNotFound,
            Self::Inactive => ErrorCode::CouponInactive,
            Self::Expired => ErrorCode::CouponExpired,
            Self::BelowMinimum { .. } => ErrorCode::CouponBelowMinimum,
        }
    }
}

/// Check whether a coupon applies to a cart with the given subtotal
///
/// Valid iff the coupon is active, not expired at `now_ms`
/// (`expires_at == now_ms` is still valid), and the subtotal meets the
/// minimum order amount. A coupon failing any clause degrades to "no
/// discount" exactly like a missing record.
pub fn validate_coupon(coupon: &Coupon, subtotal: f64, now_ms: i64) -> Result<(), CouponRejection> {
    if !coupon.is_active {
        return Err(CouponRejection::Inactive);
    }
    if let Some(expires_at) = coupon.expires_at
        && expires_at < now_ms
    {
        return Err(CouponRejection::Expired);
    }
    if subtotal < coupon.min_order_amount {
        return Err(CouponRejection::BelowMinimum {
            minimum: coupon.min_order_amount,
        });
    }
    Ok(())
}

/// Computed pricing for a cart snapshot
///
/// Invariants: `total = subtotal - discount`, `0 <= discount <= subtotal`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingResult {
    pub subtotal: f64,
    pub discount: f64,
    pub total: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applied_coupon_code: Option<String>,
}

/// What happened to the coupon during pricing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CouponOutcome {
    /// No coupon was supplied
    NotApplied,
    /// The coupon validated and its discount is in the result
    Applied,
    /// The coupon failed validation; the stored reference should be
    /// cleared by the caller
    Rejected(CouponRejection),
}

/// Pricing result plus the coupon verdict
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub result: PricingResult,
    pub outcome: CouponOutcome,
}

impl Quote {
    /// True when the caller should drop its stored coupon reference
    pub fn should_clear_coupon(&self) -> bool {
        matches!(self.outcome, CouponOutcome::Rejected(_))
    }
}

/// Price a cart against an optional coupon lookup result
///
/// Pure over its inputs and idempotent: pricing the same cart and
/// coupon twice yields the same quote.
pub fn price_cart(cart: &Cart, coupon: Option<&Coupon>, now_ms: i64) -> Quote {
    let subtotal = compute_subtotal(&cart.items);

    let (discount, applied_code, outcome) = match coupon {
        None => (0.0, None, CouponOutcome::NotApplied),
        Some(c) => match validate_coupon(c, subtotal, now_ms) {
            Ok(()) => (
                compute_discount(subtotal, c),
                Some(c.code.clone()),
                CouponOutcome::Applied,
            ),
            Err(rejection) => (0.0, None, CouponOutcome::Rejected(rejection)),
        },
    };

    let total = to_f64(to_decimal(subtotal) - to_decimal(discount));

    Quote {
        result: PricingResult {
            subtotal,
            discount,
            total,
            applied_coupon_code: applied_code,
        },
        outcome,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::LineItem;
    use crate::models::CouponKind;

    fn cart(lines: &[(f64, i32)]) -> Cart {
        let mut cart = Cart::new();
        for (i, (price, qty)) in lines.iter().enumerate() {
            cart.add_item(LineItem {
                product_id: format!("p{}", i),
                name: format!("Product {}", i),
                unit_price: *price,
                quantity: *qty,
                variant: None,
            })
            .unwrap();
        }
        cart
    }

    fn coupon(kind: CouponKind, value: f64, min_order: f64) -> Coupon {
        Coupon {
            id: None,
            code: "TEST".to_string(),
            kind,
            value,
            expires_at: None,
            min_order_amount: min_order,
            is_active: true,
            created_at: None,
        }
    }

    const NOW: i64 = 1_700_000_000_000;

    #[test]
    fn test_percentage_scenario() {
        // price 100 x2, 10% coupon => subtotal 200, discount 20, total 180
        let quote = price_cart(
            &cart(&[(100.0, 2)]),
            Some(&coupon(CouponKind::Percentage, 10.0, 0.0)),
            NOW,
        );
        assert_eq!(quote.result.subtotal, 200.0);
        assert_eq!(quote.result.discount, 20.0);
        assert_eq!(quote.result.total, 180.0);
        assert_eq!(quote.result.applied_coupon_code.as_deref(), Some("TEST"));
        assert_eq!(quote.outcome, CouponOutcome::Applied);
    }

    #[test]
    fn test_fixed_overshoot_clamps_to_zero_total() {
        // price 50 x1, fixed 100 coupon => discount clamped to 50, total 0
        let quote = price_cart(
            &cart(&[(50.0, 1)]),
            Some(&coupon(CouponKind::Fixed, 100.0, 0.0)),
            NOW,
        );
        assert_eq!(quote.result.subtotal, 50.0);
        assert_eq!(quote.result.discount, 50.0);
        assert_eq!(quote.result.total, 0.0);
    }

    #[test]
    fn test_below_minimum_rejected() {
        // price 30 x1, 10% coupon with min 100 => no discount
        let quote = price_cart(
            &cart(&[(30.0, 1)]),
            Some(&coupon(CouponKind::Percentage, 10.0, 100.0)),
            NOW,
        );
        assert_eq!(quote.result.discount, 0.0);
        assert_eq!(quote.result.total, 30.0);
        assert_eq!(quote.result.applied_coupon_code, None);
        assert_eq!(
            quote.outcome,
            CouponOutcome::Rejected(CouponRejection::BelowMinimum { minimum: 100.0 })
        );
        assert!(quote.should_clear_coupon());
    }

    #[test]
    fn test_minimum_boundary_is_inclusive() {
        let c = coupon(CouponKind::Percentage, 10.0, 100.0);
        assert_eq!(
            validate_coupon(&c, 99.99, NOW),
            Err(CouponRejection::BelowMinimum { minimum: 100.0 })
        );
        assert_eq!(validate_coupon(&c, 100.0, NOW), Ok(()));
    }

    #[test]
    fn test_expiry_boundary_is_inclusive() {
        let mut c = coupon(CouponKind::Percentage, 10.0, 0.0);
        c.expires_at = Some(NOW);
        assert_eq!(validate_coupon(&c, 50.0, NOW), Ok(()));

        c.expires_at = Some(NOW - 1);
        assert_eq!(validate_coupon(&c, 50.0, NOW), Err(CouponRejection::Expired));
    }

    #[test]
    fn test_inactive_rejected() {
        let mut c = coupon(CouponKind::Fixed, 5.0, 0.0);
        c.is_active = false;
        assert_eq!(validate_coupon(&c, 50.0, NOW), Err(CouponRejection::Inactive));
    }

    #[test]
    fn test_no_coupon() {
        let quote = price_cart(&cart(&[(15.5, 2)]), None, NOW);
        assert_eq!(quote.result.subtotal, 31.0);
        assert_eq!(quote.result.discount, 0.0);
        assert_eq!(quote.result.total, 31.0);
        assert_eq!(quote.outcome, CouponOutcome::NotApplied);
        assert!(!quote.should_clear_coupon());
    }

    #[test]
    fn test_empty_cart() {
        let quote = price_cart(&Cart::new(), None, NOW);
        assert_eq!(quote.result.subtotal, 0.0);
        assert_eq!(quote.result.total, 0.0);
    }

    #[test]
    fn test_idempotent_over_same_inputs() {
        let cart = cart(&[(100.0, 2), (9.99, 3)]);
        let c = coupon(CouponKind::Percentage, 15.0, 0.0);
        let first = price_cart(&cart, Some(&c), NOW);
        let second = price_cart(&cart, Some(&c), NOW);
        assert_eq!(first, second);
    }

    #[test]
    fn test_invariants_hold_across_kinds() {
        let carts = [cart(&[(0.01, 1)]), cart(&[(19.99, 3), (5.0, 1)])];
        let coupons = [
            coupon(CouponKind::Percentage, 0.0, 0.0),
            coupon(CouponKind::Percentage, 100.0, 0.0),
            coupon(CouponKind::Fixed, 0.0, 0.0),
            coupon(CouponKind::Fixed, 1000.0, 0.0),
        ];
        for cart in &carts {
            for c in &coupons {
                let q = price_cart(cart, Some(c), NOW);
                assert!(q.result.discount >= 0.0);
                assert!(q.result.discount <= q.result.subtotal);
                assert_eq!(
                    q.result.total,
                    to_f64(to_decimal(q.result.subtotal) - to_decimal(q.result.discount))
                );
                assert!(q.result.total >= 0.0);
            }
        }
    }

    #[test]
    fn test_rejection_messages_differ_but_pricing_does_not() {
        let cart = cart(&[(30.0, 1)]);
        let mut inactive = coupon(CouponKind::Percentage, 10.0, 0.0);
        inactive.is_active = false;
        let mut expired = coupon(CouponKind::Percentage, 10.0, 0.0);
        expired.expires_at = Some(NOW - 1);
        let below = coupon(CouponKind::Percentage, 10.0, 100.0);

        let quotes: Vec<Quote> = [&inactive, &expired, &below]
            .iter()
            .map(|c| price_cart(&cart, Some(*c), NOW))
            .collect();

        // Identical numbers for every rejection cause
        for q in &quotes {
            assert_eq!(q.result, quotes[0].result);
        }
        // Distinct user messages
        let messages: Vec<String> = quotes
            .iter()
            .map(|q| match &q.outcome {
                CouponOutcome::Rejected(r) => r.user_message(),
                _ => panic!("expected rejection"),
            })
            .collect();
        assert_ne!(messages[0], messages[1]);
        assert_ne!(messages[1], messages[2]);
    }
}
