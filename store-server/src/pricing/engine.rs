//! Coupon Engine
//!
//! Resolves coupon codes against the store and prices carts. Two entry
//! points with deliberately different failure policies:
//!
//! - [`CouponEngine::apply`] handles a code the shopper just typed.
//!   Store errors are surfaced: never accept a code we could not verify.
//! - [`CouponEngine::quote`] re-validates a remembered code on every
//!   read. Store errors degrade to an unverified quote with zero
//!   discount, so a flaky store cannot block browsing or checkout.

use serde::{Deserialize, Serialize};
use shared::cart::Cart;
use shared::error::{AppError, ErrorCode};
use shared::models::{Coupon, canonical_code};
use shared::pricing::{self, CouponOutcome, CouponRejection, PricingResult, Quote};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::db::repository::CouponRepository;

/// Coupon state attached to a cart quote
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CouponStatus {
    /// No coupon on the cart
    NotApplied,
    /// Coupon verified and discount included in the pricing
    Applied { code: String },
    /// Stored coupon failed re-validation; discount is zero and the
    /// message explains why
    Rejected {
        code: String,
        rejection: CouponRejection,
        message: String,
    },
    /// Store lookup failed; the code is kept but contributes nothing
    /// until it can be verified again
    Unverified { code: String },
}

impl CouponStatus {
    /// Whether the stored code should be dropped from the cart
    pub fn should_clear(&self) -> bool {
        matches!(self, CouponStatus::Rejected { .. })
    }
}

/// A priced cart with its coupon state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartQuote {
    pub pricing: PricingResult,
    pub coupon: CouponStatus,
}

/// Server-side coupon resolution
#[derive(Clone)]
pub struct CouponEngine {
    coupons: CouponRepository,
}

impl CouponEngine {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            coupons: CouponRepository::new(db),
        }
    }

    /// Price a cart, re-validating any remembered coupon code
    ///
    /// Never fails: a store error downgrades the coupon to
    /// [`CouponStatus::Unverified`] with zero discount.
    pub async fn quote(&self, cart: &Cart, stored_code: Option<&str>, now_ms: i64) -> CartQuote {
        let Some(code) = stored_code else {
            let quote = pricing::price_cart(cart, None, now_ms);
            return CartQuote {
                pricing: quote.result,
                coupon: CouponStatus::NotApplied,
            };
        };
        let code = canonical_code(code);

        let coupon = match self.coupons.find_by_code(&code).await {
            Ok(found) => found,
            Err(err) => {
                tracing::warn!(code = %code, error = %err, "Coupon lookup failed, quoting without discount");
                let quote = pricing::price_cart(cart, None, now_ms);
                return CartQuote {
                    pricing: quote.result,
                    coupon: CouponStatus::Unverified { code },
                };
            }
        };

        let quote = pricing::price_cart(cart, coupon.as_ref(), now_ms);
        CartQuote {
            coupon: Self::status_from_outcome(&code, &quote),
            pricing: quote.result,
        }
    }

    /// Verify a freshly entered coupon code against the cart
    ///
    /// Fails closed: a store error is returned to the shopper rather
    /// than accepting a code that could not be checked.
    pub async fn apply(
        &self,
        cart: &Cart,
        code: &str,
        now_ms: i64,
    ) -> Result<(Coupon, Quote), AppError> {
        let code = canonical_code(code);
        if code.is_empty() {
            return Err(AppError::validation("Coupon code is required"));
        }

        let coupon = self
            .coupons
            .find_by_code(&code)
            .await
            .map_err(AppError::from)?
            .ok_or_else(|| {
                AppError::with_message(
                    ErrorCode::CouponNotFound,
                    CouponRejection::NotFound.user_message(),
                )
            })?;

        let quote = pricing::price_cart(cart, Some(&coupon), now_ms);
        if let CouponOutcome::Rejected(ref rejection) = quote.outcome {
            return Err(AppError::with_message(
                rejection.error_code(),
                rejection.user_message(),
            ));
        }

        Ok((coupon, quote))
    }

    fn status_from_outcome(code: &str, quote: &Quote) -> CouponStatus {
        match &quote.outcome {
            CouponOutcome::NotApplied => CouponStatus::Rejected {
                code: code.to_string(),
                rejection: CouponRejection::NotFound,
                message: CouponRejection::NotFound.user_message(),
            },
            CouponOutcome::Applied => CouponStatus::Applied {
                code: code.to_string(),
            },
            CouponOutcome::Rejected(rejection) => CouponStatus::Rejected {
                code: code.to_string(),
                rejection: rejection.clone(),
                message: rejection.user_message(),
            },
        }
    }
}
