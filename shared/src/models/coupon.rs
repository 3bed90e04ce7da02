//! Coupon Model
//!
//! A coupon is a named discount rule owned by the admin back-office;
//! the pricing engine only reads it. Codes are canonicalized to
//! uppercase on write and on lookup.

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Discount kind enum
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CouponKind {
    /// `value` is a percentage of the subtotal (conventionally 0-100)
    Percentage,
    /// `value` is a fixed amount off
    Fixed,
}

/// Coupon entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coupon {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    /// Canonical (uppercase) coupon code
    pub code: String,
    pub kind: CouponKind,
    /// Discount value (percentage: 10 = 10%, fixed: 5.00 = 5.00 off)
    pub value: f64,
    /// Expiry instant (unix millis); absent means no expiry.
    /// `expires_at == now` is still valid.
    pub expires_at: Option<i64>,
    /// Minimum cart subtotal required to apply this coupon
    #[serde(default)]
    pub min_order_amount: f64,
    pub is_active: bool,
    pub created_at: Option<i64>,
}

/// Canonicalize a user-entered coupon code for storage and lookup
pub fn canonical_code(code: &str) -> String {
    code.trim().to_uppercase()
}

/// Create coupon payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CouponCreate {
    pub code: String,
    pub kind: CouponKind,
    pub value: f64,
    pub expires_at: Option<i64>,
    pub min_order_amount: Option<f64>,
    pub is_active: Option<bool>,
}

/// Update coupon payload
///
/// Absent fields are skipped during serialization so a partial update
/// merges without clearing the other fields. `expires_at` is doubly
/// optional: absent leaves the expiry alone, an explicit null removes
/// it, a value replaces it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CouponUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<CouponKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "serde_helpers::double_option"
    )]
    pub expires_at: Option<Option<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_order_amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_code() {
        assert_eq!(canonical_code("save10"), "SAVE10");
        assert_eq!(canonical_code("  Welcome5 "), "WELCOME5");
        assert_eq!(canonical_code("SAVE10"), "SAVE10");
    }

    #[test]
    fn test_update_expiry_tri_state() {
        let absent: CouponUpdate = serde_json::from_str("{}").unwrap();
        assert_eq!(absent.expires_at, None);
        assert_eq!(serde_json::to_string(&absent).unwrap(), "{}");

        let cleared: CouponUpdate = serde_json::from_str(r#"{"expires_at":null}"#).unwrap();
        assert_eq!(cleared.expires_at, Some(None));
        assert_eq!(
            serde_json::to_string(&cleared).unwrap(),
            r#"{"expires_at":null}"#
        );

        let replaced: CouponUpdate = serde_json::from_str(r#"{"expires_at":1234}"#).unwrap();
        assert_eq!(replaced.expires_at, Some(Some(1234)));
    }

    #[test]
    fn test_kind_serde() {
        let json = serde_json::to_string(&CouponKind::Percentage).unwrap();
        assert_eq!(json, "\"PERCENTAGE\"");
        let back: CouponKind = serde_json::from_str("\"FIXED\"").unwrap();
        assert_eq!(back, CouponKind::Fixed);
    }
}
