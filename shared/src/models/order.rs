//! Order Model
//!
//! Orders are immutable snapshots taken at checkout: line items,
//! pricing result, and customer contact details. Only the status and
//! notification flag change afterwards, from the admin back-office.

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Order status enum
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Shipped,
    Completed,
    Cancelled,
}

impl std::str::FromStr for OrderStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "PENDING" => Ok(Self::Pending),
            "CONFIRMED" => Ok(Self::Confirmed),
            "SHIPPED" => Ok(Self::Shipped),
            "COMPLETED" => Ok(Self::Completed),
            "CANCELLED" => Ok(Self::Cancelled),
            _ => Err(()),
        }
    }
}

/// One line of a persisted order (snapshot, not a live cart line)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderLine {
    pub product_id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
    pub unit_price: f64,
    pub quantity: i32,
    pub line_total: f64,
}

/// Customer contact block captured at checkout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub address: String,
    pub notes: Option<String>,
}

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub customer: Customer,
    pub items: Vec<OrderLine>,
    pub subtotal: f64,
    pub discount: f64,
    /// Coupon code verified at checkout; absent when no coupon was
    /// applied or verification could not complete
    pub coupon_code: Option<String>,
    pub total: f64,
    pub status: OrderStatus,
    /// Whether the WhatsApp handoff message was confirmed sent
    pub whatsapp_sent: bool,
    pub created_at: i64,
}

/// Update order status payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderStatusUpdate {
    pub status: String,
}
