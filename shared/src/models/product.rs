//! Product Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Product entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub name: String,
    pub description: Option<String>,
    /// Image URL (a placeholder is substituted client-side when absent)
    pub image: Option<String>,
    /// Free-form category label used for storefront filtering
    pub category: Option<String>,
    /// Current unit price
    pub price: f64,
    /// Pre-sale price, shown struck through next to `price`
    pub original_price: Option<f64>,
    /// Display badge percentage ("-30%"), informational only; cart
    /// pricing always uses `price`
    pub discount_percent: Option<f64>,
    /// Average rating 0-5
    pub rating: Option<f64>,
    pub review_count: Option<i32>,
    pub stock: i32,
    /// Available color variants
    #[serde(default)]
    pub colors: Vec<String>,
    /// Available size variants
    #[serde(default)]
    pub sizes: Vec<String>,
    pub is_active: bool,
    pub created_at: Option<i64>,
}

/// Create product payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCreate {
    pub name: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub category: Option<String>,
    pub price: f64,
    pub original_price: Option<f64>,
    pub discount_percent: Option<f64>,
    pub rating: Option<f64>,
    pub review_count: Option<i32>,
    pub stock: Option<i32>,
    pub colors: Option<Vec<String>>,
    pub sizes: Option<Vec<String>>,
}

/// Update product payload
///
/// Absent fields are skipped during serialization so a partial update
/// merges without clearing the other fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_percent: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_count: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colors: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sizes: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// Storefront search filters (all optional, combined with AND)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductFilter {
    /// Substring match against name and description, case-insensitive
    pub q: Option<String>,
    pub category: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
}
