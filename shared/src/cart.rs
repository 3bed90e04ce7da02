//! Cart types and mutation rules
//!
//! A cart is an ordered list of line items. Two lines are the same
//! product choice iff both `product_id` and `variant` match exactly
//! (including both being absent); adding a duplicate merges into the
//! existing line instead of appending.

use crate::error::{AppError, ErrorCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Cart mutation error
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CartError {
    #[error("Line index {0} out of range")]
    LineNotFound(usize),

    #[error("Unit price must not be negative (got {0})")]
    InvalidPrice(f64),

    #[error("Quantity must be at least 1 (got {0})")]
    InvalidQuantity(i32),
}

impl From<CartError> for AppError {
    fn from(err: CartError) -> Self {
        let code = match &err {
            CartError::LineNotFound(_) => ErrorCode::CartLineNotFound,
            CartError::InvalidPrice(_) => ErrorCode::ProductInvalidPrice,
            CartError::InvalidQuantity(_) => ErrorCode::CartInvalidQuantity,
        };
        AppError::with_message(code, err.to_string())
    }
}

/// One entry in a cart: a product (and optional variant) with
/// quantity and unit price
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Product ID
    pub product_id: String,
    /// Product name snapshot (display only)
    pub name: String,
    /// Unit price at the time the item was added
    pub unit_price: f64,
    /// Quantity (>= 1)
    pub quantity: i32,
    /// Variant selector distinguishing otherwise-identical product
    /// options (e.g. a color or size choice)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
}

impl LineItem {
    /// Line identity key: (product_id, variant), exact match
    fn same_line(&self, product_id: &str, variant: Option<&str>) -> bool {
        self.product_id == product_id && self.variant.as_deref() == variant
    }

    /// Line total: unit price x quantity
    pub fn line_total(&self) -> f64 {
        crate::pricing::line_total(self.unit_price, self.quantity)
    }
}

/// Ordered collection of line items
///
/// Insertion order is irrelevant to totals but preserved for display.
/// Invariant: no two entries share the same (product_id, variant) key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    pub items: Vec<LineItem>,
}

impl Cart {
    /// Create an empty cart
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total number of units across all lines
    pub fn item_count(&self) -> i32 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Sum of line totals before any discount
    pub fn subtotal(&self) -> f64 {
        crate::pricing::compute_subtotal(&self.items)
    }

    /// Add an item, merging into an existing line with the same
    /// (product_id, variant) key by adding quantities
    ///
    /// Malformed input (negative price, quantity < 1) is rejected here
    /// so it never reaches the pricing engine.
    pub fn add_item(&mut self, item: LineItem) -> Result<(), CartError> {
        if item.unit_price < 0.0 || !item.unit_price.is_finite() {
            return Err(CartError::InvalidPrice(item.unit_price));
        }
        if item.quantity < 1 {
            return Err(CartError::InvalidQuantity(item.quantity));
        }

        if let Some(existing) = self
            .items
            .iter_mut()
            .find(|l| l.same_line(&item.product_id, item.variant.as_deref()))
        {
            existing.quantity = existing.quantity.saturating_add(item.quantity);
        } else {
            self.items.push(item);
        }
        Ok(())
    }

    /// Adjust the quantity of the line at `index` by `delta`
    ///
    /// A resulting quantity <= 0 removes the line entirely (no
    /// clamping to zero). Indices of later lines shift down after a
    /// removal; callers must not cache indices across mutations.
    pub fn update_quantity(&mut self, index: usize, delta: i32) -> Result<(), CartError> {
        let line = self
            .items
            .get_mut(index)
            .ok_or(CartError::LineNotFound(index))?;

        line.quantity = line.quantity.saturating_add(delta);
        if line.quantity <= 0 {
            self.items.remove(index);
        }
        Ok(())
    }

    /// Remove the line at `index`
    pub fn remove_item(&mut self, index: usize) -> Result<LineItem, CartError> {
        if index >= self.items.len() {
            return Err(CartError::LineNotFound(index));
        }
        Ok(self.items.remove(index))
    }

    /// Remove all lines (order submitted or cart abandoned)
    pub fn clear(&mut self) {
        self.items.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(product_id: &str, variant: Option<&str>, price: f64, qty: i32) -> LineItem {
        LineItem {
            product_id: product_id.to_string(),
            name: format!("Product {}", product_id),
            unit_price: price,
            quantity: qty,
            variant: variant.map(|v| v.to_string()),
        }
    }

    #[test]
    fn test_add_merges_same_product_and_variant() {
        let mut cart = Cart::new();
        cart.add_item(item("p1", Some("red"), 25.0, 1)).unwrap();
        cart.add_item(item("p1", Some("red"), 25.0, 2)).unwrap();

        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items[0].quantity, 3);
    }

    #[test]
    fn test_add_different_variant_appends() {
        let mut cart = Cart::new();
        cart.add_item(item("p1", Some("red"), 25.0, 1)).unwrap();
        cart.add_item(item("p1", Some("blue"), 25.0, 1)).unwrap();
        cart.add_item(item("p1", None, 25.0, 1)).unwrap();

        assert_eq!(cart.items.len(), 3);
    }

    #[test]
    fn test_add_no_variant_merges() {
        let mut cart = Cart::new();
        cart.add_item(item("p1", None, 10.0, 1)).unwrap();
        cart.add_item(item("p1", None, 10.0, 1)).unwrap();

        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items[0].quantity, 2);
    }

    #[test]
    fn test_add_rejects_malformed_input() {
        let mut cart = Cart::new();
        assert_eq!(
            cart.add_item(item("p1", None, -1.0, 1)),
            Err(CartError::InvalidPrice(-1.0))
        );
        assert_eq!(
            cart.add_item(item("p1", None, 10.0, 0)),
            Err(CartError::InvalidQuantity(0))
        );
        assert!(cart.is_empty());
    }

    #[test]
    fn test_update_quantity_to_zero_removes_line() {
        let mut cart = Cart::new();
        cart.add_item(item("p1", None, 10.0, 1)).unwrap();
        cart.add_item(item("p2", None, 20.0, 2)).unwrap();

        cart.update_quantity(0, -1).unwrap();

        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items[0].product_id, "p2");
    }

    #[test]
    fn test_update_quantity_below_zero_removes_line() {
        let mut cart = Cart::new();
        cart.add_item(item("p1", None, 10.0, 2)).unwrap();
        cart.update_quantity(0, -5).unwrap();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_update_quantity_out_of_range() {
        let mut cart = Cart::new();
        assert_eq!(cart.update_quantity(0, 1), Err(CartError::LineNotFound(0)));
    }

    #[test]
    fn test_update_quantity_saturates_instead_of_overflowing() {
        let mut cart = Cart::new();
        cart.add_item(item("p1", None, 10.0, i32::MAX - 1)).unwrap();
        cart.update_quantity(0, i32::MAX).unwrap();
        assert_eq!(cart.items[0].quantity, i32::MAX);

        cart.update_quantity(0, i32::MIN).unwrap();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_remove_shifts_indices() {
        let mut cart = Cart::new();
        cart.add_item(item("p1", None, 10.0, 1)).unwrap();
        cart.add_item(item("p2", None, 20.0, 1)).unwrap();
        cart.add_item(item("p3", None, 30.0, 1)).unwrap();

        let removed = cart.remove_item(1).unwrap();
        assert_eq!(removed.product_id, "p2");
        assert_eq!(cart.items[1].product_id, "p3");
    }

    #[test]
    fn test_item_count_and_clear() {
        let mut cart = Cart::new();
        cart.add_item(item("p1", None, 10.0, 2)).unwrap();
        cart.add_item(item("p2", None, 20.0, 3)).unwrap();
        assert_eq!(cart.item_count(), 5);

        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.item_count(), 0);
    }
}
