//! Checkout Module
//!
//! Turns a cart session into a persisted order: re-validates the
//! remembered coupon, snapshots the priced lines, creates the order,
//! clears the cart, and builds the operator notification link.

pub mod message;

use serde::{Deserialize, Serialize};
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{Customer, Order, OrderLine, OrderStatus};
use validator::Validate;

use crate::core::ServerState;
use crate::db::repository::{CartRepository, OrderRepository};
use crate::pricing::{CouponEngine, CouponStatus};

/// Customer details collected by the checkout form
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CustomerPayload {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(length(min = 5, message = "Phone number is too short"))]
    pub phone: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    #[validate(length(min = 1, message = "Address is required"))]
    pub address: String,
    pub notes: Option<String>,
}

impl From<CustomerPayload> for Customer {
    fn from(payload: CustomerPayload) -> Self {
        Customer {
            name: payload.name,
            phone: payload.phone,
            email: payload.email,
            address: payload.address,
            notes: payload.notes,
        }
    }
}

/// Checkout request body
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutRequest {
    pub session: String,
    pub customer: CustomerPayload,
}

/// Checkout result returned to the storefront
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutResponse {
    pub order: Order,
    /// Rendered notification text
    pub message: String,
    /// `wa.me` link, present when the store has a phone configured
    #[serde(skip_serializing_if = "Option::is_none")]
    pub whatsapp_url: Option<String>,
    /// Explanation when the remembered coupon was dropped at checkout
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coupon_notice: Option<String>,
}

/// Execute checkout for a cart session
///
/// The remembered coupon is re-validated against the store right before
/// the order is written. A coupon that no longer validates is dropped
/// with a notice; it never blocks the purchase. An unverifiable coupon
/// (store error during lookup) contributes no discount either.
pub async fn perform_checkout(
    state: &ServerState,
    request: CheckoutRequest,
) -> AppResult<CheckoutResponse> {
    request
        .customer
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let carts = CartRepository::new(state.get_db());
    let orders = OrderRepository::new(state.get_db());
    let engine = CouponEngine::new(state.get_db());

    let cart_session = carts
        .find_by_session(&request.session)
        .await?
        .ok_or_else(|| {
            AppError::with_message(
                ErrorCode::CartNotFound,
                format!("Cart {} not found", request.session),
            )
        })?;

    if cart_session.items.is_empty() {
        return Err(AppError::with_message(
            ErrorCode::CartEmpty,
            "Cannot check out an empty cart",
        ));
    }

    let now = chrono::Utc::now().timestamp_millis();
    let cart = cart_session.cart();
    let quote = engine
        .quote(&cart, cart_session.coupon_code.as_deref(), now)
        .await;

    let coupon_notice = match &quote.coupon {
        CouponStatus::Rejected { message, .. } => Some(message.clone()),
        CouponStatus::Unverified { .. } => {
            Some("Coupon could not be verified and was not applied".to_string())
        }
        _ => None,
    };

    let items: Vec<OrderLine> = cart_session
        .items
        .iter()
        .map(|item| OrderLine {
            product_id: item.product_id.clone(),
            name: item.name.clone(),
            variant: item.variant.clone(),
            unit_price: item.unit_price,
            quantity: item.quantity,
            line_total: item.line_total(),
        })
        .collect();

    let customer = Customer::from(request.customer);
    let order = Order {
        id: None,
        customer: customer.clone(),
        items,
        subtotal: quote.pricing.subtotal,
        discount: quote.pricing.discount,
        coupon_code: quote.pricing.applied_coupon_code.clone(),
        total: quote.pricing.total,
        status: OrderStatus::Pending,
        whatsapp_sent: false,
        created_at: now,
    };

    let order = orders.create(order).await?;

    carts.clear(&request.session).await?;
    state.bump_version("order");

    let text = message::build_order_message(
        &state.config.store_name,
        &customer,
        &cart_session.items,
        &quote.pricing,
    );
    let whatsapp_url = state
        .config
        .whatsapp_phone
        .as_deref()
        .map(|phone| message::wa_me_url(phone, &text));

    tracing::info!(
        order_id = %order.id.as_ref().map(|id| id.to_string()).unwrap_or_default(),
        total = order.total,
        "Order created"
    );

    Ok(CheckoutResponse {
        order,
        message: text,
        whatsapp_url,
        coupon_notice,
    })
}
