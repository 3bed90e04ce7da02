//! Cart API Handlers
//!
//! Cart mutations run through `shared::cart::Cart` so the invariants
//! (merge by product+variant, delta updates, removal at zero) live in
//! one place. Prices come from the product record at add time, never
//! from the client.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use shared::cart::{CartError, LineItem};
use shared::error::{AppError, AppResult, ErrorCode};
use uuid::Uuid;

use crate::core::ServerState;
use crate::db::repository::{CartRepository, CartSession, ProductRepository};
use crate::pricing::{CouponEngine, CouponStatus};

/// Priced view of a cart session
#[derive(Debug, Clone, Serialize)]
pub struct CartSummary {
    pub session: String,
    pub items: Vec<LineItem>,
    pub item_count: i32,
    pub pricing: shared::pricing::PricingResult,
    pub coupon: CouponStatus,
    pub revision: i64,
}

/// Price a session and drop the stored coupon if it no longer validates
async fn summarize(state: &ServerState, cart_session: CartSession) -> AppResult<CartSummary> {
    let engine = CouponEngine::new(state.get_db());
    let now = chrono::Utc::now().timestamp_millis();

    let cart = cart_session.cart();
    let quote = engine
        .quote(&cart, cart_session.coupon_code.as_deref(), now)
        .await;

    // A rejected coupon is cleared so it stops resurfacing on every read
    let cart_session = if quote.coupon.should_clear() {
        let carts = CartRepository::new(state.get_db());
        carts
            .clear_coupon(&cart_session.session)
            .await?
    } else {
        cart_session
    };

    Ok(CartSummary {
        session: cart_session.session,
        item_count: cart.item_count(),
        items: cart_session.items,
        pricing: quote.pricing,
        coupon: quote.coupon,
        revision: cart_session.revision,
    })
}

/// POST /api/carts - create a new cart session
pub async fn create(State(state): State<ServerState>) -> AppResult<Json<CartSummary>> {
    let carts = CartRepository::new(state.get_db());
    let session = Uuid::new_v4().to_string();
    let cart_session = carts.find_or_create(&session).await?;
    Ok(Json(summarize(&state, cart_session).await?))
}

/// GET /api/carts/:session - priced cart summary
pub async fn summary(
    State(state): State<ServerState>,
    Path(session): Path<String>,
) -> AppResult<Json<CartSummary>> {
    let carts = CartRepository::new(state.get_db());
    let cart_session = carts
        .find_by_session(&session)
        .await?
        .ok_or_else(|| cart_not_found(&session))?;
    Ok(Json(summarize(&state, cart_session).await?))
}

/// Add item request body
#[derive(Debug, Clone, Deserialize)]
pub struct AddItemRequest {
    pub product_id: String,
    #[serde(default)]
    pub variant: Option<String>,
    #[serde(default = "default_quantity")]
    pub quantity: i32,
}

fn default_quantity() -> i32 {
    1
}

/// POST /api/carts/:session/items - add a product to the cart
pub async fn add_item(
    State(state): State<ServerState>,
    Path(session): Path<String>,
    Json(payload): Json<AddItemRequest>,
) -> AppResult<Json<CartSummary>> {
    let products = ProductRepository::new(state.get_db());
    let carts = CartRepository::new(state.get_db());

    let product = products
        .find_by_id(&payload.product_id)
        .await?
        .ok_or_else(|| {
            AppError::with_message(
                ErrorCode::ProductNotFound,
                format!("Product {} not found", payload.product_id),
            )
        })?;

    if !product.is_active {
        return Err(AppError::with_message(
            ErrorCode::ProductNotFound,
            format!("Product {} not found", payload.product_id),
        ));
    }

    let cart_session = carts.find_or_create(&session).await?;
    let mut cart = cart_session.cart();

    // Stored lines hold the canonical record id, so the ceiling must
    // compare against that, not the raw client id (which may be bare)
    let canonical_id = product
        .id
        .as_ref()
        .map(|id| id.to_string())
        .unwrap_or_else(|| payload.product_id.clone());
    let already_in_cart = cart
        .items
        .iter()
        .filter(|item| item.product_id == canonical_id)
        .map(|item| item.quantity)
        .sum::<i32>();
    if payload.quantity.saturating_add(already_in_cart) > product.stock {
        return Err(AppError::with_message(
            ErrorCode::ProductOutOfStock,
            format!("Only {} left in stock for {}", product.stock, product.name),
        ));
    }

    let item = LineItem {
        product_id: canonical_id,
        name: product.name.clone(),
        unit_price: product.price,
        quantity: payload.quantity,
        variant: payload.variant,
    };
    cart.add_item(item)?;

    let cart_session = carts
        .save_items(&session, cart.items)
        .await?;
    Ok(Json(summarize(&state, cart_session).await?))
}

/// Quantity update request body
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateQuantityRequest {
    /// Signed change; a delta driving the quantity to zero or below
    /// removes the line
    pub delta: i32,
}

/// PATCH /api/carts/:session/items/:index - adjust a line's quantity
pub async fn update_quantity(
    State(state): State<ServerState>,
    Path((session, index)): Path<(String, usize)>,
    Json(payload): Json<UpdateQuantityRequest>,
) -> AppResult<Json<CartSummary>> {
    let carts = CartRepository::new(state.get_db());
    let cart_session = carts
        .find_by_session(&session)
        .await?
        .ok_or_else(|| cart_not_found(&session))?;

    let mut cart = cart_session.cart();

    // An increase is held to the same stock ceiling as add_item
    if payload.delta > 0 {
        let line = cart
            .items
            .get(index)
            .ok_or(CartError::LineNotFound(index))?
            .clone();
        let products = ProductRepository::new(state.get_db());
        let product = products.find_by_id(&line.product_id).await?.ok_or_else(|| {
            AppError::with_message(
                ErrorCode::ProductNotFound,
                format!("Product {} not found", line.product_id),
            )
        })?;
        let in_cart = cart
            .items
            .iter()
            .filter(|item| item.product_id == line.product_id)
            .map(|item| item.quantity)
            .sum::<i32>();
        if in_cart.saturating_add(payload.delta) > product.stock {
            return Err(AppError::with_message(
                ErrorCode::ProductOutOfStock,
                format!("Only {} left in stock for {}", product.stock, product.name),
            ));
        }
    }

    cart.update_quantity(index, payload.delta)?;

    let cart_session = carts
        .save_items(&session, cart.items)
        .await?;
    Ok(Json(summarize(&state, cart_session).await?))
}

/// DELETE /api/carts/:session/items/:index - remove a line
pub async fn remove_item(
    State(state): State<ServerState>,
    Path((session, index)): Path<(String, usize)>,
) -> AppResult<Json<CartSummary>> {
    let carts = CartRepository::new(state.get_db());
    let cart_session = carts
        .find_by_session(&session)
        .await?
        .ok_or_else(|| cart_not_found(&session))?;

    let mut cart = cart_session.cart();
    cart.remove_item(index)?;

    let cart_session = carts
        .save_items(&session, cart.items)
        .await?;
    Ok(Json(summarize(&state, cart_session).await?))
}

/// Apply coupon request body
#[derive(Debug, Clone, Deserialize)]
pub struct ApplyCouponRequest {
    pub code: String,
}

/// PUT /api/carts/:session/coupon - verify and attach a coupon code
///
/// The attach is guarded by the cart revision read before verification:
/// if the cart changed in between, the request fails with a conflict
/// and the client retries against the fresh cart.
pub async fn apply_coupon(
    State(state): State<ServerState>,
    Path(session): Path<String>,
    Json(payload): Json<ApplyCouponRequest>,
) -> AppResult<Json<CartSummary>> {
    let carts = CartRepository::new(state.get_db());
    let engine = CouponEngine::new(state.get_db());

    let cart_session = carts
        .find_by_session(&session)
        .await?
        .ok_or_else(|| cart_not_found(&session))?;

    let now = chrono::Utc::now().timestamp_millis();
    let cart = cart_session.cart();
    let (coupon, _quote) = engine.apply(&cart, &payload.code, now).await?;

    let cart_session = carts
        .set_coupon(&session, &coupon.code, cart_session.revision)
        .await?;
    Ok(Json(summarize(&state, cart_session).await?))
}

/// DELETE /api/carts/:session/coupon - drop the stored coupon
pub async fn remove_coupon(
    State(state): State<ServerState>,
    Path(session): Path<String>,
) -> AppResult<Json<CartSummary>> {
    let carts = CartRepository::new(state.get_db());
    let cart_session = carts.clear_coupon(&session).await?;
    Ok(Json(summarize(&state, cart_session).await?))
}

/// DELETE /api/carts/:session - empty the cart
pub async fn clear(
    State(state): State<ServerState>,
    Path(session): Path<String>,
) -> AppResult<Json<CartSummary>> {
    let carts = CartRepository::new(state.get_db());
    let cart_session = carts.clear(&session).await?;
    Ok(Json(summarize(&state, cart_session).await?))
}

fn cart_not_found(session: &str) -> AppError {
    AppError::with_message(ErrorCode::CartNotFound, format!("Cart {} not found", session))
}
