//! End-to-end flow against an in-memory database: seed the catalog,
//! fill a cart, apply a coupon, and check out.

use shared::models::{CouponCreate, CouponKind, CouponUpdate, OrderStatus, ProductCreate};
use store_server::checkout::{CheckoutRequest, CustomerPayload, perform_checkout};
use store_server::core::{Config, ServerState};
use store_server::db::repository::{
    CartRepository, CouponRepository, OrderRepository, ProductRepository, RepoError,
};
use store_server::pricing::{CouponEngine, CouponStatus};

fn test_config() -> Config {
    Config {
        work_dir: "/tmp/store-test".to_string(),
        http_port: 0,
        store_name: "Test Store".to_string(),
        whatsapp_phone: Some("34600111222".to_string()),
        environment: "development".to_string(),
        request_timeout_ms: 30000,
        shutdown_timeout_ms: 10000,
    }
}

async fn test_state() -> ServerState {
    ServerState::initialize_in_memory(&test_config())
        .await
        .expect("in-memory state")
}

fn product(name: &str, price: f64, stock: i32) -> ProductCreate {
    ProductCreate {
        name: name.to_string(),
        description: None,
        image: None,
        category: Some("apparel".to_string()),
        price,
        original_price: None,
        discount_percent: None,
        rating: None,
        review_count: None,
        stock: Some(stock),
        colors: None,
        sizes: None,
    }
}

fn customer() -> CustomerPayload {
    CustomerPayload {
        name: "Ada".to_string(),
        phone: "+34600111222".to_string(),
        email: Some("ada@example.com".to_string()),
        address: "1 Main St".to_string(),
        notes: None,
    }
}

async fn add_to_cart(state: &ServerState, session: &str, product_id: &str, quantity: i32) {
    let products = ProductRepository::new(state.get_db());
    let carts = CartRepository::new(state.get_db());

    let product = products
        .find_by_id(product_id)
        .await
        .unwrap()
        .expect("product exists");
    let cart_session = carts.find_or_create(session).await.unwrap();
    let mut cart = cart_session.cart();
    cart.add_item(shared::cart::LineItem {
        product_id: product.id.as_ref().unwrap().to_string(),
        name: product.name.clone(),
        unit_price: product.price,
        quantity,
        variant: None,
    })
    .unwrap();
    carts.save_items(session, cart.items).await.unwrap();
}

#[tokio::test]
async fn checkout_creates_order_and_clears_cart() {
    let state = test_state().await;
    let products = ProductRepository::new(state.get_db());
    let coupons = CouponRepository::new(state.get_db());
    let carts = CartRepository::new(state.get_db());
    let orders = OrderRepository::new(state.get_db());

    let shirt = products.create(product("Shirt", 25.0, 10)).await.unwrap();
    coupons
        .create(CouponCreate {
            code: "save10".to_string(),
            kind: CouponKind::Percentage,
            value: 10.0,
            expires_at: None,
            min_order_amount: Some(20.0),
            is_active: None,
        })
        .await
        .unwrap();

    let session = "session-checkout";
    let shirt_id = shirt.id.as_ref().unwrap().to_string();
    add_to_cart(&state, session, &shirt_id, 2).await;

    // Apply the coupon the way the handler does: verify, then CAS attach
    let engine = CouponEngine::new(state.get_db());
    let cart_session = carts.find_by_session(session).await.unwrap().unwrap();
    let now = chrono::Utc::now().timestamp_millis();
    let (coupon, quote) = engine
        .apply(&cart_session.cart(), "save10", now)
        .await
        .unwrap();
    assert_eq!(quote.result.subtotal, 50.0);
    assert_eq!(quote.result.discount, 5.0);
    assert_eq!(quote.result.total, 45.0);
    carts
        .set_coupon(session, &coupon.code, cart_session.revision)
        .await
        .unwrap();

    let response = perform_checkout(
        &state,
        CheckoutRequest {
            session: session.to_string(),
            customer: customer(),
        },
    )
    .await
    .unwrap();

    assert_eq!(response.order.subtotal, 50.0);
    assert_eq!(response.order.discount, 5.0);
    assert_eq!(response.order.total, 45.0);
    assert_eq!(response.order.coupon_code.as_deref(), Some("SAVE10"));
    assert_eq!(response.order.status, OrderStatus::Pending);
    assert!(!response.order.whatsapp_sent);
    assert!(response.coupon_notice.is_none());

    assert!(response.message.contains("- Shirt x2 = 50.00"));
    assert!(response.message.contains("*Total: 45.00*"));
    let url = response.whatsapp_url.expect("phone configured");
    assert!(url.starts_with("https://wa.me/34600111222?text="));

    // Cart is emptied, coupon dropped
    let cart_session = carts.find_by_session(session).await.unwrap().unwrap();
    assert!(cart_session.items.is_empty());
    assert!(cart_session.coupon_code.is_none());

    // Order persisted, newest first
    let all = orders.find_all().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].customer.name, "Ada");

    assert_eq!(state.resource_versions.get("order"), 1);
}

#[tokio::test]
async fn checkout_rejects_empty_cart() {
    let state = test_state().await;
    let carts = CartRepository::new(state.get_db());
    carts.find_or_create("session-empty").await.unwrap();

    let err = perform_checkout(
        &state,
        CheckoutRequest {
            session: "session-empty".to_string(),
            customer: customer(),
        },
    )
    .await
    .unwrap_err();
    assert_eq!(err.code, shared::ErrorCode::CartEmpty);
}

#[tokio::test]
async fn checkout_drops_coupon_that_expired_in_the_meantime() {
    let state = test_state().await;
    let products = ProductRepository::new(state.get_db());
    let coupons = CouponRepository::new(state.get_db());
    let carts = CartRepository::new(state.get_db());

    let shirt = products.create(product("Shirt", 25.0, 10)).await.unwrap();
    // Already expired when checkout re-validates
    coupons
        .create(CouponCreate {
            code: "old5".to_string(),
            kind: CouponKind::Fixed,
            value: 5.0,
            expires_at: Some(chrono::Utc::now().timestamp_millis() - 1_000),
            min_order_amount: None,
            is_active: None,
        })
        .await
        .unwrap();

    let session = "session-expired";
    let shirt_id = shirt.id.as_ref().unwrap().to_string();
    add_to_cart(&state, session, &shirt_id, 1).await;
    let cart_session = carts.find_by_session(session).await.unwrap().unwrap();
    carts
        .set_coupon(session, "OLD5", cart_session.revision)
        .await
        .unwrap();

    let response = perform_checkout(
        &state,
        CheckoutRequest {
            session: session.to_string(),
            customer: customer(),
        },
    )
    .await
    .unwrap();

    // The purchase goes through at full price with an explanation
    assert_eq!(response.order.discount, 0.0);
    assert_eq!(response.order.total, 25.0);
    assert!(response.order.coupon_code.is_none());
    assert!(
        response
            .coupon_notice
            .as_deref()
            .unwrap()
            .contains("expired")
    );
}

#[tokio::test]
async fn stale_revision_cannot_attach_a_coupon() {
    let state = test_state().await;
    let products = ProductRepository::new(state.get_db());
    let carts = CartRepository::new(state.get_db());

    let shirt = products.create(product("Shirt", 25.0, 10)).await.unwrap();
    let session = "session-cas";
    let shirt_id = shirt.id.as_ref().unwrap().to_string();
    add_to_cart(&state, session, &shirt_id, 1).await;

    let stale = carts.find_by_session(session).await.unwrap().unwrap();

    // Cart changes after the revision was read
    add_to_cart(&state, session, &shirt_id, 1).await;

    let err = carts
        .set_coupon(session, "SAVE10", stale.revision)
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Conflict(_)));

    // Retrying with the fresh revision succeeds
    let fresh = carts.find_by_session(session).await.unwrap().unwrap();
    let updated = carts
        .set_coupon(session, "SAVE10", fresh.revision)
        .await
        .unwrap();
    assert_eq!(updated.coupon_code.as_deref(), Some("SAVE10"));
}

#[tokio::test]
async fn coupon_update_can_remove_the_expiry() {
    let state = test_state().await;
    let coupons = CouponRepository::new(state.get_db());

    let expiry = chrono::Utc::now().timestamp_millis() + 60_000;
    let coupon = coupons
        .create(CouponCreate {
            code: "temp10".to_string(),
            kind: CouponKind::Fixed,
            value: 10.0,
            expires_at: Some(expiry),
            min_order_amount: None,
            is_active: None,
        })
        .await
        .unwrap();
    let id = coupon.id.as_ref().unwrap().to_string();

    // An absent expires_at leaves the expiry alone
    let updated = coupons
        .update(
            &id,
            CouponUpdate {
                value: Some(8.0),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.value, 8.0);
    assert_eq!(updated.expires_at, Some(expiry));

    // An explicit null removes it
    let updated = coupons
        .update(
            &id,
            CouponUpdate {
                expires_at: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.expires_at, None);
    assert_eq!(updated.value, 8.0);
}

#[tokio::test]
async fn quote_survives_a_deleted_coupon() {
    let state = test_state().await;
    let products = ProductRepository::new(state.get_db());
    let carts = CartRepository::new(state.get_db());
    let engine = CouponEngine::new(state.get_db());

    let shirt = products.create(product("Shirt", 25.0, 10)).await.unwrap();
    let session = "session-deleted-coupon";
    let shirt_id = shirt.id.as_ref().unwrap().to_string();
    add_to_cart(&state, session, &shirt_id, 2).await;

    let cart_session = carts.find_by_session(session).await.unwrap().unwrap();
    let now = chrono::Utc::now().timestamp_millis();
    let quote = engine
        .quote(&cart_session.cart(), Some("GONE10"), now)
        .await;

    // Full price, with the rejection carried alongside
    assert_eq!(quote.pricing.discount, 0.0);
    assert_eq!(quote.pricing.total, 50.0);
    assert!(matches!(quote.coupon, CouponStatus::Rejected { .. }));
    assert!(quote.coupon.should_clear());
}
