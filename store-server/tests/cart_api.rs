//! Cart endpoints exercised through the router against an in-memory
//! database, covering the stock ceiling and session lifecycle.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use shared::models::{CouponCreate, CouponKind, ProductCreate};
use store_server::core::{Config, ServerState};
use store_server::db::repository::{CartRepository, CouponRepository, ProductRepository};
use store_server::routes::build_router;
use tower::ServiceExt;

fn test_config() -> Config {
    Config {
        work_dir: "/tmp/store-test".to_string(),
        http_port: 0,
        store_name: "Test Store".to_string(),
        whatsapp_phone: None,
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

async fn send(state: &ServerState, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let app = build_router().with_state(state.clone());
    let request = match body {
        Some(json_body) => Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(json_body.to_string()))
            .unwrap(),
        None => Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    };
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn bare_product_key_cannot_exceed_the_stock_ceiling() {
    let state = test_state().await;
    let products = ProductRepository::new(state.get_db());
    let shirt = products.create(product("Shirt", 25.0, 1)).await.unwrap();

    // "product:key" and the bare "key" resolve to the same record; the
    // ceiling must hold no matter which form the client sends
    let bare_key = shirt.id.as_ref().unwrap().key().to_string();
    let uri = "/api/carts/session-bare-key/items";

    let (status, summary) = send(
        &state,
        "POST",
        uri,
        Some(json!({ "product_id": bare_key, "quantity": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["items"][0]["quantity"], 1);

    let (status, body) = send(
        &state,
        "POST",
        uri,
        Some(json!({ "product_id": bare_key, "quantity": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], 6003);

    let (status, summary) = send(&state, "GET", "/api/carts/session-bare-key", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["items"][0]["quantity"], 1);
    assert_eq!(summary["item_count"], 1);
}

#[tokio::test]
async fn quantity_increase_is_held_to_the_stock_ceiling() {
    let state = test_state().await;
    let products = ProductRepository::new(state.get_db());
    let shirt = products.create(product("Shirt", 25.0, 2)).await.unwrap();
    let shirt_id = shirt.id.as_ref().unwrap().to_string();

    let (status, _) = send(
        &state,
        "POST",
        "/api/carts/session-delta/items",
        Some(json!({ "product_id": shirt_id, "quantity": 2 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // The whole stock is already in the cart
    let (status, body) = send(
        &state,
        "PATCH",
        "/api/carts/session-delta/items/0",
        Some(json!({ "delta": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], 6003);

    // Decreases are never stock-checked
    let (status, summary) = send(
        &state,
        "PATCH",
        "/api/carts/session-delta/items/0",
        Some(json!({ "delta": -1 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["items"][0]["quantity"], 1);
}

#[tokio::test]
async fn coupon_can_be_applied_and_removed_over_http() {
    let state = test_state().await;
    let products = ProductRepository::new(state.get_db());
    let coupons = CouponRepository::new(state.get_db());

    let shirt = products.create(product("Shirt", 25.0, 10)).await.unwrap();
    let shirt_id = shirt.id.as_ref().unwrap().to_string();
    coupons
        .create(CouponCreate {
            code: "save10".to_string(),
            kind: CouponKind::Percentage,
            value: 10.0,
            expires_at: None,
            min_order_amount: None,
            is_active: None,
        })
        .await
        .unwrap();

    let (status, _) = send(
        &state,
        "POST",
        "/api/carts/session-coupon/items",
        Some(json!({ "product_id": shirt_id, "quantity": 2 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, summary) = send(
        &state,
        "PUT",
        "/api/carts/session-coupon/coupon",
        Some(json!({ "code": "save10" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["coupon"]["status"], "APPLIED");
    assert_eq!(summary["pricing"]["discount"], 5.0);
    assert_eq!(summary["pricing"]["total"], 45.0);

    let (status, summary) = send(&state, "DELETE", "/api/carts/session-coupon/coupon", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["coupon"]["status"], "NOT_APPLIED");
    assert_eq!(summary["pricing"]["total"], 50.0);
}

#[tokio::test]
async fn cart_session_lifecycle_over_http() {
    let state = test_state().await;
    let products = ProductRepository::new(state.get_db());
    let shirt = products.create(product("Shirt", 25.0, 10)).await.unwrap();
    let shirt_id = shirt.id.as_ref().unwrap().to_string();

    let (status, created) = send(&state, "POST", "/api/carts", None).await;
    assert_eq!(status, StatusCode::OK);
    let session = created["session"].as_str().unwrap().to_string();
    assert_eq!(created["revision"], 0);

    let (status, summary) = send(
        &state,
        "POST",
        &format!("/api/carts/{}/items", session),
        Some(json!({ "product_id": shirt_id, "quantity": 2, "variant": "red" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["pricing"]["subtotal"], 50.0);
    assert_eq!(summary["revision"], 1);

    let (status, summary) = send(
        &state,
        "DELETE",
        &format!("/api/carts/{}/items/0", session),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["item_count"], 0);

    let (status, _) = send(&state, "DELETE", &format!("/api/carts/{}", session), None).await;
    assert_eq!(status, StatusCode::OK);

    // Dropping the document entirely makes the session unknown again
    let carts = CartRepository::new(state.get_db());
    assert!(carts.delete(&session).await.unwrap());
    let (status, body) = send(&state, "GET", &format!("/api/carts/{}", session), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 7001);
}
