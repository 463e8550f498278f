//! Integration tests for the restaurant ordering API
//!
//! These tests drive the full router against a seeded in-memory backend:
//! - Restaurant and menu browsing
//! - Session-scoped carts (add, merge, update, remove)
//! - Guest and signed-in checkout, including loyalty points
//! - Account favorites and authentication
//! - Blog posts and comments

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, HeaderMap, Request, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::util::ServiceExt; // for `oneshot`

use restaurant_ordering::cart::MemoryCartStore;
use restaurant_ordering::config::Config;
use restaurant_ordering::router::create_app_router;
use restaurant_ordering::sdk::{collections, Backend, MemoryBackend, Query, SdkError};
use restaurant_ordering::state::AppState;

const USER_HEADERS: [(&str, &str); 3] = [
    ("x-user-id", "user-ana"),
    ("x-user-email", "ana@example.com"),
    ("x-user-name", "Ana Lopez"),
];

/// Backend whose order inserts always fail.
struct OrdersDown {
    inner: MemoryBackend,
}

#[async_trait]
impl Backend for OrdersDown {
    async fn find(&self, collection: &str, query: &Query) -> Result<Vec<Value>, SdkError> {
        self.inner.find(collection, query).await
    }

    async fn insert(&self, collection: &str, record: Value) -> Result<Value, SdkError> {
        if collection == collections::ORDERS {
            return Err(SdkError::Backend("orders unavailable".into()));
        }
        self.inner.insert(collection, record).await
    }

    async fn update(&self, collection: &str, id: &str, patch: Value) -> Result<Value, SdkError> {
        self.inner.update(collection, id, patch).await
    }
}

/// Helper function to create a test app over seeded data
async fn create_test_app() -> axum::Router {
    app_with_backend(Arc::new(seeded_backend().await))
}

fn app_with_backend(backend: Arc<dyn Backend>) -> axum::Router {
    let state = AppState::with_parts(Config::default(), backend, Arc::new(MemoryCartStore::new()));
    create_app_router(Arc::new(state))
}

async fn seeded_backend() -> MemoryBackend {
    let backend = MemoryBackend::new();
    let seed = [
        (
            collections::RESTAURANTS,
            json!({
                "id": "r1", "slug": "bella", "name": "Bella Napoli", "cuisine": "italian",
                "is_active": true, "accepts_delivery": true, "accepts_pickup": true,
                "min_order_cents": 1000
            }),
        ),
        (
            collections::RESTAURANTS,
            json!({ "id": "r2", "slug": "closed", "name": "Closed Diner", "is_active": false }),
        ),
        (
            collections::MENU_ITEMS,
            json!({
                "id": "m1", "restaurant_id": "r1", "name": "Margherita", "price_cents": 1200,
                "category": "Pizza", "is_available": true, "sort_order": 1,
                "customization_groups": [{
                    "name": "Size", "required": true, "max_selections": 1,
                    "options": [
                        { "name": "Small", "price_cents": 0 },
                        { "name": "Large", "price_cents": 300 }
                    ]
                }]
            }),
        ),
        (
            collections::RESTAURANTS,
            json!({
                "id": "r3", "slug": "tacos", "name": "Taco Stand", "cuisine": "mexican",
                "is_active": true, "accepts_delivery": false, "accepts_pickup": true
            }),
        ),
        (
            collections::MENU_ITEMS,
            json!({
                "id": "m3", "restaurant_id": "r3", "name": "Al Pastor", "price_cents": 400,
                "category": "Tacos", "is_available": true
            }),
        ),
        (
            collections::MENU_ITEMS,
            json!({
                "id": "m2", "restaurant_id": "r1", "name": "Tiramisu", "price_cents": 650,
                "category": "Desserts", "is_available": true, "sort_order": 1
            }),
        ),
        (
            collections::BLOG_POSTS,
            json!({
                "id": "p1", "slug": "welcome", "title": "Welcome", "author": "Team",
                "tags": ["news"], "published": true,
                "published_at": "2024-05-01T12:00:00Z"
            }),
        ),
        (
            collections::BLOG_COMMENTS,
            json!({
                "id": "c1", "post_id": "p1", "author_name": "Sam",
                "content": "Great news", "approved": true
            }),
        ),
    ];
    for (collection, record) in seed {
        backend.insert(collection, record).await.unwrap();
    }
    backend
}

/// Helper function to send a request and get the response
async fn send(
    app: &axum::Router,
    method: &str,
    uri: &str,
    headers: &[(&str, &str)],
    body: Option<Value>,
) -> (StatusCode, HeaderMap, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    let body = match body {
        Some(body) => {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_string(&body).unwrap())
        }
        None => Body::empty(),
    };

    let response = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();

    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(json!({}));

    (status, headers, body)
}

/// Extracts `cart_session=...` from a `Set-Cookie` header.
fn session_cookie(headers: &HeaderMap) -> String {
    headers
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(str::to_string)
        .expect("response should set the cart session cookie")
}

fn large_margherita(quantity: u32) -> Value {
    json!({
        "menu_item_id": "m1",
        "quantity": quantity,
        "selections": [{ "group": "Size", "option": "Large" }]
    })
}

// =============================================================================
// Restaurants
// =============================================================================

#[tokio::test]
async fn test_health() {
    let app = create_test_app().await;
    let (status, _, body) = send(&app, "GET", "/health", &[], None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_list_restaurants_hides_inactive() {
    let app = create_test_app().await;
    let (status, _, body) = send(&app, "GET", "/restaurants", &[], None).await;

    assert_eq!(status, StatusCode::OK);
    let slugs: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["slug"].as_str().unwrap())
        .collect();
    assert_eq!(slugs, vec!["bella", "tacos"]);

    let (status, _, _) = send(&app, "GET", "/restaurants/closed", &[], None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_menu_is_grouped_by_category() {
    let app = create_test_app().await;
    let (status, _, body) = send(&app, "GET", "/restaurants/bella/menu", &[], None).await;

    assert_eq!(status, StatusCode::OK);
    let categories: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(categories, vec!["Desserts", "Pizza"]);
}

// =============================================================================
// Cart
// =============================================================================

#[tokio::test]
async fn test_add_same_item_twice_merges_lines() {
    let app = create_test_app().await;

    let (status, headers, first) = send(
        &app,
        "POST",
        "/restaurants/bella/cart/items",
        &[],
        Some(large_margherita(1)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["totals"]["subtotal_cents"], 1500);
    let cookie = session_cookie(&headers);

    let (status, headers, second) = send(
        &app,
        "POST",
        "/restaurants/bella/cart/items",
        &[("cookie", cookie.as_str())],
        Some(large_margherita(1)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(headers.get(header::SET_COOKIE).is_none());

    let items = second["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["quantity"], 2);
    assert_eq!(second["totals"]["subtotal_cents"], 3000);
    // 8.25% of 30.00, rounded half up
    assert_eq!(second["totals"]["tax_cents"], 248);
    assert_eq!(second["totals"]["total_cents"], 3248);
}

#[tokio::test]
async fn test_carts_are_isolated_per_session() {
    let app = create_test_app().await;

    let (_, headers, _) = send(
        &app,
        "POST",
        "/restaurants/bella/cart/items",
        &[],
        Some(large_margherita(1)),
    )
    .await;
    let cookie = session_cookie(&headers);

    let (_, _, mine) = send(&app, "GET", "/restaurants/bella/cart", &[("cookie", cookie.as_str())], None).await;
    assert_eq!(mine["items"].as_array().unwrap().len(), 1);

    let (_, _, theirs) = send(&app, "GET", "/restaurants/bella/cart", &[], None).await;
    assert!(theirs["items"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_delivery_totals_include_fee() {
    let app = create_test_app().await;
    let (_, headers, _) = send(
        &app,
        "POST",
        "/restaurants/bella/cart/items",
        &[],
        Some(json!({ "menu_item_id": "m2" })),
    )
    .await;
    let cookie = session_cookie(&headers);

    let (status, _, body) = send(
        &app,
        "GET",
        "/restaurants/bella/cart?order_type=delivery",
        &[("cookie", cookie.as_str())],
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totals"]["delivery_fee_cents"], 499);
    // 650 + 54 tax + 499 fee
    assert_eq!(body["totals"]["total_cents"], 1203);
}

#[tokio::test]
async fn test_missing_required_customization_is_rejected() {
    let app = create_test_app().await;
    let (status, _, body) = send(
        &app,
        "POST",
        "/restaurants/bella/cart/items",
        &[],
        Some(json!({ "menu_item_id": "m1" })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("Size"));
}

#[tokio::test]
async fn test_update_and_remove_line() {
    let app = create_test_app().await;
    let (_, headers, body) = send(
        &app,
        "POST",
        "/restaurants/bella/cart/items",
        &[],
        Some(json!({ "menu_item_id": "m2" })),
    )
    .await;
    let cookie = session_cookie(&headers);
    let line_id = body["items"][0]["line_id"].as_str().unwrap().to_string();
    let line_uri = format!("/restaurants/bella/cart/items/{line_id}");

    let (status, _, body) = send(
        &app,
        "PATCH",
        &line_uri,
        &[("cookie", cookie.as_str())],
        Some(json!({ "quantity": 3 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totals"]["item_count"], 3);
    assert_eq!(body["totals"]["subtotal_cents"], 1950);

    let (status, _, body) = send(&app, "DELETE", &line_uri, &[("cookie", cookie.as_str())], None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["items"].as_array().unwrap().is_empty());

    let (status, _, _) = send(&app, "DELETE", &line_uri, &[("cookie", cookie.as_str())], None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_quantity_beyond_limit_is_rejected() {
    let app = create_test_app().await;
    let (_, headers, body) = send(
        &app,
        "POST",
        "/restaurants/bella/cart/items",
        &[],
        Some(json!({ "menu_item_id": "m2" })),
    )
    .await;
    let cookie = session_cookie(&headers);
    let line_uri = format!("/restaurants/bella/cart/items/{}", body["items"][0]["line_id"].as_str().unwrap());

    let (status, _, _) = send(
        &app,
        "PATCH",
        &line_uri,
        &[("cookie", cookie.as_str())],
        Some(json!({ "quantity": u32::MAX })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    // Adding another item still prices the cart normally
    let (status, _, body) = send(
        &app,
        "POST",
        "/restaurants/bella/cart/items",
        &[("cookie", cookie.as_str())],
        Some(large_margherita(1)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totals"]["item_count"], 2);
    assert_eq!(body["totals"]["subtotal_cents"], 650 + 1500);
}

// =============================================================================
// Checkout
// =============================================================================

/// Adds `item` to a fresh session's cart and returns the session cookie.
async fn cart_with(app: &axum::Router, slug: &str, item: Value) -> String {
    let (status, headers, _) = send(app, "POST", &format!("/restaurants/{slug}/cart/items"), &[], Some(item)).await;
    assert_eq!(status, StatusCode::OK);
    session_cookie(&headers)
}

fn signed_in_with(cookie: &str) -> Vec<(&str, &str)> {
    let mut headers = USER_HEADERS.to_vec();
    headers.push(("cookie", cookie));
    headers
}

#[tokio::test]
async fn test_checkout_empty_cart_fails() {
    let app = create_test_app().await;
    let (status, _, body) = send(
        &app,
        "POST",
        "/restaurants/bella/checkout",
        &[],
        Some(json!({ "contact": { "name": "Guest", "email": "guest@example.com" } })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_guest_checkout_places_order_and_clears_cart() {
    let app = create_test_app().await;
    let (_, headers, _) = send(
        &app,
        "POST",
        "/restaurants/bella/cart/items",
        &[],
        Some(large_margherita(1)),
    )
    .await;
    let cookie = session_cookie(&headers);

    let (status, _, body) = send(
        &app,
        "POST",
        "/restaurants/bella/checkout",
        &[("cookie", cookie.as_str())],
        Some(json!({
            "order_type": "pickup",
            "contact": { "name": "Guest", "email": "guest@example.com" }
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let order = &body["order"];
    assert!(order["order_number"].as_str().unwrap().starts_with("ORD-"));
    assert_eq!(order["status"], "pending");
    assert_eq!(order["total_cents"], 1500 + 124);
    assert_eq!(order["points_earned"], 0);
    assert!(body["loyalty"].is_null());

    let (_, _, cart) = send(&app, "GET", "/restaurants/bella/cart", &[("cookie", cookie.as_str())], None).await;
    assert!(cart["items"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_checkout_below_minimum_is_rejected() {
    let app = create_test_app().await;
    let (_, headers, _) = send(
        &app,
        "POST",
        "/restaurants/bella/cart/items",
        &[],
        Some(json!({ "menu_item_id": "m2" })),
    )
    .await;
    let cookie = session_cookie(&headers);

    let (status, _, body) = send(
        &app,
        "POST",
        "/restaurants/bella/checkout",
        &[("cookie", cookie.as_str())],
        Some(json!({ "contact": { "name": "Guest", "email": "guest@example.com" } })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("$10.00"));

    // The cart survives a rejected checkout
    let (_, _, cart) = send(&app, "GET", "/restaurants/bella/cart", &[("cookie", cookie.as_str())], None).await;
    assert_eq!(cart["items"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_signed_in_checkout_earns_points() {
    let app = create_test_app().await;
    let (_, headers, _) = send(
        &app,
        "POST",
        "/restaurants/bella/cart/items",
        &[],
        Some(large_margherita(2)),
    )
    .await;
    let cookie = session_cookie(&headers);

    let mut request_headers = USER_HEADERS.to_vec();
    request_headers.push(("cookie", cookie.as_str()));
    let (status, _, body) = send(
        &app,
        "POST",
        "/restaurants/bella/checkout",
        &request_headers,
        Some(json!({ "order_type": "pickup" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["order"]["total_cents"], 3248);
    assert_eq!(body["order"]["points_earned"], 32);
    assert_eq!(body["order"]["contact"]["name"], "Ana Lopez");
    assert_eq!(body["loyalty"]["points"], 32);
    assert_eq!(body["loyalty"]["tier"], "bronze");

    let (status, _, orders) = send(&app, "GET", "/account/orders", &USER_HEADERS, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(orders.as_array().unwrap().len(), 1);

    let (_, _, account) = send(&app, "GET", "/account", &USER_HEADERS, None).await;
    assert_eq!(account["total_orders"], 1);
    assert_eq!(account["total_spent_cents"], 3248);
}

#[tokio::test]
async fn test_redeemed_points_discount_the_order() {
    let app = create_test_app().await;

    // First order earns 32 points
    let cookie = cart_with(&app, "bella", large_margherita(2)).await;
    let (status, _, _) = send(
        &app,
        "POST",
        "/restaurants/bella/checkout",
        &signed_in_with(&cookie),
        Some(json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let cookie = cart_with(&app, "bella", large_margherita(1)).await;
    let (status, _, body) = send(
        &app,
        "POST",
        "/restaurants/bella/checkout",
        &signed_in_with(&cookie),
        Some(json!({ "redeem_points": 20 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let order = &body["order"];
    assert_eq!(order["discount_cents"], 20);
    assert_eq!(order["points_redeemed"], 20);
    // 1500 - 20 + 124 tax
    assert_eq!(order["total_cents"], 1604);
    assert_eq!(order["points_earned"], 16);

    let (_, _, loyalty) = send(&app, "GET", "/account/loyalty", &USER_HEADERS, None).await;
    assert_eq!(loyalty["points"], 32 + 16 - 20);
    assert_eq!(loyalty["lifetime_points"], 48);

    // More than the balance is refused and the cart is kept
    let cookie = cart_with(&app, "bella", large_margherita(1)).await;
    let (status, _, _) = send(
        &app,
        "POST",
        "/restaurants/bella/checkout",
        &signed_in_with(&cookie),
        Some(json!({ "redeem_points": 500 })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let (_, _, cart) = send(&app, "GET", "/restaurants/bella/cart", &[("cookie", cookie.as_str())], None).await;
    assert_eq!(cart["items"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_delivery_needs_an_address_or_profile_default() {
    let app = create_test_app().await;
    let cookie = cart_with(&app, "bella", large_margherita(1)).await;

    let (status, _, body) = send(
        &app,
        "POST",
        "/restaurants/bella/checkout",
        &signed_in_with(&cookie),
        Some(json!({ "order_type": "delivery" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("delivery address"));

    let (status, _, _) = send(
        &app,
        "PATCH",
        "/account",
        &USER_HEADERS,
        Some(json!({
            "default_address": {
                "line1": "1 Main St", "city": "Portland", "state": "ME", "postal_code": "04101"
            }
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _, body) = send(
        &app,
        "POST",
        "/restaurants/bella/checkout",
        &signed_in_with(&cookie),
        Some(json!({ "order_type": "delivery" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["order"]["delivery_address"]["line1"], "1 Main St");
    assert_eq!(body["order"]["delivery_fee_cents"], 499);
    assert_eq!(body["order"]["total_cents"], 1500 + 124 + 499);
}

#[tokio::test]
async fn test_unsupported_order_type_is_rejected() {
    let app = create_test_app().await;
    let cookie = cart_with(&app, "tacos", json!({ "menu_item_id": "m3", "quantity": 3 })).await;

    let (status, _, body) = send(
        &app,
        "POST",
        "/restaurants/tacos/checkout",
        &[("cookie", cookie.as_str())],
        Some(json!({
            "order_type": "delivery",
            "delivery_address": { "line1": "1 Main St", "city": "Portland", "postal_code": "04101" },
            "contact": { "name": "Guest", "email": "guest@example.com" }
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "Taco Stand does not offer delivery");
}

#[tokio::test]
async fn test_failed_order_insert_keeps_cart() {
    let app = app_with_backend(Arc::new(OrdersDown {
        inner: seeded_backend().await,
    }));
    let cookie = cart_with(&app, "bella", large_margherita(1)).await;

    let (status, _, body) = send(
        &app,
        "POST",
        "/restaurants/bella/checkout",
        &[("cookie", cookie.as_str())],
        Some(json!({ "contact": { "name": "Guest", "email": "guest@example.com" } })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "External service error");

    let (_, _, cart) = send(&app, "GET", "/restaurants/bella/cart", &[("cookie", cookie.as_str())], None).await;
    assert_eq!(cart["items"].as_array().unwrap().len(), 1);
    assert_eq!(cart["items"][0]["quantity"], 1);
}

#[tokio::test]
async fn test_partial_identity_is_not_a_guest() {
    let app = create_test_app().await;
    let cookie = cart_with(&app, "bella", large_margherita(1)).await;

    let (status, _, _) = send(
        &app,
        "POST",
        "/restaurants/bella/checkout",
        &[("cookie", cookie.as_str()), ("x-user-id", "user-ana")],
        Some(json!({ "contact": { "name": "Guest", "email": "guest@example.com" } })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (_, _, cart) = send(&app, "GET", "/restaurants/bella/cart", &[("cookie", cookie.as_str())], None).await;
    assert_eq!(cart["items"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_guest_cannot_redeem_points() {
    let app = create_test_app().await;
    let (_, headers, _) = send(
        &app,
        "POST",
        "/restaurants/bella/cart/items",
        &[],
        Some(large_margherita(1)),
    )
    .await;
    let cookie = session_cookie(&headers);

    let (status, _, _) = send(
        &app,
        "POST",
        "/restaurants/bella/checkout",
        &[("cookie", cookie.as_str())],
        Some(json!({
            "redeem_points": 100,
            "contact": { "name": "Guest", "email": "guest@example.com" }
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

// =============================================================================
// Account
// =============================================================================

#[tokio::test]
async fn test_account_requires_identity() {
    let app = create_test_app().await;
    let (status, _, body) = send(&app, "GET", "/account", &[], None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_first_visit_creates_profile() {
    let app = create_test_app().await;
    let (status, _, body) = send(&app, "GET", "/account", &USER_HEADERS, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user_id"], "user-ana");
    assert_eq!(body["first_name"], "Ana");
    assert_eq!(body["last_name"], "Lopez");
    assert_eq!(body["loyalty_points"], 0);
}

#[tokio::test]
async fn test_favorites_are_not_duplicated() {
    let app = create_test_app().await;

    let (status, _, body) = send(&app, "POST", "/account/favorites/r1", &USER_HEADERS, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["changed"], true);

    let (_, _, body) = send(&app, "POST", "/account/favorites/r1", &USER_HEADERS, None).await;
    assert_eq!(body["changed"], false);
    assert_eq!(body["restaurant_ids"], json!(["r1"]));

    let (_, _, body) = send(&app, "DELETE", "/account/favorites/r1", &USER_HEADERS, None).await;
    assert_eq!(body["changed"], true);
    assert_eq!(body["restaurant_ids"], json!([]));
}

#[tokio::test]
async fn test_review_updates_restaurant_rating() {
    let app = create_test_app().await;
    let (status, _, review) = send(
        &app,
        "POST",
        "/account/reviews",
        &USER_HEADERS,
        Some(json!({ "restaurant_id": "r1", "rating": 4, "comment": "Lovely crust" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(review["customer_name"], "Ana Lopez");

    let (_, _, restaurant) = send(&app, "GET", "/restaurants/bella", &[], None).await;
    assert_eq!(restaurant["rating"], 4.0);
    assert_eq!(restaurant["review_count"], 1);

    let (status, _, _) = send(
        &app,
        "POST",
        "/account/reviews",
        &USER_HEADERS,
        Some(json!({ "restaurant_id": "r1", "rating": 6, "comment": "Too good" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _, _) = send(
        &app,
        "POST",
        "/account/reviews",
        &USER_HEADERS,
        Some(json!({ "restaurant_id": "r404", "rating": 5, "comment": "Where is it?" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// =============================================================================
// Blog
// =============================================================================

#[tokio::test]
async fn test_blog_post_and_moderated_comments() {
    let app = create_test_app().await;

    let (status, _, posts) = send(&app, "GET", "/blog?tag=news", &[], None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(posts.as_array().unwrap().len(), 1);

    let (status, _, post) = send(&app, "GET", "/blog/welcome", &[], None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(post["title"], "Welcome");

    let (status, _, comment) = send(
        &app,
        "POST",
        "/blog/welcome/comments",
        &[],
        Some(json!({ "author_name": "Lee", "content": "Can't wait" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(comment["approved"], false);

    // New comments wait for moderation
    let (_, _, comments) = send(&app, "GET", "/blog/welcome/comments", &[], None).await;
    let comments = comments.as_array().unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0]["author_name"], "Sam");

    let (status, _, _) = send(&app, "GET", "/blog/missing", &[], None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
