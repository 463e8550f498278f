//! REST API handlers for shopping cart operations
//!
//! Carts are scoped to the browser session (cookie) and the restaurant slug
//! in the path. Every endpoint answers with the full cart and its totals.

use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Json, Router,
};
use tracing::debug;

use super::{helpers, models::*, session, storage::CartKey};
use crate::error::{AppError, Result};
use crate::models::Restaurant;
use crate::restaurant;
use crate::state::{AppState, SharedState};

/// Creates routes for cart-related operations
pub fn routes() -> Router<SharedState> {
    Router::new()
        .route("/restaurants/:slug/cart", get(get_cart).delete(clear_cart))
        .route("/restaurants/:slug/cart/items", post(add_to_cart))
        .route(
            "/restaurants/:slug/cart/items/:line_id",
            patch(update_line).delete(remove_line),
        )
}

/// A loaded cart together with what is needed to answer the request.
struct OpenCart {
    key: CartKey,
    is_new_session: bool,
    restaurant: Restaurant,
    cart: Cart,
}

async fn open_cart(state: &AppState, headers: &HeaderMap, slug: &str) -> Result<OpenCart> {
    let (session_id, is_new_session) = session::resolve_session_id(headers);
    let key = CartKey::new(session_id, slug)?;
    let restaurant = restaurant::restaurant_by_slug(&state.sdk, slug).await?;
    let cart = state
        .carts
        .load(&key)
        .await?
        .unwrap_or_else(|| Cart::new(slug));

    Ok(OpenCart {
        key,
        is_new_session,
        restaurant,
        cart,
    })
}

fn respond(state: &AppState, open: OpenCart, query: &CartQuery) -> Response {
    let pricing = state.config.pricing_for(&open.restaurant);
    let totals = helpers::calculate_totals(&open.cart, pricing, query.order_type, 0);

    let mut response = Json(helpers::cart_response(open.cart, totals)).into_response();
    session::attach_session_cookie(&mut response, open.key.session_id(), open.is_new_session);
    response
}

/// Endpoint: GET /restaurants/:slug/cart
async fn get_cart(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(slug): Path<String>,
    Query(query): Query<CartQuery>,
) -> Result<Response> {
    let open = open_cart(&state, &headers, &slug).await?;
    Ok(respond(&state, open, &query))
}

/// Endpoint: POST /restaurants/:slug/cart/items
async fn add_to_cart(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(slug): Path<String>,
    Json(payload): Json<AddItemRequest>,
) -> Result<Response> {
    let mut open = open_cart(&state, &headers, &slug).await?;

    let item = restaurant::menu_item(&state.sdk, &payload.menu_item_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("menu item {}", payload.menu_item_id)))?;

    let line_id = helpers::add_item(&mut open.cart, &item, &open.restaurant.id, payload)?;
    state.carts.save(&open.key, &open.cart).await?;

    debug!(
        cart = %open.key.storage_key(),
        line_id = %line_id,
        summary = %helpers::format_item_summary(&open.cart.items),
        "Added item to cart"
    );
    Ok(respond(&state, open, &CartQuery::default()))
}

/// Endpoint: PATCH /restaurants/:slug/cart/items/:line_id
async fn update_line(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path((slug, line_id)): Path<(String, String)>,
    Json(payload): Json<UpdateQuantityRequest>,
) -> Result<Response> {
    let mut open = open_cart(&state, &headers, &slug).await?;
    helpers::update_quantity(&mut open.cart, &line_id, payload.quantity)?;
    state.carts.save(&open.key, &open.cart).await?;

    debug!(cart = %open.key.storage_key(), line_id = %line_id, quantity = payload.quantity, "Updated cart line");
    Ok(respond(&state, open, &CartQuery::default()))
}

/// Endpoint: DELETE /restaurants/:slug/cart/items/:line_id
async fn remove_line(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path((slug, line_id)): Path<(String, String)>,
) -> Result<Response> {
    let mut open = open_cart(&state, &headers, &slug).await?;
    helpers::remove_line(&mut open.cart, &line_id)?;
    state.carts.save(&open.key, &open.cart).await?;

    debug!(cart = %open.key.storage_key(), line_id = %line_id, "Removed cart line");
    Ok(respond(&state, open, &CartQuery::default()))
}

/// Endpoint: DELETE /restaurants/:slug/cart
async fn clear_cart(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(slug): Path<String>,
) -> Result<Response> {
    let mut open = open_cart(&state, &headers, &slug).await?;
    state.carts.remove(&open.key).await?;
    open.cart = Cart::new(&slug);

    debug!(cart = %open.key.storage_key(), "Cleared cart");
    Ok(respond(&state, open, &CartQuery::default()))
}
