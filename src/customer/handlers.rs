//! REST API handlers for the customer account portal

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;

use super::auth::AuthUser;
use super::context::{CustomerContext, NewReview, ProfileUpdate};
use super::loyalty::LoyaltySummary;
use crate::error::{AppError, Result};
use crate::models::{Customer, Order, Review};
use crate::state::{AppState, SharedState};

/// Creates routes for the signed-in customer's account
pub fn routes() -> Router<SharedState> {
    Router::new()
        .route("/account", get(get_profile).patch(update_profile))
        .route("/account/orders", get(list_orders))
        .route("/account/orders/:id", get(get_order))
        .route("/account/favorites", get(list_favorites))
        .route(
            "/account/favorites/:restaurant_id",
            post(add_favorite).delete(remove_favorite),
        )
        .route("/account/reviews", get(list_reviews).post(submit_review))
        .route("/account/loyalty", get(get_loyalty))
}

#[derive(Serialize)]
struct FavoritesResponse {
    restaurant_ids: Vec<String>,
    changed: bool,
}

async fn context(state: &AppState, user: &AuthUser) -> Result<CustomerContext> {
    Ok(CustomerContext::load(state.sdk.clone(), user).await?)
}

/// Endpoint: GET /account
async fn get_profile(State(state): State<SharedState>, user: AuthUser) -> Result<Json<Customer>> {
    let ctx = context(&state, &user).await?;
    Ok(Json(ctx.customer().clone()))
}

/// Endpoint: PATCH /account
async fn update_profile(
    State(state): State<SharedState>,
    user: AuthUser,
    Json(update): Json<ProfileUpdate>,
) -> Result<Json<Customer>> {
    let mut ctx = context(&state, &user).await?;
    let customer = ctx.update_profile(update).await?;
    Ok(Json(customer.clone()))
}

/// Endpoint: GET /account/orders
async fn list_orders(State(state): State<SharedState>, user: AuthUser) -> Result<Json<Vec<Order>>> {
    let ctx = context(&state, &user).await?;
    Ok(Json(ctx.orders().to_vec()))
}

/// Endpoint: GET /account/orders/:id
async fn get_order(
    State(state): State<SharedState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Order>> {
    let ctx = context(&state, &user).await?;
    ctx.order(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("order {id}")))
}

/// Endpoint: GET /account/favorites
async fn list_favorites(
    State(state): State<SharedState>,
    user: AuthUser,
) -> Result<Json<FavoritesResponse>> {
    let ctx = context(&state, &user).await?;
    Ok(Json(FavoritesResponse {
        restaurant_ids: ctx.customer().favorite_restaurants.clone(),
        changed: false,
    }))
}

/// Endpoint: POST /account/favorites/:restaurant_id
async fn add_favorite(
    State(state): State<SharedState>,
    user: AuthUser,
    Path(restaurant_id): Path<String>,
) -> Result<Json<FavoritesResponse>> {
    let mut ctx = context(&state, &user).await?;
    let changed = ctx.add_favorite(&restaurant_id).await?;
    Ok(Json(FavoritesResponse {
        restaurant_ids: ctx.customer().favorite_restaurants.clone(),
        changed,
    }))
}

/// Endpoint: DELETE /account/favorites/:restaurant_id
async fn remove_favorite(
    State(state): State<SharedState>,
    user: AuthUser,
    Path(restaurant_id): Path<String>,
) -> Result<Json<FavoritesResponse>> {
    let mut ctx = context(&state, &user).await?;
    let changed = ctx.remove_favorite(&restaurant_id).await?;
    Ok(Json(FavoritesResponse {
        restaurant_ids: ctx.customer().favorite_restaurants.clone(),
        changed,
    }))
}

/// Endpoint: GET /account/reviews
async fn list_reviews(State(state): State<SharedState>, user: AuthUser) -> Result<Json<Vec<Review>>> {
    let ctx = context(&state, &user).await?;
    Ok(Json(ctx.reviews().to_vec()))
}

/// Endpoint: POST /account/reviews
async fn submit_review(
    State(state): State<SharedState>,
    user: AuthUser,
    Json(review): Json<NewReview>,
) -> Result<(StatusCode, Json<Review>)> {
    let mut ctx = context(&state, &user).await?;
    let stored = ctx.submit_review(review).await?;
    Ok((StatusCode::CREATED, Json(stored)))
}

/// Endpoint: GET /account/loyalty
async fn get_loyalty(
    State(state): State<SharedState>,
    user: AuthUser,
) -> Result<Json<LoyaltySummary>> {
    let ctx = context(&state, &user).await?;
    Ok(Json(ctx.loyalty()))
}
