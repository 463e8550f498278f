//! REST API handlers for restaurants and menus

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use super::service::{self, MenuCategory};
use crate::error::Result;
use crate::models::{Restaurant, Review};
use crate::state::SharedState;

const DEFAULT_REVIEW_LIMIT: usize = 20;

/// Creates routes for restaurant browsing
pub fn routes() -> Router<SharedState> {
    Router::new()
        .route("/restaurants", get(list_restaurants))
        .route("/restaurants/:slug", get(get_restaurant))
        .route("/restaurants/:slug/menu", get(get_menu))
        .route("/restaurants/:slug/reviews", get(get_reviews))
}

#[derive(Debug, Deserialize)]
struct ListParams {
    cuisine: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ReviewParams {
    limit: Option<usize>,
}

/// Endpoint: GET /restaurants
async fn list_restaurants(
    State(state): State<SharedState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Restaurant>>> {
    let restaurants = service::list_restaurants(&state.sdk, params.cuisine.as_deref()).await?;
    Ok(Json(restaurants))
}

/// Endpoint: GET /restaurants/:slug
async fn get_restaurant(
    State(state): State<SharedState>,
    Path(slug): Path<String>,
) -> Result<Json<Restaurant>> {
    Ok(Json(service::restaurant_by_slug(&state.sdk, &slug).await?))
}

/// Endpoint: GET /restaurants/:slug/menu
async fn get_menu(
    State(state): State<SharedState>,
    Path(slug): Path<String>,
) -> Result<Json<Vec<MenuCategory>>> {
    let restaurant = service::restaurant_by_slug(&state.sdk, &slug).await?;
    let items = service::menu(&state.sdk, &restaurant.id).await?;
    Ok(Json(service::group_by_category(items)))
}

/// Endpoint: GET /restaurants/:slug/reviews
async fn get_reviews(
    State(state): State<SharedState>,
    Path(slug): Path<String>,
    Query(params): Query<ReviewParams>,
) -> Result<Json<Vec<Review>>> {
    let restaurant = service::restaurant_by_slug(&state.sdk, &slug).await?;
    let limit = params.limit.unwrap_or(DEFAULT_REVIEW_LIMIT).clamp(1, 100);
    let reviews = service::restaurant_reviews(&state.sdk, &restaurant.id, limit).await?;
    Ok(Json(reviews))
}
