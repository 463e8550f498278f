//! Restaurant lookups over the backend.

use serde::Serialize;

use crate::error::AppError;
use crate::models::{MenuItem, Restaurant, Review};
use crate::sdk::{collections, Predicate, Sdk, SdkError, SortDirection};

/// Menu items sharing a category, in menu order.
#[derive(Debug, Serialize)]
pub struct MenuCategory {
    pub name: String,
    pub items: Vec<MenuItem>,
}

/// Active restaurants sorted by name, optionally narrowed to a cuisine.
pub async fn list_restaurants(sdk: &Sdk, cuisine: Option<&str>) -> Result<Vec<Restaurant>, SdkError> {
    let mut query = sdk
        .query_builder::<Restaurant>(collections::RESTAURANTS)
        .filter(Predicate::eq("is_active", true));
    if let Some(cuisine) = cuisine {
        query = query.filter(Predicate::eq("cuisine", cuisine));
    }
    query.sort_asc("name").exec().await
}

/// The active restaurant with this slug.
pub async fn restaurant_by_slug(sdk: &Sdk, slug: &str) -> Result<Restaurant, AppError> {
    sdk.query_builder::<Restaurant>(collections::RESTAURANTS)
        .filter(Predicate::eq("slug", slug))
        .filter(Predicate::eq("is_active", true))
        .first()
        .await?
        .ok_or_else(|| AppError::NotFound(format!("restaurant {slug}")))
}

/// Available menu items in menu order.
pub async fn menu(sdk: &Sdk, restaurant_id: &str) -> Result<Vec<MenuItem>, SdkError> {
    sdk.query_builder::<MenuItem>(collections::MENU_ITEMS)
        .filter(Predicate::eq("restaurant_id", restaurant_id))
        .filter(Predicate::eq("is_available", true))
        .sort_asc("category")
        .sort_asc("sort_order")
        .sort_asc("name")
        .exec()
        .await
}

pub async fn menu_item(sdk: &Sdk, id: &str) -> Result<Option<MenuItem>, SdkError> {
    sdk.query_builder::<MenuItem>(collections::MENU_ITEMS)
        .filter(Predicate::eq("id", id))
        .first()
        .await
}

/// Newest reviews first.
pub async fn restaurant_reviews(
    sdk: &Sdk,
    restaurant_id: &str,
    limit: usize,
) -> Result<Vec<Review>, SdkError> {
    sdk.query_builder::<Review>(collections::REVIEWS)
        .filter(Predicate::eq("restaurant_id", restaurant_id))
        .sort("created_at", SortDirection::Desc)
        .limit(limit)
        .exec()
        .await
}

/// Recomputes a restaurant's average rating and review count from its reviews.
pub async fn refresh_rating(sdk: &Sdk, restaurant_id: &str) -> Result<Restaurant, SdkError> {
    let reviews = sdk
        .query_builder::<Review>(collections::REVIEWS)
        .filter(Predicate::eq("restaurant_id", restaurant_id))
        .exec()
        .await?;

    let count = reviews.len();
    let rating = if count == 0 {
        0.0
    } else {
        let sum: u32 = reviews.iter().map(|r| u32::from(r.rating)).sum();
        (f64::from(sum) / count as f64 * 10.0).round() / 10.0
    };

    sdk.update(
        collections::RESTAURANTS,
        restaurant_id,
        &serde_json::json!({ "rating": rating, "review_count": count }),
    )
    .await
}

/// Groups items by category, keeping the incoming order.
pub fn group_by_category(items: Vec<MenuItem>) -> Vec<MenuCategory> {
    let mut categories: Vec<MenuCategory> = Vec::new();
    for item in items {
        match categories.iter_mut().find(|c| c.name == item.category) {
            Some(category) => category.items.push(item),
            None => categories.push(MenuCategory {
                name: item.category.clone(),
                items: vec![item],
            }),
        }
    }
    categories
}
