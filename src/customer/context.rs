//! Customer context
//!
//! Aggregates one user's profile, order history and reviews, and keeps that
//! snapshot in step with the backend. Every mutation writes to the backend
//! first and only replaces the local snapshot once the write succeeded, so a
//! failed call leaves the context exactly as it was.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{error, info, warn};

use super::auth::AuthUser;
use super::error::CustomerError;
use super::loyalty::LoyaltySummary;
use crate::models::customer::NewCustomer;
use crate::models::{Address, Customer, Order, Restaurant, Review};
use crate::restaurant::service::refresh_rating;
use crate::sdk::{collections, Predicate, Sdk, SdkError, SortDirection};

/// Partial profile update; absent fields are left untouched.
#[derive(Debug, Default, Deserialize)]
pub struct ProfileUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub default_address: Option<Address>,
    pub marketing_opt_in: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewReview {
    pub restaurant_id: String,
    #[serde(default)]
    pub order_id: Option<String>,
    pub rating: u8,
    pub comment: String,
}

#[derive(Serialize)]
struct ReviewRecord<'a> {
    customer_id: &'a str,
    customer_name: String,
    restaurant_id: &'a str,
    order_id: Option<&'a str>,
    rating: u8,
    comment: &'a str,
}

pub struct CustomerContext {
    sdk: Sdk,
    customer: Customer,
    orders: Vec<Order>,
    reviews: Vec<Review>,
}

impl CustomerContext {
    /// Loads the context for `user`, creating the profile on first visit.
    pub async fn load(sdk: Sdk, user: &AuthUser) -> Result<Self, CustomerError> {
        let existing = sdk
            .query_builder::<Customer>(collections::CUSTOMERS)
            .filter(Predicate::eq("user_id", user.user_id.as_str()))
            .first()
            .await?;

        let customer = match existing {
            Some(customer) => customer,
            None => {
                let (first_name, last_name) = user.name_parts();
                let profile = NewCustomer {
                    user_id: user.user_id.clone(),
                    email: user.email.clone(),
                    first_name,
                    last_name,
                    favorite_restaurants: Vec::new(),
                    loyalty_points: 0,
                    lifetime_points: 0,
                    total_orders: 0,
                    total_spent_cents: 0,
                    marketing_opt_in: false,
                };
                let created: Customer = sdk.insert(collections::CUSTOMERS, &profile).await?;
                info!(user_id = %user.user_id, customer_id = %created.id, "Created customer profile");
                created
            }
        };

        let (orders, reviews) = futures_util::try_join!(
            fetch_orders(&sdk, &customer.id),
            fetch_reviews(&sdk, &customer.id)
        )?;

        Ok(Self {
            sdk,
            customer,
            orders,
            reviews,
        })
    }

    pub fn customer(&self) -> &Customer {
        &self.customer
    }

    /// Newest first.
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn order(&self, id: &str) -> Option<&Order> {
        self.orders.iter().find(|o| o.id == id)
    }

    /// Newest first.
    pub fn reviews(&self) -> &[Review] {
        &self.reviews
    }

    pub fn loyalty(&self) -> LoyaltySummary {
        LoyaltySummary::for_customer(&self.customer)
    }

    pub fn is_favorite(&self, restaurant_id: &str) -> bool {
        self.customer
            .favorite_restaurants
            .iter()
            .any(|id| id == restaurant_id)
    }

    /// Re-reads orders and reviews from the backend.
    pub async fn refresh(&mut self) -> Result<(), CustomerError> {
        let (orders, reviews) = futures_util::try_join!(
            fetch_orders(&self.sdk, &self.customer.id),
            fetch_reviews(&self.sdk, &self.customer.id)
        )?;
        self.orders = orders;
        self.reviews = reviews;
        Ok(())
    }

    pub async fn update_profile(&mut self, update: ProfileUpdate) -> Result<&Customer, CustomerError> {
        let mut patch = Map::new();
        if let Some(first_name) = update.first_name {
            let first_name = first_name.trim();
            if first_name.is_empty() {
                return Err(CustomerError::MissingName);
            }
            patch.insert("first_name".into(), first_name.into());
        }
        if let Some(last_name) = update.last_name {
            patch.insert("last_name".into(), last_name.trim().into());
        }
        if let Some(phone) = update.phone {
            let phone = phone.trim();
            let value = if phone.is_empty() { Value::Null } else { phone.into() };
            patch.insert("phone".into(), value);
        }
        if let Some(address) = update.default_address {
            patch.insert("default_address".into(), serde_json::to_value(address).map_err(SdkError::from)?);
        }
        if let Some(opt_in) = update.marketing_opt_in {
            patch.insert("marketing_opt_in".into(), opt_in.into());
        }

        if !patch.is_empty() {
            self.commit(Value::Object(patch), "update profile").await?;
        }
        Ok(&self.customer)
    }

    /// Folds a placed order into the customer's stats and loyalty balance.
    pub async fn record_order(&mut self, order: &Order) -> Result<(), CustomerError> {
        let current = &self.customer;
        let patch = serde_json::json!({
            "total_orders": current.total_orders + 1,
            "total_spent_cents": current.total_spent_cents + order.total_cents,
            "loyalty_points": (current.loyalty_points + order.points_earned)
                .saturating_sub(order.points_redeemed),
            "lifetime_points": current.lifetime_points + order.points_earned,
        });

        self.commit(patch, "record order").await?;
        self.orders.insert(0, order.clone());
        Ok(())
    }

    /// Returns `false` when the restaurant already was a favorite.
    pub async fn add_favorite(&mut self, restaurant_id: &str) -> Result<bool, CustomerError> {
        if self.is_favorite(restaurant_id) {
            return Ok(false);
        }
        let mut favorites = self.customer.favorite_restaurants.clone();
        favorites.push(restaurant_id.to_string());

        self.commit(serde_json::json!({ "favorite_restaurants": favorites }), "add favorite")
            .await?;
        Ok(true)
    }

    /// Returns `false` when the restaurant was not a favorite.
    pub async fn remove_favorite(&mut self, restaurant_id: &str) -> Result<bool, CustomerError> {
        if !self.is_favorite(restaurant_id) {
            return Ok(false);
        }
        let favorites: Vec<&String> = self
            .customer
            .favorite_restaurants
            .iter()
            .filter(|id| *id != restaurant_id)
            .collect();
        let patch = serde_json::json!({ "favorite_restaurants": favorites });

        self.commit(patch, "remove favorite").await?;
        Ok(true)
    }

    pub async fn submit_review(&mut self, review: NewReview) -> Result<Review, CustomerError> {
        if !(1..=5).contains(&review.rating) {
            return Err(CustomerError::InvalidRating(review.rating));
        }
        let comment = review.comment.trim();
        if comment.is_empty() {
            return Err(CustomerError::EmptyComment);
        }

        if let Some(order_id) = review.order_id.as_deref() {
            let ordered_there = self
                .order(order_id)
                .is_some_and(|o| o.restaurant_id == review.restaurant_id);
            if !ordered_there {
                return Err(CustomerError::OrderNotFound(order_id.to_string()));
            }
            if self.reviews.iter().any(|r| r.order_id.as_deref() == Some(order_id)) {
                return Err(CustomerError::AlreadyReviewed(order_id.to_string()));
            }
        }

        let restaurant = self
            .sdk
            .query_builder::<Restaurant>(collections::RESTAURANTS)
            .filter(Predicate::eq("id", review.restaurant_id.as_str()))
            .first()
            .await?;
        if restaurant.is_none() {
            return Err(CustomerError::RestaurantNotFound(review.restaurant_id));
        }

        let customer_name = match self.customer.full_name() {
            name if name.is_empty() => self.customer.email.clone(),
            name => name,
        };
        let record = ReviewRecord {
            customer_id: &self.customer.id,
            customer_name,
            restaurant_id: &review.restaurant_id,
            order_id: review.order_id.as_deref(),
            rating: review.rating,
            comment,
        };
        let stored: Review = self.sdk.insert(collections::REVIEWS, &record).await?;
        self.reviews.insert(0, stored.clone());

        // The review itself is saved; a stale aggregate is recomputed on the next review
        if let Err(e) = refresh_rating(&self.sdk, &review.restaurant_id).await {
            warn!(restaurant_id = %review.restaurant_id, error = %e, "Failed to refresh restaurant rating");
        }

        info!(customer_id = %self.customer.id, restaurant_id = %stored.restaurant_id, rating = stored.rating, "Review submitted");
        Ok(stored)
    }

    /// Writes `patch` to the customer record and adopts the result.
    async fn commit(&mut self, patch: Value, action: &str) -> Result<(), CustomerError> {
        match self
            .sdk
            .update::<Customer, _>(collections::CUSTOMERS, &self.customer.id, &patch)
            .await
        {
            Ok(updated) => {
                self.customer = updated;
                Ok(())
            }
            Err(e) => {
                error!(customer_id = %self.customer.id, action, error = %e, "Customer update failed");
                Err(e.into())
            }
        }
    }
}

async fn fetch_orders(sdk: &Sdk, customer_id: &str) -> Result<Vec<Order>, SdkError> {
    sdk.query_builder::<Order>(collections::ORDERS)
        .filter(Predicate::eq("customer_id", customer_id))
        .sort("created_at", SortDirection::Desc)
        .exec()
        .await
}

async fn fetch_reviews(sdk: &Sdk, customer_id: &str) -> Result<Vec<Review>, SdkError> {
    sdk.query_builder::<Review>(collections::REVIEWS)
        .filter(Predicate::eq("customer_id", customer_id))
        .sort("created_at", SortDirection::Desc)
        .exec()
        .await
}
