//! Customer Account Module
//!
//! This module contains the customer-facing account logic:
//! - The customer context (profile, orders, reviews, favorites)
//! - Loyalty point math and tiers
//! - The identity extractor for signed-in requests
//! - REST API handlers for the account portal

pub mod auth;
pub mod context;
pub mod error;
pub mod handlers;
pub mod loyalty;

pub use auth::AuthUser;
pub use context::CustomerContext;
pub use error::CustomerError;
pub use handlers::routes;
