//! Shopping Cart Domain Module
//!
//! This module contains all shopping cart business logic, including:
//! - Domain models (CartItem, Cart, totals, request/response bodies)
//! - Business logic helpers (customization checks, merging, totals)
//! - Cart persistence per session and restaurant
//! - REST API handlers

pub mod error;
pub mod handlers;
pub mod helpers;
pub mod models;
pub mod session;
pub mod storage;

// Re-export commonly used types for convenience
pub use error::CartError;
pub use handlers::routes;
pub use models::{Cart, CartItem, CartTotals, Pricing};
pub use storage::{CartKey, CartStore, FileCartStore, MemoryCartStore};
