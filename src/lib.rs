//! Restaurant Ordering Library
//!
//! This library provides the core of a restaurant ordering service: menus,
//! per-restaurant shopping carts, checkout, the customer account portal
//! (orders, favorites, loyalty, reviews) and a blog, all backed by a
//! query-builder client over a hosted data service.

// Domain modules
pub mod blog;
pub mod cart;
pub mod checkout;
pub mod customer;
pub mod models;
pub mod restaurant;

// Infrastructure
pub mod config;
pub mod error;
pub mod router;
pub mod sdk;
pub mod state;
pub mod telemetry;
