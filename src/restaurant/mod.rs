//! Restaurants, menus and restaurant reviews.

pub mod handlers;
pub mod service;

pub use handlers::routes;
pub use service::{menu, menu_item, restaurant_by_slug, MenuCategory};
