//! Checkout: turning a session's cart into a placed order.

pub mod handlers;
pub mod service;

pub use handlers::routes;
pub use service::{place_order, CheckoutRequest, CheckoutResponse};
