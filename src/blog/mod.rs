//! Blog posts and reader comments.

pub mod handlers;
pub mod service;

pub use handlers::routes;
