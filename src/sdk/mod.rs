//! Backend data access
//!
//! All persistence goes through an opaque hosted data service. This module
//! defines the contract the application relies on:
//! - `Backend`: the raw collection interface a service adapter implements
//! - `Sdk` / `QueryBuilder`: typed querying with filters, sorting and limits
//! - `MemoryBackend`: an in-process implementation for local runs and tests

pub mod backend;
pub mod client;
pub mod error;
pub mod memory;
pub mod query;

pub use backend::Backend;
pub use client::Sdk;
pub use error::SdkError;
pub use memory::MemoryBackend;
pub use query::{Predicate, Query, QueryBuilder, SortDirection};

/// Collection names used by the application.
pub mod collections {
    pub const CUSTOMERS: &str = "customers";
    pub const ORDERS: &str = "orders";
    pub const REVIEWS: &str = "reviews";
    pub const RESTAURANTS: &str = "restaurants";
    pub const MENU_ITEMS: &str = "menu_items";
    pub const BLOG_POSTS: &str = "blog_posts";
    pub const BLOG_COMMENTS: &str = "blog_comments";
}
