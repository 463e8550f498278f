//! Persisted records as stored in the backend collections.
//!
//! Records are read leniently: missing fields fall back to their defaults,
//! since the backend may return partially populated documents.

pub mod blog;
pub mod customer;
pub mod order;
pub mod restaurant;
pub mod review;

pub use blog::{BlogComment, BlogPost};
pub use customer::{Address, Customer};
pub use order::{ContactInfo, Order, OrderLine, OrderStatus, OrderType};
pub use restaurant::{
    CustomizationGroup, CustomizationOption, MenuItem, Restaurant, SelectedCustomization,
};
pub use review::Review;
