use thiserror::Error;

use crate::sdk::SdkError;

/// Customer account rule violations.
#[derive(Debug, Error)]
pub enum CustomerError {
    #[error("rating must be between 1 and 5, got {0}")]
    InvalidRating(u8),

    #[error("review comment cannot be empty")]
    EmptyComment,

    #[error("first name cannot be empty")]
    MissingName,

    #[error("not enough loyalty points: requested {requested}, available {available}")]
    InsufficientPoints { requested: u64, available: u64 },

    #[error("restaurant {0} not found")]
    RestaurantNotFound(String),

    #[error("order {0} not found for this customer and restaurant")]
    OrderNotFound(String),

    #[error("order {0} has already been reviewed")]
    AlreadyReviewed(String),

    #[error(transparent)]
    Sdk(#[from] SdkError),
}
