//! Cart rule violations and storage failures.

use thiserror::Error;

use super::models::MAX_LINE_QUANTITY;

#[derive(Debug, Error)]
pub enum CartError {
    #[error("quantity must be between 1 and {}", MAX_LINE_QUANTITY)]
    InvalidQuantity,

    #[error("{0} is not available right now")]
    ItemUnavailable(String),

    #[error("{item} is not on the menu of this restaurant")]
    WrongRestaurant { item: String },

    #[error("please choose an option for {0}")]
    MissingRequiredCustomization(String),

    #[error("{group} has no option named {option}")]
    UnknownCustomization { group: String, option: String },

    #[error("at most {max} selection(s) allowed for {group}")]
    TooManySelections { group: String, max: u32 },

    #[error("cart line {0} not found")]
    LineNotFound(String),

    #[error("cart is empty")]
    EmptyCart,

    #[error("invalid cart key segment: {0}")]
    InvalidKey(String),

    #[error("cart storage error: {0}")]
    Io(#[from] std::io::Error),

    #[error("cart serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CartError {
    /// True for failures of the storage layer rather than of the request.
    pub fn is_storage(&self) -> bool {
        matches!(self, Self::Io(_) | Self::Serialization(_))
    }
}
