//! Shopping Cart Domain Models
//!
//! This module contains all data structures related to the shopping cart
//! business domain.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{OrderType, SelectedCustomization};

// =============================================================================
// Cart Domain Models
// =============================================================================

/// Largest quantity a single cart line may hold.
pub const MAX_LINE_QUANTITY: u32 = 99;

/// Returns the default quantity (1) for cart items
fn default_quantity() -> u32 {
    1
}

/// One line of the cart: a menu item in a specific configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CartItem {
    /// Stable identifier used to update or remove the line
    pub line_id: String,

    pub menu_item_id: String,

    /// Name of the menu item at the time it was added
    pub name: String,

    /// Base price of one unit, excluding customizations
    pub unit_price_cents: u64,

    /// Quantity of this line (defaults to 1)
    #[serde(default = "default_quantity")]
    pub quantity: u32,

    /// Chosen options, kept sorted by group then option
    #[serde(default)]
    pub customizations: Vec<SelectedCustomization>,

    #[serde(default)]
    pub special_instructions: Option<String>,
}

impl CartItem {
    /// Price of one unit including every customization.
    pub fn unit_total_cents(&self) -> u64 {
        self.unit_price_cents + self.customizations.iter().map(|c| c.price_cents).sum::<u64>()
    }

    pub fn line_total_cents(&self) -> u64 {
        self.unit_total_cents().saturating_mul(u64::from(self.quantity))
    }

    /// Whether this line holds the same item with the same customizations.
    pub fn same_configuration(&self, other: &CartItem) -> bool {
        self.menu_item_id == other.menu_item_id && self.customizations == other.customizations
    }
}

/// Cart for a single restaurant, as persisted in cart storage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Cart {
    pub restaurant_slug: String,
    #[serde(default)]
    pub items: Vec<CartItem>,
    pub updated_at: DateTime<Utc>,
}

impl Cart {
    pub fn new(restaurant_slug: impl Into<String>) -> Self {
        Self {
            restaurant_slug: restaurant_slug.into(),
            items: Vec::new(),
            updated_at: Utc::now(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total number of units across all lines.
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    pub fn subtotal_cents(&self) -> u64 {
        self.items
            .iter()
            .map(CartItem::line_total_cents)
            .fold(0, u64::saturating_add)
    }
}

// =============================================================================
// Request / Response Models
// =============================================================================

/// A customization picked by the customer, before pricing.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct CustomizationChoice {
    pub group: String,
    pub option: String,
}

/// Input for adding a menu item to the cart
#[derive(Debug, Clone, Deserialize)]
pub struct AddItemRequest {
    pub menu_item_id: String,

    #[serde(default = "default_quantity")]
    pub quantity: u32,

    #[serde(default)]
    pub selections: Vec<CustomizationChoice>,

    #[serde(default)]
    pub special_instructions: Option<String>,
}

/// Input for changing a line's quantity; 0 removes the line
#[derive(Debug, Deserialize)]
pub struct UpdateQuantityRequest {
    pub quantity: u32,
}

/// Query parameters for reading a cart
#[derive(Debug, Default, Deserialize)]
pub struct CartQuery {
    #[serde(default)]
    pub order_type: OrderType,
}

/// Tax and fee settings that apply to one restaurant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pricing {
    pub tax_rate_bps: u32,
    pub delivery_fee_cents: u64,
}

/// Cart price totals.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct CartTotals {
    pub subtotal_cents: u64,
    pub tax_cents: u64,
    pub delivery_fee_cents: u64,
    pub discount_cents: u64,
    pub total_cents: u64,
    pub item_count: u64,
}

/// Response body for every cart endpoint
#[derive(Debug, Serialize)]
pub struct CartResponse {
    pub restaurant_slug: String,
    pub items: Vec<CartItem>,
    pub totals: CartTotals,
}
