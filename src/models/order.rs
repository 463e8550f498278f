use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::customer::Address;
use super::restaurant::SelectedCustomization;

/// How the customer receives the order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderType {
    Delivery,
    #[default]
    Pickup,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Preparing,
    Ready,
    OutForDelivery,
    Delivered,
    Completed,
    Cancelled,
}

/// Who to contact about an order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactInfo {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

/// A cart line frozen into an order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderLine {
    pub menu_item_id: String,
    pub name: String,
    pub quantity: u32,
    pub unit_price_cents: u64,
    pub customizations: Vec<SelectedCustomization>,
    pub special_instructions: Option<String>,
    pub line_total_cents: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Order {
    /// Empty until the backend assigns one.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub order_number: String,
    /// `None` for guest checkouts.
    pub customer_id: Option<String>,
    pub restaurant_id: String,
    pub restaurant_slug: String,
    pub lines: Vec<OrderLine>,
    pub order_type: OrderType,
    pub status: OrderStatus,
    pub subtotal_cents: u64,
    pub tax_cents: u64,
    pub delivery_fee_cents: u64,
    pub discount_cents: u64,
    pub total_cents: u64,
    pub points_earned: u64,
    pub points_redeemed: u64,
    pub contact: ContactInfo,
    pub delivery_address: Option<Address>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Human-facing order reference, e.g. `ORD-3F9A1C07`.
pub fn generate_order_number() -> String {
    let id = Uuid::new_v4().simple().to_string().to_uppercase();
    format!("ORD-{}", &id[..8])
}
