use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Restaurant {
    pub id: String,
    pub slug: String,
    pub name: String,
    pub description: String,
    pub cuisine: String,
    pub address: String,
    pub phone: String,
    pub image_url: Option<String>,
    /// Average review rating, 0 when unreviewed.
    pub rating: f64,
    pub review_count: u32,
    pub is_active: bool,
    pub accepts_delivery: bool,
    pub accepts_pickup: bool,
    /// Overrides the configured default when set.
    pub delivery_fee_cents: Option<u64>,
    /// Overrides the configured default when set.
    pub tax_rate_bps: Option<u32>,
    pub min_order_cents: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomizationOption {
    pub name: String,
    pub price_cents: u64,
}

/// A set of choices offered for a menu item (size, toppings, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomizationGroup {
    pub name: String,
    /// At least one option must be selected before the item enters a cart.
    pub required: bool,
    pub max_selections: Option<u32>,
    pub options: Vec<CustomizationOption>,
}

impl CustomizationGroup {
    pub fn option(&self, name: &str) -> Option<&CustomizationOption> {
        self.options.iter().find(|o| o.name == name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MenuItem {
    pub id: String,
    pub restaurant_id: String,
    pub name: String,
    pub description: String,
    pub price_cents: u64,
    pub category: String,
    pub image_url: Option<String>,
    pub is_available: bool,
    pub sort_order: i32,
    pub customization_groups: Vec<CustomizationGroup>,
}

impl MenuItem {
    pub fn group(&self, name: &str) -> Option<&CustomizationGroup> {
        self.customization_groups.iter().find(|g| g.name == name)
    }
}

/// A priced choice recorded on a cart line or order line.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectedCustomization {
    pub group: String,
    pub option: String,
    pub price_cents: u64,
}
