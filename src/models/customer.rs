use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Postal address used for delivery.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Address {
    pub line1: String,
    pub line2: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub instructions: Option<String>,
}

impl Address {
    /// An address is usable for delivery once street, city and postal code are set.
    pub fn is_deliverable(&self) -> bool {
        !self.line1.trim().is_empty()
            && !self.city.trim().is_empty()
            && !self.postal_code.trim().is_empty()
    }
}

/// Customer profile linked to an authenticated user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Customer {
    pub id: String,
    /// Identity of the user in the auth provider.
    pub user_id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub default_address: Option<Address>,
    /// Restaurant ids, never duplicated.
    pub favorite_restaurants: Vec<String>,
    /// Spendable balance.
    pub loyalty_points: u64,
    /// Everything ever earned; drives the tier.
    pub lifetime_points: u64,
    pub total_orders: u32,
    pub total_spent_cents: u64,
    pub marketing_opt_in: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Customer {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// Insert payload for a freshly created profile.
#[derive(Debug, Serialize)]
pub struct NewCustomer {
    pub user_id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub favorite_restaurants: Vec<String>,
    pub loyalty_points: u64,
    pub lifetime_points: u64,
    pub total_orders: u32,
    pub total_spent_cents: u64,
    pub marketing_opt_in: bool,
}
