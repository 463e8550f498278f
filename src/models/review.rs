use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Review {
    pub id: String,
    pub customer_id: String,
    pub customer_name: String,
    pub restaurant_id: String,
    pub order_id: Option<String>,
    /// 1 to 5 stars.
    pub rating: u8,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}
