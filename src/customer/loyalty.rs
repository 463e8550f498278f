//! Loyalty point math.
//!
//! Customers earn one point per whole currency unit of an order's total and
//! may spend points at checkout, one cent of discount per point. Tiers follow
//! lifetime points so spending never demotes anyone.

use serde::Serialize;

use super::error::CustomerError;
use crate::models::Customer;

/// Discount granted per redeemed point.
pub const POINT_VALUE_CENTS: u64 = 1;

const SILVER_THRESHOLD: u64 = 500;
const GOLD_THRESHOLD: u64 = 2000;

/// Points earned for an order total: `floor(total)`.
pub fn points_for_total(total_cents: u64) -> u64 {
    total_cents / 100
}

/// Checks a redemption request and returns the points actually spent.
///
/// Spending is capped so the discount never exceeds the subtotal.
pub fn redeemable_points(
    requested: u64,
    available: u64,
    subtotal_cents: u64,
) -> Result<u64, CustomerError> {
    if requested > available {
        return Err(CustomerError::InsufficientPoints {
            requested,
            available,
        });
    }
    Ok(requested.min(subtotal_cents / POINT_VALUE_CENTS))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoyaltyTier {
    Bronze,
    Silver,
    Gold,
}

impl LoyaltyTier {
    pub fn for_lifetime_points(points: u64) -> Self {
        match points {
            p if p >= GOLD_THRESHOLD => Self::Gold,
            p if p >= SILVER_THRESHOLD => Self::Silver,
            _ => Self::Bronze,
        }
    }

    pub fn next(self) -> Option<(Self, u64)> {
        match self {
            Self::Bronze => Some((Self::Silver, SILVER_THRESHOLD)),
            Self::Silver => Some((Self::Gold, GOLD_THRESHOLD)),
            Self::Gold => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoyaltySummary {
    pub points: u64,
    pub lifetime_points: u64,
    pub tier: LoyaltyTier,
    pub next_tier: Option<LoyaltyTier>,
    pub points_to_next_tier: Option<u64>,
    pub point_value_cents: u64,
}

impl LoyaltySummary {
    pub fn for_customer(customer: &Customer) -> Self {
        let tier = LoyaltyTier::for_lifetime_points(customer.lifetime_points);
        let next = tier.next();
        Self {
            points: customer.loyalty_points,
            lifetime_points: customer.lifetime_points,
            tier,
            next_tier: next.map(|(t, _)| t),
            points_to_next_tier: next.map(|(_, at)| at - customer.lifetime_points),
            point_value_cents: POINT_VALUE_CENTS,
        }
    }
}
