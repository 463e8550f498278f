//! Order placement from a stored cart.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::cart::{helpers, CartError, CartItem, CartKey};
use crate::customer::loyalty::{points_for_total, redeemable_points, LoyaltySummary, POINT_VALUE_CENTS};
use crate::customer::{AuthUser, CustomerContext};
use crate::error::{AppError, Result};
use crate::models::order::generate_order_number;
use crate::models::{Address, ContactInfo, Order, OrderLine, OrderStatus, OrderType, Restaurant};
use crate::restaurant::restaurant_by_slug;
use crate::sdk::collections;
use crate::state::AppState;

/// Input for placing an order
#[derive(Debug, Default, Deserialize)]
pub struct CheckoutRequest {
    #[serde(default)]
    pub order_type: OrderType,
    #[serde(default)]
    pub delivery_address: Option<Address>,
    /// Required for guests; overrides profile details for signed-in customers.
    #[serde(default)]
    pub contact: Option<ContactInfo>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub redeem_points: u64,
}

#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub order: Order,
    /// Present for signed-in customers.
    pub loyalty: Option<LoyaltySummary>,
}

/// Formats cents as a dollar amount, e.g. `$12.50`.
pub fn format_cents(cents: u64) -> String {
    format!("${}.{:02}", cents / 100, cents % 100)
}

fn order_line(item: &CartItem) -> OrderLine {
    OrderLine {
        menu_item_id: item.menu_item_id.clone(),
        name: item.name.clone(),
        quantity: item.quantity,
        unit_price_cents: item.unit_price_cents,
        customizations: item.customizations.clone(),
        special_instructions: item.special_instructions.clone(),
        line_total_cents: item.line_total_cents(),
    }
}

fn check_order_type(restaurant: &Restaurant, order_type: OrderType) -> Result<()> {
    let supported = match order_type {
        OrderType::Delivery => restaurant.accepts_delivery,
        OrderType::Pickup => restaurant.accepts_pickup,
    };
    if supported {
        Ok(())
    } else {
        let kind = match order_type {
            OrderType::Delivery => "delivery",
            OrderType::Pickup => "pickup",
        };
        Err(AppError::Unprocessable(format!(
            "{} does not offer {kind}",
            restaurant.name
        )))
    }
}

fn resolve_contact(request: Option<ContactInfo>, customer: Option<&CustomerContext>) -> Result<ContactInfo> {
    let request = request.unwrap_or_default();
    let contact = match customer.map(CustomerContext::customer) {
        Some(profile) => ContactInfo {
            name: Some(request.name)
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| profile.full_name()),
            email: Some(request.email)
                .filter(|e| !e.trim().is_empty())
                .unwrap_or_else(|| profile.email.clone()),
            phone: request.phone.or_else(|| profile.phone.clone()),
        },
        None => request,
    };

    if contact.name.trim().is_empty() {
        return Err(AppError::Unprocessable("contact name is required".into()));
    }
    if !contact.email.contains('@') {
        return Err(AppError::Unprocessable("a valid contact email is required".into()));
    }
    Ok(contact)
}

/// Turns the stored cart into an order.
///
/// The cart is only removed once the order has been stored; if storing fails
/// the cart stays as it was.
pub async fn place_order(
    state: &AppState,
    key: &CartKey,
    request: CheckoutRequest,
    user: Option<&AuthUser>,
) -> Result<CheckoutResponse> {
    let restaurant = restaurant_by_slug(&state.sdk, key.restaurant_slug()).await?;
    let cart = state
        .carts
        .load(key)
        .await?
        .filter(|cart| !cart.is_empty())
        .ok_or(CartError::EmptyCart)?;

    check_order_type(&restaurant, request.order_type)?;

    let subtotal_cents = cart.subtotal_cents();
    if subtotal_cents < restaurant.min_order_cents {
        return Err(AppError::Unprocessable(format!(
            "minimum order at {} is {}",
            restaurant.name,
            format_cents(restaurant.min_order_cents)
        )));
    }

    let mut customer = match user {
        Some(user) => Some(CustomerContext::load(state.sdk.clone(), user).await?),
        None => None,
    };

    let delivery_address = match request.order_type {
        OrderType::Pickup => None,
        OrderType::Delivery => {
            let address = request
                .delivery_address
                .or_else(|| customer.as_ref().and_then(|c| c.customer().default_address.clone()))
                .filter(Address::is_deliverable)
                .ok_or_else(|| AppError::Unprocessable("a delivery address is required".into()))?;
            Some(address)
        }
    };

    let contact = resolve_contact(request.contact, customer.as_ref())?;

    let points_redeemed = match (&customer, request.redeem_points) {
        (_, 0) => 0,
        (Some(ctx), requested) => {
            redeemable_points(requested, ctx.customer().loyalty_points, subtotal_cents)?
        }
        (None, _) => {
            return Err(AppError::Unprocessable(
                "sign in to redeem loyalty points".into(),
            ))
        }
    };

    let pricing = state.config.pricing_for(&restaurant);
    let totals = helpers::calculate_totals(
        &cart,
        pricing,
        request.order_type,
        points_redeemed * POINT_VALUE_CENTS,
    );
    let points_earned = if customer.is_some() {
        points_for_total(totals.total_cents)
    } else {
        0
    };

    let draft = Order {
        id: String::new(),
        order_number: generate_order_number(),
        customer_id: customer.as_ref().map(|c| c.customer().id.clone()),
        restaurant_id: restaurant.id.clone(),
        restaurant_slug: restaurant.slug.clone(),
        lines: cart.items.iter().map(order_line).collect(),
        order_type: request.order_type,
        status: OrderStatus::Pending,
        subtotal_cents: totals.subtotal_cents,
        tax_cents: totals.tax_cents,
        delivery_fee_cents: totals.delivery_fee_cents,
        discount_cents: totals.discount_cents,
        total_cents: totals.total_cents,
        points_earned,
        points_redeemed,
        contact,
        delivery_address,
        notes: request
            .notes
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty()),
        created_at: Utc::now(),
    };

    let order: Order = state.sdk.insert(collections::ORDERS, &draft).await?;

    info!(
        order_number = %order.order_number,
        restaurant = %restaurant.slug,
        total = %format_cents(order.total_cents),
        items = %helpers::format_item_summary(&cart.items),
        "Order placed"
    );

    // The order exists from here on; later failures are logged, not returned
    if let Some(ctx) = customer.as_mut() {
        if let Err(e) = ctx.record_order(&order).await {
            error!(order_number = %order.order_number, error = %e, "Failed to update customer stats");
        }
    }
    if let Err(e) = state.carts.remove(key).await {
        error!(cart = %key.storage_key(), error = %e, "Failed to clear cart after checkout");
    }

    Ok(CheckoutResponse {
        order,
        loyalty: customer.as_ref().map(CustomerContext::loyalty),
    })
}
