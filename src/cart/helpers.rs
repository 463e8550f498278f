//! Shopping Cart Business Logic Helpers
//!
//! This module contains the cart rules: customization validation, line
//! merging, quantity changes, totals and formatting.

use chrono::Utc;
use uuid::Uuid;

use super::error::CartError;
use super::models::{
    AddItemRequest, Cart, CartItem, CartResponse, CartTotals, CustomizationChoice, Pricing,
    MAX_LINE_QUANTITY,
};
use crate::models::{MenuItem, OrderType, SelectedCustomization};

/// Fresh identifier for a cart line.
pub fn new_line_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Prices and validates the customer's selections against the menu item.
///
/// Every required group needs a selection, no group may exceed its
/// `max_selections`, and repeated selections collapse into one. The result is
/// sorted so two carts holding the same choices compare equal regardless of
/// the order they were picked in.
pub fn resolve_customizations(
    item: &MenuItem,
    selections: &[CustomizationChoice],
) -> Result<Vec<SelectedCustomization>, CartError> {
    let mut chosen: Vec<SelectedCustomization> = Vec::with_capacity(selections.len());

    for choice in selections {
        let unknown = || CartError::UnknownCustomization {
            group: choice.group.clone(),
            option: choice.option.clone(),
        };
        let group = item.group(&choice.group).ok_or_else(unknown)?;
        let option = group.option(&choice.option).ok_or_else(unknown)?;

        let selected = SelectedCustomization {
            group: group.name.clone(),
            option: option.name.clone(),
            price_cents: option.price_cents,
        };
        if !chosen.contains(&selected) {
            chosen.push(selected);
        }
    }

    for group in &item.customization_groups {
        let count = chosen.iter().filter(|c| c.group == group.name).count();
        if group.required && count == 0 {
            return Err(CartError::MissingRequiredCustomization(group.name.clone()));
        }
        if let Some(max) = group.max_selections {
            if count > max as usize {
                return Err(CartError::TooManySelections {
                    group: group.name.clone(),
                    max,
                });
            }
        }
    }

    chosen.sort();
    Ok(chosen)
}

/// Adds a menu item to the cart and returns the id of the line holding it.
pub fn add_item(
    cart: &mut Cart,
    item: &MenuItem,
    restaurant_id: &str,
    request: AddItemRequest,
) -> Result<String, CartError> {
    check_quantity(request.quantity)?;
    if item.restaurant_id != restaurant_id {
        return Err(CartError::WrongRestaurant {
            item: item.name.clone(),
        });
    }
    if !item.is_available {
        return Err(CartError::ItemUnavailable(item.name.clone()));
    }

    let customizations = resolve_customizations(item, &request.selections)?;
    let incoming = CartItem {
        line_id: new_line_id(),
        menu_item_id: item.id.clone(),
        name: item.name.clone(),
        unit_price_cents: item.price_cents,
        quantity: request.quantity,
        customizations,
        special_instructions: request
            .special_instructions
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty()),
    };

    let line_id = merge_into_cart(&mut cart.items, incoming)?;
    cart.updated_at = Utc::now();
    Ok(line_id)
}

/// Merges `incoming` into `cart_items`, aggregating quantities for an existing
/// line with the same item and customizations, or appending a new line.
///
/// Special instructions on the incoming line replace the existing ones. A
/// merge that would push the line past `MAX_LINE_QUANTITY` leaves the cart
/// unchanged.
pub fn merge_into_cart(cart_items: &mut Vec<CartItem>, incoming: CartItem) -> Result<String, CartError> {
    check_quantity(incoming.quantity)?;
    if let Some(existing) = cart_items
        .iter_mut()
        .find(|line| line.same_configuration(&incoming))
    {
        let quantity = existing
            .quantity
            .checked_add(incoming.quantity)
            .ok_or(CartError::InvalidQuantity)?;
        check_quantity(quantity)?;
        existing.quantity = quantity;
        if incoming.special_instructions.is_some() {
            existing.special_instructions = incoming.special_instructions;
        }
        Ok(existing.line_id.clone())
    } else {
        let line_id = incoming.line_id.clone();
        cart_items.push(incoming);
        Ok(line_id)
    }
}

fn check_quantity(quantity: u32) -> Result<(), CartError> {
    if (1..=MAX_LINE_QUANTITY).contains(&quantity) {
        Ok(())
    } else {
        Err(CartError::InvalidQuantity)
    }
}

/// Sets a line's quantity. Zero removes the line.
pub fn update_quantity(cart: &mut Cart, line_id: &str, quantity: u32) -> Result<(), CartError> {
    if quantity == 0 {
        return remove_line(cart, line_id);
    }
    check_quantity(quantity)?;
    let line = cart
        .items
        .iter_mut()
        .find(|line| line.line_id == line_id)
        .ok_or_else(|| CartError::LineNotFound(line_id.to_string()))?;
    line.quantity = quantity;
    cart.updated_at = Utc::now();
    Ok(())
}

pub fn remove_line(cart: &mut Cart, line_id: &str) -> Result<(), CartError> {
    let before = cart.items.len();
    cart.items.retain(|line| line.line_id != line_id);
    if cart.items.len() == before {
        return Err(CartError::LineNotFound(line_id.to_string()));
    }
    cart.updated_at = Utc::now();
    Ok(())
}

/// Divides rounding half up, saturating at `u64::MAX`.
fn div_round_half_up(value: u128, divisor: u128) -> u64 {
    u64::try_from((value + divisor / 2) / divisor).unwrap_or(u64::MAX)
}

/// Computes cart totals.
///
/// Tax applies to the subtotal, the delivery fee only to non-empty delivery
/// orders, and the discount is capped at the subtotal.
pub fn calculate_totals(
    cart: &Cart,
    pricing: Pricing,
    order_type: OrderType,
    discount_cents: u64,
) -> CartTotals {
    let subtotal_cents = cart.subtotal_cents();
    let tax_cents = div_round_half_up(
        u128::from(subtotal_cents) * u128::from(pricing.tax_rate_bps),
        10_000,
    );
    let delivery_fee_cents = match order_type {
        OrderType::Delivery if !cart.is_empty() => pricing.delivery_fee_cents,
        _ => 0,
    };
    let discount_cents = discount_cents.min(subtotal_cents);

    CartTotals {
        subtotal_cents,
        tax_cents,
        delivery_fee_cents,
        discount_cents,
        total_cents: (subtotal_cents - discount_cents)
            .saturating_add(tax_cents)
            .saturating_add(delivery_fee_cents),
        item_count: cart.item_count(),
    }
}

/// Builds the API representation of a cart.
pub fn cart_response(cart: Cart, totals: CartTotals) -> CartResponse {
    CartResponse {
        restaurant_slug: cart.restaurant_slug,
        items: cart.items,
        totals,
    }
}

/// Produces a human-readable one-line summary for a list of cart items.
///
/// Example output: `"2x Margherita, 1x Tiramisu"`.
pub fn format_item_summary(items: &[CartItem]) -> String {
    items
        .iter()
        .map(|i| format!("{}x {}", i.quantity, i.name))
        .collect::<Vec<_>>()
        .join(", ")
}
