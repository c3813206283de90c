//! Turning a cart into a placed order.

use chrono::{DateTime, Utc};

use storefront_cart::Cart;
use storefront_core::{Aggregate, DomainError, DomainResult, OrderId, UserId};

use crate::address::Address;
use crate::order::{Order, OrderCommand, OrderLineItem, PlaceOrder};

/// Build a placed order from the current contents of `cart`.
///
/// The order id comes from the caller (typically the order store); this function
/// never invents one. Line items are copied and the total is frozen at
/// `cart.total()`, so later changes to the cart do not reach the order.
///
/// Fails with [`DomainError::Validation`] when the cart is empty or the address
/// misses required fields. The cart itself is never modified.
pub fn create_order(
    cart: &Cart,
    user_id: UserId,
    shipping_address: Address,
    order_id: OrderId,
    placed_at: DateTime<Utc>,
) -> DomainResult<Order> {
    if cart.is_empty() {
        return Err(DomainError::validation("cannot create an order from an empty cart"));
    }
    shipping_address.validate()?;

    let items: Vec<OrderLineItem> = cart.items().iter().map(OrderLineItem::from).collect();

    let mut order = Order::empty(order_id);
    order.execute(&OrderCommand::PlaceOrder(PlaceOrder {
        order_id,
        user_id,
        items,
        total: cart.total(),
        shipping_address,
        occurred_at: placed_at,
    }))?;

    Ok(order)
}
