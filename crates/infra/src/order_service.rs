//! Reads and status transitions for placed orders.

use storefront_core::{DomainError, DomainResult, OrderId, UserId};
use storefront_events::trace_applied;
use storefront_orders::{Order, OrderEvent};

use crate::store::OrderStore;

#[derive(Debug, Clone)]
pub struct OrderService<O> {
    orders: O,
}

impl<O: OrderStore> OrderService<O> {
    pub fn new(orders: O) -> Self {
        Self { orders }
    }

    pub fn get(&self, order_id: &OrderId) -> DomainResult<Order> {
        self.orders.get(order_id).ok_or_else(DomainError::not_found)
    }

    /// Like [`OrderService::get`], but another user's order is reported as
    /// [`DomainError::NotFound`].
    pub fn get_for_user(&self, order_id: &OrderId, user_id: UserId) -> DomainResult<Order> {
        let order = self.get(order_id)?;
        if order.user_id() != Some(user_id) {
            return Err(DomainError::not_found());
        }
        Ok(order)
    }

    pub fn list_for_user(&self, user_id: UserId) -> Vec<Order> {
        self.orders.list_for_user(user_id)
    }

    pub fn ship(&self, order_id: &OrderId) -> DomainResult<Order> {
        self.transition(order_id, Order::ship)
    }

    pub fn deliver(&self, order_id: &OrderId) -> DomainResult<Order> {
        self.transition(order_id, Order::deliver)
    }

    /// Cancel an order on behalf of its owner.
    pub fn cancel(
        &self,
        order_id: &OrderId,
        user_id: UserId,
        reason: Option<String>,
    ) -> DomainResult<Order> {
        let mut order = self.get_for_user(order_id, user_id)?;
        let events = order.cancel(reason)?;
        self.orders.save(order.clone());
        trace_applied(order_id, &events);
        tracing::info!(order_id = %order_id, "order cancelled");
        Ok(order)
    }

    fn transition(
        &self,
        order_id: &OrderId,
        step: impl FnOnce(&mut Order) -> DomainResult<Vec<OrderEvent>>,
    ) -> DomainResult<Order> {
        let mut order = self.get(order_id)?;
        let events = step(&mut order)?;
        self.orders.save(order.clone());
        trace_applied(order_id, &events);
        tracing::info!(order_id = %order_id, status = %order.status(), "order status changed");
        Ok(order)
    }
}
