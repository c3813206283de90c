use std::sync::Arc;

use storefront_core::{OrderId, UserId};
use storefront_orders::Order;

use crate::store::record_store::{InMemoryRecordStore, RecordStore};

/// Persistence for placed orders.
///
/// The store owns id allocation: callers ask for `next_id()` and hand the id to
/// the order builder, so uniqueness is the store's concern.
pub trait OrderStore: Send + Sync {
    fn next_id(&self) -> OrderId;
    fn get(&self, id: &OrderId) -> Option<Order>;
    fn save(&self, order: Order);
    /// Orders placed by `user_id`, oldest first.
    fn list_for_user(&self, user_id: UserId) -> Vec<Order>;
}

impl<S> OrderStore for Arc<S>
where
    S: OrderStore + ?Sized,
{
    fn next_id(&self) -> OrderId {
        (**self).next_id()
    }

    fn get(&self, id: &OrderId) -> Option<Order> {
        (**self).get(id)
    }

    fn save(&self, order: Order) {
        (**self).save(order)
    }

    fn list_for_user(&self, user_id: UserId) -> Vec<Order> {
        (**self).list_for_user(user_id)
    }
}

/// In-memory order store for tests/dev. Ids are UUIDv7, so they sort by
/// creation time.
#[derive(Debug, Default)]
pub struct InMemoryOrderStore {
    records: InMemoryRecordStore<OrderId, Order>,
}

impl InMemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl OrderStore for InMemoryOrderStore {
    fn next_id(&self) -> OrderId {
        OrderId::new()
    }

    fn get(&self, id: &OrderId) -> Option<Order> {
        self.records.get(id)
    }

    fn save(&self, order: Order) {
        self.records.upsert(order.id_typed(), order);
    }

    fn list_for_user(&self, user_id: UserId) -> Vec<Order> {
        let mut orders: Vec<Order> = self
            .records
            .list()
            .into_iter()
            .filter(|o| o.user_id() == Some(user_id))
            .collect();
        orders.sort_by_key(|o| o.id_typed());
        orders
    }
}
