//! Checkout pipeline (application-level orchestration).
//!
//! ```text
//! cart id + user id + shipping address
//!   ↓
//! 1. Load cart (absent = empty)
//!   ↓
//! 2. Resolve every line against the catalog (must exist and be in stock)
//!   ↓
//! 3. Build the order (validates cart and address, freezes the total)
//!   ↓
//! 4. Persist the order
//!   ↓
//! 5. Clear and persist the cart
//! ```
//!
//! Steps 1–3 have no side effects, so a rejected checkout persists no order and
//! leaves the cart as it was.

use chrono::Utc;

use storefront_cart::{Cart, CartId};
use storefront_catalog::CatalogStore;
use storefront_core::{DomainError, DomainResult, UserId};
use storefront_events::trace_applied;
use storefront_orders::{Address, Order, create_order};

use crate::store::{OrderStore, RecordStore};

#[derive(Debug, Clone)]
pub struct CheckoutService<C, S, O> {
    catalog: C,
    carts: S,
    orders: O,
}

impl<C, S, O> CheckoutService<C, S, O>
where
    C: CatalogStore,
    S: RecordStore<CartId, Cart>,
    O: OrderStore,
{
    pub fn new(catalog: C, carts: S, orders: O) -> Self {
        Self {
            catalog,
            carts,
            orders,
        }
    }

    /// Turn the cart into a placed order and clear it.
    ///
    /// Fails with [`DomainError::Validation`] when the cart is empty, the address
    /// is incomplete, or a line item no longer resolves to an in-stock product.
    pub fn checkout(
        &self,
        cart_id: &CartId,
        user_id: UserId,
        shipping_address: Address,
    ) -> DomainResult<Order> {
        // 1) Load cart
        let mut cart = self
            .carts
            .get(cart_id)
            .unwrap_or_else(|| Cart::empty(cart_id.clone()));

        // 2) Resolve product references
        if let Err(e) = self.resolve_lines(&cart) {
            tracing::warn!(cart_id = %cart_id, user_id = %user_id, "checkout rejected: {e}");
            return Err(e);
        }

        // 3) Build order (pure)
        let order_id = self.orders.next_id();
        let order = match create_order(&cart, user_id, shipping_address, order_id, Utc::now()) {
            Ok(order) => order,
            Err(e) => {
                tracing::warn!(cart_id = %cart_id, user_id = %user_id, "checkout rejected: {e}");
                return Err(e);
            }
        };

        // 4) Persist order
        self.orders.save(order.clone());

        // 5) Clear cart
        let cleared = cart.clear();
        self.carts.upsert(cart_id.clone(), cart);
        trace_applied(cart_id, &cleared);

        tracing::info!(
            order_id = %order.id_typed(),
            user_id = %user_id,
            total = order.total(),
            lines = order.items().len(),
            "order placed"
        );
        Ok(order)
    }

    fn resolve_lines(&self, cart: &Cart) -> DomainResult<()> {
        for line in cart.items() {
            match self.catalog.get(&line.product_id) {
                None => {
                    return Err(DomainError::validation(format!(
                        "product {} is no longer available",
                        line.product_id
                    )));
                }
                Some(product) if !product.in_stock => {
                    return Err(DomainError::validation(format!(
                        "product {} is out of stock",
                        line.product_id
                    )));
                }
                Some(_) => {}
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::store::{InMemoryOrderStore, InMemoryRecordStore};
    use storefront_cart::NewLineItem;
    use storefront_catalog::{InMemoryCatalogStore, Product};
    use storefront_core::ProductId;
    use storefront_orders::OrderStatus;

    type Carts = Arc<InMemoryRecordStore<CartId, Cart>>;
    type Orders = Arc<InMemoryOrderStore>;

    struct Fixture {
        service: CheckoutService<InMemoryCatalogStore, Carts, Orders>,
        carts: Carts,
        orders: Orders,
        user_id: UserId,
        cart_id: CartId,
    }

    fn fixture(products: Vec<Product>) -> Fixture {
        let catalog = InMemoryCatalogStore::new(products).unwrap();
        let carts: Carts = Arc::new(InMemoryRecordStore::new());
        let orders: Orders = Arc::new(InMemoryOrderStore::new());
        let user_id = UserId::new();
        Fixture {
            service: CheckoutService::new(catalog, carts.clone(), orders.clone()),
            carts,
            orders,
            user_id,
            cart_id: CartId::for_user(user_id),
        }
    }

    fn catalog() -> Vec<Product> {
        vec![
            Product::new("p1", "Desk Lamp", "lighting", 10),
            Product::new("p2", "Chair", "furniture", 45),
            Product::new("p3", "Rug", "furniture", 99).out_of_stock(),
        ]
    }

    fn address() -> Address {
        Address::new("1 Main St", "Springfield", "IL", "62701", "US")
    }

    fn seed_cart(f: &Fixture, lines: &[(&str, u64, u32)]) {
        let mut cart = Cart::empty(f.cart_id.clone());
        for (id, price, quantity) in lines {
            cart.add_item(NewLineItem::new(*id, *id, *price).with_quantity(*quantity))
                .unwrap();
        }
        f.carts.upsert(f.cart_id.clone(), cart);
    }

    #[test]
    fn checkout_places_order_and_clears_cart() {
        let f = fixture(catalog());
        seed_cart(&f, &[("p1", 10, 2), ("p2", 45, 1)]);

        let order = f.service.checkout(&f.cart_id, f.user_id, address()).unwrap();

        assert_eq!(order.total(), 65);
        assert_eq!(order.status(), OrderStatus::Processing);
        assert_eq!(f.orders.get(&order.id_typed()), Some(order.clone()));
        assert_eq!(f.orders.list_for_user(f.user_id).len(), 1);
        assert!(f.carts.get(&f.cart_id).unwrap().is_empty());
    }

    #[test]
    fn order_uses_cart_snapshot_price_not_live_catalog_price() {
        let f = fixture(catalog());
        // Line was added when the lamp cost 8.
        seed_cart(&f, &[("p1", 8, 1)]);

        let order = f.service.checkout(&f.cart_id, f.user_id, address()).unwrap();

        assert_eq!(order.total(), 8);
    }

    #[test]
    fn empty_cart_persists_nothing() {
        let f = fixture(catalog());

        let err = f.service.checkout(&f.cart_id, f.user_id, address()).unwrap_err();

        assert!(matches!(err, DomainError::Validation(_)));
        assert!(f.orders.list_for_user(f.user_id).is_empty());
    }

    #[test]
    fn invalid_address_leaves_cart_untouched() {
        let f = fixture(catalog());
        seed_cart(&f, &[("p1", 10, 1)]);
        let mut bad = address();
        bad.street.clear();

        let err = f.service.checkout(&f.cart_id, f.user_id, bad).unwrap_err();

        assert!(matches!(err, DomainError::Validation(msg) if msg.contains("street")));
        assert_eq!(f.carts.get(&f.cart_id).unwrap().items().len(), 1);
        assert!(f.orders.list_for_user(f.user_id).is_empty());
    }

    #[test]
    fn delisted_or_out_of_stock_products_block_checkout() {
        let f = fixture(catalog());
        seed_cart(&f, &[("p1", 10, 1), ("gone", 5, 1)]);
        let err = f.service.checkout(&f.cart_id, f.user_id, address()).unwrap_err();
        assert!(matches!(err, DomainError::Validation(msg) if msg.contains("no longer available")));

        let f = fixture(catalog());
        seed_cart(&f, &[("p3", 99, 1)]);
        let err = f.service.checkout(&f.cart_id, f.user_id, address()).unwrap_err();
        assert!(matches!(err, DomainError::Validation(msg) if msg.contains("out of stock")));
        assert!(f.orders.list_for_user(f.user_id).is_empty());
        assert!(
            f.carts
                .get(&f.cart_id)
                .unwrap()
                .item(&ProductId::new("p3"))
                .is_some()
        );
    }
}
