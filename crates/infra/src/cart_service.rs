//! Cart operations against a stored cart and the live catalog.
//!
//! Each call loads the cart (or starts an empty one), applies exactly one
//! aggregate operation and saves the result. Catalog data is read only when a
//! product is added; that is where the line item snapshot is taken.

use storefront_cart::{Cart, CartEvent, CartId, NewLineItem};
use storefront_catalog::CatalogStore;
use storefront_core::{DomainError, DomainResult, ProductId};
use storefront_events::trace_applied;

use crate::store::RecordStore;

#[derive(Debug, Clone)]
pub struct CartService<C, S> {
    catalog: C,
    carts: S,
}

impl<C, S> CartService<C, S>
where
    C: CatalogStore,
    S: RecordStore<CartId, Cart>,
{
    pub fn new(catalog: C, carts: S) -> Self {
        Self { catalog, carts }
    }

    /// Current cart for `cart_id`; an unknown id yields an empty cart.
    pub fn get(&self, cart_id: &CartId) -> Cart {
        self.carts
            .get(cart_id)
            .unwrap_or_else(|| Cart::empty(cart_id.clone()))
    }

    /// Add `quantity` (default 1) of a catalog product to the cart.
    ///
    /// Unknown products are [`DomainError::NotFound`]; out-of-stock products are
    /// rejected with [`DomainError::Validation`].
    pub fn add_item(
        &self,
        cart_id: &CartId,
        product_id: &ProductId,
        quantity: Option<u32>,
    ) -> DomainResult<Cart> {
        let product = self.catalog.get(product_id).ok_or_else(DomainError::not_found)?;
        if !product.in_stock {
            return Err(DomainError::validation(format!(
                "product {product_id} is out of stock"
            )));
        }

        let mut item = NewLineItem::new(product.id, product.name, product.price)
            .with_image(product.image);
        item.quantity = quantity;

        let mut cart = self.get(cart_id);
        let events = cart.add_item(item)?;
        self.carts.upsert(cart_id.clone(), cart.clone());

        trace_applied(cart_id, &events);
        Ok(cart)
    }

    /// Set a line's quantity; zero or less removes it. Absent lines are
    /// [`DomainError::NotFound`].
    pub fn update_quantity(
        &self,
        cart_id: &CartId,
        product_id: &ProductId,
        quantity: i64,
    ) -> DomainResult<Cart> {
        let mut cart = self.get(cart_id);
        let events = cart.update_quantity(product_id, quantity)?;
        self.carts.upsert(cart_id.clone(), cart.clone());
        trace_applied(cart_id, &events);
        Ok(cart)
    }

    pub fn remove_item(&self, cart_id: &CartId, product_id: &ProductId) -> Cart {
        let mut cart = self.get(cart_id);
        let events = cart.remove_item(product_id);
        self.save_if_changed(cart_id, &cart, &events);
        cart
    }

    pub fn clear(&self, cart_id: &CartId) -> Cart {
        let mut cart = self.get(cart_id);
        let events = cart.clear();
        self.save_if_changed(cart_id, &cart, &events);
        cart
    }

    /// Removals and clears that applied no event are not persisted.
    fn save_if_changed(&self, cart_id: &CartId, cart: &Cart, events: &[CartEvent]) {
        if events.is_empty() {
            return;
        }
        self.carts.upsert(cart_id.clone(), cart.clone());
        trace_applied(cart_id, events);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::store::InMemoryRecordStore;
    use storefront_catalog::{InMemoryCatalogStore, Product};

    type Service = CartService<InMemoryCatalogStore, Arc<InMemoryRecordStore<CartId, Cart>>>;

    fn service() -> (Service, Arc<InMemoryRecordStore<CartId, Cart>>) {
        let catalog = InMemoryCatalogStore::new(vec![
            Product::new("p1", "Desk Lamp", "lighting", 2_499).with_image("/img/lamp.png"),
            Product::new("p2", "Chair", "furniture", 8_900).out_of_stock(),
        ])
        .unwrap();
        let carts = Arc::new(InMemoryRecordStore::new());
        (CartService::new(catalog, carts.clone()), carts)
    }

    fn cart_id() -> CartId {
        CartId::for_session("s-1")
    }

    #[test]
    fn add_snapshots_catalog_fields_and_persists() {
        let (service, carts) = service();

        let cart = service
            .add_item(&cart_id(), &ProductId::new("p1"), Some(2))
            .unwrap();

        let line = &cart.items()[0];
        assert_eq!(line.name, "Desk Lamp");
        assert_eq!(line.price, 2_499);
        assert_eq!(line.image, "/img/lamp.png");
        assert_eq!(line.quantity, 2);
        assert_eq!(carts.get(&cart_id()), Some(cart));
    }

    #[test]
    fn unknown_product_is_not_found() {
        let (service, carts) = service();
        let err = service
            .add_item(&cart_id(), &ProductId::new("nope"), None)
            .unwrap_err();
        assert_eq!(err, DomainError::NotFound);
        assert!(carts.get(&cart_id()).is_none());
    }

    #[test]
    fn out_of_stock_product_is_rejected() {
        let (service, _) = service();
        let err = service
            .add_item(&cart_id(), &ProductId::new("p2"), None)
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(msg) if msg.contains("out of stock")));
    }

    #[test]
    fn update_remove_and_clear_round_trip_through_the_store() {
        let (service, carts) = service();
        service
            .add_item(&cart_id(), &ProductId::new("p1"), None)
            .unwrap();

        let cart = service
            .update_quantity(&cart_id(), &ProductId::new("p1"), 4)
            .unwrap();
        assert_eq!(cart.total(), 4 * 2_499);

        let cart = service.remove_item(&cart_id(), &ProductId::new("p1"));
        assert!(cart.is_empty());
        assert_eq!(carts.get(&cart_id()).map(|c| c.is_empty()), Some(true));

        service
            .add_item(&cart_id(), &ProductId::new("p1"), None)
            .unwrap();
        assert!(service.clear(&cart_id()).is_empty());
    }

    #[test]
    fn no_op_remove_and_clear_store_nothing() {
        let (service, carts) = service();
        let unknown = CartId::for_session("s-unknown");

        assert!(service.clear(&unknown).is_empty());
        assert!(
            service
                .remove_item(&unknown, &ProductId::new("p1"))
                .is_empty()
        );

        assert!(carts.get(&unknown).is_none());
        assert!(carts.list().is_empty());
    }

    #[test]
    fn update_of_absent_line_is_not_found() {
        let (service, _) = service();
        let err = service
            .update_quantity(&cart_id(), &ProductId::new("p1"), 3)
            .unwrap_err();
        assert_eq!(err, DomainError::NotFound);
    }

    #[test]
    fn carts_are_isolated_by_id() {
        let (service, _) = service();
        service
            .add_item(&cart_id(), &ProductId::new("p1"), None)
            .unwrap();
        assert!(service.get(&CartId::for_session("s-2")).is_empty());
    }
}
