use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use storefront_core::{
    Aggregate, AggregateRoot, DomainError, DomainResult, ProductId, UserId, ValueObject,
};
use storefront_events::Event;

/// Cart identifier: the session or user key the cart belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CartId(String);

impl CartId {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Cart of an anonymous session.
    pub fn for_session(session_id: &str) -> Self {
        Self(format!("session:{session_id}"))
    }

    /// Cart of a signed-in user.
    pub fn for_user(user_id: UserId) -> Self {
        Self(format!("user:{user_id}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for CartId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One product entry in a cart.
///
/// `name`, `price` and `image` are copied from the catalog when the product is
/// first added and are never refreshed, so later catalog edits do not change a
/// pending cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineItem {
    pub product_id: ProductId,
    pub name: String,
    /// Unit price in smallest currency unit (e.g., cents).
    pub price: u64,
    pub image: String,
    pub quantity: u32,
}

impl CartLineItem {
    pub fn line_total(&self) -> u64 {
        self.price.saturating_mul(u64::from(self.quantity))
    }
}

impl ValueObject for CartLineItem {}

/// Input to [`Cart::add_item`]: the snapshot to record plus an optional quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLineItem {
    pub product_id: ProductId,
    pub name: String,
    pub price: u64,
    #[serde(default)]
    pub image: String,
    /// Defaults to 1.
    #[serde(default)]
    pub quantity: Option<u32>,
}

impl NewLineItem {
    pub fn new(product_id: impl Into<ProductId>, name: impl Into<String>, price: u64) -> Self {
        Self {
            product_id: product_id.into(),
            name: name.into(),
            price,
            image: String::new(),
            quantity: None,
        }
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = Some(quantity);
        self
    }
}

/// Aggregate root: Cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    id: CartId,
    items: Vec<CartLineItem>,
    version: u64,
}

impl Cart {
    /// Create an empty cart (also used for rehydration).
    pub fn empty(id: CartId) -> Self {
        Self {
            id,
            items: Vec::new(),
            version: 0,
        }
    }

    pub fn id_typed(&self) -> &CartId {
        &self.id
    }

    /// Line items in the order they were first added.
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    pub fn item(&self, product_id: &ProductId) -> Option<&CartLineItem> {
        self.items.iter().find(|i| &i.product_id == product_id)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total number of units across all line items.
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    /// Sum of price × quantity over the current line items.
    ///
    /// Recomputed on every call.
    pub fn total(&self) -> u64 {
        self.items
            .iter()
            .fold(0u64, |acc, i| acc.saturating_add(i.line_total()))
    }

    /// Add a product, or increase its quantity if already present.
    pub fn add_item(&mut self, item: NewLineItem) -> DomainResult<Vec<CartEvent>> {
        let cmd = AddItem {
            cart_id: self.id.clone(),
            product_id: item.product_id,
            name: item.name,
            price: item.price,
            image: item.image,
            quantity: item.quantity.unwrap_or(1),
            occurred_at: Utc::now(),
        };
        self.execute(&CartCommand::AddItem(cmd))
    }

    /// Set a line item's quantity; zero or less removes the line.
    ///
    /// Fails with [`DomainError::NotFound`] when the product is not in the cart.
    pub fn update_quantity(
        &mut self,
        product_id: &ProductId,
        quantity: i64,
    ) -> DomainResult<Vec<CartEvent>> {
        let cmd = UpdateQuantity {
            cart_id: self.id.clone(),
            product_id: product_id.clone(),
            quantity,
            occurred_at: Utc::now(),
        };
        self.execute(&CartCommand::UpdateQuantity(cmd))
    }

    /// Remove a line item. Removing an absent product does nothing.
    pub fn remove_item(&mut self, product_id: &ProductId) -> Vec<CartEvent> {
        let events = self.decide_remove(product_id, Utc::now());
        self.apply_all(&events);
        events
    }

    /// Remove every line item.
    pub fn clear(&mut self) -> Vec<CartEvent> {
        let events = self.decide_clear(Utc::now());
        self.apply_all(&events);
        events
    }

    fn apply_all(&mut self, events: &[CartEvent]) {
        for event in events {
            self.apply(event);
        }
    }
}

impl AggregateRoot for Cart {
    type Id = CartId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: AddItem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddItem {
    pub cart_id: CartId,
    pub product_id: ProductId,
    pub name: String,
    pub price: u64,
    pub image: String,
    pub quantity: u32,
    pub occurred_at: DateTime<Utc>,
}

/// Command: UpdateQuantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateQuantity {
    pub cart_id: CartId,
    pub product_id: ProductId,
    /// Zero or negative removes the line.
    pub quantity: i64,
    pub occurred_at: DateTime<Utc>,
}

/// Command: RemoveItem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveItem {
    pub cart_id: CartId,
    pub product_id: ProductId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: ClearCart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClearCart {
    pub cart_id: CartId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CartCommand {
    AddItem(AddItem),
    UpdateQuantity(UpdateQuantity),
    RemoveItem(RemoveItem),
    ClearCart(ClearCart),
}

/// Event: ItemAdded (a new line with its catalog snapshot).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemAdded {
    pub cart_id: CartId,
    pub product_id: ProductId,
    pub name: String,
    pub price: u64,
    pub image: String,
    pub quantity: u32,
    pub occurred_at: DateTime<Utc>,
}

/// Event: ItemQuantityChanged (absolute quantity, always >= 1).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemQuantityChanged {
    pub cart_id: CartId,
    pub product_id: ProductId,
    pub quantity: u32,
    pub occurred_at: DateTime<Utc>,
}

/// Event: ItemRemoved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRemoved {
    pub cart_id: CartId,
    pub product_id: ProductId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: CartCleared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartCleared {
    pub cart_id: CartId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CartEvent {
    ItemAdded(ItemAdded),
    ItemQuantityChanged(ItemQuantityChanged),
    ItemRemoved(ItemRemoved),
    CartCleared(CartCleared),
}

impl Event for CartEvent {
    fn event_type(&self) -> &'static str {
        match self {
            CartEvent::ItemAdded(_) => "cart.item_added",
            CartEvent::ItemQuantityChanged(_) => "cart.item_quantity_changed",
            CartEvent::ItemRemoved(_) => "cart.item_removed",
            CartEvent::CartCleared(_) => "cart.cleared",
        }
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            CartEvent::ItemAdded(e) => e.occurred_at,
            CartEvent::ItemQuantityChanged(e) => e.occurred_at,
            CartEvent::ItemRemoved(e) => e.occurred_at,
            CartEvent::CartCleared(e) => e.occurred_at,
        }
    }
}

impl Aggregate for Cart {
    type Command = CartCommand;
    type Event = CartEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            CartEvent::ItemAdded(e) => {
                self.items.push(CartLineItem {
                    product_id: e.product_id.clone(),
                    name: e.name.clone(),
                    price: e.price,
                    image: e.image.clone(),
                    quantity: e.quantity,
                });
            }
            CartEvent::ItemQuantityChanged(e) => {
                if let Some(line) = self.items.iter_mut().find(|i| i.product_id == e.product_id) {
                    line.quantity = e.quantity;
                }
            }
            CartEvent::ItemRemoved(e) => {
                self.items.retain(|i| i.product_id != e.product_id);
            }
            CartEvent::CartCleared(_) => {
                self.items.clear();
            }
        }

        // Deterministic version tracking: +1 per applied event.
        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            CartCommand::AddItem(cmd) => self.handle_add_item(cmd),
            CartCommand::UpdateQuantity(cmd) => self.handle_update_quantity(cmd),
            CartCommand::RemoveItem(cmd) => {
                self.ensure_cart_id(&cmd.cart_id)?;
                Ok(self.decide_remove(&cmd.product_id, cmd.occurred_at))
            }
            CartCommand::ClearCart(cmd) => {
                self.ensure_cart_id(&cmd.cart_id)?;
                Ok(self.decide_clear(cmd.occurred_at))
            }
        }
    }
}

impl Cart {
    fn ensure_cart_id(&self, cart_id: &CartId) -> Result<(), DomainError> {
        if &self.id != cart_id {
            return Err(DomainError::invariant("cart_id mismatch"));
        }
        Ok(())
    }

    fn handle_add_item(&self, cmd: &AddItem) -> Result<Vec<CartEvent>, DomainError> {
        self.ensure_cart_id(&cmd.cart_id)?;

        if cmd.quantity == 0 {
            return Err(DomainError::validation("quantity must be positive"));
        }

        match self.item(&cmd.product_id) {
            Some(existing) => {
                let quantity = existing
                    .quantity
                    .checked_add(cmd.quantity)
                    .ok_or_else(|| DomainError::validation("quantity is too large"))?;
                Ok(vec![CartEvent::ItemQuantityChanged(ItemQuantityChanged {
                    cart_id: cmd.cart_id.clone(),
                    product_id: cmd.product_id.clone(),
                    quantity,
                    occurred_at: cmd.occurred_at,
                })])
            }
            None => Ok(vec![CartEvent::ItemAdded(ItemAdded {
                cart_id: cmd.cart_id.clone(),
                product_id: cmd.product_id.clone(),
                name: cmd.name.clone(),
                price: cmd.price,
                image: cmd.image.clone(),
                quantity: cmd.quantity,
                occurred_at: cmd.occurred_at,
            })]),
        }
    }

    fn handle_update_quantity(&self, cmd: &UpdateQuantity) -> Result<Vec<CartEvent>, DomainError> {
        self.ensure_cart_id(&cmd.cart_id)?;

        if self.item(&cmd.product_id).is_none() {
            return Err(DomainError::not_found());
        }

        if cmd.quantity <= 0 {
            return Ok(self.decide_remove(&cmd.product_id, cmd.occurred_at));
        }

        let quantity = u32::try_from(cmd.quantity)
            .map_err(|_| DomainError::validation("quantity is too large"))?;

        Ok(vec![CartEvent::ItemQuantityChanged(ItemQuantityChanged {
            cart_id: cmd.cart_id.clone(),
            product_id: cmd.product_id.clone(),
            quantity,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn decide_remove(&self, product_id: &ProductId, occurred_at: DateTime<Utc>) -> Vec<CartEvent> {
        if self.item(product_id).is_none() {
            return vec![];
        }
        vec![CartEvent::ItemRemoved(ItemRemoved {
            cart_id: self.id.clone(),
            product_id: product_id.clone(),
            occurred_at,
        })]
    }

    fn decide_clear(&self, occurred_at: DateTime<Utc>) -> Vec<CartEvent> {
        if self.items.is_empty() {
            return vec![];
        }
        vec![CartEvent::CartCleared(CartCleared {
            cart_id: self.id.clone(),
            occurred_at,
        })]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_cart() -> Cart {
        Cart::empty(CartId::for_session("s-1"))
    }

    fn p1(quantity: u32) -> NewLineItem {
        NewLineItem::new("p1", "Desk Lamp", 10).with_quantity(quantity)
    }

    fn pid(id: &str) -> ProductId {
        ProductId::new(id)
    }

    #[test]
    fn example_scenario_add_merge_then_zero_out() {
        let mut cart = test_cart();

        cart.add_item(p1(2)).unwrap();
        assert_eq!(cart.total(), 20);

        cart.add_item(p1(1)).unwrap();
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].quantity, 3);
        assert_eq!(cart.total(), 30);

        cart.update_quantity(&pid("p1"), 0).unwrap();
        assert!(cart.items().is_empty());
        assert_eq!(cart.total(), 0);
    }

    #[test]
    fn add_defaults_quantity_to_one() {
        let mut cart = test_cart();
        cart.add_item(NewLineItem::new("p1", "Lamp", 10)).unwrap();
        assert_eq!(cart.items()[0].quantity, 1);
    }

    #[test]
    fn zero_quantity_add_is_rejected_without_changing_state() {
        let mut cart = test_cart();
        let err = cart.add_item(p1(0)).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert!(cart.is_empty());
        assert_eq!(cart.version(), 0);
    }

    #[test]
    fn snapshot_is_kept_from_first_add() {
        let mut cart = test_cart();
        cart.add_item(NewLineItem::new("p1", "Lamp", 10).with_image("/a.png"))
            .unwrap();
        // Catalog price changed between the two adds.
        cart.add_item(NewLineItem::new("p1", "Lamp v2", 15).with_image("/b.png"))
            .unwrap();

        let line = cart.item(&pid("p1")).unwrap();
        assert_eq!(line.price, 10);
        assert_eq!(line.name, "Lamp");
        assert_eq!(line.image, "/a.png");
        assert_eq!(line.quantity, 2);
    }

    #[test]
    fn lines_keep_first_add_order() {
        let mut cart = test_cart();
        cart.add_item(NewLineItem::new("b", "B", 1)).unwrap();
        cart.add_item(NewLineItem::new("a", "A", 1)).unwrap();
        cart.add_item(NewLineItem::new("b", "B", 1)).unwrap();

        let ids: Vec<&str> = cart.items().iter().map(|i| i.product_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn update_quantity_sets_absolute_value() {
        let mut cart = test_cart();
        cart.add_item(p1(2)).unwrap();
        cart.update_quantity(&pid("p1"), 7).unwrap();
        assert_eq!(cart.items()[0].quantity, 7);
        assert_eq!(cart.total(), 70);
    }

    #[test]
    fn negative_update_removes_line() {
        let mut cart = test_cart();
        cart.add_item(p1(2)).unwrap();
        cart.update_quantity(&pid("p1"), -3).unwrap();
        assert!(cart.item(&pid("p1")).is_none());
    }

    #[test]
    fn update_quantity_of_absent_product_is_not_found() {
        let mut cart = test_cart();
        cart.add_item(p1(1)).unwrap();

        assert_eq!(
            cart.update_quantity(&pid("missing"), 4),
            Err(DomainError::NotFound)
        );
        assert_eq!(
            cart.update_quantity(&pid("missing"), 0),
            Err(DomainError::NotFound)
        );
        assert_eq!(cart.items().len(), 1);
    }

    #[test]
    fn remove_item_is_idempotent() {
        let mut cart = test_cart();
        cart.add_item(p1(1)).unwrap();

        assert_eq!(cart.remove_item(&pid("p1")).len(), 1);
        let version_after_first = cart.version();
        assert!(cart.remove_item(&pid("p1")).is_empty());

        assert!(cart.is_empty());
        assert_eq!(cart.version(), version_after_first);
    }

    #[test]
    fn clear_empties_cart() {
        let mut cart = test_cart();
        cart.add_item(p1(1)).unwrap();
        cart.add_item(NewLineItem::new("p2", "Chair", 50)).unwrap();

        cart.clear();

        assert!(cart.is_empty());
        assert_eq!(cart.total(), 0);
    }

    #[test]
    fn handle_rejects_foreign_cart_id() {
        let cart = test_cart();
        let cmd = CartCommand::ClearCart(ClearCart {
            cart_id: CartId::for_session("other"),
            occurred_at: Utc::now(),
        });
        match cart.handle(&cmd).unwrap_err() {
            DomainError::InvariantViolation(msg) if msg.contains("cart_id mismatch") => {}
            other => panic!("expected cart_id mismatch, got {other:?}"),
        }
    }

    #[test]
    fn handle_does_not_mutate_state() {
        let mut cart = test_cart();
        cart.add_item(p1(1)).unwrap();
        let before = cart.clone();

        let cmd = CartCommand::AddItem(AddItem {
            cart_id: cart.id().clone(),
            product_id: pid("p2"),
            name: "Chair".to_string(),
            price: 50,
            image: String::new(),
            quantity: 1,
            occurred_at: Utc::now(),
        });
        let events1 = cart.handle(&cmd).unwrap();
        let events2 = cart.handle(&cmd).unwrap();

        assert_eq!(cart, before);
        assert_eq!(events1, events2);
    }

    #[test]
    fn events_carry_stable_type_names() {
        let mut cart = test_cart();
        cart.add_item(p1(1)).unwrap();
        let events = cart
            .handle(&CartCommand::AddItem(AddItem {
                cart_id: cart.id().clone(),
                product_id: pid("p1"),
                name: "Lamp".to_string(),
                price: 10,
                image: String::new(),
                quantity: 1,
                occurred_at: Utc::now(),
            }))
            .unwrap();
        assert_eq!(events[0].event_type(), "cart.item_quantity_changed");
    }

    #[test]
    fn cart_round_trips_through_json() {
        let mut cart = test_cart();
        cart.add_item(p1(2)).unwrap();
        let json = serde_json::to_string(&cart).unwrap();
        let restored: Cart = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, cart);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        #[derive(Debug, Clone)]
        enum Op {
            Add(usize, u32),
            Update(usize, i64),
            Remove(usize),
        }

        const IDS: [&str; 4] = ["p0", "p1", "p2", "p3"];
        const PRICES: [u64; 4] = [5, 120, 999, 0];

        fn op() -> impl Strategy<Value = Op> {
            prop_oneof![
                (0..IDS.len(), 1u32..10).prop_map(|(i, q)| Op::Add(i, q)),
                (0..IDS.len(), -2i64..10).prop_map(|(i, q)| Op::Update(i, q)),
                (0..IDS.len()).prop_map(Op::Remove),
            ]
        }

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 256,
                ..ProptestConfig::default()
            })]

            /// Property: total() always equals Σ price × quantity, every line has
            /// quantity >= 1 and product ids are unique.
            #[test]
            fn total_matches_lines_after_any_op_sequence(ops in prop::collection::vec(op(), 0..40)) {
                let mut cart = test_cart();
                for op in ops {
                    match op {
                        Op::Add(i, q) => {
                            cart.add_item(NewLineItem::new(IDS[i], IDS[i], PRICES[i]).with_quantity(q)).unwrap();
                        }
                        Op::Update(i, q) => {
                            let present = cart.item(&pid(IDS[i])).is_some();
                            let result = cart.update_quantity(&pid(IDS[i]), q);
                            prop_assert_eq!(result.is_ok(), present);
                        }
                        Op::Remove(i) => {
                            cart.remove_item(&pid(IDS[i]));
                        }
                    }

                    let expected: u64 = cart.items().iter().map(|l| l.price * u64::from(l.quantity)).sum();
                    prop_assert_eq!(cart.total(), expected);
                    prop_assert!(cart.items().iter().all(|l| l.quantity >= 1));

                    let mut ids: Vec<_> = cart.items().iter().map(|l| l.product_id.clone()).collect();
                    ids.sort();
                    ids.dedup();
                    prop_assert_eq!(ids.len(), cart.items().len());
                }
            }

            /// Property: two adds of the same product merge into one line.
            #[test]
            fn repeated_add_merges_quantities(a in 1u32..1000, b in 1u32..1000) {
                let mut cart = test_cart();
                cart.add_item(p1(a)).unwrap();
                cart.add_item(p1(b)).unwrap();
                prop_assert_eq!(cart.items().len(), 1);
                prop_assert_eq!(cart.items()[0].quantity, a + b);
            }
        }
    }
}
