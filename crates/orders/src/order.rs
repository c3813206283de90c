use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use storefront_cart::CartLineItem;
use storefront_core::{Aggregate, AggregateRoot, DomainError, DomainResult, OrderId, ProductId, UserId};
use storefront_events::Event;

use crate::address::Address;

/// Order status lifecycle.
///
/// `processing → shipped → delivered`, and any non-terminal status may move to
/// `cancelled`. `delivered` and `cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Processing => "processing",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }

    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        matches!(
            (self, next),
            (Self::Processing, Self::Shipped)
                | (Self::Shipped, Self::Delivered)
                | (Self::Processing | Self::Shipped, Self::Cancelled)
        )
    }
}

impl core::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order line: an owned copy of a cart line at purchase time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineItem {
    pub product_id: ProductId,
    pub name: String,
    /// Unit price in smallest currency unit (e.g., cents).
    pub price: u64,
    pub image: String,
    pub quantity: u32,
}

impl OrderLineItem {
    pub fn line_total(&self) -> u64 {
        self.price.saturating_mul(u64::from(self.quantity))
    }
}

impl From<&CartLineItem> for OrderLineItem {
    fn from(line: &CartLineItem) -> Self {
        Self {
            product_id: line.product_id.clone(),
            name: line.name.clone(),
            price: line.price,
            image: line.image.clone(),
            quantity: line.quantity,
        }
    }
}

/// Aggregate root: Order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    id: OrderId,
    user_id: Option<UserId>,
    items: Vec<OrderLineItem>,
    total: u64,
    status: OrderStatus,
    created_at: Option<DateTime<Utc>>,
    shipping_address: Address,
    version: u64,
    placed: bool,
}

impl Order {
    /// Create an empty, not-yet-placed aggregate instance for rehydration.
    pub fn empty(id: OrderId) -> Self {
        Self {
            id,
            user_id: None,
            items: Vec::new(),
            total: 0,
            status: OrderStatus::Processing,
            created_at: None,
            shipping_address: Address::default(),
            version: 0,
            placed: false,
        }
    }

    pub fn id_typed(&self) -> OrderId {
        self.id
    }

    pub fn user_id(&self) -> Option<UserId> {
        self.user_id
    }

    pub fn items(&self) -> &[OrderLineItem] {
        &self.items
    }

    /// Total frozen at placement time.
    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    pub fn shipping_address(&self) -> &Address {
        &self.shipping_address
    }

    pub fn is_placed(&self) -> bool {
        self.placed
    }

    pub fn ship(&mut self) -> DomainResult<Vec<OrderEvent>> {
        let cmd = ShipOrder {
            order_id: self.id,
            occurred_at: Utc::now(),
        };
        self.execute(&OrderCommand::ShipOrder(cmd))
    }

    pub fn deliver(&mut self) -> DomainResult<Vec<OrderEvent>> {
        let cmd = DeliverOrder {
            order_id: self.id,
            occurred_at: Utc::now(),
        };
        self.execute(&OrderCommand::DeliverOrder(cmd))
    }

    pub fn cancel(&mut self, reason: Option<String>) -> DomainResult<Vec<OrderEvent>> {
        let cmd = CancelOrder {
            order_id: self.id,
            reason,
            occurred_at: Utc::now(),
        };
        self.execute(&OrderCommand::CancelOrder(cmd))
    }
}

impl AggregateRoot for Order {
    type Id = OrderId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: PlaceOrder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceOrder {
    pub order_id: OrderId,
    pub user_id: UserId,
    pub items: Vec<OrderLineItem>,
    pub total: u64,
    pub shipping_address: Address,
    pub occurred_at: DateTime<Utc>,
}

/// Command: ShipOrder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipOrder {
    pub order_id: OrderId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: DeliverOrder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliverOrder {
    pub order_id: OrderId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: CancelOrder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelOrder {
    pub order_id: OrderId,
    pub reason: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderCommand {
    PlaceOrder(PlaceOrder),
    ShipOrder(ShipOrder),
    DeliverOrder(DeliverOrder),
    CancelOrder(CancelOrder),
}

/// Event: OrderPlaced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderPlaced {
    pub order_id: OrderId,
    pub user_id: UserId,
    pub items: Vec<OrderLineItem>,
    pub total: u64,
    pub shipping_address: Address,
    pub occurred_at: DateTime<Utc>,
}

/// Event: OrderShipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderShipped {
    pub order_id: OrderId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: OrderDelivered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDelivered {
    pub order_id: OrderId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: OrderCancelled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderCancelled {
    pub order_id: OrderId,
    pub reason: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderEvent {
    OrderPlaced(OrderPlaced),
    OrderShipped(OrderShipped),
    OrderDelivered(OrderDelivered),
    OrderCancelled(OrderCancelled),
}

impl Event for OrderEvent {
    fn event_type(&self) -> &'static str {
        match self {
            OrderEvent::OrderPlaced(_) => "orders.order.placed",
            OrderEvent::OrderShipped(_) => "orders.order.shipped",
            OrderEvent::OrderDelivered(_) => "orders.order.delivered",
            OrderEvent::OrderCancelled(_) => "orders.order.cancelled",
        }
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            OrderEvent::OrderPlaced(e) => e.occurred_at,
            OrderEvent::OrderShipped(e) => e.occurred_at,
            OrderEvent::OrderDelivered(e) => e.occurred_at,
            OrderEvent::OrderCancelled(e) => e.occurred_at,
        }
    }
}

impl Aggregate for Order {
    type Command = OrderCommand;
    type Event = OrderEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            OrderEvent::OrderPlaced(e) => {
                self.id = e.order_id;
                self.user_id = Some(e.user_id);
                self.items = e.items.clone();
                self.total = e.total;
                self.status = OrderStatus::Processing;
                self.created_at = Some(e.occurred_at);
                self.shipping_address = e.shipping_address.clone();
                self.placed = true;
            }
            OrderEvent::OrderShipped(_) => {
                self.status = OrderStatus::Shipped;
            }
            OrderEvent::OrderDelivered(_) => {
                self.status = OrderStatus::Delivered;
            }
            OrderEvent::OrderCancelled(_) => {
                self.status = OrderStatus::Cancelled;
            }
        }

        // Deterministic version tracking: +1 per applied event.
        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            OrderCommand::PlaceOrder(cmd) => self.handle_place(cmd),
            OrderCommand::ShipOrder(cmd) => {
                self.ensure_transition(cmd.order_id, OrderStatus::Shipped)?;
                Ok(vec![OrderEvent::OrderShipped(OrderShipped {
                    order_id: cmd.order_id,
                    occurred_at: cmd.occurred_at,
                })])
            }
            OrderCommand::DeliverOrder(cmd) => {
                self.ensure_transition(cmd.order_id, OrderStatus::Delivered)?;
                Ok(vec![OrderEvent::OrderDelivered(OrderDelivered {
                    order_id: cmd.order_id,
                    occurred_at: cmd.occurred_at,
                })])
            }
            OrderCommand::CancelOrder(cmd) => {
                self.ensure_transition(cmd.order_id, OrderStatus::Cancelled)?;
                Ok(vec![OrderEvent::OrderCancelled(OrderCancelled {
                    order_id: cmd.order_id,
                    reason: cmd.reason.clone(),
                    occurred_at: cmd.occurred_at,
                })])
            }
        }
    }
}

impl Order {
    fn ensure_order_id(&self, order_id: OrderId) -> Result<(), DomainError> {
        if self.id != order_id {
            return Err(DomainError::invariant("order_id mismatch"));
        }
        Ok(())
    }

    fn ensure_transition(&self, order_id: OrderId, next: OrderStatus) -> Result<(), DomainError> {
        if !self.placed {
            return Err(DomainError::not_found());
        }
        self.ensure_order_id(order_id)?;

        if !self.status.can_transition_to(next) {
            return Err(DomainError::invariant(format!(
                "cannot move order from {} to {}",
                self.status, next
            )));
        }
        Ok(())
    }

    fn handle_place(&self, cmd: &PlaceOrder) -> Result<Vec<OrderEvent>, DomainError> {
        if self.placed {
            return Err(DomainError::invariant("order already placed"));
        }
        self.ensure_order_id(cmd.order_id)?;

        if cmd.items.is_empty() {
            return Err(DomainError::validation("order must contain at least one item"));
        }
        if cmd.items.iter().any(|i| i.quantity == 0) {
            return Err(DomainError::validation("order line quantity must be positive"));
        }
        cmd.shipping_address.validate()?;

        let computed = cmd
            .items
            .iter()
            .fold(0u64, |acc, i| acc.saturating_add(i.line_total()));
        if computed != cmd.total {
            return Err(DomainError::invariant(format!(
                "order total {} does not match line items ({computed})",
                cmd.total
            )));
        }

        Ok(vec![OrderEvent::OrderPlaced(OrderPlaced {
            order_id: cmd.order_id,
            user_id: cmd.user_id,
            items: cmd.items.clone(),
            total: cmd.total,
            shipping_address: cmd.shipping_address.clone(),
            occurred_at: cmd.occurred_at,
        })])
    }
}
