//! Orders domain module (event-sourced).
//!
//! Shipping addresses, the order aggregate with its status lifecycle, and the
//! builder that turns a cart snapshot into a placed order. Pure domain logic
//! (no IO, no HTTP, no storage).

pub mod address;
pub mod builder;
pub mod order;

pub use address::Address;
pub use builder::create_order;
pub use order::{
    CancelOrder, DeliverOrder, Order, OrderCancelled, OrderCommand, OrderDelivered, OrderEvent,
    OrderLineItem, OrderPlaced, OrderShipped, OrderStatus, PlaceOrder, ShipOrder,
};
