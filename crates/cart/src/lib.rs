//! Shopping cart domain module (event-sourced).
//!
//! This crate contains business rules for carts, implemented purely as
//! deterministic domain logic (no IO, no HTTP, no storage).

pub mod cart;

pub use cart::{
    AddItem, Cart, CartCleared, CartCommand, CartEvent, CartId, CartLineItem, ClearCart,
    ItemAdded, ItemQuantityChanged, ItemRemoved, NewLineItem, RemoveItem, UpdateQuantity,
};
