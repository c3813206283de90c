//! Keyed persistence abstractions for carts and orders.

pub mod order_store;
pub mod record_store;

pub use order_store::{InMemoryOrderStore, OrderStore};
pub use record_store::{InMemoryRecordStore, RecordStore};
