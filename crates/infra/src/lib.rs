//! Infrastructure layer: record stores and the application services that
//! compose the catalog, cart and order domains.

pub mod cart_service;
pub mod checkout;
pub mod order_service;
pub mod store;

pub use cart_service::CartService;
pub use checkout::CheckoutService;
pub use order_service::OrderService;
pub use store::{InMemoryOrderStore, InMemoryRecordStore, OrderStore, RecordStore};
