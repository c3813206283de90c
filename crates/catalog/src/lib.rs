//! Catalog domain module.
//!
//! Product records, the read-only catalog store abstraction, and the query engine
//! (category filter, sort order, page window). Everything here is deterministic
//! and free of IO apart from parsing seed JSON handed in by the caller.

pub mod product;
pub mod query;
pub mod store;

pub use product::Product;
pub use query::{CatalogQuery, Page, QueryEngine, SortOrder, query};
pub use store::{CatalogLoadError, CatalogStore, InMemoryCatalogStore};
