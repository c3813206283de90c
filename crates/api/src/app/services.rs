use std::sync::Arc;

use anyhow::Context;

use storefront_cart::{Cart, CartId};
use storefront_catalog::{InMemoryCatalogStore, QueryEngine};
use storefront_infra::{
    CartService, CheckoutService, InMemoryOrderStore, InMemoryRecordStore, OrderService,
};

use crate::config::ApiConfig;

const DEMO_CATALOG: &str = include_str!("../../data/catalog.json");

pub type Catalog = Arc<InMemoryCatalogStore>;
pub type Carts = Arc<InMemoryRecordStore<CartId, Cart>>;
pub type Orders = Arc<InMemoryOrderStore>;

/// Everything the handlers need, shared behind one `Arc`.
pub struct AppServices {
    pub catalog: QueryEngine<Catalog>,
    pub carts: CartService<Catalog, Carts>,
    pub checkout: CheckoutService<Catalog, Carts, Orders>,
    pub orders: OrderService<Orders>,
}

impl AppServices {
    /// Wire the services over in-memory cart and order stores.
    pub fn in_memory(catalog: InMemoryCatalogStore) -> Self {
        let catalog: Catalog = Arc::new(catalog);
        let carts: Carts = Arc::new(InMemoryRecordStore::new());
        let orders: Orders = Arc::new(InMemoryOrderStore::new());

        Self {
            catalog: QueryEngine::new(catalog.clone()),
            carts: CartService::new(catalog.clone(), carts.clone()),
            checkout: CheckoutService::new(catalog, carts, orders.clone()),
            orders: OrderService::new(orders),
        }
    }

    /// Services over the built-in demo catalog.
    pub fn demo() -> anyhow::Result<Self> {
        let catalog =
            InMemoryCatalogStore::from_json(DEMO_CATALOG).context("built-in demo catalog is invalid")?;
        Ok(Self::in_memory(catalog))
    }

    pub fn from_config(config: &ApiConfig) -> anyhow::Result<Self> {
        let Some(path) = &config.catalog_path else {
            return Self::demo();
        };

        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read catalog {}", path.display()))?;
        let catalog = InMemoryCatalogStore::from_json(&raw)
            .with_context(|| format!("failed to load catalog {}", path.display()))?;

        tracing::info!(path = %path.display(), products = catalog.len(), "catalog loaded");
        Ok(Self::in_memory(catalog))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_catalog_loads() {
        let services = AppServices::demo().unwrap();
        assert!(!services.catalog.store().is_empty());
    }

    #[test]
    fn missing_catalog_file_is_an_error() {
        let config = ApiConfig {
            catalog_path: Some("/definitely/not/here.json".into()),
            ..ApiConfig::default()
        };
        assert!(AppServices::from_config(&config).is_err());
    }
}
