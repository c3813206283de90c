//! Catalog read interface and an in-memory implementation.

use std::collections::HashSet;
use std::sync::Arc;

use thiserror::Error;

use storefront_core::{DomainError, ProductId};

use crate::product::Product;

/// Read-only access to the set of sellable products.
///
/// Each call returns a consistent snapshot; callers never see a partially
/// updated catalog.
pub trait CatalogStore: Send + Sync {
    /// All products, in listing order.
    fn list_products(&self) -> Vec<Product>;

    /// Look up a single product by id.
    fn get(&self, id: &ProductId) -> Option<Product> {
        self.list_products().into_iter().find(|p| &p.id == id)
    }
}

impl<S> CatalogStore for Arc<S>
where
    S: CatalogStore + ?Sized,
{
    fn list_products(&self) -> Vec<Product> {
        (**self).list_products()
    }

    fn get(&self, id: &ProductId) -> Option<Product> {
        (**self).get(id)
    }
}

#[derive(Debug, Error)]
pub enum CatalogLoadError {
    #[error("failed to parse catalog json: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid catalog: {0}")]
    Invalid(#[from] DomainError),
}

/// In-memory catalog for tests/dev, fixed at construction.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalogStore {
    products: Vec<Product>,
}

impl InMemoryCatalogStore {
    /// Build a catalog from already-constructed products.
    ///
    /// Every product must pass [`Product::validate`] and ids must be unique.
    pub fn new(products: Vec<Product>) -> Result<Self, DomainError> {
        let mut seen = HashSet::with_capacity(products.len());
        for product in &products {
            product.validate()?;
            if !seen.insert(product.id.clone()) {
                return Err(DomainError::validation(format!(
                    "duplicate product id {}",
                    product.id
                )));
            }
        }
        Ok(Self { products })
    }

    /// Parse a JSON array of products (camelCase fields).
    pub fn from_json(json: &str) -> Result<Self, CatalogLoadError> {
        let products: Vec<Product> = serde_json::from_str(json)?;
        Ok(Self::new(products)?)
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl CatalogStore for InMemoryCatalogStore {
    fn list_products(&self) -> Vec<Product> {
        self.products.clone()
    }

    fn get(&self, id: &ProductId) -> Option<Product> {
        self.products.iter().find(|p| &p.id == id).cloned()
    }
}
