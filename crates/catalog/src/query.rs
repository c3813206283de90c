//! Catalog query engine: category filter, sort order, page window.
//!
//! Inputs come from user-supplied query strings, so nothing here fails: an
//! unknown sort value or an empty category simply turns that axis into a no-op.

use core::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::product::Product;
use crate::store::CatalogStore;

/// Closed set of supported sort orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    /// Cheapest first.
    PriceAsc,
    /// Most expensive first.
    PriceDesc,
    /// Highest rated first.
    Rating,
}

impl SortOrder {
    /// Coerce a raw query-string value. Unrecognized values yield `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "price-asc" => Some(Self::PriceAsc),
            "price-desc" => Some(Self::PriceDesc),
            "rating" => Some(Self::Rating),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PriceAsc => "price-asc",
            Self::PriceDesc => "price-desc",
            Self::Rating => "rating",
        }
    }

    /// Stable in-place sort; equal keys keep their relative order.
    ///
    /// Ratings compare numerically, so `-0.0` and `0.0` tie. Listed products
    /// never carry NaN.
    fn sort(self, products: &mut [Product]) {
        match self {
            Self::PriceAsc => products.sort_by(|a, b| a.price.cmp(&b.price)),
            Self::PriceDesc => products.sort_by(|a, b| b.price.cmp(&a.price)),
            Self::Rating => products.sort_by(|a, b| {
                b.rating.partial_cmp(&a.rating).unwrap_or(Ordering::Equal)
            }),
        }
    }
}

impl core::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Offset/limit window applied after filtering and sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Page {
    pub offset: usize,
    /// `None` means "everything from `offset`".
    pub limit: Option<usize>,
}

impl Page {
    pub fn new(offset: usize, limit: Option<usize>) -> Self {
        Self { offset, limit }
    }

    fn apply(self, products: Vec<Product>) -> Vec<Product> {
        products
            .into_iter()
            .skip(self.offset)
            .take(self.limit.unwrap_or(usize::MAX))
            .collect()
    }
}

/// Typed catalog query.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CatalogQuery {
    /// Exact, case-sensitive category match.
    pub category: Option<String>,
    pub sort: Option<SortOrder>,
    pub page: Option<Page>,
}

impl CatalogQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn sort(mut self, sort: SortOrder) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn page(mut self, page: Page) -> Self {
        self.page = Some(page);
        self
    }

    /// Build a query from raw request parameters.
    ///
    /// An empty category counts as absent and an unknown sort value as no sort.
    /// A page is only set when `limit` or `offset` is given.
    pub fn from_params(
        category: Option<&str>,
        sort: Option<&str>,
        limit: Option<usize>,
        offset: Option<usize>,
    ) -> Self {
        let page = match (limit, offset) {
            (None, None) => None,
            (limit, offset) => Some(Page::new(offset.unwrap_or(0), limit)),
        };

        Self {
            category: category.filter(|c| !c.is_empty()).map(str::to_string),
            sort: sort.and_then(SortOrder::parse),
            page,
        }
    }
}

/// Apply a query to a product sequence. The input is left untouched.
pub fn query(products: &[Product], q: &CatalogQuery) -> Vec<Product> {
    let mut selected: Vec<Product> = match q.category.as_deref() {
        Some(category) => products
            .iter()
            .filter(|p| p.category == category)
            .cloned()
            .collect(),
        None => products.to_vec(),
    };

    if let Some(sort) = q.sort {
        sort.sort(&mut selected);
    }

    match q.page {
        Some(page) => page.apply(selected),
        None => selected,
    }
}

/// Query engine bound to an explicit catalog store.
#[derive(Debug, Clone)]
pub struct QueryEngine<S> {
    store: S,
}

impl<S: CatalogStore> QueryEngine<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Read a fresh snapshot from the store and apply `q` to it.
    pub fn query(&self, q: &CatalogQuery) -> Vec<Product> {
        let products = self.store.list_products();
        query(&products, q)
    }
}
