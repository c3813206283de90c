use serde::{Deserialize, Serialize};

use storefront_core::{DomainError, DomainResult, Entity, ProductId};

/// Highest rating a product can carry.
pub const MAX_RATING: f32 = 5.0;

/// A listed product.
///
/// Products are immutable once listed: the catalog hands out clones, and carts
/// snapshot the fields they need at add time instead of holding references.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// Price in smallest currency unit (e.g., cents).
    pub price: u64,
    pub image: String,
    pub category: String,
    /// Average rating, 0 to 5 inclusive.
    pub rating: f32,
    pub review_count: u32,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub features: Option<Vec<String>>,
    pub in_stock: bool,
}

impl Product {
    /// Minimal in-stock product with no rating, image or description.
    pub fn new(
        id: impl Into<ProductId>,
        name: impl Into<String>,
        category: impl Into<String>,
        price: u64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            image: String::new(),
            category: category.into(),
            rating: 0.0,
            review_count: 0,
            description: String::new(),
            features: None,
            in_stock: true,
        }
    }

    pub fn with_rating(mut self, rating: f32, review_count: u32) -> Self {
        self.rating = rating;
        self.review_count = review_count;
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_features(mut self, features: Vec<String>) -> Self {
        self.features = Some(features);
        self
    }

    pub fn out_of_stock(mut self) -> Self {
        self.in_stock = false;
        self
    }

    /// Check the listing rules a product must satisfy before entering a catalog.
    pub fn validate(&self) -> DomainResult<()> {
        if self.id.as_str().trim().is_empty() {
            return Err(DomainError::validation("product id must not be empty"));
        }
        if self.name.trim().is_empty() {
            return Err(DomainError::validation(format!(
                "product {} must have a name",
                self.id
            )));
        }
        if self.category.trim().is_empty() {
            return Err(DomainError::validation(format!(
                "product {} must have a category",
                self.id
            )));
        }
        if !self.rating.is_finite() || !(0.0..=MAX_RATING).contains(&self.rating) {
            return Err(DomainError::validation(format!(
                "product {} rating must be between 0 and {MAX_RATING}",
                self.id
            )));
        }
        Ok(())
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
