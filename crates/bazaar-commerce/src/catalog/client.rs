//! Catalog query interface.

use crate::catalog::{BusinessProfile, Category, Product};
use crate::error::CommerceError;
use crate::ids::{CategoryId, ProductId};
use async_trait::async_trait;
use serde::Deserialize;

/// Read access to the remote product catalog.
///
/// Implementations map transport failures to
/// [`CommerceError::CatalogUnavailable`] and unknown products to
/// [`CommerceError::ProductNotFound`].
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Fetch one product.
    async fn product(&self, id: &ProductId) -> Result<Product, CommerceError>;

    /// Fetch every listed product.
    async fn products(&self) -> Result<Vec<Product>, CommerceError>;

    /// Fetch products in a category or subcategory.
    async fn products_by_category(&self, id: &CategoryId) -> Result<Vec<Product>, CommerceError>;

    /// Fetch all categories.
    async fn categories(&self) -> Result<Vec<Category>, CommerceError>;

    /// Fetch branding and contact channels.
    async fn business_profile(&self) -> Result<BusinessProfile, CommerceError>;
}

/// A catalog held in memory, loaded from a JSON snapshot of the API.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StaticCatalog {
    #[serde(default)]
    products: Vec<Product>,
    #[serde(default)]
    categories: Vec<Category>,
    #[serde(default)]
    business: BusinessProfile,
}

impl StaticCatalog {
    pub fn new(
        products: Vec<Product>,
        categories: Vec<Category>,
        business: BusinessProfile,
    ) -> Self {
        Self {
            products,
            categories,
            business,
        }
    }

    /// Parse a snapshot of the form `{ "products": [..], "categories": [..], "business": {..} }`.
    pub fn from_json(json: &str) -> Result<Self, CommerceError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[async_trait]
impl CatalogClient for StaticCatalog {
    async fn product(&self, id: &ProductId) -> Result<Product, CommerceError> {
        self.products
            .iter()
            .find(|p| &p.id == id)
            .cloned()
            .ok_or_else(|| CommerceError::ProductNotFound(id.to_string()))
    }

    async fn products(&self) -> Result<Vec<Product>, CommerceError> {
        Ok(self.products.clone())
    }

    async fn products_by_category(&self, id: &CategoryId) -> Result<Vec<Product>, CommerceError> {
        Ok(self
            .products
            .iter()
            .filter(|p| p.in_category(id))
            .cloned()
            .collect())
    }

    async fn categories(&self) -> Result<Vec<Category>, CommerceError> {
        Ok(self.categories.clone())
    }

    async fn business_profile(&self) -> Result<BusinessProfile, CommerceError> {
        Ok(self.business.clone())
    }
}
