//! Page-level catalog loading.
//!
//! Catalog failures never propagate as raw errors to a page; they become a
//! [`PageError`] carrying the message to show and a way back home.

use crate::catalog::{BusinessProfile, CatalogClient, Category, Product};
use crate::error::CommerceError;
use crate::ids::ProductId;
use crate::navigation::Route;
use serde::Serialize;
use thiserror::Error;

/// A catalog failure as shown on a page.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct PageError {
    /// Message for the page body.
    pub message: String,
    /// Where the "go back" link points.
    pub escape: Route,
}

impl PageError {
    fn from_commerce(err: &CommerceError) -> Self {
        let message = match err {
            CommerceError::ProductNotFound(_) => "Product not found".to_string(),
            other => format!("Error loading product: {other}"),
        };
        Self {
            message,
            escape: Route::Home,
        }
    }
}

/// Everything the product detail page renders.
#[derive(Debug, Clone, Serialize)]
pub struct ProductPage {
    pub product: Product,
    /// Other products from the same category.
    pub related: Vec<Product>,
}

/// Load a product and its related products.
///
/// A failure fetching the product is a page error. A failure fetching related
/// products only leaves the related list empty.
pub async fn load_product_page(
    client: &dyn CatalogClient,
    id: &ProductId,
) -> Result<ProductPage, PageError> {
    let product = client.product(id).await.map_err(|e| {
        tracing::warn!(product_id = %id, error = %e, "product lookup failed");
        PageError::from_commerce(&e)
    })?;

    let related = match &product.category_id {
        Some(category_id) => match client.products_by_category(category_id).await {
            Ok(products) => products.into_iter().filter(|p| p.id != product.id).collect(),
            Err(e) => {
                tracing::warn!(category_id = %category_id, error = %e, "related products unavailable");
                Vec::new()
            }
        },
        None => Vec::new(),
    };

    Ok(ProductPage { product, related })
}

/// Data shared by every page: navigation categories and branding.
#[derive(Debug, Clone, Serialize)]
pub struct StorefrontShell {
    pub categories: Vec<Category>,
    pub business: BusinessProfile,
}

/// Fetch categories and the business profile concurrently.
pub async fn load_shell(client: &dyn CatalogClient) -> Result<StorefrontShell, PageError> {
    let (categories, business) =
        futures::try_join!(client.categories(), client.business_profile()).map_err(|e| {
            PageError {
                message: format!("Error loading storefront: {e}"),
                escape: Route::Home,
            }
        })?;

    Ok(StorefrontShell {
        categories,
        business,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::StaticCatalog;
    use crate::ids::CategoryId;
    use async_trait::async_trait;

    const SNAPSHOT: &str = r#"{
        "products": [
            { "_id": "p-1", "name": "Saree", "price": "3200", "category_id": "women" },
            { "_id": "p-2", "name": "Kurti", "price": "900", "category_id": "women" },
            { "_id": "p-3", "name": "Panjabi", "price": "1450", "category_id": "men" }
        ],
        "categories": [{ "_id": "women", "name": "Women" }],
        "business": { "name": "Bazaar" }
    }"#;

    struct DownCatalog;

    #[async_trait]
    impl CatalogClient for DownCatalog {
        async fn product(&self, _id: &ProductId) -> Result<Product, CommerceError> {
            Err(CommerceError::CatalogUnavailable("503".into()))
        }
        async fn products(&self) -> Result<Vec<Product>, CommerceError> {
            Err(CommerceError::CatalogUnavailable("503".into()))
        }
        async fn products_by_category(
            &self,
            _id: &CategoryId,
        ) -> Result<Vec<Product>, CommerceError> {
            Err(CommerceError::CatalogUnavailable("503".into()))
        }
        async fn categories(&self) -> Result<Vec<Category>, CommerceError> {
            Err(CommerceError::CatalogUnavailable("503".into()))
        }
        async fn business_profile(&self) -> Result<BusinessProfile, CommerceError> {
            Err(CommerceError::CatalogUnavailable("503".into()))
        }
    }

    #[tokio::test]
    async fn test_product_page_excludes_self_from_related() {
        let catalog = StaticCatalog::from_json(SNAPSHOT).unwrap();
        let page = load_product_page(&catalog, &ProductId::new("p-1")).await.unwrap();

        assert_eq!(page.product.name, "Saree");
        let related: Vec<_> = page.related.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(related, vec!["p-2"]);
    }

    #[tokio::test]
    async fn test_missing_product_escapes_home() {
        let catalog = StaticCatalog::from_json(SNAPSHOT).unwrap();
        let err = load_product_page(&catalog, &ProductId::new("p-9"))
            .await
            .unwrap_err();

        assert_eq!(err.message, "Product not found");
        assert_eq!(err.escape, Route::Home);
    }

    #[tokio::test]
    async fn test_catalog_outage_is_a_page_error() {
        let err = load_product_page(&DownCatalog, &ProductId::new("p-1"))
            .await
            .unwrap_err();
        assert!(err.message.starts_with("Error loading product"));

        let err = load_shell(&DownCatalog).await.unwrap_err();
        assert_eq!(err.escape, Route::Home);
    }

    #[tokio::test]
    async fn test_shell_loads() {
        let catalog = StaticCatalog::from_json(SNAPSHOT).unwrap();
        let shell = load_shell(&catalog).await.unwrap();
        assert_eq!(shell.categories.len(), 1);
        assert_eq!(shell.business.name, "Bazaar");
    }
}
