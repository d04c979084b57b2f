//! Product catalog module.
//!
//! Contains the catalog types decoded from the remote API, the query
//! interface, and page-level loading for listing and detail pages.

mod category;
mod client;
mod page;
mod product;
mod quantity;

pub use category::{BusinessProfile, Category, ChannelKind, ContactChannel};
pub use client::{CatalogClient, StaticCatalog};
pub use page::{load_product_page, load_shell, PageError, ProductPage, StorefrontShell};
pub use product::{
    Product, ProductRecord, ProductVariant, VariantRecord, PLACEHOLDER_IMAGE, UNNAMED_PRODUCT,
};
pub use quantity::QuantitySelector;
