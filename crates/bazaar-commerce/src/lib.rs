//! Storefront domain types and logic for Bazaar.
//!
//! - **Catalog**: products, variants, categories, the catalog query interface
//! - **Store**: the cart and the single preorder slot
//! - **Pricing**: preorder deposits, delivery charges, order totals
//! - **Checkout**: form validation, the order payload, submission
//!
//! # Example
//!
//! ```rust
//! use bazaar_commerce::prelude::*;
//!
//! let mut store = LineItemStore::new(Currency::BDT);
//! store
//!     .add_item(AddItem::new("p-1", "Kurti", Money::from_major(500, Currency::BDT)).quantity(2))
//!     .unwrap();
//!
//! let pricing = pricing::calculate(
//!     store.effective_items(),
//!     Some(DeliveryArea::InsideDhaka),
//!     PaymentMethod::Cod,
//!     store.currency,
//! )
//! .unwrap();
//! assert_eq!(pricing.grand_total.display(), "\u{09f3}1,060");
//! ```

pub mod error;
pub mod ids;
pub mod money;
pub mod navigation;

pub mod catalog;
pub mod checkout;
pub mod pricing;
pub mod store;

pub use error::CommerceError;
pub use ids::*;
pub use money::{Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CommerceError;
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money};
    pub use crate::navigation::{Navigator, Notifier, Route};
    pub use crate::pricing;

    // Catalog
    pub use crate::catalog::{
        load_product_page, load_shell, BusinessProfile, CatalogClient, Category, PageError,
        Product, ProductVariant, QuantitySelector, StaticCatalog,
    };

    // Store
    pub use crate::store::{AddItem, LineItem, LineItemStore, PreorderRequest, StoreAction};

    // Pricing
    pub use crate::pricing::{
        CheckoutPricing, DeliveryArea, LinePricing, PaymentMethod, PricingPolicy,
    };

    // Checkout
    pub use crate::checkout::{
        validate, CheckoutForm, OrderPayload, OrderStatus, OrderSubmitter, SubmissionConfig,
        SubmissionState, ValidationError,
    };
}
