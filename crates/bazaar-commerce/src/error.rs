//! Commerce error types.

use crate::checkout::ValidationError;
use thiserror::Error;

/// Errors that can occur in storefront operations.
#[derive(Error, Debug)]
pub enum CommerceError {
    /// Product not found in the catalog.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Variant not found on a product.
    #[error("Variant not found: {0}")]
    VariantNotFound(String),

    /// The catalog could not be queried.
    #[error("Catalog unavailable: {0}")]
    CatalogUnavailable(String),

    /// Line not present in the cart.
    #[error("Item not in cart: {0}")]
    ItemNotInCart(String),

    /// Insufficient stock for the requested quantity.
    #[error("Insufficient inventory for {product_id}: requested {requested}, available {available}")]
    InsufficientInventory {
        product_id: String,
        requested: i64,
        available: i64,
    },

    /// Quantity is not a positive integer.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// Quantity exceeds the per-line maximum.
    #[error("Quantity {0} exceeds maximum allowed ({1})")]
    QuantityExceedsLimit(i64, i64),

    /// Price text could not be read as a non-negative decimal.
    #[error("Invalid price: {0}")]
    InvalidPrice(String),

    /// The product can only be preordered, not added to the cart.
    #[error("Product {0} is available for preorder only")]
    PreorderOnly(String),

    /// Currency mismatch.
    #[error("Currency mismatch: expected {expected}, got {got}")]
    CurrencyMismatch { expected: String, got: String },

    /// Deposit rate or delivery fees out of range.
    #[error("Invalid pricing policy: {0}")]
    InvalidPricingPolicy(String),

    /// Arithmetic overflow.
    #[error("Arithmetic overflow in money calculation")]
    Overflow,

    /// Checkout form rejected.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A submission is already running for this checkout.
    #[error("Order submission already in progress")]
    SubmissionInProgress,

    /// The order payload could not be assembled.
    #[error("Failed to place order: {0}")]
    SubmissionFailed(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Session storage error.
    #[error("Cache error: {0}")]
    CacheError(String),
}

impl From<serde_json::Error> for CommerceError {
    fn from(e: serde_json::Error) -> Self {
        CommerceError::SerializationError(e.to_string())
    }
}

#[cfg(feature = "storage")]
impl From<bazaar_cache::CacheError> for CommerceError {
    fn from(e: bazaar_cache::CacheError) -> Self {
        CommerceError::CacheError(e.to_string())
    }
}
