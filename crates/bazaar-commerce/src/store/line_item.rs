//! Line items and the requests that create them.

use crate::error::CommerceError;
use crate::ids::{LineItemId, ProductId, VariantId};
use crate::money::amount::RawAmount;
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};

/// Maximum quantity allowed per line item.
pub const MAX_QUANTITY_PER_ITEM: i64 = 9999;

/// One product (or product variant) in the cart or the preorder slot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineItem {
    /// Line identifier, stable across quantity changes.
    pub id: LineItemId,
    pub product_id: ProductId,
    pub variant_id: Option<VariantId>,
    /// Variant label, e.g. "XL / Maroon".
    pub variant_name: Option<String>,
    /// Product name (denormalized for display).
    pub name: String,
    /// Image URL.
    pub image: Option<String>,
    /// Always at least 1.
    pub quantity: i64,
    /// Full unit price, never negative.
    pub unit_price: Money,
    /// Priced as a deposit rather than in full.
    pub is_preorder: bool,
}

impl LineItem {
    /// Whether this line holds the given product/variant pair.
    pub fn matches(&self, product_id: &ProductId, variant_id: Option<&VariantId>) -> bool {
        &self.product_id == product_id && self.variant_id.as_ref() == variant_id
    }

    /// Full price of the line (unit price × quantity), ignoring any deposit rule.
    pub fn full_total(&self) -> Result<Money, CommerceError> {
        self.unit_price.try_multiply(self.quantity)
    }
}

pub(crate) fn check_quantity(quantity: i64) -> Result<(), CommerceError> {
    if quantity <= 0 {
        return Err(CommerceError::InvalidQuantity(quantity));
    }
    if quantity > MAX_QUANTITY_PER_ITEM {
        return Err(CommerceError::QuantityExceedsLimit(
            quantity,
            MAX_QUANTITY_PER_ITEM,
        ));
    }
    Ok(())
}

pub(crate) fn check_price(price: &Money, currency: Currency) -> Result<(), CommerceError> {
    if price.currency != currency {
        return Err(CommerceError::CurrencyMismatch {
            expected: currency.code().to_string(),
            got: price.currency.code().to_string(),
        });
    }
    if price.is_negative() {
        return Err(CommerceError::InvalidPrice(price.display_amount()));
    }
    Ok(())
}

/// Request to put a product into the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddItem {
    pub product_id: ProductId,
    pub variant_id: Option<VariantId>,
    pub variant_name: Option<String>,
    pub name: String,
    pub image: Option<String>,
    pub unit_price: Money,
    pub quantity: i64,
}

impl AddItem {
    /// One unit of a product with no variant.
    pub fn new(product_id: impl Into<ProductId>, name: impl Into<String>, unit_price: Money) -> Self {
        Self {
            product_id: product_id.into(),
            variant_id: None,
            variant_name: None,
            name: name.into(),
            image: None,
            unit_price,
            quantity: 1,
        }
    }

    pub fn variant(mut self, id: impl Into<VariantId>, name: Option<String>) -> Self {
        self.variant_id = Some(id.into());
        self.variant_name = name;
        self
    }

    pub fn image(mut self, url: impl Into<String>) -> Self {
        self.image = Some(url.into());
        self
    }

    pub fn quantity(mut self, quantity: i64) -> Self {
        self.quantity = quantity;
        self
    }

    pub(crate) fn into_line_item(self) -> LineItem {
        LineItem {
            id: LineItemId::generate(),
            product_id: self.product_id,
            variant_id: self.variant_id,
            variant_name: self.variant_name,
            name: self.name,
            image: self.image,
            quantity: self.quantity,
            unit_price: self.unit_price,
            is_preorder: false,
        }
    }
}

/// Request to fill the preorder slot.
///
/// Mirrors what product pages send: the price may arrive as a number or a
/// decimal string, and `isPreOrder` may be left out (it then defaults to
/// `true`).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreorderRequest {
    pub product_id: ProductId,
    pub name: String,
    pub quantity: i64,
    pub price: RawAmount,
    #[serde(default, rename = "isPreOrder")]
    pub is_preorder: Option<bool>,
    #[serde(default)]
    pub variant_id: Option<VariantId>,
    #[serde(default)]
    pub variant_name: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

impl PreorderRequest {
    pub fn new(
        product_id: impl Into<ProductId>,
        name: impl Into<String>,
        price: impl Into<RawAmount>,
        quantity: i64,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            name: name.into(),
            quantity,
            price: price.into(),
            is_preorder: None,
            variant_id: None,
            variant_name: None,
            image: None,
        }
    }

    pub fn variant(mut self, id: impl Into<VariantId>, name: Option<String>) -> Self {
        self.variant_id = Some(id.into());
        self.variant_name = name;
        self
    }

    pub fn image(mut self, url: impl Into<String>) -> Self {
        self.image = Some(url.into());
        self
    }

    /// Normalize into a line item: coerce the price and default the preorder flag.
    pub(crate) fn into_line_item(self, currency: Currency) -> Result<LineItem, CommerceError> {
        check_quantity(self.quantity)?;
        let unit_price = self.price.into_money(currency)?;
        check_price(&unit_price, currency)?;

        Ok(LineItem {
            id: LineItemId::generate(),
            product_id: self.product_id,
            variant_id: self.variant_id,
            variant_name: self.variant_name.filter(|n| !n.is_empty()),
            name: self.name,
            image: self.image,
            quantity: self.quantity,
            unit_price,
            is_preorder: self.is_preorder.unwrap_or(true),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preorder_request_coerces_string_price() {
        let request: PreorderRequest = serde_json::from_str(
            r#"{ "productId": "p-1", "name": "Jamdani", "quantity": 1, "price": "4500.50" }"#,
        )
        .unwrap();

        let item = request.into_line_item(Currency::BDT).unwrap();
        assert_eq!(item.unit_price.amount_minor, 450_050);
        assert!(item.is_preorder);
    }

    #[test]
    fn test_preorder_request_keeps_explicit_flag() {
        let request: PreorderRequest = serde_json::from_str(
            r#"{ "productId": "p-1", "name": "Jamdani", "quantity": 2, "price": 4500, "isPreOrder": false }"#,
        )
        .unwrap();

        let item = request.into_line_item(Currency::BDT).unwrap();
        assert!(!item.is_preorder);
        assert_eq!(item.unit_price, Money::from_major(4500, Currency::BDT));
    }

    #[test]
    fn test_preorder_request_rejects_unparseable_price() {
        let request = PreorderRequest::new("p-1", "Jamdani", "TBD", 1);
        assert!(matches!(
            request.into_line_item(Currency::BDT),
            Err(CommerceError::InvalidPrice(_))
        ));
    }

    #[test]
    fn test_preorder_request_rejects_zero_quantity() {
        let request = PreorderRequest::new("p-1", "Jamdani", "100", 0);
        assert!(matches!(
            request.into_line_item(Currency::BDT),
            Err(CommerceError::InvalidQuantity(0))
        ));
    }

    #[test]
    fn test_line_matches_product_and_variant() {
        let item = AddItem::new("p-1", "Kurti", Money::from_major(900, Currency::BDT))
            .variant("v-1", Some("S".into()))
            .into_line_item();

        assert!(item.matches(&ProductId::new("p-1"), Some(&VariantId::new("v-1"))));
        assert!(!item.matches(&ProductId::new("p-1"), None));
        assert!(!item.matches(&ProductId::new("p-2"), Some(&VariantId::new("v-1"))));
    }

    #[test]
    fn test_negative_price_rejected() {
        let price = Money::new(-1, Currency::BDT);
        assert!(check_price(&price, Currency::BDT).is_err());
    }
}
