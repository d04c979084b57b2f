//! Product and variant types.
//!
//! The catalog API speaks a loose JSON dialect: Mongo-style `_id` keys,
//! prices as either strings or numbers, the preorder flag as `0`/`1`, and
//! images wrapped two objects deep. [`ProductRecord`] mirrors that shape and
//! [`Product`] is the normalized form the rest of the crate works with.

use crate::error::CommerceError;
use crate::ids::{CategoryId, ProductId, VariantId};
use crate::money::amount::RawAmount;
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};

/// Image shown when a product has none.
pub const PLACEHOLDER_IMAGE: &str = "/assets/images/placeholder.png";

/// Name shown when the catalog omits one.
pub const UNNAMED_PRODUCT: &str = "Unnamed Product";

/// A product in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(try_from = "ProductRecord")]
pub struct Product {
    /// Catalog identifier.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Image URLs, primary first.
    pub images: Vec<String>,
    /// Base price when no variant price applies.
    pub price: Money,
    /// Short description for the detail page.
    pub short_description: Option<String>,
    /// Owning category.
    pub category_id: Option<CategoryId>,
    /// Owning subcategory.
    pub subcategory_id: Option<CategoryId>,
    /// Product can only be preordered.
    pub preorder_only: bool,
    /// Stock across all variants, when the catalog reports it.
    pub total_stock: Option<i64>,
    /// Currency of every price on this product.
    pub currency: Currency,
    /// Purchasable variants, default first.
    pub variants: Vec<ProductVariant>,
}

impl Product {
    /// Create a simple product with no variants.
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>, price: Money) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            images: Vec::new(),
            price,
            short_description: None,
            category_id: None,
            subcategory_id: None,
            preorder_only: false,
            total_stock: None,
            currency: price.currency,
            variants: Vec::new(),
        }
    }

    /// Primary image URL, or the placeholder.
    pub fn primary_image(&self) -> &str {
        self.images
            .first()
            .map(String::as_str)
            .unwrap_or(PLACEHOLDER_IMAGE)
    }

    /// The variant shown by default on listings.
    pub fn default_variant(&self) -> Option<&ProductVariant> {
        self.variants.first()
    }

    /// Look up a variant by ID.
    pub fn variant(&self, id: &VariantId) -> Result<&ProductVariant, CommerceError> {
        self.variants
            .iter()
            .find(|v| &v.id == id)
            .ok_or_else(|| CommerceError::VariantNotFound(id.to_string()))
    }

    /// Price charged per unit for the given variant (or the product itself).
    pub fn unit_price(&self, variant: Option<&ProductVariant>) -> Money {
        variant
            .and_then(ProductVariant::effective_price)
            .unwrap_or(self.price)
    }

    /// Price shown on listing cards.
    pub fn listing_price(&self) -> Option<Money> {
        self.default_variant()
            .and_then(ProductVariant::effective_price)
            .or_else(|| (!self.price.is_zero()).then_some(self.price))
    }

    /// Stock available for the given variant, falling back to the product total.
    pub fn available_stock(&self, variant: Option<&ProductVariant>) -> Option<i64> {
        variant.and_then(|v| v.stock).or(self.total_stock)
    }

    pub fn in_category(&self, category_id: &CategoryId) -> bool {
        self.category_id.as_ref() == Some(category_id)
            || self.subcategory_id.as_ref() == Some(category_id)
    }
}

/// A purchasable variant of a product.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ProductVariant {
    /// Variant identifier.
    pub id: VariantId,
    /// Display label, e.g. "XL / Maroon".
    pub name: Option<String>,
    /// Current (discounted) price.
    pub offer_price: Option<Money>,
    /// Regular price.
    pub selling_price: Option<Money>,
    /// Stock for this variant.
    pub stock: Option<i64>,
}

impl ProductVariant {
    /// Price the shopper pays: the offer price when set, else the selling price.
    pub fn effective_price(&self) -> Option<Money> {
        self.offer_price.or(self.selling_price)
    }

    /// Both prices are known and differ, so the selling price is shown struck through.
    pub fn is_marked_down(&self) -> bool {
        matches!(
            (self.offer_price, self.selling_price),
            (Some(offer), Some(selling)) if offer != selling
        )
    }

    pub fn is_in_stock(&self) -> bool {
        self.stock.map_or(true, |s| s > 0)
    }
}

/// Product as returned by the catalog API.
///
/// Also accepts the field names [`Product`] serializes with, so a product
/// written out by this crate reads back unchanged.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductRecord {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub images: Vec<ImageRecord>,
    #[serde(default)]
    pub price: Option<RawAmount>,
    #[serde(default, alias = "short_description")]
    pub short_desc: Option<String>,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub subcategory_id: Option<String>,
    #[serde(default, alias = "preorder_only")]
    pub pre_order: Option<FlagRecord>,
    #[serde(default)]
    pub total_stock: Option<i64>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default, rename = "variantsId", alias = "variants")]
    pub variants: Vec<VariantRecord>,
}

/// `images[]` entry: either `{ "image": { "secure_url": .. } }` or a bare URL.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ImageRecord {
    Wrapped { image: SecureUrl },
    Url(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct SecureUrl {
    pub secure_url: String,
}

/// Preorder flag, sent as a number or a boolean.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(untagged)]
pub enum FlagRecord {
    Number(i64),
    Bool(bool),
}

impl FlagRecord {
    fn is_set(self) -> bool {
        match self {
            FlagRecord::Number(n) => n != 0,
            FlagRecord::Bool(b) => b,
        }
    }
}

/// Variant as returned by the catalog API.
#[derive(Debug, Clone, Deserialize)]
pub struct VariantRecord {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default, alias = "variant_name")]
    pub name: Option<String>,
    #[serde(default)]
    pub offer_price: Option<RawAmount>,
    #[serde(default)]
    pub selling_price: Option<RawAmount>,
    #[serde(default, alias = "total_stock")]
    pub stock: Option<i64>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// Decode an optional amount; an empty string means "not set".
fn optional_amount(
    raw: Option<RawAmount>,
    currency: Currency,
) -> Result<Option<Money>, CommerceError> {
    match raw {
        None => Ok(None),
        Some(RawAmount::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(raw) => raw.into_money(currency).map(Some),
    }
}

impl VariantRecord {
    fn into_variant(self, currency: Currency) -> Result<ProductVariant, CommerceError> {
        Ok(ProductVariant {
            id: VariantId::new(self.id),
            name: non_empty(self.name),
            offer_price: optional_amount(self.offer_price, currency)?,
            selling_price: optional_amount(self.selling_price, currency)?,
            stock: self.stock,
        })
    }
}

impl TryFrom<ProductRecord> for Product {
    type Error = CommerceError;

    fn try_from(record: ProductRecord) -> Result<Self, Self::Error> {
        let currency = record
            .currency
            .as_deref()
            .and_then(Currency::from_code)
            .unwrap_or_default();

        let price = optional_amount(record.price, currency)?.unwrap_or(Money::zero(currency));
        if price.is_negative() {
            return Err(CommerceError::InvalidPrice(price.display_amount()));
        }

        let images = record
            .images
            .into_iter()
            .map(|img| match img {
                ImageRecord::Wrapped { image } => image.secure_url,
                ImageRecord::Url(url) => url,
            })
            .filter(|url| !url.is_empty())
            .collect();

        let variants = record
            .variants
            .into_iter()
            .map(|v| v.into_variant(currency))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Product {
            id: ProductId::new(record.id),
            name: non_empty(record.name).unwrap_or_else(|| UNNAMED_PRODUCT.to_string()),
            images,
            price,
            short_description: non_empty(record.short_desc),
            category_id: non_empty(record.category_id).map(CategoryId::new),
            subcategory_id: non_empty(record.subcategory_id).map(CategoryId::new),
            preorder_only: record.pre_order.is_some_and(FlagRecord::is_set),
            total_stock: record.total_stock,
            currency,
            variants,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PANJABI: &str = r#"{
        "_id": "p-100",
        "name": "Cotton Panjabi",
        "images": [{ "image": { "secure_url": "https://cdn.example/p100.jpg" } }],
        "price": "1450",
        "short_desc": "Hand-stitched",
        "category_id": "men",
        "pre_order": 0,
        "total_stock": 7,
        "variantsId": [
            { "_id": "v-1", "name": "M", "offer_price": "1200", "selling_price": 1450, "stock": 3 },
            { "_id": "v-2", "name": "L", "selling_price": "1450" }
        ]
    }"#;

    #[test]
    fn test_decode_catalog_record() {
        let product: Product = serde_json::from_str(PANJABI).unwrap();

        assert_eq!(product.id.as_str(), "p-100");
        assert_eq!(product.price, Money::from_major(1450, Currency::BDT));
        assert_eq!(product.primary_image(), "https://cdn.example/p100.jpg");
        assert_eq!(product.category_id, Some(CategoryId::new("men")));
        assert!(!product.preorder_only);
        assert_eq!(product.variants.len(), 2);
    }

    #[test]
    fn test_decode_applies_fallbacks() {
        let product: Product =
            serde_json::from_str(r#"{ "_id": "p-1", "pre_order": 1 }"#).unwrap();

        assert_eq!(product.name, UNNAMED_PRODUCT);
        assert_eq!(product.primary_image(), PLACEHOLDER_IMAGE);
        assert!(product.price.is_zero());
        assert!(product.preorder_only);
        assert_eq!(product.listing_price(), None);
    }

    #[test]
    fn test_decode_rejects_bad_price() {
        let result: Result<Product, _> =
            serde_json::from_str(r#"{ "_id": "p-1", "price": "call us" }"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_variant_pricing() {
        let product: Product = serde_json::from_str(PANJABI).unwrap();
        let medium = product.variant(&VariantId::new("v-1")).unwrap();
        let large = product.variant(&VariantId::new("v-2")).unwrap();

        assert_eq!(medium.effective_price(), Some(Money::from_major(1200, Currency::BDT)));
        assert!(medium.is_marked_down());
        assert_eq!(large.effective_price(), Some(Money::from_major(1450, Currency::BDT)));
        assert!(!large.is_marked_down());

        assert_eq!(product.unit_price(Some(medium)), Money::from_major(1200, Currency::BDT));
        assert_eq!(product.unit_price(None), Money::from_major(1450, Currency::BDT));
        assert_eq!(product.listing_price(), Some(Money::from_major(1200, Currency::BDT)));
    }

    #[test]
    fn test_available_stock_prefers_variant() {
        let product: Product = serde_json::from_str(PANJABI).unwrap();
        let medium = product.variant(&VariantId::new("v-1")).unwrap();
        let large = product.variant(&VariantId::new("v-2")).unwrap();

        assert_eq!(product.available_stock(Some(medium)), Some(3));
        assert_eq!(product.available_stock(Some(large)), Some(7));
        assert_eq!(product.available_stock(None), Some(7));
    }

    #[test]
    fn test_serialized_product_reads_back() {
        let mut product: Product = serde_json::from_str(PANJABI).unwrap();
        product.preorder_only = true;

        let json = serde_json::to_string(&product).unwrap();
        let decoded: Product = serde_json::from_str(&json).unwrap();

        assert_eq!(decoded, product);
        assert!(decoded.preorder_only);
        assert_eq!(decoded.short_description.as_deref(), Some("Hand-stitched"));
    }

    #[test]
    fn test_unknown_variant() {
        let product: Product = serde_json::from_str(PANJABI).unwrap();
        assert!(matches!(
            product.variant(&VariantId::new("nope")),
            Err(CommerceError::VariantNotFound(_))
        ));
    }
}
