//! The order payload assembled at submission.

use crate::checkout::CheckoutForm;
use crate::error::CommerceError;
use crate::ids::{ProductId, VariantId};
use crate::money::{amount, Money};
use crate::pricing::{DeliveryArea, PaymentMethod, PricingPolicy};
use crate::store::{LineItem, LineItemStore};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Order status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Placed, not yet seen by the shop.
    #[default]
    Pending,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
        }
    }
}

/// Snapshot of one line as submitted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub product_id: ProductId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant_id: Option<VariantId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant_name: Option<String>,
    pub quantity: i64,
    /// Full unit price.
    #[serde(with = "amount")]
    pub price: Money,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl From<&LineItem> for OrderLine {
    fn from(item: &LineItem) -> Self {
        Self {
            product_id: item.product_id.clone(),
            variant_id: item.variant_id.clone(),
            variant_name: item.variant_name.clone(),
            quantity: item.quantity,
            price: item.unit_price,
            name: item.name.clone(),
            image: item.image.clone(),
        }
    }
}

/// What would be sent to the order intake service.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderPayload {
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_address: String,
    pub delivery_area: DeliveryArea,
    pub products: Vec<OrderLine>,
    /// Grand total charged now.
    #[serde(with = "amount")]
    pub total_amount: Money,
    pub payment_method: PaymentMethod,
    pub transaction_id: Option<String>,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    #[serde(rename = "isPreorder")]
    pub is_preorder: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl OrderPayload {
    /// Assemble the payload from the store's effective items and the form.
    pub fn build(
        store: &LineItemStore,
        form: &CheckoutForm,
        policy: &PricingPolicy,
        created_at: DateTime<Utc>,
    ) -> Result<Self, CommerceError> {
        let delivery_area = form
            .delivery_area
            .ok_or_else(|| CommerceError::SubmissionFailed("delivery area not set".into()))?;
        let items = store.effective_items();
        if items.is_empty() {
            return Err(CommerceError::SubmissionFailed("no items to order".into()));
        }

        let pricing = policy.calculate(
            items,
            Some(delivery_area),
            form.payment_method,
            store.currency,
        )?;

        // Free-text fields are sent trimmed.
        Ok(Self {
            customer_name: form.name.trim().to_string(),
            customer_phone: form.phone.trim().to_string(),
            customer_address: form.address.trim().to_string(),
            delivery_area,
            products: items.iter().map(OrderLine::from).collect(),
            total_amount: pricing.grand_total,
            payment_method: form.payment_method,
            transaction_id: form.effective_transaction_id(),
            status: OrderStatus::Pending,
            created_at,
            is_preorder: store.is_preorder_checkout(),
            notes: form.effective_notes(),
        })
    }

    pub fn to_json(&self) -> Result<String, CommerceError> {
        Ok(serde_json::to_string(self)?)
    }
}
