//! Checkout form state.

use crate::pricing::{DeliveryArea, PaymentMethod};
use serde::{Deserialize, Serialize};

/// Fields the shopper fills in on the checkout page.
///
/// Starts empty with cash on delivery selected; discarded after submission.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CheckoutForm {
    pub name: String,
    pub phone: String,
    pub address: String,
    pub delivery_area: Option<DeliveryArea>,
    pub payment_method: PaymentMethod,
    /// Wallet transaction ID, ignored for cash on delivery.
    pub transaction_id: String,
    /// Free-text delivery notes.
    pub notes: Option<String>,
}

impl CheckoutForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = phone.into();
        self
    }

    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }

    pub fn delivery_area(mut self, area: DeliveryArea) -> Self {
        self.delivery_area = Some(area);
        self
    }

    pub fn payment(mut self, method: PaymentMethod) -> Self {
        self.payment_method = method;
        self
    }

    pub fn transaction_id(mut self, id: impl Into<String>) -> Self {
        self.transaction_id = id.into();
        self
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Transaction ID to submit: `None` for cash on delivery or when blank.
    pub fn effective_transaction_id(&self) -> Option<String> {
        if !self.payment_method.requires_transaction_id() {
            return None;
        }
        let id = self.transaction_id.trim();
        (!id.is_empty()).then(|| id.to_string())
    }

    /// Notes to submit, if any non-blank text was entered.
    pub fn effective_notes(&self) -> Option<String> {
        self.notes
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string)
    }
}
