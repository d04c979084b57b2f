//! Checkout form validation.

use crate::checkout::CheckoutForm;
use crate::store::LineItem;
use thiserror::Error;

/// The first rule a checkout attempt breaks. `Display` is the message shown
/// to the shopper.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Name is required")]
    NameRequired,
    #[error("Phone number must be 11 digits")]
    InvalidPhone,
    #[error("Address is required")]
    AddressRequired,
    #[error("Delivery area is required")]
    DeliveryAreaRequired,
    #[error("Transaction ID is required for bKash/Nagad")]
    TransactionIdRequired,
    #[error("Your cart is empty")]
    EmptyCart,
}

/// Number of digits in a local mobile number.
pub const PHONE_DIGITS: usize = 11;

fn is_valid_phone(phone: &str) -> bool {
    phone.len() == PHONE_DIGITS && phone.bytes().all(|b| b.is_ascii_digit())
}

/// Check the form and the items being checked out, stopping at the first failure.
pub fn validate(form: &CheckoutForm, items: &[LineItem]) -> Result<(), ValidationError> {
    if form.name.trim().is_empty() {
        return Err(ValidationError::NameRequired);
    }
    if !is_valid_phone(&form.phone) {
        return Err(ValidationError::InvalidPhone);
    }
    if form.address.trim().is_empty() {
        return Err(ValidationError::AddressRequired);
    }
    if form.delivery_area.is_none() {
        return Err(ValidationError::DeliveryAreaRequired);
    }
    if form.payment_method.requires_transaction_id() && form.transaction_id.trim().is_empty() {
        return Err(ValidationError::TransactionIdRequired);
    }
    if items.is_empty() {
        return Err(ValidationError::EmptyCart);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::{Currency, Money};
    use crate::pricing::{DeliveryArea, PaymentMethod};
    use crate::store::{AddItem, LineItemStore};

    fn filled() -> CheckoutForm {
        CheckoutForm::new()
            .name("Rahima Akter")
            .phone("01712345678")
            .address("House 12, Road 5, Dhanmondi")
            .delivery_area(DeliveryArea::InsideDhaka)
    }

    fn one_item() -> LineItemStore {
        let mut store = LineItemStore::new(Currency::BDT);
        store
            .add_item(AddItem::new("p-1", "Kurti", Money::from_major(900, Currency::BDT)))
            .unwrap();
        store
    }

    #[test]
    fn test_valid_form_passes() {
        assert_eq!(validate(&filled(), one_item().effective_items()), Ok(()));
    }

    #[test]
    fn test_name_required() {
        let form = filled().name("   ");
        assert_eq!(
            validate(&form, one_item().effective_items()),
            Err(ValidationError::NameRequired)
        );
        assert_eq!(ValidationError::NameRequired.to_string(), "Name is required");
    }

    #[test]
    fn test_phone_must_be_eleven_digits() {
        let items = one_item();
        for bad in ["123", "0171234567", "017123456789", "0171234567a", " 01712345678", "০১৭১২৩৪৫৬৭৮"] {
            assert_eq!(
                validate(&filled().phone(bad), items.effective_items()),
                Err(ValidationError::InvalidPhone),
                "{bad}"
            );
        }
        assert_eq!(
            ValidationError::InvalidPhone.to_string(),
            "Phone number must be 11 digits"
        );
    }

    #[test]
    fn test_address_and_area_required() {
        let items = one_item();
        assert_eq!(
            validate(&filled().address(""), items.effective_items()),
            Err(ValidationError::AddressRequired)
        );

        let mut form = filled();
        form.delivery_area = None;
        assert_eq!(
            validate(&form, items.effective_items()),
            Err(ValidationError::DeliveryAreaRequired)
        );
    }

    #[test]
    fn test_transaction_id_for_wallets_only() {
        let items = one_item();
        for method in [PaymentMethod::Bkash, PaymentMethod::Nagad] {
            let form = filled().payment(method);
            assert_eq!(
                validate(&form, items.effective_items()),
                Err(ValidationError::TransactionIdRequired)
            );
            assert_eq!(validate(&form.transaction_id("TXN1"), items.effective_items()), Ok(()));
        }
        assert_eq!(validate(&filled().payment(PaymentMethod::Cod), items.effective_items()), Ok(()));
    }

    #[test]
    fn test_empty_cart_rejected_last() {
        assert_eq!(validate(&filled(), &[]), Err(ValidationError::EmptyCart));
        assert_eq!(ValidationError::EmptyCart.to_string(), "Your cart is empty");
    }

    #[test]
    fn test_first_failure_wins() {
        let form = CheckoutForm::new().payment(PaymentMethod::Bkash);
        assert_eq!(validate(&form, &[]), Err(ValidationError::NameRequired));

        let form = form.name("Karim");
        assert_eq!(validate(&form, &[]), Err(ValidationError::InvalidPhone));
    }
}
