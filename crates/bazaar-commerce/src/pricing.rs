//! Checkout pricing.
//!
//! Pure functions from line items and the delivery/payment choice to the
//! numbers on the order summary. Preorder lines are charged a deposit; cash
//! on delivery adds a delivery charge that depends on the area.

use crate::error::CommerceError;
use crate::ids::LineItemId;
use crate::money::{Currency, Money};
use crate::store::LineItem;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Where the order is delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryArea {
    InsideDhaka,
    OutsideDhaka,
}

impl DeliveryArea {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryArea::InsideDhaka => "inside_dhaka",
            DeliveryArea::OutsideDhaka => "outside_dhaka",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            DeliveryArea::InsideDhaka => "Inside Dhaka",
            DeliveryArea::OutsideDhaka => "Outside Dhaka",
        }
    }
}

impl fmt::Display for DeliveryArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeliveryArea {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "inside_dhaka" | "inside" => Ok(DeliveryArea::InsideDhaka),
            "outside_dhaka" | "outside" => Ok(DeliveryArea::OutsideDhaka),
            other => Err(format!("unknown delivery area: {other}")),
        }
    }
}

/// How the shopper pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Cash on delivery.
    #[default]
    Cod,
    Bkash,
    Nagad,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cod => "cod",
            PaymentMethod::Bkash => "bkash",
            PaymentMethod::Nagad => "nagad",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PaymentMethod::Cod => "Cash on Delivery",
            PaymentMethod::Bkash => "bKash",
            PaymentMethod::Nagad => "Nagad",
        }
    }

    /// Mobile wallet payments are confirmed by a transaction ID.
    pub fn requires_transaction_id(&self) -> bool {
        matches!(self, PaymentMethod::Bkash | PaymentMethod::Nagad)
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cod" => Ok(PaymentMethod::Cod),
            "bkash" => Ok(PaymentMethod::Bkash),
            "nagad" => Ok(PaymentMethod::Nagad),
            other => Err(format!("unknown payment method: {other}")),
        }
    }
}

/// Deposit rate and delivery fees, in whole currency units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingPolicy {
    /// Share of the price charged up front for preorders.
    pub deposit_percent: i64,
    pub inside_dhaka_fee: i64,
    pub outside_dhaka_fee: i64,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self {
            deposit_percent: 20,
            inside_dhaka_fee: 60,
            outside_dhaka_fee: 100,
        }
    }
}

/// Pricing for one line.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LinePricing {
    pub line_item_id: LineItemId,
    pub name: String,
    pub quantity: i64,
    /// Full unit price.
    pub unit_price: Money,
    /// Amount charged per unit now (the deposit share for preorders).
    ///
    /// Rounded per unit, for display. `contribution` rounds the deposit on the
    /// line total instead, so for fractional amounts it can differ from
    /// `charged_unit_price × quantity` by the rounding (3 × ৳3.33 shows ৳0.67
    /// per unit against a ৳2.00 contribution).
    pub charged_unit_price: Money,
    /// Amount this line contributes to the subtotal. This is what is charged.
    pub contribution: Money,
    /// Line is charged as a deposit.
    pub is_deposit: bool,
}

/// The order summary.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CheckoutPricing {
    pub lines: Vec<LinePricing>,
    pub subtotal: Money,
    pub delivery_charge: Money,
    pub grand_total: Money,
}

impl CheckoutPricing {
    /// Whether any line is charged as a deposit.
    pub fn has_deposit(&self) -> bool {
        self.lines.iter().any(|l| l.is_deposit)
    }
}

impl PricingPolicy {
    /// Reject a policy that could produce negative charges.
    pub fn validate(&self) -> Result<(), CommerceError> {
        if !(0..=100).contains(&self.deposit_percent) {
            return Err(CommerceError::InvalidPricingPolicy(format!(
                "deposit_percent must be 0-100, got {}",
                self.deposit_percent
            )));
        }
        for (name, fee) in [
            ("inside_dhaka_fee", self.inside_dhaka_fee),
            ("outside_dhaka_fee", self.outside_dhaka_fee),
        ] {
            if fee < 0 {
                return Err(CommerceError::InvalidPricingPolicy(format!(
                    "{name} must not be negative, got {fee}"
                )));
            }
        }
        Ok(())
    }

    /// What a line contributes to the subtotal.
    ///
    /// The deposit is taken on the line total, rounded half-up to the minor unit.
    pub fn line_contribution(&self, item: &LineItem) -> Result<Money, CommerceError> {
        let full = item.full_total()?;
        if item.is_preorder {
            full.percentage(self.deposit_percent)
        } else {
            Ok(full)
        }
    }

    /// Delivery charge for the chosen area and payment method.
    ///
    /// Only cash on delivery is charged; an unset area is charged the outside rate.
    pub fn delivery_charge(
        &self,
        area: Option<DeliveryArea>,
        payment: PaymentMethod,
        currency: Currency,
    ) -> Money {
        if payment != PaymentMethod::Cod {
            return Money::zero(currency);
        }
        let fee = match area {
            Some(DeliveryArea::InsideDhaka) => self.inside_dhaka_fee,
            Some(DeliveryArea::OutsideDhaka) | None => self.outside_dhaka_fee,
        };
        Money::from_major(fee, currency)
    }

    /// Price the items for checkout.
    pub fn calculate(
        &self,
        items: &[LineItem],
        area: Option<DeliveryArea>,
        payment: PaymentMethod,
        currency: Currency,
    ) -> Result<CheckoutPricing, CommerceError> {
        self.validate()?;
        let lines = items
            .iter()
            .map(|item| self.line_pricing(item))
            .collect::<Result<Vec<_>, _>>()?;

        let subtotal = Money::try_sum(lines.iter().map(|l| &l.contribution), currency)?;
        let delivery_charge = self.delivery_charge(area, payment, currency);
        let grand_total = subtotal.try_add(&delivery_charge)?;

        Ok(CheckoutPricing {
            lines,
            subtotal,
            delivery_charge,
            grand_total,
        })
    }

    fn line_pricing(&self, item: &LineItem) -> Result<LinePricing, CommerceError> {
        let charged_unit_price = if item.is_preorder {
            item.unit_price.percentage(self.deposit_percent)?
        } else {
            item.unit_price
        };
        Ok(LinePricing {
            line_item_id: item.id.clone(),
            name: item.name.clone(),
            quantity: item.quantity,
            unit_price: item.unit_price,
            charged_unit_price,
            contribution: self.line_contribution(item)?,
            is_deposit: item.is_preorder,
        })
    }
}

/// Price the items with the default policy.
pub fn calculate(
    items: &[LineItem],
    area: Option<DeliveryArea>,
    payment: PaymentMethod,
    currency: Currency,
) -> Result<CheckoutPricing, CommerceError> {
    PricingPolicy::default().calculate(items, area, payment, currency)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{AddItem, LineItemStore, PreorderRequest};

    fn bdt(major: i64) -> Money {
        Money::from_major(major, Currency::BDT)
    }

    fn cart_with(price: i64, quantity: i64) -> LineItemStore {
        let mut store = LineItemStore::new(Currency::BDT);
        store
            .add_item(AddItem::new("p-1", "Kurti", bdt(price)).quantity(quantity))
            .unwrap();
        store
    }

    fn preorder_with(price: &str, quantity: i64) -> LineItemStore {
        let mut store = LineItemStore::new(Currency::BDT);
        store
            .set_preorder(PreorderRequest::new("p-9", "Jamdani", price, quantity))
            .unwrap();
        store
    }

    #[test]
    fn test_cod_inside_dhaka() {
        let store = cart_with(500, 2);
        let pricing = calculate(
            store.effective_items(),
            Some(DeliveryArea::InsideDhaka),
            PaymentMethod::Cod,
            Currency::BDT,
        )
        .unwrap();

        assert_eq!(pricing.subtotal, bdt(1000));
        assert_eq!(pricing.delivery_charge, bdt(60));
        assert_eq!(pricing.grand_total, bdt(1060));
        assert!(!pricing.has_deposit());
    }

    #[test]
    fn test_preorder_deposit_with_wallet_payment() {
        let store = preorder_with("1000", 1);
        let pricing = calculate(
            store.effective_items(),
            Some(DeliveryArea::InsideDhaka),
            PaymentMethod::Bkash,
            Currency::BDT,
        )
        .unwrap();

        assert_eq!(pricing.subtotal, bdt(200));
        assert_eq!(pricing.delivery_charge, bdt(0));
        assert_eq!(pricing.grand_total, bdt(200));

        let line = &pricing.lines[0];
        assert!(line.is_deposit);
        assert_eq!(line.charged_unit_price, bdt(200));
        assert_eq!(line.unit_price, bdt(1000));
    }

    #[test]
    fn test_deposit_scales_with_quantity() {
        let store = preorder_with("1250", 3);
        let pricing = calculate(
            store.effective_items(),
            Some(DeliveryArea::OutsideDhaka),
            PaymentMethod::Cod,
            Currency::BDT,
        )
        .unwrap();

        assert_eq!(pricing.subtotal, bdt(750));
        assert_eq!(pricing.delivery_charge, bdt(100));
        assert_eq!(pricing.grand_total, bdt(850));
    }

    #[test]
    fn test_deposit_rounds_on_line_total() {
        let policy = PricingPolicy::default();
        let mut store = LineItemStore::new(Currency::BDT);
        // 0.33 x 3 = 0.99; 20% = 0.198 -> 0.20
        store
            .set_preorder(PreorderRequest::new("p-1", "Pin", "0.33", 3))
            .unwrap();
        let contribution = policy.line_contribution(&store.effective_items()[0]).unwrap();
        assert_eq!(contribution.amount_minor, 20);
    }

    #[test]
    fn test_delivery_is_free_for_wallets() {
        let policy = PricingPolicy::default();
        for area in [None, Some(DeliveryArea::InsideDhaka), Some(DeliveryArea::OutsideDhaka)] {
            for payment in [PaymentMethod::Bkash, PaymentMethod::Nagad] {
                assert!(policy.delivery_charge(area, payment, Currency::BDT).is_zero());
            }
        }
    }

    #[test]
    fn test_cod_delivery_by_area() {
        let policy = PricingPolicy::default();
        assert_eq!(
            policy.delivery_charge(Some(DeliveryArea::InsideDhaka), PaymentMethod::Cod, Currency::BDT),
            bdt(60)
        );
        assert_eq!(
            policy.delivery_charge(Some(DeliveryArea::OutsideDhaka), PaymentMethod::Cod, Currency::BDT),
            bdt(100)
        );
        assert_eq!(
            policy.delivery_charge(None, PaymentMethod::Cod, Currency::BDT),
            bdt(100)
        );
    }

    #[test]
    fn test_custom_policy() {
        let policy = PricingPolicy {
            deposit_percent: 50,
            inside_dhaka_fee: 80,
            outside_dhaka_fee: 150,
        };
        let store = preorder_with("1000", 1);
        let pricing = policy
            .calculate(
                store.effective_items(),
                Some(DeliveryArea::InsideDhaka),
                PaymentMethod::Cod,
                Currency::BDT,
            )
            .unwrap();
        assert_eq!(pricing.grand_total, bdt(580));
    }

    #[test]
    fn test_invalid_policy_rejected() {
        let store = preorder_with("1000", 1);
        let policy = PricingPolicy {
            deposit_percent: -50,
            inside_dhaka_fee: -60,
            outside_dhaka_fee: 100,
        };

        let err = policy
            .calculate(
                store.effective_items(),
                Some(DeliveryArea::InsideDhaka),
                PaymentMethod::Cod,
                Currency::BDT,
            )
            .unwrap_err();
        assert!(matches!(err, CommerceError::InvalidPricingPolicy(_)));

        let fee_only = PricingPolicy {
            outside_dhaka_fee: -1,
            ..PricingPolicy::default()
        };
        assert!(fee_only.validate().is_err());
        assert!(PricingPolicy { deposit_percent: 101, ..PricingPolicy::default() }
            .validate()
            .is_err());
        assert!(PricingPolicy { deposit_percent: 100, ..PricingPolicy::default() }
            .validate()
            .is_ok());
    }

    #[test]
    fn test_charged_unit_price_rounds_per_unit() {
        let store = preorder_with("3.33", 3);
        let pricing = calculate(
            store.effective_items(),
            None,
            PaymentMethod::Bkash,
            Currency::BDT,
        )
        .unwrap();

        let line = &pricing.lines[0];
        assert_eq!(line.charged_unit_price.amount_minor, 67);
        assert_eq!(line.contribution.amount_minor, 200);
        assert_eq!(pricing.subtotal, line.contribution);
    }

    #[test]
    fn test_empty_items() {
        let pricing = calculate(&[], None, PaymentMethod::Nagad, Currency::BDT).unwrap();
        assert!(pricing.subtotal.is_zero());
        assert!(pricing.grand_total.is_zero());
    }

    #[test]
    fn test_enum_wire_names() {
        assert_eq!(
            serde_json::to_string(&DeliveryArea::InsideDhaka).unwrap(),
            r#""inside_dhaka""#
        );
        assert_eq!(serde_json::to_string(&PaymentMethod::Bkash).unwrap(), r#""bkash""#);
        assert_eq!("outside-dhaka".parse::<DeliveryArea>().unwrap(), DeliveryArea::OutsideDhaka);
        assert_eq!("NAGAD".parse::<PaymentMethod>().unwrap(), PaymentMethod::Nagad);
        assert!("card".parse::<PaymentMethod>().is_err());
    }
}
