//! Money type for representing monetary values.
//!
//! Amounts are fixed-point integers in the currency's minor unit (poisha for
//! BDT), so repeated additions never drift the way floating-point totals do.
//! All arithmetic is checked.

use crate::error::CommerceError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Currency {
    /// Bangladeshi taka, the storefront's home currency.
    #[default]
    BDT,
    USD,
    EUR,
    GBP,
    INR,
}

impl Currency {
    /// Get the currency code (e.g., "BDT").
    pub fn code(&self) -> &'static str {
        match self {
            Currency::BDT => "BDT",
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::INR => "INR",
        }
    }

    /// Get the currency symbol (e.g., "৳").
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::BDT => "\u{09f3}",
            Currency::USD => "$",
            Currency::EUR => "\u{20ac}",
            Currency::GBP => "\u{00a3}",
            Currency::INR => "\u{20b9}",
        }
    }

    /// Number of minor-unit digits.
    pub fn decimal_places(&self) -> u32 {
        2
    }

    /// Minor units per major unit.
    pub fn minor_per_major(&self) -> i64 {
        10_i64.pow(self.decimal_places())
    }

    /// Parse a currency code string.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_uppercase().as_str() {
            "BDT" | "TK" => Some(Currency::BDT),
            "USD" => Some(Currency::USD),
            "EUR" => Some(Currency::EUR),
            "GBP" => Some(Currency::GBP),
            "INR" => Some(Currency::INR),
            _ => None,
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A monetary value with currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Money {
    /// Amount in the currency's minor unit.
    pub amount_minor: i64,
    /// The currency.
    pub currency: Currency,
}

impl Money {
    /// Create a value from minor units.
    pub fn new(amount_minor: i64, currency: Currency) -> Self {
        Self {
            amount_minor,
            currency,
        }
    }

    /// Create a value from whole major units (e.g., taka).
    ///
    /// ```
    /// use bazaar_commerce::money::{Currency, Money};
    /// assert_eq!(Money::from_major(60, Currency::BDT).amount_minor, 6000);
    /// ```
    pub fn from_major(amount: i64, currency: Currency) -> Self {
        Self::new(amount.saturating_mul(currency.minor_per_major()), currency)
    }

    /// Create a zero amount in the given currency.
    pub fn zero(currency: Currency) -> Self {
        Self::new(0, currency)
    }

    pub fn is_zero(&self) -> bool {
        self.amount_minor == 0
    }

    pub fn is_negative(&self) -> bool {
        self.amount_minor < 0
    }

    /// Parse a decimal string such as `"1250"`, `"1,250.50"` or `" 99.9 "`.
    ///
    /// Digits beyond the currency's precision are rounded half-up.
    pub fn parse(text: &str, currency: Currency) -> Result<Money, CommerceError> {
        let invalid = || CommerceError::InvalidPrice(text.to_string());

        let cleaned: String = text.trim().chars().filter(|c| *c != ',').collect();
        let (negative, digits) = match cleaned.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, cleaned.as_str()),
        };

        let (whole, fraction) = match digits.split_once('.') {
            Some((w, f)) => (w, f),
            None => (digits, ""),
        };
        if whole.is_empty() && fraction.is_empty() {
            return Err(invalid());
        }
        if !whole.chars().chain(fraction.chars()).all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }

        let places = currency.decimal_places() as usize;
        let mut minor: i64 = 0;
        for c in whole.chars().chain(fraction.chars().chain(std::iter::repeat('0')).take(places)) {
            minor = minor
                .checked_mul(10)
                .and_then(|m| m.checked_add(i64::from(c as u8 - b'0')))
                .ok_or(CommerceError::Overflow)?;
        }
        if fraction.chars().nth(places).is_some_and(|c| c >= '5') {
            minor = minor.checked_add(1).ok_or(CommerceError::Overflow)?;
        }

        Ok(Money::new(if negative { -minor } else { minor }, currency))
    }

    /// Convert a JSON-style decimal number into money, rounding to the minor unit.
    pub fn from_decimal(amount: f64, currency: Currency) -> Result<Money, CommerceError> {
        if !amount.is_finite() {
            return Err(CommerceError::InvalidPrice(amount.to_string()));
        }
        let scaled = (amount * currency.minor_per_major() as f64).round();
        if scaled.abs() >= i64::MAX as f64 {
            return Err(CommerceError::Overflow);
        }
        Ok(Money::new(scaled as i64, currency))
    }

    /// Convert to a decimal value for display or wire formats.
    pub fn to_decimal(&self) -> f64 {
        self.amount_minor as f64 / self.currency.minor_per_major() as f64
    }

    /// Format for display, e.g. `৳1,060` or `৳66.67`.
    pub fn display(&self) -> String {
        format!("{}{}", self.currency.symbol(), self.display_amount())
    }

    /// Format without the symbol, grouping thousands and omitting a zero fraction.
    pub fn display_amount(&self) -> String {
        let per_major = self.currency.minor_per_major();
        let abs = self.amount_minor.unsigned_abs();
        let whole = abs / per_major as u64;
        let fraction = abs % per_major as u64;

        let digits = whole.to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(c);
        }

        let sign = if self.amount_minor < 0 { "-" } else { "" };
        if fraction == 0 {
            format!("{sign}{grouped}")
        } else {
            let places = self.currency.decimal_places() as usize;
            format!("{sign}{grouped}.{fraction:0places$}")
        }
    }

    fn ensure_same_currency(&self, other: &Money) -> Result<(), CommerceError> {
        if self.currency == other.currency {
            Ok(())
        } else {
            Err(CommerceError::CurrencyMismatch {
                expected: self.currency.code().to_string(),
                got: other.currency.code().to_string(),
            })
        }
    }

    /// Add another value of the same currency.
    pub fn try_add(&self, other: &Money) -> Result<Money, CommerceError> {
        self.ensure_same_currency(other)?;
        self.amount_minor
            .checked_add(other.amount_minor)
            .map(|sum| Money::new(sum, self.currency))
            .ok_or(CommerceError::Overflow)
    }

    /// Subtract another value of the same currency.
    pub fn try_subtract(&self, other: &Money) -> Result<Money, CommerceError> {
        self.ensure_same_currency(other)?;
        self.amount_minor
            .checked_sub(other.amount_minor)
            .map(|diff| Money::new(diff, self.currency))
            .ok_or(CommerceError::Overflow)
    }

    /// Multiply by an integer factor such as a quantity.
    pub fn try_multiply(&self, factor: i64) -> Result<Money, CommerceError> {
        self.amount_minor
            .checked_mul(factor)
            .map(|product| Money::new(product, self.currency))
            .ok_or(CommerceError::Overflow)
    }

    /// Take a whole-number percentage of this amount, rounding half away from zero.
    pub fn percentage(&self, percent: i64) -> Result<Money, CommerceError> {
        let scaled = self
            .amount_minor
            .checked_mul(percent)
            .ok_or(CommerceError::Overflow)?;
        let half = if scaled < 0 { -50 } else { 50 };
        let rounded = scaled.checked_add(half).ok_or(CommerceError::Overflow)? / 100;
        Ok(Money::new(rounded, self.currency))
    }

    /// Sum values, starting from zero in `currency`.
    pub fn try_sum<'a>(
        iter: impl IntoIterator<Item = &'a Money>,
        currency: Currency,
    ) -> Result<Money, CommerceError> {
        iter.into_iter()
            .try_fold(Money::zero(currency), |acc, m| acc.try_add(m))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

/// Serde adapters for money fields carried as bare decimal amounts.
///
/// Outgoing amounts are JSON numbers (integers when there is no fraction).
/// Incoming amounts may be numbers or decimal strings; the catalog API sends
/// prices both ways. The currency is not on the wire, so decoding assumes
/// the storefront default.
pub mod amount {
    use super::{Currency, Money};
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    /// A price as it may appear on the wire.
    #[derive(Debug, Clone, Deserialize)]
    #[serde(untagged)]
    pub enum RawAmount {
        Integer(i64),
        Decimal(f64),
        Text(String),
        /// Already-typed money, in `Money`'s own serialized form.
        Exact(Money),
    }

    impl From<Money> for RawAmount {
        fn from(money: Money) -> Self {
            RawAmount::Exact(money)
        }
    }

    impl From<&str> for RawAmount {
        fn from(text: &str) -> Self {
            RawAmount::Text(text.to_string())
        }
    }

    impl RawAmount {
        /// Coerce into money in the given currency.
        pub fn into_money(self, currency: Currency) -> Result<Money, crate::CommerceError> {
            match self {
                RawAmount::Integer(n) => n
                    .checked_mul(currency.minor_per_major())
                    .map(|minor| Money::new(minor, currency))
                    .ok_or(crate::CommerceError::Overflow),
                RawAmount::Decimal(n) => Money::from_decimal(n, currency),
                RawAmount::Text(s) => Money::parse(&s, currency),
                RawAmount::Exact(m) if m.currency == currency => Ok(m),
                RawAmount::Exact(m) => Err(crate::CommerceError::CurrencyMismatch {
                    expected: currency.code().to_string(),
                    got: m.currency.code().to_string(),
                }),
            }
        }
    }

    pub fn serialize<S: Serializer>(money: &Money, serializer: S) -> Result<S::Ok, S::Error> {
        let per_major = money.currency.minor_per_major();
        if money.amount_minor % per_major == 0 {
            serializer.serialize_i64(money.amount_minor / per_major)
        } else {
            serializer.serialize_f64(money.to_decimal())
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Money, D::Error> {
        RawAmount::deserialize(deserializer)?
            .into_money(Currency::default())
            .map_err(D::Error::custom)
    }

    /// Optional variant of the adapter; `null`, missing and `""` decode to `None`.
    pub mod option {
        use super::RawAmount;
        use crate::money::{Currency, Money};
        use serde::de::Error as _;
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            money: &Option<Money>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match money {
                Some(m) => super::serialize(m, serializer),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<Money>, D::Error> {
            match Option::<RawAmount>::deserialize(deserializer)? {
                None => Ok(None),
                Some(RawAmount::Text(s)) if s.trim().is_empty() => Ok(None),
                Some(raw) => raw
                    .into_money(Currency::default())
                    .map(Some)
                    .map_err(D::Error::custom),
            }
        }
    }
}
