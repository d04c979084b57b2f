//! Quantity stepper for the product detail page.

use serde::{Deserialize, Serialize};

/// Quantity picker bounded below by 1 and above by known stock.
///
/// Unknown stock counts as zero, so the count cannot be raised past 1 until
/// the catalog reports stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuantitySelector {
    count: i64,
    stock: i64,
}

impl QuantitySelector {
    pub fn new(stock: Option<i64>) -> Self {
        Self {
            count: 1,
            stock: stock.unwrap_or(0),
        }
    }

    pub fn count(&self) -> i64 {
        self.count
    }

    pub fn can_increment(&self) -> bool {
        self.count < self.stock
    }

    pub fn can_decrement(&self) -> bool {
        self.count > 1
    }

    /// Raise the count by one if stock allows. Returns the new count.
    pub fn increment(&mut self) -> i64 {
        if self.can_increment() {
            self.count += 1;
        }
        self.count
    }

    /// Lower the count by one, never below 1. Returns the new count.
    pub fn decrement(&mut self) -> i64 {
        if self.can_decrement() {
            self.count -= 1;
        }
        self.count
    }
}
