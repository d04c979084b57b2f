//! The line item store: the cart plus a single preorder slot.

use crate::catalog::{Product, ProductVariant};
use crate::error::CommerceError;
use crate::ids::LineItemId;
use crate::money::{Currency, Money};
use crate::store::line_item::{check_price, check_quantity, AddItem, LineItem, PreorderRequest};
use crate::store::MAX_QUANTITY_PER_ITEM;
use serde::{Deserialize, Serialize};

/// A mutation of the store.
#[derive(Debug, Clone)]
pub enum StoreAction {
    AddItem(AddItem),
    UpdateQuantity { line_id: LineItemId, quantity: i64 },
    RemoveItem(LineItemId),
    ClearCart,
    SetPreorder(PreorderRequest),
    ClearPreorder,
}

impl StoreAction {
    fn name(&self) -> &'static str {
        match self {
            StoreAction::AddItem(_) => "add_item",
            StoreAction::UpdateQuantity { .. } => "update_quantity",
            StoreAction::RemoveItem(_) => "remove_item",
            StoreAction::ClearCart => "clear_cart",
            StoreAction::SetPreorder(_) => "set_preorder",
            StoreAction::ClearPreorder => "clear_preorder",
        }
    }
}

/// Cart contents and the active preorder item.
///
/// The cart keeps insertion order. When a preorder item is present it is the
/// only thing checked out; the cart is left as is.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LineItemStore {
    /// Currency every line is priced in.
    pub currency: Currency,
    cart: Vec<LineItem>,
    preorder: Option<LineItem>,
    /// Incremented on every successful mutation.
    revision: u64,
}

impl LineItemStore {
    /// Create an empty store.
    pub fn new(currency: Currency) -> Self {
        Self {
            currency,
            ..Self::default()
        }
    }

    pub fn cart(&self) -> &[LineItem] {
        &self.cart
    }

    pub fn preorder(&self) -> Option<&LineItem> {
        self.preorder.as_ref()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Items in scope for checkout: the preorder item alone if present, else the cart.
    pub fn effective_items(&self) -> &[LineItem] {
        match &self.preorder {
            Some(item) => std::slice::from_ref(item),
            None => &self.cart,
        }
    }

    /// Whether checkout is for the preorder item.
    pub fn is_preorder_checkout(&self) -> bool {
        self.preorder.is_some()
    }

    /// Total units in the cart.
    pub fn item_count(&self) -> i64 {
        self.cart.iter().map(|i| i.quantity).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.cart.is_empty() && self.preorder.is_none()
    }

    /// Find a cart line.
    pub fn line(&self, line_id: &LineItemId) -> Option<&LineItem> {
        self.cart.iter().find(|i| &i.id == line_id)
    }

    /// Add to the cart, merging with a line for the same product and variant.
    ///
    /// Returns the ID of the line that now holds the item.
    pub fn add_item(&mut self, item: AddItem) -> Result<LineItemId, CommerceError> {
        check_quantity(item.quantity)?;
        check_price(&item.unit_price, self.currency)?;

        if let Some(existing) = self
            .cart
            .iter_mut()
            .find(|i| i.matches(&item.product_id, item.variant_id.as_ref()))
        {
            let new_quantity = existing
                .quantity
                .checked_add(item.quantity)
                .ok_or(CommerceError::Overflow)?;
            if new_quantity > MAX_QUANTITY_PER_ITEM {
                return Err(CommerceError::QuantityExceedsLimit(
                    new_quantity,
                    MAX_QUANTITY_PER_ITEM,
                ));
            }

            existing.quantity = new_quantity;
            let id = existing.id.clone();
            self.touch("add_item");
            return Ok(id);
        }

        let line = item.into_line_item();
        let id = line.id.clone();
        self.cart.push(line);
        self.touch("add_item");
        Ok(id)
    }

    /// Add a catalog product to the cart.
    ///
    /// Preorder-only products are refused; they go through [`set_preorder`](Self::set_preorder).
    /// When the catalog reports stock, the combined quantity may not exceed it.
    pub fn add_product(
        &mut self,
        product: &Product,
        variant: Option<&ProductVariant>,
        quantity: i64,
    ) -> Result<LineItemId, CommerceError> {
        if product.preorder_only {
            return Err(CommerceError::PreorderOnly(product.id.to_string()));
        }
        check_quantity(quantity)?;

        if let Some(available) = product.available_stock(variant) {
            let in_cart = self
                .cart
                .iter()
                .find(|i| i.matches(&product.id, variant.map(|v| &v.id)))
                .map_or(0, |i| i.quantity);
            let requested = in_cart.saturating_add(quantity);
            if requested > available {
                return Err(CommerceError::InsufficientInventory {
                    product_id: product.id.to_string(),
                    requested,
                    available,
                });
            }
        }

        let mut item = AddItem::new(product.id.clone(), product.name.clone(), product.unit_price(variant))
            .image(product.primary_image())
            .quantity(quantity);
        if let Some(v) = variant {
            item = item.variant(v.id.clone(), v.name.clone());
        }
        self.add_item(item)
    }

    /// Set a cart line's quantity. A quantity of zero or less removes the line.
    pub fn update_quantity(
        &mut self,
        line_id: &LineItemId,
        quantity: i64,
    ) -> Result<(), CommerceError> {
        if quantity <= 0 {
            return self.remove_item(line_id).map(|_| ());
        }
        if quantity > MAX_QUANTITY_PER_ITEM {
            return Err(CommerceError::QuantityExceedsLimit(
                quantity,
                MAX_QUANTITY_PER_ITEM,
            ));
        }

        let line = self
            .cart
            .iter_mut()
            .find(|i| &i.id == line_id)
            .ok_or_else(|| CommerceError::ItemNotInCart(line_id.to_string()))?;
        line.quantity = quantity;
        self.touch("update_quantity");
        Ok(())
    }

    /// Remove a cart line, returning it.
    pub fn remove_item(&mut self, line_id: &LineItemId) -> Result<LineItem, CommerceError> {
        let index = self
            .cart
            .iter()
            .position(|i| &i.id == line_id)
            .ok_or_else(|| CommerceError::ItemNotInCart(line_id.to_string()))?;
        let line = self.cart.remove(index);
        self.touch("remove_item");
        Ok(line)
    }

    /// Empty the cart.
    pub fn clear_cart(&mut self) {
        self.cart.clear();
        self.touch("clear_cart");
    }

    /// Replace the preorder slot.
    pub fn set_preorder(&mut self, request: PreorderRequest) -> Result<&LineItem, CommerceError> {
        let item = request.into_line_item(self.currency)?;
        self.touch("set_preorder");
        Ok(self.preorder.insert(item))
    }

    /// Empty the preorder slot.
    pub fn clear_preorder(&mut self) {
        self.preorder = None;
        self.touch("clear_preorder");
    }

    /// Full price of the effective items, ignoring deposits.
    pub fn full_value(&self) -> Result<Money, CommerceError> {
        self.effective_items()
            .iter()
            .try_fold(Money::zero(self.currency), |acc, i| acc.try_add(&i.full_total()?))
    }

    /// Apply an action in place. On error the store is unchanged.
    pub fn apply(&mut self, action: StoreAction) -> Result<(), CommerceError> {
        let name = action.name();
        let result = match action {
            StoreAction::AddItem(item) => self.add_item(item).map(|_| ()),
            StoreAction::UpdateQuantity { line_id, quantity } => {
                self.update_quantity(&line_id, quantity)
            }
            StoreAction::RemoveItem(line_id) => self.remove_item(&line_id).map(|_| ()),
            StoreAction::ClearCart => {
                self.clear_cart();
                Ok(())
            }
            StoreAction::SetPreorder(request) => self.set_preorder(request).map(|_| ()),
            StoreAction::ClearPreorder => {
                self.clear_preorder();
                Ok(())
            }
        };
        if let Err(e) = &result {
            tracing::debug!(action = name, error = %e, "store action rejected");
        }
        result
    }

    fn touch(&mut self, action: &'static str) {
        self.revision = self.revision.wrapping_add(1);
        tracing::debug!(
            action,
            revision = self.revision,
            cart_lines = self.cart.len(),
            preorder = self.preorder.is_some(),
            "store updated"
        );
    }
}

/// Pure transition: the store after `action`, leaving `store` untouched.
pub fn reduce(store: &LineItemStore, action: StoreAction) -> Result<LineItemStore, CommerceError> {
    let mut next = store.clone();
    next.apply(action)?;
    Ok(next)
}
