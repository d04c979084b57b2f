//! Line item store.
//!
//! Holds the shopping cart and, separately, at most one preorder item.
//! Mutations go through methods on [`LineItemStore`] or, reducer-style,
//! through [`StoreAction`] values.

mod line_item;
#[cfg(feature = "storage")]
mod repository;
mod state;

pub use line_item::{AddItem, LineItem, PreorderRequest, MAX_QUANTITY_PER_ITEM};
#[cfg(feature = "storage")]
pub use repository::StoreRepository;
pub use state::{reduce, LineItemStore, StoreAction};
