//! Type-safe key-value persistence for the Bazaar storefront.
//!
//! Values are stored as JSON, either in memory or as one file per key in a
//! directory. Sessions layer a version counter on top.
//!
//! # Example
//!
//! ```rust
//! use bazaar_cache::Cache;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct Wishlist {
//!     product_ids: Vec<String>,
//! }
//!
//! let cache = Cache::in_memory();
//! let list = Wishlist { product_ids: vec!["p-1".into()] };
//!
//! cache.set("wishlist:sess_abc", &list).unwrap();
//! let loaded: Option<Wishlist> = cache.get("wishlist:sess_abc").unwrap();
//! assert_eq!(loaded, Some(list));
//!
//! cache.delete("wishlist:sess_abc").unwrap();
//! ```

mod error;
mod kv;
mod session;

pub use error::CacheError;
pub use kv::Cache;
pub use session::{SessionData, SessionId, SessionStore};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{Cache, CacheError, SessionData, SessionId, SessionStore};
}
