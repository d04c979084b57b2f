//! Observability for the Bazaar storefront.
//!
//! This crate provides:
//! - `StructuredLogger` - JSON or human log lines correlated by session
//! - `init_tracing` - installs the `tracing` subscriber used by the binaries

mod logging;
mod subscriber;

pub use logging::*;
pub use subscriber::*;
