//! Page routes and the navigation and notification sinks.
//!
//! Both sinks belong to whatever front end drives the storefront (a browser
//! shell, the CLI, a test). The domain only says *where* to go and *what* to
//! tell the shopper.

use crate::ids::ProductId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Storefront pages.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Route {
    Home,
    Products,
    Product(ProductId),
    Checkout,
    OrderConfirmation,
}

impl Route {
    /// URL path for the page.
    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Products => "/allProduct".to_string(),
            Route::Product(id) => format!("/products/{id}"),
            Route::Checkout => "/checkout".to_string(),
            Route::OrderConfirmation => "/order-confirmation".to_string(),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Moves the shopper between pages.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

/// Shows short success/error messages (toasts).
pub trait Notifier: Send + Sync {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
}

/// Notifier that only writes to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn success(&self, message: &str) {
        tracing::info!(target: "bazaar::notify", "{message}");
    }

    fn error(&self, message: &str) {
        tracing::warn!(target: "bazaar::notify", "{message}");
    }
}
