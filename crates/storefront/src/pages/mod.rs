//! Page controllers.
//!
//! A page owns the state its components read and applies their intents.
//!
//! - [`cart`] - The cart page: item rows, summary, checkout and clearing
//! - [`slider_admin`] - Slider image management for administrators

pub mod cart;
pub mod slider_admin;

use std::sync::{Mutex, PoisonError};

pub use cart::{CartPage, CheckoutOutcome, ClearOutcome};
pub use slider_admin::SliderAdminPage;

/// Path of the product catalog.
pub const CATALOG_PATH: &str = "/products";

/// Client-side navigation.
pub trait Navigator: Send + Sync {
    fn navigate(&self, path: &str);
}

/// Navigator that records the requested paths.
///
/// The HTTP surface answers with the last path so the browser can follow it.
#[derive(Debug, Default)]
pub struct NavigationLog {
    paths: Mutex<Vec<String>>,
}

impl NavigationLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recently requested path.
    #[must_use]
    pub fn last(&self) -> Option<String> {
        self.paths
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }
}

impl Navigator for NavigationLog {
    fn navigate(&self, path: &str) {
        tracing::debug!(path, "Navigation requested");
        self.paths
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(path.to_string());
    }
}
