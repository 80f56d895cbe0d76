//! Integration tests for the Imprenta storefront.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p imprenta-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_flow` - Cart store, page controller and badge working together
//! - `slider_admin` - Slider service, carousel and admin page
//! - `http_api` - JSON routes driven through the axum router
//!
//! Everything runs in-process. No server or external service is needed.

use std::path::Path;
use std::sync::Arc;

use imprenta_core::{Product, ProductId};
use imprenta_storefront::cart::{CartStore, FileStorage, MemoryStorage, StorageProvider};
use imprenta_storefront::components::UiDelays;
use imprenta_storefront::config::StorefrontConfig;
use imprenta_storefront::pages::CartPage;
use imprenta_storefront::services::notifications::NotificationCenter;
use rust_decimal::Decimal;

/// Cart page over in-memory storage, plus the notification center it reports to.
#[must_use]
pub fn memory_cart(delays: UiDelays) -> (CartPage, Arc<NotificationCenter>) {
    cart_over(Arc::new(MemoryStorage::new()), delays)
}

/// Cart page persisted to the storage file at `path`.
#[must_use]
pub fn file_cart(path: &Path) -> (CartPage, Arc<NotificationCenter>) {
    cart_over(Arc::new(FileStorage::new(path)), UiDelays::none())
}

/// Cart page over an arbitrary storage provider.
#[must_use]
pub fn cart_over(
    storage: Arc<dyn StorageProvider>,
    delays: UiDelays,
) -> (CartPage, Arc<NotificationCenter>) {
    let center = Arc::new(NotificationCenter::new());
    let store = CartStore::new(storage, center.clone());
    (CartPage::new(store, delays), center)
}

/// Catalog product with a whole-peso price.
#[must_use]
pub fn product(id: i32, price: i64, stock: u32) -> Product {
    Product::new(
        ProductId::new(id),
        format!("Producto {id}"),
        Decimal::new(price, 0),
        stock,
    )
}

/// Configuration with every UI delay and the slider latency switched off.
///
/// # Panics
///
/// Panics if the built-in test values fail to parse.
#[must_use]
pub fn instant_config() -> StorefrontConfig {
    StorefrontConfig::from_lookup(|key| match key {
        "CART_QUANTITY_DELAY_MS"
        | "CART_REMOVE_DELAY_MS"
        | "CART_CLEAR_DELAY_MS"
        | "CART_CHECKOUT_NOTICE_DELAY_MS" => Some("0".to_string()),
        "SLIDER_SIMULATE_LATENCY" => Some("false".to_string()),
        _ => None,
    })
    .expect("test configuration parses")
}
