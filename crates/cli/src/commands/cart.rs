//! Cart commands against the storefront's persisted cart.
//!
//! The CLI reads `CART_STORAGE_PATH` and `CART_STORAGE_KEY` the same way the
//! server does, so both see the same cart. Run it while the server is
//! stopped; the storage file is not locked.

use std::sync::Arc;

use imprenta_core::{CartItemId, Price, Product, ProductId};
use imprenta_storefront::cart::{CartStore, FileStorage};
use imprenta_storefront::components::UiDelays;
use imprenta_storefront::config::StorefrontConfig;
use imprenta_storefront::pages::{CartPage, ClearOutcome};
use imprenta_storefront::services::notifications::{NotificationCenter, PresetAnswer};
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::info;

/// Errors reported back to the terminal.
#[derive(Debug, Error)]
pub enum CartCommandError {
    #[error("No cart item with id {0}")]
    UnknownItem(String),

    #[error("Refusing to empty the cart without --yes")]
    NotConfirmed,
}

/// The persisted cart opened for one command.
pub struct CartSession {
    page: CartPage,
}

impl CartSession {
    /// Open the cart configured in the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the environment holds invalid values.
    pub fn open() -> Result<Self, Box<dyn std::error::Error>> {
        let config = StorefrontConfig::from_env()?;
        info!(path = %config.storage_path.display(), "Opening cart storage");

        let storage = Arc::new(FileStorage::new(&config.storage_path));
        let notifications = Arc::new(NotificationCenter::new());
        let store = CartStore::with_key(storage, notifications, config.storage_key);

        // No UI to animate from a terminal.
        Ok(Self {
            page: CartPage::new(store, UiDelays::none()),
        })
    }

    /// Print line items and totals.
    pub fn show(&mut self, shipping: Option<&str>) {
        if let Some(shipping_id) = shipping {
            self.page.on_shipping_selected(shipping_id);
        }

        let store = self.page.store();
        if store.is_empty() {
            info!("{}", self.page.empty_message());
            return;
        }

        for item in store.items() {
            info!(
                id = %item.id(),
                product = %item.product().name,
                quantity = item.quantity(),
                stock = item.stock(),
                "{} x {} = {}",
                item.quantity(),
                Price::clp(item.price()).display(),
                Price::clp(item.line_total()).display()
            );
        }

        let summary = store.summary();
        info!("Items:    {}", store.total_items());
        info!("Subtotal: {}", Price::clp(summary.subtotal).display());
        info!("Shipping: {}", Price::clp(summary.shipping).display());
        info!("IVA:      {}", Price::clp(summary.tax).display());
        info!("Total:    {}", summary.total_display());

        let panel = self.page.summary_panel();
        let hint = panel.free_shipping_text();
        if !hint.is_empty() {
            info!("{hint}");
        }
    }

    /// Add `quantity` units of a product described on the command line.
    pub fn add(&mut self, product_id: i32, name: &str, price: Decimal, stock: u32, quantity: u32) {
        let product = Product::new(ProductId::new(product_id), name, price, stock);
        self.page.store_mut().add_item(&product, quantity);
        info!(items = self.page.store().total_items(), "Cart updated");
    }

    /// Set the quantity of a line. Zero or less removes it.
    ///
    /// # Errors
    ///
    /// Returns an error if no line has `item_id`.
    pub fn set(&mut self, item_id: &str, quantity: i64) -> Result<(), CartCommandError> {
        let item_id = self.known_item(item_id)?;
        self.page.on_quantity_changed(&item_id, quantity);

        match self.page.store().item(&item_id) {
            Some(item) => info!(id = %item_id, quantity = item.quantity(), "Quantity set"),
            None => info!(id = %item_id, "Item removed"),
        }
        Ok(())
    }

    /// Remove a line.
    ///
    /// # Errors
    ///
    /// Returns an error if no line has `item_id`.
    pub fn remove(&mut self, item_id: &str) -> Result<(), CartCommandError> {
        let item_id = self.known_item(item_id)?;
        self.page.on_item_removed(&item_id);
        info!(id = %item_id, "Item removed");
        Ok(())
    }

    /// Empty the cart. `yes` stands in for the confirmation dialog.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart has items and `yes` is false.
    pub async fn clear(&mut self, yes: bool) -> Result<(), CartCommandError> {
        match self.page.clear_cart(&PresetAnswer(yes)).await {
            ClearOutcome::AlreadyEmpty => Ok(()),
            ClearOutcome::Cancelled => Err(CartCommandError::NotConfirmed),
            ClearOutcome::Cleared { removed } => {
                info!(removed, "Cart emptied");
                Ok(())
            }
        }
    }

    fn known_item(&self, item_id: &str) -> Result<CartItemId, CartCommandError> {
        let item_id = CartItemId::from(item_id);
        if self.page.store().item(&item_id).is_some() {
            Ok(item_id)
        } else {
            Err(CartCommandError::UnknownItem(item_id.to_string()))
        }
    }
}
