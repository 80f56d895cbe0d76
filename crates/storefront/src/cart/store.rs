//! The cart store: line items, shipping selection and derived totals.

use std::sync::Arc;

use imprenta_core::{CartItemId, Product};
use rust_decimal::Decimal;
use tokio::sync::watch;

use super::CartError;
use super::shipping::{self, ShippingOption};
use super::storage::StorageProvider;
use crate::models::cart::{self as totals, CartLineItem, CartSnapshot, CartSummary};
use crate::services::notifications::Notifier;

/// Storage key under which the line items are persisted.
pub const DEFAULT_STORAGE_KEY: &str = "imprenta-avatar-cart";

/// Owns the cart state and is its only writer.
///
/// Every line-item mutation is persisted through the injected
/// [`StorageProvider`] and published to [`CartStore::subscribe`] receivers.
/// Totals are recomputed from the items on every read.
pub struct CartStore {
    items: Vec<CartLineItem>,
    selected_shipping: Option<ShippingOption>,
    is_loading: bool,
    storage: Arc<dyn StorageProvider>,
    storage_key: String,
    notifier: Arc<dyn Notifier>,
    updates: watch::Sender<CartSnapshot>,
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("items", &self.items.len())
            .field("selected_shipping", &self.selected_shipping.as_ref().map(|s| &s.id))
            .field("is_loading", &self.is_loading)
            .field("storage_key", &self.storage_key)
            .finish_non_exhaustive()
    }
}

impl CartStore {
    /// Open the cart persisted under [`DEFAULT_STORAGE_KEY`].
    #[must_use]
    pub fn new(storage: Arc<dyn StorageProvider>, notifier: Arc<dyn Notifier>) -> Self {
        Self::with_key(storage, notifier, DEFAULT_STORAGE_KEY)
    }

    /// Open the cart persisted under `storage_key`.
    ///
    /// A missing or unreadable snapshot yields an empty cart.
    #[must_use]
    pub fn with_key(
        storage: Arc<dyn StorageProvider>,
        notifier: Arc<dyn Notifier>,
        storage_key: impl Into<String>,
    ) -> Self {
        let storage_key = storage_key.into();
        let items = load_items(storage.as_ref(), &storage_key);
        let (updates, _) = watch::channel(CartSnapshot::capture(&items, None, false));

        tracing::info!(key = %storage_key, items = items.len(), "Cart store initialized");

        Self {
            items,
            selected_shipping: None,
            is_loading: false,
            storage,
            storage_key,
            notifier,
            updates,
        }
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Add `quantity` units of `product`.
    ///
    /// An existing line for the product is bumped through
    /// [`update_quantity`](Self::update_quantity) and so clamped to stock; a
    /// new line takes the requested quantity as-is.
    pub fn add_item(&mut self, product: &Product, quantity: u32) {
        self.set_loading(true);

        let existing = self
            .items
            .iter()
            .find(|item| item.product_id() == product.id)
            .map(|item| (item.id().clone(), item.quantity()));

        if let Some((item_id, current)) = existing {
            self.update_quantity(&item_id, i64::from(current) + i64::from(quantity));
        } else {
            match CartLineItem::new(product, quantity).and_then(|item| self.push_checked(item)) {
                Ok(()) => {
                    self.commit();
                    self.notifier.success(
                        "Added to cart",
                        &format!("{} was added to the cart", product.name),
                    );
                }
                Err(e) => {
                    tracing::error!(error = %e, product_id = %product.id, "Failed to add item to cart");
                    self.notifier
                        .error("Error", "The product could not be added to the cart");
                }
            }
        }

        self.set_loading(false);
    }

    /// Add a single unit of `product`.
    pub fn add_one(&mut self, product: &Product) {
        self.add_item(product, 1);
    }

    /// Set the quantity of a line.
    ///
    /// Non-positive quantities remove the line. Positive ones are clamped to
    /// the product's stock; a product with no stock left is removed. Unknown
    /// ids are ignored. A quantity whose totals would not fit is refused with
    /// an error notification.
    pub fn update_quantity(&mut self, item_id: &CartItemId, quantity: i64) {
        if quantity <= 0 {
            self.remove_item(item_id);
            return;
        }

        let Some(index) = self.items.iter().position(|item| item.id() == item_id) else {
            tracing::debug!(item_id = %item_id, "Quantity update for unknown cart item");
            return;
        };
        let Some(item) = self.items.get_mut(index) else {
            return;
        };

        let requested = u32::try_from(quantity).unwrap_or(u32::MAX);
        let clamped = requested.min(item.stock());
        let previous = item.quantity();
        if clamped == 0 {
            self.remove_item(item_id);
            return;
        }
        if clamped == previous {
            return;
        }

        item.set_quantity(clamped);
        if let Err(e) = totals::check_totals(&self.items) {
            if let Some(item) = self.items.get_mut(index) {
                item.set_quantity(previous);
            }
            tracing::error!(error = %e, item_id = %item_id, "Refused cart quantity update");
            self.notifier
                .error("Error", "The quantity could not be updated");
            return;
        }

        self.commit();
    }

    /// Remove a line. Unknown ids are ignored silently.
    pub fn remove_item(&mut self, item_id: &CartItemId) {
        let Some(index) = self.items.iter().position(|item| item.id() == item_id) else {
            return;
        };

        let removed = self.items.remove(index);
        self.commit();
        self.notifier.info(
            "Product removed",
            &format!("{} was removed from the cart", removed.product().name),
        );
    }

    /// Remove every line and drop the persisted snapshot.
    pub fn clear_cart(&mut self) {
        self.items.clear();
        if let Err(e) = self.storage.remove(&self.storage_key) {
            tracing::error!(error = %e, key = %self.storage_key, "Failed to remove cart from storage");
        }
        self.publish();
        self.notifier
            .info("Cart emptied", "All products were removed from the cart");
    }

    /// Select a shipping option by id; unknown ids clear the selection.
    pub fn select_shipping(&mut self, shipping_id: &str) {
        self.selected_shipping = shipping::find_shipping_option(shipping_id).cloned();
        if self.selected_shipping.is_none() {
            tracing::debug!(shipping_id, "Unknown shipping option, selection cleared");
        }
        self.publish();
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Line items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    /// Look up a line by id.
    #[must_use]
    pub fn item(&self, item_id: &CartItemId) -> Option<&CartLineItem> {
        self.items.iter().find(|item| item.id() == item_id)
    }

    #[must_use]
    pub const fn selected_shipping(&self) -> Option<&ShippingOption> {
        self.selected_shipping.as_ref()
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// The static shipping table.
    #[must_use]
    pub fn shipping_options(&self) -> &'static [ShippingOption] {
        shipping::shipping_options()
    }

    #[must_use]
    pub fn total_items(&self) -> u32 {
        totals::total_items(&self.items)
    }

    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        totals::subtotal(&self.items)
    }

    #[must_use]
    pub fn shipping(&self) -> Decimal {
        totals::shipping_cost(self.selected_shipping.as_ref(), self.subtotal())
    }

    #[must_use]
    pub fn tax(&self) -> Decimal {
        totals::tax(self.subtotal())
    }

    #[must_use]
    pub const fn discount(&self) -> Decimal {
        totals::discount()
    }

    #[must_use]
    pub fn total(&self) -> Decimal {
        self.summary().total
    }

    #[must_use]
    pub fn summary(&self) -> CartSummary {
        CartSummary::compute(&self.items, self.selected_shipping.as_ref())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Immutable copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> CartSnapshot {
        CartSnapshot::capture(&self.items, self.selected_shipping.as_ref(), self.is_loading)
    }

    /// Receive a fresh snapshot after every change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CartSnapshot> {
        self.updates.subscribe()
    }

    /// Notifier used for cart feedback, shared with components.
    #[must_use]
    pub fn notifier(&self) -> Arc<dyn Notifier> {
        Arc::clone(&self.notifier)
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    /// Append a line unless the cart totals would stop fitting.
    fn push_checked(&mut self, item: CartLineItem) -> Result<(), CartError> {
        self.items.push(item);
        if let Err(e) = totals::check_totals(&self.items) {
            self.items.pop();
            return Err(e);
        }
        Ok(())
    }

    fn set_loading(&mut self, loading: bool) {
        self.is_loading = loading;
        self.publish();
    }

    /// Persist the line items and notify observers.
    fn commit(&self) {
        if let Err(e) = self.persist() {
            tracing::error!(error = %e, key = %self.storage_key, "Failed to save cart to storage");
        }
        self.publish();
    }

    fn persist(&self) -> Result<(), CartError> {
        let encoded = serde_json::to_string(&self.items)?;
        self.storage.set(&self.storage_key, &encoded)?;
        Ok(())
    }

    fn publish(&self) {
        self.updates.send_replace(self.snapshot());
    }
}

fn load_items(storage: &dyn StorageProvider, key: &str) -> Vec<CartLineItem> {
    let raw = match storage.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            tracing::warn!(error = %e, key, "Failed to read cart from storage");
            return Vec::new();
        }
    };

    match serde_json::from_str::<Vec<CartLineItem>>(&raw) {
        Ok(items) => {
            let items: Vec<CartLineItem> =
                items.into_iter().filter(|item| item.quantity() > 0).collect();
            match totals::check_totals(&items) {
                Ok(()) => items,
                Err(e) => {
                    tracing::warn!(error = %e, key, "Discarding cart snapshot with unrepresentable totals");
                    Vec::new()
                }
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, key, "Discarding unreadable cart snapshot");
            Vec::new()
        }
    }
}
