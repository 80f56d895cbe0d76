//! Cart page controller.

use std::sync::Arc;

use imprenta_core::CartItemId;
use serde::Serialize;
use tokio::sync::watch;

use super::{CATALOG_PATH, Navigator};
use crate::cart::CartStore;
use crate::components::{
    BusyFlag, CartBadge, CartItemControl, CartSummaryPanel, ItemIntent, SummaryIntent, UiDelays,
    pause,
};
use crate::services::notifications::{ConfirmPrompt, Confirmer, Notifier};

/// Result of [`CartPage::proceed_to_checkout`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum CheckoutOutcome {
    /// Nothing to pay for.
    EmptyCart,
    /// The customer may continue to payment.
    Ready { items: usize },
}

/// Result of [`CartPage::clear_cart`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum ClearOutcome {
    AlreadyEmpty,
    Cancelled,
    Cleared { removed: usize },
}

/// The cart page. Owns the [`CartStore`] and applies component intents.
pub struct CartPage {
    store: CartStore,
    notifier: Arc<dyn Notifier>,
    delays: UiDelays,
    clearing: watch::Sender<bool>,
}

impl std::fmt::Debug for CartPage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartPage")
            .field("store", &self.store)
            .field("delays", &self.delays)
            .field("clearing", &*self.clearing.borrow())
            .finish_non_exhaustive()
    }
}

impl CartPage {
    #[must_use]
    pub fn new(store: CartStore, delays: UiDelays) -> Self {
        tracing::info!(items = store.items().len(), "Cart page initialized");
        Self {
            notifier: store.notifier(),
            store,
            delays,
            clearing: watch::channel(false).0,
        }
    }

    #[must_use]
    pub const fn store(&self) -> &CartStore {
        &self.store
    }

    /// Direct store access for adding products from catalog pages.
    pub const fn store_mut(&mut self) -> &mut CartStore {
        &mut self.store
    }

    #[must_use]
    pub const fn delays(&self) -> UiDelays {
        self.delays
    }

    // =========================================================================
    // Components
    // =========================================================================

    /// Row controllers in display order.
    #[must_use]
    pub fn item_controls(&self) -> Vec<CartItemControl> {
        self.store
            .items()
            .iter()
            .map(|item| CartItemControl::new(item.clone(), Arc::clone(&self.notifier), self.delays))
            .collect()
    }

    /// Row controller for one line.
    #[must_use]
    pub fn item_control(&self, item_id: &CartItemId) -> Option<CartItemControl> {
        self.store
            .item(item_id)
            .map(|item| CartItemControl::new(item.clone(), Arc::clone(&self.notifier), self.delays))
    }

    #[must_use]
    pub fn summary_panel(&self) -> CartSummaryPanel {
        CartSummaryPanel::from_snapshot(&self.store.snapshot(), Arc::clone(&self.notifier))
    }

    #[must_use]
    pub fn badge(&self) -> CartBadge {
        CartBadge::from_snapshot(&self.store.snapshot())
    }

    // =========================================================================
    // Intents
    // =========================================================================

    pub fn on_quantity_changed(&mut self, item_id: &CartItemId, quantity: i64) {
        self.store.update_quantity(item_id, quantity);
    }

    pub fn on_item_removed(&mut self, item_id: &CartItemId) {
        self.store.remove_item(item_id);
    }

    pub fn on_shipping_selected(&mut self, shipping_id: &str) {
        self.store.select_shipping(shipping_id);
    }

    /// Apply an intent emitted by a cart row.
    pub fn apply(&mut self, intent: ItemIntent) {
        match intent {
            ItemIntent::QuantityChanged { item_id, quantity } => {
                self.on_quantity_changed(&item_id, quantity);
            }
            ItemIntent::Removed { item_id } => self.on_item_removed(&item_id),
        }
    }

    /// Apply an intent emitted by the summary panel.
    pub async fn apply_summary(&mut self, intent: SummaryIntent) -> Option<CheckoutOutcome> {
        match intent {
            SummaryIntent::ShippingSelected(shipping_id) => {
                self.on_shipping_selected(&shipping_id);
                None
            }
            SummaryIntent::CheckoutRequested => Some(self.proceed_to_checkout().await),
        }
    }

    // =========================================================================
    // Flows
    // =========================================================================

    /// Confirm the cart is ready for payment.
    ///
    /// The follow-up notice arrives after the checkout notice delay.
    pub async fn proceed_to_checkout(&mut self) -> CheckoutOutcome {
        if self.store.is_empty() {
            self.notifier.warning(
                "Empty cart",
                "Add products to the cart before continuing",
            );
            return CheckoutOutcome::EmptyCart;
        }

        let items = self.store.items().len();
        self.notifier
            .success("Ready to pay", "You will be redirected to the payment process");
        tracing::info!(items, total = %self.store.total(), "Proceeding to checkout");

        pause(self.delays.checkout_notice).await;
        self.notifier
            .info("Checkout", "The checkout page is under development");

        CheckoutOutcome::Ready { items }
    }

    /// Empty the cart after the customer confirms.
    pub async fn clear_cart<C: Confirmer>(&mut self, confirmer: &C) -> ClearOutcome {
        let count = self.store.items().len();
        if count == 0 {
            self.notifier
                .info("Empty cart", "There are no products to remove");
            return ClearOutcome::AlreadyEmpty;
        }

        let prompt = ConfirmPrompt::new(
            "Empty cart",
            format!("Are you sure you want to empty the cart? {count} products will be removed."),
        );
        if !confirmer.confirm(&prompt).await {
            return ClearOutcome::Cancelled;
        }

        let _busy = BusyFlag::raise(&self.clearing);
        pause(self.delays.clear).await;
        self.store.clear_cart();
        ClearOutcome::Cleared { removed: count }
    }

    pub fn continue_shopping(&self, navigator: &dyn Navigator) {
        navigator.navigate(CATALOG_PATH);
    }

    // =========================================================================
    // Reads
    // =========================================================================

    #[must_use]
    pub fn is_clearing(&self) -> bool {
        *self.clearing.borrow()
    }

    #[must_use]
    pub fn watch_clearing(&self) -> watch::Receiver<bool> {
        self.clearing.subscribe()
    }

    #[must_use]
    pub fn has_items(&self) -> bool {
        !self.store.is_empty()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    #[must_use]
    pub const fn empty_message(&self) -> &'static str {
        "Your cart is empty. Explore our catalog and find amazing products!"
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use imprenta_core::{Product, ProductId};
    use rust_decimal::Decimal;

    use super::*;
    use crate::cart::MemoryStorage;
    use crate::pages::NavigationLog;
    use crate::services::notifications::{NotificationCenter, PresetAnswer, Severity};

    fn page(delays: UiDelays) -> (CartPage, Arc<NotificationCenter>) {
        let center = Arc::new(NotificationCenter::new());
        let store = CartStore::new(Arc::new(MemoryStorage::new()), center.clone());
        (CartPage::new(store, delays), center)
    }

    fn product(id: i32, price: i64, stock: u32) -> Product {
        Product::new(ProductId::new(id), format!("Product {id}"), Decimal::new(price, 0), stock)
    }

    #[tokio::test]
    async fn test_checkout_on_empty_cart_warns() {
        let (mut page, center) = page(UiDelays::none());

        assert_eq!(page.proceed_to_checkout().await, CheckoutOutcome::EmptyCart);

        let notes = center.drain();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].severity, Severity::Warning);
    }

    #[tokio::test(start_paused = true)]
    async fn test_checkout_sends_follow_up_notice_after_delay() {
        let (mut page, center) = page(UiDelays::default());
        page.store_mut().add_one(&product(1, 1000, 5));
        center.clear();
        let started = tokio::time::Instant::now();

        let outcome = page.proceed_to_checkout().await;

        assert_eq!(outcome, CheckoutOutcome::Ready { items: 1 });
        assert!(started.elapsed() >= Duration::from_millis(1000));
        let severities: Vec<Severity> = center.drain().iter().map(|n| n.severity).collect();
        assert_eq!(severities, [Severity::Success, Severity::Info]);
    }

    #[tokio::test]
    async fn test_clear_empty_cart_is_info_noop() {
        let (mut page, center) = page(UiDelays::none());

        let outcome = page.clear_cart(&PresetAnswer(true)).await;

        assert_eq!(outcome, ClearOutcome::AlreadyEmpty);
        assert_eq!(center.drain()[0].severity, Severity::Info);
    }

    #[tokio::test]
    async fn test_clear_cancelled_keeps_items() {
        let (mut page, _) = page(UiDelays::none());
        page.store_mut().add_one(&product(1, 1000, 5));

        assert_eq!(page.clear_cart(&PresetAnswer(false)).await, ClearOutcome::Cancelled);
        assert!(page.has_items());
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_confirmed_waits_then_empties() {
        let (mut page, _) = page(UiDelays::default());
        page.store_mut().add_one(&product(1, 1000, 5));
        page.store_mut().add_one(&product(2, 500, 5));
        let started = tokio::time::Instant::now();

        let outcome = page.clear_cart(&PresetAnswer(true)).await;

        assert_eq!(outcome, ClearOutcome::Cleared { removed: 2 });
        assert!(started.elapsed() >= Duration::from_millis(500));
        assert!(page.is_empty());
        assert!(!page.is_clearing());
    }

    #[tokio::test]
    async fn test_item_intents_reach_the_store() {
        let (mut page, _) = page(UiDelays::none());
        page.store_mut().add_item(&product(1, 1000, 5), 2);
        let row = page.item_controls().remove(0);

        if let Some(intent) = row.increase().await {
            page.apply(intent);
        }
        assert_eq!(page.store().items()[0].quantity(), 3);

        let intent = row.confirm_remove().await;
        page.apply(intent);
        assert!(page.is_empty());
    }

    #[tokio::test]
    async fn test_summary_intents() {
        let (mut page, _) = page(UiDelays::none());
        let intent = page.summary_panel().select_shipping("pickup");

        assert_eq!(page.apply_summary(intent).await, None);
        assert_eq!(page.store().selected_shipping().map(|s| s.id.as_str()), Some("pickup"));
    }

    #[test]
    fn test_continue_shopping_goes_to_catalog() {
        let (page, _) = page(UiDelays::none());
        let navigator = NavigationLog::new();

        page.continue_shopping(&navigator);

        assert_eq!(navigator.last().as_deref(), Some(CATALOG_PATH));
        assert!(page.empty_message().contains("catalog"));
    }
}
