//! Cart row: quantity stepper, removal and stock badge.

use std::sync::Arc;

use imprenta_core::{CartItemId, StockStatus};
use rust_decimal::Decimal;
use serde::Serialize;
use tokio::sync::watch;

use super::{BusyFlag, UiDelays, pause};
use crate::models::cart::CartLineItem;
use crate::services::notifications::Notifier;

/// What a cart row asks its page to do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ItemIntent {
    #[serde(rename_all = "camelCase")]
    QuantityChanged { item_id: CartItemId, quantity: i64 },
    #[serde(rename_all = "camelCase")]
    Removed { item_id: CartItemId },
}

/// Controller for one rendered cart line.
///
/// Holds a copy of the line; the page rebuilds the control after applying
/// an intent.
pub struct CartItemControl {
    item: CartLineItem,
    notifier: Arc<dyn Notifier>,
    delays: UiDelays,
    updating: watch::Sender<bool>,
    removing: watch::Sender<bool>,
}

impl std::fmt::Debug for CartItemControl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartItemControl")
            .field("item", self.item.id())
            .field("quantity", &self.item.quantity())
            .field("updating", &*self.updating.borrow())
            .field("removing", &*self.removing.borrow())
            .finish_non_exhaustive()
    }
}

impl CartItemControl {
    #[must_use]
    pub fn new(item: CartLineItem, notifier: Arc<dyn Notifier>, delays: UiDelays) -> Self {
        Self {
            item,
            notifier,
            delays,
            updating: watch::channel(false).0,
            removing: watch::channel(false).0,
        }
    }

    #[must_use]
    pub const fn item(&self) -> &CartLineItem {
        &self.item
    }

    /// Unit price times quantity.
    #[must_use]
    pub fn item_total(&self) -> Decimal {
        self.item.line_total()
    }

    #[must_use]
    pub const fn can_increase(&self) -> bool {
        self.item.quantity() < self.item.stock()
    }

    #[must_use]
    pub const fn can_decrease(&self) -> bool {
        self.item.quantity() > 1
    }

    #[must_use]
    pub const fn stock_badge(&self) -> StockStatus {
        StockStatus::from_stock(self.item.stock())
    }

    #[must_use]
    pub fn is_updating(&self) -> bool {
        *self.updating.borrow()
    }

    #[must_use]
    pub fn is_removing(&self) -> bool {
        *self.removing.borrow()
    }

    /// Observe the "updating" spinner flag.
    #[must_use]
    pub fn watch_updating(&self) -> watch::Receiver<bool> {
        self.updating.subscribe()
    }

    /// Observe the "removing" fade-out flag.
    #[must_use]
    pub fn watch_removing(&self) -> watch::Receiver<bool> {
        self.removing.subscribe()
    }

    /// Step the quantity up by one. Warns instead at the stock limit.
    pub async fn increase(&self) -> Option<ItemIntent> {
        if !self.can_increase() {
            self.notifier.warning(
                "Out of stock",
                "There is no stock available to increase the quantity",
            );
            return None;
        }
        self.update_quantity(i64::from(self.item.quantity()) + 1).await
    }

    /// Step the quantity down by one. At one unit the line is removed.
    pub async fn decrease(&self) -> Option<ItemIntent> {
        if !self.can_decrease() {
            return Some(self.confirm_remove().await);
        }
        self.update_quantity(i64::from(self.item.quantity()) - 1).await
    }

    /// Request a new quantity.
    ///
    /// Below one the line is removed. Above the stock a warning is shown and
    /// nothing is emitted.
    pub async fn update_quantity(&self, quantity: i64) -> Option<ItemIntent> {
        if quantity < 1 {
            return Some(self.confirm_remove().await);
        }

        let stock = self.item.stock();
        if quantity > i64::from(stock) {
            self.notifier.warning(
                "Insufficient stock",
                &format!("Only {stock} units available"),
            );
            return None;
        }

        let _busy = BusyFlag::raise(&self.updating);
        pause(self.delays.quantity).await;
        Some(ItemIntent::QuantityChanged {
            item_id: self.item.id().clone(),
            quantity,
        })
    }

    /// Remove the line after the removal animation delay.
    pub async fn confirm_remove(&self) -> ItemIntent {
        let _busy = BusyFlag::raise(&self.removing);
        pause(self.delays.remove).await;
        ItemIntent::Removed {
            item_id: self.item.id().clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use imprenta_core::{Product, ProductId};

    use super::*;
    use crate::services::notifications::{NotificationCenter, Severity};

    fn control(quantity: u32, stock: u32, delays: UiDelays) -> (CartItemControl, Arc<NotificationCenter>) {
        let product = Product::new(ProductId::new(7), "Tarjetas", Decimal::new(1500, 0), stock);
        let item = CartLineItem::new(&product, quantity).unwrap();
        let center = Arc::new(NotificationCenter::new());
        (CartItemControl::new(item, center.clone(), delays), center)
    }

    #[test]
    fn test_derived_flags() {
        let (row, _) = control(2, 5, UiDelays::none());
        assert_eq!(row.item_total(), Decimal::new(3000, 0));
        assert!(row.can_increase());
        assert!(row.can_decrease());
        assert_eq!(row.stock_badge(), StockStatus::LowStock(5));

        let (single, _) = control(1, 1, UiDelays::none());
        assert!(!single.can_increase());
        assert!(!single.can_decrease());
    }

    #[tokio::test]
    async fn test_increase_emits_next_quantity() {
        let (row, _) = control(2, 5, UiDelays::none());
        let intent = row.increase().await;
        assert_eq!(
            intent,
            Some(ItemIntent::QuantityChanged {
                item_id: row.item().id().clone(),
                quantity: 3,
            })
        );
    }

    #[tokio::test]
    async fn test_increase_at_stock_limit_warns() {
        let (row, center) = control(3, 3, UiDelays::none());
        assert_eq!(row.increase().await, None);

        let notes = center.drain();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].severity, Severity::Warning);
    }

    #[tokio::test]
    async fn test_decrease_at_one_removes() {
        let (row, _) = control(1, 5, UiDelays::none());
        assert_eq!(
            row.decrease().await,
            Some(ItemIntent::Removed {
                item_id: row.item().id().clone()
            })
        );
    }

    #[tokio::test]
    async fn test_update_above_stock_warns_with_count() {
        let (row, center) = control(1, 4, UiDelays::none());
        assert_eq!(row.update_quantity(9).await, None);

        let notes = center.drain();
        assert_eq!(notes[0].title, "Insufficient stock");
        assert!(notes[0].message.contains('4'));
    }

    #[tokio::test]
    async fn test_update_below_one_removes() {
        let (row, _) = control(2, 5, UiDelays::none());
        assert!(matches!(
            row.update_quantity(0).await,
            Some(ItemIntent::Removed { .. })
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_updating_flag_spans_the_delay() {
        let (row, _) = control(2, 5, UiDelays::default());
        let flag = row.watch_updating();
        let started = tokio::time::Instant::now();

        let (intent, was_busy) = tokio::join!(row.update_quantity(3), async {
            tokio::task::yield_now().await;
            *flag.borrow()
        });

        assert!(was_busy);
        assert!(intent.is_some());
        assert!(!row.is_updating());
        assert!(started.elapsed() >= Duration::from_millis(300));
    }

    #[tokio::test(start_paused = true)]
    async fn test_remove_waits_removal_delay() {
        let (row, _) = control(2, 5, UiDelays::default());
        let started = tokio::time::Instant::now();

        row.confirm_remove().await;

        assert!(started.elapsed() >= Duration::from_millis(400));
        assert!(!row.is_removing());
    }
}
