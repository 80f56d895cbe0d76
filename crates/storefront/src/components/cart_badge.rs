//! Header cart counter.

use imprenta_core::Price;
use rust_decimal::Decimal;
use serde::Serialize;
use tokio::sync::watch;

use crate::models::cart::CartSnapshot;

/// Badge tint by item count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeColor {
    Hidden,
    Green,
    Blue,
    Red,
}

impl BadgeColor {
    #[must_use]
    pub const fn for_count(count: u32) -> Self {
        match count {
            0 => Self::Hidden,
            1..=3 => Self::Green,
            4..=6 => Self::Blue,
            _ => Self::Red,
        }
    }
}

/// Item count and total shown in the site header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartBadge {
    count: u32,
    total: Decimal,
}

impl CartBadge {
    #[must_use]
    pub const fn from_snapshot(snapshot: &CartSnapshot) -> Self {
        Self {
            count: snapshot.total_items,
            total: snapshot.summary.total,
        }
    }

    #[must_use]
    pub const fn show(&self) -> bool {
        self.count > 0
    }

    #[must_use]
    pub const fn count(&self) -> u32 {
        self.count
    }

    #[must_use]
    pub const fn color(&self) -> BadgeColor {
        BadgeColor::for_count(self.count)
    }

    #[must_use]
    pub fn total_display(&self) -> String {
        Price::clp(self.total).display()
    }

    /// Apply a new snapshot. Returns `true` when the count grew, which is
    /// when the badge bounces.
    pub const fn update(&mut self, snapshot: &CartSnapshot) -> bool {
        let grew = snapshot.total_items > self.count;
        self.count = snapshot.total_items;
        self.total = snapshot.summary.total;
        grew
    }

    /// Wait for the next cart change and apply it.
    ///
    /// Returns `None` once the cart store is gone.
    pub async fn observe(&mut self, updates: &mut watch::Receiver<CartSnapshot>) -> Option<bool> {
        updates.changed().await.ok()?;
        let snapshot = updates.borrow_and_update().clone();
        Some(self.update(&snapshot))
    }
}
