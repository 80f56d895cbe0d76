//! Presentation components.
//!
//! Components hold derived view state and turn user gestures into intents.
//! They never mutate the cart themselves; the owning page applies intents to
//! the [`CartStore`](crate::cart::CartStore).
//!
//! - [`cart_item`] - One cart row: quantity stepper, removal, stock badge
//! - [`cart_summary`] - Totals, shipping picker and checkout gate
//! - [`cart_badge`] - Header item counter
//! - [`slider`] - Home page carousel

pub mod cart_badge;
pub mod cart_item;
pub mod cart_summary;
pub mod slider;

use std::time::Duration;

use tokio::sync::watch;

pub use cart_badge::{BadgeColor, CartBadge};
pub use cart_item::{CartItemControl, ItemIntent};
pub use cart_summary::{CartSummaryPanel, SummaryIntent};
pub use slider::{AUTOPLAY_INTERVAL, SliderCarousel};

/// Artificial pauses that let the UI show progress before an intent lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UiDelays {
    /// Before a quantity change is emitted.
    pub quantity: Duration,
    /// Before a removal is emitted.
    pub remove: Duration,
    /// Before the cart is cleared.
    pub clear: Duration,
    /// Between the checkout confirmation and the follow-up notice.
    pub checkout_notice: Duration,
}

impl Default for UiDelays {
    fn default() -> Self {
        Self {
            quantity: Duration::from_millis(300),
            remove: Duration::from_millis(400),
            clear: Duration::from_millis(500),
            checkout_notice: Duration::from_millis(1000),
        }
    }
}

impl UiDelays {
    /// No delays at all. Used by the CLI and tests.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            quantity: Duration::ZERO,
            remove: Duration::ZERO,
            clear: Duration::ZERO,
            checkout_notice: Duration::ZERO,
        }
    }
}

/// Wait `delay`, skipping the timer entirely for zero.
pub(crate) async fn pause(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

/// Raises a busy flag and lowers it again when dropped.
///
/// The flag is lowered even if the surrounding future is cancelled mid-delay.
pub(crate) struct BusyFlag<'a>(&'a watch::Sender<bool>);

impl<'a> BusyFlag<'a> {
    pub(crate) fn raise(flag: &'a watch::Sender<bool>) -> Self {
        flag.send_replace(true);
        Self(flag)
    }
}

impl Drop for BusyFlag<'_> {
    fn drop(&mut self) {
        self.0.send_replace(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_delays() {
        let delays = UiDelays::default();
        assert_eq!(delays.quantity, Duration::from_millis(300));
        assert_eq!(delays.remove, Duration::from_millis(400));
        assert_eq!(delays.clear, Duration::from_millis(500));
        assert_eq!(delays.checkout_notice, Duration::from_millis(1000));
    }

    #[test]
    fn test_busy_flag_resets_on_drop() {
        let (tx, rx) = watch::channel(false);
        {
            let _busy = BusyFlag::raise(&tx);
            assert!(*rx.borrow());
        }
        assert!(!*rx.borrow());
    }
}
