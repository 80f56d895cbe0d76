//! Order summary panel: totals, shipping picker and checkout gate.

use std::sync::Arc;

use imprenta_core::Price;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::cart::shipping::{self, ShippingOption};
use crate::models::cart::{CartSnapshot, CartSummary};
use crate::services::notifications::Notifier;

/// What the summary panel asks its page to do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "shippingId", rename_all = "camelCase")]
pub enum SummaryIntent {
    ShippingSelected(String),
    CheckoutRequested,
}

/// View over the cart totals and the selected shipping option.
pub struct CartSummaryPanel {
    summary: CartSummary,
    selected_shipping: Option<ShippingOption>,
    is_loading: bool,
    notifier: Arc<dyn Notifier>,
}

impl std::fmt::Debug for CartSummaryPanel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartSummaryPanel")
            .field("summary", &self.summary)
            .field("selected_shipping", &self.selected_shipping.as_ref().map(|s| &s.id))
            .field("is_loading", &self.is_loading)
            .finish_non_exhaustive()
    }
}

impl CartSummaryPanel {
    #[must_use]
    pub const fn new(
        summary: CartSummary,
        selected_shipping: Option<ShippingOption>,
        is_loading: bool,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            summary,
            selected_shipping,
            is_loading,
            notifier,
        }
    }

    /// Panel for the state captured in `snapshot`.
    #[must_use]
    pub fn from_snapshot(snapshot: &CartSnapshot, notifier: Arc<dyn Notifier>) -> Self {
        Self::new(
            snapshot.summary,
            snapshot.selected_shipping.clone(),
            snapshot.is_loading,
            notifier,
        )
    }

    #[must_use]
    pub const fn summary(&self) -> &CartSummary {
        &self.summary
    }

    #[must_use]
    pub const fn selected_shipping(&self) -> Option<&ShippingOption> {
        self.selected_shipping.as_ref()
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Whether the selected option ships for free at the current subtotal.
    #[must_use]
    pub fn is_shipping_free(&self) -> bool {
        self.selected_shipping
            .as_ref()
            .is_some_and(|option| option.is_free_for(self.summary.subtotal))
    }

    /// Free-shipping hint. Empty when the option has no threshold.
    #[must_use]
    pub fn free_shipping_text(&self) -> String {
        let Some(remaining) = self
            .selected_shipping
            .as_ref()
            .filter(|option| option.free_threshold.is_some_and(|t| t > Decimal::ZERO))
            .and_then(|option| option.remaining_for_free(self.summary.subtotal))
        else {
            return String::new();
        };

        if remaining <= Decimal::ZERO {
            "Free shipping applied!".to_string()
        } else {
            format!("{} left for free shipping", Price::clp(remaining).display())
        }
    }

    /// Checkout needs a positive total and a shipping option.
    #[must_use]
    pub fn can_checkout(&self) -> bool {
        self.summary.total > Decimal::ZERO && self.selected_shipping.is_some()
    }

    /// Gate the checkout button. Warns and returns `false` when blocked.
    pub fn request_checkout(&self) -> bool {
        if !self.can_checkout() {
            self.notifier.warning(
                "Complete your order",
                "Select a shipping method to continue",
            );
            return false;
        }
        true
    }

    /// Options for the shipping picker.
    #[must_use]
    pub fn shipping_options(&self) -> &'static [ShippingOption] {
        shipping::shipping_options()
    }

    /// Intent for a shipping picker change.
    #[must_use]
    pub fn select_shipping(&self, shipping_id: &str) -> SummaryIntent {
        SummaryIntent::ShippingSelected(shipping_id.to_string())
    }
}
