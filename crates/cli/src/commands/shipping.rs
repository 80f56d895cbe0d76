//! Shipping table listing.

use imprenta_core::Price;
use imprenta_storefront::cart::shipping_options;
use tracing::info;

/// Print every shipping option.
pub fn list() {
    for option in shipping_options() {
        let threshold = option
            .free_threshold
            .map_or_else(|| "-".to_string(), |t| Price::clp(t).display());

        info!(
            id = %option.id,
            days = option.estimated_days,
            free_from = %threshold,
            "{}: {}",
            option.name,
            option.price_display()
        );
    }
}
