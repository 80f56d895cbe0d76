//! Static shipping rule table.

use std::sync::LazyLock;

use imprenta_core::Price;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A delivery method with a flat price and an optional free-shipping
/// threshold on the subtotal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingOption {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub estimated_days: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub free_threshold: Option<Decimal>,
}

impl ShippingOption {
    /// Whether `subtotal` reaches this option's free-shipping threshold.
    #[must_use]
    pub fn is_free_for(&self, subtotal: Decimal) -> bool {
        self.free_threshold
            .is_some_and(|threshold| threshold > Decimal::ZERO && subtotal >= threshold)
    }

    /// Shipping charged for `subtotal`.
    #[must_use]
    pub fn cost_for(&self, subtotal: Decimal) -> Decimal {
        if self.is_free_for(subtotal) {
            Decimal::ZERO
        } else {
            self.price
        }
    }

    /// Amount still missing to reach free shipping.
    ///
    /// `None` when the option has no threshold; zero or negative once the
    /// threshold is met.
    #[must_use]
    pub fn remaining_for_free(&self, subtotal: Decimal) -> Option<Decimal> {
        self.free_threshold.map(|threshold| threshold - subtotal)
    }

    /// Flat price formatted in pesos.
    #[must_use]
    pub fn price_display(&self) -> String {
        Price::clp(self.price).display()
    }
}

static SHIPPING_OPTIONS: LazyLock<Vec<ShippingOption>> = LazyLock::new(|| {
    vec![
        ShippingOption {
            id: "standard".to_string(),
            name: "Envío Estándar".to_string(),
            description: "Delivery in 3-5 business days".to_string(),
            price: Decimal::new(3_500, 0),
            estimated_days: 4,
            free_threshold: Some(Decimal::new(50_000, 0)),
        },
        ShippingOption {
            id: "express".to_string(),
            name: "Envío Express".to_string(),
            description: "Delivery in 24-48 hours".to_string(),
            price: Decimal::new(7_000, 0),
            estimated_days: 2,
            free_threshold: Some(Decimal::new(80_000, 0)),
        },
        ShippingOption {
            id: "pickup".to_string(),
            name: "Retiro en Tienda".to_string(),
            description: "Free pickup at our store".to_string(),
            price: Decimal::ZERO,
            estimated_days: 0,
            free_threshold: None,
        },
    ]
});

/// Every shipping option, in display order.
#[must_use]
pub fn shipping_options() -> &'static [ShippingOption] {
    &SHIPPING_OPTIONS
}

/// Look up a shipping option by id.
#[must_use]
pub fn find_shipping_option(id: &str) -> Option<&'static ShippingOption> {
    SHIPPING_OPTIONS.iter().find(|option| option.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_contents() {
        let ids: Vec<&str> = shipping_options().iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, ["standard", "express", "pickup"]);
    }

    #[test]
    fn test_lookup_unknown_is_none() {
        assert!(find_shipping_option("drone").is_none());
        assert!(find_shipping_option("").is_none());
    }

    #[test]
    fn test_threshold_boundaries() {
        let standard = find_shipping_option("standard").unwrap();

        assert_eq!(standard.cost_for(Decimal::new(49_999, 0)), Decimal::new(3_500, 0));
        assert_eq!(standard.cost_for(Decimal::new(50_000, 0)), Decimal::ZERO);
        assert_eq!(standard.cost_for(Decimal::new(60_000, 0)), Decimal::ZERO);
    }

    #[test]
    fn test_pickup_has_no_threshold() {
        let pickup = find_shipping_option("pickup").unwrap();
        assert!(!pickup.is_free_for(Decimal::new(1_000_000, 0)));
        assert_eq!(pickup.cost_for(Decimal::new(10, 0)), Decimal::ZERO);
        assert!(pickup.remaining_for_free(Decimal::ZERO).is_none());
    }

    #[test]
    fn test_remaining_for_free() {
        let express = find_shipping_option("express").unwrap();
        assert_eq!(
            express.remaining_for_free(Decimal::new(67_500, 0)),
            Some(Decimal::new(12_500, 0))
        );
        assert_eq!(express.price_display(), "$7.000");
    }
}
