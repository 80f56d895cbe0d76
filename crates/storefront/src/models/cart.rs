//! Cart line items and derived totals.

use chrono::{DateTime, Utc};
use imprenta_core::{CartItemId, Price, Product, ProductId};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::cart::CartError;
use crate::cart::shipping::{self, ShippingOption};

/// IVA applied to the subtotal (19%).
pub const TAX_RATE: Decimal = Decimal::from_parts(19, 0, 0, false, 2);

/// Decimal places kept for tax.
const TAX_DECIMAL_PLACES: u32 = 2;

/// One product's presence in the cart.
///
/// The unit price is captured when the product is first added and never
/// follows later catalog price changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineItem {
    id: CartItemId,
    product_id: ProductId,
    product: Product,
    quantity: u32,
    price: Decimal,
    added_at: DateTime<Utc>,
}

impl CartLineItem {
    /// Build a fresh line item for `product`.
    ///
    /// The quantity is taken as requested; clamping against stock happens on
    /// later quantity updates only.
    ///
    /// # Errors
    ///
    /// Returns `CartError::InvalidQuantity` for a zero quantity,
    /// `CartError::NegativePrice` if the catalog handed us a negative price
    /// and `CartError::AmountOverflow` if `price × quantity` does not fit.
    pub fn new(product: &Product, quantity: u32) -> Result<Self, CartError> {
        if quantity == 0 {
            return Err(CartError::InvalidQuantity(quantity));
        }
        if product.price.is_sign_negative() && !product.price.is_zero() {
            return Err(CartError::NegativePrice(product.id));
        }
        if product.price.checked_mul(Decimal::from(quantity)).is_none() {
            return Err(CartError::AmountOverflow);
        }

        Ok(Self {
            id: CartItemId::generate(),
            product_id: product.id,
            product: product.clone(),
            quantity,
            price: product.price,
            added_at: Utc::now(),
        })
    }

    #[must_use]
    pub const fn id(&self) -> &CartItemId {
        &self.id
    }

    #[must_use]
    pub const fn product_id(&self) -> ProductId {
        self.product_id
    }

    #[must_use]
    pub const fn product(&self) -> &Product {
        &self.product
    }

    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Unit price captured at add-time.
    #[must_use]
    pub const fn price(&self) -> Decimal {
        self.price
    }

    #[must_use]
    pub const fn added_at(&self) -> DateTime<Utc> {
        self.added_at
    }

    /// Units of the product available for sale.
    #[must_use]
    pub const fn stock(&self) -> u32 {
        self.product.stock
    }

    /// `price × quantity`, saturating at [`Decimal::MAX`].
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price.saturating_mul(Decimal::from(self.quantity))
    }

    fn checked_line_total(&self) -> Option<Decimal> {
        self.price.checked_mul(Decimal::from(self.quantity))
    }

    pub(crate) const fn set_quantity(&mut self, quantity: u32) {
        self.quantity = quantity;
    }
}

/// Derived totals for a cart. Never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CartSummary {
    pub subtotal: Decimal,
    pub shipping: Decimal,
    pub discount: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

impl CartSummary {
    /// Compute the summary for a set of line items and a shipping choice.
    #[must_use]
    pub fn compute(items: &[CartLineItem], shipping: Option<&ShippingOption>) -> Self {
        let subtotal = subtotal(items);
        let shipping = shipping_cost(shipping, subtotal);
        let tax = tax(subtotal);
        let discount = discount();

        Self {
            subtotal,
            shipping,
            discount,
            tax,
            total: subtotal
                .saturating_add(shipping)
                .saturating_add(tax)
                .saturating_sub(discount),
        }
    }

    /// Total formatted in pesos.
    #[must_use]
    pub fn total_display(&self) -> String {
        Price::clp(self.total).display()
    }
}

/// Σ(price × quantity).
#[must_use]
pub fn subtotal(items: &[CartLineItem]) -> Decimal {
    items
        .iter()
        .map(CartLineItem::line_total)
        .fold(Decimal::ZERO, Decimal::saturating_add)
}

/// Σ quantities.
#[must_use]
pub fn total_items(items: &[CartLineItem]) -> u32 {
    items
        .iter()
        .map(CartLineItem::quantity)
        .fold(0, u32::saturating_add)
}

/// Check that every total of `items` is representable under any shipping
/// option.
///
/// The store only keeps carts that pass, so the saturating sums above
/// never actually saturate for a stored cart.
///
/// # Errors
///
/// Returns `CartError::QuantityOverflow` when the unit count exceeds
/// `u32::MAX` and `CartError::AmountOverflow` when an amount exceeds
/// [`Decimal::MAX`].
pub fn check_totals(items: &[CartLineItem]) -> Result<(), CartError> {
    items
        .iter()
        .try_fold(0_u32, |count, item| count.checked_add(item.quantity()))
        .ok_or(CartError::QuantityOverflow)?;

    let subtotal = items
        .iter()
        .try_fold(Decimal::ZERO, |sum, item| {
            item.checked_line_total().and_then(|line| sum.checked_add(line))
        })
        .ok_or(CartError::AmountOverflow)?;

    let max_shipping = shipping::shipping_options()
        .iter()
        .map(|option| option.price)
        .max()
        .unwrap_or(Decimal::ZERO);

    subtotal
        .checked_mul(TAX_RATE)
        .and_then(|tax| subtotal.checked_add(max_shipping)?.checked_add(tax))
        .map(|_| ())
        .ok_or(CartError::AmountOverflow)
}

/// Shipping for the given subtotal; zero without a selected option.
#[must_use]
pub fn shipping_cost(option: Option<&ShippingOption>, subtotal: Decimal) -> Decimal {
    option.map_or(Decimal::ZERO, |option| option.cost_for(subtotal))
}

/// `round(subtotal × 0.19, 2)`.
#[must_use]
pub fn tax(subtotal: Decimal) -> Decimal {
    subtotal
        .saturating_mul(TAX_RATE)
        .round_dp_with_strategy(TAX_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Reserved for coupon support.
#[must_use]
pub const fn discount() -> Decimal {
    Decimal::ZERO
}

/// Immutable view of the cart handed to observers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSnapshot {
    pub items: Vec<CartLineItem>,
    pub selected_shipping: Option<ShippingOption>,
    pub is_loading: bool,
    pub summary: CartSummary,
    pub total_items: u32,
}

impl CartSnapshot {
    /// Snapshot a cart state.
    #[must_use]
    pub fn capture(
        items: &[CartLineItem],
        selected_shipping: Option<&ShippingOption>,
        is_loading: bool,
    ) -> Self {
        Self {
            items: items.to_vec(),
            selected_shipping: selected_shipping.cloned(),
            is_loading,
            summary: CartSummary::compute(items, selected_shipping),
            total_items: total_items(items),
        }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::shipping::find_shipping_option;

    fn product(id: i32, price: i64, stock: u32) -> Product {
        Product::new(ProductId::new(id), format!("Product {id}"), Decimal::new(price, 0), stock)
    }

    #[test]
    fn test_new_line_item_captures_price() {
        let mut p = product(1, 1000, 5);
        let item = CartLineItem::new(&p, 2).unwrap();
        p.price = Decimal::new(9999, 0);

        assert_eq!(item.price(), Decimal::new(1000, 0));
        assert_eq!(item.quantity(), 2);
        assert_eq!(item.product_id(), ProductId::new(1));
        assert_eq!(item.line_total(), Decimal::new(2000, 0));
    }

    #[test]
    fn test_new_line_item_does_not_clamp_to_stock() {
        let item = CartLineItem::new(&product(1, 1000, 2), 7).unwrap();
        assert_eq!(item.quantity(), 7);
    }

    #[test]
    fn test_new_line_item_rejects_bad_input() {
        assert!(matches!(
            CartLineItem::new(&product(1, 1000, 2), 0),
            Err(CartError::InvalidQuantity(0))
        ));
        assert!(matches!(
            CartLineItem::new(&product(2, -5, 2), 1),
            Err(CartError::NegativePrice(_))
        ));
    }

    #[test]
    fn test_new_line_item_rejects_unrepresentable_total() {
        let huge = Product::new(ProductId::new(9), "Gigante", Decimal::MAX, 5);
        assert!(matches!(
            CartLineItem::new(&huge, 2),
            Err(CartError::AmountOverflow)
        ));
        assert!(CartLineItem::new(&huge, 1).is_ok());
    }

    #[test]
    fn test_check_totals_rejects_unit_count_past_u32() {
        let items = vec![
            CartLineItem::new(&product(1, 1, 5), 3_000_000_000).unwrap(),
            CartLineItem::new(&product(2, 1, 5), 3_000_000_000).unwrap(),
        ];

        assert!(matches!(check_totals(&items), Err(CartError::QuantityOverflow)));
        // Readers saturate instead of panicking.
        assert_eq!(total_items(&items), u32::MAX);
        assert_eq!(CartSnapshot::capture(&items, None, false).total_items, u32::MAX);
    }

    #[test]
    fn test_check_totals_rejects_subtotal_past_decimal_max() {
        let half = Decimal::MAX / Decimal::TWO + Decimal::ONE;
        let items = vec![
            CartLineItem::new(&Product::new(ProductId::new(1), "A", half, 5), 1).unwrap(),
            CartLineItem::new(&Product::new(ProductId::new(2), "B", half, 5), 1).unwrap(),
        ];

        assert!(matches!(check_totals(&items), Err(CartError::AmountOverflow)));
        assert_eq!(subtotal(&items), Decimal::MAX);
    }

    #[test]
    fn test_check_totals_accepts_ordinary_cart() {
        let items = vec![
            CartLineItem::new(&product(1, 20_000, 10), 3).unwrap(),
            CartLineItem::new(&product(2, 4_990, 10), 2).unwrap(),
        ];
        assert!(check_totals(&items).is_ok());
    }

    #[test]
    fn test_tax_rounds_to_two_places() {
        assert_eq!(tax(Decimal::ZERO), Decimal::ZERO);
        assert_eq!(tax(Decimal::new(60_000, 0)), Decimal::new(11_400, 0));
        // 333 × 0.19 = 63.27
        assert_eq!(tax(Decimal::new(333, 0)), Decimal::new(6327, 2));
        // 0.5 × 0.19 = 0.095 -> 0.10
        assert_eq!(tax(Decimal::new(5, 1)), Decimal::new(10, 2));
    }

    #[test]
    fn test_summary_with_free_shipping() {
        let items = vec![CartLineItem::new(&product(1, 30_000, 5), 2).unwrap()];
        let standard = find_shipping_option("standard");
        let summary = CartSummary::compute(&items, standard);

        assert_eq!(summary.subtotal, Decimal::new(60_000, 0));
        assert_eq!(summary.shipping, Decimal::ZERO);
        assert_eq!(summary.tax, Decimal::new(11_400, 0));
        assert_eq!(summary.discount, Decimal::ZERO);
        assert_eq!(summary.total, Decimal::new(71_400, 0));
        assert_eq!(summary.total_display(), "$71.400");
    }

    #[test]
    fn test_summary_is_idempotent() {
        let items = vec![
            CartLineItem::new(&product(1, 1_250, 10), 3).unwrap(),
            CartLineItem::new(&product(2, 4_990, 10), 1).unwrap(),
        ];
        let express = find_shipping_option("express");
        let first = CartSummary::compute(&items, express);
        let second = CartSummary::compute(&items, express);

        assert_eq!(first, second);
        assert_eq!(
            first.total,
            first.subtotal + first.shipping + first.tax - first.discount
        );
        assert_eq!(first.shipping, Decimal::new(7_000, 0));
    }

    #[test]
    fn test_snapshot_counts_units() {
        let items = vec![
            CartLineItem::new(&product(1, 100, 10), 3).unwrap(),
            CartLineItem::new(&product(2, 100, 10), 4).unwrap(),
        ];
        let snapshot = CartSnapshot::capture(&items, None, false);
        assert_eq!(snapshot.total_items, 7);
        assert!(!snapshot.is_empty());
        assert!(snapshot.selected_shipping.is_none());
    }

    #[test]
    fn test_line_item_json_uses_camel_case() {
        let item = CartLineItem::new(&product(1, 1000, 5), 1).unwrap();
        let json = serde_json::to_value(&item).unwrap();
        assert!(json.get("productId").is_some());
        assert!(json.get("addedAt").is_some());
    }
}
