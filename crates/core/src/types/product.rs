//! Product value object supplied by the catalog.
//!
//! The cart never fetches products itself; callers hand it a [`Product`] and
//! the cart keeps a snapshot of it inside each line item.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::Price;
use super::status::StockStatus;

/// A printable product as exposed by the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Current unit price.
    pub price: Decimal,
    /// Price before a promotion, shown struck through.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<ProductCategory>,
    /// Units available for sale.
    pub stock: u32,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

const fn default_active() -> bool {
    true
}

impl Product {
    /// Minimal product with the fields the cart relies on.
    #[must_use]
    pub fn new(id: ProductId, name: impl Into<String>, price: Decimal, stock: u32) -> Self {
        Self {
            id,
            name: name.into(),
            description: String::new(),
            price,
            original_price: None,
            category: None,
            stock,
            is_active: true,
        }
    }

    /// Unit price in pesos.
    #[must_use]
    pub const fn unit_price(&self) -> Price {
        Price::clp(self.price)
    }

    /// Stock availability bucket.
    #[must_use]
    pub const fn stock_status(&self) -> StockStatus {
        StockStatus::from_stock(self.stock)
    }

    /// Whether the product is discounted relative to its original price.
    #[must_use]
    pub fn is_on_sale(&self) -> bool {
        self.original_price.is_some_and(|original| original > self.price)
    }
}

/// Print-shop product categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProductCategory {
    TarjetasDePresentacion,
    Volantes,
    Folletos,
    Postales,
    Invitaciones,
    Sellos,
    PapeleriaCorporativa,
    ImpresionDigital,
    GranFormato,
}
