//! Shopping cart.
//!
//! - [`store`] - The [`CartStore`] state container
//! - [`shipping`] - The static shipping rule table
//! - [`storage`] - Key-value persistence for the cart snapshot

pub mod shipping;
pub mod storage;
pub mod store;

use imprenta_core::ProductId;
use thiserror::Error;

pub use shipping::{ShippingOption, find_shipping_option, shipping_options};
pub use storage::{FileStorage, MemoryStorage, StorageError, StorageProvider};
pub use store::{CartStore, DEFAULT_STORAGE_KEY};

/// Cart errors. All of them are recovered inside the store.
#[derive(Debug, Error)]
pub enum CartError {
    /// A line item needs at least one unit.
    #[error("Quantity must be at least 1, got {0}")]
    InvalidQuantity(u32),

    /// The catalog supplied a negative price.
    #[error("Product {0} has a negative price")]
    NegativePrice(ProductId),

    /// The cart would hold more units than a `u32` can count.
    #[error("Cart holds too many units to count")]
    QuantityOverflow,

    /// A cart amount would exceed the representable range.
    #[error("Cart amount is too large")]
    AmountOverflow,

    /// Encoding the cart snapshot failed.
    #[error("Failed to serialize cart: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Writing the cart snapshot failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}
