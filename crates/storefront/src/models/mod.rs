//! Domain models for the storefront.
//!
//! - [`cart`] - Line items, derived totals and cart snapshots
//! - [`slider`] - Carousel slides, slide drafts and image uploads

pub mod cart;
pub mod slider;

pub use cart::{CartLineItem, CartSnapshot, CartSummary, TAX_RATE};
pub use slider::{ImageUpload, SliderImage, SliderImageDraft, UploadError};
