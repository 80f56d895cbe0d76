//! Imprenta Core - Shared types library.
//!
//! This crate provides common types used across all Imprenta components:
//! - `storefront` - Cart, slider and page controllers plus the JSON surface
//! - `cli` - Command-line access to the persisted cart
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no storage, no
//! HTTP. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, products and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
