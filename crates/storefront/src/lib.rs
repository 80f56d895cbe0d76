//! Imprenta Storefront library.
//!
//! Shopping cart, home page slider and the page controllers that drive them,
//! exposed as a library so the CLI and integration tests can reuse them.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod components;
pub mod config;
pub mod error;
pub mod models;
pub mod pages;
pub mod routes;
pub mod services;
pub mod state;
