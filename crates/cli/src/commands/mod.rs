//! CLI subcommands.

pub mod cart;
pub mod shipping;
pub mod slider;
