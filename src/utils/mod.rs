//! Utility modules: currency display and JSON persistence helpers.

pub mod currency;
pub mod persistence;

pub use currency::*;
