//! Blacksmith: resource-paid upgrades for equipped gear.

pub mod logic;

pub use logic::*;
