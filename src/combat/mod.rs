//! Boss encounters: scaling and the turn-based arena.

pub mod logic;
pub mod types;

pub use logic::*;
pub use types::*;
