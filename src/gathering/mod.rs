//! Resource gathering minigame.

pub mod logic;

pub use logic::*;
