pub mod logic;

pub use logic::*;
