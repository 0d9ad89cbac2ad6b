//! Game balance simulator for Monte Carlo analysis.
//!
//! Plays many headless sessions with a scripted bot to analyze:
//! - Leveling pace and quest survival per class
//! - Boss ladder progress and rebirth cadence
//! - Loot rarity, auto-sell and inventory pressure
//!
//! The bot drives a real [`crate::core::GameSession`], so simulation results
//! match actual gameplay behavior.

mod config;
mod loot_sim;
mod report;
mod runner;

pub use config::SimConfig;
pub use loot_sim::LootStats;
pub use report::SimReport;
pub use runner::{run_simulation, run_simulation_with_content, RunStats};
