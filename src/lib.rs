//! Chronicle - progression and combat engine for a quest-driven idle RPG.
//!
//! The crate holds the game rules only: characters and their progression,
//! loot generation, timed quests, the boss arena, the town economy and
//! persistence. A frontend drives a [`core::GameSession`] and renders the
//! events and views it produces.

pub mod blacksmith;
pub mod character;
pub mod combat;
pub mod core;
pub mod error;
pub mod gathering;
pub mod items;
pub mod quest;
pub mod save;
pub mod simulator;
pub mod trader;
pub mod utils;
