//! Loot tracking for simulated runs.

use crate::character::model::LootStatus;
use crate::items::types::{Item, Rarity};
use serde::Serialize;

/// Statistics about quest and boss loot.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LootStats {
    pub total_rewards: u32,
    pub total_drops: u32,
    /// Drops per rarity, indexed in [`Rarity::all`] order.
    pub rarity_drops: [u32; 7],
    pub added: u32,
    pub auto_equipped: u32,
    pub auto_sold: u32,
    pub lost_to_full_inventory: u32,
    pub boss_items: u32,
}

impl LootStats {
    pub fn record_reward(&mut self, status: LootStatus, item: Option<&Item>) {
        self.total_rewards += 1;
        let Some(item) = item else {
            return;
        };

        self.total_drops += 1;
        self.rarity_drops[item.rarity as usize] += 1;
        if item.is_boss_item {
            self.boss_items += 1;
        }

        match status {
            LootStatus::Added | LootStatus::Reforged => self.added += 1,
            LootStatus::AutoEquipped => self.auto_equipped += 1,
            LootStatus::AutoSold => self.auto_sold += 1,
            LootStatus::InventoryFull => self.lost_to_full_inventory += 1,
            LootStatus::NoItem => {}
        }
    }

    pub fn drops_of(&self, rarity: Rarity) -> u32 {
        self.rarity_drops[rarity as usize]
    }

    pub fn drop_rate(&self) -> f64 {
        if self.total_rewards == 0 {
            0.0
        } else {
            self.total_drops as f64 / self.total_rewards as f64
        }
    }
}
