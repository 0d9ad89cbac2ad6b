//! Leveling and the rebirth cycle.

use super::attributes::Stat;
use super::model::{Character, Notification, Unlock};
use crate::core::constants::*;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatGain {
    pub stat: Stat,
    pub amount: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelUp {
    pub new_level: u32,
    pub stat_gains: Vec<StatGain>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RebirthSummary {
    pub rebirths: u32,
    pub stat_gains: Vec<StatGain>,
    pub kept_inventory_size: bool,
    pub unlocked: Vec<Unlock>,
}

/// XP needed to leave `level`: int(100 * level^1.5).
pub fn xp_for_next_level(level: u32) -> u64 {
    (XP_CURVE_BASE * (level as f64).powf(XP_CURVE_EXPONENT)) as u64
}

impl Character {
    /// Adds XP and resolves every level-up it pays for.
    pub fn add_xp(&mut self, amount: u64, rng: &mut impl Rng) -> Vec<LevelUp> {
        self.xp += amount;
        let mut level_ups = Vec::new();
        while self.xp >= self.xp_to_next_level {
            self.xp -= self.xp_to_next_level;
            level_ups.push(self.level_up(rng));
        }
        level_ups
    }

    fn level_up(&mut self, rng: &mut impl Rng) -> LevelUp {
        self.level += 1;
        self.xp_to_next_level = xp_for_next_level(self.level);

        let count = rng.gen_range(LEVEL_UP_MIN_STATS..=LEVEL_UP_MAX_STATS);
        let stats = Stat::all();
        let stat_gains: Vec<StatGain> = stats
            .choose_multiple(rng, count)
            .map(|&stat| {
                let amount = rng.gen_range(LEVEL_UP_MIN_GAIN..=LEVEL_UP_MAX_GAIN);
                self.attributes.add(stat, amount);
                StatGain { stat, amount }
            })
            .collect();

        self.update_derived_stats(true);
        log::info!("{} reached level {}", self.name, self.level);
        LevelUp {
            new_level: self.level,
            stat_gains,
        }
    }

    /// Resets progress after a boss death and permanently raises every base
    /// attribute by 10% (at least 1).
    pub fn rebirth(&mut self) -> RebirthSummary {
        let keep_size = self.unlocks.keep_inventory_size;

        self.level = STARTING_LEVEL;
        self.xp = 0;
        self.xp_to_next_level = STARTING_XP_TO_NEXT;
        self.copper = 0;
        self.inventory.clear();
        self.equipment.clear();
        self.resources.clear();
        self.boss_tier = 0;
        if !keep_size {
            self.max_inventory_size = STARTING_INVENTORY_SIZE;
            self.inventory_upgrade_cost = INVENTORY_UPGRADE_BASE_COST;
        }

        let stat_gains: Vec<StatGain> = Stat::all()
            .into_iter()
            .map(|stat| {
                let current = self.attributes.get(stat);
                let amount = ((current as f64 * REBIRTH_ATTRIBUTE_GAIN_PERCENT) as u32).max(1);
                self.attributes.add(stat, amount);
                StatGain { stat, amount }
            })
            .collect();

        self.rebirths += 1;
        let mut unlocked = Vec::new();
        if self.rebirths >= KEEP_INVENTORY_SIZE_REBIRTHS && !self.unlocks.keep_inventory_size {
            self.unlocks.keep_inventory_size = true;
            unlocked.push(Unlock::KeepInventorySize);
        }
        if self.rebirths >= AUTO_EQUIP_REBIRTHS && !self.unlocks.auto_equip {
            self.unlocks.auto_equip = true;
            unlocked.push(Unlock::AutoEquip);
        }
        for unlock in &unlocked {
            log::info!("{} unlocked {:?}", self.name, unlock);
            self.notify(Notification::Unlocked(*unlock));
        }

        self.update_derived_stats(true);
        log::info!("{} was reborn (rebirth #{})", self.name, self.rebirths);
        RebirthSummary {
            rebirths: self.rebirths,
            stat_gains,
            kept_inventory_size: keep_size,
            unlocked,
        }
    }
}
