//! Guaranteed boss drops.
//!
//! Each slot can hold at most one boss item across equipment and inventory.
//! While a slot is free the boss hands out a new piece for it, sized from
//! what the character currently wears there. Once all three slots carry a
//! boss item, further victories reforge one of them instead.

use super::generation::{item_from_blueprint, LootGenerator};
use super::types::{EquipmentSlot, Item, Rarity, StatDeltas};
use crate::character::attributes::Stat;
use crate::character::model::{Character, LootOutcome, LootStatus};
use crate::core::constants::*;
use crate::error::EngineError;
use rand::seq::SliceRandom;
use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemLocation {
    Equipped(EquipmentSlot),
    Inventory(usize),
}

#[derive(Debug, Clone, PartialEq)]
pub enum BossReward {
    NewItem(Item),
    /// Replacement for the boss item at `location` with strictly better stats.
    Reforged { location: ItemLocation, item: Item },
}

impl BossReward {
    pub fn item(&self) -> &Item {
        match self {
            BossReward::NewItem(item) => item,
            BossReward::Reforged { item, .. } => item,
        }
    }
}

/// Rarity of a fresh boss item by character level.
pub fn boss_reward_rarity(level: u32) -> Rarity {
    if level < BOSS_REWARD_RARE_BELOW_LEVEL {
        Rarity::Rare
    } else if level < BOSS_REWARD_EPIC_BELOW_LEVEL {
        Rarity::Epic
    } else {
        Rarity::Legendary
    }
}

/// Every boss item the character holds, with where it is kept.
pub fn boss_item_locations(character: &Character) -> Vec<(ItemLocation, &Item)> {
    let equipped = character
        .equipment
        .iter_slots()
        .filter_map(|(slot, item)| match item {
            Some(i) if i.is_boss_item => Some((ItemLocation::Equipped(slot), i)),
            _ => None,
        });
    let carried = character
        .inventory
        .iter()
        .enumerate()
        .filter(|(_, item)| item.is_boss_item && item.slot.is_some())
        .map(|(idx, item)| (ItemLocation::Inventory(idx), item));
    equipped.chain(carried).collect()
}

fn boss_item_value(level: u32, stats: &StatDeltas, rarity: Rarity) -> u64 {
    let total: u32 = stats.values().sum();
    (level as f64 * BOSS_REWARD_VALUE_PER_LEVEL
        + total as f64 * BOSS_REWARD_VALUE_PER_STAT * rarity.info().modifier) as u64
}

impl LootGenerator<'_> {
    pub fn generate_boss_reward(
        &self,
        character: &Character,
        rng: &mut impl Rng,
    ) -> Result<BossReward, EngineError> {
        let main = character
            .main_stat()
            .ok_or(EngineError::MainStatUnresolved(character.class))?;
        let held = boss_item_locations(character);
        let free: Vec<EquipmentSlot> = EquipmentSlot::all()
            .into_iter()
            .filter(|slot| !held.iter().any(|(_, item)| item.slot == Some(*slot)))
            .collect();

        if let Some(&slot) = free.choose(rng) {
            return self
                .new_boss_item(character, slot, main, rng)
                .map(BossReward::NewItem);
        }
        // every slot already carries a boss item
        let (location, item) = held[rng.gen_range(0..held.len())];
        Ok(reforge(character.level, location, item, rng))
    }

    fn new_boss_item(
        &self,
        character: &Character,
        slot: EquipmentSlot,
        main: Stat,
        rng: &mut impl Rng,
    ) -> Result<Item, EngineError> {
        let level = character.level;
        let rarity = boss_reward_rarity(level);
        let modifier = rarity.info().modifier;
        let base_score = character
            .equipment
            .get(slot)
            .as_ref()
            .map_or(0.0, |item| item.weighted_score(Some(main)));

        let min_primary = (base_score * BOSS_REWARD_SCORE_FACTOR
            + level as f64 * BOSS_REWARD_PER_LEVEL) as u32;
        let primary = (min_primary as f64 * modifier) as u32;
        let mut stats = StatDeltas::new();
        stats.insert(main, min_primary.max(primary).max(1));
        if rng.gen_bool(BOSS_REWARD_MAIN_STAT_CHANCE) {
            let bonus = (primary as f64 * BOSS_REWARD_MAIN_BONUS_RATIO) as u32;
            *stats.entry(main).or_insert(0) += bonus;
        } else {
            stats.insert(
                Stat::Luck,
                ((primary as f64 * BOSS_REWARD_LUCK_RATIO) as u32).max(1),
            );
        }

        let allowed = character.class.def().allowed_armor;
        let candidates: Vec<_> = self
            .content()
            .blueprints_for_slot(slot)
            .filter(|b| b.suits(main, allowed))
            .collect();
        let blueprint = candidates
            .choose(rng)
            .ok_or(EngineError::MissingBlueprint { slot, stat: main })?;

        let value = boss_item_value(level, &stats, rarity);
        let mut item = item_from_blueprint(blueprint, rarity, stats, value);
        item.is_boss_item = true;
        log::debug!("new boss item {} for {:?}", item.name_key, slot);
        Ok(item)
    }
}

/// Every base stat improves by 5-10% plus one point; rarity, blueprint and
/// upgrade level are kept.
fn reforge(level: u32, location: ItemLocation, existing: &Item, rng: &mut impl Rng) -> BossReward {
    let mut item = existing.clone();
    item.base_stats = existing
        .base_stats
        .iter()
        .map(|(&stat, &value)| {
            let factor = rng.gen_range(BOSS_REFORGE_MIN..=BOSS_REFORGE_MAX);
            (stat, (value as f64 * factor) as u32 + 1)
        })
        .collect();
    let value = boss_item_value(level, &item.base_stats, item.rarity);
    item.base_value = item.base_value.max(value);
    BossReward::Reforged { location, item }
}

impl Character {
    /// Hands a boss reward to the character. New items go through
    /// [`Character::add_loot`]; reforged items replace the original in place.
    pub fn apply_boss_reward(&mut self, reward: BossReward) -> LootOutcome {
        match reward {
            BossReward::NewItem(item) => self.add_loot(0, Some(item)),
            BossReward::Reforged { location, item } => {
                match location {
                    ItemLocation::Equipped(slot) => {
                        self.equipment.replace(slot, Some(item.clone()));
                        self.update_derived_stats(false);
                    }
                    ItemLocation::Inventory(idx) => {
                        if let Some(slot) = self.inventory.get_mut(idx) {
                            *slot = item.clone();
                        }
                    }
                }
                LootOutcome {
                    status: LootStatus::Reforged,
                    item: Some(item),
                }
            }
        }
    }
}
