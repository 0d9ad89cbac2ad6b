use super::types::{ConsumableEffect, EquipmentSlot, Item, ItemCategory, Rarity, StatDeltas};
use crate::character::attributes::Stat;
use crate::core::constants::*;
use crate::core::content::{Blueprint, GameContent, PotionDef};
use crate::error::{ContentError, EngineError};
use rand::distributions::{Distribution, WeightedIndex};
use rand::seq::SliceRandom;
use rand::Rng;

/// Builds items from the blueprint and rarity tables.
#[derive(Debug, Clone, Copy)]
pub struct LootGenerator<'c> {
    content: &'c GameContent,
}

impl<'c> LootGenerator<'c> {
    pub fn new(content: &'c GameContent) -> Self {
        Self { content }
    }

    pub fn content(&self) -> &'c GameContent {
        self.content
    }

    /// A random equipment piece scaled to `level`, with rarity skewed by `luck`.
    pub fn generate_item_for_level(
        &self,
        level: u32,
        luck: u32,
        rng: &mut impl Rng,
    ) -> Result<Item, EngineError> {
        let level = level.max(1);
        let rarity = roll_rarity(level, luck, rng);
        let slot = *EquipmentSlot::all()
            .choose(rng)
            .ok_or(ContentError::EmptySlot(EquipmentSlot::Weapon))?;
        let candidates: Vec<&Blueprint> = self.content.blueprints_for_slot(slot).collect();
        let blueprint = *candidates.choose(rng).ok_or(ContentError::EmptySlot(slot))?;

        let stats = roll_stats(blueprint, level, rarity, rng);
        let value = loot_value(level, &stats, rarity);
        Ok(item_from_blueprint(blueprint, rarity, stats, value))
    }
}

/// Weighted rarity roll among tiers unlocked at `level`. Tiers above common
/// have their weight multiplied by `1 + luck/100`.
pub fn roll_rarity(level: u32, luck: u32, rng: &mut impl Rng) -> Rarity {
    let luck_factor = 1.0 + luck as f64 / 100.0;
    let (tiers, weights): (Vec<Rarity>, Vec<f64>) = Rarity::all()
        .into_iter()
        .filter(|r| r.info().min_level <= level.max(1))
        .map(|r| {
            let w = r.info().weight;
            (r, if r.is_luck_boosted() { w * luck_factor } else { w })
        })
        .unzip();
    match WeightedIndex::new(&weights) {
        Ok(dist) => tiers[dist.sample(rng)],
        Err(_) => Rarity::Common,
    }
}

fn roll_stats(blueprint: &Blueprint, level: u32, rarity: Rarity, rng: &mut impl Rng) -> StatDeltas {
    let modifier = rarity.info().modifier;
    let primary = ((blueprint.base_bonus as f64 + level as f64 * LOOT_STAT_PER_LEVEL) * modifier) as u32;
    let primary = (primary as f64 * rng.gen_range(LOOT_JITTER_MIN..=LOOT_JITTER_MAX)) as u32;

    let mut stats = StatDeltas::new();
    stats.insert(blueprint.primary_stat, primary.max(1));

    let mut extra_rolls = Vec::new();
    if rarity >= Rarity::Epic {
        extra_rolls.push(SECONDARY_STAT_RATIO);
    }
    if rarity == Rarity::Mythic {
        extra_rolls.push(TERTIARY_STAT_RATIO);
    }
    for ratio in extra_rolls {
        let unused: Vec<Stat> = Stat::all()
            .into_iter()
            .filter(|s| !stats.contains_key(s))
            .collect();
        if let Some(&stat) = unused.choose(rng) {
            stats.insert(stat, ((primary as f64 * ratio) as u32).max(1));
        }
    }
    stats
}

fn loot_value(level: u32, stats: &StatDeltas, rarity: Rarity) -> u64 {
    let total: u32 = stats.values().sum();
    let value = level as f64 * LOOT_VALUE_PER_LEVEL
        + total as f64 * LOOT_VALUE_PER_STAT * rarity.info().modifier;
    (value as u64).max(1)
}

pub(crate) fn item_from_blueprint(
    blueprint: &Blueprint,
    rarity: Rarity,
    base_stats: StatDeltas,
    base_value: u64,
) -> Item {
    Item {
        name_key: blueprint.name_key.to_string(),
        gender: blueprint.gender,
        category: ItemCategory::Equipment,
        slot: Some(blueprint.slot),
        armor_type: blueprint.armor_type,
        base_stats,
        base_value,
        rarity,
        upgrade_level: 0,
        is_boss_item: false,
        effect: None,
    }
}

/// Inventory item for a potion the trader sells.
pub fn potion_item(def: &PotionDef) -> Item {
    Item {
        name_key: def.name_key.to_string(),
        gender: def.gender,
        category: ItemCategory::Consumable,
        slot: None,
        armor_type: None,
        base_stats: StatDeltas::new(),
        base_value: def.cost,
        rarity: Rarity::Common,
        upgrade_level: 0,
        is_boss_item: false,
        effect: Some(ConsumableEffect {
            pool: def.pool,
            amount: def.amount,
        }),
    }
}
