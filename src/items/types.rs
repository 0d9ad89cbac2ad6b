use crate::character::attributes::Stat;
use crate::character::derived_stats::PoolKind;
use crate::core::constants::{MAIN_STAT_WEIGHT, UPGRADE_VALUE_STEP};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-stat bonus granted by an item.
pub type StatDeltas = BTreeMap<Stat, u32>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EquipmentSlot {
    Weapon,
    Head,
    Chest,
}

impl EquipmentSlot {
    pub fn all() -> [EquipmentSlot; 3] {
        [EquipmentSlot::Weapon, EquipmentSlot::Head, EquipmentSlot::Chest]
    }

    pub fn name_key(&self) -> &'static str {
        match self {
            EquipmentSlot::Weapon => "slot_weapon",
            EquipmentSlot::Head => "slot_head",
            EquipmentSlot::Chest => "slot_chest",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArmorType {
    Chain,
    Plate,
    Cloth,
    Leather,
}

/// Grammatical gender of an item name, needed by languages that inflect
/// the rarity adjective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Masculine,
    Feminine,
    Neuter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemCategory {
    Equipment,
    Consumable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rarity {
    Poor,
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
    Mythic,
}

/// Static properties of a rarity tier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RarityInfo {
    pub color: &'static str,
    pub modifier: f64,
    pub min_level: u32,
    pub weight: f64,
    pub max_upgrades: u32,
}

static RARITY_TABLE: [RarityInfo; 7] = [
    RarityInfo { color: "#B0B0B0", modifier: 0.7, min_level: 1, weight: 10.0, max_upgrades: 2 },
    RarityInfo { color: "#FFFFFF", modifier: 1.0, min_level: 1, weight: 70.0, max_upgrades: 3 },
    RarityInfo { color: "#1EFF00", modifier: 1.2, min_level: 5, weight: 15.0, max_upgrades: 5 },
    RarityInfo { color: "#68AFFF", modifier: 1.5, min_level: 15, weight: 4.0, max_upgrades: 7 },
    RarityInfo { color: "#A335EE", modifier: 1.8, min_level: 30, weight: 1.0, max_upgrades: 10 },
    RarityInfo { color: "#FF8000", modifier: 2.2, min_level: 50, weight: 0.1, max_upgrades: 13 },
    RarityInfo { color: "#E5CC80", modifier: 2.7, min_level: 75, weight: 0.01, max_upgrades: 15 },
];

impl Rarity {
    pub fn all() -> [Rarity; 7] {
        [
            Rarity::Poor,
            Rarity::Common,
            Rarity::Uncommon,
            Rarity::Rare,
            Rarity::Epic,
            Rarity::Legendary,
            Rarity::Mythic,
        ]
    }

    pub fn info(&self) -> &'static RarityInfo {
        &RARITY_TABLE[*self as usize]
    }

    pub fn name_key(&self) -> &'static str {
        match self {
            Rarity::Poor => "rarity_poor",
            Rarity::Common => "rarity_common",
            Rarity::Uncommon => "rarity_uncommon",
            Rarity::Rare => "rarity_rare",
            Rarity::Epic => "rarity_epic",
            Rarity::Legendary => "rarity_legendary",
            Rarity::Mythic => "rarity_mythic",
        }
    }

    /// Luck only skews the roll toward tiers above the two lowest.
    pub fn is_luck_boosted(&self) -> bool {
        *self > Rarity::Common
    }
}

/// What a consumable does when used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumableEffect {
    pub pool: PoolKind,
    pub amount: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub name_key: String,
    pub gender: Gender,
    pub category: ItemCategory,
    pub slot: Option<EquipmentSlot>,
    #[serde(default)]
    pub armor_type: Option<ArmorType>,
    #[serde(default)]
    pub base_stats: StatDeltas,
    pub base_value: u64,
    pub rarity: Rarity,
    #[serde(default)]
    pub upgrade_level: u32,
    #[serde(default)]
    pub is_boss_item: bool,
    #[serde(default)]
    pub effect: Option<ConsumableEffect>,
}

impl Item {
    pub fn is_equipment(&self) -> bool {
        self.category == ItemCategory::Equipment
    }

    /// Base stats plus one point per upgrade level on every stat.
    pub fn current_stats(&self) -> StatDeltas {
        if !self.is_equipment() {
            return self.base_stats.clone();
        }
        self.base_stats
            .iter()
            .map(|(&stat, &value)| (stat, value + self.upgrade_level))
            .collect()
    }

    pub fn stats(&self, use_base: bool) -> StatDeltas {
        if use_base {
            self.base_stats.clone()
        } else {
            self.current_stats()
        }
    }

    pub fn value(&self) -> u64 {
        (self.base_value as f64 * (1.0 + self.upgrade_level as f64 * UPGRADE_VALUE_STEP)) as u64
    }

    pub fn max_upgrades(&self) -> u32 {
        self.rarity.info().max_upgrades
    }

    /// Sum of stat points scaled by the squared rarity modifier.
    pub fn item_score(&self, use_base: bool) -> u32 {
        if !self.is_equipment() || self.base_stats.is_empty() {
            return 0;
        }
        let total: u32 = self.stats(use_base).values().sum();
        let modifier = self.rarity.info().modifier;
        (total as f64 * modifier * modifier) as u32
    }

    /// Stat sum with the wearer's main stat counted 1.5 times.
    pub fn weighted_score(&self, main_stat: Option<Stat>) -> f64 {
        if !self.is_equipment() {
            return 0.0;
        }
        self.current_stats()
            .iter()
            .map(|(&stat, &value)| {
                if Some(stat) == main_stat {
                    value as f64 * MAIN_STAT_WEIGHT
                } else {
                    value as f64
                }
            })
            .sum()
    }

    /// Raises the upgrade level by one. Returns false without changing
    /// anything for consumables or items already at their ceiling.
    pub fn upgrade(&mut self) -> bool {
        if !self.is_equipment() || self.upgrade_level >= self.max_upgrades() {
            return false;
        }
        self.upgrade_level += 1;
        true
    }

    /// Stats the item would have after one more upgrade.
    pub fn next_level_stats(&self) -> StatDeltas {
        self.base_stats
            .iter()
            .map(|(&stat, &value)| (stat, value + self.upgrade_level + 1))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sword(rarity: Rarity, strength: u32) -> Item {
        Item {
            name_key: "sword".to_string(),
            gender: Gender::Neuter,
            category: ItemCategory::Equipment,
            slot: Some(EquipmentSlot::Weapon),
            armor_type: None,
            base_stats: BTreeMap::from([(Stat::Strength, strength)]),
            base_value: 10,
            rarity,
            upgrade_level: 0,
            is_boss_item: false,
            effect: None,
        }
    }

    fn potion() -> Item {
        Item {
            name_key: "potion_lp_small".to_string(),
            gender: Gender::Masculine,
            category: ItemCategory::Consumable,
            slot: None,
            armor_type: None,
            base_stats: StatDeltas::new(),
            base_value: 25,
            rarity: Rarity::Common,
            upgrade_level: 0,
            is_boss_item: false,
            effect: Some(ConsumableEffect {
                pool: PoolKind::Life,
                amount: 50,
            }),
        }
    }

    #[test]
    fn test_rarity_table_matches_tiers() {
        assert_eq!(Rarity::Poor.info().max_upgrades, 2);
        assert_eq!(Rarity::Mythic.info().min_level, 75);
        assert_eq!(Rarity::Epic.info().color, "#A335EE");
        assert!((Rarity::Legendary.info().modifier - 2.2).abs() < f64::EPSILON);
    }

    #[test]
    fn test_luck_boost_skips_two_lowest() {
        assert!(!Rarity::Poor.is_luck_boosted());
        assert!(!Rarity::Common.is_luck_boosted());
        assert!(Rarity::Uncommon.is_luck_boosted());
        assert!(Rarity::Mythic.is_luck_boosted());
    }

    #[test]
    fn test_upgrade_increments_every_stat() {
        let mut item = sword(Rarity::Common, 4);
        item.base_stats.insert(Stat::Luck, 1);
        assert!(item.upgrade());
        assert_eq!(item.current_stats()[&Stat::Strength], 5);
        assert_eq!(item.current_stats()[&Stat::Luck], 2);
        assert_eq!(item.base_stats[&Stat::Strength], 4);
    }

    #[test]
    fn test_upgrade_stops_at_rarity_ceiling() {
        let mut item = sword(Rarity::Poor, 4);
        assert!(item.upgrade());
        assert!(item.upgrade());
        let before = item.clone();
        assert!(!item.upgrade());
        assert_eq!(item, before);
        assert_eq!(item.upgrade_level, 2);
    }

    #[test]
    fn test_value_after_upgrades() {
        let mut item = sword(Rarity::Rare, 4);
        item.base_value = 33;
        for k in 0..=7u32 {
            assert_eq!(item.value(), (33.0 * (1.0 + k as f64 * 0.5)) as u64);
            item.upgrade();
        }
    }

    #[test]
    fn test_item_score_uses_squared_modifier() {
        let item = sword(Rarity::Rare, 10);
        // 10 * 1.5 * 1.5
        assert_eq!(item.item_score(true), 22);
    }

    #[test]
    fn test_item_score_base_ignores_upgrades() {
        let mut item = sword(Rarity::Common, 10);
        item.upgrade();
        item.upgrade();
        assert_eq!(item.item_score(true), 10);
        assert_eq!(item.item_score(false), 12);
    }

    #[test]
    fn test_consumable_scores_zero_and_cannot_upgrade() {
        let mut p = potion();
        assert_eq!(p.item_score(false), 0);
        assert_eq!(p.weighted_score(Some(Stat::Strength)), 0.0);
        assert!(!p.upgrade());
    }

    #[test]
    fn test_weighted_score_favors_main_stat() {
        let mut item = sword(Rarity::Common, 10);
        item.base_stats.insert(Stat::Luck, 4);
        assert_eq!(item.weighted_score(Some(Stat::Strength)), 19.0);
        assert_eq!(item.weighted_score(Some(Stat::Intelligence)), 14.0);
        assert_eq!(item.weighted_score(None), 14.0);
    }

    #[test]
    fn test_next_level_stats_preview() {
        let item = sword(Rarity::Common, 3);
        assert_eq!(item.next_level_stats()[&Stat::Strength], 4);
    }

    #[test]
    fn test_item_deserializes_without_newer_fields() {
        let json = r#"{
            "name_key": "staff",
            "gender": "Masculine",
            "category": "Equipment",
            "slot": "Weapon",
            "base_value": 12,
            "rarity": "Uncommon"
        }"#;
        let item: Item = serde_json::from_str(json).unwrap();
        assert_eq!(item.upgrade_level, 0);
        assert!(!item.is_boss_item);
        assert!(item.base_stats.is_empty());
        assert_eq!(item.armor_type, None);
    }
}
