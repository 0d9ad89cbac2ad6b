//! Class templates: starting attributes, main stat, wearable armor and the
//! secondary resource pool each class spends during quests.

use super::attributes::{Attributes, Stat};
use super::derived_stats::PoolKind;
use crate::items::types::ArmorType;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CharacterClass {
    Warrior,
    Mage,
    Rogue,
}

/// Immutable per-class record.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDef {
    pub class: CharacterClass,
    pub description_key: &'static str,
    pub base_attributes: Attributes,
    pub main_stat: Stat,
    pub allowed_armor: &'static [ArmorType],
    pub secondary_pool: PoolKind,
    /// Progress multiplier applied to a quest tick when the secondary pool
    /// is empty during the action phase.
    pub exhausted_penalty: f64,
}

static CLASS_DEFS: [ClassDef; 3] = [
    ClassDef {
        class: CharacterClass::Warrior,
        description_key: "class_warrior_desc",
        base_attributes: Attributes::from_array([8, 4, 3, 4]),
        main_stat: Stat::Strength,
        allowed_armor: &[ArmorType::Chain, ArmorType::Plate],
        secondary_pool: PoolKind::Rage,
        exhausted_penalty: 0.5,
    },
    ClassDef {
        class: CharacterClass::Mage,
        description_key: "class_mage_desc",
        base_attributes: Attributes::from_array([3, 5, 8, 4]),
        main_stat: Stat::Intelligence,
        allowed_armor: &[ArmorType::Cloth],
        secondary_pool: PoolKind::Mana,
        exhausted_penalty: 0.25,
    },
    ClassDef {
        class: CharacterClass::Rogue,
        description_key: "class_rogue_desc",
        base_attributes: Attributes::from_array([4, 8, 3, 6]),
        main_stat: Stat::Agility,
        allowed_armor: &[ArmorType::Leather],
        secondary_pool: PoolKind::Energy,
        exhausted_penalty: 0.25,
    },
];

impl CharacterClass {
    pub fn all() -> [CharacterClass; 3] {
        [
            CharacterClass::Warrior,
            CharacterClass::Mage,
            CharacterClass::Rogue,
        ]
    }

    pub fn def(&self) -> &'static ClassDef {
        match self {
            CharacterClass::Warrior => &CLASS_DEFS[0],
            CharacterClass::Mage => &CLASS_DEFS[1],
            CharacterClass::Rogue => &CLASS_DEFS[2],
        }
    }

    pub fn name_key(&self) -> &'static str {
        match self {
            CharacterClass::Warrior => "warrior",
            CharacterClass::Mage => "mage",
            CharacterClass::Rogue => "rogue",
        }
    }

    pub fn can_wear(&self, armor: ArmorType) -> bool {
        self.def().allowed_armor.contains(&armor)
    }
}
