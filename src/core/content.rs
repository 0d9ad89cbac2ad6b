//! Static game content: item blueprints, the boss ladder, quests, flavor
//! text keys and the trader's potion stock.
//!
//! A [`GameContent`] is built once with [`GameContent::standard`] and handed
//! by reference to whatever needs it. Text is referenced by key only; turning
//! keys into words is the presentation layer's job.

use crate::character::attributes::Stat;
use crate::character::class::CharacterClass;
use crate::character::derived_stats::PoolKind;
use crate::core::constants::DEFAULT_QUEST_DURATION;
use crate::error::ContentError;
use crate::items::types::{ArmorType, EquipmentSlot, Gender};

/// Template for a piece of equipment.
#[derive(Debug, Clone, PartialEq)]
pub struct Blueprint {
    pub name_key: &'static str,
    pub gender: Gender,
    pub slot: EquipmentSlot,
    pub primary_stat: Stat,
    pub base_bonus: u32,
    pub armor_type: Option<ArmorType>,
}

impl Blueprint {
    /// Whether a class with `main_stat` and this armor list would pick this
    /// blueprint for a boss reward.
    pub fn suits(&self, main_stat: Stat, allowed_armor: &[ArmorType]) -> bool {
        if self.primary_stat != main_stat {
            return false;
        }
        match self.armor_type {
            Some(armor) => allowed_armor.contains(&armor),
            None => self.slot == EquipmentSlot::Weapon,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BossTier {
    pub name_key: &'static str,
    pub hp: u32,
    pub damage: (u32, u32),
    pub required_item_level: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuestTemplate {
    pub key: &'static str,
    pub duration: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PotionDef {
    pub name_key: &'static str,
    pub gender: Gender,
    pub level_requirement: u32,
    pub pool: PoolKind,
    pub amount: u32,
    pub cost: u64,
}

/// Text keys for the three quest phases.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PhaseTexts {
    pub locations: Vec<&'static str>,
    pub actions: Vec<&'static str>,
    pub returns: Vec<&'static str>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FlavorEvents {
    pub class: CharacterClass,
    pub keys: Vec<&'static str>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GameContent {
    pub blueprints: Vec<Blueprint>,
    pub boss_tiers: Vec<BossTier>,
    pub quests: Vec<QuestTemplate>,
    pub phase_texts: PhaseTexts,
    pub flavor_events: Vec<FlavorEvents>,
    pub potions: Vec<PotionDef>,
}

impl GameContent {
    pub fn standard() -> Self {
        Self {
            blueprints: standard_blueprints(),
            boss_tiers: standard_boss_tiers(),
            quests: vec![
                QuestTemplate { key: "quest_slimes", duration: DEFAULT_QUEST_DURATION },
                QuestTemplate { key: "quest_iron_ore", duration: DEFAULT_QUEST_DURATION },
                QuestTemplate { key: "quest_princess", duration: DEFAULT_QUEST_DURATION },
            ],
            phase_texts: PhaseTexts {
                locations: vec![
                    "location_dark_forest",
                    "location_goblin_cave",
                    "location_old_ruins",
                    "location_misty_swamp",
                    "location_mountain_pass",
                ],
                actions: vec!["action_fight", "action_search", "action_explore"],
                returns: vec!["return_town", "return_home", "return_tavern"],
            },
            flavor_events: standard_flavor_events(),
            potions: standard_potions(),
        }
    }

    /// Checks that every table is populated and that each class can receive
    /// a boss reward in every slot.
    pub fn validate(&self) -> Result<(), ContentError> {
        for slot in EquipmentSlot::all() {
            if !self.blueprints.iter().any(|b| b.slot == slot) {
                return Err(ContentError::EmptySlot(slot));
            }
        }
        for class in CharacterClass::all() {
            let def = class.def();
            for slot in EquipmentSlot::all() {
                let covered = self
                    .blueprints_for_slot(slot)
                    .any(|b| b.suits(def.main_stat, def.allowed_armor));
                if !covered {
                    return Err(ContentError::ClassNotCovered { class, slot });
                }
            }
            if self.flavor_keys(class).is_empty() {
                return Err(ContentError::NoFlavorEvents(class));
            }
        }
        if self.boss_tiers.is_empty() {
            return Err(ContentError::EmptyBossLadder);
        }
        for (i, tier) in self.boss_tiers.iter().enumerate() {
            if tier.damage.0 > tier.damage.1 {
                return Err(ContentError::InvalidDamageRange(i));
            }
            if i > 0 && tier.required_item_level < self.boss_tiers[i - 1].required_item_level {
                return Err(ContentError::BossLadderOutOfOrder(i));
            }
        }
        if self.quests.is_empty() {
            return Err(ContentError::NoQuests);
        }
        let texts = &self.phase_texts;
        if texts.locations.is_empty() || texts.actions.is_empty() || texts.returns.is_empty() {
            return Err(ContentError::NoPhaseTexts);
        }
        Ok(())
    }

    pub fn blueprints_for_slot(&self, slot: EquipmentSlot) -> impl Iterator<Item = &Blueprint> {
        self.blueprints.iter().filter(move |b| b.slot == slot)
    }

    pub fn boss_tier(&self, tier: usize) -> Option<&BossTier> {
        self.boss_tiers.get(tier)
    }

    pub fn flavor_keys(&self, class: CharacterClass) -> &[&'static str] {
        self.flavor_events
            .iter()
            .find(|f| f.class == class)
            .map(|f| f.keys.as_slice())
            .unwrap_or(&[])
    }
}

impl Default for GameContent {
    fn default() -> Self {
        Self::standard()
    }
}

fn standard_blueprints() -> Vec<Blueprint> {
    use ArmorType::*;
    use EquipmentSlot::*;
    use Gender::*;
    let bp = |name_key, gender, slot, primary_stat, base_bonus, armor_type| Blueprint {
        name_key,
        gender,
        slot,
        primary_stat,
        base_bonus,
        armor_type,
    };
    vec![
        bp("sword", Neuter, Weapon, Stat::Strength, 2, None),
        bp("staff", Masculine, Weapon, Stat::Intelligence, 2, None),
        bp("dagger", Masculine, Weapon, Stat::Agility, 2, None),
        bp("chain_coif", Feminine, Head, Stat::Strength, 1, Some(Chain)),
        bp("cloth_hat", Masculine, Head, Stat::Intelligence, 1, Some(Cloth)),
        bp("leather_hood", Feminine, Head, Stat::Agility, 1, Some(Leather)),
        bp("plate_armor", Masculine, Chest, Stat::Strength, 3, Some(Plate)),
        bp("cloth_robe", Feminine, Chest, Stat::Intelligence, 3, Some(Cloth)),
        bp("leather_jerkin", Neuter, Chest, Stat::Agility, 2, Some(Leather)),
    ]
}

fn standard_boss_tiers() -> Vec<BossTier> {
    let tier = |name_key, hp, damage, required_item_level| BossTier {
        name_key,
        hp,
        damage,
        required_item_level,
    };
    vec![
        tier("boss_goblin_king", 150, (10, 20), 0),
        tier("boss_stone_golem", 250, (15, 25), 20),
        tier("boss_chimera_matriarch", 400, (25, 40), 45),
        tier("boss_necromancer_lord", 650, (40, 60), 75),
        tier("boss_ice_giant_chieftain", 1000, (60, 80), 110),
        tier("boss_ancient_dragon", 1500, (80, 120), 150),
    ]
}

fn standard_flavor_events() -> Vec<FlavorEvents> {
    vec![
        FlavorEvents {
            class: CharacterClass::Warrior,
            keys: vec![
                "flavor_warrior_sharpen",
                "flavor_warrior_battle_cry",
                "flavor_warrior_shield_dent",
                "flavor_warrior_arm_wrestle",
                "flavor_warrior_boulder",
                "flavor_warrior_scar",
            ],
        },
        FlavorEvents {
            class: CharacterClass::Mage,
            keys: vec![
                "flavor_mage_rune",
                "flavor_mage_spellbook",
                "flavor_mage_familiar",
                "flavor_mage_ley_line",
                "flavor_mage_fizzle",
                "flavor_mage_stars",
            ],
        },
        FlavorEvents {
            class: CharacterClass::Rogue,
            keys: vec![
                "flavor_rogue_pickpocket",
                "flavor_rogue_shadows",
                "flavor_rogue_lockpick",
                "flavor_rogue_trap",
                "flavor_rogue_rumor",
                "flavor_rogue_dice",
            ],
        },
    ]
}

fn standard_potions() -> Vec<PotionDef> {
    use Gender::*;
    let potion = |name_key, gender, level_requirement, pool, amount, cost| PotionDef {
        name_key,
        gender,
        level_requirement,
        pool,
        amount,
        cost,
    };
    vec![
        potion("potion_lp_small", Masculine, 1, PoolKind::Life, 50, 25),
        potion("potion_lp_medium", Masculine, 10, PoolKind::Life, 150, 100),
        potion("potion_lp_large", Masculine, 25, PoolKind::Life, 500, 500),
        potion("potion_lp_huge", Masculine, 50, PoolKind::Life, 2000, 2500),
        potion("potion_mp_small", Masculine, 1, PoolKind::Mana, 30, 35),
        potion("potion_mp_medium", Masculine, 10, PoolKind::Mana, 100, 120),
        potion("potion_mp_large", Masculine, 25, PoolKind::Mana, 400, 600),
        potion("potion_mp_huge", Masculine, 50, PoolKind::Mana, 1500, 3000),
        potion("potion_energy_small", Masculine, 1, PoolKind::Energy, 30, 35),
        potion("potion_energy_medium", Masculine, 10, PoolKind::Energy, 100, 120),
        potion("potion_rage_small", Masculine, 1, PoolKind::Rage, 20, 40),
        potion("potion_rage_medium", Masculine, 10, PoolKind::Rage, 75, 130),
    ]
}
