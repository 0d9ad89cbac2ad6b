use crate::character::model::{Character, Resource, ResourceMap};
use crate::core::constants::{GEM_FREE_LEVELS, GEM_PER_LEVEL, IRON_ORE_PER_LEVEL};
use crate::error::Rejection;
use crate::items::types::{EquipmentSlot, Item, StatDeltas};
use serde::{Deserialize, Serialize};

/// Resources needed to reach `target_level`.
///
/// Iron ore scales with every level; gems start once the target passes
/// the free levels.
pub fn upgrade_cost(target_level: u32) -> ResourceMap {
    let mut cost = ResourceMap::new();
    cost.insert(Resource::IronOre, IRON_ORE_PER_LEVEL * target_level);
    if target_level > GEM_FREE_LEVELS {
        cost.insert(Resource::Gem, GEM_PER_LEVEL * (target_level - GEM_FREE_LEVELS));
    }
    cost
}

/// Cost of the item's next upgrade, or None for consumables.
pub fn next_upgrade_cost(item: &Item) -> Option<ResourceMap> {
    item.is_equipment()
        .then(|| upgrade_cost(item.upgrade_level + 1))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpgradeReceipt {
    pub slot: EquipmentSlot,
    pub name_key: String,
    pub new_level: u32,
    pub cost: ResourceMap,
}

/// What the blacksmith shows for the item in a slot before upgrading it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpgradePreview {
    pub slot: EquipmentSlot,
    pub name_key: String,
    pub current_level: u32,
    pub max_level: u32,
    pub current_stats: StatDeltas,
    pub next_stats: StatDeltas,
    pub cost: ResourceMap,
    pub affordable: bool,
}

pub fn preview_upgrade(
    character: &Character,
    slot: EquipmentSlot,
) -> Result<UpgradePreview, Rejection> {
    let item = character
        .equipment
        .get(slot)
        .as_ref()
        .ok_or(Rejection::EmptySlot(slot))?;
    let cost = next_upgrade_cost(item).ok_or(Rejection::WrongItemType)?;
    if item.upgrade_level >= item.max_upgrades() {
        return Err(Rejection::MaxUpgradeLevel);
    }
    Ok(UpgradePreview {
        slot,
        name_key: item.name_key.clone(),
        current_level: item.upgrade_level,
        max_level: item.max_upgrades(),
        current_stats: item.current_stats(),
        next_stats: item.next_level_stats(),
        affordable: character.has_resources(&cost),
        cost,
    })
}

/// Upgrades the item equipped in `slot`. Resources are only spent when the
/// upgrade goes through.
pub fn upgrade_equipped(
    character: &mut Character,
    slot: EquipmentSlot,
) -> Result<UpgradeReceipt, Rejection> {
    let item = character
        .equipment
        .get(slot)
        .as_ref()
        .ok_or(Rejection::EmptySlot(slot))?;
    let cost = next_upgrade_cost(item).ok_or(Rejection::WrongItemType)?;
    if !character.has_resources(&cost) {
        return Err(Rejection::InsufficientResources);
    }

    let item = character
        .equipment
        .get_mut(slot)
        .as_mut()
        .ok_or(Rejection::EmptySlot(slot))?;
    if !item.upgrade() {
        return Err(Rejection::MaxUpgradeLevel);
    }
    let receipt = UpgradeReceipt {
        slot,
        name_key: item.name_key.clone(),
        new_level: item.upgrade_level,
        cost,
    };

    character.remove_resources(&receipt.cost);
    character.update_derived_stats(false);
    log::info!(
        "{} upgraded {} to +{}",
        character.name,
        receipt.name_key,
        receipt.new_level
    );
    Ok(receipt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::attributes::Stat;
    use crate::character::class::CharacterClass;
    use crate::items::types::{Gender, ItemCategory, Rarity, StatDeltas};

    fn sword(rarity: Rarity, upgrade_level: u32) -> Item {
        Item {
            name_key: "sword".to_string(),
            gender: Gender::Neuter,
            category: ItemCategory::Equipment,
            slot: Some(EquipmentSlot::Weapon),
            armor_type: None,
            base_stats: StatDeltas::from([(Stat::Strength, 4)]),
            base_value: 40,
            rarity,
            upgrade_level,
            is_boss_item: false,
            effect: None,
        }
    }

    fn armed(item: Item) -> Character {
        let mut c = Character::new("Smith", CharacterClass::Warrior);
        c.equipment.replace(EquipmentSlot::Weapon, Some(item));
        c.update_derived_stats(true);
        c
    }

    #[test]
    fn test_cost_table() {
        assert_eq!(upgrade_cost(1), ResourceMap::from([(Resource::IronOre, 5)]));
        assert_eq!(upgrade_cost(5), ResourceMap::from([(Resource::IronOre, 25)]));
        assert_eq!(
            upgrade_cost(6),
            ResourceMap::from([(Resource::IronOre, 30), (Resource::Gem, 2)])
        );
        assert_eq!(
            upgrade_cost(9),
            ResourceMap::from([(Resource::IronOre, 45), (Resource::Gem, 8)])
        );
    }

    #[test]
    fn test_upgrade_spends_resources_and_raises_stats() {
        let mut c = armed(sword(Rarity::Common, 0));
        c.add_resource(Resource::IronOre, 7);
        let max_before = c.pools.life.max;
        let receipt = upgrade_equipped(&mut c, EquipmentSlot::Weapon).unwrap();
        assert_eq!(receipt.new_level, 1);
        assert_eq!(c.resource(Resource::IronOre), 2);
        assert_eq!(c.total_stat(Stat::Strength), 13);
        assert_eq!(c.pools.life.max, max_before + 5);
    }

    #[test]
    fn test_affordability_checked_before_max_level() {
        let mut c = armed(sword(Rarity::Poor, 2));
        assert_eq!(
            upgrade_equipped(&mut c, EquipmentSlot::Weapon),
            Err(Rejection::InsufficientResources)
        );
        c.add_resource(Resource::IronOre, 100);
        assert_eq!(
            upgrade_equipped(&mut c, EquipmentSlot::Weapon),
            Err(Rejection::MaxUpgradeLevel)
        );
        assert_eq!(c.resource(Resource::IronOre), 100);
    }

    #[test]
    fn test_exact_resources_are_enough() {
        let mut c = armed(sword(Rarity::Rare, 5));
        c.add_resource(Resource::IronOre, 30);
        c.add_resource(Resource::Gem, 2);
        upgrade_equipped(&mut c, EquipmentSlot::Weapon).unwrap();
        assert!(c.resources.is_empty());
    }

    #[test]
    fn test_preview_matches_upgrade() {
        let mut c = armed(sword(Rarity::Uncommon, 1));
        let preview = preview_upgrade(&c, EquipmentSlot::Weapon).unwrap();
        assert_eq!(preview.current_level, 1);
        assert_eq!(preview.current_stats[&Stat::Strength], 5);
        assert_eq!(preview.next_stats[&Stat::Strength], 6);
        assert_eq!(preview.cost, upgrade_cost(2));
        assert!(!preview.affordable);

        c.add_resource(Resource::IronOre, 10);
        assert!(preview_upgrade(&c, EquipmentSlot::Weapon).unwrap().affordable);
        upgrade_equipped(&mut c, EquipmentSlot::Weapon).unwrap();
        let weapon = c.equipment.get(EquipmentSlot::Weapon).as_ref().unwrap();
        assert_eq!(weapon.current_stats(), preview.next_stats);
    }

    #[test]
    fn test_preview_at_ceiling_is_rejected() {
        let c = armed(sword(Rarity::Poor, 2));
        assert_eq!(
            preview_upgrade(&c, EquipmentSlot::Weapon),
            Err(Rejection::MaxUpgradeLevel)
        );
        let empty = Character::new("Smith", CharacterClass::Rogue);
        assert_eq!(
            preview_upgrade(&empty, EquipmentSlot::Chest),
            Err(Rejection::EmptySlot(EquipmentSlot::Chest))
        );
    }

    #[test]
    fn test_empty_slot_rejected() {
        let mut c = Character::new("Smith", CharacterClass::Mage);
        assert_eq!(
            upgrade_equipped(&mut c, EquipmentSlot::Head),
            Err(Rejection::EmptySlot(EquipmentSlot::Head))
        );
    }

    #[test]
    fn test_upgrade_level_never_exceeds_ceiling() {
        let mut c = armed(sword(Rarity::Common, 0));
        c.add_resource(Resource::IronOre, 1000);
        c.add_resource(Resource::Gem, 1000);
        while upgrade_equipped(&mut c, EquipmentSlot::Weapon).is_ok() {}
        let weapon = c.equipment.get(EquipmentSlot::Weapon).as_ref().unwrap();
        assert_eq!(weapon.upgrade_level, weapon.max_upgrades());
        assert_eq!(weapon.value(), 100);
    }
}
