//! Integration test: trader and blacksmith economy
//!
//! Tests the town loop a player runs between quests: selling loot,
//! expanding the inventory up to the auto-sell threshold, buying potions
//! and upgrading equipped gear with gathered resources.

use chronicle::character::cheats::Cheat;
use chronicle::character::class::CharacterClass;
use chronicle::character::derived_stats::PoolKind;
use chronicle::character::model::{Character, LootStatus, Notification, Resource, Unlock};
use chronicle::core::constants::AUTO_SELL_INVENTORY_SIZE;
use chronicle::core::content::GameContent;
use chronicle::core::session::GameSession;
use chronicle::core::tick::TickEvent;
use chronicle::error::Rejection;
use chronicle::items::generation::LootGenerator;
use chronicle::items::types::{EquipmentSlot, Item, Rarity};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn item_for_slot(content: &GameContent, slot: EquipmentSlot, seed: u64) -> Item {
    let loot = LootGenerator::new(content);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    loop {
        let item = loot.generate_item_for_level(10, 0, &mut rng).unwrap();
        if item.slot == Some(slot) {
            return item;
        }
    }
}

fn armed_warrior(content: &GameContent) -> Character {
    let mut character = Character::new("Smith", CharacterClass::Warrior);
    let mut weapon = item_for_slot(content, EquipmentSlot::Weapon, 1);
    weapon.rarity = Rarity::Epic;
    character.inventory.push(weapon);
    character.equip(0, false).unwrap();
    character
}

// =============================================================================
// Trader
// =============================================================================

#[test]
fn test_inventory_expansion_reaches_auto_sell() {
    let content = GameContent::standard();
    let mut character = Character::new("Merchant", CharacterClass::Rogue);
    character.copper = 500_000;
    let mut session = GameSession::with_seed(&content, character, 1).unwrap();

    let mut expansions = Vec::new();
    while session.character().max_inventory_size < AUTO_SELL_INVENTORY_SIZE {
        expansions.push(session.buy_inventory_upgrade().unwrap());
    }

    assert_eq!(expansions.len(), 8);
    assert_eq!(expansions[0].paid, 1000);
    assert_eq!(expansions[1].paid, 1800);
    assert_eq!(expansions[2].paid, 3240);
    assert_eq!(expansions.last().unwrap().new_size, 50);

    let events = session.tick().unwrap().events;
    assert_eq!(
        events
            .iter()
            .filter(|e| **e == TickEvent::Notification(Notification::Unlocked(Unlock::AutoSell)))
            .count(),
        1
    );

    // One more purchase does not repeat the notification.
    session.buy_inventory_upgrade().unwrap();
    assert!(session.tick().unwrap().events.is_empty());
}

#[test]
fn test_expansion_refused_without_funds() {
    let content = GameContent::standard();
    let mut session =
        GameSession::with_seed(&content, Character::new("Poor", CharacterClass::Mage), 2).unwrap();
    assert_eq!(
        session.buy_inventory_upgrade(),
        Err(Rejection::InsufficientFunds {
            needed: 1000,
            available: 0
        })
    );
    assert_eq!(session.character().max_inventory_size, 10);
}

#[test]
fn test_auto_sell_after_threshold() {
    let content = GameContent::standard();
    let mut character = armed_warrior(&content);
    character.max_inventory_size = AUTO_SELL_INVENTORY_SIZE;
    let mut junk = item_for_slot(&content, EquipmentSlot::Weapon, 2);
    junk.rarity = Rarity::Poor;
    junk.base_stats.clear();
    let value = junk.value();
    let copper = character.copper;

    let outcome = character.add_loot(10, Some(junk));
    assert_eq!(outcome.status, LootStatus::AutoSold);
    assert!(character.inventory.is_empty());
    assert_eq!(character.copper, copper + 10 + value);
}

#[test]
fn test_sell_all_junk_keeps_upgrades_and_potions() {
    let content = GameContent::standard();
    let mut character = armed_warrior(&content);
    character.copper = 100;
    let mut session = GameSession::with_seed(&content, character, 3).unwrap();
    session.buy_potion(0).unwrap();

    let mut character = session.into_character();
    let mut junk = item_for_slot(&content, EquipmentSlot::Weapon, 4);
    junk.base_stats.clear();
    character.inventory.push(junk);
    let mut session = GameSession::with_seed(&content, character, 3).unwrap();

    let sale = session.sell_all_junk().unwrap();
    assert_eq!(sale.count, 1);
    let inventory = &session.character().inventory;
    assert_eq!(inventory.len(), 1);
    assert!(inventory[0].effect.is_some());

    let again = session.sell_all_junk().unwrap();
    assert_eq!((again.count, again.copper), (0, 0));
}

#[test]
fn test_potions_follow_class_pool() {
    let content = GameContent::standard();
    let session =
        GameSession::with_seed(&content, Character::new("Seer", CharacterClass::Mage), 4).unwrap();
    let pools: Vec<PoolKind> = session.potions_for_sale().iter().map(|p| p.pool).collect();
    assert!(pools.contains(&PoolKind::Life));
    assert!(pools.contains(&PoolKind::Mana));
    assert!(!pools.contains(&PoolKind::Rage));
    assert!(!pools.contains(&PoolKind::Energy));
    // Only level-1 potions are on offer to a fresh character.
    assert_eq!(pools.len(), 2);
}

#[test]
fn test_bought_potion_restores_life() {
    let content = GameContent::standard();
    let mut character = Character::new("Patient", CharacterClass::Warrior);
    character.copper = 25;
    character.pools.life.current = 10;
    let mut session = GameSession::with_seed(&content, character, 5).unwrap();

    session.buy_potion(0).unwrap();
    assert_eq!(session.character().copper, 0);
    assert!(matches!(
        session.buy_potion(0),
        Err(Rejection::InsufficientFunds { needed: 25, .. })
    ));

    let used = session.use_item(0).unwrap();
    assert_eq!(used.pool, PoolKind::Life);
    assert_eq!(used.restored, 50);
    assert_eq!(session.character().pools.life.current, 60);
    assert!(session.character().inventory.is_empty());
}

// =============================================================================
// Blacksmith
// =============================================================================

#[test]
fn test_upgrade_path_needs_gems_after_level_five() {
    let content = GameContent::standard();
    let mut session = GameSession::with_seed(&content, armed_warrior(&content), 6).unwrap();
    session.apply_cheat(Cheat::GrantResources);

    for level in 1..=5 {
        let receipt = session.upgrade_item(EquipmentSlot::Weapon).unwrap();
        assert_eq!(receipt.new_level, level);
        assert!(!receipt.cost.contains_key(&Resource::Gem));
    }
    assert_eq!(session.character().resource(Resource::IronOre), 25);
    assert_eq!(session.character().resource(Resource::Gem), 100);

    // Level 6 needs 30 ore.
    assert_eq!(
        session.upgrade_item(EquipmentSlot::Weapon),
        Err(Rejection::InsufficientResources)
    );

    session.apply_cheat(Cheat::GrantResources);
    let receipt = session.upgrade_item(EquipmentSlot::Weapon).unwrap();
    assert_eq!(receipt.new_level, 6);
    assert_eq!(receipt.cost.get(&Resource::Gem), Some(&2));
    assert_eq!(session.character().resource(Resource::IronOre), 95);
    assert_eq!(session.character().resource(Resource::Gem), 198);
}

#[test]
fn test_upgrade_stops_at_rarity_cap() {
    let content = GameContent::standard();
    let mut character = armed_warrior(&content);
    character.add_resource(Resource::IronOre, 10_000);
    character.add_resource(Resource::Gem, 10_000);
    let mut session = GameSession::with_seed(&content, character, 7).unwrap();

    let mut upgrades = 0;
    while session.upgrade_item(EquipmentSlot::Weapon).is_ok() {
        upgrades += 1;
    }
    assert_eq!(upgrades, Rarity::Epic.info().max_upgrades);
    assert_eq!(
        session.upgrade_item(EquipmentSlot::Weapon),
        Err(Rejection::MaxUpgradeLevel)
    );
}

#[test]
fn test_upgrades_raise_item_level_but_not_boss_scaling() {
    let content = GameContent::standard();
    let mut session = GameSession::with_seed(&content, armed_warrior(&content), 8).unwrap();
    let base_before = session.character().base_item_level();
    let level_before = session.character().item_level();
    session.apply_cheat(Cheat::GrantResources);
    session.upgrade_item(EquipmentSlot::Weapon).unwrap();
    session.upgrade_item(EquipmentSlot::Weapon).unwrap();

    assert!(session.character().item_level() > level_before);
    assert_eq!(session.character().base_item_level(), base_before);
}

#[test]
fn test_blacksmith_refusals() {
    let content = GameContent::standard();
    let mut session = GameSession::with_seed(&content, armed_warrior(&content), 9).unwrap();
    assert_eq!(
        session.upgrade_item(EquipmentSlot::Head),
        Err(Rejection::EmptySlot(EquipmentSlot::Head))
    );

    session.apply_cheat(Cheat::GrantResources);
    session.start_quest().unwrap();
    assert_eq!(
        session.upgrade_item(EquipmentSlot::Weapon),
        Err(Rejection::QuestActive)
    );
    // Looking at the next level is still allowed while away.
    let preview = session.upgrade_preview(EquipmentSlot::Weapon).unwrap();
    assert_eq!(preview.current_level, 0);
    assert!(preview.affordable);
    assert_eq!(session.sell_all_junk().err(), Some(Rejection::QuestActive));
}
