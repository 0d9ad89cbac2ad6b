//! Read-only snapshot of a session for the presentation layer.
//!
//! Everything a frontend needs to draw one frame: character sheet, pools,
//! quest progress, the arena and enough item data for tooltips. Text is
//! carried as keys.

use super::session::{GameOverCause, GameSession};
use crate::character::attributes::Stat;
use crate::character::class::CharacterClass;
use crate::character::derived_stats::PoolKind;
use crate::character::model::{Character, ResourceMap};
use crate::combat::logic::{ArenaState, BossArena, CombatEvent};
use crate::gathering::Orb;
use crate::items::types::{
    ArmorType, ConsumableEffect, EquipmentSlot, Gender, Item, Rarity, StatDeltas,
};
use crate::quest::{Quest, QuestPhase};
use crate::utils::currency::Coins;
use rand::Rng;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemView {
    pub name_key: String,
    /// Drives inflection of the rarity adjective.
    pub gender: Gender,
    pub rarity: Rarity,
    pub slot: Option<EquipmentSlot>,
    pub armor_type: Option<ArmorType>,
    /// False for armor the character's class cannot put on.
    pub wearable: bool,
    pub value: u64,
    pub stats: StatDeltas,
    pub upgrade_level: u32,
    pub max_upgrades: u32,
    pub item_score: u32,
    pub is_boss_item: bool,
    pub effect: Option<ConsumableEffect>,
    /// Would replace what is equipped in its slot.
    pub is_upgrade: bool,
}

impl ItemView {
    pub fn new(item: &Item, character: &Character) -> Self {
        Self {
            name_key: item.name_key.clone(),
            gender: item.gender,
            rarity: item.rarity,
            slot: item.slot,
            armor_type: item.armor_type,
            wearable: character.can_wear(item),
            value: item.value(),
            stats: item.current_stats(),
            upgrade_level: item.upgrade_level,
            max_upgrades: item.max_upgrades(),
            item_score: item.item_score(false),
            is_boss_item: item.is_boss_item,
            effect: item.effect,
            is_upgrade: character.is_upgrade(item),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatView {
    pub stat: Stat,
    pub base: u32,
    pub total: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PoolView {
    pub kind: PoolKind,
    pub current: u32,
    pub max: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CharacterView {
    pub name: String,
    pub class: CharacterClass,
    pub level: u32,
    pub xp: u64,
    pub xp_to_next_level: u64,
    pub copper: u64,
    pub coins: Coins,
    pub item_level: u32,
    pub stats: Vec<StatView>,
    /// Only pools with capacity: life plus the class pool.
    pub pools: Vec<PoolView>,
    pub inventory: Vec<ItemView>,
    pub max_inventory_size: usize,
    pub equipment: Vec<(EquipmentSlot, Option<ItemView>)>,
    pub resources: ResourceMap,
    pub boss_tier: usize,
    pub bosses_defeated: u32,
    pub rebirths: u32,
    pub is_immortal: bool,
}

impl CharacterView {
    pub fn new(character: &Character) -> Self {
        let total = character.total_stats();
        Self {
            name: character.name.clone(),
            class: character.class,
            level: character.level,
            xp: character.xp,
            xp_to_next_level: character.xp_to_next_level,
            copper: character.copper,
            coins: Coins::from_copper(character.copper),
            item_level: character.item_level(),
            stats: Stat::all()
                .into_iter()
                .map(|stat| StatView {
                    stat,
                    base: character.attributes.get(stat),
                    total: total.get(stat),
                })
                .collect(),
            pools: character
                .pools
                .iter()
                .filter(|(_, pool)| pool.max > 0)
                .map(|(kind, pool)| PoolView {
                    kind,
                    current: pool.current,
                    max: pool.max,
                })
                .collect(),
            inventory: character
                .inventory
                .iter()
                .map(|item| ItemView::new(item, character))
                .collect(),
            max_inventory_size: character.max_inventory_size,
            equipment: character
                .equipment
                .iter_slots()
                .map(|(slot, item)| (slot, item.as_ref().map(|i| ItemView::new(i, character))))
                .collect(),
            resources: character.resources.clone(),
            boss_tier: character.boss_tier,
            bosses_defeated: character.bosses_defeated,
            rebirths: character.rebirths,
            is_immortal: character.is_immortal,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestView {
    pub key: String,
    pub phase: QuestPhase,
    pub text_key: String,
    pub fraction: f64,
}

impl QuestView {
    pub fn new(quest: &Quest) -> Self {
        Self {
            key: quest.key.clone(),
            phase: quest.phase,
            text_key: quest.texts.for_phase(quest.phase).to_string(),
            fraction: quest.fraction(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArenaView {
    pub boss_name_key: String,
    pub tier: usize,
    pub boss_hp: u32,
    pub boss_max_hp: u32,
    pub boss_damage: (u32, u32),
    pub boss_weakened: bool,
    pub state: ArenaState,
    pub empowered: bool,
    pub defending: bool,
    pub log: Vec<CombatEvent>,
}

impl ArenaView {
    pub fn new(arena: &BossArena) -> Self {
        Self {
            boss_name_key: arena.boss.name_key.clone(),
            tier: arena.tier,
            boss_hp: arena.boss.current_hp,
            boss_max_hp: arena.boss.max_hp,
            boss_damage: arena.boss.damage,
            boss_weakened: arena.boss.weakened,
            state: arena.state(),
            empowered: arena.is_empowered(),
            defending: arena.is_defending(),
            log: arena.log().to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionView {
    pub character: CharacterView,
    pub quest: Option<QuestView>,
    pub auto_quest: bool,
    pub quest_loop_running: bool,
    /// Ticks left on the level-up dialog, if it is open.
    pub level_up_modal: Option<u32>,
    pub arena: Option<ArenaView>,
    pub boss_available: bool,
    pub orbs: Vec<Orb>,
    pub hunt_running: bool,
    pub game_over: Option<GameOverCause>,
}

impl<'c, R: Rng> GameSession<'c, R> {
    pub fn view(&self) -> SessionView {
        SessionView {
            character: CharacterView::new(self.character()),
            quest: self.quest().map(QuestView::new),
            auto_quest: self.is_auto_questing(),
            quest_loop_running: self.quest_loop_running(),
            level_up_modal: self.modal().map(|m| m.ticks_left),
            arena: self.arena().map(ArenaView::new),
            boss_available: self.boss_available(),
            orbs: self.hunt().orbs().to_vec(),
            hunt_running: self.hunt().is_running(),
            game_over: self.game_over(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::content::GameContent;
    use crate::items::generation::item_from_blueprint;

    #[test]
    fn test_fresh_session_view() {
        let content = GameContent::standard();
        let s = GameSession::with_seed(&content, Character::new("Hero", CharacterClass::Mage), 1)
            .unwrap();
        let view = s.view();
        assert_eq!(view.character.level, 1);
        assert_eq!(view.character.stats.len(), 4);
        let kinds: Vec<PoolKind> = view.character.pools.iter().map(|p| p.kind).collect();
        assert_eq!(kinds, vec![PoolKind::Life, PoolKind::Mana]);
        assert_eq!(view.character.equipment.len(), 3);
        assert!(view.quest.is_none());
        assert!(view.boss_available);
        assert!(view.game_over.is_none());
    }

    #[test]
    fn test_view_tracks_quest_and_arena() {
        let content = GameContent::standard();
        let mut s =
            GameSession::with_seed(&content, Character::new("Hero", CharacterClass::Rogue), 2)
                .unwrap();
        s.start_quest().unwrap();
        s.tick().unwrap();
        let quest = s.view().quest.unwrap();
        assert_eq!(quest.phase, QuestPhase::Travel);
        assert!(quest.fraction > 0.0);

        let mut s =
            GameSession::with_seed(&content, Character::new("Hero", CharacterClass::Rogue), 2)
                .unwrap();
        s.open_arena().unwrap();
        let view = s.view();
        let arena = view.arena.unwrap();
        assert_eq!(arena.boss_max_hp, 150);
        assert_eq!(arena.state, ArenaState::PlayerTurn);
        assert!(!view.quest_loop_running);
    }

    #[test]
    fn test_view_serializes_to_json() {
        let content = GameContent::standard();
        let s =
            GameSession::with_seed(&content, Character::new("Hero", CharacterClass::Warrior), 3)
                .unwrap();
        let json = serde_json::to_string(&s.view()).unwrap();
        assert!(json.contains("\"name\":\"Hero\""));
    }

    #[test]
    fn test_item_view_carries_gender_and_armor() {
        let content = GameContent::standard();
        let mage = Character::new("Hero", CharacterClass::Mage);
        let plate = content
            .blueprints
            .iter()
            .find(|b| b.armor_type == Some(ArmorType::Plate))
            .unwrap();
        let cloth = content
            .blueprints
            .iter()
            .find(|b| b.armor_type == Some(ArmorType::Cloth))
            .unwrap();

        let plate = item_from_blueprint(plate, Rarity::Common, StatDeltas::new(), 10);
        let cloth = item_from_blueprint(cloth, Rarity::Common, StatDeltas::new(), 10);

        let view = ItemView::new(&plate, &mage);
        assert_eq!(view.gender, plate.gender);
        assert_eq!(view.slot, plate.slot);
        assert_eq!(view.armor_type, Some(ArmorType::Plate));
        assert!(!view.wearable);

        let view = ItemView::new(&cloth, &mage);
        assert_eq!(view.armor_type, Some(ArmorType::Cloth));
        assert!(view.wearable);

        let json = serde_json::to_string(&view).unwrap();
        assert!(json.contains("\"armor_type\":\"Cloth\""));
        assert!(json.contains("\"gender\":"));
    }
}
