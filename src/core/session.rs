//! The game session: one character, its RNG and everything that is running.
//!
//! A host drives the session by calling [`GameSession::tick`] every
//! [`TICK_INTERVAL_MS`](crate::core::constants::TICK_INTERVAL_MS) and by
//! forwarding player commands to the methods below. Commands that are
//! refused return a [`Rejection`] and leave the session untouched.

use super::constants::*;
use super::content::{GameContent, PotionDef};
use super::tick::TickEvent;
use crate::blacksmith::{
    preview_upgrade, upgrade_equipped, UpgradePreview, UpgradeReceipt,
};
use crate::character::cheats::Cheat;
use crate::character::model::{Character, ItemUsed, Resource};
use crate::character::progression::{LevelUp, RebirthSummary};
use crate::combat::logic::{ArenaState, BossArena, CombatEvent, FightOutcome};
use crate::error::{ActionError, EngineError, Rejection};
use crate::gathering::ResourceHunt;
use crate::items::generation::LootGenerator;
use crate::items::types::EquipmentSlot;
use crate::quest::Quest;
use crate::trader::{self, InventoryExpansion, JunkSale};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOverCause {
    /// Killed by a quest. Permanent.
    Quest,
    /// Killed by a boss. The character can be reborn.
    Boss,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AutoQuestStop {
    InventoryFull,
    LowHealth,
}

/// Countdown dialog shown after a level-up. The quest loop waits for it.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelUpModal {
    pub level_ups: Vec<LevelUp>,
    pub ticks_left: u32,
}

pub struct GameSession<'c, R = ChaCha8Rng> {
    pub(super) content: &'c GameContent,
    pub(super) character: Character,
    pub(super) rng: R,
    pub(super) quest: Option<Quest>,
    pub(super) auto_quest: bool,
    pub(super) auto_quest_countdown: Option<u32>,
    pub(super) modal: Option<LevelUpModal>,
    pub(super) arena: Option<BossArena>,
    pub(super) boss_turn_countdown: u32,
    pub(super) hunt: ResourceHunt,
    pub(super) game_over: Option<GameOverCause>,
    pub(super) pending: Vec<TickEvent>,
    pub(super) ticks: u64,
}

impl<'c> GameSession<'c, ChaCha8Rng> {
    pub fn with_seed(
        content: &'c GameContent,
        character: Character,
        seed: u64,
    ) -> Result<Self, EngineError> {
        Self::new(content, character, ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<'c, R: Rng> GameSession<'c, R> {
    /// Starts a session over `content`, refusing tables that fail
    /// [`GameContent::validate`].
    pub fn new(
        content: &'c GameContent,
        character: Character,
        rng: R,
    ) -> Result<Self, EngineError> {
        if let Err(e) = content.validate() {
            log::error!("refusing invalid game content: {}", e);
            return Err(e.into());
        }
        Ok(Self {
            content,
            character,
            rng,
            quest: None,
            auto_quest: false,
            auto_quest_countdown: None,
            modal: None,
            arena: None,
            boss_turn_countdown: 0,
            hunt: ResourceHunt::new(),
            game_over: None,
            pending: Vec::new(),
            ticks: 0,
        })
    }

    pub fn content(&self) -> &'c GameContent {
        self.content
    }

    pub fn character(&self) -> &Character {
        &self.character
    }

    pub fn into_character(self) -> Character {
        self.character
    }

    pub fn quest(&self) -> Option<&Quest> {
        self.quest.as_ref()
    }

    pub fn arena(&self) -> Option<&BossArena> {
        self.arena.as_ref()
    }

    pub fn modal(&self) -> Option<&LevelUpModal> {
        self.modal.as_ref()
    }

    pub fn hunt(&self) -> &ResourceHunt {
        &self.hunt
    }

    pub fn is_auto_questing(&self) -> bool {
        self.auto_quest
    }

    pub fn game_over(&self) -> Option<GameOverCause> {
        self.game_over
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// The quest loop only advances while nothing blocks it.
    pub fn quest_loop_running(&self) -> bool {
        self.quest.is_some() && !self.quest_loop_blocked()
    }

    pub(super) fn quest_loop_blocked(&self) -> bool {
        self.modal.is_some() || self.arena.is_some() || self.game_over.is_some()
    }

    fn ensure_alive(&self) -> Result<(), Rejection> {
        match self.game_over {
            Some(_) => Err(Rejection::SessionOver),
            None => Ok(()),
        }
    }

    /// Town actions (trader, blacksmith) are closed while questing or fighting.
    fn ensure_in_town(&self) -> Result<(), Rejection> {
        self.ensure_alive()?;
        if self.quest.is_some() {
            return Err(Rejection::QuestActive);
        }
        if self.arena.is_some() {
            return Err(Rejection::BossUnavailable);
        }
        Ok(())
    }

    // ── Quests ─────────────────────────────────────────────────

    pub fn start_quest(&mut self) -> Result<(), ActionError> {
        self.ensure_alive()?;
        if self.quest.is_some() {
            return Err(Rejection::QuestActive.into());
        }
        if self.character.inventory_full() {
            if self.auto_quest {
                self.stop_auto_quest(AutoQuestStop::InventoryFull);
            }
            return Err(Rejection::InventoryFull.into());
        }

        let quest = Quest::random(self.content, &mut self.rng).map_err(EngineError::from)?;
        log::info!("{} set out on {}", self.character.name, quest.key);
        self.pending.push(TickEvent::QuestStarted {
            key: quest.key.clone(),
            text_key: quest.texts.location_key.clone(),
        });
        self.auto_quest_countdown = None;
        self.quest = Some(quest);
        Ok(())
    }

    /// Turns auto-questing on or off. Turning it on starts a quest right away
    /// unless one is already running.
    pub fn set_auto_quest(&mut self, enabled: bool) -> Result<(), ActionError> {
        self.ensure_alive()?;
        self.auto_quest = enabled;
        self.auto_quest_countdown = None;
        if enabled && self.quest.is_none() {
            self.start_quest()?;
        }
        Ok(())
    }

    pub(super) fn stop_auto_quest(&mut self, reason: AutoQuestStop) {
        self.auto_quest = false;
        self.auto_quest_countdown = None;
        log::info!("auto-quest stopped: {:?}", reason);
        self.pending.push(TickEvent::AutoQuestStopped(reason));
    }

    /// Closes the level-up dialog before its countdown runs out.
    pub fn acknowledge_modal(&mut self) -> bool {
        if self.modal.take().is_some() {
            self.pending.push(TickEvent::LevelUpModalClosed);
            true
        } else {
            false
        }
    }

    // ── Boss arena ─────────────────────────────────────────────

    /// The next boss can be fought when no quest is running, the ladder is
    /// not exhausted and the character's item level meets the requirement.
    pub fn boss_available(&self) -> bool {
        if self.game_over.is_some() || self.quest.is_some() || self.arena.is_some() {
            return false;
        }
        self.content
            .boss_tier(self.character.boss_tier)
            .map_or(false, |tier| self.character.item_level() >= tier.required_item_level)
    }

    pub fn open_arena(&mut self) -> Result<&BossArena, Rejection> {
        self.ensure_alive()?;
        if !self.boss_available() {
            return Err(Rejection::BossUnavailable);
        }
        let tier_index = self.character.boss_tier;
        let tier = self
            .content
            .boss_tier(tier_index)
            .ok_or(Rejection::BossUnavailable)?;
        let arena = BossArena::new(tier_index, tier, &self.character);
        log::info!(
            "{} challenges {} ({} HP)",
            self.character.name,
            arena.boss.name_key,
            arena.boss.max_hp
        );
        self.boss_turn_countdown = 0;
        Ok(self.arena.insert(arena))
    }

    pub fn arena_attack(&mut self) -> Result<Vec<CombatEvent>, ActionError> {
        let arena = self.arena.as_mut().ok_or(Rejection::NoActiveFight)?;
        let loot = LootGenerator::new(self.content);
        let events = arena.player_attack(&mut self.character, &loot, &mut self.rng)?;
        self.after_player_action();
        Ok(events)
    }

    pub fn arena_defend(&mut self) -> Result<Vec<CombatEvent>, ActionError> {
        let arena = self.arena.as_mut().ok_or(Rejection::NoActiveFight)?;
        let loot = LootGenerator::new(self.content);
        let events = arena.player_defend(&mut self.character, &loot, &mut self.rng)?;
        self.after_player_action();
        Ok(events)
    }

    fn after_player_action(&mut self) {
        if self
            .arena
            .as_ref()
            .map_or(false, |a| a.state() == ArenaState::BossTurn)
        {
            self.boss_turn_countdown = ARENA_BOSS_TURN_DELAY_TICKS;
        }
    }

    /// Leaves the arena. An unresolved fight is forfeited and counts as a
    /// death by boss.
    pub fn close_arena(&mut self) -> Result<FightOutcome, Rejection> {
        let mut arena = self.arena.take().ok_or(Rejection::NoActiveFight)?;
        if let Some(event) = arena.forfeit(&mut self.character) {
            log::info!("{} fled from {}", self.character.name, arena.boss.name_key);
            self.pending.push(TickEvent::Combat(event));
        }
        let outcome = arena.outcome().unwrap_or(FightOutcome::Defeat);
        if outcome == FightOutcome::Defeat || !self.character.is_alive() {
            self.enter_game_over(GameOverCause::Boss);
        }
        Ok(outcome)
    }

    pub(super) fn enter_game_over(&mut self, cause: GameOverCause) {
        log::info!("game over for {}: {:?}", self.character.name, cause);
        self.game_over = Some(cause);
        self.quest = None;
        self.auto_quest = false;
        self.auto_quest_countdown = None;
        self.modal = None;
        self.pending.push(TickEvent::GameOver(cause));
    }

    /// Brings a character killed by a boss back, stronger but reset.
    pub fn rebirth(&mut self) -> Result<RebirthSummary, Rejection> {
        if self.game_over != Some(GameOverCause::Boss) {
            return Err(Rejection::SessionOver);
        }
        let summary = self.character.rebirth();
        self.game_over = None;
        self.pending.push(TickEvent::Reborn(summary.clone()));
        Ok(summary)
    }

    // ── Inventory ──────────────────────────────────────────────

    pub fn equip(&mut self, index: usize) -> Result<EquipmentSlot, Rejection> {
        self.ensure_alive()?;
        self.character.equip(index, false)
    }

    pub fn use_item(&mut self, index: usize) -> Result<ItemUsed, Rejection> {
        self.ensure_alive()?;
        self.character.use_item(index)
    }

    // ── Trader and blacksmith ──────────────────────────────────

    pub fn sell_item(&mut self, index: usize) -> Result<u64, Rejection> {
        self.ensure_in_town()?;
        trader::sell_item(&mut self.character, index)
    }

    pub fn sell_all_junk(&mut self) -> Result<JunkSale, Rejection> {
        self.ensure_in_town()?;
        Ok(trader::sell_all_junk(&mut self.character))
    }

    pub fn buy_inventory_upgrade(&mut self) -> Result<InventoryExpansion, Rejection> {
        self.ensure_in_town()?;
        trader::buy_inventory_upgrade(&mut self.character)
    }

    pub fn potions_for_sale(&self) -> Vec<&'c PotionDef> {
        trader::potions_for_sale(self.content, &self.character)
    }

    /// Buys the potion at `index` of [`Self::potions_for_sale`].
    pub fn buy_potion(&mut self, index: usize) -> Result<(), Rejection> {
        self.ensure_in_town()?;
        let potion = *self
            .potions_for_sale()
            .get(index)
            .ok_or(Rejection::InvalidIndex(index))?;
        trader::buy_potion(&mut self.character, potion)
    }

    pub fn upgrade_preview(&self, slot: EquipmentSlot) -> Result<UpgradePreview, Rejection> {
        preview_upgrade(&self.character, slot)
    }

    pub fn upgrade_item(&mut self, slot: EquipmentSlot) -> Result<UpgradeReceipt, Rejection> {
        self.ensure_in_town()?;
        upgrade_equipped(&mut self.character, slot)
    }

    // ── Resource hunt ──────────────────────────────────────────

    pub fn start_hunt(&mut self) -> Result<(), Rejection> {
        self.ensure_alive()?;
        self.hunt.start(&mut self.rng);
        Ok(())
    }

    pub fn stop_hunt(&mut self) {
        self.hunt.stop();
    }

    pub fn collect_orb(&mut self, id: u64) -> Result<Resource, Rejection> {
        self.ensure_alive()?;
        self.hunt.collect(&mut self.character, id)
    }

    // ── Cheats ─────────────────────────────────────────────────

    pub fn apply_cheat(&mut self, cheat: Cheat) {
        self.character.apply_cheat(cheat);
    }
}
