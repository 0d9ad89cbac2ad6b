//! Quest progression and rewards.

use super::types::{Quest, QuestPhase};
use crate::character::attributes::Stat;
use crate::character::model::Character;
use crate::core::constants::*;
use crate::error::EngineError;
use crate::items::generation::LootGenerator;
use crate::items::types::Item;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Damage taken when a quest finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionCost {
    pub damage: u32,
    /// The character was immortal and took nothing.
    pub prevented: bool,
}

/// What one quest tick did.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestTick {
    pub phase: QuestPhase,
    pub phase_changed: bool,
    pub progress_gain: f64,
    /// The class pool was empty and the progress penalty applied.
    pub exhausted: bool,
    pub flavor_key: Option<&'static str>,
    pub completion: Option<CompletionCost>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuestReward {
    pub copper: u64,
    pub xp: u64,
    pub item: Option<Item>,
}

/// `1 + main/50`, using a fallback of 5 when the main stat is unknown.
pub fn progress_per_tick(character: &Character) -> f64 {
    let main = character
        .main_stat()
        .map_or(QUEST_FALLBACK_MAIN_STAT, |stat| character.total_stat(stat));
    1.0 + main as f64 / QUEST_PROGRESS_STAT_DIVISOR
}

/// Chance that a finished quest also drops an item.
pub fn item_drop_chance(luck: u32) -> f64 {
    (QUEST_ITEM_BASE_CHANCE + luck as f64 / QUEST_ITEM_LUCK_DIVISOR).min(QUEST_ITEM_MAX_CHANCE)
}

impl Quest {
    /// Advances the quest by one tick. Does nothing once complete.
    pub fn advance(
        &mut self,
        character: &mut Character,
        flavor_keys: &[&'static str],
        rng: &mut impl Rng,
    ) -> Option<QuestTick> {
        if self.is_complete() {
            return None;
        }

        let previous = self.phase;
        self.phase = QuestPhase::for_progress(self.progress, self.duration);

        let mut gain = progress_per_tick(character);
        let mut exhausted = false;
        if self.phase == QuestPhase::Action {
            let def = character.class.def();
            let pool = character.pools.get_mut(def.secondary_pool);
            if pool.current > 0 {
                pool.drain(QUEST_ACTION_RESOURCE_COST);
            } else {
                gain *= def.exhausted_penalty;
                exhausted = true;
            }
        }
        self.progress += gain;

        let completion = self.is_complete().then(|| {
            let damage = rng.gen_range(QUEST_COMPLETION_DAMAGE_MIN..=QUEST_COMPLETION_DAMAGE_MAX);
            character.take_damage(damage);
            CompletionCost {
                damage,
                prevented: character.is_immortal,
            }
        });

        let flavor_key = if self.phase == QuestPhase::Action && rng.gen_bool(QUEST_FLAVOR_CHANCE) {
            flavor_keys.choose(rng).copied()
        } else {
            None
        };

        log::debug!(
            "quest {} {:?} progress {:.2}/{}",
            self.key,
            self.phase,
            self.progress,
            self.duration
        );

        Some(QuestTick {
            phase: self.phase,
            phase_changed: self.phase != previous,
            progress_gain: gain,
            exhausted,
            flavor_key,
            completion,
        })
    }

    /// Rolls copper, XP and an optional item, all boosted by total luck.
    pub fn generate_reward(
        &self,
        character: &Character,
        loot: &LootGenerator,
        rng: &mut impl Rng,
    ) -> Result<QuestReward, EngineError> {
        let luck = character.total_stat(Stat::Luck);
        let luck_bonus = 1.0 + luck as f64 / 100.0;
        let duration = self.duration as u64;

        let copper_roll = rng.gen_range(QUEST_COPPER_MIN..=QUEST_COPPER_MAX)
            + duration * QUEST_COPPER_PER_DURATION;
        let xp_roll =
            rng.gen_range(QUEST_XP_MIN..=QUEST_XP_MAX) + duration * QUEST_XP_PER_DURATION;

        let item = if rng.gen_bool(item_drop_chance(luck)) {
            Some(loot.generate_item_for_level(character.level, luck, rng)?)
        } else {
            None
        };

        Ok(QuestReward {
            copper: (copper_roll as f64 * luck_bonus) as u64,
            xp: (xp_roll as f64 * luck_bonus) as u64,
            item,
        })
    }
}
