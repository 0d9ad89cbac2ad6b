//! Per-tick orchestration of a [`GameSession`].
//!
//! One call to [`GameSession::tick`] advances everything that runs on the
//! clock by one step: the resource hunt, the level-up countdown, the boss's
//! delayed answer in the arena, the quest loop and the auto-quest restart.
//! What happened comes back as [`TickEvent`]s so the presentation layer can
//! render it without game logic knowing about any UI types.

use super::constants::*;
use super::session::{AutoQuestStop, GameOverCause, GameSession, LevelUpModal};
use crate::character::model::{LootStatus, Notification};
use crate::character::progression::{LevelUp, RebirthSummary};
use crate::combat::logic::{ArenaState, CombatEvent};
use crate::error::{ActionError, EngineError};
use crate::gathering::HuntEvent;
use crate::items::generation::LootGenerator;
use crate::items::types::Item;
use crate::quest::QuestPhase;
use rand::Rng;
use serde::Serialize;

/// A single event produced by a game tick or queued by a command.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum TickEvent {
    // ── Quest ───────────────────────────────────────────────────
    QuestStarted {
        key: String,
        text_key: String,
    },

    /// The quest moved into a new phase.
    QuestPhaseChanged {
        phase: QuestPhase,
        text_key: String,
    },

    QuestFlavor {
        key: String,
    },

    /// The quest finished and its completion damage was applied.
    QuestCompleted {
        key: String,
        damage: u32,
        prevented: bool,
    },

    QuestRewarded {
        copper: u64,
        xp: u64,
        status: LootStatus,
        item: Option<Item>,
    },

    AutoQuestStopped(AutoQuestStop),

    // ── Progression ─────────────────────────────────────────────
    /// One entry per level gained; a large XP reward can yield several.
    LeveledUp(LevelUp),

    LevelUpModalClosed,

    Reborn(RebirthSummary),

    Notification(Notification),

    // ── Boss arena ──────────────────────────────────────────────
    Combat(CombatEvent),

    // ── Resource hunt ───────────────────────────────────────────
    Hunt(HuntEvent),

    GameOver(GameOverCause),
}

/// Result of processing a single game tick.
#[derive(Debug, Clone, Default)]
pub struct TickResult {
    /// Events in chronological order, starting with those queued by
    /// commands since the previous tick.
    pub events: Vec<TickEvent>,

    /// True when the character changed in a way worth persisting
    /// (quest reward, boss outcome, rebirth).
    pub character_changed: bool,
}

impl<'c, R: Rng> GameSession<'c, R> {
    /// Advances the session by one tick.
    ///
    /// # Errors
    /// Returns an [`EngineError`] only for broken invariants, such as loot
    /// generation failing on invalid content.
    pub fn tick(&mut self) -> Result<TickResult, EngineError> {
        self.ticks += 1;
        let mut result = TickResult {
            events: std::mem::take(&mut self.pending),
            character_changed: false,
        };

        if self.game_over.is_none() {
            // ── 1. Resource hunt ────────────────────────────────
            let hunt_events = self.hunt.tick(&mut self.rng);
            result.events.extend(hunt_events.into_iter().map(TickEvent::Hunt));

            // ── 2. Level-up countdown ───────────────────────────
            self.tick_modal(&mut result);

            // ── 3. Boss answer ──────────────────────────────────
            self.tick_arena(&mut result);

            // ── 4. Quest loop ───────────────────────────────────
            if self.quest_loop_running() {
                self.tick_quest(&mut result)?;
            }

            // ── 5. Auto-quest restart ───────────────────────────
            self.tick_auto_quest()?;
        }

        // ── 6. Pending events and notifications ────────────────
        result.events.append(&mut self.pending);
        result.events.extend(
            self.character
                .drain_notifications()
                .into_iter()
                .map(TickEvent::Notification),
        );
        if result
            .events
            .iter()
            .any(|e| matches!(e, TickEvent::Reborn(_) | TickEvent::GameOver(_)))
        {
            result.character_changed = true;
        }
        Ok(result)
    }

    fn tick_modal(&mut self, result: &mut TickResult) {
        let Some(modal) = self.modal.as_mut() else {
            return;
        };
        modal.ticks_left = modal.ticks_left.saturating_sub(1);
        if modal.ticks_left == 0 {
            self.modal = None;
            result.events.push(TickEvent::LevelUpModalClosed);
        }
    }

    fn tick_arena(&mut self, result: &mut TickResult) {
        let Some(arena) = self.arena.as_mut() else {
            return;
        };
        if arena.state() != ArenaState::BossTurn {
            return;
        }
        self.boss_turn_countdown = self.boss_turn_countdown.saturating_sub(1);
        if self.boss_turn_countdown > 0 {
            return;
        }
        if let Ok(events) = arena.boss_turn(&mut self.character, &mut self.rng) {
            result.character_changed = true;
            result.events.extend(events.into_iter().map(TickEvent::Combat));
        }
    }

    fn tick_quest(&mut self, result: &mut TickResult) -> Result<(), EngineError> {
        let Some(quest) = self.quest.as_mut() else {
            return Ok(());
        };
        let flavor_keys = self.content.flavor_keys(self.character.class);
        let Some(step) = quest.advance(&mut self.character, flavor_keys, &mut self.rng) else {
            return Ok(());
        };

        if step.phase_changed {
            result.events.push(TickEvent::QuestPhaseChanged {
                phase: step.phase,
                text_key: quest.texts.for_phase(step.phase).to_string(),
            });
        }
        if let Some(key) = step.flavor_key {
            result.events.push(TickEvent::QuestFlavor {
                key: key.to_string(),
            });
        }
        if let Some(cost) = step.completion {
            result.events.push(TickEvent::QuestCompleted {
                key: quest.key.clone(),
                damage: cost.damage,
                prevented: cost.prevented,
            });
        }

        if !self.character.is_alive() {
            self.enter_game_over(GameOverCause::Quest);
            return Ok(());
        }
        if self.auto_quest && self.character.pools.life.fraction() < LOW_HEALTH_FRACTION {
            self.stop_auto_quest(AutoQuestStop::LowHealth);
        }
        if step.completion.is_none() {
            return Ok(());
        }

        let Some(quest) = self.quest.take() else {
            return Ok(());
        };
        let loot = LootGenerator::new(self.content);
        let reward = quest.generate_reward(&self.character, &loot, &mut self.rng)?;
        let outcome = self.character.add_loot(reward.copper, reward.item);
        let level_ups = self.character.add_xp(reward.xp, &mut self.rng);
        log::info!(
            "{} finished {}: {} copper, {} xp, {:?}",
            self.character.name,
            quest.key,
            reward.copper,
            reward.xp,
            outcome.status
        );

        result.character_changed = true;
        result.events.push(TickEvent::QuestRewarded {
            copper: reward.copper,
            xp: reward.xp,
            status: outcome.status,
            item: outcome.item,
        });
        result
            .events
            .extend(level_ups.iter().cloned().map(TickEvent::LeveledUp));
        if !level_ups.is_empty() {
            self.modal = Some(LevelUpModal {
                level_ups,
                ticks_left: LEVEL_UP_MODAL_TICKS,
            });
        }
        if self.auto_quest {
            self.auto_quest_countdown = Some(AUTO_QUEST_RESTART_TICKS);
        }
        Ok(())
    }

    /// Counts down to the next automatic quest. The countdown holds while
    /// the quest loop is blocked.
    fn tick_auto_quest(&mut self) -> Result<(), EngineError> {
        if !self.auto_quest || self.quest.is_some() || self.quest_loop_blocked() {
            return Ok(());
        }
        let Some(left) = self.auto_quest_countdown else {
            return Ok(());
        };
        if left > 1 {
            self.auto_quest_countdown = Some(left - 1);
            return Ok(());
        }
        self.auto_quest_countdown = None;
        match self.start_quest() {
            Ok(()) => Ok(()),
            Err(ActionError::Fatal(err)) => Err(err),
            // A refusal (full inventory) already stopped auto-quest.
            Err(ActionError::Rejected(_)) => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::cheats::Cheat;
    use crate::character::class::CharacterClass;
    use crate::character::model::{Character, Unlock};
    use crate::combat::logic::FightOutcome;
    use crate::core::content::GameContent;
    use crate::error::Rejection;

    fn session(content: &GameContent, class: CharacterClass) -> GameSession<'_> {
        GameSession::with_seed(content, Character::new("Hero", class), 99).unwrap()
    }

    fn run_until_reward(s: &mut GameSession<'_>, limit: u32) -> Vec<TickEvent> {
        let mut events = Vec::new();
        for _ in 0..limit {
            let result = s.tick().unwrap();
            let done = result
                .events
                .iter()
                .any(|e| matches!(e, TickEvent::QuestRewarded { .. }));
            events.extend(result.events);
            if done {
                break;
            }
        }
        events
    }

    #[test]
    fn test_start_event_is_delivered_on_next_tick() {
        let content = GameContent::standard();
        let mut s = session(&content, CharacterClass::Warrior);
        s.start_quest().unwrap();
        let result = s.tick().unwrap();
        assert!(matches!(result.events[0], TickEvent::QuestStarted { .. }));
    }

    #[test]
    fn test_warrior_quest_completes_in_35_ticks() {
        let content = GameContent::standard();
        let mut s = session(&content, CharacterClass::Warrior);
        s.start_quest().unwrap();
        let events = run_until_reward(&mut s, 100);
        assert_eq!(s.ticks(), 35);
        assert!(s.quest().is_none());

        let phases: Vec<QuestPhase> = events
            .iter()
            .filter_map(|e| match e {
                TickEvent::QuestPhaseChanged { phase, .. } => Some(*phase),
                _ => None,
            })
            .collect();
        assert_eq!(phases, vec![QuestPhase::Action, QuestPhase::Return]);

        let damage = events
            .iter()
            .find_map(|e| match e {
                TickEvent::QuestCompleted { damage, .. } => Some(*damage),
                _ => None,
            })
            .unwrap();
        assert!((5..=15).contains(&damage));
    }

    #[test]
    fn test_level_up_pauses_quest_loop_until_acknowledged() {
        let content = GameContent::standard();
        let mut s = session(&content, CharacterClass::Warrior);
        s.set_auto_quest(true).unwrap();
        let events = run_until_reward(&mut s, 100);
        assert!(events.iter().any(|e| matches!(e, TickEvent::LeveledUp(_))));
        assert!(s.modal().is_some());

        for _ in 0..AUTO_QUEST_RESTART_TICKS + 5 {
            s.tick().unwrap();
        }
        assert!(s.quest().is_none(), "auto-quest must wait for the modal");

        assert!(s.acknowledge_modal());
        for _ in 0..AUTO_QUEST_RESTART_TICKS {
            s.tick().unwrap();
        }
        assert!(s.quest().is_some());
    }

    #[test]
    fn test_modal_closes_itself() {
        let content = GameContent::standard();
        let mut s = session(&content, CharacterClass::Mage);
        s.start_quest().unwrap();
        run_until_reward(&mut s, 100);
        assert!(s.modal().is_some());
        let mut closed = false;
        for _ in 0..LEVEL_UP_MODAL_TICKS {
            let result = s.tick().unwrap();
            closed |= result.events.contains(&TickEvent::LevelUpModalClosed);
        }
        assert!(closed);
        assert!(s.modal().is_none());
    }

    #[test]
    fn test_quest_death_is_permanent_game_over() {
        let content = GameContent::standard();
        let mut s = session(&content, CharacterClass::Rogue);
        s.start_quest().unwrap();
        s.character.pools.life.current = 1;
        let mut over = false;
        for _ in 0..100 {
            let result = s.tick().unwrap();
            if result.events.contains(&TickEvent::GameOver(GameOverCause::Quest)) {
                over = true;
                break;
            }
        }
        assert!(over);
        assert_eq!(s.game_over(), Some(GameOverCause::Quest));
        assert_eq!(s.rebirth(), Err(Rejection::SessionOver));
    }

    #[test]
    fn test_low_health_stops_auto_quest() {
        let content = GameContent::standard();
        let mut s = session(&content, CharacterClass::Warrior);
        s.set_auto_quest(true).unwrap();
        s.character.pools.life.current = 8;
        let result = s.tick().unwrap();
        assert!(result
            .events
            .contains(&TickEvent::AutoQuestStopped(AutoQuestStop::LowHealth)));
        assert!(!s.is_auto_questing());
        assert!(s.quest().is_some(), "the running quest continues");
    }

    #[test]
    fn test_boss_answers_after_delay() {
        let content = GameContent::standard();
        let mut s = session(&content, CharacterClass::Warrior);
        s.apply_cheat(Cheat::ToggleImmortality);
        s.open_arena().unwrap();
        s.arena_attack().unwrap();
        assert_eq!(
            s.arena_attack(),
            Err(ActionError::Rejected(Rejection::NotPlayerTurn))
        );
        for _ in 0..ARENA_BOSS_TURN_DELAY_TICKS - 1 {
            assert!(!s
                .tick()
                .unwrap()
                .events
                .iter()
                .any(|e| matches!(e, TickEvent::Combat(_))));
        }
        let result = s.tick().unwrap();
        assert!(result
            .events
            .iter()
            .any(|e| matches!(e, TickEvent::Combat(CombatEvent::BossAttack { .. }))));
        assert!(s.arena_attack().is_ok());
    }

    #[test]
    fn test_arena_pauses_quest_loop_and_victory_frees_it() {
        let content = GameContent::standard();
        let mut s = session(&content, CharacterClass::Warrior);
        s.open_arena().unwrap();
        assert!(s.arena().is_some());
        s.arena.as_mut().unwrap().boss.current_hp = 1;
        s.arena_attack().unwrap();
        assert_eq!(s.close_arena(), Ok(FightOutcome::Victory));
        assert_eq!(s.game_over(), None);
        assert_eq!(s.character().boss_tier, 1);
    }

    #[test]
    fn test_notifications_are_drained_into_events() {
        let content = GameContent::standard();
        let mut s = session(&content, CharacterClass::Warrior);
        s.character.copper = 100_000;
        s.character.max_inventory_size = 45;
        s.buy_inventory_upgrade().unwrap();
        let result = s.tick().unwrap();
        assert!(result.events.contains(&TickEvent::Notification(
            Notification::Unlocked(Unlock::AutoSell)
        )));
        assert!(s.character().pending_notifications.is_empty());
    }
}
