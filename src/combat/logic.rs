//! Turn-based boss arena.
//!
//! The player acts (attack or defend), then the boss answers with
//! [`BossArena::boss_turn`]. The fight ends when either side drops to zero.
//! Victory rewards are applied to the character inside the arena; what a
//! defeat means (rebirth) is decided by the caller.

use super::types::Boss;
use crate::character::model::{Character, LootStatus};
use crate::character::progression::LevelUp;
use crate::core::constants::*;
use crate::core::content::BossTier;
use crate::error::{ActionError, EngineError, Rejection};
use crate::items::generation::LootGenerator;
use crate::items::types::Item;
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FightOutcome {
    Victory,
    Defeat,
    /// The fight hit a broken invariant and was stopped.
    Aborted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArenaState {
    PlayerTurn,
    BossTurn,
    Resolved(FightOutcome),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DefendRoll {
    Counter,
    Empower,
    Heal,
    Weaken,
}

impl DefendRoll {
    fn from_roll(roll: u32) -> Self {
        match roll {
            1 => DefendRoll::Counter,
            2 => DefendRoll::Empower,
            3 => DefendRoll::Heal,
            _ => DefendRoll::Weaken,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VictoryRewards {
    pub boss_name_key: String,
    pub tier: usize,
    pub copper: u64,
    pub xp: u64,
    pub loot_status: LootStatus,
    pub item: Option<Item>,
    pub level_ups: Vec<LevelUp>,
}

/// Combat log entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CombatEvent {
    BossAppears { name_key: String, max_hp: u32 },
    PlayerAttack { damage: u32, empowered: bool, weakened: bool },
    Defend { roll: DefendRoll },
    Counter { damage: u32 },
    Empowered,
    Healed { amount: u32 },
    BossWeakened,
    BossAttack { damage: u32, halved: bool },
    Victory(VictoryRewards),
    Defeat,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BossArena {
    pub boss: Boss,
    pub tier: usize,
    state: ArenaState,
    empowered: bool,
    defending: bool,
    log: Vec<CombatEvent>,
}

impl BossArena {
    /// Opens a fight against `tier`, scaled by the character's base item
    /// level and rebirth count.
    pub fn new(tier_index: usize, tier: &BossTier, character: &Character) -> Self {
        let boss = Boss::from_tier(tier, character.base_item_level(), character.rebirths);
        let log = vec![CombatEvent::BossAppears {
            name_key: boss.name_key.clone(),
            max_hp: boss.max_hp,
        }];
        Self {
            boss,
            tier: tier_index,
            state: ArenaState::PlayerTurn,
            empowered: false,
            defending: false,
            log,
        }
    }

    pub fn state(&self) -> ArenaState {
        self.state
    }

    pub fn outcome(&self) -> Option<FightOutcome> {
        match self.state {
            ArenaState::Resolved(outcome) => Some(outcome),
            _ => None,
        }
    }

    pub fn is_empowered(&self) -> bool {
        self.empowered
    }

    pub fn is_defending(&self) -> bool {
        self.defending
    }

    pub fn log(&self) -> &[CombatEvent] {
        &self.log
    }

    fn ensure_player_turn(&self) -> Result<(), Rejection> {
        match self.state {
            ArenaState::PlayerTurn => Ok(()),
            ArenaState::BossTurn => Err(Rejection::NotPlayerTurn),
            ArenaState::Resolved(_) => Err(Rejection::FightOver),
        }
    }

    /// Main stat value of the fighter. A character whose main stat cannot
    /// be resolved ends the fight on the spot.
    fn main_stat_value(&mut self, character: &Character) -> Result<u32, EngineError> {
        match character.main_stat() {
            Some(stat) => Ok(character.total_stat(stat)),
            None => {
                log::error!(
                    "aborting boss fight: main stat of {} ({:?}) is unresolved",
                    character.name,
                    character.class
                );
                self.state = ArenaState::Resolved(FightOutcome::Aborted);
                Err(EngineError::MainStatUnresolved(character.class))
            }
        }
    }

    pub fn player_attack(
        &mut self,
        character: &mut Character,
        loot: &LootGenerator,
        rng: &mut impl Rng,
    ) -> Result<Vec<CombatEvent>, ActionError> {
        self.ensure_player_turn()?;
        let main = self.main_stat_value(character)?;

        let mut damage = rng.gen_range(main / 2..=main);
        let empowered = self.empowered;
        if empowered {
            damage = (damage as f64 * EMPOWERED_MULTIPLIER) as u32;
            self.empowered = false;
        }
        let weakened = self.boss.weakened;
        let dealt = self.boss.take_damage(damage);

        let mut events = vec![CombatEvent::PlayerAttack {
            damage: dealt,
            empowered,
            weakened,
        }];
        self.after_player_action(character, loot, rng, &mut events)?;
        Ok(events)
    }

    /// Defending always halves the boss's next hit and rolls one bonus effect.
    pub fn player_defend(
        &mut self,
        character: &mut Character,
        loot: &LootGenerator,
        rng: &mut impl Rng,
    ) -> Result<Vec<CombatEvent>, ActionError> {
        self.ensure_player_turn()?;
        let main = self.main_stat_value(character)?;

        self.defending = true;
        let roll = DefendRoll::from_roll(rng.gen_range(1..=4));
        let mut events = vec![CombatEvent::Defend { roll }];
        match roll {
            DefendRoll::Counter => {
                let dealt = self.boss.take_damage(main / DEFEND_COUNTER_DIVISOR);
                events.push(CombatEvent::Counter { damage: dealt });
            }
            DefendRoll::Empower => {
                self.empowered = true;
                events.push(CombatEvent::Empowered);
            }
            DefendRoll::Heal => {
                let life = &mut character.pools.life;
                let amount = life.restore(life.max / DEFEND_HEAL_DIVISOR);
                events.push(CombatEvent::Healed { amount });
            }
            DefendRoll::Weaken => {
                self.boss.weakened = true;
                events.push(CombatEvent::BossWeakened);
            }
        }
        self.after_player_action(character, loot, rng, &mut events)?;
        Ok(events)
    }

    fn after_player_action(
        &mut self,
        character: &mut Character,
        loot: &LootGenerator,
        rng: &mut impl Rng,
        events: &mut Vec<CombatEvent>,
    ) -> Result<(), EngineError> {
        if self.boss.is_defeated() {
            let rewards = self.claim_victory(character, loot, rng)?;
            events.push(CombatEvent::Victory(rewards));
        } else {
            self.state = ArenaState::BossTurn;
        }
        self.log.extend(events.iter().cloned());
        Ok(())
    }

    fn claim_victory(
        &mut self,
        character: &mut Character,
        loot: &LootGenerator,
        rng: &mut impl Rng,
    ) -> Result<VictoryRewards, EngineError> {
        self.state = ArenaState::Resolved(FightOutcome::Victory);
        character.boss_tier += 1;
        character.bosses_defeated += 1;

        let copper = self.boss.max_hp as u64;
        let xp = BOSS_XP_PER_HP * self.boss.max_hp as u64;
        let reward = loot.generate_boss_reward(character, rng)?;
        let outcome = character.apply_boss_reward(reward);
        character.add_loot(copper, None);
        let level_ups = character.add_xp(xp, rng);

        log::info!(
            "{} defeated {} (tier {})",
            character.name,
            self.boss.name_key,
            self.tier
        );
        Ok(VictoryRewards {
            boss_name_key: self.boss.name_key.clone(),
            tier: self.tier,
            copper,
            xp,
            loot_status: outcome.status,
            item: outcome.item,
            level_ups,
        })
    }

    pub fn boss_turn(
        &mut self,
        character: &mut Character,
        rng: &mut impl Rng,
    ) -> Result<Vec<CombatEvent>, Rejection> {
        match self.state {
            ArenaState::BossTurn => {}
            ArenaState::PlayerTurn => return Err(Rejection::BossNotReady),
            ArenaState::Resolved(_) => return Err(Rejection::FightOver),
        }

        let mut damage = self.boss.attack(rng);
        let halved = self.defending;
        if halved {
            damage /= 2;
            self.defending = false;
        }
        character.take_damage(damage);

        let mut events = vec![CombatEvent::BossAttack { damage, halved }];
        if character.is_alive() {
            self.state = ArenaState::PlayerTurn;
        } else {
            log::info!("{} fell to {}", character.name, self.boss.name_key);
            self.state = ArenaState::Resolved(FightOutcome::Defeat);
            events.push(CombatEvent::Defeat);
        }
        self.log.extend(events.iter().cloned());
        Ok(events)
    }

    /// Leaving an unresolved fight counts as being slain by the boss.
    pub fn forfeit(&mut self, character: &mut Character) -> Option<CombatEvent> {
        if self.outcome().is_some() {
            return None;
        }
        character.pools.life.current = 0;
        self.state = ArenaState::Resolved(FightOutcome::Defeat);
        self.log.push(CombatEvent::Defeat);
        Some(CombatEvent::Defeat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::class::CharacterClass;
    use crate::core::content::GameContent;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn setup(class: CharacterClass) -> (GameContent, Character, ChaCha8Rng) {
        (
            GameContent::standard(),
            Character::new("Hero", class),
            ChaCha8Rng::seed_from_u64(41),
        )
    }

    #[test]
    fn test_new_arena_scales_from_character() {
        let (content, c, _) = setup(CharacterClass::Warrior);
        let arena = BossArena::new(0, &content.boss_tiers[0], &c);
        assert_eq!(arena.boss.max_hp, 150);
        assert_eq!(arena.state(), ArenaState::PlayerTurn);
        assert_eq!(arena.log().len(), 1);
    }

    #[test]
    fn test_attack_damage_range_and_turn_passes() {
        let (content, mut c, mut rng) = setup(CharacterClass::Warrior);
        let loot = LootGenerator::new(&content);
        for _ in 0..200 {
            let mut arena = BossArena::new(0, &content.boss_tiers[0], &c);
            let events = arena.player_attack(&mut c, &loot, &mut rng).unwrap();
            let CombatEvent::PlayerAttack { damage, .. } = events[0] else {
                panic!("expected attack event");
            };
            assert!((4..=8).contains(&damage));
            assert_eq!(arena.state(), ArenaState::BossTurn);
        }
    }

    #[test]
    fn test_actions_out_of_turn_are_rejected() {
        let (content, mut c, mut rng) = setup(CharacterClass::Warrior);
        let loot = LootGenerator::new(&content);
        let mut arena = BossArena::new(0, &content.boss_tiers[0], &c);
        assert_eq!(
            arena.boss_turn(&mut c, &mut rng),
            Err(Rejection::BossNotReady)
        );
        arena.player_attack(&mut c, &loot, &mut rng).unwrap();
        assert_eq!(
            arena.player_attack(&mut c, &loot, &mut rng),
            Err(ActionError::Rejected(Rejection::NotPlayerTurn))
        );
    }

    #[test]
    fn test_empowered_attack_is_consumed() {
        let (content, mut c, mut rng) = setup(CharacterClass::Warrior);
        let loot = LootGenerator::new(&content);
        let mut arena = BossArena::new(0, &content.boss_tiers[0], &c);
        arena.empowered = true;
        let events = arena.player_attack(&mut c, &loot, &mut rng).unwrap();
        let CombatEvent::PlayerAttack { damage, empowered, .. } = events[0] else {
            panic!("expected attack event");
        };
        assert!(empowered);
        assert!((6..=12).contains(&damage));
        assert!(!arena.is_empowered());
    }

    #[test]
    fn test_weakened_boss_takes_bonus_once() {
        let (content, mut c, mut rng) = setup(CharacterClass::Warrior);
        let loot = LootGenerator::new(&content);
        let mut arena = BossArena::new(0, &content.boss_tiers[0], &c);
        arena.boss.weakened = true;
        let events = arena.player_attack(&mut c, &loot, &mut rng).unwrap();
        let CombatEvent::PlayerAttack { damage, weakened, .. } = events[0] else {
            panic!("expected attack event");
        };
        assert!(weakened);
        assert!((6..=12).contains(&damage));
        assert!(!arena.boss.weakened);
    }

    #[test]
    fn test_defend_heal_never_exceeds_max() {
        let (content, mut c, mut rng) = setup(CharacterClass::Warrior);
        let loot = LootGenerator::new(&content);
        for _ in 0..300 {
            c.pools.life.current = c.pools.life.max - 3;
            let mut arena = BossArena::new(0, &content.boss_tiers[0], &c);
            arena.player_defend(&mut c, &loot, &mut rng).unwrap();
            assert!(c.pools.life.current <= c.pools.life.max);
            assert!(arena.is_defending());
        }
    }

    #[test]
    fn test_defending_halves_next_boss_hit() {
        let (content, mut c, mut rng) = setup(CharacterClass::Warrior);
        let loot = LootGenerator::new(&content);
        c.is_immortal = true;
        for _ in 0..100 {
            let mut arena = BossArena::new(0, &content.boss_tiers[0], &c);
            arena.player_defend(&mut c, &loot, &mut rng).unwrap();
            if arena.outcome().is_some() {
                continue;
            }
            let events = arena.boss_turn(&mut c, &mut rng).unwrap();
            let CombatEvent::BossAttack { damage, halved } = events[0] else {
                panic!("expected boss attack");
            };
            assert!(halved);
            assert!((5..=10).contains(&damage));
            assert!(!arena.is_defending());
        }
    }

    #[test]
    fn test_victory_applies_rewards() {
        let (content, mut c, mut rng) = setup(CharacterClass::Warrior);
        let loot = LootGenerator::new(&content);
        let mut arena = BossArena::new(0, &content.boss_tiers[0], &c);
        arena.boss.current_hp = 1;
        let events = arena.player_attack(&mut c, &loot, &mut rng).unwrap();
        let Some(CombatEvent::Victory(rewards)) = events.last() else {
            panic!("expected victory");
        };
        assert_eq!(rewards.copper, 150);
        assert_eq!(rewards.xp, 750);
        assert_eq!(rewards.loot_status, LootStatus::Added);
        assert!(rewards.item.as_ref().map_or(false, |i| i.is_boss_item));
        assert!(!rewards.level_ups.is_empty());
        assert_eq!(c.boss_tier, 1);
        assert_eq!(c.bosses_defeated, 1);
        assert_eq!(c.copper, 150);
        assert_eq!(arena.outcome(), Some(FightOutcome::Victory));
    }

    #[test]
    fn test_attack_after_victory_does_not_repeat_rewards() {
        let (content, mut c, mut rng) = setup(CharacterClass::Warrior);
        let loot = LootGenerator::new(&content);
        let mut arena = BossArena::new(0, &content.boss_tiers[0], &c);
        arena.boss.current_hp = 1;
        arena.player_attack(&mut c, &loot, &mut rng).unwrap();
        assert_eq!(
            arena.player_attack(&mut c, &loot, &mut rng),
            Err(ActionError::Rejected(Rejection::FightOver))
        );
        assert_eq!(c.bosses_defeated, 1);
        assert_eq!(c.boss_tier, 1);
    }

    #[test]
    fn test_boss_kills_player() {
        let (content, mut c, mut rng) = setup(CharacterClass::Mage);
        let loot = LootGenerator::new(&content);
        let mut arena = BossArena::new(0, &content.boss_tiers[0], &c);
        c.pools.life.current = 1;
        arena.player_attack(&mut c, &loot, &mut rng).unwrap();
        let events = arena.boss_turn(&mut c, &mut rng).unwrap();
        assert_eq!(events.last(), Some(&CombatEvent::Defeat));
        assert_eq!(arena.outcome(), Some(FightOutcome::Defeat));
        assert!(!c.is_alive());
    }

    #[test]
    fn test_unresolved_main_stat_aborts_fight() {
        let (content, mut c, mut rng) = setup(CharacterClass::Rogue);
        let loot = LootGenerator::new(&content);
        let mut arena = BossArena::new(0, &content.boss_tiers[0], &c);
        c.main_stat = None;
        assert_eq!(
            arena.player_attack(&mut c, &loot, &mut rng),
            Err(ActionError::Fatal(EngineError::MainStatUnresolved(
                CharacterClass::Rogue
            )))
        );
        assert_eq!(arena.outcome(), Some(FightOutcome::Aborted));
    }

    #[test]
    fn test_forfeit_counts_as_defeat() {
        let (content, mut c, _) = setup(CharacterClass::Warrior);
        let mut arena = BossArena::new(0, &content.boss_tiers[0], &c);
        assert_eq!(arena.forfeit(&mut c), Some(CombatEvent::Defeat));
        assert_eq!(c.pools.life.current, 0);
        assert_eq!(arena.forfeit(&mut c), None);
    }
}
