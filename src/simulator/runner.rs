//! Headless playthroughs of a [`GameSession`] driven by a simple bot.
//!
//! The bot only issues commands a player could issue, so every rule is
//! enforced by the session itself. Statistics are tracked externally from
//! tick events and the events returned by arena commands.

use super::config::SimConfig;
use super::loot_sim::LootStats;
use super::report::SimReport;
use crate::character::class::CharacterClass;
use crate::character::derived_stats::PoolKind;
use crate::character::model::Character;
use crate::combat::logic::{ArenaState, CombatEvent};
use crate::core::content::GameContent;
use crate::core::session::{GameOverCause, GameSession};
use crate::core::tick::{TickEvent, TickResult};
use crate::error::EngineError;
use crate::items::types::EquipmentSlot;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

/// Outcome of a single simulated playthrough.
#[derive(Debug, Clone, Serialize)]
pub struct RunStats {
    pub class: CharacterClass,
    pub final_level: u32,
    /// Highest level reached in any life.
    pub peak_level: u32,
    pub rebirths: u32,
    pub bosses_defeated: u32,
    pub boss_deaths: u32,
    pub quests_completed: u64,
    pub died_on_quest: bool,
    pub final_copper: u64,
    pub final_item_level: u32,
    pub total_ticks: u64,
    pub timed_out: bool,
    pub loot: LootStats,
}

/// Run the full simulation over the standard content and return a report.
pub fn run_simulation(config: &SimConfig) -> Result<SimReport, EngineError> {
    run_simulation_with_content(config, &GameContent::standard())
}

/// Run the full simulation over `content`, which is validated before the
/// first run starts.
pub fn run_simulation_with_content(
    config: &SimConfig,
    content: &GameContent,
) -> Result<SimReport, EngineError> {
    content.validate()?;
    let mut all_runs = Vec::with_capacity(config.num_runs as usize);

    for run_idx in 0..config.num_runs {
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed.wrapping_add(run_idx as u64)),
            None => ChaCha8Rng::from_entropy(),
        };

        let class = config.class_for_run(run_idx);
        let run = simulate_single_run(config, content, class, rng)?;

        if config.verbosity >= 2 {
            println!(
                "Run {}/{} - {:?} level {}, rebirths {}, bosses {}, quests {}, ticks {}{}",
                run_idx + 1,
                config.num_runs,
                run.class,
                run.final_level,
                run.rebirths,
                run.bosses_defeated,
                run.quests_completed,
                run.total_ticks,
                if run.died_on_quest { " (died)" } else { "" }
            );
        }
        all_runs.push(run);
    }

    Ok(SimReport::from_runs(all_runs))
}

/// Counters accumulated from events during a run.
#[derive(Default)]
struct SimStats {
    peak_level: u32,
    boss_deaths: u32,
    quests_completed: u64,
    loot: LootStats,
}

impl SimStats {
    fn process_tick(&mut self, result: &TickResult) {
        for event in &result.events {
            match event {
                TickEvent::QuestCompleted { .. } => self.quests_completed += 1,
                TickEvent::QuestRewarded { status, item, .. } => {
                    self.loot.record_reward(*status, item.as_ref())
                }
                TickEvent::LeveledUp(level_up) => {
                    self.peak_level = self.peak_level.max(level_up.new_level)
                }
                TickEvent::Combat(combat) => self.process_combat(combat),
                _ => {}
            }
        }
    }

    fn process_combat(&mut self, event: &CombatEvent) {
        if let CombatEvent::Victory(rewards) = event {
            self.loot
                .record_reward(rewards.loot_status, rewards.item.as_ref());
            for level_up in &rewards.level_ups {
                self.peak_level = self.peak_level.max(level_up.new_level);
            }
        }
    }
}

fn simulate_single_run(
    config: &SimConfig,
    content: &GameContent,
    class: CharacterClass,
    rng: ChaCha8Rng,
) -> Result<RunStats, EngineError> {
    let mut session = GameSession::new(content, Character::new("SimPlayer", class), rng)?;
    let mut stats = SimStats {
        peak_level: 1,
        ..Default::default()
    };
    let mut died_on_quest = false;

    while session.ticks() < config.max_ticks_per_run {
        match session.game_over() {
            Some(GameOverCause::Quest) => {
                died_on_quest = true;
                break;
            }
            Some(GameOverCause::Boss) => {
                stats.boss_deaths += 1;
                if session.rebirth().is_err() {
                    break;
                }
                if session.character().rebirths >= config.target_rebirths {
                    break;
                }
            }
            None => {}
        }

        play_turn(&mut session, config, &mut stats);

        match session.tick() {
            Ok(result) => stats.process_tick(&result),
            Err(e) => {
                log::error!("simulation aborted: {}", e);
                break;
            }
        }
    }

    let character = session.character();
    Ok(RunStats {
        class,
        final_level: character.level,
        peak_level: stats.peak_level.max(character.level),
        rebirths: character.rebirths,
        bosses_defeated: character.bosses_defeated,
        boss_deaths: stats.boss_deaths,
        quests_completed: stats.quests_completed,
        died_on_quest,
        final_copper: character.copper,
        final_item_level: character.item_level(),
        total_ticks: session.ticks(),
        timed_out: session.ticks() >= config.max_ticks_per_run,
        loot: stats.loot,
    })
}

/// One round of bot decisions before the next tick.
fn play_turn<R: Rng>(session: &mut GameSession<'_, R>, config: &SimConfig, stats: &mut SimStats) {
    if session.modal().is_some() {
        session.acknowledge_modal();
    }

    gather(session);

    if let Some(state) = session.arena().map(|arena| arena.state()) {
        fight(session, config, stats, state);
        return;
    }

    if session.quest().is_some() {
        return;
    }

    visit_town(session, config);

    if config.fight_bosses
        && session.boss_available()
        && life_fraction(session) >= 0.8
        && session.open_arena().is_ok()
    {
        return;
    }

    if !session.is_auto_questing() {
        if session.character().inventory_full() {
            let _ = session.sell_item(0);
        }
        if let Err(e) = session.set_auto_quest(true) {
            log::debug!("bot could not start questing: {}", e);
        }
    }
}

fn life_fraction<R: Rng>(session: &GameSession<'_, R>) -> f64 {
    session.character().pools.life.fraction()
}

fn gather<R: Rng>(session: &mut GameSession<'_, R>) {
    if !session.hunt().is_running() {
        let _ = session.start_hunt();
    }
    let ids: Vec<u64> = session.hunt().orbs().iter().map(|orb| orb.id).collect();
    for id in ids {
        let _ = session.collect_orb(id);
    }
}

fn fight<R: Rng>(
    session: &mut GameSession<'_, R>,
    config: &SimConfig,
    stats: &mut SimStats,
    state: ArenaState,
) {
    match state {
        ArenaState::PlayerTurn => {
            let result = if life_fraction(session) < config.defend_below {
                session.arena_defend()
            } else {
                session.arena_attack()
            };
            match result {
                Ok(events) => events.iter().for_each(|e| stats.process_combat(e)),
                Err(e) => {
                    log::warn!("bot arena action failed: {}", e);
                    let _ = session.close_arena();
                }
            }
        }
        ArenaState::BossTurn => {}
        ArenaState::Resolved(_) => {
            let _ = session.close_arena();
        }
    }
}

fn visit_town<R: Rng>(session: &mut GameSession<'_, R>, config: &SimConfig) {
    equip_upgrades(session);
    let _ = session.sell_all_junk();

    for slot in EquipmentSlot::all() {
        while session.upgrade_item(slot).is_ok() {}
    }

    drink_life_potions(session, config);

    let character = session.character();
    if character.copper >= character.inventory_upgrade_cost.saturating_mul(2) {
        let _ = session.buy_inventory_upgrade();
    }
}

fn equip_upgrades<R: Rng>(session: &mut GameSession<'_, R>) {
    loop {
        let character = session.character();
        let Some(index) = character
            .inventory
            .iter()
            .position(|item| character.is_upgrade(item))
        else {
            break;
        };
        if session.equip(index).is_err() {
            break;
        }
    }
}

/// Drinks held life potions, buying the strongest affordable one when none
/// are held, until LP is back above the configured threshold.
fn drink_life_potions<R: Rng>(session: &mut GameSession<'_, R>, config: &SimConfig) {
    while life_fraction(session) < config.heal_below {
        let character = session.character();
        let held = character
            .inventory
            .iter()
            .position(|item| item.effect.map_or(false, |e| e.pool == PoolKind::Life));

        let index = match held {
            Some(index) => index,
            None => {
                let copper = character.copper;
                let best = session
                    .potions_for_sale()
                    .iter()
                    .enumerate()
                    .filter(|(_, p)| p.pool == PoolKind::Life && p.cost <= copper)
                    .max_by_key(|(_, p)| p.amount)
                    .map(|(i, _)| i);
                let Some(best) = best else {
                    break;
                };
                if session.buy_potion(best).is_err() {
                    break;
                }
                session.character().inventory.len() - 1
            }
        };

        if session.use_item(index).is_err() {
            break;
        }
    }
}
