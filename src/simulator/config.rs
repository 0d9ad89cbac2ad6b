//! Simulation configuration.

use crate::character::class::CharacterClass;

/// Configuration for a simulation run.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Number of simulation runs to perform
    pub num_runs: u32,

    /// Random seed for reproducibility (None = random)
    pub seed: Option<u64>,

    /// Maximum session ticks per run before timeout
    pub max_ticks_per_run: u64,

    /// Stop a run once the character has been reborn this many times
    pub target_rebirths: u32,

    /// Class to play; None cycles through all classes run by run
    pub class: Option<CharacterClass>,

    /// Whether the bot challenges bosses when they become available
    pub fight_bosses: bool,

    /// LP fraction below which the bot defends instead of attacking
    pub defend_below: f64,

    /// LP fraction below which the bot drinks a life potion in town
    pub heal_below: f64,

    /// Log verbosity (0 = silent, 1 = summary, 2 = detailed)
    pub verbosity: u8,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            num_runs: 100,
            seed: None,
            max_ticks_per_run: 200_000,
            target_rebirths: 3,
            class: None,
            fight_bosses: true,
            defend_below: 0.35,
            heal_below: 0.5,
            verbosity: 1,
        }
    }
}

impl SimConfig {
    /// Short runs for a quick look at early pacing
    pub fn quick_check() -> Self {
        Self {
            num_runs: 20,
            max_ticks_per_run: 20_000,
            target_rebirths: 1,
            ..Default::default()
        }
    }

    /// Long runs that follow several rebirth cycles
    pub fn rebirth_cycle_test(target_rebirths: u32) -> Self {
        Self {
            num_runs: 30,
            max_ticks_per_run: 1_000_000,
            target_rebirths,
            ..Default::default()
        }
    }

    /// Quest-only pacing with the boss ladder ignored
    pub fn quest_only(num_runs: u32) -> Self {
        Self {
            num_runs,
            fight_bosses: false,
            ..Default::default()
        }
    }

    /// The class played in the run with the given index.
    pub fn class_for_run(&self, run_idx: u32) -> CharacterClass {
        self.class.unwrap_or_else(|| {
            let classes = CharacterClass::all();
            classes[run_idx as usize % classes.len()]
        })
    }
}
