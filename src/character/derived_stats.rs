use super::attributes::{Attributes, Stat};
use super::class::CharacterClass;
use crate::core::constants::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PoolKind {
    Life,
    Mana,
    Energy,
    Rage,
}

impl PoolKind {
    pub fn all() -> [PoolKind; 4] {
        [PoolKind::Life, PoolKind::Mana, PoolKind::Energy, PoolKind::Rage]
    }

    pub fn abbrev(&self) -> &'static str {
        match self {
            PoolKind::Life => "LP",
            PoolKind::Mana => "MP",
            PoolKind::Energy => "EN",
            PoolKind::Rage => "RAGE",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Pool {
    pub current: u32,
    pub max: u32,
}

impl Pool {
    pub fn refill(&mut self) {
        self.current = self.max;
    }

    pub fn clamp(&mut self) {
        self.current = self.current.min(self.max);
    }

    /// Adds up to `amount`, never past max. Returns what was actually restored.
    pub fn restore(&mut self, amount: u32) -> u32 {
        let before = self.current;
        self.current = self.current.saturating_add(amount).min(self.max);
        self.current - before
    }

    pub fn drain(&mut self, amount: u32) {
        self.current = self.current.saturating_sub(amount);
    }

    pub fn fraction(&self) -> f64 {
        if self.max == 0 {
            return 0.0;
        }
        self.current as f64 / self.max as f64
    }
}

/// LP plus the three class pools. Only the class's own secondary pool ever
/// has nonzero capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResourcePools {
    pub life: Pool,
    #[serde(default)]
    pub mana: Pool,
    #[serde(default)]
    pub energy: Pool,
    #[serde(default)]
    pub rage: Pool,
}

impl ResourcePools {
    pub fn get(&self, kind: PoolKind) -> &Pool {
        match kind {
            PoolKind::Life => &self.life,
            PoolKind::Mana => &self.mana,
            PoolKind::Energy => &self.energy,
            PoolKind::Rage => &self.rage,
        }
    }

    pub fn get_mut(&mut self, kind: PoolKind) -> &mut Pool {
        match kind {
            PoolKind::Life => &mut self.life,
            PoolKind::Mana => &mut self.mana,
            PoolKind::Energy => &mut self.energy,
            PoolKind::Rage => &mut self.rage,
        }
    }

    /// Applies new maxima from total attributes. Current values are clamped,
    /// or refilled entirely when `heal` is set.
    pub fn recalculate(&mut self, class: CharacterClass, total: &Attributes, heal: bool) {
        let maxima = max_pools(class, total);
        for kind in PoolKind::all() {
            let pool = self.get_mut(kind);
            pool.max = maxima.get(kind).max;
            if heal {
                pool.refill();
            } else {
                pool.clamp();
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (PoolKind, &Pool)> {
        PoolKind::all().into_iter().map(move |k| (k, self.get(k)))
    }
}

/// Pool capacities for a class at the given total attributes.
///
/// LP = 50 + 5*STR for everyone. The secondary pool depends on class:
/// mana 30 + 3*INT, energy 50 + 5*AGI, rage 30 + 3*STR.
pub fn max_pools(class: CharacterClass, total: &Attributes) -> ResourcePools {
    let mut pools = ResourcePools::default();
    pools.life.max = LP_BASE + LP_PER_STRENGTH * total.get(Stat::Strength);
    match class.def().secondary_pool {
        PoolKind::Mana => {
            pools.mana.max = MANA_BASE + MANA_PER_INTELLIGENCE * total.get(Stat::Intelligence)
        }
        PoolKind::Energy => {
            pools.energy.max = ENERGY_BASE + ENERGY_PER_AGILITY * total.get(Stat::Agility)
        }
        PoolKind::Rage => {
            pools.rage.max = RAGE_BASE + RAGE_PER_STRENGTH * total.get(Stat::Strength)
        }
        PoolKind::Life => {}
    }
    pools
}
