use crate::core::constants::*;
use crate::core::content::BossTier;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Multiplier applied to a boss's HP and damage.
///
/// # Arguments
/// * `item_level` - The player's base item level (blacksmith upgrades excluded)
/// * `rebirths` - Number of rebirths the player has gone through
///
/// # Returns
/// `(1 + (item_level/10)^1.2) * (1 - min(0.5, rebirths*0.05))`
pub fn boss_scaling(item_level: u32, rebirths: u32) -> f64 {
    let item_scaling =
        1.0 + (item_level as f64 / BOSS_ITEM_LEVEL_DIVISOR).powf(BOSS_ITEM_LEVEL_EXPONENT);
    let rebirth_reduction =
        (rebirths as f64 * BOSS_REBIRTH_REDUCTION_PER_REBIRTH).min(BOSS_REBIRTH_REDUCTION_CAP);
    item_scaling * (1.0 - rebirth_reduction)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Boss {
    pub name_key: String,
    pub max_hp: u32,
    pub current_hp: u32,
    pub damage: (u32, u32),
    pub weakened: bool,
}

impl Boss {
    pub fn new(
        name_key: impl Into<String>,
        base_hp: u32,
        base_damage: (u32, u32),
        item_level: u32,
        rebirths: u32,
    ) -> Self {
        let scaling = boss_scaling(item_level, rebirths);
        let max_hp = (base_hp as f64 * scaling) as u32;
        Self {
            name_key: name_key.into(),
            max_hp,
            current_hp: max_hp,
            damage: (
                (base_damage.0 as f64 * scaling) as u32,
                (base_damage.1 as f64 * scaling) as u32,
            ),
            weakened: false,
        }
    }

    pub fn from_tier(tier: &BossTier, item_level: u32, rebirths: u32) -> Self {
        Self::new(tier.name_key, tier.hp, tier.damage, item_level, rebirths)
    }

    pub fn attack(&self, rng: &mut impl Rng) -> u32 {
        let (min, max) = self.damage;
        rng.gen_range(min..=max.max(min))
    }

    /// Applies a hit and returns the damage actually dealt. A weakened boss
    /// takes 1.5x from this hit, after which the weakness is gone.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        let dealt = if self.weakened {
            self.weakened = false;
            (amount as f64 * BOSS_WEAKENED_MULTIPLIER) as u32
        } else {
            amount
        };
        self.current_hp = self.current_hp.saturating_sub(dealt);
        dealt
    }

    pub fn is_defeated(&self) -> bool {
        self.current_hp == 0
    }
}
