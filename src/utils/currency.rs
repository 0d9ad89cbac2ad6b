use crate::core::constants::{COPPER_PER_SILVER, SILVER_PER_GOLD};
use serde::{Deserialize, Serialize};

/// A copper amount split into gold, silver and copper for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Coins {
    pub gold: u64,
    pub silver: u64,
    pub copper: u64,
}

impl Coins {
    pub fn from_copper(total: u64) -> Self {
        let copper_per_gold = COPPER_PER_SILVER * SILVER_PER_GOLD;
        Self {
            gold: total / copper_per_gold,
            silver: total % copper_per_gold / COPPER_PER_SILVER,
            copper: total % COPPER_PER_SILVER,
        }
    }

    pub fn total_copper(&self) -> u64 {
        (self.gold * SILVER_PER_GOLD + self.silver) * COPPER_PER_SILVER + self.copper
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split() {
        assert_eq!(
            Coins::from_copper(1_234_567),
            Coins {
                gold: 123,
                silver: 45,
                copper: 67
            }
        );
        assert_eq!(Coins::from_copper(99), Coins { gold: 0, silver: 0, copper: 99 });
        assert_eq!(Coins::from_copper(10_000).gold, 1);
    }

    #[test]
    fn test_total_copper_inverts_split() {
        for total in [0, 1, 100, 9_999, 10_000, 5_432_101] {
            assert_eq!(Coins::from_copper(total).total_copper(), total);
        }
    }
}
