use crate::core::constants::NUM_STATS;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stat {
    Strength,
    Agility,
    Intelligence,
    Luck,
}

impl Stat {
    pub fn all() -> [Stat; NUM_STATS] {
        [Stat::Strength, Stat::Agility, Stat::Intelligence, Stat::Luck]
    }

    pub fn abbrev(&self) -> &'static str {
        match self {
            Stat::Strength => "STR",
            Stat::Agility => "AGI",
            Stat::Intelligence => "INT",
            Stat::Luck => "LUCK",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Stat::Strength => 0,
            Stat::Agility => 1,
            Stat::Intelligence => 2,
            Stat::Luck => 3,
        }
    }
}

/// Base attribute values of a character, one per [`Stat`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Attributes {
    values: [u32; NUM_STATS],
}

impl Attributes {
    pub fn new(strength: u32, agility: u32, intelligence: u32, luck: u32) -> Self {
        Self {
            values: [strength, agility, intelligence, luck],
        }
    }

    pub const fn from_array(values: [u32; NUM_STATS]) -> Self {
        Self { values }
    }

    pub fn get(&self, stat: Stat) -> u32 {
        self.values[stat.index()]
    }

    pub fn set(&mut self, stat: Stat, value: u32) {
        self.values[stat.index()] = value;
    }

    pub fn add(&mut self, stat: Stat, amount: u32) {
        self.values[stat.index()] = self.values[stat.index()].saturating_add(amount);
    }

    pub fn total(&self) -> u32 {
        self.values.iter().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Stat, u32)> + '_ {
        Stat::all().into_iter().map(move |s| (s, self.get(s)))
    }
}
