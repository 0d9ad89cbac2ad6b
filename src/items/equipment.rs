use super::types::{EquipmentSlot, Item, StatDeltas};
use serde::{Deserialize, Serialize};

/// The three fixed gear slots of a character.
///
/// New slots must be `#[serde(default)]` so older snapshots keep loading.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Equipment {
    #[serde(default)]
    pub weapon: Option<Item>,
    #[serde(default)]
    pub head: Option<Item>,
    #[serde(default)]
    pub chest: Option<Item>,
}

impl Equipment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, slot: EquipmentSlot) -> &Option<Item> {
        match slot {
            EquipmentSlot::Weapon => &self.weapon,
            EquipmentSlot::Head => &self.head,
            EquipmentSlot::Chest => &self.chest,
        }
    }

    pub fn get_mut(&mut self, slot: EquipmentSlot) -> &mut Option<Item> {
        match slot {
            EquipmentSlot::Weapon => &mut self.weapon,
            EquipmentSlot::Head => &mut self.head,
            EquipmentSlot::Chest => &mut self.chest,
        }
    }

    /// Puts `item` into `slot`, returning whatever was there before.
    pub fn replace(&mut self, slot: EquipmentSlot, item: Option<Item>) -> Option<Item> {
        std::mem::replace(self.get_mut(slot), item)
    }

    pub fn iter_equipped(&self) -> impl Iterator<Item = &Item> {
        [&self.weapon, &self.head, &self.chest]
            .into_iter()
            .filter_map(|item| item.as_ref())
    }

    pub fn iter_slots(&self) -> impl Iterator<Item = (EquipmentSlot, &Option<Item>)> {
        EquipmentSlot::all()
            .into_iter()
            .map(move |slot| (slot, self.get(slot)))
    }

    /// Sum of the current stat bonuses of every equipped item.
    pub fn stat_bonuses(&self) -> StatDeltas {
        let mut total = StatDeltas::new();
        for item in self.iter_equipped() {
            for (stat, value) in item.current_stats() {
                *total.entry(stat).or_insert(0) += value;
            }
        }
        total
    }

    /// Integer average item score over equipped items, 0 when nothing is worn.
    pub fn item_level(&self, use_base: bool) -> u32 {
        let scores: Vec<u32> = self
            .iter_equipped()
            .map(|item| item.item_score(use_base))
            .collect();
        if scores.is_empty() {
            return 0;
        }
        scores.iter().sum::<u32>() / scores.len() as u32
    }

    pub fn clear(&mut self) {
        *self = Self::new();
    }
}
