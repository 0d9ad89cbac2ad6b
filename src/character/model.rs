//! The character: attributes, pools, inventory, equipment and the
//! bookkeeping counters that survive rebirth.

use super::attributes::{Attributes, Stat};
use super::class::CharacterClass;
use super::derived_stats::{PoolKind, ResourcePools};
use crate::core::constants::{
    AUTO_SELL_INVENTORY_SIZE, INVENTORY_UPGRADE_BASE_COST, STARTING_INVENTORY_SIZE,
    STARTING_LEVEL, STARTING_XP_TO_NEXT,
};
use crate::error::Rejection;
use crate::items::equipment::Equipment;
use crate::items::types::{EquipmentSlot, Item, Rarity};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Resource {
    IronOre,
    Gem,
}

impl Resource {
    pub fn name_key(&self) -> &'static str {
        match self {
            Resource::IronOre => "iron_ore",
            Resource::Gem => "gem",
        }
    }
}

pub type ResourceMap = BTreeMap<Resource, u32>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Unlock {
    KeepInventorySize,
    AutoEquip,
    AutoSell,
}

/// One-time messages waiting for the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Notification {
    Unlocked(Unlock),
    AutoEquipped {
        name_key: String,
        rarity: Rarity,
        slot: EquipmentSlot,
    },
    OverflowSold {
        name_key: String,
        copper: u64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Unlocks {
    #[serde(default)]
    pub keep_inventory_size: bool,
    #[serde(default)]
    pub auto_equip: bool,
    #[serde(default)]
    pub auto_sell_notified: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LootStatus {
    NoItem,
    Added,
    AutoEquipped,
    AutoSold,
    InventoryFull,
    /// A boss item already held was replaced by its improved version.
    Reforged,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LootOutcome {
    pub status: LootStatus,
    pub item: Option<Item>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemUsed {
    pub pool: PoolKind,
    pub restored: u32,
}

fn default_inventory_size() -> usize {
    STARTING_INVENTORY_SIZE
}

fn default_upgrade_cost() -> u64 {
    INVENTORY_UPGRADE_BASE_COST
}

fn default_level() -> u32 {
    STARTING_LEVEL
}

fn default_xp_to_next() -> u64 {
    STARTING_XP_TO_NEXT
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub name: String,
    pub class: CharacterClass,
    /// Filled from the class on creation. Older snapshots may lack it until
    /// [`Character::repair`] runs.
    #[serde(default)]
    pub main_stat: Option<Stat>,
    #[serde(default = "default_level")]
    pub level: u32,
    #[serde(default)]
    pub xp: u64,
    #[serde(default = "default_xp_to_next")]
    pub xp_to_next_level: u64,
    #[serde(default)]
    pub copper: u64,
    pub attributes: Attributes,
    #[serde(default)]
    pub pools: ResourcePools,
    #[serde(default)]
    pub inventory: Vec<Item>,
    #[serde(default = "default_inventory_size")]
    pub max_inventory_size: usize,
    #[serde(default)]
    pub equipment: Equipment,
    #[serde(default)]
    pub resources: ResourceMap,
    #[serde(default)]
    pub boss_tier: usize,
    #[serde(default)]
    pub bosses_defeated: u32,
    #[serde(default)]
    pub rebirths: u32,
    #[serde(default)]
    pub unlocks: Unlocks,
    #[serde(default)]
    pub is_immortal: bool,
    #[serde(default)]
    pub cheat_activated: bool,
    #[serde(default = "default_upgrade_cost")]
    pub inventory_upgrade_cost: u64,
    #[serde(default)]
    pub pending_notifications: Vec<Notification>,
    #[serde(default)]
    pub created_at: i64,
}

impl Character {
    pub fn new(name: impl Into<String>, class: CharacterClass) -> Self {
        let def = class.def();
        let mut character = Self {
            id: Uuid::new_v4(),
            name: name.into(),
            class,
            main_stat: Some(def.main_stat),
            level: STARTING_LEVEL,
            xp: 0,
            xp_to_next_level: STARTING_XP_TO_NEXT,
            copper: 0,
            attributes: def.base_attributes,
            pools: ResourcePools::default(),
            inventory: Vec::new(),
            max_inventory_size: STARTING_INVENTORY_SIZE,
            equipment: Equipment::new(),
            resources: ResourceMap::new(),
            boss_tier: 0,
            bosses_defeated: 0,
            rebirths: 0,
            unlocks: Unlocks::default(),
            is_immortal: false,
            cheat_activated: false,
            inventory_upgrade_cost: INVENTORY_UPGRADE_BASE_COST,
            pending_notifications: Vec::new(),
            created_at: chrono::Utc::now().timestamp(),
        };
        character.update_derived_stats(true);
        character
    }

    /// Brings a freshly deserialized snapshot back in line with the current
    /// model: restores the main stat and clamps pools to their maxima.
    pub fn repair(&mut self) {
        if self.main_stat.is_none() {
            self.main_stat = Some(self.class.def().main_stat);
        }
        self.update_derived_stats(false);
    }

    pub fn main_stat(&self) -> Option<Stat> {
        self.main_stat
    }

    /// Base attributes plus everything the equipped items grant.
    pub fn total_stats(&self) -> Attributes {
        let mut total = self.attributes;
        for (stat, bonus) in self.equipment.stat_bonuses() {
            total.add(stat, bonus);
        }
        total
    }

    pub fn total_stat(&self, stat: Stat) -> u32 {
        self.total_stats().get(stat)
    }

    pub fn update_derived_stats(&mut self, heal_on_update: bool) {
        let total = self.total_stats();
        self.pools.recalculate(self.class, &total, heal_on_update);
    }

    pub fn item_level(&self) -> u32 {
        self.equipment.item_level(false)
    }

    /// Item level ignoring blacksmith upgrades; feeds boss scaling.
    pub fn base_item_level(&self) -> u32 {
        self.equipment.item_level(true)
    }

    pub fn is_alive(&self) -> bool {
        self.pools.life.current > 0
    }

    pub fn inventory_full(&self) -> bool {
        self.inventory.len() >= self.max_inventory_size
    }

    pub fn can_wear(&self, item: &Item) -> bool {
        item.armor_type.map_or(true, |armor| self.class.can_wear(armor))
    }

    pub fn is_upgrade(&self, candidate: &Item) -> bool {
        if !candidate.is_equipment() || !self.can_wear(candidate) {
            return false;
        }
        let Some(slot) = candidate.slot else {
            return false;
        };
        let main = self.main_stat();
        let score = candidate.weighted_score(main);
        match self.equipment.get(slot) {
            None => score > 0.0,
            Some(equipped) => score > equipped.weighted_score(main),
        }
    }

    /// Moves the inventory item at `index` into its slot. A previously
    /// equipped item goes back into the inventory.
    pub fn equip(&mut self, index: usize, is_auto_equip: bool) -> Result<EquipmentSlot, Rejection> {
        let item = self.inventory.get(index).ok_or(Rejection::InvalidIndex(index))?;
        let slot = match (item.is_equipment(), item.slot) {
            (true, Some(slot)) => slot,
            _ => return Err(Rejection::WrongItemType),
        };
        if let Some(armor) = item.armor_type {
            if !self.class.can_wear(armor) {
                log::warn!(
                    "{} cannot equip {} ({:?} armor)",
                    self.name,
                    item.name_key,
                    armor
                );
                return Err(Rejection::ArmorNotAllowed {
                    class: self.class,
                    armor,
                });
            }
        }

        let item = self.inventory.remove(index);
        let (name_key, rarity) = (item.name_key.clone(), item.rarity);
        if let Some(previous) = self.equipment.replace(slot, Some(item)) {
            self.inventory.push(previous);
        }
        self.update_derived_stats(false);

        if is_auto_equip {
            log::info!("{} auto-equipped {}", self.name, name_key);
            self.notify(Notification::AutoEquipped {
                name_key,
                rarity,
                slot,
            });
        }
        Ok(slot)
    }

    /// Credits copper and places a looted item: auto-equip when unlocked and
    /// better, auto-sell at 50+ slots when not an upgrade, otherwise the
    /// inventory if it has room.
    pub fn add_loot(&mut self, copper: u64, item: Option<Item>) -> LootOutcome {
        self.copper += copper;
        let Some(item) = item else {
            return LootOutcome {
                status: LootStatus::NoItem,
                item: None,
            };
        };

        if self.unlocks.auto_equip && self.is_upgrade(&item) {
            self.inventory.push(item.clone());
            let index = self.inventory.len() - 1;
            if self.equip(index, true).is_ok() {
                self.resolve_overflow();
                return LootOutcome {
                    status: LootStatus::AutoEquipped,
                    item: Some(item),
                };
            }
            self.inventory.pop();
        }

        if self.max_inventory_size >= AUTO_SELL_INVENTORY_SIZE
            && item.is_equipment()
            && !self.is_upgrade(&item)
        {
            self.copper += item.value();
            return LootOutcome {
                status: LootStatus::AutoSold,
                item: Some(item),
            };
        }

        if self.inventory_full() {
            return LootOutcome {
                status: LootStatus::InventoryFull,
                item: Some(item),
            };
        }
        self.inventory.push(item.clone());
        LootOutcome {
            status: LootStatus::Added,
            item: Some(item),
        }
    }

    /// Sells whatever auto-equip pushed past capacity.
    fn resolve_overflow(&mut self) {
        while self.inventory.len() > self.max_inventory_size {
            let Some(extra) = self.inventory.pop() else {
                break;
            };
            let copper = extra.value();
            self.copper += copper;
            self.notify(Notification::OverflowSold {
                name_key: extra.name_key,
                copper,
            });
        }
    }

    pub fn take_damage(&mut self, amount: u32) {
        if self.is_immortal {
            return;
        }
        self.pools.life.drain(amount);
    }

    /// Drinks the consumable at `index`.
    pub fn use_item(&mut self, index: usize) -> Result<ItemUsed, Rejection> {
        let item = self.inventory.get(index).ok_or(Rejection::InvalidIndex(index))?;
        let effect = match (item.is_equipment(), item.effect) {
            (false, Some(effect)) => effect,
            _ => return Err(Rejection::WrongItemType),
        };
        self.inventory.remove(index);
        let restored = self.pools.get_mut(effect.pool).restore(effect.amount);
        Ok(ItemUsed {
            pool: effect.pool,
            restored,
        })
    }

    pub fn add_resource(&mut self, resource: Resource, amount: u32) {
        *self.resources.entry(resource).or_insert(0) += amount;
    }

    pub fn resource(&self, resource: Resource) -> u32 {
        self.resources.get(&resource).copied().unwrap_or(0)
    }

    pub fn has_resources(&self, cost: &ResourceMap) -> bool {
        cost.iter().all(|(res, &needed)| self.resource(*res) >= needed)
    }

    /// Subtracts `cost`, dropping entries that reach zero.
    pub fn remove_resources(&mut self, cost: &ResourceMap) {
        for (res, &amount) in cost {
            if let Some(held) = self.resources.get_mut(res) {
                *held = held.saturating_sub(amount);
                if *held == 0 {
                    self.resources.remove(res);
                }
            }
        }
    }

    pub fn notify(&mut self, notification: Notification) {
        self.pending_notifications.push(notification);
    }

    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.pending_notifications)
    }

    /// Best equipped item name per slot, for highscores.
    pub fn equipped_name(&self, slot: EquipmentSlot) -> Option<String> {
        self.equipment.get(slot).as_ref().map(|i| i.name_key.clone())
    }
}
