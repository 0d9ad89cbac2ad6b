//! Trader: selling, potions and inventory expansion.

use crate::character::derived_stats::PoolKind;
use crate::character::model::{Character, Notification, Unlock};
use crate::core::constants::*;
use crate::core::content::{GameContent, PotionDef};
use crate::error::Rejection;
use crate::items::generation::potion_item;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct JunkSale {
    pub count: usize,
    pub copper: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryExpansion {
    pub new_size: usize,
    pub paid: u64,
    pub next_cost: u64,
}

/// Sells the inventory item at `index` for its current value.
pub fn sell_item(character: &mut Character, index: usize) -> Result<u64, Rejection> {
    if index >= character.inventory.len() {
        return Err(Rejection::InvalidIndex(index));
    }
    let item = character.inventory.remove(index);
    let copper = item.value();
    character.copper += copper;
    log::info!("{} sold {} for {}", character.name, item.name_key, copper);
    Ok(copper)
}

/// Sells every piece of equipment in the inventory that would not be an
/// upgrade. Consumables stay.
pub fn sell_all_junk(character: &mut Character) -> JunkSale {
    let (junk, keep): (Vec<_>, Vec<_>) = std::mem::take(&mut character.inventory)
        .into_iter()
        .partition(|item| item.is_equipment() && !character.is_upgrade(item));
    character.inventory = keep;

    let sale = JunkSale {
        count: junk.len(),
        copper: junk.iter().map(|item| item.value()).sum(),
    };
    character.copper += sale.copper;
    if sale.count > 0 {
        log::info!(
            "{} sold {} junk items for {}",
            character.name,
            sale.count,
            sale.copper
        );
    }
    sale
}

/// Buys five more inventory slots at the character's current price.
pub fn buy_inventory_upgrade(character: &mut Character) -> Result<InventoryExpansion, Rejection> {
    let cost = character.inventory_upgrade_cost;
    if character.copper < cost {
        return Err(Rejection::InsufficientFunds {
            needed: cost,
            available: character.copper,
        });
    }
    character.copper -= cost;
    character.max_inventory_size += INVENTORY_UPGRADE_SLOTS;
    character.inventory_upgrade_cost = (cost as f64 * INVENTORY_UPGRADE_COST_FACTOR) as u64;

    if character.max_inventory_size >= AUTO_SELL_INVENTORY_SIZE
        && !character.unlocks.auto_sell_notified
    {
        character.unlocks.auto_sell_notified = true;
        character.notify(Notification::Unlocked(Unlock::AutoSell));
        log::info!("{} unlocked auto-sell", character.name);
    }

    log::info!(
        "{} expanded inventory to {} slots",
        character.name,
        character.max_inventory_size
    );
    Ok(InventoryExpansion {
        new_size: character.max_inventory_size,
        paid: cost,
        next_cost: character.inventory_upgrade_cost,
    })
}

/// Potions the character may buy: level requirement met, and either a life
/// potion or one for the class's own pool.
pub fn potions_for_sale<'c>(content: &'c GameContent, character: &Character) -> Vec<&'c PotionDef> {
    let class_pool = character.class.def().secondary_pool;
    content
        .potions
        .iter()
        .filter(|p| character.level >= p.level_requirement)
        .filter(|p| p.pool == PoolKind::Life || p.pool == class_pool)
        .collect()
}

pub fn buy_potion(character: &mut Character, potion: &PotionDef) -> Result<(), Rejection> {
    if character.inventory_full() {
        return Err(Rejection::InventoryFull);
    }
    if character.copper < potion.cost {
        return Err(Rejection::InsufficientFunds {
            needed: potion.cost,
            available: character.copper,
        });
    }
    character.copper -= potion.cost;
    character.inventory.push(potion_item(potion));
    log::info!("{} bought {}", character.name, potion.name_key);
    Ok(())
}
