// Tick and timing
pub const TICK_INTERVAL_MS: u64 = 150;
pub const TICKS_PER_SECOND: f64 = 1000.0 / TICK_INTERVAL_MS as f64;
pub const AUTO_QUEST_RESTART_TICKS: u32 = 7; // ~1s
pub const LEVEL_UP_MODAL_TICKS: u32 = 33; // ~5s countdown dialog
pub const ARENA_BOSS_TURN_DELAY_TICKS: u32 = 7; // ~1s

// Character creation
pub const STARTING_LEVEL: u32 = 1;
pub const STARTING_XP_TO_NEXT: u64 = 100;
pub const STARTING_INVENTORY_SIZE: usize = 10;
pub const NUM_STATS: usize = 4;

// XP curve: int(XP_CURVE_BASE * level^XP_CURVE_EXPONENT)
pub const XP_CURVE_BASE: f64 = 100.0;
pub const XP_CURVE_EXPONENT: f64 = 1.5;
pub const LEVEL_UP_MIN_STATS: usize = 1;
pub const LEVEL_UP_MAX_STATS: usize = 2;
pub const LEVEL_UP_MIN_GAIN: u32 = 1;
pub const LEVEL_UP_MAX_GAIN: u32 = 2;

// Derived pools
pub const LP_BASE: u32 = 50;
pub const LP_PER_STRENGTH: u32 = 5;
pub const MANA_BASE: u32 = 30;
pub const MANA_PER_INTELLIGENCE: u32 = 3;
pub const ENERGY_BASE: u32 = 50;
pub const ENERGY_PER_AGILITY: u32 = 5;
pub const RAGE_BASE: u32 = 30;
pub const RAGE_PER_STRENGTH: u32 = 3;

// Rebirth
pub const REBIRTH_ATTRIBUTE_GAIN_PERCENT: f64 = 0.10;
pub const KEEP_INVENTORY_SIZE_REBIRTHS: u32 = 5;
pub const AUTO_EQUIP_REBIRTHS: u32 = 10;

// Inventory and trader
pub const AUTO_SELL_INVENTORY_SIZE: usize = 50;
pub const INVENTORY_UPGRADE_BASE_COST: u64 = 1000;
pub const INVENTORY_UPGRADE_COST_FACTOR: f64 = 1.8;
pub const INVENTORY_UPGRADE_SLOTS: usize = 5;

// Item scoring and value
pub const MAIN_STAT_WEIGHT: f64 = 1.5;
pub const UPGRADE_VALUE_STEP: f64 = 0.5;

// Loot generation
pub const LOOT_STAT_PER_LEVEL: f64 = 0.9;
pub const LOOT_JITTER_MIN: f64 = 0.95;
pub const LOOT_JITTER_MAX: f64 = 1.05;
pub const SECONDARY_STAT_RATIO: f64 = 0.4;
pub const TERTIARY_STAT_RATIO: f64 = 0.25;
pub const LOOT_VALUE_PER_LEVEL: f64 = 1.5;
pub const LOOT_VALUE_PER_STAT: f64 = 2.0;

// Boss rewards
pub const BOSS_REWARD_SCORE_FACTOR: f64 = 1.2;
pub const BOSS_REWARD_PER_LEVEL: f64 = 1.5;
pub const BOSS_REWARD_RARE_BELOW_LEVEL: u32 = 15;
pub const BOSS_REWARD_EPIC_BELOW_LEVEL: u32 = 30;
pub const BOSS_REWARD_MAIN_STAT_CHANCE: f64 = 0.75;
pub const BOSS_REWARD_MAIN_BONUS_RATIO: f64 = 0.4;
pub const BOSS_REWARD_LUCK_RATIO: f64 = 0.5;
pub const BOSS_REFORGE_MIN: f64 = 1.05;
pub const BOSS_REFORGE_MAX: f64 = 1.10;
pub const BOSS_REWARD_VALUE_PER_LEVEL: f64 = 5.0;
pub const BOSS_REWARD_VALUE_PER_STAT: f64 = 4.0;

// Boss scaling
pub const BOSS_ITEM_LEVEL_DIVISOR: f64 = 10.0;
pub const BOSS_ITEM_LEVEL_EXPONENT: f64 = 1.2;
pub const BOSS_REBIRTH_REDUCTION_PER_REBIRTH: f64 = 0.05;
pub const BOSS_REBIRTH_REDUCTION_CAP: f64 = 0.5;
pub const BOSS_WEAKENED_MULTIPLIER: f64 = 1.5;

// Arena
pub const EMPOWERED_MULTIPLIER: f64 = 1.5;
pub const DEFEND_HEAL_DIVISOR: u32 = 10;
pub const DEFEND_COUNTER_DIVISOR: u32 = 4;
pub const BOSS_XP_PER_HP: u64 = 5;

// Quest
pub const DEFAULT_QUEST_DURATION: u32 = 40;
pub const QUEST_PROGRESS_STAT_DIVISOR: f64 = 50.0;
pub const QUEST_FALLBACK_MAIN_STAT: u32 = 5;
pub const QUEST_ACTION_RESOURCE_COST: u32 = 2;
pub const QUEST_FLAVOR_CHANCE: f64 = 0.2;
pub const QUEST_COMPLETION_DAMAGE_MIN: u32 = 5;
pub const QUEST_COMPLETION_DAMAGE_MAX: u32 = 15;
pub const QUEST_COPPER_MIN: u64 = 50;
pub const QUEST_COPPER_MAX: u64 = 250;
pub const QUEST_COPPER_PER_DURATION: u64 = 10;
pub const QUEST_XP_MIN: u64 = 20;
pub const QUEST_XP_MAX: u64 = 40;
pub const QUEST_XP_PER_DURATION: u64 = 2;
pub const QUEST_ITEM_BASE_CHANCE: f64 = 0.7;
pub const QUEST_ITEM_LUCK_DIVISOR: f64 = 200.0;
pub const QUEST_ITEM_MAX_CHANCE: f64 = 0.95;
pub const LOW_HEALTH_FRACTION: f64 = 0.1;

// Blacksmith
pub const IRON_ORE_PER_LEVEL: u32 = 5;
pub const GEM_FREE_LEVELS: u32 = 5;
pub const GEM_PER_LEVEL: u32 = 2;

// Resource hunt (ticks at TICK_INTERVAL_MS)
pub const ORB_FIRST_SPAWN_MIN_TICKS: u32 = 3; // ~0.5s
pub const ORB_FIRST_SPAWN_MAX_TICKS: u32 = 10; // ~1.5s
pub const ORB_SPAWN_MIN_TICKS: u32 = 13; // ~2s
pub const ORB_SPAWN_MAX_TICKS: u32 = 33; // ~5s
pub const ORB_LIFESPAN_MIN_TICKS: u32 = 13; // ~2s
pub const ORB_LIFESPAN_MAX_TICKS: u32 = 20; // ~3s
pub const ORB_IRON_ORE_CHANCE: f64 = 0.8;

// Cheats
pub const CHEAT_RESOURCE_GRANT: u32 = 100;

// Persistence
pub const SAVE_VERSION: u32 = 2;
pub const MAX_HIGHSCORES: usize = 10;

// Currency
pub const COPPER_PER_SILVER: u64 = 100;
pub const SILVER_PER_GOLD: u64 = 100;
