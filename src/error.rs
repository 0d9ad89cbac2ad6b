//! Error types shared across the engine.
//!
//! [`Rejection`] is the reason code for a refused command: the operation had
//! no effect and the caller decides what to show. [`EngineError`] marks a
//! broken invariant that aborts the operation in progress. [`PersistError`]
//! only ever crosses the save/highscore boundary.

use crate::character::class::CharacterClass;
use crate::character::attributes::Stat;
use crate::items::types::{ArmorType, EquipmentSlot};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("no item at inventory index {0}")]
    InvalidIndex(usize),
    #[error("item cannot be used for this action")]
    WrongItemType,
    #[error("{class:?} cannot wear {armor:?} armor")]
    ArmorNotAllowed {
        class: CharacterClass,
        armor: ArmorType,
    },
    #[error("not enough copper: need {needed}, have {available}")]
    InsufficientFunds { needed: u64, available: u64 },
    #[error("not enough resources for this upgrade")]
    InsufficientResources,
    #[error("item is already at its maximum upgrade level")]
    MaxUpgradeLevel,
    #[error("nothing equipped in {0:?}")]
    EmptySlot(EquipmentSlot),
    #[error("inventory is full")]
    InventoryFull,
    #[error("a quest is already in progress")]
    QuestActive,
    #[error("no boss can be challenged right now")]
    BossUnavailable,
    #[error("no boss fight in progress")]
    NoActiveFight,
    #[error("the fight is already over")]
    FightOver,
    #[error("it is not the player's turn")]
    NotPlayerTurn,
    #[error("the boss is not ready to act")]
    BossNotReady,
    #[error("no resource orb with id {0}")]
    UnknownOrb(u64),
    #[error("the resource hunt is not running")]
    HuntInactive,
    #[error("the session has ended")]
    SessionOver,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("main stat for {0:?} could not be resolved")]
    MainStatUnresolved(CharacterClass),
    #[error("no blueprint for slot {slot:?} with primary stat {stat:?}")]
    MissingBlueprint { slot: EquipmentSlot, stat: Stat },
    #[error("invalid game content: {0}")]
    Content(#[from] ContentError),
}

/// Outcome of a command that can either be refused or hit a broken invariant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error(transparent)]
    Rejected(#[from] Rejection),
    #[error(transparent)]
    Fatal(#[from] EngineError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContentError {
    #[error("no blueprints for slot {0:?}")]
    EmptySlot(EquipmentSlot),
    #[error("{class:?} has no {slot:?} blueprint for its main stat")]
    ClassNotCovered {
        class: CharacterClass,
        slot: EquipmentSlot,
    },
    #[error("boss ladder is empty")]
    EmptyBossLadder,
    #[error("boss tier {0} requires a lower item level than the tier before it")]
    BossLadderOutOfOrder(usize),
    #[error("boss tier {0} has an inverted damage range")]
    InvalidDamageRange(usize),
    #[error("no quest templates")]
    NoQuests,
    #[error("{0:?} has no flavor events")]
    NoFlavorEvents(CharacterClass),
    #[error("quest phase text table is empty")]
    NoPhaseTexts,
}

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Checksum mismatch for {0}")]
    ChecksumMismatch(String),
    #[error("Unsupported save version: {found} (newest known is {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },
    #[error("Could not determine home directory")]
    NoHomeDir,
}
