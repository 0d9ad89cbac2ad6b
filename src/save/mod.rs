//! Character snapshots, the highscore table and the game-over bookkeeping
//! that ties them to a session.

pub mod highscores;
pub mod store;

pub use highscores::*;
pub use store::*;

use crate::character::progression::RebirthSummary;
use crate::core::session::{GameOverCause, GameSession};
use rand::Rng;
use std::path::Path;

#[derive(Debug, Clone, PartialEq)]
pub struct GameOverRecord {
    pub cause: GameOverCause,
    /// 1-based highscore rank, if the run made the table.
    pub rank: Option<usize>,
    /// Present when a boss death led to rebirth.
    pub rebirth: Option<RebirthSummary>,
}

/// Settles a finished run: records the highscore, then either deletes the
/// save (quest death) or reincarnates the character and saves it (boss
/// death). Write failures are logged and do not abort. Returns None while the
/// session is still running.
pub fn record_game_over<R: Rng>(
    session: &mut GameSession<'_, R>,
    store: &CharacterStore,
    highscores_path: &Path,
) -> Option<GameOverRecord> {
    let cause = session.game_over()?;

    let mut table = HighscoreTable::load(highscores_path);
    let rank = table.insert(HighscoreEntry::from_character(session.character()));
    if let Err(e) = table.save(highscores_path) {
        log::warn!("could not write highscores: {}", e);
    }

    let rebirth = match cause {
        GameOverCause::Quest => {
            let filename = CharacterStore::filename_for(session.character());
            if let Err(e) = store.delete(&filename) {
                log::warn!("could not delete {}: {}", filename, e);
            }
            None
        }
        GameOverCause::Boss => {
            let summary = session.rebirth().ok();
            if let Err(e) = store.save(session.character()) {
                log::warn!("could not save reborn {}: {}", session.character().name, e);
            }
            summary
        }
    };

    Some(GameOverRecord {
        cause,
        rank,
        rebirth,
    })
}
