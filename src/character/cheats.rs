use super::model::{Character, Resource};
use crate::core::constants::CHEAT_RESOURCE_GRANT;
use serde::{Deserialize, Serialize};

/// Commands the input layer can issue once a cheat code was recognized.
/// Any cheat marks the character so highscores can flag it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cheat {
    GrantResources,
    ToggleImmortality,
}

impl Character {
    pub fn apply_cheat(&mut self, cheat: Cheat) {
        match cheat {
            Cheat::GrantResources => {
                self.add_resource(Resource::IronOre, CHEAT_RESOURCE_GRANT);
                self.add_resource(Resource::Gem, CHEAT_RESOURCE_GRANT);
            }
            Cheat::ToggleImmortality => self.is_immortal = !self.is_immortal,
        }
        self.cheat_activated = true;
        log::info!("{} used cheat {:?}", self.name, cheat);
    }
}
