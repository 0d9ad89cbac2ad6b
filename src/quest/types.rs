use crate::core::content::{GameContent, QuestTemplate};
use crate::error::ContentError;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestPhase {
    Travel,
    Action,
    Return,
}

impl QuestPhase {
    /// Phase for `progress` out of `duration`, split into equal thirds.
    pub fn for_progress(progress: f64, duration: u32) -> Self {
        let third = duration as f64 / 3.0;
        if progress < third {
            QuestPhase::Travel
        } else if progress < third * 2.0 {
            QuestPhase::Action
        } else {
            QuestPhase::Return
        }
    }

    pub fn name_key(&self) -> &'static str {
        match self {
            QuestPhase::Travel => "phase_travel",
            QuestPhase::Action => "phase_action",
            QuestPhase::Return => "phase_return",
        }
    }
}

/// Text keys picked once when the quest starts, one per phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestTexts {
    pub location_key: String,
    pub action_key: String,
    pub return_key: String,
}

impl QuestTexts {
    pub fn for_phase(&self, phase: QuestPhase) -> &str {
        match phase {
            QuestPhase::Travel => &self.location_key,
            QuestPhase::Action => &self.action_key,
            QuestPhase::Return => &self.return_key,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quest {
    pub key: String,
    pub duration: u32,
    pub progress: f64,
    pub phase: QuestPhase,
    pub texts: QuestTexts,
}

impl Quest {
    pub fn new(template: &QuestTemplate, texts: QuestTexts) -> Self {
        Self {
            key: template.key.to_string(),
            duration: template.duration,
            progress: 0.0,
            phase: QuestPhase::Travel,
            texts,
        }
    }

    /// Picks a random quest template and random phase texts.
    pub fn random(content: &GameContent, rng: &mut impl Rng) -> Result<Self, ContentError> {
        let template = content.quests.choose(rng).ok_or(ContentError::NoQuests)?;
        let texts = QuestTexts {
            location_key: pick_key(&content.phase_texts.locations, rng)?,
            action_key: pick_key(&content.phase_texts.actions, rng)?,
            return_key: pick_key(&content.phase_texts.returns, rng)?,
        };
        Ok(Self::new(template, texts))
    }

    pub fn is_complete(&self) -> bool {
        self.progress >= self.duration as f64
    }

    /// Progress as a fraction in `[0, 1]`.
    pub fn fraction(&self) -> f64 {
        if self.duration == 0 {
            return 1.0;
        }
        (self.progress / self.duration as f64).min(1.0)
    }
}

fn pick_key(keys: &[&'static str], rng: &mut impl Rng) -> Result<String, ContentError> {
    keys.choose(rng)
        .map(|k| k.to_string())
        .ok_or(ContentError::NoPhaseTexts)
}
