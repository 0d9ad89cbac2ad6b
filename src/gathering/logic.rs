//! Resource hunt: short-lived orbs the player clicks for iron ore and gems.
//!
//! The hunt runs on the same tick as quests but never pauses with them.

use crate::character::model::{Character, Resource};
use crate::core::constants::*;
use crate::error::Rejection;
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Orb {
    pub id: u64,
    pub resource: Resource,
    pub ticks_left: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HuntEvent {
    OrbSpawned { id: u64, resource: Resource },
    OrbExpired { id: u64 },
}

#[derive(Debug, Clone, Default)]
pub struct ResourceHunt {
    running: bool,
    orbs: Vec<Orb>,
    next_id: u64,
    spawn_countdown: u32,
}

impl ResourceHunt {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn orbs(&self) -> &[Orb] {
        &self.orbs
    }

    /// Starts the hunt. The first orb comes sooner than the rest.
    pub fn start(&mut self, rng: &mut impl Rng) {
        self.running = true;
        self.spawn_countdown = rng.gen_range(ORB_FIRST_SPAWN_MIN_TICKS..=ORB_FIRST_SPAWN_MAX_TICKS);
    }

    /// Stops the hunt and clears the field.
    pub fn stop(&mut self) {
        self.running = false;
        self.orbs.clear();
    }

    pub fn tick(&mut self, rng: &mut impl Rng) -> Vec<HuntEvent> {
        if !self.running {
            return Vec::new();
        }
        let mut events = Vec::new();

        for orb in &mut self.orbs {
            orb.ticks_left = orb.ticks_left.saturating_sub(1);
        }
        self.orbs.retain(|orb| {
            if orb.ticks_left == 0 {
                log::debug!("orb {} expired", orb.id);
                events.push(HuntEvent::OrbExpired { id: orb.id });
                false
            } else {
                true
            }
        });

        self.spawn_countdown = self.spawn_countdown.saturating_sub(1);
        if self.spawn_countdown == 0 {
            let orb = self.spawn(rng);
            events.push(HuntEvent::OrbSpawned {
                id: orb.id,
                resource: orb.resource,
            });
            self.spawn_countdown = rng.gen_range(ORB_SPAWN_MIN_TICKS..=ORB_SPAWN_MAX_TICKS);
        }
        events
    }

    fn spawn(&mut self, rng: &mut impl Rng) -> Orb {
        let resource = if rng.gen_bool(ORB_IRON_ORE_CHANCE) {
            Resource::IronOre
        } else {
            Resource::Gem
        };
        self.next_id += 1;
        let orb = Orb {
            id: self.next_id,
            resource,
            ticks_left: rng.gen_range(ORB_LIFESPAN_MIN_TICKS..=ORB_LIFESPAN_MAX_TICKS),
        };
        log::debug!("orb {} spawned ({:?})", orb.id, orb.resource);
        self.orbs.push(orb);
        orb
    }

    /// Picks up an orb and grants one unit of its resource.
    pub fn collect(&mut self, character: &mut Character, id: u64) -> Result<Resource, Rejection> {
        if !self.running {
            return Err(Rejection::HuntInactive);
        }
        let index = self
            .orbs
            .iter()
            .position(|orb| orb.id == id)
            .ok_or(Rejection::UnknownOrb(id))?;
        let orb = self.orbs.remove(index);
        character.add_resource(orb.resource, 1);
        Ok(orb.resource)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::class::CharacterClass;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn run(hunt: &mut ResourceHunt, rng: &mut ChaCha8Rng, ticks: u32) -> Vec<HuntEvent> {
        (0..ticks).flat_map(|_| hunt.tick(rng)).collect()
    }

    #[test]
    fn test_idle_hunt_does_nothing() {
        let mut hunt = ResourceHunt::new();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!(run(&mut hunt, &mut rng, 100).is_empty());
    }

    #[test]
    fn test_first_orb_spawns_quickly() {
        let mut hunt = ResourceHunt::new();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        hunt.start(&mut rng);
        let events = run(&mut hunt, &mut rng, ORB_FIRST_SPAWN_MAX_TICKS);
        assert!(matches!(events[..], [HuntEvent::OrbSpawned { id: 1, .. }]));
        assert_eq!(hunt.orbs().len(), 1);
    }

    #[test]
    fn test_orbs_expire_within_lifespan() {
        let mut hunt = ResourceHunt::new();
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        hunt.start(&mut rng);
        let events = run(&mut hunt, &mut rng, 2000);
        let spawned = events
            .iter()
            .filter(|e| matches!(e, HuntEvent::OrbSpawned { .. }))
            .count();
        let expired = events
            .iter()
            .filter(|e| matches!(e, HuntEvent::OrbExpired { .. }))
            .count();
        assert!(spawned >= 2000 / ORB_SPAWN_MAX_TICKS as usize);
        assert!(spawned - expired <= 2);
        assert!(hunt.orbs().iter().all(|o| o.ticks_left <= ORB_LIFESPAN_MAX_TICKS));
    }

    #[test]
    fn test_resource_mix_mostly_iron() {
        let mut hunt = ResourceHunt::new();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        hunt.start(&mut rng);
        let mut iron = 0;
        let mut total = 0;
        for event in run(&mut hunt, &mut rng, 50_000) {
            if let HuntEvent::OrbSpawned { resource, .. } = event {
                total += 1;
                if resource == Resource::IronOre {
                    iron += 1;
                }
            }
        }
        let ratio = iron as f64 / total as f64;
        assert!((ratio - 0.8).abs() < 0.05, "ratio {}", ratio);
    }

    #[test]
    fn test_collect_grants_resource_once() {
        let mut hunt = ResourceHunt::new();
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let mut c = Character::new("Gatherer", CharacterClass::Rogue);
        hunt.start(&mut rng);
        run(&mut hunt, &mut rng, ORB_FIRST_SPAWN_MAX_TICKS);
        let orb = hunt.orbs()[0];
        assert_eq!(hunt.collect(&mut c, orb.id), Ok(orb.resource));
        assert_eq!(c.resource(orb.resource), 1);
        assert_eq!(hunt.collect(&mut c, orb.id), Err(Rejection::UnknownOrb(orb.id)));
    }

    #[test]
    fn test_stop_clears_orbs() {
        let mut hunt = ResourceHunt::new();
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let mut c = Character::new("Gatherer", CharacterClass::Rogue);
        hunt.start(&mut rng);
        run(&mut hunt, &mut rng, ORB_FIRST_SPAWN_MAX_TICKS);
        hunt.stop();
        assert!(hunt.orbs().is_empty());
        assert_eq!(hunt.collect(&mut c, 1), Err(Rejection::HuntInactive));
    }
}
