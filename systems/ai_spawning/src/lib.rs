#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic enemy spawn scheduler.
//!
//! The enemy side fields units on a timer instead of a training queue: the
//! first spawn is scheduled a fixed delay after the first observed tick, and
//! every spawn reschedules the next one by the delay of the archetype just
//! fielded. Archetype choice is uniform from a ChaCha generator seeded at
//! construction, so a match replays identically for the same seed.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use lane_clash_core::{
    Command, Event, Side, Timestamp, UnitKind, ENEMY_FIRST_SPAWN_DELAY,
};

/// Configuration parameters required to construct the spawn scheduler.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration using the provided seed.
    #[must_use]
    pub const fn new(rng_seed: u64) -> Self {
        Self { rng_seed }
    }
}

/// Pure system that emits enemy spawn commands on its own cadence.
#[derive(Debug)]
pub struct AiSpawning {
    next_spawn: Option<Timestamp>,
    rng: ChaCha8Rng,
}

impl AiSpawning {
    /// Creates a new spawn scheduler using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            next_spawn: None,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        }
    }

    /// Consumes world events and emits at most one spawn command per tick.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<Command>) {
        for event in events {
            let Event::TimeAdvanced { now } = event else {
                continue;
            };

            match self.next_spawn {
                None => {
                    self.next_spawn = Some(now.advanced_by(ENEMY_FIRST_SPAWN_DELAY));
                }
                Some(due) if *now >= due => {
                    let kind = self.roll_archetype();
                    out.push(Command::SpawnUnit {
                        side: Side::Enemy,
                        kind,
                    });
                    self.next_spawn = Some(now.advanced_by(kind.spawn_delay()));
                }
                Some(_) => {}
            }
        }
    }

    fn roll_archetype(&mut self) -> UnitKind {
        let index = self.rng.gen_range(0..UnitKind::ALL.len());
        UnitKind::ALL[index]
    }
}
