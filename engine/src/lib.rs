#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Match orchestration for Lane Clash.
//!
//! The engine owns the authoritative world plus every pure system and drives
//! the fixed per-tick pipeline: clock and training, enemy spawning, turret
//! fire per side, unit movement and attacks per side, projectile flight, the
//! dead sweep, and finally the terminal check. The stage order is a
//! correctness invariant; later stages rely on earlier ones having fully
//! applied. The engine also exposes the player-facing mutation facade whose
//! failures are all value-returned.

use lane_clash_core::{
    AbilityError, AbilityKind, AbilityTarget, Command, Event, GameStatus, PlacementError,
    QueueError, SellError, Side, TargetRef, Timestamp, TurretKind, UnitKind, UpgradeError,
    UpgradeKind,
};
use lane_clash_system_ai_spawning::{AiSpawning, Config as SpawnConfig};
use lane_clash_system_projectile_flight::{plan_flight, ResolvedTarget};
use lane_clash_system_turret_combat::TurretCombat;
use lane_clash_system_unit_combat::plan_unit_action;
use lane_clash_world::{apply, query, Config as WorldConfig, World};

const DEFAULT_STARTING_CURRENCY: i32 = 1_000;
const DEFAULT_BASE_HP: i32 = 500;
const DEFAULT_VARIANCE_SEED: u64 = 0x51c2_9aa0_77e3_bd17;
const DEFAULT_SPAWN_SEED: u64 = 0x9e37_79b9_7f4a_7c15;

/// Configuration for a full match, including both RNG seeds.
#[derive(Clone, Copy, Debug)]
pub struct MatchConfig {
    /// Starting currency granted to the player.
    pub starting_currency: i32,
    /// Initial and maximum hit points of both bases.
    pub base_hp: i32,
    /// Seed of the damage-variance generator.
    pub variance_seed: u64,
    /// Seed of the enemy archetype generator.
    pub spawn_seed: u64,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            starting_currency: DEFAULT_STARTING_CURRENCY,
            base_hp: DEFAULT_BASE_HP,
            variance_seed: DEFAULT_VARIANCE_SEED,
            spawn_seed: DEFAULT_SPAWN_SEED,
        }
    }
}

impl MatchConfig {
    fn world_config(&self) -> WorldConfig {
        WorldConfig::new(self.starting_currency, self.base_hp, self.variance_seed)
    }
}

/// Drives one Lane Clash match from construction to a terminal state.
#[derive(Debug)]
pub struct Engine {
    config: MatchConfig,
    world: World,
    spawning: AiSpawning,
    turret_combat: TurretCombat,
    tick_events: Vec<Event>,
    command_scratch: Vec<Command>,
}

impl Engine {
    /// Creates a new engine with a fresh match world.
    #[must_use]
    pub fn new(config: MatchConfig) -> Self {
        Self {
            config,
            world: World::new(config.world_config()),
            spawning: AiSpawning::new(SpawnConfig::new(config.spawn_seed)),
            turret_combat: TurretCombat::new(),
            tick_events: Vec::new(),
            command_scratch: Vec::new(),
        }
    }

    /// Read-only access to the authoritative world for `query` calls.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Events broadcast during the most recent tick.
    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.tick_events
    }

    /// Rebuilds the match from the stored configuration.
    ///
    /// Every one-shot upgrade flag, roster, cooldown, and both RNG streams
    /// restart from scratch; the previous match leaves no residue.
    pub fn reset(&mut self) {
        self.world = World::new(self.config.world_config());
        self.spawning = AiSpawning::new(SpawnConfig::new(self.config.spawn_seed));
        self.turret_combat = TurretCombat::new();
        self.tick_events.clear();
        self.command_scratch.clear();
    }

    /// Advances the match by one tick at the provided monotonic timestamp.
    pub fn tick(&mut self, now: Timestamp) -> GameStatus {
        self.tick_events.clear();

        apply(&mut self.world, Command::Tick { now }, &mut self.tick_events);

        self.run_spawning();
        self.run_turret_pass(now, Side::Player);
        self.run_turret_pass(now, Side::Enemy);
        self.run_unit_pass(now, Side::Player);
        self.run_unit_pass(now, Side::Enemy);
        self.run_projectile_pass();

        apply(&mut self.world, Command::SweepDead, &mut self.tick_events);

        query::game_status(&self.world)
    }

    fn run_spawning(&mut self) {
        let mut commands = std::mem::take(&mut self.command_scratch);
        commands.clear();
        self.spawning.handle(&self.tick_events, &mut commands);
        for command in commands.drain(..) {
            apply(&mut self.world, command, &mut self.tick_events);
        }
        self.command_scratch = commands;
    }

    fn run_turret_pass(&mut self, now: Timestamp, side: Side) {
        let mut commands = std::mem::take(&mut self.command_scratch);
        commands.clear();
        let turrets = query::turret_view(&self.world, side);
        let enemies = query::unit_view(&self.world, side.opponent());
        self.turret_combat
            .handle(now, side, &turrets, &enemies, &mut commands);
        for command in commands.drain(..) {
            apply(&mut self.world, command, &mut self.tick_events);
        }
        self.command_scratch = commands;
    }

    fn run_unit_pass(&mut self, now: Timestamp, side: Side) {
        // Planning and applying interleave on purpose: each ally observes
        // every earlier ally's movement and kills from this same pass.
        for unit_id in query::unit_ids(&self.world, side) {
            let Some(unit) = query::unit_snapshot(&self.world, side, unit_id) else {
                continue;
            };
            if !unit.is_alive() {
                continue;
            }

            let allies = query::unit_view(&self.world, side);
            let enemies = query::unit_view(&self.world, side.opponent());
            let enemy_base = query::base_snapshot(&self.world, side.opponent());
            let plan = plan_unit_action(&unit, side, &allies, &enemies, &enemy_base, now);

            if let Some(to) = plan.advance {
                apply(
                    &mut self.world,
                    Command::MoveUnit {
                        side,
                        unit: unit_id,
                        to,
                    },
                    &mut self.tick_events,
                );
            }
            if let Some(target) = plan.strike {
                apply(
                    &mut self.world,
                    Command::Strike {
                        side,
                        attacker: unit_id,
                        target,
                    },
                    &mut self.tick_events,
                );
            }
        }
    }

    fn run_projectile_pass(&mut self) {
        // Same interleaving rationale: a projectile that kills a unit makes
        // every later projectile chasing it discard without damage.
        for projectile_id in query::projectile_ids(&self.world) {
            let Some(snapshot) = query::projectile_snapshot(&self.world, projectile_id) else {
                continue;
            };
            let target = resolve_target(&self.world, snapshot.target);
            let step = plan_flight(&snapshot, target);
            apply(
                &mut self.world,
                Command::SettleProjectile {
                    projectile: projectile_id,
                    x: step.x,
                    y: step.y,
                    outcome: step.outcome,
                },
                &mut self.tick_events,
            );
        }
    }

    /// Requests that a blueprint join the player's training queue.
    pub fn queue_unit(&mut self, kind: UnitKind) -> Result<(), QueueError> {
        let events = self.apply_command(Command::QueueUnit { kind });
        for event in &events {
            match event {
                Event::UnitQueued { .. } => return Ok(()),
                Event::QueueRejected { reason, .. } => return Err(*reason),
                _ => {}
            }
        }
        Ok(())
    }

    /// Requests placement of a turret, returning the occupied slot index.
    pub fn place_turret(&mut self, kind: TurretKind) -> Result<usize, PlacementError> {
        let events = self.apply_command(Command::PlaceTurret { kind });
        for event in &events {
            match event {
                Event::TurretPlaced { slot, .. } => return Ok(*slot),
                Event::TurretPlacementRejected { reason, .. } => return Err(*reason),
                _ => {}
            }
        }
        Err(PlacementError::NoFreeSlot)
    }

    /// Sells the turret in the given slot, returning the refunded amount.
    pub fn sell_turret(&mut self, slot: usize) -> Result<i32, SellError> {
        let events = self.apply_command(Command::SellTurret { slot });
        for event in &events {
            match event {
                Event::TurretSold { refund, .. } => return Ok(*refund),
                Event::TurretSaleRejected { reason, .. } => return Err(*reason),
                _ => {}
            }
        }
        Err(SellError::InvalidSlot)
    }

    /// Activates an ability against the provided victim selection.
    pub fn use_ability(
        &mut self,
        ability: AbilityKind,
        target: AbilityTarget,
    ) -> Result<(), AbilityError> {
        let events = self.apply_command(Command::UseAbility { ability, target });
        for event in &events {
            match event {
                Event::AbilityUsed { .. } => return Ok(()),
                Event::AbilityRejected { reason, .. } => return Err(*reason),
                _ => {}
            }
        }
        Ok(())
    }

    /// Purchases a one-shot upgrade at the quoted cost.
    pub fn apply_upgrade(&mut self, upgrade: UpgradeKind, cost: i32) -> Result<(), UpgradeError> {
        let events = self.apply_command(Command::ApplyUpgrade { upgrade, cost });
        for event in &events {
            match event {
                Event::UpgradeApplied { .. } => return Ok(()),
                Event::UpgradeRejected { reason, .. } => return Err(*reason),
                _ => {}
            }
        }
        Ok(())
    }

    fn apply_command(&mut self, command: Command) -> Vec<Event> {
        let mut events = Vec::new();
        apply(&mut self.world, command, &mut events);
        events
    }
}

fn resolve_target(world: &World, target: TargetRef) -> ResolvedTarget {
    match target {
        TargetRef::Unit(id) => query::unit_snapshot(world, Side::Player, id)
            .or_else(|| query::unit_snapshot(world, Side::Enemy, id))
            .map(|unit| ResolvedTarget::Unit {
                coordinate: unit.coordinate,
                alive: unit.is_alive(),
            })
            .unwrap_or(ResolvedTarget::Gone),
        TargetRef::Base(side) => ResolvedTarget::Base {
            side,
            alive: query::base_snapshot(world, side).is_alive(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::{Engine, MatchConfig};
    use lane_clash_core::{GameStatus, Timestamp, UnitKind};
    use lane_clash_world::query;
    use std::time::Duration;

    #[test]
    fn fresh_match_is_ongoing() {
        let mut engine = Engine::new(MatchConfig::default());
        let status = engine.tick(Timestamp::from_nanos(1));
        assert_eq!(status, GameStatus::Ongoing);
    }

    #[test]
    fn reset_restores_starting_balance_and_empty_rosters() {
        let mut engine = Engine::new(MatchConfig::default());
        engine
            .queue_unit(UnitKind::Melee)
            .expect("queue should accept");
        assert_eq!(query::balance(engine.world()), 950);

        engine.reset();
        assert_eq!(query::balance(engine.world()), 1_000);
        assert_eq!(query::training_snapshot(engine.world()).queue_depth, 0);
    }

    #[test]
    fn enemy_spawns_appear_after_the_initial_delay() {
        let mut engine = Engine::new(MatchConfig::default());
        let mut now = Timestamp::from_nanos(1);
        let _ = engine.tick(now);

        now = now.advanced_by(Duration::from_secs(2));
        let _ = engine.tick(now);
        assert_eq!(
            query::unit_view(engine.world(), lane_clash_core::Side::Enemy).len(),
            1
        );
    }
}
