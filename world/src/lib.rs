#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative match state management for Lane Clash.
//!
//! The world owns every piece of battle state: the economy, the one-shot
//! upgrade registry, both bases with their turret slots, both unit rosters,
//! projectiles in flight, the training queue, abilities, and the per-tick
//! damage-event log. All mutation flows through [`apply`], which executes a
//! [`Command`] and broadcasts [`Event`] values describing what actually
//! happened. Damage variance comes from a ChaCha generator seeded at
//! construction so a match replays identically for identical inputs.

mod ability;
mod economy;

use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use lane_clash_core::{
    field, AbilityError, AbilityKind, AbilityTarget, Command, DamageEvent, DamageKind, Event,
    FlightOutcome, PlacementError, ProjectileId, ProjectileKind, QueueError, SellError, Side,
    TargetRef, Timestamp, TurretKind, UnitId, UnitKind, UpgradeError, UpgradeKind,
    ARMORED_DAMAGE_REDUCTION, COUNTER_DAMAGE_MULTIPLIER, CURRENCY_REGEN_AMOUNT,
    CURRENCY_REGEN_INTERVAL, DAMAGE_VARIANCE_MIN, DAMAGE_VARIANCE_SPAN, ENEMY_KILL_BOUNTY_FACTOR,
    LONG_RANGE_DISTANCE_BONUS, TRAINING_QUEUE_CAPACITY, TURRET_CAPACITY_LIMIT,
    UNIT_ATTACK_UPGRADE_FACTOR, UNIT_HP_UPGRADE_FACTOR, WELCOME_BANNER,
};

use ability::Ability;
use economy::{Economy, UpgradeRegistry};

const DEFAULT_STARTING_CURRENCY: i32 = 1_000;
const DEFAULT_BASE_HP: i32 = 500;
const DEFAULT_VARIANCE_SEED: u64 = 0x51c2_9aa0_77e3_bd17;

/// Configuration parameters required to construct a match world.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    starting_currency: i32,
    base_hp: i32,
    variance_seed: u64,
}

impl Config {
    /// Creates a new configuration with explicit values.
    #[must_use]
    pub const fn new(starting_currency: i32, base_hp: i32, variance_seed: u64) -> Self {
        Self {
            starting_currency,
            base_hp,
            variance_seed,
        }
    }

    /// Starting currency granted to the player.
    #[must_use]
    pub const fn starting_currency(&self) -> i32 {
        self.starting_currency
    }

    /// Initial and maximum hit points of both bases.
    #[must_use]
    pub const fn base_hp(&self) -> i32 {
        self.base_hp
    }

    /// Seed of the damage-variance generator.
    #[must_use]
    pub const fn variance_seed(&self) -> u64 {
        self.variance_seed
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            starting_currency: DEFAULT_STARTING_CURRENCY,
            base_hp: DEFAULT_BASE_HP,
            variance_seed: DEFAULT_VARIANCE_SEED,
        }
    }
}

/// Represents the authoritative Lane Clash match state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    clock: Timestamp,
    economy: Economy,
    upgrades: UpgradeRegistry,
    player_base: Base,
    enemy_base: Base,
    player_units: Vec<UnitState>,
    enemy_units: Vec<UnitState>,
    projectiles: Vec<ProjectileState>,
    barracks: Barracks,
    nuke: Ability,
    damage_log: Vec<DamageEvent>,
    last_regen: Timestamp,
    next_unit_id: u32,
    next_projectile_id: u32,
    rng: ChaCha8Rng,
}

impl World {
    /// Creates a new match world ready for simulation.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            banner: WELCOME_BANNER,
            clock: Timestamp::default(),
            economy: Economy::new(config.starting_currency()),
            upgrades: UpgradeRegistry::default(),
            player_base: Base::new(config.base_hp()),
            enemy_base: Base::new(config.base_hp()),
            player_units: Vec::new(),
            enemy_units: Vec::new(),
            projectiles: Vec::new(),
            barracks: Barracks::new(),
            nuke: Ability::new(AbilityKind::Nuke),
            damage_log: Vec::new(),
            last_regen: Timestamp::default(),
            next_unit_id: 0,
            next_projectile_id: 0,
            rng: ChaCha8Rng::seed_from_u64(config.variance_seed()),
        }
    }

    fn advance_clock(&mut self, now: Timestamp, out_events: &mut Vec<Event>) {
        self.clock = now;
        self.damage_log.clear();
        out_events.push(Event::TimeAdvanced { now });

        if now.duration_since(self.last_regen) >= CURRENCY_REGEN_INTERVAL {
            self.economy.earn(CURRENCY_REGEN_AMOUNT);
            self.nuke.tick_cooldown();
            self.last_regen = now;
            out_events.push(Event::CurrencyEarned {
                amount: CURRENCY_REGEN_AMOUNT,
                balance: self.economy.balance(),
            });
        }

        self.advance_training(now, out_events);
    }

    fn advance_training(&mut self, now: Timestamp, out_events: &mut Vec<Event>) {
        if self.barracks.current.is_none() {
            if let Some(kind) = self.barracks.queue.pop_front() {
                self.barracks.current = Some(InFlight { kind, started: now });
                out_events.push(Event::TrainingStarted { kind });
            }
        }

        if let Some(in_flight) = self.barracks.current {
            if now.duration_since(in_flight.started) >= in_flight.kind.training_time() {
                self.barracks.current = None;
                self.spawn_unit(Side::Player, in_flight.kind, out_events);
            }
        }
    }

    fn queue_unit(&mut self, kind: UnitKind, out_events: &mut Vec<Event>) {
        if self.barracks.queue.len() >= TRAINING_QUEUE_CAPACITY {
            out_events.push(Event::QueueRejected {
                kind,
                reason: QueueError::QueueFull,
            });
            return;
        }
        if !self.economy.spend(kind.cost()) {
            out_events.push(Event::QueueRejected {
                kind,
                reason: QueueError::InsufficientFunds,
            });
            return;
        }

        self.barracks.queue.push_back(kind);
        out_events.push(Event::UnitQueued {
            kind,
            depth: self.barracks.queue.len(),
        });
    }

    fn spawn_unit(&mut self, side: Side, kind: UnitKind, out_events: &mut Vec<Event>) {
        let id = UnitId::new(self.next_unit_id);
        self.next_unit_id += 1;

        let hp = self.upgrades.resolved_hit_points(kind);
        let unit = UnitState {
            id,
            kind,
            hp,
            max_hp: hp,
            attack: self.upgrades.resolved_attack(kind),
            coordinate: field::spawn_x(side),
            last_attack: Timestamp::default(),
        };
        self.units_mut(side).push(unit);
        out_events.push(Event::UnitSpawned {
            side,
            unit: id,
            kind,
        });
    }

    fn place_turret(&mut self, kind: TurretKind, out_events: &mut Vec<Event>) {
        if !self.economy.can_afford(kind.cost()) {
            out_events.push(Event::TurretPlacementRejected {
                kind,
                reason: PlacementError::InsufficientFunds,
            });
            return;
        }
        if self.player_base.turrets.len() >= self.player_base.turret_capacity {
            out_events.push(Event::TurretPlacementRejected {
                kind,
                reason: PlacementError::NoFreeSlot,
            });
            return;
        }

        let _ = self.economy.spend(kind.cost());
        self.player_base.turrets.push(TurretState {
            kind,
            last_fire: Timestamp::default(),
        });
        out_events.push(Event::TurretPlaced {
            side: Side::Player,
            slot: self.player_base.turrets.len() - 1,
            kind,
        });
    }

    fn sell_turret(&mut self, slot: usize, out_events: &mut Vec<Event>) {
        if slot >= self.player_base.turrets.len() {
            out_events.push(Event::TurretSaleRejected {
                slot,
                reason: SellError::InvalidSlot,
            });
            return;
        }

        let turret = self.player_base.turrets.remove(slot);
        let refund = turret.kind.cost() / 2;
        self.economy.earn(refund);
        out_events.push(Event::TurretSold {
            slot,
            kind: turret.kind,
            refund,
        });
    }

    fn use_ability(
        &mut self,
        ability: AbilityKind,
        target: AbilityTarget,
        out_events: &mut Vec<Event>,
    ) {
        debug_assert_eq!(ability, self.nuke.kind());

        if !self.nuke.is_ready() {
            out_events.push(Event::AbilityRejected {
                ability,
                reason: AbilityError::NotReady,
            });
            return;
        }

        match target {
            AbilityTarget::Unit(id) => {
                // The single-target form refuses dead victims before payment
                // and leaves the cooldown untouched.
                let alive = self
                    .find_unit(id)
                    .map(|unit| unit.hp > 0)
                    .unwrap_or(false);
                if !alive {
                    out_events.push(Event::AbilityRejected {
                        ability,
                        reason: AbilityError::TargetDead,
                    });
                    return;
                }
                if !self.economy.spend(ability.cost()) {
                    out_events.push(Event::AbilityRejected {
                        ability,
                        reason: AbilityError::InsufficientFunds,
                    });
                    return;
                }

                let damage = ability.damage();
                let rng = &mut self.rng;
                if let Some(unit) = find_unit_mut(&mut self.player_units, &mut self.enemy_units, id)
                {
                    let _ = unit_take_damage(rng, unit, damage);
                }
                self.nuke.trigger_cooldown();
                out_events.push(Event::AbilityUsed {
                    ability,
                    victims: 1,
                });
            }
            AbilityTarget::Units(ids) => {
                if !self.economy.spend(ability.cost()) {
                    out_events.push(Event::AbilityRejected {
                        ability,
                        reason: AbilityError::InsufficientFunds,
                    });
                    return;
                }

                // The area form always consumes the cooldown once paid, even
                // for an empty victim list.
                let damage = ability.damage();
                let mut victims = 0;
                for id in ids {
                    let rng = &mut self.rng;
                    if let Some(unit) =
                        find_unit_mut(&mut self.player_units, &mut self.enemy_units, id)
                    {
                        if unit.hp > 0 {
                            let _ = unit_take_damage(rng, unit, damage);
                            victims += 1;
                        }
                    }
                }
                self.nuke.trigger_cooldown();
                out_events.push(Event::AbilityUsed { ability, victims });
            }
        }
    }

    fn apply_upgrade(&mut self, upgrade: UpgradeKind, cost: i32, out_events: &mut Vec<Event>) {
        if self.upgrades.is_applied(upgrade) {
            out_events.push(Event::UpgradeRejected {
                upgrade,
                reason: UpgradeError::AlreadyApplied,
            });
            return;
        }
        if !self.economy.spend(cost) {
            out_events.push(Event::UpgradeRejected {
                upgrade,
                reason: UpgradeError::InsufficientFunds,
            });
            return;
        }

        self.upgrades.mark_applied(upgrade);
        match upgrade {
            UpgradeKind::UnitAttack => {
                // Retroactively boosts the player's living units; future
                // spawns of either side resolve against the flag instead.
                for unit in &mut self.player_units {
                    unit.attack = (f64::from(unit.attack) * UNIT_ATTACK_UPGRADE_FACTOR) as i32;
                }
            }
            UpgradeKind::UnitHp => {
                for unit in &mut self.player_units {
                    unit.max_hp = (f64::from(unit.max_hp) * UNIT_HP_UPGRADE_FACTOR) as i32;
                    unit.hp = (f64::from(unit.hp) * UNIT_HP_UPGRADE_FACTOR) as i32;
                }
            }
            UpgradeKind::TurretAttack | UpgradeKind::TurretRange => {
                // Turret stats scale at read time through the registry.
            }
            UpgradeKind::BaseCapacity => {
                self.player_base.turret_capacity =
                    (self.player_base.turret_capacity + 1).min(TURRET_CAPACITY_LIMIT);
            }
        }
        out_events.push(Event::UpgradeApplied { upgrade });
    }

    fn fire_turret(
        &mut self,
        side: Side,
        slot: usize,
        target: UnitId,
        out_events: &mut Vec<Event>,
    ) {
        let clock = self.clock;
        let upgrades = self.upgrades;
        let (base, enemies) = match side {
            Side::Player => (&mut self.player_base, &self.enemy_units),
            Side::Enemy => (&mut self.enemy_base, &self.player_units),
        };
        let Some(turret) = base.turrets.get_mut(slot) else {
            return;
        };
        let Some(unit) = enemies.iter().find(|unit| unit.id == target) else {
            return;
        };
        if unit.hp <= 0 {
            return;
        }

        let attack = upgrades.effective_turret_attack(turret.kind.attack());
        let range = upgrades.effective_turret_range(turret.kind.range());
        let mut damage =
            (f64::from(attack) * roll_variance(&mut self.rng)).round() as i32;
        if turret.kind == TurretKind::LongRange {
            let distance = (unit.coordinate - field::base_x(side)).abs() as i32;
            if f64::from(distance) > f64::from(range) * 0.5 {
                damage = (f64::from(damage) * LONG_RANGE_DISTANCE_BONUS) as i32;
            }
        }
        turret.last_fire = clock;

        let (x, y) = field::turret_launch_point(side, slot);
        let id = ProjectileId::new(self.next_projectile_id);
        self.next_projectile_id += 1;
        self.projectiles.push(ProjectileState {
            id,
            kind: ProjectileKind::Turret,
            x,
            y,
            speed: field::TURRET_PROJECTILE_SPEED,
            damage,
            target: TargetRef::Unit(target),
            critical: false,
        });
        out_events.push(Event::ProjectileSpawned {
            projectile: id,
            kind: ProjectileKind::Turret,
            target: TargetRef::Unit(target),
            critical: false,
        });
    }

    fn move_unit(&mut self, side: Side, unit: UnitId, to: f64) {
        if let Some(state) = self.units_mut(side).iter_mut().find(|state| state.id == unit) {
            if state.hp > 0 {
                state.coordinate = to;
            }
        }
    }

    fn strike(
        &mut self,
        side: Side,
        attacker: UnitId,
        target: TargetRef,
        out_events: &mut Vec<Event>,
    ) {
        let clock = self.clock;
        let (allies, enemies) = match side {
            Side::Player => (&mut self.player_units, &mut self.enemy_units),
            Side::Enemy => (&mut self.enemy_units, &mut self.player_units),
        };
        let Some(state) = allies.iter_mut().find(|state| state.id == attacker) else {
            return;
        };
        if state.hp <= 0 {
            return;
        }
        state.last_attack = clock;
        let attacker_kind = state.kind;
        let attacker_attack = state.attack;
        let attacker_x = state.coordinate;

        let target_kind = match target {
            TargetRef::Unit(id) => {
                let Some(enemy) = enemies.iter().find(|enemy| enemy.id == id) else {
                    return;
                };
                if enemy.hp <= 0 {
                    return;
                }
                Some(enemy.kind)
            }
            TargetRef::Base(_) => None,
        };

        let mut damage = attacker_attack;
        let counter = target_kind == Some(attacker_kind.counters());
        if counter {
            damage = (f64::from(damage) * COUNTER_DAMAGE_MULTIPLIER) as i32;
        }

        if attacker_kind == UnitKind::Ranged {
            // Arrows flag criticals by target archetype, not by the counter
            // relation; the two coincide for ranged attackers today.
            let critical = target_kind == Some(UnitKind::AntiArmored);
            let id = ProjectileId::new(self.next_projectile_id);
            self.next_projectile_id += 1;
            self.projectiles.push(ProjectileState {
                id,
                kind: ProjectileKind::Arrow,
                x: attacker_x,
                y: field::ARROW_LAUNCH_Y,
                speed: field::ARROW_SPEED * side.direction(),
                damage,
                target,
                critical,
            });
            out_events.push(Event::ProjectileSpawned {
                projectile: id,
                kind: ProjectileKind::Arrow,
                target,
                critical,
            });
            return;
        }

        let event = match target {
            TargetRef::Unit(id) => {
                let rng = &mut self.rng;
                let Some(enemy) = enemies.iter_mut().find(|enemy| enemy.id == id) else {
                    return;
                };
                let amount = unit_take_damage(rng, enemy, damage);
                DamageEvent {
                    x: enemy.coordinate + field::MELEE_EVENT_OFFSET_X,
                    y: field::UNIT_EVENT_Y,
                    amount,
                    critical: counter,
                    kind: DamageKind::Melee,
                    against_base: false,
                }
            }
            TargetRef::Base(base_side) => {
                let base = match base_side {
                    Side::Player => &mut self.player_base,
                    Side::Enemy => &mut self.enemy_base,
                };
                let amount = base_take_damage(&mut self.rng, base, damage);
                if base.hp == 0 {
                    out_events.push(Event::BaseDestroyed { side: base_side });
                }
                DamageEvent {
                    x: field::approach_x(base_side) + field::MELEE_EVENT_OFFSET_X,
                    y: field::BASE_EVENT_Y,
                    amount,
                    critical: counter,
                    kind: DamageKind::Melee,
                    against_base: true,
                }
            }
        };
        self.damage_log.push(event);
        out_events.push(Event::DamageDealt { event });
    }

    fn settle_projectile(
        &mut self,
        projectile: ProjectileId,
        x: f64,
        y: f64,
        outcome: FlightOutcome,
        out_events: &mut Vec<Event>,
    ) {
        let Some(index) = self
            .projectiles
            .iter()
            .position(|state| state.id == projectile)
        else {
            return;
        };

        match outcome {
            FlightOutcome::Flying => {
                let state = &mut self.projectiles[index];
                state.x = x;
                state.y = y;
            }
            FlightOutcome::TargetLost => {
                let _ = self.projectiles.remove(index);
                out_events.push(Event::ProjectileRemoved {
                    projectile,
                    outcome: FlightOutcome::TargetLost,
                });
            }
            FlightOutcome::Impact => {
                let state = self.projectiles.remove(index);
                self.land_projectile(&state, out_events);
                out_events.push(Event::ProjectileRemoved {
                    projectile,
                    outcome: FlightOutcome::Impact,
                });
            }
        }
    }

    fn land_projectile(&mut self, state: &ProjectileState, out_events: &mut Vec<Event>) {
        let event = match state.target {
            TargetRef::Unit(id) => {
                let rng = &mut self.rng;
                let Some(unit) = find_unit_mut(&mut self.player_units, &mut self.enemy_units, id)
                else {
                    return;
                };
                if unit.hp <= 0 {
                    return;
                }
                let amount = unit_take_damage(rng, unit, state.damage);
                DamageEvent {
                    x: unit.coordinate,
                    y: field::UNIT_EVENT_Y,
                    amount,
                    critical: state.critical,
                    kind: DamageKind::Range,
                    against_base: false,
                }
            }
            TargetRef::Base(base_side) => {
                let base = match base_side {
                    Side::Player => &mut self.player_base,
                    Side::Enemy => &mut self.enemy_base,
                };
                if base.hp <= 0 {
                    return;
                }
                let amount = base_take_damage(&mut self.rng, base, state.damage);
                if base.hp == 0 {
                    out_events.push(Event::BaseDestroyed { side: base_side });
                }
                DamageEvent {
                    x: field::base_anchor_x(base_side),
                    y: field::BASE_EVENT_Y,
                    amount,
                    critical: state.critical,
                    kind: DamageKind::Range,
                    against_base: true,
                }
            }
        };
        self.damage_log.push(event);
        out_events.push(Event::DamageDealt { event });
    }

    fn sweep_dead(&mut self, out_events: &mut Vec<Event>) {
        for unit in &self.player_units {
            if unit.hp <= 0 {
                out_events.push(Event::UnitDied {
                    side: Side::Player,
                    unit: unit.id,
                    bounty: 0,
                });
            }
        }
        self.player_units.retain(|unit| unit.hp > 0);

        for unit in &self.enemy_units {
            if unit.hp <= 0 {
                let bounty = (f64::from(unit.kind.cost()) * ENEMY_KILL_BOUNTY_FACTOR) as i32;
                self.economy.earn(bounty);
                out_events.push(Event::UnitDied {
                    side: Side::Enemy,
                    unit: unit.id,
                    bounty,
                });
            }
        }
        self.enemy_units.retain(|unit| unit.hp > 0);
    }

    fn units(&self, side: Side) -> &[UnitState] {
        match side {
            Side::Player => &self.player_units,
            Side::Enemy => &self.enemy_units,
        }
    }

    fn units_mut(&mut self, side: Side) -> &mut Vec<UnitState> {
        match side {
            Side::Player => &mut self.player_units,
            Side::Enemy => &mut self.enemy_units,
        }
    }

    fn base(&self, side: Side) -> &Base {
        match side {
            Side::Player => &self.player_base,
            Side::Enemy => &self.enemy_base,
        }
    }

    fn find_unit(&self, id: UnitId) -> Option<&UnitState> {
        self.player_units
            .iter()
            .chain(self.enemy_units.iter())
            .find(|unit| unit.id == id)
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick { now } => world.advance_clock(now, out_events),
        Command::QueueUnit { kind } => world.queue_unit(kind, out_events),
        Command::SpawnUnit { side, kind } => world.spawn_unit(side, kind, out_events),
        Command::PlaceTurret { kind } => world.place_turret(kind, out_events),
        Command::SellTurret { slot } => world.sell_turret(slot, out_events),
        Command::UseAbility { ability, target } => world.use_ability(ability, target, out_events),
        Command::ApplyUpgrade { upgrade, cost } => world.apply_upgrade(upgrade, cost, out_events),
        Command::FireTurret { side, slot, target } => {
            world.fire_turret(side, slot, target, out_events)
        }
        Command::MoveUnit { side, unit, to } => world.move_unit(side, unit, to),
        Command::Strike {
            side,
            attacker,
            target,
        } => world.strike(side, attacker, target, out_events),
        Command::SettleProjectile {
            projectile,
            x,
            y,
            outcome,
        } => world.settle_projectile(projectile, x, y, outcome, out_events),
        Command::SweepDead => world.sweep_dead(out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::{World, field};
    use lane_clash_core::{
        AbilityKind, AbilitySnapshot, BaseSnapshot, DamageEvent, GameStatus, ProjectileId,
        ProjectileSnapshot, ProjectileView, Side, Timestamp, TrainingSnapshot, TurretSnapshot,
        TurretView, UnitId, UnitSnapshot, UnitView, UNIT_ATTACK_COOLDOWN,
    };

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Timestamp the world last advanced to.
    #[must_use]
    pub fn clock(world: &World) -> Timestamp {
        world.clock
    }

    /// Current player currency balance.
    #[must_use]
    pub fn balance(world: &World) -> i32 {
        world.economy.balance()
    }

    /// Terminal evaluation of the match.
    ///
    /// The player base is checked before the enemy base, so a tick that
    /// levels both resolves to an enemy win. Visible tie-break rule; keep the
    /// order.
    #[must_use]
    pub fn game_status(world: &World) -> GameStatus {
        if world.player_base.hp <= 0 {
            GameStatus::EnemyVictory
        } else if world.enemy_base.hp <= 0 {
            GameStatus::PlayerVictory
        } else {
            GameStatus::Ongoing
        }
    }

    /// Captures a read-only view of one side's roster.
    ///
    /// Units dead but not yet swept are included; callers filter on
    /// liveness exactly like the combat passes do.
    #[must_use]
    pub fn unit_view(world: &World, side: Side) -> UnitView {
        UnitView::from_snapshots(
            world
                .units(side)
                .iter()
                .map(|unit| unit_snapshot_of(unit))
                .collect(),
        )
    }

    /// Identifiers of one side's roster in spawn order.
    #[must_use]
    pub fn unit_ids(world: &World, side: Side) -> Vec<UnitId> {
        world.units(side).iter().map(|unit| unit.id).collect()
    }

    /// Looks up a single unit snapshot by identifier.
    #[must_use]
    pub fn unit_snapshot(world: &World, side: Side, id: UnitId) -> Option<UnitSnapshot> {
        world
            .units(side)
            .iter()
            .find(|unit| unit.id == id)
            .map(unit_snapshot_of)
    }

    /// Captures a read-only snapshot of one side's base.
    #[must_use]
    pub fn base_snapshot(world: &World, side: Side) -> BaseSnapshot {
        let base = world.base(side);
        BaseSnapshot {
            side,
            hp: base.hp,
            max_hp: base.max_hp,
            turret_capacity: base.turret_capacity,
            turret_count: base.turrets.len(),
        }
    }

    /// Captures a read-only view of one base's turret slots.
    ///
    /// Attack and range are already scaled by any applied upgrades.
    #[must_use]
    pub fn turret_view(world: &World, side: Side) -> TurretView {
        let base = world.base(side);
        TurretView::from_snapshots(
            base.turrets
                .iter()
                .enumerate()
                .map(|(slot, turret)| TurretSnapshot {
                    slot,
                    kind: turret.kind,
                    attack: world.upgrades.effective_turret_attack(turret.kind.attack()),
                    range: world.upgrades.effective_turret_range(turret.kind.range()),
                    cost: turret.kind.cost(),
                    cooldown: turret.kind.cooldown(),
                    last_fire: turret.last_fire,
                })
                .collect(),
        )
    }

    /// Captures a read-only view of every projectile in flight.
    #[must_use]
    pub fn projectile_view(world: &World) -> ProjectileView {
        ProjectileView::from_snapshots(
            world
                .projectiles
                .iter()
                .map(projectile_snapshot_of)
                .collect(),
        )
    }

    /// Identifiers of every projectile in flight in launch order.
    #[must_use]
    pub fn projectile_ids(world: &World) -> Vec<ProjectileId> {
        world.projectiles.iter().map(|state| state.id).collect()
    }

    /// Looks up a single projectile snapshot by identifier.
    #[must_use]
    pub fn projectile_snapshot(world: &World, id: ProjectileId) -> Option<ProjectileSnapshot> {
        world
            .projectiles
            .iter()
            .find(|state| state.id == id)
            .map(projectile_snapshot_of)
    }

    /// Captures the barracks state: in-flight blueprint plus queue depth.
    #[must_use]
    pub fn training_snapshot(world: &World) -> TrainingSnapshot {
        TrainingSnapshot {
            current: world.barracks.current.map(|in_flight| in_flight.kind),
            queue_depth: world.barracks.queue.len(),
        }
    }

    /// Captures the cooldown state of the requested ability.
    #[must_use]
    pub fn ability_snapshot(world: &World, kind: AbilityKind) -> AbilitySnapshot {
        match kind {
            AbilityKind::Nuke => world.nuke.snapshot(),
        }
    }

    /// Damage events recorded during the most recent tick.
    #[must_use]
    pub fn damage_events(world: &World) -> &[DamageEvent] {
        &world.damage_log
    }

    fn unit_snapshot_of(unit: &super::UnitState) -> UnitSnapshot {
        UnitSnapshot {
            id: unit.id,
            kind: unit.kind,
            hp: unit.hp,
            max_hp: unit.max_hp,
            attack: unit.attack,
            speed: unit.kind.speed(),
            cost: unit.kind.cost(),
            range: unit.kind.range(),
            coordinate: unit.coordinate,
            last_attack: unit.last_attack,
            attack_cooldown: UNIT_ATTACK_COOLDOWN,
        }
    }

    fn projectile_snapshot_of(state: &super::ProjectileState) -> ProjectileSnapshot {
        ProjectileSnapshot {
            id: state.id,
            kind: state.kind,
            x: state.x,
            y: state.y,
            speed: state.speed,
            damage: state.damage,
            target: state.target,
            critical: state.critical,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct UnitState {
    id: UnitId,
    kind: UnitKind,
    hp: i32,
    max_hp: i32,
    attack: i32,
    coordinate: f64,
    last_attack: Timestamp,
}

#[derive(Clone, Copy, Debug)]
struct TurretState {
    kind: TurretKind,
    last_fire: Timestamp,
}

#[derive(Clone, Debug)]
struct Base {
    hp: i32,
    max_hp: i32,
    turrets: Vec<TurretState>,
    turret_capacity: usize,
}

impl Base {
    fn new(hp: i32) -> Self {
        Self {
            hp: hp.max(0),
            max_hp: hp.max(0),
            turrets: Vec::new(),
            turret_capacity: 1,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct ProjectileState {
    id: ProjectileId,
    kind: ProjectileKind,
    x: f64,
    y: f64,
    speed: f64,
    damage: i32,
    target: TargetRef,
    critical: bool,
}

#[derive(Clone, Copy, Debug)]
struct InFlight {
    kind: UnitKind,
    started: Timestamp,
}

#[derive(Clone, Debug)]
struct Barracks {
    queue: VecDeque<UnitKind>,
    current: Option<InFlight>,
}

impl Barracks {
    fn new() -> Self {
        Self {
            queue: VecDeque::new(),
            current: None,
        }
    }
}

fn find_unit_mut<'a>(
    player_units: &'a mut Vec<UnitState>,
    enemy_units: &'a mut Vec<UnitState>,
    id: UnitId,
) -> Option<&'a mut UnitState> {
    player_units
        .iter_mut()
        .chain(enemy_units.iter_mut())
        .find(|unit| unit.id == id)
}

fn roll_variance(rng: &mut ChaCha8Rng) -> f64 {
    DAMAGE_VARIANCE_MIN + DAMAGE_VARIANCE_SPAN * rng.gen::<f64>()
}

/// Applies raw damage to a unit: armored reduction first, then variance.
fn unit_take_damage(rng: &mut ChaCha8Rng, unit: &mut UnitState, raw: i32) -> i32 {
    let shaped = if unit.kind == UnitKind::Armored {
        (f64::from(raw) * ARMORED_DAMAGE_REDUCTION).round() as i32
    } else {
        raw
    };
    let actual = (f64::from(shaped) * roll_variance(rng)).round() as i32;
    unit.hp = (unit.hp - actual).max(0);
    actual
}

fn base_take_damage(rng: &mut ChaCha8Rng, base: &mut Base, raw: i32) -> i32 {
    let actual = (f64::from(raw) * roll_variance(rng)).round() as i32;
    base.hp = (base.hp - actual).max(0);
    actual
}
