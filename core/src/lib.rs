#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Lane Clash engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters and systems submit
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! describing what actually happened. Systems consume immutable snapshot
//! views and respond exclusively with new command batches, which keeps every
//! tick of the battle deterministic for a given pair of RNG seeds.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Lane Clash.";

/// Multiplier applied to attack damage when the attacker counters the target.
pub const COUNTER_DAMAGE_MULTIPLIER: f64 = 2.0;

/// Factor applied to raw incoming damage before variance for armored units.
pub const ARMORED_DAMAGE_REDUCTION: f64 = 0.8;

/// Bonus multiplier for long-range turret shots fired past half range.
pub const LONG_RANGE_DISTANCE_BONUS: f64 = 1.5;

/// Attack multiplier granted by the one-shot unit attack upgrade.
pub const UNIT_ATTACK_UPGRADE_FACTOR: f64 = 1.2;

/// Hit-point multiplier granted by the one-shot unit hp upgrade.
pub const UNIT_HP_UPGRADE_FACTOR: f64 = 1.5;

/// Stat multiplier granted by the one-shot turret attack/range upgrades.
pub const TURRET_UPGRADE_FACTOR: f64 = 1.2;

/// Factor of a fallen enemy unit's cost paid out as a bounty.
pub const ENEMY_KILL_BOUNTY_FACTOR: f64 = 1.25;

/// Lower bound of the uniform damage-variance roll.
pub const DAMAGE_VARIANCE_MIN: f64 = 0.75;

/// Width of the uniform damage-variance roll above its lower bound.
pub const DAMAGE_VARIANCE_SPAN: f64 = 0.5;

/// Delay between successive attacks of every unit.
pub const UNIT_ATTACK_COOLDOWN: Duration = Duration::from_secs(1);

/// Interval at which passive income is credited and ability cooldowns tick.
pub const CURRENCY_REGEN_INTERVAL: Duration = Duration::from_secs(1);

/// Passive income credited once per regen interval.
pub const CURRENCY_REGEN_AMOUNT: i32 = 1;

/// Maximum number of blueprints waiting in the training queue.
pub const TRAINING_QUEUE_CAPACITY: usize = 5;

/// Delay before the enemy commander schedules its first spawn.
pub const ENEMY_FIRST_SPAWN_DELAY: Duration = Duration::from_secs(2);

/// Hard ceiling on the number of turret slots a base can be upgraded to.
pub const TURRET_CAPACITY_LIMIT: usize = 2;

/// Monotonic simulation timestamp measured in nanoseconds.
///
/// The external driver supplies one per tick; every cooldown and timer in the
/// simulation is a delta against a stored timestamp, never an accumulated
/// wall-clock difference.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Timestamp(u64);

impl Timestamp {
    /// Creates a timestamp from a raw nanosecond count.
    #[must_use]
    pub const fn from_nanos(nanos: u64) -> Self {
        Self(nanos)
    }

    /// Retrieves the raw nanosecond count.
    #[must_use]
    pub const fn nanos(&self) -> u64 {
        self.0
    }

    /// Duration elapsed since `earlier`, saturating to zero when out of order.
    #[must_use]
    pub fn duration_since(self, earlier: Timestamp) -> Duration {
        Duration::from_nanos(self.0.saturating_sub(earlier.0))
    }

    /// Returns this timestamp advanced by the provided delay.
    #[must_use]
    pub fn advanced_by(self, delay: Duration) -> Timestamp {
        let nanos = u64::try_from(delay.as_nanos()).unwrap_or(u64::MAX);
        Timestamp(self.0.saturating_add(nanos))
    }
}

/// The two opposing sides of a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// The human-controlled side that trains units and places turrets.
    Player,
    /// The AI-controlled side driven by the spawn scheduler.
    Enemy,
}

impl Side {
    /// Returns the opposing side.
    #[must_use]
    pub const fn opponent(self) -> Side {
        match self {
            Side::Player => Side::Enemy,
            Side::Enemy => Side::Player,
        }
    }

    /// Lane direction this side's units travel in.
    #[must_use]
    pub const fn direction(self) -> f64 {
        match self {
            Side::Player => 1.0,
            Side::Enemy => -1.0,
        }
    }
}

/// Unique identifier assigned to a unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitId(u32);

impl UnitId {
    /// Creates a new unit identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProjectileId(u32);

impl ProjectileId {
    /// Creates a new projectile identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// The four counter-typed unit archetypes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitKind {
    /// Close-range fighter that counters ranged units.
    Melee,
    /// Arrow-firing skirmisher that counters anti-armored units.
    Ranged,
    /// Specialist that counters armored units.
    AntiArmored,
    /// Heavy unit that counters melee units and shrugs off part of all damage.
    Armored,
}

impl UnitKind {
    /// Every archetype in stable scan order.
    pub const ALL: [UnitKind; 4] = [
        UnitKind::Melee,
        UnitKind::Ranged,
        UnitKind::AntiArmored,
        UnitKind::Armored,
    ];

    /// The archetype this kind deals doubled damage to.
    ///
    /// The relation is a fixed 4-cycle: Melee beats Ranged beats AntiArmored
    /// beats Armored beats Melee.
    #[must_use]
    pub const fn counters(self) -> UnitKind {
        match self {
            UnitKind::Melee => UnitKind::Ranged,
            UnitKind::Ranged => UnitKind::AntiArmored,
            UnitKind::AntiArmored => UnitKind::Armored,
            UnitKind::Armored => UnitKind::Melee,
        }
    }

    /// Blueprint hit points before upgrades.
    #[must_use]
    pub const fn hit_points(self) -> i32 {
        match self {
            UnitKind::Melee => 100,
            UnitKind::Ranged => 80,
            UnitKind::AntiArmored => 90,
            UnitKind::Armored => 150,
        }
    }

    /// Blueprint attack value before upgrades.
    #[must_use]
    pub const fn attack(self) -> i32 {
        match self {
            UnitKind::Melee => 20,
            UnitKind::Ranged => 15,
            UnitKind::AntiArmored => 25,
            UnitKind::Armored => 30,
        }
    }

    /// Lane speed in world units per whole tick step.
    #[must_use]
    pub const fn speed(self) -> i32 {
        match self {
            UnitKind::Melee => 20,
            UnitKind::Ranged => 24,
            UnitKind::AntiArmored => 20,
            UnitKind::Armored => 16,
        }
    }

    /// Currency cost to enqueue one unit of this kind.
    #[must_use]
    pub const fn cost(self) -> i32 {
        match self {
            UnitKind::Melee => 50,
            UnitKind::Ranged => 75,
            UnitKind::AntiArmored => 90,
            UnitKind::Armored => 120,
        }
    }

    /// Attack range measured along the lane.
    #[must_use]
    pub const fn range(self) -> i32 {
        match self {
            UnitKind::Melee => 80,
            UnitKind::Ranged => 200,
            UnitKind::AntiArmored => 80,
            UnitKind::Armored => 80,
        }
    }

    /// Time the player barracks needs to produce one unit of this kind.
    #[must_use]
    pub const fn training_time(self) -> Duration {
        match self {
            UnitKind::Melee => Duration::from_secs(1),
            UnitKind::Ranged => Duration::from_secs(1),
            UnitKind::AntiArmored => Duration::from_secs(2),
            UnitKind::Armored => Duration::from_secs(4),
        }
    }

    /// Delay the enemy commander waits after spawning this kind.
    ///
    /// Distinct from [`UnitKind::training_time`]; heavier archetypes buy the
    /// player a longer breather.
    #[must_use]
    pub const fn spawn_delay(self) -> Duration {
        match self {
            UnitKind::Melee => Duration::from_millis(2_500),
            UnitKind::Ranged => Duration::from_millis(2_500),
            UnitKind::AntiArmored => Duration::from_millis(3_500),
            UnitKind::Armored => Duration::from_millis(5_500),
        }
    }
}

/// Types of turrets that can occupy a base slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TurretKind {
    /// Balanced turret with moderate range.
    Standard,
    /// Extended-range turret that punishes distant targets.
    LongRange,
}

impl TurretKind {
    /// Blueprint attack value before upgrades.
    #[must_use]
    pub const fn attack(self) -> i32 {
        match self {
            TurretKind::Standard => 20,
            TurretKind::LongRange => 20,
        }
    }

    /// Blueprint firing range before upgrades.
    #[must_use]
    pub const fn range(self) -> i32 {
        match self {
            TurretKind::Standard => 600,
            TurretKind::LongRange => 900,
        }
    }

    /// Currency cost to place one turret of this kind.
    #[must_use]
    pub const fn cost(self) -> i32 {
        match self {
            TurretKind::Standard => 300,
            TurretKind::LongRange => 450,
        }
    }

    /// Delay between successive shots.
    #[must_use]
    pub const fn cooldown(self) -> Duration {
        Duration::from_millis(1_500)
    }
}

/// Special abilities available to the player during a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AbilityKind {
    /// Area strike that deals massive damage to every targeted unit.
    Nuke,
}

impl AbilityKind {
    /// Currency cost charged when the ability activates.
    #[must_use]
    pub const fn cost(self) -> i32 {
        match self {
            AbilityKind::Nuke => 1_500,
        }
    }

    /// Cooldown measured in regen intervals, not wall-clock time.
    #[must_use]
    pub const fn cooldown_units(self) -> u32 {
        match self {
            AbilityKind::Nuke => 60,
        }
    }

    /// Raw damage applied to each victim before variance shaping.
    #[must_use]
    pub const fn damage(self) -> i32 {
        match self {
            AbilityKind::Nuke => 9_999,
        }
    }
}

/// One-shot global upgrades purchasable once per match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpgradeKind {
    /// Scales unit attack by [`UNIT_ATTACK_UPGRADE_FACTOR`].
    UnitAttack,
    /// Scales unit hit points by [`UNIT_HP_UPGRADE_FACTOR`].
    UnitHp,
    /// Scales turret attack by [`TURRET_UPGRADE_FACTOR`].
    TurretAttack,
    /// Scales turret range by [`TURRET_UPGRADE_FACTOR`].
    TurretRange,
    /// Grants the player base a second turret slot.
    BaseCapacity,
}

impl UpgradeKind {
    /// Every upgrade category in stable order.
    pub const ALL: [UpgradeKind; 5] = [
        UpgradeKind::UnitAttack,
        UpgradeKind::UnitHp,
        UpgradeKind::TurretAttack,
        UpgradeKind::TurretRange,
        UpgradeKind::BaseCapacity,
    ];
}

/// Terminal evaluation of a match after a tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameStatus {
    /// Both bases still stand.
    Ongoing,
    /// The enemy base fell.
    PlayerVictory,
    /// The player base fell; a simultaneous double-kill also lands here.
    EnemyVictory,
}

/// Handle to something that can take damage.
///
/// Projectiles and strikes never own their target; they carry this handle and
/// the world re-checks liveness whenever the handle is dereferenced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetRef {
    /// A unit, addressed by identifier.
    Unit(UnitId),
    /// A side's base.
    Base(Side),
}

/// Victim selection for an ability activation.
///
/// The two forms deliberately gate their cooldowns differently; see the
/// ability documentation in the world crate.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AbilityTarget {
    /// Single victim; the activation no-ops when the victim is dead.
    Unit(UnitId),
    /// Area form; dead victims are skipped and an empty list still consumes
    /// the cooldown.
    Units(Vec<UnitId>),
}

/// Origin of a projectile, which decides its sprite and flight profile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectileKind {
    /// Shell fired by a base turret.
    Turret,
    /// Arrow loosed by a ranged unit.
    Arrow,
}

/// Resolution of one projectile flight step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FlightOutcome {
    /// Still in the air; only the position changed.
    Flying,
    /// Close enough to the impact point; damage lands this tick.
    Impact,
    /// The target died or vanished; discard without damage.
    TargetLost,
}

/// Presentation category of a damage event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DamageKind {
    /// Instantaneous close-range hit.
    Melee,
    /// Projectile impact.
    Range,
}

/// Transient combat result recorded for the presentation layer.
///
/// Valid only for the tick that produced it; the log is cleared at the start
/// of every tick.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DamageEvent {
    /// Horizontal anchor of the hit.
    pub x: f64,
    /// Vertical anchor of the hit.
    pub y: f64,
    /// Damage actually applied after every shaping step.
    pub amount: i32,
    /// Whether the hit carried a counter or critical flag.
    pub critical: bool,
    /// Presentation category of the hit.
    pub kind: DamageKind,
    /// Whether the victim was a base rather than a unit.
    pub against_base: bool,
}

/// Reasons a unit enqueue request may be rejected.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QueueError {
    /// The training queue already holds its maximum number of blueprints.
    #[error("training queue is full")]
    QueueFull,
    /// The economy balance cannot cover the unit cost.
    #[error("insufficient funds")]
    InsufficientFunds,
}

/// Reasons a turret placement request may be rejected.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlacementError {
    /// Every turret slot of the base is occupied.
    #[error("no free turret slot")]
    NoFreeSlot,
    /// The economy balance cannot cover the turret cost.
    #[error("insufficient funds")]
    InsufficientFunds,
}

/// Reasons a turret sale request may be rejected.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SellError {
    /// The provided slot index does not address an occupied slot.
    #[error("invalid turret slot index")]
    InvalidSlot,
}

/// Reasons an ability activation may be rejected.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AbilityError {
    /// The ability is still cooling down.
    #[error("ability is not ready")]
    NotReady,
    /// The economy balance cannot cover the ability cost.
    #[error("insufficient funds")]
    InsufficientFunds,
    /// The single-target form was aimed at a dead unit.
    #[error("target is dead")]
    TargetDead,
}

/// Reasons an upgrade purchase may be rejected.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpgradeError {
    /// The one-shot upgrade has already been applied this match.
    #[error("upgrade already applied")]
    AlreadyApplied,
    /// The economy balance cannot cover the upgrade cost.
    #[error("insufficient funds")]
    InsufficientFunds,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation clock and all time-driven bookkeeping.
    Tick {
        /// Monotonic timestamp supplied by the external driver.
        now: Timestamp,
    },
    /// Requests that a blueprint join the player's training queue.
    QueueUnit {
        /// Archetype of the unit to enqueue.
        kind: UnitKind,
    },
    /// Spawns a unit at the owning side's spawn coordinate.
    SpawnUnit {
        /// Side whose roster receives the unit.
        side: Side,
        /// Archetype of the spawned unit.
        kind: UnitKind,
    },
    /// Requests placement of a turret in the player base's next free slot.
    PlaceTurret {
        /// Kind of turret to construct.
        kind: TurretKind,
    },
    /// Requests the sale of the turret occupying the provided slot.
    SellTurret {
        /// Zero-based slot index within the player base.
        slot: usize,
    },
    /// Requests activation of an ability against the provided victims.
    UseAbility {
        /// Ability to activate.
        ability: AbilityKind,
        /// Victim selection for the activation.
        target: AbilityTarget,
    },
    /// Requests purchase of a one-shot upgrade.
    ApplyUpgrade {
        /// Upgrade category to purchase.
        upgrade: UpgradeKind,
        /// Currency cost quoted for the purchase.
        cost: i32,
    },
    /// Fires the turret in the given slot at the chosen target.
    FireTurret {
        /// Side that owns the firing turret.
        side: Side,
        /// Slot index of the firing turret.
        slot: usize,
        /// Unit selected by the targeting scan.
        target: UnitId,
    },
    /// Moves a unit to a new lane coordinate.
    MoveUnit {
        /// Side whose roster contains the unit.
        side: Side,
        /// Identifier of the moving unit.
        unit: UnitId,
        /// Lane coordinate after the move.
        to: f64,
    },
    /// Executes one attack by a unit against its acquired target.
    Strike {
        /// Side whose roster contains the attacker.
        side: Side,
        /// Identifier of the attacking unit.
        attacker: UnitId,
        /// Target acquired during the movement pass.
        target: TargetRef,
    },
    /// Applies one computed flight step to a projectile.
    SettleProjectile {
        /// Identifier of the projectile.
        projectile: ProjectileId,
        /// Horizontal position after the step.
        x: f64,
        /// Vertical position after the step.
        y: f64,
        /// Resolution of the step.
        outcome: FlightOutcome,
    },
    /// Removes dead units from both rosters, paying bounties for enemy kills.
    SweepDead,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Timestamp the clock advanced to.
        now: Timestamp,
    },
    /// Currency was credited to the player.
    CurrencyEarned {
        /// Amount credited.
        amount: i32,
        /// Balance after the credit.
        balance: i32,
    },
    /// A blueprint joined the training queue.
    UnitQueued {
        /// Archetype that was enqueued.
        kind: UnitKind,
        /// Queue depth after the enqueue.
        depth: usize,
    },
    /// An enqueue request was rejected.
    QueueRejected {
        /// Archetype that was refused.
        kind: UnitKind,
        /// Specific reason the enqueue failed.
        reason: QueueError,
    },
    /// The barracks began producing the next queued blueprint.
    TrainingStarted {
        /// Archetype entering production.
        kind: UnitKind,
    },
    /// A unit entered the battlefield.
    UnitSpawned {
        /// Side whose roster received the unit.
        side: Side,
        /// Identifier assigned by the world.
        unit: UnitId,
        /// Archetype of the spawned unit.
        kind: UnitKind,
    },
    /// A turret was placed into a base slot.
    TurretPlaced {
        /// Side that owns the new turret.
        side: Side,
        /// Slot index the turret occupies.
        slot: usize,
        /// Kind of turret placed.
        kind: TurretKind,
    },
    /// A turret placement request was rejected.
    TurretPlacementRejected {
        /// Kind of turret requested.
        kind: TurretKind,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// A turret was sold out of its slot.
    TurretSold {
        /// Slot index the turret occupied.
        slot: usize,
        /// Kind of turret sold.
        kind: TurretKind,
        /// Currency refunded to the player.
        refund: i32,
    },
    /// A turret sale request was rejected.
    TurretSaleRejected {
        /// Slot index provided in the request.
        slot: usize,
        /// Specific reason the sale failed.
        reason: SellError,
    },
    /// A projectile entered flight.
    ProjectileSpawned {
        /// Identifier assigned by the world.
        projectile: ProjectileId,
        /// Origin of the projectile.
        kind: ProjectileKind,
        /// Handle to the pursued target.
        target: TargetRef,
        /// Whether the payload carries a critical flag.
        critical: bool,
    },
    /// A projectile left flight.
    ProjectileRemoved {
        /// Identifier of the removed projectile.
        projectile: ProjectileId,
        /// Why the projectile was removed.
        outcome: FlightOutcome,
    },
    /// Damage landed on a unit or base.
    DamageDealt {
        /// Full record of the hit.
        event: DamageEvent,
    },
    /// A dead unit was swept from its roster.
    UnitDied {
        /// Side that lost the unit.
        side: Side,
        /// Identifier of the fallen unit.
        unit: UnitId,
        /// Bounty credited for the kill, zero for player-side losses.
        bounty: i32,
    },
    /// An ability activation resolved.
    AbilityUsed {
        /// Ability that activated.
        ability: AbilityKind,
        /// Number of victims that took damage.
        victims: usize,
    },
    /// An ability activation was rejected.
    AbilityRejected {
        /// Ability that was refused.
        ability: AbilityKind,
        /// Specific reason the activation failed.
        reason: AbilityError,
    },
    /// A one-shot upgrade was purchased and applied.
    UpgradeApplied {
        /// Upgrade category that was applied.
        upgrade: UpgradeKind,
    },
    /// An upgrade purchase was rejected.
    UpgradeRejected {
        /// Upgrade category that was refused.
        upgrade: UpgradeKind,
        /// Specific reason the purchase failed.
        reason: UpgradeError,
    },
    /// A base's hit points reached zero.
    BaseDestroyed {
        /// Side whose base fell.
        side: Side,
    },
}

/// Immutable representation of a single unit's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UnitSnapshot {
    /// Unique identifier assigned to the unit.
    pub id: UnitId,
    /// Archetype of the unit.
    pub kind: UnitKind,
    /// Current hit points.
    pub hp: i32,
    /// Maximum hit points.
    pub max_hp: i32,
    /// Attack value after upgrades.
    pub attack: i32,
    /// Lane speed.
    pub speed: i32,
    /// Currency cost the unit was bought for.
    pub cost: i32,
    /// Attack range along the lane.
    pub range: i32,
    /// Current lane coordinate.
    pub coordinate: f64,
    /// Timestamp of the most recent attack.
    pub last_attack: Timestamp,
    /// Delay required between attacks.
    pub attack_cooldown: Duration,
}

impl UnitSnapshot {
    /// Reports whether the unit still fights.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// Reports whether the attack cooldown has elapsed at `now`.
    #[must_use]
    pub fn can_attack_at(&self, now: Timestamp) -> bool {
        now.duration_since(self.last_attack) >= self.attack_cooldown
    }
}

/// Read-only view over one side's living units in deterministic order.
#[derive(Clone, Debug, Default)]
pub struct UnitView {
    snapshots: Vec<UnitSnapshot>,
}

impl UnitView {
    /// Creates a new unit view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<UnitSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured unit snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &UnitSnapshot> {
        self.snapshots.iter()
    }

    /// Looks up a snapshot by unit identifier.
    #[must_use]
    pub fn get(&self, id: UnitId) -> Option<&UnitSnapshot> {
        self.snapshots
            .binary_search_by_key(&id, |snapshot| snapshot.id)
            .ok()
            .map(|index| &self.snapshots[index])
    }

    /// Number of captured snapshots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view holds no snapshots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<UnitSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single turret slot used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TurretSnapshot {
    /// Zero-based slot index within the owning base.
    pub slot: usize,
    /// Kind of the turret.
    pub kind: TurretKind,
    /// Attack value after upgrades.
    pub attack: i32,
    /// Firing range after upgrades.
    pub range: i32,
    /// Currency cost the turret was bought for.
    pub cost: i32,
    /// Delay required between shots.
    pub cooldown: Duration,
    /// Timestamp of the most recent shot.
    pub last_fire: Timestamp,
}

impl TurretSnapshot {
    /// Reports whether the firing cooldown has elapsed at `now`.
    #[must_use]
    pub fn can_fire_at(&self, now: Timestamp) -> bool {
        now.duration_since(self.last_fire) >= self.cooldown
    }
}

/// Read-only view over one base's turret slots in slot order.
#[derive(Clone, Debug, Default)]
pub struct TurretView {
    snapshots: Vec<TurretSnapshot>,
}

impl TurretView {
    /// Creates a new turret view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<TurretSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.slot);
        Self { snapshots }
    }

    /// Iterator over the captured turret snapshots in slot order.
    pub fn iter(&self) -> impl Iterator<Item = &TurretSnapshot> {
        self.snapshots.iter()
    }

    /// Number of occupied slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view holds no snapshots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<TurretSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a base used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BaseSnapshot {
    /// Side that owns the base.
    pub side: Side,
    /// Current hit points.
    pub hp: i32,
    /// Maximum hit points.
    pub max_hp: i32,
    /// Number of turret slots currently available.
    pub turret_capacity: usize,
    /// Number of slots currently occupied.
    pub turret_count: usize,
}

impl BaseSnapshot {
    /// Reports whether the base still stands.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }
}

/// Immutable representation of a projectile in flight used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileSnapshot {
    /// Unique identifier assigned to the projectile.
    pub id: ProjectileId,
    /// Origin of the projectile.
    pub kind: ProjectileKind,
    /// Current horizontal position.
    pub x: f64,
    /// Current vertical position.
    pub y: f64,
    /// Signed flight speed; the sign encodes the travel direction.
    pub speed: f64,
    /// Damage payload applied on impact.
    pub damage: i32,
    /// Handle to the pursued target.
    pub target: TargetRef,
    /// Whether the payload carries a critical flag.
    pub critical: bool,
}

/// Read-only view over every projectile in flight in deterministic order.
#[derive(Clone, Debug, Default)]
pub struct ProjectileView {
    snapshots: Vec<ProjectileSnapshot>,
}

impl ProjectileView {
    /// Creates a new projectile view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<ProjectileSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured projectile snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &ProjectileSnapshot> {
        self.snapshots.iter()
    }

    /// Number of projectiles in flight.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view holds no snapshots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<ProjectileSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of the barracks state used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TrainingSnapshot {
    /// Blueprint currently in production, if any.
    pub current: Option<UnitKind>,
    /// Number of blueprints waiting behind it.
    pub queue_depth: usize,
}

/// Immutable representation of an ability's cooldown state used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AbilitySnapshot {
    /// Ability the snapshot describes.
    pub kind: AbilityKind,
    /// Currency cost charged on activation.
    pub cost: i32,
    /// Raw damage applied to each victim.
    pub damage: i32,
    /// Full cooldown in regen intervals.
    pub cooldown_units: u32,
    /// Remaining cooldown in regen intervals; zero means ready.
    pub remaining_units: u32,
}

impl AbilitySnapshot {
    /// Reports whether the ability can activate.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.remaining_units == 0
    }
}

/// Battlefield geometry shared by the world and the pure systems.
///
/// The lane runs horizontally between the two bases. The vertical anchors
/// pin projectile flight and damage events to the presentation geometry;
/// aim points and impact points use separate constants and must stay that
/// way.
pub mod field {
    use super::Side;

    /// Lane coordinate where player units enter the field.
    pub const PLAYER_SPAWN_X: f64 = 150.0;
    /// Lane coordinate where enemy units enter the field.
    pub const ENEMY_SPAWN_X: f64 = 2_750.0;
    /// Lane coordinate of the player base used for turret distance checks.
    pub const PLAYER_BASE_X: f64 = 150.0;
    /// Lane coordinate of the enemy base used for turret distance checks.
    pub const ENEMY_BASE_X: f64 = 2_850.0;
    /// Distance from a base's approach anchor at which movement is blocked.
    pub const BASE_HITBOX_DISTANCE: f64 = 50.0;
    /// Lane distance below which two units block each other.
    pub const UNIT_COLLISION_RADIUS: f64 = 75.0;
    /// Fraction of a unit's speed applied per tick.
    pub const MOVE_STEP_FRACTION: f64 = 0.1;
    /// Flight speed of turret shells.
    pub const TURRET_PROJECTILE_SPEED: f64 = 12.0;
    /// Unsigned flight speed of unit arrows.
    pub const ARROW_SPEED: f64 = 10.0;
    /// Horizontal offset from a turret rack position to its muzzle.
    pub const TURRET_MUZZLE_OFFSET_X: f64 = 70.0;
    /// Vertical position turret shells launch from.
    pub const TURRET_MUZZLE_Y: f64 = 670.0;
    /// Vertical position arrows launch from.
    pub const ARROW_LAUNCH_Y: f64 = 840.0;
    /// Vertical component of the aim point while homing on a unit.
    pub const UNIT_AIM_Y: f64 = 840.0;
    /// Vertical component of the impact check against a unit.
    pub const UNIT_IMPACT_Y: f64 = 860.0;
    /// Impact distance threshold against units.
    pub const UNIT_IMPACT_THRESHOLD: f64 = 30.0;
    /// Vertical component of the aim point while homing on a base.
    pub const BASE_AIM_Y: f64 = 820.0;
    /// Vertical component of the impact check against a base.
    pub const BASE_IMPACT_Y: f64 = 800.0;
    /// Impact distance threshold against bases; wider than the unit one.
    pub const BASE_IMPACT_THRESHOLD: f64 = 40.0;
    /// Horizontal offset applied to melee damage-event anchors.
    pub const MELEE_EVENT_OFFSET_X: f64 = 32.5;
    /// Vertical anchor of damage events against bases.
    pub const BASE_EVENT_Y: f64 = 650.0;
    /// Vertical anchor of damage events against units.
    pub const UNIT_EVENT_Y: f64 = 820.0;

    /// Lane coordinate where a side's units spawn.
    #[must_use]
    pub const fn spawn_x(side: Side) -> f64 {
        match side {
            Side::Player => PLAYER_SPAWN_X,
            Side::Enemy => ENEMY_SPAWN_X,
        }
    }

    /// Anchor advancing units measure their approach against.
    ///
    /// Deliberately the spawn coordinate rather than the base coordinate;
    /// units stop and fight at the spawn line in front of the structure.
    #[must_use]
    pub const fn approach_x(side: Side) -> f64 {
        spawn_x(side)
    }

    /// Lane coordinate turrets measure target distance from.
    #[must_use]
    pub const fn base_x(side: Side) -> f64 {
        match side {
            Side::Player => PLAYER_BASE_X,
            Side::Enemy => ENEMY_BASE_X,
        }
    }

    /// Horizontal anchor of a base for projectile homing and impact checks.
    #[must_use]
    pub const fn base_anchor_x(side: Side) -> f64 {
        match side {
            Side::Player => 220.0,
            Side::Enemy => 2_780.0,
        }
    }

    /// Launch point of the turret occupying `slot` on `side`.
    #[must_use]
    pub fn turret_launch_point(side: Side, slot: usize) -> (f64, f64) {
        let rack_x = match side {
            Side::Player => 80.0 + slot as f64 * 80.0,
            Side::Enemy => 2_920.0 - slot as f64 * 80.0,
        };
        (rack_x + TURRET_MUZZLE_OFFSET_X, TURRET_MUZZLE_Y)
    }

    /// Point a projectile homes toward while its target unit is at `x`.
    #[must_use]
    pub const fn unit_aim_point(x: f64) -> (f64, f64) {
        (x, UNIT_AIM_Y)
    }

    /// Point the impact check measures against for a target unit at `x`.
    #[must_use]
    pub const fn unit_impact_point(x: f64) -> (f64, f64) {
        (x, UNIT_IMPACT_Y)
    }

    /// Point a projectile homes toward while targeting a base.
    #[must_use]
    pub const fn base_aim_point(side: Side) -> (f64, f64) {
        (base_anchor_x(side), BASE_AIM_Y)
    }

    /// Point the impact check measures against for a target base.
    #[must_use]
    pub const fn base_impact_point(side: Side) -> (f64, f64) {
        (base_anchor_x(side), BASE_IMPACT_Y)
    }
}

#[cfg(test)]
mod tests {
    use super::{
        AbilityError, DamageEvent, DamageKind, GameStatus, PlacementError, ProjectileId,
        QueueError, SellError, Side, TargetRef, Timestamp, TurretKind, UnitId, UnitKind,
        UpgradeError, UpgradeKind, field,
    };
    use serde::{de::DeserializeOwned, Serialize};
    use std::time::Duration;

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn counter_cycle_matches_the_four_cycle() {
        assert_eq!(UnitKind::Melee.counters(), UnitKind::Ranged);
        assert_eq!(UnitKind::Ranged.counters(), UnitKind::AntiArmored);
        assert_eq!(UnitKind::AntiArmored.counters(), UnitKind::Armored);
        assert_eq!(UnitKind::Armored.counters(), UnitKind::Melee);
    }

    #[test]
    fn counter_cycle_is_total_and_antisymmetric() {
        for attacker in UnitKind::ALL {
            for target in UnitKind::ALL {
                let forward = attacker.counters() == target;
                let backward = target.counters() == attacker;
                assert!(
                    !(forward && backward),
                    "{attacker:?} and {target:?} counter each other",
                );
            }
            // Each kind counters exactly one other kind.
            let countered: Vec<UnitKind> = UnitKind::ALL
                .into_iter()
                .filter(|target| attacker.counters() == *target)
                .collect();
            assert_eq!(countered.len(), 1);
            assert_ne!(countered[0], attacker);
        }
    }

    #[test]
    fn timestamp_duration_since_saturates() {
        let earlier = Timestamp::from_nanos(500);
        let later = Timestamp::from_nanos(1_700);
        assert_eq!(later.duration_since(earlier), Duration::from_nanos(1_200));
        assert_eq!(earlier.duration_since(later), Duration::ZERO);
    }

    #[test]
    fn timestamp_advanced_by_adds_nanos() {
        let start = Timestamp::from_nanos(1_000);
        let later = start.advanced_by(Duration::from_nanos(250));
        assert_eq!(later.nanos(), 1_250);
    }

    #[test]
    fn side_direction_and_opponent_are_symmetric() {
        assert_eq!(Side::Player.opponent(), Side::Enemy);
        assert_eq!(Side::Enemy.opponent(), Side::Player);
        assert_eq!(Side::Player.direction(), 1.0);
        assert_eq!(Side::Enemy.direction(), -1.0);
    }

    #[test]
    fn turret_launch_points_mirror_by_side() {
        let (player_x, player_y) = field::turret_launch_point(Side::Player, 0);
        assert_eq!(player_x, 150.0);
        assert_eq!(player_y, field::TURRET_MUZZLE_Y);

        let (second_x, _) = field::turret_launch_point(Side::Player, 1);
        assert_eq!(second_x, 230.0);

        let (enemy_x, _) = field::turret_launch_point(Side::Enemy, 0);
        assert_eq!(enemy_x, 2_990.0);
    }

    #[test]
    fn base_aim_and_impact_points_differ() {
        let aim = field::base_aim_point(Side::Enemy);
        let impact = field::base_impact_point(Side::Enemy);
        assert_eq!(aim.0, impact.0);
        assert_ne!(aim.1, impact.1);
    }

    #[test]
    fn unit_ids_round_trip_through_bincode() {
        assert_round_trip(&UnitId::new(42));
        assert_round_trip(&ProjectileId::new(7));
    }

    #[test]
    fn kinds_round_trip_through_bincode() {
        for kind in UnitKind::ALL {
            assert_round_trip(&kind);
        }
        assert_round_trip(&TurretKind::LongRange);
        for upgrade in UpgradeKind::ALL {
            assert_round_trip(&upgrade);
        }
    }

    #[test]
    fn errors_round_trip_through_bincode() {
        assert_round_trip(&QueueError::QueueFull);
        assert_round_trip(&PlacementError::NoFreeSlot);
        assert_round_trip(&SellError::InvalidSlot);
        assert_round_trip(&AbilityError::NotReady);
        assert_round_trip(&UpgradeError::AlreadyApplied);
    }

    #[test]
    fn damage_event_round_trips_through_bincode() {
        let event = DamageEvent {
            x: 812.5,
            y: 820.0,
            amount: 23,
            critical: true,
            kind: DamageKind::Melee,
            against_base: false,
        };
        assert_round_trip(&event);
        assert_round_trip(&GameStatus::Ongoing);
        assert_round_trip(&TargetRef::Base(Side::Enemy));
    }

    #[test]
    fn error_messages_name_the_failure() {
        assert_eq!(QueueError::QueueFull.to_string(), "training queue is full");
        assert_eq!(
            PlacementError::NoFreeSlot.to_string(),
            "no free turret slot"
        );
    }
}
