#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays a headless Lane Clash match.
//!
//! Drives the engine with a synthetic fixed-step clock and a small scripted
//! player: it keeps the training queue fed, racks up turrets and upgrades as
//! the economy allows, and drops the nuke once enough enemies bunch up. The
//! binary exists to exercise the whole simulation surface end to end; all
//! presentation is log output.

use anyhow::bail;
use clap::Parser;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use lane_clash_core::{
    AbilityKind, AbilityTarget, GameStatus, Side, Timestamp, TurretKind, UnitKind, UpgradeKind,
};
use lane_clash_engine::{Engine, MatchConfig};
use lane_clash_world::query;

const NANOS_PER_MILLI: u64 = 1_000_000;

/// Runs one Lane Clash match headlessly and reports the outcome.
#[derive(Debug, Parser)]
#[command(name = "lane-clash", about = "Headless Lane Clash match driver")]
struct Args {
    /// Starting currency granted to the player.
    #[arg(long, default_value_t = 1_000)]
    currency: i32,

    /// Initial hit points of both bases.
    #[arg(long, default_value_t = 500)]
    base_hp: i32,

    /// Seed of the damage-variance generator.
    #[arg(long, default_value_t = 0x51c2_9aa0_77e3_bd17)]
    variance_seed: u64,

    /// Seed of the enemy archetype generator.
    #[arg(long, default_value_t = 0x9e37_79b9_7f4a_7c15)]
    spawn_seed: u64,

    /// Seed of the scripted player's unit choices.
    #[arg(long, default_value_t = 0x2545_f491_4f6c_dd1d)]
    policy_seed: u64,

    /// Milliseconds of simulated time per tick.
    #[arg(long, default_value_t = 16)]
    tick_millis: u64,

    /// Abort the match after this many ticks.
    #[arg(long, default_value_t = 600_000)]
    max_ticks: u64,

    /// Disable the scripted player and let the enemy walk in unopposed.
    #[arg(long)]
    idle: bool,
}

/// Entry point for the Lane Clash command-line driver.
fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = MatchConfig {
        starting_currency: args.currency,
        base_hp: args.base_hp,
        variance_seed: args.variance_seed,
        spawn_seed: args.spawn_seed,
    };

    let mut engine = Engine::new(config);
    let mut policy = ScriptedPlayer::new(args.policy_seed);

    println!("{}", query::welcome_banner(engine.world()));
    info!(
        currency = args.currency,
        base_hp = args.base_hp,
        tick_millis = args.tick_millis,
        "starting match"
    );

    let tick_nanos = args.tick_millis.max(1) * NANOS_PER_MILLI;
    let ticks_per_second = (1_000 / args.tick_millis.max(1)).max(1);

    for tick_index in 0..args.max_ticks {
        if !args.idle {
            policy.act(&mut engine);
        }

        let now = Timestamp::from_nanos(1 + tick_index * tick_nanos);
        let status = engine.tick(now);

        if tick_index % (ticks_per_second * 10) == 0 {
            report_progress(&engine, tick_index);
        }

        match status {
            GameStatus::Ongoing => {}
            GameStatus::PlayerVictory => {
                info!(tick = tick_index, "player victory");
                println!("Player wins after {tick_index} ticks.");
                return Ok(());
            }
            GameStatus::EnemyVictory => {
                info!(tick = tick_index, "enemy victory");
                println!("Enemy wins after {tick_index} ticks.");
                return Ok(());
            }
        }
    }

    bail!("match still ongoing after {} ticks", args.max_ticks);
}

fn report_progress(engine: &Engine, tick_index: u64) {
    let world = engine.world();
    let player_base = query::base_snapshot(world, Side::Player);
    let enemy_base = query::base_snapshot(world, Side::Enemy);
    info!(
        tick = tick_index,
        balance = query::balance(world),
        player_units = query::unit_view(world, Side::Player).len(),
        enemy_units = query::unit_view(world, Side::Enemy).len(),
        projectiles = query::projectile_view(world).len(),
        player_base_hp = player_base.hp,
        enemy_base_hp = enemy_base.hp,
        "progress"
    );
}

/// Scripted player used to exercise the full mutation surface.
#[derive(Debug)]
struct ScriptedPlayer {
    rng: ChaCha8Rng,
    upgrades: Vec<UpgradeKind>,
}

impl ScriptedPlayer {
    const UPGRADE_COST: i32 = 500;
    const NUKE_CROWD: usize = 4;

    fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            upgrades: UpgradeKind::ALL.to_vec(),
        }
    }

    fn act(&mut self, engine: &mut Engine) {
        self.keep_queue_fed(engine);
        self.build_defenses(engine);
        self.buy_upgrades(engine);
        self.drop_nuke(engine);
    }

    fn keep_queue_fed(&mut self, engine: &mut Engine) {
        let depth = query::training_snapshot(engine.world()).queue_depth;
        if depth >= 2 {
            return;
        }
        let kind = self.roll_unit();
        if query::balance(engine.world()) >= kind.cost() + 200 {
            if let Err(reason) = engine.queue_unit(kind) {
                debug!(?kind, %reason, "queue refused");
            }
        }
    }

    fn build_defenses(&mut self, engine: &mut Engine) {
        let base = query::base_snapshot(engine.world(), Side::Player);
        if base.turret_count >= base.turret_capacity {
            return;
        }
        let kind = if base.turret_count == 0 {
            TurretKind::Standard
        } else {
            TurretKind::LongRange
        };
        if query::balance(engine.world()) >= kind.cost() + 300 {
            match engine.place_turret(kind) {
                Ok(slot) => info!(?kind, slot, "turret placed"),
                Err(reason) => debug!(?kind, %reason, "placement refused"),
            }
        }
    }

    fn buy_upgrades(&mut self, engine: &mut Engine) {
        let Some(&upgrade) = self.upgrades.first() else {
            return;
        };
        if query::balance(engine.world()) < Self::UPGRADE_COST + 500 {
            return;
        }
        match engine.apply_upgrade(upgrade, Self::UPGRADE_COST) {
            Ok(()) => {
                info!(?upgrade, "upgrade applied");
                let _ = self.upgrades.remove(0);
            }
            Err(reason) => debug!(?upgrade, %reason, "upgrade refused"),
        }
    }

    fn drop_nuke(&mut self, engine: &mut Engine) {
        let nuke = query::ability_snapshot(engine.world(), AbilityKind::Nuke);
        if !nuke.is_ready() || query::balance(engine.world()) < nuke.cost {
            return;
        }
        let enemies = query::unit_view(engine.world(), Side::Enemy);
        if enemies.len() < Self::NUKE_CROWD {
            return;
        }
        let targets: Vec<_> = enemies.iter().map(|unit| unit.id).collect();
        match engine.use_ability(AbilityKind::Nuke, AbilityTarget::Units(targets)) {
            Ok(()) => info!(victims = enemies.len(), "nuke dropped"),
            Err(reason) => debug!(%reason, "nuke refused"),
        }
    }

    fn roll_unit(&mut self) -> UnitKind {
        let index = self.rng.gen_range(0..UnitKind::ALL.len());
        UnitKind::ALL[index]
    }
}
