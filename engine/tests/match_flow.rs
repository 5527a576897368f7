use std::time::Duration;

use lane_clash_core::{
    AbilityError, AbilityKind, AbilityTarget, Event, GameStatus, PlacementError, Side, Timestamp,
    TurretKind, UnitKind,
};
use lane_clash_engine::{Engine, MatchConfig};
use lane_clash_world::query;

const TICK: Duration = Duration::from_millis(16);

fn config(starting_currency: i32, base_hp: i32) -> MatchConfig {
    MatchConfig {
        starting_currency,
        base_hp,
        variance_seed: 0x1111_2222_3333_4444,
        spawn_seed: 0x5555_6666_7777_8888,
    }
}

#[test]
fn training_pipeline_produces_a_player_unit() {
    let mut engine = Engine::new(config(5_000, 1_000));
    engine.queue_unit(UnitKind::Melee).expect("queue accepts");
    assert_eq!(query::balance(engine.world()), 4_950);
    assert_eq!(query::training_snapshot(engine.world()).queue_depth, 1);

    // First tick dequeues into the in-flight slot.
    let start = Timestamp::from_nanos(1);
    let status = engine.tick(start);
    assert_eq!(status, GameStatus::Ongoing);
    assert_eq!(
        query::training_snapshot(engine.world()).current,
        Some(UnitKind::Melee)
    );
    assert_eq!(query::training_snapshot(engine.world()).queue_depth, 0);

    // Second tick, after the training time, fields the unit.
    let done = start.advanced_by(UnitKind::Melee.training_time());
    let _ = engine.tick(done);
    assert_eq!(query::training_snapshot(engine.world()).current, None);
    assert_eq!(query::training_snapshot(engine.world()).queue_depth, 0);
    assert_eq!(query::unit_view(engine.world(), Side::Player).len(), 1);
}

#[test]
fn turret_placement_exhausts_the_single_slot() {
    let mut engine = Engine::new(config(1_000, 500));

    let slot = engine
        .place_turret(TurretKind::LongRange)
        .expect("first placement fits");
    assert_eq!(slot, 0);
    assert_eq!(query::balance(engine.world()), 550);
    assert_eq!(
        query::base_snapshot(engine.world(), Side::Player).turret_count,
        1
    );

    let refused = engine.place_turret(TurretKind::Standard);
    assert_eq!(refused, Err(PlacementError::NoFreeSlot));
    assert_eq!(query::balance(engine.world()), 550);
}

#[test]
fn sold_turrets_refund_half_their_cost() {
    let mut engine = Engine::new(config(1_000, 500));
    let slot = engine
        .place_turret(TurretKind::LongRange)
        .expect("placement fits");

    let refund = engine.sell_turret(slot).expect("occupied slot sells");
    assert_eq!(refund, TurretKind::LongRange.cost() / 2);
    assert_eq!(query::balance(engine.world()), 775);
    assert_eq!(
        query::base_snapshot(engine.world(), Side::Player).turret_count,
        0
    );
}

#[test]
fn nuking_an_empty_battlefield_still_spends_and_cools_down() {
    let mut engine = Engine::new(config(5_000, 1_000));

    engine
        .use_ability(AbilityKind::Nuke, AbilityTarget::Units(Vec::new()))
        .expect("area form accepts an empty list");
    assert_eq!(query::balance(engine.world()), 3_500);
    assert!(!query::ability_snapshot(engine.world(), AbilityKind::Nuke).is_ready());

    let refused = engine.use_ability(AbilityKind::Nuke, AbilityTarget::Units(Vec::new()));
    assert_eq!(refused, Err(AbilityError::NotReady));
    assert_eq!(query::balance(engine.world()), 3_500);
}

#[test]
fn undefended_player_base_falls_to_the_enemy() {
    let mut engine = Engine::new(config(1_000, 500));
    let mut now = Timestamp::from_nanos(1);
    let mut damage_seen = false;
    let mut outcome = GameStatus::Ongoing;

    for _ in 0..60_000 {
        outcome = engine.tick(now);
        damage_seen |= !query::damage_events(engine.world()).is_empty();
        if outcome != GameStatus::Ongoing {
            break;
        }
        now = now.advanced_by(TICK);
    }

    assert_eq!(outcome, GameStatus::EnemyVictory);
    assert!(damage_seen, "enemy units should have dealt visible damage");
    assert_eq!(query::base_snapshot(engine.world(), Side::Player).hp, 0);
}

#[test]
fn a_turret_defense_earns_bounties() {
    let mut engine = Engine::new(config(5_000, 500));
    let _ = engine
        .place_turret(TurretKind::Standard)
        .expect("placement fits");

    let mut now = Timestamp::from_nanos(1);
    let mut projectiles_seen = false;
    let mut bounty: Option<i32> = None;

    for _ in 0..20_000 {
        let _ = engine.tick(now);
        projectiles_seen |= !query::projectile_view(engine.world()).is_empty();
        bounty = engine.events().iter().find_map(|event| match event {
            Event::UnitDied {
                side: Side::Enemy,
                bounty,
                ..
            } => Some(*bounty),
            _ => None,
        });
        if bounty.is_some() {
            break;
        }
        now = now.advanced_by(TICK);
    }

    assert!(projectiles_seen, "the turret should have fired");
    let bounty = bounty.expect("an enemy unit should have fallen");
    let expected: Vec<i32> = [
        UnitKind::Melee,
        UnitKind::Ranged,
        UnitKind::AntiArmored,
        UnitKind::Armored,
    ]
    .iter()
    .map(|kind| (f64::from(kind.cost()) * 1.25) as i32)
    .collect();
    assert!(expected.contains(&bounty), "bounty {bounty} not in {expected:?}");
}

#[test]
fn upgrades_change_future_and_living_units() {
    let mut engine = Engine::new(config(5_000, 1_000));
    engine.queue_unit(UnitKind::Melee).expect("queue accepts");

    let start = Timestamp::from_nanos(1);
    let _ = engine.tick(start);
    let _ = engine.tick(start.advanced_by(UnitKind::Melee.training_time()));
    assert_eq!(query::unit_view(engine.world(), Side::Player).len(), 1);

    engine
        .apply_upgrade(lane_clash_core::UpgradeKind::UnitAttack, 500)
        .expect("first purchase succeeds");
    let view = query::unit_view(engine.world(), Side::Player);
    let unit = view.iter().next().expect("fielded unit");
    assert_eq!(unit.attack, 24);

    assert_eq!(
        engine.apply_upgrade(lane_clash_core::UpgradeKind::UnitAttack, 500),
        Err(lane_clash_core::UpgradeError::AlreadyApplied)
    );
}

#[test]
fn capacity_upgrade_opens_a_second_slot() {
    let mut engine = Engine::new(config(5_000, 500));
    let _ = engine
        .place_turret(TurretKind::Standard)
        .expect("placement fits");
    assert_eq!(
        engine.place_turret(TurretKind::Standard),
        Err(PlacementError::NoFreeSlot)
    );

    engine
        .apply_upgrade(lane_clash_core::UpgradeKind::BaseCapacity, 600)
        .expect("capacity upgrade succeeds");
    let slot = engine
        .place_turret(TurretKind::LongRange)
        .expect("second slot now fits");
    assert_eq!(slot, 1);
}

#[test]
fn reset_clears_one_shot_upgrades() {
    let mut engine = Engine::new(config(5_000, 500));
    engine
        .apply_upgrade(lane_clash_core::UpgradeKind::TurretRange, 400)
        .expect("first purchase succeeds");
    assert_eq!(
        engine.apply_upgrade(lane_clash_core::UpgradeKind::TurretRange, 400),
        Err(lane_clash_core::UpgradeError::AlreadyApplied)
    );

    engine.reset();
    engine
        .apply_upgrade(lane_clash_core::UpgradeKind::TurretRange, 400)
        .expect("flags were cleared by the reset");
    assert_eq!(query::balance(engine.world()), 5_000 - 400);
}
