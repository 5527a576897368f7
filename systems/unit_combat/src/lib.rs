#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure per-unit planner for movement, collision, targeting, and attacks.
//!
//! The orchestrator calls [`plan_unit_action`] for one ally at a time against
//! fresh world views and applies the resulting commands before planning the
//! next ally. That sequencing is part of the combat semantics: a unit killed
//! by an earlier ally this tick no longer blocks or attracts later allies,
//! and an ally that already advanced is measured at its new position.

use lane_clash_core::{
    field, BaseSnapshot, Side, TargetRef, Timestamp, UnitSnapshot, UnitView,
};

/// Planned actions for a single unit on one tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UnitPlan {
    /// Lane coordinate to advance to; `None` when movement is blocked.
    pub advance: Option<f64>,
    /// Acquired target to attack; `None` when out of range or cooling down.
    pub strike: Option<TargetRef>,
}

/// Computes the movement and attack decision for one living ally.
///
/// Blocking and targeting are determined independently:
/// - the enemy base blocks within its hitbox distance and becomes a
///   candidate target within attack range, both measured from the tentative
///   next position;
/// - living enemies are measured from the current position; the first one in
///   range replaces a base-only candidate, and any within the collision
///   radius blocks movement;
/// - living allies strictly ahead in the travel direction within the
///   collision radius block movement, which keeps the lane from collapsing
///   into a single stack.
#[must_use]
pub fn plan_unit_action(
    unit: &UnitSnapshot,
    side: Side,
    allies: &UnitView,
    enemies: &UnitView,
    enemy_base: &BaseSnapshot,
    now: Timestamp,
) -> UnitPlan {
    let direction = side.direction();
    let next_pos =
        unit.coordinate + f64::from(unit.speed) * direction * field::MOVE_STEP_FRACTION;

    let mut blocked = false;
    let mut target: Option<TargetRef> = None;

    let approach = field::approach_x(enemy_base.side);
    let dist_to_base = (next_pos - approach).abs();
    if dist_to_base <= field::BASE_HITBOX_DISTANCE {
        blocked = true;
    }
    if dist_to_base <= f64::from(unit.range) {
        target = Some(TargetRef::Base(enemy_base.side));
    }

    for enemy in enemies.iter() {
        if !enemy.is_alive() {
            continue;
        }
        let dist = (unit.coordinate - enemy.coordinate).abs();
        if dist <= f64::from(unit.range) {
            let base_only = matches!(target, None | Some(TargetRef::Base(_)));
            if base_only {
                target = Some(TargetRef::Unit(enemy.id));
            }
        }
        if dist <= field::UNIT_COLLISION_RADIUS {
            blocked = true;
        }
    }

    for ally in allies.iter() {
        if ally.id == unit.id || !ally.is_alive() {
            continue;
        }
        let relative = (ally.coordinate - unit.coordinate) * direction;
        if relative > 0.0 && relative < field::UNIT_COLLISION_RADIUS {
            blocked = true;
        }
    }

    UnitPlan {
        advance: (!blocked).then_some(next_pos),
        strike: if target.is_some() && unit.can_attack_at(now) {
            target
        } else {
            None
        },
    }
}

#[cfg(test)]
mod tests {
    use super::{plan_unit_action, UnitPlan};
    use lane_clash_core::{
        field, BaseSnapshot, Side, TargetRef, Timestamp, UnitId, UnitKind, UnitSnapshot,
        UnitView, UNIT_ATTACK_COOLDOWN,
    };
    use std::time::Duration;

    fn unit(id: u32, kind: UnitKind, coordinate: f64) -> UnitSnapshot {
        UnitSnapshot {
            id: UnitId::new(id),
            kind,
            hp: kind.hit_points(),
            max_hp: kind.hit_points(),
            attack: kind.attack(),
            speed: kind.speed(),
            cost: kind.cost(),
            range: kind.range(),
            coordinate,
            last_attack: Timestamp::default(),
            attack_cooldown: UNIT_ATTACK_COOLDOWN,
        }
    }

    fn dead(mut snapshot: UnitSnapshot) -> UnitSnapshot {
        snapshot.hp = 0;
        snapshot
    }

    fn enemy_base() -> BaseSnapshot {
        BaseSnapshot {
            side: Side::Enemy,
            hp: 500,
            max_hp: 500,
            turret_capacity: 1,
            turret_count: 0,
        }
    }

    fn ready_at() -> Timestamp {
        Timestamp::default().advanced_by(Duration::from_secs(5))
    }

    fn empty() -> UnitView {
        UnitView::from_snapshots(Vec::new())
    }

    #[test]
    fn unblocked_unit_advances_by_speed_fraction() {
        let mover = unit(1, UnitKind::Melee, 500.0);
        let allies = UnitView::from_snapshots(vec![mover]);

        let plan = plan_unit_action(
            &mover,
            Side::Player,
            &allies,
            &empty(),
            &enemy_base(),
            ready_at(),
        );

        assert_eq!(
            plan,
            UnitPlan {
                advance: Some(502.0),
                strike: None,
            },
        );
    }

    #[test]
    fn enemy_direction_moves_toward_the_player() {
        let mover = unit(1, UnitKind::Armored, 2_000.0);
        let allies = UnitView::from_snapshots(vec![mover]);
        let player_base = BaseSnapshot {
            side: Side::Player,
            hp: 500,
            max_hp: 500,
            turret_capacity: 1,
            turret_count: 0,
        };

        let plan = plan_unit_action(
            &mover,
            Side::Enemy,
            &allies,
            &empty(),
            &player_base,
            ready_at(),
        );

        assert_eq!(plan.advance, Some(1_998.4));
    }

    #[test]
    fn base_hitbox_blocks_but_still_targets() {
        // Tentative position lands within the hitbox and within range.
        let mover = unit(1, UnitKind::Melee, field::ENEMY_SPAWN_X - 50.0);
        let allies = UnitView::from_snapshots(vec![mover]);

        let plan = plan_unit_action(
            &mover,
            Side::Player,
            &allies,
            &empty(),
            &enemy_base(),
            ready_at(),
        );

        assert_eq!(plan.advance, None);
        assert_eq!(plan.strike, Some(TargetRef::Base(Side::Enemy)));
    }

    #[test]
    fn enemy_unit_replaces_a_base_candidate() {
        let mover = unit(1, UnitKind::Ranged, field::ENEMY_SPAWN_X - 150.0);
        let allies = UnitView::from_snapshots(vec![mover]);
        let enemies = UnitView::from_snapshots(vec![unit(
            7,
            UnitKind::Melee,
            field::ENEMY_SPAWN_X - 250.0,
        )]);

        let plan = plan_unit_action(
            &mover,
            Side::Player,
            &allies,
            &enemies,
            &enemy_base(),
            ready_at(),
        );

        assert_eq!(plan.strike, Some(TargetRef::Unit(UnitId::new(7))));
    }

    #[test]
    fn first_enemy_in_range_is_kept() {
        let mover = unit(1, UnitKind::Ranged, 1_000.0);
        let allies = UnitView::from_snapshots(vec![mover]);
        let enemies = UnitView::from_snapshots(vec![
            unit(3, UnitKind::Melee, 1_150.0),
            unit(5, UnitKind::Melee, 1_100.0),
        ]);

        let plan = plan_unit_action(
            &mover,
            Side::Player,
            &allies,
            &enemies,
            &enemy_base(),
            ready_at(),
        );

        // Scan order is id order; the closer unit came second and does not
        // displace the acquired target.
        assert_eq!(plan.strike, Some(TargetRef::Unit(UnitId::new(3))));
    }

    #[test]
    fn colliding_enemy_blocks_movement() {
        let mover = unit(1, UnitKind::Melee, 1_000.0);
        let allies = UnitView::from_snapshots(vec![mover]);
        let enemies = UnitView::from_snapshots(vec![unit(2, UnitKind::Melee, 1_070.0)]);

        let plan = plan_unit_action(
            &mover,
            Side::Player,
            &allies,
            &enemies,
            &enemy_base(),
            ready_at(),
        );

        assert_eq!(plan.advance, None);
        assert_eq!(plan.strike, Some(TargetRef::Unit(UnitId::new(2))));
    }

    #[test]
    fn ally_ahead_blocks_but_ally_behind_does_not() {
        let mover = unit(1, UnitKind::Melee, 1_000.0);
        let ahead = unit(2, UnitKind::Melee, 1_050.0);
        let behind = unit(3, UnitKind::Melee, 960.0);
        let allies = UnitView::from_snapshots(vec![mover, ahead, behind]);

        let plan = plan_unit_action(
            &mover,
            Side::Player,
            &allies,
            &empty(),
            &enemy_base(),
            ready_at(),
        );
        assert_eq!(plan.advance, None);

        let plan = plan_unit_action(
            &behind,
            Side::Player,
            &allies,
            &empty(),
            &enemy_base(),
            ready_at(),
        );
        // The mover sits 40 ahead of this one, inside the radius.
        assert_eq!(plan.advance, None);

        let lone = UnitView::from_snapshots(vec![mover, behind]);
        let plan = plan_unit_action(
            &mover,
            Side::Player,
            &lone,
            &empty(),
            &enemy_base(),
            ready_at(),
        );
        assert!(plan.advance.is_some());
    }

    #[test]
    fn dead_entities_neither_block_nor_attract() {
        let mover = unit(1, UnitKind::Melee, 1_000.0);
        let allies = UnitView::from_snapshots(vec![
            mover,
            dead(unit(2, UnitKind::Melee, 1_050.0)),
        ]);
        let enemies =
            UnitView::from_snapshots(vec![dead(unit(3, UnitKind::Melee, 1_040.0))]);

        let plan = plan_unit_action(
            &mover,
            Side::Player,
            &allies,
            &enemies,
            &enemy_base(),
            ready_at(),
        );

        assert!(plan.advance.is_some());
        assert_eq!(plan.strike, None);
    }

    #[test]
    fn cooldown_suppresses_the_strike_but_not_the_target_scan() {
        let mut mover = unit(1, UnitKind::Melee, 1_000.0);
        mover.last_attack = ready_at();
        let allies = UnitView::from_snapshots(vec![mover]);
        let enemies = UnitView::from_snapshots(vec![unit(2, UnitKind::Melee, 1_060.0)]);

        let plan = plan_unit_action(
            &mover,
            Side::Player,
            &allies,
            &enemies,
            &enemy_base(),
            ready_at(),
        );
        assert_eq!(plan.strike, None);

        let plan = plan_unit_action(
            &mover,
            Side::Player,
            &allies,
            &enemies,
            &enemy_base(),
            ready_at().advanced_by(UNIT_ATTACK_COOLDOWN),
        );
        assert_eq!(plan.strike, Some(TargetRef::Unit(UnitId::new(2))));
    }
}
