#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure flight step computation for homing projectiles.
//!
//! Projectiles home rather than lead: every tick the aim point is recomputed
//! from the target's current position, the projectile advances along that
//! vector, and a separate impact check measures the distance to the impact
//! anchor. The aim and impact anchors deliberately differ; both sets of
//! constants live in the core field module.

use lane_clash_core::{field, FlightOutcome, ProjectileSnapshot, Side};

/// Target facts resolved by the orchestrator before planning a step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ResolvedTarget {
    /// A unit that still exists in a roster.
    Unit {
        /// Current lane coordinate of the unit.
        coordinate: f64,
        /// Whether the unit is still alive.
        alive: bool,
    },
    /// A side's base.
    Base {
        /// Side whose base is pursued.
        side: Side,
        /// Whether the base still stands.
        alive: bool,
    },
    /// The target no longer exists.
    Gone,
}

/// One computed flight step, ready to settle into the world.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlightStep {
    /// Horizontal position after the step.
    pub x: f64,
    /// Vertical position after the step.
    pub y: f64,
    /// Resolution of the step.
    pub outcome: FlightOutcome,
}

/// Advances a projectile toward its target by one tick.
///
/// A dead or missing target discards the projectile without damage. The
/// projectile moves by at most its speed and snaps onto the aim point on
/// overshoot; afterwards the impact check runs against the target's impact
/// anchor with the base threshold wider than the unit one.
#[must_use]
pub fn plan_flight(projectile: &ProjectileSnapshot, target: ResolvedTarget) -> FlightStep {
    let (aim, impact, threshold) = match target {
        ResolvedTarget::Unit { alive: false, .. }
        | ResolvedTarget::Base { alive: false, .. }
        | ResolvedTarget::Gone => {
            return FlightStep {
                x: projectile.x,
                y: projectile.y,
                outcome: FlightOutcome::TargetLost,
            };
        }
        ResolvedTarget::Unit { coordinate, .. } => (
            field::unit_aim_point(coordinate),
            field::unit_impact_point(coordinate),
            field::UNIT_IMPACT_THRESHOLD,
        ),
        ResolvedTarget::Base { side, .. } => (
            field::base_aim_point(side),
            field::base_impact_point(side),
            field::BASE_IMPACT_THRESHOLD,
        ),
    };

    let speed = projectile.speed.abs();
    let dx = aim.0 - projectile.x;
    let dy = aim.1 - projectile.y;
    let distance = (dx * dx + dy * dy).sqrt();

    let (x, y) = if distance <= speed {
        aim
    } else {
        (
            projectile.x + dx / distance * speed,
            projectile.y + dy / distance * speed,
        )
    };

    let ix = x - impact.0;
    let iy = y - impact.1;
    let outcome = if (ix * ix + iy * iy).sqrt() < threshold {
        FlightOutcome::Impact
    } else {
        FlightOutcome::Flying
    };

    FlightStep { x, y, outcome }
}
