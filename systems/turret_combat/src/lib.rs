#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that selects turret targets and emits firing commands.

use lane_clash_core::{field, Command, Side, Timestamp, TurretView, UnitId, UnitView};

/// Turret combat system that reuses scratch buffers to avoid repeated
/// allocations.
#[derive(Debug, Default)]
pub struct TurretCombat {
    candidate_workspace: Vec<Candidate>,
}

impl TurretCombat {
    /// Creates a new turret combat system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits `Command::FireTurret` entries for every ready turret with a
    /// living enemy in range.
    ///
    /// Target distance is measured from the owning side's base coordinate.
    /// The closest candidate wins; on an exact distance tie the
    /// first-encountered unit in stable scan order is kept. A turret with no
    /// candidate simply does not act this tick and its cooldown is left
    /// untouched.
    pub fn handle(
        &mut self,
        now: Timestamp,
        side: Side,
        turrets: &TurretView,
        enemies: &UnitView,
        out: &mut Vec<Command>,
    ) {
        if turrets.is_empty() {
            return;
        }

        self.prepare_candidates(enemies);
        if self.candidate_workspace.is_empty() {
            return;
        }

        let base_x = field::base_x(side);
        for turret in turrets.iter() {
            if !turret.can_fire_at(now) {
                continue;
            }

            let mut best: Option<(f64, UnitId)> = None;
            for candidate in &self.candidate_workspace {
                let distance = (candidate.coordinate - base_x).abs();
                if distance > f64::from(turret.range) {
                    continue;
                }
                let closer = match best {
                    Some((best_distance, _)) => distance < best_distance,
                    None => true,
                };
                if closer {
                    best = Some((distance, candidate.id));
                }
            }

            if let Some((_, target)) = best {
                out.push(Command::FireTurret {
                    side,
                    slot: turret.slot,
                    target,
                });
            }
        }
    }

    fn prepare_candidates(&mut self, enemies: &UnitView) {
        self.candidate_workspace.clear();
        let (lower, _) = enemies.iter().size_hint();
        self.candidate_workspace.reserve(lower);

        for snapshot in enemies.iter() {
            if !snapshot.is_alive() {
                continue;
            }
            self.candidate_workspace.push(Candidate {
                id: snapshot.id,
                coordinate: snapshot.coordinate,
            });
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Candidate {
    id: UnitId,
    coordinate: f64,
}
