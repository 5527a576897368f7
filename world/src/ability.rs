//! Cooldown state machine backing the special abilities.

use lane_clash_core::{AbilityKind, AbilitySnapshot};

/// One ability instance shared by the whole match.
///
/// Cooldowns are measured in regen intervals: the world decrements the
/// counter once per currency-regeneration tick, so an ability with cooldown
/// 60 becomes ready again roughly a minute after activation.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Ability {
    kind: AbilityKind,
    current_cooldown: u32,
}

impl Ability {
    pub(crate) fn new(kind: AbilityKind) -> Self {
        Self {
            kind,
            current_cooldown: 0,
        }
    }

    pub(crate) fn kind(&self) -> AbilityKind {
        self.kind
    }

    pub(crate) fn is_ready(&self) -> bool {
        self.current_cooldown == 0
    }

    /// Restarts the full cooldown.
    pub(crate) fn trigger_cooldown(&mut self) {
        self.current_cooldown = self.kind.cooldown_units();
    }

    /// Counts one regen interval toward readiness.
    pub(crate) fn tick_cooldown(&mut self) {
        self.current_cooldown = self.current_cooldown.saturating_sub(1);
    }

    pub(crate) fn snapshot(&self) -> AbilitySnapshot {
        AbilitySnapshot {
            kind: self.kind,
            cost: self.kind.cost(),
            damage: self.kind.damage(),
            cooldown_units: self.kind.cooldown_units(),
            remaining_units: self.current_cooldown,
        }
    }
}
