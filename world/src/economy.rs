//! Match economy and the one-shot upgrade registry.

use lane_clash_core::{
    TURRET_UPGRADE_FACTOR, UNIT_ATTACK_UPGRADE_FACTOR, UNIT_HP_UPGRADE_FACTOR, UnitKind,
    UpgradeKind,
};

/// Non-negative currency balance with earn/spend/afford operations.
#[derive(Clone, Debug)]
pub(crate) struct Economy {
    balance: i32,
}

impl Economy {
    pub(crate) fn new(starting_balance: i32) -> Self {
        Self {
            balance: starting_balance.max(0),
        }
    }

    pub(crate) fn balance(&self) -> i32 {
        self.balance
    }

    /// Credits the balance; non-positive amounts are ignored.
    pub(crate) fn earn(&mut self, amount: i32) {
        if amount > 0 {
            self.balance = self.balance.saturating_add(amount);
        }
    }

    /// Debits the balance when affordable, leaving it untouched otherwise.
    pub(crate) fn spend(&mut self, amount: i32) -> bool {
        if amount > 0 && self.can_afford(amount) {
            self.balance -= amount;
            true
        } else {
            false
        }
    }

    pub(crate) fn can_afford(&self, amount: i32) -> bool {
        self.balance >= amount
    }
}

/// Match-scoped one-shot upgrade flags.
///
/// The registry lives inside the world rather than in process-global state so
/// that several simulations can coexist and a reset simply rebuilds the match.
/// Unit blueprints resolve against the flags at spawn time; turret stats are
/// scaled at read time while the corresponding flag is set.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct UpgradeRegistry {
    unit_attack: bool,
    unit_hp: bool,
    turret_attack: bool,
    turret_range: bool,
    base_capacity: bool,
}

impl UpgradeRegistry {
    pub(crate) fn is_applied(&self, upgrade: UpgradeKind) -> bool {
        match upgrade {
            UpgradeKind::UnitAttack => self.unit_attack,
            UpgradeKind::UnitHp => self.unit_hp,
            UpgradeKind::TurretAttack => self.turret_attack,
            UpgradeKind::TurretRange => self.turret_range,
            UpgradeKind::BaseCapacity => self.base_capacity,
        }
    }

    pub(crate) fn mark_applied(&mut self, upgrade: UpgradeKind) {
        match upgrade {
            UpgradeKind::UnitAttack => self.unit_attack = true,
            UpgradeKind::UnitHp => self.unit_hp = true,
            UpgradeKind::TurretAttack => self.turret_attack = true,
            UpgradeKind::TurretRange => self.turret_range = true,
            UpgradeKind::BaseCapacity => self.base_capacity = true,
        }
    }

    /// Blueprint hit points for `kind`, honouring the hp upgrade.
    pub(crate) fn resolved_hit_points(&self, kind: UnitKind) -> i32 {
        if self.unit_hp {
            (f64::from(kind.hit_points()) * UNIT_HP_UPGRADE_FACTOR) as i32
        } else {
            kind.hit_points()
        }
    }

    /// Blueprint attack for `kind`, honouring the attack upgrade.
    pub(crate) fn resolved_attack(&self, kind: UnitKind) -> i32 {
        if self.unit_attack {
            (f64::from(kind.attack()) * UNIT_ATTACK_UPGRADE_FACTOR) as i32
        } else {
            kind.attack()
        }
    }

    /// Effective turret attack, honouring the turret attack upgrade.
    pub(crate) fn effective_turret_attack(&self, attack: i32) -> i32 {
        if self.turret_attack {
            (f64::from(attack) * TURRET_UPGRADE_FACTOR) as i32
        } else {
            attack
        }
    }

    /// Effective turret range, honouring the turret range upgrade.
    pub(crate) fn effective_turret_range(&self, range: i32) -> i32 {
        if self.turret_range {
            (f64::from(range) * TURRET_UPGRADE_FACTOR) as i32
        } else {
            range
        }
    }
}
